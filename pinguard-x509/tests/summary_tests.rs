// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Chain summarisation against real certificates.

use pinguard_abstractions::ChainCertificate;
use pinguard_x509::{count_subject_alt_names, summarize_chain, DerCertificate};
use rcgen::{CertificateParams, DnType, KeyPair};

fn self_signed(common_name: &str, sans: &[&str]) -> Vec<u8> {
    let mut params =
        CertificateParams::new(sans.iter().map(|s| s.to_string()).collect::<Vec<_>>()).unwrap();
    params
        .distinguished_name
        .push(DnType::CommonName, common_name);
    let key = KeyPair::generate().unwrap();
    params.self_signed(&key).unwrap().der().to_vec()
}

fn ca_and_leaf(ca_cn: &str, leaf_cn: &str, leaf_san: &str) -> (Vec<u8>, Vec<u8>) {
    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::new(Vec::new()).unwrap();
    ca_params.is_ca = rcgen::IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
    ca_params.distinguished_name.push(DnType::CommonName, ca_cn);
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();

    let leaf_key = KeyPair::generate().unwrap();
    let mut leaf_params = CertificateParams::new(vec![leaf_san.to_string()]).unwrap();
    leaf_params
        .distinguished_name
        .push(DnType::CommonName, leaf_cn);
    let leaf_cert = leaf_params.signed_by(&leaf_key, &ca_cert, &ca_key).unwrap();

    (leaf_cert.der().to_vec(), ca_cert.der().to_vec())
}

#[test]
fn leaf_and_issuer_common_names_are_redacted() {
    let (leaf_der, ca_der) = ca_and_leaf(
        "authority.pinning.test",
        "api.internal.example.test",
        "api.internal.example.test",
    );

    let leaf = DerCertificate::from_der(leaf_der).unwrap();
    let ca = DerCertificate::from_der(ca_der).unwrap();
    let chain: Vec<&dyn ChainCertificate> = vec![&leaf, &ca];

    let summary = summarize_chain(&chain);
    assert_eq!(summary.leaf_common_name.as_deref(), Some("*.example.test"));
    assert_eq!(summary.issuer_common_name.as_deref(), Some("*.pinning.test"));
}

#[test]
fn single_element_chain_reports_its_own_subject_as_issuer() {
    let der = self_signed("api.example.test", &["api.example.test"]);
    let leaf = DerCertificate::from_der(der).unwrap();
    let chain: Vec<&dyn ChainCertificate> = vec![&leaf];

    let summary = summarize_chain(&chain);
    assert_eq!(summary.leaf_common_name.as_deref(), Some("*.example.test"));
    assert_eq!(summary.issuer_common_name.as_deref(), Some("*.example.test"));
}

#[test]
fn dotless_common_name_redacts_to_none() {
    let der = self_signed("Internal Root CA", &["example.test"]);
    let leaf = DerCertificate::from_der(der).unwrap();
    let chain: Vec<&dyn ChainCertificate> = vec![&leaf];

    let summary = summarize_chain(&chain);
    assert_eq!(summary.leaf_common_name, None);
}

#[test]
fn san_count_reflects_the_declared_names() {
    let der = self_signed(
        "api.example.test",
        &["api.example.test", "alt.example.test", "cdn.example.test"],
    );
    assert_eq!(count_subject_alt_names(&der), 3);
}

#[test]
fn empty_chain_yields_the_default_summary() {
    let summary = summarize_chain(&[]);
    assert_eq!(summary.leaf_common_name, None);
    assert_eq!(summary.issuer_common_name, None);
    assert_eq!(summary.san_count, 0);
}
