// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signed remote-configuration verification.
//!
//! New policy blobs arrive signed; verification MUST succeed before the
//! payload is decoded into a policy set. [`VerifiedPayload`] encodes that
//! order in the type system: [`decode_policy_set`] only accepts a payload
//! wrapper produced by a successful verifier run.
//!
//! Verifiers return only a boolean. There is deliberately no distinction
//! between "unknown key id" and "bad signature", so a caller cannot be
//! used as an oracle.

pub mod blob;
pub mod verifier;

pub use blob::{BlobError, RemoteConfigBlob, SignatureType};
pub use verifier::{
    decode_policy_set, EcdsaVerifyingKey, HmacConfigVerifier, PublicKeyConfigVerifier,
    RemoteConfigVerifier, SecretResolver, VerifiedPayload, VerifyingKeyResolver,
};
