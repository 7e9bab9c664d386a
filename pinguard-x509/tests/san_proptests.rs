// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Property-based crash-safety tests for the subjectAltName scanner.

use pinguard_x509::count_subject_alt_names;
use proptest::prelude::*;

proptest! {
    /// The scanner never panics on arbitrary input.
    #[test]
    fn scanner_no_panic(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let _ = count_subject_alt_names(&data);
    }

    /// The scanner is deterministic.
    #[test]
    fn scanner_deterministic(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        prop_assert_eq!(count_subject_alt_names(&data), count_subject_alt_names(&data));
    }

    /// Noise injected around a valid extension never lowers the count.
    #[test]
    fn surrounding_noise_never_lowers_the_count(
        prefix in prop::collection::vec(any::<u8>(), 0..64),
        suffix in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        // OID + OCTET STRING + SEQUENCE with one dNSName entry.
        let extension: &[u8] = &[
            0x06, 0x03, 0x55, 0x1d, 0x11,
            0x04, 0x0c,
            0x30, 0x0a,
            0x82, 0x08, b'a', b'.', b'b', b'.', b't', b'e', b's', b't',
        ];

        let mut data = prefix;
        data.extend_from_slice(extension);
        data.extend_from_slice(&suffix);

        prop_assert!(count_subject_alt_names(&data) >= 1);
    }
}
