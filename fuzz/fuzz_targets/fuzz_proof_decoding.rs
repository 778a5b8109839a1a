//! Fuzz target for transition proof decoding
//!
//! This target ensures:
//! 1. Decoding never panics on arbitrary input
//! 2. Anything that decodes re-encodes to the same bytes
//! 3. Base64 decoding never panics

#![no_main]

use libfuzzer_sys::fuzz_target;
use relay_primitives::TransitionProof;

fuzz_target!(|data: &[u8]| {
    if let Ok(proof) = TransitionProof::from_bytes(data) {
        assert_eq!(proof.to_bytes(), data);
        assert_eq!(proof.encoded_len(), data.len());
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = TransitionProof::from_base64(text);
    }
});
