//! Fuzz target for signature recovery
//!
//! This target ensures signer recovery never panics on arbitrary signature
//! bytes and digests.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use relay_primitives::{AttestationSignature, Hash256};

#[derive(Debug, Arbitrary)]
struct Input {
    signature: Vec<u8>,
    digest: [u8; 32],
}

fuzz_target!(|input: Input| {
    if let Ok(signature) = AttestationSignature::from_slice(&input.signature) {
        let _ = signature.recover_signer(&Hash256::from_bytes(input.digest));
    }
});
