#![no_main]
use coin_cipher::{
    PublicKey, SecretKey, Signature,
    ecdsa::{recover_public_key, verify_signature},
    hash::{Sha256, sum_sha256},
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 97 {
        return;
    }

    let hash = Sha256::from_bytes(&data[0..32]).unwrap();
    let signature = Signature::from_bytes(&data[32..97]).unwrap();

    // Arbitrary bytes must never panic, and whatever recovers must verify
    // unless the signature is malleable.
    if let Ok(public_key) = recover_public_key(&hash, signature.as_bytes()) {
        assert_eq!(
            verify_signature(&public_key, &signature, &hash),
            signature.verify_validity().is_ok()
        );
    }

    // A key derived from the input signs and recovers.
    let secret_key = match SecretKey::from_bytes(sum_sha256(data).as_bytes()) {
        Ok(secret_key) => secret_key,
        Err(_) => return,
    };
    let public_key: PublicKey = secret_key.public_key();
    let signature = secret_key.sign_hash_deterministic(&hash);
    assert!(verify_signature(&public_key, &signature, &hash));
    assert_eq!(signature.recover_public_key(&hash), Ok(public_key));
    assert_eq!(PublicKey::from_bytes(&data[32..65]).is_ok(), {
        coin_cipher::verify_public_key(&data[32..65]).is_ok()
    });
});
