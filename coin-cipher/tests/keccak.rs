//! RFC6979 signing over a Keccak-256 message digest.

use coin_cipher::{SecretKey, Signature, hash::Sha256};
use hex_literal::hex;
use sha3::{Digest, Keccak256};
use signature::hazmat::{PrehashSigner, PrehashVerifier};

const SECRET_KEY: [u8; 32] =
    hex!("4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318");

const MESSAGE: [u8; 42] = hex!(
    "e9808504e3b29200831e848094f0109fc8df283027b6285cc889f5aa624eac1f55843b9aca0080018080"
);

const SIGNATURE: [u8; 65] = hex!(
    "c9cf86333bcb065d140032ecaab5d9281bde80f21b9687b3e94161de42d51895"
    "727a108a0b8d101465414033c3f705a9c7b826e596766046ee1183dbc8aeaa68"
    "00"
);

#[test]
fn keccak_digest_vector() {
    let secret_key = SecretKey::from_bytes(&SECRET_KEY).unwrap();
    let digest = Keccak256::digest(MESSAGE);

    let signature: Signature = secret_key.sign_prehash(&digest).unwrap();
    assert_eq!(signature.to_bytes(), SIGNATURE);

    let hash = Sha256::from_bytes(&digest).unwrap();
    assert_eq!(secret_key.sign_hash_deterministic(&hash), signature);

    let public_key = secret_key.public_key();
    assert!(public_key.verify_prehash(&digest, &signature).is_ok());
    assert_eq!(signature.recover_public_key(&hash), Ok(public_key));
}

#[test]
fn prehash_must_be_32_bytes() {
    let secret_key = SecretKey::from_bytes(&SECRET_KEY).unwrap();
    let short: signature::Result<Signature> = secret_key.sign_prehash(&[0u8; 31]);
    assert!(short.is_err());
    assert!(
        secret_key
            .public_key()
            .verify_prehash(&[0u8; 33], &Signature::from_array(SIGNATURE))
            .is_err()
    );
}
