//! End-to-end properties of the public API.

use coin_cipher::{
    Error, PublicKey, SecretKey, Signature,
    ecdh::ecdh,
    ecdsa::{recover_public_key, verify_signature, verify_signature_validity},
    hash::{Sha256, sum_sha256},
    keypair::{deterministic_key_pair_iterator, generate_deterministic_key_pair_inner},
    verify_public_key, verify_secret_key,
};
use hex_literal::hex;
use proptest::prelude::*;

prop_compose! {
    fn secret_key()(bytes in any::<[u8; 32]>()) -> SecretKey {
        generate_deterministic_key_pair_inner(&bytes).1
    }
}

#[test]
fn known_public_key() {
    let secret_key = SecretKey::from_bytes(&[0x11; 32]).unwrap();
    assert_eq!(
        secret_key.public_key().to_bytes(),
        hex!("034f355bdcb7cc0af728ef3cceb9615d90684bb5b2ca5f859ab0f0b704075871aa")
    );
}

#[test]
fn arbitrary_bytes_are_not_signatures() {
    let public_key = SecretKey::from_bytes(&[0x11; 32]).unwrap().public_key();
    let hash = sum_sha256(b"message");

    let mut buffer = [0u8; 65];
    for i in 0..100u32 {
        buffer[..32].copy_from_slice(sum_sha256(&i.to_le_bytes()).as_bytes());
        buffer[32..64].copy_from_slice(sum_sha256(&(!i).to_le_bytes()).as_bytes());
        buffer[64] = i as u8;

        let signature = Signature::from_array(buffer);
        assert!(!verify_signature(&public_key, &signature, &hash));
        if let Ok(recovered) = recover_public_key(&hash, &buffer) {
            assert_ne!(recovered, public_key);
        }
    }
}

#[test]
fn validation_entry_points() {
    assert_eq!(
        verify_secret_key(&[0u8; 32]),
        Err(Error::InvalidSecretKey)
    );
    assert_eq!(
        verify_secret_key(&[0x11; 31]),
        Err(Error::InvalidLength {
            expected: 32,
            actual: 31
        })
    );
    // x = 0x0202..02 is on the curve, x = 5 is not
    assert_eq!(verify_public_key(&[0x02; 33]), Ok(()));
    let mut off_curve = [0u8; 33];
    off_curve[0] = 0x02;
    off_curve[32] = 0x05;
    assert_eq!(verify_public_key(&off_curve), Err(Error::InvalidPublicKey));
    assert_eq!(
        verify_signature_validity(&[0u8; 64]),
        Err(Error::InvalidLength {
            expected: 65,
            actual: 64
        })
    );
    assert_eq!(
        deterministic_key_pair_iterator(&[]).unwrap_err(),
        Error::EmptySeed
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sign_verify_recover(secret_key in secret_key(), hash in any::<[u8; 32]>()) {
        let hash = Sha256::from_array(hash);
        let public_key = secret_key.public_key();

        for signature in [
            secret_key.sign_hash_deterministic(&hash),
            secret_key.sign_hash_with_rng(&mut rand_core::OsRng, &hash),
        ] {
            prop_assert!(signature.verify_validity().is_ok());
            prop_assert!(verify_signature(&public_key, &signature, &hash));
            prop_assert_eq!(signature.recover_public_key(&hash), Ok(public_key));
            prop_assert_eq!(
                recover_public_key(&hash, signature.as_bytes()),
                Ok(public_key)
            );

            let other = Sha256::from_array([!hash.as_bytes()[0]; 32]);
            prop_assert!(!verify_signature(&public_key, &signature, &other));
        }
    }

    #[test]
    fn high_s_twin_is_rejected_but_recovers(
        secret_key in secret_key(),
        hash in any::<[u8; 32]>()
    ) {
        let hash = Sha256::from_array(hash);
        let signature = secret_key.sign_hash_deterministic(&hash);

        let mut bytes = signature.to_bytes();
        let s = coin_cipher::Scalar::from_bytes(&signature.s()).unwrap();
        bytes[32..64].copy_from_slice(&(-s).to_bytes());
        bytes[64] ^= 1;
        let twin = Signature::from_array(bytes);

        prop_assert_eq!(twin.verify_validity(), Err(Error::MalleableSignature));
        prop_assert!(!verify_signature(&secret_key.public_key(), &twin, &hash));
        prop_assert_eq!(twin.recover_public_key(&hash), Ok(secret_key.public_key()));
        prop_assert_eq!(twin.normalize_s(), Ok(Some(signature)));
    }

    #[test]
    fn ecdh_is_symmetric(a in secret_key(), b in secret_key()) {
        prop_assert_eq!(ecdh(&b.public_key(), &a), ecdh(&a.public_key(), &b));
    }

    #[test]
    fn keys_round_trip_through_hex(secret_key in secret_key()) {
        let public_key = secret_key.public_key();
        prop_assert_eq!(public_key.to_string().parse::<PublicKey>(), Ok(public_key));
        prop_assert_eq!(
            PublicKey::from_uncompressed(&public_key.to_uncompressed()),
            Ok(public_key)
        );
        prop_assert_eq!(secret_key.to_hex().parse::<SecretKey>(), Ok(secret_key));
    }
}
