//! Integration tests for the PassVault crypto module.

use passvault::crypto::encryption::{NONCE_LEN, TAG_LEN};
use passvault::crypto::{decrypt, derive_key, encrypt, DerivedKey, KdfParams, Salt};
use passvault::errors::VaultError;

fn key(byte: u8) -> DerivedKey {
    DerivedKey::new([byte; 32])
}

/// Cheapest Argon2id settings that still pass validation.
fn fast_argon2() -> KdfParams {
    KdfParams::Argon2id {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

// ---------------------------------------------------------------------------
// Encryption round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = key(0xAB);
    let long = "x".repeat(4096);
    for plaintext in ["secret1", "", "pässwörd — ünïcode 🔑", long.as_str()] {
        let blob = encrypt(&key, plaintext).expect("encrypt should succeed");

        // Nonce and tag travel inside the blob.
        assert_eq!(blob.len(), NONCE_LEN + plaintext.len() + TAG_LEN);

        let recovered = decrypt(&key, &blob).expect("decrypt should succeed");
        assert_eq!(recovered.as_str(), plaintext);
    }
}

#[test]
fn encrypt_produces_different_ciphertext_each_time() {
    let key = key(0xCD);

    let ct1 = encrypt(&key, "hello").expect("encrypt 1");
    let ct2 = encrypt(&key, "hello").expect("encrypt 2");

    // Fresh nonce per call.
    assert_ne!(ct1[..NONCE_LEN], ct2[..NONCE_LEN]);
    assert_ne!(ct1, ct2);
}

// ---------------------------------------------------------------------------
// Authentication failures
// ---------------------------------------------------------------------------

#[test]
fn decrypt_with_wrong_key_fails() {
    let blob = encrypt(&key(0x11), "TOP_SECRET").expect("encrypt");
    let result = decrypt(&key(0x22), &blob);

    assert!(matches!(result, Err(VaultError::DecryptionFailed)));
}

#[test]
fn flipping_any_bit_is_detected() {
    let key = key(0xBB);
    let blob = encrypt(&key, "abc").expect("encrypt");

    for byte in 0..blob.len() {
        for bit in 0..8 {
            let mut tampered = blob.clone();
            tampered[byte] ^= 1u8 << bit;
            assert!(
                matches!(decrypt(&key, &tampered), Err(VaultError::DecryptionFailed)),
                "bit {bit} of byte {byte} flipped but decrypt succeeded"
            );
        }
    }
}

#[test]
fn truncated_blobs_fail() {
    let key = key(0xAA);
    let blob = encrypt(&key, "value").expect("encrypt");

    for len in 0..blob.len() {
        assert!(
            matches!(decrypt(&key, &blob[..len]), Err(VaultError::DecryptionFailed)),
            "truncation to {len} bytes must fail"
        );
    }
}

#[test]
fn wrong_key_and_corruption_are_indistinguishable() {
    let key1 = key(0x01);
    let mut blob = encrypt(&key1, "value").expect("encrypt");

    let wrong_key = decrypt(&key(0x02), &blob).unwrap_err().to_string();
    blob[NONCE_LEN] ^= 0xFF;
    let corrupted = decrypt(&key1, &blob).unwrap_err().to_string();

    assert_eq!(wrong_key, corrupted);
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

#[test]
fn pbkdf2_same_inputs_same_key() {
    let salt = Salt::generate();
    let params = KdfParams::default();

    let k1 = derive_key(b"my-secure-passphrase", &salt, &params).expect("derive 1");
    let k2 = derive_key(b"my-secure-passphrase", &salt, &params).expect("derive 2");

    assert_eq!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn pbkdf2_different_salts_different_keys() {
    let params = KdfParams::default();

    let k1 = derive_key(b"same-password", &Salt::generate(), &params).expect("derive 1");
    let k2 = derive_key(b"same-password", &Salt::generate(), &params).expect("derive 2");

    assert_ne!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn pbkdf2_different_passwords_different_keys() {
    let salt = Salt::generate();
    let params = KdfParams::default();

    let k1 = derive_key(b"password-one", &salt, &params).expect("derive 1");
    let k2 = derive_key(b"password-two", &salt, &params).expect("derive 2");

    assert_ne!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn iteration_count_changes_the_key() {
    let salt = Salt::from_slice(b"0123456789abcdef").unwrap();

    let k1 = derive_key(b"password", &salt, &KdfParams::Pbkdf2 { iterations: 100_000 })
        .expect("derive 1");
    let k2 = derive_key(b"password", &salt, &KdfParams::Pbkdf2 { iterations: 100_001 })
        .expect("derive 2");

    assert_ne!(k1.as_bytes(), k2.as_bytes());
}

#[test]
fn empty_password_is_accepted_by_kdf() {
    let salt = Salt::generate();
    assert!(derive_key(b"", &salt, &KdfParams::default()).is_ok());
}

#[test]
fn pbkdf2_below_minimum_iterations_is_rejected() {
    let result = derive_key(
        b"pw",
        &Salt::generate(),
        &KdfParams::Pbkdf2 { iterations: 1_000 },
    );
    assert!(matches!(result, Err(VaultError::KeyDerivationFailed(_))));
}

#[test]
fn argon2id_is_deterministic_and_differs_from_pbkdf2() {
    let salt = Salt::generate();

    let a1 = derive_key(b"pw", &salt, &fast_argon2()).expect("argon2 1");
    let a2 = derive_key(b"pw", &salt, &fast_argon2()).expect("argon2 2");
    let p = derive_key(b"pw", &salt, &KdfParams::default()).expect("pbkdf2");

    assert_eq!(a1.as_bytes(), a2.as_bytes());
    assert_ne!(a1.as_bytes(), p.as_bytes());
}

#[test]
fn derived_key_encrypts_and_decrypts() {
    let salt = Salt::generate();
    let key = derive_key(b"M1", &salt, &KdfParams::default()).expect("derive");

    let blob = encrypt(&key, "secret1").expect("encrypt");
    let again = derive_key(b"M1", &salt, &KdfParams::default()).expect("derive again");
    assert_eq!(decrypt(&again, &blob).unwrap().as_str(), "secret1");

    let wrong = derive_key(b"WRONG", &salt, &KdfParams::default()).expect("derive wrong");
    assert!(decrypt(&wrong, &blob).is_err());
}
