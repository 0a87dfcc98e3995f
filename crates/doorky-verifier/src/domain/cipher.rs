//! # AES-256-CBC Digest Cipher
//!
//! The `hash` field is exactly two AES blocks, so CBC runs block by block
//! without padding and decryption itself cannot fail.

use aes::{Aes256, Block};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyInit};

use super::entities::{DerivedKey, DIGEST_LEN, IV_LEN};
use super::errors::CryptoError;

/// Instantiate the block cipher for a door's key.
pub fn init_cipher(key: &DerivedKey) -> Result<Aes256, CryptoError> {
    Aes256::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::CipherInitFailed)
}

/// CBC-decrypt a 32-byte ciphertext with an already initialized cipher.
pub fn decrypt_digest(
    cipher: Aes256,
    iv: &[u8; IV_LEN],
    ciphertext: &[u8; DIGEST_LEN],
) -> [u8; DIGEST_LEN] {
    let mut blocks = to_blocks(ciphertext);
    cbc::Decryptor::<Aes256>::inner_iv_init(cipher, iv.into()).decrypt_blocks_mut(&mut blocks);
    from_blocks(&blocks)
}

/// CBC-encrypt a 32-byte digest. The sender side of `decrypt_digest`.
pub fn encrypt_digest(
    key: &DerivedKey,
    iv: &[u8; IV_LEN],
    digest: &[u8; DIGEST_LEN],
) -> Result<[u8; DIGEST_LEN], CryptoError> {
    let cipher = init_cipher(key)?;
    let mut blocks = to_blocks(digest);
    cbc::Encryptor::<Aes256>::inner_iv_init(cipher, iv.into()).encrypt_blocks_mut(&mut blocks);
    Ok(from_blocks(&blocks))
}

fn to_blocks(bytes: &[u8; DIGEST_LEN]) -> [Block; 2] {
    let (first, second) = bytes.split_at(IV_LEN);
    [Block::clone_from_slice(first), Block::clone_from_slice(second)]
}

fn from_blocks(blocks: &[Block; 2]) -> [u8; DIGEST_LEN] {
    let mut bytes = [0u8; DIGEST_LEN];
    bytes[..IV_LEN].copy_from_slice(&blocks[0]);
    bytes[IV_LEN..].copy_from_slice(&blocks[1]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = DerivedKey::derive(b"secret");
        let iv = [7u8; IV_LEN];
        let digest = [0x42u8; DIGEST_LEN];

        let ciphertext = encrypt_digest(&key, &iv, &digest).unwrap();
        assert_ne!(ciphertext, digest);

        let plaintext = decrypt_digest(init_cipher(&key).unwrap(), &iv, &ciphertext);
        assert_eq!(plaintext, digest);
    }

    #[test]
    fn test_wrong_key_yields_different_plaintext() {
        let iv = [0u8; IV_LEN];
        let digest = [1u8; DIGEST_LEN];
        let ciphertext = encrypt_digest(&DerivedKey::derive(b"a"), &iv, &digest).unwrap();

        let other = init_cipher(&DerivedKey::derive(b"b")).unwrap();
        assert_ne!(decrypt_digest(other, &iv, &ciphertext), digest);
    }

    #[test]
    fn test_iv_only_affects_first_block() {
        let key = DerivedKey::derive(b"secret");
        let digest = [9u8; DIGEST_LEN];
        let ciphertext = encrypt_digest(&key, &[0u8; IV_LEN], &digest).unwrap();

        let mut other_iv = [0u8; IV_LEN];
        other_iv[0] = 1;
        let plaintext = decrypt_digest(init_cipher(&key).unwrap(), &other_iv, &ciphertext);
        assert_ne!(plaintext[..IV_LEN], digest[..IV_LEN]);
        assert_eq!(plaintext[IV_LEN..], digest[IV_LEN..]);
    }

    #[test]
    fn test_known_answer() {
        // NIST SP 800-38A F.2.5 CBC-AES256.Encrypt, first two blocks
        let key = DerivedKey::from_bytes(
            hex::decode("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4")
                .unwrap()
                .try_into()
                .unwrap(),
        );
        let iv: [u8; IV_LEN] = hex::decode("000102030405060708090a0b0c0d0e0f")
            .unwrap()
            .try_into()
            .unwrap();
        let plaintext: [u8; DIGEST_LEN] = hex::decode(
            "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51",
        )
        .unwrap()
        .try_into()
        .unwrap();

        let ciphertext = encrypt_digest(&key, &iv, &plaintext).unwrap();
        assert_eq!(
            hex::encode(ciphertext),
            "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d"
        );
    }
}
