//! The block-cipher collaborator the pipeline delegates to.
//!
//! [`CipherPrimitive`] is the whole contract: sizing metadata, IV generation,
//! raw encrypt/decrypt, and capability listing. The pipeline never names a
//! concrete cipher type, so any implementation can be injected at construction.
//!
//! [`RustCryptoPrimitive`] implements it on top of the RustCrypto block cipher
//! and block mode crates.
//!
//! # Ciphers
//!
//! | name           | block | accepted keys       |
//! |----------------|-------|---------------------|
//! | `rijndael-128` | 16    | 16, 24, 32 (AES)    |
//! | `des`          | 8     | 8                   |
//! | `tripledes`    | 8     | 24 (3-key EDE)      |
//! | `blowfish`     | 8     | 56                  |
//!
//! A short key is right-padded with `0x00` up to the next accepted size.
//!
//! # Modes
//!
//! `cbc` and `ecb` work on whole blocks; unaligned plaintext is zero-extended
//! to the next block boundary. `cfb` and `ofb` are full-block feedback modes
//! and accept any length. Every mode reports an IV size equal to the block
//! size, including `ecb`, which ignores it.

use aes::{Aes128, Aes192, Aes256};
use blowfish::Blowfish;
use cipher::{
    block_padding::NoPadding,
    typenum::{IsLess, Le, NonZero, U256},
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, StreamCipher,
};
use des::{Des, TdesEde3};
use rand::{rngs::OsRng, RngCore};

use super::error::PrimitiveError;

/// Raw block cipher operations and metadata for named cipher/mode pairs.
#[cfg_attr(test, mockall::automock)]
pub trait CipherPrimitive: Send + Sync {
    /// Whether this primitive can serve `cipher` in `mode`.
    fn supports(&self, cipher: &str, mode: &str) -> bool;

    /// IV length in bytes for `cipher` in `mode`.
    fn iv_size(&self, cipher: &str, mode: &str) -> Result<usize, PrimitiveError>;

    /// Block length in bytes for `cipher` in `mode`.
    fn block_size(&self, cipher: &str, mode: &str) -> Result<usize, PrimitiveError>;

    /// `size` bytes from a cryptographically secure generator.
    fn random_iv(&self, size: usize) -> Vec<u8>;

    fn encrypt(
        &self,
        cipher: &str,
        key: &[u8],
        plaintext: &[u8],
        mode: &str,
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;

    fn decrypt(
        &self,
        cipher: &str,
        key: &[u8],
        ciphertext: &[u8],
        mode: &str,
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;

    fn list_ciphers(&self) -> Vec<String>;

    fn list_modes(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Rijndael128,
    Des,
    TripleDes,
    Blowfish,
}

impl Algorithm {
    const ALL: [Algorithm; 4] = [
        Algorithm::Rijndael128,
        Algorithm::Des,
        Algorithm::TripleDes,
        Algorithm::Blowfish,
    ];

    fn name(self) -> &'static str {
        match self {
            Algorithm::Rijndael128 => "rijndael-128",
            Algorithm::Des => "des",
            Algorithm::TripleDes => "tripledes",
            Algorithm::Blowfish => "blowfish",
        }
    }

    fn from_name(name: &str) -> Result<Self, PrimitiveError> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| PrimitiveError::UnknownCipher(name.to_owned()))
    }

    fn block_size(self) -> usize {
        match self {
            Algorithm::Rijndael128 => 16,
            Algorithm::Des | Algorithm::TripleDes | Algorithm::Blowfish => 8,
        }
    }

    /// Zero-extend `key` to the smallest key size this cipher accepts.
    fn normalize_key(self, key: &[u8]) -> Result<Vec<u8>, PrimitiveError> {
        let target = match self {
            Algorithm::Rijndael128 => [16, 24, 32].into_iter().find(|&s| s >= key.len()),
            Algorithm::Des => (key.len() <= 8).then_some(8),
            Algorithm::TripleDes => (key.len() <= 24).then_some(24),
            Algorithm::Blowfish => (key.len() <= 56).then_some(56),
        }
        .ok_or_else(|| PrimitiveError::InvalidKeyLength {
            cipher: self.name().into(),
            len: key.len(),
        })?;

        let mut normalized = key.to_vec();
        normalized.resize(target, 0);
        Ok(normalized)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Cbc,
    Ecb,
    Cfb,
    Ofb,
}

impl Mode {
    const ALL: [Mode; 4] = [Mode::Cbc, Mode::Ecb, Mode::Cfb, Mode::Ofb];

    fn name(self) -> &'static str {
        match self {
            Mode::Cbc => "cbc",
            Mode::Ecb => "ecb",
            Mode::Cfb => "cfb",
            Mode::Ofb => "ofb",
        }
    }

    fn from_name(name: &str) -> Result<Self, PrimitiveError> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == name)
            .ok_or_else(|| PrimitiveError::UnknownMode(name.to_owned()))
    }

    fn is_block_aligned(self) -> bool {
        matches!(self, Mode::Cbc | Mode::Ecb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Encrypt,
    Decrypt,
}

/// [`CipherPrimitive`] backed by the RustCrypto `aes`, `des` and `blowfish`
/// ciphers in `cbc`, `ecb`, `cfb` and `ofb` modes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoPrimitive;

impl RustCryptoPrimitive {
    pub fn new() -> Self {
        Self
    }

    fn run(
        &self,
        cipher: &str,
        mode: &str,
        direction: Direction,
        key: &[u8],
        iv: &[u8],
        data: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        let algorithm = Algorithm::from_name(cipher)?;
        let mode = Mode::from_name(mode)?;
        let key = algorithm.normalize_key(key)?;

        let block_size = algorithm.block_size();
        if iv.len() != block_size {
            return Err(PrimitiveError::InvalidIvLength {
                expected: block_size,
                actual: iv.len(),
            });
        }

        let mut data = data.to_vec();
        if mode.is_block_aligned() && data.len() % block_size != 0 {
            match direction {
                Direction::Encrypt => {
                    let aligned = data.len().div_ceil(block_size) * block_size;
                    data.resize(aligned, 0);
                }
                Direction::Decrypt => {
                    return Err(PrimitiveError::UnalignedInput {
                        len: data.len(),
                        block_size,
                    })
                }
            }
        }

        let job = Job {
            cipher: algorithm.name(),
            mode,
            direction,
            key: &key,
            iv,
        };
        match algorithm {
            Algorithm::Rijndael128 => match key.len() {
                16 => job.apply::<Aes128>(data),
                24 => job.apply::<Aes192>(data),
                _ => job.apply::<Aes256>(data),
            },
            Algorithm::Des => job.apply::<Des>(data),
            Algorithm::TripleDes => job.apply::<TdesEde3>(data),
            Algorithm::Blowfish => job.apply::<Blowfish>(data),
        }
    }
}

/// One encrypt or decrypt call with validated, normalised inputs.
struct Job<'a> {
    cipher: &'static str,
    mode: Mode,
    direction: Direction,
    key: &'a [u8],
    iv: &'a [u8],
}

impl Job<'_> {
    fn apply<C>(&self, mut data: Vec<u8>) -> Result<Vec<u8>, PrimitiveError>
    where
        C: BlockCipher + BlockEncryptMut + BlockDecryptMut + KeyInit,
        C::BlockSize: IsLess<U256>,
        Le<C::BlockSize, U256>: NonZero,
    {
        let (key, iv) = (self.key, self.iv);
        let invalid = |_| PrimitiveError::InvalidKeyLength {
            cipher: self.cipher.into(),
            len: key.len(),
        };

        match (self.mode, self.direction) {
            (Mode::Cbc, Direction::Encrypt) => Ok(cbc::Encryptor::<C>::new_from_slices(key, iv)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<NoPadding>(&data)),
            (Mode::Cbc, Direction::Decrypt) => cbc::Decryptor::<C>::new_from_slices(key, iv)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<NoPadding>(&data)
                .map_err(|_| self.unaligned(data.len())),
            (Mode::Ecb, Direction::Encrypt) => Ok(ecb::Encryptor::<C>::new_from_slice(key)
                .map_err(invalid)?
                .encrypt_padded_vec_mut::<NoPadding>(&data)),
            (Mode::Ecb, Direction::Decrypt) => ecb::Decryptor::<C>::new_from_slice(key)
                .map_err(invalid)?
                .decrypt_padded_vec_mut::<NoPadding>(&data)
                .map_err(|_| self.unaligned(data.len())),
            (Mode::Cfb, Direction::Encrypt) => {
                cfb_mode::BufEncryptor::<C>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .encrypt(&mut data);
                Ok(data)
            }
            (Mode::Cfb, Direction::Decrypt) => {
                cfb_mode::BufDecryptor::<C>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .decrypt(&mut data);
                Ok(data)
            }
            (Mode::Ofb, _) => {
                ofb::Ofb::<C>::new_from_slices(key, iv)
                    .map_err(invalid)?
                    .apply_keystream(&mut data);
                Ok(data)
            }
        }
    }

    fn unaligned(&self, len: usize) -> PrimitiveError {
        PrimitiveError::UnalignedInput {
            len,
            block_size: self.iv.len(),
        }
    }
}

impl CipherPrimitive for RustCryptoPrimitive {
    fn supports(&self, cipher: &str, mode: &str) -> bool {
        Algorithm::from_name(cipher).is_ok() && Mode::from_name(mode).is_ok()
    }

    fn iv_size(&self, cipher: &str, mode: &str) -> Result<usize, PrimitiveError> {
        self.block_size(cipher, mode)
    }

    fn block_size(&self, cipher: &str, mode: &str) -> Result<usize, PrimitiveError> {
        Mode::from_name(mode)?;
        Ok(Algorithm::from_name(cipher)?.block_size())
    }

    fn random_iv(&self, size: usize) -> Vec<u8> {
        let mut iv = vec![0u8; size];
        OsRng.fill_bytes(&mut iv);
        iv
    }

    fn encrypt(
        &self,
        cipher: &str,
        key: &[u8],
        plaintext: &[u8],
        mode: &str,
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        self.run(cipher, mode, Direction::Encrypt, key, iv, plaintext)
    }

    fn decrypt(
        &self,
        cipher: &str,
        key: &[u8],
        ciphertext: &[u8],
        mode: &str,
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        self.run(cipher, mode, Direction::Decrypt, key, iv, ciphertext)
    }

    fn list_ciphers(&self) -> Vec<String> {
        Algorithm::ALL.iter().map(|a| a.name().to_owned()).collect()
    }

    fn list_modes(&self) -> Vec<String> {
        Mode::ALL.iter().map(|m| m.name().to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A, AES-128 vectors (first block).
    const NIST_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    const NIST_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const NIST_PLAINTEXT: &str = "6bc1bee22e409f96e93d7e117393172a";

    fn unhex(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    fn nist(mode: &str) -> Vec<u8> {
        RustCryptoPrimitive
            .encrypt(
                "rijndael-128",
                &unhex(NIST_KEY),
                &unhex(NIST_PLAINTEXT),
                mode,
                &unhex(NIST_IV),
            )
            .unwrap()
    }

    #[test]
    fn aes128_cbc_known_answer() {
        assert_eq!(hex::encode(nist("cbc")), "7649abac8119b246cee98e9b12e9197d");
    }

    #[test]
    fn aes128_ecb_known_answer() {
        assert_eq!(hex::encode(nist("ecb")), "3ad77bb40d7a3660a89ecaf32466ef97");
    }

    #[test]
    fn aes128_cfb_and_ofb_known_answer() {
        // The first feedback block is E(IV) in both modes.
        assert_eq!(hex::encode(nist("cfb")), "3b3fd92eb72dad20333449f8e83cfb4a");
        assert_eq!(hex::encode(nist("ofb")), "3b3fd92eb72dad20333449f8e83cfb4a");
    }

    #[test]
    fn every_cipher_and_mode_round_trips() {
        let p = RustCryptoPrimitive::new();
        let plaintext = b"The quick brown fox jumps over the lazy dog!!!!!";
        for cipher in p.list_ciphers() {
            for mode in p.list_modes() {
                assert!(p.supports(&cipher, &mode));
                let iv = p.random_iv(p.iv_size(&cipher, &mode).unwrap());
                let key = b"k3y";
                let ct = p.encrypt(&cipher, key, plaintext, &mode, &iv).unwrap();
                assert_ne!(&ct[..], &plaintext[..], "{cipher}/{mode}");
                let pt = p.decrypt(&cipher, key, &ct, &mode, &iv).unwrap();
                assert_eq!(&pt[..], &plaintext[..], "{cipher}/{mode}");
            }
        }
    }

    #[test]
    fn sizes() {
        let p = RustCryptoPrimitive;
        assert_eq!(p.iv_size("rijndael-128", "cbc").unwrap(), 16);
        assert_eq!(p.block_size("rijndael-128", "ofb").unwrap(), 16);
        assert_eq!(p.iv_size("des", "ecb").unwrap(), 8);
        assert_eq!(p.block_size("blowfish", "cfb").unwrap(), 8);
        assert!(matches!(
            p.iv_size("serpent", "cbc"),
            Err(PrimitiveError::UnknownCipher(_))
        ));
        assert!(matches!(
            p.block_size("des", "xts"),
            Err(PrimitiveError::UnknownMode(_))
        ));
        assert!(!p.supports("des", "xts"));
        assert!(!p.supports("serpent", "cbc"));
    }

    #[test]
    fn random_iv_has_requested_length() {
        let p = RustCryptoPrimitive;
        assert_eq!(p.random_iv(16).len(), 16);
        assert!(p.random_iv(0).is_empty());
        assert_ne!(p.random_iv(32), p.random_iv(32));
    }

    #[test]
    fn short_key_is_zero_extended() {
        let p = RustCryptoPrimitive;
        let iv = [7u8; 8];
        let short = p.encrypt("des", b"abc", b"12345678", "cbc", &iv).unwrap();
        let explicit = p
            .encrypt("des", b"abc\0\0\0\0\0", b"12345678", "cbc", &iv)
            .unwrap();
        assert_eq!(short, explicit);
    }

    #[test]
    fn key_length_selects_aes_variant() {
        let p = RustCryptoPrimitive;
        let iv = [0u8; 16];
        let a128 = p.encrypt("rijndael-128", &[1u8; 16], &[0u8; 16], "ecb", &iv).unwrap();
        let a192 = p.encrypt("rijndael-128", &[1u8; 24], &[0u8; 16], "ecb", &iv).unwrap();
        let a256 = p.encrypt("rijndael-128", &[1u8; 32], &[0u8; 16], "ecb", &iv).unwrap();
        assert_ne!(a128, a192);
        assert_ne!(a192, a256);
    }

    #[test]
    fn oversized_key_is_rejected() {
        let p = RustCryptoPrimitive;
        let err = p
            .encrypt("des", &[1u8; 9], b"12345678", "ecb", &[0u8; 8])
            .unwrap_err();
        assert!(matches!(err, PrimitiveError::InvalidKeyLength { len: 9, .. }));
        assert!(p
            .encrypt("blowfish", &[1u8; 57], b"12345678", "ecb", &[0u8; 8])
            .is_err());
        assert!(p
            .encrypt("rijndael-128", &[1u8; 33], b"x", "cbc", &[0u8; 16])
            .is_err());
    }

    #[test]
    fn wrong_iv_length_is_rejected() {
        let err = RustCryptoPrimitive
            .encrypt("rijndael-128", b"key", b"x", "cbc", &[0u8; 8])
            .unwrap_err();
        assert_eq!(
            err,
            PrimitiveError::InvalidIvLength {
                expected: 16,
                actual: 8
            }
        );
    }

    #[test]
    fn unaligned_block_mode_plaintext_is_zero_extended() {
        let p = RustCryptoPrimitive;
        let iv = [3u8; 16];
        let ct = p.encrypt("rijndael-128", b"key", b"abc", "cbc", &iv).unwrap();
        assert_eq!(ct.len(), 16);
        let pt = p.decrypt("rijndael-128", b"key", &ct, "cbc", &iv).unwrap();
        assert_eq!(&pt[..3], b"abc");
        assert!(pt[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn unaligned_block_mode_ciphertext_is_rejected() {
        let err = RustCryptoPrimitive
            .decrypt("rijndael-128", b"key", &[0u8; 17], "ecb", &[0u8; 16])
            .unwrap_err();
        assert_eq!(
            err,
            PrimitiveError::UnalignedInput {
                len: 17,
                block_size: 16
            }
        );
    }

    #[test]
    fn feedback_modes_keep_length() {
        let p = RustCryptoPrimitive;
        let iv = [9u8; 8];
        for mode in ["cfb", "ofb"] {
            let ct = p.encrypt("blowfish", b"secret", b"odd length!", mode, &iv).unwrap();
            assert_eq!(ct.len(), 11);
        }
    }
}
