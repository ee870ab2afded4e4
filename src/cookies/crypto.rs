//! Cryptographic primitives behind the jar.
//!
//! [`CryptoProvider`] is the seam between the cookie logic and whatever
//! library does the actual work. [`BoringCrypto`] is the default and speaks
//! the OpenSSL passphrase envelope used by browser-side crypto libraries:
//!
//! ```text
//! "Salted__" || salt[8] || AES-256-CBC(PKCS#7)
//! key || iv = EVP_BytesToKey(MD5, passphrase, salt, 1 round)
//! ```
//!
//! Key derivation is PBKDF2-HMAC with a configurable digest and iteration
//! count.

use crate::base::context::CipherResultExt;
use crate::base::cookieerror::CookieError;
use boring::hash::{hash, MessageDigest};
use boring::symm::{Cipher, Crypter, Mode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use zeroize::Zeroizing;

/// Magic prefix of the OpenSSL salted envelope.
pub const SALTED_MAGIC: &[u8] = b"Salted__";
/// Salt length inside the envelope.
pub const ENVELOPE_SALT_LEN: usize = 8;

const AES_256_KEY_LEN: usize = 32;
const AES_BLOCK_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherOp {
    Encrypt,
    Decrypt,
}

impl CipherOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherOp::Encrypt => "encrypt",
            CipherOp::Decrypt => "decrypt",
        }
    }
}

/// PRF used inside PBKDF2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfDigest {
    #[default]
    Sha1,
    Sha256,
}

impl KdfDigest {
    fn message_digest(&self) -> MessageDigest {
        match self {
            KdfDigest::Sha1 => MessageDigest::sha1(),
            KdfDigest::Sha256 => MessageDigest::sha256(),
        }
    }
}

impl FromStr for KdfDigest {
    type Err = CookieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(KdfDigest::Sha1),
            "sha256" | "sha-256" => Ok(KdfDigest::Sha256),
            _ => Err(CookieError::UnsupportedDigest(s.to_string())),
        }
    }
}

/// Key derivation, symmetric cipher and randomness for the jar.
///
/// `cipher` works on raw bytes: for [`CipherOp::Encrypt`] `data` is the
/// plaintext and the result is the serialized ciphertext; for
/// [`CipherOp::Decrypt`] it is the reverse. `key` is the caller's key string
/// as bytes.
pub trait CryptoProvider: Send + Sync {
    /// Derive `bits / 8` bytes from `passphrase` and `salt`.
    fn derive(&self, passphrase: &[u8], salt: &[u8], bits: usize) -> Result<Vec<u8>, CookieError>;

    fn cipher(&self, op: CipherOp, data: &[u8], key: &[u8]) -> Result<Vec<u8>, CookieError>;

    fn fill_random(&self, buf: &mut [u8]) -> Result<(), CookieError>;
}

/// BoringSSL-backed provider.
#[derive(Debug, Clone)]
pub struct BoringCrypto {
    iterations: u32,
    digest: KdfDigest,
}

impl Default for BoringCrypto {
    fn default() -> Self {
        Self::new()
    }
}

impl BoringCrypto {
    /// One PBKDF2 round with HMAC-SHA1, the browser library default.
    pub fn new() -> Self {
        Self {
            iterations: 1,
            digest: KdfDigest::Sha1,
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_digest(mut self, digest: KdfDigest) -> Self {
        self.digest = digest;
        self
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn digest(&self) -> KdfDigest {
        self.digest
    }

    fn seal(&self, plaintext: &[u8], passphrase: &[u8]) -> Result<Vec<u8>, CookieError> {
        let mut salt = [0u8; ENVELOPE_SALT_LEN];
        self.fill_random(&mut salt)?;

        let (key, iv) = bytes_to_key(passphrase, &salt)?;
        let ciphertext = aes_256_cbc(Mode::Encrypt, &key, &iv, plaintext)?;

        let mut envelope =
            Vec::with_capacity(SALTED_MAGIC.len() + ENVELOPE_SALT_LEN + ciphertext.len());
        envelope.extend_from_slice(SALTED_MAGIC);
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&ciphertext);
        Ok(envelope)
    }

    fn open(&self, envelope: &[u8], passphrase: &[u8]) -> Result<Vec<u8>, CookieError> {
        let header_len = SALTED_MAGIC.len() + ENVELOPE_SALT_LEN;
        if !envelope.starts_with(SALTED_MAGIC) {
            return Err(CookieError::invalid_token("missing Salted__ header"));
        }
        if envelope.len() <= header_len {
            return Err(CookieError::invalid_token("no ciphertext after salt"));
        }

        let salt = &envelope[SALTED_MAGIC.len()..header_len];
        let ciphertext = &envelope[header_len..];
        if ciphertext.len() % AES_BLOCK_LEN != 0 {
            return Err(CookieError::invalid_token(
                "ciphertext is not a whole number of blocks",
            ));
        }

        let (key, iv) = bytes_to_key(passphrase, salt)?;
        // Bad padding is what a wrong key almost always looks like.
        aes_256_cbc(Mode::Decrypt, &key, &iv, ciphertext).map_err(|e| {
            tracing::debug!(error = %e, "AES-CBC decryption rejected");
            CookieError::DecryptionFailed
        })
    }
}

impl CryptoProvider for BoringCrypto {
    fn derive(&self, passphrase: &[u8], salt: &[u8], bits: usize) -> Result<Vec<u8>, CookieError> {
        if bits == 0 || bits % 8 != 0 {
            return Err(CookieError::InvalidKeyLength(bits.to_string()));
        }

        let mut key = vec![0u8; bits / 8];
        boring::pkcs5::pbkdf2_hmac(
            passphrase,
            salt,
            self.iterations as usize,
            self.digest.message_digest(),
            &mut key,
        )
        .cipher_context("derive")?;

        Ok(key)
    }

    fn cipher(&self, op: CipherOp, data: &[u8], key: &[u8]) -> Result<Vec<u8>, CookieError> {
        match op {
            CipherOp::Encrypt => self.seal(data, key),
            CipherOp::Decrypt => self.open(data, key),
        }
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<(), CookieError> {
        boring::rand::rand_bytes(buf).cipher_context("random")
    }
}

/// OpenSSL `EVP_BytesToKey` with MD5 and one round, sized for AES-256-CBC.
fn bytes_to_key(
    passphrase: &[u8],
    salt: &[u8],
) -> Result<(Zeroizing<Vec<u8>>, Zeroizing<Vec<u8>>), CookieError> {
    let needed = AES_256_KEY_LEN + AES_BLOCK_LEN;
    let mut material = Zeroizing::new(Vec::with_capacity(needed + 16));
    let mut block: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());

    while material.len() < needed {
        let mut input = Zeroizing::new(Vec::with_capacity(block.len() + passphrase.len() + salt.len()));
        input.extend_from_slice(&block);
        input.extend_from_slice(passphrase);
        input.extend_from_slice(salt);

        let digest = hash(MessageDigest::md5(), &input).cipher_context("derive")?;
        block = Zeroizing::new(digest.to_vec());
        material.extend_from_slice(&block);
    }

    let key = Zeroizing::new(material[..AES_256_KEY_LEN].to_vec());
    let iv = Zeroizing::new(material[AES_256_KEY_LEN..needed].to_vec());
    Ok((key, iv))
}

/// AES-256-CBC with PKCS7 padding.
fn aes_256_cbc(mode: Mode, key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CookieError> {
    let op = match mode {
        Mode::Encrypt => "encrypt",
        Mode::Decrypt => "decrypt",
    };

    let cipher = Cipher::aes_256_cbc();
    let mut crypter = Crypter::new(cipher, mode, key, Some(iv)).cipher_context(op)?;
    crypter.pad(true); // PKCS7 padding

    let mut out = vec![0u8; data.len() + AES_BLOCK_LEN];
    let count = crypter.update(data, &mut out).cipher_context(op)?;
    let rest = crypter.finalize(&mut out[count..]).cipher_context(op)?;
    out.truncate(count + rest);

    Ok(out)
}
