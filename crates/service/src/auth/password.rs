//! Password key derivation.
//!
//! Argon2id over the password with a per-user random salt. Hash and salt are
//! kept as separate base64 strings so the store never sees a combined PHC
//! string it would have to parse.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};

use super::errors::AuthError;

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Encoded verifier ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub hash: String,
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct PasswordKdf {
    argon2: Argon2<'static>,
}

impl PasswordKdf {
    pub const SALT_LEN: usize = 16;
    pub const OUTPUT_LEN: usize = 32;

    pub fn new(params: HashParams) -> Result<Self, AuthError> {
        let params = Params::new(params.memory_kib, params.iterations, params.parallelism, Some(Self::OUTPUT_LEN))
            .map_err(|e| AuthError::Hash(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    /// Hash `password` under a fresh salt from the OS CSPRNG.
    pub fn hash(&self, password: &str) -> Result<PasswordDigest, AuthError> {
        let mut salt = [0u8; Self::SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| AuthError::Hash(format!("salt generation failed: {e}")))?;
        let out = self.derive(password.as_bytes(), &salt)?;
        Ok(PasswordDigest { hash: STANDARD.encode(out), salt: STANDARD.encode(salt) })
    }

    /// Recompute the hash with the stored salt and compare in constant time.
    pub fn verify(&self, password: &str, stored_hash: &str, stored_salt: &str) -> Result<bool, AuthError> {
        let salt = STANDARD
            .decode(stored_salt)
            .map_err(|e| AuthError::Hash(format!("corrupt stored salt: {e}")))?;
        let expected = STANDARD
            .decode(stored_hash)
            .map_err(|e| AuthError::Hash(format!("corrupt stored hash: {e}")))?;
        let actual = self.derive(password.as_bytes(), &salt)?;
        Ok(constant_time_eq(&actual, &expected))
    }

    /// Spend one derivation without a stored verifier, so a lookup miss costs
    /// the same as a real verification.
    pub fn burn(&self, password: &str) -> Result<(), AuthError> {
        self.derive(password.as_bytes(), &[0u8; Self::SALT_LEN]).map(|_| ())
    }

    fn derive(&self, password: &[u8], salt: &[u8]) -> Result<[u8; Self::OUTPUT_LEN], AuthError> {
        let mut out = [0u8; Self::OUTPUT_LEN];
        self.argon2
            .hash_password_into(password, salt, &mut out)
            .map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(out)
    }
}
