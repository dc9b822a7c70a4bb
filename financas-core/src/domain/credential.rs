//! Credential secret and Argon2id password hashing

use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;
pub const DEFAULT_HASH_LEN: u32 = 32;

const SALT_LEN: usize = 16;

/// Argon2id parameters for password hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// Stored form of a hashed password
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword {
    /// Base64-encoded random salt
    pub salt: String,
    /// Hex-encoded derived key
    pub hash: String,
    pub params: Argon2Params,
}

impl HashedPassword {
    /// Hash `plain` with a fresh random salt
    pub fn derive(plain: &str, params: &Argon2Params) -> Result<Self> {
        use rand::Rng;
        let salt: [u8; SALT_LEN] = rand::thread_rng().gen();
        let key = derive_key(plain, &salt, params)?;

        Ok(Self {
            salt: base64::engine::general_purpose::STANDARD.encode(salt),
            hash: hex::encode(key),
            params: params.clone(),
        })
    }

    /// Re-derive the key from `candidate` and compare it with the stored one
    pub fn verify(&self, candidate: &str) -> Result<bool> {
        let salt = base64::engine::general_purpose::STANDARD
            .decode(&self.salt)
            .map_err(|e| Error::Other(format!("Invalid password salt: {}", e)))?;
        let expected = hex::decode(&self.hash)
            .map_err(|e| Error::Other(format!("Invalid password hash: {}", e)))?;

        let key = derive_key(candidate, &salt, &self.params)?;
        Ok(constant_time_eq(&key, &expected))
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn derive_key(password: &str, salt: &[u8], params: &Argon2Params) -> Result<Vec<u8>> {
    let argon2_params = argon2::Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(params.hash_len as usize),
    )
    .map_err(|e| Error::Other(format!("Failed to create argon2 params: {:?}", e)))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut key = vec![0u8; params.hash_len as usize];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Other(format!("Failed to derive key: {:?}", e)))?;

    Ok(key)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// A user's credential secret
///
/// The services only ask whether a candidate matches; how the secret is stored
/// is decided by the persistence adapter.
#[derive(Clone, PartialEq, Eq)]
pub enum Password {
    Plain(String),
    Hashed(HashedPassword),
}

impl Password {
    pub fn plain(secret: impl Into<String>) -> Self {
        Password::Plain(secret.into())
    }

    /// Equality for plain secrets, Argon2id re-derivation for hashed ones
    pub fn matches(&self, candidate: &str) -> Result<bool> {
        match self {
            Password::Plain(secret) => Ok(secret == candidate),
            Password::Hashed(hashed) => hashed.verify(candidate),
        }
    }

    /// Hash a plain secret; hashed secrets are returned unchanged
    pub fn into_hashed(self, params: &Argon2Params) -> Result<Self> {
        match self {
            Password::Plain(secret) => Ok(Password::Hashed(HashedPassword::derive(&secret, params)?)),
            hashed @ Password::Hashed(_) => Ok(hashed),
        }
    }

    pub fn is_hashed(&self) -> bool {
        matches!(self, Password::Hashed(_))
    }

    /// Storage scheme name
    pub fn scheme(&self) -> &'static str {
        match self {
            Password::Plain(_) => "plain",
            Password::Hashed(_) => "argon2id",
        }
    }
}

impl Default for Password {
    fn default() -> Self {
        Password::Plain(String::new())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password({}, <redacted>)", self.scheme())
    }
}
