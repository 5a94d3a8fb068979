//! Argon2id `PasswordHasher` adapter.
//!
//! Hashes are PHC strings produced with the crate's default Argon2id
//! parameters and a fresh random salt. Hashing and verification are CPU
//! bound and run on the blocking pool.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Password, TraceId};
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Argon2id hasher holding a throwaway hash for dummy verification.
#[derive(Clone)]
pub struct Argon2Hasher {
    dummy_hash: String,
}

fn hash_blocking(password: &[u8]) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::hash(err.to_string()))
}

fn verify_blocking(password: &[u8], phc: &str) -> Result<bool, PasswordHashError> {
    let parsed =
        PasswordHash::new(phc).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
    match Argon2::default().verify_password(password, &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError::hash(err.to_string())),
    }
}

async fn run_blocking<T, F>(operation: F) -> Result<T, PasswordHashError>
where
    F: FnOnce() -> Result<T, PasswordHashError> + Send + 'static,
    T: Send + 'static,
{
    TraceId::spawn_blocking(operation)
        .await
        .map_err(|err| PasswordHashError::hash(format!("hashing task failed: {err}")))?
}

impl Argon2Hasher {
    /// Build a hasher, deriving the dummy hash used for unknown users.
    pub fn new() -> Result<Self, PasswordHashError> {
        let mut filler = [0_u8; 32];
        OsRng.fill_bytes(&mut filler);
        let dummy_hash = hash_blocking(&filler)?;
        Ok(Self { dummy_hash })
    }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &Password) -> Result<String, PasswordHashError> {
        let secret = Zeroizing::new(password.expose().as_bytes().to_vec());
        run_blocking(move || hash_blocking(&secret)).await
    }

    async fn verify(&self, password: &str, phc: &str) -> Result<bool, PasswordHashError> {
        let secret = Zeroizing::new(password.as_bytes().to_vec());
        let phc = phc.to_owned();
        run_blocking(move || verify_blocking(&secret, &phc)).await
    }

    async fn verify_dummy(&self, password: &str) {
        let secret = Zeroizing::new(password.as_bytes().to_vec());
        let phc = self.dummy_hash.clone();
        let _ignored = run_blocking(move || verify_blocking(&secret, &phc)).await;
    }
}
