use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{Identity, Registration, Role};

fn hash_password(password: &str) -> Result<String, DomainError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, DomainError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| DomainError::Internal(format!("stored password hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub struct UserService<U> {
    users: U,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    pub fn register(&self, mut registration: Registration) -> Result<Identity, DomainError> {
        registration.normalize_and_validate()?;
        let hash = hash_password(&registration.password)?;
        let identity = self
            .users
            .create(&registration.email, &hash, Role::Customer)?;
        log::info!("Registered user {}", identity.user_id);
        Ok(identity)
    }

    /// Unknown email and wrong password fail the same way.
    pub fn login(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let email = email.trim().to_lowercase();
        let Some(credentials) = self.users.find_by_email(&email)? else {
            return Err(DomainError::InvalidCredentials);
        };
        if !verify_password(password, &credentials.password_hash)? {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(credentials.identity)
    }

    pub fn resolve_identity(&self, user_id: i32) -> Result<Option<Identity>, DomainError> {
        self.users.find_by_id(user_id)
    }

    /// Creates the bootstrap administrator unless the email is already taken.
    pub fn ensure_admin(&self, email: &str, password: &str) -> Result<Identity, DomainError> {
        let mut registration = Registration {
            email: email.to_string(),
            password: password.to_string(),
        };
        registration.normalize_and_validate()?;

        if let Some(existing) = self.users.find_by_email(&registration.email)? {
            if !existing.identity.is_admin() {
                log::warn!(
                    "Bootstrap admin email {} belongs to a non-admin account",
                    registration.email
                );
            }
            return Ok(existing.identity);
        }

        let hash = hash_password(&registration.password)?;
        let identity = self.users.create(&registration.email, &hash, Role::Admin)?;
        log::info!("Created bootstrap admin user {}", identity.user_id);
        Ok(identity)
    }
}
