use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::Internal(format!("unknown role '{other}'"))),
        }
    }
}

/// The authenticated caller, as resolved from the upstream session layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
    pub email: String,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "user {} is not an administrator",
                self.user_id
            )))
        }
    }
}

/// Stored credentials, only ever seen by the user service.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub identity: Identity,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl Registration {
    /// Lower-cases and trims the email in place before checking it.
    pub fn normalize_and_validate(&mut self) -> Result<(), DomainError> {
        self.email = self.email.trim().to_lowercase();
        let valid_email = match self.email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        };
        if !valid_email {
            return Err(DomainError::invalid("email address is malformed"));
        }
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(DomainError::invalid(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }
        Ok(())
    }
}
