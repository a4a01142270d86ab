use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{Identity, Role, UserCredentials};
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

impl UserRow {
    fn into_identity(self) -> Result<Identity, DomainError> {
        Ok(Identity {
            user_id: self.id,
            role: self.role.parse()?,
            email: self.email,
        })
    }
}

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for DieselUserRepository {
    fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Identity, DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(users::table)
            .values(&NewUserRow {
                email,
                password_hash,
                role: role.as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .map_err(|e| {
                if super::is_unique_violation(&e) {
                    DomainError::Conflict(format!("email '{email}' is already registered"))
                } else {
                    e.into()
                }
            })?
            .into_identity()
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserCredentials>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?;
        row.map(|row| {
            let password_hash = row.password_hash.clone();
            Ok(UserCredentials {
                identity: row.into_identity()?,
                password_hash,
            })
        })
        .transpose()
    }

    fn find_by_id(&self, id: i32) -> Result<Option<Identity>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .find(id)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .optional()?
            .map(UserRow::into_identity)
            .transpose()
    }
}
