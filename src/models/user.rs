use crate::database::connection::DbPool;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("An account with email {email} already exists")]
    EmailTaken { email: String },
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fund organizer account. Donors never need one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

impl User {
    pub async fn create(pool: &DbPool, user: CreateUser) -> Result<Self, UserError> {
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            fullname: user.fullname,
            email: user.email.trim().to_lowercase(),
            password_hash: hash(user.password.as_bytes(), DEFAULT_COST)?,
            created_at: now,
            updated_at: now,
        };

        match pool {
            DbPool::Postgres(pg) => {
                let email = record.email.clone();
                let created = sqlx::query_as::<_, User>(
                    "INSERT INTO users (id, fullname, email, password_hash, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, $5, $6)
                     RETURNING *",
                )
                .bind(record.id)
                .bind(record.fullname)
                .bind(record.email)
                .bind(record.password_hash)
                .bind(record.created_at)
                .bind(record.updated_at)
                .fetch_one(pg)
                .await;

                match created {
                    Ok(user) => Ok(user),
                    Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                        Err(UserError::EmailTaken { email })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            DbPool::Memory(store) => store.insert_user(record),
        }
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, UserError> {
        match pool {
            DbPool::Postgres(pg) => {
                let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(pg)
                    .await?;

                Ok(user)
            }
            DbPool::Memory(store) => Ok(store.find_user(|u| u.id == id)),
        }
    }

    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Self>, UserError> {
        let email = email.trim().to_lowercase();

        match pool {
            DbPool::Postgres(pg) => {
                let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                    .bind(email)
                    .fetch_optional(pg)
                    .await?;

                Ok(user)
            }
            DbPool::Memory(store) => Ok(store.find_user(|u| u.email == email)),
        }
    }

    pub fn verify_password(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify(password, &self.password_hash)
    }

    pub async fn authenticate(
        pool: &DbPool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, UserError> {
        if let Some(user) = Self::find_by_email(pool, email).await? {
            if user.verify_password(password).unwrap_or(false) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }
}
