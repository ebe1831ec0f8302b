use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{Document, Store};
use crate::utils::{hash_password, require};

pub const DEFAULT_ROLE: &str = "user";

const USER_COLUMNS: &str = "id, username, email, password_hash, roles, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// Validated partial update with the password already hashed.
#[derive(Debug)]
struct UserChanges {
    username: Option<String>,
    email: Option<String>,
    password_hash: Option<String>,
    roles: Option<Vec<String>>,
}

impl UserChanges {
    fn from_input(input: UserInput, cost: u32) -> Result<Self, AppError> {
        let password_hash = input
            .password
            .filter(|p| !p.is_empty())
            .map(|p| hash_password(&p, cost))
            .transpose()?;

        Ok(Self {
            username: input.username,
            email: input.email,
            password_hash,
            roles: input.roles,
        })
    }

    fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.password_hash {
            user.password_hash = v;
        }
        if let Some(v) = self.roles {
            user.roles = v;
        }
        user.updated_at = now.max(user.created_at);
    }
}

impl UserInput {
    /// Checks required fields, hashes the password and fills role defaults.
    pub fn into_user(self, cost: u32, now: DateTime<Utc>) -> Result<User, AppError> {
        let username = require(self.username, "username")?;
        let email = require(self.email, "email")?;
        let password = require(self.password, "password")?;

        Ok(User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash: hash_password(&password, cost)?,
            roles: self
                .roles
                .unwrap_or_else(|| vec![DEFAULT_ROLE.to_string()]),
            created_at: now,
            updated_at: now,
        })
    }
}

impl User {
    pub async fn find_all(store: &Store) -> Result<Vec<Self>, AppError> {
        match store {
            Store::Postgres(pool) => {
                let sql = format!("SELECT {} FROM users ORDER BY seq", USER_COLUMNS);
                Ok(sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?)
            }
            Store::Memory(mem) => mem.users.find_all(),
        }
    }

    pub async fn find_by_id(store: &Store, id: Uuid) -> Result<Option<Self>, AppError> {
        match store {
            Store::Postgres(pool) => {
                let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
                Ok(sqlx::query_as::<_, User>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?)
            }
            Store::Memory(mem) => mem.users.find_by_id(id),
        }
    }

    pub async fn create(store: &Store, input: UserInput, cost: u32) -> Result<Self, AppError> {
        let user = input.into_user(cost, Utc::now())?;

        match store {
            Store::Postgres(pool) => {
                let sql = format!(
                    r#"
                    INSERT INTO users ({})
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    RETURNING {}
                    "#,
                    USER_COLUMNS, USER_COLUMNS
                );
                let stored = sqlx::query_as::<_, User>(&sql)
                    .bind(user.id)
                    .bind(&user.username)
                    .bind(&user.email)
                    .bind(&user.password_hash)
                    .bind(&user.roles)
                    .bind(user.created_at)
                    .bind(user.updated_at)
                    .fetch_one(pool)
                    .await?;
                tracing::info!("Created user: {}", stored.id);
                Ok(stored)
            }
            Store::Memory(mem) => mem.users.insert(user),
        }
    }

    pub async fn update(
        store: &Store,
        id: Uuid,
        input: UserInput,
        cost: u32,
    ) -> Result<Option<Self>, AppError> {
        let changes = UserChanges::from_input(input, cost)?;
        let now = Utc::now();

        match store {
            Store::Postgres(pool) => {
                let sql = format!(
                    r#"
                    UPDATE users SET
                        username = COALESCE($2, username),
                        email = COALESCE($3, email),
                        password_hash = COALESCE($4, password_hash),
                        roles = COALESCE($5, roles),
                        updated_at = GREATEST($6, created_at)
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    USER_COLUMNS
                );
                Ok(sqlx::query_as::<_, User>(&sql)
                    .bind(id)
                    .bind(changes.username)
                    .bind(changes.email)
                    .bind(changes.password_hash)
                    .bind(changes.roles)
                    .bind(now)
                    .fetch_optional(pool)
                    .await?)
            }
            Store::Memory(mem) => mem
                .users
                .update_by_id(id, |user| changes.apply_to(user, now)),
        }
    }

    pub async fn delete(store: &Store, id: Uuid) -> Result<bool, AppError> {
        match store {
            Store::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
            Store::Memory(mem) => Ok(mem.users.delete_by_id(id)?.is_some()),
        }
    }
}
