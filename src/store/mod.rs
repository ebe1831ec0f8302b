//! Persistence gateway shared by every handler through `AppState`.
//!
//! Production runs against Postgres; `DATABASE_URL=memory` swaps in an
//! in-process store with the same collection semantics, used by the tests.

mod memory;

use std::sync::Arc;

use sqlx::Executor;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::Config;
use crate::error::AppError;
use crate::routes::book::Book;
use crate::routes::user::User;

pub use memory::{Collection, Document};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    id UUID PRIMARY KEY,
    seq BIGSERIAL,
    book_name TEXT NOT NULL,
    book_cover TEXT NOT NULL,
    rating DOUBLE PRECISION NOT NULL DEFAULT 0,
    language TEXT,
    page_no INTEGER,
    author TEXT,
    genre TEXT[] NOT NULL DEFAULT '{}',
    readed TEXT NOT NULL,
    description TEXT,
    background_color TEXT NOT NULL,
    nav_tint_color TEXT NOT NULL,
    is_book_mark BOOLEAN NOT NULL DEFAULT FALSE,
    categories INTEGER[] NOT NULL DEFAULT '{}',
    is_my_book BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id UUID PRIMARY KEY,
    seq BIGSERIAL,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    roles TEXT[] NOT NULL DEFAULT '{user}',
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);
"#;

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub books: Collection<Book>,
    pub users: Collection<User>,
}

#[derive(Clone)]
pub enum Store {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl Store {
    pub fn memory() -> Self {
        Store::Memory(Arc::new(MemoryStore::default()))
    }

    /// Opens the process-wide store and makes sure both collections exist.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        if config.uses_memory_store() {
            tracing::warn!("Using in-memory store, records are lost on shutdown");
            return Ok(Self::memory());
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    conn.execute("SET application_name = 'bookshelf';").await?;
                    Ok(())
                })
            })
            .connect(&config.database_url)
            .await?;

        let store = Store::Postgres(pool);
        store.ensure_schema().await?;
        tracing::info!("Connected to Postgres");
        Ok(store)
    }

    /// Idempotent; safe to call on every startup.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        if let Store::Postgres(pool) = self {
            sqlx::raw_sql(SCHEMA).execute(pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        if let Store::Postgres(pool) = self {
            pool.close().await;
            tracing::info!("Postgres pool closed");
        }
    }
}
