use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{Document, Store};
use crate::utils::require;

pub const DEFAULT_BOOK_COVER: &str = "/placeholder.svg?height=120&width=80";
pub const DEFAULT_READED: &str = "0";
pub const DEFAULT_BACKGROUND_COLOR: &str = "rgba(255,255,255,0.9)";
pub const DEFAULT_NAV_TINT_COLOR: &str = "#000";

const BOOK_COLUMNS: &str = "id, book_name, book_cover, rating, language, page_no, author, \
     genre, readed, description, background_color, nav_tint_color, is_book_mark, \
     categories, is_my_book, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub book_name: String,
    pub book_cover: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_no: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub genre: Vec<String>,
    pub readed: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub background_color: String,
    pub nav_tint_color: String,
    pub is_book_mark: bool,
    pub categories: Vec<i32>,
    pub is_my_book: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Book {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Client-supplied book fields. Used for both create and partial update;
/// `_id`, `createdAt` and `updatedAt` are never read from the client.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub book_name: Option<String>,
    pub book_cover: Option<String>,
    pub rating: Option<f64>,
    pub language: Option<String>,
    pub page_no: Option<i32>,
    pub author: Option<String>,
    pub genre: Option<Vec<String>>,
    pub readed: Option<String>,
    pub description: Option<String>,
    pub background_color: Option<String>,
    pub nav_tint_color: Option<String>,
    pub is_book_mark: Option<bool>,
    pub categories: Option<Vec<i32>>,
    pub is_my_book: Option<bool>,
}

impl BookInput {
    /// Fills schema defaults and assigns identity and timestamps.
    pub fn into_book(self, now: DateTime<Utc>) -> Result<Book, AppError> {
        Ok(Book {
            id: Uuid::new_v4(),
            book_name: require(self.book_name, "bookName")?,
            book_cover: self
                .book_cover
                .unwrap_or_else(|| DEFAULT_BOOK_COVER.to_string()),
            rating: self.rating.unwrap_or(0.0),
            language: self.language,
            page_no: self.page_no,
            author: self.author,
            genre: self.genre.unwrap_or_default(),
            readed: self.readed.unwrap_or_else(|| DEFAULT_READED.to_string()),
            description: self.description,
            background_color: self
                .background_color
                .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
            nav_tint_color: self
                .nav_tint_color
                .unwrap_or_else(|| DEFAULT_NAV_TINT_COLOR.to_string()),
            is_book_mark: self.is_book_mark.unwrap_or(false),
            categories: self.categories.unwrap_or_default(),
            is_my_book: self.is_my_book.unwrap_or(false),
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrites only the supplied fields.
    pub fn apply_to(self, book: &mut Book, now: DateTime<Utc>) {
        if let Some(v) = self.book_name {
            book.book_name = v;
        }
        if let Some(v) = self.book_cover {
            book.book_cover = v;
        }
        if let Some(v) = self.rating {
            book.rating = v;
        }
        if self.language.is_some() {
            book.language = self.language;
        }
        if self.page_no.is_some() {
            book.page_no = self.page_no;
        }
        if self.author.is_some() {
            book.author = self.author;
        }
        if let Some(v) = self.genre {
            book.genre = v;
        }
        if let Some(v) = self.readed {
            book.readed = v;
        }
        if self.description.is_some() {
            book.description = self.description;
        }
        if let Some(v) = self.background_color {
            book.background_color = v;
        }
        if let Some(v) = self.nav_tint_color {
            book.nav_tint_color = v;
        }
        if let Some(v) = self.is_book_mark {
            book.is_book_mark = v;
        }
        if let Some(v) = self.categories {
            book.categories = v;
        }
        if let Some(v) = self.is_my_book {
            book.is_my_book = v;
        }
        book.updated_at = now.max(book.created_at);
    }
}

impl Book {
    pub async fn find_all(store: &Store) -> Result<Vec<Self>, AppError> {
        match store {
            Store::Postgres(pool) => {
                let sql = format!("SELECT {} FROM books ORDER BY seq", BOOK_COLUMNS);
                Ok(sqlx::query_as::<_, Book>(&sql).fetch_all(pool).await?)
            }
            Store::Memory(mem) => mem.books.find_all(),
        }
    }

    pub async fn find_by_id(store: &Store, id: Uuid) -> Result<Option<Self>, AppError> {
        match store {
            Store::Postgres(pool) => {
                let sql = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
                Ok(sqlx::query_as::<_, Book>(&sql)
                    .bind(id)
                    .fetch_optional(pool)
                    .await?)
            }
            Store::Memory(mem) => mem.books.find_by_id(id),
        }
    }

    pub async fn create(store: &Store, input: BookInput) -> Result<Self, AppError> {
        let book = input.into_book(Utc::now())?;

        match store {
            Store::Postgres(pool) => {
                let sql = format!(
                    r#"
                    INSERT INTO books ({})
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
                    RETURNING {}
                    "#,
                    BOOK_COLUMNS, BOOK_COLUMNS
                );
                let stored = sqlx::query_as::<_, Book>(&sql)
                    .bind(book.id)
                    .bind(&book.book_name)
                    .bind(&book.book_cover)
                    .bind(book.rating)
                    .bind(&book.language)
                    .bind(book.page_no)
                    .bind(&book.author)
                    .bind(&book.genre)
                    .bind(&book.readed)
                    .bind(&book.description)
                    .bind(&book.background_color)
                    .bind(&book.nav_tint_color)
                    .bind(book.is_book_mark)
                    .bind(&book.categories)
                    .bind(book.is_my_book)
                    .bind(book.created_at)
                    .bind(book.updated_at)
                    .fetch_one(pool)
                    .await?;
                tracing::info!("Created book: {}", stored.id);
                Ok(stored)
            }
            Store::Memory(mem) => mem.books.insert(book),
        }
    }

    pub async fn update(
        store: &Store,
        id: Uuid,
        input: BookInput,
    ) -> Result<Option<Self>, AppError> {
        let now = Utc::now();

        match store {
            Store::Postgres(pool) => {
                let sql = format!(
                    r#"
                    UPDATE books SET
                        book_name = COALESCE($2, book_name),
                        book_cover = COALESCE($3, book_cover),
                        rating = COALESCE($4, rating),
                        language = COALESCE($5, language),
                        page_no = COALESCE($6, page_no),
                        author = COALESCE($7, author),
                        genre = COALESCE($8, genre),
                        readed = COALESCE($9, readed),
                        description = COALESCE($10, description),
                        background_color = COALESCE($11, background_color),
                        nav_tint_color = COALESCE($12, nav_tint_color),
                        is_book_mark = COALESCE($13, is_book_mark),
                        categories = COALESCE($14, categories),
                        is_my_book = COALESCE($15, is_my_book),
                        updated_at = GREATEST($16, created_at)
                    WHERE id = $1
                    RETURNING {}
                    "#,
                    BOOK_COLUMNS
                );
                Ok(sqlx::query_as::<_, Book>(&sql)
                    .bind(id)
                    .bind(input.book_name)
                    .bind(input.book_cover)
                    .bind(input.rating)
                    .bind(input.language)
                    .bind(input.page_no)
                    .bind(input.author)
                    .bind(input.genre)
                    .bind(input.readed)
                    .bind(input.description)
                    .bind(input.background_color)
                    .bind(input.nav_tint_color)
                    .bind(input.is_book_mark)
                    .bind(input.categories)
                    .bind(input.is_my_book)
                    .bind(now)
                    .fetch_optional(pool)
                    .await?)
            }
            Store::Memory(mem) => mem.books.update_by_id(id, |book| input.apply_to(book, now)),
        }
    }

    /// Returns whether a record was removed.
    pub async fn delete(store: &Store, id: Uuid) -> Result<bool, AppError> {
        match store {
            Store::Postgres(pool) => {
                let result = sqlx::query("DELETE FROM books WHERE id = $1")
                    .bind(id)
                    .execute(pool)
                    .await?;
                Ok(result.rows_affected() > 0)
            }
            Store::Memory(mem) => Ok(mem.books.delete_by_id(id)?.is_some()),
        }
    }
}
