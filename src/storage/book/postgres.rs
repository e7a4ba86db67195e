//! PostgreSQL-backed book store.

use super::{BookStore, StoreError};
use crate::domain::{Book, BookId};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

const CREATE_BOOKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS books (
    id SERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    price DOUBLE PRECISION NOT NULL
)";

/// Transaction-scoped advisory lock serializing id allocation (arbitrary, stable across instances).
const ID_ALLOCATION_LOCK: i64 = 4_240_101;

/// A book store over the `books` table.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    /// Connects to `database_url` and makes sure the `books` table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_BOOKS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    async fn save_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        book: Book,
    ) -> Result<Book, StoreError> {
        // Held until commit/rollback, so `nextval` never races the sequence bump below.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ID_ALLOCATION_LOCK)
            .execute(tx.as_mut())
            .await?;

        let row = match book.id {
            None => {
                sqlx::query(
                    "INSERT INTO books (title, author, price) VALUES ($1, $2, $3)
                     RETURNING id, title, author, price",
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.price)
                .fetch_one(tx.as_mut())
                .await?
            }
            Some(id) => {
                let row = sqlx::query(
                    "INSERT INTO books (id, title, author, price) VALUES ($1, $2, $3, $4)
                     ON CONFLICT (id) DO UPDATE
                     SET title = EXCLUDED.title, author = EXCLUDED.author, price = EXCLUDED.price
                     RETURNING id, title, author, price",
                )
                .bind(id)
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.price)
                .fetch_one(tx.as_mut())
                .await?;

                // An explicit id bypasses the sequence. Only ever move it forward, so ids of
                // deleted rows and ids taken by uncommitted inserts are never handed out again.
                sqlx::query(
                    "SELECT setval(pg_get_serial_sequence('books', 'id'), $1::bigint)
                     WHERE $1::bigint > COALESCE(
                         pg_sequence_last_value(pg_get_serial_sequence('books', 'id')::regclass),
                         0)",
                )
                .bind(i64::from(id))
                .execute(tx.as_mut())
                .await?;
                row
            }
        };
        Ok(book_from_row(&row)?)
    }
}

fn book_from_row(row: &PgRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        id: Some(row.try_get("id")?),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        price: row.try_get("price")?,
    })
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query("SELECT id, title, author, price FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let books = rows
            .iter()
            .map(book_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(books)
    }

    async fn find(&self, id: BookId) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query("SELECT id, title, author, price FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(book_from_row).transpose()?)
    }

    async fn save(&self, book: Book) -> Result<Book, StoreError> {
        let mut tx = self.pool.begin().await?;
        let saved = Self::save_in_tx(&mut tx, book).await?;
        tx.commit().await?;
        Ok(saved)
    }

    /// Saves every book in one transaction; a failure leaves the table untouched.
    async fn save_all(&self, books: Vec<Book>) -> Result<Vec<Book>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(books.len());
        for book in books {
            saved.push(Self::save_in_tx(&mut tx, book).await?);
        }
        tx.commit().await?;
        Ok(saved)
    }

    async fn delete(&self, id: BookId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(n).unwrap_or_default())
    }
}
