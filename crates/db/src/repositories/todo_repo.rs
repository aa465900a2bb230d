//! Repository for the `todos` table.

use minfo_core::types::DbId;
use sqlx::PgPool;

use crate::models::todo::{CreateTodo, Todo, UpdateTodo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, done, created_at, updated_at";

/// Provides CRUD operations for todos.
///
/// Every method is a single statement, so each call either fully
/// succeeds or has no effect.
pub struct TodoRepo;

impl TodoRepo {
    /// Insert a new todo, returning the created row.
    ///
    /// `done` starts false and both timestamps are assigned server-side,
    /// so `created_at == updated_at` on a fresh row.
    pub async fn create(pool: &PgPool, input: &CreateTodo) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List todos in ascending id order, optionally filtered by done state.
    pub async fn list(pool: &PgPool, done: Option<bool>) -> Result<Vec<Todo>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM todos WHERE done = COALESCE($1, done) ORDER BY id ASC"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(done)
            .fetch_all(pool)
            .await
    }

    /// Find a todo by its id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM todos WHERE id = $1");
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a partial update. Only non-`None` fields in `input` change;
    /// `updated_at` is refreshed whenever any field is supplied. An empty
    /// partial is a plain read and leaves the timestamps untouched.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTodo,
    ) -> Result<Option<Todo>, sqlx::Error> {
        if input.is_empty() {
            return Self::find_by_id(pool, id).await;
        }
        let query = format!(
            "UPDATE todos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                done = COALESCE($4, done),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.done)
            .fetch_optional(pool)
            .await
    }

    /// Delete a todo by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
