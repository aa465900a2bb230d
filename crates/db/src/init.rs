//! Startup schema initialization with bounded retries.
//!
//! Runs once at process start, before any request is accepted. The retry
//! loop tolerates two realistic races: the database container not yet
//! accepting connections, and a sibling replica creating the table at the
//! same time.

use std::time::Duration;

use async_trait::async_trait;

use crate::DbPool;

/// Maximum initialization attempts before giving up. Both failure
/// branches draw from this single budget.
pub const MAX_ATTEMPTS: u32 = 20;

/// Backoff after a connection-level failure.
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Backoff after a non-connection storage error that the existence
/// fallback did not resolve.
const CONFLICT_RETRY_DELAY: Duration = Duration::from_secs(1);

const CREATE_TODOS_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (
    id BIGSERIAL PRIMARY KEY,
    title VARCHAR(200) NOT NULL,
    description VARCHAR(1000),
    done BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

/// Storage operations the initializer needs.
///
/// [`DbPool`] is the production implementation; tests substitute a
/// scripted fake to drive the retry machine through its branches.
#[async_trait]
pub trait SchemaBootstrap {
    async fn create_todos_table(&self) -> Result<(), sqlx::Error>;
    async fn todos_table_exists(&self) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl SchemaBootstrap for DbPool {
    async fn create_todos_table(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TODOS_TABLE).execute(self).await?;
        Ok(())
    }

    async fn todos_table_exists(&self) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables WHERE table_name = 'todos'
            )",
        )
        .fetch_one(self)
        .await?;
        Ok(exists)
    }
}

/// Schema initialization gave up after spending the retry budget.
///
/// The process must not accept traffic when this is returned.
#[derive(Debug, thiserror::Error)]
#[error("schema initialization failed after {attempts} attempts: {source}")]
pub struct InitError {
    pub attempts: u32,
    #[source]
    pub source: sqlx::Error,
}

/// Classify an error as connection-level: the database process or network
/// is unreachable, as opposed to a query-logic error.
pub fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
    )
}

/// Create the `todos` table, retrying until the database is ready.
///
/// One attempt counter covers both failure branches:
/// - connection-level errors back off 2 seconds;
/// - any other storage error first checks whether a sibling instance
///   already created the table, and backs off 1 second otherwise.
///
/// The existence fallback is deliberately narrow: it only consults table
/// presence and never swallows the error on any other outcome.
pub async fn initialize_schema<S: SchemaBootstrap + Sync>(store: &S) -> Result<(), InitError> {
    let mut last_error = None;

    for attempt in 1..=MAX_ATTEMPTS {
        match store.create_todos_table().await {
            Ok(()) => {
                tracing::info!(attempt, "todos table ready");
                return Ok(());
            }
            Err(err) if is_connection_error(&err) => {
                tracing::warn!(attempt, error = %err, "database unreachable, retrying");
                last_error = Some(err);
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(err) => {
                match store.todos_table_exists().await {
                    Ok(true) => {
                        tracing::info!(attempt, "todos table created concurrently");
                        return Ok(());
                    }
                    Ok(false) | Err(_) => {
                        tracing::warn!(attempt, error = %err, "schema creation failed, retrying");
                        last_error = Some(err);
                        tokio::time::sleep(CONFLICT_RETRY_DELAY).await;
                    }
                }
            }
        }
    }

    Err(InitError {
        attempts: MAX_ATTEMPTS,
        source: last_error.unwrap_or(sqlx::Error::PoolClosed),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;

    use super::*;

    /// Outcome of one `create_todos_table` call.
    #[derive(Clone, Copy)]
    enum CreateStep {
        Ready,
        ConnRefused,
        StorageError,
    }

    /// Outcome of one `todos_table_exists` call.
    #[derive(Clone, Copy)]
    enum ExistsStep {
        Present,
        Absent,
        Fails,
    }

    /// Fake bootstrap store that replays a script of outcomes. When a
    /// script runs out, its last step repeats.
    struct ScriptedStore {
        create_script: Mutex<Vec<CreateStep>>,
        exists_script: Mutex<Vec<ExistsStep>>,
        create_calls: AtomicU32,
        exists_calls: AtomicU32,
    }

    impl ScriptedStore {
        fn new(create: Vec<CreateStep>, exists: Vec<ExistsStep>) -> Self {
            Self {
                create_script: Mutex::new(create),
                exists_script: Mutex::new(exists),
                create_calls: AtomicU32::new(0),
                exists_calls: AtomicU32::new(0),
            }
        }

        fn step<T: Copy>(script: &Mutex<Vec<T>>, call: u32) -> T {
            let script = script.lock().unwrap();
            let index = (call as usize).min(script.len() - 1);
            script[index]
        }
    }

    fn conn_refused() -> sqlx::Error {
        sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ))
    }

    /// Stands in for any non-connection storage error, e.g. a duplicate
    /// CREATE from a sibling replica.
    fn storage_error() -> sqlx::Error {
        sqlx::Error::Configuration("relation \"todos\" already exists".into())
    }

    #[async_trait]
    impl SchemaBootstrap for ScriptedStore {
        async fn create_todos_table(&self) -> Result<(), sqlx::Error> {
            let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
            match Self::step(&self.create_script, call) {
                CreateStep::Ready => Ok(()),
                CreateStep::ConnRefused => Err(conn_refused()),
                CreateStep::StorageError => Err(storage_error()),
            }
        }

        async fn todos_table_exists(&self) -> Result<bool, sqlx::Error> {
            let call = self.exists_calls.fetch_add(1, Ordering::SeqCst);
            match Self::step(&self.exists_script, call) {
                ExistsStep::Present => Ok(true),
                ExistsStep::Absent => Ok(false),
                ExistsStep::Fails => Err(conn_refused()),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_first_attempt() {
        let store = ScriptedStore::new(vec![CreateStep::Ready], vec![ExistsStep::Absent]);

        initialize_schema(&store).await.unwrap();

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.exists_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_attempt_four_after_three_connection_failures() {
        let store = ScriptedStore::new(
            vec![
                CreateStep::ConnRefused,
                CreateStep::ConnRefused,
                CreateStep::ConnRefused,
                CreateStep::Ready,
            ],
            vec![ExistsStep::Absent],
        );
        let started = tokio::time::Instant::now();

        initialize_schema(&store).await.unwrap();

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 4);
        // Three connection failures back off 2s each.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_create_race_resolved_by_existence_check() {
        let store = ScriptedStore::new(vec![CreateStep::StorageError], vec![ExistsStep::Present]);

        initialize_schema(&store).await.unwrap();

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.exists_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_existence_check_retries_instead_of_failing() {
        let store = ScriptedStore::new(
            vec![CreateStep::StorageError, CreateStep::Ready],
            vec![ExistsStep::Fails],
        );
        let started = tokio::time::Instant::now();

        initialize_schema(&store).await.unwrap();

        assert_eq!(store.create_calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.exists_calls.load(Ordering::SeqCst), 1);
        // Non-connection branch backs off 1s.
        assert_eq!(started.elapsed(), Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_budget_when_database_never_ready() {
        let store = ScriptedStore::new(vec![CreateStep::ConnRefused], vec![ExistsStep::Absent]);

        let err = initialize_schema(&store).await.unwrap_err();

        assert_eq!(err.attempts, MAX_ATTEMPTS);
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 20);
        assert_matches!(err.source, sqlx::Error::Io(_));
    }

    #[tokio::test(start_paused = true)]
    async fn both_failure_branches_share_one_attempt_budget() {
        // 5 connection failures, then persistent storage errors with the
        // table never appearing. 20 attempts total, not 20 per branch.
        let mut script = vec![CreateStep::ConnRefused; 5];
        script.push(CreateStep::StorageError);
        let store = ScriptedStore::new(script, vec![ExistsStep::Absent]);
        let started = tokio::time::Instant::now();

        let err = initialize_schema(&store).await.unwrap_err();

        assert_eq!(err.attempts, MAX_ATTEMPTS);
        assert_eq!(store.create_calls.load(Ordering::SeqCst), 20);
        assert_eq!(store.exists_calls.load(Ordering::SeqCst), 15);
        // 5 attempts at 2s backoff, 15 at 1s.
        assert_eq!(started.elapsed(), Duration::from_secs(25));
        // The reported cause is the last observed error.
        assert_matches!(err.source, sqlx::Error::Configuration(_));
    }

    #[test]
    fn connection_error_classification() {
        assert!(is_connection_error(&conn_refused()));
        assert!(is_connection_error(&sqlx::Error::PoolTimedOut));
        assert!(!is_connection_error(&storage_error()));
        assert!(!is_connection_error(&sqlx::Error::RowNotFound));
    }
}
