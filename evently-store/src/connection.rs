//! Process-wide database connection
//!
//! `ConnectionManager` hands out one cached handle to every caller.
//! Concurrent first calls share a single in-flight connect attempt; a
//! failed attempt is not cached, so the next call starts over.
//!
//! ```text
//! Uninitialized -> Initializing -> Ready
//!                       |
//!                       +-> (failed) -> Uninitialized
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use once_cell::sync::Lazy;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::DbConfig;
use crate::db::pool::create_pool;
use crate::error::DataError;

/// Failure of a single connect attempt.
///
/// Cloneable so one failure can be handed to every caller that waited on
/// the same attempt.
#[derive(Error, Debug, Clone)]
pub enum ConnectError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to connect to the database: {0}")]
    Connect(Arc<sqlx::Error>),

    /// The connect function panicked; treated like any failed attempt.
    #[error("database connect attempt panicked")]
    Panicked,
}

impl From<sqlx::Error> for ConnectError {
    fn from(e: sqlx::Error) -> Self {
        Self::Connect(Arc::new(e))
    }
}

/// Observable state of a [`ConnectionManager`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Initializing,
    Ready,
}

type Attempt<C> = Shared<BoxFuture<'static, Result<C, ConnectError>>>;
type ConnectFn<C> = Box<dyn Fn() -> BoxFuture<'static, Result<C, ConnectError>> + Send + Sync>;

enum Slot<C: Clone> {
    Uninitialized,
    Initializing(Attempt<C>),
    Ready(C),
}

/// Lazily connects once and caches the resulting handle.
pub struct ConnectionManager<C: Clone> {
    connect: ConnectFn<C>,
    slot: Mutex<Slot<C>>,
}

impl<C> ConnectionManager<C>
where
    C: Clone + Send + Sync + 'static,
{
    /// Create a manager that runs `connect` on first use.
    ///
    /// `connect` is invoked once per attempt, never concurrently with
    /// another attempt of the same manager. A panic inside the returned
    /// future becomes [`ConnectError::Panicked`] and the next call retries.
    pub fn new<F, Fut>(connect: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<C, ConnectError>> + Send + 'static,
    {
        Self {
            connect: Box::new(move || {
                AssertUnwindSafe(connect())
                    .catch_unwind()
                    .map(|outcome| outcome.unwrap_or(Err(ConnectError::Panicked)))
                    .boxed()
            }),
            slot: Mutex::new(Slot::Uninitialized),
        }
    }

    /// Get the cached handle, connecting first if needed.
    ///
    /// Returns immediately once Ready. While an attempt is in flight every
    /// caller awaits that same attempt and receives its result.
    pub async fn get(&self) -> Result<C, ConnectError> {
        let attempt = {
            let mut slot = self.slot.lock().await;
            match &*slot {
                Slot::Ready(conn) => return Ok(conn.clone()),
                Slot::Initializing(attempt) => attempt.clone(),
                Slot::Uninitialized => {
                    tracing::debug!("starting database connect attempt");
                    let attempt = (self.connect)().shared();
                    *slot = Slot::Initializing(attempt.clone());
                    attempt
                }
            }
        };

        let result = attempt.clone().await;

        let mut slot = self.slot.lock().await;
        // Only the attempt that is still current may move the state on.
        if let Slot::Initializing(current) = &*slot {
            if current.ptr_eq(&attempt) {
                *slot = match &result {
                    Ok(conn) => {
                        tracing::info!("database connection ready");
                        Slot::Ready(conn.clone())
                    }
                    Err(e) => {
                        tracing::warn!("database connect attempt failed: {}", e);
                        Slot::Uninitialized
                    }
                };
            }
        }

        result
    }

    pub async fn state(&self) -> ConnectionState {
        match &*self.slot.lock().await {
            Slot::Uninitialized => ConnectionState::Uninitialized,
            Slot::Initializing(_) => ConnectionState::Initializing,
            Slot::Ready(_) => ConnectionState::Ready,
        }
    }
}

/// Connect using settings from the environment, read fresh per attempt.
async fn connect_from_env() -> Result<PgPool, ConnectError> {
    let config = DbConfig::from_env()?;
    Ok(create_pool(&config).await?)
}

static CONNECTION: Lazy<ConnectionManager<PgPool>> =
    Lazy::new(|| ConnectionManager::new(connect_from_env));

/// Get the process-wide connection pool.
///
/// The first call reads `DATABASE_URL` and connects; later calls return
/// the cached pool without I/O.
pub async fn get_connection() -> Result<PgPool, DataError> {
    Ok(CONNECTION.get().await?)
}
