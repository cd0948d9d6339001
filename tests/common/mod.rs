//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, default config,
//! and a temp-dir backed media store, wired into a full
//! [`AppContext`](imagestore::server::AppContext). The
//! [`TestHarness::with_server`] constructor starts Axum on a random port
//! for HTTP-level testing.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use imagestore::config::Config;
use imagestore::images::MediaStore;
use imagestore::server::{create_router, AppContext};
use imagestore_db::pool::{init_memory_pool, DbPool, PooledConnection};
use tempfile::TempDir;

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary media root.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    media_dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration, in-memory DB, and
    /// a temporary media root.
    pub fn new() -> Self {
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let media_dir = TempDir::new().expect("failed to create media tempdir");
        let media = Arc::new(MediaStore::new(media_dir.path().to_path_buf()));

        let ctx = AppContext {
            config: Arc::new(Config::default()),
            db: db.clone(),
            media,
        };

        Self { ctx, db, media_dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let app = create_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> PooledConnection {
        imagestore_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    /// The media root backing this harness.
    pub fn media_root(&self) -> &Path {
        self.media_dir.path()
    }
}
