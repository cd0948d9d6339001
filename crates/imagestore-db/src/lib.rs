//! Imagestore-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for imagestore using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use imagestore_db::pool::{init_pool, get_conn};
//! use imagestore_db::queries::images;
//!
//! let pool = init_pool("/var/lib/imagestore/db.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let all = images::list_images(&conn).unwrap();
//! println!("{} images", all.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
