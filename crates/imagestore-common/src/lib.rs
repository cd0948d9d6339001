//! Imagestore-Common: Shared types and utilities.
//!
//! This crate provides common functionality used across imagestore:
//!
//! - **Typed IDs**: A type-safe UUID wrapper for image records
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use imagestore_common::{ImageId, Error, Result};
//!
//! // Create a typed ID
//! let image_id = ImageId::new();
//!
//! // Use common error types
//! fn example() -> Result<()> {
//!     Err(Error::not_found("image"))
//! }
//! ```

pub mod error;
pub mod ids;

pub use error::{Error, Result};
pub use ids::*;
