//! File storage for uploaded images.

mod storage;

pub use storage::MediaStore;
