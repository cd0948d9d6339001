//! Internal Rust models matching the database schema.

use imagestore_common::ImageId;
use serde::{Deserialize, Serialize};

/// Image record model.
///
/// `file_path` is the path of the stored asset relative to the media root,
/// or `None` when no file has been uploaded for this record yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub name: String,
    pub file_path: Option<String>,
}
