//! Image record queries.
//!
//! This module provides the CRUD operations for image records: insert,
//! list, get, update, and delete.

use imagestore_common::{Error, ImageId, Result};
use rusqlite::Connection;
use uuid::Uuid;

use crate::models::Image;

/// Parse an image record from a database row.
///
/// Expects columns in order: id, name, file_path.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<Image> {
    let id: String = row.get(0)?;
    let uuid = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Image {
        id: ImageId::from(uuid),
        name: row.get(1)?,
        file_path: row.get(2)?,
    })
}

/// Insert a new image record.
///
/// # Returns
///
/// * `Ok(ImageId)` - The ID of the inserted record
/// * `Err(Error)` - If a database error occurs
pub fn insert_image(conn: &Connection, image: &Image) -> Result<ImageId> {
    conn.execute(
        "INSERT INTO images (id, name, file_path)
         VALUES (:id, :name, :file_path)",
        rusqlite::named_params! {
            ":id": image.id.to_string(),
            ":name": &image.name,
            ":file_path": &image.file_path,
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(image.id)
}

/// Get all image records, ordered by name then id.
pub fn list_images(conn: &Connection) -> Result<Vec<Image>> {
    let mut stmt = conn
        .prepare("SELECT id, name, file_path FROM images ORDER BY name, id")
        .map_err(|e| Error::database(e.to_string()))?;

    let images = stmt
        .query_map([], parse_image_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(images)
}

/// Get an image record by ID.
///
/// # Returns
///
/// * `Ok(Some(Image))` - The record if found
/// * `Ok(None)` - If the record does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<Image>> {
    let result = conn.query_row(
        "SELECT id, name, file_path FROM images WHERE id = :id",
        rusqlite::named_params! { ":id": id.to_string() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// Update an image record's name and file path.
///
/// # Returns
///
/// * `Ok(true)` - If the record was updated
/// * `Ok(false)` - If the record did not exist
/// * `Err(Error)` - If a database error occurs
pub fn update_image(
    conn: &Connection,
    id: ImageId,
    name: &str,
    file_path: Option<&str>,
) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "UPDATE images SET name = :name, file_path = :file_path WHERE id = :id",
            rusqlite::named_params! {
                ":id": id.to_string(),
                ":name": name,
                ":file_path": file_path,
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Delete an image record by ID.
///
/// # Returns
///
/// * `Ok(true)` - If the record was deleted
/// * `Ok(false)` - If the record did not exist
/// * `Err(Error)` - If a database error occurs
pub fn delete_image(conn: &Connection, id: ImageId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM images WHERE id = :id",
            rusqlite::named_params! { ":id": id.to_string() },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(rows_affected > 0)
}
