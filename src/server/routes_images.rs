//! Image record API routes.
//!
//! Provides the CRUD surface for the images resource: list, retrieve,
//! create, update, partial update, and delete, plus the multipart upload
//! create that writes the file under the media root.
//!
//! Every path that writes a name runs the same validation, so the upload
//! path enforces the same field invariants as the JSON create path.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use imagestore_common::ImageId;
use imagestore_db::{models::Image, queries::images};
use serde::{Deserialize, Serialize};

use super::AppContext;

/// Maximum length of an image name, in characters.
const MAX_NAME_LEN: usize = 100;

/// Create image-related routes.
pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/images", get(list_images).post(create_image))
        .route("/images/upload", post(upload_image))
        .route(
            "/images/:image_id",
            get(get_image)
                .put(update_image)
                .patch(patch_image)
                .delete(delete_image),
        )
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Request to create an image record without a file.
#[derive(Debug, Deserialize)]
pub struct CreateImageRequest {
    /// Record name
    pub name: String,
}

/// Request to replace an image record's mutable fields.
///
/// The file reference is carried over unchanged; files only change through
/// the upload endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateImageRequest {
    /// New record name
    pub name: String,
}

/// Request to merge fields into an image record.
#[derive(Debug, Deserialize)]
pub struct PatchImageRequest {
    /// New record name, if changing
    #[serde(default)]
    pub name: Option<String>,
}

/// Image record information.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    /// Unique record identifier
    pub id: String,
    /// Record name
    pub name: String,
    /// URL of the stored file, or null when none was uploaded
    pub file: Option<String>,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.to_string(),
            name: image.name,
            file: image.file_path.map(|p| format!("/media/{}", p)),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List all image records.
async fn list_images(State(ctx): State<AppContext>) -> impl IntoResponse {
    let conn = match ctx.db.get() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    match images::list_images(&conn) {
        Ok(list) => Json(
            list.into_iter()
                .map(ImageResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Retrieve one image record by ID.
async fn get_image(
    State(ctx): State<AppContext>,
    Path(image_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_image_id(&image_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let conn = match ctx.db.get() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    match images::get_image(&conn, id) {
        Ok(Some(image)) => Json(ImageResponse::from(image)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Image not found"})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Create an image record from a JSON body.
///
/// The record starts without a file; a later upload can attach one under
/// the same name.
async fn create_image(
    State(ctx): State<AppContext>,
    Json(req): Json<CreateImageRequest>,
) -> impl IntoResponse {
    if let Err(resp) = validate_name(&req.name) {
        return resp;
    }

    let conn = match ctx.db.get() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let image = Image {
        id: ImageId::new(),
        name: req.name,
        file_path: None,
    };

    match images::insert_image(&conn, &image) {
        Ok(_) => (StatusCode::CREATED, Json(ImageResponse::from(image))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Create an image record from a multipart upload.
///
/// Requires a `name` text part and a `file` part with a filename. The file
/// is written under the media root at `images/<name>/<filename>` and the
/// record is persisted with that path. Answers `{"message": "Uploaded"}`
/// with 201 on success.
async fn upload_image(State(ctx): State<AppContext>, mut multipart: Multipart) -> impl IntoResponse {
    let mut name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({"error": format!("Malformed multipart body: {}", e)})),
                )
                    .into_response()
            }
        };

        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => match field.text().await {
                Ok(text) => name = Some(text),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({"error": format!("Unreadable name field: {}", e)})),
                    )
                        .into_response()
                }
            },
            Some("file") => {
                let filename = match field.file_name() {
                    Some(f) => f.to_string(),
                    None => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(serde_json::json!({
                                "error": "File part is missing a filename",
                                "fields": ["file"]
                            })),
                        )
                            .into_response()
                    }
                };
                match field.bytes().await {
                    Ok(bytes) => file = Some((filename, bytes.to_vec())),
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(serde_json::json!({"error": format!("Unreadable file field: {}", e)})),
                        )
                            .into_response()
                    }
                }
            }
            // Unknown parts are ignored
            _ => {}
        }
    }

    let Some(name) = name else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing required field", "fields": ["name"]})),
        )
            .into_response();
    };
    let Some((filename, data)) = file else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Missing required field", "fields": ["file"]})),
        )
            .into_response();
    };

    if let Err(resp) = validate_name(&name) {
        return resp;
    }

    let relative = match ctx.media.store(&name, &filename, &data) {
        Ok(path) => path,
        Err(imagestore_common::Error::InvalidInput(msg)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": msg})),
            )
                .into_response()
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let conn = match ctx.db.get() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let image = Image {
        id: ImageId::new(),
        name,
        file_path: Some(relative),
    };

    match images::insert_image(&conn, &image) {
        Ok(_) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"message": "Uploaded"})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

/// Replace an image record's mutable fields.
async fn update_image(
    State(ctx): State<AppContext>,
    Path(image_id): Path<String>,
    Json(req): Json<UpdateImageRequest>,
) -> impl IntoResponse {
    let id = match parse_image_id(&image_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Err(resp) = validate_name(&req.name) {
        return resp;
    }

    apply_update(&ctx, id, Some(req.name)).await
}

/// Merge fields into an image record.
async fn patch_image(
    State(ctx): State<AppContext>,
    Path(image_id): Path<String>,
    Json(req): Json<PatchImageRequest>,
) -> impl IntoResponse {
    let id = match parse_image_id(&image_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    if let Some(ref name) = req.name {
        if let Err(resp) = validate_name(name) {
            return resp;
        }
    }

    apply_update(&ctx, id, req.name).await
}

/// Delete an image record by ID.
///
/// Removes only the row; a stored file stays on disk.
async fn delete_image(
    State(ctx): State<AppContext>,
    Path(image_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_image_id(&image_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let conn = match ctx.db.get() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    match images::delete_image(&conn, id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Image not found"})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Write a new name for a record, keeping its file reference unchanged.
///
/// `name = None` (PATCH with an empty body) keeps the current name too.
async fn apply_update(
    ctx: &AppContext,
    id: ImageId,
    name: Option<String>,
) -> axum::response::Response {
    let conn = match ctx.db.get() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let existing = match images::get_image(&conn, id) {
        Ok(Some(image)) => image,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "Image not found"})),
            )
                .into_response()
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
                .into_response()
        }
    };

    let name = name.unwrap_or_else(|| existing.name.clone());

    if let Err(e) = images::update_image(&conn, id, &name, existing.file_path.as_deref()) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response();
    }

    let updated = Image {
        id,
        name,
        file_path: existing.file_path,
    };
    Json(ImageResponse::from(updated)).into_response()
}

/// Parse a path segment into an `ImageId`, or produce a 400 response.
fn parse_image_id(raw: &str) -> Result<ImageId, axum::response::Response> {
    match raw.parse::<uuid::Uuid>() {
        Ok(uuid) => Ok(ImageId::from(uuid)),
        Err(_) => Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid image ID"})),
        )
            .into_response()),
    }
}

/// Check the shared name invariant: non-empty, at most 100 characters.
///
/// Produces the 400 response directly so every caller reports violations
/// the same way.
fn validate_name(name: &str) -> Result<(), axum::response::Response> {
    if name.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Name cannot be empty", "fields": ["name"]})),
        )
            .into_response());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": format!("Name exceeds {} characters", MAX_NAME_LEN),
                "fields": ["name"]
            })),
        )
            .into_response());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_accepts_bounds() {
        assert!(validate_name("cat").is_ok());
        assert!(validate_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(validate_name("").is_err());
    }

    #[test]
    fn test_validate_name_rejects_over_limit() {
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_name_counts_characters_not_bytes() {
        // 100 multi-byte characters are within the bound
        assert!(validate_name(&"é".repeat(100)).is_ok());
        assert!(validate_name(&"é".repeat(101)).is_err());
    }

    #[test]
    fn test_image_response_resolves_file_url() {
        let image = Image {
            id: ImageId::new(),
            name: "cat".to_string(),
            file_path: Some("images/cat/pic.png".to_string()),
        };
        let resp = ImageResponse::from(image);
        assert_eq!(resp.file.as_deref(), Some("/media/images/cat/pic.png"));
    }

    #[test]
    fn test_image_response_null_file() {
        let image = Image {
            id: ImageId::new(),
            name: "cat".to_string(),
            file_path: None,
        };
        let resp = ImageResponse::from(image);
        assert_eq!(resp.file, None);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("file").unwrap().is_null());
    }
}
