//! Upload and download URL issuance. File bytes never pass through the API;
//! each endpoint validates the request, derives the object key, and returns
//! a short-lived signed URL for the storage service.

use axum::{extract::Query, Extension, Json};
use chrono::Utc;
use serde::Deserialize;

use crate::api::ApiJson;
use crate::config;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::storage::{self, SignedUrl};

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
}

fn issue_upload(bucket: &str, user: &AuthUser, body: &UploadRequest) -> Result<Json<SignedUrl>, ApiError> {
    if body.filename.trim().is_empty() {
        return Err(ApiError::bad_request("filename is required"));
    }
    if body.content_type.trim().is_empty() {
        return Err(ApiError::bad_request("content_type is required"));
    }

    let key = storage::upload_key(user.id, &body.filename, Utc::now());
    let signed = storage::sign_upload(bucket, &key, body.content_type.trim())?;
    Ok(Json(signed))
}

/// POST /api/uploads/audio
pub async fn audio(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<UploadRequest>,
) -> Result<Json<SignedUrl>, ApiError> {
    issue_upload(&config::config().storage.audio_bucket, &user, &body)
}

/// POST /api/uploads/cover
pub async fn cover(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<UploadRequest>,
) -> Result<Json<SignedUrl>, ApiError> {
    issue_upload(&config::config().storage.image_bucket, &user, &body)
}

/// POST /api/uploads/avatar
pub async fn avatar(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<UploadRequest>,
) -> Result<Json<SignedUrl>, ApiError> {
    issue_upload(&config::config().storage.avatar_bucket, &user, &body)
}

#[derive(Debug, Deserialize)]
pub struct ArchiveUploadRequest {
    pub filename: String,
    pub content_type: Option<String>,
    /// Declared size; the storage service enforces it again on the actual
    /// bytes.
    pub size_bytes: u64,
}

/// POST /api/uploads/archive - bulk catalog import. The size gate runs
/// before any signing; exactly the cap is still accepted.
pub async fn archive(
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<ArchiveUploadRequest>,
) -> Result<Json<SignedUrl>, ApiError> {
    if body.filename.trim().is_empty() {
        return Err(ApiError::bad_request("filename is required"));
    }
    if body.size_bytes > storage::MAX_ARCHIVE_BYTES {
        return Err(ApiError::bad_request(
            "archive exceeds the 2 GiB upload limit",
        ));
    }

    let key = storage::upload_key(user.id, &body.filename, Utc::now());
    let signed = storage::sign_upload(
        &config::config().storage.archive_bucket,
        &key,
        body.content_type.as_deref().unwrap_or("application/zip"),
    )?;
    Ok(Json(signed))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Bucket-qualified object key, e.g. `tracks/<owner>/<stamp>-song.mp3`.
    pub key: String,
}

/// GET /api/uploads/download - signed read URL for a stored object
pub async fn download(
    Extension(_user): Extension<AuthUser>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<SignedUrl>, ApiError> {
    let key = query.key.trim();
    let Some((bucket, object)) = key.split_once('/') else {
        return Err(ApiError::bad_request(
            "key must be bucket-qualified: <bucket>/<object>",
        ));
    };
    if object.is_empty() {
        return Err(ApiError::bad_request("object key is required"));
    }

    let storage_config = &config::config().storage;
    let known = [
        storage_config.audio_bucket.as_str(),
        storage_config.image_bucket.as_str(),
        storage_config.avatar_bucket.as_str(),
        storage_config.archive_bucket.as_str(),
    ];
    if !known.contains(&bucket) {
        return Err(ApiError::bad_request(format!(
            "unknown storage bucket '{}'",
            bucket
        )));
    }

    let signed = storage::sign_download(bucket, object)?;
    Ok(Json(signed))
}
