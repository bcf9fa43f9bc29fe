//! Signed storage URLs. The API never proxies file bytes; it issues
//! short-lived signed URLs and the client talks to the storage service
//! directly. Tokens are JWTs over the object path, verified by the storage
//! service with the shared signing secret.

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

/// Hard cap for bulk archive uploads. A product decision, not a tunable.
pub const MAX_ARCHIVE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage signing secret not configured")]
    MissingSecret,

    #[error("storage token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Claims embedded in a signed URL token. `url` is the bucket-qualified
/// object path the token is valid for.
#[derive(Debug, Serialize, Deserialize)]
pub struct ObjectToken {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// What upload and download endpoints hand back to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrl {
    pub key: String,
    pub url: String,
    pub expires_in: u64,
}

/// Strip anything outside `[A-Za-z0-9._-]` so client-supplied filenames
/// cannot smuggle path separators into object keys.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Object keys are namespaced by the uploading principal and stamped with
/// server time, so two uploads of the same filename never collide and a key
/// always reveals who created it.
pub fn upload_key(owner: Uuid, filename: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}",
        owner,
        now.timestamp_millis(),
        sanitize_filename(filename)
    )
}

pub fn sign_upload(bucket: &str, key: &str, content_type: &str) -> Result<SignedUrl, StorageError> {
    let storage = &config::config().storage;
    sign_upload_with(
        &storage.base_url,
        &storage.signing_secret,
        bucket,
        key,
        content_type,
        storage.upload_url_ttl_secs,
    )
}

pub fn sign_download(bucket: &str, key: &str) -> Result<SignedUrl, StorageError> {
    let storage = &config::config().storage;
    sign_download_with(
        &storage.base_url,
        &storage.signing_secret,
        bucket,
        key,
        storage.download_url_ttl_secs,
    )
}

// The `_with` variants take the secret explicitly; the config singleton is
// process-wide, so unit tests go through these.

pub fn sign_upload_with(
    base_url: &str,
    secret: &str,
    bucket: &str,
    key: &str,
    content_type: &str,
    ttl_secs: u64,
) -> Result<SignedUrl, StorageError> {
    let token = object_token(secret, bucket, key, Some(content_type), ttl_secs)?;
    Ok(SignedUrl {
        key: key.to_string(),
        url: format!(
            "{}/object/upload/sign/{}/{}?token={}",
            base_url.trim_end_matches('/'),
            bucket,
            key,
            token
        ),
        expires_in: ttl_secs,
    })
}

pub fn sign_download_with(
    base_url: &str,
    secret: &str,
    bucket: &str,
    key: &str,
    ttl_secs: u64,
) -> Result<SignedUrl, StorageError> {
    let token = object_token(secret, bucket, key, None, ttl_secs)?;
    Ok(SignedUrl {
        key: key.to_string(),
        url: format!(
            "{}/object/sign/{}/{}?token={}",
            base_url.trim_end_matches('/'),
            bucket,
            key,
            token
        ),
        expires_in: ttl_secs,
    })
}

fn object_token(
    secret: &str,
    bucket: &str,
    key: &str,
    content_type: Option<&str>,
    ttl_secs: u64,
) -> Result<String, StorageError> {
    if secret.is_empty() {
        return Err(StorageError::MissingSecret);
    }

    let now = Utc::now().timestamp();
    let claims = ObjectToken {
        url: format!("{}/{}", bucket, key),
        content_type: content_type.map(str::to_string),
        iat: now,
        exp: now + ttl_secs as i64,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const SECRET: &str = "storage-test-secret";
    const BASE: &str = "https://storage.sidestage.test";

    #[test]
    fn sanitizes_path_separators_and_spaces() {
        assert_eq!(sanitize_filename("demo tape.mp3"), "demo_tape.mp3");
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("  liner-notes.pdf  "), "liner-notes.pdf");
    }

    #[test]
    fn empty_or_dot_only_filenames_get_a_placeholder() {
        assert_eq!(sanitize_filename(""), "file");
        assert_eq!(sanitize_filename("..."), "file");
        assert_eq!(sanitize_filename("   "), "file");
    }

    #[test]
    fn upload_keys_never_collide_across_principals_or_time() {
        let now = Utc::now();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_ne!(upload_key(a, "take1.wav", now), upload_key(b, "take1.wav", now));

        let later = now + chrono::Duration::milliseconds(1);
        assert_ne!(
            upload_key(a, "take1.wav", now),
            upload_key(a, "take1.wav", later)
        );
    }

    #[test]
    fn upload_keys_start_with_the_principal() {
        let owner = Uuid::new_v4();
        let key = upload_key(owner, "single.flac", Utc::now());
        assert!(key.starts_with(&format!("{}/", owner)));
        assert!(key.ends_with("-single.flac"));
    }

    #[test]
    fn upload_urls_embed_a_verifiable_token() {
        let signed = sign_upload_with(BASE, SECRET, "tracks", "u1/1-song.mp3", "audio/mpeg", 900)
            .unwrap();

        assert_eq!(signed.expires_in, 900);
        assert!(signed
            .url
            .starts_with("https://storage.sidestage.test/object/upload/sign/tracks/u1/1-song.mp3?token="));

        let token = signed.url.split("token=").nth(1).unwrap();
        let decoded = decode::<ObjectToken>(
            token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.url, "tracks/u1/1-song.mp3");
        assert_eq!(decoded.claims.content_type.as_deref(), Some("audio/mpeg"));
    }

    #[test]
    fn download_urls_use_the_read_endpoint() {
        let signed = sign_download_with(BASE, SECRET, "covers", "u1/2-art.png", 3600).unwrap();
        assert!(signed
            .url
            .starts_with("https://storage.sidestage.test/object/sign/covers/u1/2-art.png?token="));
    }

    #[test]
    fn signing_without_a_secret_fails() {
        let err = sign_upload_with(BASE, "", "tracks", "k", "audio/mpeg", 900).unwrap_err();
        assert!(matches!(err, StorageError::MissingSecret));
    }

    #[test]
    fn archive_cap_is_two_gibibytes() {
        assert_eq!(MAX_ARCHIVE_BYTES, 2_147_483_648);
    }
}
