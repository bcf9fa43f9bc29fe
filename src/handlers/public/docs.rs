use std::path::PathBuf;

use axum::{extract::Path, http::header, response::IntoResponse};

use crate::config;
use crate::error::ApiError;

/// Allow-listed documentation files servable at /docs/:slug. Anything not in
/// this table is a 404, so client-supplied slugs never reach the filesystem
/// as paths.
const DOC_FILES: &[(&str, &str)] = &[
    ("readme", "README.md"),
    ("api", "docs/api.md"),
    ("uploads", "docs/uploads.md"),
    ("moderation", "docs/moderation.md"),
    ("billing", "docs/billing.md"),
];

fn doc_path(slug: &str) -> Option<&'static str> {
    DOC_FILES
        .iter()
        .find(|(name, _)| *name == slug)
        .map(|(_, path)| *path)
}

/// The file paths in the table are relative to the configured docs root,
/// not the process working directory, so the binary can be started from
/// anywhere.
fn resolve_doc(root: &str, slug: &str) -> Option<PathBuf> {
    doc_path(slug).map(|rel| std::path::Path::new(root).join(rel))
}

/// GET /docs/:slug - serve one of the allow-listed documentation files
pub async fn show(Path(slug): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let path = resolve_doc(&config::config().docs.root, &slug)
        .ok_or_else(|| ApiError::not_found(format!("no documentation for '{}'", slug)))?;

    let body = tokio::fs::read_to_string(&path).await.map_err(|err| {
        tracing::error!(
            "failed to read documentation file {}: {}",
            path.display(),
            err
        );
        ApiError::internal_server_error("Documentation file unavailable")
    })?;

    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_slugs_resolve_to_fixed_paths() {
        assert_eq!(doc_path("readme"), Some("README.md"));
        assert_eq!(doc_path("uploads"), Some("docs/uploads.md"));
    }

    #[test]
    fn unknown_and_traversal_slugs_resolve_to_nothing() {
        assert_eq!(doc_path("secrets"), None);
        assert_eq!(doc_path("../Cargo.toml"), None);
        assert_eq!(doc_path(""), None);
    }

    #[test]
    fn resolution_is_anchored_to_the_docs_root() {
        assert_eq!(
            resolve_doc("/srv/sidestage", "api"),
            Some(PathBuf::from("/srv/sidestage/docs/api.md"))
        );
        assert_eq!(
            resolve_doc(".", "readme"),
            Some(PathBuf::from("./README.md"))
        );
        assert_eq!(resolve_doc("/srv/sidestage", "secrets"), None);
    }
}
