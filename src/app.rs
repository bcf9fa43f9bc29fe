//! Router assembly. Routes are declared in three groups matching the access
//! tiers; the protected and admin groups get their checks as route layers
//! so no handler in them is reachable without passing the middleware.

use axum::{
    middleware::from_fn,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db;
use crate::error::ApiError;
use crate::handlers::{admin, protected, public};
use crate::middleware::{require_admin, require_auth};

pub fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .merge(admin_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router {
    Router::new()
        .route("/docs/:slug", get(public::docs::show))
        .route("/api/featured", get(public::featured::list))
        .route("/api/bands/:id/stats", get(public::bands::stats))
        .route("/api/follows/status", get(public::status::follow_status))
        .route("/api/library/albums/status", get(public::status::album_status))
        .route("/api/library/tracks/status", get(public::status::track_status))
}

fn protected_routes() -> Router {
    use protected::{
        billing, catalog, follows, library, notifications, playlists, profile, search, support,
        uploads,
    };

    Router::new()
        .route("/api/follows", post(follows::create))
        .route("/api/follows/:band_id", delete(follows::remove))
        .route("/api/library", get(library::overview))
        .route("/api/library/albums", post(library::save_album))
        .route("/api/library/albums/:album_id", delete(library::unsave_album))
        .route("/api/library/tracks", post(library::like_track))
        .route("/api/library/tracks/:track_id", delete(library::unlike_track))
        .route("/api/playlists", get(playlists::list).post(playlists::create))
        .route(
            "/api/playlists/:id",
            get(playlists::show)
                .put(playlists::update)
                .delete(playlists::remove),
        )
        .route("/api/playlists/:id/tracks", post(playlists::add_track))
        .route(
            "/api/playlists/:id/tracks/reorder",
            put(playlists::reorder_tracks),
        )
        .route(
            "/api/playlists/:id/tracks/:track_id",
            delete(playlists::remove_track),
        )
        .route(
            "/api/playlists/:id/collaborators",
            post(playlists::add_collaborator),
        )
        .route(
            "/api/playlists/:id/collaborators/:user_id",
            delete(playlists::remove_collaborator),
        )
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/read-all", put(notifications::mark_all_read))
        .route("/api/notifications/:id/read", put(notifications::mark_read))
        .route("/api/notifications/:id", delete(notifications::remove))
        .route("/api/profile", get(profile::show).put(profile::update))
        .route("/api/bands", post(catalog::create_band))
        .route("/api/albums", post(catalog::create_album))
        .route("/api/tracks", post(catalog::submit_track))
        .route("/api/uploads/audio", post(uploads::audio))
        .route("/api/uploads/cover", post(uploads::cover))
        .route("/api/uploads/avatar", post(uploads::avatar))
        .route("/api/uploads/archive", post(uploads::archive))
        .route("/api/uploads/download", get(uploads::download))
        .route("/api/search/users", get(search::users))
        .route("/api/tips", post(support::create_tip))
        .route("/api/boosts", post(support::create_boost))
        .route("/api/billing/subscription", get(billing::subscription))
        .route("/api/billing/portal", post(billing::portal))
        .route_layer(from_fn(require_auth))
}

fn admin_routes() -> Router {
    use admin::{moderation, payouts, placements, settings, stats};

    Router::new()
        .route("/api/admin/settings", get(settings::list))
        .route("/api/admin/settings/:key", put(settings::upsert))
        .route("/api/admin/moderation", get(moderation::queue))
        .route("/api/admin/moderation/:id/approve", post(moderation::approve))
        .route("/api/admin/moderation/:id/reject", post(moderation::reject))
        .route(
            "/api/admin/featured/:kind",
            get(placements::list).post(placements::create),
        )
        .route("/api/admin/featured/:kind/reorder", put(placements::reorder))
        .route("/api/admin/featured/:kind/:id", delete(placements::remove))
        .route("/api/admin/payouts", get(payouts::list))
        .route("/api/admin/payouts/:id/complete", post(payouts::complete))
        .route("/api/admin/stats", get(stats::overview))
        // Layers added later run first: authentication, then the role check.
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn(require_auth))
}

/// GET / - service description
async fn root() -> Json<Value> {
    Json(json!({
        "name": "Sidestage API",
        "description": "Server API for the Sidestage music marketplace",
        "endpoints": {
            "health": "/health",
            "docs": "/docs/:slug",
            "featured": "/api/featured",
            "api": "/api/*",
            "admin": "/api/admin/*",
        }
    }))
}

/// GET /health - liveness plus a database ping
async fn health() -> Result<Json<Value>, ApiError> {
    match db::health_check().await {
        Ok(()) => Ok(Json(json!({ "status": "healthy", "database": "connected" }))),
        Err(err) => {
            tracing::error!("health check failed: {}", err);
            Err(ApiError::service_unavailable("Database unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    // These tests exercise the router in-process, without a database; they
    // stick to paths that fail before any query is issued.

    #[tokio::test]
    async fn root_describes_the_service() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["name"], "Sidestage API");
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_callers() {
        for uri in ["/api/library", "/api/notifications", "/api/playlists"] {
            let response = app()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn garbage_tokens_are_unauthorized() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/profile")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_routes_require_identity_before_role() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_doc_slugs_are_not_found() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/docs/deploy-keys")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn error_bodies_use_the_standard_envelope() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/library")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert!(body["message"].is_string());
    }
}
