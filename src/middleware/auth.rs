use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;

/// Identity resolved from a verified session token. Inserted into request
/// extensions by `require_auth` so handlers can take it as an `Extension`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        AuthUser {
            id: claims.sub,
            email: claims.email,
        }
    }
}

/// Rejects the request with 401 unless it carries a valid bearer token.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = auth::verify_token(&token).map_err(|err| {
        tracing::debug!("token verification failed: {}", err);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let header = headers
        .get("authorization")
        .ok_or_else(|| "Missing authorization header".to_string())?;

    let value = header
        .to_str()
        .map_err(|_| "Invalid authorization header".to_string())?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| "Authorization header must use Bearer scheme".to_string())?;

    if token.is_empty() {
        return Err("Empty bearer token".to_string());
    }
    Ok(token.to_string())
}

/// Identity for routes that serve anonymous callers too. A missing or
/// invalid token is not an error here; the handler gets `None` and answers
/// with its documented anonymous default.
pub struct OptionalUser(pub Option<AuthUser>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = bearer_token(&parts.headers)
            .ok()
            .and_then(|token| auth::verify_token(&token).ok())
            .map(AuthUser::from);
        Ok(OptionalUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(err.contains("Missing"));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = bearer_token(&headers_with("Basic dXNlcjpwYXNz")).unwrap_err();
        assert!(err.contains("Bearer"));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = bearer_token(&headers_with("Bearer ")).unwrap_err();
        assert!(err.contains("Empty"));
    }

    #[test]
    fn well_formed_bearer_token_is_extracted() {
        let token = bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }
}
