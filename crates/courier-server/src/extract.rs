//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use courier_auth::api_key::AuthenticatedKey;
use courier_mailer::Mailer;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the credential header for API-key authenticated routes.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor resolving the `x-api-key` header to its key and owning
/// project. Rejects the request before the body is read when the
/// credential is missing or invalid.
pub struct ApiKeyAuth(pub AuthenticatedKey);

impl<C, M> FromRequestParts<AppState<C, M>> for ApiKeyAuth
where
    C: Connection,
    M: Mailer + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C, M>,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());

        let authenticated = state.authenticator.authenticate(presented).await?;
        Ok(ApiKeyAuth(authenticated))
    }
}
