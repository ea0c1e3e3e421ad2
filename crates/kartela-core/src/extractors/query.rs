use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::KartelaError;

/// Query-string extractor whose rejections use the Kartela error envelope.
///
/// ```rust,ignore
/// async fn search(Query(filter): Query<SwatchQuery>) -> impl IntoResponse {
///     // filter.q, filter.status
/// }
/// ```
pub struct Query<T>(pub T);

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = KartelaError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or("");
        serde_urlencoded::from_str(query)
            .map(Query)
            .map_err(|e| KartelaError::Validation(format!("Invalid query string: {}", e)))
    }
}
