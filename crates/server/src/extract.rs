//! Request extractors that report failures as [`ServerError`] so every
//! rejection shares the `{code, message}` error body.

use api_types::{Validate, page::PageQuery};
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use engine::{DEFAULT_PAGE_SIZE, PageRequest};
use serde::de::DeserializeOwned;

use crate::ServerError;

/// JSON body that has been deserialized and passed [`Validate`].
pub(crate) struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Numeric `{id}` path segment, at least 1.
pub(crate) struct Id(pub i64);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::Validation(rejection.body_text()))?;
        if id < 1 {
            return Err(ServerError::Validation(format!(
                "id: must be at least 1, got {id}"
            )));
        }
        Ok(Self(id))
    }
}

/// `?page=&size=` turned into an engine [`PageRequest`].
pub(crate) struct Paging(pub PageRequest);

impl<S> FromRequestParts<S> for Paging
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::Validation(rejection.body_text()))?;
        let request = PageRequest::new(
            query.page.unwrap_or(0),
            query.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;
        Ok(Self(request))
    }
}
