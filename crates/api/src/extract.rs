//! Request extractors whose rejections render as the standard envelope.

use axum::extract::{FromRequest, FromRequestParts, Multipart, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] on the request side.
///
/// A malformed body, a wrong content type, or a body over the JSON ceiling
/// becomes an [`AppError`] instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(
                AppError::PayloadTooLarge("Request body is too large".into()),
            ),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

/// [`axum::extract::Query`] with an envelope rejection.
///
/// Every field of the query types is an optional string, so only a query
/// string that cannot be decoded at all (a repeated key, broken
/// percent-encoding) is refused.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}

/// [`axum::extract::Multipart`] with an envelope rejection, for requests
/// that are not `multipart/form-data` or lack a boundary.
#[derive(Debug)]
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Rejected multipart request");
                AppError::BadRequest("Request must be multipart/form-data".into())
            })
    }
}
