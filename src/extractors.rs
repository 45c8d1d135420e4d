use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::{
    error::ApiError,
    state::AppState,
    store::UnitOfWork,
    validation::{FieldError, Schema},
};

/// The request's unit of work. The store opens the transaction on first use;
/// handlers commit it on success, otherwise it rolls back when dropped.
pub struct Uow(pub Box<dyn UnitOfWork>);

#[async_trait]
impl FromRequestParts<AppState> for Uow {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let uow = state.store.begin().await?;
        Ok(Uow(uow))
    }
}

/// JSON body validated against schema `T`.
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: Schema + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(reason = %rejection.body_text(), "unreadable request body");
                ApiError::Validation(vec![FieldError::new(
                    "body",
                    "json",
                    rejection.body_text(),
                )])
            })?;

        T::parse(&value).map(Payload).map_err(|errors| {
            warn!(errors = errors.len(), "request body failed validation");
            ApiError::Validation(errors)
        })
    }
}
