use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    extractors::{Payload, Uow},
    state::AppState,
    store::UnitOfWork,
    users::{
        dto::{CreateUser, UpdateUser},
        password::hash_password,
        repo_types::{NewUser, User, UserChanges},
    },
};

const EMAIL_TAKEN: &str = "user already exists";
const HAS_ADVERTISEMENTS: &str = "user still has advertisements";

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", post(create_user)).route(
        "/user/:id",
        get(get_user).patch(update_user).delete(delete_user),
    )
}

async fn fetch_user(uow: &mut dyn UnitOfWork, id: i32) -> Result<User, ApiError> {
    uow.get_user(id).await?.ok_or_else(|| {
        warn!(user_id = id, "user not found");
        ApiError::NotFound("user")
    })
}

#[instrument(skip(uow))]
pub async fn get_user(Path(id): Path<i32>, Uow(mut uow): Uow) -> Result<Json<User>, ApiError> {
    let user = fetch_user(uow.as_mut(), id).await?;
    Ok(Json(user))
}

#[instrument(skip_all)]
pub async fn create_user(
    Uow(mut uow): Uow,
    Payload(payload): Payload<CreateUser>,
) -> Result<Json<User>, ApiError> {
    let CreateUser {
        name,
        password,
        email,
    } = payload;

    let new_user = NewUser {
        name,
        email,
        password_hash: hash_password(&password)?,
    };

    let user = uow
        .insert_user(new_user)
        .await
        .map_err(|e| e.or_conflict(EMAIL_TAKEN))?;
    uow.commit().await.map_err(|e| e.or_conflict(EMAIL_TAKEN))?;

    info!(user_id = user.id, "user created");
    Ok(Json(user))
}

/// Applies the supplied fields in one statement. A new password is hashed
/// like on creation.
#[instrument(skip(uow, payload))]
pub async fn update_user(
    Path(id): Path<i32>,
    Uow(mut uow): Uow,
    Payload(payload): Payload<UpdateUser>,
) -> Result<Json<User>, ApiError> {
    let user = fetch_user(uow.as_mut(), id).await?;

    let changes = UserChanges {
        name: payload.name,
        email: payload.email,
        password_hash: payload.password.as_deref().map(hash_password).transpose()?,
    };
    if changes.is_empty() {
        return Ok(Json(user));
    }

    let user = uow
        .update_user(id, changes)
        .await
        .map_err(|e| e.or_conflict(EMAIL_TAKEN))?
        .ok_or(ApiError::NotFound("user"))?;
    uow.commit().await.map_err(|e| e.or_conflict(EMAIL_TAKEN))?;

    info!(user_id = id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(uow))]
pub async fn delete_user(Path(id): Path<i32>, Uow(mut uow): Uow) -> Result<Json<Value>, ApiError> {
    fetch_user(uow.as_mut(), id).await?;

    if !uow
        .delete_user(id)
        .await
        .map_err(|e| e.or_conflict(HAS_ADVERTISEMENTS))?
    {
        return Err(ApiError::NotFound("user"));
    }
    uow.commit()
        .await
        .map_err(|e| e.or_conflict(HAS_ADVERTISEMENTS))?;

    info!(user_id = id, "user deleted");
    Ok(Json(json!({ "status": "deleted" })))
}
