use axum::{
    extract::Path,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    ads::{
        dto::{CreateAdvertisement, UpdateAdvertisement},
        repo_types::{Advertisement, AdvertisementChanges, NewAdvertisement},
    },
    error::ApiError,
    extractors::{Payload, Uow},
    state::AppState,
    store::UnitOfWork,
};

const CREATOR_UNKNOWN: &str = "the creator is not registered";

pub fn adv_routes() -> Router<AppState> {
    Router::new().route("/adv", post(create_adv)).route(
        "/adv/:id",
        get(get_adv).patch(update_adv).delete(delete_adv),
    )
}

async fn fetch_adv(uow: &mut dyn UnitOfWork, id: i32) -> Result<Advertisement, ApiError> {
    uow.get_advertisement(id).await?.ok_or_else(|| {
        warn!(adv_id = id, "advertisement not found");
        ApiError::NotFound("advertisement")
    })
}

/// Ownership is whatever `creator` the caller puts in the body; there is no
/// session behind it. A missing claim never matches.
fn ensure_creator(claimed: Option<i32>, adv: &Advertisement) -> Result<(), ApiError> {
    if claimed == Some(adv.creator) {
        Ok(())
    } else {
        warn!(adv_id = adv.id, ?claimed, "creator mismatch");
        Err(ApiError::NotCreator)
    }
}

#[instrument(skip(uow))]
pub async fn get_adv(
    Path(id): Path<i32>,
    Uow(mut uow): Uow,
) -> Result<Json<Advertisement>, ApiError> {
    let adv = fetch_adv(uow.as_mut(), id).await?;
    Ok(Json(adv))
}

#[instrument(skip(uow, payload))]
pub async fn create_adv(
    Uow(mut uow): Uow,
    Payload(payload): Payload<CreateAdvertisement>,
) -> Result<Json<Advertisement>, ApiError> {
    let new_adv = NewAdvertisement {
        heading: payload.heading,
        description: payload.description,
        creator: payload.creator,
    };

    let adv = uow
        .insert_advertisement(new_adv)
        .await
        .map_err(|e| e.or_conflict(CREATOR_UNKNOWN))?;
    uow.commit().await.map_err(|e| e.or_conflict(CREATOR_UNKNOWN))?;

    info!(adv_id = adv.id, creator = adv.creator, "advertisement created");
    Ok(Json(adv))
}

#[instrument(skip(uow, payload))]
pub async fn update_adv(
    Path(id): Path<i32>,
    Uow(mut uow): Uow,
    Payload(payload): Payload<UpdateAdvertisement>,
) -> Result<Json<Advertisement>, ApiError> {
    let adv = fetch_adv(uow.as_mut(), id).await?;
    ensure_creator(payload.creator, &adv)?;

    let changes = AdvertisementChanges {
        heading: payload.heading,
        description: payload.description,
    };
    if changes.is_empty() {
        return Ok(Json(adv));
    }

    let adv = uow
        .update_advertisement(id, changes)
        .await?
        .ok_or(ApiError::NotFound("advertisement"))?;
    uow.commit().await?;

    info!(adv_id = id, "advertisement updated");
    Ok(Json(adv))
}

#[instrument(skip(uow, payload))]
pub async fn delete_adv(
    Path(id): Path<i32>,
    Uow(mut uow): Uow,
    Payload(payload): Payload<UpdateAdvertisement>,
) -> Result<Json<Value>, ApiError> {
    let adv = fetch_adv(uow.as_mut(), id).await?;
    ensure_creator(payload.creator, &adv)?;

    if !uow.delete_advertisement(id).await? {
        return Err(ApiError::NotFound("advertisement"));
    }
    uow.commit().await?;

    info!(adv_id = id, "advertisement deleted");
    Ok(Json(json!({ "status": "deleted" })))
}
