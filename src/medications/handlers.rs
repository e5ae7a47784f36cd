use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    dates,
    error::{ApiError, ApiResult},
    meals::{dto::DeletedResponse, handlers::parse_id},
    medications::dto::{
        MedicationListQuery, MedicationListResponse, MedicationPayload, MedicationSavedResponse,
    },
    medications::repo_types::Medication,
    profile::extractors::CurrentUser,
    state::AppState,
};

const NOT_FOUND: &str = "Medication not found";

pub fn medication_routes() -> Router<AppState> {
    Router::new()
        .route("/medications", get(list_medications).post(create_medication))
        .route(
            "/medications/:id",
            get(get_medication)
                .put(update_medication)
                .patch(update_medication)
                .delete(delete_medication),
        )
}

#[instrument(skip(state, user))]
pub async fn list_medications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<MedicationListQuery>,
) -> ApiResult<Json<MedicationListResponse>> {
    let medications = state
        .store
        .list_medications(user.id, Some(q.active()))
        .await?;
    Ok(Json(MedicationListResponse {
        count: medications.len(),
        medications,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn create_medication(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<MedicationPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MedicationSavedResponse>)> {
    let Json(body) = payload?;
    let new = body.into_new(dates::today()).map_err(|errors| {
        warn!(?errors, "invalid medication");
        ApiError::Validation(errors)
    })?;

    let medication = state.store.create_medication(user.id, &new).await?;
    info!(user_id = %user.id, medication_id = %medication.id, drug = %medication.drug_name, "medication added");

    Ok((
        StatusCode::CREATED,
        Json(MedicationSavedResponse {
            success: true,
            message: "Medication added successfully",
            medication,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_medication(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Medication>> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .store
        .get_medication(user.id, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

#[instrument(skip(state, user, payload))]
pub async fn update_medication(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<MedicationPayload>, JsonRejection>,
) -> ApiResult<Json<MedicationSavedResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(body) = payload?;
    let changes = body.into_changes().map_err(ApiError::Validation)?;

    let medication = state
        .store
        .update_medication(user.id, id, &changes)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    info!(user_id = %user.id, medication_id = %medication.id, "medication updated");

    Ok(Json(MedicationSavedResponse {
        success: true,
        message: "Medication updated successfully",
        medication,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_medication(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let medication = state
        .store
        .delete_medication(user.id, id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    info!(user_id = %user.id, medication_id = %medication.id, "medication deleted");

    Ok(Json(DeletedResponse {
        success: true,
        message: format!("Deleted {}", medication.drug_name),
    }))
}
