use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    dates,
    error::{ApiError, ApiResult},
    meals::dto::{DeletedResponse, MealListQuery, MealListResponse, MealPayload, MealSavedResponse},
    meals::repo_types::Meal,
    profile::extractors::CurrentUser,
    state::AppState,
};

const NOT_FOUND: &str = "Meal not found";

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route(
            "/meals/:id",
            get(get_meal)
                .put(update_meal)
                .patch(update_meal)
                .delete(delete_meal),
        )
}

/// Ids that don't parse can't belong to the user either.
pub(crate) fn parse_id(raw: &str, not_found: &'static str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found))
}

#[instrument(skip(state, user))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<MealListQuery>,
) -> ApiResult<Json<MealListResponse>> {
    let range = q.range(dates::today());

    let meals = state.store.list_meals(user.id, range, None).await?;
    let aggregate = state.store.aggregate_meals(user.id, range).await?;

    Ok(Json(MealListResponse {
        count: meals.len(),
        meals,
        totals: aggregate.totals.into(),
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<MealPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MealSavedResponse>)> {
    let Json(body) = payload?;
    let new = body.into_new(dates::today()).map_err(|errors| {
        warn!(?errors, "invalid meal");
        ApiError::Validation(errors)
    })?;

    let meal = state.store.create_meal(user.id, &new).await?;
    info!(user_id = %user.id, meal_id = %meal.id, name = %meal.meal_name, "meal logged");

    Ok((
        StatusCode::CREATED,
        Json(MealSavedResponse {
            success: true,
            message: "Meal logged successfully",
            meal,
        }),
    ))
}

#[instrument(skip(state, user))]
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<Meal>> {
    let id = parse_id(&id, NOT_FOUND)?;
    state
        .store
        .get_meal(user.id, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(NOT_FOUND))
}

#[instrument(skip(state, user, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<MealPayload>, JsonRejection>,
) -> ApiResult<Json<MealSavedResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(body) = payload?;
    let changes = body.into_changes().map_err(ApiError::Validation)?;

    let meal = state
        .store
        .update_meal(user.id, id, &changes)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    info!(user_id = %user.id, meal_id = %meal.id, "meal updated");

    Ok(Json(MealSavedResponse {
        success: true,
        message: "Meal updated successfully",
        meal,
    }))
}

#[instrument(skip(state, user))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedResponse>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let meal = state
        .store
        .delete_meal(user.id, id)
        .await?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;
    info!(user_id = %user.id, meal_id = %meal.id, "meal deleted");

    Ok(Json(DeletedResponse {
        success: true,
        message: format!("Deleted {}", meal.meal_name),
    }))
}
