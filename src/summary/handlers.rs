use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::Date;
use tracing::{info, instrument};

use crate::{
    dates,
    error::ApiResult,
    profile::{extractors::CurrentUser, repo_types::UserProfile},
    state::AppState,
    store::HealthStore,
    summary::{
        aggregate::{averages, progress, round1, Period},
        dto::{SummaryDateRange, SummaryQuery, SummaryResponse},
    },
};

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

/// Totals, per-day averages and progress against the user's goals for one period.
pub async fn build_summary(
    store: &dyn HealthStore,
    user: &UserProfile,
    period: Period,
    today: Date,
) -> anyhow::Result<SummaryResponse> {
    let aggregate = store.aggregate_meals(user.id, period.range(today)).await?;
    let num_days = period.num_days();
    let daily = averages(aggregate.totals, num_days);
    let goals = user.goals();
    let mut pct = progress(daily, goals);
    pct.calories = round1(pct.calories);
    pct.protein = round1(pct.protein);
    pct.carbs = round1(pct.carbs);
    pct.fat = round1(pct.fat);
    pct.fiber = round1(pct.fiber);

    Ok(SummaryResponse {
        period,
        date_range: SummaryDateRange {
            from: period.start(today),
            to: today,
            days: num_days,
        },
        meals_logged: aggregate.meals_logged,
        totals: aggregate.totals.into(),
        daily_averages: daily.into(),
        goals,
        progress_percentage: pct,
    })
}

#[instrument(skip(state, user))]
pub async fn get_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(q): Query<SummaryQuery>,
) -> ApiResult<Json<SummaryResponse>> {
    let period = Period::parse_or_default(q.period.as_deref());
    let summary = build_summary(state.store.as_ref(), &user, period, dates::today()).await?;
    info!(user_id = %user.id, period = period.as_str(), meals = summary.meals_logged, "summary built");
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        meals::repo_types::{MealTime, NewMeal},
        store::memory::MemoryStore,
    };
    use time::{macros::date, Duration};

    fn meal(date: Date, calories: f64, protein: f64) -> NewMeal {
        NewMeal {
            meal_name: "Oatmeal with Berries".into(),
            meal_time: MealTime::Breakfast,
            calories,
            protein,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
            date,
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn single_meal_today() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let today = date!(2024 - 06 - 15);
        store.create_meal(user.id, &meal(today, 350.0, 12.0)).await.unwrap();

        let s = build_summary(&store, &user, Period::Today, today).await.unwrap();
        assert_eq!(s.meals_logged, 1);
        assert_eq!(s.date_range.days, 1);
        assert_eq!(s.totals.total_calories, 350.0);
        assert_eq!(s.totals.total_protein, 12.0);
        assert_eq!(s.daily_averages.avg_calories, 350.0);
        assert_eq!(s.progress_percentage.calories, 17.5);
        assert_eq!(s.progress_percentage.protein, 8.0);
        assert_eq!(s.progress_percentage.fiber, 0.0);
    }

    #[tokio::test]
    async fn week_window_spans_eight_days_and_excludes_older_meals() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let today = date!(2024 - 06 - 15);
        store.create_meal(user.id, &meal(today, 800.0, 0.0)).await.unwrap();
        store
            .create_meal(user.id, &meal(today - Duration::days(7), 800.0, 0.0))
            .await
            .unwrap();
        store
            .create_meal(user.id, &meal(today - Duration::days(8), 5000.0, 0.0))
            .await
            .unwrap();

        let s = build_summary(&store, &user, Period::Week, today).await.unwrap();
        assert_eq!(s.date_range.from, date!(2024 - 06 - 08));
        assert_eq!(s.date_range.days, 8);
        assert_eq!(s.meals_logged, 2);
        assert_eq!(s.totals.total_calories, 1600.0);
        assert_eq!(s.daily_averages.avg_calories, 200.0);
        assert_eq!(s.progress_percentage.calories, 10.0);
    }

    #[tokio::test]
    async fn empty_period_serializes_zeros() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let s = build_summary(&store, &user, Period::Month, date!(2024 - 06 - 15))
            .await
            .unwrap();
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["period"], "month");
        assert_eq!(json["date_range"]["from"], "2024-05-16");
        assert_eq!(json["date_range"]["days"], 31);
        assert_eq!(json["totals"]["total_fiber"], 0.0);
        assert_eq!(json["daily_averages"]["avg_fat"], 0.0);
        assert_eq!(json["goals"]["calories"], 2000.0);
    }
}
