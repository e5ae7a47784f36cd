//! Turns one message into one reply for an explicit user.

use time::{Date, Duration};
use tracing::debug;

use crate::{
    chat::{
        format,
        intent::{classify, GeneralReply, Intent, MealWindow, NutritionWindow},
    },
    profile::repo_types::UserProfile,
    store::{DateRange, HealthStore},
    summary::aggregate::aggregate,
};

const RECENT_MEALS: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub intent: Intent,
    pub text: String,
}

fn last_days(today: Date, days: i64) -> DateRange {
    DateRange::between(today - Duration::days(days), today)
}

pub async fn respond(
    store: &dyn HealthStore,
    user: &UserProfile,
    message: &str,
    today: Date,
) -> anyhow::Result<Reply> {
    let msg = message.to_lowercase();
    let intent = classify(&msg);
    debug!(user_id = %user.id, intent = intent.as_str(), "classified message");

    let text = match intent {
        Intent::MealQuery => meal_reply(store, user, &msg, today).await?,
        Intent::NutritionQuery => nutrition_reply(store, user, &msg, today).await?,
        Intent::MedicationQuery => {
            let meds = store.list_medications(user.id, Some(true)).await?;
            format::active_medications(&meds)
        }
        Intent::GoalQuery => {
            let actual = aggregate(store, user.id, DateRange::on(today)).await?;
            format::goal_progress(actual, user.goals())
        }
        Intent::LogMeal => format::log_meal_guide(),
        Intent::AddMedication => format::add_medication_guide(),
        Intent::General => match GeneralReply::select(&msg) {
            GeneralReply::Greeting => format::greeting(&user.name),
            GeneralReply::Help => format::help(),
            GeneralReply::Menu => format::menu(),
        },
    };

    Ok(Reply { intent, text })
}

async fn meal_reply(
    store: &dyn HealthStore,
    user: &UserProfile,
    msg: &str,
    today: Date,
) -> anyhow::Result<String> {
    Ok(match MealWindow::select(msg) {
        MealWindow::Today => {
            let meals = store.list_meals(user.id, DateRange::on(today), None).await?;
            format::today_meals(today, &meals)
        }
        MealWindow::Yesterday => {
            let day = today - Duration::days(1);
            let meals = store.list_meals(user.id, DateRange::on(day), None).await?;
            format::yesterday_meals(day, &meals)
        }
        MealWindow::Week => {
            let meals = store.list_meals(user.id, last_days(today, 7), None).await?;
            format::week_meals(&meals)
        }
        MealWindow::Recent => {
            let meals = store
                .list_meals(user.id, DateRange::all(), Some(RECENT_MEALS))
                .await?;
            format::recent_meals(&meals)
        }
    })
}

async fn nutrition_reply(
    store: &dyn HealthStore,
    user: &UserProfile,
    msg: &str,
    today: Date,
) -> anyhow::Result<String> {
    Ok(match NutritionWindow::select(msg) {
        NutritionWindow::Today => {
            let agg = store.aggregate_meals(user.id, DateRange::on(today)).await?;
            format::today_nutrition(&agg)
        }
        NutritionWindow::Yesterday => {
            let day = today - Duration::days(1);
            let agg = store.aggregate_meals(user.id, DateRange::on(day)).await?;
            format::yesterday_nutrition(day, &agg)
        }
        NutritionWindow::Week => {
            let agg = store.aggregate_meals(user.id, last_days(today, 7)).await?;
            format::week_nutrition(&agg)
        }
        NutritionWindow::Month => {
            let agg = store.aggregate_meals(user.id, last_days(today, 30)).await?;
            format::month_nutrition(&agg)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        meals::repo_types::{MealTime, NewMeal},
        medications::repo_types::{Frequency, NewMedication},
        store::memory::MemoryStore,
    };
    use time::macros::date;

    const TODAY: Date = date!(2024 - 03 - 15);

    fn meal(name: &str, date: Date, calories: f64, protein: f64) -> NewMeal {
        NewMeal {
            meal_name: name.into(),
            meal_time: MealTime::Dinner,
            calories,
            protein,
            carbs: 10.0,
            fat: 5.0,
            fiber: 2.0,
            date,
            notes: String::new(),
        }
    }

    fn med(name: &str, active: bool) -> NewMedication {
        NewMedication {
            drug_name: name.into(),
            dosage: "500mg".into(),
            frequency: Frequency::TwiceDaily,
            started_date: date!(2024 - 01 - 01),
            notes: String::new(),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn empty_day_gets_the_prompt_to_log() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let reply = respond(&store, &user, "What did I eat today?", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::MealQuery);
        assert_eq!(
            reply.text,
            "You haven't logged any meals today yet. Would you like to add one?"
        );
    }

    #[tokio::test]
    async fn today_meals_only_include_today() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_meal(user.id, &meal("Pasta", TODAY, 600.0, 20.0)).await.unwrap();
        store
            .create_meal(user.id, &meal("Old soup", TODAY - Duration::days(1), 200.0, 5.0))
            .await
            .unwrap();

        let reply = respond(&store, &user, "what did i eat today", TODAY).await.unwrap();
        assert!(reply.text.contains("Pasta"));
        assert!(!reply.text.contains("Old soup"));
        assert!(reply.text.ends_with("**Total Calories Today**: 600 kcal"));
    }

    #[tokio::test]
    async fn medication_query_lists_only_active_ones() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_medication(user.id, &med("Metformin", true)).await.unwrap();
        store.create_medication(user.id, &med("Lisinopril", true)).await.unwrap();
        store.create_medication(user.id, &med("Old pill", false)).await.unwrap();

        let reply = respond(&store, &user, "Show my medications", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::MedicationQuery);
        assert!(reply.text.starts_with("You are currently taking 2 medication(s):"));
        assert!(reply.text.contains("• **Lisinopril** - 500mg, Twice Daily"));
        assert!(!reply.text.contains("Old pill"));
    }

    #[tokio::test]
    async fn week_nutrition_averages_over_seven_days() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_meal(user.id, &meal("A", TODAY, 700.0, 10.0)).await.unwrap();
        store
            .create_meal(user.id, &meal("B", TODAY - Duration::days(7), 700.0, 10.0))
            .await
            .unwrap();
        store
            .create_meal(user.id, &meal("Too old", TODAY - Duration::days(8), 5000.0, 10.0))
            .await
            .unwrap();

        let reply = respond(&store, &user, "how much protein this week", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::NutritionQuery);
        assert!(reply.text.contains("**Total Calories**: 1400 kcal"));
        assert!(reply.text.contains("**Avg per Day**: 200 kcal"));
    }

    #[tokio::test]
    async fn goal_query_compares_today_with_profile_goals() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_meal(user.id, &meal("Big", TODAY, 1900.0, 30.0)).await.unwrap();

        let reply = respond(&store, &user, "Am I meeting my goals?", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::GoalQuery);
        assert!(reply.text.contains("✅ **Calories**: 1900.0kcal / 2000.0kcal (95%)"));
        assert!(reply.text.contains("❌ **Protein**: 30.0g / 150.0g (20%)"));
    }

    #[tokio::test]
    async fn general_messages_greet_by_name() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let reply = respond(&store, &user, "Hey there", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::General);
        assert!(reply.text.starts_with("Hello Test User!"));
    }

    #[tokio::test]
    async fn guidance_intents_need_no_data() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let reply = respond(&store, &user, "log 300 kcal", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::LogMeal);
        assert!(reply.text.contains("**POST /api/meals**"));

        let reply = respond(&store, &user, "I was prescribed something", TODAY).await.unwrap();
        assert_eq!(reply.intent, Intent::AddMedication);
        assert!(reply.text.contains("**POST /api/medications**"));
    }
}
