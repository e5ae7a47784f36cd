//! Markdown replies. Pure functions over records and aggregates; the caller
//! fetches the data.
//!
//! Calories print with no decimals, other nutrients with one.

use std::fmt::Write;

use time::Date;

use crate::{
    dates::format_iso_date,
    meals::repo_types::Meal,
    medications::repo_types::Medication,
    store::MealAggregate,
    summary::aggregate::{percentage, GoalStatus, NutrientTotals},
};

pub fn today_meals(today: Date, meals: &[Meal]) -> String {
    if meals.is_empty() {
        return "You haven't logged any meals today yet. Would you like to add one?".into();
    }

    let mut out = format!("**Today's Meals ({})**\n\n", format_iso_date(today));
    let mut total_calories = 0.0;
    for meal in meals {
        let _ = writeln!(out, "**{}**: {}", meal.meal_time.label(), meal.meal_name);
        let _ = writeln!(out, "  • Calories: {:.0} kcal", meal.calories);
        let _ = write!(
            out,
            "  • Protein: {:.1}g, Carbs: {:.1}g, Fat: {:.1}g\n\n",
            meal.protein, meal.carbs, meal.fat
        );
        total_calories += meal.calories;
    }
    let _ = write!(out, "**Total Calories Today**: {total_calories:.0} kcal");
    out
}

pub fn yesterday_meals(day: Date, meals: &[Meal]) -> String {
    let day = format_iso_date(day);
    if meals.is_empty() {
        return format!("You didn't log any meals on {day}.");
    }

    let mut out = format!("**Yesterday's Meals ({day})**\n\n");
    for meal in meals {
        let _ = writeln!(
            out,
            "**{}**: {} ({:.0} kcal)",
            meal.meal_time.label(),
            meal.meal_name,
            meal.calories
        );
    }
    out
}

/// Expects `meals` newest date first, as the store returns them.
pub fn week_meals(meals: &[Meal]) -> String {
    if meals.is_empty() {
        return "You haven't logged any meals in the past week.".into();
    }

    let mut out = String::from("**This Week's Summary**\n\n");
    let _ = write!(out, "You logged {} meal(s) in the past 7 days.\n\n", meals.len());

    let mut days: Vec<Date> = meals.iter().map(|m| m.date).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();
    for day in days.into_iter().take(5) {
        let (count, calories) = meals
            .iter()
            .filter(|m| m.date == day)
            .fold((0usize, 0.0), |(n, kcal), m| (n + 1, kcal + m.calories));
        let _ = writeln!(
            out,
            "**{}**: {count} meals, {calories:.0} kcal",
            format_iso_date(day)
        );
    }
    out
}

pub fn recent_meals(meals: &[Meal]) -> String {
    if meals.is_empty() {
        return "You haven't logged any meals yet.".into();
    }

    let mut out = String::from("**Your Recent Meals**\n\n");
    for meal in meals {
        let _ = writeln!(
            out,
            "• {} - {} ({:.0} kcal)",
            format_iso_date(meal.date),
            meal.meal_name,
            meal.calories
        );
    }
    out
}

pub fn today_nutrition(agg: &MealAggregate) -> String {
    if agg.is_empty() {
        return "You haven't logged any meals today yet.".into();
    }
    let t = agg.totals;
    format!(
        "**Today's Nutrition Summary**\n\n\
         • **Calories**: {:.0} kcal\n\
         • **Protein**: {:.1}g\n\
         • **Carbs**: {:.1}g\n\
         • **Fat**: {:.1}g\n\
         • **Fiber**: {:.1}g\n",
        t.calories, t.protein, t.carbs, t.fat, t.fiber
    )
}

pub fn yesterday_nutrition(day: Date, agg: &MealAggregate) -> String {
    let day = format_iso_date(day);
    if agg.is_empty() {
        return format!("No meals logged for {day}.");
    }
    format!(
        "**Yesterday ({day})**\n• Calories: {:.0} kcal\n• Protein: {:.1}g",
        agg.totals.calories, agg.totals.protein
    )
}

pub fn week_nutrition(agg: &MealAggregate) -> String {
    if agg.is_empty() {
        return "No meals logged this week.".into();
    }
    let t = agg.totals;
    format!(
        "**This Week's Nutrition**\n\n\
         • **Total Calories**: {:.0} kcal\n\
         • **Avg per Day**: {:.0} kcal\n\
         • **Total Protein**: {:.1}g\n\
         • **Total Carbs**: {:.1}g\n",
        t.calories,
        t.calories / 7.0,
        t.protein,
        t.carbs
    )
}

pub fn month_nutrition(agg: &MealAggregate) -> String {
    if agg.is_empty() {
        return "No meals logged this month.".into();
    }
    let t = agg.totals;
    format!(
        "**This Month's Nutrition**\n\n\
         • **Total Calories**: {:.0} kcal\n\
         • **Avg per Day**: {:.0} kcal\n\
         • **Total Protein**: {:.1}g\n",
        t.calories,
        t.calories / 30.0,
        t.protein
    )
}

/// Expects only active medications.
pub fn active_medications(meds: &[Medication]) -> String {
    if meds.is_empty() {
        return "You don't have any active medications recorded. Would you like to add one?"
            .into();
    }

    let mut out = format!("You are currently taking {} medication(s):\n\n", meds.len());
    for med in meds {
        let _ = writeln!(
            out,
            "• **{}** - {}, {}",
            med.drug_name,
            med.dosage,
            med.frequency.label()
        );
        if !med.notes.is_empty() {
            let _ = writeln!(out, "  Notes: {}", med.notes);
        }
    }
    out
}

pub fn goal_progress(actual: NutrientTotals, goals: NutrientTotals) -> String {
    let mut out = String::from("**Your Daily Goals vs Progress (Today)**\n\n");
    let rows = [
        ("Calories", actual.calories, goals.calories, "kcal"),
        ("Protein", actual.protein, goals.protein, "g"),
        ("Carbs", actual.carbs, goals.carbs, "g"),
        ("Fat", actual.fat, goals.fat, "g"),
        ("Fiber", actual.fiber, goals.fiber, "g"),
    ];
    for (name, value, goal, unit) in rows {
        let pct = percentage(value, goal);
        let status = GoalStatus::from_percentage(pct);
        let _ = writeln!(
            out,
            "{} **{name}**: {value:.1}{unit} / {goal:.1}{unit} ({pct:.0}%)",
            status.icon()
        );
    }
    out
}

pub fn log_meal_guide() -> String {
    concat!(
        "I can help you log a meal! Please use the meal logging endpoint:\n\n",
        "**POST /api/meals**\n",
        "```json\n",
        "{\n",
        "  \"meal_name\": \"Chicken Salad\",\n",
        "  \"meal_time\": \"lunch\",\n",
        "  \"calories\": 350,\n",
        "  \"protein\": 30,\n",
        "  \"carbs\": 20,\n",
        "  \"fat\": 15,\n",
        "  \"fiber\": 5\n",
        "}\n",
        "```",
    )
    .into()
}

pub fn add_medication_guide() -> String {
    concat!(
        "I can help you add a medication! Please use the medication endpoint:\n\n",
        "**POST /api/medications**\n",
        "```json\n",
        "{\n",
        "  \"drug_name\": \"Metformin\",\n",
        "  \"dosage\": \"500mg\",\n",
        "  \"frequency\": \"twice_daily\"\n",
        "}\n",
        "```",
    )
    .into()
}

pub fn greeting(name: &str) -> String {
    format!(
        "Hello {name}! I'm your health assistant. I can help you track meals, medications, \
         and monitor your nutrition goals. What would you like to know?"
    )
}

pub fn help() -> String {
    concat!(
        "**I can help you with:**\n",
        "\n",
        "📊 **Nutrition Tracking**\n",
        "- \"What did I eat today?\"\n",
        "- \"How many calories have I consumed this week?\"\n",
        "- \"Show me my protein intake\"\n",
        "\n",
        "💊 **Medication Management**\n",
        "- \"Show my medications\"\n",
        "- \"What medications am I taking?\"\n",
        "\n",
        "🎯 **Goal Tracking**\n",
        "- \"Am I meeting my goals?\"\n",
        "- \"Show my progress\"\n",
        "\n",
        "📝 **Data Entry**\n",
        "- Use the API endpoints to log meals and medications\n",
        "\n",
        "Just ask me in plain English and I'll help you track your health!",
    )
    .into()
}

pub fn menu() -> String {
    concat!(
        "I can help you with:\n",
        "• Tracking your meals and nutrition\n",
        "• Managing medications\n",
        "• Monitoring your health goals\n",
        "• Viewing your progress\n\n",
        "Try asking me things like:\n",
        "- 'What did I eat today?'\n",
        "- 'How much protein have I consumed this week?'\n",
        "- 'Show me my medications'\n",
        "- 'Am I meeting my goals?'",
    )
    .into()
}
