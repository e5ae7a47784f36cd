//! Keyword intent classification.
//!
//! A message is lowercased and tested against [`RULES`] in order; the first
//! predicate that matches decides the intent. There is no scoring, so a
//! message that mentions a meal is a meal query even when it also reads like
//! a request to log one.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MealQuery,
    NutritionQuery,
    MedicationQuery,
    GoalQuery,
    LogMeal,
    AddMedication,
    General,
}

impl Intent {
    /// Tag stored with the chat message.
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::MealQuery => "meal_query",
            Intent::NutritionQuery => "nutrition_query",
            Intent::MedicationQuery => "medication_query",
            Intent::GoalQuery => "goal_query",
            Intent::LogMeal => "log_meal",
            Intent::AddMedication => "add_medication",
            Intent::General => "general",
        }
    }
}

pub struct Rule {
    pub intent: Intent,
    pub matches: fn(&str) -> bool,
}

/// Evaluated top to bottom. Anything left over is [`Intent::General`].
pub const RULES: &[Rule] = &[
    Rule { intent: Intent::MealQuery, matches: is_meal_query },
    Rule { intent: Intent::NutritionQuery, matches: is_nutrition_query },
    Rule { intent: Intent::MedicationQuery, matches: is_medication_query },
    Rule { intent: Intent::GoalQuery, matches: is_goal_query },
    Rule { intent: Intent::LogMeal, matches: is_log_meal },
    Rule { intent: Intent::AddMedication, matches: is_add_medication },
];

const MEAL_WORDS: &[&str] = &["meal", "did i eat", "ate", "eaten", "food", "breakfast", "lunch", "dinner", "snack"];
const NUTRITION_WORDS: &[&str] = &["calorie", "protein", "carb", "fat", "fiber", "nutrition", "nutrient"];
const MEDICATION_WORDS: &[&str] = &["medication", "medicine", "drug", "pill", "taking"];
const GOAL_WORDS: &[&str] = &["goal", "target", "should", "progress", "meeting"];
const LOG_VERBS: &[&str] = &["log", "add meal", "record meal", "ate", "had"];
const LOG_UNITS: &[&str] = &["calorie", "kcal", "protein"];
const ADD_MEDICATION_PHRASES: &[&str] = &["add medication", "new medication", "start taking", "prescribed"];
const GREETINGS: &[&str] = &["hello", "hi", "hey"];

pub(crate) fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

pub fn is_meal_query(msg: &str) -> bool {
    contains_any(msg, MEAL_WORDS)
}

pub fn is_nutrition_query(msg: &str) -> bool {
    contains_any(msg, NUTRITION_WORDS)
}

pub fn is_medication_query(msg: &str) -> bool {
    contains_any(msg, MEDICATION_WORDS)
}

pub fn is_goal_query(msg: &str) -> bool {
    contains_any(msg, GOAL_WORDS)
}

pub fn is_log_meal(msg: &str) -> bool {
    contains_any(msg, LOG_VERBS) && contains_any(msg, LOG_UNITS)
}

pub fn is_add_medication(msg: &str) -> bool {
    contains_any(msg, ADD_MEDICATION_PHRASES)
}

pub fn classify(message: &str) -> Intent {
    let msg = message.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&msg))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::General)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealWindow {
    Today,
    Yesterday,
    Week,
    Recent,
}

impl MealWindow {
    pub fn select(msg: &str) -> Self {
        if msg.contains("today") {
            MealWindow::Today
        } else if msg.contains("yesterday") {
            MealWindow::Yesterday
        } else if msg.contains("week") {
            MealWindow::Week
        } else if msg.contains("list") || msg.contains("show") {
            MealWindow::Recent
        } else {
            MealWindow::Today
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutritionWindow {
    Today,
    Yesterday,
    Week,
    Month,
}

impl NutritionWindow {
    pub fn select(msg: &str) -> Self {
        if msg.contains("today") {
            NutritionWindow::Today
        } else if msg.contains("yesterday") {
            NutritionWindow::Yesterday
        } else if msg.contains("week") {
            NutritionWindow::Week
        } else if msg.contains("month") {
            NutritionWindow::Month
        } else {
            NutritionWindow::Today
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneralReply {
    Greeting,
    Help,
    Menu,
}

impl GeneralReply {
    pub fn select(msg: &str) -> Self {
        if contains_any(msg, GREETINGS) {
            GeneralReply::Greeting
        } else if msg.contains("help") {
            GeneralReply::Help
        } else {
            GeneralReply::Menu
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_rule_fires_on_its_own_keywords() {
        assert_eq!(classify("What did I eat for lunch?"), Intent::MealQuery);
        assert_eq!(classify("What did I eat today?"), Intent::MealQuery);
        assert_eq!(classify("How much PROTEIN today"), Intent::NutritionQuery);
        assert_eq!(classify("Show my medications"), Intent::MedicationQuery);
        assert_eq!(classify("Am I on target?"), Intent::GoalQuery);
        assert_eq!(classify("Log 300 kcal please"), Intent::LogMeal);
        assert_eq!(classify("I was prescribed something"), Intent::AddMedication);
        assert_eq!(classify("Good morning"), Intent::General);
    }

    #[test]
    fn meal_keywords_always_mask_log_meal() {
        let log_phrases = ["log 400 kcal", "add meal with 30g protein", "record meal 500 calories", "had 20g protein"];
        for meal_word in MEAL_WORDS {
            for phrase in log_phrases {
                let msg = format!("{phrase} for {meal_word}");
                assert!(is_log_meal(&msg.to_lowercase()), "{msg}");
                assert_eq!(classify(&msg), Intent::MealQuery, "{msg}");
            }
        }
    }

    #[test]
    fn nutrition_words_mask_log_meal_too() {
        // "calorie" and "protein" are both log units and nutrition keywords.
        assert_eq!(classify("log 500 calories"), Intent::NutritionQuery);
        assert_eq!(classify("log 500 kcal"), Intent::LogMeal);
    }

    #[test]
    fn only_the_did_i_eat_phrase_counts_as_a_meal_word() {
        assert_eq!(classify("How much protein should I eat?"), Intent::NutritionQuery);
        assert_eq!(classify("Hey, great job"), Intent::General);
        assert_eq!(GeneralReply::select("hey, great job"), GeneralReply::Greeting);
        assert_eq!(classify("Did I eat enough?"), Intent::MealQuery);
    }

    #[test]
    fn log_meal_needs_a_unit() {
        assert!(!is_log_meal("log my run"));
        assert!(is_log_meal("log 200 kcal"));
    }

    #[test]
    fn substring_matching_is_literal() {
        // "taking" wins over the goal rule because medication is checked first.
        assert_eq!(classify("Should I keep taking it?"), Intent::MedicationQuery);
        // "ate" hides inside "update".
        assert_eq!(classify("any update?"), Intent::MealQuery);
    }

    #[test]
    fn add_medication_phrases_are_shadowed_by_medication_query() {
        assert_eq!(classify("add medication aspirin"), Intent::MedicationQuery);
        assert_eq!(classify("start taking vitamin d"), Intent::MedicationQuery);
    }

    #[test]
    fn meal_window_selection() {
        assert_eq!(MealWindow::select("what did i eat today"), MealWindow::Today);
        assert_eq!(MealWindow::select("meals yesterday"), MealWindow::Yesterday);
        assert_eq!(MealWindow::select("meals this week"), MealWindow::Week);
        assert_eq!(MealWindow::select("list my meals"), MealWindow::Recent);
        assert_eq!(MealWindow::select("show meals"), MealWindow::Recent);
        assert_eq!(MealWindow::select("meals"), MealWindow::Today);
        assert_eq!(MealWindow::select("show meals today"), MealWindow::Today);
    }

    #[test]
    fn nutrition_window_selection() {
        assert_eq!(NutritionWindow::select("protein today"), NutritionWindow::Today);
        assert_eq!(NutritionWindow::select("protein yesterday"), NutritionWindow::Yesterday);
        assert_eq!(NutritionWindow::select("protein this week"), NutritionWindow::Week);
        assert_eq!(NutritionWindow::select("protein this month"), NutritionWindow::Month);
        assert_eq!(NutritionWindow::select("protein"), NutritionWindow::Today);
    }

    #[test]
    fn general_reply_selection() {
        assert_eq!(GeneralReply::select("hello there"), GeneralReply::Greeting);
        assert_eq!(GeneralReply::select("help"), GeneralReply::Help);
        assert_eq!(GeneralReply::select("what now"), GeneralReply::Menu);
        // "hi" inside "this" counts as a greeting.
        assert_eq!(GeneralReply::select("help with this"), GeneralReply::Greeting);
    }

    #[test]
    fn tags_are_snake_case() {
        assert_eq!(Intent::MealQuery.as_str(), "meal_query");
        assert_eq!(Intent::LogMeal.as_str(), "log_meal");
        assert_eq!(
            serde_json::to_value(Intent::AddMedication).unwrap(),
            Intent::AddMedication.as_str()
        );
    }
}
