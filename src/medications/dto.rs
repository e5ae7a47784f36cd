use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    dates::parse_iso_date,
    error::FieldErrors,
    meals::dto::{bad_choice, too_long, BAD_DATE, REQUIRED},
    medications::repo_types::{Frequency, Medication, MedicationChanges, NewMedication},
};

#[derive(Debug, Default, Deserialize)]
pub struct MedicationPayload {
    pub drug_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub started_date: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

fn check_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    max: usize,
    required: bool,
) -> Option<String> {
    match value.map(str::trim) {
        None if !required => None,
        None | Some("") => {
            errors.add(field, REQUIRED);
            None
        }
        Some(v) if v.chars().count() > max => {
            errors.add(field, too_long(max));
            None
        }
        Some(v) => Some(v.to_string()),
    }
}

impl MedicationPayload {
    fn check_frequency(&self, errors: &mut FieldErrors, required: bool) -> Option<Frequency> {
        match self.frequency.as_deref() {
            None if required => {
                errors.add("frequency", REQUIRED);
                None
            }
            None => None,
            Some(raw) => match raw.parse::<Frequency>() {
                Ok(f) => Some(f),
                Err(_) => {
                    errors.add("frequency", bad_choice(raw));
                    None
                }
            },
        }
    }

    fn check_started_date(&self, errors: &mut FieldErrors) -> Option<Date> {
        let raw = self.started_date.as_deref()?;
        let parsed = parse_iso_date(raw);
        if parsed.is_none() {
            errors.add("started_date", BAD_DATE);
        }
        parsed
    }

    pub fn into_new(self, today: Date) -> Result<NewMedication, FieldErrors> {
        let mut errors = FieldErrors::new();
        let drug_name = check_text(&mut errors, "drug_name", self.drug_name.as_deref(), 200, true);
        let dosage = check_text(&mut errors, "dosage", self.dosage.as_deref(), 100, true);
        let frequency = self.check_frequency(&mut errors, true);
        let started_date = self.check_started_date(&mut errors);

        match (drug_name, dosage, frequency) {
            (Some(drug_name), Some(dosage), Some(frequency)) if errors.is_empty() => {
                Ok(NewMedication {
                    drug_name,
                    dosage,
                    frequency,
                    started_date: started_date.unwrap_or(today),
                    notes: self.notes.unwrap_or_default(),
                    is_active: self.is_active.unwrap_or(true),
                })
            }
            _ => Err(errors),
        }
    }

    pub fn into_changes(self) -> Result<MedicationChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let drug_name = check_text(&mut errors, "drug_name", self.drug_name.as_deref(), 200, false);
        let dosage = check_text(&mut errors, "dosage", self.dosage.as_deref(), 100, false);
        let frequency = self.check_frequency(&mut errors, false);
        let started_date = self.check_started_date(&mut errors);
        errors.into_result()?;

        Ok(MedicationChanges {
            drug_name,
            dosage,
            frequency,
            started_date,
            notes: self.notes,
            is_active: self.is_active,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MedicationListQuery {
    pub active: Option<String>,
}

impl MedicationListQuery {
    /// Defaults to active; any value other than "true" lists inactive ones.
    pub fn active(&self) -> bool {
        self.active
            .as_deref()
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(true)
    }
}

#[derive(Debug, Serialize)]
pub struct MedicationListResponse {
    pub count: usize,
    pub medications: Vec<Medication>,
}

#[derive(Debug, Serialize)]
pub struct MedicationSavedResponse {
    pub success: bool,
    pub message: &'static str,
    pub medication: Medication,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn payload(json: serde_json::Value) -> MedicationPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn create_requires_name_dosage_and_frequency() {
        let errors = payload(serde_json::json!({})).into_new(date!(2024 - 01 - 01)).unwrap_err();
        assert_eq!(errors.get("drug_name").unwrap(), [REQUIRED]);
        assert_eq!(errors.get("dosage").unwrap(), [REQUIRED]);
        assert_eq!(errors.get("frequency").unwrap(), [REQUIRED]);
    }

    #[test]
    fn create_defaults_to_active_today() {
        let med = payload(serde_json::json!({
            "drug_name": "Metformin",
            "dosage": "500mg",
            "frequency": "twice_daily",
        }))
        .into_new(date!(2024 - 01 - 01))
        .unwrap();
        assert_eq!(med.frequency, Frequency::TwiceDaily);
        assert_eq!(med.started_date, date!(2024 - 01 - 01));
        assert!(med.is_active);
        assert_eq!(med.notes, "");
    }

    #[test]
    fn unknown_frequency_is_a_field_error() {
        let errors = payload(serde_json::json!({ "frequency": "hourly" }))
            .into_changes()
            .unwrap_err();
        assert_eq!(errors.get("frequency").unwrap(), ["\"hourly\" is not a valid choice."]);
    }

    #[test]
    fn dosage_length_is_bounded() {
        let errors = payload(serde_json::json!({ "dosage": "9".repeat(101) }))
            .into_changes()
            .unwrap_err();
        assert_eq!(errors.get("dosage").unwrap(), [too_long(100)]);
    }

    #[test]
    fn active_filter_parsing() {
        let q = |v: Option<&str>| MedicationListQuery { active: v.map(String::from) }.active();
        assert!(q(None));
        assert!(q(Some("true")));
        assert!(q(Some("TRUE")));
        assert!(!q(Some("false")));
        assert!(!q(Some("yes")));
    }
}
