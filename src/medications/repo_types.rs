use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OnceDaily,
    TwiceDaily,
    ThreeTimesDaily,
    AsNeeded,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::OnceDaily => "once_daily",
            Frequency::TwiceDaily => "twice_daily",
            Frequency::ThreeTimesDaily => "three_times_daily",
            Frequency::AsNeeded => "as_needed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Frequency::OnceDaily => "Once Daily",
            Frequency::TwiceDaily => "Twice Daily",
            Frequency::ThreeTimesDaily => "Three Times Daily",
            Frequency::AsNeeded => "As Needed",
        }
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once_daily" => Ok(Frequency::OnceDaily),
            "twice_daily" => Ok(Frequency::TwiceDaily),
            "three_times_daily" => Ok(Frequency::ThreeTimesDaily),
            "as_needed" => Ok(Frequency::AsNeeded),
            other => anyhow::bail!("unknown frequency {other:?}"),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, FromRow)]
pub struct MedicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub drug_name: String,
    pub dosage: String,
    pub frequency: String,
    pub started_date: Date,
    pub notes: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Medication {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub drug_name: String,
    pub dosage: String,
    pub frequency: Frequency,
    #[serde(with = "crate::dates::iso_date")]
    pub started_date: Date,
    pub notes: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TryFrom<MedicationRow> for Medication {
    type Error = anyhow::Error;

    fn try_from(r: MedicationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            drug_name: r.drug_name,
            dosage: r.dosage,
            frequency: r.frequency.parse()?,
            started_date: r.started_date,
            notes: r.notes,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMedication {
    pub drug_name: String,
    pub dosage: String,
    pub frequency: Frequency,
    pub started_date: Date,
    pub notes: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicationChanges {
    pub drug_name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<Frequency>,
    pub started_date: Option<Date>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl MedicationChanges {
    /// Applies the given fields and stamps `updated_at`.
    pub fn apply(&self, med: &mut Medication, now: OffsetDateTime) {
        if let Some(v) = &self.drug_name {
            med.drug_name = v.clone();
        }
        if let Some(v) = &self.dosage {
            med.dosage = v.clone();
        }
        if let Some(v) = self.frequency {
            med.frequency = v;
        }
        if let Some(v) = self.started_date {
            med.started_date = v;
        }
        if let Some(v) = &self.notes {
            med.notes = v.clone();
        }
        if let Some(v) = self.is_active {
            med.is_active = v;
        }
        med.updated_at = now;
    }
}
