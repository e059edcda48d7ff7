use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::params::ShowField;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Schedule {
    pub time: String,
    pub days: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Country {
    pub name: Option<String>,
    pub code: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Network {
    pub id: i64,
    pub name: Option<String>,
    pub country: Option<Country>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShowRecord {
    pub id: u64,
    pub provider_id: i64,
    pub last_update: DateTime<Utc>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub runtime: Option<i64>,
    pub premiered: Option<String>,
    pub official_site: Option<String>,
    pub schedule: Option<Schedule>,
    pub rating: Option<f64>,
    pub weight: Option<i64>,
    pub network: Option<Network>,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewShow {
    pub provider_id: i64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub runtime: Option<i64>,
    pub premiered: Option<String>,
    pub official_site: Option<String>,
    pub schedule: Option<Schedule>,
    pub rating: Option<f64>,
    pub weight: Option<i64>,
    pub network: Option<Network>,
    pub summary: Option<String>,
}

impl ShowRecord {
    pub fn from_new(id: u64, last_update: DateTime<Utc>, show: NewShow) -> Self {
        Self {
            id,
            provider_id: show.provider_id,
            last_update,
            name: show.name,
            kind: show.kind,
            language: show.language,
            genres: show.genres,
            status: show.status,
            runtime: show.runtime,
            premiered: show.premiered,
            official_site: show.official_site,
            schedule: show.schedule,
            rating: show.rating,
            weight: show.weight,
            network: show.network,
            summary: show.summary,
        }
    }

    pub fn field_value(&self, field: ShowField) -> Value {
        match field {
            ShowField::ProviderId => json!(self.provider_id),
            ShowField::Id => json!(self.id),
            ShowField::LastUpdate => json!(self.last_update),
            ShowField::Name => json!(self.name),
            ShowField::Type => json!(self.kind),
            ShowField::Language => json!(self.language),
            ShowField::Genres => json!(self.genres),
            ShowField::Status => json!(self.status),
            ShowField::Runtime => json!(self.runtime),
            ShowField::Premiered => json!(self.premiered),
            ShowField::OfficialSite => json!(self.official_site),
            ShowField::Schedule => json!(self.schedule),
            ShowField::Rating => json!(self.rating),
            ShowField::Weight => json!(self.weight),
            ShowField::Network => json!(self.network),
            ShowField::Summary => json!(self.summary),
        }
    }

    pub fn project(&self, fields: &[ShowField]) -> serde_json::Map<String, Value> {
        fields
            .iter()
            .map(|f| (f.as_str().to_string(), self.field_value(*f)))
            .collect()
    }
}
