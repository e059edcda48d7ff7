use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

use crate::error::CatalogError;
use crate::params::StatsField;

pub const MISSING_DATA: &str = "Missing data";

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Scalar(Vec<Option<String>>),
    Multi(Vec<Vec<String>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    pub total: u64,
    pub updated_recently: u64,
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

// Serializes as a JSON object in bucket order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Distribution(pub Vec<Bucket>);

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for bucket in &self.0 {
            map.serialize_entry(&bucket.label, &bucket.percent)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub total: u64,
    pub total_updated: u64,
    pub values: Distribution,
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn percent_of(count: u64, total: u64) -> f64 {
    round2(count as f64 * 100.0 / total as f64)
}

pub fn aggregate(by: StatsField, tally: Tally) -> Result<StatsReport, CatalogError> {
    let total = tally.total;
    let counts = match tally.column {
        Column::Scalar(values) => {
            if total == 0 {
                return Err(CatalogError::NotFound(
                    "No TV shows have been imported into the database".to_string(),
                ));
            }
            scalar_counts(values, total)
        }
        Column::Multi(lists) => {
            let counts = genre_counts(lists);
            if counts.is_empty() {
                return Err(CatalogError::NotFound(format!(
                    "No TV shows in the database have any {}",
                    by.as_str()
                )));
            }
            counts
        }
    };

    let buckets = counts
        .into_iter()
        .map(|(label, count)| Bucket {
            percent: percent_of(count, total),
            label,
            count,
        })
        .collect();

    Ok(StatsReport {
        total,
        total_updated: tally.updated_recently,
        values: Distribution(buckets),
    })
}

fn scalar_counts(values: Vec<Option<String>>, total: u64) -> Vec<(String, u64)> {
    let mut counts = group(values.into_iter().flatten());
    counts.sort_by(|a, b| a.0.cmp(&b.0));

    let grouped: u64 = counts.iter().map(|(_, c)| c).sum();
    if grouped < total {
        let missing = total - grouped;
        // A stored value spelled "Missing data" shares the bucket.
        match counts.iter().position(|(label, _)| label == MISSING_DATA) {
            Some(idx) => {
                let (label, count) = counts.remove(idx);
                counts.push((label, count + missing));
            }
            None => counts.push((MISSING_DATA.to_string(), missing)),
        }
    }
    counts
}

fn genre_counts(lists: Vec<Vec<String>>) -> Vec<(String, u64)> {
    let exploded = lists
        .into_iter()
        .filter(|genres| !genres.is_empty())
        .flat_map(|genres| genres.into_iter());
    let mut counts = group(exploded);
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn group(values: impl Iterator<Item = String>) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}
