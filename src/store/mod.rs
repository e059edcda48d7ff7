use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::params::StatsField;
use crate::plan::QueryPlan;
use crate::stats::Tally;

mod memory;

pub use memory::MemoryStore;

// Rows and total come from the same snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub rows: Vec<Map<String, Value>>,
    pub total: u64,
}

#[async_trait]
pub trait ShowStore: Send + Sync {
    async fn count(&self) -> Result<u64, StoreError>;
    async fn list(&self, plan: &QueryPlan) -> Result<ListingPage, StoreError>;
    // `updated_recently` counts records updated strictly after `since`.
    async fn tally(&self, field: StatsField, since: DateTime<Utc>) -> Result<Tally, StoreError>;
}
