use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::debug;

use super::{ListingPage, ShowStore};
use crate::error::StoreError;
use crate::models::{NewShow, ShowRecord};
use crate::params::{Direction, SortField, SortKey, StatsField};
use crate::plan::QueryPlan;
use crate::stats::{Column, Tally};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ShowRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ShowRecord>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(r.id) {
                return Err(StoreError::DuplicateId(r.id));
            }
        }
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    pub async fn insert(&self, show: NewShow) -> Result<ShowRecord, StoreError> {
        self.insert_at(show, Utc::now()).await
    }

    // Holding the write lock across read-max-then-push keeps ids unique.
    pub async fn insert_at(
        &self,
        show: NewShow,
        now: DateTime<Utc>,
    ) -> Result<ShowRecord, StoreError> {
        let mut records = self.records.write().await;
        let id = match records.iter().map(|r| r.id).max() {
            None => 0,
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted)?,
        };
        let record = ShowRecord::from_new(id, now, show);
        records.push(record.clone());
        debug!(id, provider_id = record.provider_id, "Stored show");
        Ok(record)
    }
}

#[async_trait]
impl ShowStore for MemoryStore {
    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn list(&self, plan: &QueryPlan) -> Result<ListingPage, StoreError> {
        let records = self.records.read().await;
        let mut ordered: Vec<&ShowRecord> = records.iter().collect();
        ordered.sort_by(|a, b| compare_by_keys(a, b, &plan.sort));

        let rows = ordered[plan.window(ordered.len())]
            .iter()
            .map(|r| r.project(&plan.fields))
            .collect();
        Ok(ListingPage {
            rows,
            total: records.len() as u64,
        })
    }

    async fn tally(&self, field: StatsField, since: DateTime<Utc>) -> Result<Tally, StoreError> {
        let records = self.records.read().await;
        let updated_recently = records.iter().filter(|r| r.last_update > since).count() as u64;
        let column = match field {
            StatsField::Genres => Column::Multi(records.iter().map(|r| r.genres.clone()).collect()),
            StatsField::Language => scalar_column(&records, |r| r.language.clone()),
            StatsField::Status => scalar_column(&records, |r| r.status.clone()),
            StatsField::Type => scalar_column(&records, |r| r.kind.clone()),
        };
        Ok(Tally {
            total: records.len() as u64,
            updated_recently,
            column,
        })
    }
}

fn scalar_column(records: &[ShowRecord], value: impl Fn(&ShowRecord) -> Option<String>) -> Column {
    Column::Scalar(records.iter().map(value).collect())
}

fn compare_by_keys(a: &ShowRecord, b: &ShowRecord, keys: &[SortKey]) -> Ordering {
    keys.iter()
        .map(|key| {
            let ord = compare_field(a, b, key.field);
            match key.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

// Nulls sort first ascending, as in SQL.
fn compare_field(a: &ShowRecord, b: &ShowRecord, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Runtime => a.runtime.cmp(&b.runtime),
        SortField::Premiered => a.premiered.cmp(&b.premiered),
        SortField::Rating => match (a.rating, b.rating) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (x, y) => x.is_some().cmp(&y.is_some()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ListingParams;
    use chrono::Duration;
    use serde_json::json;

    fn show(name: &str, runtime: Option<i64>, rating: Option<f64>) -> NewShow {
        NewShow {
            provider_id: 1,
            name: Some(name.to_string()),
            runtime,
            rating,
            ..Default::default()
        }
    }

    fn plan(order_by: &str, page: &str, page_size: &str) -> QueryPlan {
        let req = ListingParams {
            order_by: Some(order_by.to_string()),
            page: Some(page.to_string()),
            page_size: Some(page_size.to_string()),
            filter: Some("id,name".to_string()),
        }
        .validate()
        .unwrap();
        QueryPlan::from_request(&req)
    }

    fn ids(page: &ListingPage) -> Vec<u64> {
        page.rows
            .iter()
            .map(|r| r.get("id").and_then(|v| v.as_u64()).unwrap())
            .collect()
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert(show("Lost", Some(45), Some(8.0))).await.unwrap();
        store.insert(show("Fargo", Some(60), None)).await.unwrap();
        store.insert(show("Dark", Some(60), Some(8.7))).await.unwrap();
        store.insert(show("Atlanta", None, Some(8.0))).await.unwrap();
        store
    }

    #[tokio::test]
    async fn ids_start_at_zero_and_follow_the_maximum() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(show("A", None, None)).await.unwrap().id, 0);
        assert_eq!(store.insert(show("B", None, None)).await.unwrap().id, 1);

        let record = ShowRecord::from_new(7, Utc::now(), show("C", None, None));
        let store = MemoryStore::from_records(vec![record]).unwrap();
        assert_eq!(store.insert(show("D", None, None)).await.unwrap().id, 8);
    }

    #[tokio::test]
    async fn exhausted_ids_are_an_error() {
        let record = ShowRecord::from_new(u64::MAX, Utc::now(), show("Last", None, None));
        let store = MemoryStore::from_records(vec![record]).unwrap();
        let err = store.insert(show("Overflow", None, None)).await.unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = ShowRecord::from_new(2, Utc::now(), show("A", None, None));
        let b = ShowRecord::from_new(2, Utc::now(), show("B", None, None));
        assert!(matches!(
            MemoryStore::from_records(vec![a, b]),
            Err(StoreError::DuplicateId(2))
        ));
    }

    #[tokio::test]
    async fn ascending_id_is_non_decreasing() {
        let store = seeded().await;
        let page = store.list(&plan("+id", "1", "100")).await.unwrap();
        assert_eq!(ids(&page), vec![0, 1, 2, 3]);
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn descending_id_pages_and_projects() {
        let store = MemoryStore::new();
        for name in ["a", "b", "c"] {
            store.insert(show(name, None, None)).await.unwrap();
        }
        let page = store.list(&plan("-id", "1", "2")).await.unwrap();
        assert_eq!(ids(&page), vec![2, 1]);
        assert_eq!(page.rows[0], json!({"id": 2, "name": "c"}).as_object().unwrap().clone());
    }

    #[tokio::test]
    async fn secondary_key_breaks_primary_ties() {
        let store = seeded().await;
        let page = store.list(&plan("-runtime,+name", "1", "10")).await.unwrap();
        assert_eq!(ids(&page), vec![2, 1, 0, 3]);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let store = seeded().await;
        let page = store.list(&plan("+rating", "1", "10")).await.unwrap();
        // Fargo has no rating, Lost and Atlanta tie on 8.0.
        assert_eq!(ids(&page), vec![1, 0, 3, 2]);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let store = seeded().await;
        let page = store.list(&plan("+id", "3", "2")).await.unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total, 4);
    }

    #[tokio::test]
    async fn tally_counts_recent_updates_and_reads_field() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_at(
                NewShow {
                    language: Some("English".to_string()),
                    genres: vec!["Drama".to_string()],
                    ..Default::default()
                },
                now - Duration::hours(30),
            )
            .await
            .unwrap();
        store.insert_at(NewShow::default(), now).await.unwrap();

        let since = now - Duration::hours(24);
        let tally = store.tally(StatsField::Language, since).await.unwrap();
        assert_eq!(tally.total, 2);
        assert_eq!(tally.updated_recently, 1);
        assert_eq!(
            tally.column,
            Column::Scalar(vec![Some("English".to_string()), None])
        );

        let tally = store.tally(StatsField::Genres, since).await.unwrap();
        assert_eq!(
            tally.column,
            Column::Multi(vec![vec!["Drama".to_string()], vec![]])
        );
    }
}
