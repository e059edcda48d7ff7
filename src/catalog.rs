use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::error::CatalogError;
use crate::links::{build_links, PageLinks};
use crate::params::{ListingParams, StatsParams, StatsRequest};
use crate::plan::{PageMeta, QueryPlan};
use crate::stats::{aggregate, StatsReport};
use crate::store::ShowStore;

const RECENT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingResponse {
    pub page: i64,
    pub page_size: i64,
    pub tv_shows: Vec<Map<String, Value>>,
    #[serde(rename = "_links")]
    pub links: PageLinks,
}

#[derive(Clone)]
pub struct ShowCatalog {
    store: Arc<dyn ShowStore>,
    base_url: String,
}

impl ShowCatalog {
    pub fn new(store: Arc<dyn ShowStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn list(&self, params: &ListingParams) -> Result<ListingResponse, CatalogError> {
        let request = params.validate()?;
        let plan = QueryPlan::from_request(&request);
        let page = self.store.list(&plan).await?;

        if page.rows.is_empty() {
            return Err(CatalogError::NotFound(
                "No TV shows were found matching your search parameters".to_string(),
            ));
        }

        let meta = PageMeta {
            page: request.page,
            page_size: request.page_size,
            total: page.total,
        };
        let links = build_links(&self.base_url, params, &meta);
        debug!(
            page = request.page,
            page_size = request.page_size,
            rows = page.rows.len(),
            total = page.total,
            "Listing served"
        );

        Ok(ListingResponse {
            page: request.page,
            page_size: request.page_size,
            tv_shows: page.rows,
            links,
        })
    }

    pub async fn statistics(
        &self,
        params: &StatsParams,
    ) -> Result<(StatsRequest, StatsReport), CatalogError> {
        self.statistics_at(params, Utc::now()).await
    }

    pub async fn statistics_at(
        &self,
        params: &StatsParams,
        now: DateTime<Utc>,
    ) -> Result<(StatsRequest, StatsReport), CatalogError> {
        let request = params.validate()?;
        let since = now - Duration::hours(RECENT_WINDOW_HOURS);
        let tally = self.store.tally(request.by, since).await?;
        let report = aggregate(request.by, tally)?;
        debug!(
            by = request.by.as_str(),
            buckets = report.values.0.len(),
            total = report.total,
            "Statistics computed"
        );
        Ok((request, report))
    }
}
