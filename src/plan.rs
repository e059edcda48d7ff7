use crate::params::{ListingRequest, ShowField, SortKey};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub fields: Vec<ShowField>,
    pub sort: Vec<SortKey>,
    // negative: unbounded
    pub limit: i64,
    pub offset: i64,
}

impl QueryPlan {
    pub fn from_request(req: &ListingRequest) -> Self {
        Self {
            fields: req.fields.clone(),
            sort: req.sort.clone(),
            limit: req.page_size,
            offset: req.page.saturating_sub(1).saturating_mul(req.page_size),
        }
    }

    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = usize::try_from(self.offset.max(0)).unwrap_or(usize::MAX).min(len);
        let end = match usize::try_from(self.limit) {
            Ok(limit) => start.saturating_add(limit).min(len),
            Err(_) => len,
        };
        start..end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: u64,
}

impl PageMeta {
    pub fn next_page(&self) -> Option<i64> {
        let more = i128::from(self.page) * i128::from(self.page_size) < i128::from(self.total);
        if more {
            self.page.checked_add(1)
        } else {
            None
        }
    }

    pub fn previous_page(&self) -> Option<i64> {
        if self.page > 1 {
            Some(self.page - 1)
        } else {
            None
        }
    }
}
