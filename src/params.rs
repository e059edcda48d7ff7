use crate::error::CatalogError;

pub const DEFAULT_ORDER_BY: &str = "+id";
pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const DEFAULT_FILTER: &str = "id,name";

// `None` means "not supplied"; links only echo what was supplied.
#[derive(Debug, Clone, Default)]
pub struct ListingParams {
    pub order_by: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct StatsParams {
    pub format: Option<String>,
    pub by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Runtime,
    Premiered,
    Rating,
}

impl SortField {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortField::Id),
            "name" => Some(SortField::Name),
            "runtime" => Some(SortField::Runtime),
            "premiered" => Some(SortField::Premiered),
            "rating" => Some(SortField::Rating),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowField {
    ProviderId,
    Id,
    LastUpdate,
    Name,
    Type,
    Language,
    Genres,
    Status,
    Runtime,
    Premiered,
    OfficialSite,
    Schedule,
    Rating,
    Weight,
    Network,
    Summary,
}

impl ShowField {
    pub const ALL: [ShowField; 16] = [
        ShowField::ProviderId,
        ShowField::Id,
        ShowField::LastUpdate,
        ShowField::Name,
        ShowField::Type,
        ShowField::Language,
        ShowField::Genres,
        ShowField::Status,
        ShowField::Runtime,
        ShowField::Premiered,
        ShowField::OfficialSite,
        ShowField::Schedule,
        ShowField::Rating,
        ShowField::Weight,
        ShowField::Network,
        ShowField::Summary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShowField::ProviderId => "providerId",
            ShowField::Id => "id",
            ShowField::LastUpdate => "lastUpdate",
            ShowField::Name => "name",
            ShowField::Type => "type",
            ShowField::Language => "language",
            ShowField::Genres => "genres",
            ShowField::Status => "status",
            ShowField::Runtime => "runtime",
            ShowField::Premiered => "premiered",
            ShowField::OfficialSite => "officialSite",
            ShowField::Schedule => "schedule",
            ShowField::Rating => "rating",
            ShowField::Weight => "weight",
            ShowField::Network => "network",
            ShowField::Summary => "summary",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingRequest {
    pub sort: Vec<SortKey>,
    pub page: i64,
    pub page_size: i64,
    pub fields: Vec<ShowField>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsFormat {
    Json,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsField {
    Language,
    Genres,
    Status,
    Type,
}

impl StatsField {
    pub fn as_str(self) -> &'static str {
        match self {
            StatsField::Language => "language",
            StatsField::Genres => "genres",
            StatsField::Status => "status",
            StatsField::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRequest {
    pub format: StatsFormat,
    pub by: StatsField,
}

impl ListingParams {
    // Repeated keys keep their first value.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            order_by: first_value(pairs, "order_by"),
            page: first_value(pairs, "page"),
            page_size: first_value(pairs, "page_size"),
            filter: first_value(pairs, "filter"),
        }
    }

    pub fn validate(&self) -> Result<ListingRequest, CatalogError> {
        let page = parse_int("page", self.page.as_deref(), DEFAULT_PAGE)?;
        let page_size = parse_int("page_size", self.page_size.as_deref(), DEFAULT_PAGE_SIZE)?;
        let sort = parse_order_by(self.order_by.as_deref().unwrap_or(DEFAULT_ORDER_BY))?;
        let fields = parse_filter(self.filter.as_deref().unwrap_or(DEFAULT_FILTER))?;
        Ok(ListingRequest {
            sort,
            page,
            page_size,
            fields,
        })
    }
}

impl StatsParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            format: first_value(pairs, "format"),
            by: first_value(pairs, "by"),
        }
    }

    pub fn validate(&self) -> Result<StatsRequest, CatalogError> {
        let format = match self.format.as_deref() {
            Some("json") => StatsFormat::Json,
            Some("image") => StatsFormat::Image,
            other => {
                return Err(CatalogError::invalid(
                    "format",
                    other.unwrap_or_default(),
                    "must be 'json' or 'image'",
                ))
            }
        };
        let by = match self.by.as_deref() {
            Some("language") => StatsField::Language,
            Some("genres") => StatsField::Genres,
            Some("status") => StatsField::Status,
            Some("type") => StatsField::Type,
            other => {
                return Err(CatalogError::invalid(
                    "by",
                    other.unwrap_or_default(),
                    "must be one of language, genres, status, type",
                ))
            }
        };
        Ok(StatsRequest { format, by })
    }
}

fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn parse_int(param: &'static str, raw: Option<&str>, default: i64) -> Result<i64, CatalogError> {
    match raw {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| CatalogError::invalid(param, s, "is not an integer")),
    }
}

// A repeated field keeps its first position but takes its last direction.
fn parse_order_by(raw: &str) -> Result<Vec<SortKey>, CatalogError> {
    let mut entries: Vec<(&str, Direction)> = Vec::new();
    for entry in raw.split(',') {
        let (direction, field) = if let Some(rest) = entry.strip_prefix('+') {
            (Direction::Asc, rest)
        } else if let Some(rest) = entry.strip_prefix('-') {
            (Direction::Desc, rest)
        } else {
            return Err(CatalogError::invalid(
                "order_by",
                entry,
                "must start with '+' or '-'",
            ));
        };
        match entries.iter_mut().find(|(f, _)| *f == field) {
            Some(existing) => existing.1 = direction,
            None => entries.push((field, direction)),
        }
    }

    entries
        .into_iter()
        .map(|(field, direction)| {
            SortField::parse(field)
                .map(|field| SortKey { field, direction })
                .ok_or_else(|| CatalogError::invalid("order_by", field, "is not a sortable field"))
        })
        .collect()
}

fn parse_filter(raw: &str) -> Result<Vec<ShowField>, CatalogError> {
    raw.split(',')
        .map(|field| {
            ShowField::parse(field)
                .ok_or_else(|| CatalogError::invalid("filter", field, "is not a show field"))
        })
        .collect()
}
