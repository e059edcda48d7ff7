use serde::Serialize;

use crate::params::ListingParams;
use crate::plan::PageMeta;

pub const LISTING_PATH: &str = "/tv-shows";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    #[serde(rename = "self")]
    pub self_link: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
}

pub fn build_links(base_url: &str, supplied: &ListingParams, meta: &PageMeta) -> PageLinks {
    let self_link = link(base_url, &echo(supplied, PageOverride::Echo));

    let previous = meta
        .previous_page()
        .map(|page| link(base_url, &echo(supplied, PageOverride::Replace(page))));

    let next = meta
        .next_page()
        .map(|page| link(base_url, &echo(supplied, PageOverride::Force(page))));

    PageLinks {
        self_link,
        previous,
        next,
    }
}

#[derive(Clone, Copy)]
enum PageOverride {
    Echo,
    Replace(i64),
    Force(i64),
}

fn echo(supplied: &ListingParams, page: PageOverride) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::with_capacity(4);
    if let Some(v) = &supplied.order_by {
        pairs.push(("order_by", v.clone()));
    }
    match (page, &supplied.page) {
        (PageOverride::Echo, Some(v)) => pairs.push(("page", v.clone())),
        (PageOverride::Replace(p), Some(_)) | (PageOverride::Force(p), _) => {
            pairs.push(("page", p.to_string()))
        }
        _ => {}
    }
    if let Some(v) = &supplied.page_size {
        pairs.push(("page_size", v.clone()));
    }
    if let Some(v) = &supplied.filter {
        pairs.push(("filter", v.clone()));
    }
    pairs
}

fn link(base_url: &str, pairs: &[(&'static str, String)]) -> Link {
    let mut href = format!("{}{}", base_url, LISTING_PATH);
    if !pairs.is_empty() {
        let query = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        href.push('?');
        href.push_str(&query);
    }
    Link { href }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://127.0.0.1:5000";

    fn meta(page: i64, page_size: i64, total: u64) -> PageMeta {
        PageMeta {
            page,
            page_size,
            total,
        }
    }

    #[test]
    fn self_link_has_no_query_when_nothing_supplied() {
        let links = build_links(BASE, &ListingParams::default(), &meta(1, 100, 3));
        assert_eq!(links.self_link.href, "http://127.0.0.1:5000/tv-shows");
        assert!(links.previous.is_none());
        assert!(links.next.is_none());
    }

    #[test]
    fn next_link_adds_page_even_when_not_supplied() {
        let supplied = ListingParams {
            page_size: Some("2".to_string()),
            ..Default::default()
        };
        let links = build_links(BASE, &supplied, &meta(1, 2, 5));
        assert_eq!(
            links.self_link.href,
            "http://127.0.0.1:5000/tv-shows?page_size=2"
        );
        assert_eq!(
            links.next.unwrap().href,
            "http://127.0.0.1:5000/tv-shows?page=2&page_size=2"
        );
        assert!(links.previous.is_none());
    }

    #[test]
    fn previous_link_replaces_page_and_keeps_param_order() {
        let supplied = ListingParams {
            order_by: Some("-id".to_string()),
            page: Some("3".to_string()),
            page_size: Some("1".to_string()),
            filter: Some("id,name".to_string()),
        };
        let links = build_links(BASE, &supplied, &meta(3, 1, 3));
        assert_eq!(
            links.previous.unwrap().href,
            "http://127.0.0.1:5000/tv-shows?order_by=-id&page=2&page_size=1&filter=id%2Cname"
        );
        assert!(links.next.is_none());
    }

    #[test]
    fn plus_prefix_is_percent_encoded() {
        let supplied = ListingParams {
            order_by: Some("+name".to_string()),
            ..Default::default()
        };
        let links = build_links(BASE, &supplied, &meta(1, 100, 1));
        assert_eq!(
            links.self_link.href,
            "http://127.0.0.1:5000/tv-shows?order_by=%2Bname"
        );
    }

    #[test]
    fn max_page_with_negative_size_omits_next() {
        let supplied = ListingParams {
            page: Some(i64::MAX.to_string()),
            page_size: Some("-1".to_string()),
            ..Default::default()
        };
        let links = build_links(BASE, &supplied, &meta(i64::MAX, -1, 3));
        assert!(links.next.is_none());
        assert_eq!(
            links.previous.unwrap().href,
            format!(
                "http://127.0.0.1:5000/tv-shows?page={}&page_size=-1",
                i64::MAX - 1
            )
        );
    }

    #[test]
    fn self_echoes_raw_page_value() {
        let supplied = ListingParams {
            page: Some("02".to_string()),
            page_size: Some("1".to_string()),
            ..Default::default()
        };
        let links = build_links(BASE, &supplied, &meta(2, 1, 5));
        assert_eq!(
            links.self_link.href,
            "http://127.0.0.1:5000/tv-shows?page=02&page_size=1"
        );
        assert_eq!(
            links.next.unwrap().href,
            "http://127.0.0.1:5000/tv-shows?page=3&page_size=1"
        );
    }
}
