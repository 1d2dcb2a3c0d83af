use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use url::Url;

pub const LIMIT_PARAM: &str = "limit";
pub const OFFSET_PARAM: &str = "offset";

/// Page window requested through `?limit=&offset=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl LimitOffset {
    /// `None` unless `limit` is a positive integer. A missing, malformed or
    /// negative `offset` falls back to 0.
    pub fn from_query(query: &HashMap<String, String>) -> Option<Self> {
        let limit = query
            .get(LIMIT_PARAM)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)?;

        let offset = query
            .get(OFFSET_PARAM)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|offset| *offset >= 0)
            .unwrap_or(0);

        Some(LimitOffset { limit, offset })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// `request_url` is the absolute URL of the current request; the links
    /// keep its other query parameters.
    pub fn new(results: Vec<T>, count: i64, page: LimitOffset, request_url: &Url) -> Self {
        Paginated {
            count,
            next: next_link(request_url, page, count),
            previous: previous_link(request_url, page),
            results,
        }
    }
}

fn next_link(url: &Url, page: LimitOffset, count: i64) -> Option<String> {
    if page.offset.saturating_add(page.limit) >= count {
        return None;
    }
    Some(rewrite_query(url, &[
        (LIMIT_PARAM, Some(page.limit)),
        (OFFSET_PARAM, Some(page.offset + page.limit)),
    ]))
}

fn previous_link(url: &Url, page: LimitOffset) -> Option<String> {
    if page.offset <= 0 {
        return None;
    }
    let offset = page.offset - page.limit;
    Some(rewrite_query(url, &[
        (LIMIT_PARAM, Some(page.limit)),
        (OFFSET_PARAM, (offset > 0).then_some(offset)),
    ]))
}

/// Sets (or removes, on `None`) the given parameters and re-emits the query
/// sorted by key.
fn rewrite_query(url: &Url, changes: &[(&str, Option<i64>)]) -> String {
    let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url.query_pairs() {
        params.entry(key.into_owned()).or_default().push(value.into_owned());
    }

    for (key, value) in changes {
        match value {
            Some(v) => params.insert(key.to_string(), vec![v.to_string()]),
            None => params.remove(*key),
        };
    }

    let mut link = url.clone();
    link.set_fragment(None);
    if params.is_empty() {
        link.set_query(None);
    } else {
        let mut pairs = link.query_pairs_mut();
        pairs.clear();
        for (key, values) in &params {
            for value in values {
                pairs.append_pair(key, value);
            }
        }
    }
    link.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn no_limit_means_no_pagination() {
        assert_eq!(LimitOffset::from_query(&query(&[])), None);
        assert_eq!(LimitOffset::from_query(&query(&[("offset", "4")])), None);
        assert_eq!(LimitOffset::from_query(&query(&[("limit", "0")])), None);
        assert_eq!(LimitOffset::from_query(&query(&[("limit", "-2")])), None);
        assert_eq!(LimitOffset::from_query(&query(&[("limit", "ten")])), None);
    }

    #[test]
    fn bad_offsets_fall_back_to_zero() {
        for offset in ["-1", "abc", ""] {
            let page = LimitOffset::from_query(&query(&[("limit", "2"), ("offset", offset)]));
            assert_eq!(page, Some(LimitOffset { limit: 2, offset: 0 }));
        }
    }

    #[test]
    fn first_page_has_next_but_no_previous() {
        let page = LimitOffset { limit: 2, offset: 0 };
        let envelope = Paginated::new(vec!["a", "b"], 3, page, &url("http://testserver/api/projects?limit=2"));

        assert_eq!(envelope.count, 3);
        assert_eq!(envelope.next.as_deref(), Some("http://testserver/api/projects?limit=2&offset=2"));
        assert_eq!(envelope.previous, None);
        assert_eq!(envelope.results, vec!["a", "b"]);
    }

    #[test]
    fn last_page_has_previous_without_offset() {
        let page = LimitOffset { limit: 2, offset: 2 };
        let envelope = Paginated::new(vec!["c"], 3, page, &url("http://testserver/api/projects?offset=2&limit=2"));

        assert_eq!(envelope.next, None);
        assert_eq!(envelope.previous.as_deref(), Some("http://testserver/api/projects?limit=2"));
    }

    #[test]
    fn middle_page_links_both_ways_and_keeps_other_params() {
        let page = LimitOffset { limit: 2, offset: 4 };
        let envelope: Paginated<()> = Paginated::new(
            vec![],
            10,
            page,
            &url("http://testserver/api/projects?limit=2&offset=4&format=json"),
        );

        assert_eq!(
            envelope.next.as_deref(),
            Some("http://testserver/api/projects?format=json&limit=2&offset=6")
        );
        assert_eq!(
            envelope.previous.as_deref(),
            Some("http://testserver/api/projects?format=json&limit=2&offset=2")
        );
    }

    #[test]
    fn offset_past_the_end_still_links_back() {
        let page = LimitOffset { limit: 5, offset: 20 };
        let envelope: Paginated<()> = Paginated::new(vec![], 3, page, &url("http://testserver/api/projects?limit=5&offset=20"));

        assert_eq!(envelope.next, None);
        assert_eq!(
            envelope.previous.as_deref(),
            Some("http://testserver/api/projects?limit=5&offset=15")
        );
    }

    #[test]
    fn envelope_serializes_null_links() {
        let page = LimitOffset { limit: 10, offset: 0 };
        let envelope = Paginated::new(vec![1, 2], 2, page, &url("http://testserver/api/projects?limit=10"));
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json, serde_json::json!({
            "count": 2,
            "next": null,
            "previous": null,
            "results": [1, 2]
        }));
    }
}
