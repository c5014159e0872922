use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};

/// One page of a paginated listing: the records plus the link to the next
/// page, if any.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub results: Vec<Value>,
    #[serde(default)]
    pub next: Option<String>,
}

pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<Page>;
}

/// Blocking HTTP page source
pub struct HttpPageSource {
    client: reqwest::blocking::Client,
}

impl HttpPageSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("holo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(&self, url: &str) -> Result<Page> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch {}", url))?
            .error_for_status()
            .with_context(|| format!("Request to {} was rejected", url))?;

        response
            .json::<Page>()
            .with_context(|| format!("Unexpected page format from {}", url))
    }
}

/// Follow `next` links from `start_url` and collect every record. Any page
/// failure aborts the whole extraction.
pub fn fetch_all(source: &dyn PageSource, start_url: &str) -> Result<Vec<Value>> {
    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut url = Some(start_url.to_string());

    info!(url = start_url, "starting extraction");
    while let Some(current) = url {
        if !seen.insert(current.clone()) {
            anyhow::bail!("Pagination loops back to {}", current);
        }
        let page = source.fetch_page(&current)?;
        debug!(url = %current, records = page.results.len(), "fetched page");
        records.extend(page.results);
        url = page.next.filter(|next| !next.is_empty());
    }

    info!(
        records = records.len(),
        pages = seen.len(),
        "extraction complete"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct FakeApi {
        pages: HashMap<String, Page>,
    }

    impl PageSource for FakeApi {
        fn fetch_page(&self, url: &str) -> Result<Page> {
            self.pages
                .get(url)
                .cloned()
                .with_context(|| format!("404 for {}", url))
        }
    }

    fn page(names: &[&str], next: Option<&str>) -> Page {
        Page {
            results: names.iter().map(|n| json!({ "name": n })).collect(),
            next: next.map(str::to_string),
        }
    }

    #[test]
    fn follows_next_links_until_the_end() {
        let api = FakeApi {
            pages: HashMap::from([
                ("p1".to_string(), page(&["Luke", "C-3PO"], Some("p2"))),
                ("p2".to_string(), page(&["R2-D2"], Some("p3"))),
                ("p3".to_string(), page(&["Leia"], None)),
            ]),
        };

        let records = fetch_all(&api, "p1").unwrap();
        let names: Vec<&str> = records.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["Luke", "C-3PO", "R2-D2", "Leia"]);
    }

    #[test]
    fn failing_page_aborts_extraction() {
        let api = FakeApi {
            pages: HashMap::from([("p1".to_string(), page(&["Luke"], Some("gone")))]),
        };
        let err = fetch_all(&api, "p1").unwrap_err();
        assert!(err.to_string().contains("404 for gone"));
    }

    #[test]
    fn pagination_cycles_are_detected() {
        let api = FakeApi {
            pages: HashMap::from([
                ("p1".to_string(), page(&["Luke"], Some("p2"))),
                ("p2".to_string(), page(&["Leia"], Some("p1"))),
            ]),
        };
        assert!(fetch_all(&api, "p1").is_err());
    }

    #[test]
    fn page_deserializes_from_api_shape() {
        let body = r#"{"count": 82, "next": null, "previous": null, "results": [{"name": "Luke"}]}"#;
        let page: Page = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 1);
        assert!(page.next.is_none());
    }
}
