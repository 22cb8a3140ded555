//! Paginated fetching of issue and release records from the GitHub REST API.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value;
use std::fs::File;
use std::future::Future;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ReportError, Result};

pub const API_BASE: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;
const USER_AGENT: &str = concat!("gitreports/", env!("CARGO_PKG_VERSION"));

/// Minimal client for the `repos/{owner}/{repo}/{endpoint}` listings.
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Build a client, authenticating with `token` when given.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ReportError::InvalidArgument(format!("GitHub token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint_url(&self, repo: &str, endpoint: &str) -> String {
        format!("{}/repos/{}/{}", self.base_url.trim_end_matches('/'), repo, endpoint)
    }

    /// Fetch a single page of an endpoint listing.
    pub async fn fetch_page(
        &self,
        repo: &str,
        endpoint: &str,
        params: &[(&str, &str)],
        page: u32,
    ) -> Result<Vec<Value>> {
        let url = self.endpoint_url(repo, endpoint);
        debug!("GET {} page {}", url, page);

        let page = page.to_string();
        let per_page = PER_PAGE.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("page", page.as_str()), ("per_page", per_page.as_str())])
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Vec<Value>>().await?)
    }

    /// Fetch every page of an endpoint listing.
    pub async fn fetch_all(
        &self,
        repo: &str,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<Value>> {
        fetch_all_pages(move |page| {
            info!("Processing {}, page {}...", endpoint, page);
            self.fetch_page(repo, endpoint, params, page)
        })
        .await
    }
}

/// Request pages starting at 1 until one comes back empty.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut records = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetch_page(page).await?;
        if batch.is_empty() {
            break;
        }
        records.extend(batch);
        page += 1;
    }
    Ok(records)
}

/// Write raw records as a JSON array, creating parent directories.
pub fn save_json(path: &Path, records: &[Value]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::RefCell;

    #[tokio::test]
    async fn test_fetch_all_pages_stops_on_empty_page() {
        let pages = vec![vec![1, 2, 3], vec![4], vec![]];
        let requested = RefCell::new(Vec::new());

        let records = fetch_all_pages(|page| {
            requested.borrow_mut().push(page);
            let batch = pages.get(page as usize - 1).cloned().unwrap_or_default();
            async move { Ok(batch) }
        })
        .await
        .unwrap();

        assert_eq!(records, vec![1, 2, 3, 4]);
        assert_eq!(requested.into_inner(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_all_pages_propagates_error() {
        let result: Result<Vec<u32>> = fetch_all_pages(|page| async move {
            if page == 1 {
                Ok(vec![7])
            } else {
                Err(ReportError::NoData("page failed".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(ReportError::NoData(_))));
    }

    #[test]
    fn test_endpoint_url() {
        let client = GitHubClient::new(None)
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            client.endpoint_url("Tribler/tribler", "releases"),
            "http://localhost:8080/repos/Tribler/tribler/releases"
        );
    }

    #[test]
    fn test_save_json_creates_directories() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("issues.json");

        save_json(&path, &[json!({"number": 1})]).unwrap();

        let saved: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, vec![json!({"number": 1})]);
    }
}
