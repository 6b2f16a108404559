//! HTTP access to the hosted backend's REST interface.
//!
//! Tables are exposed at `{base}/rest/v1/{table}`; filters travel as query
//! parameters and the API key is sent both as `apikey` and as a bearer token.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;
use url::Url;

use crate::config::{BackendConfig, Credentials};
use crate::error::{BoardError, Result};
use crate::metrics::MetricsCollector;
use crate::models::Row;
use crate::query::{Filter, SelectQuery, UpdateQuery};
use crate::repository::TableStore;

const REST_PATH: &str = "rest/v1/";

/// Client for a PostgREST endpoint
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_root: Url,
    api_key: String,
    metrics: MetricsCollector,
}

impl PostgrestClient {
    /// Build a client from validated credentials
    pub fn new(backend: &BackendConfig, credentials: &Credentials) -> Result<Self> {
        let rest_root = rest_root(&credentials.url)?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(backend.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            rest_root,
            api_key: credentials.api_key.clone(),
            metrics: MetricsCollector::default(),
        })
    }

    /// Tallies of the requests issued so far
    #[must_use]
    pub const fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Endpoint URL for `table` with the given select list and filters
    pub fn table_url(&self, table: &str, columns: Option<&str>, filters: &[Filter]) -> Result<Url> {
        let mut url = self.rest_root.join(table)?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(columns) = columns {
                pairs.append_pair("select", columns);
            }
            for filter in filters {
                let (column, expr) = filter.to_param();
                pairs.append_pair(&column, &expr);
            }
        }
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header("apikey", &self.api_key).bearer_auth(&self.api_key)
    }

    /// Authenticated `GET` for a select query
    pub fn select_request(&self, query: &SelectQuery) -> Result<reqwest::RequestBuilder> {
        let url = self.table_url(query.table_name(), Some(query.column_list()), query.filters())?;
        debug!(table = query.table_name(), %url, "GET");
        Ok(self.authorized(self.http.get(url)))
    }

    /// Authenticated `PATCH` for an update query; refuses updates without a filter
    pub fn update_request(&self, query: &UpdateQuery) -> Result<reqwest::RequestBuilder> {
        if query.filters().is_empty() {
            return Err(BoardError::UnfilteredUpdate(query.table_name().to_string()));
        }

        let url = self.table_url(query.table_name(), None, query.filters())?;
        debug!(table = query.table_name(), %url, "PATCH");
        Ok(self
            .authorized(self.http.patch(url))
            .header("Prefer", "return=minimal")
            .json(query.patch()))
    }
}

/// Normalise the configured base URL and append the REST prefix.
pub fn rest_root(base: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url.join(REST_PATH)?)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

fn status_error(status: reqwest::StatusCode, body: String) -> BoardError {
    BoardError::Status {
        status: status.as_u16(),
        body,
    }
}

#[async_trait]
impl TableStore for PostgrestClient {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Row>> {
        let request = self.select_request(query)?;

        let started = Instant::now();
        let outcome = async {
            let response = request.send().await?;
            let rows: Vec<Row> = check_status(response).await?.json().await?;
            Ok::<_, BoardError>(rows)
        }
        .await;

        self.metrics
            .record_request("select", query.table_name(), started.elapsed(), outcome.is_ok());
        if let Ok(rows) = &outcome {
            self.metrics.record_rows_fetched(query.table_name(), rows.len());
        }
        outcome
    }

    async fn update(&self, query: &UpdateQuery) -> Result<()> {
        let request = self.update_request(query)?;

        let started = Instant::now();
        let outcome = async {
            let response = request.send().await?;
            check_status(response).await?;
            Ok::<_, BoardError>(())
        }
        .await;

        self.metrics
            .record_request("update", query.table_name(), started.elapsed(), outcome.is_ok());
        if outcome.is_ok() {
            self.metrics.record_rows_updated(query.table_name(), 1);
        }
        outcome
    }
}
