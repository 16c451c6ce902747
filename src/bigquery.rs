//! Result fetcher backed by the BigQuery REST API.
//!
//! Issues a single synchronous `jobs.query` request against the result
//! store and materializes the full row set before returning. No retry
//! logic lives here; redelivery policy belongs to the triggering
//! infrastructure.

use crate::core::{FlaggedReport, ReportStore, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Default public endpoint of the BigQuery v2 REST API.
pub const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// A client for reading flagged reports through `jobs.query`.
pub struct BigQueryClient {
    http: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    timeout: Duration,
}

/// Shape of a `jobs.query` or `getQueryResults` response, reduced to the
/// fields this client reads.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default, rename = "jobComplete")]
    job_complete: bool,
    #[serde(default)]
    rows: Vec<QueryRow>,
    #[serde(rename = "pageToken")]
    page_token: Option<String>,
    #[serde(rename = "jobReference")]
    job_reference: Option<JobReference>,
}

#[derive(Debug, Deserialize)]
struct JobReference {
    #[serde(rename = "jobId")]
    job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryRow {
    #[serde(default)]
    f: Vec<QueryCell>,
}

#[derive(Debug, Deserialize)]
struct QueryCell {
    v: Option<String>,
}

impl BigQueryClient {
    /// Creates a new client against the given API base URL.
    ///
    /// The token, when present, is attached as a bearer credential; how it
    /// is obtained is outside the scope of this client.
    pub fn new(base_url: String, auth_token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            timeout: Duration::from_secs(30),
        }
    }
}

#[async_trait]
impl ReportStore for BigQueryClient {
    #[instrument(skip(self))]
    async fn fetch_flagged_reports(
        &self,
        table_id: &str,
    ) -> Result<Vec<FlaggedReport>, StoreError> {
        // The project segment of the fully-qualified table id addresses the
        // queries endpoint.
        let project = table_id.split('.').next().unwrap_or_default();
        let url = format!("{}/projects/{}/queries", self.base_url, project);
        let query = format!("SELECT flagged_table_name FROM `{}` ORDER BY 1", table_id);
        debug!(table = %table_id, "issuing flagged-report query");

        let mut request = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({ "query": query, "useLegacySql": false }));
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(table = %table_id, status = %status, body = %body, "query rejected");
            return Err(StoreError::Rejected { status, body });
        }

        let mut payload: QueryResponse = response.json().await?;
        if !payload.job_complete {
            return Err(StoreError::Response(
                "query job did not complete synchronously".to_string(),
            ));
        }

        let mut reports = rows_to_reports(std::mem::take(&mut payload.rows))?;

        // Large result sets arrive in pages; the contract is the fully
        // materialized row set, so follow the page token until exhausted.
        while let Some(token) = payload.page_token.take() {
            let job_id = payload
                .job_reference
                .as_ref()
                .and_then(|reference| reference.job_id.as_deref())
                .ok_or_else(|| {
                    StoreError::Response("paginated response is missing a job id".to_string())
                })?;
            debug!(table = %table_id, job = %job_id, "fetching next result page");

            let url = format!("{}/projects/{}/queries/{}", self.base_url, project, job_id);
            let mut request = self
                .http
                .get(&url)
                .timeout(self.timeout)
                .query(&[("pageToken", token.as_str())]);
            if let Some(auth) = &self.auth_token {
                request = request.bearer_auth(auth);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                error!(table = %table_id, status = %status, body = %body, "result page rejected");
                return Err(StoreError::Rejected { status, body });
            }

            let page: QueryResponse = response.json().await?;
            if !page.job_complete {
                return Err(StoreError::Response(
                    "result page reports an incomplete job".to_string(),
                ));
            }
            reports.extend(rows_to_reports(page.rows)?);
            payload.page_token = page.page_token;
        }

        Ok(reports)
    }
}

fn rows_to_reports(rows: Vec<QueryRow>) -> Result<Vec<FlaggedReport>, StoreError> {
    rows.into_iter()
        .map(|row| {
            row.f
                .into_iter()
                .next()
                .and_then(|cell| cell.v)
                .map(|name| FlaggedReport {
                    flagged_table_name: name,
                })
                .ok_or_else(|| {
                    StoreError::Response("row is missing flagged_table_name".to_string())
                })
        })
        .collect()
}
