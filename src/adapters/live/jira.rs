//! Live adapter for the `IssueSearchClient` port using the Jira REST search API.

use reqwest::{Client, Proxy, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ExportConfig;
use crate::ports::search::{Issue, IssueSearchClient, SearchFuture, SearchPage, SearchRequest};

const SEARCH_PATH: &str = "rest/api/2/search";

/// Failures talking to the search endpoint. The underlying reqwest or serde
/// error stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum JiraClientError {
    /// The request could not be sent (DNS, connect, TLS, proxy).
    #[error("Jira search request to {url} failed")]
    Send {
        /// Endpoint that was called.
        url: Url,
        /// Transport error from the HTTP client.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read.
    #[error("Failed to read Jira search response")]
    Read(#[source] reqwest::Error),

    /// Jira answered with a non-success status.
    #[error("Jira search failed ({}): {message}", status.as_u16())]
    Status {
        /// HTTP status returned.
        status: StatusCode,
        /// Jira's error messages, or the raw body when unstructured.
        message: String,
    },

    /// A success response did not match the expected shape.
    #[error("Failed to parse Jira search response")]
    Parse(#[source] serde_json::Error),
}

/// Live Jira client authenticating with basic credentials.
pub struct LiveJiraClient {
    client: Client,
    search_url: Url,
    user: String,
    password: String,
}

impl LiveJiraClient {
    /// Creates a client for the instance described by `config`.
    ///
    /// A configured proxy is applied to both HTTP and HTTPS traffic. Proxy
    /// environment variables are never consulted.
    ///
    /// # Errors
    ///
    /// Returns an error if the proxy URL is invalid or the HTTP client cannot
    /// be built (e.g. TLS backend initialisation fails).
    pub fn new(config: &ExportConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let builder = match &config.proxy {
            Some(proxy) => {
                tracing::debug!(proxy = %proxy.url(), "using configured proxy");
                Client::builder().proxy(Proxy::all(proxy.url())?)
            }
            None => Client::builder().no_proxy(),
        };
        let client = builder.build()?;

        Ok(Self {
            client,
            search_url: search_url(&config.url)?,
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }
}

/// Joins the search endpoint onto the base URL, keeping any context path
/// (`https://host/jira` becomes `https://host/jira/rest/api/2/search`).
fn search_url(base: &Url) -> Result<Url, Box<dyn std::error::Error + Send + Sync>> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(SEARCH_PATH)?)
}

/// Request body sent to `POST /rest/api/2/search`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    jql: &'a str,
    start_at: usize,
    max_results: usize,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    fields: &'a [String],
}

/// Top-level response from the search endpoint.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    total: Option<usize>,
    #[serde(default)]
    issues: Vec<JiraIssue>,
}

/// One issue as returned by Jira.
#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    #[serde(default)]
    fields: JiraFields,
}

/// The subset of issue fields the export reads.
#[derive(Deserialize, Default)]
struct JiraFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Error response from the Jira REST API.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraError {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: serde_json::Map<String, serde_json::Value>,
}

impl JiraError {
    /// Flattens `errorMessages` and `errors` into one line, or `None` if both are empty.
    fn message(&self) -> Option<String> {
        let field_errors = self.errors.iter().map(|(field, value)| match value.as_str() {
            Some(text) => format!("{field}: {text}"),
            None => format!("{field}: {value}"),
        });
        let parts: Vec<String> = self.error_messages.iter().cloned().chain(field_errors).collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

impl From<JiraIssue> for Issue {
    fn from(issue: JiraIssue) -> Self {
        Self {
            key: issue.key,
            summary: issue.fields.summary.unwrap_or_default(),
            description: issue.fields.description,
        }
    }
}

impl IssueSearchClient for LiveJiraClient {
    fn search(&self, request: &SearchRequest) -> SearchFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = SearchBody {
                jql: &request.jql,
                start_at: request.start_at,
                max_results: request.max_results,
                fields: &request.fields,
            };

            let response = self
                .client
                .post(self.search_url.clone())
                .basic_auth(&self.user, Some(&self.password))
                .json(&body)
                .send()
                .await
                .map_err(|source| JiraClientError::Send { url: self.search_url.clone(), source })?;

            let status = response.status();
            let response_text = response.text().await.map_err(JiraClientError::Read)?;

            if !status.is_success() {
                let message = serde_json::from_str::<JiraError>(&response_text)
                    .ok()
                    .and_then(|e| e.message())
                    .unwrap_or(response_text);
                return Err(JiraClientError::Status { status, message }.into());
            }

            let parsed: SearchResponse =
                serde_json::from_str(&response_text).map_err(JiraClientError::Parse)?;

            Ok(SearchPage {
                total: parsed.total,
                issues: parsed.issues.into_iter().map(Issue::from).collect(),
            })
        })
    }
}
