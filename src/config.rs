//! Export configuration loaded from a Java-style properties file.
//!
//! ```text
//! jira.url=https://your-project.atlassian.net
//! jira.user=someone@example.com
//! jira.password=api-token
//! jira.query=status != Done ORDER BY key
//! #proxy.host=proxy.example.com
//! #proxy.port=8080
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::{BoxError, Error, Result};
use crate::search::DEFAULT_PAGE_SIZE;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "jiraexport.properties";

/// Proxy port used when `proxy.host` is set without `proxy.port`.
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// HTTP proxy to route tracker traffic through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy host name or address.
    pub host: String,
    /// Proxy port.
    pub port: u16,
}

impl ProxyConfig {
    /// Proxy URL in `http://host:port` form, used for both HTTP and HTTPS.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Everything needed to run one export.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Base URL of the Jira instance.
    pub url: Url,
    /// Login user.
    pub user: String,
    /// Password or API token for `user`.
    pub password: String,
    /// JQL selecting the issues to export.
    pub query: String,
    /// Optional proxy for all tracker requests.
    pub proxy: Option<ProxyConfig>,
    /// Issues requested per search page.
    pub page_size: usize,
}

impl std::fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportConfig")
            .field("url", &self.url.as_str())
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("query", &self.query)
            .field("proxy", &self.proxy)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl ExportConfig {
    /// Reads and validates the properties file at `path`.
    ///
    /// Keys and values are split on the first `=`, `:` or whitespace, with
    /// backslash escapes and line continuations handled as in Java.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a required
    /// key is missing, or if a value is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let read_err = |source: BoxError| Error::ConfigRead { path: path.to_path_buf(), source };
        let file = File::open(path).map_err(|e| read_err(e.into()))?;
        let properties =
            java_properties::read(BufReader::new(file)).map_err(|e| read_err(e.into()))?;
        tracing::debug!(path = %path.display(), keys = properties.len(), "loaded configuration");
        Self::from_properties(&properties, path)
    }

    /// Builds a config from already-parsed properties.
    ///
    /// `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or a value is malformed.
    pub fn from_properties(properties: &HashMap<String, String>, source: &Path) -> Result<Self> {
        let props = Properties { map: properties, source };

        let raw_url = props.required("jira.url")?;
        let user = props.required("jira.user")?;
        let password = props.required("jira.password")?;
        let query = props.required("jira.query")?;

        let url = Url::parse(raw_url).map_err(|e| props.invalid("jira.url", raw_url, e))?;

        let proxy = match props.optional("proxy.host") {
            Some(host) => {
                let port = match props.optional("proxy.port") {
                    Some(raw) => raw.parse().map_err(|e| props.invalid("proxy.port", raw, e))?,
                    None => DEFAULT_PROXY_PORT,
                };
                Some(ProxyConfig { host: host.to_string(), port })
            }
            None => None,
        };

        let page_size = match props.optional("jira.page_size") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                Ok(_) => return Err(props.invalid("jira.page_size", raw, "must be at least 1")),
                Err(e) => return Err(props.invalid("jira.page_size", raw, e)),
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            url,
            user: user.to_string(),
            password: password.to_string(),
            query: query.to_string(),
            proxy,
            page_size,
        })
    }
}

struct Properties<'a> {
    map: &'a HashMap<String, String>,
    source: &'a Path,
}

impl Properties<'_> {
    fn required(&self, key: &'static str) -> Result<&str> {
        self.map
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingConfig { key, path: self.source_path() })
    }

    fn optional(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    fn invalid(&self, key: &'static str, value: &str, reason: impl std::fmt::Display) -> Error {
        Error::InvalidConfig {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
            path: self.source_path(),
        }
    }

    fn source_path(&self) -> PathBuf {
        self.source.to_path_buf()
    }
}
