pub mod tabular;

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, PRAGMA, USER_AGENT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use tabular::{load_schedule, parse_schedule};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Every way a load can fail. Callers degrade to a placeholder on any of them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source reference: {reference}")]
    InvalidReference { reference: String },

    #[error("request to {source_ref} failed: {source}")]
    Transport {
        source_ref: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{source_ref} answered with status {status}")]
    Status { source_ref: String, status: u16 },

    #[error("failed to read {source_ref}: {source}")]
    Io {
        source_ref: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {source_ref}: {message}")]
    Parse { source_ref: String, message: String },
}

/// Where relative source references are resolved from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Base {
    Url(Url),
    Dir(PathBuf),
}

impl Base {
    /// `http(s)` values become URL bases, anything else is a directory.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match Url::parse(trimmed) {
            Ok(url) if is_http(&url) => {
                let mut url = url;
                if !url.path().ends_with('/') {
                    let path = format!("{}/", url.path());
                    url.set_path(&path);
                }
                Self::Url(url)
            }
            _ => Self::Dir(PathBuf::from(trimmed)),
        }
    }
}

/// A resolved data source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceRef {
    Remote(Url),
    Local(PathBuf),
}

impl SourceRef {
    pub fn resolve(reference: &str, base: Option<&Base>) -> Result<Self, FetchError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(FetchError::InvalidReference {
                reference: reference.to_string(),
            });
        }
        if let Ok(url) = Url::parse(reference) {
            if is_http(&url) {
                return Ok(Self::Remote(url));
            }
        }
        match base {
            Some(Base::Url(base)) => base
                .join(reference)
                .map(Self::Remote)
                .map_err(|_| FetchError::InvalidReference {
                    reference: reference.to_string(),
                }),
            Some(Base::Dir(dir)) => Ok(Self::Local(dir.join(reference))),
            None => Ok(Self::Local(PathBuf::from(reference))),
        }
    }

    pub fn remote(url: &str) -> Result<Self, FetchError> {
        Url::parse(url)
            .ok()
            .filter(is_http)
            .map(Self::Remote)
            .ok_or_else(|| FetchError::InvalidReference {
                reference: url.to_string(),
            })
    }

    pub fn local(path: impl AsRef<Path>) -> Self {
        Self::Local(path.as_ref().to_path_buf())
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Appends the cache-busting `t=<unix millis>` query parameter.
pub fn with_cache_bust(url: &Url, millis: i64) -> Url {
    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .append_pair("t", &millis.to_string());
    busted
}

/// The I/O seam of the pipeline: turns a source reference into text.
pub trait Fetcher {
    fn fetch_text(&self, source: &SourceRef)
        -> impl Future<Output = Result<String, FetchError>>;
}

#[derive(Clone, Debug)]
pub struct FetchOptions {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept: Option<String>,
    pub cache_bust: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: None,
            cache_bust: true,
        }
    }
}

/// reqwest-backed fetcher. Local references are read from disk.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    cache_bust: bool,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&options.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        if let Some(accept) = options.accept.as_deref() {
            if let Ok(value) = HeaderValue::from_str(accept) {
                headers.insert(ACCEPT, value);
            }
        }
        if options.cache_bust {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        }
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;
        Ok(Self {
            client,
            cache_bust: options.cache_bust,
        })
    }

    async fn get_remote(&self, url: &Url) -> Result<String, FetchError> {
        let target = if self.cache_bust {
            with_cache_bust(url, chrono::Utc::now().timestamp_millis())
        } else {
            url.clone()
        };
        let source_ref = url.to_string();
        log::debug!("GET {target}");
        let resp = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                source_ref: source_ref.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                source_ref,
                status: status.as_u16(),
            });
        }
        resp.text()
            .await
            .map_err(|source| FetchError::Transport { source_ref, source })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, source: &SourceRef) -> Result<String, FetchError> {
        match source {
            SourceRef::Remote(url) => self.get_remote(url).await,
            SourceRef::Local(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        source_ref: path.display().to_string(),
                        source,
                    })
            }
        }
    }
}

/// Loads a JSON catalog: a top-level array, or an object wrapping it in
/// `items`. An object without `items` is an empty catalog.
pub async fn load_json<R, F>(fetcher: &F, source: &SourceRef) -> Result<Vec<R>, FetchError>
where
    R: DeserializeOwned,
    F: Fetcher,
{
    let text = fetcher.fetch_text(source).await?;
    parse_json_records(&text, &source.to_string())
}

pub fn parse_json_records<R: DeserializeOwned>(
    text: &str,
    source_ref: &str,
) -> Result<Vec<R>, FetchError> {
    let parse_err = |message: String| FetchError::Parse {
        source_ref: source_ref.to_string(),
        message,
    };
    let value: Value = serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?;
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => match map.remove("items") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(items) => items,
        },
        other => {
            return Err(parse_err(format!(
                "expected an array or an object with items, got {}",
                json_kind(&other)
            )))
        }
    };
    serde_json::from_value(list).map_err(|e| parse_err(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{FetchError, Fetcher, SourceRef};

    /// In-memory fetcher keyed by the display form of the source reference.
    #[derive(Default)]
    pub(crate) struct StaticFetcher {
        bodies: HashMap<String, Result<String, u16>>,
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl StaticFetcher {
        pub(crate) fn with(mut self, source: &str, body: &str) -> Self {
            self.bodies
                .insert(source.to_string(), Ok(body.to_string()));
            self
        }

        pub(crate) fn failing(mut self, source: &str, status: u16) -> Self {
            self.bodies.insert(source.to_string(), Err(status));
            self
        }
    }

    impl Fetcher for StaticFetcher {
        async fn fetch_text(&self, source: &SourceRef) -> Result<String, FetchError> {
            let key = source.to_string();
            self.requests.borrow_mut().push(key.clone());
            match self.bodies.get(&key) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(FetchError::Status {
                    source_ref: key,
                    status: *status,
                }),
                None => Err(FetchError::Status {
                    source_ref: key,
                    status: 404,
                }),
            }
        }
    }
}
