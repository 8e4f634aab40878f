use std::sync::Arc;
use std::time::Duration;

use flowinsight_auth::SessionManager;
use flowinsight_config::Config;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::retry::RetryPolicy;

/// Per-call request options. Defaults to a `GET` with no body and no extra
/// headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(Method::POST)
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header that overrides any default of the same name
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }
}

/// Authenticated JSON client for the FlowInsight backend.
///
/// Every call carries the current session's bearer header. A 401 tears the
/// session down and fails with [`ApiError::Unauthorized`] without retrying;
/// other failures are retried according to the [`RetryPolicy`].
#[derive(Clone)]
pub struct RequestClient {
    http_client: Client,
    base_url: String,
    session: Arc<SessionManager>,
    retry: RetryPolicy,
}

impl RequestClient {
    /// Create a client with a default HTTP client and retry policy
    pub fn new(base_url: impl Into<String>, session: Arc<SessionManager>) -> Self {
        Self::with_client(Client::new(), base_url, session, RetryPolicy::default())
    }

    pub fn with_client(
        http_client: Client,
        base_url: impl Into<String>,
        session: Arc<SessionManager>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            retry,
        }
    }

    /// Create a client using URL, timeouts and retry policy from `config`
    pub fn from_config(config: &Config, session: Arc<SessionManager>) -> ApiResult<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(
            http_client,
            config.api_base_url.clone(),
            session,
            RetryPolicy::from_config(config),
        ))
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform an API call and decode the JSON response into `T`.
    ///
    /// Attempts are strictly sequential. Only the error of the final
    /// attempt is returned.
    pub async fn execute<T>(&self, path: &str, options: RequestOptions) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        let body = options
            .body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;

        let url = url.as_str();
        let options = &options;
        let body = body.as_deref();
        let mut attempt = 0u32;

        backoff::future::retry_notify(
            self.retry.backoff(),
            move || {
                attempt += 1;
                let attempt = attempt;
                async move {
                    debug!(
                        "{} {} (attempt {}/{})",
                        options.method,
                        url,
                        attempt,
                        self.retry.max_attempts()
                    );
                    self.send_once(url, options, body).await.map_err(|error| {
                        if self.retry.is_retryable(&error) {
                            backoff::Error::transient(error)
                        } else {
                            backoff::Error::permanent(error)
                        }
                    })
                }
            },
            |error: ApiError, delay: Duration| {
                warn!("Request to {} failed ({}), retrying in {:?}", url, error, delay);
            },
        )
        .await
    }

    /// One attempt: send, classify, decode
    async fn send_once<T>(
        &self,
        url: &str,
        options: &RequestOptions,
        body: Option<&[u8]>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let mut request = self
            .http_client
            .request(options.method.clone(), url)
            .headers(self.build_headers(&options.headers));
        if let Some(body) = body {
            request = request.body(body.to_vec());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::InvalidRequest(e.to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend rejected credential for {}; logging out", url);
            self.session.logout().await;
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            return Err(ApiError::HttpStatus {
                code: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("Failed to read response body: {}", e)))?;

        // An empty body decodes as JSON null
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &bytes
        };

        serde_json::from_slice(payload).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    /// Content type, then session credential, then caller headers
    fn build_headers(&self, extra: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        merge_headers(&mut headers, &self.session.auth_headers());
        merge_headers(&mut headers, extra);
        headers
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

/// Overlay `overrides` onto `base`. A name present in `overrides` replaces
/// every value `base` had for it; multi-valued overrides are kept intact.
pub(crate) fn merge_headers(base: &mut HeaderMap, overrides: &HeaderMap) {
    for name in overrides.keys() {
        base.remove(name);
    }
    for (name, value) in overrides {
        base.append(name.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::{ACCEPT, AUTHORIZATION};

    #[test]
    fn test_merge_headers_overrides_by_name() {
        let mut base = HeaderMap::new();
        base.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        base.insert(AUTHORIZATION, HeaderValue::from_static("Bearer a"));

        let mut overrides = HeaderMap::new();
        overrides.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        overrides.append(ACCEPT, HeaderValue::from_static("application/json"));
        overrides.append(ACCEPT, HeaderValue::from_static("text/csv"));

        merge_headers(&mut base, &overrides);

        assert_eq!(base.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(base.get(AUTHORIZATION).unwrap(), "Bearer a");
        assert_eq!(base.get_all(ACCEPT).iter().count(), 2);
    }

    #[test]
    fn test_request_options_defaults_to_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
        assert!(options.headers.is_empty());
    }

    #[test]
    fn test_request_options_json_body() {
        let options = RequestOptions::post()
            .json(&serde_json::json!({ "ok": true }))
            .unwrap();
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.body, Some(serde_json::json!({ "ok": true })));
    }
}
