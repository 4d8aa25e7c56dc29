use crate::{
    config::ApiConfig,
    error::{NetworkSnafu, NotABaseSnafu, StatusSnafu, TransportError},
};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use snafu::ResultExt;
use std::fmt::Debug;
use url::Url;

/// One HTTP round trip against the student API.
///
/// `segments` are appended to the configured base URL, each one percent-encoded as a single path
/// segment, so ids containing `/`, `?` or `#` stay inside their segment.
#[async_trait]
pub trait Transport: Debug + Send + Sync {
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: config.url().clone(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        {
            let Ok(mut path) = url.path_segments_mut() else {
                return NotABaseSnafu {
                    url: self.base_url.to_string(),
                }
                .fail();
            };
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "Sending request to student API");

        let mut request = self.http_client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .context(NetworkSnafu {
                url: url.to_string(),
            })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context(NetworkSnafu {
                url: url.to_string(),
            })?;
        let payload = decode_body(&bytes);

        if !status.is_success() {
            warn!(%method, %url, %status, %payload, "Student API returned an error");
            return StatusSnafu { status, payload }.fail();
        }

        Ok(payload)
    }
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }

    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
