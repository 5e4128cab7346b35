//! Outbound HTTP transport.
//!
//! Just GET requests with a browser user agent. Non-success statuses are
//! errors; nothing is retried at this layer.

use crate::config::Config;
use crate::constants::MAX_REDIRECTS;
use crate::error::{AppError, Result};
use crate::extension::{infer_extension, ExtensionSource};
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::HeaderMap;
use std::time::Duration;

/// A successful GET response, fully buffered.
#[derive(Debug, Clone, Default)]
pub struct FetchedResponse {
    /// Final URL after redirects.
    pub final_url: String,
    /// Response headers, names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FetchedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded with the `content-type` charset, UTF-8 when none is
    /// declared or the label is unknown. A byte order mark wins over both.
    pub fn text(&self) -> String {
        let encoding = self
            .header("content-type")
            .and_then(charset_param)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);

        let (text, _, _) = encoding.decode(&self.body);
        text.into_owned()
    }

    pub fn extension(&self) -> ExtensionSource {
        infer_extension(
            self.header("content-disposition"),
            self.header("content-type"),
            &self.final_url,
        )
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<FetchedResponse>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedResponse> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        let final_url = resp.url().to_string();
        if !status.is_success() {
            return Err(AppError::UpstreamStatus {
                url: final_url,
                status: status.as_u16(),
            });
        }

        let headers = collect_headers(resp.headers());

        let body = resp.bytes().await?.to_vec();
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchedResponse {
            final_url,
            headers,
            body,
        })
    }
}

fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

// Non-ASCII bytes become U+FFFD rather than dropping the whole value, so an
// ASCII extension at the end of a filename survives.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let resp = FetchedResponse {
            final_url: "http://x/img".to_string(),
            headers: vec![("content-type".to_string(), "image/png".to_string())],
            body: vec![],
        };
        assert_eq!(resp.header("Content-Type"), Some("image/png"));
        assert_eq!(resp.header("content-disposition"), None);
        assert_eq!(resp.extension().extension(), Some(".png"));
    }

    #[test]
    fn text_uses_declared_latin1_charset() {
        let resp = FetchedResponse {
            final_url: "http://x/aleatorio".to_string(),
            headers: vec![(
                "content-type".to_string(),
                "text/html; charset=ISO-8859-1".to_string(),
            )],
            body: b"<img title=\"Canci\xF3n\">".to_vec(),
        };
        assert_eq!(resp.text(), "<img title=\"Canción\">");
    }

    #[test]
    fn text_defaults_to_utf8() {
        let resp = FetchedResponse {
            final_url: "http://x/".to_string(),
            headers: vec![("content-type".to_string(), "text/html".to_string())],
            body: "Canción".as_bytes().to_vec(),
        };
        assert_eq!(resp.text(), "Canción");

        let unknown = FetchedResponse {
            headers: vec![(
                "content-type".to_string(),
                "text/html; charset=\"x-klingon\"".to_string(),
            )],
            ..resp
        };
        assert_eq!(unknown.text(), "Canción");
    }

    #[test]
    fn charset_param_is_case_insensitive_and_unquoted() {
        assert_eq!(
            charset_param("text/html; Charset=\"windows-1252\"").as_deref(),
            Some("windows-1252")
        );
        assert_eq!(charset_param("text/html"), None);
    }

    #[test]
    fn non_ascii_header_keeps_extension() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "content-disposition",
            reqwest::header::HeaderValue::from_bytes(b"attachment; filename=\"canci\xF3n.gif\"")
                .unwrap(),
        );

        let resp = FetchedResponse {
            final_url: "http://x/raw".to_string(),
            headers: collect_headers(&headers),
            body: vec![],
        };
        assert_eq!(
            resp.extension(),
            ExtensionSource::HeaderFilename(".gif".to_string())
        );
    }
}
