use std::time::Duration;

use core_types::LookupKey;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::{FetchError, LookupSource, MatchMode};

#[derive(Serialize)]
struct CreateBody<'a> {
    value: &'a str,
}

/// [`LookupSource`] backed by the portal's `/api/lookup/{key}` endpoints.
///
/// `base` is the portal context URL, e.g. `http://ops.internal/portal`.
pub struct HttpLookupSource {
    base: Url,
    client: Client,
}

impl HttpLookupSource {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, FetchError> {
        let base = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent("PortalLookup/0.1")
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { base, client })
    }

    /// `{base}/api/lookup/{key}`, with the key percent-encoded as one segment.
    pub fn endpoint(&self, key: &LookupKey) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(["api", "lookup", key.as_str()]);
        Ok(url)
    }

    pub fn suggest_url(
        &self,
        key: &LookupKey,
        query: &str,
        limit: usize,
        mode: MatchMode,
    ) -> Result<Url, FetchError> {
        let mut url = self.endpoint(key)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query)
                .append_pair("limit", &limit.to_string());
            if mode == MatchMode::Contains {
                pairs.append_pair("contains", "true");
            }
        }
        Ok(url)
    }

    pub fn delete_url(&self, key: &LookupKey, value: &str) -> Result<Url, FetchError> {
        let mut url = self.endpoint(key)?;
        url.query_pairs_mut().append_pair("value", value);
        Ok(url)
    }
}

fn ensure_success(resp: Response) -> Result<Response, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    Ok(resp)
}

fn transport(e: reqwest::Error) -> FetchError {
    FetchError::Transport(e.to_string())
}

impl LookupSource for HttpLookupSource {
    fn suggest(
        &self,
        key: &LookupKey,
        query: &str,
        limit: usize,
        mode: MatchMode,
    ) -> Result<Vec<String>, FetchError> {
        let url = self.suggest_url(key, query, limit, mode)?;
        log::trace!(target: "lookup.net", "GET {url}");

        let resp = ensure_success(self.client.get(url).send().map_err(transport)?)?;
        let body = resp.text().map_err(transport)?;
        serde_json::from_str::<Vec<String>>(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn create(&self, key: &LookupKey, value: &str) -> Result<(), FetchError> {
        let url = self.endpoint(key)?;
        log::trace!(target: "lookup.net", "POST {url}");

        self.client
            .post(url)
            .json(&CreateBody { value })
            .send()
            .map_err(transport)
            .and_then(ensure_success)
            .map(|_| ())
    }

    fn delete(&self, key: &LookupKey, value: &str) -> Result<(), FetchError> {
        let url = self.delete_url(key, value)?;
        log::trace!(target: "lookup.net", "DELETE {url}");

        self.client
            .delete(url)
            .send()
            .map_err(transport)
            .and_then(ensure_success)
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn source(base: &str) -> HttpLookupSource {
        HttpLookupSource::new(base, Duration::from_secs(5)).unwrap()
    }

    /// Serve exactly one HTTP response; the handle yields the raw request.
    fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}/portal", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .filter_map(|l| l.split_once(':'))
                        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if raw.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&raw).to_string()
        });

        (base, handle)
    }

    #[test]
    fn endpoint_encodes_key_as_single_segment() {
        let src = source("http://ops.internal/portal/");
        let url = src.endpoint(&LookupKey::parse(Some("team a/b"))).unwrap();
        assert_eq!(url.as_str(), "http://ops.internal/portal/api/lookup/team%20a%2Fb");
    }

    #[test]
    fn suggest_url_adds_contains_only_for_open_search() {
        let src = source("http://ops.internal/portal");
        let key = LookupKey::default();

        let open = src.suggest_url(&key, "ab c", 8, MatchMode::Contains).unwrap();
        assert_eq!(open.query(), Some("q=ab+c&limit=8&contains=true"));

        let prefix = src.suggest_url(&key, "", 3, MatchMode::Prefix).unwrap();
        assert_eq!(prefix.query(), Some("q=&limit=3"));
    }

    #[test]
    fn delete_url_carries_value() {
        let src = source("http://ops.internal/portal");
        let url = src.delete_url(&LookupKey::default(), "x&y").unwrap();
        assert_eq!(url.path(), "/portal/api/lookup/default");
        assert_eq!(url.query(), Some("value=x%26y"));
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            HttpLookupSource::new("mailto:ops@example.com", Duration::from_secs(1)),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpLookupSource::new("not a url", Duration::from_secs(1)),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn search_decodes_string_array() {
        let (base, server) = serve_once("200 OK", r#"["Alpha","beta"]"#);
        let items = source(&base).search(&LookupKey::default(), "a", 8).unwrap();
        assert_eq!(items, vec!["Alpha".to_string(), "beta".to_string()]);

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /portal/api/lookup/default?q=a&limit=8&contains=true "));
    }

    #[test]
    fn search_reports_status_errors() {
        let (base, server) = serve_once("500 Internal Server Error", "[]");
        let err = source(&base).search(&LookupKey::default(), "a", 8).unwrap_err();
        assert_eq!(err, FetchError::Status(500));
        server.join().unwrap();
    }

    #[test]
    fn search_reports_decode_errors() {
        let (base, server) = serve_once("200 OK", r#"{"items":[]}"#);
        let err = source(&base).search(&LookupKey::default(), "a", 8).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        server.join().unwrap();
    }

    #[test]
    fn create_posts_json_value() {
        let (base, server) = serve_once("200 OK", r#"{"accepted":true}"#);
        source(&base).create(&LookupKey::parse(Some("env")), "Prod").unwrap();

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /portal/api/lookup/env "));
        assert!(request.ends_with(r#"{"value":"Prod"}"#));
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source(&format!("http://{addr}/portal"))
            .delete(&LookupKey::default(), "x")
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
