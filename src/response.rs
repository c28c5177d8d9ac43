use log::{debug, warn};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;

use crate::error::{Error, Result};

/// A response exactly as the transport handed it over, body still unread.
pub struct RawResponse<R> {
    pub status: StatusCode,
    pub status_line: String,
    pub headers: HeaderMap,
    pub body: R,
}

impl<R: Read> RawResponse<R> {
    /// Raw response whose status line is derived from `status`.
    pub fn new(status: StatusCode, headers: HeaderMap, body: R) -> Self {
        RawResponse::with_reason(status, None, headers, body)
    }

    /// Raw response keeping the reason phrase the server actually sent.
    pub fn with_reason(
        status: StatusCode,
        reason: Option<&str>,
        headers: HeaderMap,
        body: R,
    ) -> Self {
        RawResponse {
            status,
            status_line: status_line(status, reason),
            headers,
            body,
        }
    }
}

impl From<reqwest::blocking::Response> for RawResponse<reqwest::blocking::Response> {
    fn from(resp: reqwest::blocking::Response) -> Self {
        let status = resp.status();
        let headers = resp.headers().clone();
        // hyper only records the phrase when it differs from the canonical one
        let reason = resp
            .extensions()
            .get::<hyper::ext::ReasonPhrase>()
            .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
            .map(str::to_owned);
        RawResponse::with_reason(status, reason.as_deref(), headers, resp)
    }
}

/// Status line in the `"404 Not Found"` form. `reason` wins over the
/// canonical phrase when given.
pub fn status_line(status: StatusCode, reason: Option<&str>) -> String {
    match reason.or_else(|| status.canonical_reason()) {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

/// Statuses in `[200, 400)` count as success, redirects included.
pub fn is_success(status: StatusCode) -> bool {
    (200..400).contains(&status.as_u16())
}

/// A classified API response: status, headers and the raw body.
#[derive(Clone, Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Response {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Body as text, invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decodes the `response` member of the API's `{"meta", "response"}`
    /// envelope.
    pub fn result<T: DeserializeOwned>(&self) -> Result<T> {
        let envelope: Envelope<T> = serde_json::from_slice(&self.body)?;
        Ok(envelope.response)
    }
}

/// Turns the outcome of one HTTP round-trip into a [`Response`].
///
/// A transport error is returned as is, without touching the body. Otherwise
/// the whole body is read, and the status decides between success and
/// [`Error::Status`], which still carries headers and body. The body reader
/// is dropped on every path.
pub fn classify<R: Read>(raw: Result<RawResponse<R>>) -> Result<Response> {
    let RawResponse {
        status,
        status_line,
        headers,
        mut body,
    } = raw?;

    let mut bytes = Vec::new();
    if let Err(source) = body.read_to_end(&mut bytes) {
        return Err(Error::Read { source, headers });
    }
    drop(body);

    let response = Response::new(status, headers, bytes);
    if !is_success(status) {
        warn!("request failed: {}", status_line);
        return Err(Error::Status {
            status_line,
            response,
        });
    }
    debug!("response {} ({} bytes)", status_line, response.body.len());
    Ok(response)
}
