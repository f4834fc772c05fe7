//! HTTP/1.1 framing for the heartbeat POST
//!
//! Only what one request needs: render the request head plus body into a
//! bounded buffer, and pull the status code out of the response status line.
//! The response body is not read.

use core::fmt::Write as _;

use heapless::{String, Vec};

use crate::error::HttpError;

/// Heartbeat endpoint path
pub const HEARTBEAT_PATH: &str = "/api/v1/heartbeat";

/// Capacity of a rendered request.
pub const MAX_REQUEST_LEN: usize = 768;

/// Capacity of a captured status line.
pub const MAX_STATUS_LINE_LEN: usize = 128;

/// A rendered request.
pub type Request = Vec<u8, MAX_REQUEST_LEN>;

/// Render `POST <path>` with a JSON `body`.
///
/// The body is followed by CRLF, which `Content-Length` does not count.
pub fn render_post(host: &str, path: &str, body: &[u8]) -> Result<Request, HttpError> {
    let mut head: String<MAX_REQUEST_LEN> = String::new();
    write!(
        head,
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Content-Type: application/json\r\n\
         Connection: close\r\n\
         Content-Length: {}\r\n\
         \r\n",
        body.len()
    )
    .map_err(|_| HttpError::RequestTooLarge)?;

    let mut request = Request::new();
    for part in [head.as_bytes(), body, &b"\r\n"[..]] {
        request
            .extend_from_slice(part)
            .map_err(|()| HttpError::RequestTooLarge)?;
    }
    Ok(request)
}

/// Status code of an HTTP/1.x status line such as `HTTP/1.1 200 OK`.
///
/// A trailing CR or LF is ignored.
pub fn parse_status_line(line: &[u8]) -> Result<u16, HttpError> {
    let line = core::str::from_utf8(line).map_err(|_| HttpError::Malformed)?;
    let mut parts = line.trim_end_matches(['\r', '\n']).splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::Malformed);
    }
    let code = parts.next().ok_or(HttpError::Malformed)?;
    if code.len() != 3 {
        return Err(HttpError::Malformed);
    }
    code.parse().map_err(|_| HttpError::Malformed)
}

/// Whether `code` counts as a delivered heartbeat.
#[inline]
pub const fn is_success(code: u16) -> bool {
    code == 200
}
