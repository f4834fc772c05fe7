//! Heartbeat delivery
//!
//! One heartbeat is one short HTTP POST. The server treats a missing
//! heartbeat as a power cut, so delivery is fire-and-forget: a failed send is
//! not retried until the next interval.
//!
//! # Modules
//!
//! - [`payload`]: JSON body
//! - [`http`]: request rendering and status line parsing

pub mod http;
pub mod payload;

use crate::config::SensorConfig;
use crate::error::HttpError;

pub use http::{HEARTBEAT_PATH, is_success, parse_status_line, render_post};
pub use payload::HeartbeatPayload;

/// TCP client used for one request/response exchange.
pub trait HeartbeatTransport {
    /// Connect to `host:port`, send `request` and read the first response
    /// line into `status_line`, then close the connection.
    ///
    /// Returns the status line length. Fails with [`HttpError::Connect`] when
    /// the connection cannot be opened and [`HttpError::Timeout`] when no
    /// response arrives within `timeout_ms`.
    fn exchange(
        &mut self,
        host: &str,
        port: u16,
        request: &[u8],
        timeout_ms: u32,
        status_line: &mut [u8],
    ) -> Result<usize, HttpError>;
}

impl<T: HeartbeatTransport + ?Sized> HeartbeatTransport for &mut T {
    fn exchange(
        &mut self,
        host: &str,
        port: u16,
        request: &[u8],
        timeout_ms: u32,
        status_line: &mut [u8],
    ) -> Result<usize, HttpError> {
        T::exchange(self, host, port, request, timeout_ms, status_line)
    }
}

/// Send one heartbeat. `Ok` carries the 200 status code.
pub fn send_heartbeat<T: HeartbeatTransport + ?Sized>(
    config: &SensorConfig,
    transport: &mut T,
) -> Result<u16, HttpError> {
    let mut body = [0u8; payload::MAX_BODY_LEN];
    let len = HeartbeatPayload::from_config(config).write_json(&mut body)?;
    let body = &body[..len];
    info!(
        "Heartbeat payload: {}",
        core::str::from_utf8(body).unwrap_or("<non-utf8>")
    );

    let request = render_post(config.server_host, HEARTBEAT_PATH, body)?;
    info!("Connecting to {}:{}", config.server_host, config.server_port);

    let mut line = [0u8; http::MAX_STATUS_LINE_LEN];
    let n = transport.exchange(
        config.server_host,
        config.server_port,
        &request,
        config.http_timeout_ms,
        &mut line,
    )?;
    let line = line.get(..n).ok_or(HttpError::Malformed)?;
    info!("Response: {}", core::str::from_utf8(line).unwrap_or("<non-utf8>").trim_end());

    let code = parse_status_line(line)?;
    if is_success(code) {
        Ok(code)
    } else {
        Err(HttpError::Status(code))
    }
}

/// Interval timer for heartbeats.
///
/// The first check is always due. Every attempt restarts the interval,
/// whatever its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeartbeatScheduler {
    interval_ms: u32,
    last_send: Option<u64>,
}

impl HeartbeatScheduler {
    /// Create a scheduler that has never sent.
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_send: None,
        }
    }

    /// Whether a heartbeat is due at `now_ms`.
    pub const fn is_due(&self, now_ms: u64) -> bool {
        match self.last_send {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms as u64,
        }
    }

    /// Record an attempt at `now_ms`.
    pub fn record_attempt(&mut self, now_ms: u64) {
        self.last_send = Some(now_ms);
    }

    /// Time of the last attempt
    pub const fn last_send(&self) -> Option<u64> {
        self.last_send
    }

    /// Configured interval
    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}
