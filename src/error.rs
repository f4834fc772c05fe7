//! Error types for the sensor firmware core
//!
//! Errors are organized by domain, one enum per tier that handles them:
//! - [`ConfigError`]: build-time configuration and MAC/SMI bring-up failures
//! - [`IoError`]: MDIO bus and platform I/O failures
//! - [`LinkError`]: PHY attach and DHCP failures
//! - [`HttpError`]: heartbeat delivery failures
//! - [`StoreError`]: retained / non-volatile storage failures
//!
//! The unified [`Error`] enum wraps all domain errors. Nothing in the crate
//! recovers by panicking; each tier decides what a failure means for it.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and bring-up errors
///
/// Returned by configuration validation and by the SMI host when the MAC
/// cannot be brought up far enough to talk to the management bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid configuration parameter
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// GPIO number not usable for the requested function
    InvalidPin,
    /// Reference clock output pin collides with MDC or MDIO
    PinConflict,
    /// Building id outside 1..=14
    InvalidBuildingId,
    /// Power-enable settle delay above 1000 ms
    InvalidDelay,
    /// Clock configuration error
    ClockError,
    /// MAC software reset did not complete (usually no reference clock)
    ResetFailed,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidPin => "invalid GPIO for function",
            ConfigError::PinConflict => "clock output pin collides with MDC/MDIO",
            ConfigError::InvalidBuildingId => "building id out of range",
            ConfigError::InvalidDelay => "power-up delay out of range",
            ConfigError::ClockError => "clock configuration error",
            ConfigError::ResetFailed => "MAC software reset failed",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Bus-level I/O errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Operation timed out
    Timeout,
    /// Invalid state for operation (e.g. SMI not attached)
    InvalidState,
    /// PHY communication error (MDIO failure)
    PhyError,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "operation timed out",
            IoError::InvalidState => "invalid state for operation",
            IoError::PhyError => "PHY communication error",
        }
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// Link acquisition errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// MAC/PHY attach did not succeed
    PhyInitFailure,
    /// MAC is up but no address was leased in time
    DhcpTimeout,
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LinkError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LinkError::PhyInitFailure => "PHY init failed",
            LinkError::DhcpTimeout => "DHCP timeout",
        }
    }
}

// =============================================================================
// HTTP Errors
// =============================================================================

/// Heartbeat delivery errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HttpError {
    /// TCP connect to the server failed
    Connect,
    /// No response within the configured timeout
    Timeout,
    /// Server answered with a non-200 status
    Status(u16),
    /// Status line could not be parsed
    Malformed,
    /// Request did not fit the request buffer
    RequestTooLarge,
}

impl core::fmt::Display for HttpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HttpError::Status(code) => write!(f, "HTTP status {code}"),
            HttpError::Connect => f.write_str("connect failed"),
            HttpError::Timeout => f.write_str("response timeout"),
            HttpError::Malformed => f.write_str("malformed status line"),
            HttpError::RequestTooLarge => f.write_str("request too large"),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Persistent storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Store could not be opened
    Unavailable,
    /// Stored value has the wrong shape
    Corrupt,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            StoreError::Unavailable => "store unavailable",
            StoreError::Corrupt => "stored value corrupt",
        })
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::ResetFailed)) => { /* no reference clock */ }
///     Err(Error::Io(IoError::Timeout)) => { /* MDIO busy */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// I/O error
    Io(IoError),
    /// Link error
    Link(LinkError),
    /// HTTP error
    Http(HttpError),
    /// Storage error
    Store(StoreError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {e}"),
            Error::Io(e) => write!(f, "io: {e}"),
            Error::Link(e) => write!(f, "link: {e}"),
            Error::Http(e) => write!(f, "http: {e}"),
            Error::Store(e) => write!(f, "store: {e}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}

impl From<HttpError> for Error {
    fn from(e: HttpError) -> Self {
        Error::Http(e)
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Error::Store(e)
    }
}

/// Result type alias for crate operations
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn domain_errors_convert_into_unified_error() {
        let e: Error = ConfigError::ResetFailed.into();
        assert_eq!(e, Error::Config(ConfigError::ResetFailed));

        let e: Error = HttpError::Status(503).into();
        assert_eq!(e, Error::Http(HttpError::Status(503)));
    }

    #[test]
    fn display_prefixes_domain() {
        assert_eq!(
            Error::from(IoError::Timeout).to_string(),
            "io: operation timed out"
        );
        assert_eq!(
            Error::from(HttpError::Status(404)).to_string(),
            "http: HTTP status 404"
        );
        assert_eq!(
            Error::from(LinkError::DhcpTimeout).to_string(),
            "link: DHCP timeout"
        );
    }
}
