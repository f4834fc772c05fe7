//! External stack integrations
//!
//! - **esp-hal** (`esp_hal`): restart primitive, system clock and delay.
//!   Requires the `esp-hal` feature.
//!
//! The Ethernet driver, TCP client and preference store come from the
//! application's network stack and plug in through
//! [`crate::platform::EthDriver`], [`crate::heartbeat::HeartbeatTransport`]
//! and [`crate::persist::PreferenceStore`].

#[cfg(feature = "esp-hal")]
pub mod esp_hal;
