//! PB Ethernet heartbeat sensor
//!
//! A `no_std` firmware core for ESP32 Ethernet boards that reports "power is
//! on" to a central server with a periodic HTTP heartbeat.
//!
//! Cheap ESP32 Ethernet clones disagree on PHY model, PHY address, SMI pins,
//! RMII clock source and power/reset straps. The crate finds a working
//! combination by itself, one attempt per boot, and remembers it.
//!
//! # Architecture
//!
//! 1. **Profiles** ([`profile`]): static catalogue and probe-derived dynamic
//!    catalogue of PHY bring-up recipes
//! 2. **Probe** ([`probe`]): management-bus scan for any responding PHY
//! 3. **Autoconfig** ([`autoconfig`]): cross-reboot profile search with
//!    retained session state and a sticky preference ([`persist`])
//! 4. **Link** ([`link`]): network event handling and the `online` flag
//! 5. **Heartbeat** ([`heartbeat`], [`sensor`]): JSON POST every interval,
//!    outcome shown on an [`indicator`]
//!
//! The register-level SMI host in [`hal`] drives the ESP32 EMAC just far
//! enough to read PHY identifiers. The full MAC/PHY driver, TCP client and
//! preference store belong to the platform and plug in through the traits in
//! [`platform`], [`heartbeat`] and [`persist`].
//!
//! # Features
//!
//! - `esp32` (default): Target the original ESP32
//! - `log` (default): Log through the `log` facade
//! - `defmt`: Log through `defmt` instead
//! - `esp-hal`: Restart, clock and delay from esp-hal
//!
//! # Example
//!
//! ```ignore
//! use pb_eth_sensor::{Autoconfig, EthConfig, LinkSupervisor, SensorConfig, Sensor, SetupOutcome};
//! use pb_eth_sensor::hal::{Esp32Gpio, Esp32Smi};
//! use pb_eth_sensor::indicator::NoIndicator;
//! use pb_eth_sensor::integration::esp_hal::{Delay, EspClock, EspRestart};
//! use pb_eth_sensor::persist::RetainedSessionStore;
//!
//! static SENSOR: SensorConfig = SensorConfig::new().with_api_key(env!("PB_API_KEY"));
//! static ETH: EthConfig = EthConfig::new();
//! static LINK: LinkSupervisor = LinkSupervisor::new(SENSOR.sensor_uuid);
//!
//! // Network event callback: LINK.handle_event(event, &mut netif);
//!
//! pb_eth_sensor::sensor::log_banner(&SENSOR, &ETH);
//! let mut autoconfig = Autoconfig::new(
//!     &ETH,
//!     Esp32Smi::new(Delay::new()),
//!     Esp32Gpio,
//!     Delay::new(),
//!     RetainedSessionStore::new(),
//!     nvs_preferences,
//! )
//! .expect("invalid Ethernet config");
//! autoconfig.setup_ethernet(&mut eth, &LINK, &mut EspRestart);
//!
//! let mut sensor = Sensor::new(&SENSOR, &LINK, &mut eth, tcp_client, NoIndicator, EspClock, Delay::new())
//!     .expect("invalid sensor config");
//! loop {
//!     autoconfig.commit_on_link_up(&LINK);
//!     sensor.tick();
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]
#[cfg(not(feature = "esp32"))]
compile_error!("Feature 'esp32' must be enabled. It is on by default.");

// Logging shims must come first so the macros are visible to every module
#[macro_use]
mod fmt;

#[cfg(test)]
extern crate std;

// =============================================================================
// Modules
// =============================================================================

pub mod autoconfig;
pub mod boards;
pub mod config;
pub mod error;
pub mod hal;
pub mod heartbeat;
pub mod indicator;
pub mod link;
pub mod persist;
pub mod platform;
pub mod probe;
pub mod profile;
pub mod sensor;
pub mod sync;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "esp-hal")]
#[cfg_attr(docsrs, doc(cfg(feature = "esp-hal")))]
pub mod integration;

// Test utilities (only available during testing)
#[cfg(test)]
pub mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use autoconfig::{Action, Autoconfig, AutoconfigSession, BootReport, ProfileSource, SetupOutcome};
pub use config::{EthConfig, SensorConfig};
pub use error::{ConfigError, Error, HttpError, IoError, LinkError, Result, StoreError};
pub use link::{IpInfo, LinkSupervisor, NetEvent};
pub use profile::{ClockMode, PhyProfile, PhyType, PowerEnable};
pub use sensor::{Sensor, Tick};
