//! Build-time configuration
//!
//! [`SensorConfig`] carries the heartbeat identity and timing,
//! [`EthConfig`] the Ethernet bring-up policy. Both are `const` builders so a
//! firmware image can define them as statics:
//!
//! ```ignore
//! static SENSOR: SensorConfig = SensorConfig::new()
//!     .with_server("sensors.example.com", 18081)
//!     .with_api_key(env!("PB_API_KEY"))
//!     .with_building(3, "Liverpool")
//!     .with_sensor_uuid("esp32-liverpool-001");
//!
//! static ETH: EthConfig = EthConfig::new().with_preferred_phy(Some(PhyType::Ip101));
//! ```

use crate::boards::wt32_eth01::Wt32Eth01;
use crate::error::ConfigError;
use crate::profile::{MAX_PWR_EN_DELAY_MS, PhyProfile, PhyType, PowerEnable};

/// Lowest building id
pub const MIN_BUILDING_ID: u8 = 1;

/// Highest building id
pub const MAX_BUILDING_ID: u8 = 14;

/// Default heartbeat server port
pub const DEFAULT_SERVER_PORT: u16 = 18081;

/// Default heartbeat interval
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u32 = 10_000;

/// Default HTTP response timeout
pub const DEFAULT_HTTP_TIMEOUT_MS: u32 = 10_000;

// =============================================================================
// Sensor configuration
// =============================================================================

/// Heartbeat identity, endpoint and timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Server host name or dotted IP
    pub server_host: &'static str,
    /// Server TCP port
    pub server_port: u16,
    /// Shared secret sent with every heartbeat
    pub api_key: &'static str,
    /// Building id, 1..=14
    pub building_id: u8,
    /// Building name, for logs
    pub building_name: &'static str,
    /// Section within the building
    pub section_id: Option<u16>,
    /// Stable sensor identifier, also the DHCP hostname
    pub sensor_uuid: &'static str,
    /// Free-form note; empty means none
    pub comment: &'static str,
    /// Time between heartbeats
    pub heartbeat_interval_ms: u32,
    /// HTTP response timeout
    pub http_timeout_ms: u32,
}

impl SensorConfig {
    /// Configuration of the first Newcastle sensor.
    pub const fn new() -> Self {
        Self {
            server_host: "sensors-new-england.morgan-dev.com",
            server_port: DEFAULT_SERVER_PORT,
            api_key: "",
            building_id: 1,
            building_name: "Newcastle",
            section_id: Some(2),
            sensor_uuid: "esp32-newcastle-002",
            comment: "",
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }

    /// Set server host and port
    #[must_use]
    pub const fn with_server(mut self, host: &'static str, port: u16) -> Self {
        self.server_host = host;
        self.server_port = port;
        self
    }

    /// Set the API key
    #[must_use]
    pub const fn with_api_key(mut self, api_key: &'static str) -> Self {
        self.api_key = api_key;
        self
    }

    /// Set building id and name
    #[must_use]
    pub const fn with_building(mut self, id: u8, name: &'static str) -> Self {
        self.building_id = id;
        self.building_name = name;
        self
    }

    /// Set or clear the section id
    #[must_use]
    pub const fn with_section_id(mut self, section_id: Option<u16>) -> Self {
        self.section_id = section_id;
        self
    }

    /// Set the sensor UUID
    #[must_use]
    pub const fn with_sensor_uuid(mut self, uuid: &'static str) -> Self {
        self.sensor_uuid = uuid;
        self
    }

    /// Set the comment
    #[must_use]
    pub const fn with_comment(mut self, comment: &'static str) -> Self {
        self.comment = comment;
        self
    }

    /// Set the heartbeat interval
    #[must_use]
    pub const fn with_heartbeat_interval_ms(mut self, ms: u32) -> Self {
        self.heartbeat_interval_ms = ms;
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub const fn with_http_timeout_ms(mut self, ms: u32) -> Self {
        self.http_timeout_ms = ms;
        self
    }

    /// Comment, if non-empty
    pub const fn comment(&self) -> Option<&'static str> {
        if self.comment.is_empty() {
            None
        } else {
            Some(self.comment)
        }
    }

    /// Check the configuration
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.building_id < MIN_BUILDING_ID || self.building_id > MAX_BUILDING_ID {
            return Err(ConfigError::InvalidBuildingId);
        }
        if self.server_host.is_empty() || self.sensor_uuid.is_empty() {
            return Err(ConfigError::InvalidConfig);
        }
        if self.heartbeat_interval_ms == 0 || self.http_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Ethernet configuration
// =============================================================================

/// Ethernet bring-up policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EthConfig {
    /// Search profiles across reboots instead of using `fixed_profile`
    pub autoconfig: bool,
    /// Profile used when autoconfig is off
    pub fixed_profile: PhyProfile,
    /// PHY type to start the static catalogue from
    pub preferred_phy: Option<PhyType>,
    /// Enable the slow brute-force probe phase
    pub wide_detect: bool,
    /// Settle time applied by [`EthConfig::with_power_enable`]
    pub power_up_delay_ms: u16,
    /// Board name, for logs
    pub board_name: &'static str,
}

impl EthConfig {
    /// Autoconfig on, WT32-ETH01 as the fixed profile.
    pub const fn new() -> Self {
        Self {
            autoconfig: true,
            fixed_profile: Wt32Eth01::fixed_profile(),
            preferred_phy: None,
            wide_detect: false,
            power_up_delay_ms: Wt32Eth01::POWER_UP_DELAY_MS,
            board_name: Wt32Eth01::BOARD_NAME,
        }
    }

    /// Enable or disable autoconfig
    #[must_use]
    pub const fn with_autoconfig(mut self, enabled: bool) -> Self {
        self.autoconfig = enabled;
        self
    }

    /// Replace the fixed profile
    #[must_use]
    pub const fn with_fixed_profile(mut self, profile: PhyProfile) -> Self {
        self.fixed_profile = profile;
        self
    }

    /// Set the power-up delay used by later [`EthConfig::with_power_enable`] calls
    #[must_use]
    pub const fn with_power_up_delay_ms(mut self, ms: u16) -> Self {
        self.power_up_delay_ms = ms;
        self
    }

    /// Give the fixed profile a PHY power-enable strap
    #[must_use]
    pub const fn with_power_enable(mut self, pin: u8, active_high: bool) -> Self {
        let pwr = if active_high {
            PowerEnable::high(pin, self.power_up_delay_ms)
        } else {
            PowerEnable::low(pin, self.power_up_delay_ms)
        };
        self.fixed_profile = self.fixed_profile.with_power_enable(Some(pwr));
        self
    }

    /// Set the preferred PHY type hint
    #[must_use]
    pub const fn with_preferred_phy(mut self, phy: Option<PhyType>) -> Self {
        self.preferred_phy = phy;
        self
    }

    /// Enable or disable the wide probe phase
    #[must_use]
    pub const fn with_wide_detect(mut self, enabled: bool) -> Self {
        self.wide_detect = enabled;
        self
    }

    /// Set the board name
    #[must_use]
    pub const fn with_board_name(mut self, name: &'static str) -> Self {
        self.board_name = name;
        self
    }

    /// Check the configuration
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.power_up_delay_ms > MAX_PWR_EN_DELAY_MS {
            return Err(ConfigError::InvalidDelay);
        }
        self.fixed_profile.validate()
    }
}

impl Default for EthConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ClockMode;

    #[test]
    fn defaults() {
        let s = SensorConfig::new();
        assert_eq!(s.server_port, 18081);
        assert_eq!(s.heartbeat_interval_ms, 10_000);
        assert_eq!(s.http_timeout_ms, 10_000);
        assert_eq!((s.building_id, s.section_id), (1, Some(2)));
        assert_eq!(s.sensor_uuid, "esp32-newcastle-002");
        assert_eq!(s.comment(), None);
        assert_eq!(s.validate(), Ok(()));

        let e = EthConfig::new();
        let p = e.fixed_profile;
        assert_eq!((p.phy_addr, p.reset_pin, p.mdc_pin, p.mdio_pin), (1, Some(16), 23, 18));
        assert_eq!((p.phy_type, p.clock_mode), (PhyType::Lan8720, ClockMode::Gpio0In));
        assert_eq!(p.power_enable, None);
        assert_eq!(e.power_up_delay_ms, 150);
        assert_eq!(e.validate(), Ok(()));
    }

    #[test]
    fn building_id_range() {
        assert_eq!(
            SensorConfig::new().with_building(0, "x").validate(),
            Err(ConfigError::InvalidBuildingId)
        );
        assert_eq!(
            SensorConfig::new().with_building(15, "x").validate(),
            Err(ConfigError::InvalidBuildingId)
        );
        assert_eq!(SensorConfig::new().with_building(14, "Preston").validate(), Ok(()));
    }

    #[test]
    fn rejects_empty_identity_and_zero_timing() {
        assert!(SensorConfig::new().with_server("", 80).validate().is_err());
        assert!(SensorConfig::new().with_sensor_uuid("").validate().is_err());
        assert!(SensorConfig::new().with_heartbeat_interval_ms(0).validate().is_err());
        assert!(SensorConfig::new().with_http_timeout_ms(0).validate().is_err());
    }

    #[test]
    fn comment_is_optional() {
        assert_eq!(SensorConfig::new().with_comment("kv 123").comment(), Some("kv 123"));
    }

    #[test]
    fn power_enable_uses_configured_delay() {
        let e = EthConfig::new().with_power_up_delay_ms(200).with_power_enable(12, false);
        assert_eq!(e.fixed_profile.power_enable, Some(PowerEnable::low(12, 200)));

        let e = EthConfig::new().with_power_up_delay_ms(1001).with_power_enable(12, true);
        assert_eq!(e.validate(), Err(ConfigError::InvalidDelay));
    }

    #[test]
    fn power_up_delay_is_bounded_without_a_strap() {
        let e = EthConfig::new().with_power_up_delay_ms(1001);
        assert_eq!(e.fixed_profile.power_enable, None);
        assert_eq!(e.validate(), Err(ConfigError::InvalidDelay));
        assert_eq!(EthConfig::new().with_power_up_delay_ms(1000).validate(), Ok(()));
    }

    #[test]
    fn fixed_profile_clock_collision_is_rejected() {
        let p = PhyProfile::new("bad", 0, 17, 18, PhyType::Lan8720, ClockMode::Gpio17Out);
        assert_eq!(
            EthConfig::new().with_fixed_profile(p).validate(),
            Err(ConfigError::PinConflict)
        );
    }
}
