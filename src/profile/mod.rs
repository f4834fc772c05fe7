//! PHY Profiles
//!
//! A [`PhyProfile`] describes one candidate hardware configuration of an
//! RMII Ethernet board: which PHY chip sits at which management address, on
//! which MDC/MDIO pins, where the 50 MHz reference clock comes from, and
//! which pins must be strapped before the MAC may start.
//!
//! Clones of the common ESP32 Ethernet boards diverge on any of these, so the
//! autoconfiguration engine walks an ordered list of profiles:
//!
//! - [`catalog`]: the hand-curated static list, ordered likeliest first
//! - [`dynamic`]: a short list synthesised from an MDIO probe hit

pub mod catalog;
pub mod dynamic;

pub use catalog::{PROFILESET_VERSION, STATIC_PROFILES, first_index_of_type};
pub use dynamic::{DYNAMIC_MAX, DynamicCatalog};

use embedded_hal::digital::PinState;

use crate::error::ConfigError;
use crate::hal::mdio::MAX_PHY_ADDR;

/// Longest power-enable settle delay a profile may request.
pub const MAX_PWR_EN_DELAY_MS: u16 = 1000;

// =============================================================================
// PHY chip model
// =============================================================================

/// PHY chip model handed to the platform's MAC/PHY attach routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhyType {
    /// Microchip/SMSC LAN8720(A)
    Lan8720,
    /// IC+ IP101 (driver-compatible with TI TLK110)
    Ip101,
    /// Realtek RTL8201
    Rtl8201,
    /// TI DP83848
    Dp83848,
    /// Micrel KSZ8041
    Ksz8041,
    /// Micrel KSZ8081
    Ksz8081,
    /// Davicom DM9051 (SPI)
    Dm9051,
}

impl PhyType {
    /// Short name used in log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            PhyType::Lan8720 => "LAN8720",
            PhyType::Ip101 => "IP101/TLK110",
            PhyType::Rtl8201 => "RTL8201",
            PhyType::Dp83848 => "DP83848",
            PhyType::Ksz8041 => "KSZ8041",
            PhyType::Ksz8081 => "KSZ8081",
            PhyType::Dm9051 => "DM9051",
        }
    }
}

impl core::fmt::Display for PhyType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RMII reference clock
// =============================================================================

/// Source of the 50 MHz RMII reference clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    /// External oscillator fed into GPIO0
    #[default]
    Gpio0In,
    /// Internal APLL clock driven out of GPIO0
    Gpio0Out,
    /// Internal APLL clock driven out of GPIO16
    Gpio16Out,
    /// Internal APLL clock (inverted) driven out of GPIO17
    Gpio17Out,
}

impl ClockMode {
    /// All clock modes, in probe order for the common SMI pins.
    pub const ALL: [ClockMode; 4] = [
        ClockMode::Gpio0In,
        ClockMode::Gpio0Out,
        ClockMode::Gpio17Out,
        ClockMode::Gpio16Out,
    ];

    /// The GPIO this mode drives as a clock output, if it is an output mode.
    ///
    /// GPIO0 is excluded: it never carries SMI on any known board and is
    /// occupied in both directions anyway.
    pub const fn output_pin(self) -> Option<u8> {
        match self {
            ClockMode::Gpio16Out => Some(16),
            ClockMode::Gpio17Out => Some(17),
            ClockMode::Gpio0In | ClockMode::Gpio0Out => None,
        }
    }

    /// Whether using this mode would drive a clock onto `mdc` or `mdio`.
    pub const fn collides_with(self, mdc: u8, mdio: u8) -> bool {
        match self.output_pin() {
            Some(pin) => pin == mdc || pin == mdio,
            None => false,
        }
    }

    /// Short name used in log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            ClockMode::Gpio0In => "GPIO0_IN",
            ClockMode::Gpio0Out => "GPIO0_OUT",
            ClockMode::Gpio16Out => "GPIO16_OUT",
            ClockMode::Gpio17Out => "GPIO17_OUT",
        }
    }
}

impl core::fmt::Display for ClockMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Power enable strap
// =============================================================================

/// Board-level PHY power-enable strap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerEnable {
    /// GPIO driving the enable line
    pub pin: u8,
    /// `true` if the line is active-high
    pub active_high: bool,
    /// Settle time after asserting, in milliseconds (0..=1000)
    pub delay_ms: u16,
}

impl PowerEnable {
    /// Active-high enable on `pin`, settling for `delay_ms`.
    pub const fn high(pin: u8, delay_ms: u16) -> Self {
        Self {
            pin,
            active_high: true,
            delay_ms,
        }
    }

    /// Active-low enable on `pin`, settling for `delay_ms`.
    pub const fn low(pin: u8, delay_ms: u16) -> Self {
        Self {
            pin,
            active_high: false,
            delay_ms,
        }
    }

    /// Pin level that asserts the enable.
    pub const fn level(&self) -> PinState {
        if self.active_high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

// =============================================================================
// Profile
// =============================================================================

/// One candidate hardware configuration. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyProfile {
    /// Human-readable label for logs
    pub label: &'static str,
    /// PHY management address (0..=31)
    pub phy_addr: u8,
    /// Active-low PHY reset GPIO, if wired
    pub reset_pin: Option<u8>,
    /// SMI clock GPIO
    pub mdc_pin: u8,
    /// SMI data GPIO
    pub mdio_pin: u8,
    /// PHY chip model
    pub phy_type: PhyType,
    /// Reference clock source
    pub clock_mode: ClockMode,
    /// Power-enable strap, if any
    pub power_enable: Option<PowerEnable>,
}

impl PhyProfile {
    /// Create a profile with no reset pin and no power-enable strap.
    pub const fn new(
        label: &'static str,
        phy_addr: u8,
        mdc_pin: u8,
        mdio_pin: u8,
        phy_type: PhyType,
        clock_mode: ClockMode,
    ) -> Self {
        Self {
            label,
            phy_addr,
            reset_pin: None,
            mdc_pin,
            mdio_pin,
            phy_type,
            clock_mode,
            power_enable: None,
        }
    }

    /// Set the active-low reset pin.
    #[must_use]
    pub const fn with_reset_pin(mut self, pin: Option<u8>) -> Self {
        self.reset_pin = pin;
        self
    }

    /// Set the power-enable strap.
    #[must_use]
    pub const fn with_power_enable(mut self, power_enable: Option<PowerEnable>) -> Self {
        self.power_enable = power_enable;
        self
    }

    /// Reset pin that must be released separately from the power enable.
    ///
    /// Returns `None` when the reset line is the power-enable line itself.
    pub const fn distinct_reset_pin(&self) -> Option<u8> {
        match (self.reset_pin, self.power_enable) {
            (Some(reset), Some(pwr)) if reset == pwr.pin => None,
            (reset, _) => reset,
        }
    }

    /// Check the profile's structural constraints.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.phy_addr > MAX_PHY_ADDR {
            return Err(ConfigError::InvalidPhyAddress);
        }
        if self.mdc_pin == self.mdio_pin {
            return Err(ConfigError::InvalidPin);
        }
        if self.clock_mode.collides_with(self.mdc_pin, self.mdio_pin) {
            return Err(ConfigError::PinConflict);
        }
        if let Some(pwr) = self.power_enable {
            if pwr.delay_ms > MAX_PWR_EN_DELAY_MS {
                return Err(ConfigError::InvalidDelay);
            }
        }
        Ok(())
    }
}

impl core::fmt::Display for PhyProfile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_out_collision() {
        assert!(ClockMode::Gpio16Out.collides_with(16, 2));
        assert!(ClockMode::Gpio16Out.collides_with(23, 16));
        assert!(ClockMode::Gpio17Out.collides_with(17, 23));
        assert!(!ClockMode::Gpio17Out.collides_with(16, 32));
        assert!(!ClockMode::Gpio0In.collides_with(16, 17));
        assert!(!ClockMode::Gpio0Out.collides_with(16, 17));
    }

    #[test]
    fn power_enable_levels() {
        assert_eq!(PowerEnable::high(16, 250).level(), PinState::High);
        assert_eq!(PowerEnable::low(16, 250).level(), PinState::Low);
    }

    #[test]
    fn reset_shared_with_power_enable_is_not_distinct() {
        let base = PhyProfile::new("t", 0, 23, 18, PhyType::Lan8720, ClockMode::Gpio0In);
        assert_eq!(base.distinct_reset_pin(), None);

        let reset5 = base.with_reset_pin(Some(5));
        assert_eq!(reset5.distinct_reset_pin(), Some(5));

        let shared = base
            .with_reset_pin(Some(16))
            .with_power_enable(Some(PowerEnable::high(16, 250)));
        assert_eq!(shared.distinct_reset_pin(), None);

        let split = base
            .with_reset_pin(Some(5))
            .with_power_enable(Some(PowerEnable::high(16, 250)));
        assert_eq!(split.distinct_reset_pin(), Some(5));
    }

    #[test]
    fn validate_rejects_bad_profiles() {
        let ok = PhyProfile::new("t", 1, 23, 18, PhyType::Lan8720, ClockMode::Gpio0In);
        assert_eq!(ok.validate(), Ok(()));

        let bad_addr = PhyProfile { phy_addr: 32, ..ok };
        assert_eq!(bad_addr.validate(), Err(ConfigError::InvalidPhyAddress));

        let same_pins = PhyProfile { mdio_pin: 23, ..ok };
        assert_eq!(same_pins.validate(), Err(ConfigError::InvalidPin));

        let conflict = PhyProfile::new("t", 0, 16, 2, PhyType::Lan8720, ClockMode::Gpio16Out);
        assert_eq!(conflict.validate(), Err(ConfigError::PinConflict));

        let slow = ok.with_power_enable(Some(PowerEnable::high(16, 1001)));
        assert_eq!(slow.validate(), Err(ConfigError::InvalidDelay));
    }
}
