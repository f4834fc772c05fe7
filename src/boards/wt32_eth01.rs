//! WT32-ETH01 board configuration (ESP32 + LAN8720A).
//!
//! The reference wiring the fixed (non-autoconfig) bring-up and the first
//! static catalogue entries are modelled on. Clones called "ESP32-ETH01"
//! diverge on almost every line of this table, which is what the
//! autoconfiguration engine is for.

use crate::profile::{ClockMode, PhyProfile, PhyType};

/// WT32-ETH01 board configuration constants and helpers.
pub struct Wt32Eth01;

impl Wt32Eth01 {
    // =========================================================================
    // PHY Configuration
    // =========================================================================

    /// PHY address (PHYAD0 is pulled HIGH on WT32-ETH01).
    pub const PHY_ADDR: u8 = 1;

    /// Expected PHY ID (LAN8720A = 0x0007C0Fx).
    pub const PHY_ID: u32 = 0x0007_C0F0;

    /// PHY ID mask (ignores revision nibble).
    pub const PHY_ID_MASK: u32 = 0xFFFF_FFF0;

    // =========================================================================
    // SMI (MDIO) Pins
    // =========================================================================

    /// MDC (Management Data Clock) GPIO.
    pub const MDC_GPIO: u8 = 23;

    /// MDIO (Management Data I/O) GPIO.
    pub const MDIO_GPIO: u8 = 18;

    // =========================================================================
    // Clock and power
    // =========================================================================

    /// Reference clock input GPIO (50 MHz from external oscillator).
    pub const REF_CLK_GPIO: u8 = 0;

    /// Oscillator enable, passed to the platform driver as its power/reset pin.
    pub const CLK_EN_GPIO: u8 = 16;

    /// Settle time after asserting a power-enable strap (milliseconds).
    pub const POWER_UP_DELAY_MS: u16 = 150;

    // =========================================================================
    // Board Identification
    // =========================================================================

    /// Board name.
    pub const BOARD_NAME: &'static str = "WT32-ETH01";

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Check if a PHY ID pair matches the expected LAN8720A pattern.
    #[inline]
    pub const fn is_lan8720a(id1: u16, id2: u16) -> bool {
        let id = (id1 as u32) << 16 | id2 as u32;
        (id & Self::PHY_ID_MASK) == Self::PHY_ID
    }

    /// Profile used when autoconfig is disabled.
    #[must_use]
    pub const fn fixed_profile() -> PhyProfile {
        PhyProfile::new(
            "wt32-eth01",
            Self::PHY_ADDR,
            Self::MDC_GPIO,
            Self::MDIO_GPIO,
            PhyType::Lan8720,
            ClockMode::Gpio0In,
        )
        .with_reset_pin(Some(Self::CLK_EN_GPIO))
    }
}
