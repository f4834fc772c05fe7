//! MDIO (Management Data Input/Output) HAL
//!
//! Clause 22 register access to Ethernet PHYs through the EMAC's built-in
//! SMI master.

use embedded_hal::delay::DelayNs;

use crate::error::{ConfigError, IoError, Result};
use crate::internal::register::mac::{GMACMIIADDR_GB, MacRegs, mii_address_word};

// =============================================================================
// MDIO Constants
// =============================================================================

/// Default MDIO operation timeout in microseconds
pub const MDIO_TIMEOUT_US: u32 = 1_000;

/// Maximum valid PHY address (5-bit field)
pub const MAX_PHY_ADDR: u8 = 31;

/// Maximum valid register address (5-bit field)
pub const MAX_REG_ADDR: u8 = 31;

/// MDC clock divider values based on system clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MdcClockDivider {
    /// Clock/42 (60-100 MHz system clock)
    Div42 = 0,
    /// Clock/62 (100-150 MHz system clock)
    Div62 = 1,
    /// Clock/16 (20-35 MHz system clock)
    Div16 = 2,
    /// Clock/26 (35-60 MHz system clock)
    Div26 = 3,
    /// Clock/102 (150-250 MHz system clock)
    #[default]
    Div102 = 4,
    /// Clock/124 (250-300 MHz system clock)
    Div124 = 5,
}

impl MdcClockDivider {
    /// Pick the divider that keeps MDC at or below 2.5 MHz.
    pub const fn from_sys_clock_hz(sys_clk_hz: u32) -> Self {
        if sys_clk_hz < 35_000_000 {
            Self::Div16
        } else if sys_clk_hz < 60_000_000 {
            Self::Div26
        } else if sys_clk_hz < 100_000_000 {
            Self::Div42
        } else if sys_clk_hz < 150_000_000 {
            Self::Div62
        } else if sys_clk_hz < 250_000_000 {
            Self::Div102
        } else {
            Self::Div124
        }
    }

    /// Get the divider value for register programming
    pub const fn to_reg_value(self) -> u32 {
        self as u32
    }
}

// =============================================================================
// MDIO Bus Trait
// =============================================================================

/// Trait for MDIO bus operations
///
/// Implemented by the register-backed [`MdioController`] and by the host-side
/// mocks, so probing logic runs unchanged in tests.
pub trait MdioBus {
    /// Read a PHY register
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16>;

    /// Write a PHY register
    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()>;

    /// Check if the MDIO bus is busy
    fn is_busy(&self) -> bool;
}

impl<T: MdioBus + ?Sized> MdioBus for &mut T {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        T::read(self, phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        T::write(self, phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        T::is_busy(self)
    }
}

const fn check_addresses(phy_addr: u8, reg_addr: u8) -> Result<()> {
    if phy_addr > MAX_PHY_ADDR {
        return Err(crate::error::Error::Config(ConfigError::InvalidPhyAddress));
    }
    if reg_addr > MAX_REG_ADDR {
        return Err(crate::error::Error::Config(ConfigError::InvalidConfig));
    }
    Ok(())
}

// =============================================================================
// MDIO Controller
// =============================================================================

/// Register-backed MDIO master
///
/// Only meaningful while the EMAC is clocked and out of reset; see
/// [`crate::hal::smi::Esp32Smi`].
#[derive(Debug)]
pub struct MdioController<D: DelayNs> {
    clock_divider: MdcClockDivider,
    delay: D,
    timeout_us: u32,
}

impl<D: DelayNs> MdioController<D> {
    /// Create a controller with the default divider
    pub fn new(delay: D) -> Self {
        Self::with_clock_divider(delay, MdcClockDivider::default())
    }

    /// Create a controller with a custom clock divider
    pub fn with_clock_divider(delay: D, divider: MdcClockDivider) -> Self {
        Self {
            clock_divider: divider,
            timeout_us: MDIO_TIMEOUT_US,
            delay,
        }
    }

    /// Set the operation timeout
    pub fn set_timeout_us(&mut self, timeout_us: u32) {
        self.timeout_us = timeout_us;
    }

    /// Access the delay provider
    pub fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    fn wait_not_busy(&mut self) -> Result<()> {
        let mut elapsed = 0u32;
        while MacRegs::MII_ADDRESS.read() & GMACMIIADDR_GB != 0 {
            if elapsed >= self.timeout_us {
                return Err(IoError::Timeout.into());
            }
            self.delay.delay_us(10);
            elapsed += 10;
        }
        Ok(())
    }
}

impl<D: DelayNs> MdioBus for MdioController<D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        check_addresses(phy_addr, reg_addr)?;
        self.wait_not_busy()?;
        MacRegs::MII_ADDRESS.write(mii_address_word(
            phy_addr,
            reg_addr,
            self.clock_divider.to_reg_value(),
            false,
        ));
        self.wait_not_busy()?;
        Ok((MacRegs::MII_DATA.read() & 0xFFFF) as u16)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        check_addresses(phy_addr, reg_addr)?;
        self.wait_not_busy()?;
        MacRegs::MII_DATA.write(value as u32);
        MacRegs::MII_ADDRESS.write(mii_address_word(
            phy_addr,
            reg_addr,
            self.clock_divider.to_reg_value(),
            true,
        ));
        self.wait_not_busy()
    }

    fn is_busy(&self) -> bool {
        (MacRegs::MII_ADDRESS.read() & GMACMIIADDR_GB) != 0
    }
}

// =============================================================================
// PHY Register Definitions (IEEE 802.3 standard registers)
// =============================================================================

/// Standard PHY register addresses (IEEE 802.3 Clause 22)
pub mod phy_reg {
    /// Basic Mode Control Register
    pub const BMCR: u8 = 0;
    /// Basic Mode Status Register
    pub const BMSR: u8 = 1;
    /// PHY Identifier 1
    pub const PHYIDR1: u8 = 2;
    /// PHY Identifier 2
    pub const PHYIDR2: u8 = 3;
}

/// Read the two PHY identifier words at `phy_addr`.
pub fn read_phy_id<M: MdioBus + ?Sized>(mdio: &mut M, phy_addr: u8) -> Result<(u16, u16)> {
    let id1 = mdio.read(phy_addr, phy_reg::PHYIDR1)?;
    let id2 = mdio.read(phy_addr, phy_reg::PHYIDR2)?;
    Ok((id1, id2))
}
