//! EMAC extension registers
//!
//! ESP32-specific clock, interface and RAM power control.
//!
//! - ex_clkout_conf (0x00): clock output dividers
//! - ex_oscclk_conf (0x04): oscillator clock select
//! - ex_clk_ctrl    (0x08): clock enables
//! - ex_phyinf_conf (0x0C): PHY interface select
//! - pd_sel         (0x10): RAM power down

use super::{DPORT_WIFI_CLK_EMAC_EN, DPORT_WIFI_CLK_EN, EXT_BASE, Reg};

/// Clock output configuration register offset
pub const EX_CLKOUT_CONF_OFFSET: usize = 0x00;
/// Oscillator clock configuration register offset
pub const EX_OSCCLK_CONF_OFFSET: usize = 0x04;
/// Clock control register offset
pub const EX_CLK_CTRL_OFFSET: usize = 0x08;
/// PHY interface configuration register offset
pub const EX_PHYINF_CONF_OFFSET: usize = 0x0C;
/// RAM power down register offset
pub const EX_RAM_PD_OFFSET: usize = 0x10;

/// Clock output divider mask
pub const EX_CLKOUT_DIV_NUM_MASK: u32 = 0x0F;
/// Clock output high-period divider mask
pub const EX_CLKOUT_H_DIV_NUM_MASK: u32 = 0xF0;

/// Select external oscillator clock
pub const EX_OSCCLK_CLK_SEL: u32 = 1 << 24;

/// External clock enable
pub const EX_CLK_EXT_EN: u32 = 1 << 0;
/// Internal clock enable
pub const EX_CLK_INT_EN: u32 = 1 << 1;
/// MII TX clock enable
pub const EX_CLK_MII_CLK_TX_EN: u32 = 1 << 3;
/// MII RX clock enable
pub const EX_CLK_MII_CLK_RX_EN: u32 = 1 << 4;
/// Global clock enable
pub const EX_CLK_EN: u32 = 1 << 5;

/// PHY interface select shift
pub const EX_PHYINF_PHY_INTF_SEL_SHIFT: u32 = 13;
/// PHY interface select mask
pub const EX_PHYINF_PHY_INTF_SEL_MASK: u32 = 0x7 << 13;
/// RMII interface select value
pub const EX_PHYINF_PHY_INTF_RMII: u32 = 4;

const CLK_ENABLES: u32 = EX_CLK_MII_CLK_RX_EN | EX_CLK_MII_CLK_TX_EN | EX_CLK_EN;

/// Extension register block
pub struct ExtRegs;

impl ExtRegs {
    /// Clock output divider register
    pub const CLKOUT_CONF: Reg = unsafe { Reg::at(EXT_BASE, EX_CLKOUT_CONF_OFFSET) };
    /// Oscillator clock select register
    pub const OSCCLK_CONF: Reg = unsafe { Reg::at(EXT_BASE, EX_OSCCLK_CONF_OFFSET) };
    /// Clock enable register
    pub const CLK_CTRL: Reg = unsafe { Reg::at(EXT_BASE, EX_CLK_CTRL_OFFSET) };
    /// PHY interface select register
    pub const PHYINF_CONF: Reg = unsafe { Reg::at(EXT_BASE, EX_PHYINF_CONF_OFFSET) };
    /// RAM power-down register
    pub const RAM_PD: Reg = unsafe { Reg::at(EXT_BASE, EX_RAM_PD_OFFSET) };

    /// Gate the EMAC peripheral clock on at DPORT level.
    ///
    /// Must precede any other EMAC register access.
    pub fn enable_peripheral_clock() {
        DPORT_WIFI_CLK_EN.set_bits(DPORT_WIFI_CLK_EMAC_EN);
        debug!("DPORT WIFI_CLK_EN: {:#010x}", DPORT_WIFI_CLK_EN.read());
    }

    /// Gate the EMAC peripheral clock off at DPORT level.
    pub fn disable_peripheral_clock() {
        DPORT_WIFI_CLK_EN.clear_bits(DPORT_WIFI_CLK_EMAC_EN);
    }

    /// Enable the EMAC-internal clocks.
    pub fn enable_clocks() {
        Self::CLK_CTRL.set_bits(CLK_ENABLES);
    }

    /// Disable the EMAC-internal clocks.
    pub fn disable_clocks() {
        Self::CLK_CTRL.clear_bits(CLK_ENABLES);
    }

    /// Select the RMII PHY interface.
    pub fn set_rmii_mode() {
        Self::PHYINF_CONF.modify(|v| {
            (v & !EX_PHYINF_PHY_INTF_SEL_MASK) | (EX_PHYINF_PHY_INTF_RMII << EX_PHYINF_PHY_INTF_SEL_SHIFT)
        });
    }

    /// Take the RMII reference clock from the external input.
    pub fn set_rmii_clock_external() {
        Self::CLK_CTRL.modify(|v| (v | EX_CLK_EXT_EN) & !EX_CLK_INT_EN);
        Self::OSCCLK_CONF.set_bits(EX_OSCCLK_CLK_SEL);
        debug!(
            "RMII external clock: CLK_CTRL={:#010x} OSCCLK_CONF={:#010x}",
            Self::CLK_CTRL.read(),
            Self::OSCCLK_CONF.read()
        );
    }

    /// Generate the RMII reference clock internally.
    ///
    /// The clock is derived from the APLL, which the platform must already
    /// have tuned to 50 MHz.
    pub fn set_rmii_clock_internal() {
        Self::CLK_CTRL.modify(|v| (v | EX_CLK_INT_EN) & !EX_CLK_EXT_EN);
        Self::OSCCLK_CONF.clear_bits(EX_OSCCLK_CLK_SEL);
        Self::CLKOUT_CONF.clear_bits(EX_CLKOUT_DIV_NUM_MASK | EX_CLKOUT_H_DIV_NUM_MASK);
        debug!(
            "RMII internal clock: CLK_CTRL={:#010x} OSCCLK_CONF={:#010x}",
            Self::CLK_CTRL.read(),
            Self::OSCCLK_CONF.read()
        );
    }

    /// Power up EMAC RAM
    pub fn power_up_ram() {
        Self::RAM_PD.write(0);
    }

    /// Power down EMAC RAM
    pub fn power_down_ram() {
        Self::RAM_PD.write(0xFFFF_FFFF);
    }
}
