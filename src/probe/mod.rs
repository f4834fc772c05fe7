//! MDIO probe
//!
//! Finds a PHY by bringing the SMI bus up on candidate pins and clock modes
//! and reading the PHY identifier registers. Only the management bus is
//! touched: no PHY attach, no network interface.

pub mod plan;

use core::ops::ControlFlow;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::error::Result;
use crate::hal::gpio::BoardGpio;
use crate::hal::mdio::{MAX_PHY_ADDR, read_phy_id};
use crate::hal::smi::{SmiConfig, SmiHost, SmiSession};
use crate::profile::ClockMode;

pub use plan::{ProbePhase, ProbeStep};

/// GPIO most commonly wired to PHY power enable.
pub const COMMON_PWR_EN_PIN: u8 = 16;

/// Settle time after asserting [`COMMON_PWR_EN_PIN`].
pub const PWR_EN_SETTLE_MS: u32 = 10;

/// Where a PHY answers on the management bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmiLocation {
    /// SMI clock GPIO
    pub mdc_pin: u8,
    /// SMI data GPIO
    pub mdio_pin: u8,
    /// PHY management address
    pub phy_addr: u8,
}

/// A PHY found by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectedPhy {
    /// Clock mode the SMI bus came up with
    pub clock_mode: ClockMode,
    /// Management location
    pub location: SmiLocation,
    /// PHY identifier word 1 (register 2)
    pub id1: u16,
    /// PHY identifier word 2 (register 3)
    pub id2: u16,
}

/// `false` for the all-zeros and all-ones patterns of a floating bus.
pub const fn is_plausible_phy_id(id1: u16, id2: u16) -> bool {
    !matches!(id1, 0x0000 | 0xFFFF) && !matches!(id2, 0x0000 | 0xFFFF)
}

/// MDIO probe over an [`SmiHost`].
pub struct MdioProbe<'a, H: SmiHost, G: BoardGpio, D: DelayNs> {
    smi: &'a mut H,
    gpio: &'a mut G,
    delay: &'a mut D,
    wide: bool,
}

impl<'a, H: SmiHost, G: BoardGpio, D: DelayNs> MdioProbe<'a, H, G, D> {
    /// Create a probe. `wide` enables the brute-force phase.
    pub fn new(smi: &'a mut H, gpio: &'a mut G, delay: &'a mut D, wide: bool) -> Self {
        Self {
            smi,
            gpio,
            delay,
            wide,
        }
    }

    /// Read both identifier words at one address.
    ///
    /// Fails if the bus cannot be brought up or either read fails.
    pub fn read_phy_id(&mut self, clock_mode: ClockMode, mdc: u8, mdio: u8, addr: u8) -> Result<(u16, u16)> {
        let mut bus = SmiSession::open(&mut *self.smi, &SmiConfig::new(clock_mode, mdc, mdio))?;
        read_phy_id(&mut bus, addr)
    }

    /// Scan `addrs` under one bus bring-up and return the first plausible PHY.
    ///
    /// Fails only if the bus cannot be brought up. Addresses whose reads
    /// fail are skipped.
    pub fn scan_first_hit(
        &mut self,
        clock_mode: ClockMode,
        mdc: u8,
        mdio: u8,
        addrs: impl IntoIterator<Item = u8>,
    ) -> Result<Option<DetectedPhy>> {
        let mut bus = SmiSession::open(&mut *self.smi, &SmiConfig::new(clock_mode, mdc, mdio))?;
        for addr in addrs.into_iter().filter(|&a| a <= MAX_PHY_ADDR) {
            let Ok((id1, id2)) = read_phy_id(&mut bus, addr) else {
                continue;
            };
            if is_plausible_phy_id(id1, id2) {
                return Ok(Some(DetectedPhy {
                    clock_mode,
                    location: SmiLocation {
                        mdc_pin: mdc,
                        mdio_pin: mdio,
                        phy_addr: addr,
                    },
                    id1,
                    id2,
                }));
            }
        }
        Ok(None)
    }

    /// Run every probe phase and return the first PHY found.
    pub fn detect_phy(&mut self) -> Option<DetectedPhy> {
        self.gpio.set_output(COMMON_PWR_EN_PIN, PinState::High);
        self.delay.delay_ms(PWR_EN_SETTLE_MS);

        if self.wide {
            info!("MDIO detect: wide scan enabled, this can take up to a minute");
        }

        let found = plan::steps(self.wide).try_for_each(|step| {
            let cfg = step.config;
            match self.scan_first_hit(cfg.clock_mode, cfg.mdc_pin, cfg.mdio_pin, step.addrs) {
                Ok(Some(phy)) => ControlFlow::Break(phy),
                Ok(None) => ControlFlow::Continue(()),
                Err(e) => {
                    trace!(
                        "MDIO detect: skip clk={} mdc={} mdio={}: {}",
                        cfg.clock_mode.as_str(),
                        cfg.mdc_pin,
                        cfg.mdio_pin,
                        e
                    );
                    ControlFlow::Continue(())
                }
            }
        });

        match found {
            ControlFlow::Break(phy) => {
                info!(
                    "MDIO detect: PHY id={:#06x}/{:#06x} at addr {} on mdc={} mdio={} clock={}",
                    phy.id1,
                    phy.id2,
                    phy.location.phy_addr,
                    phy.location.mdc_pin,
                    phy.location.mdio_pin,
                    phy.clock_mode.as_str()
                );
                Some(phy)
            }
            ControlFlow::Continue(()) => {
                warn!("MDIO detect: no PHY ID readable on any candidate MDC/MDIO pins");
                None
            }
        }
    }
}
