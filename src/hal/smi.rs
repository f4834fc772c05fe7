//! SMI host
//!
//! Brings up just enough of the EMAC to drive the management bus: peripheral
//! clock, RMII reference clock routing, DMA soft reset and MDC/MDIO pin
//! routing. No descriptors, no network interface.
//!
//! The soft reset only completes with a working reference clock, so a wrong
//! [`ClockMode`] shows up as [`ConfigError::ResetFailed`] from
//! [`SmiHost::attach`].

use embedded_hal::delay::DelayNs;

use crate::error::{ConfigError, IoError, Result};
use crate::hal::clock::ClockController;
use crate::hal::mdio::{MdcClockDivider, MdioBus, MdioController};
use crate::hal::reset::ResetController;
use crate::internal::register::ext::ExtRegs;
use crate::internal::register::gpio::{FIRST_INPUT_ONLY_GPIO, GpioMatrix, iomux_offset};
use crate::profile::ClockMode;

/// ESP32 APB clock feeding the MDC divider
pub const APB_CLOCK_HZ: u32 = 80_000_000;

/// One SMI bring-up: reference clock source plus the MDC/MDIO pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmiConfig {
    /// Reference clock source
    pub clock_mode: ClockMode,
    /// SMI clock GPIO
    pub mdc_pin: u8,
    /// SMI data GPIO
    pub mdio_pin: u8,
}

impl SmiConfig {
    /// Create a config
    pub const fn new(clock_mode: ClockMode, mdc_pin: u8, mdio_pin: u8) -> Self {
        Self {
            clock_mode,
            mdc_pin,
            mdio_pin,
        }
    }

    /// Check the pins can carry SMI with this clock mode.
    pub const fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.mdc_pin == self.mdio_pin {
            return Err(ConfigError::InvalidPin);
        }
        if !is_output_capable(self.mdc_pin) || !is_output_capable(self.mdio_pin) {
            return Err(ConfigError::InvalidPin);
        }
        if self.clock_mode.collides_with(self.mdc_pin, self.mdio_pin) {
            return Err(ConfigError::PinConflict);
        }
        Ok(())
    }
}

const fn is_output_capable(pin: u8) -> bool {
    pin < FIRST_INPUT_ONLY_GPIO && iomux_offset(pin).is_some()
}

/// A MAC that can be brought up for management-bus access only.
pub trait SmiHost: MdioBus {
    /// Bring the SMI bus up with `config`, replacing any earlier attachment.
    fn attach(&mut self, config: &SmiConfig) -> Result<()>;

    /// Tear the SMI bus down. Idempotent.
    fn detach(&mut self);
}

impl<T: SmiHost + ?Sized> SmiHost for &mut T {
    fn attach(&mut self, config: &SmiConfig) -> Result<()> {
        T::attach(self, config)
    }

    fn detach(&mut self) {
        T::detach(self);
    }
}

/// SMI attachment that detaches when dropped.
pub struct SmiSession<'a, H: SmiHost + ?Sized> {
    host: &'a mut H,
}

impl<'a, H: SmiHost + ?Sized> SmiSession<'a, H> {
    /// Attach `host` with `config`.
    pub fn open(host: &'a mut H, config: &SmiConfig) -> Result<Self> {
        host.attach(config)?;
        Ok(Self { host })
    }
}

impl<H: SmiHost + ?Sized> MdioBus for SmiSession<'_, H> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        self.host.read(phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.host.write(phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        self.host.is_busy()
    }
}

impl<H: SmiHost + ?Sized> Drop for SmiSession<'_, H> {
    fn drop(&mut self) {
        self.host.detach();
    }
}

// =============================================================================
// ESP32 implementation
// =============================================================================

/// Register-backed [`SmiHost`] for the ESP32 EMAC.
///
/// Must not be attached while a full Ethernet driver owns the EMAC.
#[derive(Debug)]
pub struct Esp32Smi<D: DelayNs> {
    mdio: MdioController<D>,
    clock: ClockController,
    attached: Option<SmiConfig>,
}

impl<D: DelayNs> Esp32Smi<D> {
    /// Create a detached host
    pub fn new(delay: D) -> Self {
        Self {
            mdio: MdioController::with_clock_divider(
                delay,
                MdcClockDivider::from_sys_clock_hz(APB_CLOCK_HZ),
            ),
            clock: ClockController::new(),
            attached: None,
        }
    }

    /// Current attachment, if any
    pub fn attached(&self) -> Option<SmiConfig> {
        self.attached
    }

    fn power_down(&mut self, config: &SmiConfig) {
        GpioMatrix::release(config.mdc_pin);
        GpioMatrix::release(config.mdio_pin);
        if let Some(pin) = config.clock_mode.output_pin() {
            GpioMatrix::release(pin);
        }
        self.clock.disable();
        ExtRegs::disable_peripheral_clock();
    }
}

impl<D: DelayNs> SmiHost for Esp32Smi<D> {
    fn attach(&mut self, config: &SmiConfig) -> Result<()> {
        self.detach();
        config.validate()?;

        ExtRegs::enable_peripheral_clock();
        self.clock.configure(config.clock_mode);
        self.clock.enable();

        if let Err(e) = ResetController::new(self.mdio.delay_mut()).soft_reset() {
            self.power_down(config);
            return Err(e);
        }

        GpioMatrix::configure_mdc(config.mdc_pin);
        GpioMatrix::configure_mdio(config.mdio_pin);
        self.attached = Some(*config);
        trace!(
            "SMI attached: clk={} mdc={} mdio={}",
            config.clock_mode.as_str(),
            config.mdc_pin,
            config.mdio_pin
        );
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(config) = self.attached.take() {
            self.power_down(&config);
        }
    }
}

impl<D: DelayNs> MdioBus for Esp32Smi<D> {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        if self.attached.is_none() {
            return Err(IoError::InvalidState.into());
        }
        self.mdio.read(phy_addr, reg_addr)
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        if self.attached.is_none() {
            return Err(IoError::InvalidState.into());
        }
        self.mdio.write(phy_addr, reg_addr, value)
    }

    fn is_busy(&self) -> bool {
        self.attached.is_some() && self.mdio.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::MockSmiHost;

    #[test]
    fn config_validation() {
        assert_eq!(SmiConfig::new(ClockMode::Gpio0In, 23, 18).validate(), Ok(()));
        assert_eq!(SmiConfig::new(ClockMode::Gpio0In, 32, 33).validate(), Ok(()));
        assert_eq!(
            SmiConfig::new(ClockMode::Gpio0In, 18, 18).validate(),
            Err(ConfigError::InvalidPin)
        );
        assert_eq!(
            SmiConfig::new(ClockMode::Gpio0In, 23, 34).validate(),
            Err(ConfigError::InvalidPin)
        );
        assert_eq!(
            SmiConfig::new(ClockMode::Gpio0In, 24, 18).validate(),
            Err(ConfigError::InvalidPin)
        );
        assert_eq!(
            SmiConfig::new(ClockMode::Gpio16Out, 16, 32).validate(),
            Err(ConfigError::PinConflict)
        );
    }

    #[test]
    fn session_detaches_on_drop() {
        let mut host = MockSmiHost::new();
        host.add_phy(SmiConfig::new(ClockMode::Gpio0In, 23, 18), 1, 0x0007, 0xC0F1);
        {
            let mut session = SmiSession::open(&mut host, &SmiConfig::new(ClockMode::Gpio0In, 23, 18))
                .unwrap();
            assert_eq!(session.read(1, 2), Ok(0x0007));
        }
        assert_eq!(host.attached(), None);
        assert_eq!(host.attach_count(), 1);
        assert_eq!(host.read(1, 2), Err(Error::Io(IoError::InvalidState)));
    }

    #[test]
    fn failed_attach_leaves_host_detached() {
        let mut host = MockSmiHost::new();
        host.fail_attach(ClockMode::Gpio17Out);
        let result = SmiSession::open(&mut host, &SmiConfig::new(ClockMode::Gpio17Out, 23, 18));
        assert_eq!(result.err(), Some(Error::Config(ConfigError::ResetFailed)));
        assert_eq!(host.attached(), None);
    }
}
