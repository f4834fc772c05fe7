//! Clock Configuration HAL
//!
//! Selects the RMII reference clock source and routes it to the right pad.

use crate::internal::register::ext::ExtRegs;
use crate::internal::register::gpio::GpioMatrix;
use crate::profile::ClockMode;

/// Where the 50 MHz reference clock comes from and which pad carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRoute {
    /// PHY or oscillator drives GPIO0 into the EMAC
    ExternalGpio0,
    /// APLL drives GPIO0 through CLK_OUT1
    InternalGpio0,
    /// APLL drives the given pad through the GPIO matrix
    InternalPad(u8),
}

impl ClockRoute {
    /// Route used by `mode`.
    pub const fn for_mode(mode: ClockMode) -> Self {
        match mode {
            ClockMode::Gpio0In => ClockRoute::ExternalGpio0,
            ClockMode::Gpio0Out => ClockRoute::InternalGpio0,
            ClockMode::Gpio16Out => ClockRoute::InternalPad(16),
            ClockMode::Gpio17Out => ClockRoute::InternalPad(17),
        }
    }
}

/// Clock controller for the EMAC peripheral
#[derive(Debug, Default)]
pub struct ClockController;

impl ClockController {
    /// Create a new clock controller
    pub const fn new() -> Self {
        Self
    }

    /// Select RMII and the reference clock source for `mode`.
    ///
    /// Output modes rely on the APLL already running at 50 MHz.
    pub fn configure(&mut self, mode: ClockMode) {
        ExtRegs::set_rmii_mode();
        match ClockRoute::for_mode(mode) {
            ClockRoute::ExternalGpio0 => {
                GpioMatrix::route_clock_input_gpio0();
                ExtRegs::set_rmii_clock_external();
            }
            ClockRoute::InternalGpio0 => {
                ExtRegs::set_rmii_clock_internal();
                GpioMatrix::route_clock_output_gpio0();
            }
            ClockRoute::InternalPad(pin) => {
                ExtRegs::set_rmii_clock_internal();
                GpioMatrix::route_clock_output(pin);
            }
        }
    }

    /// Enable the EMAC clocks and power up its RAM
    pub fn enable(&mut self) {
        ExtRegs::enable_clocks();
        ExtRegs::power_up_ram();
    }

    /// Disable the EMAC clocks and power down its RAM
    pub fn disable(&mut self) {
        ExtRegs::disable_clocks();
        ExtRegs::power_down_ram();
    }
}
