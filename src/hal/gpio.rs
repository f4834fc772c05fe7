//! Board GPIO
//!
//! The strap pins this crate touches (PWR_EN, PHY reset, the GPIO2/GPIO32
//! pull-ups) are plain numbered GPIOs picked per profile at run time, so they
//! go through a small numbered-pin trait instead of typed HAL pins.
//!
//! # Fixed RMII pads
//!
//! | Signal   | GPIO |
//! |----------|------|
//! | TXD0     | 19   |
//! | TXD1     | 22   |
//! | TX_EN    | 21   |
//! | RXD0     | 25   |
//! | RXD1     | 26   |
//! | CRS_DV   | 27   |
//!
//! MDC and MDIO are routed through the GPIO Matrix and may sit on any
//! output-capable pad.

use embedded_hal::digital::PinState;

use crate::internal::register::gpio::GpioMatrix;

/// Numbered-pin GPIO access used for board straps.
pub trait BoardGpio {
    /// Configure `pin` as a push-pull output driven to `level`.
    fn set_output(&mut self, pin: u8, level: PinState);

    /// Configure `pin` as an input with the weak pull-up enabled.
    fn set_input_pullup(&mut self, pin: u8);
}

impl<T: BoardGpio + ?Sized> BoardGpio for &mut T {
    fn set_output(&mut self, pin: u8, level: PinState) {
        T::set_output(self, pin, level);
    }

    fn set_input_pullup(&mut self, pin: u8) {
        T::set_input_pullup(self, pin);
    }
}

/// Register-backed [`BoardGpio`] for the ESP32.
#[derive(Debug, Default)]
pub struct Esp32Gpio;

impl BoardGpio for Esp32Gpio {
    fn set_output(&mut self, pin: u8, level: PinState) {
        GpioMatrix::set_output(pin, level == PinState::High);
    }

    fn set_input_pullup(&mut self, pin: u8) {
        GpioMatrix::set_input_pullup(pin);
    }
}
