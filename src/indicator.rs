//! Status LED
//!
//! Most WT32-ETH01 revisions have no user LED, so the indicator is optional:
//! [`NoIndicator`] keeps the blink timing without driving anything.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::hal::gpio::BoardGpio;

/// Something that can be switched on and off.
pub trait Indicator {
    /// Switch on or off.
    fn set(&mut self, on: bool);
}

impl<T: Indicator + ?Sized> Indicator for &mut T {
    fn set(&mut self, on: bool) {
        T::set(self, on);
    }
}

/// Blink count and half-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkPattern {
    /// Number of pulses
    pub times: u8,
    /// On time, and off time between pulses
    pub period_ms: u32,
}

impl BlinkPattern {
    /// Waiting for a link
    pub const OFFLINE: Self = Self::new(1, 500);
    /// Heartbeat delivered
    pub const SUCCESS: Self = Self::new(1, 100);
    /// Heartbeat failed
    pub const FAILURE: Self = Self::new(3, 200);

    /// Create a pattern
    pub const fn new(times: u8, period_ms: u32) -> Self {
        Self { times, period_ms }
    }

    /// Total time the pattern takes.
    pub const fn duration_ms(&self) -> u32 {
        match self.times {
            0 => 0,
            n => (2 * n as u32 - 1) * self.period_ms,
        }
    }
}

/// Play `pattern`. Ends with the indicator off and no trailing gap.
pub fn blink<I: Indicator + ?Sized, D: DelayNs + ?Sized>(indicator: &mut I, delay: &mut D, pattern: BlinkPattern) {
    for i in 0..pattern.times {
        indicator.set(true);
        delay.delay_ms(pattern.period_ms);
        indicator.set(false);
        if i + 1 < pattern.times {
            delay.delay_ms(pattern.period_ms);
        }
    }
}

/// Active-high LED on a board GPIO.
#[derive(Debug)]
pub struct GpioIndicator<G: BoardGpio> {
    gpio: G,
    pin: u8,
}

impl<G: BoardGpio> GpioIndicator<G> {
    /// Take `pin` and switch the LED off.
    pub fn new(mut gpio: G, pin: u8) -> Self {
        gpio.set_output(pin, PinState::Low);
        Self { gpio, pin }
    }
}

impl<G: BoardGpio> Indicator for GpioIndicator<G> {
    fn set(&mut self, on: bool) {
        self.gpio.set_output(self.pin, PinState::from(on));
    }
}

/// Indicator for boards without an LED.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn set(&mut self, _on: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockDelay, MockGpio, MockIndicator};

    #[test]
    fn pattern_durations() {
        assert_eq!(BlinkPattern::OFFLINE.duration_ms(), 500);
        assert_eq!(BlinkPattern::SUCCESS.duration_ms(), 100);
        assert_eq!(BlinkPattern::FAILURE.duration_ms(), 1000);
        assert_eq!(BlinkPattern::new(0, 100).duration_ms(), 0);
    }

    #[test]
    fn blink_pulses_and_timing() {
        let mut led = MockIndicator::new();
        let mut delay = MockDelay::new();
        blink(&mut led, &mut delay, BlinkPattern::FAILURE);
        assert_eq!(led.pulses(), 3);
        assert!(!led.is_on());
        assert_eq!(delay.total_ms(), 1000);
    }

    #[test]
    fn gpio_indicator_drives_pin() {
        let mut gpio = MockGpio::new();
        let mut led = GpioIndicator::new(&mut gpio, 2);
        led.set(true);
        drop(led);
        assert_eq!(gpio.level(2), Some(PinState::High));
    }
}
