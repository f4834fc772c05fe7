//! esp-hal integration
//!
//! Platform pieces backed by `esp-hal` when the `esp-hal` feature is
//! enabled:
//!
//! - [`EspRestart`]: software reset that keeps RTC retained memory
//! - [`EspClock`]: millisecond clock since boot
//! - [`Delay`]: re-exported blocking delay
//!
//! # Usage
//!
//! ```ignore
//! use pb_eth_sensor::integration::esp_hal::{Delay, EspClock, EspRestart};
//!
//! let outcome = autoconfig.setup_ethernet(&mut eth, &LINK, &mut EspRestart);
//! let mut sensor = Sensor::new(&SENSOR, &LINK, eth, transport, NoIndicator, EspClock, Delay::new())?;
//! ```

pub use esp_hal::delay::Delay;

use crate::platform::{Monotonic, Restart};

/// Chip restart through the esp-hal software reset.
#[derive(Debug, Default, Clone, Copy)]
pub struct EspRestart;

impl Restart for EspRestart {
    fn restart(&mut self) {
        esp_hal::system::software_reset();
    }
}

/// Millisecond clock on the esp-hal system timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct EspClock;

impl Monotonic for EspClock {
    fn now_ms(&self) -> u64 {
        esp_hal::time::Instant::now().duration_since_epoch().as_millis()
    }
}
