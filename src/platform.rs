//! Platform seams
//!
//! The pieces of the board support package this crate drives but does not
//! implement: the full Ethernet MAC/PHY driver, the chip restart and a
//! millisecond clock.

use crate::error::Result;
use crate::profile::PhyProfile;

/// Full MAC + PHY bring-up provided by the platform network stack.
pub trait EthDriver {
    /// Start the MAC and attach the PHY described by `profile`.
    ///
    /// Returns [`crate::error::LinkError::PhyInitFailure`] when the PHY does
    /// not answer. A failed call may leak driver resources; callers reboot
    /// instead of retrying in place.
    fn begin(&mut self, profile: &PhyProfile) -> Result<()>;

    /// Whether the PHY reports link.
    fn link_up(&self) -> bool;
}

impl<T: EthDriver + ?Sized> EthDriver for &mut T {
    fn begin(&mut self, profile: &PhyProfile) -> Result<()> {
        T::begin(self, profile)
    }

    fn link_up(&self) -> bool {
        T::link_up(self)
    }
}

/// Chip restart.
pub trait Restart {
    /// Reset the chip, keeping retained memory.
    ///
    /// Does not return on hardware. Host implementations record the request
    /// and return.
    fn restart(&mut self);
}

impl<T: Restart + ?Sized> Restart for &mut T {
    fn restart(&mut self) {
        T::restart(self);
    }
}

/// Monotonic millisecond clock.
pub trait Monotonic {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;
}

impl<T: Monotonic + ?Sized> Monotonic for &T {
    fn now_ms(&self) -> u64 {
        T::now_ms(self)
    }
}

/// Flush buffered log output before a restart.
pub fn flush_log() {
    #[cfg(feature = "log")]
    ::log::logger().flush();
    #[cfg(feature = "defmt")]
    ::defmt::flush();
}
