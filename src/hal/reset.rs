//! Reset Controller HAL
//!
//! DMA soft reset of the EMAC. The reset bit only self-clears when the MAC
//! sees a reference clock, so a timeout here is the usual symptom of a wrong
//! clock mode.

use embedded_hal::delay::DelayNs;

use crate::error::{ConfigError, Result};
use crate::internal::register::dma::{DMABUSMODE_SW_RST, DmaRegs};

/// Default soft reset timeout
pub const SOFT_RESET_TIMEOUT_MS: u32 = 100;

/// Poll interval while waiting for the soft reset
pub const RESET_POLL_INTERVAL_US: u32 = 100;

/// Reset controller for the EMAC peripheral
#[derive(Debug)]
pub struct ResetController<D: DelayNs> {
    delay: D,
    timeout_ms: u32,
}

impl<D: DelayNs> ResetController<D> {
    /// Create a reset controller with the [`SOFT_RESET_TIMEOUT_MS`] budget
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            timeout_ms: SOFT_RESET_TIMEOUT_MS,
        }
    }

    /// Perform a DMA soft reset.
    ///
    /// Returns [`ConfigError::ResetFailed`] if the bit does not clear within
    /// the timeout.
    pub fn soft_reset(&mut self) -> Result<()> {
        DmaRegs::BUS_MODE.set_bits(DMABUSMODE_SW_RST);

        for _ in 0..poll_budget(self.timeout_ms) {
            if DmaRegs::is_reset_complete() {
                return Ok(());
            }
            self.delay.delay_us(RESET_POLL_INTERVAL_US);
        }

        warn!("EMAC soft reset timed out after {} ms", self.timeout_ms);
        Err(ConfigError::ResetFailed.into())
    }
}

/// Number of status polls that fit in `timeout_ms`, at least one.
const fn poll_budget(timeout_ms: u32) -> u32 {
    let polls = timeout_ms.saturating_mul(1000) / RESET_POLL_INTERVAL_US;
    if polls == 0 { 1 } else { polls }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_covers_the_whole_timeout() {
        assert_eq!(poll_budget(SOFT_RESET_TIMEOUT_MS), 1000);
        assert_eq!(poll_budget(SOFT_RESET_TIMEOUT_MS) * RESET_POLL_INTERVAL_US, SOFT_RESET_TIMEOUT_MS * 1000);
    }

    #[test]
    fn budget_never_skips_the_first_poll() {
        assert_eq!(poll_budget(0), 1);
        assert_eq!(poll_budget(u32::MAX), u32::MAX / RESET_POLL_INTERVAL_US);
    }
}
