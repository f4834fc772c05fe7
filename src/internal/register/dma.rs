//! DMA register definitions (reset subset)

use super::{DMA_BASE, Reg};

/// Bus mode register offset
pub const DMABUSMODE_OFFSET: usize = 0x00;

/// Software reset. Self-clears once the MAC sees a reference clock.
pub const DMABUSMODE_SW_RST: u32 = 1 << 0;

/// DMA register block
pub struct DmaRegs;

impl DmaRegs {
    /// Bus Mode register
    pub const BUS_MODE: Reg = unsafe { Reg::at(DMA_BASE, DMABUSMODE_OFFSET) };

    /// Whether the software reset bit has cleared
    #[inline(always)]
    pub fn is_reset_complete() -> bool {
        Self::BUS_MODE.read() & DMABUSMODE_SW_RST == 0
    }
}
