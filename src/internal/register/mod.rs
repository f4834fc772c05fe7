//! ESP32 registers touched by SMI bring-up
//!
//! [`Reg`] is a handle to one 32-bit memory-mapped register. The submodules
//! name the few EMAC, DPORT, GPIO matrix and IO_MUX registers needed to clock
//! the EMAC, reset its DMA, route MDC/MDIO and run management transactions.
//! Nothing here touches descriptors or the data path.

pub mod dma;
pub mod ext;
pub mod gpio;
pub mod mac;

/// EMAC DMA block
pub const DMA_BASE: usize = 0x3FF6_9000;

/// EMAC extension block (clock, interface and RAM power control)
pub const EXT_BASE: usize = 0x3FF6_9800;

/// EMAC GMAC block
pub const MAC_BASE: usize = 0x3FF6_A000;

/// DPORT peripheral clock gate; the EMAC shares it with the radio
pub const DPORT_WIFI_CLK_EN: Reg = unsafe { Reg::new(0x3FF0_00CC) };

/// EMAC bit in [`DPORT_WIFI_CLK_EN`]
pub const DPORT_WIFI_CLK_EMAC_EN: u32 = 1 << 14;

/// A 32-bit memory-mapped register.
///
/// Construction is `unsafe`; once built, every access is a single volatile
/// word read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(usize);

impl Reg {
    /// Handle for the register at `addr`.
    ///
    /// # Safety
    /// `addr` must be word-aligned and valid for volatile 32-bit reads and
    /// writes for as long as the handle is used.
    pub const unsafe fn new(addr: usize) -> Self {
        Self(addr)
    }

    /// Handle for the register `offset` bytes into the block at `base`.
    ///
    /// # Safety
    /// Same contract as [`Reg::new`] for `base + offset`.
    pub const unsafe fn at(base: usize, offset: usize) -> Self {
        Self(base + offset)
    }

    /// Volatile read
    #[inline(always)]
    pub fn read(self) -> u32 {
        // SAFETY: validity is the constructor's contract
        unsafe { core::ptr::read_volatile(self.0 as *const u32) }
    }

    /// Volatile write
    #[inline(always)]
    pub fn write(self, value: u32) {
        // SAFETY: validity is the constructor's contract
        unsafe { core::ptr::write_volatile(self.0 as *mut u32, value) }
    }

    /// Read, transform and write back. Not atomic against interrupts.
    #[inline(always)]
    pub fn modify(self, f: impl FnOnce(u32) -> u32) {
        self.write(f(self.read()));
    }

    /// Set `bits`, leaving the rest untouched
    #[inline(always)]
    pub fn set_bits(self, bits: u32) {
        self.modify(|v| v | bits);
    }

    /// Clear `bits`, leaving the rest untouched
    #[inline(always)]
    pub fn clear_bits(self, bits: u32) {
        self.modify(|v| v & !bits);
    }
}
