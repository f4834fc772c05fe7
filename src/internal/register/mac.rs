//! GMAC register definitions (SMI subset)

use super::{MAC_BASE, Reg};

/// MII address register offset
pub const GMACMIIADDR_OFFSET: usize = 0x10;
/// MII data register offset
pub const GMACMIIDATA_OFFSET: usize = 0x14;

// =============================================================================
// GMAC MII Address Register (GMACMIIADDR) Bits
// =============================================================================

/// MII busy
pub const GMACMIIADDR_GB: u32 = 1 << 0;
/// MII write
pub const GMACMIIADDR_GW: u32 = 1 << 1;
/// CSR clock range shift
pub const GMACMIIADDR_CR_SHIFT: u32 = 2;
/// CSR clock range mask
pub const GMACMIIADDR_CR_MASK: u32 = 0xF << 2;
/// MII register shift
pub const GMACMIIADDR_GR_SHIFT: u32 = 6;
/// MII register mask
pub const GMACMIIADDR_GR_MASK: u32 = 0x1F << 6;
/// Physical layer address shift
pub const GMACMIIADDR_PA_SHIFT: u32 = 11;
/// Physical layer address mask
pub const GMACMIIADDR_PA_MASK: u32 = 0x1F << 11;

/// GMAC register block
pub struct MacRegs;

impl MacRegs {
    /// MII Address register: PHY, register, clock range, direction and busy
    pub const MII_ADDRESS: Reg = unsafe { Reg::at(MAC_BASE, GMACMIIADDR_OFFSET) };
    /// MII Data register: low 16 bits carry the transferred word
    pub const MII_DATA: Reg = unsafe { Reg::at(MAC_BASE, GMACMIIDATA_OFFSET) };
}

/// Compose a GMACMIIADDR value that starts an SMI transaction.
pub const fn mii_address_word(phy_addr: u8, reg_addr: u8, clock_range: u32, write: bool) -> u32 {
    let mut word = ((phy_addr as u32) << GMACMIIADDR_PA_SHIFT) & GMACMIIADDR_PA_MASK;
    word |= ((reg_addr as u32) << GMACMIIADDR_GR_SHIFT) & GMACMIIADDR_GR_MASK;
    word |= (clock_range << GMACMIIADDR_CR_SHIFT) & GMACMIIADDR_CR_MASK;
    if write {
        word |= GMACMIIADDR_GW;
    }
    word | GMACMIIADDR_GB
}
