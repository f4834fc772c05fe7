//! Board-specific helpers and pin mappings.
//!
//! # Supported Boards
//!
//! - WT32-ETH01 (LAN8720A, external 50 MHz oscillator): [`wt32_eth01`]
//! - SPI W5500 boards: only the MAC address scheme lives here; the W5500
//!   has no PHY search
//!
//! # See Also
//!
//! - [`crate::config::EthConfig`] - picks the fixed profile from here

pub mod wt32_eth01;

/// Locally administered MAC of a W5500 sensor: `DE:AD:BE:EF:FE:<building>`.
///
/// Two sensors of one building share a MAC and must not sit on the same
/// segment.
pub const fn w5500_mac_address(building_id: u8) -> [u8; 6] {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xFE, building_id]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn w5500_mac_is_locally_administered_unicast() {
        let mac = w5500_mac_address(7);
        assert_eq!(mac, [0xDE, 0xAD, 0xBE, 0xEF, 0xFE, 0x07]);
        assert_eq!(mac[0] & 0x01, 0);
        assert_eq!(mac[0] & 0x02, 0x02);
    }
}
