//! Profiles synthesised from an MDIO probe hit
//!
//! Once the probe has found a PHY answering on some `(mdc, mdio, addr)`, only
//! the clock source and the reset/power straps remain unknown. The dynamic
//! catalogue pins the management location and enumerates those.

use heapless::Vec;

use super::{ClockMode, PhyProfile, PhyType, PowerEnable};
use crate::probe::SmiLocation;

/// Capacity of a dynamic catalogue.
pub const DYNAMIC_MAX: usize = 24;

/// Strap variant: `(clock, reset pin, power enable)`.
type Variant = (ClockMode, Option<u8>, Option<PowerEnable>);

const HI16: Option<PowerEnable> = Some(PowerEnable::high(16, 250));
const LO16: Option<PowerEnable> = Some(PowerEnable::low(16, 250));

/// Straps tried for a detected PHY. Active-low PWR_EN goes last.
const VARIANTS: [(&str, Variant); 16] = [
    ("det-gpio0_in", (ClockMode::Gpio0In, None, None)),
    ("det-gpio0_in-pwren16_hi", (ClockMode::Gpio0In, None, HI16)),
    ("det-gpio0_in-reset5", (ClockMode::Gpio0In, Some(5), None)),
    ("det-gpio0_in-reset5-pwren16_hi", (ClockMode::Gpio0In, Some(5), HI16)),
    ("det-gpio0_in-reset16", (ClockMode::Gpio0In, Some(16), None)),
    ("det-gpio0_in-reset16-pwren16_hi", (ClockMode::Gpio0In, Some(16), HI16)),
    ("det-gpio17_out", (ClockMode::Gpio17Out, None, None)),
    ("det-gpio17_out-pwren16_hi", (ClockMode::Gpio17Out, None, HI16)),
    ("det-gpio17_out-reset5", (ClockMode::Gpio17Out, Some(5), None)),
    ("det-gpio17_out-reset5-pwren16_hi", (ClockMode::Gpio17Out, Some(5), HI16)),
    ("det-gpio17_out-reset16", (ClockMode::Gpio17Out, Some(16), None)),
    ("det-gpio17_out-reset16-pwren16_hi", (ClockMode::Gpio17Out, Some(16), HI16)),
    ("det-gpio0_out", (ClockMode::Gpio0Out, None, None)),
    ("det-gpio0_out-pwren16_hi", (ClockMode::Gpio0Out, None, HI16)),
    ("det-gpio0_in-pwren16_lo", (ClockMode::Gpio0In, None, LO16)),
    ("det-gpio17_out-pwren16_lo", (ClockMode::Gpio17Out, None, LO16)),
];

/// Ordered profile list for one detected PHY location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicCatalog {
    location: SmiLocation,
    profiles: Vec<PhyProfile, DYNAMIC_MAX>,
}

impl DynamicCatalog {
    /// Build the catalogue for a PHY found at `location`.
    ///
    /// Variants whose clock output pin would land on MDC or MDIO are
    /// skipped. Every entry is assumed to be a LAN8720, the only PHY the
    /// probe hit is commonly seen with on these boards.
    pub fn build(location: SmiLocation) -> Self {
        let mut profiles = Vec::new();
        for (label, (clock_mode, reset_pin, power_enable)) in VARIANTS {
            if clock_mode.collides_with(location.mdc_pin, location.mdio_pin) {
                continue;
            }
            let profile = PhyProfile::new(
                label,
                location.phy_addr,
                location.mdc_pin,
                location.mdio_pin,
                PhyType::Lan8720,
                clock_mode,
            )
            .with_reset_pin(reset_pin)
            .with_power_enable(power_enable);
            if profiles.push(profile).is_err() {
                break;
            }
        }
        Self { location, profiles }
    }

    /// Management location every profile is pinned to.
    pub fn location(&self) -> SmiLocation {
        self.location
    }

    /// Profiles in try order.
    pub fn profiles(&self) -> &[PhyProfile] {
        &self.profiles
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// `true` if every variant collided with the SMI pins.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(mdc_pin: u8, mdio_pin: u8, phy_addr: u8) -> SmiLocation {
        SmiLocation {
            mdc_pin,
            mdio_pin,
            phy_addr,
        }
    }

    #[test]
    fn standard_pins_keep_every_variant() {
        let cat = DynamicCatalog::build(at(23, 18, 0));
        assert_eq!(cat.len(), 16);
        assert_eq!(cat.profiles()[0].clock_mode, ClockMode::Gpio0In);
        assert_eq!(cat.profiles()[0].reset_pin, None);
        assert_eq!(cat.profiles()[0].power_enable, None);

        let last = cat.profiles()[cat.len() - 1];
        assert_eq!(last.power_enable, LO16);
        let second_last = cat.profiles()[cat.len() - 2];
        assert_eq!(second_last.power_enable, LO16);
    }

    #[test]
    fn every_entry_is_pinned_to_the_detected_location() {
        for loc in [at(23, 18, 0), at(16, 32, 1), at(17, 23, 7), at(33, 32, 31)] {
            let cat = DynamicCatalog::build(loc);
            assert!(!cat.is_empty());
            for p in cat.profiles() {
                assert_eq!((p.mdc_pin, p.mdio_pin, p.phy_addr), (loc.mdc_pin, loc.mdio_pin, loc.phy_addr));
                assert_eq!(p.phy_type, PhyType::Lan8720);
                assert_eq!(p.validate(), Ok(()));
            }
        }
    }

    #[test]
    fn mdc_on_gpio16_never_gets_gpio16_clock() {
        let cat = DynamicCatalog::build(at(16, 2, 0));
        assert!(cat.profiles().iter().all(|p| p.clock_mode != ClockMode::Gpio16Out));
        assert_eq!(cat.len(), 16);
    }

    #[test]
    fn smi_on_gpio17_drops_gpio17_clock_variants() {
        let cat = DynamicCatalog::build(at(18, 17, 0));
        assert!(cat.profiles().iter().all(|p| p.clock_mode != ClockMode::Gpio17Out));
        assert_eq!(cat.len(), 16 - 7);
        assert_eq!(cat.location(), at(18, 17, 0));
    }
}
