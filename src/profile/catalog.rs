//! Static profile catalogue
//!
//! Ordered likeliest first. The order is the search heuristic: the engine
//! walks it one profile per boot, so moving an entry changes how many
//! reboots a given board needs. Bump [`PROFILESET_VERSION`] whenever the
//! contents or order change so stale sticky indices are ignored.

use super::{ClockMode, PhyProfile, PhyType, PowerEnable};

/// Version of the profile catalogue layout.
///
/// Stored alongside the sticky index and in the retained session record.
pub const PROFILESET_VERSION: u32 = 7;

const fn entry(
    label: &'static str,
    phy_addr: u8,
    reset_pin: Option<u8>,
    (mdc_pin, mdio_pin): (u8, u8),
    phy_type: PhyType,
    clock_mode: ClockMode,
    power_enable: Option<PowerEnable>,
) -> PhyProfile {
    PhyProfile::new(label, phy_addr, mdc_pin, mdio_pin, phy_type, clock_mode)
        .with_reset_pin(reset_pin)
        .with_power_enable(power_enable)
}

const HI16: Option<PowerEnable> = Some(PowerEnable::high(16, 250));
const LO16: Option<PowerEnable> = Some(PowerEnable::low(16, 250));

use ClockMode::{Gpio0In, Gpio0Out, Gpio16Out, Gpio17Out};
use PhyType::{
    Dp83848 as D, Ip101 as I, Ksz8041 as K41, Ksz8081 as K81, Lan8720 as L, Rtl8201 as R,
};

/// Hand-curated candidate profiles.
#[rustfmt::skip]
pub static STATIC_PROFILES: &[PhyProfile] = &[
    // Common WT32-ETH01 wiring, reset and power-enable left alone.
    entry("extclk-gpio0_in-addr0", 0, None, (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1", 1, None, (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr2", 2, None, (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr3", 3, None, (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr0-mdc18-mdio23", 0, None, (18, 23), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-mdc18-mdio23", 1, None, (18, 23), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr2-mdc18-mdio23", 2, None, (18, 23), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr3-mdc18-mdio23", 3, None, (18, 23), L, Gpio0In, None),

    // SMI on GPIO16/GPIO32.
    entry("extclk-gpio0_in-addr0-mdc16-mdio32", 0, None, (16, 32), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-mdc16-mdio32", 1, None, (16, 32), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr0-mdc16-mdio32-reset5", 0, Some(5), (16, 32), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-mdc16-mdio32-reset5", 1, Some(5), (16, 32), L, Gpio0In, None),
    entry("intclk-gpio17_out-addr0-mdc16-mdio32", 0, None, (16, 32), L, Gpio17Out, None),
    entry("intclk-gpio17_out-addr1-mdc16-mdio32", 1, None, (16, 32), L, Gpio17Out, None),

    // SMI on GPIO16/GPIO2. GPIO16_OUT is unusable while MDC sits on 16.
    entry("extclk-gpio0_in-addr0-mdc16-mdio2", 0, None, (16, 2), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-mdc16-mdio2", 1, None, (16, 2), L, Gpio0In, None),
    entry("intclk-gpio17_out-addr0-mdc16-mdio2", 0, None, (16, 2), L, Gpio17Out, None),
    entry("intclk-gpio17_out-addr1-mdc16-mdio2", 1, None, (16, 2), L, Gpio17Out, None),

    // MDC on GPIO23, MDIO on GPIO32.
    entry("extclk-gpio0_in-addr0-mdc23-mdio32", 0, None, (23, 32), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-mdc23-mdio32", 1, None, (23, 32), L, Gpio0In, None),
    entry("intclk-gpio17_out-addr0-mdc23-mdio32", 0, None, (23, 32), L, Gpio17Out, None),
    entry("intclk-gpio17_out-addr1-mdc23-mdio32", 1, None, (23, 32), L, Gpio17Out, None),

    // PHY reset on GPIO5.
    entry("extclk-gpio0_in-addr0-reset5", 0, Some(5), (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-reset5", 1, Some(5), (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), L, Gpio0In, HI16),
    entry("extclk-gpio0_in-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), L, Gpio0In, HI16),

    // MDC/MDIO swapped. Symptom on these boards is a LAN87xx power-up
    // timeout while the link LEDs look normal.
    entry("extclk-gpio0_in-addr0-reset5-mdc18-mdio23", 0, Some(5), (18, 23), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-reset5-mdc18-mdio23", 1, Some(5), (18, 23), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr0-reset5-pwren16_hi-mdc18-mdio23", 0, Some(5), (18, 23), L, Gpio0In, HI16),
    entry("extclk-gpio0_in-addr1-reset5-pwren16_hi-mdc18-mdio23", 1, Some(5), (18, 23), L, Gpio0In, HI16),
    entry("extclk-gpio0_in-addr0-pwren16_hi-mdc18-mdio23", 0, None, (18, 23), L, Gpio0In, HI16),
    entry("extclk-gpio0_in-addr1-pwren16_hi-mdc18-mdio23", 1, None, (18, 23), L, Gpio0In, HI16),

    // External oscillator gated by PWR_EN on GPIO16.
    entry("extclk-gpio0_in-addr1-pwren16_hi", 1, None, (23, 18), L, Gpio0In, HI16),
    entry("extclk-gpio0_in-addr0-pwren16_hi", 0, None, (23, 18), L, Gpio0In, HI16),
    entry("extclk-gpio0_in-addr0-reset16", 0, Some(16), (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr1-reset16", 1, Some(16), (23, 18), L, Gpio0In, None),
    entry("extclk-gpio0_in-addr0-reset16-pwren16_hi", 0, Some(16), (23, 18), L, Gpio0In, HI16),

    // Reference clock generated by the ESP32 on GPIO0 or GPIO17.
    entry("intclk-gpio0_out-addr0-pwren16_hi", 0, None, (23, 18), L, Gpio0Out, HI16),
    entry("intclk-gpio0_out-addr1-pwren16_hi", 1, None, (23, 18), L, Gpio0Out, HI16),
    entry("intclk-gpio0_out-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), L, Gpio0Out, HI16),
    entry("intclk-gpio0_out-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), L, Gpio0Out, HI16),
    entry("intclk-gpio0_out-addr0-reset16", 0, Some(16), (23, 18), L, Gpio0Out, None),
    entry("intclk-gpio0_out-addr1-reset16", 1, Some(16), (23, 18), L, Gpio0Out, None),
    entry("intclk-gpio17_out-addr0-reset16", 0, Some(16), (23, 18), L, Gpio17Out, None),
    entry("intclk-gpio17_out-addr1-reset16", 1, Some(16), (23, 18), L, Gpio17Out, None),
    entry("intclk-gpio17_out-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), L, Gpio17Out, HI16),
    entry("intclk-gpio17_out-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), L, Gpio17Out, HI16),
    // GPIO16 clock output.
    entry("intclk-gpio16_out-addr0", 0, None, (23, 18), L, Gpio16Out, None),
    entry("intclk-gpio16_out-addr1", 1, None, (23, 18), L, Gpio16Out, None),
    entry("intclk-gpio16_out-addr2", 2, None, (23, 18), L, Gpio16Out, None),
    entry("intclk-gpio16_out-addr3", 3, None, (23, 18), L, Gpio16Out, None),
    entry("intclk-gpio16_out-addr0-reset5", 0, Some(5), (23, 18), L, Gpio16Out, None),
    entry("intclk-gpio16_out-addr1-reset5", 1, Some(5), (23, 18), L, Gpio16Out, None),
    entry("intclk-gpio16_out-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), L, Gpio16Out, HI16),
    entry("intclk-gpio16_out-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), L, Gpio16Out, HI16),

    // Active-low PWR_EN.
    entry("extclk-gpio0_in-addr1-pwren16_lo", 1, None, (23, 18), L, Gpio0In, LO16),

    // Non-LAN8720 PHYs.
    entry("extclk-ip101-addr0-pwren16_hi", 0, None, (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr1-pwren16_hi", 1, None, (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr2-pwren16_hi", 2, None, (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr3-pwren16_hi", 3, None, (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr2-reset5-pwren16_hi", 2, Some(5), (23, 18), I, Gpio0In, HI16),
    entry("extclk-ip101-addr3-reset5-pwren16_hi", 3, Some(5), (23, 18), I, Gpio0In, HI16),
    entry("intclk-gpio0_out-ip101-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), I, Gpio0Out, HI16),
    entry("intclk-gpio0_out-ip101-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), I, Gpio0Out, HI16),
    entry("intclk-gpio0_out-ip101-addr2-reset5-pwren16_hi", 2, Some(5), (23, 18), I, Gpio0Out, HI16),
    entry("intclk-gpio0_out-ip101-addr3-reset5-pwren16_hi", 3, Some(5), (23, 18), I, Gpio0Out, HI16),
    entry("intclk-gpio17_out-ip101-addr0-reset5-pwren16_hi", 0, Some(5), (23, 18), I, Gpio17Out, HI16),
    entry("intclk-gpio17_out-ip101-addr1-reset5-pwren16_hi", 1, Some(5), (23, 18), I, Gpio17Out, HI16),
    entry("intclk-gpio17_out-ip101-addr2-reset5-pwren16_hi", 2, Some(5), (23, 18), I, Gpio17Out, HI16),
    entry("intclk-gpio17_out-ip101-addr3-reset5-pwren16_hi", 3, Some(5), (23, 18), I, Gpio17Out, HI16),
    // IP101 with MDC/MDIO swapped.
    entry("extclk-ip101-addr0-pwren16_hi-mdc18-mdio23", 0, None, (18, 23), I, Gpio0In, HI16),
    entry("extclk-ip101-addr1-pwren16_hi-mdc18-mdio23", 1, None, (18, 23), I, Gpio0In, HI16),
    entry("extclk-ip101-addr2-pwren16_hi-mdc18-mdio23", 2, None, (18, 23), I, Gpio0In, HI16),
    entry("extclk-ip101-addr3-pwren16_hi-mdc18-mdio23", 3, None, (18, 23), I, Gpio0In, HI16),
    entry("intclk-gpio17_out-ip101-addr0-reset5-pwren16_hi-mdc18-mdio23", 0, Some(5), (18, 23), I, Gpio17Out, HI16),
    entry("intclk-gpio17_out-ip101-addr1-reset5-pwren16_hi-mdc18-mdio23", 1, Some(5), (18, 23), I, Gpio17Out, HI16),
    entry("intclk-gpio17_out-ip101-addr2-reset5-pwren16_hi-mdc18-mdio23", 2, Some(5), (18, 23), I, Gpio17Out, HI16),
    entry("intclk-gpio17_out-ip101-addr3-reset5-pwren16_hi-mdc18-mdio23", 3, Some(5), (18, 23), I, Gpio17Out, HI16),
    entry("extclk-rtl8201-addr0-pwren16_hi", 0, None, (23, 18), R, Gpio0In, HI16),
    entry("extclk-rtl8201-addr1-pwren16_hi", 1, None, (23, 18), R, Gpio0In, HI16),
    entry("extclk-ksz8081-addr0-pwren16_hi", 0, None, (23, 18), K81, Gpio0In, HI16),
    entry("extclk-ksz8081-addr1-pwren16_hi", 1, None, (23, 18), K81, Gpio0In, HI16),
    entry("extclk-ksz8041-addr0-pwren16_hi", 0, None, (23, 18), K41, Gpio0In, HI16),
    entry("extclk-ksz8041-addr1-pwren16_hi", 1, None, (23, 18), K41, Gpio0In, HI16),
    entry("extclk-dp83848-addr0-pwren16_hi", 0, None, (23, 18), D, Gpio0In, HI16),
    entry("extclk-dp83848-addr1-pwren16_hi", 1, None, (23, 18), D, Gpio0In, HI16),
];

/// Index of the first static profile using `phy_type`.
pub fn first_index_of_type(phy_type: PhyType) -> Option<usize> {
    STATIC_PROFILES.iter().position(|p| p.phy_type == phy_type)
}
