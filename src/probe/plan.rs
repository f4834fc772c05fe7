//! Probe candidate ordering
//!
//! Phases run in order and stop at the first plausible PHY ID:
//!
//! - [`ProbePhase::Common`]: the standard MDC=23/MDIO=18 pair and its swap,
//!   every clock mode, every address
//! - [`ProbePhase::Extended`]: pairs seen on vendor clone images, every
//!   address
//! - [`ProbePhase::Wide`]: brute force over safe pads, addresses 0..=3 only;
//!   opt-in because it takes tens of seconds

use core::ops::RangeInclusive;

use crate::hal::smi::SmiConfig;
use crate::profile::ClockMode::{self, Gpio0In, Gpio0Out, Gpio16Out, Gpio17Out};

/// Every management address.
pub const ALL_ADDRS: RangeInclusive<u8> = 0..=31;

/// Addresses tried by the wide phase.
pub const WIDE_ADDRS: RangeInclusive<u8> = 0..=3;

/// Clock modes tried with the common pairs.
pub const COMMON_CLOCKS: [ClockMode; 4] = [Gpio0In, Gpio0Out, Gpio17Out, Gpio16Out];

/// Standard SMI pair and its swap.
pub const COMMON_PAIRS: [(u8, u8); 2] = [(23, 18), (18, 23)];

/// Clock modes tried with the extended pairs.
pub const EXTENDED_CLOCKS: [ClockMode; 3] = [Gpio0In, Gpio17Out, Gpio0Out];

/// `(mdc, mdio)` pairs seen on clone boards.
pub const EXTENDED_PAIRS: [(u8, u8); 28] = [
    (16, 32),
    (32, 16),
    (16, 2),
    (2, 16),
    (32, 2),
    (2, 32),
    (23, 32),
    (32, 23),
    (18, 32),
    (32, 18),
    (23, 2),
    (2, 23),
    (18, 2),
    (2, 18),
    (23, 16),
    (16, 23),
    (23, 17),
    (17, 23),
    (18, 16),
    (16, 18),
    (18, 17),
    (17, 18),
    (23, 5),
    (5, 23),
    (18, 5),
    (5, 18),
    (33, 32),
    (32, 33),
];

/// Clock modes tried by the wide phase.
pub const WIDE_CLOCKS: [ClockMode; 4] = [Gpio0In, Gpio17Out, Gpio0Out, Gpio16Out];

/// Pads the wide phase combines into `(mdc, mdio)` pairs.
pub const WIDE_PINS: [u8; 13] = [23, 18, 16, 32, 2, 5, 4, 12, 13, 14, 15, 17, 33];

/// Probe phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbePhase {
    /// Standard pins
    Common,
    /// Known clone pins
    Extended,
    /// Brute force
    Wide,
}

/// One SMI bring-up and the addresses scanned under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeStep {
    /// Phase this step belongs to
    pub phase: ProbePhase,
    /// SMI bring-up parameters
    pub config: SmiConfig,
    /// Addresses to scan, in order
    pub addrs: RangeInclusive<u8>,
}

impl ProbeStep {
    const fn new(phase: ProbePhase, clock_mode: ClockMode, (mdc, mdio): (u8, u8), addrs: RangeInclusive<u8>) -> Self {
        Self {
            phase,
            config: SmiConfig::new(clock_mode, mdc, mdio),
            addrs,
        }
    }
}

/// All probe steps in order. The wide phase is included only when `wide`.
///
/// Common and extended steps are emitted even when the clock output pin
/// collides with MDC or MDIO; the SMI host rejects those at attach time.
pub fn steps(wide: bool) -> impl Iterator<Item = ProbeStep> {
    let common = COMMON_CLOCKS.into_iter().flat_map(|clk| {
        COMMON_PAIRS
            .into_iter()
            .map(move |pair| ProbeStep::new(ProbePhase::Common, clk, pair, ALL_ADDRS))
    });

    let extended = EXTENDED_CLOCKS.into_iter().flat_map(|clk| {
        EXTENDED_PAIRS
            .into_iter()
            .map(move |pair| ProbeStep::new(ProbePhase::Extended, clk, pair, ALL_ADDRS))
    });

    let wide = WIDE_CLOCKS
        .into_iter()
        .filter(move |_| wide)
        .flat_map(|clk| {
            WIDE_PINS.into_iter().flat_map(move |mdc| {
                WIDE_PINS.into_iter().map(move |mdio| (clk, mdc, mdio))
            })
        })
        .filter(|&(clk, mdc, mdio)| mdc != mdio && !clk.collides_with(mdc, mdio))
        .map(|(clk, mdc, mdio)| ProbeStep::new(ProbePhase::Wide, clk, (mdc, mdio), WIDE_ADDRS));

    common.chain(extended).chain(wide)
}
