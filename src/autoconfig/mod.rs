//! PHY autoconfiguration
//!
//! Clone boards disagree on PHY model, address, SMI pins, clock source and
//! reset/power straps. A failed MAC init leaks driver resources, so the
//! search tries one profile per boot and reboots between attempts, keeping
//! its position in retained memory.
//!
//! # Search order
//!
//! 1. Once per session, probe the management bus for any PHY.
//! 2. On a hit, try the dynamic catalogue built around it; otherwise the
//!    static catalogue, starting from the sticky preference or the
//!    preferred PHY type.
//! 3. Exhausting the dynamic catalogue falls back to the static one once.
//!    Exhausting the static one ends the search until the next power cycle.
//!
//! # Modules
//!
//! - [`session`]: retained state and its pure transitions
//! - [`engine`]: the per-boot driver over the hardware seams

pub mod engine;
pub mod session;

pub use engine::{Autoconfig, BootReport, SetupOutcome};
pub use session::{
    Action, Attempt, AutoconfigSession, InitOutcome, ProfileSource, RebootReason, SESSION_MAGIC,
};
