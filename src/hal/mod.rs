//! Hardware Abstraction Layer
//!
//! Higher-level wrappers over the raw EMAC and GPIO registers.
//!
//! # Modules
//!
//! - [`clock`]: RMII reference clock selection
//! - [`gpio`]: numbered-pin access for board straps
//! - [`mdio`]: MDIO/SMI register access
//! - [`reset`]: EMAC DMA soft reset
//! - [`smi`]: management-bus-only MAC bring-up
//!
//! # Delay Integration
//!
//! All types that require delays use `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g., `esp_hal::delay::Delay`).

pub mod clock;
pub mod gpio;
pub mod mdio;
pub mod reset;
pub mod smi;

pub use clock::{ClockController, ClockRoute};
pub use gpio::{BoardGpio, Esp32Gpio};
pub use mdio::{MdcClockDivider, MdioBus, MdioController, read_phy_id};
pub use reset::ResetController;
pub use smi::{Esp32Smi, SmiConfig, SmiHost, SmiSession};
