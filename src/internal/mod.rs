//! Internal Implementation Details
//!
//! Raw memory-mapped register definitions. Not part of the public API; use
//! the [`crate::hal`] wrappers instead.

pub(crate) mod register;
