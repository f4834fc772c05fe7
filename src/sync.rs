//! Interrupt-safe shared state
//!
//! The network event callback runs outside the foreground loop. State it
//! writes that is wider than a machine word goes through
//! [`CriticalSectionCell`].

use core::cell::RefCell;

use critical_section::Mutex;

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable access
/// from both normal code and interrupt handlers.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }
}

impl<T: Copy> CriticalSectionCell<T> {
    /// Copy the current value out.
    #[inline]
    pub fn get(&self) -> T {
        critical_section::with(|cs| *self.inner.borrow_ref(cs))
    }

    /// Replace the current value.
    #[inline]
    pub fn set(&self, value: T) {
        self.with(|slot| *slot = value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_mutates_in_place() {
        let cell = CriticalSectionCell::new(1u32);
        cell.with(|v| *v += 41);
        assert_eq!(cell.get(), 42);
        cell.set(7);
        assert_eq!(cell.with(|v| *v), 7);
    }
}
