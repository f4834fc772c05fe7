//! RTC-retained session store
//!
//! The record lives in a static word array. On Xtensa it is linked into the
//! persistent RTC fast memory section, which the startup code neither zeroes
//! nor initialises, so its contents survive `software_reset` and hold
//! garbage after power-on.

use core::sync::atomic::{AtomicU32, Ordering};

use super::{SESSION_WORDS, SessionStore};

#[cfg_attr(target_arch = "xtensa", unsafe(link_section = ".rtc_fast.persistent"))]
static RETAINED: [AtomicU32; SESSION_WORDS] = [const { AtomicU32::new(0) }; SESSION_WORDS];

/// [`SessionStore`] over the retained word array.
///
/// All instances share the same backing memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct RetainedSessionStore;

impl RetainedSessionStore {
    /// Create a handle to the retained region.
    pub const fn new() -> Self {
        Self
    }
}

impl SessionStore for RetainedSessionStore {
    fn load(&mut self) -> [u32; SESSION_WORDS] {
        core::array::from_fn(|i| RETAINED[i].load(Ordering::Relaxed))
    }

    fn store(&mut self, words: &[u32; SESSION_WORDS]) {
        for (slot, &word) in RETAINED.iter().zip(words) {
            slot.store(word, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_one_region() {
        let words = [0x5042_4554, 7, 0x0003_0102, 0x0001_1217];
        RetainedSessionStore::new().store(&words);
        assert_eq!(RetainedSessionStore::new().load(), words);
    }
}
