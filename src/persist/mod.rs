//! Persistence layer
//!
//! Two isolated stores back the autoconfiguration search:
//!
//! - [`SessionStore`]: a few words that survive a soft reboot but not a power
//!   cycle. The engine keeps its search position here.
//! - [`PreferenceStore`]: a namespaced key-value store in flash. Only the
//!   [`StickyPreference`] lives here.
//!
//! Neither store knows what the words mean; the session record layout is
//! owned by [`crate::autoconfig::session`].

pub mod retained;

use crate::error::Result;
use crate::profile::PROFILESET_VERSION;

pub use retained::RetainedSessionStore;

/// Words in one retained session record.
pub const SESSION_WORDS: usize = 4;

/// Non-volatile namespace of the sticky preference.
pub const PREF_NAMESPACE: &str = "pb_eth";

/// Key holding the profile set version the index belongs to.
pub const KEY_CFG_VER: &str = "cfg_ver";

/// Key holding the static catalogue index.
pub const KEY_CFG_IDX: &str = "cfg_idx";

/// Index value meaning "no preference".
pub const NO_INDEX: u8 = 0xFF;

// =============================================================================
// Store traits
// =============================================================================

/// Memory retained across soft reboot.
///
/// After a power cycle the contents are arbitrary; callers validate them.
pub trait SessionStore {
    /// Read the raw record.
    fn load(&mut self) -> [u32; SESSION_WORDS];

    /// Overwrite the raw record.
    fn store(&mut self, words: &[u32; SESSION_WORDS]);
}

impl<T: SessionStore + ?Sized> SessionStore for &mut T {
    fn load(&mut self) -> [u32; SESSION_WORDS] {
        T::load(self)
    }

    fn store(&mut self, words: &[u32; SESSION_WORDS]) {
        T::store(self, words);
    }
}

/// Namespaced non-volatile key-value store.
///
/// Implementations open the namespace read-write so that it is created on
/// first use. A missing key reads as `Ok(None)`.
pub trait PreferenceStore {
    /// Read a `u32` value.
    fn get_u32(&mut self, namespace: &str, key: &str) -> Result<Option<u32>>;

    /// Read a `u8` value.
    fn get_u8(&mut self, namespace: &str, key: &str) -> Result<Option<u8>>;

    /// Write a `u32` value.
    fn put_u32(&mut self, namespace: &str, key: &str, value: u32) -> Result<()>;

    /// Write a `u8` value.
    fn put_u8(&mut self, namespace: &str, key: &str, value: u8) -> Result<()>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &mut T {
    fn get_u32(&mut self, namespace: &str, key: &str) -> Result<Option<u32>> {
        T::get_u32(self, namespace, key)
    }

    fn get_u8(&mut self, namespace: &str, key: &str) -> Result<Option<u8>> {
        T::get_u8(self, namespace, key)
    }

    fn put_u32(&mut self, namespace: &str, key: &str, value: u32) -> Result<()> {
        T::put_u32(self, namespace, key, value)
    }

    fn put_u8(&mut self, namespace: &str, key: &str, value: u8) -> Result<()> {
        T::put_u8(self, namespace, key, value)
    }
}

// =============================================================================
// Sticky preference
// =============================================================================

/// Static catalogue index that last produced a working link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickyPreference {
    /// Catalogue shape the index refers to
    pub profileset_version: u32,
    /// Index into the static catalogue
    pub index: u8,
}

impl StickyPreference {
    /// A preference for `index` in the current catalogue.
    pub const fn current(index: u8) -> Self {
        Self {
            profileset_version: PROFILESET_VERSION,
            index,
        }
    }

    /// Read the stored preference. `None` if either key is missing.
    pub fn read<P: PreferenceStore + ?Sized>(prefs: &mut P) -> Result<Option<Self>> {
        let Some(profileset_version) = prefs.get_u32(PREF_NAMESPACE, KEY_CFG_VER)? else {
            return Ok(None);
        };
        let Some(index) = prefs.get_u8(PREF_NAMESPACE, KEY_CFG_IDX)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            profileset_version,
            index,
        }))
    }

    /// Write this preference, version first.
    pub fn write<P: PreferenceStore + ?Sized>(&self, prefs: &mut P) -> Result<()> {
        prefs.put_u32(PREF_NAMESPACE, KEY_CFG_VER, self.profileset_version)?;
        prefs.put_u8(PREF_NAMESPACE, KEY_CFG_IDX, self.index)
    }

    /// The index, if it belongs to the current catalogue and lies below `len`.
    pub const fn usable_index(&self, len: usize) -> Option<usize> {
        if self.profileset_version != PROFILESET_VERSION || self.index == NO_INDEX {
            return None;
        }
        if (self.index as usize) < len {
            Some(self.index as usize)
        } else {
            None
        }
    }
}

/// Load the usable sticky index for a static catalogue of `len` entries.
///
/// Store errors are logged and read as "no preference".
pub fn load_sticky_index<P: PreferenceStore + ?Sized>(prefs: &mut P, len: usize) -> Option<usize> {
    match StickyPreference::read(prefs) {
        Ok(pref) => pref.and_then(|p| p.usable_index(len)),
        Err(e) => {
            warn!("Preferences: cannot read {}: {}", PREF_NAMESPACE, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StoreError};
    use crate::testing::MemoryPreferenceStore;

    #[test]
    fn missing_keys_read_as_none() {
        let mut prefs = MemoryPreferenceStore::new();
        assert_eq!(StickyPreference::read(&mut prefs), Ok(None));

        prefs.put_u32(PREF_NAMESPACE, KEY_CFG_VER, PROFILESET_VERSION).unwrap();
        assert_eq!(StickyPreference::read(&mut prefs), Ok(None));
    }

    #[test]
    fn write_then_read() {
        let mut prefs = MemoryPreferenceStore::new();
        StickyPreference::current(2).write(&mut prefs).unwrap();
        assert_eq!(prefs.get_u32(PREF_NAMESPACE, KEY_CFG_VER), Ok(Some(PROFILESET_VERSION)));
        assert_eq!(prefs.get_u8(PREF_NAMESPACE, KEY_CFG_IDX), Ok(Some(2)));
        assert_eq!(load_sticky_index(&mut prefs, 10), Some(2));
        assert_eq!(prefs.writes(), 2);
    }

    #[test]
    fn stale_version_is_never_used() {
        let stale = StickyPreference {
            profileset_version: PROFILESET_VERSION - 1,
            index: 14,
        };
        assert_eq!(stale.usable_index(88), None);

        let mut prefs = MemoryPreferenceStore::new();
        stale.write(&mut prefs).unwrap();
        assert_eq!(load_sticky_index(&mut prefs, 88), None);
    }

    #[test]
    fn out_of_range_and_sentinel_indices_are_ignored() {
        assert_eq!(StickyPreference::current(NO_INDEX).usable_index(usize::MAX), None);
        assert_eq!(StickyPreference::current(10).usable_index(10), None);
        assert_eq!(StickyPreference::current(9).usable_index(10), Some(9));
    }

    #[test]
    fn store_errors_read_as_no_preference() {
        let mut prefs = MemoryPreferenceStore::new();
        StickyPreference::current(3).write(&mut prefs).unwrap();
        prefs.set_unavailable(true);
        assert_eq!(
            StickyPreference::read(&mut prefs),
            Err(Error::Store(StoreError::Unavailable))
        );
        assert_eq!(load_sticky_index(&mut prefs, 10), None);
    }
}
