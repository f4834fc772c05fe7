//! Cross-reboot search state
//!
//! [`AutoconfigSession`] is the search position kept in retained memory, and
//! its methods are the pure transitions of the search. Nothing here touches
//! hardware.
//!
//! # Record layout
//!
//! | Word | Bits   | Field                                           |
//! |------|--------|-------------------------------------------------|
//! | 0    | 0..32  | magic `0x50424554` (`'PBET'`)                   |
//! | 1    | 0..32  | profile set version                             |
//! | 2    | 0..8   | `next_profile`                                  |
//! | 2    | 8..16  | `tried_count`                                   |
//! | 2    | 16..19 | flags: detect done, detect valid, source dynamic |
//! | 3    | 0..24  | cached hit: MDC, MDIO, address                  |
//!
//! Any other bit set in word 2 or 3 marks the record corrupt.

use crate::hal::mdio::MAX_PHY_ADDR;
use crate::internal::register::gpio::MAX_GPIO;
use crate::persist::{SESSION_WORDS, StickyPreference};
use crate::probe::SmiLocation;
use crate::profile::PROFILESET_VERSION;

/// Session validity tag.
pub const SESSION_MAGIC: u32 = 0x5042_4554;

const FLAG_DETECT_DONE: u32 = 1 << 0;
const FLAG_DETECT_VALID: u32 = 1 << 1;
const FLAG_SOURCE_DYNAMIC: u32 = 1 << 2;
const FLAGS_MASK: u32 = FLAG_DETECT_DONE | FLAG_DETECT_VALID | FLAG_SOURCE_DYNAMIC;

const NO_LOCATION: u32 = 0x00FF_FFFF;

/// Which catalogue `next_profile` indexes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileSource {
    /// Hand-curated static catalogue
    #[default]
    StaticCatalog,
    /// Profiles built from the cached probe hit
    DynamicFromDetect,
}

impl ProfileSource {
    /// Short name for logs
    pub const fn as_str(self) -> &'static str {
        match self {
            ProfileSource::StaticCatalog => "static",
            ProfileSource::DynamicFromDetect => "dynamic",
        }
    }
}

/// Why the engine wants a reboot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RebootReason {
    /// Try the next profile of the same catalogue
    NextProfile,
    /// Dynamic catalogue exhausted, restart on the static one
    Fallback,
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Carry on with the attached link
    Proceed,
    /// Restart the chip
    Reboot {
        /// Reason, for logs
        reason: RebootReason,
    },
    /// Every profile failed; stop searching for this session
    TerminalExhaustion,
    /// Persist this static catalogue index as the sticky preference
    WriteSticky {
        /// Index to write
        index: u8,
    },
}

/// Result of the platform MAC/PHY init for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitOutcome {
    /// Init reported success
    Attached,
    /// Init failed
    Failed,
}

/// One profile attempt within a catalogue slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Attempt {
    /// Catalogue the index belongs to
    pub source: ProfileSource,
    /// Profile index
    pub index: u8,
    /// Slice length
    pub len: usize,
    /// 1-based attempt number within the session
    pub number: usize,
}

/// Search state persisted across soft reboots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AutoconfigSession {
    /// Profile to try on this boot
    pub next_profile: u8,
    /// Profiles that failed in this session
    pub tried_count: u8,
    /// Global probe already ran this session
    pub detect_done: bool,
    /// Cached probe hit; `Some` means detect valid
    pub detected: Option<SmiLocation>,
    /// Catalogue in use
    pub source: ProfileSource,
}

impl AutoconfigSession {
    /// The all-zero cold-boot session.
    pub const fn cold() -> Self {
        Self {
            next_profile: 0,
            tried_count: 0,
            detect_done: false,
            detected: None,
            source: ProfileSource::StaticCatalog,
        }
    }

    /// Whether the probe produced a hit.
    pub const fn detect_valid(&self) -> bool {
        self.detected.is_some()
    }

    /// Decode a retained record. `None` if it is stale or corrupt.
    pub fn decode(words: &[u32; SESSION_WORDS]) -> Option<Self> {
        let [magic, version, state, location] = *words;
        if magic != SESSION_MAGIC || version != PROFILESET_VERSION {
            return None;
        }

        let flags = state >> 16;
        if flags & !FLAGS_MASK != 0 || location & !NO_LOCATION != 0 {
            return None;
        }
        let detect_done = flags & FLAG_DETECT_DONE != 0;
        let detect_valid = flags & FLAG_DETECT_VALID != 0;
        if detect_valid && !detect_done {
            return None;
        }

        Some(Self {
            next_profile: state as u8,
            tried_count: (state >> 8) as u8,
            detect_done,
            detected: if detect_valid { decode_location(location) } else { None },
            source: if flags & FLAG_SOURCE_DYNAMIC != 0 {
                ProfileSource::DynamicFromDetect
            } else {
                ProfileSource::StaticCatalog
            },
        })
    }

    /// Encode as a retained record.
    pub fn encode(&self) -> [u32; SESSION_WORDS] {
        let mut flags = 0;
        if self.detect_done {
            flags |= FLAG_DETECT_DONE;
        }
        if self.detected.is_some() {
            flags |= FLAG_DETECT_VALID;
        }
        if self.source == ProfileSource::DynamicFromDetect {
            flags |= FLAG_SOURCE_DYNAMIC;
        }
        let location = self.detected.map_or(NO_LOCATION, |loc| {
            u32::from(loc.mdc_pin) | u32::from(loc.mdio_pin) << 8 | u32::from(loc.phy_addr) << 16
        });

        [
            SESSION_MAGIC,
            PROFILESET_VERSION,
            u32::from(self.next_profile) | u32::from(self.tried_count) << 8 | flags << 16,
            location,
        ]
    }

    /// Decode `words`, falling back to a cold session.
    ///
    /// The flag is `true` when the record was stale or corrupt.
    pub fn resume(words: &[u32; SESSION_WORDS]) -> (Self, bool) {
        match Self::decode(words) {
            Some(session) => (session, false),
            None => (Self::cold(), true),
        }
    }

    /// Record the global probe result.
    pub fn record_detection(&mut self, hit: Option<SmiLocation>) {
        self.detect_done = true;
        self.detected = hit;
        self.source = if hit.is_some() {
            ProfileSource::DynamicFromDetect
        } else {
            ProfileSource::StaticCatalog
        };
    }

    /// Switch to the static catalogue from its first entry.
    pub fn demote_to_static(&mut self) {
        self.source = ProfileSource::StaticCatalog;
        self.detected = None;
        self.next_profile = 0;
        self.tried_count = 0;
    }

    /// Bring the search position inside a slice of `len` profiles.
    ///
    /// Reseeds on a cold session or when either counter is out of range.
    /// A static slice starts at `preferred` when given, a dynamic one at 0.
    /// Returns whether the position was reseeded.
    pub fn seed(&mut self, cold: bool, len: usize, preferred: Option<usize>) -> bool {
        let out_of_range = usize::from(self.next_profile) >= len || usize::from(self.tried_count) >= len;
        if !cold && !out_of_range {
            return false;
        }
        self.tried_count = 0;
        self.next_profile = match self.source {
            ProfileSource::StaticCatalog => preferred.filter(|&i| i < len).unwrap_or(0) as u8,
            ProfileSource::DynamicFromDetect => 0,
        };
        true
    }

    /// The attempt this session describes for a slice of `len` profiles.
    pub const fn attempt(&self, len: usize) -> Attempt {
        Attempt {
            source: self.source,
            index: self.next_profile,
            len,
            number: self.tried_count as usize + 1,
        }
    }

    /// Apply the init outcome of `attempt`.
    ///
    /// A failure advances to the next profile. Failing the last untried
    /// dynamic profile demotes to the static catalogue once; failing the
    /// last static one is terminal.
    pub fn advance(mut self, attempt: Attempt, outcome: InitOutcome) -> (Self, Action) {
        if outcome == InitOutcome::Attached {
            self.tried_count = 0;
            self.next_profile = attempt.index;
            return (self, Action::Proceed);
        }

        self.tried_count = self.tried_count.saturating_add(1);
        self.next_profile = ((usize::from(attempt.index) + 1) % attempt.len.max(1)) as u8;
        if usize::from(self.tried_count) < attempt.len {
            return (
                self,
                Action::Reboot {
                    reason: RebootReason::NextProfile,
                },
            );
        }

        match self.source {
            ProfileSource::DynamicFromDetect => {
                self.demote_to_static();
                (
                    self,
                    Action::Reboot {
                        reason: RebootReason::Fallback,
                    },
                )
            }
            ProfileSource::StaticCatalog => (self, Action::TerminalExhaustion),
        }
    }
}

/// What to do with the sticky preference once the link is up.
///
/// Only a static catalogue index that differs from the stored one is
/// written.
pub const fn sticky_action(attempt: &Attempt, stored: Option<usize>) -> Action {
    match (attempt.source, stored) {
        (ProfileSource::DynamicFromDetect, _) => Action::Proceed,
        (ProfileSource::StaticCatalog, Some(i)) if i == attempt.index as usize => Action::Proceed,
        (ProfileSource::StaticCatalog, _) => Action::WriteSticky {
            index: attempt.index,
        },
    }
}

impl Action {
    /// The preference to write, for [`Action::WriteSticky`].
    pub const fn sticky(self) -> Option<StickyPreference> {
        match self {
            Action::WriteSticky { index } => Some(StickyPreference::current(index)),
            _ => None,
        }
    }
}

fn decode_location(word: u32) -> Option<SmiLocation> {
    let (mdc_pin, mdio_pin, phy_addr) = (word as u8, (word >> 8) as u8, (word >> 16) as u8);
    if mdc_pin > MAX_GPIO || mdio_pin > MAX_GPIO || phy_addr > MAX_PHY_ADDR {
        return None;
    }
    Some(SmiLocation {
        mdc_pin,
        mdio_pin,
        phy_addr,
    })
}
