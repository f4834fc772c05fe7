//! Boot-time Ethernet bring-up
//!
//! [`Autoconfig`] runs one step of the cross-reboot profile search per boot:
//! resume the session, probe once per session, pick the catalogue slice and
//! index, apply the profile, and turn the init outcome into an [`Action`].
//! [`Autoconfig::setup_ethernet`] carries the action out: reboot, give up, or
//! wait for DHCP.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use super::session::{Action, Attempt, AutoconfigSession, InitOutcome, ProfileSource, RebootReason, sticky_action};
use crate::config::EthConfig;
use crate::error::Result;
use crate::hal::gpio::BoardGpio;
use crate::hal::smi::SmiHost;
use crate::link::LinkSupervisor;
use crate::persist::{PreferenceStore, SessionStore, StickyPreference, load_sticky_index};
use crate::platform::{EthDriver, Restart, flush_log};
use crate::probe::{COMMON_PWR_EN_PIN, MdioProbe, PWR_EN_SETTLE_MS};
use crate::profile::{DynamicCatalog, PhyProfile, STATIC_PROFILES, first_index_of_type};

/// Strap pins pulled up before any MAC init.
pub const STRAP_PULLUP_PINS: [u8; 2] = [2, 32];

/// Settle time after releasing a PHY reset line.
pub const RESET_RELEASE_MS: u32 = 10;

/// Pause before a reboot so the log reaches the console.
pub const REBOOT_DELAY_MS: u32 = 1500;

/// How long to wait for a DHCP lease after init.
pub const DHCP_TIMEOUT_MS: u32 = 15_000;

/// Lease poll interval.
pub const DHCP_POLL_MS: u32 = 100;

/// Result of one boot step, before any reboot or DHCP wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootReport {
    /// Attempt made on this boot
    pub attempt: Attempt,
    /// Profile that was applied
    pub profile: PhyProfile,
    /// Platform init outcome
    pub outcome: InitOutcome,
    /// What to do next
    pub action: Action,
    /// Preference to write once the link is up
    pub on_link_up: Option<StickyPreference>,
}

/// How [`Autoconfig::setup_ethernet`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupOutcome {
    /// A DHCP lease was obtained
    Online,
    /// Init succeeded but no lease within [`DHCP_TIMEOUT_MS`]
    DhcpTimeout,
    /// Fixed profile init failed
    InitFailed,
    /// Every profile failed this session
    Exhausted,
    /// A restart was requested
    Rebooting,
}

/// Profile search engine.
///
/// Owns the management-bus host, the strap GPIOs, a delay and both stores.
/// Pass `&mut` references to keep access to them.
pub struct Autoconfig<'a, H, G, D, S, P>
where
    H: SmiHost,
    G: BoardGpio,
    D: DelayNs,
    S: SessionStore,
    P: PreferenceStore,
{
    config: &'a EthConfig,
    smi: H,
    gpio: G,
    delay: D,
    sessions: S,
    prefs: P,
    pending: Option<StickyPreference>,
}

impl<'a, H, G, D, S, P> Autoconfig<'a, H, G, D, S, P>
where
    H: SmiHost,
    G: BoardGpio,
    D: DelayNs,
    S: SessionStore,
    P: PreferenceStore,
{
    /// Create an engine.
    ///
    /// Fails with the [`EthConfig::validate`] error if `config` is invalid.
    pub fn new(config: &'a EthConfig, smi: H, gpio: G, delay: D, sessions: S, prefs: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            smi,
            gpio,
            delay,
            sessions,
            prefs,
            pending: None,
        })
    }

    /// Preference waiting for the first lease, if any.
    pub fn pending_sticky(&self) -> Option<StickyPreference> {
        self.pending
    }

    /// Bring Ethernet up and wait for DHCP.
    ///
    /// On hardware a reboot request does not return; with a host
    /// [`Restart`] this returns [`SetupOutcome::Rebooting`].
    pub fn setup_ethernet<E, R>(&mut self, eth: &mut E, link: &LinkSupervisor, restart: &mut R) -> SetupOutcome
    where
        E: EthDriver + ?Sized,
        R: Restart + ?Sized,
    {
        info!("Ethernet: initialising PHY (RMII)");
        link.mark_offline();
        self.pending = None;

        if !self.config.autoconfig {
            return self.setup_fixed(eth, link);
        }

        let report = self.run_one_boot(eth);
        match report.action {
            Action::Reboot { reason } => {
                match reason {
                    RebootReason::NextProfile => info!(
                        "ETH autoconfig: rebooting for the next profile ({}/{})",
                        (report.attempt.index as usize + 1) % report.attempt.len + 1,
                        report.attempt.len
                    ),
                    RebootReason::Fallback => {
                        warn!("Fallback: switching to the generic profile list and rebooting");
                    }
                }
                self.reboot(restart);
                SetupOutcome::Rebooting
            }
            Action::TerminalExhaustion => {
                log_exhaustion();
                SetupOutcome::Exhausted
            }
            Action::Proceed | Action::WriteSticky { .. } => {
                self.pending = report.on_link_up;
                self.await_lease(link)
            }
        }
    }

    /// Write the pending preference once `link` is online.
    ///
    /// Returns `true` when a preference was written.
    pub fn commit_on_link_up(&mut self, link: &LinkSupervisor) -> bool {
        if !link.is_online() {
            return false;
        }
        let Some(pref) = self.pending.take() else {
            return false;
        };
        match pref.write(&mut self.prefs) {
            Ok(()) => {
                info!("ETH autoconfig: saved profile {} as preferred", pref.index as usize + 1);
                true
            }
            Err(e) => {
                warn!("ETH autoconfig: cannot save preferred profile: {}", e);
                false
            }
        }
    }

    /// One step of the search, with no reboot and no DHCP wait.
    ///
    /// Reads the session, probes if this is the first boot of the session,
    /// applies one profile and stores the advanced session before returning.
    pub fn run_one_boot<E: EthDriver + ?Sized>(&mut self, eth: &mut E) -> BootReport {
        self.prepare_straps();

        let (mut session, cold) = AutoconfigSession::resume(&self.sessions.load());
        if cold {
            info!("ETH autoconfig: new session");
        }

        if !session.detect_done {
            let hit = MdioProbe::new(&mut self.smi, &mut self.gpio, &mut self.delay, self.config.wide_detect)
                .detect_phy();
            session.record_detection(hit.map(|phy| phy.location));
        }

        let dynamic = self.dynamic_catalog(&mut session);
        let profiles = dynamic.as_ref().map_or(STATIC_PROFILES, DynamicCatalog::profiles);

        let mut stored = None;
        let mut preferred = None;
        if session.source == ProfileSource::StaticCatalog {
            stored = load_sticky_index(&mut self.prefs, profiles.len());
            preferred = stored.or_else(|| self.config.preferred_phy.and_then(first_index_of_type));
        }
        session.seed(cold, profiles.len(), preferred);

        let attempt = session.attempt(profiles.len());
        let Some(&profile) = profiles.get(usize::from(attempt.index)) else {
            // Unreachable after seeding: static and dynamic slices are never empty
            self.sessions.store(&session.encode());
            return BootReport {
                attempt,
                profile: self.config.fixed_profile,
                outcome: InitOutcome::Failed,
                action: Action::TerminalExhaustion,
                on_link_up: None,
            };
        };

        log_attempt(&attempt, &profile);
        let outcome = match self.apply_profile(&profile, eth) {
            Ok(()) => InitOutcome::Attached,
            Err(e) => {
                error!("ETH init failed (PHY not responding): {}", e);
                InitOutcome::Failed
            }
        };

        let (session, action) = session.advance(attempt, outcome);
        self.sessions.store(&session.encode());

        BootReport {
            attempt,
            profile,
            outcome,
            action,
            on_link_up: match action {
                Action::Proceed => sticky_action(&attempt, stored).sticky(),
                _ => None,
            },
        }
    }

    fn prepare_straps(&mut self) {
        self.gpio.set_output(COMMON_PWR_EN_PIN, PinState::High);
        self.delay.delay_ms(PWR_EN_SETTLE_MS);
        for pin in STRAP_PULLUP_PINS {
            self.gpio.set_input_pullup(pin);
        }
    }

    /// The dynamic catalogue for `session`, demoting it when none can be built.
    fn dynamic_catalog(&self, session: &mut AutoconfigSession) -> Option<DynamicCatalog> {
        if session.source != ProfileSource::DynamicFromDetect {
            return None;
        }
        let Some(location) = session.detected else {
            warn!("ETH autoconfig: cached probe hit incomplete, using the static list");
            session.demote_to_static();
            return None;
        };
        let catalog = DynamicCatalog::build(location);
        if catalog.is_empty() {
            warn!("ETH autoconfig: no profiles for the detected PHY, using the static list");
            session.demote_to_static();
            return None;
        }
        Some(catalog)
    }

    /// Power, reset, diagnostic ID read, platform init.
    fn apply_profile<E: EthDriver + ?Sized>(&mut self, profile: &PhyProfile, eth: &mut E) -> Result<()> {
        if let Some(pwr) = profile.power_enable {
            self.gpio.set_output(pwr.pin, pwr.level());
            if pwr.delay_ms > 0 {
                self.delay.delay_ms(u32::from(pwr.delay_ms));
            }
        }

        if let Some(reset) = profile.distinct_reset_pin() {
            self.gpio.set_output(reset, PinState::High);
            self.delay.delay_ms(RESET_RELEASE_MS);
        }

        let id = MdioProbe::new(&mut self.smi, &mut self.gpio, &mut self.delay, false).read_phy_id(
            profile.clock_mode,
            profile.mdc_pin,
            profile.mdio_pin,
            profile.phy_addr,
        );
        match id {
            Ok((id1, id2)) => info!("   PHY_ID={:#06x}/{:#06x}", id1, id2),
            Err(_) => info!("   PHY_ID=<read failed>"),
        }

        eth.begin(profile)
    }

    fn setup_fixed<E: EthDriver + ?Sized>(&mut self, eth: &mut E, link: &LinkSupervisor) -> SetupOutcome {
        let profile = self.config.fixed_profile;
        info!("   PHY_ADDR={}, RESET={:?}", profile.phy_addr, profile.reset_pin);
        info!("   MDC={}, MDIO={}", profile.mdc_pin, profile.mdio_pin);
        info!("   CLK_MODE={}", profile.clock_mode.as_str());
        info!("   PWR_EN={:?}", profile.power_enable);

        if let Some(pwr) = profile.power_enable {
            self.gpio.set_output(pwr.pin, pwr.level());
            self.delay.delay_ms(u32::from(pwr.delay_ms));
        }

        if let Err(e) = eth.begin(&profile) {
            error!("Ethernet start failed: {}", e);
            return SetupOutcome::InitFailed;
        }
        self.await_lease(link)
    }

    fn await_lease(&mut self, link: &LinkSupervisor) -> SetupOutcome {
        info!("Waiting for DHCP...");
        let mut waited = 0;
        while !link.is_online() && waited < DHCP_TIMEOUT_MS {
            self.delay.delay_ms(DHCP_POLL_MS);
            waited += DHCP_POLL_MS;
        }

        if !link.is_online() {
            warn!("DHCP: no lease within {} s", DHCP_TIMEOUT_MS / 1000);
            return SetupOutcome::DhcpTimeout;
        }
        self.commit_on_link_up(link);
        info!("Ethernet ready");
        SetupOutcome::Online
    }

    fn reboot<R: Restart + ?Sized>(&mut self, restart: &mut R) {
        self.delay.delay_ms(REBOOT_DELAY_MS);
        flush_log();
        restart.restart();
    }
}

fn log_attempt(attempt: &Attempt, p: &PhyProfile) {
    info!(
        "ETH autoconfig: attempt {}/{}, {} profile {}: {}",
        attempt.number,
        attempt.len,
        attempt.source.as_str(),
        attempt.index as usize + 1,
        p.label
    );
    info!(
        "   PHY_TYPE={}, PHY_ADDR={}, RESET={:?}",
        p.phy_type.as_str(),
        p.phy_addr,
        p.reset_pin
    );
    info!("   MDC={}, MDIO={}", p.mdc_pin, p.mdio_pin);
    info!("   CLK_MODE={}", p.clock_mode.as_str());
    info!("   PWR_EN={:?}", p.power_enable);
}

fn log_exhaustion() {
    error!("ETH autoconfig: no profile worked");
    error!("   Common causes:");
    error!("   - wrong RMII clock mode (IN/OUT) or clock pin");
    error!("   - another PHY type (LAN8720 vs IP101/RTL8201)");
    error!("   - PHY unpowered or held in reset");
    error!("   Board checks (ESP32-ETH01 clones):");
    error!("   - plug into a switch: the RJ45 LINK/ACT LEDs should light");
    error!("   - measure IO16 to GND during boot: about 3.3 V if it is PWR_EN");
    error!("   - check the 50 MHz oscillator is fitted the right way round");
}
