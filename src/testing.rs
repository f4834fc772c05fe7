//! Testing utilities and mock implementations
//!
//! Host-side stand-ins for every hardware seam, so a whole boot cycle runs
//! under `cargo test`.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use core::cell::{Cell, RefCell};
use core::net::Ipv4Addr;
use std::collections::{HashMap, HashSet, VecDeque};
use std::string::{String, ToString};
use std::vec::Vec;

use embedded_hal::digital::PinState;

use crate::autoconfig::AutoconfigSession;
use crate::error::{ConfigError, HttpError, IoError, LinkError, Result, StoreError};
use crate::hal::mdio::{MdioBus, phy_reg};
use crate::hal::smi::{SmiConfig, SmiHost};
use crate::heartbeat::HeartbeatTransport;
use crate::indicator::Indicator;
use crate::link::{IpInfo, LinkSupervisor, NetEvent, Netif};
use crate::persist::{PreferenceStore, SESSION_WORDS, SessionStore};
use crate::platform::{EthDriver, Monotonic, Restart};
use crate::profile::{ClockMode, PhyProfile};

/// Value read from an address nobody answers on.
pub const FLOATING: u16 = 0xFFFF;

fn id_register(reg_addr: u8, (id1, id2): (u16, u16)) -> u16 {
    match reg_addr {
        phy_reg::PHYIDR1 => id1,
        phy_reg::PHYIDR2 => id2,
        _ => 0,
    }
}

// =============================================================================
// Mock MDIO Bus
// =============================================================================

/// Mock MDIO bus with a PHY ID per address
#[derive(Debug, Default)]
pub struct MockMdioBus {
    ids: HashMap<u8, (u16, u16)>,
    fail_reads: bool,
    writes: Vec<(u8, u8, u16)>,
}

impl MockMdioBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer at `addr` with the given identifier words
    pub fn set_phy_id(&mut self, addr: u8, id1: u16, id2: u16) {
        self.ids.insert(addr, (id1, id2));
    }

    /// Make every read time out
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn writes(&self) -> &[(u8, u8, u16)] {
        &self.writes
    }
}

impl MdioBus for MockMdioBus {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        if self.fail_reads {
            return Err(IoError::Timeout.into());
        }
        Ok(self
            .ids
            .get(&phy_addr)
            .map_or(FLOATING, |&id| id_register(reg_addr, id)))
    }

    fn write(&mut self, phy_addr: u8, reg_addr: u8, value: u16) -> Result<()> {
        self.writes.push((phy_addr, reg_addr, value));
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }
}

// =============================================================================
// Mock SMI Host
// =============================================================================

/// Mock SMI host: PHYs answer only under the exact bring-up they are wired for
#[derive(Debug, Default)]
pub struct MockSmiHost {
    phys: HashMap<(SmiConfig, u8), (u16, u16)>,
    failing_reads: HashSet<(SmiConfig, u8)>,
    failing_clocks: HashSet<ClockMode>,
    attached: Option<SmiConfig>,
    attach_count: usize,
    history: Vec<SmiConfig>,
}

impl MockSmiHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a PHY at `addr` on the bus brought up with `config`
    pub fn add_phy(&mut self, config: SmiConfig, addr: u8, id1: u16, id2: u16) {
        self.phys.insert((config, addr), (id1, id2));
    }

    /// Make the MAC fail to start under `clock`
    pub fn fail_attach(&mut self, clock: ClockMode) {
        self.failing_clocks.insert(clock);
    }

    /// Make reads at `addr` fail under `config`
    pub fn fail_reads_at(&mut self, config: SmiConfig, addr: u8) {
        self.failing_reads.insert((config, addr));
    }

    pub fn attached(&self) -> Option<SmiConfig> {
        self.attached
    }

    /// Number of attach calls, successful or not
    pub fn attach_count(&self) -> usize {
        self.attach_count
    }

    /// Every config passed to attach, in order
    pub fn history(&self) -> &[SmiConfig] {
        &self.history
    }
}

impl SmiHost for MockSmiHost {
    fn attach(&mut self, config: &SmiConfig) -> Result<()> {
        self.detach();
        self.attach_count += 1;
        self.history.push(*config);
        config.validate()?;
        if self.failing_clocks.contains(&config.clock_mode) {
            return Err(ConfigError::ResetFailed.into());
        }
        self.attached = Some(*config);
        Ok(())
    }

    fn detach(&mut self) {
        self.attached = None;
    }
}

impl MdioBus for MockSmiHost {
    fn read(&mut self, phy_addr: u8, reg_addr: u8) -> Result<u16> {
        let Some(config) = self.attached else {
            return Err(IoError::InvalidState.into());
        };
        if self.failing_reads.contains(&(config, phy_addr)) {
            return Err(IoError::Timeout.into());
        }
        Ok(self
            .phys
            .get(&(config, phy_addr))
            .map_or(FLOATING, |&id| id_register(reg_addr, id)))
    }

    fn write(&mut self, _phy_addr: u8, _reg_addr: u8, _value: u16) -> Result<()> {
        if self.attached.is_none() {
            return Err(IoError::InvalidState.into());
        }
        Ok(())
    }

    fn is_busy(&self) -> bool {
        false
    }
}

// =============================================================================
// Mock GPIO
// =============================================================================

/// Records pin writes
#[derive(Debug, Default)]
pub struct MockGpio {
    levels: HashMap<u8, PinState>,
    pullups: HashSet<u8>,
    writes: Vec<(u8, PinState)>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last level driven on `pin`
    pub fn level(&self, pin: u8) -> Option<PinState> {
        self.levels.get(&pin).copied()
    }

    pub fn is_pulled_up(&self, pin: u8) -> bool {
        self.pullups.contains(&pin)
    }

    /// Every output write, in order
    pub fn writes(&self) -> &[(u8, PinState)] {
        &self.writes
    }
}

impl crate::hal::gpio::BoardGpio for MockGpio {
    fn set_output(&mut self, pin: u8, level: PinState) {
        self.pullups.remove(&pin);
        self.levels.insert(pin, level);
        self.writes.push((pin, level));
    }

    fn set_input_pullup(&mut self, pin: u8) {
        self.levels.remove(&pin);
        self.pullups.insert(pin);
    }
}

// =============================================================================
// Mock Delay
// =============================================================================

/// Mock delay for testing without actual timing
///
/// Records delays for verification without actually waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Total nanoseconds delayed
    total_ns: RefCell<u64>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total nanoseconds that were "delayed"
    pub fn total_ns(&self) -> u64 {
        *self.total_ns.borrow()
    }

    /// Get total milliseconds that were "delayed"
    pub fn total_ms(&self) -> u64 {
        self.total_ns() / 1_000_000
    }

    /// Reset the delay counter
    pub fn reset(&self) {
        *self.total_ns.borrow_mut() = 0;
    }
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        *self.total_ns.borrow_mut() += u64::from(ms) * 1_000_000;
    }
}

// =============================================================================
// Mock Clock
// =============================================================================

/// Manually advanced millisecond clock
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Monotonic for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// =============================================================================
// Stores
// =============================================================================

/// Retained region backed by a map. Unwritten words read as zero.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    words: HashMap<usize, u32>,
    stores: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A region already holding `words`
    pub fn with_words(words: [u32; SESSION_WORDS]) -> Self {
        let mut store = Self::new();
        store.store(&words);
        store.stores = 0;
        store
    }

    /// A region holding `session`
    pub fn with_session(session: &AutoconfigSession) -> Self {
        Self::with_words(session.encode())
    }

    /// Decoded current content
    pub fn session(&mut self) -> Option<AutoconfigSession> {
        AutoconfigSession::decode(&self.load())
    }

    /// Lose the region, as on power loss
    pub fn power_cycle(&mut self) {
        self.words.clear();
    }

    pub fn stores(&self) -> usize {
        self.stores
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&mut self) -> [u32; SESSION_WORDS] {
        core::array::from_fn(|i| self.words.get(&i).copied().unwrap_or(0))
    }

    fn store(&mut self, words: &[u32; SESSION_WORDS]) {
        for (i, &w) in words.iter().enumerate() {
            self.words.insert(i, w);
        }
        self.stores += 1;
    }
}

/// Namespaced key-value store in memory
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    u32s: HashMap<(String, String), u32>,
    u8s: HashMap<(String, String), u8>,
    unavailable: bool,
    writes: usize,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the flash partition were missing
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn check(&self) -> Result<()> {
        if self.unavailable {
            Err(StoreError::Unavailable.into())
        } else {
            Ok(())
        }
    }
}

fn key(namespace: &str, key: &str) -> (String, String) {
    (namespace.to_string(), key.to_string())
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get_u32(&mut self, namespace: &str, k: &str) -> Result<Option<u32>> {
        self.check()?;
        Ok(self.u32s.get(&key(namespace, k)).copied())
    }

    fn get_u8(&mut self, namespace: &str, k: &str) -> Result<Option<u8>> {
        self.check()?;
        Ok(self.u8s.get(&key(namespace, k)).copied())
    }

    fn put_u32(&mut self, namespace: &str, k: &str, value: u32) -> Result<()> {
        self.check()?;
        self.u32s.insert(key(namespace, k), value);
        self.writes += 1;
        Ok(())
    }

    fn put_u8(&mut self, namespace: &str, k: &str, value: u8) -> Result<()> {
        self.check()?;
        self.u8s.insert(key(namespace, k), value);
        self.writes += 1;
        Ok(())
    }
}

// =============================================================================
// Platform
// =============================================================================

/// Lease handed out by the mock network stack
pub fn sample_lease() -> IpInfo {
    IpInfo {
        ip: Ipv4Addr::new(192, 168, 1, 50),
        gateway: Ipv4Addr::new(192, 168, 1, 1),
        dns: Ipv4Addr::new(192, 168, 1, 1),
        netmask: Ipv4Addr::new(255, 255, 255, 0),
        mac: [0xA0, 0xB7, 0x65, 0x01, 0x02, 0x03],
    }
}

/// Records the hostname
#[derive(Debug, Default)]
pub struct MockNetif {
    hostname: Option<String>,
}

impl MockNetif {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }
}

impl Netif for MockNetif {
    fn set_hostname(&mut self, hostname: &str) {
        self.hostname = Some(hostname.to_string());
    }
}

/// Platform Ethernet driver accepting a chosen set of profiles
///
/// With a lease target, a successful `begin` delivers MAC start and GOT_IP
/// to that supervisor, as the network stack would during the DHCP wait.
#[derive(Default)]
pub struct MockEthDriver<'a> {
    accepted: HashSet<&'static str>,
    accept_all: bool,
    begun: Vec<&'static str>,
    link: bool,
    lease_to: Option<&'a LinkSupervisor>,
    netif: MockNetif,
}

impl<'a> MockEthDriver<'a> {
    /// A driver that rejects every profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the profile labelled `label`
    pub fn accept(&mut self, label: &'static str) {
        self.accepted.insert(label);
    }

    pub fn accept_all(&mut self) {
        self.accept_all = true;
    }

    /// Deliver a lease to `link` after each successful begin
    pub fn grant_lease(&mut self, link: &'a LinkSupervisor) {
        self.lease_to = Some(link);
    }

    /// Labels passed to begin, in order
    pub fn begun(&self) -> &[&'static str] {
        &self.begun
    }

    pub fn set_link(&mut self, up: bool) {
        self.link = up;
    }

    pub fn hostname(&self) -> Option<&str> {
        self.netif.hostname()
    }
}

impl EthDriver for MockEthDriver<'_> {
    fn begin(&mut self, profile: &PhyProfile) -> Result<()> {
        self.begun.push(profile.label);
        if !self.accept_all && !self.accepted.contains(profile.label) {
            return Err(LinkError::PhyInitFailure.into());
        }
        self.link = true;
        if let Some(link) = self.lease_to {
            link.handle_event(NetEvent::MacStart, &mut self.netif);
            link.handle_event(NetEvent::LinkUp, &mut self.netif);
            link.handle_event(NetEvent::GotIp(sample_lease()), &mut self.netif);
        }
        Ok(())
    }

    fn link_up(&self) -> bool {
        self.link
    }
}

/// Counts restart requests
#[derive(Debug, Default)]
pub struct MockRestart {
    count: usize,
}

impl MockRestart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Restart for MockRestart {
    fn restart(&mut self) {
        self.count += 1;
    }
}

// =============================================================================
// Heartbeat
// =============================================================================

/// Scripted transport outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportReply {
    /// Respond with this status line
    Status(&'static str),
    /// Fail the exchange
    Fail(HttpError),
}

/// One exchange seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub host: String,
    pub port: u16,
    pub timeout_ms: u32,
    pub bytes: Vec<u8>,
}

/// Transport replaying scripted replies; connection refused once empty
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: VecDeque<TransportReply>,
    requests: Vec<RecordedRequest>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&mut self, reply: TransportReply) {
        self.replies.push_back(reply);
    }

    pub fn requests(&self) -> &[RecordedRequest] {
        &self.requests
    }
}

impl HeartbeatTransport for MockTransport {
    fn exchange(
        &mut self,
        host: &str,
        port: u16,
        request: &[u8],
        timeout_ms: u32,
        status_line: &mut [u8],
    ) -> core::result::Result<usize, HttpError> {
        self.requests.push(RecordedRequest {
            host: host.to_string(),
            port,
            timeout_ms,
            bytes: request.to_vec(),
        });
        match self.replies.pop_front() {
            Some(TransportReply::Status(line)) => {
                let n = line.len().min(status_line.len());
                status_line[..n].copy_from_slice(&line.as_bytes()[..n]);
                Ok(n)
            }
            Some(TransportReply::Fail(e)) => Err(e),
            None => Err(HttpError::Connect),
        }
    }
}

/// Counts LED pulses
#[derive(Debug, Default)]
pub struct MockIndicator {
    on: bool,
    pulses: usize,
}

impl MockIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Off-to-on transitions so far
    pub fn pulses(&self) -> usize {
        self.pulses
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn reset(&mut self) {
        self.pulses = 0;
    }
}

impl Indicator for MockIndicator {
    fn set(&mut self, on: bool) {
        if on && !self.on {
            self.pulses += 1;
        }
        self.on = on;
    }
}
