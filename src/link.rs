//! Link supervisor
//!
//! Turns the platform's network events into the `online` flag the heartbeat
//! loop reads. Events arrive from the network stack's own task or callback;
//! the foreground only reads.
//!
//! ```ignore
//! static LINK: LinkSupervisor = LinkSupervisor::new(SENSOR.sensor_uuid);
//!
//! fn on_event(event: NetEvent, netif: &mut impl Netif) {
//!     LINK.handle_event(event, netif);
//! }
//! ```

use core::net::Ipv4Addr;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::sync::CriticalSectionCell;

/// Addressing reported with a DHCP lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpInfo {
    /// Leased address
    pub ip: Ipv4Addr,
    /// Default gateway
    pub gateway: Ipv4Addr,
    /// Primary DNS server
    pub dns: Ipv4Addr,
    /// Subnet mask
    pub netmask: Ipv4Addr,
    /// Interface MAC address
    pub mac: [u8; 6],
}

/// Network events delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetEvent {
    /// MAC started
    MacStart,
    /// PHY reports link
    LinkUp,
    /// DHCP lease bound
    GotIp(IpInfo),
    /// PHY lost link
    LinkDown,
    /// MAC stopped
    MacStop,
}

/// Network interface controls used from the event handler.
pub trait Netif {
    /// Set the DHCP hostname.
    fn set_hostname(&mut self, hostname: &str);
}

impl<T: Netif + ?Sized> Netif for &mut T {
    fn set_hostname(&mut self, hostname: &str) {
        T::set_hostname(self, hostname);
    }
}

/// Owner of the `online` flag.
///
/// `online` is a single word written by the event side and read by the
/// foreground, so it is a plain atomic. The lease details go through a
/// critical section.
pub struct LinkSupervisor {
    hostname: &'static str,
    online: AtomicBool,
    ip_info: CriticalSectionCell<Option<IpInfo>>,
}

impl LinkSupervisor {
    /// Create an offline supervisor (const, suitable for static initialization).
    pub const fn new(hostname: &'static str) -> Self {
        Self {
            hostname,
            online: AtomicBool::new(false),
            ip_info: CriticalSectionCell::new(None),
        }
    }

    /// Whether a lease is held.
    #[inline]
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Lease details of the current or last session.
    pub fn ip_info(&self) -> Option<IpInfo> {
        self.ip_info.get()
    }

    /// Drop the `online` flag from the foreground.
    pub fn mark_offline(&self) {
        self.online.store(false, Ordering::Release);
    }

    /// Apply one network event.
    pub fn handle_event<N: Netif + ?Sized>(&self, event: NetEvent, netif: &mut N) {
        match event {
            NetEvent::MacStart => {
                netif.set_hostname(self.hostname);
                info!("ETH start");
            }
            NetEvent::LinkUp => info!("ETH link up"),
            NetEvent::GotIp(lease) => {
                log_lease(&lease);
                self.ip_info.set(Some(lease));
                self.online.store(true, Ordering::Release);
            }
            NetEvent::LinkDown => {
                warn!("ETH disconnected");
                self.mark_offline();
            }
            NetEvent::MacStop => {
                warn!("ETH stopped");
                self.mark_offline();
            }
        }
    }
}

fn log_lease(lease: &IpInfo) {
    let [a, b, c, d] = lease.ip.octets();
    info!("ETH got IP {}.{}.{}.{}", a, b, c, d);
    let [a, b, c, d] = lease.gateway.octets();
    info!("  gateway {}.{}.{}.{}", a, b, c, d);
    let [a, b, c, d] = lease.dns.octets();
    info!("  dns     {}.{}.{}.{}", a, b, c, d);
    let [a, b, c, d] = lease.netmask.octets();
    info!("  netmask {}.{}.{}.{}", a, b, c, d);
    let m = lease.mac;
    info!(
        "  mac     {:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
        m[0], m[1], m[2], m[3], m[4], m[5]
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockNetif, sample_lease};

    #[test]
    fn mac_start_sets_hostname() {
        let link = LinkSupervisor::new("esp32-newcastle-002");
        let mut netif = MockNetif::new();
        link.handle_event(NetEvent::MacStart, &mut netif);
        assert_eq!(netif.hostname(), Some("esp32-newcastle-002"));
        assert!(!link.is_online());
    }

    #[test]
    fn online_only_after_got_ip() {
        let link = LinkSupervisor::new("s");
        let mut netif = MockNetif::new();

        link.handle_event(NetEvent::LinkUp, &mut netif);
        assert!(!link.is_online());

        link.handle_event(NetEvent::GotIp(sample_lease()), &mut netif);
        assert!(link.is_online());
        assert_eq!(link.ip_info(), Some(sample_lease()));
    }

    #[test]
    fn link_down_and_mac_stop_go_offline() {
        let link = LinkSupervisor::new("s");
        let mut netif = MockNetif::new();

        for event in [NetEvent::LinkDown, NetEvent::MacStop] {
            link.handle_event(NetEvent::GotIp(sample_lease()), &mut netif);
            assert!(link.is_online());
            link.handle_event(event, &mut netif);
            assert!(!link.is_online());
        }
        // Lease details outlive the link for diagnostics
        assert!(link.ip_info().is_some());
    }
}
