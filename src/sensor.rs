//! Foreground heartbeat loop
//!
//! [`Sensor::tick`] is one pass of the main loop. While offline it blinks
//! slowly and sleeps; once online it sends a heartbeat each interval and
//! reports the outcome on the indicator.

use embedded_hal::delay::DelayNs;

use crate::config::{EthConfig, SensorConfig};
use crate::error::{HttpError, Result};
use crate::heartbeat::{HeartbeatScheduler, HeartbeatTransport, send_heartbeat};
use crate::indicator::{BlinkPattern, Indicator, blink};
use crate::link::LinkSupervisor;
use crate::platform::{EthDriver, Monotonic};

/// Loop granularity while online.
pub const TICK_MS: u32 = 100;

/// Pause between offline checks, after the slow blink.
pub const OFFLINE_SLEEP_MS: u32 = 1000;

/// What one pass of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// No lease or no link
    Offline,
    /// Online, heartbeat not due
    Idle,
    /// A heartbeat was attempted
    Sent(core::result::Result<u16, HttpError>),
}

/// Heartbeat sensor main loop state.
pub struct Sensor<'a, E, T, I, C, D>
where
    E: EthDriver,
    T: HeartbeatTransport,
    I: Indicator,
    C: Monotonic,
    D: DelayNs,
{
    config: &'a SensorConfig,
    link: &'a LinkSupervisor,
    eth: E,
    transport: T,
    indicator: I,
    clock: C,
    delay: D,
    scheduler: HeartbeatScheduler,
}

impl<'a, E, T, I, C, D> Sensor<'a, E, T, I, C, D>
where
    E: EthDriver,
    T: HeartbeatTransport,
    I: Indicator,
    C: Monotonic,
    D: DelayNs,
{
    /// Create the loop. The first online tick sends immediately.
    ///
    /// Fails with the [`SensorConfig::validate`] error if `config` is invalid.
    pub fn new(
        config: &'a SensorConfig,
        link: &'a LinkSupervisor,
        eth: E,
        transport: T,
        indicator: I,
        clock: C,
        delay: D,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            link,
            eth,
            transport,
            indicator,
            clock,
            delay,
            scheduler: HeartbeatScheduler::new(config.heartbeat_interval_ms),
        })
    }

    /// Heartbeat timer
    pub fn scheduler(&self) -> &HeartbeatScheduler {
        &self.scheduler
    }

    /// Run one pass of the loop.
    pub fn tick(&mut self) -> Tick {
        let link_up = self.eth.link_up();
        if !self.link.is_online() || !link_up {
            if self.link.is_online() {
                warn!("Ethernet: link down");
                self.link.mark_offline();
            }
            blink(&mut self.indicator, &mut self.delay, BlinkPattern::OFFLINE);
            self.delay.delay_ms(OFFLINE_SLEEP_MS);
            return Tick::Offline;
        }

        let now = self.clock.now_ms();
        if !self.scheduler.is_due(now) {
            self.delay.delay_ms(TICK_MS);
            return Tick::Idle;
        }

        self.scheduler.record_attempt(now);
        let result = send_heartbeat(self.config, &mut self.transport);
        match result {
            Ok(code) => {
                info!("Heartbeat sent (HTTP {})", code);
                blink(&mut self.indicator, &mut self.delay, BlinkPattern::SUCCESS);
            }
            Err(e) => {
                warn!("Heartbeat failed: {}", e);
                blink(&mut self.indicator, &mut self.delay, BlinkPattern::FAILURE);
            }
        }
        self.delay.delay_ms(TICK_MS);
        Tick::Sent(result)
    }

    /// Run forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }
}

/// Log who this sensor is and where it reports.
pub fn log_banner(sensor: &SensorConfig, eth: &EthConfig) {
    info!("=====================================");
    info!("PB heartbeat sensor ({})", eth.board_name);
    info!("Building: {} (ID: {})", sensor.building_name, sensor.building_id);
    match sensor.section_id {
        Some(section) => info!("Section: {}", section),
        None => info!("Section: none"),
    }
    info!("Sensor UUID: {}", sensor.sensor_uuid);
    info!("Server: {}:{}", sensor.server_host, sensor.server_port);
    info!("=====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};
    use crate::link::NetEvent;
    use crate::testing::{
        MockClock, MockDelay, MockEthDriver, MockIndicator, MockNetif, MockTransport, TransportReply, sample_lease,
    };

    const OK: TransportReply = TransportReply::Status("HTTP/1.1 200 OK\r\n");

    fn online(link: &LinkSupervisor) {
        link.handle_event(NetEvent::GotIp(sample_lease()), &mut MockNetif::new());
    }

    struct Rig {
        eth: MockEthDriver<'static>,
        transport: MockTransport,
        led: MockIndicator,
        delay: MockDelay,
    }

    type TestSensor<'s> =
        Sensor<'s, &'s mut MockEthDriver<'static>, &'s mut MockTransport, &'s mut MockIndicator, &'s MockClock, &'s mut MockDelay>;

    impl Rig {
        fn new() -> Self {
            let mut eth = MockEthDriver::new();
            eth.set_link(true);
            Self {
                eth,
                transport: MockTransport::new(),
                led: MockIndicator::new(),
                delay: MockDelay::new(),
            }
        }

        fn sensor<'s>(
            &'s mut self,
            config: &'s SensorConfig,
            link: &'s LinkSupervisor,
            clock: &'s MockClock,
        ) -> TestSensor<'s> {
            Sensor::new(
                config,
                link,
                &mut self.eth,
                &mut self.transport,
                &mut self.led,
                clock,
                &mut self.delay,
            )
            .unwrap()
        }
    }

    #[test]
    fn offline_blinks_slowly_and_sleeps() {
        let config = SensorConfig::new();
        let link = LinkSupervisor::new("s");
        let clock = MockClock::new(0);
        let mut rig = Rig::new();

        assert_eq!(rig.sensor(&config, &link, &clock).tick(), Tick::Offline);
        assert_eq!(rig.led.pulses(), 1);
        assert_eq!(rig.delay.total_ms(), 500 + 1000);
        assert!(rig.transport.requests().is_empty());
    }

    #[test]
    fn first_online_tick_sends() {
        let config = SensorConfig::new().with_api_key("K");
        let link = LinkSupervisor::new("s");
        online(&link);
        let clock = MockClock::new(0);
        let mut rig = Rig::new();
        rig.transport.push_reply(OK);

        assert_eq!(rig.sensor(&config, &link, &clock).tick(), Tick::Sent(Ok(200)));
        assert_eq!(rig.transport.requests().len(), 1);
        let body = core::str::from_utf8(&rig.transport.requests()[0].bytes).unwrap();
        assert!(body.ends_with(
            "{\"api_key\":\"K\",\"building_id\":1,\"section_id\":2,\"sensor_uuid\":\"esp32-newcastle-002\"}\r\n"
        ));
        assert_eq!(rig.led.pulses(), 1);
        assert_eq!(rig.delay.total_ms(), 100 + 100);
    }

    #[test]
    fn one_send_per_interval_whatever_the_outcome() {
        let config = SensorConfig::new();
        let link = LinkSupervisor::new("s");
        online(&link);
        let clock = MockClock::new(1_000);
        let mut rig = Rig::new();
        rig.transport.push_reply(TransportReply::Fail(HttpError::Timeout));
        rig.transport.push_reply(OK);

        let mut sensor = rig.sensor(&config, &link, &clock);
        assert_eq!(sensor.tick(), Tick::Sent(Err(HttpError::Timeout)));
        assert_eq!(sensor.scheduler().last_send(), Some(1_000));
        assert_eq!(sensor.tick(), Tick::Idle);

        clock.advance(9_999);
        assert_eq!(sensor.tick(), Tick::Idle);
        clock.advance(1);
        assert_eq!(sensor.tick(), Tick::Sent(Ok(200)));
        assert_eq!(sensor.scheduler().last_send(), Some(11_000));
        drop(sensor);

        assert_eq!(rig.transport.requests().len(), 2);
        assert_eq!(rig.led.pulses(), 3 + 1);
    }

    #[test]
    fn non_200_blinks_three_times() {
        let config = SensorConfig::new();
        let link = LinkSupervisor::new("s");
        online(&link);
        let clock = MockClock::new(0);
        let mut rig = Rig::new();
        rig.transport.push_reply(TransportReply::Status("HTTP/1.1 503 Service Unavailable\r\n"));

        assert_eq!(
            rig.sensor(&config, &link, &clock).tick(),
            Tick::Sent(Err(HttpError::Status(503)))
        );
        assert_eq!(rig.led.pulses(), 3);
        assert_eq!(rig.delay.total_ms(), 1000 + 100);
    }

    #[test]
    fn link_drop_clears_online() {
        let config = SensorConfig::new();
        let link = LinkSupervisor::new("s");
        online(&link);
        let clock = MockClock::new(0);
        let mut rig = Rig::new();
        rig.eth.set_link(false);

        assert_eq!(rig.sensor(&config, &link, &clock).tick(), Tick::Offline);
        assert!(!link.is_online());
        assert!(rig.transport.requests().is_empty());

        // Link back but no new lease yet
        rig.eth.set_link(true);
        assert_eq!(rig.sensor(&config, &link, &clock).tick(), Tick::Offline);
    }

    #[test]
    fn building_outside_range_is_rejected() {
        let config = SensorConfig::new().with_building(15, "Nowhere");
        let link = LinkSupervisor::new("s");
        let clock = MockClock::new(0);
        let mut rig = Rig::new();

        let result = Sensor::new(
            &config,
            &link,
            &mut rig.eth,
            &mut rig.transport,
            &mut rig.led,
            &clock,
            &mut rig.delay,
        );
        assert!(matches!(result, Err(Error::Config(ConfigError::InvalidBuildingId))));
    }
}
