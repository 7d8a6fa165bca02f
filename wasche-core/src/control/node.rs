//! Node controller
//!
//! Drives the sensor, the analysis pipeline and the transport through the
//! control-state machine, one step per call.

use embedded_hal_async::delay::DelayNs;

use crate::analysis::{self, SampleWindow, VibrationResult};
use crate::config::{NodeConfig, DEFAULT_WINDOW_SIZE};
use crate::state::{ControlState, Event, Fault};
use crate::traits::clock::elapsed_ms;
use crate::traits::{Accelerometer, Clock, Transport, TransportError};

/// What a single [`NodeController::step`] did
///
/// The controller does not log; callers report this instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// State the step ran in
    pub previous: ControlState,
    /// State after the transition
    pub current: ControlState,
    /// Event that drove the transition
    pub event: Event,
    /// Outcome of a data transmission, if one was attempted
    pub transmit: Option<Result<(), TransportError>>,
    /// Outcome of a heartbeat, if one was due
    pub heartbeat: Option<Result<(), TransportError>>,
}

impl StepReport {
    /// True if the step changed the control state
    pub fn changed_state(&self) -> bool {
        self.previous != self.current
    }
}

/// Control loop context
///
/// Owns every piece of mutable loop state; nothing is shared.
pub struct NodeController<S, T, C, D, const N: usize = DEFAULT_WINDOW_SIZE> {
    config: NodeConfig,
    sensor: S,
    transport: T,
    clock: C,
    delay: D,
    window: SampleWindow<N>,
    state: ControlState,
    /// Latest analysis result, replaced by each new pass
    result: Option<VibrationResult>,
    last_transmit_ms: u32,
    last_heartbeat_ms: u32,
}

impl<S, T, C, D, const N: usize> NodeController<S, T, C, D, N>
where
    S: Accelerometer,
    T: Transport,
    C: Clock,
    D: DelayNs,
{
    /// Create a controller in the `Init` state
    pub fn new(config: NodeConfig, sensor: S, transport: T, clock: C, delay: D) -> Self {
        Self {
            config,
            sensor,
            transport,
            clock,
            delay,
            window: SampleWindow::new(),
            state: ControlState::Init,
            result: None,
            last_transmit_ms: 0,
            last_heartbeat_ms: 0,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Latest analysis result
    pub fn result(&self) -> Option<&VibrationResult> {
        self.result.as_ref()
    }

    pub fn window(&self) -> &SampleWindow<N> {
        &self.window
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one iteration of the loop in the current state
    pub async fn step(&mut self) -> StepReport {
        let previous = self.state;
        let mut transmit = None;
        let mut heartbeat = None;

        let event = match previous {
            ControlState::Init => self.boot(),
            ControlState::Sampling => {
                let event = self.sample();
                self.delay.delay_ms(self.config.sample_period_ms()).await;
                event
            }
            ControlState::Analyzing => Event::ResultReady,
            ControlState::Transmitting => {
                let now = self.clock.now_ms();
                transmit = self.transmit_due(now);
                heartbeat = self.heartbeat_due(now);
                Event::TransmitCycleDone
            }
            ControlState::Error => {
                self.delay.delay_ms(self.config.error_backoff_ms).await;
                self.probe()
            }
        };

        self.state = previous.transition(event);

        StepReport {
            previous,
            current: self.state,
            event,
            transmit,
            heartbeat,
        }
    }

    fn boot(&mut self) -> Event {
        let now = self.clock.now_ms();
        self.last_transmit_ms = now;
        self.last_heartbeat_ms = now;

        // Both are brought up even if the first fails, so recovery only has
        // to wait for the one that is still down
        let sensor = self.sensor.init();
        let transport = self.transport.init();

        match (sensor, transport) {
            (Err(_), _) => Event::BootFailed(Fault::Sensor),
            (Ok(()), Err(_)) => Event::BootFailed(Fault::Transport),
            (Ok(()), Ok(())) => Event::BootComplete,
        }
    }

    fn sample(&mut self) -> Event {
        let raw = match self.sensor.read_sample() {
            Ok(raw) => raw,
            Err(e) => return Event::SampleFailed(e),
        };

        self.window.push(raw);

        match analysis::analyze(&self.window, &self.config, self.clock.now_ms()) {
            Some(result) => {
                self.result = Some(result);
                Event::WindowAnalyzed
            }
            None => Event::SampleStored,
        }
    }

    fn transmit_due(&mut self, now: u32) -> Option<Result<(), TransportError>> {
        if elapsed_ms(now, self.last_transmit_ms) < self.config.transmit_interval_ms {
            return None;
        }
        let result = self.result.as_ref()?;

        let outcome = self.transport.send_result(result);
        if outcome.is_ok() {
            self.last_transmit_ms = now;
        }
        // On failure the timer stays put, so the next cycle retries
        Some(outcome)
    }

    fn heartbeat_due(&mut self, now: u32) -> Option<Result<(), TransportError>> {
        if elapsed_ms(now, self.last_heartbeat_ms) < self.config.heartbeat_interval_ms {
            return None;
        }

        // Rearmed whatever the outcome
        self.last_heartbeat_ms = now;
        Some(self.transport.send_heartbeat(now))
    }

    fn probe(&mut self) -> Event {
        let sensor_ok = self.sensor.test_connection();
        let transport_ok = self.transport.is_connected();

        if sensor_ok && transport_ok {
            Event::Recovered
        } else {
            Event::RecoveryFailed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MachineState, RawSample};
    use crate::traits::SensorError;
    use core::cell::Cell;
    use embassy_futures::block_on;

    struct TestClock<'a>(&'a Cell<u32>);

    impl Clock for TestClock<'_> {
        fn now_ms(&self) -> u32 {
            self.0.get()
        }
    }

    /// Delay that advances the shared test clock instead of waiting
    struct TestDelay<'a>(&'a Cell<u32>);

    impl DelayNs for TestDelay<'_> {
        async fn delay_ns(&mut self, ns: u32) {
            self.0.set(self.0.get().wrapping_add(ns / 1_000_000));
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.0.set(self.0.get().wrapping_add(ms));
        }
    }

    struct ScriptedSensor {
        init_ok: bool,
        connected: bool,
        fail_reads: u32,
        sample: RawSample,
        reads: u32,
    }

    impl ScriptedSensor {
        fn steady(sample: RawSample) -> Self {
            Self {
                init_ok: true,
                connected: true,
                fail_reads: 0,
                sample,
                reads: 0,
            }
        }
    }

    impl Accelerometer for ScriptedSensor {
        fn init(&mut self) -> Result<(), SensorError> {
            if self.init_ok {
                Ok(())
            } else {
                Err(SensorError::UnexpectedDeviceId(0x00))
            }
        }

        fn read_sample(&mut self) -> Result<RawSample, SensorError> {
            self.reads += 1;
            if self.fail_reads > 0 {
                self.fail_reads -= 1;
                return Err(SensorError::Bus);
            }
            Ok(self.sample)
        }

        fn test_connection(&mut self) -> bool {
            self.connected
        }
    }

    #[derive(Default)]
    struct ScriptedTransport {
        init_fails: bool,
        connected: bool,
        fail_sends: u32,
        fail_heartbeats: bool,
        attempts: u32,
        delivered: u32,
        last_attempt: Option<VibrationResult>,
        heartbeats: u32,
        last_heartbeat_ms: Option<u32>,
    }

    impl Transport for ScriptedTransport {
        fn init(&mut self) -> Result<(), TransportError> {
            if self.init_fails {
                Err(TransportError::Io)
            } else {
                self.connected = true;
                Ok(())
            }
        }

        fn send_result(&mut self, result: &VibrationResult) -> Result<(), TransportError> {
            self.attempts += 1;
            self.last_attempt = Some(*result);
            if self.fail_sends > 0 {
                self.fail_sends -= 1;
                return Err(TransportError::Io);
            }
            self.delivered += 1;
            Ok(())
        }

        fn send_heartbeat(&mut self, timestamp_ms: u32) -> Result<(), TransportError> {
            self.heartbeats += 1;
            self.last_heartbeat_ms = Some(timestamp_ms);
            if self.fail_heartbeats {
                Err(TransportError::Io)
            } else {
                Ok(())
            }
        }

        fn is_connected(&mut self) -> bool {
            self.connected
        }
    }

    type TestController<'a> =
        NodeController<ScriptedSensor, ScriptedTransport, TestClock<'a>, TestDelay<'a>, 16>;

    fn controller<'a>(
        time: &'a Cell<u32>,
        config: NodeConfig,
        sensor: ScriptedSensor,
        transport: ScriptedTransport,
    ) -> TestController<'a> {
        NodeController::new(config, sensor, transport, TestClock(time), TestDelay(time))
    }

    /// Step until `done` holds for a report, returning that report
    fn step_until(
        node: &mut TestController<'_>,
        max_steps: usize,
        done: impl Fn(&StepReport) -> bool,
    ) -> StepReport {
        for _ in 0..max_steps {
            let report = block_on(node.step());
            if done(&report) {
                return report;
            }
        }
        panic!("condition not reached in {} steps", max_steps);
    }

    const ONE_G: RawSample = RawSample::new(0, 0, 250);

    #[test]
    fn test_boot_goes_to_sampling() {
        let time = Cell::new(0);
        let mut node = controller(
            &time,
            NodeConfig::default(),
            ScriptedSensor::steady(ONE_G),
            ScriptedTransport::default(),
        );

        let report = block_on(node.step());
        assert_eq!(report.previous, ControlState::Init);
        assert_eq!(report.event, Event::BootComplete);
        assert_eq!(node.state(), ControlState::Sampling);
        assert_eq!(time.get(), 0);
    }

    #[test]
    fn test_sensor_boot_failure_goes_to_error() {
        let time = Cell::new(0);
        let mut sensor = ScriptedSensor::steady(ONE_G);
        sensor.init_ok = false;
        let mut node = controller(&time, NodeConfig::default(), sensor, ScriptedTransport::default());

        let report = block_on(node.step());
        assert_eq!(report.event, Event::BootFailed(Fault::Sensor));
        assert_eq!(node.state(), ControlState::Error);
    }

    #[test]
    fn test_error_backs_off_then_recovers() {
        let time = Cell::new(0);
        let transport = ScriptedTransport {
            init_fails: true,
            ..Default::default()
        };
        let mut node = controller(&time, NodeConfig::default(), ScriptedSensor::steady(ONE_G), transport);

        let report = block_on(node.step());
        assert_eq!(report.event, Event::BootFailed(Fault::Transport));

        // Transport still down: stay in Error, one backoff per probe
        let report = block_on(node.step());
        assert_eq!(report.event, Event::RecoveryFailed);
        assert_eq!(node.state(), ControlState::Error);
        assert_eq!(time.get(), 5_000);

        node.transport.connected = true;
        let report = block_on(node.step());
        assert_eq!(report.event, Event::Recovered);
        assert_eq!(node.state(), ControlState::Sampling);
        assert_eq!(time.get(), 10_000);
    }

    #[test]
    fn test_recovery_needs_sensor_too() {
        let time = Cell::new(0);
        let mut sensor = ScriptedSensor::steady(ONE_G);
        sensor.init_ok = false;
        sensor.connected = false;
        let mut node = controller(&time, NodeConfig::default(), sensor, ScriptedTransport::default());

        block_on(node.step());
        let report = block_on(node.step());
        assert_eq!(report.event, Event::RecoveryFailed);
    }

    #[test]
    fn test_sensor_boot_failure_still_brings_up_transport() {
        let time = Cell::new(0);
        let mut sensor = ScriptedSensor::steady(ONE_G);
        sensor.init_ok = false;
        let mut node = controller(&time, NodeConfig::default(), sensor, ScriptedTransport::default());

        let report = block_on(node.step());
        assert_eq!(report.event, Event::BootFailed(Fault::Sensor));
        assert!(node.transport().connected);

        // Sensor answers its probe: one backoff and the node is sampling
        let report = block_on(node.step());
        assert_eq!(report.event, Event::Recovered);
        assert_eq!(node.state(), ControlState::Sampling);
        assert_eq!(time.get(), 5_000);
    }

    #[test]
    fn test_window_fill_sequence() {
        let time = Cell::new(0);
        let mut node = controller(
            &time,
            NodeConfig::default(),
            ScriptedSensor::steady(ONE_G),
            ScriptedTransport::default(),
        );
        block_on(node.step());

        for _ in 0..15 {
            let report = block_on(node.step());
            assert_eq!(report.event, Event::SampleStored);
            assert!(node.result().is_none());
        }

        let report = block_on(node.step());
        assert_eq!(report.event, Event::WindowAnalyzed);
        assert_eq!(node.state(), ControlState::Analyzing);

        // Analysed at the 16th read, one sample period per read before it
        let result = *node.result().unwrap();
        assert_eq!(result.timestamp, 150);
        assert_eq!(result.state, MachineState::Unknown);
        assert_eq!(time.get(), 160);

        let report = block_on(node.step());
        assert_eq!(report.event, Event::ResultReady);
        assert_eq!(node.state(), ControlState::Transmitting);

        // Interval not yet elapsed since boot
        let report = block_on(node.step());
        assert_eq!(report.transmit, None);
        assert_eq!(report.heartbeat, None);
        assert_eq!(node.state(), ControlState::Sampling);
    }

    #[test]
    fn test_sustained_read_failures_then_recovery() {
        let time = Cell::new(0);
        let mut sensor = ScriptedSensor::steady(ONE_G);
        sensor.fail_reads = 50;
        let mut node = controller(&time, NodeConfig::default(), sensor, ScriptedTransport::default());
        block_on(node.step());

        for _ in 0..50 {
            let report = block_on(node.step());
            assert!(matches!(report.event, Event::SampleFailed(SensorError::Bus)));
            assert_eq!(node.state(), ControlState::Sampling);
            assert!(node.window().is_empty());
        }
        // Failed reads still pace the loop
        assert_eq!(time.get(), 500);

        for _ in 0..15 {
            block_on(node.step());
        }
        assert_eq!(node.window().len(), 15);

        let report = block_on(node.step());
        assert_eq!(report.event, Event::WindowAnalyzed);
        let result = node.result().unwrap();
        assert!((result.rms_magnitude - 1.0).abs() < 1e-4);
        assert_eq!(node.sensor().reads, 66);
    }

    #[test]
    fn test_failed_send_retries_latest_result() {
        let time = Cell::new(0);
        let config = NodeConfig {
            transmit_interval_ms: 500,
            ..NodeConfig::default()
        };
        let transport = ScriptedTransport {
            fail_sends: 1,
            ..Default::default()
        };
        let mut node = controller(&time, config, ScriptedSensor::steady(ONE_G), transport);

        let failed = step_until(&mut node, 1_000, |r| r.transmit.is_some());
        assert_eq!(failed.transmit, Some(Err(TransportError::Io)));
        let pending = *node.result().unwrap();
        assert_eq!(node.transport().last_attempt, Some(pending));

        let retried = step_until(&mut node, 10, |r| r.transmit.is_some());
        assert_eq!(retried.transmit, Some(Ok(())));

        // Resent on the very next cycle; the window was re-analysed in between
        // so the content matches and only the timestamp moved on
        let sent = node.transport().last_attempt.unwrap();
        assert_eq!(sent.rms_magnitude, pending.rms_magnitude);
        assert_eq!(sent.dominant_freq, pending.dominant_freq);
        assert_eq!(sent.state, pending.state);
        assert_eq!(sent.timestamp, pending.timestamp + 10);
        assert_eq!(node.transport().attempts, 2);
        assert_eq!(node.transport().delivered, 1);
    }

    #[test]
    fn test_successful_send_rearms_interval() {
        let time = Cell::new(0);
        let config = NodeConfig {
            transmit_interval_ms: 500,
            ..NodeConfig::default()
        };
        let mut node = controller(&time, config, ScriptedSensor::steady(ONE_G), ScriptedTransport::default());

        step_until(&mut node, 1_000, |r| r.transmit.is_some());
        let first = time.get();
        step_until(&mut node, 1_000, |r| r.transmit.is_some());
        assert_eq!(time.get() - first, 500);
        assert_eq!(node.transport().delivered, 2);
    }

    #[test]
    fn test_no_transmit_without_result() {
        let time = Cell::new(0);
        let config = NodeConfig {
            transmit_interval_ms: 1,
            ..NodeConfig::default()
        };
        let mut node = controller(&time, config, ScriptedSensor::steady(ONE_G), ScriptedTransport::default());

        // Window takes 16 reads to fill; nothing is sent before that
        for _ in 0..16 {
            let report = block_on(node.step());
            assert_eq!(report.transmit, None);
        }
        assert_eq!(node.transport().attempts, 0);
    }

    #[test]
    fn test_heartbeat_independent_of_data() {
        let time = Cell::new(0);
        let config = NodeConfig {
            transmit_interval_ms: 200,
            heartbeat_interval_ms: 1_000,
            ..NodeConfig::default()
        };
        let transport = ScriptedTransport {
            fail_sends: u32::MAX,
            ..Default::default()
        };
        let mut node = controller(&time, config, ScriptedSensor::steady(ONE_G), transport);

        let report = step_until(&mut node, 1_000, |r| r.heartbeat.is_some());
        assert_eq!(report.heartbeat, Some(Ok(())));
        assert_eq!(report.transmit, Some(Err(TransportError::Io)));
        assert_eq!(node.transport().last_heartbeat_ms, Some(1_000));
        assert_eq!(node.transport().delivered, 0);
    }

    #[test]
    fn test_failed_heartbeat_still_rearms() {
        let time = Cell::new(0);
        let config = NodeConfig {
            heartbeat_interval_ms: 300,
            ..NodeConfig::default()
        };
        let transport = ScriptedTransport {
            fail_heartbeats: true,
            ..Default::default()
        };
        let mut node = controller(&time, config, ScriptedSensor::steady(ONE_G), transport);

        let report = step_until(&mut node, 1_000, |r| r.heartbeat.is_some());
        assert_eq!(report.heartbeat, Some(Err(TransportError::Io)));
        assert_eq!(time.get(), 300);

        step_until(&mut node, 1_000, |r| r.heartbeat.is_some());
        assert_eq!(time.get(), 600);
        assert_eq!(node.transport().heartbeats, 2);
    }

    #[test]
    fn test_intervals_survive_clock_wrap() {
        let time = Cell::new(u32::MAX - 95);
        let config = NodeConfig {
            transmit_interval_ms: 200,
            ..NodeConfig::default()
        };
        let mut node = controller(&time, config, ScriptedSensor::steady(ONE_G), ScriptedTransport::default());

        let report = step_until(&mut node, 1_000, |r| r.transmit.is_some());
        assert_eq!(report.transmit, Some(Ok(())));
        assert_eq!(time.get(), 104);
    }
}
