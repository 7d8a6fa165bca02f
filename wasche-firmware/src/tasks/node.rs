//! Node control-loop task
//!
//! Owns the sensor, the radio and the control loop, steps it forever and
//! logs what each step did.

use defmt::*;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::Delay;

use wasche_core::analysis::VibrationResult;
use wasche_core::config::NodeConfig;
use wasche_core::control::{NodeController, StepReport};
use wasche_core::state::{ControlState, Event};
use wasche_drivers::accel::Adxl345;
use wasche_drivers::radio::SerialRadio;

use crate::clock::EmbassyClock;

pub type Sensor = Adxl345<I2c<'static, I2C0, Blocking>>;
/// Blocking writes: each send holds this task until the record has drained
pub type Radio = SerialRadio<BufferedUartTx>;

/// Node task - runs the sampling/analysis/transmit loop
#[embassy_executor::task]
pub async fn node_task(sensor: Sensor, radio: Radio, config: NodeConfig) {
    info!("Node task started");

    let mut node: NodeController<Sensor, Radio, EmbassyClock, Delay> =
        NodeController::new(config, sensor, radio, EmbassyClock, Delay);

    loop {
        let report = node.step().await;
        log_step(&report, node.result());
    }
}

fn log_step(report: &StepReport, result: Option<&VibrationResult>) {
    match report.event {
        Event::BootComplete => info!("Sensor and radio up"),
        Event::BootFailed(fault) => error!("Bring-up failed: {:?}", fault),
        Event::SampleStored => trace!("Sample stored"),
        Event::SampleFailed(e) => warn!("Sample read failed: {:?}", e),
        Event::WindowAnalyzed => {
            if let Some(r) = result {
                debug!(
                    "Window: {:?} rms={}g freq={}Hz",
                    r.state, r.rms_magnitude, r.dominant_freq
                );
            }
        }
        Event::Recovered => info!("Recovered"),
        Event::RecoveryFailed => warn!("Recovery probe failed, backing off"),
        Event::ResultReady | Event::TransmitCycleDone => {}
    }

    match report.transmit {
        Some(Ok(())) => {
            if let Some(r) = result {
                info!("Sent {:?} (rms={}g freq={}Hz)", r.state, r.rms_magnitude, r.dominant_freq);
            }
        }
        Some(Err(e)) => warn!("Result send failed, will retry: {:?}", e),
        None => {}
    }

    match report.heartbeat {
        Some(Ok(())) => debug!("Heartbeat sent"),
        Some(Err(e)) => warn!("Heartbeat failed: {:?}", e),
        None => {}
    }

    if report.changed_state() && is_notable(report.previous, report.current) {
        info!("{:?} -> {:?}", report.previous, report.current);
    }
}

/// The sampling cycle changes state every sample once the window is full
fn is_notable(previous: ControlState, current: ControlState) -> bool {
    matches!(previous, ControlState::Init | ControlState::Error)
        || matches!(current, ControlState::Error)
}
