//! Wasche - Laundry Vibration Sensor Node Firmware
//!
//! Main firmware binary for RP2040-based sensor nodes. An ADXL345 on I2C0
//! feeds a 128-sample analysis window; classified machine states go out to
//! the coordinator through a serial radio modem on UART0.
//!
//! Named after the German "Wäsche" (laundry).

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use wasche_core::config::DEFAULT_WINDOW_SIZE;
use wasche_drivers::accel::Adxl345;
use wasche_drivers::radio::SerialRadio;

mod clock;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// ADXL345 fast-mode bus speed
const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Radio modem baud rate
const RADIO_BAUD: u32 = 115_200;

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Wasche firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let node_config = config::load();
    info!(
        "Node {}: {} Hz sampling ({} Hz bins), tx every {} ms, heartbeat every {} ms",
        node_config.node_id,
        node_config.sample_rate_hz,
        node_config.bin_resolution_hz(DEFAULT_WINDOW_SIZE),
        node_config.transmit_interval_ms,
        node_config.heartbeat_interval_ms
    );

    // Setup I2C0 for the accelerometer (GP4 SDA, GP5 SCL)
    let i2c_config = {
        let mut cfg = i2c::Config::default();
        cfg.frequency = I2C_FREQUENCY_HZ;
        cfg
    };
    let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let sensor = Adxl345::new(bus);

    info!("I2C initialized for ADXL345");

    // Setup UART0 for the radio modem (GP0 TX, GP1 RX)
    let uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = RADIO_BAUD;
        cfg
    };

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    let radio = SerialRadio::new(tx, node_config.node_id);

    info!("UART initialized for radio modem");

    // Spawn tasks
    spawner
        .spawn(tasks::radio_rx_task(rx, node_config.node_id))
        .unwrap();
    spawner
        .spawn(tasks::node_task(sensor, radio, node_config))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
