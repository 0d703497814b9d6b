#![no_std]
#![no_main]

#[path = "../board.rs"]
mod board;
#[allow(dead_code)]
#[path = "../sensors.rs"]
mod sensors;

use armuro_race::SensorConditioner;
use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use sensors::AnalogFrontEnd;

/// Scans between two printouts
const PRINT_EVERY: u32 = 500;

defmt::timestamp!("{=u64}", { embassy_time::Instant::now().as_millis() });

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_stm32::init(board::config());

    info!("=== Sensor Debug Mode ===");

    // Tail LED for visual feedback
    let mut led = Output::new(p.PA10, Level::Low, Speed::Low);

    let adc = Adc::new(p.ADC1);
    let mut front_end = AnalogFrontEnd::new(adc, p.PA0, p.PA1, p.PA3, p.PA4, p.PA5, p.PA7);
    let mut conditioner = SensorConditioner::new();

    info!("ADC initialized, starting sensor readings...");
    info!("Format: middle enc_left right battery enc_right left");

    // encoders only count if every edge is seen, so scan fast and print slow
    let mut ticker = Ticker::every(Duration::from_millis(1));
    let mut scans = 0u32;

    loop {
        let sample = front_end.scan();
        conditioner.condition(&sample);

        scans += 1;
        if scans == PRINT_EVERY {
            scans = 0;
            let raw = sample.raw();
            info!(
                "ADC: {} {} {} {} {} {}",
                raw[0], raw[1], raw[2], raw[3], raw[4], raw[5]
            );

            let encoders = conditioner.encoders();
            let colors = conditioner.colors();
            info!(
                "ticks L={} R={} colors {} {} {}",
                encoders.left_ticks(),
                encoders.right_ticks(),
                colors.left,
                colors.middle,
                colors.right
            );

            led.toggle();
        }

        ticker.next().await;
    }
}
