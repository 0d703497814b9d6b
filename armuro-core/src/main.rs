#![no_std]
#![no_main]

mod board;
mod leds;
mod motors;
mod sensors;
mod telemetry;

use armuro_race::{CycleInputs, RaceController};
use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::usart::{Config as UartConfig, UartTx};
use embassy_time::{Duration, Instant, Ticker};
use {defmt_rtt as _, panic_probe as _};

use leds::LedPanel;
use motors::MotorController;
use sensors::AnalogFrontEnd;
use telemetry::Telemetry;

/// ADC scans per second, one per control cycle
const SCAN_RATE_HZ: u64 = 1_000;

/// Race controller period
const CONTROL_PERIOD: Duration = Duration::from_millis(1);

const TELEMETRY_BAUDRATE: u32 = 460_800;

// every scan gets its own line: 10 bits per UART byte
const _: () = assert!(
    TELEMETRY_BAUDRATE as u64 / (10 * telemetry::LINE_SIZE as u64) >= SCAN_RATE_HZ,
    "telemetry link too slow for the scan rate"
);

defmt::timestamp!("{=u64}", { embassy_time::Instant::now().as_millis() });

#[embassy_executor::task]
async fn acquisition_task(mut front_end: AnalogFrontEnd<'static>) {
    let mut ticker = Ticker::every(Duration::from_hz(SCAN_RATE_HZ));
    loop {
        let sample = front_end.scan();
        sensors::publish(sample);
        telemetry::offer(sample);
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn telemetry_task(mut telemetry: Telemetry<'static>) {
    telemetry.run().await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(board::config());

    info!("=== Armuro 1 race controller ===");

    // TIM1: PB0=CH2N (left), PB1=CH3N (right); phase PA12/PB7
    let mut motors = MotorController::new(p.TIM1, p.PB0, p.PB1, p.PA12, p.PB7);
    info!("Motors initialized");

    let mut leds = LedPanel::new(p.PB5, p.PB4, p.PA10);

    // Bumper switch closes to ground
    let obstacle = Input::new(p.PA9, Pull::Up);

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = TELEMETRY_BAUDRATE;
    let uart = UartTx::new(p.USART2, p.PA2, p.DMA1_CH7, uart_config).unwrap();
    spawner.spawn(telemetry_task(Telemetry::new(uart))).unwrap();
    info!("Telemetry on USART2 ({} baud)", TELEMETRY_BAUDRATE);

    let adc = Adc::new(p.ADC1);
    let front_end = AnalogFrontEnd::new(adc, p.PA0, p.PA1, p.PA3, p.PA4, p.PA5, p.PA7);
    spawner.spawn(acquisition_task(front_end)).unwrap();
    info!("Sensors initialized");

    motors.stop_all();

    let mut race = RaceController::new();
    let mut powered = false;
    let mut ticker = Ticker::every(CONTROL_PERIOD);

    info!("Ready! Race starts when the power switch is on");

    loop {
        let inputs = CycleInputs::new(
            sensors::latest(),
            obstacle.is_low(),
            Instant::now().as_millis() as u32,
        );
        if inputs.enabled != powered {
            powered = inputs.enabled;
            info!("Power switch {}", if powered { "on" } else { "off" });
        }

        let output = race.tick(&inputs);
        if let Some(command) = output.command {
            motors.apply(&command);
        }
        leds.apply(output.leds);

        ticker.next().await;
    }
}
