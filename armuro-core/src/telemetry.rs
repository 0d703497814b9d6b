//! Raw sensor telemetry over the ST-LINK virtual COM port (USART2).
//!
//! Pins:
//! - PA2: TX (to ST-LINK VCP)
//!
//! Protocol:
//! - One line per ADC scan: six comma-separated raw values in channel order,
//!   terminated by `\n`, e.g. `3012,2650,410,3100,880,3390`
//!
//! The baud rate carries one line per scan. Frames are queued by the
//! acquisition task and only dropped if the link stalls, so the scan rate
//! never waits on the UART.

use core::fmt::Write;

use armuro_race::AnalogSample;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{self, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;

/// Longest line: six 4-digit values, five commas, newline.
pub const LINE_SIZE: usize = 32;

/// Frames waiting for the UART.
const QUEUE_SIZE: usize = 8;

static QUEUE: Channel<CriticalSectionRawMutex, AnalogSample, QUEUE_SIZE> = Channel::new();

/// Queue a scan for transmission. Dropped if the queue is full.
pub fn offer(sample: AnalogSample) {
    let _ = QUEUE.try_send(sample);
}

/// Format one telemetry line.
pub fn format_line(sample: &AnalogSample) -> String<LINE_SIZE> {
    let mut line = String::new();
    // cannot overflow: ADC values have at most 4 digits
    let _ = writeln!(line, "{}", sample);
    line
}

/// Telemetry link over the VCP UART
pub struct Telemetry<'d> {
    uart: UartTx<'d, Async>,
}

impl<'d> Telemetry<'d> {
    pub fn new(uart: UartTx<'d, Async>) -> Self {
        Self { uart }
    }

    /// Write one scan as a CSV line.
    pub async fn send_sample(&mut self, sample: &AnalogSample) -> Result<(), usart::Error> {
        let line = format_line(sample);
        self.uart.write(line.as_bytes()).await
    }

    /// Forward queued scans forever. Transmission errors drop the line.
    pub async fn run(&mut self) -> ! {
        loop {
            let sample = QUEUE.receive().await;
            let _ = self.send_sample(&sample).await;
        }
    }
}
