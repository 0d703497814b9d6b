//! Clock setup shared by all binaries.

use embassy_stm32::Config;
use embassy_stm32::rcc::{MSIRange, Pll, PllMul, PllPreDiv, PllRDiv, PllSource, Sysclk, mux};

/// 4 MHz MSI into the PLL (x16 / 2) for a 32 MHz system clock. The ADC runs
/// from the system clock.
pub fn config() -> Config {
    let mut config = Config::default();
    config.rcc.msi = Some(MSIRange::RANGE4M);
    config.rcc.pll = Some(Pll {
        source: PllSource::MSI,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL16,
        divp: None,
        divq: None,
        divr: Some(PllRDiv::DIV2),
    });
    config.rcc.sys = Sysclk::PLL1_R;
    config.rcc.mux.adcsel = mux::Adcsel::SYS;
    config
}
