#![no_main]
#![no_std]

use cortex_m::delay::Delay;
use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    pac,
    prelude::*,
    serial::{Config, Serial},
    spi::{Mode, Phase, Polarity, Spi},
};
use stm32f7xx_hal as hal;

use gpio12::config::{SPI_CLOCK_KHZ, USART_BAUD, WATCHDOG_TIMEOUT_MS};
use gpio12::hw::{Adc, BoardPins, BoardPort, ChipSelect, Iwdg, Led, SpiBus, Usart};
use gpio12::{Dispatcher, Firmware};

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    // Armed first so a hang anywhere below still resets the board.
    let watchdog = Iwdg::start(dp.IWDG, WATCHDOG_TIMEOUT_MS);

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb2 = rcc.apb2;
    let mut delay = Delay::new(cp.SYST, clocks.sysclk().raw());

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOE);

    // Host-visible GPIO (PD0..PD7, PB0..PB5)
    let port = BoardPort::new(dp.GPIOD, dp.GPIOB);

    // USART1 (host link)
    let usart_cfg = Config {
        baud_rate: USART_BAUD.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (pins.usart1.tx, pins.usart1.rx), &clocks, usart_cfg);
    let link = Usart::new(serial, Led::active_high(pins.link_led));

    // SPI4
    let spi_mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };
    let spi4_raw = Spi::new(dp.SPI4, (pins.spi4.sck, pins.spi4.miso, pins.spi4.mosi));
    let spi4_enabled = spi4_raw.enable::<u8>(spi_mode, SPI_CLOCK_KHZ.kHz(), &clocks, &mut apb2);
    let spi = SpiBus::new(spi4_enabled, ChipSelect::active_low(pins.spi4.cs));

    // ADC1 (PA0..PA5)
    let adc = Adc::adc1(dp.ADC1);

    let mut firmware = Firmware::new(link, watchdog, Dispatcher::new(port, spi, adc));
    firmware.startup(&mut delay);
    firmware.run()
}
