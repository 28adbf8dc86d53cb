// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 GPIO-12 board.
//!
//! GPIOB and GPIOD are not split here: [`BoardPort`](crate::hw::BoardPort) owns them and drives
//! the twelve host-visible lines through raw register access.

use stm32f7xx_hal::{
    gpio::{gpioa, gpioe, Alternate, Analog, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins outside the host-visible GPIO ports. Construct this once at startup using:
///
/// ```rust
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub spi4: Spi4Pins,
    pub adc: AdcPins,
    pub link_led: gpioe::PE2<Output<PushPull>>,
}

/// USART1 TX/RX (host link)
pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// SPI4 SCK/MISO/MOSI and CS
pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
    pub cs: gpioe::PE4<Output<PushPull>>,
}

/// ADC1_IN0..ADC1_IN5, host ADC channels 0..=5
pub struct AdcPins {
    pub in0: gpioa::PA0<Analog>,
    pub in1: gpioa::PA1<Analog>,
    pub in2: gpioa::PA2<Analog>,
    pub in3: gpioa::PA3<Analog>,
    pub in4: gpioa::PA4<Analog>,
    pub in5: gpioa::PA5<Analog>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpioe = gpioe.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
                cs: gpioe.pe4.into_push_pull_output(),
            },

            adc: AdcPins {
                in0: gpioa.pa0.into_analog(),
                in1: gpioa.pa1.into_analog(),
                in2: gpioa.pa2.into_analog(),
                in3: gpioa.pa3.into_analog(),
                in4: gpioa.pa4.into_analog(),
                in5: gpioa.pa5.into_analog(),
            },

            link_led: gpioe.pe2.into_push_pull_output(),
        }
    }
}
