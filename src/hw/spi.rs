// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial Peripheral Interface (SPI) abstraction layer.
//!
//! - `SpiBus` wraps a configured HAL SPI instance with 8-bit words and the chip select of the one
//!   device exposed to the host. SPI_INIT selects the device, SPI_END releases it.
//! - `ChipSelect` is an active-low GPIO output wrapper for manual CS control.

use stm32f7xx_hal::{
    gpio::{self, Output, PinState, PushPull},
    prelude::*,
    spi::{self, Enabled, Spi},
};

use crate::error::SpiError;
use crate::hw::SpiPort;

/// Host-controlled SPI master: enabled HAL SPI instance (8-bit words) plus its chip select.
pub struct SpiBus<I, P, const CP: char, const CN: u8> {
    spi: Spi<I, P, Enabled<u8>>,
    cs: ChipSelect<CP, CN>,
    active: bool,
}

impl<I, P, const CP: char, const CN: u8> SpiBus<I, P, CP, CN>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    /// Wrap the bus. The device stays deselected until [`SpiPort::enable`].
    pub fn new(spi: Spi<I, P, Enabled<u8>>, cs: ChipSelect<CP, CN>) -> Self {
        Self {
            spi,
            cs,
            active: false,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn free(self) -> (Spi<I, P, Enabled<u8>>, ChipSelect<CP, CN>) {
        (self.spi, self.cs)
    }
}

impl<I, P, const CP: char, const CN: u8> SpiPort for SpiBus<I, P, CP, CN>
where
    I: spi::Instance,
    P: spi::Pins<I>,
{
    fn enable(&mut self) {
        self.cs.select();
        self.active = true;
    }

    fn disable(&mut self) {
        self.cs.deselect();
        self.active = false;
    }

    /// Perform a blocking, full-duplex transfer of one byte.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiError> {
        if !self.active {
            return Err(SpiError::Inactive);
        }

        let mut tmp = [byte];
        self.spi.transfer(&mut tmp).map_err(map_error)?;
        Ok(tmp[0])
    }
}

fn map_error(e: spi::Error) -> SpiError {
    match e {
        spi::Error::Overrun => SpiError::Overrun,
        spi::Error::ModeFault => SpiError::ModeFault,
        _ => SpiError::Crc,
    }
}

/// Manual chip-select line, active-low, generic over any GPIO pin.
pub struct ChipSelect<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> ChipSelect<P, N> {
    /// Create an active-low chip select and set to the inactive state (i.e., high).
    pub fn active_low<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_state(PinState::High);
        Self { pin }
    }

    /// Assert the chip select.
    #[inline]
    pub fn select(&mut self) {
        self.pin.set_low();
    }

    /// Deassert the chip select.
    #[inline]
    pub fn deselect(&mut self) {
        self.pin.set_high();
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}
