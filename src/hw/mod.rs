// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Peripheral capabilities used by the dispatcher.
//!
//! The dispatcher never touches registers directly. It is handed a [`PortController`], an
//! [`SpiPort`] and an [`AdcPort`]; the transport loop additionally needs a [`Watchdog`].
//!
//! - [`sim`] implements all of them in memory for host tests.
//! - With the `board` feature, the remaining modules implement them for the STM32F777.

use crate::error::SpiError;
use crate::pinmap::PhysicalPin;

pub mod sim;

#[cfg(feature = "board")]
pub mod adc;
#[cfg(feature = "board")]
pub mod led;
#[cfg(feature = "board")]
pub mod pins;
#[cfg(feature = "board")]
pub mod port;
#[cfg(feature = "board")]
pub mod spi;
#[cfg(feature = "board")]
pub mod usart;
#[cfg(feature = "board")]
pub mod watchdog;

#[cfg(feature = "board")]
pub use adc::Adc;
#[cfg(feature = "board")]
pub use led::Led;
#[cfg(feature = "board")]
pub use pins::BoardPins;
#[cfg(feature = "board")]
pub use port::BoardPort;
#[cfg(feature = "board")]
pub use spi::{ChipSelect, SpiBus};
#[cfg(feature = "board")]
pub use usart::Usart;
#[cfg(feature = "board")]
pub use watchdog::Iwdg;

/// Direction of a GPIO line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

/// Direct access to the GPIO direction, input and output registers.
///
/// The registers are the only record of pin state; implementations must not cache it.
pub trait PortController {
    fn set_direction(&mut self, pin: PhysicalPin, mode: PinMode);

    /// Sampled logic level of the line.
    fn read_level(&mut self, pin: PhysicalPin) -> bool;

    fn write_level(&mut self, pin: PhysicalPin, high: bool);
}

/// Single-byte, full-duplex SPI master.
pub trait SpiPort {
    fn enable(&mut self);

    fn disable(&mut self);

    /// Blocking transfer of one byte. Returns the byte clocked in.
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiError>;
}

/// Blocking single-conversion ADC.
pub trait AdcPort {
    fn enable(&mut self);

    fn disable(&mut self);

    /// Convert `channel` and return the raw sample.
    fn read_channel(&mut self, channel: u8) -> u16;
}

/// Hardware watchdog that resets the MCU unless fed periodically.
pub trait Watchdog {
    fn feed(&mut self);
}

impl<T: PortController + ?Sized> PortController for &mut T {
    #[inline]
    fn set_direction(&mut self, pin: PhysicalPin, mode: PinMode) {
        (**self).set_direction(pin, mode)
    }

    #[inline]
    fn read_level(&mut self, pin: PhysicalPin) -> bool {
        (**self).read_level(pin)
    }

    #[inline]
    fn write_level(&mut self, pin: PhysicalPin, high: bool) {
        (**self).write_level(pin, high)
    }
}

impl<T: SpiPort + ?Sized> SpiPort for &mut T {
    #[inline]
    fn enable(&mut self) {
        (**self).enable()
    }

    #[inline]
    fn disable(&mut self) {
        (**self).disable()
    }

    #[inline]
    fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiError> {
        (**self).transfer_byte(byte)
    }
}

impl<T: AdcPort + ?Sized> AdcPort for &mut T {
    #[inline]
    fn enable(&mut self) {
        (**self).enable()
    }

    #[inline]
    fn disable(&mut self) {
        (**self).disable()
    }

    #[inline]
    fn read_channel(&mut self, channel: u8) -> u16 {
        (**self).read_channel(channel)
    }
}

impl<T: Watchdog + ?Sized> Watchdog for &mut T {
    #[inline]
    fn feed(&mut self) {
        (**self).feed()
    }
}
