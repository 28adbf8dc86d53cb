// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types for the capability and transport layers.
//!
//! Request dispatch itself never fails: unknown opcodes and out-of-range pins are absorbed into the
//! reply, and SPI faults are logged with a zero response byte. Only host link faults reach the
//! service loop as [`Error`].

use core::fmt;

/// Crate-level error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Error {
    /// Host link failed
    Transport(TransportError),
}

/// SPI-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum SpiError {
    /// Transfer requested while the bus is not initialized
    Inactive,
    /// Receive overrun
    Overrun,
    /// Mode fault
    ModeFault,
    /// CRC mismatch
    Crc,
}

/// Host link errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum TransportError {
    /// Framing error on the line
    Framing,
    /// Noise detected on the line
    Noise,
    /// Receive overrun
    Overrun,
    /// Parity error
    Parity,
    /// Reply could not be written
    WriteFailed,
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl fmt::Display for SpiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiError::Inactive => write!(f, "SPI bus not initialized"),
            SpiError::Overrun => write!(f, "SPI overrun"),
            SpiError::ModeFault => write!(f, "SPI mode fault"),
            SpiError::Crc => write!(f, "SPI CRC error"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Framing => write!(f, "framing error"),
            TransportError::Noise => write!(f, "line noise"),
            TransportError::Overrun => write!(f, "receive overrun"),
            TransportError::Parity => write!(f, "parity error"),
            TransportError::WriteFailed => write!(f, "reply write failed"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "Transport error: {}", e),
        }
    }
}
