// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Request and reply messages of the GPIO-12 control protocol.
//!
//! Every request arrives as an 8-byte control setup frame:
//!
//! | Byte | 0 | 1 | 2 | 3 | 4..8 |
//! | ---- | - | - | - | - | ---- |
//! | Field | request type | opcode | data0 | data1 | unused |
//!
//! Replies are 0..=4 bytes, prefixed with the opcode.

use crate::config::{REPLY_CAPACITY, REQUEST_FRAME_LEN};

// Opcodes
pub const BOARD_INIT: u8 = 0;
pub const BOARD_RESET: u8 = 1;
pub const GPIO_INPUT: u8 = 2;
pub const GPIO_OUTPUT: u8 = 3;
pub const GPIO_READ: u8 = 4;
pub const GPIO_WRITE: u8 = 5;
pub const SPI_INIT: u8 = 6;
pub const SPI_DATA: u8 = 7;
pub const SPI_END: u8 = 8;
pub const ADC_INIT: u8 = 9;
pub const ADC_READ: u8 = 10;
pub const ADC_END: u8 = 11;

/// Closed set of request codes understood by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Opcode {
    BoardInit,
    BoardReset,
    GpioInput,
    GpioOutput,
    GpioRead,
    GpioWrite,
    SpiInit,
    SpiData,
    SpiEnd,
    AdcInit,
    AdcRead,
    AdcEnd,
}

impl Opcode {
    pub const ALL: [Opcode; 12] = [
        Opcode::BoardInit,
        Opcode::BoardReset,
        Opcode::GpioInput,
        Opcode::GpioOutput,
        Opcode::GpioRead,
        Opcode::GpioWrite,
        Opcode::SpiInit,
        Opcode::SpiData,
        Opcode::SpiEnd,
        Opcode::AdcInit,
        Opcode::AdcRead,
        Opcode::AdcEnd,
    ];

    /// Wire value of this opcode.
    pub fn code(self) -> u8 {
        match self {
            Opcode::BoardInit => BOARD_INIT,
            Opcode::BoardReset => BOARD_RESET,
            Opcode::GpioInput => GPIO_INPUT,
            Opcode::GpioOutput => GPIO_OUTPUT,
            Opcode::GpioRead => GPIO_READ,
            Opcode::GpioWrite => GPIO_WRITE,
            Opcode::SpiInit => SPI_INIT,
            Opcode::SpiData => SPI_DATA,
            Opcode::SpiEnd => SPI_END,
            Opcode::AdcInit => ADC_INIT,
            Opcode::AdcRead => ADC_READ,
            Opcode::AdcEnd => ADC_END,
        }
    }

    /// Number of reply bytes this opcode produces. `None` for BOARD_RESET, which never replies.
    pub fn reply_len(self) -> Option<usize> {
        match self {
            Opcode::BoardReset => None,
            Opcode::BoardInit
            | Opcode::SpiInit
            | Opcode::SpiEnd
            | Opcode::AdcInit
            | Opcode::AdcEnd => Some(1),
            Opcode::GpioInput | Opcode::GpioOutput => Some(2),
            Opcode::GpioRead | Opcode::GpioWrite | Opcode::SpiData => Some(3),
            Opcode::AdcRead => Some(4),
        }
    }
}

impl TryFrom<u8> for Opcode {
    /// The unrecognized code.
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            BOARD_INIT => Ok(Opcode::BoardInit),
            BOARD_RESET => Ok(Opcode::BoardReset),
            GPIO_INPUT => Ok(Opcode::GpioInput),
            GPIO_OUTPUT => Ok(Opcode::GpioOutput),
            GPIO_READ => Ok(Opcode::GpioRead),
            GPIO_WRITE => Ok(Opcode::GpioWrite),
            SPI_INIT => Ok(Opcode::SpiInit),
            SPI_DATA => Ok(Opcode::SpiData),
            SPI_END => Ok(Opcode::SpiEnd),
            ADC_INIT => Ok(Opcode::AdcInit),
            ADC_READ => Ok(Opcode::AdcRead),
            ADC_END => Ok(Opcode::AdcEnd),
            other => Err(other),
        }
    }
}

/// One host request. The opcode is kept raw so unknown codes can still be echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub struct Request {
    pub code: u8,
    pub data0: u8,
    pub data1: u8,
}

impl Request {
    pub fn new(opcode: Opcode, data0: u8, data1: u8) -> Self {
        Self {
            code: opcode.code(),
            data0,
            data1,
        }
    }

    /// Decode a setup frame: opcode in byte 1, data in bytes 2 (low) and 3 (high).
    pub fn from_frame(frame: &[u8; REQUEST_FRAME_LEN]) -> Self {
        Self {
            code: frame[1],
            data0: frame[2],
            data1: frame[3],
        }
    }

    #[inline]
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::try_from(self.code).ok()
    }
}

/// Reply to one request. Byte 0 always holds the request code; only `len()` bytes are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub struct Reply {
    buf: [u8; REPLY_CAPACITY],
    len: u8,
}

impl Reply {
    /// Empty reply for `code`. Byte 0 is set, length is 0.
    pub fn new(code: u8) -> Self {
        let mut buf = [0; REPLY_CAPACITY];
        buf[0] = code;
        Self { buf, len: 0 }
    }

    /// Reply carrying `payload` after the echoed code.
    pub(crate) fn with_payload(code: u8, payload: &[u8]) -> Self {
        let mut reply = Self::new(code);
        let n = payload.len().min(REPLY_CAPACITY - 1);
        reply.buf[1..1 + n].copy_from_slice(&payload[..n]);
        reply.len = (1 + n) as u8;
        reply
    }

    #[inline]
    pub fn code(&self) -> u8 {
        self.buf[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes to transmit.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len as usize]
    }
}
