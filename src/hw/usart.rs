// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART host link.
//!
//! Inbound, the host writes 8-byte request frames back to back. Outbound, every reply is one length
//! byte followed by that many reply bytes, so an ignored request shows up as a lone `0x00`.
//!
//! To talk to the board from the host machine, open the debug USB port at
//! [`USART_BAUD`](crate::config::USART_BAUD), 8N1, raw mode.

use embedded_hal::digital::v2::OutputPin;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{self, Instance, Pins, Rx, Serial, Tx},
};

use crate::config::REQUEST_FRAME_LEN;
use crate::error::TransportError;
use crate::hw::Led;
use crate::protocol::Reply;
use crate::transport::{drain_rx, Transport};

pub struct Usart<U: Instance, L: OutputPin> {
    tx: Tx<U>,
    rx: Rx<U>,
    frame: [u8; REQUEST_FRAME_LEN],
    filled: usize,
    attached: bool,
    led: Led<L>,
}

impl<U: Instance, L: OutputPin> Usart<U, L> {
    /// Split the serial port. The link starts detached with the status LED off.
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>, led: Led<L>) -> Self {
        let (tx, rx) = serial.split();
        let mut usart = Self {
            tx,
            rx,
            frame: [0; REQUEST_FRAME_LEN],
            filled: 0,
            attached: false,
            led,
        };
        usart.led.off();
        usart
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) -> Result<(), TransportError> {
        block!(self.tx.write(b)).map_err(|_| TransportError::WriteFailed)
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) -> Result<(), TransportError> {
        block!(self.tx.flush()).map_err(|_| TransportError::WriteFailed)
    }
}

fn map_error(e: serial::Error) -> TransportError {
    match e {
        serial::Error::Framing => TransportError::Framing,
        serial::Error::Noise => TransportError::Noise,
        serial::Error::Overrun => TransportError::Overrun,
        _ => TransportError::Parity,
    }
}

impl<U: Instance, L: OutputPin> Transport for Usart<U, L> {
    fn detach(&mut self) {
        self.attached = false;
        self.filled = 0;
        self.led.off();
    }

    fn attach(&mut self) {
        // Drop anything the host sent while we were away.
        let dropped = drain_rx(|| self.rx.read());
        if dropped > 0 {
            log_debug!("discarded {} stale bytes", dropped);
        }
        self.filled = 0;
        self.attached = true;
        self.led.on();
    }

    fn receive(&mut self) -> nb::Result<[u8; REQUEST_FRAME_LEN], TransportError> {
        if !self.attached {
            return Err(nb::Error::WouldBlock);
        }

        loop {
            let byte = match self.rx.read() {
                Ok(b) => b,
                Err(nb::Error::WouldBlock) => return Err(nb::Error::WouldBlock),
                Err(nb::Error::Other(e)) => {
                    // Resynchronize on the next frame boundary the host sends.
                    self.filled = 0;
                    return Err(nb::Error::Other(map_error(e)));
                }
            };

            self.frame[self.filled] = byte;
            self.filled += 1;

            if self.filled == REQUEST_FRAME_LEN {
                self.filled = 0;
                return Ok(self.frame);
            }
        }
    }

    fn send(&mut self, reply: &Reply) -> Result<(), TransportError> {
        self.write_byte(reply.len() as u8)?;
        for &b in reply.as_bytes() {
            self.write_byte(b)?;
        }
        self.flush()
    }
}
