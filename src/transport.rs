// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host link and the main service loop.
//!
//! [`Firmware`] owns the dispatcher, the link and the watchdog. Each [`Firmware::poll`] feeds the
//! watchdog, takes at most one request off the link and answers it. After BOARD_RESET the loop
//! stops feeding the watchdog so the MCU restarts.

use embedded_hal::blocking::delay::DelayMs;

use crate::config::{ATTACH_SETTLE_MS, REQUEST_FRAME_LEN};
use crate::error::{Error, TransportError};
use crate::hw::{AdcPort, PortController, SpiPort, Watchdog};
use crate::protocol::{Dispatcher, Outcome, Reply, Request};

/// Request/response channel to the host.
pub trait Transport {
    /// Drop off the bus so the host forgets the device.
    fn detach(&mut self) {}

    /// Present the device to the host.
    fn attach(&mut self) {}

    /// Take the next request frame, if one has arrived.
    fn receive(&mut self) -> nb::Result<[u8; REQUEST_FRAME_LEN], TransportError>;

    /// Transmit a reply. Empty replies mean "no payload"; the link decides how to signal that.
    fn send(&mut self, reply: &Reply) -> Result<(), TransportError>;
}

/// Read and discard from `read` until it reports no more data. Line errors are skipped, not
/// treated as the end of the backlog. Returns the number of bytes dropped.
pub fn drain_rx<E>(mut read: impl FnMut() -> nb::Result<u8, E>) -> usize {
    let mut dropped = 0;
    loop {
        match read() {
            Ok(_) => dropped += 1,
            Err(nb::Error::Other(_)) => {}
            Err(nb::Error::WouldBlock) => return dropped,
        }
    }
}

/// Result of one pass through the service loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Poll {
    /// No request was waiting.
    Idle,
    /// A request was answered with a reply of this many bytes.
    Serviced(usize),
    /// The board is waiting for the watchdog to reset it.
    Halted,
}

pub struct Firmware<T, W, P, S, A> {
    link: T,
    watchdog: W,
    dispatcher: Dispatcher<P, S, A>,
}

impl<T, W, P, S, A> Firmware<T, W, P, S, A>
where
    T: Transport,
    W: Watchdog,
    P: PortController,
    S: SpiPort,
    A: AdcPort,
{
    pub fn new(link: T, watchdog: W, dispatcher: Dispatcher<P, S, A>) -> Self {
        Self {
            link,
            watchdog,
            dispatcher,
        }
    }

    pub fn free(self) -> (T, W, Dispatcher<P, S, A>) {
        (self.link, self.watchdog, self.dispatcher)
    }

    #[inline]
    pub fn link(&self) -> &T {
        &self.link
    }

    #[inline]
    pub fn link_mut(&mut self) -> &mut T {
        &mut self.link
    }

    #[inline]
    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher<P, S, A> {
        &self.dispatcher
    }

    #[inline]
    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<P, S, A> {
        &mut self.dispatcher
    }

    /// Force the host to re-enumerate: detach, hold off for [`ATTACH_SETTLE_MS`] while keeping
    /// the watchdog fed, then attach.
    pub fn startup<D: DelayMs<u32>>(&mut self, delay: &mut D) {
        self.link.detach();

        for _ in 0..ATTACH_SETTLE_MS {
            self.watchdog.feed();
            delay.delay_ms(1);
        }

        self.link.attach();
        log_info!("attached, serving requests");
    }

    /// Service at most one request.
    pub fn poll(&mut self) -> Result<Poll, Error> {
        if self.dispatcher.is_halted() {
            return Ok(Poll::Halted);
        }

        self.watchdog.feed();

        let frame = match self.link.receive() {
            Ok(frame) => frame,
            Err(nb::Error::WouldBlock) => return Ok(Poll::Idle),
            Err(nb::Error::Other(e)) => return Err(e.into()),
        };

        match self.dispatcher.dispatch(Request::from_frame(&frame)) {
            Outcome::Reply(reply) => {
                self.link.send(&reply)?;
                Ok(Poll::Serviced(reply.len()))
            }
            Outcome::Halt => Ok(Poll::Halted),
        }
    }

    /// Serve requests forever. Once halted, detach and spin without feeding the watchdog.
    pub fn run(&mut self) -> ! {
        loop {
            match self.poll() {
                Ok(Poll::Halted) => break,
                Ok(_) => {}
                Err(Error::Transport(e)) => log_warn!("link error, request dropped: {}", e),
            }
        }

        self.link.detach();
        loop {
            core::hint::spin_loop();
        }
    }
}
