// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! In-memory board used for host tests.
//!
//! Port registers follow the usual direction/output/input split: a line configured as output reads
//! back its output latch, a line configured as input reads whatever the test drove onto it with
//! [`SimPort::drive_input`].

use heapless::{Deque, Vec};

use crate::config::REQUEST_FRAME_LEN;
use crate::error::{SpiError, TransportError};
use crate::hw::{AdcPort, PinMode, PortController, SpiPort, Watchdog};
use crate::pinmap::{PhysicalPin, RegisterGroup};
use crate::protocol::Reply;
use crate::transport::Transport;

/// Register triple of one simulated GPIO group.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimRegisters {
    /// Direction, 1 = output
    pub ddr: u8,
    /// Output latch
    pub port: u8,
    /// Externally driven input levels
    pub pin: u8,
}

/// Simulated GPIO groups D and B.
#[derive(Debug, Default)]
pub struct SimPort {
    d: SimRegisters,
    b: SimRegisters,
    accesses: u32,
}

impl SimPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registers(&self, group: RegisterGroup) -> &SimRegisters {
        match group {
            RegisterGroup::D => &self.d,
            RegisterGroup::B => &self.b,
        }
    }

    fn registers_mut(&mut self, group: RegisterGroup) -> &mut SimRegisters {
        match group {
            RegisterGroup::D => &mut self.d,
            RegisterGroup::B => &mut self.b,
        }
    }

    /// Simulate an external device driving an input line.
    pub fn drive_input(&mut self, pin: PhysicalPin, high: bool) {
        let regs = self.registers_mut(pin.group);
        if high {
            regs.pin |= pin.mask();
        } else {
            regs.pin &= !pin.mask();
        }
    }

    pub fn mode(&self, pin: PhysicalPin) -> PinMode {
        if self.registers(pin.group).ddr & pin.mask() != 0 {
            PinMode::Output
        } else {
            PinMode::Input
        }
    }

    /// Number of register operations performed through [`PortController`].
    #[inline]
    pub fn accesses(&self) -> u32 {
        self.accesses
    }
}

impl PortController for SimPort {
    fn set_direction(&mut self, pin: PhysicalPin, mode: PinMode) {
        self.accesses += 1;
        let regs = self.registers_mut(pin.group);
        match mode {
            PinMode::Output => regs.ddr |= pin.mask(),
            PinMode::Input => regs.ddr &= !pin.mask(),
        }
    }

    fn read_level(&mut self, pin: PhysicalPin) -> bool {
        self.accesses += 1;
        let regs = self.registers(pin.group);
        let line = (regs.port & regs.ddr) | (regs.pin & !regs.ddr);
        line & pin.mask() != 0
    }

    fn write_level(&mut self, pin: PhysicalPin, high: bool) {
        self.accesses += 1;
        let regs = self.registers_mut(pin.group);
        if high {
            regs.port |= pin.mask();
        } else {
            regs.port &= !pin.mask();
        }
    }
}

/// Maximum number of bytes recorded by [`SimSpi`].
pub const SIM_SPI_LOG: usize = 64;

/// Maximum number of responses queued in [`SimSpi`].
pub const SIM_SPI_QUEUE: usize = 16;

/// Simulated SPI master with MISO looped back to MOSI unless responses are queued.
#[derive(Debug, Default)]
pub struct SimSpi {
    enabled: bool,
    sent: Vec<u8, SIM_SPI_LOG>,
    responses: Deque<u8, SIM_SPI_QUEUE>,
    fault: Option<SpiError>,
}

impl SimSpi {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bytes clocked out so far.
    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    /// Queue the byte the slave answers with on the next transfer.
    ///
    /// Panics once [`SIM_SPI_QUEUE`] responses are pending.
    pub fn queue_response(&mut self, byte: u8) {
        self.responses
            .push_back(byte)
            .expect("SimSpi response queue full");
    }

    /// Make the next transfer fail with `err`.
    pub fn inject_fault(&mut self, err: SpiError) {
        self.fault = Some(err);
    }
}

impl SpiPort for SimSpi {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn transfer_byte(&mut self, byte: u8) -> Result<u8, SpiError> {
        if let Some(err) = self.fault.take() {
            return Err(err);
        }
        if !self.enabled {
            return Err(SpiError::Inactive);
        }
        self.sent.push(byte).expect("SimSpi transfer log full");
        Ok(self.responses.pop_front().unwrap_or(byte))
    }
}

/// Simulated ADC with one programmable sample per channel.
#[derive(Debug, Default)]
pub struct SimAdc {
    enabled: bool,
    samples: [u16; 8],
    last_channel: Option<u8>,
}

impl SimAdc {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the value returned for `channel`. Channels beyond 7 read as 0.
    pub fn set_sample(&mut self, channel: u8, value: u16) {
        if let Some(slot) = self.samples.get_mut(channel as usize) {
            *slot = value;
        }
    }

    #[inline]
    pub fn last_channel(&self) -> Option<u8> {
        self.last_channel
    }
}

impl AdcPort for SimAdc {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn read_channel(&mut self, channel: u8) -> u16 {
        self.last_channel = Some(channel);
        self.samples.get(channel as usize).copied().unwrap_or(0)
    }
}

/// Watchdog that only counts how often it was fed.
#[derive(Debug, Default)]
pub struct SimWatchdog {
    feeds: u32,
}

impl SimWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn feeds(&self) -> u32 {
        self.feeds
    }
}

impl Watchdog for SimWatchdog {
    fn feed(&mut self) {
        self.feeds = self.feeds.wrapping_add(1);
    }
}

/// Maximum number of queued requests and recorded replies in [`SimTransport`].
pub const SIM_TRANSPORT_DEPTH: usize = 16;

/// Host link backed by a request queue and a reply log.
#[derive(Debug, Default)]
pub struct SimTransport {
    attached: bool,
    attach_count: u32,
    inbox: Deque<[u8; REQUEST_FRAME_LEN], SIM_TRANSPORT_DEPTH>,
    outbox: Vec<Reply, SIM_TRANSPORT_DEPTH>,
    rx_fault: Option<TransportError>,
}

impl SimTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw setup frame from the host.
    ///
    /// Panics once [`SIM_TRANSPORT_DEPTH`] frames are pending.
    pub fn push_frame(&mut self, frame: [u8; REQUEST_FRAME_LEN]) {
        self.inbox
            .push_back(frame)
            .expect("SimTransport request queue full");
    }

    /// Queue a request built from its three meaningful bytes.
    pub fn push_request(&mut self, opcode: u8, data0: u8, data1: u8) {
        self.push_frame([0xC0, opcode, data0, data1, 0, 0, 0, 0]);
    }

    /// Make the next receive fail with `err`.
    pub fn inject_rx_fault(&mut self, err: TransportError) {
        self.rx_fault = Some(err);
    }

    pub fn replies(&self) -> &[Reply] {
        &self.outbox
    }

    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }
}

impl Transport for SimTransport {
    fn detach(&mut self) {
        self.attached = false;
    }

    fn attach(&mut self) {
        self.attached = true;
        self.attach_count += 1;
    }

    fn receive(&mut self) -> nb::Result<[u8; REQUEST_FRAME_LEN], TransportError> {
        if let Some(err) = self.rx_fault.take() {
            return Err(nb::Error::Other(err));
        }
        self.inbox.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn send(&mut self, reply: &Reply) -> Result<(), TransportError> {
        self.outbox
            .push(*reply)
            .map_err(|_| TransportError::WriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinmap::map;

    #[test]
    fn test_sim_port_output_reads_latch() {
        let mut port = SimPort::new();
        let pin = map(3).unwrap();

        port.set_direction(pin, PinMode::Output);
        port.write_level(pin, true);
        assert!(port.read_level(pin));
        assert_eq!(port.registers(RegisterGroup::D).port, 0b0000_1000);

        port.write_level(pin, false);
        assert!(!port.read_level(pin));
    }

    #[test]
    fn test_sim_port_input_reads_external_level() {
        let mut port = SimPort::new();
        let pin = map(8).unwrap();

        port.set_direction(pin, PinMode::Input);
        port.write_level(pin, true);
        assert!(!port.read_level(pin));

        port.drive_input(pin, true);
        assert!(port.read_level(pin));
        assert_eq!(port.mode(pin), PinMode::Input);
    }

    #[test]
    fn test_sim_spi_loopback_and_queue() {
        let mut spi = SimSpi::new();
        assert_eq!(spi.transfer_byte(0x12), Err(SpiError::Inactive));

        spi.enable();
        assert_eq!(spi.transfer_byte(0x12), Ok(0x12));
        spi.queue_response(0xAB);
        assert_eq!(spi.transfer_byte(0x34), Ok(0xAB));
        assert_eq!(spi.sent(), &[0x12, 0x34]);

        spi.inject_fault(SpiError::Overrun);
        assert_eq!(spi.transfer_byte(0x56), Err(SpiError::Overrun));
        assert_eq!(spi.transfer_byte(0x56), Ok(0x56));
    }

    #[test]
    #[should_panic(expected = "SimSpi response queue full")]
    fn test_sim_spi_queue_overflow_panics() {
        let mut spi = SimSpi::new();
        for b in 0..=SIM_SPI_QUEUE as u8 {
            spi.queue_response(b);
        }
    }

    #[test]
    #[should_panic(expected = "SimSpi transfer log full")]
    fn test_sim_spi_log_overflow_panics() {
        let mut spi = SimSpi::new();
        spi.enable();
        for b in 0..=SIM_SPI_LOG as u8 {
            let _ = spi.transfer_byte(b);
        }
    }

    #[test]
    #[should_panic(expected = "SimTransport request queue full")]
    fn test_sim_transport_overflow_panics() {
        let mut link = SimTransport::new();
        for op in 0..=SIM_TRANSPORT_DEPTH as u8 {
            link.push_request(op, 0, 0);
        }
    }

    #[test]
    fn test_sim_transport_queue() {
        let mut link = SimTransport::new();
        assert_eq!(link.receive(), Err(nb::Error::WouldBlock));

        link.push_request(4, 3, 0);
        assert_eq!(link.pending(), 1);
        assert_eq!(link.receive(), Ok([0xC0, 4, 3, 0, 0, 0, 0, 0]));
        assert_eq!(link.pending(), 0);
    }
}
