// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command dispatcher for the GPIO-12 control protocol.
//!
//! Turns one [`Request`] into one [`Outcome`], driving the pin mapper and the peripheral
//! capabilities it owns. Nothing is remembered between requests except the terminal halt entered
//! by BOARD_RESET.

use crate::config::ADC_MASK;
use crate::hw::{AdcPort, PinMode, PortController, SpiPort};
use crate::pinmap;
use crate::protocol::messages::{Opcode, Reply, Request};

/// Result of dispatching one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board", derive(defmt::Format))]
pub enum Outcome {
    /// Reply to hand back to the transport. May be empty for unknown opcodes.
    Reply(Reply),
    /// BOARD_RESET was received. No further requests are served; the watchdog restarts the MCU.
    Halt,
}

/// Request dispatcher owning the port controller, SPI bus and ADC.
pub struct Dispatcher<P, S, A> {
    port: P,
    spi: S,
    adc: A,
    halted: bool,
}

impl<P, S, A> Dispatcher<P, S, A>
where
    P: PortController,
    S: SpiPort,
    A: AdcPort,
{
    pub fn new(port: P, spi: S, adc: A) -> Self {
        Self {
            port,
            spi,
            adc,
            halted: false,
        }
    }

    /// Tear down the dispatcher and return its capabilities.
    pub fn free(self) -> (P, S, A) {
        (self.port, self.spi, self.adc)
    }

    /// True once BOARD_RESET has been dispatched.
    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[inline]
    pub fn port(&self) -> &P {
        &self.port
    }

    #[inline]
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    #[inline]
    pub fn spi(&self) -> &S {
        &self.spi
    }

    #[inline]
    pub fn spi_mut(&mut self) -> &mut S {
        &mut self.spi
    }

    #[inline]
    pub fn adc(&self) -> &A {
        &self.adc
    }

    #[inline]
    pub fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }

    /// Execute one request.
    pub fn dispatch(&mut self, req: Request) -> Outcome {
        if self.halted {
            return Outcome::Halt;
        }

        let code = req.code;
        let Some(op) = req.opcode() else {
            log_debug!("ignoring unknown opcode {}", code);
            return Outcome::Reply(Reply::new(code));
        };

        let reply = match op {
            // Nothing to initialize yet.
            Opcode::BoardInit => Reply::with_payload(code, &[]),

            Opcode::BoardReset => {
                log_info!("board reset requested, waiting for watchdog");
                self.halted = true;
                return Outcome::Halt;
            }

            Opcode::SpiInit => {
                self.spi.enable();
                Reply::with_payload(code, &[])
            }

            Opcode::SpiData => {
                let response = match self.spi.transfer_byte(req.data0) {
                    Ok(b) => b,
                    Err(e) => {
                        log_warn!("SPI transfer of {} failed: {}", req.data0, e);
                        0
                    }
                };
                Reply::with_payload(code, &[response, 0])
            }

            Opcode::SpiEnd => {
                self.spi.disable();
                Reply::with_payload(code, &[])
            }

            Opcode::GpioInput => {
                self.set_mode(req.data0, PinMode::Input);
                Reply::with_payload(code, &[req.data0])
            }

            Opcode::GpioOutput => {
                self.set_mode(req.data0, PinMode::Output);
                Reply::with_payload(code, &[req.data0])
            }

            Opcode::GpioRead => {
                let level = self.read_pin(req.data0).unwrap_or(false);
                Reply::with_payload(code, &[req.data0, level as u8])
            }

            // Echo the raw value byte; any nonzero value drives the line high.
            Opcode::GpioWrite => {
                self.write_pin(req.data0, req.data1 != 0);
                Reply::with_payload(code, &[req.data0, req.data1])
            }

            Opcode::AdcInit => {
                self.adc.enable();
                Reply::with_payload(code, &[])
            }

            Opcode::AdcRead => {
                let sample = self.adc.read_channel(req.data0) & ADC_MASK;
                let [lo, hi] = sample.to_le_bytes();
                Reply::with_payload(code, &[req.data0, lo, hi])
            }

            Opcode::AdcEnd => {
                self.adc.disable();
                Reply::with_payload(code, &[])
            }
        };

        Outcome::Reply(reply)
    }

    fn set_mode(&mut self, logical: u8, mode: PinMode) {
        match pinmap::map(logical) {
            Some(pin) => self.port.set_direction(pin, mode),
            None => log_debug!("pin {} out of range, direction unchanged", logical),
        }
    }

    fn read_pin(&mut self, logical: u8) -> Option<bool> {
        match pinmap::map(logical) {
            Some(pin) => Some(self.port.read_level(pin)),
            None => {
                log_debug!("pin {} out of range, nothing read", logical);
                None
            }
        }
    }

    fn write_pin(&mut self, logical: u8, high: bool) {
        match pinmap::map(logical) {
            Some(pin) => self.port.write_level(pin, high),
            None => log_debug!("pin {} out of range, nothing written", logical),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpiError;
    use crate::hw::sim::{SimAdc, SimPort, SimRegisters, SimSpi};
    use crate::pinmap::{map, RegisterGroup};
    use crate::protocol::messages::*;

    fn dispatcher() -> Dispatcher<SimPort, SimSpi, SimAdc> {
        Dispatcher::new(SimPort::new(), SimSpi::new(), SimAdc::new())
    }

    fn reply(outcome: Outcome) -> Reply {
        match outcome {
            Outcome::Reply(r) => r,
            Outcome::Halt => panic!("unexpected halt"),
        }
    }

    #[test]
    fn test_reply_framing_for_every_opcode() {
        for op in Opcode::ALL {
            let mut d = dispatcher();
            d.spi_mut().enable();
            let outcome = d.dispatch(Request::new(op, 1, 0));

            match op.reply_len() {
                Some(len) => {
                    let r = reply(outcome);
                    assert_eq!(r.len(), len, "{:?}", op);
                    assert_eq!(r.as_bytes()[0], op.code(), "{:?}", op);
                }
                None => assert_eq!(outcome, Outcome::Halt),
            }
        }
    }

    #[test]
    fn test_unknown_opcode_is_empty() {
        let mut d = dispatcher();
        let r = reply(d.dispatch(Request {
            code: 0x7F,
            data0: 1,
            data1: 1,
        }));
        assert!(r.is_empty());
        assert_eq!(r.code(), 0x7F);
        assert_eq!(d.port().accesses(), 0);
    }

    #[test]
    fn test_gpio_example_scenario() {
        let mut d = dispatcher();

        let r = reply(d.dispatch(Request::new(Opcode::GpioOutput, 3, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_OUTPUT, 3]);
        assert_eq!(d.port().registers(RegisterGroup::D).ddr, 0b0000_1000);

        let r = reply(d.dispatch(Request::new(Opcode::GpioWrite, 3, 1)));
        assert_eq!(r.as_bytes(), &[GPIO_WRITE, 3, 1]);

        let r = reply(d.dispatch(Request::new(Opcode::GpioRead, 3, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_READ, 3, 1]);

        d.dispatch(Request::new(Opcode::GpioWrite, 3, 0));
        let r = reply(d.dispatch(Request::new(Opcode::GpioRead, 3, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_READ, 3, 0]);
    }

    #[test]
    fn test_gpio_write_echoes_raw_value() {
        let mut d = dispatcher();
        d.dispatch(Request::new(Opcode::GpioOutput, 9, 0));

        let r = reply(d.dispatch(Request::new(Opcode::GpioWrite, 9, 0x80)));
        assert_eq!(r.as_bytes(), &[GPIO_WRITE, 9, 0x80]);
        assert_eq!(d.port().registers(RegisterGroup::B).port, 0b0000_0100);

        let r = reply(d.dispatch(Request::new(Opcode::GpioWrite, 3, 2)));
        assert_eq!(r.as_bytes(), &[GPIO_WRITE, 3, 2]);

        let r = reply(d.dispatch(Request::new(Opcode::GpioWrite, 9, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_WRITE, 9, 0]);
        assert_eq!(d.port().registers(RegisterGroup::B).port, 0);
    }

    #[test]
    fn test_gpio_input_reads_external_level() {
        let mut d = dispatcher();
        d.dispatch(Request::new(Opcode::GpioInput, 12, 0));
        d.port_mut().drive_input(map(12).unwrap(), true);

        let r = reply(d.dispatch(Request::new(Opcode::GpioRead, 12, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_READ, 12, 1]);
    }

    #[test]
    fn test_gpio_input_releases_output() {
        let mut d = dispatcher();
        let pin = map(10).unwrap();

        d.dispatch(Request::new(Opcode::GpioOutput, 10, 0));
        d.dispatch(Request::new(Opcode::GpioWrite, 10, 1));
        assert_eq!(d.port().registers(RegisterGroup::B).ddr, 0b0000_1000);
        assert_eq!(d.port().mode(pin), PinMode::Output);

        let r = reply(d.dispatch(Request::new(Opcode::GpioInput, 10, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_INPUT, 10]);
        assert_eq!(d.port().registers(RegisterGroup::B).ddr, 0);
        assert_eq!(d.port().mode(pin), PinMode::Input);

        // Latch is still high, but the line now follows the outside world.
        let r = reply(d.dispatch(Request::new(Opcode::GpioRead, 10, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_READ, 10, 0]);

        d.port_mut().drive_input(pin, true);
        let r = reply(d.dispatch(Request::new(Opcode::GpioRead, 10, 0)));
        assert_eq!(r.as_bytes(), &[GPIO_READ, 10, 1]);
    }

    #[test]
    fn test_gpio_out_of_range_is_noop() {
        let mut d = dispatcher();

        for pin in [0u8, 13, 0xFF] {
            let r = reply(d.dispatch(Request::new(Opcode::GpioOutput, pin, 0)));
            assert_eq!(r.as_bytes(), &[GPIO_OUTPUT, pin]);

            let r = reply(d.dispatch(Request::new(Opcode::GpioWrite, pin, 1)));
            assert_eq!(r.len(), 3);

            let r = reply(d.dispatch(Request::new(Opcode::GpioRead, pin, 0)));
            assert_eq!(r.as_bytes(), &[GPIO_READ, pin, 0]);
        }

        assert_eq!(d.port().accesses(), 0);
        assert_eq!(*d.port().registers(RegisterGroup::D), SimRegisters::default());
        assert_eq!(*d.port().registers(RegisterGroup::B), SimRegisters::default());
    }

    #[test]
    fn test_adc_read_splits_little_endian() {
        let mut d = dispatcher();
        d.adc_mut().set_sample(5, 0x02A7);

        let r = reply(d.dispatch(Request::new(Opcode::AdcRead, 5, 0)));
        let bytes = r.as_bytes();
        assert_eq!(bytes, &[ADC_READ, 5, 0xA7, 0x02]);
        assert_eq!(u16::from(bytes[2]) | (u16::from(bytes[3]) << 8), 0x02A7);
        assert_eq!(d.adc().last_channel(), Some(5));
    }

    #[test]
    fn test_adc_read_masks_to_ten_bits() {
        let mut d = dispatcher();
        d.adc_mut().set_sample(0, 0xFFFF);

        let r = reply(d.dispatch(Request::new(Opcode::AdcRead, 0, 0)));
        assert_eq!(r.as_bytes(), &[ADC_READ, 0, 0xFF, 0x03]);
    }

    #[test]
    fn test_adc_init_end() {
        let mut d = dispatcher();
        d.dispatch(Request::new(Opcode::AdcInit, 0, 0));
        assert!(d.adc().is_enabled());
        d.dispatch(Request::new(Opcode::AdcEnd, 0, 0));
        assert!(!d.adc().is_enabled());
    }

    #[test]
    fn test_spi_session() {
        let mut d = dispatcher();

        d.dispatch(Request::new(Opcode::SpiInit, 0, 0));
        assert!(d.spi().is_enabled());

        d.spi_mut().queue_response(0x5A);
        let r = reply(d.dispatch(Request::new(Opcode::SpiData, 0x9F, 0xEE)));
        assert_eq!(r.as_bytes(), &[SPI_DATA, 0x5A, 0]);
        assert_eq!(d.spi().sent(), &[0x9F]);

        d.dispatch(Request::new(Opcode::SpiEnd, 0, 0));
        assert!(!d.spi().is_enabled());
    }

    #[test]
    fn test_spi_failure_keeps_framing() {
        let mut d = dispatcher();
        d.spi_mut().enable();
        d.spi_mut().inject_fault(SpiError::ModeFault);

        let r = reply(d.dispatch(Request::new(Opcode::SpiData, 0x01, 0)));
        assert_eq!(r.as_bytes(), &[SPI_DATA, 0, 0]);
    }

    #[test]
    fn test_board_reset_is_terminal() {
        let mut d = dispatcher();
        assert!(!d.is_halted());

        assert_eq!(d.dispatch(Request::new(Opcode::BoardReset, 0, 0)), Outcome::Halt);
        assert!(d.is_halted());

        assert_eq!(d.dispatch(Request::new(Opcode::BoardInit, 0, 0)), Outcome::Halt);
        assert_eq!(d.dispatch(Request::new(Opcode::GpioOutput, 1, 0)), Outcome::Halt);
        assert_eq!(d.port().accesses(), 0);
    }

    #[test]
    fn test_dispatch_through_borrowed_capabilities() {
        let mut port = SimPort::new();
        let mut spi = SimSpi::new();
        let mut adc = SimAdc::new();

        {
            let mut d = Dispatcher::new(&mut port, &mut spi, &mut adc);
            d.dispatch(Request::new(Opcode::GpioOutput, 1, 0));
            d.dispatch(Request::new(Opcode::GpioWrite, 1, 1));
        }

        assert_eq!(port.registers(RegisterGroup::D).port, 0b0000_0001);
    }
}
