// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! GPIO port controller for the host-visible lines using direct PAC register access.
//!
//! Register group D is GPIOD, group B is GPIOB. Bit `n` of a group is pin `n` of the port.
//!
//! - Direction: MODER (`00` input, `01` general-purpose output)
//! - Pull: PUPDR, cleared for every host line
//! - Read: IDR
//! - Write: BSRR (atomic set/reset)

use stm32f7xx_hal::pac;

use crate::hw::{PinMode, PortController};
use crate::pinmap::{self, PhysicalPin, RegisterGroup};

/// Borrow the register block of `group` as `$regs` and evaluate `$body`.
///
/// GPIOD and GPIOB have distinct PAC types with identical layouts, hence the macro.
macro_rules! with_port {
    ($group:expr, |$regs:ident| $body:expr) => {
        match $group {
            RegisterGroup::D => {
                let $regs = unsafe { &*pac::GPIOD::ptr() };
                $body
            }
            RegisterGroup::B => {
                let $regs = unsafe { &*pac::GPIOB::ptr() };
                $body
            }
        }
    };
}

/// Owner of GPIOD and GPIOB. No other code may configure these ports.
pub struct BoardPort {
    gpiod: pac::GPIOD,
    gpiob: pac::GPIOB,
}

impl BoardPort {
    /// Enable the port clocks, take ownership of both ports and make every host line a floating
    /// input. PB3 and PB4 leave reset in JTAG alternate-function mode, PB4 pulled up.
    pub fn new(gpiod: pac::GPIOD, gpiob: pac::GPIOB) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.ahb1enr
            .modify(|_, w| w.gpioden().set_bit().gpioben().set_bit());

        let mut port = Self { gpiod, gpiob };
        for pin in pinmap::lines() {
            port.set_direction(pin, PinMode::Input);
            let shift = u32::from(pin.bit) * 2;
            with_port!(pin.group, |regs| regs
                .pupdr
                .modify(|r, w| unsafe { w.bits(r.bits() & !(0b11 << shift)) }));
        }
        port
    }

    pub fn free(self) -> (pac::GPIOD, pac::GPIOB) {
        (self.gpiod, self.gpiob)
    }
}

impl PortController for BoardPort {
    fn set_direction(&mut self, pin: PhysicalPin, mode: PinMode) {
        let shift = u32::from(pin.bit) * 2;
        let bits: u32 = match mode {
            PinMode::Input => 0b00,
            PinMode::Output => 0b01,
        };

        with_port!(pin.group, |regs| regs.moder.modify(|r, w| unsafe {
            w.bits((r.bits() & !(0b11 << shift)) | (bits << shift))
        }));
    }

    fn read_level(&mut self, pin: PhysicalPin) -> bool {
        let idr = with_port!(pin.group, |regs| regs.idr.read().bits());
        idr & u32::from(pin.mask()) != 0
    }

    fn write_level(&mut self, pin: PhysicalPin, high: bool) {
        // BSRR: low half sets, high half resets.
        let bits = if high {
            u32::from(pin.mask())
        } else {
            u32::from(pin.mask()) << 16
        };

        with_port!(pin.group, |regs| regs.bsrr.write(|w| unsafe { w.bits(bits) }));
    }
}
