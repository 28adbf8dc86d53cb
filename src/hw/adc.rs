//! ADC1 support for STM32F7 using direct PAC register access.
//!
//! Single-channel, software-triggered, blocking conversions at 10-bit resolution. The host's
//! channel numbers are used as ADC1 input numbers unchanged (channels 0..=5 sit on PA0..PA5).
//!
//! Example:
//! ```no_run
//! let mut adc = Adc::adc1(dp.ADC1);
//! adc.enable();
//! let value = adc.read_channel(3);
//! ```

use stm32f7xx_hal::pac;

use crate::hw::AdcPort;

/// ADC1 wrapper. Clocked on construction, powered by [`AdcPort::enable`].
pub struct Adc {
    adc: pac::ADC1,
    powered: bool,
}

impl Adc {
    /// Enable the ADC1 clock and set the common prescaler. The converter stays powered down.
    pub fn adc1(adc1: pac::ADC1) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        Self {
            adc: adc1,
            powered: false,
        }
    }

    #[inline]
    pub fn free(self) -> pac::ADC1 {
        self.adc
    }
}

fn power_up(adc: &pac::adc1::RegisterBlock) {
    // Power off to configure
    adc.cr2.modify(|_, w| w.adon().clear_bit());

    // 10-bit, right-aligned, software trigger
    adc.cr1.modify(|_, w| w.res().bits(0b01));
    adc.cr2.modify(|_, w| {
        w.cont().clear_bit();
        w.align().right();
        w.exten().disabled();
        w
    });

    adc.cr2.modify(|_, w| w.adon().set_bit());
}

/// Convert a single channel.
fn convert(adc: &pac::adc1::RegisterBlock, channel: u8) -> u16 {
    // Long sample time for high-impedance sources
    if channel <= 9 {
        adc.smpr2.modify(|_, w| match channel {
            0 => w.smp0().bits(0b111),
            1 => w.smp1().bits(0b111),
            2 => w.smp2().bits(0b111),
            3 => w.smp3().bits(0b111),
            4 => w.smp4().bits(0b111),
            5 => w.smp5().bits(0b111),
            6 => w.smp6().bits(0b111),
            7 => w.smp7().bits(0b111),
            8 => w.smp8().bits(0b111),
            _ => w.smp9().bits(0b111),
        });
    }

    // Sequence length = 1 conversion
    adc.sqr1.modify(|_, w| w.l().bits(0));
    adc.sqr3
        .modify(|_, w| unsafe { w.sq1().bits(channel & 0x1F) });

    adc.cr2.modify(|_, w| w.swstart().set_bit());
    while adc.sr.read().eoc().bit_is_clear() {}

    adc.dr.read().data().bits() as u16
}

impl AdcPort for Adc {
    fn enable(&mut self) {
        power_up(&self.adc);
        self.powered = true;
    }

    fn disable(&mut self) {
        self.adc.cr2.modify(|_, w| w.adon().clear_bit());
        self.powered = false;
    }

    fn read_channel(&mut self, channel: u8) -> u16 {
        // EOC never sets while powered down.
        if !self.powered {
            log_debug!("ADC read on channel {} while powered down", channel);
            return 0;
        }
        convert(&self.adc, channel)
    }
}
