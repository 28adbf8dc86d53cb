// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Independent watchdog (IWDG).
//!
//! Clocked from the ~32 kHz LSI. Once started it cannot be stopped; the only way out of a missed
//! feed is a full MCU reset, which is exactly how BOARD_RESET restarts the board.

use stm32f7xx_hal::pac;

use crate::hw::Watchdog;

// Key register values
const KEY_FEED: u32 = 0xAAAA;
const KEY_UNLOCK: u32 = 0x5555;
const KEY_START: u32 = 0xCCCC;

/// Prescaler /64: 32 kHz LSI -> 500 Hz counter, 2 ms per tick.
const PR_DIV64: u32 = 0b100;
const MS_PER_TICK: u32 = 2;
const RELOAD_MAX: u32 = 0x0FFF;

pub struct Iwdg {
    iwdg: pac::IWDG,
}

impl Iwdg {
    /// Start the watchdog with (approximately) the given timeout.
    pub fn start(iwdg: pac::IWDG, timeout_ms: u32) -> Self {
        let reload = (timeout_ms / MS_PER_TICK).clamp(1, RELOAD_MAX);

        iwdg.kr.write(|w| unsafe { w.bits(KEY_START) });
        iwdg.kr.write(|w| unsafe { w.bits(KEY_UNLOCK) });
        iwdg.pr.write(|w| unsafe { w.bits(PR_DIV64) });
        iwdg.rlr.write(|w| unsafe { w.bits(reload) });

        // Wait for the prescaler and reload updates to land in the LSI domain
        while iwdg.sr.read().bits() != 0 {}

        iwdg.kr.write(|w| unsafe { w.bits(KEY_FEED) });

        Self { iwdg }
    }
}

impl Watchdog for Iwdg {
    #[inline]
    fn feed(&mut self) {
        self.iwdg.kr.write(|w| unsafe { w.bits(KEY_FEED) });
    }
}
