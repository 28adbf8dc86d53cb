// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Build-time configuration.

/// Size of an inbound request frame (control setup packet layout).
pub const REQUEST_FRAME_LEN: usize = 8;

/// Capacity of the reply buffer. The longest reply (ADC_READ) uses 4 bytes.
pub const REPLY_CAPACITY: usize = 5;

/// Number of host-visible GPIO lines.
pub const GPIO_COUNT: u8 = 12;

/// ADC samples are reported with 10 bits of resolution.
pub const ADC_MASK: u16 = 0x03FF;

/// Time the link stays detached at startup so the host notices a re-enumeration.
pub const ATTACH_SETTLE_MS: u32 = 255;

/// Watchdog timeout. The main loop must feed the watchdog faster than this.
pub const WATCHDOG_TIMEOUT_MS: u32 = 2_000;

/// Baud rate of the host link on the board build.
pub const USART_BAUD: u32 = 115_200;

/// SPI clock on the board build.
pub const SPI_CLOCK_KHZ: u32 = 1_000;
