// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # GPIO-12 Firmware
//!
//! This crate contains the firmware core for the GPIO-12 board: twelve general-purpose pins, one
//! SPI bus and six ADC channels exposed to a host through a small request/reply protocol.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`pinmap`] | Logical pin (1..12) to register group/bit translation |
//! | [`protocol`] | Opcodes, request/reply framing and the command dispatcher |
//! | [`hw`] | Peripheral capabilities, host simulation, STM32F7 board drivers |
//! | [`transport`] | Request polling loop, watchdog feeding, attach handshake |
//! | [`error`] | Error types shared by the capability and transport layers |
//! | [`config`] | Build-time constants |
//!
//! ## Getting Started
//!
//! Run the host tests against the simulated board:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features board --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod logging;

pub mod config;
pub mod error;
pub mod hw;
pub mod pinmap;
pub mod protocol;
pub mod transport;

pub use error::{Error, SpiError, TransportError};
pub use pinmap::{LogicalPin, PhysicalPin, RegisterGroup};
pub use protocol::{Dispatcher, Opcode, Outcome, Reply, Request};
pub use transport::{Firmware, Poll, Transport};
