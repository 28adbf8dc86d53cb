// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod dispatcher;
pub mod messages;

pub use dispatcher::{Dispatcher, Outcome};
pub use messages::{Opcode, Reply, Request};
