// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jdflink: document node contract, option sets, timestamps and errors shared
// across all crates.

pub mod config;
pub mod error;
pub mod node;
pub mod option;
pub mod time;

pub use config::ClientConfig;
pub use error::{JdfError, Result};
pub use node::Node;
pub use option::{IndexableOption, IndexableValue};
