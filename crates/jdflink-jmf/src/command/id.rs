// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command identifiers.

use std::fmt;

use chrono::Utc;
use uuid::Uuid;

/// ID of a JMF command, echoed back as the response's `refID`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandId(String);

impl CommandId {
    /// A fresh process-unique ID: `C`, the current time in microseconds and
    /// a random suffix, all uppercase hex.
    pub fn generate() -> Self {
        let micros = Utc::now().timestamp_micros();
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("C{micros:X}{}", random[..8].to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommandId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for CommandId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
