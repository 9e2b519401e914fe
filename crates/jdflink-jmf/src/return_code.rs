// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JMF return codes as reported by Nexio.

use std::fmt;

/// A JMF `ReturnCode`.
///
/// Codes outside the documented set are kept as-is; only their message
/// reports them as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnCode(i64);

impl ReturnCode {
    pub const SUCCESS: Self = Self(0);
    pub const GENERAL_ERROR: Self = Self(1);
    pub const INTERNAL_ERROR: Self = Self(2);
    pub const XML_PARSE_ERROR: Self = Self(3);
    pub const COMMAND_NOT_IMPLEMENTED: Self = Self(5);
    pub const INVALID_PARAMS: Self = Self(6);
    pub const INSUFFICIENT_PARAMS: Self = Self(7);
    pub const NO_EXECUTABLE_NODES: Self = Self(102);
    pub const UNKNOWN_QUEUE_ENTRY: Self = Self(105);
    pub const ENTRY_IS_RUNNING: Self = Self(106);
    pub const JOB_IN_REQUIRED_STATE: Self = Self(113);
    pub const JOB_IN_FINAL_STATE: Self = Self(114);
    pub const URL_UNRESOLVED: Self = Self(120);

    pub const ALL: &'static [ReturnCode] = &[
        Self::SUCCESS,
        Self::GENERAL_ERROR,
        Self::INTERNAL_ERROR,
        Self::XML_PARSE_ERROR,
        Self::COMMAND_NOT_IMPLEMENTED,
        Self::INVALID_PARAMS,
        Self::INSUFFICIENT_PARAMS,
        Self::NO_EXECUTABLE_NODES,
        Self::UNKNOWN_QUEUE_ENTRY,
        Self::ENTRY_IS_RUNNING,
        Self::JOB_IN_REQUIRED_STATE,
        Self::JOB_IN_FINAL_STATE,
        Self::URL_UNRESOLVED,
    ];

    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i64 {
        self.0
    }

    pub fn is_success(self) -> bool {
        self == Self::SUCCESS
    }

    pub fn is_known(self) -> bool {
        Self::ALL.contains(&self)
    }

    /// Human-readable meaning of this code.
    pub fn message(self) -> &'static str {
        match self.0 {
            0 => "Request successful",
            1 => "General error",
            2 => "Internal error",
            3 => "Request could not be parsed as valid JDF/JMF",
            5 => "Requested command not implemented by Nexio",
            6 => "Request provided invalid parameters",
            7 => "Request provided insufficient parameters",
            102 => "No runnable jobs found in JMF",
            105 => "An unknown queue entry was specified",
            106 => "Request cannot be completed because the requested entry is running",
            113 => {
                "Request cannot be completed because the job is in a state that cannot be changed"
            }
            114 => {
                "Request cannot be completed because the requested job is in a finished state \
                 (pending return, completed, or aborted)"
            }
            120 => "Request cannot be completed because it specified an unresolvable URL",
            _ => "Invalid response code specified",
        }
    }
}

impl From<i64> for ReturnCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
