// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Dispatch error taxonomy for conversations with a Nexio controller.

use jdflink_core::JdfError;
use thiserror::Error;

use crate::response::JmfResponse;

/// Comment Nexio attaches to a submission whose job ID is already queued.
pub const JOB_EXISTS_COMMENT: &str = "Job with specified ID already exists";

#[derive(Debug, Error)]
pub enum NexioError {
    /// A document could not be parsed or was missing required data.
    #[error(transparent)]
    Document(#[from] JdfError),

    /// The client configuration is unusable (bad endpoint, empty sender).
    #[error("invalid client configuration: {0}")]
    Config(#[source] JdfError),

    /// The controller could not be reached, or the exchange failed below
    /// the JMF layer.
    #[error("communications failure: {message}")]
    Communications {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The controller answered with a non-success return code.
    #[error("command failed: {}", failure_summary(.0))]
    CommandFailed(Box<JmfResponse>),

    /// The controller rejected a submission because the job ID is taken.
    #[error("job already exists: {}", failure_summary(.0))]
    JobAlreadyExists(Box<JmfResponse>),
}

pub type Result<T> = std::result::Result<T, NexioError>;

impl NexioError {
    pub fn communications(message: impl Into<String>) -> Self {
        Self::Communications {
            message: message.into(),
            source: None,
        }
    }

    /// The controller's response, for failures that carry one.
    pub fn response(&self) -> Option<&JmfResponse> {
        match self {
            Self::CommandFailed(response) | Self::JobAlreadyExists(response) => {
                Some(response.as_ref())
            }
            _ => None,
        }
    }

    /// The raw notification comment behind a command failure.
    ///
    /// Classification into [`NexioError::JobAlreadyExists`] depends on an
    /// exact English string, so callers that need to handle other wordings
    /// can inspect this directly.
    pub fn notification_comment(&self) -> Option<&str> {
        self.response().and_then(JmfResponse::notification_comment)
    }
}

fn failure_summary(response: &JmfResponse) -> String {
    let code = response.return_code();
    match response.notification_comment() {
        Some(comment) => format!("{} ({code}): {comment}", code.message()),
        None => format!("{} ({code})", code.message()),
    }
}
