// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jdflink-jmf: JMF queue commands and the Nexio client.
//
// Commands are wrapped in a `JmfMessage` envelope, POSTed to the controller
// and the reply parsed into a `JmfResponse`.  Non-success return codes come
// back as typed `NexioError`s.

pub mod client;
pub mod command;
pub mod error;
pub mod message;
pub mod params;
pub mod queue_filter;
pub mod response;
pub mod return_code;

pub use client::{HttpTransport, NexioClient, Transport, classify_response};
pub use command::{Command, CommandId, CommandParams, CommandType};
pub use error::{JOB_EXISTS_COMMENT, NexioError, Result};
pub use message::JmfMessage;
pub use params::{
    AbortQueueEntryParams, EndStatus, GangPolicy, QueueSubmissionParams, RemoveQueueEntryParams,
};
pub use queue_filter::{Device, QueueEntryDef, QueueFilter};
pub use response::{JmfResponse, Notification, NotificationClass, Response};
pub use return_code::ReturnCode;
