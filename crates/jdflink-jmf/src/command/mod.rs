// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Queue commands and parse dispatch by command `Type`.

mod id;

use std::fmt;
use std::str::FromStr;

use jdflink_core::node::{self, Node};
use jdflink_core::{JdfError, Result};
use xmltree::Element;

use crate::params::{
    AbortQueueEntryParams, EndStatus, QueueSubmissionParams, RemoveQueueEntryParams,
};
use crate::queue_filter::QueueFilter;

pub use id::CommandId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    SubmitQueueEntry,
    RemoveQueueEntry,
    AbortQueueEntry,
}

impl CommandType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubmitQueueEntry => "SubmitQueueEntry",
            Self::RemoveQueueEntry => "RemoveQueueEntry",
            Self::AbortQueueEntry => "AbortQueueEntry",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = JdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SubmitQueueEntry" => Ok(Self::SubmitQueueEntry),
            "RemoveQueueEntry" => Ok(Self::RemoveQueueEntry),
            "AbortQueueEntry" => Ok(Self::AbortQueueEntry),
            other => Err(JdfError::UnsupportedCommand(other.to_owned())),
        }
    }
}

/// The parameter block of a command; its variant fixes the command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParams {
    Submit(QueueSubmissionParams),
    Remove(RemoveQueueEntryParams),
    Abort(AbortQueueEntryParams),
}

impl CommandParams {
    pub fn command_type(&self) -> CommandType {
        match self {
            Self::Submit(_) => CommandType::SubmitQueueEntry,
            Self::Remove(_) => CommandType::RemoveQueueEntry,
            Self::Abort(_) => CommandType::AbortQueueEntry,
        }
    }

    fn to_element(&self) -> Element {
        match self {
            Self::Submit(params) => params.to_element(),
            Self::Remove(params) => params.to_element(),
            Self::Abort(params) => params.to_element(),
        }
    }

    fn read(kind: CommandType, command: &Element) -> Result<Self> {
        Ok(match kind {
            CommandType::SubmitQueueEntry => {
                Self::Submit(node::required_node(command, "QueueSubmissionParams")?)
            }
            CommandType::RemoveQueueEntry => {
                Self::Remove(node::required_node(command, "RemoveQueueEntryParams")?)
            }
            CommandType::AbortQueueEntry => {
                Self::Abort(node::required_node(command, "AbortQueueEntryParams")?)
            }
        })
    }
}

/// A JMF `Command` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: CommandId,
    pub params: CommandParams,
}

impl Command {
    /// A command with a freshly generated ID.
    pub fn new(params: CommandParams) -> Self {
        Self {
            id: CommandId::generate(),
            params,
        }
    }

    pub fn with_id(mut self, id: impl Into<CommandId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn submit(params: QueueSubmissionParams) -> Self {
        Self::new(CommandParams::Submit(params))
    }

    pub fn remove(params: RemoveQueueEntryParams) -> Self {
        Self::new(CommandParams::Remove(params))
    }

    pub fn abort(params: AbortQueueEntryParams) -> Self {
        Self::new(CommandParams::Abort(params))
    }

    /// Remove every queue entry of `job_id`.
    pub fn remove_by_job_id(job_id: impl Into<String>) -> Self {
        Self::remove(RemoveQueueEntryParams::new(QueueFilter::for_job(job_id)))
    }

    /// Abort every queue entry of `job_id`, leaving it `Aborted`.
    pub fn abort_by_job_id(job_id: impl Into<String>) -> Self {
        Self::abort(AbortQueueEntryParams::new(
            EndStatus::Aborted,
            QueueFilter::for_job(job_id),
        ))
    }

    pub fn command_type(&self) -> CommandType {
        self.params.command_type()
    }
}

impl Node for Command {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Command");
        node::set_attr(&mut element, "ID", &self.id);
        node::set_attr(&mut element, "Type", self.command_type());
        node::push_child(&mut element, self.params.to_element());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Command")?;
        let id = CommandId::from(node::required_attr(element, "ID")?);
        let kind: CommandType = node::required_attr(element, "Type")?.parse()?;
        Ok(Self {
            id,
            params: CommandParams::read(kind, element)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_command_renders_type_and_params() {
        let command =
            Command::submit(QueueSubmissionParams::new("http://files.local/a.jdf")).with_id("C1");
        let el = command.to_element();
        assert_eq!(el.attributes.get("ID").unwrap(), "C1");
        assert_eq!(el.attributes.get("Type").unwrap(), "SubmitQueueEntry");
        assert!(node::child(&el, "QueueSubmissionParams").is_some());
        assert_eq!(Command::from_element(&el).unwrap(), command);
    }

    #[test]
    fn dispatch_follows_type_attribute() {
        for command in [
            Command::remove_by_job_id("J1"),
            Command::abort_by_job_id("J2"),
        ] {
            let back = Command::from_element(&command.to_element()).unwrap();
            assert_eq!(back.command_type(), command.command_type());
            assert_eq!(back, command);
        }
    }

    #[test]
    fn abort_is_not_read_as_remove() {
        let xml = r#"<Command ID="C7" Type="AbortQueueEntry">
            <AbortQueueEntryParams EndStatus="Aborted"><QueueFilter JobID="9"/></AbortQueueEntryParams>
        </Command>"#;
        let command = Command::from_xml_str(xml).unwrap();
        match command.params {
            CommandParams::Abort(params) => {
                assert_eq!(params.end_status, EndStatus::Aborted);
                assert_eq!(params.queue_filter.job_id.as_deref(), Some("9"));
            }
            other => panic!("expected abort params, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_unsupported() {
        let err = Command::from_xml_str(r#"<Command ID="C1" Type="KnownDevices"/>"#).unwrap_err();
        assert!(err.is_unsupported_command());
        assert!(err.is_format_error());
    }

    #[test]
    fn params_must_match_type() {
        let xml = r#"<Command ID="C1" Type="RemoveQueueEntry">
            <QueueSubmissionParams URL="u"/></Command>"#;
        let err = Command::from_xml_str(xml).unwrap_err();
        assert!(
            matches!(err, JdfError::MissingElement { ref tag, .. } if tag == "RemoveQueueEntryParams")
        );
    }

    #[test]
    fn by_job_id_helpers_use_full_details() {
        let Command { params, .. } = Command::remove_by_job_id("J1");
        let CommandParams::Remove(remove) = params else {
            panic!("expected remove params");
        };
        assert_eq!(remove.queue_filter.queue_entry_details.as_deref(), Some("Full"));
    }

    #[test]
    fn command_ids_default_to_unique() {
        let a = Command::remove_by_job_id("J");
        let b = Command::remove_by_job_id("J");
        assert_ne!(a.id, b.id);
    }
}
