// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outbound command envelope.

use jdflink_core::config::{ClientConfig, DEFAULT_JDF_VERSION, ICS_VERSIONS, JDF_NAMESPACE};
use jdflink_core::node::{self, Node};
use jdflink_core::{time, JdfError, Result};
use xmltree::Element;

use crate::command::Command;
use crate::response::JMF_TAG;

/// A `JMF` document carrying at most one [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub struct JmfMessage {
    pub sender_id: String,
    pub version: f64,
    /// Epoch seconds.
    pub timestamp: i64,
    pub response_url: Option<String>,
    pub command: Option<Command>,
}

impl JmfMessage {
    /// An empty envelope stamped now at the default protocol version.
    pub fn new(sender_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            version: DEFAULT_JDF_VERSION,
            timestamp: time::now(),
            response_url: None,
            command: None,
        }
    }

    /// An envelope for `command` addressed from the configured sender.
    pub fn from_config(config: &ClientConfig, command: Command) -> Self {
        let mut message = Self::new(config.sender_id.clone())
            .with_version(config.protocol_version)
            .with_command(command);
        message.response_url = config.response_url.clone();
        message
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn with_response_url(mut self, url: impl Into<String>) -> Self {
        self.response_url = Some(url.into());
        self
    }

    pub fn with_version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Short label for logs, the command type or `empty`.
    pub fn describe(&self) -> &'static str {
        self.command
            .as_ref()
            .map_or("empty", |command| command.command_type().as_str())
    }
}

impl Node for JmfMessage {
    fn to_element(&self) -> Element {
        let mut element = node::namespaced_element(JMF_TAG, "", JDF_NAMESPACE);
        node::set_attr(&mut element, "version", self.version);
        node::set_attr(&mut element, "SenderID", &self.sender_id);
        node::set_attr(&mut element, "ICSVersions", ICS_VERSIONS);
        node::set_attr(&mut element, "Timestamp", time::format_jdf(self.timestamp));
        node::set_opt_attr(&mut element, "ResponseURL", self.response_url.as_deref());
        node::push_node(&mut element, self.command.as_ref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, JMF_TAG)?;
        let version = match node::optional_attr(element, "version")
            .or_else(|| node::optional_attr(element, "Version"))
        {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| JdfError::invalid_value("version", raw))?,
            None => DEFAULT_JDF_VERSION,
        };
        let timestamp = match node::optional_attr(element, "Timestamp")
            .or_else(|| node::optional_attr(element, "TimeStamp"))
        {
            Some(raw) => time::parse_timestamp(raw)
                .ok_or_else(|| JdfError::invalid_value("Timestamp", raw))?,
            None => time::now(),
        };
        Ok(Self {
            sender_id: node::required_attr(element, "SenderID")?.to_owned(),
            version,
            timestamp,
            response_url: node::attr_string(element, "ResponseURL"),
            command: node::optional_node(element, "Command")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandParams, CommandType};
    use crate::params::QueueSubmissionParams;

    fn submit() -> JmfMessage {
        JmfMessage::new("jdflink")
            .with_timestamp(1_700_000_000)
            .with_response_url("http://mis.local/jmf")
            .with_command(
                Command::submit(QueueSubmissionParams::new("http://files.local/a.jdf"))
                    .with_id("C42"),
            )
    }

    #[test]
    fn envelope_carries_protocol_attributes() {
        let el = submit().to_element();
        assert_eq!(el.name, "JMF");
        assert_eq!(el.namespace.as_deref(), Some(JDF_NAMESPACE));
        assert_eq!(el.attributes.get("version").unwrap(), "1.4");
        assert_eq!(el.attributes.get("SenderID").unwrap(), "jdflink");
        assert_eq!(el.attributes.get("ICSVersions").unwrap(), "Base_L2-1.4");
        assert_eq!(el.attributes.get("Timestamp").unwrap(), "20231114T221320Z");
        assert_eq!(el.attributes.get("ResponseURL").unwrap(), "http://mis.local/jmf");
        assert!(node::child(&el, "Command").is_some());
    }

    #[test]
    fn response_url_is_omitted_when_unset() {
        let el = JmfMessage::new("jdflink").to_element();
        assert!(!el.attributes.contains_key("ResponseURL"));
        assert!(el.children.is_empty());
    }

    #[test]
    fn serialized_message_parses_back() {
        let message = submit();
        let xml = message.to_xml_string().unwrap();
        assert!(xml.starts_with("<?xml"));
        let back = JmfMessage::from_xml_str(&xml).unwrap();
        assert_eq!(back, message);
        assert_eq!(back.describe(), "SubmitQueueEntry");
    }

    #[test]
    fn inbound_unknown_command_is_unsupported() {
        let xml = r#"<JMF SenderID="mis" version="1.4" Timestamp="20231114T221320Z">
            <Command ID="C1" Type="Resubmit"/></JMF>"#;
        let err = JmfMessage::from_xml_str(xml).unwrap_err();
        assert!(err.is_unsupported_command());
    }

    #[test]
    fn root_must_be_jmf() {
        let err = JmfMessage::from_xml_str("<JDF/>").unwrap_err();
        assert!(matches!(err, JdfError::UnexpectedElement { .. }));
    }

    #[test]
    fn built_from_config() {
        let config = ClientConfig {
            sender_id: "press-1".into(),
            response_url: Some("http://mis.local/cb".into()),
            ..ClientConfig::default()
        };
        let message = JmfMessage::from_config(&config, Command::remove_by_job_id("J"));
        assert_eq!(message.sender_id, "press-1");
        assert_eq!(message.response_url.as_deref(), Some("http://mis.local/cb"));
        let command = message.command.unwrap();
        assert_eq!(command.command_type(), CommandType::RemoveQueueEntry);
        assert!(matches!(command.params, CommandParams::Remove(_)));
    }
}
