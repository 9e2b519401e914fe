// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Response envelope returned by the controller.
//
// Controllers disagree on attribute casing for the envelope (`version` vs
// `Version`, `Timestamp` vs `TimeStamp`); both spellings are read.

use std::fmt;

use jdflink_core::config::{DEFAULT_JDF_VERSION, ICS_VERSIONS, JDF_NAMESPACE};
use jdflink_core::node::{self, Node};
use jdflink_core::{time, JdfError, Result};
use xmltree::Element;

use crate::return_code::ReturnCode;

pub(crate) const JMF_TAG: &str = "JMF";

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationClass {
    Error,
    Warning,
    Information,
    Event,
    Other(String),
}

impl NotificationClass {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
            Self::Information => "Information",
            Self::Event => "Event",
            Self::Other(class) => class,
        }
    }
}

impl From<&str> for NotificationClass {
    fn from(value: &str) -> Self {
        match value {
            "Error" => Self::Error,
            "Warning" => Self::Warning,
            "Information" => Self::Information,
            "Event" => Self::Event,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for NotificationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub class: NotificationClass,
    pub comment: Option<String>,
}

impl Notification {
    pub fn new(class: NotificationClass, comment: Option<String>) -> Self {
        Self { class, comment }
    }
}

impl Node for Notification {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Notification");
        node::set_attr(&mut element, "Class", &self.class);
        node::push_text(&mut element, "Comment", self.comment.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Notification")?;
        Ok(Self {
            class: NotificationClass::from(node::required_attr(element, "Class")?),
            comment: node::child_text(element, "Comment", false, None)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub id: String,
    /// Command type being answered.
    pub kind: String,
    /// ID of the command being answered.
    pub ref_id: String,
    pub return_code: ReturnCode,
    pub notification: Option<Notification>,
}

impl Node for Response {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Response");
        node::set_attr(&mut element, "refID", &self.ref_id);
        node::set_attr(&mut element, "ID", &self.id);
        node::set_attr(&mut element, "Type", &self.kind);
        node::set_attr(&mut element, "ReturnCode", self.return_code);
        node::push_node(&mut element, self.notification.as_ref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Response")?;
        let ref_id = node::required_attr(element, "refID")?.to_owned();
        let id = node::required_attr(element, "ID")?.to_owned();
        let kind = node::required_attr(element, "Type")?.to_owned();
        // "0" is a present value here, and the success code.
        let raw_code = node::required_attr(element, "ReturnCode")?;
        let return_code = raw_code
            .trim()
            .parse::<i64>()
            .map(ReturnCode::new)
            .map_err(|_| JdfError::invalid_value("ReturnCode", raw_code))?;
        Ok(Self {
            id,
            kind,
            ref_id,
            return_code,
            notification: node::optional_node(element, "Notification")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A `JMF` document wrapping one [`Response`].
#[derive(Debug, Clone, PartialEq)]
pub struct JmfResponse {
    pub sender_id: String,
    pub version: f64,
    pub timestamp: i64,
    pub response: Response,
}

impl JmfResponse {
    pub fn new(sender_id: impl Into<String>, response: Response) -> Self {
        Self {
            sender_id: sender_id.into(),
            version: DEFAULT_JDF_VERSION,
            timestamp: time::now(),
            response,
        }
    }

    /// Parse a complete response document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_element(&node::parse_root(bytes, JMF_TAG)?)
    }

    pub fn return_code(&self) -> ReturnCode {
        self.response.return_code
    }

    pub fn is_success(&self) -> bool {
        self.return_code().is_success()
    }

    pub fn notification_comment(&self) -> Option<&str> {
        self.response
            .notification
            .as_ref()
            .and_then(|n| n.comment.as_deref())
    }
}

/// First non-empty attribute among several spellings, or a missing-attribute
/// error naming the first.
fn attr_any<'a>(element: &'a Element, names: &[&str]) -> Result<&'a str> {
    names
        .iter()
        .find_map(|name| node::optional_attr(element, name))
        .ok_or_else(|| JdfError::missing_attribute(&element.name, names[0]))
}

impl Node for JmfResponse {
    fn to_element(&self) -> Element {
        let mut element = node::namespaced_element(JMF_TAG, "", JDF_NAMESPACE);
        node::set_attr(&mut element, "version", self.version);
        node::set_attr(&mut element, "SenderID", &self.sender_id);
        node::set_attr(&mut element, "ICSVersions", ICS_VERSIONS);
        node::set_attr(&mut element, "Timestamp", time::format_jdf(self.timestamp));
        node::push_child(&mut element, self.response.to_element());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, JMF_TAG)?;
        let response = node::required_node(element, "Response")?;

        let raw_version = attr_any(element, &["version", "Version"])?;
        let version = raw_version
            .trim()
            .parse::<f64>()
            .map_err(|_| JdfError::invalid_value("version", raw_version))?;
        let sender_id = node::required_attr(element, "SenderID")?.to_owned();
        let raw_timestamp = attr_any(element, &["Timestamp", "TimeStamp"])?;
        let timestamp = time::parse_timestamp(raw_timestamp)
            .ok_or_else(|| JdfError::invalid_value("Timestamp", raw_timestamp))?;

        Ok(Self {
            sender_id,
            version,
            timestamp,
            response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<JMF xmlns="http://www.CIP4.org/JDFSchema_1_1" Version="1.4" SenderID="Nexio"
     TimeStamp="2023-11-14T22:13:20+00:00">{body}</JMF>"#
        )
    }

    #[test]
    fn success_response_with_code_zero() {
        let xml = envelope(r#"<Response refID="C1" ID="R1" Type="Submit" ReturnCode="0"/>"#);
        let parsed = JmfResponse::from_xml_str(&xml).unwrap();
        assert_eq!(parsed.version, 1.4);
        assert_eq!(parsed.sender_id, "Nexio");
        assert_eq!(parsed.timestamp, 1_700_000_000);
        assert_eq!(parsed.response.ref_id, "C1");
        assert!(parsed.is_success());
        assert_eq!(parsed.return_code().message(), "Request successful");
    }

    #[test]
    fn missing_response_child_names_it() {
        let err = JmfResponse::from_xml_str(&envelope("")).unwrap_err();
        assert!(matches!(err, JdfError::MissingElement { ref tag, .. } if tag == "Response"));
    }

    #[test]
    fn envelope_attributes_are_required() {
        let xml = r#"<JMF SenderID="Nexio" Timestamp="20231114T221320Z">
            <Response refID="C1" ID="R1" Type="Submit" ReturnCode="0"/></JMF>"#;
        let err = JmfResponse::from_xml_str(xml).unwrap_err();
        assert!(matches!(err, JdfError::MissingAttribute { ref attribute, .. } if attribute == "version"));
    }

    #[test]
    fn response_ids_and_code_are_required() {
        for xml in [
            r#"<Response ID="R1" Type="Submit" ReturnCode="0"/>"#,
            r#"<Response refID="C1" Type="Submit" ReturnCode="0"/>"#,
            r#"<Response refID="C1" ID="R1" ReturnCode="0"/>"#,
            r#"<Response refID="C1" ID="R1" Type="Submit"/>"#,
        ] {
            let err = Response::from_xml_str(xml).unwrap_err();
            assert!(matches!(err, JdfError::MissingAttribute { .. }), "{xml}");
        }
    }

    #[test]
    fn non_numeric_return_code_is_invalid() {
        let err = Response::from_xml_str(r#"<Response refID="C" ID="R" Type="T" ReturnCode="ok"/>"#)
            .unwrap_err();
        assert!(matches!(err, JdfError::InvalidValue { ref field, .. } if field == "ReturnCode"));
    }

    #[test]
    fn notification_comment_is_exposed() {
        let xml = envelope(
            r#"<Response refID="C1" ID="R1" Type="SubmitQueueEntry" ReturnCode="105">
                 <Notification Class="Error"><Comment>Job with specified ID already exists</Comment></Notification>
               </Response>"#,
        );
        let parsed = JmfResponse::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(parsed.return_code(), ReturnCode::UNKNOWN_QUEUE_ENTRY);
        let notification = parsed.response.notification.as_ref().unwrap();
        assert_eq!(notification.class, NotificationClass::Error);
        assert_eq!(
            parsed.notification_comment(),
            Some("Job with specified ID already exists")
        );
    }

    #[test]
    fn serialized_envelope_parses_back() {
        let mut reply = JmfResponse::new(
            "Nexio",
            Response {
                id: "R9".into(),
                kind: "AbortQueueEntry".into(),
                ref_id: "C9".into(),
                return_code: ReturnCode::ENTRY_IS_RUNNING,
                notification: Some(Notification::new(
                    NotificationClass::Warning,
                    Some("busy".into()),
                )),
            },
        );
        reply.timestamp = 1_700_000_000;
        let xml = reply.to_xml_string().unwrap();
        assert!(xml.contains(r#"Timestamp="20231114T221320Z""#));
        assert!(xml.contains(r#"ICSVersions="Base_L2-1.4""#));
        assert_eq!(JmfResponse::from_xml_str(&xml).unwrap(), reply);
    }

    #[test]
    fn unknown_notification_class_is_preserved() {
        let n = Notification::from_xml_str(r#"<Notification Class="Fatal"/>"#).unwrap();
        assert_eq!(n.class, NotificationClass::Other("Fatal".into()));
        assert_eq!(n.comment, None);
        assert_eq!(n.to_element().attributes.get("Class").map(String::as_str), Some("Fatal"));
    }
}
