// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parameter blocks of the queue commands.

use std::fmt;
use std::str::FromStr;

use jdflink_core::node::{self, Node};
use jdflink_core::{JdfError, Result};
use xmltree::Element;

use crate::queue_filter::QueueFilter;

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// How a submitted job joins a gang of jobs sharing the media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GangPolicy {
    Gang,
    NoGang,
    GangAndForce,
}

impl GangPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gang => "Gang",
            Self::NoGang => "NoGang",
            Self::GangAndForce => "GangAndForce",
        }
    }
}

impl fmt::Display for GangPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GangPolicy {
    type Err = JdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Gang" => Ok(Self::Gang),
            "NoGang" => Ok(Self::NoGang),
            "GangAndForce" => Ok(Self::GangAndForce),
            other => Err(JdfError::invalid_value("GangPolicy", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSubmissionParams {
    /// Location of the JDF ticket the controller fetches.
    pub url: String,
    pub return_url: Option<String>,
    pub return_jmf: Option<String>,
    pub ref_id: Option<String>,
    pub hold: Option<bool>,
    pub gang_name: Option<String>,
    pub gang_policy: Option<GangPolicy>,
}

impl QueueSubmissionParams {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            return_url: None,
            return_jmf: None,
            ref_id: None,
            hold: None,
            gang_name: None,
            gang_policy: None,
        }
    }

    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    pub fn with_return_jmf(mut self, url: impl Into<String>) -> Self {
        self.return_jmf = Some(url.into());
        self
    }

    pub fn with_ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn with_hold(mut self, hold: bool) -> Self {
        self.hold = Some(hold);
        self
    }

    pub fn with_gang(mut self, name: impl Into<String>, policy: GangPolicy) -> Self {
        self.gang_name = Some(name.into());
        self.gang_policy = Some(policy);
        self
    }
}

fn parse_hold(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(JdfError::invalid_value("Hold", raw)),
    }
}

impl Node for QueueSubmissionParams {
    fn to_element(&self) -> Element {
        let mut element = Element::new("QueueSubmissionParams");
        node::set_attr(&mut element, "URL", &self.url);
        node::set_opt_attr(&mut element, "ReturnURL", self.return_url.as_deref());
        node::set_opt_attr(&mut element, "ReturnJMF", self.return_jmf.as_deref());
        node::set_opt_attr(&mut element, "refID", self.ref_id.as_deref());
        node::set_opt_attr(&mut element, "Hold", self.hold.map(node::bool_text));
        node::set_opt_attr(&mut element, "GangName", self.gang_name.as_deref());
        node::set_opt_attr(&mut element, "GangPolicy", self.gang_policy);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "QueueSubmissionParams")?;
        Ok(Self {
            url: node::required_attr(element, "URL")?.to_owned(),
            return_url: node::attr_string(element, "ReturnURL"),
            return_jmf: node::attr_string(element, "ReturnJMF"),
            ref_id: node::attr_string(element, "refID"),
            hold: node::optional_attr(element, "Hold").map(parse_hold).transpose()?,
            gang_name: node::attr_string(element, "GangName"),
            gang_policy: node::parse_attr(element, "GangPolicy")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Remove and abort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveQueueEntryParams {
    pub queue_filter: QueueFilter,
}

impl RemoveQueueEntryParams {
    pub fn new(queue_filter: QueueFilter) -> Self {
        Self { queue_filter }
    }
}

impl Node for RemoveQueueEntryParams {
    fn to_element(&self) -> Element {
        let mut element = Element::new("RemoveQueueEntryParams");
        node::push_child(&mut element, self.queue_filter.to_element());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "RemoveQueueEntryParams")?;
        Ok(Self::new(node::required_node(element, "QueueFilter")?))
    }
}

/// Final status an aborted entry is left in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EndStatus {
    #[default]
    Aborted,
    Completed,
}

impl EndStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aborted => "Aborted",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for EndStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndStatus {
    type Err = JdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Aborted" => Ok(Self::Aborted),
            "Completed" => Ok(Self::Completed),
            other => Err(JdfError::invalid_value("EndStatus", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortQueueEntryParams {
    pub end_status: EndStatus,
    pub queue_filter: QueueFilter,
}

impl AbortQueueEntryParams {
    pub fn new(end_status: EndStatus, queue_filter: QueueFilter) -> Self {
        Self {
            end_status,
            queue_filter,
        }
    }
}

impl Node for AbortQueueEntryParams {
    fn to_element(&self) -> Element {
        let mut element = Element::new("AbortQueueEntryParams");
        node::set_attr(&mut element, "EndStatus", self.end_status);
        node::push_child(&mut element, self.queue_filter.to_element());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "AbortQueueEntryParams")?;
        let end_status = node::required_attr(element, "EndStatus")?.parse()?;
        Ok(Self::new(end_status, node::required_node(element, "QueueFilter")?))
    }
}
