// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Audit pool: the append-only trail of what happened to a job.
//
// Every audit entry carries a `TimeStamp` in the compact JDF layout and,
// optionally, the name and version of the agent that produced it.  Entries
// are never edited; the pool helpers return a new pool with the entry added.

use jdflink_core::node::{self, Node};
use jdflink_core::{Result, time};
use xmltree::Element;

use crate::links::RunListLink;

/// Fields shared by every audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    /// Epoch seconds.
    pub timestamp: i64,
    pub agent_name: Option<String>,
    pub agent_version: Option<String>,
}

impl AuditStamp {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            agent_name: None,
            agent_version: None,
        }
    }

    /// A stamp for the current time.
    pub fn now() -> Self {
        Self::new(time::now())
    }

    pub fn with_agent(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self.agent_version = Some(version.into());
        self
    }

    pub fn with_agent_name(mut self, name: impl Into<String>) -> Self {
        self.agent_name = Some(name.into());
        self
    }

    pub fn with_agent_version(mut self, version: impl Into<String>) -> Self {
        self.agent_version = Some(version.into());
        self
    }

    fn decorate(&self, element: &mut Element) {
        node::set_opt_attr(element, "AgentName", self.agent_name.as_deref());
        node::set_opt_attr(element, "AgentVersion", self.agent_version.as_deref());
        node::set_attr(element, "TimeStamp", time::format_jdf(self.timestamp));
    }

    fn read(element: &Element) -> Result<Self> {
        Ok(Self {
            timestamp: node::required_timestamp_attr(element, "TimeStamp")?,
            agent_name: node::attr_string(element, "AgentName"),
            agent_version: node::attr_string(element, "AgentVersion"),
        })
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Records when the job ticket was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub stamp: AuditStamp,
}

impl Created {
    pub fn new(stamp: AuditStamp) -> Self {
        Self { stamp }
    }
}

impl Node for Created {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Created");
        self.stamp.decorate(&mut element);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Created")?;
        Ok(Self::new(AuditStamp::read(element)?))
    }
}

/// Records a change to a resource, here the run list with its controller
/// status.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAudit {
    pub stamp: AuditStamp,
    /// Absent links are tolerated on input.
    pub run_list_link: Option<RunListLink>,
}

impl ResourceAudit {
    pub fn new(stamp: AuditStamp, run_list_link: RunListLink) -> Self {
        Self {
            stamp,
            run_list_link: Some(run_list_link),
        }
    }
}

impl Node for ResourceAudit {
    fn to_element(&self) -> Element {
        let mut element = Element::new("ResourceAudit");
        self.stamp.decorate(&mut element);
        if let Some(link) = &self.run_list_link {
            node::push_child(&mut element, link.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "ResourceAudit")?;
        Ok(Self {
            stamp: AuditStamp::read(element)?,
            run_list_link: node::optional_node(element, "RunListLink")?,
        })
    }
}

/// Records one execution of the process with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRun {
    pub stamp: AuditStamp,
    pub start: i64,
    pub end: i64,
    /// e.g. `Completed`, `Aborted`.
    pub end_status: String,
}

impl ProcessRun {
    pub fn new(stamp: AuditStamp, start: i64, end: i64, end_status: impl Into<String>) -> Self {
        Self {
            stamp,
            start,
            end,
            end_status: end_status.into(),
        }
    }
}

impl Node for ProcessRun {
    fn to_element(&self) -> Element {
        let mut element = Element::new("ProcessRun");
        self.stamp.decorate(&mut element);
        node::set_attr(&mut element, "End", time::format_jdf(self.end));
        node::set_attr(&mut element, "Start", time::format_jdf(self.start));
        node::set_attr(&mut element, "EndStatus", &self.end_status);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "ProcessRun")?;
        Ok(Self {
            start: node::required_timestamp_attr(element, "Start")?,
            end: node::required_timestamp_attr(element, "End")?,
            end_status: node::required_attr(element, "EndStatus")?.to_owned(),
            stamp: AuditStamp::read(element)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct AuditPool {
    pub created: Created,
    pub resource_audit: Option<ResourceAudit>,
    pub process_run: Option<ProcessRun>,
}

impl AuditPool {
    pub fn new(created: Created) -> Self {
        Self {
            created,
            resource_audit: None,
            process_run: None,
        }
    }

    /// This pool with a resource audit recorded.
    pub fn with_resource_audit(&self, audit: ResourceAudit) -> Self {
        Self {
            resource_audit: Some(audit),
            ..self.clone()
        }
    }

    /// This pool with a process run recorded.
    pub fn with_process_run(&self, run: ProcessRun) -> Self {
        Self {
            process_run: Some(run),
            ..self.clone()
        }
    }
}

impl Node for AuditPool {
    fn to_element(&self) -> Element {
        let mut element = Element::new("AuditPool");
        node::push_child(&mut element, self.created.to_element());
        if let Some(audit) = &self.resource_audit {
            node::push_child(&mut element, audit.to_element());
        }
        if let Some(run) = &self.process_run {
            node::push_child(&mut element, run.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "AuditPool")?;
        Ok(Self {
            created: node::required_node(element, "Created")?,
            resource_audit: node::optional_node(element, "ResourceAudit")?,
            process_run: node::optional_node(element, "ProcessRun")?,
        })
    }
}
