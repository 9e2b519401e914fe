// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caldera job status block (`caldera:Status`).
//
// Controllers report this inside a resource audit's run-list link.  It is
// read far more often than written, so every field except the state is
// optional on input.

use jdflink_core::config::{CALDERA_NAMESPACE, CALDERA_PREFIX};
use jdflink_core::node::{self, Node};
use jdflink_core::{IndexableOption, JdfError, Result};
use xmltree::Element;

// ---------------------------------------------------------------------------
// Job state
// ---------------------------------------------------------------------------

/// Lifecycle state of a job on the controller.
///
/// Controllers are inconsistent about `idx`, so the state is resolved from
/// its text rather than its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Waiting,
    Running,
    Blocked,
    Finished,
    Aborted,
    Error,
    ComingUp,
    Discarded,
}

impl JobState {
    pub const ALL: &'static [JobState] = &[
        Self::Waiting,
        Self::Running,
        Self::Blocked,
        Self::Finished,
        Self::Aborted,
        Self::Error,
        Self::ComingUp,
        Self::Discarded,
    ];

    /// True once the controller will do nothing further with the job.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Aborted | Self::Discarded)
    }
}

impl IndexableOption for JobState {
    const TAG: &'static str = "job_state";

    fn options() -> &'static [Self] {
        Self::ALL
    }

    fn index(self) -> Option<i64> {
        Some(match self {
            Self::Waiting => 0,
            Self::Running => 1,
            Self::Blocked => 2,
            Self::Finished => 3,
            Self::Aborted => 4,
            Self::Error => 5,
            Self::ComingUp => 6,
            Self::Discarded => 7,
        })
    }

    fn display_value(self) -> Option<&'static str> {
        Some(match self {
            Self::Waiting => "Waiting",
            Self::Running => "Running",
            Self::Blocked => "Blocked",
            Self::Finished => "Finished",
            Self::Aborted => "Aborted",
            Self::Error => "Error",
            Self::ComingUp => "Coming up",
            Self::Discarded => "Discarded",
        })
    }

    fn from_element(element: &Element) -> Result<Option<Self>> {
        let text = node::element_text(element).unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Err(JdfError::invalid_value(Self::TAG, ""));
        }
        Ok(Self::option_by_value(text))
    }
}

// ---------------------------------------------------------------------------
// Ink consumption
// ---------------------------------------------------------------------------

/// Consumption of one ink channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Ink {
    pub name: String,
    pub short: String,
    pub unit: String,
    pub value: f64,
}

impl Node for Ink {
    fn to_element(&self) -> Element {
        let mut element = node::text_child("ink", self.value);
        node::set_attr(&mut element, "name", &self.name);
        node::set_attr(&mut element, "short", &self.short);
        node::set_attr(&mut element, "unit", &self.unit);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let value = node::element_text(element)
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(0.0);
        Ok(Self {
            name: node::attr_string(element, "name").unwrap_or_default(),
            short: node::attr_string(element, "short").unwrap_or_default(),
            unit: node::attr_string(element, "unit").unwrap_or_default(),
            value,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InkConsumption {
    pub unit: String,
    pub total: f64,
    pub inks: Vec<Ink>,
}

impl Node for InkConsumption {
    fn to_element(&self) -> Element {
        let mut element = Element::new("ink_cons");
        node::set_attr(&mut element, "unit", &self.unit);
        node::set_attr(&mut element, "total", self.total);
        for ink in &self.inks {
            node::push_child(&mut element, ink.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            unit: node::attr_string(element, "unit").unwrap_or_default(),
            total: node::parse_attr(element, "total")?.unwrap_or(0.0),
            inks: node::children(element, "ink")
                .map(Ink::from_element)
                .collect::<Result<_>>()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Contents
// ---------------------------------------------------------------------------

/// A content item and how many copies of it the job holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub copies: i64,
}

impl Node for Item {
    fn to_element(&self) -> Element {
        let mut element = Element::new("item");
        node::set_attr(&mut element, "copies", self.copies);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            copies: node::parse_attr(element, "copies")?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contents {
    /// `<compose><item/></compose>`
    pub compose: Option<Item>,
    pub item: Option<Item>,
}

impl Node for Contents {
    fn to_element(&self) -> Element {
        let mut element = Element::new("contents");
        if let Some(item) = &self.compose {
            let mut compose = Element::new("compose");
            node::push_child(&mut compose, item.to_element());
            node::push_child(&mut element, compose);
        }
        if let Some(item) = &self.item {
            node::push_child(&mut element, item.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let compose = node::child(element, "compose")
            .map(|c| node::required_node(c, "item"))
            .transpose()?;
        Ok(Self {
            compose,
            item: node::optional_node(element, "item")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub job_id: Option<i64>,
    pub job_name: Option<String>,
    pub job_state: Option<JobState>,
    pub job_error: Option<String>,
    pub number_printed: Option<i64>,
    pub create_time: Option<i64>,
    pub begin_time: Option<i64>,
    pub operation_end_time: Option<i64>,
    pub print_time: Option<i64>,
    pub job_mode: Option<String>,
    pub print_width: Option<f64>,
    pub print_height: Option<f64>,
    pub media_width: Option<f64>,
    pub media_height: Option<f64>,
    pub media_usage_ratio: Option<f64>,
    pub ink_consumption: Option<InkConsumption>,
    pub server_name: Option<String>,
    pub server_host: Option<String>,
    pub file_spec_url: Option<String>,
    pub contents: Option<Contents>,
}

impl Node for Status {
    fn to_element(&self) -> Element {
        let mut element = node::namespaced_element("Status", CALDERA_PREFIX, CALDERA_NAMESPACE);
        node::set_opt_attr(&mut element, "FileSpecURL", self.file_spec_url.as_deref());

        node::push_text(&mut element, "job_id", self.job_id);
        node::push_text(&mut element, "job_name", self.job_name.as_deref());
        if let Some(state) = self.job_state {
            node::push_child(&mut element, IndexableOption::to_element(state));
        }
        node::push_text(&mut element, "job_error", self.job_error.as_deref());
        node::push_text(&mut element, "nb_printed", self.number_printed);
        node::push_timestamp(&mut element, "create_time", self.create_time);
        node::push_timestamp(&mut element, "begin_time", self.begin_time);
        node::push_timestamp(&mut element, "op_time", self.operation_end_time);
        node::push_timestamp(&mut element, "print_time", self.print_time);
        node::push_text(&mut element, "job_mode", self.job_mode.as_deref());
        node::push_text(&mut element, "print_width", self.print_width);
        node::push_text(&mut element, "print_height", self.print_height);
        node::push_text(&mut element, "media_width", self.media_width);
        node::push_text(&mut element, "media_height", self.media_height);
        node::push_text(&mut element, "media_usage_ratio", self.media_usage_ratio);
        if let Some(ink) = &self.ink_consumption {
            node::push_child(&mut element, ink.to_element());
        }
        node::push_text(&mut element, "server_name", self.server_name.as_deref());
        node::push_text(&mut element, "server_host", self.server_host.as_deref());
        if let Some(contents) = &self.contents {
            node::push_child(&mut element, contents.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Status")?;
        Ok(Self {
            job_id: node::child_i64(element, "job_id", false, None)?,
            job_name: node::child_text(element, "job_name", false, None)?,
            job_state: JobState::from_parent(element)?,
            job_error: node::child_text(element, "job_error", false, None)?,
            number_printed: node::child_i64(element, "nb_printed", false, None)?,
            create_time: node::child_timestamp(element, "create_time", false, None)?,
            begin_time: node::child_timestamp(element, "begin_time", false, None)?,
            operation_end_time: node::child_timestamp(element, "op_time", false, None)?,
            print_time: node::child_timestamp(element, "print_time", false, None)?,
            job_mode: node::child_text(element, "job_mode", false, None)?,
            print_width: node::child_f64(element, "print_width", false, None)?,
            print_height: node::child_f64(element, "print_height", false, None)?,
            media_width: node::child_f64(element, "media_width", false, None)?,
            media_height: node::child_f64(element, "media_height", false, None)?,
            media_usage_ratio: node::child_f64(element, "media_usage_ratio", false, None)?,
            ink_consumption: node::optional_node(element, "ink_cons")?,
            server_name: node::child_text(element, "server_name", false, None)?,
            server_host: node::child_text(element, "server_host", false, None)?,
            file_spec_url: node::attr_string(element, "FileSpecURL"),
            contents: node::optional_node(element, "contents")?,
        })
    }
}
