// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Queue filter: selects the queue entries a remove or abort applies to.
//
// The filter is only built and parsed here; the controller evaluates it,
// AND-ing every field that is set.

use jdflink_core::node::{self, Node};
use jdflink_core::{time, JdfError, Result};
use xmltree::Element;

/// Brief detail level.
pub const DETAILS_BRIEF: &str = "Brief";
/// Detail level used by the by-job-ID helpers.
pub const DETAILS_FULL: &str = "Full";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    pub device_id: Option<String>,
    pub model_name: Option<String>,
}

impl Node for Device {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Device");
        node::set_opt_attr(&mut element, "DeviceID", self.device_id.as_deref());
        node::set_opt_attr(&mut element, "ModelName", self.model_name.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Device")?;
        Ok(Self {
            device_id: node::attr_string(element, "DeviceID"),
            model_name: node::attr_string(element, "ModelName"),
        })
    }
}

/// Selects one specific queue entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueEntryDef {
    pub queue_entry_id: Option<String>,
}

impl QueueEntryDef {
    pub fn new(queue_entry_id: impl Into<String>) -> Self {
        Self {
            queue_entry_id: Some(queue_entry_id.into()),
        }
    }
}

impl Node for QueueEntryDef {
    fn to_element(&self) -> Element {
        let mut element = Element::new("QueueEntryDef");
        node::set_opt_attr(&mut element, "QueueEntryID", self.queue_entry_id.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "QueueEntryDef")?;
        Ok(Self {
            queue_entry_id: node::attr_string(element, "QueueEntryID"),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFilter {
    /// Omitted from the wire when unset; the controller then applies its own.
    pub queue_entry_details: Option<String>,
    pub job_id: Option<String>,
    pub job_part_id: Option<String>,
    /// Epoch seconds; entries older than this match.
    pub older_than: Option<i64>,
    /// Epoch seconds; entries newer than this match.
    pub newer_than: Option<i64>,
    pub gang_names: Vec<String>,
    pub devices: Vec<Device>,
    pub queue_entry_defs: Vec<QueueEntryDef>,
}

impl QueueFilter {
    /// Full-detail filter matching a single job.
    pub fn for_job(job_id: impl Into<String>) -> Self {
        Self {
            queue_entry_details: Some(DETAILS_FULL.to_owned()),
            job_id: Some(job_id.into()),
            ..Self::default()
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.queue_entry_details = Some(details.into());
        self
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn with_job_part_id(mut self, job_part_id: impl Into<String>) -> Self {
        self.job_part_id = Some(job_part_id.into());
        self
    }

    pub fn older_than(mut self, timestamp: i64) -> Self {
        self.older_than = Some(timestamp);
        self
    }

    pub fn newer_than(mut self, timestamp: i64) -> Self {
        self.newer_than = Some(timestamp);
        self
    }

    pub fn with_gang(mut self, gang_name: impl Into<String>) -> Self {
        self.gang_names.push(gang_name.into());
        self
    }

    pub fn with_device(mut self, device: Device) -> Self {
        self.devices.push(device);
        self
    }

    pub fn with_queue_entry(mut self, queue_entry_id: impl Into<String>) -> Self {
        self.queue_entry_defs.push(QueueEntryDef::new(queue_entry_id));
        self
    }
}

fn iso8601_attr(element: &Element, name: &str) -> Result<Option<i64>> {
    node::optional_attr(element, name)
        .map(|raw| time::parse_timestamp(raw).ok_or_else(|| JdfError::invalid_value(name, raw)))
        .transpose()
}

impl Node for QueueFilter {
    fn to_element(&self) -> Element {
        let mut element = Element::new("QueueFilter");
        node::set_opt_attr(
            &mut element,
            "QueueEntryDetails",
            self.queue_entry_details.as_deref(),
        );
        node::set_opt_attr(&mut element, "JobID", self.job_id.as_deref());
        node::set_opt_attr(&mut element, "JobPartID", self.job_part_id.as_deref());
        node::set_opt_attr(&mut element, "OlderThan", self.older_than.map(time::format_iso8601));
        node::set_opt_attr(&mut element, "NewerThan", self.newer_than.map(time::format_iso8601));
        if !self.gang_names.is_empty() {
            node::set_attr(&mut element, "GangNames", self.gang_names.join(" "));
        }
        for device in &self.devices {
            node::push_child(&mut element, device.to_element());
        }
        for def in &self.queue_entry_defs {
            node::push_child(&mut element, def.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "QueueFilter")?;
        Ok(Self {
            queue_entry_details: node::attr_string(element, "QueueEntryDetails"),
            job_id: node::attr_string(element, "JobID"),
            job_part_id: node::attr_string(element, "JobPartID"),
            older_than: iso8601_attr(element, "OlderThan")?,
            newer_than: iso8601_attr(element, "NewerThan")?,
            gang_names: node::optional_attr(element, "GangNames")
                .map(|names| names.split_whitespace().map(str::to_owned).collect())
                .unwrap_or_default(),
            devices: node::children(element, "Device")
                .map(Device::from_element)
                .collect::<Result<_>>()?,
            queue_entry_defs: node::children(element, "QueueEntryDef")
                .map(QueueEntryDef::from_element)
                .collect::<Result<_>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_writes_nothing() {
        let el = QueueFilter::default().to_element();
        assert!(el.attributes.is_empty());
        assert!(el.children.is_empty());
        assert_eq!(QueueFilter::from_element(&el).unwrap(), QueueFilter::default());
    }

    #[test]
    fn explicit_details_are_written() {
        let el = QueueFilter::default().with_details(DETAILS_BRIEF).to_element();
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.attributes.get("QueueEntryDetails").unwrap(), "Brief");
    }

    #[test]
    fn time_bounds_are_iso8601() {
        let filter = QueueFilter::default()
            .older_than(1_700_000_000)
            .newer_than(1_529_159_400);
        let el = filter.to_element();
        assert_eq!(el.attributes.get("OlderThan").unwrap(), "2023-11-14T22:13:20+00:00");
        assert_eq!(el.attributes.get("NewerThan").unwrap(), "2018-06-15T14:30:00+00:00");
        assert_eq!(QueueFilter::from_element(&el).unwrap(), filter);
    }

    #[test]
    fn offsets_in_time_bounds_are_honoured() {
        let filter = QueueFilter::from_xml_str(
            r#"<QueueFilter OlderThan="2023-11-14T23:13:20+01:00"/>"#,
        )
        .unwrap();
        assert_eq!(filter.older_than, Some(1_700_000_000));
        assert_eq!(filter.queue_entry_details, None);
    }

    #[test]
    fn garbled_time_bound_is_invalid() {
        let err = QueueFilter::from_xml_str(r#"<QueueFilter NewerThan="yesterday"/>"#).unwrap_err();
        assert!(matches!(err, JdfError::InvalidValue { ref field, .. } if field == "NewerThan"));
    }

    #[test]
    fn repeated_children_and_gangs_round_trip() {
        let filter = QueueFilter::for_job("J-17")
            .with_job_part_id("P1")
            .with_gang("roll-a")
            .with_gang("roll-b")
            .with_device(Device {
                device_id: Some("VUTEk".into()),
                model_name: None,
            })
            .with_device(Device {
                device_id: None,
                model_name: Some("GS3250".into()),
            })
            .with_queue_entry("QE1")
            .with_queue_entry("QE2");
        let el = filter.to_element();
        assert_eq!(el.attributes.get("GangNames").unwrap(), "roll-a roll-b");
        assert_eq!(node::children(&el, "Device").count(), 2);
        assert_eq!(node::children(&el, "QueueEntryDef").count(), 2);
        assert_eq!(QueueFilter::from_element(&el).unwrap(), filter);
    }

    #[test]
    fn job_helper_requests_full_details() {
        let filter = QueueFilter::for_job("42");
        assert_eq!(filter.queue_entry_details.as_deref(), Some(DETAILS_FULL));
        assert_eq!(filter.job_id.as_deref(), Some("42"));
    }
}
