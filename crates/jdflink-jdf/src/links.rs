// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resource links: references from the process to resources in the pool.

use std::fmt;
use std::str::FromStr;

use jdflink_core::node::{self, Node};
use jdflink_core::{JdfError, Result};
use xmltree::Element;

use crate::status::Status;

/// Direction of a resource relative to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Usage {
    Input,
    Output,
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "Input"),
            Self::Output => write!(f, "Output"),
        }
    }
}

impl FromStr for Usage {
    type Err = JdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Input" => Ok(Self::Input),
            "Output" => Ok(Self::Output),
            other => Err(JdfError::invalid_value("Usage", other)),
        }
    }
}

fn read_usage(element: &Element) -> Result<Usage> {
    node::required_attr(element, "Usage")?.parse()
}

fn link_element(name: &str, usage: Usage, r_ref: &str) -> Element {
    let mut element = Element::new(name);
    node::set_attr(&mut element, "Usage", usage);
    node::set_attr(&mut element, "rRef", r_ref);
    element
}

// ---------------------------------------------------------------------------
// Plain links
// ---------------------------------------------------------------------------

/// Resource types that are linked with nothing but `Usage` and `rRef`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Layout,
    DigitalPrintingParams,
    Device,
    CustomerInfo,
}

impl LinkKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Layout => "LayoutLink",
            Self::DigitalPrintingParams => "DigitalPrintingParamsLink",
            Self::Device => "DeviceLink",
            Self::CustomerInfo => "CustomerInfoLink",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        [
            Self::Layout,
            Self::DigitalPrintingParams,
            Self::Device,
            Self::CustomerInfo,
        ]
        .into_iter()
        .find(|k| k.tag() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLink {
    pub kind: LinkKind,
    pub usage: Usage,
    /// ID of the referenced resource.
    pub r_ref: String,
}

impl ResourceLink {
    pub fn new(kind: LinkKind, usage: Usage, r_ref: impl Into<String>) -> Self {
        Self {
            kind,
            usage,
            r_ref: r_ref.into(),
        }
    }
}

impl Node for ResourceLink {
    fn to_element(&self) -> Element {
        link_element(self.kind.tag(), self.usage, &self.r_ref)
    }

    fn from_element(element: &Element) -> Result<Self> {
        let kind = LinkKind::from_tag(&element.name).ok_or_else(|| JdfError::UnexpectedElement {
            expected: "resource link".into(),
            found: element.name.clone(),
        })?;
        Ok(Self {
            kind,
            usage: read_usage(element)?,
            r_ref: node::required_attr(element, "rRef")?.to_owned(),
        })
    }
}

/// Link to a produced or consumed component, with quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLink {
    pub usage: Usage,
    pub r_ref: String,
    pub amount: Option<i64>,
    pub actual_amount: Option<i64>,
}

impl ComponentLink {
    pub fn new(usage: Usage, r_ref: impl Into<String>) -> Self {
        Self {
            usage,
            r_ref: r_ref.into(),
            amount: None,
            actual_amount: None,
        }
    }
}

impl Node for ComponentLink {
    fn to_element(&self) -> Element {
        let mut element = link_element("ComponentLink", self.usage, &self.r_ref);
        node::set_opt_attr(&mut element, "Amount", self.amount);
        node::set_opt_attr(&mut element, "ActualAmount", self.actual_amount);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "ComponentLink")?;
        Ok(Self {
            usage: read_usage(element)?,
            r_ref: node::required_attr(element, "rRef")?.to_owned(),
            amount: node::parse_attr(element, "Amount")?,
            actual_amount: node::parse_attr(element, "ActualAmount")?,
        })
    }
}

/// Link to the run list.  Caldera controllers attach the job's current
/// status to it inside resource audits.
#[derive(Debug, Clone, PartialEq)]
pub struct RunListLink {
    pub usage: Usage,
    pub r_ref: String,
    pub status: Option<Status>,
}

impl RunListLink {
    pub fn new(usage: Usage, r_ref: impl Into<String>) -> Self {
        Self {
            usage,
            r_ref: r_ref.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }
}

impl Node for RunListLink {
    fn to_element(&self) -> Element {
        let mut element = link_element("RunListLink", self.usage, &self.r_ref);
        if let Some(status) = &self.status {
            node::push_child(&mut element, status.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "RunListLink")?;
        Ok(Self {
            usage: read_usage(element)?,
            r_ref: node::required_attr(element, "rRef")?.to_owned(),
            status: node::optional_node(element, "Status")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Pool
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceLinkPool {
    pub run_list_link: Option<RunListLink>,
    pub layout_link: Option<ResourceLink>,
    pub digital_printing_params_link: Option<ResourceLink>,
    pub device_link: Option<ResourceLink>,
    pub component_link: Option<ComponentLink>,
    pub customer_info_link: Option<ResourceLink>,
}

impl ResourceLinkPool {
    /// Set the plain link slot matching `link.kind`.
    pub fn with_link(mut self, link: ResourceLink) -> Self {
        let slot = match link.kind {
            LinkKind::Layout => &mut self.layout_link,
            LinkKind::DigitalPrintingParams => &mut self.digital_printing_params_link,
            LinkKind::Device => &mut self.device_link,
            LinkKind::CustomerInfo => &mut self.customer_info_link,
        };
        *slot = Some(link);
        self
    }
}

impl Node for ResourceLinkPool {
    fn to_element(&self) -> Element {
        let mut element = Element::new("ResourceLinkPool");
        let plain = [
            &self.digital_printing_params_link,
            &self.layout_link,
        ];
        for link in plain.into_iter().flatten() {
            node::push_child(&mut element, link.to_element());
        }
        if let Some(link) = &self.run_list_link {
            node::push_child(&mut element, link.to_element());
        }
        for link in [&self.customer_info_link, &self.device_link].into_iter().flatten() {
            node::push_child(&mut element, link.to_element());
        }
        if let Some(link) = &self.component_link {
            node::push_child(&mut element, link.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "ResourceLinkPool")?;
        let plain = |kind: LinkKind| node::optional_node::<ResourceLink>(element, kind.tag());
        Ok(Self {
            run_list_link: node::optional_node(element, "RunListLink")?,
            layout_link: plain(LinkKind::Layout)?,
            digital_printing_params_link: plain(LinkKind::DigitalPrintingParams)?,
            device_link: plain(LinkKind::Device)?,
            component_link: node::optional_node(element, "ComponentLink")?,
            customer_info_link: plain(LinkKind::CustomerInfo)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdflink_core::node::parse_document;

    #[test]
    fn parses_a_typical_pool() {
        let el = parse_document(
            br#"<ResourceLinkPool>
                <RunListLink Usage="Input" rRef="RL001" />
                <CustomerInfoLink Usage="Input" rRef="CI001" />
                <DeviceLink Usage="Input" rRef="DEV001" />
                <ComponentLink Usage="Output" rRef="C001" Amount="4" />
            </ResourceLinkPool>"#,
        )
        .unwrap();
        let pool = ResourceLinkPool::from_element(&el).unwrap();

        assert_eq!(pool.run_list_link.as_ref().unwrap().r_ref, "RL001");
        assert_eq!(pool.device_link.as_ref().unwrap().kind, LinkKind::Device);
        let component = pool.component_link.as_ref().unwrap();
        assert_eq!(component.usage, Usage::Output);
        assert_eq!(component.amount, Some(4));
        assert_eq!(component.actual_amount, None);
        assert!(pool.layout_link.is_none());

        let back = ResourceLinkPool::from_element(&pool.to_element()).unwrap();
        assert_eq!(back, pool);
    }

    #[test]
    fn usage_must_be_input_or_output() {
        let el = parse_document(br#"<DeviceLink Usage="Sideways" rRef="D1"/>"#).unwrap();
        let err = ResourceLink::from_element(&el).unwrap_err();
        assert!(matches!(err, JdfError::InvalidValue { ref field, .. } if field == "Usage"));
    }

    #[test]
    fn link_requires_rref() {
        let el = parse_document(br#"<LayoutLink Usage="Input"/>"#).unwrap();
        assert!(ResourceLink::from_element(&el).is_err());
    }

    #[test]
    fn with_link_fills_the_matching_slot() {
        let pool = ResourceLinkPool::default()
            .with_link(ResourceLink::new(LinkKind::Layout, Usage::Input, "L1"))
            .with_link(ResourceLink::new(LinkKind::DigitalPrintingParams, Usage::Input, "DPP1"));
        assert_eq!(pool.layout_link.as_ref().unwrap().r_ref, "L1");
        assert_eq!(pool.digital_printing_params_link.as_ref().unwrap().r_ref, "DPP1");
        assert!(pool.device_link.is_none());
    }
}
