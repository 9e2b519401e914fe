// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JDF root node and the Caldera document factory.

use jdflink_core::config::{
    CALDERA_NAMESPACE, CALDERA_PREFIX, DEFAULT_JDF_VERSION, JDF_NAMESPACE, XSI_NAMESPACE,
};
use jdflink_core::node::{self, Node};
use jdflink_core::{JdfError, Result};
use xmltree::{Element, XMLNode};

use crate::audit::{AuditPool, AuditStamp, Created};
use crate::links::{LinkKind, ResourceLink, ResourceLinkPool, RunListLink, Usage};
use crate::resources::{ResourcePool, RunList};

const JDF_TAG: &str = "JDF";

/// A JDF job ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct Jdf {
    pub id: String,
    pub job_id: String,
    pub job_part_id: Option<String>,
    /// Process type, `Combined` for tickets addressed to the controller.
    pub kind: String,
    pub status: String,
    pub version: String,
    pub descriptive_name: Option<String>,
    pub resource_pool: ResourcePool,
    pub resource_link_pool: ResourceLinkPool,
    pub audit_pool: Option<AuditPool>,
}

impl Jdf {
    pub fn new(id: impl Into<String>, job_id: impl Into<String>, resource_pool: ResourcePool) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            job_part_id: None,
            kind: "Combined".into(),
            status: "Waiting".into(),
            version: DEFAULT_JDF_VERSION.to_string(),
            descriptive_name: None,
            resource_pool,
            resource_link_pool: ResourceLinkPool::default(),
            audit_pool: None,
        }
    }

    /// A minimal ticket printing the file at `url`, linked and audited.
    pub fn print_job(job_id: impl Into<String>, url: impl Into<String>) -> Self {
        let job_id = job_id.into();
        let run_list_id = format!("RL_{job_id}");
        let run_list = RunList::for_file(run_list_id.clone(), url);
        let mut jdf = Self::new(format!("JDF_{job_id}"), job_id, ResourcePool::new(run_list));
        jdf.resource_link_pool.run_list_link = Some(RunListLink::new(Usage::Input, run_list_id));
        jdf.audit_pool = Some(AuditPool::new(Created::new(AuditStamp::now())));
        jdf
    }

    /// Link the pool's print parameters, if any, as an input.
    pub fn link_print_params(&mut self) {
        if let Some(params) = &self.resource_pool.digital_printing_params {
            let link = ResourceLink::new(LinkKind::DigitalPrintingParams, Usage::Input, &params.id);
            self.resource_link_pool = std::mem::take(&mut self.resource_link_pool).with_link(link);
        }
    }
}

impl Node for Jdf {
    fn to_element(&self) -> Element {
        let mut element = node::namespaced_element(JDF_TAG, "", JDF_NAMESPACE);
        node::declare_namespace(&mut element, "xsi", XSI_NAMESPACE);
        node::declare_namespace(&mut element, CALDERA_PREFIX, CALDERA_NAMESPACE);
        node::set_attr(&mut element, "ID", &self.id);
        node::set_attr(&mut element, "JobID", &self.job_id);
        node::set_opt_attr(&mut element, "JobPartID", self.job_part_id.as_deref());
        node::set_attr(&mut element, "Type", &self.kind);
        node::set_attr(&mut element, "Status", &self.status);
        node::set_attr(&mut element, "Version", &self.version);
        node::set_opt_attr(&mut element, "DescriptiveName", self.descriptive_name.as_deref());

        node::push_child(&mut element, self.resource_pool.to_element());
        node::push_child(&mut element, self.resource_link_pool.to_element());
        node::push_node(&mut element, self.audit_pool.as_ref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, JDF_TAG)?;
        Ok(Self {
            id: node::required_attr(element, "ID")?.to_owned(),
            job_id: node::required_attr(element, "JobID")?.to_owned(),
            job_part_id: node::attr_string(element, "JobPartID"),
            kind: node::required_attr(element, "Type")?.to_owned(),
            status: node::required_attr(element, "Status")?.to_owned(),
            version: node::attr_string(element, "Version")
                .unwrap_or_else(|| DEFAULT_JDF_VERSION.to_string()),
            descriptive_name: node::attr_string(element, "DescriptiveName"),
            resource_pool: node::required_node(element, "ResourcePool")?,
            resource_link_pool: node::optional_node(element, "ResourceLinkPool")?
                .unwrap_or_default(),
            audit_pool: node::optional_node(element, "AuditPool")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Builds [`Jdf`] tickets from controller output, applying Caldera's
/// placement of the run-list link inside the resource audit.
#[derive(Debug, Clone, Copy, Default)]
pub struct JdfFactory;

impl JdfFactory {
    /// Parse a complete JDF document.
    pub fn from_str(&self, xml: &str) -> Result<Jdf> {
        if xml.trim().is_empty() {
            return Err(JdfError::Xml("JDF document was empty".into()));
        }
        let root = node::parse_document(xml.as_bytes())?;
        self.from_element(&root)
    }

    /// Build a ticket from an already parsed root element.
    pub fn from_element(&self, root: &Element) -> Result<Jdf> {
        let mut jdf = Jdf::from_element(root)?;
        Self::attach_vendor_run_list_link(&mut jdf, root)?;
        Ok(jdf)
    }

    // Caldera nests the run-list link, with its status, anywhere below the
    // resource audit rather than as a direct child.
    fn attach_vendor_run_list_link(jdf: &mut Jdf, root: &Element) -> Result<()> {
        let Some(audit) = jdf.audit_pool.as_mut().and_then(|p| p.resource_audit.as_mut()) else {
            return Ok(());
        };
        if audit.run_list_link.is_some() {
            return Ok(());
        }
        let found = node::child(root, "AuditPool")
            .and_then(|pool| node::child(pool, "ResourceAudit"))
            .and_then(|el| find_descendant(el, "RunListLink"));
        if let Some(link) = found {
            audit.run_list_link = Some(RunListLink::from_element(link)?);
        }
        Ok(())
    }
}

fn find_descendant<'a>(element: &'a Element, tag: &str) -> Option<&'a Element> {
    element.children.iter().find_map(|child| match child {
        XMLNode::Element(el) if el.name == tag => Some(el),
        XMLNode::Element(el) => find_descendant(el, tag),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::JobState;

    const CONTROLLER_JDF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<JDF xmlns="http://www.CIP4.org/JDFSchema_1_1" xmlns:caldera="http://www.caldera.com/jdf"
     ID="JDF_42" JobID="42" Type="Combined" Status="Completed" Version="1.4">
  <ResourcePool>
    <RunList Class="Parameter" ID="RL_42" Status="Available"/>
  </ResourcePool>
  <ResourceLinkPool>
    <RunListLink Usage="Input" rRef="RL_42"/>
  </ResourceLinkPool>
  <AuditPool>
    <Created TimeStamp="20231114T221320Z"/>
    <ResourceAudit TimeStamp="20231114T221320Z">
      <Changed>
        <RunListLink Usage="Input" rRef="RL_42">
          <caldera:Status>
            <caldera:job_state idx="3">Finished</caldera:job_state>
            <caldera:nb_printed>2</caldera:nb_printed>
          </caldera:Status>
        </RunListLink>
      </Changed>
    </ResourceAudit>
  </AuditPool>
</JDF>"#;

    #[test]
    fn factory_attaches_nested_run_list_link() {
        let jdf = JdfFactory.from_str(CONTROLLER_JDF).unwrap();
        assert_eq!(jdf.job_id, "42");
        assert_eq!(jdf.status, "Completed");
        let audit = jdf.audit_pool.unwrap().resource_audit.unwrap();
        let link = audit.run_list_link.unwrap();
        assert_eq!(link.r_ref, "RL_42");
        let status = link.status.unwrap();
        assert_eq!(status.job_state, Some(JobState::Finished));
        assert_eq!(status.number_printed, Some(2));
    }

    #[test]
    fn factory_rejects_empty_and_malformed_input() {
        assert!(matches!(JdfFactory.from_str("  "), Err(JdfError::Xml(_))));
        assert!(matches!(JdfFactory.from_str("<JDF"), Err(JdfError::Xml(_))));
    }

    #[test]
    fn factory_rejects_non_jdf_root() {
        let err = JdfFactory.from_str("<JMF/>").unwrap_err();
        assert!(matches!(err, JdfError::UnexpectedElement { ref found, .. } if found == "JMF"));
    }

    #[test]
    fn resource_pool_is_required() {
        let xml = r#"<JDF ID="a" JobID="b" Type="Combined" Status="Waiting"/>"#;
        let err = JdfFactory.from_str(xml).unwrap_err();
        assert!(matches!(err, JdfError::MissingElement { ref tag, .. } if tag == "ResourcePool"));
    }

    #[test]
    fn print_job_declares_namespaces_and_round_trips() {
        let jdf = Jdf::print_job("1001", "http://files.local/job.pdf");
        let xml = jdf.to_xml_string().unwrap();
        assert!(xml.contains(r#"xmlns="http://www.CIP4.org/JDFSchema_1_1""#));
        assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains(r#"xmlns:caldera="http://www.caldera.com/jdf""#));
        assert!(xml.contains(r#"Version="1.4""#));

        let back = JdfFactory.from_str(&xml).unwrap();
        assert_eq!(back, jdf);
    }

    #[test]
    fn print_params_are_linked_as_input() {
        use crate::resources::DigitalPrintingParams;

        let mut jdf = Jdf::print_job("7", "file:///tmp/a.pdf");
        jdf.resource_pool.digital_printing_params = Some(DigitalPrintingParams {
            class: "Parameter".into(),
            id: "DPP_7".into(),
            status: "Available".into(),
            print_settings: None,
        });
        jdf.link_print_params();
        let link = jdf.resource_link_pool.digital_printing_params_link.unwrap();
        assert_eq!(link.r_ref, "DPP_7");
        assert_eq!(link.usage, Usage::Input);
        assert!(jdf.resource_link_pool.run_list_link.is_some());
    }
}
