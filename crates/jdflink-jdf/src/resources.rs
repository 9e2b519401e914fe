// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resource pool: the inputs a print job consumes.

use jdflink_core::node::{self, Node};
use jdflink_core::{JdfError, Result};
use xmltree::Element;

use crate::print_config::PrintSettings;

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Location and identity of one content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    pub url: String,
    pub user_file_name: Option<String>,
    pub check_sum: Option<String>,
    pub class: Option<String>,
    pub id: Option<String>,
    pub status: Option<String>,
}

impl FileSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_file_name: None,
            check_sum: None,
            class: None,
            id: None,
            status: None,
        }
    }
}

impl Node for FileSpec {
    fn to_element(&self) -> Element {
        let mut element = Element::new("FileSpec");
        node::set_attr(&mut element, "URL", &self.url);
        node::set_opt_attr(&mut element, "UserFileName", self.user_file_name.as_deref());
        node::set_opt_attr(&mut element, "CheckSum", self.check_sum.as_deref());
        node::set_opt_attr(&mut element, "Class", self.class.as_deref());
        node::set_opt_attr(&mut element, "ID", self.id.as_deref());
        node::set_opt_attr(&mut element, "Status", self.status.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "FileSpec")?;
        Ok(Self {
            url: node::required_attr(element, "URL")?.to_owned(),
            user_file_name: node::attr_string(element, "UserFileName"),
            check_sum: node::attr_string(element, "CheckSum"),
            class: node::attr_string(element, "Class"),
            id: node::attr_string(element, "ID"),
            status: node::attr_string(element, "Status"),
        })
    }
}

/// Reference to a `FileSpec` declared elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpecRef {
    pub r_ref: String,
}

impl Node for FileSpecRef {
    fn to_element(&self) -> Element {
        let mut element = Element::new("FileSpecRef");
        node::set_attr(&mut element, "rRef", &self.r_ref);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "FileSpecRef")?;
        Ok(Self {
            r_ref: node::required_attr(element, "rRef")?.to_owned(),
        })
    }
}

/// Groups the files that make up one run.  Holds at least one `FileSpec`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutElement {
    file_specs: Vec<FileSpec>,
    pub file_spec_ref: Option<FileSpecRef>,
}

impl LayoutElement {
    pub fn new(first: FileSpec) -> Self {
        Self {
            file_specs: vec![first],
            file_spec_ref: None,
        }
    }

    pub fn with_file_spec(mut self, file_spec: FileSpec) -> Self {
        self.file_specs.push(file_spec);
        self
    }

    pub fn file_specs(&self) -> &[FileSpec] {
        &self.file_specs
    }
}

impl Node for LayoutElement {
    fn to_element(&self) -> Element {
        let mut element = Element::new("LayoutElement");
        for spec in &self.file_specs {
            node::push_child(&mut element, spec.to_element());
        }
        if let Some(r) = &self.file_spec_ref {
            node::push_child(&mut element, r.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "LayoutElement")?;
        let file_specs = node::children(element, "FileSpec")
            .map(FileSpec::from_element)
            .collect::<Result<Vec<_>>>()?;
        if file_specs.is_empty() {
            return Err(JdfError::missing_element("LayoutElement", "FileSpec"));
        }
        Ok(Self {
            file_specs,
            file_spec_ref: node::optional_node(element, "FileSpecRef")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunList {
    pub class: String,
    pub id: String,
    pub status: String,
    pub directory: Option<String>,
    pub doc_copies: Option<i64>,
    pub pages: Option<String>,
    pub part_id_keys: Option<String>,
    pub run: Option<i64>,
    pub descriptive_name: Option<String>,
    pub layout_element: Option<LayoutElement>,
}

impl RunList {
    pub fn new(class: impl Into<String>, id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            id: id.into(),
            status: status.into(),
            directory: None,
            doc_copies: None,
            pages: None,
            part_id_keys: None,
            run: None,
            descriptive_name: None,
            layout_element: None,
        }
    }

    /// A `Parameter`/`Available` run list holding a single file.
    pub fn for_file(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            layout_element: Some(LayoutElement::new(FileSpec::new(url))),
            ..Self::new("Parameter", id, "Available")
        }
    }
}

impl Node for RunList {
    fn to_element(&self) -> Element {
        let mut element = Element::new("RunList");
        node::set_attr(&mut element, "Class", &self.class);
        node::set_attr(&mut element, "ID", &self.id);
        node::set_attr(&mut element, "Status", &self.status);
        node::set_opt_attr(&mut element, "Directory", self.directory.as_deref());
        node::set_opt_attr(&mut element, "DocCopies", self.doc_copies);
        node::set_opt_attr(&mut element, "Pages", self.pages.as_deref());
        node::set_opt_attr(&mut element, "PartIDKeys", self.part_id_keys.as_deref());
        node::set_opt_attr(&mut element, "Run", self.run);
        node::set_opt_attr(&mut element, "DescriptiveName", self.descriptive_name.as_deref());
        if let Some(layout) = &self.layout_element {
            node::push_child(&mut element, layout.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "RunList")?;
        Ok(Self {
            class: node::required_attr(element, "Class")?.to_owned(),
            id: node::required_attr(element, "ID")?.to_owned(),
            status: node::required_attr(element, "Status")?.to_owned(),
            directory: node::attr_string(element, "Directory"),
            doc_copies: node::parse_attr(element, "DocCopies")?,
            pages: node::attr_string(element, "Pages"),
            part_id_keys: node::attr_string(element, "PartIDKeys"),
            run: node::parse_attr(element, "Run")?,
            descriptive_name: node::attr_string(element, "DescriptiveName"),
            layout_element: node::optional_node(element, "LayoutElement")?,
        })
    }
}

/// The output device the job is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub class: String,
    pub id: String,
    pub device_id: String,
    pub status: String,
}

impl Node for Device {
    fn to_element(&self) -> Element {
        let mut element = Element::new("Device");
        node::set_attr(&mut element, "Class", &self.class);
        node::set_attr(&mut element, "ID", &self.id);
        node::set_attr(&mut element, "DeviceID", &self.device_id);
        node::set_attr(&mut element, "Status", &self.status);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "Device")?;
        Ok(Self {
            class: node::required_attr(element, "Class")?.to_owned(),
            id: node::required_attr(element, "ID")?.to_owned(),
            device_id: node::required_attr(element, "DeviceID")?.to_owned(),
            status: node::required_attr(element, "Status")?.to_owned(),
        })
    }
}

/// Printing parameters, carrying the controller's print configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitalPrintingParams {
    pub class: String,
    pub id: String,
    pub status: String,
    pub print_settings: Option<PrintSettings>,
}

impl Node for DigitalPrintingParams {
    fn to_element(&self) -> Element {
        let mut element = Element::new("DigitalPrintingParams");
        node::set_attr(&mut element, "Class", &self.class);
        node::set_attr(&mut element, "ID", &self.id);
        node::set_attr(&mut element, "Status", &self.status);
        if let Some(settings) = &self.print_settings {
            node::push_child(&mut element, settings.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "DigitalPrintingParams")?;
        Ok(Self {
            class: node::required_attr(element, "Class")?.to_owned(),
            id: node::required_attr(element, "ID")?.to_owned(),
            status: node::required_attr(element, "Status")?.to_owned(),
            print_settings: PrintSettings::from_parent(element)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePool {
    pub run_list: RunList,
    pub digital_printing_params: Option<DigitalPrintingParams>,
    pub device: Option<Device>,
}

impl ResourcePool {
    pub fn new(run_list: RunList) -> Self {
        Self {
            run_list,
            digital_printing_params: None,
            device: None,
        }
    }
}

impl Node for ResourcePool {
    fn to_element(&self) -> Element {
        let mut element = Element::new("ResourcePool");
        node::push_child(&mut element, self.run_list.to_element());
        if let Some(dpp) = &self.digital_printing_params {
            node::push_child(&mut element, dpp.to_element());
        }
        if let Some(device) = &self.device {
            node::push_child(&mut element, device.to_element());
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, "ResourcePool")?;
        Ok(Self {
            run_list: node::required_node(element, "RunList")?,
            digital_printing_params: node::optional_node(element, "DigitalPrintingParams")?,
            device: node::optional_node(element, "Device")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdflink_core::node::parse_document;

    #[test]
    fn run_list_requires_class_id_and_status() {
        for xml in [
            r#"<RunList ID="RL1" Status="Available"/>"#,
            r#"<RunList Class="Parameter" Status="Available"/>"#,
            r#"<RunList Class="Parameter" ID="RL1"/>"#,
        ] {
            let el = parse_document(xml.as_bytes()).unwrap();
            assert!(matches!(
                RunList::from_element(&el),
                Err(JdfError::MissingAttribute { .. })
            ));
        }
    }

    #[test]
    fn run_list_round_trips_with_layout() {
        let mut run_list = RunList::for_file("RL001", "file:///hotfolder/poster.pdf");
        run_list.doc_copies = Some(3);
        run_list.pages = Some("0 ~ 3".into());
        run_list.descriptive_name = Some("Poster".into());
        run_list.layout_element = Some(
            LayoutElement::new(FileSpec::new("file:///hotfolder/poster.pdf"))
                .with_file_spec(FileSpec::new("file:///hotfolder/poster-back.pdf")),
        );

        let back = RunList::from_element(&run_list.to_element()).unwrap();
        assert_eq!(back, run_list);
        assert_eq!(back.layout_element.unwrap().file_specs().len(), 2);
    }

    #[test]
    fn layout_element_needs_a_file() {
        let el = parse_document(br#"<LayoutElement><FileSpecRef rRef="FS1"/></LayoutElement>"#).unwrap();
        let err = LayoutElement::from_element(&el).unwrap_err();
        assert!(matches!(err, JdfError::MissingElement { ref tag, .. } if tag == "FileSpec"));
    }

    #[test]
    fn file_spec_requires_url() {
        let el = parse_document(br#"<FileSpec UserFileName="a.pdf"/>"#).unwrap();
        assert!(FileSpec::from_element(&el).is_err());
    }

    #[test]
    fn device_requires_all_attributes() {
        let el = parse_document(br#"<Device Class="Implementation" ID="DEV001" Status="Available"/>"#).unwrap();
        let err = Device::from_element(&el).unwrap_err();
        assert!(matches!(err, JdfError::MissingAttribute { ref attribute, .. } if attribute == "DeviceID"));
    }

    #[test]
    fn pool_requires_run_list() {
        let el = parse_document(
            br#"<ResourcePool><Device Class="Implementation" ID="D" DeviceID="P1" Status="Available"/></ResourcePool>"#,
        )
        .unwrap();
        assert!(ResourcePool::from_element(&el).is_err());
    }

    #[test]
    fn pool_round_trips() {
        let pool = ResourcePool {
            device: Some(Device {
                class: "Implementation".into(),
                id: "DEV001".into(),
                device_id: "Vutek-GS3250".into(),
                status: "Available".into(),
            }),
            digital_printing_params: Some(DigitalPrintingParams {
                class: "Parameter".into(),
                id: "DPP001".into(),
                status: "Available".into(),
                print_settings: None,
            }),
            ..ResourcePool::new(RunList::for_file("RL001", "file:///a.pdf"))
        };
        let back = ResourcePool::from_element(&pool.to_element()).unwrap();
        assert_eq!(back, pool);
    }
}
