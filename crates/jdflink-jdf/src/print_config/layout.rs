// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Placement of the image on the media: print area, image geometry, page
// margins, step-and-repeat, and the attached cut file.

use jdflink_core::node::{self, Node};
use jdflink_core::option::push_option;
use jdflink_core::{IndexableOption, Result};
use xmltree::{Element, XMLNode};

use super::options::{ImageOrient, PrintGabOrient, StepAndRepeatType};

/// Default physical scale factor of an image axis.
pub const DEFAULT_PHYSICAL_SCALE: f64 = 1.0;

/// Margins shared by the print area and the page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

impl Margins {
    fn write(&self, element: &mut Element) {
        node::push_text(element, "mg_left", self.left);
        node::push_text(element, "mg_top", self.top);
        node::push_text(element, "mg_right", self.right);
        node::push_text(element, "mg_bottom", self.bottom);
    }

    fn read(element: &Element) -> Result<Self> {
        let margin = |tag: &str| node::child_f64(element, tag, false, None);
        Ok(Self {
            left: margin("mg_left")?,
            top: margin("mg_top")?,
            right: margin("mg_right")?,
            bottom: margin("mg_bottom")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Print area
// ---------------------------------------------------------------------------

/// Printable area ("gab") on the media.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintGab {
    pub enabled: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margins: Margins,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub orient: Option<PrintGabOrient>,
}

impl Node for PrintGab {
    fn to_element(&self) -> Element {
        let mut element = Element::new("printgab");
        node::push_bool(&mut element, "enabled", self.enabled);
        node::push_text(&mut element, "width", self.width);
        node::push_text(&mut element, "height", self.height);
        self.margins.write(&mut element);
        node::push_text(&mut element, "pos_x", self.position_x);
        node::push_text(&mut element, "pos_y", self.position_y);
        push_option(&mut element, self.orient);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            enabled: node::child_bool(element, "enabled", false, None)?,
            width: node::child_f64(element, "width", false, None)?,
            height: node::child_f64(element, "height", false, None)?,
            margins: Margins::read(element)?,
            position_x: node::child_f64(element, "pos_x", false, None)?,
            position_y: node::child_f64(element, "pos_y", false, None)?,
            orient: PrintGabOrient::from_parent(element)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// Image geometry and page selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Written as the `clip` attribute.
    pub clip: Option<bool>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub orient: Option<ImageOrient>,
    pub center: Option<bool>,
    pub full: Option<bool>,
    pub scale_100_physical: Option<bool>,
    pub scale_x_physical: Option<f64>,
    pub scale_y_physical: Option<f64>,
    pub mirror: Option<bool>,
    pub keep_ratio: Option<bool>,
    pub page_from: Option<i64>,
    pub page_to: Option<i64>,
    pub all_pages: Option<bool>,
}

impl Default for Image {
    fn default() -> Self {
        Self {
            clip: None,
            width: None,
            height: None,
            position_x: None,
            position_y: None,
            orient: None,
            center: None,
            full: None,
            scale_100_physical: None,
            scale_x_physical: Some(DEFAULT_PHYSICAL_SCALE),
            scale_y_physical: Some(DEFAULT_PHYSICAL_SCALE),
            mirror: None,
            keep_ratio: None,
            page_from: None,
            page_to: None,
            all_pages: None,
        }
    }
}

impl Node for Image {
    fn to_element(&self) -> Element {
        let mut element = Element::new("img");
        if let Some(clip) = self.clip {
            node::set_attr(&mut element, "clip", node::bool_text(clip));
        }
        node::push_text(&mut element, "w", self.width);
        node::push_text(&mut element, "h", self.height);
        node::push_text(&mut element, "x", self.position_x);
        node::push_text(&mut element, "y", self.position_y);
        push_option(&mut element, self.orient);
        node::push_bool(&mut element, "center", self.center);
        node::push_bool(&mut element, "full", self.full);
        node::push_bool(&mut element, "scale100_phys", self.scale_100_physical);
        node::push_text(&mut element, "scale_x_phys", self.scale_x_physical);
        node::push_text(&mut element, "scale_y_phys", self.scale_y_physical);
        node::push_bool(&mut element, "mirror", self.mirror);
        node::push_bool(&mut element, "keep_ratio", self.keep_ratio);
        node::push_text(&mut element, "page_from", self.page_from);
        node::push_text(&mut element, "page_to", self.page_to);
        node::push_bool(&mut element, "allpages", self.all_pages);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let flag = |tag: &str| node::child_bool(element, tag, false, None);
        let length = |tag: &str| node::child_f64(element, tag, false, None);
        Ok(Self {
            clip: node::optional_attr(element, "clip").map(|v| v == "true"),
            width: length("w")?,
            height: length("h")?,
            position_x: length("x")?,
            position_y: length("y")?,
            orient: ImageOrient::from_parent(element)?,
            center: flag("center")?,
            full: flag("full")?,
            scale_100_physical: flag("scale100_phys")?,
            scale_x_physical: node::child_f64(
                element,
                "scale_x_phys",
                false,
                Some(DEFAULT_PHYSICAL_SCALE),
            )?,
            scale_y_physical: node::child_f64(
                element,
                "scale_y_phys",
                false,
                Some(DEFAULT_PHYSICAL_SCALE),
            )?,
            mirror: flag("mirror")?,
            keep_ratio: flag("keep_ratio")?,
            page_from: node::child_i64(element, "page_from", false, None)?,
            page_to: node::child_i64(element, "page_to", false, None)?,
            all_pages: flag("allpages")?,
        })
    }
}

/// Margins inside each page.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InPage {
    pub margins: Margins,
}

impl Node for InPage {
    fn to_element(&self) -> Element {
        let mut element = Element::new("in_page");
        self.margins.write(&mut element);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self { margins: Margins::read(element)? })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepAndRepeat {
    pub enabled: Option<bool>,
    pub kind: Option<StepAndRepeatType>,
    pub textile: Option<String>,
    pub true_shape: Option<String>,
}

impl Node for StepAndRepeat {
    fn to_element(&self) -> Element {
        let mut element = Element::new("step_repeat");
        node::push_bool(&mut element, "enabled", self.enabled);
        push_option(&mut element, self.kind);
        node::push_text(&mut element, "textile", self.textile.as_deref());
        node::push_text(&mut element, "trueshape", self.true_shape.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            enabled: node::child_bool(element, "enabled", false, None)?,
            kind: StepAndRepeatType::from_parent(element)?,
            textile: node::child_text(element, "textile", false, None)?,
            true_shape: node::child_text(element, "trueshape", false, None)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Cut file
// ---------------------------------------------------------------------------

/// Cut path data shipped inline with the job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutFile {
    /// Encoding of `data`, for example `base64`.
    pub encoding: String,
    pub data: String,
}

impl CutFile {
    pub fn new(encoding: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            encoding: encoding.into(),
            data: data.into(),
        }
    }
}

impl Node for CutFile {
    fn to_element(&self) -> Element {
        let mut element = Element::new("cutfile");
        node::set_attr(&mut element, "encoding", &self.encoding);
        element.children.push(XMLNode::Text(self.data.clone()));
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let encoding = node::required_attr(element, "encoding")?;
        Ok(Self::new(encoding, node::element_text(element).unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdflink_core::node::parse_document;
    use jdflink_core::JdfError;

    #[test]
    fn print_gab_uses_its_own_tag() {
        let gab = PrintGab {
            enabled: Some(true),
            width: Some(1371.6),
            margins: Margins { left: Some(5.0), ..Margins::default() },
            orient: Some(PrintGabOrient::Horizontal),
            ..PrintGab::default()
        };
        let el = gab.to_element();
        assert_eq!(el.name, "printgab");
        assert_eq!(PrintGab::from_element(&el).unwrap(), gab);
    }

    #[test]
    fn image_geometry_uses_short_tags_both_ways() {
        let xml = br#"<img clip="true"><w>100</w><h>50.5</h><x>10</x><y>20</y>
            <orient idx="5">_180</orient><page_from>1</page_from><page_to>3</page_to>
            <allpages>false</allpages></img>"#;
        let img = Image::from_element(&parse_document(xml).unwrap()).unwrap();
        assert_eq!(img.clip, Some(true));
        assert_eq!(img.width, Some(100.0));
        assert_eq!(img.height, Some(50.5));
        assert_eq!(img.position_x, Some(10.0));
        assert_eq!(img.position_y, Some(20.0));
        assert_eq!(img.orient, Some(ImageOrient::Rotate180));
        assert_eq!(img.page_from, Some(1));
        assert_eq!(img.page_to, Some(3));
        assert_eq!(img.all_pages, Some(false));

        let el = img.to_element();
        assert_eq!(node::child_i64(&el, "page_to", true, None).unwrap(), Some(3));
        assert_eq!(node::child_i64(&el, "page_from", true, None).unwrap(), Some(1));
        assert_eq!(Image::from_element(&el).unwrap(), img);
    }

    #[test]
    fn image_physical_scale_defaults_to_one() {
        let img = Image::from_element(&parse_document(b"<img/>").unwrap()).unwrap();
        assert_eq!(img.scale_x_physical, Some(1.0));
        assert_eq!(img.scale_y_physical, Some(1.0));
        assert_eq!(img.clip, None);
    }

    #[test]
    fn in_page_round_trips() {
        let page = InPage {
            margins: Margins { left: Some(1.0), top: Some(2.0), right: Some(3.0), bottom: Some(4.0) },
        };
        assert_eq!(InPage::from_element(&page.to_element()).unwrap(), page);
    }

    #[test]
    fn step_and_repeat_keeps_true_shape_separate() {
        let sr = StepAndRepeat {
            enabled: Some(true),
            kind: Some(StepAndRepeatType::TrueShape),
            textile: Some("T1".into()),
            true_shape: Some("S1".into()),
        };
        let el = sr.to_element();
        assert_eq!(el.name, "step_repeat");
        assert_eq!(node::child_text(&el, "trueshape", true, None).unwrap().as_deref(), Some("S1"));
        assert_eq!(StepAndRepeat::from_element(&el).unwrap(), sr);
    }

    #[test]
    fn cut_file_requires_encoding() {
        let el = parse_document(b"<cutfile>AAAA</cutfile>").unwrap();
        assert!(matches!(
            CutFile::from_element(&el),
            Err(JdfError::MissingAttribute { .. })
        ));

        let cut = CutFile::new("base64", "UEsDBA==");
        assert_eq!(CutFile::from_element(&cut.to_element()).unwrap(), cut);
    }
}
