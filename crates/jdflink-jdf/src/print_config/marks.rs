// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Marks and annotations printed around the job: color bars, crop marks,
// cartouches, logos, plus output collation.

use jdflink_core::node::{self, Node};
use jdflink_core::option::push_option;
use jdflink_core::{IndexableOption, JdfError, Result};
use xmltree::Element;

use super::options::{ColorBarPlacement, ColorBarSide, ColorType, LogoPosition};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorBar {
    pub enabled: Option<bool>,
    pub placement: Option<ColorBarPlacement>,
    pub side: Option<ColorBarSide>,
    pub space: Option<f64>,
    pub width: Option<f64>,
}

impl Node for ColorBar {
    fn to_element(&self) -> Element {
        let mut element = Element::new("colorbar");
        node::push_bool(&mut element, "enabled", self.enabled);
        push_option(&mut element, self.placement);
        push_option(&mut element, self.side);
        node::push_text(&mut element, "space", self.space);
        node::push_text(&mut element, "width", self.width);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            enabled: node::child_bool(element, "enabled", false, None)?,
            placement: ColorBarPlacement::from_parent(element)?,
            side: ColorBarSide::from_parent(element)?,
            space: node::child_f64(element, "space", false, None)?,
            width: node::child_f64(element, "width", false, None)?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collate {
    pub enabled: Option<bool>,
    pub inverse_order: Option<bool>,
}

impl Node for Collate {
    fn to_element(&self) -> Element {
        let mut element = Element::new("collate");
        node::push_bool(&mut element, "enabled", self.enabled);
        node::push_bool(&mut element, "invorder", self.inverse_order);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            enabled: node::child_bool(element, "enabled", false, None)?,
            inverse_order: node::child_bool(element, "invorder", false, None)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Mark setup
// ---------------------------------------------------------------------------

/// Process color values, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cmyk {
    pub cyan: i64,
    pub magenta: i64,
    pub yellow: i64,
    pub black: i64,
}

/// Custom mark color, discriminated by its `mode` child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Cmyk(Cmyk),
}

impl Color {
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Cmyk(_) => "CMYK",
        }
    }
}

impl Node for Color {
    fn to_element(&self) -> Element {
        let mut element = Element::new("color");
        node::push_text(&mut element, "mode", Some(self.mode()));
        match self {
            Self::Cmyk(cmyk) => {
                node::push_text(&mut element, "c", Some(cmyk.cyan));
                node::push_text(&mut element, "m", Some(cmyk.magenta));
                node::push_text(&mut element, "y", Some(cmyk.yellow));
                node::push_text(&mut element, "k", Some(cmyk.black));
            }
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let mode = node::child_text(element, "mode", true, None)?.unwrap_or_default();
        match mode.as_str() {
            "CMYK" => {
                let channel = |tag: &str| -> Result<i64> {
                    Ok(node::child_i64(element, tag, true, None)?.unwrap_or(0))
                };
                Ok(Self::Cmyk(Cmyk {
                    cyan: channel("c")?,
                    magenta: channel("m")?,
                    yellow: channel("y")?,
                    black: channel("k")?,
                }))
            }
            _ => Err(JdfError::UnsupportedDiscriminator {
                field: "color mode".into(),
                value: mode,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkSetup {
    pub color_type: Option<ColorType>,
    pub color: Option<Color>,
}

impl Node for MarkSetup {
    fn to_element(&self) -> Element {
        let mut element = Element::new("mark_setup");
        push_option(&mut element, self.color_type);
        node::push_node(&mut element, self.color.as_ref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let color_type = node::required_child(element, ColorType::TAG)?;
        Ok(Self {
            color_type: <ColorType as IndexableOption>::from_element(color_type)?,
            color: node::optional_node(element, "color")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Crop marks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CropMarks {
    pub enabled: Option<bool>,
    pub standard: Option<bool>,
    pub frame: Option<bool>,
    pub corner: Option<bool>,
    pub tombo: Option<bool>,
    pub target: Option<bool>,
    pub date: Option<bool>,
    pub filename: Option<bool>,
    pub page_number: Option<bool>,
    pub margin_inch: Option<f64>,
    pub bleed_inch: Option<f64>,
    pub use_thickness: Option<bool>,
    pub width_inch: Option<f64>,
    pub length_inch: Option<f64>,
    pub free_text: Option<String>,
}

impl Node for CropMarks {
    fn to_element(&self) -> Element {
        let mut element = Element::new("cropmarks");
        let flags = [
            ("cm_enabled", self.enabled),
            ("cm_standard", self.standard),
            ("cm_frame", self.frame),
            ("cm_corner", self.corner),
            ("cm_tombo", self.tombo),
            ("cm_target", self.target),
            ("cm_date", self.date),
            ("cm_filename", self.filename),
            ("cm_page_number", self.page_number),
        ];
        for (tag, value) in flags {
            node::push_bool(&mut element, tag, value);
        }
        node::push_text(&mut element, "cm_margin_inch", self.margin_inch);
        node::push_text(&mut element, "cm_bleed_inch", self.bleed_inch);
        node::push_bool(&mut element, "use_cm_thickness", self.use_thickness);
        node::push_text(&mut element, "cm_width_inch", self.width_inch);
        node::push_text(&mut element, "cm_length_inch", self.length_inch);
        node::push_text(&mut element, "cm_free_text", self.free_text.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let flag = |tag: &str| node::child_bool(element, tag, false, None);
        let length = |tag: &str| node::child_f64(element, tag, false, None);
        Ok(Self {
            enabled: flag("cm_enabled")?,
            standard: flag("cm_standard")?,
            frame: flag("cm_frame")?,
            corner: flag("cm_corner")?,
            tombo: flag("cm_tombo")?,
            target: flag("cm_target")?,
            date: flag("cm_date")?,
            filename: flag("cm_filename")?,
            page_number: flag("cm_page_number")?,
            margin_inch: length("cm_margin_inch")?,
            bleed_inch: length("cm_bleed_inch")?,
            use_thickness: flag("use_cm_thickness")?,
            width_inch: length("cm_width_inch")?,
            length_inch: length("cm_length_inch")?,
            free_text: node::child_text(element, "cm_free_text", false, None)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Cartouche and logo
// ---------------------------------------------------------------------------

/// Job information block printed next to the image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cartouche {
    pub enable: Option<bool>,
    pub height: Option<f64>,
    pub text_height: Option<f64>,
    pub text: Option<String>,
    pub full: Option<bool>,
}

impl Node for Cartouche {
    fn to_element(&self) -> Element {
        let mut element = Element::new("cartouche");
        node::push_bool(&mut element, "enable", self.enable);
        node::push_text(&mut element, "height", self.height);
        node::push_text(&mut element, "textheight", self.text_height);
        node::push_text(&mut element, "text", self.text.as_deref());
        node::push_bool(&mut element, "full", self.full);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            enable: node::child_bool(element, "enable", false, None)?,
            height: node::child_f64(element, "height", false, None)?,
            text_height: node::child_f64(element, "textheight", false, None)?,
            text: node::child_text(element, "text", false, None)?,
            full: node::child_bool(element, "full", false, None)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogoAnnotation {
    pub enabled: Option<bool>,
    pub match_annotation: Option<bool>,
    pub scale: Option<f64>,
    pub position: Option<LogoPosition>,
    /// Path to the logo image on the controller.
    pub path: Option<String>,
    pub use_target: Option<bool>,
    pub target: Option<String>,
}

impl Node for LogoAnnotation {
    fn to_element(&self) -> Element {
        let mut element = Element::new("logo_annot");
        node::push_bool(&mut element, "enabled", self.enabled);
        node::push_bool(&mut element, "match_annot", self.match_annotation);
        node::push_text(&mut element, "scale", self.scale);
        push_option(&mut element, self.position);
        node::push_text(&mut element, "path", self.path.as_deref());
        node::push_bool(&mut element, "use_target", self.use_target);
        node::push_text(&mut element, "target", self.target.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            enabled: node::child_bool(element, "enabled", false, None)?,
            match_annotation: node::child_bool(element, "match_annot", false, None)?,
            scale: node::child_f64(element, "scale", false, None)?,
            position: LogoPosition::from_parent(element)?,
            path: node::child_text(element, "path", false, None)?,
            use_target: node::child_bool(element, "use_target", false, None)?,
            target: node::child_text(element, "target", false, None)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdflink_core::node::parse_document;

    #[test]
    fn cmyk_color_dispatches_on_mode() {
        let el = parse_document(
            b"<color><mode>CMYK</mode><c>0</c><m>100</m><y>100</y><k>0</k></color>",
        )
        .unwrap();
        let color = Color::from_element(&el).unwrap();
        assert_eq!(
            color,
            Color::Cmyk(Cmyk { cyan: 0, magenta: 100, yellow: 100, black: 0 })
        );
        assert_eq!(Color::from_element(&color.to_element()).unwrap(), color);
    }

    #[test]
    fn unknown_color_mode_is_rejected() {
        let el = parse_document(b"<color><mode>RGB</mode><r>1</r></color>").unwrap();
        let err = Color::from_element(&el).unwrap_err();
        assert!(matches!(
            err,
            JdfError::UnsupportedDiscriminator { ref value, .. } if value == "RGB"
        ));
    }

    #[test]
    fn color_mode_is_required() {
        let el = parse_document(b"<color><c>1</c></color>").unwrap();
        assert!(matches!(
            Color::from_element(&el),
            Err(JdfError::MissingElement { .. })
        ));
    }

    #[test]
    fn cmyk_channels_are_required() {
        let el = parse_document(b"<color><mode>CMYK</mode><c>1</c><m>1</m><y>1</y></color>").unwrap();
        let err = Color::from_element(&el).unwrap_err();
        assert!(matches!(err, JdfError::MissingElement { ref tag, .. } if tag == "k"));
    }

    #[test]
    fn mark_setup_uses_its_own_tag_and_requires_colortype() {
        let setup = MarkSetup {
            color_type: Some(ColorType::Custom),
            color: Some(Color::Cmyk(Cmyk { cyan: 10, magenta: 20, yellow: 30, black: 40 })),
        };
        let el = setup.to_element();
        assert_eq!(el.name, "mark_setup");
        assert_eq!(MarkSetup::from_element(&el).unwrap(), setup);

        let bare = parse_document(b"<mark_setup/>").unwrap();
        assert!(MarkSetup::from_element(&bare).is_err());
    }

    #[test]
    fn colorbar_round_trips() {
        let bar = ColorBar {
            enabled: Some(true),
            placement: Some(ColorBarPlacement::Page),
            side: Some(ColorBarSide::Both),
            space: Some(5.0),
            width: Some(12.5),
        };
        assert_eq!(ColorBar::from_element(&bar.to_element()).unwrap(), bar);
    }

    #[test]
    fn crop_marks_round_trip() {
        let marks = CropMarks {
            enabled: Some(true),
            corner: Some(true),
            tombo: Some(false),
            bleed_inch: Some(0.125),
            free_text: Some("proof".into()),
            ..CropMarks::default()
        };
        let el = marks.to_element();
        assert!(node::child(&el, "cm_frame").is_none());
        assert_eq!(CropMarks::from_element(&el).unwrap(), marks);
    }

    #[test]
    fn cartouche_heights_are_numbers() {
        let cartouche = Cartouche {
            enable: Some(true),
            height: Some(20.0),
            text_height: Some(4.5),
            text: Some("Job 12".into()),
            full: None,
        };
        let el = cartouche.to_element();
        assert_eq!(node::child_f64(&el, "textheight", true, None).unwrap(), Some(4.5));
        assert_eq!(Cartouche::from_element(&el).unwrap(), cartouche);
    }

    #[test]
    fn logo_writes_position_once() {
        let logo = LogoAnnotation {
            enabled: Some(true),
            position: Some(LogoPosition::Above),
            use_target: Some(false),
            ..LogoAnnotation::default()
        };
        let el = logo.to_element();
        assert_eq!(node::children(&el, "position").count(), 1);
        assert_eq!(
            node::child_text(&el, "use_target", true, None).unwrap().as_deref(),
            Some("false")
        );
        assert_eq!(LogoAnnotation::from_element(&el).unwrap(), logo);
    }

    #[test]
    fn collate_round_trips() {
        let collate = Collate { enabled: Some(true), inverse_order: Some(false) };
        assert_eq!(Collate::from_element(&collate.to_element()).unwrap(), collate);
    }
}
