// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caldera print configuration (`caldera:PrintConfig`).
//
// The same set of fields is also how the controller stores a saved preset,
// rooted at `<preset>` instead.  `PrintSettings` carries whichever of the two
// a `DigitalPrintingParams` resource holds.

pub mod layout;
pub mod marks;
pub mod options;

use jdflink_core::config::{CALDERA_NAMESPACE, CALDERA_PREFIX};
use jdflink_core::node::{self, Node};
use jdflink_core::option::{push_option, IndexableValue};
use jdflink_core::{IndexableOption, Result};
use xmltree::{Element, XMLNode};

pub use layout::{CutFile, Image, InPage, Margins, PrintGab, StepAndRepeat};
pub use marks::{Cartouche, Cmyk, Collate, Color, ColorBar, CropMarks, LogoAnnotation, MarkSetup};
pub use options::{
    Action, ColorBarPlacement, ColorBarSide, ColorType, ImageOrient, LogoPosition, NestingMode,
    PrintGabOrient, StepAndRepeatType,
};

const PRINT_CONFIG_TAG: &str = "PrintConfig";
const PRESET_TAG: &str = "preset";

// ---------------------------------------------------------------------------
// Controller-configured values
// ---------------------------------------------------------------------------

/// Print resolution as configured on the controller.
///
/// `res` is the controller's internal resolution number and is independent of
/// the option index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintResolution {
    pub value: String,
    pub index: Option<i64>,
    pub internal_resolution: Option<i64>,
}

impl PrintResolution {
    pub fn new(value: impl Into<String>, index: Option<i64>) -> Self {
        Self {
            value: value.into(),
            index,
            internal_resolution: None,
        }
    }
}

impl Node for PrintResolution {
    fn to_element(&self) -> Element {
        let mut element =
            IndexableValue::new("res_id", Some(self.value.clone()), self.index).to_element();
        node::set_opt_attr(&mut element, "res", self.internal_resolution);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let indexed = IndexableValue::from_element_with_value(element)?;
        Ok(Self {
            value: indexed.value.unwrap_or_default(),
            index: indexed.index,
            internal_resolution: node::parse_attr(element, "res")?,
        })
    }
}

/// Media loading preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Loading {
    pub value: String,
    pub loading_id: Option<String>,
    pub in_page_id: Option<String>,
}

impl Node for Loading {
    fn to_element(&self) -> Element {
        let mut element = Element::new("loading");
        element.children.push(XMLNode::Text(self.value.clone()));
        node::set_opt_attr(&mut element, "loading_id", self.loading_id.as_deref());
        node::set_opt_attr(&mut element, "in_page_id", self.in_page_id.as_deref());
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        Ok(Self {
            value: node::element_text(element).unwrap_or_default(),
            loading_id: node::attr_string(element, "loading_id"),
            in_page_id: node::attr_string(element, "in_page_id"),
        })
    }
}

// ---------------------------------------------------------------------------
// PrintConfig
// ---------------------------------------------------------------------------

/// Structured print configuration.  Every field is optional and unset
/// fields are omitted on output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintConfig {
    pub mode_name: Option<String>,
    pub resolution: Option<PrintResolution>,
    pub loading: Option<Loading>,
    /// Media name, indexed by the controller's paper list.
    pub paper: Option<IndexableValue>,
    pub quality: Option<String>,
    pub action: Option<Action>,
    pub print_gab: Option<PrintGab>,
    pub image: Option<Image>,
    pub in_page: Option<InPage>,
    pub nesting_mode: Option<NestingMode>,
    pub copies: Option<i64>,
    pub copies_step_and_repeat: Option<i64>,
    pub pages_step_and_repeat: Option<i64>,
    pub nest_rows: Option<bool>,
    pub nesting_margin: Option<f64>,
    pub print_only_if_100: Option<bool>,
    pub print_only_if_value: Option<bool>,
    pub crop_marks: Option<CropMarks>,
    pub enable_nest_oba: Option<bool>,
    pub nba_file: Option<String>,
    pub cartouche: Option<Cartouche>,
    pub logo_annotation: Option<LogoAnnotation>,
    pub mark_setup: Option<MarkSetup>,
    pub enable_cut: Option<bool>,
    pub cut_file: Option<CutFile>,
    pub inkset_file: Option<String>,
    pub color_management: Option<String>,
    pub color_bar: Option<ColorBar>,
    pub color_corrections: Option<String>,
    pub ink_optimizer: Option<String>,
    pub collate: Option<Collate>,
    pub step_and_repeat: Option<StepAndRepeat>,
    pub cut: Option<String>,
    /// Printer-specific configuration, passed through as text.
    pub spec_config: Option<String>,
}

impl PrintConfig {
    /// Parse a configuration saved on the controller as a `<preset>`
    /// document.
    pub fn from_preset(xml: &str) -> Result<Self> {
        let root = node::parse_root(xml.as_bytes(), PRESET_TAG)?;
        Self::read_fields(&root)
    }

    fn write_fields(&self, element: &mut Element) {
        node::push_text(element, "modename", self.mode_name.as_deref());
        node::push_node(element, self.resolution.as_ref());
        node::push_node(element, self.loading.as_ref());
        node::push_node(element, self.paper.as_ref());
        node::push_text(element, "quality", self.quality.as_deref());
        push_option(element, self.action);
        node::push_node(element, self.print_gab.as_ref());
        node::push_node(element, self.image.as_ref());
        node::push_node(element, self.in_page.as_ref());
        push_option(element, self.nesting_mode);
        node::push_text(element, "nb_copies", self.copies);
        node::push_text(element, "nb_copies_sr", self.copies_step_and_repeat);
        node::push_text(element, "nb_pages_sr", self.pages_step_and_repeat);
        node::push_bool(element, "nest_rows", self.nest_rows);
        node::push_text(element, "nesting_margin", self.nesting_margin);
        node::push_bool(element, "print_only_if_100", self.print_only_if_100);
        node::push_bool(element, "print_only_if_value", self.print_only_if_value);
        node::push_node(element, self.crop_marks.as_ref());
        node::push_bool(element, "enable_nestoba", self.enable_nest_oba);
        node::push_text(element, "nbafile", self.nba_file.as_deref());
        node::push_node(element, self.cartouche.as_ref());
        node::push_node(element, self.logo_annotation.as_ref());
        node::push_node(element, self.mark_setup.as_ref());
        node::push_bool(element, "enable_cut", self.enable_cut);
        node::push_node(element, self.cut_file.as_ref());
        node::push_text(element, "inksetfile", self.inkset_file.as_deref());
        node::push_text(element, "color_mngmt", self.color_management.as_deref());
        node::push_node(element, self.color_bar.as_ref());
        node::push_text(element, "colorcorrections", self.color_corrections.as_deref());
        node::push_text(element, "InkOptimizer", self.ink_optimizer.as_deref());
        node::push_node(element, self.collate.as_ref());
        node::push_node(element, self.step_and_repeat.as_ref());
        node::push_text(element, "cut", self.cut.as_deref());
        node::push_text(element, "Spec_config", self.spec_config.as_deref());
    }

    fn read_fields(element: &Element) -> Result<Self> {
        let text = |tag: &str| node::child_text(element, tag, false, None);
        let flag = |tag: &str| node::child_bool(element, tag, false, None);
        let count = |tag: &str| node::child_i64(element, tag, false, None);
        Ok(Self {
            mode_name: text("modename")?,
            resolution: node::optional_node(element, "res_id")?,
            loading: node::optional_node(element, "loading")?,
            paper: node::optional_node(element, "paper")?,
            quality: text("quality")?,
            action: Action::from_parent(element)?,
            print_gab: node::optional_node(element, "printgab")?,
            image: node::optional_node(element, "img")?,
            in_page: node::optional_node(element, "in_page")?,
            nesting_mode: NestingMode::from_parent(element)?,
            copies: count("nb_copies")?,
            copies_step_and_repeat: count("nb_copies_sr")?,
            pages_step_and_repeat: count("nb_pages_sr")?,
            nest_rows: flag("nest_rows")?,
            nesting_margin: node::child_f64(element, "nesting_margin", false, None)?,
            print_only_if_100: flag("print_only_if_100")?,
            print_only_if_value: flag("print_only_if_value")?,
            crop_marks: node::optional_node(element, "cropmarks")?,
            enable_nest_oba: flag("enable_nestoba")?,
            nba_file: text("nbafile")?,
            cartouche: node::optional_node(element, "cartouche")?,
            logo_annotation: node::optional_node(element, "logo_annot")?,
            mark_setup: node::optional_node(element, "mark_setup")?,
            enable_cut: flag("enable_cut")?,
            cut_file: node::optional_node(element, "cutfile")?,
            inkset_file: text("inksetfile")?,
            color_management: text("color_mngmt")?,
            color_bar: node::optional_node(element, "colorbar")?,
            color_corrections: text("colorcorrections")?,
            ink_optimizer: text("InkOptimizer")?,
            collate: node::optional_node(element, "collate")?,
            step_and_repeat: node::optional_node(element, "step_repeat")?,
            cut: text("cut")?,
            spec_config: text("Spec_config")?,
        })
    }
}

impl Node for PrintConfig {
    fn to_element(&self) -> Element {
        let mut element =
            node::namespaced_element(PRINT_CONFIG_TAG, CALDERA_PREFIX, CALDERA_NAMESPACE);
        self.write_fields(&mut element);
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, PRINT_CONFIG_TAG)?;
        Self::read_fields(element)
    }
}

// ---------------------------------------------------------------------------
// Saved presets
// ---------------------------------------------------------------------------

/// A saved `<preset>` kept verbatim, so fields this crate does not model
/// reach the controller unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetConfig {
    root: Element,
}

impl PresetConfig {
    /// Parse a saved preset document.
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self {
            root: node::parse_root(xml.as_bytes(), PRESET_TAG)?,
        })
    }

    /// The modelled subset of this preset.
    pub fn print_config(&self) -> Result<PrintConfig> {
        PrintConfig::read_fields(&self.root)
    }

    pub fn element(&self) -> &Element {
        &self.root
    }
}

impl From<&PrintConfig> for PresetConfig {
    fn from(config: &PrintConfig) -> Self {
        let mut root = Element::new(PRESET_TAG);
        config.write_fields(&mut root);
        Self { root }
    }
}

impl Node for PresetConfig {
    fn to_element(&self) -> Element {
        self.root.clone()
    }

    fn from_element(element: &Element) -> Result<Self> {
        node::expect_tag(element, PRESET_TAG)?;
        Ok(Self {
            root: element.clone(),
        })
    }
}

/// The print configuration carried by `DigitalPrintingParams`.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintSettings {
    Structured(PrintConfig),
    Preset(PresetConfig),
}

impl PrintSettings {
    /// Read the configuration child of `parent`, preferring a structured
    /// `PrintConfig` over a raw preset.
    pub fn from_parent(parent: &Element) -> Result<Option<Self>> {
        if let Some(element) = node::child(parent, PRINT_CONFIG_TAG) {
            return Ok(Some(Self::Structured(PrintConfig::from_element(element)?)));
        }
        node::child(parent, PRESET_TAG)
            .map(|element| PresetConfig::from_element(element).map(Self::Preset))
            .transpose()
    }

    pub fn to_element(&self) -> Element {
        match self {
            Self::Structured(config) => config.to_element(),
            Self::Preset(preset) => preset.to_element(),
        }
    }

    /// The modelled fields, whichever form the settings take.
    pub fn print_config(&self) -> Result<PrintConfig> {
        match self {
            Self::Structured(config) => Ok(config.clone()),
            Self::Preset(preset) => preset.print_config(),
        }
    }
}

impl From<PrintConfig> for PrintSettings {
    fn from(config: PrintConfig) -> Self {
        Self::Structured(config)
    }
}
