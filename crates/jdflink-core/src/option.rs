// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Indexed option values.
//
// Vendor configuration fields carry a closed choice rendered as
// `<tag idx="N">DISPLAY</tag>`.  Each field is an enum generated by
// `indexable_option!`, whose variants embed their (display, index) pair as
// constant data.  Free-form indexed fields whose choices are configured on
// the controller (papers, resolutions) use `IndexableValue` instead.

use xmltree::Element;

use crate::error::{JdfError, Result};
use crate::node::{self, Node};

/// A closed, fixed set of `(display, index)` choices for one element tag.
pub trait IndexableOption: Copy + PartialEq + 'static {
    /// Element name the option renders as.
    const TAG: &'static str;

    /// Every option of this field, in declaration order.
    fn options() -> &'static [Self];

    /// Vendor index written to the `idx` attribute.
    fn index(self) -> Option<i64>;

    /// Text written as the element content.
    fn display_value(self) -> Option<&'static str>;

    /// The option with the given index, if any.
    fn option_by_index(index: i64) -> Option<Self> {
        Self::options()
            .iter()
            .copied()
            .find(|o| o.index() == Some(index))
    }

    /// The option whose display text matches exactly, if any.
    fn option_by_value(value: &str) -> Option<Self> {
        Self::options()
            .iter()
            .copied()
            .find(|o| o.display_value() == Some(value))
    }

    /// `<TAG idx="index">display</TAG>`, omitting whichever part is unset.
    fn to_element(self) -> Element {
        let mut element = Element::new(Self::TAG);
        node::set_opt_attr(&mut element, "idx", self.index());
        if let Some(display) = self.display_value() {
            element.children.push(xmltree::XMLNode::Text(display.to_owned()));
        }
        element
    }

    /// Resolve an option from its `idx` attribute.
    ///
    /// A missing or non-numeric `idx` is a format error.  An index that
    /// names no option yields `Ok(None)`.
    fn from_element(element: &Element) -> Result<Option<Self>> {
        let raw = node::required_attr(element, "idx")?;
        let index = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| JdfError::invalid_value("idx", raw))?;
        Ok(Self::option_by_index(index))
    }

    /// Resolve the first `TAG` child of `parent`, if there is one.
    fn from_parent(parent: &Element) -> Result<Option<Self>> {
        match node::child(parent, Self::TAG) {
            Some(element) => Self::from_element(element),
            None => Ok(None),
        }
    }
}

/// Append `option` as a child of `parent` when set.
pub fn push_option<O: IndexableOption>(parent: &mut Element, option: Option<O>) {
    if let Some(option) = option {
        node::push_child(parent, option.to_element());
    }
}

/// Declare an enum implementing [`IndexableOption`].
///
/// ```
/// jdflink_core::indexable_option! {
///     pub enum Side: "side" {
///         Left = ("LEFT", 1),
///         Right = ("RIGHT", 2),
///     }
/// }
/// use jdflink_core::IndexableOption;
/// assert_eq!(Side::option_by_index(2), Some(Side::Right));
/// ```
#[macro_export]
macro_rules! indexable_option {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $tag:literal {
            $( $(#[$vmeta:meta])* $variant:ident = ($display:literal, $index:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every option, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];
        }

        impl $crate::option::IndexableOption for $name {
            const TAG: &'static str = $tag;

            fn options() -> &'static [Self] {
                Self::ALL
            }

            fn index(self) -> Option<i64> {
                match self {
                    $( $name::$variant => Some($index) ),+
                }
            }

            fn display_value(self) -> Option<&'static str> {
                match self {
                    $( $name::$variant => Some($display) ),+
                }
            }

            fn option_by_index(index: i64) -> Option<Self> {
                match index {
                    $( $index => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Free-form indexed value
// ---------------------------------------------------------------------------

/// An indexed value whose choices are not fixed at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexableValue {
    pub tag: String,
    pub value: Option<String>,
    pub index: Option<i64>,
}

impl IndexableValue {
    pub fn new(tag: impl Into<String>, value: Option<String>, index: Option<i64>) -> Self {
        Self {
            tag: tag.into(),
            value,
            index,
        }
    }

    /// Like [`Node::from_element`] but requires a non-empty value.
    pub fn from_element_with_value(element: &Element) -> Result<Self> {
        let parsed = Self::from_element(element)?;
        if parsed.value.is_none() {
            return Err(JdfError::missing_element(&element.name, "#text"));
        }
        Ok(parsed)
    }
}

impl Node for IndexableValue {
    fn to_element(&self) -> Element {
        let mut element = Element::new(&self.tag);
        node::set_opt_attr(&mut element, "idx", self.index);
        if let Some(value) = &self.value {
            element.children.push(xmltree::XMLNode::Text(value.clone()));
        }
        element
    }

    fn from_element(element: &Element) -> Result<Self> {
        let index = node::optional_attr(element, "idx").and_then(|raw| raw.trim().parse().ok());
        let value = node::element_text(element).filter(|v| !v.is_empty());
        Ok(Self::new(element.name.clone(), value, index))
    }
}
