// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Closed option sets of the Caldera print configuration.
//
// Indices are the controller's own and must not be renumbered.

use jdflink_core::indexable_option;

indexable_option! {
    /// What the controller does with the job once it is received.
    pub enum Action: "action" {
        /// Print, then discard the spooled file.
        PrintDiscard = ("PRINT", 0),
        PrintHold = ("PRINT_HOLD", 1),
        Spool = ("SPOOL", 2),
        File = ("FILE", 3),
        Reprint = ("REPRINT", 4),
        ReprintAndPrint = ("REPRINT_AND_PRINT", 5),
        ReprintThenPrint = ("REPRINT_THEN_PRINT", 6),
        ReprintThenPrintThenDelete = ("REPRINT_THEN_PRINT_THEN_DELETE", 7),
        Nest = ("NEST", 8),
        SendFile = ("SENDFILE", 9),
    }
}

indexable_option! {
    /// How copies are laid out on the media.
    pub enum NestingMode: "nesting_mode" {
        NoStepAndRepeat = ("METHOD_NOSR", 0),
        FullStepAndRepeat = ("METHOD_FULLSR", 1),
        Auto = ("METHOD_AUTO", 2),
        Custom = ("METHOD_CUSTOM", 3),
    }
}

indexable_option! {
    /// What a color bar is placed relative to.
    pub enum ColorBarPlacement: "placement" {
        Page = ("PAGE", 0),
        Image = ("IMAGE", 1),
    }
}

indexable_option! {
    pub enum ColorBarSide: "side" {
        Left = ("LEFT", 1),
        Right = ("RIGHT", 2),
        Both = ("BOTH", 3),
    }
}

indexable_option! {
    /// Ink used to print marks.
    pub enum ColorType: "colortype" {
        PureBlack = ("PUREBLACK", 0),
        CompBlack = ("COMPBLACK", 1),
        Custom = ("CUSTOM", 2),
    }
}

indexable_option! {
    pub enum PrintGabOrient: "orient" {
        Auto = ("AUTO", 0),
        Vertical = ("VERTICAL", 1),
        Horizontal = ("HORIZONTAL", 2),
    }
}

indexable_option! {
    pub enum ImageOrient: "orient" {
        Vertical = ("VERTICAL", 1),
        Horizontal = ("HORIZONTAL", 2),
        Default = ("DEFAULT", 3),
        Rotate180 = ("_180", 5),
    }
}

indexable_option! {
    /// Where a logo sits relative to the annotation text.
    pub enum LogoPosition: "position" {
        Left = ("LEFT", 0),
        Above = ("ABOVE", 1),
    }
}

indexable_option! {
    pub enum StepAndRepeatType: "type" {
        Standard = ("STANDARD", 0),
        Textile = ("TEXTILE", 1),
        TrueShape = ("TRUESHAPE", 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdflink_core::IndexableOption;
    use jdflink_core::node::parse_document;

    fn assert_complete<O: IndexableOption + std::fmt::Debug>() {
        let mut seen = Vec::new();
        for option in O::options() {
            let index = option.index().unwrap();
            assert!(!seen.contains(&index), "duplicate idx {index} in {}", O::TAG);
            seen.push(index);
            assert_eq!(O::option_by_index(index), Some(*option));
        }
    }

    #[test]
    fn every_option_set_is_complete() {
        assert_complete::<Action>();
        assert_complete::<NestingMode>();
        assert_complete::<ColorBarPlacement>();
        assert_complete::<ColorBarSide>();
        assert_complete::<ColorType>();
        assert_complete::<PrintGabOrient>();
        assert_complete::<ImageOrient>();
        assert_complete::<LogoPosition>();
        assert_complete::<StepAndRepeatType>();
    }

    #[test]
    fn action_print_is_index_zero() {
        let el = parse_document(br#"<action idx="0">PRINT</action>"#).unwrap();
        let action = <Action as IndexableOption>::from_element(&el).unwrap();
        assert_eq!(action, Some(Action::PrintDiscard));
        assert_eq!(Action::PrintDiscard.display_value(), Some("PRINT"));
    }

    #[test]
    fn unknown_action_index_is_absent() {
        let el = parse_document(br#"<action idx="99">X</action>"#).unwrap();
        assert_eq!(<Action as IndexableOption>::from_element(&el).unwrap(), None);
    }

    #[test]
    fn action_set_includes_spool_and_sendfile() {
        assert_eq!(Action::options().len(), 10);
        assert_eq!(Action::option_by_index(2), Some(Action::Spool));
        assert_eq!(Action::option_by_index(9), Some(Action::SendFile));
    }

    #[test]
    fn image_orient_has_a_gap_at_four() {
        assert_eq!(ImageOrient::option_by_index(4), None);
        assert_eq!(ImageOrient::option_by_index(5), Some(ImageOrient::Rotate180));
    }

    #[test]
    fn nesting_mode_text_is_trimmed() {
        assert_eq!(NestingMode::Custom.display_value(), Some("METHOD_CUSTOM"));
    }
}
