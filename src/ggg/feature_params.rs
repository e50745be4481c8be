//! Feature parameters for the
//! [`size`](https://learn.microsoft.com/en-us/typography/opentype/spec/features_pt#tag-size),
//! [`ssXX`](https://learn.microsoft.com/en-us/typography/opentype/spec/features_pt#ssxx)
//! and [`cvXX`](https://learn.microsoft.com/en-us/typography/opentype/spec/features_ae#cv01-cv99)
//! features.
//!
//! The layout of a FeatureParams block depends on the feature tag
//! and cannot be detected from the data itself.

use serde::Serialize;

use crate::parser::{Stream, U24};
use crate::{Result, Tag};

/// A kind of feature parameters a tag implies.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParamsKind {
    Size,
    /// `ss01`..=`ss20`, with the set number.
    StylisticSet(u8),
    /// `cv01`..=`cv99`, with the variant number.
    CharacterVariant(u8),
}

impl ParamsKind {
    /// Returns the parameters layout for a feature tag.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        let bytes = tag.to_bytes();
        if &bytes == b"size" {
            return Some(ParamsKind::Size);
        }

        let number = two_digits(bytes[2], bytes[3])?;
        match &bytes[..2] {
            b"ss" if (1..=20).contains(&number) => Some(ParamsKind::StylisticSet(number)),
            b"cv" if (1..=99).contains(&number) => Some(ParamsKind::CharacterVariant(number)),
            _ => None,
        }
    }
}

fn two_digits(a: u8, b: u8) -> Option<u8> {
    if a.is_ascii_digit() && b.is_ascii_digit() {
        Some((a - b'0') * 10 + (b - b'0'))
    } else {
        None
    }
}


/// Decoded feature parameters.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind")]
pub enum FeatureParams {
    /// Parameters of the `size` feature.
    Size {
        /// Design size in decipoints.
        design_size: u16,
        subfamily_identifier: u16,
        subfamily_name_id: u16,
        /// Range start in decipoints, exclusive.
        range_start: u16,
        /// Range end in decipoints, inclusive.
        range_end: u16,
    },
    /// Parameters of a stylistic set.
    StylisticSet {
        version: u16,
        ui_name_id: u16,
    },
    /// Parameters of a character variant.
    CharacterVariant {
        format: u16,
        feat_ui_label_name_id: u16,
        feat_ui_tooltip_text_name_id: u16,
        sample_text_name_id: u16,
        num_named_parameters: u16,
        first_param_ui_label_name_id: u16,
        /// Unicode code points the feature applies to.
        characters: Vec<u32>,
    },
}

impl FeatureParams {
    /// Parses parameters for the feature tag.
    ///
    /// Returns `Ok(None)` for a tag without a known parameters layout.
    pub fn parse(tag: Tag, data: &[u8]) -> Result<Option<Self>> {
        let kind = match ParamsKind::from_tag(tag) {
            Some(kind) => kind,
            None => return Ok(None),
        };

        let mut s = Stream::new(data);
        let params = match kind {
            ParamsKind::Size => FeatureParams::Size {
                design_size: s.read::<u16>()?,
                subfamily_identifier: s.read::<u16>()?,
                subfamily_name_id: s.read::<u16>()?,
                range_start: s.read::<u16>()?,
                range_end: s.read::<u16>()?,
            },
            ParamsKind::StylisticSet(_) => FeatureParams::StylisticSet {
                version: s.read::<u16>()?,
                ui_name_id: s.read::<u16>()?,
            },
            ParamsKind::CharacterVariant(_) => {
                let format = s.read::<u16>()?;
                let feat_ui_label_name_id = s.read::<u16>()?;
                let feat_ui_tooltip_text_name_id = s.read::<u16>()?;
                let sample_text_name_id = s.read::<u16>()?;
                let num_named_parameters = s.read::<u16>()?;
                let first_param_ui_label_name_id = s.read::<u16>()?;
                let char_count = s.read::<u16>()?;
                let characters = s.read_array16::<U24>(char_count)?.into_iter().map(|c| c.0).collect();
                FeatureParams::CharacterVariant {
                    format,
                    feat_ui_label_name_id,
                    feat_ui_tooltip_text_name_id,
                    sample_text_name_id,
                    num_named_parameters,
                    first_param_ui_label_name_id,
                    characters,
                }
            }
        };

        Ok(Some(params))
    }

    /// Returns the UI name ID of a stylistic set or a character variant.
    pub fn ui_name_id(&self) -> Option<u16> {
        match *self {
            FeatureParams::StylisticSet { ui_name_id, .. } => Some(ui_name_id),
            FeatureParams::CharacterVariant { feat_ui_label_name_id, .. } => Some(feat_ui_label_name_id),
            FeatureParams::Size { .. } => None,
        }
    }
}
