//! A [PANOSE classification](
//! https://learn.microsoft.com/en-us/typography/opentype/spec/os2#panose) decoder.
//!
//! The underlying specification is located at: <https://monotype.github.io/panose/pan1.htm>
//!
//! Digit values are labeled for the family kind and for Latin Text faces.
//! Other family kinds get digit names only.

use serde::Serialize;

const FAMILY_KINDS: &[&str] = &[
    "Any", "No Fit", "Latin Text", "Latin Hand Written", "Latin Decorative", "Latin Symbol",
];

const LATIN_TEXT_DIGITS: [&str; 9] = [
    "Serif Style", "Weight", "Proportion", "Contrast", "Stroke Variation",
    "Arm Style", "Letterform", "Midline", "X-height",
];

const LATIN_HAND_WRITTEN_DIGITS: [&str; 9] = [
    "Tool Kind", "Weight", "Spacing", "Aspect Ratio", "Contrast",
    "Topology", "Form", "Finials", "X-ascent",
];

const LATIN_DECORATIVE_DIGITS: [&str; 9] = [
    "Class", "Weight", "Aspect", "Contrast", "Serif Variant",
    "Treatment", "Lining", "Topology", "Range of Characters",
];

const LATIN_SYMBOL_DIGITS: [&str; 9] = [
    "Kind", "Weight", "Spacing", "Aspect Ratio and Contrast", "Aspect Ratio of Character 94",
    "Aspect Ratio of Character 119", "Aspect Ratio of Character 157", "Aspect Ratio of Character 163",
    "Aspect Ratio of Character 211",
];

const SERIF_STYLE: &[&str] = &[
    "Any", "No Fit", "Cove", "Obtuse Cove", "Square Cove", "Obtuse Square Cove", "Square",
    "Thin", "Oval", "Exaggerated", "Triangle", "Normal Sans", "Obtuse Sans",
    "Perpendicular Sans", "Flared", "Rounded",
];

const WEIGHT: &[&str] = &[
    "Any", "No Fit", "Very Light", "Light", "Thin", "Book", "Medium", "Demi", "Bold",
    "Heavy", "Black", "Extra Black",
];

const PROPORTION: &[&str] = &[
    "Any", "No Fit", "Old Style", "Modern", "Even Width", "Extended", "Condensed",
    "Very Extended", "Very Condensed", "Monospaced",
];

const CONTRAST: &[&str] = &[
    "Any", "No Fit", "None", "Very Low", "Low", "Medium Low", "Medium", "Medium High",
    "High", "Very High",
];

const STROKE_VARIATION: &[&str] = &[
    "Any", "No Fit", "No Variation", "Gradual/Diagonal", "Gradual/Transitional",
    "Gradual/Vertical", "Gradual/Horizontal", "Rapid/Vertical", "Rapid/Horizontal",
    "Instant/Vertical", "Instant/Horizontal",
];

const ARM_STYLE: &[&str] = &[
    "Any", "No Fit", "Straight Arms/Horizontal", "Straight Arms/Wedge",
    "Straight Arms/Vertical", "Straight Arms/Single Serif", "Straight Arms/Double Serif",
    "Non-Straight/Horizontal", "Non-Straight/Wedge", "Non-Straight/Vertical",
    "Non-Straight/Single Serif", "Non-Straight/Double Serif",
];

const LETTERFORM: &[&str] = &[
    "Any", "No Fit", "Normal/Contact", "Normal/Weighted", "Normal/Boxed", "Normal/Flattened",
    "Normal/Rounded", "Normal/Off Center", "Normal/Square", "Oblique/Contact",
    "Oblique/Weighted", "Oblique/Boxed", "Oblique/Flattened", "Oblique/Rounded",
    "Oblique/Off Center", "Oblique/Square",
];

const MIDLINE: &[&str] = &[
    "Any", "No Fit", "Standard/Trimmed", "Standard/Pointed", "Standard/Serifed",
    "High/Trimmed", "High/Pointed", "High/Serifed", "Constant/Trimmed", "Constant/Pointed",
    "Constant/Serifed", "Low/Trimmed", "Low/Pointed", "Low/Serifed",
];

const X_HEIGHT: &[&str] = &[
    "Any", "No Fit", "Constant/Small", "Constant/Standard", "Constant/Large",
    "Ducking/Small", "Ducking/Standard", "Ducking/Large",
];

const LATIN_TEXT_LABELS: [&[&str]; 9] = [
    SERIF_STYLE, WEIGHT, PROPORTION, CONTRAST, STROKE_VARIATION, ARM_STYLE, LETTERFORM, MIDLINE, X_HEIGHT,
];


/// A single PANOSE digit.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PanoseDigit {
    pub name: &'static str,
    pub value: u8,
    /// `None` when the value is unknown for this digit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
}

/// A decoded PANOSE classification.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Panose {
    pub bytes: [u8; 10],
    pub family_kind: u8,
    pub family_kind_label: Option<&'static str>,
    /// The remaining 9 digits, named according to the family kind.
    pub digits: Vec<PanoseDigit>,
}

impl Panose {
    /// Decodes 10 PANOSE bytes.
    pub fn decode(bytes: [u8; 10]) -> Self {
        let family_kind = bytes[0];
        let names: &[&str; 9] = match family_kind {
            3 => &LATIN_HAND_WRITTEN_DIGITS,
            4 => &LATIN_DECORATIVE_DIGITS,
            5 => &LATIN_SYMBOL_DIGITS,
            // Any and No Fit use Latin Text names.
            _ => &LATIN_TEXT_DIGITS,
        };

        let digits = bytes[1..]
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let label = if family_kind == 2 {
                    LATIN_TEXT_LABELS[i].get(usize::from(*value)).copied()
                } else {
                    generic_label(*value)
                };

                PanoseDigit {
                    name: names[i],
                    value: *value,
                    label,
                }
            })
            .collect();

        Panose {
            bytes,
            family_kind,
            family_kind_label: FAMILY_KINDS.get(usize::from(family_kind)).copied(),
            digits,
        }
    }

    /// Returns the raw bytes.
    #[inline]
    pub fn encode(&self) -> [u8; 10] {
        self.bytes
    }
}

fn generic_label(value: u8) -> Option<&'static str> {
    match value {
        0 => Some("Any"),
        1 => Some("No Fit"),
        _ => None,
    }
}
