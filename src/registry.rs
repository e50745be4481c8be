//! Tag dispatch.
//!
//! Maps every known table tag to a [`TableGroup`] and a decoder.

use serde::Serialize;

use crate::tables::*;
use crate::{clip_range, DecodeError, DecodeResult, Font, Status, Tag};

/// A table group.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableGroup {
    Core,
    Layout,
    Variable,
    Outlines,
    Bitmap,
    Other,
}

/// A list of known tables.
///
/// Known tables without a decoder are reported as not implemented.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum KnownTable {
    // Core.
    CharacterToGlyphIndexMapping,
    Header,
    HorizontalHeader,
    HorizontalMetrics,
    MaximumProfile,
    Naming,
    PostScript,
    VerticalHeader,
    VerticalMetrics,
    WindowsMetrics,
    // Layout.
    Baseline,
    GlyphDefinition,
    GlyphPositioning,
    GlyphSubstitution,
    Justification,
    Kerning,
    Math,
    // Apple Advanced Typography.
    AnchorPoint,
    AppleBaseline,
    AppleJustification,
    ExtendedKerning,
    ExtendedMetamorphosis,
    FeatureName,
    GlyphProperties,
    LigatureCaret,
    Metamorphosis,
    OpticalBounds,
    Tracking,
    // Variable.
    AxisVariations,
    CvtVariations,
    FontVariations,
    GlyphVariations,
    HorizontalMetricsVariations,
    MetricsVariations,
    StyleAttributes,
    VerticalMetricsVariations,
    // Outlines.
    CompactFontFormat,
    CompactFontFormat2,
    ControlValue,
    ControlValueProgram,
    FontProgram,
    GlyphData,
    IndexToLocation,
    // Color and bitmap.
    ColorBitmapData,
    ColorBitmapLocation,
    Color,
    ColorPalette,
    EmbeddedBitmapData,
    EmbeddedBitmapLocation,
    EmbeddedBitmapScaling,
    ScalableVectorGraphics,
    StandardBitmapGraphics,
    // Other.
    DigitalSignature,
    FontDescriptors,
    FontMetrics,
    GridFittingAndScanConversion,
    HorizontalDeviceMetrics,
    LinearThreshold,
    Metadata,
    Pcl5,
    VerticalDeviceMetrics,
    VerticalOrigin,
    Zapf,
}

impl KnownTable {
    /// All known tables.
    pub const ALL: &'static [KnownTable] = &[
        KnownTable::CharacterToGlyphIndexMapping,
        KnownTable::Header,
        KnownTable::HorizontalHeader,
        KnownTable::HorizontalMetrics,
        KnownTable::MaximumProfile,
        KnownTable::Naming,
        KnownTable::PostScript,
        KnownTable::VerticalHeader,
        KnownTable::VerticalMetrics,
        KnownTable::WindowsMetrics,
        KnownTable::Baseline,
        KnownTable::GlyphDefinition,
        KnownTable::GlyphPositioning,
        KnownTable::GlyphSubstitution,
        KnownTable::Justification,
        KnownTable::Kerning,
        KnownTable::Math,
        KnownTable::AnchorPoint,
        KnownTable::AppleBaseline,
        KnownTable::AppleJustification,
        KnownTable::ExtendedKerning,
        KnownTable::ExtendedMetamorphosis,
        KnownTable::FeatureName,
        KnownTable::GlyphProperties,
        KnownTable::LigatureCaret,
        KnownTable::Metamorphosis,
        KnownTable::OpticalBounds,
        KnownTable::Tracking,
        KnownTable::AxisVariations,
        KnownTable::CvtVariations,
        KnownTable::FontVariations,
        KnownTable::GlyphVariations,
        KnownTable::HorizontalMetricsVariations,
        KnownTable::MetricsVariations,
        KnownTable::StyleAttributes,
        KnownTable::VerticalMetricsVariations,
        KnownTable::CompactFontFormat,
        KnownTable::CompactFontFormat2,
        KnownTable::ControlValue,
        KnownTable::ControlValueProgram,
        KnownTable::FontProgram,
        KnownTable::GlyphData,
        KnownTable::IndexToLocation,
        KnownTable::ColorBitmapData,
        KnownTable::ColorBitmapLocation,
        KnownTable::Color,
        KnownTable::ColorPalette,
        KnownTable::EmbeddedBitmapData,
        KnownTable::EmbeddedBitmapLocation,
        KnownTable::EmbeddedBitmapScaling,
        KnownTable::ScalableVectorGraphics,
        KnownTable::StandardBitmapGraphics,
        KnownTable::DigitalSignature,
        KnownTable::FontDescriptors,
        KnownTable::FontMetrics,
        KnownTable::GridFittingAndScanConversion,
        KnownTable::HorizontalDeviceMetrics,
        KnownTable::LinearThreshold,
        KnownTable::Metadata,
        KnownTable::Pcl5,
        KnownTable::VerticalDeviceMetrics,
        KnownTable::VerticalOrigin,
        KnownTable::Zapf,
    ];

    /// Returns a known table for a tag.
    ///
    /// Tags are case-sensitive.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        KnownTable::ALL.iter().copied().find(|t| t.tag() == tag)
    }

    /// Returns the table's tag.
    pub fn tag(self) -> Tag {
        let bytes = match self {
            KnownTable::CharacterToGlyphIndexMapping => b"cmap",
            KnownTable::Header                       => b"head",
            KnownTable::HorizontalHeader             => b"hhea",
            KnownTable::HorizontalMetrics            => b"hmtx",
            KnownTable::MaximumProfile               => b"maxp",
            KnownTable::Naming                       => b"name",
            KnownTable::PostScript                   => b"post",
            KnownTable::VerticalHeader               => b"vhea",
            KnownTable::VerticalMetrics              => b"vmtx",
            KnownTable::WindowsMetrics               => b"OS/2",
            KnownTable::Baseline                     => b"BASE",
            KnownTable::GlyphDefinition              => b"GDEF",
            KnownTable::GlyphPositioning             => b"GPOS",
            KnownTable::GlyphSubstitution            => b"GSUB",
            KnownTable::Justification                => b"JSTF",
            KnownTable::Kerning                      => b"kern",
            KnownTable::Math                         => b"MATH",
            KnownTable::AnchorPoint                  => b"ankr",
            KnownTable::AppleBaseline                => b"bsln",
            KnownTable::AppleJustification           => b"just",
            KnownTable::ExtendedKerning              => b"kerx",
            KnownTable::ExtendedMetamorphosis        => b"morx",
            KnownTable::FeatureName                  => b"feat",
            KnownTable::GlyphProperties              => b"prop",
            KnownTable::LigatureCaret                => b"lcar",
            KnownTable::Metamorphosis                => b"mort",
            KnownTable::OpticalBounds                => b"opbd",
            KnownTable::Tracking                     => b"trak",
            KnownTable::AxisVariations               => b"avar",
            KnownTable::CvtVariations                => b"cvar",
            KnownTable::FontVariations               => b"fvar",
            KnownTable::GlyphVariations              => b"gvar",
            KnownTable::HorizontalMetricsVariations  => b"HVAR",
            KnownTable::MetricsVariations            => b"MVAR",
            KnownTable::StyleAttributes              => b"STAT",
            KnownTable::VerticalMetricsVariations    => b"VVAR",
            KnownTable::CompactFontFormat            => b"CFF ",
            KnownTable::CompactFontFormat2           => b"CFF2",
            KnownTable::ControlValue                 => b"cvt ",
            KnownTable::ControlValueProgram          => b"prep",
            KnownTable::FontProgram                  => b"fpgm",
            KnownTable::GlyphData                    => b"glyf",
            KnownTable::IndexToLocation              => b"loca",
            KnownTable::ColorBitmapData              => b"CBDT",
            KnownTable::ColorBitmapLocation          => b"CBLC",
            KnownTable::Color                        => b"COLR",
            KnownTable::ColorPalette                 => b"CPAL",
            KnownTable::EmbeddedBitmapData           => b"EBDT",
            KnownTable::EmbeddedBitmapLocation       => b"EBLC",
            KnownTable::EmbeddedBitmapScaling        => b"EBSC",
            KnownTable::ScalableVectorGraphics       => b"SVG ",
            KnownTable::StandardBitmapGraphics       => b"sbix",
            KnownTable::DigitalSignature             => b"DSIG",
            KnownTable::FontDescriptors              => b"fdsc",
            KnownTable::FontMetrics                  => b"fmtx",
            KnownTable::GridFittingAndScanConversion => b"gasp",
            KnownTable::HorizontalDeviceMetrics      => b"hdmx",
            KnownTable::LinearThreshold              => b"LTSH",
            KnownTable::Metadata                     => b"meta",
            KnownTable::Pcl5                         => b"PCLT",
            KnownTable::VerticalDeviceMetrics        => b"VDMX",
            KnownTable::VerticalOrigin               => b"VORG",
            KnownTable::Zapf                         => b"Zapf",
        };

        Tag::from_bytes(bytes)
    }

    /// Returns the table's group.
    pub fn group(self) -> TableGroup {
        use KnownTable::*;

        match self {
            CharacterToGlyphIndexMapping | Header | HorizontalHeader | HorizontalMetrics
            | MaximumProfile | Naming | PostScript | VerticalHeader | VerticalMetrics
            | WindowsMetrics => TableGroup::Core,

            Baseline | GlyphDefinition | GlyphPositioning | GlyphSubstitution | Justification
            | Kerning | Math | AnchorPoint | AppleBaseline | AppleJustification | ExtendedKerning
            | ExtendedMetamorphosis | FeatureName | GlyphProperties | LigatureCaret
            | Metamorphosis | OpticalBounds | Tracking => TableGroup::Layout,

            AxisVariations | CvtVariations | FontVariations | GlyphVariations
            | HorizontalMetricsVariations | MetricsVariations | StyleAttributes
            | VerticalMetricsVariations => TableGroup::Variable,

            CompactFontFormat | CompactFontFormat2 | ControlValue | ControlValueProgram
            | FontProgram | GlyphData | IndexToLocation => TableGroup::Outlines,

            ColorBitmapData | ColorBitmapLocation | Color | ColorPalette | EmbeddedBitmapData
            | EmbeddedBitmapLocation | EmbeddedBitmapScaling | ScalableVectorGraphics
            | StandardBitmapGraphics => TableGroup::Bitmap,

            DigitalSignature | FontDescriptors | FontMetrics | GridFittingAndScanConversion
            | HorizontalDeviceMetrics | LinearThreshold | Metadata | Pcl5
            | VerticalDeviceMetrics | VerticalOrigin | Zapf => TableGroup::Other,
        }
    }
}


/// A table without a decoder.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct TableStub {
    pub tag: Tag,
    /// The declared table length.
    pub length: u32,
}

/// A decoded table.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(untagged)]
#[allow(missing_docs)]
pub enum TableData {
    CharacterToGlyphIndexMapping(cmap::Table),
    Header(head::Table),
    HorizontalHeader(hhea::Table),
    HorizontalMetrics(hmtx::Table),
    MaximumProfile(maxp::Table),
    Naming(name::Table),
    PostScript(post::Table),
    VerticalHeader(vhea::Table),
    VerticalMetrics(vmtx::Table),
    WindowsMetrics(os2::Table),
    #[cfg(feature = "opentype-layout")]
    GlyphDefinition(gdef::Table),
    #[cfg(feature = "opentype-layout")]
    GlyphPositioning(gpos::Table),
    #[cfg(feature = "opentype-layout")]
    GlyphSubstitution(gsub::Table),
    Kerning(kern::Table),
    #[cfg(feature = "variable-fonts")]
    AxisVariations(avar::Table),
    #[cfg(feature = "variable-fonts")]
    CvtVariations(cvar::Table),
    #[cfg(feature = "variable-fonts")]
    FontVariations(fvar::Table),
    #[cfg(feature = "variable-fonts")]
    GlyphVariations(gvar::Table),
    #[cfg(feature = "variable-fonts")]
    HorizontalMetricsVariations(hvar::Table),
    #[cfg(feature = "variable-fonts")]
    MetricsVariations(mvar::Table),
    #[cfg(feature = "variable-fonts")]
    StyleAttributes(stat::Table),
    #[cfg(feature = "variable-fonts")]
    VerticalMetricsVariations(vvar::Table),
    CompactFontFormat(cff::Table),
    CompactFontFormat2(cff2::Table),
    ControlValue(cvt::Table),
    ControlValueProgram(prep::Table),
    FontProgram(fpgm::Table),
    GlyphData(glyf::Table),
    IndexToLocation(loca::Table),
    ColorBitmapData(cbdt::Table),
    ColorBitmapLocation(cblc::Table),
    Color(colr::Table),
    ColorPalette(cpal::Table),
    EmbeddedBitmapData(ebdt::Table),
    EmbeddedBitmapLocation(eblc::Table),
    ScalableVectorGraphics(svg::Table),
    StandardBitmapGraphics(sbix::Table),
    DigitalSignature(dsig::Table),
    GridFittingAndScanConversion(gasp::Table),
    HorizontalDeviceMetrics(hdmx::Table),
    LinearThreshold(ltsh::Table),
    Metadata(meta::Table),
    VerticalOrigin(vorg::Table),
    Stub(TableStub),
}


/// Decodes a single table of a font.
///
/// `offset` and `length` are usually taken from the table directory.
/// Tables that depend on other tables (`hmtx`, `loca`, `fvar` names, etc.)
/// read them through the directory of `font_data`.
pub fn decode_table(font_data: &[u8], tag: Tag, offset: u32, length: u32) -> DecodeResult<TableData> {
    let font = Font::from_data(font_data).data;
    decode_with_font(&font, tag, offset, length)
}

pub(crate) fn decode_with_font(font: &Font, tag: Tag, offset: u32, length: u32) -> DecodeResult<TableData> {
    let stub = TableData::Stub(TableStub { tag, length });

    let (data, clipped) = match clip_range(font.data(), offset, length) {
        Some(v) => v,
        None => {
            let e = DecodeError::MalformedOffset { what: "table", offset: offset as usize, length: font.data().len() };
            log::warn!("{}: {}", tag, e);
            return DecodeResult::error(stub, &e);
        }
    };

    let known = match KnownTable::from_tag(tag) {
        Some(v) => v,
        None => {
            log::debug!("{} is not a known table", tag);
            return DecodeResult::not_implemented(stub);
        }
    };

    log::debug!("Decoding {} ({} of {} bytes).", tag, data.len(), length);
    let mut result = match decode_known(font, known, data) {
        Some(v) => v,
        None => {
            log::debug!("{} has no decoder", tag);
            return DecodeResult::not_implemented(stub);
        }
    };

    if clipped {
        let note = format!("{} is clipped to {} of {} declared bytes", tag, data.len(), length);
        log::warn!("{}", note);
        result.status = match result.status {
            Status::Complete => Status::Partial(note),
            Status::Partial(other) => Status::Partial(format!("{}; {}", note, other)),
            status => status,
        };
    }

    result
}

fn decode_known(font: &Font, table: KnownTable, data: &[u8]) -> Option<DecodeResult<TableData>> {
    #[cfg(any(feature = "opentype-layout", feature = "variable-fonts"))]
    let name_data = font.table_data(Tag::from_bytes(b"name"));

    let result = match table {
        KnownTable::CharacterToGlyphIndexMapping => cmap::decode(data).map(TableData::CharacterToGlyphIndexMapping),
        KnownTable::Header => head::decode(data).map(TableData::Header),
        KnownTable::HorizontalHeader => hhea::decode(data).map(TableData::HorizontalHeader),
        KnownTable::HorizontalMetrics => {
            hmtx::decode_font(font, table.tag(), data).map(TableData::HorizontalMetrics)
        }
        KnownTable::MaximumProfile => maxp::decode(data).map(TableData::MaximumProfile),
        KnownTable::Naming => name::decode(data).map(TableData::Naming),
        KnownTable::PostScript => post::decode(data).map(TableData::PostScript),
        KnownTable::VerticalHeader => vhea::decode(data).map(TableData::VerticalHeader),
        KnownTable::VerticalMetrics => {
            hmtx::decode_font(font, table.tag(), data).map(TableData::VerticalMetrics)
        }
        KnownTable::WindowsMetrics => os2::decode(data).map(TableData::WindowsMetrics),
        #[cfg(feature = "opentype-layout")]
        KnownTable::GlyphDefinition => gdef::decode(data).map(TableData::GlyphDefinition),
        #[cfg(feature = "opentype-layout")]
        KnownTable::GlyphPositioning => gpos::decode(data).map(TableData::GlyphPositioning),
        #[cfg(feature = "opentype-layout")]
        KnownTable::GlyphSubstitution => gsub::decode(data, name_data).map(TableData::GlyphSubstitution),
        KnownTable::Kerning => kern::decode(data).map(TableData::Kerning),
        #[cfg(feature = "variable-fonts")]
        KnownTable::AxisVariations => {
            let axes = fvar_axis_tags(font);
            avar::decode(data, axes.as_deref()).map(TableData::AxisVariations)
        }
        #[cfg(feature = "variable-fonts")]
        KnownTable::CvtVariations => {
            let axis_count = fvar_axis_tags(font).map(|tags| tags.len() as u16);
            cvar::decode(data, axis_count).map(TableData::CvtVariations)
        }
        #[cfg(feature = "variable-fonts")]
        KnownTable::FontVariations => fvar::decode(data, name_data).map(TableData::FontVariations),
        #[cfg(feature = "variable-fonts")]
        KnownTable::GlyphVariations => gvar::decode(data).map(TableData::GlyphVariations),
        #[cfg(feature = "variable-fonts")]
        KnownTable::HorizontalMetricsVariations => {
            hvar::decode(data).map(TableData::HorizontalMetricsVariations)
        }
        #[cfg(feature = "variable-fonts")]
        KnownTable::MetricsVariations => mvar::decode(data).map(TableData::MetricsVariations),
        #[cfg(feature = "variable-fonts")]
        KnownTable::StyleAttributes => stat::decode(data, name_data).map(TableData::StyleAttributes),
        #[cfg(feature = "variable-fonts")]
        KnownTable::VerticalMetricsVariations => {
            vvar::decode(data).map(TableData::VerticalMetricsVariations)
        }
        KnownTable::CompactFontFormat => cff::decode(data).map(TableData::CompactFontFormat),
        KnownTable::CompactFontFormat2 => cff2::decode(data).map(TableData::CompactFontFormat2),
        KnownTable::ControlValue => cvt::decode(data).map(TableData::ControlValue),
        KnownTable::ControlValueProgram => prep::decode(data).map(TableData::ControlValueProgram),
        KnownTable::FontProgram => fpgm::decode(data).map(TableData::FontProgram),
        KnownTable::GlyphData => glyf::decode_font(font, data).map(TableData::GlyphData),
        KnownTable::IndexToLocation => loca::decode_font(font, data).map(TableData::IndexToLocation),
        KnownTable::ColorBitmapData => cbdt::decode(data).map(TableData::ColorBitmapData),
        KnownTable::ColorBitmapLocation => cblc::decode(data).map(TableData::ColorBitmapLocation),
        KnownTable::Color => colr::decode(data).map(TableData::Color),
        KnownTable::ColorPalette => cpal::decode(data).map(TableData::ColorPalette),
        KnownTable::EmbeddedBitmapData => ebdt::decode(data).map(TableData::EmbeddedBitmapData),
        KnownTable::EmbeddedBitmapLocation => eblc::decode(data).map(TableData::EmbeddedBitmapLocation),
        KnownTable::ScalableVectorGraphics => svg::decode(data).map(TableData::ScalableVectorGraphics),
        KnownTable::StandardBitmapGraphics => {
            sbix::decode_font(font, data).map(TableData::StandardBitmapGraphics)
        }
        KnownTable::DigitalSignature => dsig::decode(data).map(TableData::DigitalSignature),
        KnownTable::GridFittingAndScanConversion => {
            gasp::decode(data).map(TableData::GridFittingAndScanConversion)
        }
        KnownTable::HorizontalDeviceMetrics => {
            hdmx::decode_font(font, data).map(TableData::HorizontalDeviceMetrics)
        }
        KnownTable::LinearThreshold => ltsh::decode(data).map(TableData::LinearThreshold),
        KnownTable::Metadata => meta::decode(data).map(TableData::Metadata),
        KnownTable::VerticalOrigin => vorg::decode(data).map(TableData::VerticalOrigin),
        _ => return None,
    };

    Some(result)
}

/// Returns `fvar` axis tags, when `fvar` is present and readable.
#[cfg(feature = "variable-fonts")]
fn fvar_axis_tags(font: &Font) -> Option<Vec<Tag>> {
    let data = font.table_data(Tag::from_bytes(b"fvar"))?;
    let fvar = fvar::decode(data, None);
    if fvar.is_error() {
        return None;
    }

    Some(fvar.data.axes.iter().map(|axis| axis.tag).collect())
}
