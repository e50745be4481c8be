//! Common data types used by GDEF/GPOS/GSUB tables.
//!
//! <https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2>

mod budget;
mod class_def;
mod coverage;
mod feature_list;
mod feature_params;
mod lookup_list;
mod script_list;

pub use budget::MAX_EXPANDED_ENTRIES;
pub(crate) use budget::ExpansionBudget;
pub use class_def::ClassMap;
pub use coverage::{Coverage, MAX_EXPANDED_GLYPHS};
pub use feature_list::{lookup_feature_map, parse_feature_list, FeatureRecord};
pub use feature_params::{FeatureParams, ParamsKind};
pub use lookup_list::{parse_lookup_list, Lookup, LookupFlags, LookupSummary};
pub use script_list::{
    feature_set_key, group_feature_sets, parse_script_list, FeatureSet, ScriptLangEntry, ScriptLanguage,
    DEFAULT_LANGUAGE,
};

use crate::decode::Notes;
use crate::parser::{slice_from, Offset, Offset16, Offset32, Stream};
use crate::{DecodeError, Result, Tag};

/// A parsed GSUB or GPOS header with its lists.
#[derive(Clone, Default, Debug)]
pub(crate) struct LayoutTable<'a> {
    pub major_version: u16,
    pub minor_version: u16,
    pub scripts: Vec<ScriptLangEntry>,
    pub features: Vec<FeatureRecord>,
    pub lookups: Vec<Lookup<'a>>,
    pub has_feature_variations: bool,
}

impl<'a> LayoutTable<'a> {
    /// Parses a common GSUB/GPOS header.
    ///
    /// A list with a bad offset is skipped with a note and left empty.
    pub fn parse(table: Tag, data: &'a [u8], extension_type: u16, notes: &mut Notes) -> Result<Self> {
        let mut s = Stream::new(data);
        let major_version = s.read::<u16>()?;
        let minor_version = s.read::<u16>()?;
        if major_version != 1 {
            return Err(DecodeError::UnsupportedVersion { table, version: u32::from(major_version) << 16 | u32::from(minor_version) });
        }

        let script_list = s.read::<Option<Offset16>>()?;
        let feature_list = s.read::<Option<Offset16>>()?;
        let lookup_list = s.read::<Option<Offset16>>()?;
        let feature_variations = if minor_version >= 1 {
            s.read::<Option<Offset32>>()?
        } else {
            None
        };

        // Features come first, since scripts reference them by index.
        let features = match feature_list {
            Some(offset) => slice_from(data, offset.to_usize(), "feature list")
                .and_then(|d| parse_feature_list(d, notes))
                .unwrap_or_else(|e| {
                    notes.skipped("feature list", e);
                    Vec::new()
                }),
            None => Vec::new(),
        };

        let scripts = match script_list {
            Some(offset) => slice_from(data, offset.to_usize(), "script list")
                .and_then(|d| parse_script_list(d, &features, notes))
                .unwrap_or_else(|e| {
                    notes.skipped("script list", e);
                    Vec::new()
                }),
            None => Vec::new(),
        };

        let lookups = match lookup_list {
            Some(offset) => slice_from(data, offset.to_usize(), "lookup list")
                .and_then(|d| parse_lookup_list(d, extension_type, notes))
                .unwrap_or_else(|e| {
                    notes.skipped("lookup list", e);
                    Vec::new()
                }),
            None => Vec::new(),
        };

        Ok(LayoutTable {
            major_version,
            minor_version,
            scripts,
            features,
            lookups,
            has_feature_variations: feature_variations.is_some(),
        })
    }
}
