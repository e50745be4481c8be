//! A [Script List Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#script-list-table-and-script-record) parser.

use indexmap::IndexMap;
use serde::Serialize;

use super::feature_list::FeatureRecord;
use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset16, Stream};
use crate::{Result, Tag};

/// A language name used for the default LangSys of a script.
pub const DEFAULT_LANGUAGE: &str = "default";

const NO_REQUIRED_FEATURE: u16 = 0xFFFF;

#[derive(Clone, Copy)]
struct TagRecord {
    tag: Tag,
    offset: Offset16,
}

impl FromData for TagRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(TagRecord {
            tag: s.read::<Tag>().ok()?,
            offset: s.read::<Offset16>().ok()?,
        })
    }
}


/// A script and language pair with its features resolved into tags.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ScriptLangEntry {
    pub script: Tag,
    /// A language tag or [`DEFAULT_LANGUAGE`].
    pub language: String,
    pub feature_tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_feature_tag: Option<Tag>,
}

/// Parses a script list, resolving feature indices against `features`.
///
/// The default LangSys of a script comes first, followed by LangSys records in file order.
/// Feature indices outside of the feature list are dropped with a note.
pub fn parse_script_list(data: &[u8], features: &[FeatureRecord], notes: &mut Notes) -> Result<Vec<ScriptLangEntry>> {
    let mut s = Stream::new(data);
    let count = s.read::<u16>()?;
    let records = s.read_array16::<TagRecord>(count)?;

    let mut entries = Vec::new();
    for record in records {
        if let Err(e) = parse_script(record.tag, data, record.offset.to_usize(), features, &mut entries, notes) {
            notes.skipped(&format!("script '{}'", record.tag), e);
        }
    }

    Ok(entries)
}

fn parse_script(
    script: Tag,
    list_data: &[u8],
    offset: usize,
    features: &[FeatureRecord],
    entries: &mut Vec<ScriptLangEntry>,
    notes: &mut Notes,
) -> Result<()> {
    let data = slice_from(list_data, offset, "script table")?;
    let mut s = Stream::new(data);
    let default_lang_sys = s.read::<Option<Offset16>>()?;
    let count = s.read::<u16>()?;
    let records = s.read_array16::<TagRecord>(count)?;

    if let Some(offset) = default_lang_sys {
        let language = DEFAULT_LANGUAGE.to_string();
        match parse_lang_sys(script, language, data, offset.to_usize(), features, notes) {
            Ok(entry) => entries.push(entry),
            Err(e) => notes.skipped(&format!("default language of '{}'", script), e),
        }
    }

    for record in records {
        match parse_lang_sys(script, record.tag.to_string_lossy(), data, record.offset.to_usize(), features, notes) {
            Ok(entry) => entries.push(entry),
            Err(e) => notes.skipped(&format!("language '{}' of '{}'", record.tag, script), e),
        }
    }

    Ok(())
}

fn parse_lang_sys(
    script: Tag,
    language: String,
    script_data: &[u8],
    offset: usize,
    features: &[FeatureRecord],
    notes: &mut Notes,
) -> Result<ScriptLangEntry> {
    let data = slice_from(script_data, offset, "language system table")?;
    let mut s = Stream::new(data);
    s.skip::<Offset16>(); // lookupOrder, reserved
    let required_index = s.read::<u16>()?;
    let count = s.read::<u16>()?;
    let indices = s.read_array16::<u16>(count)?;

    let mut resolve = |index: u16| match features.get(usize::from(index)) {
        Some(feature) => Some(feature.tag),
        None => {
            notes.push(format!("'{}'/'{}' references missing feature {}", script, language, index));
            None
        }
    };

    let required_feature_tag = if required_index == NO_REQUIRED_FEATURE {
        None
    } else {
        resolve(required_index)
    };

    let feature_tags = indices.into_iter().filter_map(&mut resolve).collect();

    Ok(ScriptLangEntry { script, language, feature_tags, required_feature_tag })
}


/// A script and language pair that references a [`FeatureSet`].
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct ScriptLanguage {
    pub script: Tag,
    pub language: String,
}

/// A set of features shared by one or more script and language pairs.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct FeatureSet {
    /// A canonical key of the set.
    pub key: String,
    /// Feature tags in the order of the first pair that uses this set.
    pub feature_tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_feature_tag: Option<Tag>,
    pub languages: Vec<ScriptLanguage>,
}

/// Returns a canonical key of a feature set.
///
/// Sets with the same tags in a different order share a key.
pub fn feature_set_key(feature_tags: &[Tag], required_feature_tag: Option<Tag>) -> String {
    let mut tags: Vec<String> = feature_tags.iter().map(|t| t.to_string_lossy()).collect();
    tags.sort();
    tags.dedup();
    let joined = tags.join(",");
    match required_feature_tag {
        Some(tag) => format!("required={};{}", tag, joined),
        None => joined,
    }
}

/// Groups script and language pairs by identical feature sets.
///
/// Sets are listed in order of first use.
pub fn group_feature_sets(entries: &[ScriptLangEntry]) -> Vec<FeatureSet> {
    let mut sets: IndexMap<String, FeatureSet> = IndexMap::new();
    for entry in entries {
        let key = feature_set_key(&entry.feature_tags, entry.required_feature_tag);
        let set = sets.entry(key.clone()).or_insert_with(|| FeatureSet {
            key,
            feature_tags: entry.feature_tags.clone(),
            required_feature_tag: entry.required_feature_tag,
            languages: Vec::new(),
        });
        set.languages.push(ScriptLanguage { script: entry.script, language: entry.language.clone() });
    }

    sets.into_values().collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn feature(tag: &[u8; 4]) -> FeatureRecord {
        FeatureRecord { tag: Tag::from_bytes(tag), lookup_indices: Vec::new(), feature_params: None }
    }

    #[test]
    fn scripts_and_groups() {
        let features = [feature(b"kern"), feature(b"liga"), feature(b"locl")];
        let data = &[
            0x00, 0x02, // script count: 2
            0x44, 0x46, 0x4C, 0x54, 0x00, 0x0E, // 'DFLT' at 14
            0x6C, 0x61, 0x74, 0x6E, 0x00, 0x1A, // 'latn' at 26

            // 'DFLT' (14)
            0x00, 0x04, // default LangSys offset: 4
            0x00, 0x00, // LangSys count: 0
            // default LangSys
            0x00, 0x00, // lookup order
            0xFF, 0xFF, // required feature: none
            0x00, 0x02, // feature count: 2
            0x00, 0x00, 0x00, 0x01, // features: 0, 1

            // 'latn' (26)
            0x00, 0x0A, // default LangSys offset: 10
            0x00, 0x01, // LangSys count: 1
            0x54, 0x52, 0x4B, 0x20, 0x00, 0x14, // 'TRK ' at 20
            // default LangSys (10)
            0x00, 0x00, // lookup order
            0xFF, 0xFF, // required feature: none
            0x00, 0x02, // feature count: 2
            0x00, 0x01, 0x00, 0x00, // features: 1, 0
            // 'TRK ' (20)
            0x00, 0x00, // lookup order
            0x00, 0x02, // required feature: 2
            0x00, 0x03, // feature count: 3
            0x00, 0x00, 0x00, 0x01, 0x00, 0x07, // features: 0, 1, 7 (missing)
        ];

        let mut notes = Notes::new();
        let entries = parse_script_list(data, &features, &mut notes).unwrap();
        assert!(!notes.is_empty());
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].language, DEFAULT_LANGUAGE);
        assert_eq!(entries[2].language, "TRK ");
        assert_eq!(entries[2].required_feature_tag, Some(Tag::from_bytes(b"locl")));
        assert_eq!(entries[2].feature_tags.len(), 2);

        let sets = group_feature_sets(&entries);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].key, "kern,liga");
        assert_eq!(sets[0].languages.len(), 2);
        assert_eq!(sets[1].key, "required=locl;kern,liga");
        assert_eq!(sets[1].languages[0].script, Tag::from_bytes(b"latn"));
    }

    #[test]
    fn malformed_script_offset() {
        let data = &[
            0x00, 0x01, // script count: 1
            0x6C, 0x61, 0x74, 0x6E, 0x01, 0x00, // 'latn' at 256
        ];

        let mut notes = Notes::new();
        let entries = parse_script_list(data, &[], &mut notes).unwrap();
        assert!(entries.is_empty());
        assert!(!notes.is_empty());
    }
}
