//! A [Feature List Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#feature-list-table) parser.

use std::collections::BTreeMap;

use serde::Serialize;

use super::feature_params::FeatureParams;
use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset16, Stream};
use crate::{Result, Tag};

#[derive(Clone, Copy)]
struct FeatureRecordRaw {
    tag: Tag,
    offset: Offset16,
}

impl FromData for FeatureRecordRaw {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(FeatureRecordRaw {
            tag: s.read::<Tag>().ok()?,
            offset: s.read::<Offset16>().ok()?,
        })
    }
}


/// A feature with its lookups.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct FeatureRecord {
    pub tag: Tag,
    /// Indices into the lookup list, in file order.
    pub lookup_indices: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_params: Option<FeatureParams>,
}

/// Parses a feature list.
///
/// A feature with a malformed offset is kept with no lookups,
/// so feature indices stay valid for script lists.
/// Malformed feature parameters are dropped.
pub fn parse_feature_list(data: &[u8], notes: &mut Notes) -> Result<Vec<FeatureRecord>> {
    let mut s = Stream::new(data);
    let count = s.read::<u16>()?;
    let records = s.read_array16::<FeatureRecordRaw>(count)?;

    let mut features = Vec::with_capacity(usize::from(records.len()));
    for record in records {
        let feature = match parse_feature(record.tag, data, record.offset.to_usize(), notes) {
            Ok(feature) => feature,
            Err(e) => {
                notes.skipped(&format!("feature '{}'", record.tag), e);
                FeatureRecord { tag: record.tag, lookup_indices: Vec::new(), feature_params: None }
            }
        };
        features.push(feature);
    }

    Ok(features)
}

fn parse_feature(tag: Tag, list_data: &[u8], offset: usize, notes: &mut Notes) -> Result<FeatureRecord> {
    let data = slice_from(list_data, offset, "feature table")?;
    let mut s = Stream::new(data);
    let params_offset = s.read::<Option<Offset16>>()?;
    let count = s.read::<u16>()?;
    let lookup_indices = s.read_vec::<u16>(count)?;

    // The offset is relative to the feature table.
    let feature_params = match params_offset {
        Some(offset) => {
            match slice_from(data, offset.to_usize(), "feature params").and_then(|d| FeatureParams::parse(tag, d)) {
                Ok(params) => params,
                Err(e) => {
                    notes.skipped(&format!("'{}' feature params", tag), e);
                    None
                }
            }
        }
        None => None,
    };

    Ok(FeatureRecord { tag, lookup_indices, feature_params })
}

/// Maps each lookup index to the tags of the features that reference it.
///
/// Tags are listed once per lookup, in feature list order.
pub fn lookup_feature_map(features: &[FeatureRecord]) -> BTreeMap<u16, Vec<Tag>> {
    let mut map: BTreeMap<u16, Vec<Tag>> = BTreeMap::new();
    for feature in features {
        for index in &feature.lookup_indices {
            let tags = map.entry(*index).or_default();
            if !tags.contains(&feature.tag) {
                tags.push(feature.tag);
            }
        }
    }
    map
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_with_params() {
        let data = &[
            0x00, 0x02, // feature count: 2
            0x6C, 0x69, 0x67, 0x61, 0x00, 0x0E, // 'liga' at 14
            0x73, 0x73, 0x30, 0x31, 0x00, 0x14, // 'ss01' at 20

            // 'liga' (14)
            0x00, 0x00, // params offset: null
            0x00, 0x02, // lookup count: 2
            0x00, 0x00, 0x00, 0x03, // lookups: 0, 3

            // 'ss01' (20)
            0x00, 0x06, // params offset: 6
            0x00, 0x01, // lookup count: 1
            0x00, 0x03, // lookups: 3
            // params
            0x00, 0x00, // version: 0
            0x01, 0x00, // UI name ID: 256
        ];

        let mut notes = Notes::new();
        let features = parse_feature_list(data, &mut notes).unwrap();
        assert!(notes.is_empty());
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].lookup_indices, [0, 3]);
        assert_eq!(features[0].feature_params, None);
        assert_eq!(features[1].feature_params, Some(FeatureParams::StylisticSet { version: 0, ui_name_id: 256 }));

        let map = lookup_feature_map(&features);
        assert_eq!(map[&0], [Tag::from_bytes(b"liga")]);
        assert_eq!(map[&3], [Tag::from_bytes(b"liga"), Tag::from_bytes(b"ss01")]);
    }

    #[test]
    fn malformed_feature_offset() {
        let data = &[
            0x00, 0x01, // feature count: 1
            0x6B, 0x65, 0x72, 0x6E, 0x00, 0xFF, // 'kern' at 255
        ];

        let mut notes = Notes::new();
        let features = parse_feature_list(data, &mut notes).unwrap();
        assert!(!notes.is_empty());
        assert_eq!(features.len(), 1);
        assert!(features[0].lookup_indices.is_empty());
    }
}
