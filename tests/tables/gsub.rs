use ttf_inspect::ggg::MAX_EXPANDED_ENTRIES;
use ttf_inspect::tables::gsub::{NameSource, Substitution};
use ttf_inspect::{Font, TableData, Tag};

use crate::{convert, font, name_table, Unit::*};

fn gsub(data: &[u8]) -> ttf_inspect::tables::gsub::Table {
    let font = Font::from_data(data).data;
    match font.decode(Tag::from_bytes(b"GSUB")).data {
        TableData::GlyphSubstitution(table) => table,
        data => panic!("unexpected table: {:?}", data),
    }
}

#[test]
fn ligature_through_font() {
    let table = convert(&[
        UInt16(1), UInt16(0), // version: 1.0
        UInt16(10), // script list offset
        UInt16(30), // feature list offset
        UInt16(44), // lookup list offset

        // script list
        UInt16(1), // script count
        RawTag(b"latn"), UInt16(8),
        UInt16(4), // default lang sys offset
        UInt16(0), // lang sys count
        UInt16(0), // lookup order: NULL
        UInt16(0xFFFF), // required feature index: none
        UInt16(1), // feature index count
        UInt16(0), // feature index [0]

        // feature list
        UInt16(1), // feature count
        RawTag(b"liga"), UInt16(8),
        UInt16(0), // feature params offset: NULL
        UInt16(1), // lookup index count
        UInt16(0), // lookup index [0]

        // lookup list
        UInt16(1), // lookup count
        UInt16(4), // lookup [0] offset
        UInt16(4), // type: ligature
        UInt16(0), // flag
        UInt16(1), // subtable count
        UInt16(8), // subtable [0] offset
        UInt16(1), // format
        UInt16(8), // coverage offset
        UInt16(1), // ligature set count
        UInt16(14), // ligature set [0] offset
        UInt16(1), UInt16(1), UInt16(5), // coverage: [5]
        UInt16(1), // ligature count
        UInt16(4), // ligature [0] offset
        UInt16(20), // ligature glyph
        UInt16(2), // component count
        UInt16(8), // component [1]
    ]);

    let data = font(&[(b"GSUB", table)]);
    let table = gsub(&data);
    assert_eq!(table.ligatures.len(), 1);
    assert_eq!(table.ligatures[0].components, vec![5, 8]);
    assert_eq!(table.ligatures[0].ligature_glyph, 20);
    assert_eq!(table.ligatures[0].features, vec![Tag::from_bytes(b"liga")]);
    assert_eq!(table.feature_sets[0].key, "liga");
}

#[test]
fn stylistic_set_name_from_name_table() {
    let table = convert(&[
        UInt16(1), UInt16(0), // version: 1.0
        UInt16(10), // script list offset
        UInt16(12), // feature list offset
        UInt16(24), // lookup list offset

        // script list
        UInt16(0), // script count

        // feature list
        UInt16(1), // feature count
        RawTag(b"ss02"), UInt16(8),
        UInt16(0), // feature params offset: NULL
        UInt16(0), // lookup index count

        // lookup list
        UInt16(0), // lookup count
    ]);

    let data = font(&[
        (b"GSUB", table),
        (b"name", name_table(&[(257, "Alternate digits")])),
    ]);
    let table = gsub(&data);
    assert_eq!(table.stylistic_sets.len(), 1);
    let set = &table.stylistic_sets[0];
    assert_eq!(set.tag, Tag::from_bytes(b"ss02"));
    assert_eq!(set.name_id, Some(257));
    assert_eq!(set.source, NameSource::Calculated);
    assert_eq!(set.name.as_deref(), Some("Alternate digits"));
}

#[test]
fn stylistic_set_without_name() {
    let table = convert(&[
        UInt16(1), UInt16(0),
        UInt16(10), UInt16(12), UInt16(24),
        UInt16(0),
        UInt16(1), RawTag(b"ss05"), UInt16(8), UInt16(0), UInt16(0),
        UInt16(0),
    ]);

    let data = font(&[(b"GSUB", table)]);
    let set = &gsub(&data).stylistic_sets[0];
    assert_eq!(set.name_id, None);
    assert_eq!(set.source, NameSource::None);
}

#[test]
fn shared_subtables_stop_expanding() {
    let mut units = vec![
        UInt16(1), UInt16(0), // version: 1.0
        UInt16(0), // script list offset: NULL
        UInt16(0), // feature list offset: NULL
        UInt16(10), // lookup list offset

        // lookup list
        UInt16(2), // lookup count
        UInt16(6), UInt16(6), // both lookups share one table

        // lookup
        UInt16(1), // type: single
        UInt16(0), // flag
        UInt16(20), // subtable count
    ];
    // Every subtable is the same one, right after the offsets.
    units.extend(std::iter::repeat(UInt16(6 + 2 * 20)).take(20));
    units.extend_from_slice(&[
        UInt16(1), // format
        UInt16(6), // coverage offset
        Int16(1), // delta
        UInt16(2), // coverage format
        UInt16(1), // range count
        UInt16(0), UInt16(0xFFFF), UInt16(0), // 0..=65535
    ]);

    let data = font(&[(b"GSUB", convert(&units))]);
    let font = Font::from_data(&data).data;
    let result = font.decode(Tag::from_bytes(b"GSUB"));
    assert!(!result.is_complete());
    assert!(!result.is_error());

    let table = match result.data {
        TableData::GlyphSubstitution(table) => table,
        data => panic!("unexpected table: {:?}", data),
    };
    let expanded: usize = table.lookups.iter().map(|lookup| match &lookup.detail {
        Substitution::Single { mappings } => mappings.len(),
        _ => 0,
    }).sum();
    assert_eq!(expanded, MAX_EXPANDED_ENTRIES);
    assert_eq!(table.lookups.len(), 2);
}
