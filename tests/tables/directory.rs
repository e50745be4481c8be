use pretty_assertions::assert_eq;
use ttf_inspect::directory::Flavor;
use ttf_inspect::{Font, Status, Tag};

use crate::{convert, font, name_table, Unit::*};

#[test]
fn empty_font() {
    let font = Font::from_data(&[]);
    assert!(font.is_error());
    assert!(font.data.directory().is_empty());
}

#[test]
fn any_number_of_tables() {
    for count in [0usize, 1, 2, 17, 300] {
        let tags: Vec<[u8; 4]> = (0..count).map(|i| [b'T', b'0' + (i / 100 % 10) as u8, b'0' + (i / 10 % 10) as u8, b'0' + (i % 10) as u8]).collect();
        let tables: Vec<(&[u8; 4], Vec<u8>)> = tags.iter().map(|t| (t, vec![1, 2, 3])).collect();
        let data = font(&tables);

        let font = Font::from_data(&data);
        assert!(font.is_complete());
        let font = font.data;
        assert_eq!(font.directory().len(), count);
        assert_eq!(font.directory().flavor, Flavor::TrueType);
        for tag in &tags {
            let data = font.table_data(Tag::from_bytes(tag)).unwrap();
            assert_eq!(data, &[1, 2, 3]);
        }
    }
}

#[test]
fn tables_count_overflow() {
    let data = convert(&[
        UInt32(0x00010000), // magic
        UInt16(0xFFFF), // numTables: u16::MAX
        UInt16(0), // searchRange: 0
        UInt16(0), // entrySelector: 0
        UInt16(0), // rangeShift: 0
    ]);

    let font = Font::from_data(&data);
    assert!(matches!(font.status, Status::Partial(_)));
    assert!(font.data.directory().is_empty());
    assert_eq!(font.data.directory().declared_count, 0xFFFF);
}

#[test]
fn open_type_flavor() {
    let data = convert(&[RawTag(b"OTTO"), UInt16(0), UInt16(0), UInt16(0), UInt16(0)]);
    let font = Font::from_data(&data);
    assert!(font.is_complete());
    assert_eq!(font.data.directory().flavor, Flavor::OpenTypeCff);
}

#[test]
fn containers_are_not_unwrapped() {
    for magic in [b"wOFF", b"wOF2", b"ttcf"] {
        let data = convert(&[RawTag(magic), UInt16(0), UInt16(0), UInt16(0), UInt16(0)]);
        assert!(Font::from_data(&data).is_error());
    }
}

#[test]
fn first_match_wins() {
    let data = font(&[(b"cvt ", vec![0x00, 0x01]), (b"cvt ", vec![0x00, 0x02, 0x00, 0x03])]);
    let font = Font::from_data(&data).data;
    assert_eq!(font.table_data(Tag::from_bytes(b"cvt ")), Some(&[0x00, 0x01][..]));
    assert_eq!(font.decode_all().len(), 1);
}

#[test]
fn missing_table() {
    let data = font(&[]);
    let font = Font::from_data(&data).data;
    assert!(font.decode(Tag::from_bytes(b"head")).is_error());
}

#[test]
fn names_by_id() {
    let data = font(&[(b"name", name_table(&[(1, "Inter"), (2, "Regular"), (3, "")]))]);
    let names = ttf_inspect::tables::name::resolve_name_ids(&data, &[1, 2, 3, 300]);
    assert_eq!(names.len(), 2);
    assert_eq!(names[&1], "Inter");
    assert_eq!(names[&2], "Regular");

    assert!(ttf_inspect::tables::name::resolve_name_ids(&[], &[1]).is_empty());
}
