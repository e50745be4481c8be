use pretty_assertions::assert_eq;
use ttf_inspect::tables::stat::AxisValue;
use ttf_inspect::{decode_table, Font, Status, TableData, Tag};

use crate::{convert, font, name_table, Unit::*};

fn fvar_table() -> Vec<u8> {
    convert(&[
        UInt16(1), UInt16(0), // version: 1.0
        UInt16(16), // axes array offset
        UInt16(2), // reserved
        UInt16(2), // axis count
        UInt16(20), // axis size
        UInt16(1), // instance count
        UInt16(12), // instance size

        // axis [0]
        RawTag(b"wght"),
        Fixed(100.0), // min value
        Fixed(400.0), // default value
        Fixed(900.0), // max value
        UInt16(0), // flags
        UInt16(256), // name ID

        // axis [1]
        RawTag(b"wdth"),
        Fixed(50.0), // min value
        Fixed(100.0), // default value
        Fixed(200.0), // max value
        UInt16(0), // flags
        UInt16(258), // name ID

        // instance [0]
        UInt16(257), // subfamily name ID
        UInt16(0), // flags
        Fixed(700.0), // coordinate [0]
        Fixed(100.0), // coordinate [1]
    ])
}

fn stat_table() -> Vec<u8> {
    convert(&[
        UInt16(1), UInt16(1), // version: 1.1
        UInt16(8), // design axis size
        UInt16(2), // design axis count
        UInt32(20), // design axes offset
        UInt16(1), // axis value count
        UInt32(36), // axis value offsets offset
        UInt16(2), // elided fallback name ID

        // design axes
        RawTag(b"wght"), UInt16(256), UInt16(0),
        RawTag(b"wdth"), UInt16(259), UInt16(1),

        // axis value offsets
        UInt16(2),

        // axis value [0]
        UInt16(4), // format
        UInt16(2), // axis count
        UInt16(0), // flags
        UInt16(258), // value name ID
        UInt16(0), Fixed(700.0), // axis index, value
        UInt16(1), Fixed(75.0), // axis index, value
    ])
}

fn decode(data: &[u8], tag: &[u8; 4]) -> TableData {
    let font = Font::from_data(data).data;
    let result = font.decode(Tag::from_bytes(tag));
    assert_eq!(result.status, Status::Complete);
    result.data
}

#[test]
fn axis_and_instance_names() {
    let data = font(&[
        (b"fvar", fvar_table()),
        (b"name", name_table(&[(256, "Weight"), (257, "Bold Condensed"), (258, "Width")])),
    ]);

    let table = match decode(&data, b"fvar") {
        TableData::FontVariations(table) => table,
        data => panic!("unexpected table: {:?}", data),
    };

    assert_eq!(table.axes.len(), 2);
    assert_eq!(table.axes[0].name.as_deref(), Some("Weight"));
    assert_eq!(table.axes[0].max_value.to_string(), "900");
    assert_eq!(table.axes[1].tag, Tag::from_bytes(b"wdth"));
    assert_eq!(table.axes[1].name.as_deref(), Some("Width"));

    let instance = &table.instances[0];
    assert_eq!(instance.subfamily_name.as_deref(), Some("Bold Condensed"));
    assert_eq!(instance.coordinates, vec![ttf_inspect::Fixed::from_i16(700), ttf_inspect::Fixed::from_i16(100)]);
    assert_eq!(instance.post_script_name_id, None);
    assert_eq!(instance.post_script_name, None);
}

#[test]
fn names_without_name_table() {
    let data = font(&[(b"fvar", fvar_table())]);
    let table = match decode(&data, b"fvar") {
        TableData::FontVariations(table) => table,
        data => panic!("unexpected table: {:?}", data),
    };

    assert_eq!(table.axes[0].name_id, 256);
    assert_eq!(table.axes[0].name, None);
}

#[test]
fn style_attributes() {
    let stat = stat_table();

    let names = name_table(&[(2, "Regular"), (256, "Weight"), (258, "Bold Condensed"), (259, "Width")]);
    let data = font(&[(b"STAT", stat), (b"name", names)]);
    let table = match decode(&data, b"STAT") {
        TableData::StyleAttributes(table) => table,
        data => panic!("unexpected table: {:?}", data),
    };

    assert_eq!(table.design_axes.len(), 2);
    assert_eq!(table.design_axes[1].tag, Tag::from_bytes(b"wdth"));
    assert_eq!(table.design_axes[1].name.as_deref(), Some("Width"));
    assert_eq!(table.elided_fallback_name.as_deref(), Some("Regular"));

    let value = &table.axis_values[0];
    assert_eq!(value.format, 4);
    assert_eq!(value.value_name.as_deref(), Some("Bold Condensed"));
    match &value.value {
        AxisValue::Combination { values } => {
            assert_eq!(values.len(), 2);
            assert_eq!(values[1].axis_index, 1);
            assert_eq!(values[1].value.to_string(), "75");
        }
        value => panic!("unexpected axis value: {:?}", value),
    }
}

#[test]
fn segment_maps_take_fvar_axis_tags() {
    let avar = convert(&[
        UInt16(1), UInt16(0), // version: 1.0
        UInt16(0), // reserved
        UInt16(2), // axis count
        UInt16(3), // position map count
        Int16(-0x4000), Int16(-0x4000),
        Int16(0), Int16(0),
        Int16(0x4000), Int16(0x4000),
        UInt16(0), // position map count
    ]);

    let data = font(&[(b"avar", avar), (b"fvar", fvar_table())]);
    let table = match decode(&data, b"avar") {
        TableData::AxisVariations(table) => table,
        data => panic!("unexpected table: {:?}", data),
    };

    assert_eq!(table.segment_maps[0].axis_tag, Some(Tag::from_bytes(b"wght")));
    assert!(table.segment_maps[0].has_required_maps);
    assert_eq!(table.segment_maps[1].axis_tag, Some(Tag::from_bytes(b"wdth")));
    assert!(!table.segment_maps[1].has_required_maps);
}

#[test]
fn segment_maps_without_fvar() {
    let avar = convert(&[
        UInt16(1), UInt16(0),
        UInt16(0),
        UInt16(1),
        UInt16(0), // position map count
    ]);

    let data = font(&[(b"avar", avar)]);
    let table = match decode(&data, b"avar") {
        TableData::AxisVariations(table) => table,
        data => panic!("unexpected table: {:?}", data),
    };

    assert_eq!(table.segment_maps[0].axis_tag, None);
    assert!(!table.segment_maps[0].has_required_maps);
}

#[test]
fn strict_prefixes_are_not_complete() {
    for (tag, table) in [(b"fvar", fvar_table()), (b"STAT", stat_table())] {
        let data = font(&[(tag, table.clone())]);
        let (offset, _) = match Font::from_data(&data).data.find_table(Tag::from_bytes(tag)) {
            Some(v) => v,
            None => panic!("the table is missing"),
        };

        assert!(decode_table(&data, Tag::from_bytes(tag), offset, table.len() as u32).is_complete());
        for len in 0..table.len() as u32 {
            let result = decode_table(&data, Tag::from_bytes(tag), offset, len);
            assert!(!result.is_complete(), "a {} byte {} prefix decoded as complete", len, Tag::from_bytes(tag));
        }
    }
}
