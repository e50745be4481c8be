use pretty_assertions::assert_eq;
use ttf_inspect::tables::{glyf, hmtx, loca};
use ttf_inspect::{Font, Rect, Status, TableData, Tag};

use crate::{convert, font, head_table, hhea_table, maxp_table, Unit::*};

fn hmtx_data() -> Vec<u8> {
    convert(&[
        UInt16(500), Int16(10), // glyph 0
        UInt16(600), Int16(-5), // glyph 1
        Int16(20), // glyph 2 side bearing
    ])
}

#[test]
fn horizontal_metrics() {
    let data = font(&[
        (b"head", head_table(false)),
        (b"hhea", hhea_table(2)),
        (b"hmtx", hmtx_data()),
        (b"maxp", maxp_table(3)),
    ]);

    let font = Font::from_data(&data).data;
    let result = font.decode(Tag::from_bytes(b"hmtx"));
    assert!(result.is_complete());
    assert_eq!(result.data, TableData::HorizontalMetrics(hmtx::Table {
        number_of_long_metrics: 2,
        number_of_bearings: 1,
        min_advance: 500,
        max_advance: 600,
        average_advance: 550,
        min_side_bearing: -5,
        max_side_bearing: 20,
    }));
}

#[test]
fn metrics_without_maxp() {
    let data = font(&[(b"hhea", hhea_table(2)), (b"hmtx", hmtx_data())]);
    let font = Font::from_data(&data).data;
    let result = font.decode(Tag::from_bytes(b"hmtx"));
    assert!(result.is_error());
}

#[test]
fn glyph_headers() {
    let glyf_data = convert(&[
        // glyph 1 (0)
        Int16(1), // number of contours
        Int16(10), Int16(0), Int16(400), Int16(700), // bbox
        UInt16(0), UInt16(0), // padding
        // glyph 2 (12)
        Int16(-1), // composite
        Int16(-20), Int16(-10), Int16(300), Int16(600), // bbox
        UInt16(0), UInt16(0), // padding
    ]);

    let loca_data = convert(&[
        UInt16(0), // glyph 0: empty
        UInt16(0), // glyph 1 at 0
        UInt16(6), // glyph 2 at 12
        UInt16(12), // end: 24
    ]);

    let data = font(&[
        (b"glyf", glyf_data),
        (b"head", head_table(false)),
        (b"loca", loca_data.clone()),
        (b"maxp", maxp_table(3)),
    ]);

    let font = Font::from_data(&data).data;

    let loca = match font.decode(Tag::from_bytes(b"loca")) {
        r if r.is_complete() => r.data,
        r => panic!("{:?}", r.status),
    };
    match loca {
        TableData::IndexToLocation(loca) => {
            assert_eq!(loca.format, ttf_inspect::tables::head::IndexToLocationFormat::Short);
            assert_eq!(loca.glyph_count, 3);
            assert_eq!(loca.empty_glyph_count, 1);
            assert_eq!(loca.glyph_range(2), Some(12..24));
        }
        other => panic!("unexpected {:?}", other),
    }

    let result = font.decode(Tag::from_bytes(b"glyf"));
    assert!(result.is_complete());
    let glyf = match result.data {
        TableData::GlyphData(glyf) => glyf,
        other => panic!("unexpected {:?}", other),
    };

    assert_eq!(glyf.simple_glyph_count, 1);
    assert_eq!(glyf.composite_glyph_count, 1);
    assert_eq!(glyf.empty_glyph_count, 1);
    assert_eq!(glyf.bbox, Some(Rect { x_min: -20, y_min: -10, x_max: 400, y_max: 700 }));
    assert_eq!(glyf.glyphs[0], None);
    assert_eq!(glyf.glyphs[1], Some(glyf::GlyphHeader {
        number_of_contours: 1,
        bbox: Rect { x_min: 10, y_min: 0, x_max: 400, y_max: 700 },
    }));
}

#[test]
fn long_offsets_from_head() {
    let loca_data = convert(&[UInt32(0), UInt32(0)]);
    let data = font(&[
        (b"head", head_table(true)),
        (b"loca", loca_data.clone()),
        (b"maxp", maxp_table(1)),
    ]);

    let font = Font::from_data(&data).data;
    let result = font.decode(Tag::from_bytes(b"loca"));
    assert!(result.is_complete());
    match result.data {
        TableData::IndexToLocation(loca) => assert_eq!(loca.data_size, 0),
        other => panic!("unexpected {:?}", other),
    }

    // The same data is too short for two glyphs.
    let table = loca::decode(&loca_data, 4, ttf_inspect::tables::head::IndexToLocationFormat::Long);
    assert!(table.is_error());
}

#[test]
fn clipped_table_is_partial() {
    let mut data = font(&[(b"maxp", maxp_table(3))]);
    // Declare a longer table than the buffer holds.
    data[12 + 12..12 + 16].copy_from_slice(&64u32.to_be_bytes());
    let font = Font::from_data(&data).data;
    let result = font.decode(Tag::from_bytes(b"maxp"));
    assert!(matches!(result.status, Status::Partial(_)));
}

#[test]
fn serializes_to_json() {
    let data = font(&[(b"head", head_table(false))]);
    let font = Font::from_data(&data).data;
    let json = serde_json::to_value(font.decode(Tag::from_bytes(b"head"))).unwrap();
    assert_eq!(json["status"]["kind"], "Complete");
    assert_eq!(json["data"]["units_per_em"], 1000);
    assert_eq!(json["data"]["font_revision"], "1");
}
