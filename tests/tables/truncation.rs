use ttf_inspect::{decode_table, Font, KnownTable, Status, Tag};

use crate::{convert, font, head_table, hhea_table, maxp_table, name_table, Unit::*};

/// Deterministic noise, so that decoders get past their version checks
/// now and then and fail somewhere deeper.
fn noise(seed: u32, len: usize) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

fn sample(table: KnownTable, seed: u32) -> Vec<u8> {
    let mut data = noise(seed, 96);
    // Most tables start with a 1.0 version or a zero format.
    if seed % 2 == 0 {
        data[..4].copy_from_slice(&[0x00, 0x01, 0x00, 0x00]);
    } else {
        data[..2].copy_from_slice(&[0x00, 0x00]);
    }

    if table == KnownTable::Naming {
        return name_table(&[(1, "Sample"), (2, "Regular")]);
    }

    data
}

#[test]
fn every_prefix_of_every_table() {
    for (i, table) in KnownTable::ALL.iter().enumerate() {
        for seed in 0..4 {
            let sample = sample(*table, i as u32 * 4 + seed);
            let data = font(&[
                (b"head", head_table(false)),
                (b"hhea", hhea_table(2)),
                (b"maxp", maxp_table(4)),
                (b"name", name_table(&[(256, "Weight")])),
                (b"zzzz", sample.clone()),
            ]);

            let (offset, _) = match Font::from_data(&data).data.find_table(Tag::from_bytes(b"zzzz")) {
                Some(v) => v,
                None => panic!("the sample table is missing"),
            };

            for len in 0..=sample.len() as u32 {
                let _ = decode_table(&data, table.tag(), offset, len);
            }
        }
    }
}

#[test]
fn empty_tables_are_not_complete() {
    let data = font(&[(b"maxp", maxp_table(1))]);
    for tag in [b"head", b"maxp", b"name", b"OS/2", b"hhea", b"cmap"] {
        let result = decode_table(&data, Tag::from_bytes(tag), 12, 0);
        assert!(!result.is_complete(), "{} decoded from nothing", Tag::from_bytes(tag));
    }
}

#[test]
fn declared_length_past_the_end() {
    let data = font(&[(b"maxp", maxp_table(1))]);
    let result = decode_table(&data, Tag::from_bytes(b"maxp"), 28, 1024);
    match result.status {
        Status::Partial(note) => assert!(note.contains("clipped")),
        status => panic!("unexpected status: {:?}", status),
    }
}

#[test]
fn random_fonts() {
    for seed in 0..64 {
        let data = noise(seed, 512);
        let _ = Font::from_data(&data).data.decode_all();
    }
}

/// A version 5 `OS/2` table. Unset fields are zero.
fn os2_v5_table() -> Vec<u8> {
    let mut data = convert(&[
        UInt16(5), // version
        Int16(500), // average char width
        UInt16(400), // weight class
        UInt16(5), // width class
        UInt16(0), // fs type
    ]);
    data.resize(100, 0);
    data
}

#[test]
fn strict_prefixes_are_not_complete() {
    let tables = [
        (b"name", name_table(&[(1, "Sample"), (2, "Regular")])),
        (b"OS/2", os2_v5_table()),
    ];

    for (tag, table) in tables {
        let data = font(&[(tag, table.clone())]);
        let tag = Tag::from_bytes(tag);
        let (offset, _) = match Font::from_data(&data).data.find_table(tag) {
            Some(v) => v,
            None => panic!("{} is missing", tag),
        };

        assert!(decode_table(&data, tag, offset, table.len() as u32).is_complete());
        for len in 0..table.len() as u32 {
            let result = decode_table(&data, tag, offset, len);
            assert!(!result.is_complete(), "a {} byte {} prefix decoded as complete", len, tag);
        }
    }
}
