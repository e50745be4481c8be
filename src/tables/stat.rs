//! A [Style Attributes Table](https://docs.microsoft.com/en-us/typography/opentype/spec/stat) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset16, Offset32, Stream};
use crate::tables::name;
use crate::{DecodeError, DecodeResult, Fixed, Result, Tag};

const DESIGN_AXIS_RECORD_SIZE: u16 = 8;

/// Axis-value pairing.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct AxisValueRecord {
    /// Zero-based index into [`Table::design_axes`].
    pub axis_index: u16,
    pub value: Fixed,
}

impl FromData for AxisValueRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(AxisValueRecord {
            axis_index: s.read::<u16>().ok()?,
            value: s.read::<Fixed>().ok()?,
        })
    }
}


/// A [design axis](https://learn.microsoft.com/en-us/typography/opentype/spec/stat#axis-records).
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct DesignAxis {
    pub tag: Tag,
    pub name_id: u16,
    pub name: Option<String>,
    /// The order in which this axis should be used to compose family names.
    pub ordering: u16,
}


/// [Flags](https://learn.microsoft.com/en-us/typography/opentype/spec/stat#flags) of an axis value table.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct AxisValueFlags {
    pub older_sibling_font_attribute: bool,
    pub elidable: bool,
    /// Bits outside of the two defined ones.
    pub reserved: u16,
}

impl AxisValueFlags {
    /// Decodes flags.
    pub fn decode(n: u16) -> Self {
        AxisValueFlags {
            older_sibling_font_attribute: n & 0x0001 != 0,
            elidable: n & 0x0002 != 0,
            reserved: n & !0x0003,
        }
    }

    /// Encodes flags back.
    pub fn encode(&self) -> u16 {
        let mut n = self.reserved & !0x0003;
        if self.older_sibling_font_attribute {
            n |= 0x0001;
        }
        if self.elidable {
            n |= 0x0002;
        }
        n
    }
}


/// A format-specific axis value.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisValue {
    /// Format 1.
    Single { axis_index: u16, value: Fixed },
    /// Format 2.
    Range {
        axis_index: u16,
        nominal_value: Fixed,
        range_min_value: Fixed,
        range_max_value: Fixed,
    },
    /// Format 3.
    Linked { axis_index: u16, value: Fixed, linked_value: Fixed },
    /// Format 4. Has no single axis index.
    Combination { values: Vec<AxisValueRecord> },
}

impl AxisValue {
    fn axis_indices(&self) -> Vec<u16> {
        match self {
            AxisValue::Single { axis_index, .. }
            | AxisValue::Range { axis_index, .. }
            | AxisValue::Linked { axis_index, .. } => vec![*axis_index],
            AxisValue::Combination { values } => values.iter().map(|v| v.axis_index).collect(),
        }
    }
}

/// An [axis value table](https://learn.microsoft.com/en-us/typography/opentype/spec/stat#axis-value-tables).
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct AxisValueTable {
    pub format: u16,
    pub flags: AxisValueFlags,
    pub value_name_id: u16,
    pub value_name: Option<String>,
    pub value: AxisValue,
}


/// A [Style Attributes Table](https://docs.microsoft.com/en-us/typography/opentype/spec/stat).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub design_axis_size: u16,
    pub design_axes: Vec<DesignAxis>,
    pub axis_values: Vec<AxisValueTable>,
    /// Version 1.1+.
    pub elided_fallback_name_id: Option<u16>,
    pub elided_fallback_name: Option<String>,
}

/// Decodes a table.
///
/// `name_data` is used to resolve axis and value names.
pub fn decode(data: &[u8], name_data: Option<&[u8]>) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes).map(|mut table| {
        if let Some(name_data) = name_data {
            resolve_names(&mut table, name_data);
        }
        table
    });
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"STAT"), version });
    }

    let design_axis_size = s.read::<u16>()?;
    let design_axis_count = s.read::<u16>()?;
    let design_axes_offset = s.read::<Offset32>()?;
    let axis_value_count = s.read::<u16>()?;
    let axis_value_offsets = s.read::<Offset32>()?;

    // Version 1.0 is deprecated and has no fallback name.
    let elided_fallback_name_id = if minor_version >= 1 {
        match s.read::<u16>() {
            Ok(id) => Some(id),
            Err(e) => {
                notes.skipped("elided fallback name ID", e);
                None
            }
        }
    } else {
        None
    };

    if design_axis_size < DESIGN_AXIS_RECORD_SIZE {
        return Err(DecodeError::InvalidValue { what: "STAT design axis size", value: u32::from(design_axis_size) });
    }

    let mut design_axes = Vec::with_capacity(usize::from(design_axis_count));
    if design_axis_count != 0 {
        let mut s = Stream::new_at(data, design_axes_offset.to_usize())?;
        for _ in 0..design_axis_count {
            let mut record = Stream::new(s.read_bytes(usize::from(design_axis_size))?);
            design_axes.push(DesignAxis {
                tag: record.read::<Tag>()?,
                name_id: record.read::<u16>()?,
                name: None,
                ordering: record.read::<u16>()?,
            });
        }
    }

    let mut axis_values = Vec::with_capacity(usize::from(axis_value_count));
    if axis_value_count != 0 {
        // Axis value offsets are relative to the start of the offsets array.
        let values_data = slice_from(data, axis_value_offsets.to_usize(), "axis value offsets")?;
        let offsets = Stream::new(values_data).read_array16::<Offset16>(axis_value_count)?;
        for (index, offset) in offsets.into_iter().enumerate() {
            let value = slice_from(values_data, offset.to_usize(), "axis value").and_then(parse_axis_value);
            match value {
                Ok(Some(value)) => {
                    let count = design_axes.len();
                    if value.value.axis_indices().iter().any(|i| usize::from(*i) >= count) {
                        notes.push(format!("axis value {} references a missing design axis", index));
                    }
                    axis_values.push(value);
                }
                Ok(None) => notes.push(format!("axis value {} has an unknown format", index)),
                Err(e) => notes.skipped(&format!("axis value {}", index), e),
            }
        }
    }

    Ok(Table {
        major_version,
        minor_version,
        design_axis_size,
        design_axes,
        axis_values,
        elided_fallback_name_id,
        elided_fallback_name: None,
    })
}

fn parse_axis_value(data: &[u8]) -> Result<Option<AxisValueTable>> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;

    // The only format without a leading axis index.
    if format == 4 {
        let axis_count = s.read::<u16>()?;
        let flags = s.read::<u16>()?;
        let value_name_id = s.read::<u16>()?;
        let values = s.read_vec::<AxisValueRecord>(axis_count)?;
        return Ok(Some(AxisValueTable {
            format,
            flags: AxisValueFlags::decode(flags),
            value_name_id,
            value_name: None,
            value: AxisValue::Combination { values },
        }));
    }

    let axis_index = s.read::<u16>()?;
    let flags = s.read::<u16>()?;
    let value_name_id = s.read::<u16>()?;
    let value = match format {
        1 => AxisValue::Single { axis_index, value: s.read::<Fixed>()? },
        2 => AxisValue::Range {
            axis_index,
            nominal_value: s.read::<Fixed>()?,
            range_min_value: s.read::<Fixed>()?,
            range_max_value: s.read::<Fixed>()?,
        },
        3 => AxisValue::Linked {
            axis_index,
            value: s.read::<Fixed>()?,
            linked_value: s.read::<Fixed>()?,
        },
        _ => return Ok(None),
    };

    Ok(Some(AxisValueTable {
        format,
        flags: AxisValueFlags::decode(flags),
        value_name_id,
        value_name: None,
        value,
    }))
}

fn resolve_names(table: &mut Table, name_data: &[u8]) {
    let mut ids: Vec<u16> = table.design_axes.iter().map(|a| a.name_id).collect();
    ids.extend(table.axis_values.iter().map(|v| v.value_name_id));
    ids.extend(table.elided_fallback_name_id);

    let names = name::resolve_in_table(name_data, &ids);
    for axis in &mut table.design_axes {
        axis.name = names.get(&axis.name_id).cloned();
    }

    for value in &mut table.axis_values {
        value.value_name = names.get(&value.value_name_id).cloned();
    }

    table.elided_fallback_name = table.elided_fallback_name_id.and_then(|id| names.get(&id).cloned());
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    const HEADER_V1_1: &[u8] = &[
        0x00, 0x01, 0x00, 0x01, // version: 1.1
        0x00, 0x08, // design axis size: 8
        0x00, 0x01, // design axis count: 1
        0x00, 0x00, 0x00, 0x14, // design axes offset: 20
        0x00, 0x02, // axis value count: 2
        0x00, 0x00, 0x00, 0x1C, // axis value offsets: 28
        0x00, 0x02, // elided fallback name ID: 2

        // design axis [0] (20)
        0x77, 0x67, 0x68, 0x74, // tag: 'wght'
        0x01, 0x00, // name ID: 256
        0x00, 0x00, // ordering: 0

        // axis value offsets (28)
        0x00, 0x04, // axis value [0] at 4
        0x00, 0x10, // axis value [1] at 16

        // axis value [0] (28 + 4)
        0x00, 0x01, // format: 1
        0x00, 0x00, // axis index: 0
        0x00, 0x02, // flags: elidable
        0x01, 0x01, // value name ID: 257
        0x01, 0x90, 0x00, 0x00, // value: 400

        // axis value [1] (28 + 16)
        0x00, 0x04, // format: 4
        0x00, 0x02, // axis count: 2
        0x00, 0x00, // flags: 0
        0x01, 0x02, // value name ID: 258
        0x00, 0x00, 0x02, 0xBC, 0x00, 0x00, // axis 0: 700
        0x00, 0x01, 0x00, 0x4B, 0x00, 0x00, // axis 1: 75
    ];

    #[test]
    fn format4() {
        let table = decode(HEADER_V1_1, None);
        // Axis 1 is not in the design axes list.
        assert!(matches!(table.status, Status::Partial(_)));

        let table = table.data;
        assert_eq!(table.elided_fallback_name_id, Some(2));
        assert_eq!(table.design_axes[0].tag, Tag::from_bytes(b"wght"));
        assert_eq!(table.axis_values.len(), 2);
        assert_eq!(table.axis_values[0].value, AxisValue::Single { axis_index: 0, value: Fixed::from_i16(400) });
        assert!(table.axis_values[0].flags.elidable);
        assert_eq!(table.axis_values[1].format, 4);
        assert_eq!(table.axis_values[1].value, AxisValue::Combination {
            values: vec![
                AxisValueRecord { axis_index: 0, value: Fixed::from_i16(700) },
                AxisValueRecord { axis_index: 1, value: Fixed::from_i16(75) },
            ],
        });
    }

    #[test]
    fn version_1_0_has_no_fallback_name() {
        let data = &[
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x00, 0x08, // design axis size: 8
            0x00, 0x00, // design axis count: 0
            0x00, 0x00, 0x00, 0x00, // design axes offset: 0
            0x00, 0x00, // axis value count: 0
            0x00, 0x00, 0x00, 0x00, // axis value offsets: 0
        ];

        let table = decode(data, None);
        assert!(table.is_complete());
        assert_eq!(table.data.elided_fallback_name_id, None);
    }

    #[test]
    fn unknown_format() {
        let mut data = HEADER_V1_1.to_vec();
        data[44] = 0x00;
        data[45] = 0x05; // axis value [1] format: 5
        let table = decode(&data, None);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.axis_values.len(), 1);
    }

    #[test]
    fn flags() {
        let flags = AxisValueFlags::decode(0x8003);
        assert!(flags.older_sibling_font_attribute);
        assert!(flags.elidable);
        assert_eq!(flags.encode(), 0x8003);
    }
}
