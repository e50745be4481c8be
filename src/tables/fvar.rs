//! A [Font Variations Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{Fixed, FromData, Offset, Offset16, Stream};
use crate::tables::name;
use crate::{DecodeError, DecodeResult, Result, Tag};

const AXIS_RECORD_SIZE: u16 = 20;
const NO_POST_SCRIPT_NAME: u16 = 0xFFFF;

#[derive(Clone, Copy)]
struct VariationAxisRecord {
    axis_tag: Tag,
    min_value: Fixed,
    def_value: Fixed,
    max_value: Fixed,
    flags: u16,
    axis_name_id: u16,
}

impl FromData for VariationAxisRecord {
    const SIZE: usize = AXIS_RECORD_SIZE as usize;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(VariationAxisRecord {
            axis_tag: s.read::<Tag>().ok()?,
            min_value: s.read::<Fixed>().ok()?,
            def_value: s.read::<Fixed>().ok()?,
            max_value: s.read::<Fixed>().ok()?,
            flags: s.read::<u16>().ok()?,
            axis_name_id: s.read::<u16>().ok()?,
        })
    }
}


/// A [variation axis](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar#variationaxisrecord).
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct VariationAxis {
    pub tag: Tag,
    pub min_value: Fixed,
    pub default_value: Fixed,
    pub max_value: Fixed,
    pub flags: u16,
    /// The axis should not be exposed in user interfaces.
    pub hidden: bool,
    /// An axis name in the `name` table.
    pub name_id: u16,
    pub name: Option<String>,
}

/// A [named instance](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar#instancerecord).
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct InstanceRecord {
    pub subfamily_name_id: u16,
    pub subfamily_name: Option<String>,
    pub flags: u16,
    /// Coordinates in axis order.
    pub coordinates: Vec<Fixed>,
    /// Present only when the record size includes it and it's not `0xFFFF`.
    pub post_script_name_id: Option<u16>,
    pub post_script_name: Option<String>,
}

/// A [Font Variations Table](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub axis_size: u16,
    pub instance_size: u16,
    pub axes: Vec<VariationAxis>,
    pub instances: Vec<InstanceRecord>,
}

/// Decodes a table.
///
/// `name_data` is used to resolve axis and instance names in a single pass.
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
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"fvar"), version });
    }

    let axes_array_offset = s.read::<Offset16>()?;
    s.skip::<u16>(); // reserved
    let axis_count = s.read::<u16>()?;
    let axis_size = s.read::<u16>()?;
    let instance_count = s.read::<u16>()?;
    let instance_size = s.read::<u16>()?;

    // 'If axisCount is zero, then the font is not functional as a variable font.'
    if axis_count == 0 {
        notes.push("fvar has no axes");
    }

    if axis_size < AXIS_RECORD_SIZE {
        return Err(DecodeError::InvalidValue { what: "fvar axis size", value: u32::from(axis_size) });
    }

    let coordinates_size = 4 + usize::from(axis_count) * Fixed::SIZE;
    if usize::from(instance_size) < coordinates_size {
        return Err(DecodeError::InvalidValue { what: "fvar instance size", value: u32::from(instance_size) });
    }
    let has_post_script_name_id = usize::from(instance_size) >= coordinates_size + u16::SIZE;

    let mut s = Stream::new_at(data, axes_array_offset.to_usize())?;
    let mut axes = Vec::with_capacity(usize::from(axis_count));
    for _ in 0..axis_count {
        let record = Stream::new(s.read_bytes(usize::from(axis_size))?).read::<VariationAxisRecord>()?;
        axes.push(VariationAxis {
            tag: record.axis_tag,
            min_value: record.min_value,
            default_value: record.def_value,
            max_value: record.max_value,
            flags: record.flags,
            hidden: record.flags & 0x0001 != 0,
            name_id: record.axis_name_id,
            name: None,
        });
    }

    // Instances follow the axes.
    let mut instances = Vec::with_capacity(usize::from(instance_count));
    for index in 0..instance_count {
        let record = match s.read_bytes(usize::from(instance_size)) {
            Ok(v) => v,
            Err(e) => {
                notes.skipped(&format!("{} of {} instances", instance_count - index, instance_count), e);
                break;
            }
        };

        let mut s = Stream::new(record);
        let subfamily_name_id = s.read::<u16>()?;
        let flags = s.read::<u16>()?;
        let coordinates = s.read_vec::<Fixed>(axis_count)?;
        let post_script_name_id = if has_post_script_name_id {
            Some(s.read::<u16>()?).filter(|id| *id != NO_POST_SCRIPT_NAME)
        } else {
            None
        };

        instances.push(InstanceRecord {
            subfamily_name_id,
            subfamily_name: None,
            flags,
            coordinates,
            post_script_name_id,
            post_script_name: None,
        });
    }

    Ok(Table { major_version, minor_version, axis_size, instance_size, axes, instances })
}

fn resolve_names(table: &mut Table, name_data: &[u8]) {
    let mut ids: Vec<u16> = table.axes.iter().map(|a| a.name_id).collect();
    for instance in &table.instances {
        ids.push(instance.subfamily_name_id);
        ids.extend(instance.post_script_name_id);
    }

    let names = name::resolve_in_table(name_data, &ids);
    for axis in &mut table.axes {
        axis.name = names.get(&axis.name_id).cloned();
    }

    for instance in &mut table.instances {
        instance.subfamily_name = names.get(&instance.subfamily_name_id).cloned();
        instance.post_script_name = instance.post_script_name_id.and_then(|id| names.get(&id).cloned());
    }
}
