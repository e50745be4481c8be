//! A [Control Value Program](https://docs.microsoft.com/en-us/typography/opentype/spec/prep)
//! implementation.
//!
//! Also used for the [Font Program](https://docs.microsoft.com/en-us/typography/opentype/spec/fpgm),
//! which is a bytecode stream too.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeResult, Result};

mod opcode {
    pub const NPUSHB: u8 = 0x40;
    pub const NPUSHW: u8 = 0x41;
    pub const FDEF: u8 = 0x2C;
    pub const IDEF: u8 = 0x89;
    pub const PUSHB_START: u8 = 0xB0;
    pub const PUSHB_END: u8 = 0xB7;
    pub const PUSHW_START: u8 = 0xB8;
    pub const PUSHW_END: u8 = 0xBF;
}

/// A TrueType bytecode summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub byte_count: u32,
    /// Instructions without their inline push data.
    pub instruction_count: u32,
    pub function_definitions: u32,
    pub instruction_definitions: u32,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut table = Table {
        byte_count: data.len() as u32,
        ..Table::default()
    };

    let mut s = Stream::new(data);
    while !s.at_end() {
        let op = s.read::<u8>()?;
        table.instruction_count += 1;

        let push_len = match op {
            opcode::NPUSHB => s.read::<u8>().map(usize::from),
            opcode::NPUSHW => s.read::<u8>().map(|n| usize::from(n) * 2),
            opcode::PUSHB_START..=opcode::PUSHB_END => Ok(usize::from(op - opcode::PUSHB_START) + 1),
            opcode::PUSHW_START..=opcode::PUSHW_END => Ok((usize::from(op - opcode::PUSHW_START) + 1) * 2),
            opcode::FDEF => {
                table.function_definitions += 1;
                Ok(0)
            }
            opcode::IDEF => {
                table.instruction_definitions += 1;
                Ok(0)
            }
            _ => Ok(0),
        };

        if let Err(e) = push_len.and_then(|len| s.read_bytes(len)) {
            notes.skipped("push instruction data", e);
            break;
        }
    }

    Ok(table)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn instructions() {
        let data = &[
            0xB1, 0x00, 0x01, // PUSHB[1] 0 1
            0x2C, // FDEF
            0x41, 0x01, 0x00, 0x02, // NPUSHW 1 [2]
            0x2D, // ENDF
        ];

        let table = decode(data);
        assert!(table.is_complete());
        assert_eq!(table.data, Table {
            byte_count: 9,
            instruction_count: 4,
            function_definitions: 1,
            instruction_definitions: 0,
        });
    }

    #[test]
    fn truncated_push() {
        let table = decode(&[0x40, 0x03, 0x00]);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.instruction_count, 1);
    }

    #[test]
    fn empty() {
        assert!(decode(&[]).is_complete());
    }
}
