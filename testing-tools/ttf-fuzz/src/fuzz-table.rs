#[macro_use]
extern crate afl;

use ttf_inspect::KnownTable;

// The first byte selects a decoder, the rest is the table.
fn main() {
    afl::fuzz!(|data: &[u8]| {
        if let Some((index, rest)) = data.split_first() {
            let table = KnownTable::ALL[usize::from(*index) % KnownTable::ALL.len()];
            let _ = ttf_inspect::decode_table(data, table.tag(), 1, rest.len() as u32);
        }
    });
}
