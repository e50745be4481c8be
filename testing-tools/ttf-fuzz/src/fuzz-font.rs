#[macro_use]
extern crate afl;

fn main() {
    afl::fuzz!(|data: &[u8]| {
        let font = ttf_inspect::Font::from_data(data).data;
        for (_, result) in font.decode_all() {
            let _ = result.is_complete();
        }
    });
}
