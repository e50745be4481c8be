//! Per-table decoders.
//!
//! Every module exposes a `Table` type and a `decode` function
//! that never fails and returns a [`DecodeResult`](crate::DecodeResult).

pub mod cbdt;
pub mod cblc;
pub mod cff;
pub mod cff2;
pub mod cmap;
pub mod colr;
pub mod cpal;
pub mod cvt;
pub mod dsig;
pub mod ebdt;
pub mod eblc;
pub mod fpgm;
pub mod gasp;
pub mod glyf;
pub mod hdmx;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod loca;
pub mod ltsh;
pub mod maxp;
pub mod meta;
pub mod name;
pub mod os2;
pub mod post;
pub mod prep;
pub mod sbix;
pub mod svg;
pub mod vhea;
pub mod vmtx;
pub mod vorg;

#[cfg(feature = "opentype-layout")] pub mod gdef;
#[cfg(feature = "opentype-layout")] pub mod gpos;
#[cfg(feature = "opentype-layout")] pub mod gsub;

#[cfg(feature = "variable-fonts")] pub mod avar;
#[cfg(feature = "variable-fonts")] pub mod cvar;
#[cfg(feature = "variable-fonts")] pub mod fvar;
#[cfg(feature = "variable-fonts")] pub mod gvar;
#[cfg(feature = "variable-fonts")] pub mod hvar;
#[cfg(feature = "variable-fonts")] pub mod mvar;
#[cfg(feature = "variable-fonts")] pub mod stat;
#[cfg(feature = "variable-fonts")] pub mod vvar;
