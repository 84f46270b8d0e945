mod rendition;
mod source;
pub mod utils;

pub use m3u8_rs;
pub use rendition::select_rendition;
pub use source::*;
