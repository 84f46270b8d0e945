pub mod allowlist;
pub mod assemble;
pub mod clip;
pub mod error;
pub mod fetch;
pub mod hls;
pub mod remux;
pub mod segment;
mod util;

pub use allowlist::PlaybackAllowList;
pub use assemble::{SegmentAssembler, SegmentAssemblerBuilder};
pub use clip::{Clipper, ClipperBuilder};
pub use error::*;
pub use fetch::{HttpSegmentFetcher, SegmentFetcher};
pub use remux::{CommandRemuxer, Remuxer};
pub use segment::*;
pub use util::http::HttpClient;

/// ┌──────────────────┐ master  ┌──────────────────┐
/// │                  ├─────────►                  │
/// │   M3u8Resolver   │  media  │  best rendition  │
/// │                  ◄─────────┤                  │
/// └────────┬─────────┘         └──────────────────┘
///          │ SegmentDescriptor × N
/// ┌────────▼─────────┐         ┌──────────────────┐
/// │                  ├─spawn───►   SegmentFetcher ├─┐
/// │ SegmentAssembler │         └──────────────────┘ │ FetchedSegment
/// │   [MPSC × N]     ◄──────────────────────────────┘ (any order)
/// └────────┬─────────┘
///          │ AssembledStream (ascending sequence)
/// ┌────────▼─────────┐
/// │     Remuxer      ├──► container file / diagnostics
/// └──────────────────┘
pub type DefaultClipper = Clipper<HttpSegmentFetcher, CommandRemuxer>;
