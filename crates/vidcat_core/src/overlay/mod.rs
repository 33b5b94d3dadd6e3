//! Wall-clock overlay track.
//!
//! When overlays are requested, every whole second of output gets a
//! subtitle event showing the real-world date and time of that frame.
//! The track is written as ASS and either burned into the picture through
//! a `subtitles` filter (hard) or muxed as its own stream (soft).

mod ass;
mod escape;
mod track;

pub use ass::{write_overlay_track, ASS_HEADER};
pub use escape::{escape_filter_path, subtitles_filter};
pub use track::OverlayLines;
