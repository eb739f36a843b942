//! Track lifecycle: build, advance, resize, dispose.

mod frame;
mod track_engine;

pub use frame::FrameRanges;
pub use track_engine::TrackEngine;
