mod make_track;

pub use make_track::{MakeTrack, TrackDimensions, MIN_VISIBLE_EXTENT};
