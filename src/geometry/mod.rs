pub mod curve;
pub mod path;

pub use curve::{Arc, ArcLengthTable, CatmullRom, Curve, CurveDomain, CurveType};
pub use path::{Strand, TrackPaths};
