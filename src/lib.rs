pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod material;
pub mod math;
pub mod operations;
pub mod reveal;
pub mod tessellation;
pub mod viewport;

pub use config::EngineConfig;
pub use engine::{FrameRanges, TrackEngine};
pub use error::{Result, TrackError};
pub use geometry::Strand;
pub use material::{MaterialCache, MaterialHandle, MaterialParams};
pub use tessellation::DrawRange;
