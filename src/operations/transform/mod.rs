mod mirror;
mod orient;

pub use mirror::Mirror;
pub use orient::Orientation;
