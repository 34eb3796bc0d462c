pub mod binding;
pub mod dataset;
pub mod geometry;
pub mod index;

pub use binding::*;
pub use dataset::*;
pub use geometry::*;
pub use index::*;
