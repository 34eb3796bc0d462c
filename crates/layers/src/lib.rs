pub mod choropleth;
pub mod symbology;

pub use choropleth::*;
pub use symbology::*;
