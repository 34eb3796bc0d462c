//! Choropleth map controller: label filters, date navigation, hover tooltip
//! and per-region fills, driven through an explicit dispatch table.

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod navigator;
pub mod surface;
pub mod tooltip;

#[cfg(test)]
pub(crate) mod testing;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use filter::*;
pub use navigator::*;
pub use surface::*;
pub use tooltip::*;
