pub mod dispatch;
pub mod event_bus;
pub mod input;

pub use dispatch::*;
pub use event_bus::*;
pub use input::*;
