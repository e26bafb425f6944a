//! Rendering: strips, frame buffer with diffing, crossterm driver.

pub mod driver;
pub mod frame;
pub mod strip;

pub use driver::{Driver, TerminalGuard};
pub use frame::{CellUpdate, Frame};
pub use strip::{CellStyle, Strip, StyledCell, Tone};
