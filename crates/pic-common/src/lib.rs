//! Common types shared across the PIC snapshot crates.

pub mod component;
pub mod error;
pub mod grid;
pub mod units;

pub use component::Component;
pub use error::{PicError, PicResult};
pub use grid::{Axis, AxisGrid, Grid};
pub use units::Unit;
