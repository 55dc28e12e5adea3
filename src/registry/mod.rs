//! Change detection for painted output.

mod core;

pub use core::RowRegistry;
