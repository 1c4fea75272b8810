//! Command handlers for the scout CLI

mod scan;
mod select;

pub use scan::*;
pub use select::*;
