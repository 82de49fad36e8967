mod compare;
pub use compare::*;

mod error;
pub use error::*;

mod map;
pub use map::*;

// found-index-or-insertion-point search shared by lookups, removal and ranges
mod key_search;
