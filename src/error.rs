use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LazyMapError {
    /// Direct access to a key that is not in the map. Check with `get` or
    /// `contains_key` first.
    #[error("key not found")]
    KeyNotFound,
    #[error("destination too small: {needed} slots needed, {available} available")]
    DestinationTooSmall { needed: usize, available: usize },
}
