//! Terminal UI pieces.

pub mod picker;

pub use picker::pick;
