//! Tagged-tree decoding of evaluated containers.
//!
//! [`element`] holds the recursive per-slot dispatch, [`geometry`] the
//! payload-kind resolution, and [`root`] the top-level flattening into a
//! parent-indexed object array.

pub mod element;
pub(crate) mod geometry;
pub mod root;

pub use element::decode_element;
pub use root::flatten_root;
