//! Flattened object specifications destined for reconciliation.

use rustc_hash::FxHashMap;

use crate::model::value::{AttributeValue, DecodedValue, GeometryData};

/// Parent sentinel for the root entry of a flattened array.
///
/// This is the one parent-index convention in the crate: `-1` marks the
/// synthesized root entry; every other entry's `parent` is a zero-based
/// index into the entries before it.
pub const PARENT_ROOT: i32 = -1;

/// A 4x4 column-major transform matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}

/// One entry of the pre-order flattening of a decoded root.
///
/// Invariants: entry 0 has `parent == PARENT_ROOT`; every other entry's
/// `parent` must be a valid index strictly less than its own position.
/// The array is a tree serialized with back-pointers, not a general graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSpec {
    /// Stable identity the reconciler matches existing children by.
    pub name: String,
    /// The object's decoded data payload (DATA field of its bag).
    pub data: DecodedValue,
    /// Flattened attribute entries of the object's bag.
    pub properties: FxHashMap<String, AttributeValue>,
    /// Index of the parent entry, or [`PARENT_ROOT`].
    pub parent: i32,
    pub transform: Mat4,
}

/// Result of flattening one evaluated root.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedRoot {
    /// Pre-order object specifications, root entry first.
    pub objects: Vec<ObjectSpec>,
    /// Shared reference geometry, if the root carried any. Not reconciled
    /// yet; kept for callers that resolve instance references themselves.
    pub reference_geometry: Option<GeometryData>,
}
