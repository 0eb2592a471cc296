//! The evaluation seam: where encoded containers come from.
//!
//! The crate never evaluates geometry itself; an engine hands it the
//! already-evaluated root containers, one per placed instance, each with
//! its display name and world transform.

use crate::container::Container;
use crate::error::PathError;
use crate::ident::ObjectId;
use crate::model::Mat4;

/// One placed root: an evaluated container plus where it sits.
#[derive(Debug, Clone, PartialEq)]
pub struct RootInstance {
    pub name: String,
    pub transform: Mat4,
    pub container: Container,
}

/// The result of evaluating everything under one anchor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluated {
    pub roots: Vec<RootInstance>,
}

/// Produces evaluated root containers for an anchor.
pub trait GeometryEngine {
    fn evaluate(&self, anchor: ObjectId) -> Result<Evaluated, PathError>;
}
