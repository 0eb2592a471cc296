//! The encoded container: opaque, self-similar input produced by the
//! geometry-evaluation engine.
//!
//! A container exposes an ordered sequence of slots (one child node each)
//! and a set of parallel attribute arrays indexed by slot position. The
//! reserved `type` array holds every slot's tag code; the optional
//! `subtype` array disambiguates geometry/constraint/modifier payload
//! kinds; `.reference_index` is engine bookkeeping. Reserved arrays are
//! never surfaced by the ATTRIBUTES rule.
//!
//! Containers are read-only to the decode pass. The constructor surface
//! exists for engines (and tests) that must produce them.

use lazy_static::lazy_static;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::AttributeValue;

/// Reserved array: per-slot tag codes.
pub const TYPE_ATTRIBUTE: &str = "type";
/// Reserved array: per-slot subtype codes.
pub const SUBTYPE_ATTRIBUTE: &str = "subtype";
/// Reserved array: engine-internal instance bookkeeping.
pub const REFERENCE_INDEX_ATTRIBUTE: &str = ".reference_index";
/// Mesh attribute carrying a selection's explicit index list.
pub const SELECTION_INDEX_ATTRIBUTE: &str = "index";

lazy_static! {
    static ref RESERVED_ATTRIBUTES: FxHashSet<&'static str> =
        [TYPE_ATTRIBUTE, SUBTYPE_ATTRIBUTE, REFERENCE_INDEX_ATTRIBUTE]
            .iter()
            .copied()
            .collect();
}

/// Whether an attribute array name is reserved for decoder bookkeeping.
pub fn is_reserved_attribute(name: &str) -> bool {
    RESERVED_ATTRIBUTES.contains(name)
}

/// Opaque handle into engine-owned geometry data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PayloadHandle(pub u64);

/// A terminal mesh payload: an opaque handle plus per-vertex attribute
/// arrays (selections read their index list from here).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshPayload {
    pub handle: PayloadHandle,
    pub attributes: FxHashMap<String, Vec<AttributeValue>>,
}

impl MeshPayload {
    pub fn new(handle: PayloadHandle) -> Self {
        Self { handle, attributes: FxHashMap::default() }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }
}

/// One addressable child entry of a container.
///
/// A slot is composite (carries its own nested container), a terminal
/// payload holder, or both; a leaf with no payloads at all is valid for
/// tags that only read the parent's attribute row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slot {
    name: String,
    nested: Option<Container>,
    mesh: Option<MeshPayload>,
    curves: Option<PayloadHandle>,
    grease_pencil: Option<PayloadHandle>,
    pointcloud: Option<PayloadHandle>,
    volume: Option<PayloadHandle>,
}

impl Slot {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn composite(name: impl Into<String>, nested: Container) -> Self {
        Self { name: name.into(), nested: Some(nested), ..Self::default() }
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: MeshPayload) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[must_use]
    pub fn with_curves(mut self, handle: PayloadHandle) -> Self {
        self.curves = Some(handle);
        self
    }

    #[must_use]
    pub fn with_grease_pencil(mut self, handle: PayloadHandle) -> Self {
        self.grease_pencil = Some(handle);
        self
    }

    #[must_use]
    pub fn with_pointcloud(mut self, handle: PayloadHandle) -> Self {
        self.pointcloud = Some(handle);
        self
    }

    #[must_use]
    pub fn with_volume(mut self, handle: PayloadHandle) -> Self {
        self.volume = Some(handle);
        self
    }

    /// The slot's display name (NAME tag, error paths).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The slot's own nested container, if it is composite.
    pub fn nested(&self) -> Option<&Container> {
        self.nested.as_ref()
    }

    pub fn mesh(&self) -> Option<&MeshPayload> {
        self.mesh.as_ref()
    }

    pub fn curves(&self) -> Option<PayloadHandle> {
        self.curves
    }

    pub fn grease_pencil(&self) -> Option<PayloadHandle> {
        self.grease_pencil
    }

    pub fn pointcloud(&self) -> Option<PayloadHandle> {
        self.pointcloud
    }

    pub fn volume(&self) -> Option<PayloadHandle> {
        self.volume
    }
}

/// An encoded container: ordered slots plus parallel attribute arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    slots: Vec<Slot>,
    attributes: FxHashMap<String, Vec<AttributeValue>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parallel attribute array. The array is expected to hold one
    /// value per slot; short arrays simply yield no value for later rows.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    #[must_use]
    pub fn push_slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Names of all parallel attribute arrays, reserved ones included.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// The value of the named array at the given slot position.
    pub fn attribute(&self, name: &str, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(name).and_then(|values| values.get(index))
    }
}
