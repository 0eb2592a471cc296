//! Value types for decoded trees.
//!
//! [`AttributeValue`] is the leaf union read out of a container's parallel
//! attribute arrays. [`DecodedValue`] is the recursive document produced
//! by the tree decoder; it is constructed fresh per decode call, owned by
//! the caller, and discarded once reconciliation has consumed it.

use rustc_hash::FxHashMap;

use crate::container::{Container, PayloadHandle};
use crate::model::tag::{PayloadKind, Subtype, Tag};

/// A single attribute value copied out of a container at decode time.
///
/// No live aliasing of container storage is retained past the decode call.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Scalar(f64),
    Vector([f32; 3]),
    Color([f32; 4]),
    Text(String),
}

impl AttributeValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            AttributeValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads this value as an integral index (tag codes, parent indices,
    /// selection indices). Non-integral scalars are rejected rather than
    /// truncated.
    pub fn as_index(&self) -> Option<i64> {
        match self {
            AttributeValue::Scalar(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(*v as i64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A decoded node whose fields were assembled by flatten-or-nest merging
/// of its children.
///
/// Attribute leaves are transparent: an ATTRIBUTES sub-result splices its
/// entries directly into the enclosing field map. Every other tag nests
/// under the field named after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bag {
    pub tag: Tag,
    pub subtype: Option<Subtype>,
    pub fields: FxHashMap<String, DecodedValue>,
}

impl Bag {
    /// Looks up a nested field by its tag name.
    pub fn field(&self, name: &str) -> Option<&DecodedValue> {
        self.fields.get(name)
    }

    /// The flattened attribute entries of this bag.
    pub fn attribute_entries(&self) -> FxHashMap<String, AttributeValue> {
        self.fields
            .iter()
            .filter_map(|(k, v)| match v {
                DecodedValue::Attribute(a) => Some((k.clone(), a.clone())),
                _ => None,
            })
            .collect()
    }
}

/// Geometry payload resolved for a GEOMETRY / REFERENCE_GEOMETRY slot.
///
/// Armatures are self-similar and recurse as a bag; instances keep their
/// encoded container (nested pointcloud plus references); every other kind
/// is an opaque handle into engine-owned data.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryData {
    Armature(Bag),
    Curves(PayloadHandle),
    GreasePencil(PayloadHandle),
    Mesh(PayloadHandle),
    PointCloud(PayloadHandle),
    Volume(PayloadHandle),
    Instance(Container),
}

impl GeometryData {
    pub fn kind(&self) -> PayloadKind {
        match self {
            GeometryData::Armature(_) => PayloadKind::Armature,
            GeometryData::Curves(_) => PayloadKind::Curve,
            GeometryData::GreasePencil(_) => PayloadKind::GreasePencil,
            GeometryData::Mesh(_) => PayloadKind::Mesh,
            GeometryData::PointCloud(_) => PayloadKind::PointCloud,
            GeometryData::Volume(_) => PayloadKind::Volume,
            GeometryData::Instance(_) => PayloadKind::Instance,
        }
    }
}

/// The strongly-typed value tree produced by decoding one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    /// A slot's display name (NAME tag).
    Name(String),
    /// A single attribute leaf inside a bag's field map.
    Attribute(AttributeValue),
    /// The output of the ATTRIBUTES rule: one value per named parallel
    /// array at the slot's row. Transparent when merged into a bag.
    AttributeMap(FxHashMap<String, AttributeValue>),
    /// A generic merged node.
    Bag(Bag),
    /// An ordered list of independently decoded items.
    Collection { tag: Tag, items: Vec<DecodedValue> },
    /// A resolved geometry payload.
    Geometry(GeometryData),
    /// A selection bag with its explicit index list.
    Selection { bag: Bag, indices: Vec<i64> },
}

impl DecodedValue {
    /// The nested bag, if this value is one.
    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            DecodedValue::Bag(bag) => Some(bag),
            _ => None,
        }
    }
}
