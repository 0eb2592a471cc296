//! Data model types for decoded trees and flattened object hierarchies:
//! - Tags and subtypes (closed slot discriminators)
//! - Values (attribute leaves and the recursive decoded document)
//! - Object specifications (flattened, parent-indexed reconcile input)

pub mod object;
pub mod tag;
pub mod value;

pub use object::{FlattenedRoot, Mat4, ObjectSpec, PARENT_ROOT};
pub use tag::{ConstraintKind, ModifierKind, PayloadKind, SpaceKind, Subtype, Tag};
pub use value::{AttributeValue, Bag, DecodedValue, GeometryData};
