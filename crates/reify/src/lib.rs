//! reify: decode evaluated geometry containers into object hierarchies
//! and reconcile them against a persisted object repository.
//!
//! # Overview
//!
//! A geometry engine evaluates an anchor object into one or more root
//! containers: opaque slot trees with parallel attribute arrays, where a
//! reserved `type` array tags each slot with what it encodes. This crate
//! provides the other half of the pipeline:
//!
//! - **Decoding**: walk the tagged tree into typed values, with flat
//!   attribute splicing and innermost-first error paths
//! - **Flattening**: collapse a root into a pre-order object array whose
//!   entries reference their parents by index
//! - **Reconciliation**: create the missing parts of that hierarchy in a
//!   repository, best-effort, surfacing every failure in one report
//!
//! # Quick Start
//!
//! ```rust
//! use reify::{
//!     flatten_root, reconcile, AttributeValue, Container, Mat4, MemoryRepository,
//!     MeshPayload, PayloadHandle, PayloadKind, Slot, Tag,
//! };
//!
//! let scalar = |v: f64| AttributeValue::Scalar(v);
//!
//! // A root encoding one mesh object: an ATTRIBUTES slot for its
//! // properties and a DATA slot holding the geometry payload.
//! let data = Container::new()
//!     .with_attribute("type", vec![scalar(Tag::Geometry as u8 as f64)])
//!     .with_attribute("subtype", vec![scalar(PayloadKind::Mesh as u8 as f64)])
//!     .push_slot(Slot::leaf("mesh").with_mesh(MeshPayload::new(PayloadHandle(7))));
//! let root = Container::new()
//!     .with_attribute(
//!         "type",
//!         vec![
//!             scalar(Tag::Attributes as u8 as f64),
//!             scalar(Tag::Data as u8 as f64),
//!         ],
//!     )
//!     .with_attribute(
//!         "name",
//!         vec![
//!             AttributeValue::Text("Tree".to_string()),
//!             AttributeValue::Text("d".to_string()),
//!         ],
//!     )
//!     .push_slot(Slot::leaf("props"))
//!     .push_slot(Slot::composite("data", data));
//!
//! let flat = flatten_root(Mat4::IDENTITY, "tree", &root).unwrap();
//! assert_eq!(flat.objects.len(), 1);
//! assert_eq!(flat.objects[0].name, "Tree");
//!
//! let mut repo = MemoryRepository::new();
//! let anchor = repo.insert_anchor("anchor");
//! reconcile(&mut repo, anchor, "anchor", &flat.objects).unwrap();
//! assert_eq!(repo.children(anchor).len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`container`]: The encoded container model (slots, attribute arrays,
//!   terminal payloads)
//! - [`model`]: Decoded data types (tags, values, object specs)
//! - [`decode`]: Tagged-tree decoding and root flattening
//! - [`reconcile`]: The repository seam and the reconciler
//! - [`materialize`]: The end-to-end pass over one anchor
//! - [`engine`]: The evaluation seam
//! - [`error`]: Path-carrying errors and per-pass reports
//! - [`ident`]: Deterministic object ids
//! - [`limits`]: Recursion limits for decoding
//!
//! # Untrusted input
//!
//! Containers come from an engine, not from a wire, but the decoder still
//! treats them as untrusted: recursion is depth-limited, unknown tag and
//! subtype codes are rejected, and malformed rows produce located errors
//! instead of panics.

pub mod container;
pub mod decode;
pub mod engine;
pub mod error;
pub mod ident;
pub mod limits;
pub mod materialize;
pub mod model;
pub mod reconcile;

// Re-export commonly used types at crate root
pub use container::{Container, MeshPayload, PayloadHandle, Slot};
pub use decode::{decode_element, flatten_root};
pub use engine::{Evaluated, GeometryEngine, RootInstance};
pub use error::{ErrorKind, PathError, Report};
pub use ident::{derived_object_id, ObjectId};
pub use materialize::materialize;
pub use model::{
    AttributeValue, Bag, ConstraintKind, DecodedValue, FlattenedRoot, GeometryData, Mat4,
    ModifierKind, ObjectSpec, PayloadKind, SpaceKind, Subtype, Tag, PARENT_ROOT,
};
pub use reconcile::{reconcile, MemoryRepository, ObjectRepository};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
