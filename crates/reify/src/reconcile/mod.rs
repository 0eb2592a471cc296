//! Hierarchy reconciliation: walking a flattened object array against a
//! persisted repository, creating what is missing and reporting what
//! cannot be brought in line.
//!
//! Reconciliation is best-effort. A failed entry never aborts the walk;
//! its error is recorded and later entries that do not depend on it are
//! still processed. Entries whose parent failed are reported as
//! unavailable rather than silently re-rooted.

pub mod memory;

use rustc_hash::FxHashMap;

use crate::error::{ErrorKind, PathError, Report};
use crate::ident::ObjectId;
use crate::model::{AttributeValue, Bag, DecodedValue, ObjectSpec, PayloadKind, Tag};

pub use memory::MemoryRepository;

/// The persistence seam: everything the reconciler needs from the
/// object store, and nothing else.
pub trait ObjectRepository {
    /// Finds an existing child of `parent` carrying the identity `name`.
    fn find_child_by_identity(&self, parent: ObjectId, name: &str) -> Option<ObjectId>;

    /// Creates a new object under `parent`.
    fn create_object(
        &mut self,
        name: &str,
        data: &DecodedValue,
        properties: &FxHashMap<String, AttributeValue>,
        parent: ObjectId,
    ) -> Result<ObjectId, ErrorKind>;

    /// Records the identity under which `handle` will be found on the
    /// next reconciliation pass.
    fn tag_identity(&mut self, handle: ObjectId, name: &str, kind: Option<PayloadKind>);

    /// Parents `child` under `parent` in the stored hierarchy.
    fn link(&mut self, parent: ObjectId, child: ObjectId);

    /// Flags `handle` as having gone through materialization, whether or
    /// not every entry succeeded.
    fn mark_materialized(&mut self, handle: ObjectId);
}

/// Reconciles a flattened object array against the repository.
///
/// Entries are visited in order; parents always precede their children,
/// so each entry's parent handle is either the `anchor` (entry 0) or an
/// earlier result. Per-entry failures accumulate in the returned report
/// and leave a placeholder so later indices stay aligned.
pub fn reconcile(
    repo: &mut dyn ObjectRepository,
    anchor: ObjectId,
    anchor_name: &str,
    specs: &[ObjectSpec],
) -> Result<(), Report> {
    let mut report = Report::new(anchor_name);
    let mut handles: Vec<Option<ObjectId>> = Vec::with_capacity(specs.len());

    for (position, spec) in specs.iter().enumerate() {
        let parent = match resolve_parent(anchor, &handles, position, spec) {
            Ok(parent) => parent,
            Err(err) => {
                report.push(err);
                handles.push(None);
                continue;
            }
        };

        if let Some(existing) = repo.find_child_by_identity(parent, &spec.name) {
            // In-place updates are not supported; surface the conflict
            // but keep the handle so children still resolve.
            report.push(
                PathError::new(ErrorKind::UpdateUnsupported).push_segment(&spec.name),
            );
            handles.push(Some(existing));
            continue;
        }

        match create_from_spec(repo, parent, spec) {
            Ok(handle) => handles.push(Some(handle)),
            Err(err) => {
                report.push(err.push_segment(&spec.name));
                handles.push(None);
            }
        }
    }

    report.into_result()
}

/// Resolves the parent handle for the entry at `position`.
fn resolve_parent(
    anchor: ObjectId,
    handles: &[Option<ObjectId>],
    position: usize,
    spec: &ObjectSpec,
) -> Result<ObjectId, PathError> {
    if position == 0 {
        return Ok(anchor);
    }
    let index = spec.parent;
    let slot = usize::try_from(index)
        .ok()
        .filter(|i| *i < handles.len())
        .ok_or_else(|| {
            PathError::new(ErrorKind::ParentIndexOutOfRange { index, len: handles.len() })
                .push_segment(&spec.name)
        })?;
    handles[slot].ok_or_else(|| {
        PathError::new(ErrorKind::ParentUnavailable { index }).push_segment(&spec.name)
    })
}

fn create_from_spec(
    repo: &mut dyn ObjectRepository,
    parent: ObjectId,
    spec: &ObjectSpec,
) -> Result<ObjectId, PathError> {
    let kind = geometry_kind(&spec.data)
        .ok_or(ErrorKind::MissingRequiredField { field: "geometry" })?;
    match kind {
        PayloadKind::Armature | PayloadKind::Curve | PayloadKind::Instance => {
            return Err(ErrorKind::UnsupportedPayloadKind { kind }.into());
        }
        PayloadKind::GreasePencil
        | PayloadKind::Mesh
        | PayloadKind::PointCloud
        | PayloadKind::Volume => {}
    }

    let handle = repo.create_object(&spec.name, &spec.data, &spec.properties, parent)?;
    repo.tag_identity(handle, &spec.name, Some(kind));
    repo.link(parent, handle);
    tracing::debug!(name = %spec.name, kind = kind.name(), "created object");
    Ok(handle)
}

/// The payload kind carried by an entry's data field, whether the data
/// is a bare geometry or an object bag wrapping one.
fn geometry_kind(data: &DecodedValue) -> Option<PayloadKind> {
    match data {
        DecodedValue::Geometry(geometry) => Some(geometry.kind()),
        DecodedValue::Bag(bag) => match bag.field(Tag::Geometry.name()) {
            Some(DecodedValue::Geometry(geometry)) => Some(geometry.kind()),
            _ => geometry_of_bag(bag),
        },
        _ => None,
    }
}

/// Fallback for data bags that carry the payload one level down, e.g. a
/// DATA bag whose GEOMETRY field is itself a bag.
fn geometry_of_bag(bag: &Bag) -> Option<PayloadKind> {
    bag.fields.values().find_map(|value| match value {
        DecodedValue::Geometry(geometry) => Some(geometry.kind()),
        _ => None,
    })
}
