//! An in-memory [`ObjectRepository`], used by the tests and by callers
//! that want to stage a reconciliation before touching real storage.

use rustc_hash::FxHashMap;

use crate::error::ErrorKind;
use crate::ident::{derived_object_id, ObjectId};
use crate::model::{AttributeValue, DecodedValue, PayloadKind};
use crate::reconcile::ObjectRepository;

/// One stored object with its hierarchy links and reconciliation state.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub name: String,
    pub parent: Option<ObjectId>,
    pub children: Vec<ObjectId>,
    pub properties: FxHashMap<String, AttributeValue>,
    pub data: Option<DecodedValue>,
    /// Identity recorded by [`ObjectRepository::tag_identity`].
    pub identity: Option<(String, Option<PayloadKind>)>,
    pub materialized: bool,
}

impl StoredObject {
    fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            properties: FxHashMap::default(),
            data: None,
            identity: None,
            materialized: false,
        }
    }
}

/// A hash-map backed object store keyed by derived ids.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    objects: FxHashMap<ObjectId, StoredObject>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a free-standing anchor object and returns its handle.
    pub fn insert_anchor(&mut self, name: &str) -> ObjectId {
        let handle = uuid::Uuid::new_v4();
        self.objects.insert(handle, StoredObject::named(name));
        handle
    }

    pub fn get(&self, handle: ObjectId) -> Option<&StoredObject> {
        self.objects.get(&handle)
    }

    /// Children of `handle` in insertion order; empty for unknown handles.
    pub fn children(&self, handle: ObjectId) -> &[ObjectId] {
        self.objects
            .get(&handle)
            .map(|object| object.children.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectRepository for MemoryRepository {
    fn find_child_by_identity(&self, parent: ObjectId, name: &str) -> Option<ObjectId> {
        let parent = self.objects.get(&parent)?;
        parent.children.iter().copied().find(|child| {
            self.objects
                .get(child)
                .and_then(|object| object.identity.as_ref())
                .is_some_and(|(identity, _)| identity == name)
        })
    }

    fn create_object(
        &mut self,
        name: &str,
        data: &DecodedValue,
        properties: &FxHashMap<String, AttributeValue>,
        parent: ObjectId,
    ) -> Result<ObjectId, ErrorKind> {
        let mut handle = derived_object_id(&parent, name);
        if self.objects.contains_key(&handle) {
            // Same name twice under one parent; fall back to a random id
            // so both instances survive.
            handle = uuid::Uuid::new_v4();
        }
        let mut object = StoredObject::named(name);
        object.parent = Some(parent);
        object.properties = properties.clone();
        object.data = Some(data.clone());
        self.objects.insert(handle, object);
        Ok(handle)
    }

    fn tag_identity(&mut self, handle: ObjectId, name: &str, kind: Option<PayloadKind>) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.identity = Some((name.to_string(), kind));
        }
    }

    fn link(&mut self, parent: ObjectId, child: ObjectId) {
        if let Some(object) = self.objects.get_mut(&parent) {
            if !object.children.contains(&child) {
                object.children.push(child);
            }
        }
        if let Some(object) = self.objects.get_mut(&child) {
            object.parent = Some(parent);
        }
    }

    fn mark_materialized(&mut self, handle: ObjectId) {
        if let Some(object) = self.objects.get_mut(&handle) {
            object.materialized = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::PayloadHandle;
    use crate::model::GeometryData;

    fn mesh_data() -> DecodedValue {
        DecodedValue::Geometry(GeometryData::Mesh(PayloadHandle(1)))
    }

    #[test]
    fn test_find_child_matches_identity_not_display_name() {
        let mut repo = MemoryRepository::new();
        let anchor = repo.insert_anchor("anchor");
        let child = repo
            .create_object("Tree.001", &mesh_data(), &FxHashMap::default(), anchor)
            .unwrap();
        repo.link(anchor, child);

        // Not found until an identity is recorded.
        assert_eq!(repo.find_child_by_identity(anchor, "Tree"), None);
        repo.tag_identity(child, "Tree", Some(PayloadKind::Mesh));
        assert_eq!(repo.find_child_by_identity(anchor, "Tree"), Some(child));
        assert_eq!(repo.find_child_by_identity(anchor, "Tree.001"), None);
    }

    #[test]
    fn test_duplicate_names_under_one_parent_get_distinct_handles() {
        let mut repo = MemoryRepository::new();
        let anchor = repo.insert_anchor("anchor");
        let a = repo
            .create_object("Twin", &mesh_data(), &FxHashMap::default(), anchor)
            .unwrap();
        let b = repo
            .create_object("Twin", &mesh_data(), &FxHashMap::default(), anchor)
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(repo.len(), 3);
    }

    #[test]
    fn test_mark_materialized_is_sticky() {
        let mut repo = MemoryRepository::new();
        let anchor = repo.insert_anchor("anchor");
        assert!(!repo.get(anchor).unwrap().materialized);
        repo.mark_materialized(anchor);
        repo.mark_materialized(anchor);
        assert!(repo.get(anchor).unwrap().materialized);
    }
}
