//! Root flattening: the top-level decode that turns an evaluated root
//! container into a pre-order, parent-indexed array of object specs.

use rustc_hash::FxHashMap;

use crate::container::{Container, Slot};
use crate::decode::element::{decode_element, merge_field, read_tag};
use crate::error::{ErrorKind, PathError};
use crate::model::{
    AttributeValue, Bag, DecodedValue, FlattenedRoot, Mat4, ObjectSpec, PARENT_ROOT, Tag,
};

/// Decodes the root container as a bag and flattens it.
///
/// The root has no incoming parent-slot, so it has no own attribute row;
/// its fields come entirely from merging its sub-slots. Entry 0 of the
/// result is synthesized from the root's own fields (children excluded)
/// and carries the supplied instance `transform`; it is the one entry
/// constructed outside the generic decode dispatch.
///
/// Fails when the root carries no `DATA` payload or no flattened
/// properties, with paths `["data"]` and `["properties"]` respectively.
pub fn flatten_root(
    transform: Mat4,
    name: &str,
    root: &Container,
) -> Result<FlattenedRoot, PathError> {
    let mut fields: FxHashMap<String, DecodedValue> = FxHashMap::default();
    let mut children: Vec<ObjectSpec> = Vec::new();

    for (i, slot) in root.slots().iter().enumerate() {
        let tag = read_tag(root, i).map_err(|e| e.push_segment(slot.name()))?;
        if tag == Tag::Children {
            // Children form the flattened tail, not a bag field.
            children = decode_children(slot).map_err(|e| e.push_segment(slot.name()))?;
        } else {
            let (tag, value) = decode_element(root, i).map_err(|e| e.push_segment(slot.name()))?;
            merge_field(&mut fields, tag, value);
        }
    }

    let mut properties = FxHashMap::default();
    let mut rest: FxHashMap<String, DecodedValue> = FxHashMap::default();
    for (key, value) in fields {
        match value {
            DecodedValue::Attribute(attribute) => {
                properties.insert(key, attribute);
            }
            other => {
                rest.insert(key, other);
            }
        }
    }

    if properties.is_empty() {
        return Err(PathError::new(ErrorKind::MissingRequiredField { field: "properties" })
            .push_segment("properties"));
    }
    let Some(data) = rest.remove(Tag::Data.name()) else {
        return Err(
            PathError::new(ErrorKind::MissingRequiredField { field: "data" }).push_segment("data")
        );
    };
    let reference_geometry = match rest.remove(Tag::ReferenceGeometry.name()) {
        Some(DecodedValue::Geometry(geometry)) => Some(geometry),
        _ => None,
    };

    let root_name = properties
        .get("name")
        .and_then(AttributeValue::as_text)
        .map(str::to_string)
        .unwrap_or_else(|| name.to_string());

    let mut objects = Vec::with_capacity(children.len() + 1);
    objects.push(ObjectSpec {
        name: root_name,
        data,
        properties,
        parent: PARENT_ROOT,
        transform,
    });
    objects.extend(children);
    Ok(FlattenedRoot { objects, reference_geometry })
}

/// Decodes every entry of a CHILDREN slot into an object spec.
fn decode_children(slot: &Slot) -> Result<Vec<ObjectSpec>, PathError> {
    let mut specs = Vec::new();
    if let Some(nested) = slot.nested() {
        specs.reserve(nested.len());
        for (i, sub) in nested.slots().iter().enumerate() {
            let (_, value) = decode_element(nested, i).map_err(|e| e.push_segment(sub.name()))?;
            let DecodedValue::Bag(bag) = value else {
                return Err(PathError::new(ErrorKind::MalformedInput {
                    context: "child entry is not an object bag",
                })
                .push_segment(sub.name()));
            };
            let spec = object_spec(bag, sub.name()).map_err(|e| e.push_segment(sub.name()))?;
            specs.push(spec);
        }
    }
    Ok(specs)
}

/// Converts a decoded object bag into an [`ObjectSpec`].
///
/// Identity precedence: the `name` text property, then the bag's NAME
/// field, then the slot's display name. The encoded `parent` property
/// (−1 = directly under the root, the default) is shifted by one for the
/// prepended root entry.
fn object_spec(mut bag: Bag, slot_name: &str) -> Result<ObjectSpec, PathError> {
    let properties = bag.attribute_entries();
    let name = properties
        .get("name")
        .and_then(AttributeValue::as_text)
        .map(str::to_string)
        .or_else(|| match bag.field(Tag::Name.name()) {
            Some(DecodedValue::Name(n)) => Some(n.clone()),
            _ => None,
        })
        .unwrap_or_else(|| slot_name.to_string());

    let Some(data) = bag.fields.remove(Tag::Data.name()) else {
        return Err(
            PathError::new(ErrorKind::MissingRequiredField { field: "data" }).push_segment("data")
        );
    };

    let parent = match properties.get("parent") {
        Some(value) => {
            let index = value
                .as_index()
                .ok_or(ErrorKind::MalformedInput { context: "parent index is not an integer" })?;
            i32::try_from(index)
                .ok()
                .and_then(|index| index.checked_add(1))
                .ok_or(ErrorKind::MalformedInput { context: "parent index out of range" })?
        }
        None => PARENT_ROOT + 1,
    };

    Ok(ObjectSpec {
        name,
        data,
        properties,
        parent,
        transform: Mat4::IDENTITY,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::container::{SUBTYPE_ATTRIBUTE, TYPE_ATTRIBUTE};
    use crate::model::PayloadKind;

    fn scalar(v: f64) -> AttributeValue {
        AttributeValue::Scalar(v)
    }

    fn text(s: &str) -> AttributeValue {
        AttributeValue::Text(s.to_string())
    }

    fn codes(codes: &[u8]) -> Vec<AttributeValue> {
        codes.iter().map(|c| scalar(*c as f64)).collect()
    }

    /// A child object bag slot: OBJECT with a nested DATA entry.
    fn child_slot(label: &str) -> Slot {
        let data_level = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Data as u8]))
            .with_attribute("kind", vec![scalar(0.0)])
            .push_slot(Slot::leaf("data"));
        Slot::composite(label, data_level)
    }

    /// A root container with an ATTRIBUTES slot, a DATA slot, and one
    /// CHILDREN slot holding the given child names.
    fn build_root(names: &[String]) -> Container {
        let mut child_level = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&vec![Tag::Object as u8; names.len()]))
            .with_attribute("name", names.iter().map(|n| text(n)).collect());
        for name in names {
            child_level = child_level.push_slot(child_slot(name));
        }
        Container::new()
            .with_attribute(
                TYPE_ATTRIBUTE,
                codes(&[Tag::Attributes as u8, Tag::Data as u8, Tag::Children as u8]),
            )
            .with_attribute("name", vec![text("Rig"), text("d"), text("c")])
            .push_slot(Slot::leaf("props"))
            .push_slot(Slot::leaf("data"))
            .push_slot(Slot::composite("children", child_level))
    }

    fn flatten(names: &[String]) -> FlattenedRoot {
        flatten_root(Mat4::IDENTITY, "root", &build_root(names)).unwrap()
    }

    #[test]
    fn test_two_children_flatten_to_three_entries() {
        let flat = flatten(&["A".to_string(), "B".to_string()]);
        assert_eq!(flat.objects.len(), 3);
        assert_eq!(flat.objects[0].parent, PARENT_ROOT);
        assert_eq!(flat.objects[0].name, "Rig");
        assert_eq!(flat.objects[1].parent, 0);
        assert_eq!(flat.objects[1].name, "A");
        assert_eq!(flat.objects[2].parent, 0);
        assert_eq!(flat.objects[2].name, "B");
    }

    #[test]
    fn test_root_entry_takes_supplied_transform() {
        let mut transform = Mat4::IDENTITY;
        transform.0[0][3] = 5.0;
        let flat =
            flatten_root(transform, "root", &build_root(&["A".to_string()])).unwrap();
        assert_eq!(flat.objects[0].transform, transform);
        assert_eq!(flat.objects[1].transform, Mat4::IDENTITY);
    }

    #[test]
    fn test_missing_data_fails_with_data_path() {
        let root = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Attributes as u8]))
            .with_attribute("name", vec![text("Rig")])
            .push_slot(Slot::leaf("props"));
        let err = flatten_root(Mat4::IDENTITY, "root", &root).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField { field: "data" });
        assert_eq!(err.path, vec!["data"]);
    }

    #[test]
    fn test_missing_properties_fails_with_properties_path() {
        let root = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Data as u8]))
            .with_attribute("k", vec![scalar(1.0)])
            .push_slot(Slot::leaf("data"));
        let err = flatten_root(Mat4::IDENTITY, "root", &root).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField { field: "properties" });
        assert_eq!(err.path, vec!["properties"]);
    }

    #[test]
    fn test_child_missing_data_carries_child_path() {
        let child_level = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Object as u8]))
            .with_attribute("name", vec![text("A")])
            .push_slot(Slot::leaf("A"));
        let root = Container::new()
            .with_attribute(
                TYPE_ATTRIBUTE,
                codes(&[Tag::Attributes as u8, Tag::Data as u8, Tag::Children as u8]),
            )
            .with_attribute("name", vec![text("Rig"), text("d"), text("c")])
            .push_slot(Slot::leaf("props"))
            .push_slot(Slot::leaf("data"))
            .push_slot(Slot::composite("children", child_level));
        let err = flatten_root(Mat4::IDENTITY, "root", &root).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField { field: "data" });
        assert_eq!(err.path, vec!["children", "A", "data"]);
    }

    #[test]
    fn test_encoded_parent_indices_are_shifted_for_root_entry() {
        // B declares A (encoded index 0) as its parent.
        let data = |label: &str| {
            Slot::composite(
                label,
                Container::new()
                    .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Data as u8]))
                    .with_attribute("kind", vec![scalar(0.0)])
                    .push_slot(Slot::leaf("data")),
            )
        };
        let child_level = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Object as u8, Tag::Object as u8]))
            .with_attribute("name", vec![text("A"), text("B")])
            .with_attribute("parent", vec![scalar(-1.0), scalar(0.0)])
            .push_slot(data("A"))
            .push_slot(data("B"));
        let root = Container::new()
            .with_attribute(
                TYPE_ATTRIBUTE,
                codes(&[Tag::Attributes as u8, Tag::Data as u8, Tag::Children as u8]),
            )
            .with_attribute("name", vec![text("Rig"), text("d"), text("c")])
            .push_slot(Slot::leaf("props"))
            .push_slot(Slot::leaf("data"))
            .push_slot(Slot::composite("children", child_level));

        let flat = flatten_root(Mat4::IDENTITY, "root", &root).unwrap();
        assert_eq!(flat.objects[1].parent, 0); // A under the root entry
        assert_eq!(flat.objects[2].parent, 1); // B under A
    }

    #[test]
    fn test_parent_index_at_i32_max_is_rejected_not_wrapped() {
        // The +1 shift must not overflow on a hostile parent value.
        let child_level = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, codes(&[Tag::Object as u8]))
            .with_attribute("name", vec![text("A")])
            .with_attribute("parent", vec![scalar(i32::MAX as f64)])
            .push_slot(child_slot("A"));
        let root = Container::new()
            .with_attribute(
                TYPE_ATTRIBUTE,
                codes(&[Tag::Attributes as u8, Tag::Data as u8, Tag::Children as u8]),
            )
            .with_attribute("name", vec![text("Rig"), text("d"), text("c")])
            .push_slot(Slot::leaf("props"))
            .push_slot(Slot::leaf("data"))
            .push_slot(Slot::composite("children", child_level));

        let err = flatten_root(Mat4::IDENTITY, "root", &root).unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::MalformedInput { context: "parent index out of range" }
        );
        assert_eq!(err.path, vec!["children", "A"]);
    }

    #[test]
    fn test_reference_geometry_is_captured() {
        use crate::container::{MeshPayload, PayloadHandle};
        use crate::model::GeometryData;
        let root = Container::new()
            .with_attribute(
                TYPE_ATTRIBUTE,
                codes(&[
                    Tag::Attributes as u8,
                    Tag::Data as u8,
                    Tag::ReferenceGeometry as u8,
                ]),
            )
            .with_attribute(SUBTYPE_ATTRIBUTE, codes(&[0, 0, PayloadKind::Mesh as u8]))
            .with_attribute("name", vec![text("Rig"), text("d"), text("rg")])
            .push_slot(Slot::leaf("props"))
            .push_slot(Slot::leaf("data"))
            .push_slot(Slot::leaf("rg").with_mesh(MeshPayload::new(PayloadHandle(9))));
        let flat = flatten_root(Mat4::IDENTITY, "root", &root).unwrap();
        assert_eq!(
            flat.reference_geometry,
            Some(GeometryData::Mesh(PayloadHandle(9)))
        );
    }

    proptest! {
        #[test]
        fn prop_flattening_is_pre_order_with_root_first(count in 0usize..12) {
            let names: Vec<String> = (0..count).map(|i| format!("child{i}")).collect();
            let flat = flatten(&names);
            prop_assert_eq!(flat.objects.len(), count + 1);
            prop_assert_eq!(flat.objects[0].parent, PARENT_ROOT);
            for (i, name) in names.iter().enumerate() {
                prop_assert_eq!(&flat.objects[i + 1].name, name);
                prop_assert_eq!(flat.objects[i + 1].parent, 0);
            }
        }
    }
}
