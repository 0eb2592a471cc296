//! GEOMETRY / REFERENCE_GEOMETRY payload-kind dispatch.
//!
//! The payload kind is read from the parent row's `subtype` attribute and
//! dispatched over the closed [`PayloadKind`] set. A missing payload for
//! the declared kind is an error, never a null result.

use crate::container::{Container, Slot, SUBTYPE_ATTRIBUTE};
use crate::decode::element::decode_bag;
use crate::error::{ErrorKind, PathError};
use crate::model::{GeometryData, PayloadKind, Tag};

pub(crate) fn decode_geometry(
    parent: &Container,
    index: usize,
    slot: &Slot,
    depth: usize,
) -> Result<GeometryData, PathError> {
    resolve_payload(parent, index, slot, depth).map_err(|e| e.push_segment("geometry"))
}

pub(crate) fn decode_reference_geometry(
    parent: &Container,
    index: usize,
    slot: &Slot,
    depth: usize,
) -> Result<GeometryData, PathError> {
    decode_geometry(parent, index, slot, depth).map_err(|e| e.push_segment("reference_geometry"))
}

fn resolve_payload(
    parent: &Container,
    index: usize,
    slot: &Slot,
    depth: usize,
) -> Result<GeometryData, PathError> {
    let subtype = parent
        .attribute(SUBTYPE_ATTRIBUTE, index)
        .ok_or(ErrorKind::MissingRequiredField { field: "subtype" })?;
    let code = subtype
        .as_index()
        .ok_or(ErrorKind::MalformedInput { context: "subtype code is not an integer" })?;
    let kind = u8::try_from(code)
        .ok()
        .and_then(PayloadKind::from_u8)
        .ok_or(ErrorKind::UnknownSubtype { table: "geometry", code })?;

    match kind {
        // Armature data is self-similar: recurse as a bag.
        PayloadKind::Armature => {
            let bag = decode_bag(Tag::Geometry, parent, index, slot, depth)?;
            Ok(GeometryData::Armature(bag))
        }
        PayloadKind::Curve => slot
            .curves()
            .map(GeometryData::Curves)
            .ok_or_else(|| missing(kind)),
        PayloadKind::GreasePencil => slot
            .grease_pencil()
            .map(GeometryData::GreasePencil)
            .ok_or_else(|| missing(kind)),
        PayloadKind::Mesh => slot
            .mesh()
            .map(|mesh| GeometryData::Mesh(mesh.handle))
            .ok_or_else(|| missing(kind)),
        PayloadKind::PointCloud => slot
            .pointcloud()
            .map(GeometryData::PointCloud)
            .ok_or_else(|| missing(kind)),
        PayloadKind::Volume => slot
            .volume()
            .map(GeometryData::Volume)
            .ok_or_else(|| missing(kind)),
        // Instances keep their encoded container: nested pointcloud plus
        // references, resolved later by the caller.
        PayloadKind::Instance => slot
            .nested()
            .cloned()
            .map(GeometryData::Instance)
            .ok_or_else(|| missing(kind)),
    }
}

fn missing(kind: PayloadKind) -> PathError {
    ErrorKind::MissingGeometry { kind }.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{MeshPayload, PayloadHandle, TYPE_ATTRIBUTE};
    use crate::decode::decode_element;
    use crate::model::{AttributeValue, DecodedValue};

    fn scalar(v: f64) -> AttributeValue {
        AttributeValue::Scalar(v)
    }

    fn geometry_container(subtype: u8, slot: Slot) -> Container {
        Container::new()
            .with_attribute(TYPE_ATTRIBUTE, vec![scalar(Tag::Geometry as u8 as f64)])
            .with_attribute(SUBTYPE_ATTRIBUTE, vec![scalar(subtype as f64)])
            .with_attribute("radius", vec![scalar(1.0)])
            .push_slot(slot)
    }

    #[test]
    fn test_mesh_payload_resolves_to_handle() {
        let container = geometry_container(
            PayloadKind::Mesh as u8,
            Slot::leaf("m").with_mesh(MeshPayload::new(PayloadHandle(11))),
        );
        let (_, value) = decode_element(&container, 0).unwrap();
        assert_eq!(
            value,
            DecodedValue::Geometry(GeometryData::Mesh(PayloadHandle(11)))
        );
    }

    #[test]
    fn test_missing_payload_for_declared_kind_is_an_error() {
        let container = geometry_container(PayloadKind::Volume as u8, Slot::leaf("v"));
        let err = decode_element(&container, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingGeometry { kind: PayloadKind::Volume });
        assert_eq!(err.path, vec!["geometry"]);
    }

    #[test]
    fn test_missing_subtype_array_is_an_error() {
        let container = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, vec![scalar(Tag::Geometry as u8 as f64)])
            .push_slot(Slot::leaf("g"));
        let err = decode_element(&container, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingRequiredField { field: "subtype" });
        assert_eq!(err.path, vec!["geometry"]);
    }

    #[test]
    fn test_armature_recurses_as_bag() {
        let bones = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, vec![scalar(Tag::Bone as u8 as f64)])
            .with_attribute("length", vec![scalar(2.0)])
            .push_slot(Slot::leaf("bone"));
        let container = geometry_container(
            PayloadKind::Armature as u8,
            Slot::composite("arm", bones),
        );
        let (_, value) = decode_element(&container, 0).unwrap();
        let DecodedValue::Geometry(GeometryData::Armature(bag)) = value else {
            panic!("expected armature bag")
        };
        assert!(bag.fields.contains_key("BONE"));
    }

    #[test]
    fn test_instance_keeps_encoded_container() {
        let references = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, vec![scalar(Tag::Name as u8 as f64)])
            .push_slot(Slot::leaf("ref"));
        let container = geometry_container(
            PayloadKind::Instance as u8,
            Slot::composite("inst", references.clone()),
        );
        let (_, value) = decode_element(&container, 0).unwrap();
        assert_eq!(
            value,
            DecodedValue::Geometry(GeometryData::Instance(references))
        );
    }

    #[test]
    fn test_reference_geometry_error_path() {
        let container = Container::new()
            .with_attribute(TYPE_ATTRIBUTE, vec![scalar(Tag::ReferenceGeometry as u8 as f64)])
            .with_attribute(SUBTYPE_ATTRIBUTE, vec![scalar(PayloadKind::Curve as u8 as f64)])
            .push_slot(Slot::leaf("rg"));
        let err = decode_element(&container, 0).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingGeometry { kind: PayloadKind::Curve });
        assert_eq!(err.path, vec!["reference_geometry", "geometry"]);
    }
}
