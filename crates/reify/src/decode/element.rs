//! Per-tag slot decoding.
//!
//! [`decode_element`] walks one slot of an encoded container, dispatching
//! on the slot's tag to a merge/flatten rule and producing a strongly
//! typed [`DecodedValue`]. Decoding of a slot is all-or-nothing: any
//! recursive failure unwinds immediately, with each enclosing frame
//! prepending its own node name to the error path.

use rustc_hash::FxHashMap;

use crate::container::{
    Container, Slot, SELECTION_INDEX_ATTRIBUTE, SUBTYPE_ATTRIBUTE, TYPE_ATTRIBUTE,
    is_reserved_attribute,
};
use crate::decode::geometry::{decode_geometry, decode_reference_geometry};
use crate::error::{ErrorKind, PathError};
use crate::limits::MAX_TREE_DEPTH;
use crate::model::{AttributeValue, Bag, DecodedValue, Subtype, Tag};

/// Decodes the slot at `index` of `parent`, returning its tag and value.
///
/// The tag is read from the parent's reserved `type` array; an absent or
/// unrecognized code fails with an empty path.
pub fn decode_element(parent: &Container, index: usize) -> Result<(Tag, DecodedValue), PathError> {
    decode_element_at(parent, index, 0)
}

pub(crate) fn decode_element_at(
    parent: &Container,
    index: usize,
    depth: usize,
) -> Result<(Tag, DecodedValue), PathError> {
    if depth > MAX_TREE_DEPTH {
        return Err(ErrorKind::DepthExceeded { max: MAX_TREE_DEPTH }.into());
    }
    let slot = parent
        .slot(index)
        .ok_or(ErrorKind::MalformedInput { context: "slot index out of range" })?;
    let tag = read_tag(parent, index)?;

    let value = match tag {
        Tag::Attributes => DecodedValue::AttributeMap(decode_attributes(parent, index)?),
        Tag::Name => DecodedValue::Name(slot.name().to_string()),
        Tag::Selection => decode_selection(parent, index, slot, depth)?,
        Tag::Geometry => DecodedValue::Geometry(decode_geometry(parent, index, slot, depth)?),
        Tag::ReferenceGeometry => {
            DecodedValue::Geometry(decode_reference_geometry(parent, index, slot, depth)?)
        }
        Tag::Dependencies | Tag::Materials | Tag::Constraints | Tag::Modifiers
        | Tag::VertexGroups => decode_collection(tag, slot, depth)?,
        Tag::Object | Tag::Bone | Tag::Data | Tag::Children | Tag::Modifier | Tag::Constraint
        | Tag::Falloff | Tag::Target | Tag::Dependency | Tag::TargetSpace | Tag::OwnerSpace
        | Tag::VertexGroup | Tag::TargetValue | Tag::SubtargetValue => {
            DecodedValue::Bag(decode_bag(tag, parent, index, slot, depth)?)
        }
    };
    Ok((tag, value))
}

/// Reads and resolves the tag code for a slot.
pub(crate) fn read_tag(parent: &Container, index: usize) -> Result<Tag, PathError> {
    let value = parent
        .attribute(TYPE_ATTRIBUTE, index)
        .ok_or(ErrorKind::MissingTag)?;
    let code = value
        .as_index()
        .ok_or(ErrorKind::MalformedInput { context: "tag code is not an integer" })?;
    u8::try_from(code)
        .ok()
        .and_then(Tag::from_u8)
        .ok_or_else(|| ErrorKind::UnknownTag { code }.into())
}

/// The ATTRIBUTES rule: collect one value per named parallel array on the
/// parent container at the current row, skipping reserved arrays.
pub(crate) fn decode_attributes(
    parent: &Container,
    index: usize,
) -> Result<FxHashMap<String, AttributeValue>, PathError> {
    let mut values = FxHashMap::default();
    for name in parent.attribute_names() {
        if is_reserved_attribute(name) {
            continue;
        }
        if let Some(value) = parent.attribute(name, index) {
            values.insert(name.to_string(), value.clone());
        }
    }
    if values.is_empty() {
        return Err(ErrorKind::MissingAttributeValues.into());
    }
    Ok(values)
}

/// The central merge rule: ATTRIBUTES results are transparent and splice
/// their entries into the enclosing map; every other tag nests under the
/// field named after it.
pub(crate) fn merge_field(
    fields: &mut FxHashMap<String, DecodedValue>,
    tag: Tag,
    value: DecodedValue,
) {
    match value {
        DecodedValue::AttributeMap(map) => {
            for (key, attribute) in map {
                fields.insert(key, DecodedValue::Attribute(attribute));
            }
        }
        other => {
            fields.insert(tag.name().to_string(), other);
        }
    }
}

/// The generic bag rule: the slot's own attribute row, merged with every
/// recursively decoded sub-slot of its nested container.
pub(crate) fn decode_bag(
    tag: Tag,
    parent: &Container,
    index: usize,
    slot: &Slot,
    depth: usize,
) -> Result<Bag, PathError> {
    let subtype = read_subtype(tag, parent, index)?;
    let mut fields = FxHashMap::default();
    for (name, value) in decode_attributes(parent, index)? {
        fields.insert(name, DecodedValue::Attribute(value));
    }
    if let Some(nested) = slot.nested() {
        for (i, sub) in nested.slots().iter().enumerate() {
            let (sub_tag, sub_value) =
                decode_element_at(nested, i, depth + 1).map_err(|e| e.push_segment(sub.name()))?;
            merge_field(&mut fields, sub_tag, sub_value);
        }
    }
    Ok(Bag { tag, subtype, fields })
}

/// Resolves the slot's `subtype` attribute against the tag's code table.
/// Tags without a subtype table, and rows without a subtype array, yield
/// `None`; an unknown code is an error.
fn read_subtype(tag: Tag, parent: &Container, index: usize) -> Result<Option<Subtype>, PathError> {
    let Some(table) = tag.subtype_table() else {
        return Ok(None);
    };
    let Some(value) = parent.attribute(SUBTYPE_ATTRIBUTE, index) else {
        return Ok(None);
    };
    let code = value
        .as_index()
        .ok_or(ErrorKind::MalformedInput { context: "subtype code is not an integer" })?;
    let subtype = u8::try_from(code)
        .ok()
        .and_then(|c| Subtype::from_code(table, c))
        .ok_or(ErrorKind::UnknownSubtype { table: table.name(), code })?;
    Ok(Some(subtype))
}

/// Collection tags decode every sub-slot independently into an ordered
/// list. A missing or empty nested container yields an empty list.
fn decode_collection(tag: Tag, slot: &Slot, depth: usize) -> Result<DecodedValue, PathError> {
    let mut items = Vec::new();
    if let Some(nested) = slot.nested() {
        items.reserve(nested.len());
        for (i, sub) in nested.slots().iter().enumerate() {
            let (_, value) =
                decode_element_at(nested, i, depth + 1).map_err(|e| e.push_segment(sub.name()))?;
            items.push(value);
        }
    }
    Ok(DecodedValue::Collection { tag, items })
}

/// SELECTION requires the slot's mesh payload to expose an explicit
/// `index` attribute list; absence is an error, not an empty selection.
fn decode_selection(
    parent: &Container,
    index: usize,
    slot: &Slot,
    depth: usize,
) -> Result<DecodedValue, PathError> {
    let index_values = slot
        .mesh()
        .and_then(|mesh| mesh.attributes.get(SELECTION_INDEX_ATTRIBUTE))
        .ok_or_else(|| PathError::new(ErrorKind::ExpectedIndices).push_segment("selection"))?;

    let bag = decode_bag(Tag::Selection, parent, index, slot, depth)
        .map_err(|e| e.push_segment("selection"))?;

    let mut indices = Vec::with_capacity(index_values.len());
    for value in index_values {
        let index = value
            .as_index()
            .ok_or(ErrorKind::MalformedInput { context: "selection index is not an integer" })
            .map_err(|e| PathError::new(e).push_segment("selection"))?;
        indices.push(index);
    }
    Ok(DecodedValue::Selection { bag, indices })
}
