//! Tag and subtype enumerations for encoded tree slots.
//!
//! Every slot in an encoded container carries exactly one tag code in the
//! reserved `type` attribute array. The tag selects the decode and merge
//! rule for that slot. The set is closed: unknown codes are a decode
//! error, and dispatch is an exhaustive `match` so a newly added tag
//! cannot be silently ignored.

/// Slot tags (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Object = 1,
    Bone = 2,
    Data = 3,
    Children = 4,
    ReferenceGeometry = 5,
    Geometry = 6,
    Modifier = 7,
    Constraint = 8,
    Dependencies = 9,
    Falloff = 10,
    Materials = 11,
    Constraints = 12,
    Modifiers = 13,
    VertexGroups = 14,
    Attributes = 15,
    Selection = 16,
    Name = 17,
    Target = 18,
    Dependency = 19,
    TargetSpace = 20,
    OwnerSpace = 21,
    VertexGroup = 22,
    TargetValue = 23,
    SubtargetValue = 24,
}

impl Tag {
    /// Every tag, in code order. Used to iterate the closed set in tests.
    pub const ALL: [Tag; 24] = [
        Tag::Object, Tag::Bone, Tag::Data, Tag::Children, Tag::ReferenceGeometry,
        Tag::Geometry, Tag::Modifier, Tag::Constraint, Tag::Dependencies, Tag::Falloff,
        Tag::Materials, Tag::Constraints, Tag::Modifiers, Tag::VertexGroups,
        Tag::Attributes, Tag::Selection, Tag::Name, Tag::Target, Tag::Dependency,
        Tag::TargetSpace, Tag::OwnerSpace, Tag::VertexGroup, Tag::TargetValue,
        Tag::SubtargetValue,
    ];

    /// Creates a Tag from its encoded code.
    pub fn from_u8(v: u8) -> Option<Tag> {
        match v {
            1 => Some(Tag::Object),
            2 => Some(Tag::Bone),
            3 => Some(Tag::Data),
            4 => Some(Tag::Children),
            5 => Some(Tag::ReferenceGeometry),
            6 => Some(Tag::Geometry),
            7 => Some(Tag::Modifier),
            8 => Some(Tag::Constraint),
            9 => Some(Tag::Dependencies),
            10 => Some(Tag::Falloff),
            11 => Some(Tag::Materials),
            12 => Some(Tag::Constraints),
            13 => Some(Tag::Modifiers),
            14 => Some(Tag::VertexGroups),
            15 => Some(Tag::Attributes),
            16 => Some(Tag::Selection),
            17 => Some(Tag::Name),
            18 => Some(Tag::Target),
            19 => Some(Tag::Dependency),
            20 => Some(Tag::TargetSpace),
            21 => Some(Tag::OwnerSpace),
            22 => Some(Tag::VertexGroup),
            23 => Some(Tag::TargetValue),
            24 => Some(Tag::SubtargetValue),
            _ => None,
        }
    }

    /// The uppercase name a decoded value of this tag nests under when
    /// merged into an enclosing bag.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Object => "OBJECT",
            Tag::Bone => "BONE",
            Tag::Data => "DATA",
            Tag::Children => "CHILDREN",
            Tag::ReferenceGeometry => "REFERENCE_GEOMETRY",
            Tag::Geometry => "GEOMETRY",
            Tag::Modifier => "MODIFIER",
            Tag::Constraint => "CONSTRAINT",
            Tag::Dependencies => "DEPENDENCIES",
            Tag::Falloff => "FALLOFF",
            Tag::Materials => "MATERIALS",
            Tag::Constraints => "CONSTRAINTS",
            Tag::Modifiers => "MODIFIERS",
            Tag::VertexGroups => "VERTEX_GROUPS",
            Tag::Attributes => "ATTRIBUTES",
            Tag::Selection => "SELECTION",
            Tag::Name => "NAME",
            Tag::Target => "TARGET",
            Tag::Dependency => "DEPENDENCY",
            Tag::TargetSpace => "TARGET_SPACE",
            Tag::OwnerSpace => "OWNER_SPACE",
            Tag::VertexGroup => "VERTEX_GROUP",
            Tag::TargetValue => "TARGET_VALUE",
            Tag::SubtargetValue => "SUBTARGET_VALUE",
        }
    }

    /// Whether this tag decodes to an ordered list of independent items.
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            Tag::Dependencies | Tag::Materials | Tag::Constraints | Tag::Modifiers | Tag::VertexGroups
        )
    }

    /// The subtype table consulted for this tag, if it carries one.
    pub(crate) fn subtype_table(self) -> Option<SubtypeTable> {
        match self {
            Tag::Geometry | Tag::ReferenceGeometry => Some(SubtypeTable::Payload),
            Tag::Constraint => Some(SubtypeTable::Constraint),
            Tag::Modifier => Some(SubtypeTable::Modifier),
            Tag::TargetSpace | Tag::OwnerSpace => Some(SubtypeTable::Space),
            _ => None,
        }
    }
}

/// Which subtype code table a tag's `subtype` attribute refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SubtypeTable {
    Payload,
    Constraint,
    Modifier,
    Space,
}

impl SubtypeTable {
    pub(crate) fn name(self) -> &'static str {
        match self {
            SubtypeTable::Payload => "geometry",
            SubtypeTable::Constraint => "constraint",
            SubtypeTable::Modifier => "modifier",
            SubtypeTable::Space => "space",
        }
    }
}

/// Geometry payload kinds carried by GEOMETRY / REFERENCE_GEOMETRY slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PayloadKind {
    Armature = 1,
    Curve = 2,
    GreasePencil = 3,
    Mesh = 4,
    PointCloud = 5,
    Volume = 6,
    Instance = 7,
}

impl PayloadKind {
    pub fn from_u8(v: u8) -> Option<PayloadKind> {
        match v {
            1 => Some(PayloadKind::Armature),
            2 => Some(PayloadKind::Curve),
            3 => Some(PayloadKind::GreasePencil),
            4 => Some(PayloadKind::Mesh),
            5 => Some(PayloadKind::PointCloud),
            6 => Some(PayloadKind::Volume),
            7 => Some(PayloadKind::Instance),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PayloadKind::Armature => "ARMATURE",
            PayloadKind::Curve => "CURVE",
            PayloadKind::GreasePencil => "GREASEPENCIL",
            PayloadKind::Mesh => "MESH",
            PayloadKind::PointCloud => "POINTCLOUD",
            PayloadKind::Volume => "VOLUME",
            PayloadKind::Instance => "INSTANCE",
        }
    }
}

/// Constraint kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConstraintKind {
    Transform = 1,
    Location = 2,
    Rotation = 3,
    Scale = 4,
}

impl ConstraintKind {
    pub fn from_u8(v: u8) -> Option<ConstraintKind> {
        match v {
            1 => Some(ConstraintKind::Transform),
            2 => Some(ConstraintKind::Location),
            3 => Some(ConstraintKind::Rotation),
            4 => Some(ConstraintKind::Scale),
            _ => None,
        }
    }
}

/// Modifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModifierKind {
    Hook = 1,
    Armature = 2,
}

impl ModifierKind {
    pub fn from_u8(v: u8) -> Option<ModifierKind> {
        match v {
            1 => Some(ModifierKind::Hook),
            2 => Some(ModifierKind::Armature),
            _ => None,
        }
    }
}

/// Transform space kinds for constraint targets and owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SpaceKind {
    World = 1,
    Custom = 2,
    Pose = 3,
    LocalWithParent = 4,
    Local = 5,
}

impl SpaceKind {
    pub fn from_u8(v: u8) -> Option<SpaceKind> {
        match v {
            1 => Some(SpaceKind::World),
            2 => Some(SpaceKind::Custom),
            3 => Some(SpaceKind::Pose),
            4 => Some(SpaceKind::LocalWithParent),
            5 => Some(SpaceKind::Local),
            _ => None,
        }
    }
}

/// A resolved subtype value read from a slot's `subtype` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subtype {
    Payload(PayloadKind),
    Constraint(ConstraintKind),
    Modifier(ModifierKind),
    Space(SpaceKind),
}

impl Subtype {
    pub(crate) fn from_code(table: SubtypeTable, code: u8) -> Option<Subtype> {
        match table {
            SubtypeTable::Payload => PayloadKind::from_u8(code).map(Subtype::Payload),
            SubtypeTable::Constraint => ConstraintKind::from_u8(code).map(Subtype::Constraint),
            SubtypeTable::Modifier => ModifierKind::from_u8(code).map(Subtype::Modifier),
            SubtypeTable::Space => SpaceKind::from_u8(code).map(Subtype::Space),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_codes_round_trip() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_u8(tag as u8), Some(tag));
        }
        assert_eq!(Tag::from_u8(0), None);
        assert_eq!(Tag::from_u8(25), None);
    }

    #[test]
    fn test_tag_names_are_unique() {
        let mut names: Vec<_> = Tag::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Tag::ALL.len());
    }

    #[test]
    fn test_subtype_tables() {
        assert_eq!(Tag::Geometry.subtype_table(), Some(SubtypeTable::Payload));
        assert_eq!(Tag::ReferenceGeometry.subtype_table(), Some(SubtypeTable::Payload));
        assert_eq!(Tag::Constraint.subtype_table(), Some(SubtypeTable::Constraint));
        assert_eq!(Tag::Modifier.subtype_table(), Some(SubtypeTable::Modifier));
        assert_eq!(Tag::TargetSpace.subtype_table(), Some(SubtypeTable::Space));
        assert_eq!(Tag::OwnerSpace.subtype_table(), Some(SubtypeTable::Space));
        assert_eq!(Tag::Object.subtype_table(), None);
    }

    #[test]
    fn test_subtype_from_code() {
        assert_eq!(
            Subtype::from_code(SubtypeTable::Payload, 4),
            Some(Subtype::Payload(PayloadKind::Mesh))
        );
        assert_eq!(
            Subtype::from_code(SubtypeTable::Space, 5),
            Some(Subtype::Space(SpaceKind::Local))
        );
        assert_eq!(Subtype::from_code(SubtypeTable::Modifier, 9), None);
    }
}
