use crate::serde::Value;
use crate::types::BinObject;
use derive_more::{Deref, From};
use itertools::Itertools;
use std::fmt;
use std::io::{self, Read};
use std::mem;

/// The stable numeric identity of one serialized field.
///
/// IDs must be unique among one schema's directly-declared fields, and an
/// ID must never be renumbered or reused for a semantically different
/// field once files exist — old data would be silently misread.
#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct FieldId(pub u16);
impl FieldId {
    pub fn deser(r: &mut impl Read) -> Result<Self, io::Error> {
        let mut buf = [0u8; mem::size_of::<u16>()];
        r.read_exact(&mut buf)?;
        let int = u16::from_le_bytes(buf);
        Ok(Self(int))
    }
}

/// The declared shape of one field, used to check stored tags against the
/// destination and to construct fresh instances during decode.
///
/// Container kinds name their element kinds; nested objects name their
/// schema. Every kind is concrete — there is no way to declare a field of
/// some abstract shape, so the whole registered set is serializable.
pub enum ValueKind {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Str,
    Enum,
    /// External reference. The label is handed to the asset store's
    /// bare-name fallback so it can filter candidates by type.
    Asset { type_label: &'static str },
    Array(&'static ValueKind),
    List(&'static ValueKind),
    Dict(&'static ValueKind, &'static ValueKind),
    Object(&'static ClassSchema),
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::I8 => "I8",
            Self::U8 => "U8",
            Self::I16 => "I16",
            Self::U16 => "U16",
            Self::I32 => "I32",
            Self::U32 => "U32",
            Self::I64 => "I64",
            Self::U64 => "U64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Str => "Str",
            Self::Enum => "Enum",
            Self::Asset { .. } => "Asset",
            Self::Array(_) => "Array",
            Self::List(_) => "List",
            Self::Dict(_, _) => "Dict",
            Self::Object(_) => "Object",
        }
    }
}

impl fmt::Debug for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Reads the field's current value out of an instance. For container and
/// object fields this is a snapshot (an owned clone).
pub type FieldGetFn = fn(&dyn BinObject) -> Value;

/// Assigns a decoded value into an instance. Returns `false` to refuse the
/// value (wrong variant, out-of-domain enum integer), which the decoder
/// treats as a per-field failure. A `Value::Null` assigns the field's
/// default.
pub type FieldSetFn = fn(&mut dyn BinObject, Value) -> bool;

/// One registered field: stable ID, declared kind, accessor pair.
///
/// Registration replaces the original's per-field annotations — a field
/// participates in serialization exactly when it appears in its type's
/// registered table.
pub struct FieldSpec {
    pub id: FieldId,
    pub name: &'static str,
    pub kind: ValueKind,
    pub get: FieldGetFn,
    pub set: FieldSetFn,
}

/// The authored link from a schema to its base-level schema.
///
/// `project` narrows an instance to the view the parent schema's accessors
/// expect (typically a nested struct holding the base-level fields), so
/// one base schema serves both standalone use and every type that chains
/// onto it, with identical bytes either way.
pub struct ParentLink {
    pub schema: &'static ClassSchema,
    pub project: fn(&dyn BinObject) -> &dyn BinObject,
    pub project_mut: fn(&mut dyn BinObject) -> &mut dyn BinObject,
}

/// The registered shape of one serializable type: its own fields plus an
/// optional parent link. Built once, referenced statically.
///
/// The parent chain terminates at `parent: None`; the codec walks it when
/// encoding or decoding the nested base-class sub-blocks.
pub struct ClassSchema {
    pub name: &'static str,
    pub parent: Option<ParentLink>,
    /// Builds a default instance, used when decoding a nested object field.
    pub construct: fn() -> Box<dyn BinObject>,
    pub fields: &'static [FieldSpec],
}

impl ClassSchema {
    pub fn field(&self, id: FieldId) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.id == id)
    }

    /// IDs declared more than once in this schema's own field table.
    ///
    /// Offered for authoring-time validation. The decoder does not need
    /// the table to be clean — duplicate index entries resolve
    /// deterministically to the first occurrence — but a duplicate is
    /// always an authoring mistake.
    pub fn duplicate_ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|spec| spec.id).duplicates().collect()
    }

    /// Length of the parent chain, this schema included.
    pub fn chain_depth(&self) -> usize {
        let mut depth = 1;
        let mut cur = self;
        while let Some(link) = &cur.parent {
            depth += 1;
            cur = link.schema;
        }
        depth
    }
}

impl fmt::Debug for ClassSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassSchema({})", self.name)
    }
}
