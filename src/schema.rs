use std::fmt;

/// The wire kind of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    /// Raw text bytes; the length always comes from an annotation.
    String,
    /// Raw bytes; the length always comes from an annotation.
    ByteSequence,
    /// A nested record, written inline.
    Record,
    /// Nested records concatenated back to back. The annotation gives the
    /// byte length of the whole region, not the element count.
    RecordSequence,
    /// A sequence whose element kind has no codec.
    Sequence,
}

impl Kind {
    /// Returns the encoded width of fixed-width kinds.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Kind::Bool | Kind::Int8 | Kind::UInt8 => Some(1),
            Kind::Int16 | Kind::UInt16 => Some(2),
            Kind::Int32 | Kind::UInt32 | Kind::Float32 => Some(4),
            Kind::Int64 | Kind::UInt64 | Kind::Float64 => Some(8),
            Kind::String
            | Kind::ByteSequence
            | Kind::Record
            | Kind::RecordSequence
            | Kind::Sequence => None,
        }
    }

    /// Whether a field of this kind needs an externally supplied size.
    pub const fn is_variable_length(self) -> bool {
        matches!(
            self,
            Kind::String | Kind::ByteSequence | Kind::RecordSequence | Kind::Sequence
        )
    }

    /// The kind of a sequence whose elements are of kind `element`.
    pub const fn sequence_of(element: Kind) -> Kind {
        match element {
            Kind::UInt8 => Kind::ByteSequence,
            Kind::Record => Kind::RecordSequence,
            _ => Kind::Sequence,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Bool => "bool",
            Kind::Int8 => "int8",
            Kind::Int16 => "int16",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::UInt8 => "uint8",
            Kind::UInt16 => "uint16",
            Kind::UInt32 => "uint32",
            Kind::UInt64 => "uint64",
            Kind::Float32 => "float32",
            Kind::Float64 => "float64",
            Kind::String => "string",
            Kind::ByteSequence => "byte sequence",
            Kind::Record => "record",
            Kind::RecordSequence => "record sequence",
            Kind::Sequence => "sequence",
        };
        f.write_str(name)
    }
}

/// A by-name reference from one field to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    /// Name of the referenced field.
    pub name: &'static str,
    /// Position of the referenced field when it is a sibling in the same
    /// record. `None` means the name is looked up in enclosing records.
    pub sibling: Option<usize>,
}

impl FieldRef {
    /// A reference to the sibling declared at position `index`.
    pub const fn sibling(name: &'static str, index: usize) -> Self {
        FieldRef {
            name,
            sibling: Some(index),
        }
    }

    /// A reference resolved by name in the enclosing records.
    pub const fn enclosing(name: &'static str) -> Self {
        FieldRef {
            name,
            sibling: None,
        }
    }
}

/// The size relationship declared on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Annotation {
    /// Fixed-width scalar or inline record.
    #[default]
    None,
    /// Decode side: the referenced field holds this field's byte count.
    SizeRef(FieldRef),
    /// This field always spans exactly this many bytes.
    FixedSize(usize),
    /// Encode side: this field is a length prefix, computed from the
    /// serialized size of the referenced sibling.
    PayloadOf(FieldRef),
}

/// Static metadata describing one field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as written in the record type.
    pub name: &'static str,
    pub kind: Kind,
    pub annotation: Annotation,
}

impl FieldDescriptor {
    /// Creates a descriptor. Used by the derive to build `FIELDS` tables.
    pub const fn new(name: &'static str, kind: Kind, annotation: Annotation) -> Self {
        FieldDescriptor {
            name,
            kind,
            annotation,
        }
    }
}
