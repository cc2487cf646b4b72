//! Shapes and the closed set of shape kinds.

use std::fmt;

use crate::{ShapeId, Traits};

/// A named value of a string enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: String,
}

/// A named value of an integer enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntEnumValue {
    pub name: String,
    pub value: i32,
}

/// What a shape is. Aggregates refer to their members and targets by id.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Structure { members: Vec<ShapeId> },
    Union { members: Vec<ShapeId> },
    Enum { values: Vec<EnumValue> },
    IntEnum { values: Vec<IntEnumValue> },
    List { member: ShapeId },
    Map { key: ShapeId, value: ShapeId },
    String,
    Integer,
    Long,
    Short,
    Byte,
    Float,
    Double,
    BigInteger,
    BigDecimal,
    Boolean,
    Blob,
    Timestamp,
    Document,
    Member { target: ShapeId },
    Service {
        version: String,
        operations: Vec<ShapeId>,
        resources: Vec<ShapeId>,
    },
    Operation {
        input: Option<ShapeId>,
        output: Option<ShapeId>,
        errors: Vec<ShapeId>,
    },
    Resource {
        operations: Vec<ShapeId>,
        resources: Vec<ShapeId>,
    },
}

impl ShapeKind {
    /// Lowercase kind name as written in model files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Structure { .. } => "structure",
            ShapeKind::Union { .. } => "union",
            ShapeKind::Enum { .. } => "enum",
            ShapeKind::IntEnum { .. } => "intEnum",
            ShapeKind::List { .. } => "list",
            ShapeKind::Map { .. } => "map",
            ShapeKind::String => "string",
            ShapeKind::Integer => "integer",
            ShapeKind::Long => "long",
            ShapeKind::Short => "short",
            ShapeKind::Byte => "byte",
            ShapeKind::Float => "float",
            ShapeKind::Double => "double",
            ShapeKind::BigInteger => "bigInteger",
            ShapeKind::BigDecimal => "bigDecimal",
            ShapeKind::Boolean => "boolean",
            ShapeKind::Blob => "blob",
            ShapeKind::Timestamp => "timestamp",
            ShapeKind::Document => "document",
            ShapeKind::Member { .. } => "member",
            ShapeKind::Service { .. } => "service",
            ShapeKind::Operation { .. } => "operation",
            ShapeKind::Resource { .. } => "resource",
        }
    }

    /// Integral and floating point number kinds.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            ShapeKind::Integer
                | ShapeKind::Long
                | ShapeKind::Short
                | ShapeKind::Byte
                | ShapeKind::Float
                | ShapeKind::Double
                | ShapeKind::BigInteger
                | ShapeKind::BigDecimal
        )
    }

    /// Service, operation and resource shapes.
    pub fn is_service_like(&self) -> bool {
        matches!(
            self,
            ShapeKind::Service { .. } | ShapeKind::Operation { .. } | ShapeKind::Resource { .. }
        )
    }

    /// Every shape id this kind refers to, in declaration order.
    pub fn references(&self) -> Vec<&ShapeId> {
        match self {
            ShapeKind::Structure { members } | ShapeKind::Union { members } => {
                members.iter().collect()
            }
            ShapeKind::List { member } => vec![member],
            ShapeKind::Map { key, value } => vec![key, value],
            ShapeKind::Member { target } => vec![target],
            ShapeKind::Service {
                operations,
                resources,
                ..
            }
            | ShapeKind::Resource {
                operations,
                resources,
            } => operations.iter().chain(resources).collect(),
            ShapeKind::Operation {
                input,
                output,
                errors,
            } => input.iter().chain(output).chain(errors).collect(),
            ShapeKind::Enum { .. }
            | ShapeKind::IntEnum { .. }
            | ShapeKind::String
            | ShapeKind::Integer
            | ShapeKind::Long
            | ShapeKind::Short
            | ShapeKind::Byte
            | ShapeKind::Float
            | ShapeKind::Double
            | ShapeKind::BigInteger
            | ShapeKind::BigDecimal
            | ShapeKind::Boolean
            | ShapeKind::Blob
            | ShapeKind::Timestamp
            | ShapeKind::Document => Vec::new(),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the model graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    traits: Traits,
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            traits: Traits::default(),
        }
    }

    pub fn with_traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub(crate) fn kind_mut(&mut self) -> &mut ShapeKind {
        &mut self.kind
    }

    pub fn is_member(&self) -> bool {
        matches!(self.kind, ShapeKind::Member { .. })
    }

    /// Target of a member shape.
    pub fn member_target(&self) -> Option<&ShapeId> {
        match &self.kind {
            ShapeKind::Member { target } => Some(target),
            _ => None,
        }
    }
}
