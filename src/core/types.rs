use std::fmt;

use serde::{Deserialize, Serialize};

use crate::connection::ConnectionHandle;

/// Which kind of catalog type a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptorKind {
    Struct,
    Array,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptorKind::Struct => write!(f, "struct"),
            DescriptorKind::Array => write!(f, "array"),
        }
    }
}

/// One attribute of a composite type, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    pub name: String,
    pub type_name: String,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<i32>,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            length: None,
            precision: None,
            scale: None,
        }
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn numeric(mut self, precision: u32, scale: i32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }
}

/// Catalog definition produced by a source connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptorPayload {
    Struct {
        attributes: Vec<AttributeDescriptor>,
    },
    Array {
        element_type: String,
        max_length: Option<u32>,
    },
}

impl DescriptorPayload {
    pub fn kind(&self) -> DescriptorKind {
        match self {
            DescriptorPayload::Struct { .. } => DescriptorKind::Struct,
            DescriptorPayload::Array { .. } => DescriptorKind::Array,
        }
    }
}

/// A resolved struct or array type definition.
///
/// The bound connection is never serialized; descriptors read back from disk
/// come out unbound and must be rebound before use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    type_name: String,
    payload: DescriptorPayload,
    #[serde(skip)]
    connection: Option<ConnectionHandle>,
}

impl TypeDescriptor {
    pub fn new(type_name: impl Into<String>, payload: DescriptorPayload) -> Self {
        Self {
            type_name: type_name.into(),
            payload,
            connection: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> DescriptorKind {
        self.payload.kind()
    }

    pub fn payload(&self) -> &DescriptorPayload {
        &self.payload
    }

    pub fn connection(&self) -> Option<&ConnectionHandle> {
        self.connection.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.connection.is_some()
    }

    /// Rebinds this descriptor to `connection`, replacing any previous binding.
    pub fn bind(&mut self, connection: &ConnectionHandle) {
        self.connection = Some(connection.clone());
    }

    /// Attributes of a struct descriptor, empty for arrays.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        match &self.payload {
            DescriptorPayload::Struct { attributes } => attributes,
            DescriptorPayload::Array { .. } => &[],
        }
    }

    /// Element type name of an array descriptor.
    pub fn element_type(&self) -> Option<&str> {
        match &self.payload {
            DescriptorPayload::Array { element_type, .. } => Some(element_type),
            DescriptorPayload::Struct { .. } => None,
        }
    }
}
