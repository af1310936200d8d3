use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Mapping metadata aggregated across one or more code packages.
///
/// `package_names` tracks which groups have been merged; `structs` keeps every
/// merged record in merge order, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingMetadata {
    #[serde(default)]
    pub package_names: BTreeSet<String>,
    #[serde(default)]
    pub structs: Vec<StructMetadata>,
}

impl MappingMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_package(&self, group_name: &str) -> bool {
        self.package_names.contains(group_name)
    }

    /// Registers `group_name` and appends `other`'s structs to this aggregate.
    pub fn merge_group(&mut self, group_name: &str, other: MappingMetadata) {
        self.package_names.insert(group_name.to_string());
        self.structs.extend(other.structs);
    }

    pub fn find_struct(&self, type_name: &str) -> Option<&StructMetadata> {
        self.structs.iter().find(|s| s.type_name == type_name)
    }

    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }
}

/// Field layout of one mapped database struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructMetadata {
    pub type_name: String,
    pub class_name: String,
    #[serde(default)]
    pub fields: Vec<FieldMetadata>,
}

impl StructMetadata {
    pub fn new(type_name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            class_name: class_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldMetadata) -> Self {
        self.fields.push(field);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub name: String,
    pub column: String,
    pub data_type: String,
    /// Nested struct type when the column holds a composite value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub struct_type: Option<String>,
}

impl FieldMetadata {
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            data_type: data_type.into(),
            struct_type: None,
        }
    }

    pub fn nested(mut self, struct_type: impl Into<String>) -> Self {
        self.struct_type = Some(struct_type.into());
        self
    }
}
