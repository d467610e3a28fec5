//! Resource schema
//!
//! Declarative description of the `awx_project` resource: its attributes,
//! their types and defaults, the importer, and the operation deadlines.

use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::Operation;

/// Name under which the resource is exposed
pub const RESOURCE_NAME: &str = "awx_project";

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
    Int,
}

/// One attribute of the resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSchema {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
}

impl AttributeSchema {
    fn required(name: &'static str, kind: AttributeType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    fn optional(
        name: &'static str,
        kind: AttributeType,
        default: Option<Value>,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            default,
            description,
        }
    }
}

/// Fixed deadlines for the mutating operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResourceTimeouts {
    #[serde(with = "seconds")]
    pub create: Duration,
    #[serde(with = "seconds")]
    pub update: Duration,
    #[serde(with = "seconds")]
    pub delete: Duration,
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(60),
            update: Duration::from_secs(60),
            delete: Duration::from_secs(60),
        }
    }
}

impl ResourceTimeouts {
    /// Deadline for an operation; reads and imports run without one
    pub fn for_operation(&self, operation: Operation) -> Option<Duration> {
        match operation {
            Operation::Create => Some(self.create),
            Operation::Update => Some(self.update),
            Operation::Delete => Some(self.delete),
            Operation::Read | Operation::Import => None,
        }
    }
}

mod seconds {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}

/// Full resource schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSchema {
    pub name: &'static str,
    pub attributes: Vec<AttributeSchema>,
    pub importable: bool,
    pub timeouts: ResourceTimeouts,
}

impl ResourceSchema {
    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Schema of the project resource
pub fn project_schema() -> ResourceSchema {
    ResourceSchema {
        name: RESOURCE_NAME,
        attributes: vec![
            AttributeSchema::required("name", AttributeType::String, "Name of this project"),
            AttributeSchema::optional(
                "description",
                AttributeType::String,
                Some(json!("")),
                "Optional description of this project.",
            ),
            AttributeSchema::optional(
                "local_path",
                AttributeType::String,
                Some(json!("")),
                "Local path (relative to PROJECTS_ROOT) containing playbooks and related files for this project.",
            ),
            AttributeSchema::required("scm_type", AttributeType::String, "One of \"\" (manual), git, hg, svn"),
            AttributeSchema::optional("scm_url", AttributeType::String, Some(json!("")), ""),
            AttributeSchema::optional(
                "scm_branch",
                AttributeType::String,
                Some(json!("")),
                "Specific branch, tag or commit to checkout.",
            ),
            AttributeSchema::optional("scm_clean", AttributeType::Bool, Some(json!(false)), ""),
            AttributeSchema::optional("scm_delete_on_update", AttributeType::Bool, Some(json!(false)), ""),
            AttributeSchema::optional(
                "credential_id",
                AttributeType::String,
                None,
                "Id of the credential used to access the repository.",
            ),
            AttributeSchema::required(
                "organization_id",
                AttributeType::String,
                "Id of the organization owning this project.",
            ),
            AttributeSchema::optional("scm_update_on_launch", AttributeType::Bool, Some(json!(false)), ""),
            AttributeSchema::optional("scm_update_cache_timeout", AttributeType::Int, Some(json!(0)), ""),
        ],
        importable: true,
        timeouts: ResourceTimeouts::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::state::{ProjectAttributes, ProjectState};
    use serde_json::Map;

    #[test]
    fn test_required_attributes() {
        let schema = project_schema();
        let required: Vec<&str> = schema
            .attributes
            .iter()
            .filter(|a| a.required)
            .map(|a| a.name)
            .collect();
        assert_eq!(required, vec!["name", "scm_type", "organization_id"]);
    }

    #[test]
    fn test_schema_covers_every_state_field() {
        let schema = project_schema();
        let state = ProjectState {
            id: "1".to_string(),
            attributes: ProjectAttributes::new("p", Default::default(), 1),
        };
        let value = serde_json::to_value(&state).unwrap();

        for key in value.as_object().unwrap().keys().filter(|k| *k != "id") {
            assert!(schema.attribute(key).is_some(), "missing attribute {}", key);
        }
        assert_eq!(value.as_object().unwrap().len() - 1, schema.attributes.len());
    }

    #[test]
    fn test_defaults_match_deserialization_defaults() {
        let schema = project_schema();

        let mut document = Map::new();
        document.insert("name".to_string(), json!("p"));
        document.insert("scm_type".to_string(), json!("git"));
        document.insert("organization_id".to_string(), json!("1"));
        let attrs: ProjectAttributes = serde_json::from_value(Value::Object(document)).unwrap();
        let encoded = serde_json::to_value(&attrs).unwrap();

        for attribute in schema.attributes.iter().filter(|a| !a.required) {
            let expected = attribute.default.clone().unwrap_or(json!(""));
            assert_eq!(encoded[attribute.name], expected, "default of {}", attribute.name);
        }
    }

    #[test]
    fn test_timeouts_are_one_minute() {
        let timeouts = project_schema().timeouts;
        assert_eq!(timeouts.for_operation(Operation::Create), Some(Duration::from_secs(60)));
        assert_eq!(timeouts.for_operation(Operation::Update), Some(Duration::from_secs(60)));
        assert_eq!(timeouts.for_operation(Operation::Delete), Some(Duration::from_secs(60)));
        assert_eq!(timeouts.for_operation(Operation::Read), None);
    }
}
