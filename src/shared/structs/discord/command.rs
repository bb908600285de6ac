use serde::{Deserialize, Serialize};

/// Slash-command schema as the platform expects it on registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<serde_json::Value>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        CommandDescriptor {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }
}
