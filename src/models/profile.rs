// file: src/models/profile.rs
// Profile bodies are owned by the server; the client only displays and edits
// top-level scalar fields.
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const HIDDEN_FIELDS: &[&str] = &["_id", "__v", "password"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(pub Value);

impl Profile {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Top-level fields rendered as text, sorted by key. Nested values and
    /// internal fields are skipped.
    pub fn display_fields(&self) -> Vec<(String, String)> {
        let Some(object) = self.0.as_object() else {
            return Vec::new();
        };
        let mut fields: Vec<(String, String)> = object
            .iter()
            .filter(|(key, _)| !HIDDEN_FIELDS.contains(&key.as_str()))
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((key.clone(), text))
            })
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
    }

    /// Body for `PUT /profile` carrying only the given field changes.
    pub fn update_body(changes: &[(&str, &str)]) -> Value {
        let mut map = Map::new();
        for (key, value) in changes {
            map.insert((*key).to_string(), Value::String((*value).to_string()));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn new<S: Into<String>>(current_password: S, new_password: S) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
        }
    }

    /// Client-side checks before anything is sent; strength rules stay on
    /// the server.
    pub fn validate(&self, confirmation: &str) -> AppResult<()> {
        if self.current_password.is_empty() {
            return Err(AppError::invalid_input("Current password is required"));
        }
        if self.new_password.is_empty() {
            return Err(AppError::invalid_input("New password is required"));
        }
        if self.new_password != confirmation {
            return Err(AppError::invalid_input("New passwords do not match"));
        }
        Ok(())
    }
}
