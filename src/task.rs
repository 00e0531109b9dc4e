use serde::{Deserialize, Serialize};

/// A single todo entry. Which board list holds it (pending or done) is the
/// authoritative status; `done` mirrors it in the persisted format and
/// `editing` is a transient UI flag carried along for format compatibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub editing: bool,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            done: false,
            editing: false,
        }
    }
}
