use serde::{Deserialize, Serialize};

/// A single UI patch instruction, applied by a client renderer in batch
/// order.
///
/// Every kind except [`PatchOperation::DispatchEvent`] carries the selector
/// of its target element. Renderers skip operations whose target element is
/// absent from the document; a missing element is never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PatchOperation {
    /// Add a CSS class to the matched element
    AddClass { selector: String, class: String },

    /// Remove a CSS class from the matched element
    RemoveClass { selector: String, class: String },

    /// Replace the text content of the matched element
    SetText { selector: String, text: String },

    /// Set a boolean attribute on the matched element
    SetAttribute { selector: String, name: String },

    /// Clear a boolean attribute on the matched element
    RemoveAttribute { selector: String, name: String },

    /// Dispatch a DOM CustomEvent with the given name and detail payload
    DispatchEvent {
        name: String,
        detail: serde_json::Value,
    },
}

/// An ordered sequence of patch operations produced within one broadcast
/// invocation.
///
/// A batch is delivered to all current subscribers of `channel` as one
/// message, exactly once per invocation. It is never partially flushed: the
/// transport gateway only sees a batch after the entire tree walk and the
/// form-level summary have completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationBatch {
    channel: String,
    operations: Vec<PatchOperation>,
}

impl OperationBatch {
    /// Creates an empty batch bound to the given delivery channel
    pub fn new(channel: &str) -> Self {
        Self {
            channel: channel.to_string(),
            operations: Vec::new(),
        }
    }

    /// The channel this batch will be delivered on
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Appends an operation, preserving traversal order
    pub fn push(&mut self, operation: PatchOperation) {
        self.operations.push(operation);
    }

    /// The accumulated operations, in emission order
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
