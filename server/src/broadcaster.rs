use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use serde_json::json;

use formcast_shared::{
    association_name, AncestryPath, ErrorSet, OperationBatch, PatchOperation, PathSegment,
    SelectorTemplate, NESTED_ATTRIBUTES_SUFFIX,
};

use crate::{
    config::{BroadcastConfig, ConfigRegistry, ContextId},
    error::BroadcastError,
    gateway::TransportGateway,
    model::{Association, ValidatedModel},
    request::{AttributeRequest, AttributesInput, DisplayHint, RequestedAttributes},
};

/// Suffix marking a displayed foreign-key field (`author_id`) whose error
/// may be recorded against the logical association name (`author`)
const ID_REFERENCE_SUFFIX: &str = "_id";

/// Per-invocation tuning accepted by [`Broadcaster::broadcast_errors`]
#[derive(Debug, Clone, Default)]
pub struct BroadcastOptions {
    reversed: HashSet<String>,
    overrides: HashMap<String, DisplayHint>,
}

impl BroadcastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates the named collection association in reverse index order
    /// before recursing
    pub fn reverse_association(mut self, association: &str) -> Self {
        self.reversed.insert(association.to_string());
        self
    }

    /// Display hint for a leaf attribute, applied wherever the requested
    /// set itself carries no hint for that attribute
    pub fn override_display(mut self, attribute: &str, hint: DisplayHint) -> Self {
        self.overrides.insert(attribute.to_string(), hint);
        self
    }
}

// Broadcaster

/// The resource/attribute error-broadcast engine.
///
/// One [`broadcast_errors`](Broadcaster::broadcast_errors) call walks the
/// model and its requested nested associations depth-first, derives
/// addressable element identifiers for each visited attribute, accumulates
/// the resulting patch operations in traversal order, appends exactly one
/// form-level summary, and flushes the whole batch to the transport
/// gateway as a single atomic delivery. Nothing is sent on failure.
pub struct Broadcaster<G: TransportGateway> {
    registry: Arc<ConfigRegistry>,
    gateway: G,
}

impl<G: TransportGateway> Broadcaster<G> {
    pub fn new(registry: Arc<ConfigRegistry>, gateway: G) -> Self {
        Self { registry, gateway }
    }

    /// The configuration registry consulted on every invocation
    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Broadcasts the model's validation state for the requested
    /// attributes to all subscribers of the context's channel.
    ///
    /// If the model's error set is empty at entry, `validate()` runs once
    /// before traversal. A model already holding errors is broadcast
    /// as-is; stale errors from an earlier validation pass leak into the
    /// batch. Callers relying on fresh results must clear the error set
    /// first.
    pub fn broadcast_errors(
        &self,
        context: &ContextId,
        model: &mut dyn ValidatedModel,
        attributes: impl Into<AttributesInput>,
        options: &BroadcastOptions,
    ) -> Result<(), BroadcastError> {
        // Reject malformed input before validation or traversal.
        let requested = attributes.into().normalize()?;

        let config = self.registry.resolve(context);
        let channel = config.channel.resolve(context);

        if model.errors().is_empty() {
            model.validate();
        }
        let model: &dyn ValidatedModel = model;

        let mut walker = Walker {
            config: &config,
            options,
            batch: OperationBatch::new(&channel),
        };
        walker.walk(model, &requested, &AncestryPath::root(model.model_name()))?;
        walker.form_summary(model)?;

        let batch = walker.batch;
        debug!(
            "broadcasting {} operations on channel {channel:?}",
            batch.len()
        );
        self.gateway.deliver(&channel, batch)?;
        Ok(())
    }
}

// Walker

/// Traversal state for one broadcast invocation. Owns the accumulating
/// batch; nothing is visible to the gateway until the walk and the
/// form-level summary have both completed.
struct Walker<'a> {
    config: &'a BroadcastConfig,
    options: &'a BroadcastOptions,
    batch: OperationBatch,
}

impl Walker<'_> {
    fn walk(
        &mut self,
        model: &dyn ValidatedModel,
        requested: &RequestedAttributes,
        ancestry: &AncestryPath,
    ) -> Result<(), BroadcastError> {
        for (key, request) in requested.iter() {
            if let Some(association) = association_name(key) {
                let nested = match request {
                    AttributeRequest::Branch(nested) => Some(nested),
                    // A branch key requested as a leaf carries no nested
                    // set: nothing beneath it was requested.
                    AttributeRequest::Leaf(_) => None,
                };
                self.walk_branch(model, association, nested, ancestry)?;
            } else {
                match request {
                    AttributeRequest::Leaf(hint) => {
                        self.process_attribute(model, key, hint, ancestry)?;
                    }
                    AttributeRequest::Branch(_) => {
                        return Err(BroadcastError::InvalidAttributes {
                            reason: format!(
                                "branch key {key:?} does not end with {NESTED_ATTRIBUTES_SUFFIX:?}"
                            ),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn walk_branch(
        &mut self,
        model: &dyn ValidatedModel,
        association: &str,
        nested: Option<&RequestedAttributes>,
        ancestry: &AncestryPath,
    ) -> Result<(), BroadcastError> {
        let resolved = model.association(association).ok_or_else(|| {
            BroadcastError::AssociationNotFound {
                model: model.model_name().to_string(),
                association: association.to_string(),
            }
        })?;

        match resolved {
            Association::Singular(child) => {
                if let Some(nested) = nested {
                    let child_ancestry = ancestry.child(PathSegment::singular(association));
                    self.walk(child, nested, &child_ancestry)?;
                }
            }
            Association::Collection(children) => {
                let Some(nested) = nested else {
                    return Ok(());
                };

                let mut indices: Vec<usize> = (0..children.len()).collect();
                if self.options.reversed.contains(association) {
                    indices.reverse();
                }

                // Only indices present in the nested requested set are
                // visited; unrequested indices are absent from the batch.
                for index in indices {
                    let Some(request) = nested.get(&index.to_string()) else {
                        continue;
                    };
                    let child_requested = match request {
                        AttributeRequest::Branch(requested) => requested,
                        AttributeRequest::Leaf(_) => {
                            return Err(BroadcastError::InvalidAttributes {
                                reason: format!(
                                    "collection index {index} under {association:?} must map to a nested attribute map"
                                ),
                            });
                        }
                    };
                    let child_ancestry =
                        ancestry.child(PathSegment::indexed(association, index));
                    self.walk(children[index], child_requested, &child_ancestry)?;
                }
            }
        }
        Ok(())
    }

    fn process_attribute(
        &mut self,
        model: &dyn ValidatedModel,
        attribute: &str,
        hint: &DisplayHint,
        ancestry: &AncestryPath,
    ) -> Result<(), BroadcastError> {
        let resource = ancestry.resource_name();
        let errors = model.errors();

        // Foreign-key alias: a displayed "_id" field surfaces an error
        // recorded against its logical association name. The alias is a
        // fallback; errors on the suffixed key itself win.
        let message = errors.first_message(attribute).or_else(|| {
            attribute
                .strip_suffix(ID_REFERENCE_SUFFIX)
                .and_then(|base| errors.first_message(base))
        });

        let hint = self.effective_hint(attribute, hint);

        if let Some(raw) = message {
            let labeled = match hint {
                DisplayHint::Override(label) if !label.is_empty() => format!("{label} {raw}"),
                DisplayHint::Suppressed => raw.to_string(),
                _ => ErrorSet::full_message(attribute, raw),
            };
            let text = collapse_whitespace(&format!("{labeled}{}", self.config.suffix));

            if self.config.emit_events {
                self.batch.push(PatchOperation::DispatchEvent {
                    name: "formcast:attribute:invalid".to_string(),
                    detail: json!({
                        "resource": resource,
                        "attribute": attribute,
                        "text": text,
                    }),
                });
            }
            if self.config.add_css {
                let selector = self.container_selector(&resource, attribute)?;
                self.batch.push(PatchOperation::AddClass {
                    selector,
                    class: self.config.error_class.clone(),
                });
            }
            if self.config.inject_inline {
                let selector = self.error_selector(&resource, attribute)?;
                self.batch.push(PatchOperation::SetText { selector, text });
            }
        } else {
            if self.config.emit_events {
                self.batch.push(PatchOperation::DispatchEvent {
                    name: "formcast:attribute:valid".to_string(),
                    detail: json!({
                        "resource": resource,
                        "attribute": attribute,
                    }),
                });
            }
            if self.config.add_css {
                let selector = self.container_selector(&resource, attribute)?;
                self.batch.push(PatchOperation::RemoveClass {
                    selector,
                    class: self.config.error_class.clone(),
                });
            }
            if self.config.inject_inline {
                let selector = self.error_selector(&resource, attribute)?;
                self.batch.push(PatchOperation::SetText {
                    selector,
                    text: String::new(),
                });
            }
        }
        Ok(())
    }

    /// Exactly one form-level summary per invocation, after all
    /// per-attribute operations. Keyed off whether the root model holds
    /// ANY error, not just errors on requested attributes.
    fn form_summary(&mut self, model: &dyn ValidatedModel) -> Result<(), BroadcastError> {
        let resource = AncestryPath::root(model.model_name()).resource_name();

        if model.errors().any() {
            if self.config.emit_events {
                self.batch.push(PatchOperation::DispatchEvent {
                    name: "formcast:form:invalid".to_string(),
                    detail: json!({ "resource": resource }),
                });
            }
            if !self.config.form_class.is_empty() {
                let selector = self.form_selector(&resource)?;
                self.batch.push(PatchOperation::AddClass {
                    selector,
                    class: self.config.form_class.clone(),
                });
            }
            if self.config.disable_submit {
                let selector = self.submit_selector(&resource)?;
                self.batch.push(PatchOperation::SetAttribute {
                    selector,
                    name: "disabled".to_string(),
                });
            }
        } else {
            if self.config.emit_events {
                self.batch.push(PatchOperation::DispatchEvent {
                    name: "formcast:form:valid".to_string(),
                    detail: json!({ "resource": resource }),
                });
            }
            if !self.config.form_class.is_empty() {
                let selector = self.form_selector(&resource)?;
                self.batch.push(PatchOperation::RemoveClass {
                    selector,
                    class: self.config.form_class.clone(),
                });
            }
            if self.config.disable_submit {
                let selector = self.submit_selector(&resource)?;
                self.batch.push(PatchOperation::RemoveAttribute {
                    selector,
                    name: "disabled".to_string(),
                });
            }
        }
        Ok(())
    }

    fn effective_hint(&self, attribute: &str, requested: &DisplayHint) -> DisplayHint {
        if *requested != DisplayHint::Default {
            return requested.clone();
        }
        self.options
            .overrides
            .get(attribute)
            .cloned()
            .unwrap_or_default()
    }

    fn container_selector(
        &self,
        resource: &str,
        attribute: &str,
    ) -> Result<String, BroadcastError> {
        let selector = SelectorTemplate::container(&self.config.container_selector)
            .render_selector(resource, Some(attribute))?;
        Ok(selector)
    }

    fn error_selector(&self, resource: &str, attribute: &str) -> Result<String, BroadcastError> {
        let selector = SelectorTemplate::error(&self.config.error_selector)
            .render_selector(resource, Some(attribute))?;
        Ok(selector)
    }

    fn form_selector(&self, resource: &str) -> Result<String, BroadcastError> {
        let selector =
            SelectorTemplate::form(&self.config.form_selector).render_selector(resource, None)?;
        Ok(selector)
    }

    fn submit_selector(&self, resource: &str) -> Result<String, BroadcastError> {
        let selector = SelectorTemplate::submit(&self.config.submit_selector)
            .render_selector(resource, None)?;
        Ok(selector)
    }
}

/// Collapses redundant interior whitespace and trims the ends, so label
/// overrides and suffixes never produce doubled spaces
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
