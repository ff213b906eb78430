use std::fmt;
use std::sync::Arc;

use super::registry::ContextId;

/// Resolves the delivery channel for a calling context
#[derive(Clone)]
pub enum ChannelResolver {
    /// Every context broadcasts on the same channel
    Constant(String),
    /// The channel is derived from the calling context at broadcast time
    Resolver(Arc<dyn Fn(&ContextId) -> String + Send + Sync>),
}

impl ChannelResolver {
    pub fn resolve(&self, context: &ContextId) -> String {
        match self {
            ChannelResolver::Constant(channel) => channel.clone(),
            ChannelResolver::Resolver(resolver) => resolver(context),
        }
    }
}

impl fmt::Debug for ChannelResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelResolver::Constant(channel) => {
                f.debug_tuple("Constant").field(channel).finish()
            }
            ChannelResolver::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

/// Contains the broadcast-tunable settings effective for one calling
/// context.
///
/// A materialized configuration is an immutable snapshot from the caller's
/// perspective; it only changes through an explicit
/// [`ConfigRegistry::configure`](super::ConfigRegistry::configure) call.
#[derive(Clone, Debug)]
pub struct BroadcastConfig {
    /// Resolves the channel batches are delivered on
    pub channel: ChannelResolver,
    /// Template for per-attribute container elements; must contain the
    /// literal `RESOURCE` and `ATTRIBUTE` placeholders
    pub container_selector: String,
    /// Template for per-attribute error-display elements; must contain
    /// `RESOURCE` and `ATTRIBUTE`
    pub error_selector: String,
    /// Template for the form-level element; must contain `RESOURCE`
    pub form_selector: String,
    /// Template for the submit element; must contain `RESOURCE`
    pub submit_selector: String,
    /// Toggles CSS class operations on per-attribute containers
    pub add_css: bool,
    /// Class toggled on the form element while the model is invalid.
    /// An empty string disables the form-level class operations.
    pub form_class: String,
    /// Class toggled on an attribute's container element while invalid
    pub error_class: String,
    /// Toggles the `disabled` attribute on the submit element
    pub disable_submit: bool,
    /// Toggles DOM event dispatch operations, independently of the other
    /// feature toggles
    pub emit_events: bool,
    /// Toggles inline error-text injection
    pub inject_inline: bool,
    /// Appended to every rendered error message
    pub suffix: String,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            channel: ChannelResolver::Constant("FormcastChannel".to_string()),
            container_selector: "#RESOURCE_ATTRIBUTE_container".to_string(),
            error_selector: "#RESOURCE_ATTRIBUTE_error".to_string(),
            form_selector: "#RESOURCE_form".to_string(),
            submit_selector: "#RESOURCE_submit".to_string(),
            add_css: true,
            form_class: "invalid".to_string(),
            error_class: "error".to_string(),
            disable_submit: false,
            emit_events: false,
            inject_inline: true,
            suffix: String::new(),
        }
    }
}
