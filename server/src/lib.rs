//! # Formcast Server
//! Broadcasts a model's validation state (including nested associations)
//! to subscribed clients as an ordered batch of UI patch operations over a
//! real-time channel, so a remote UI can toggle error styling and error
//! text without a page reload.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use formcast_shared::{
        association_name, AncestryPath, ErrorSet, OperationBatch, PatchOperation, PathSegment,
        SelectorKind, SelectorTemplate, TemplateError, NESTED_ATTRIBUTES_SUFFIX,
    };
}

mod broadcaster;
mod config;
mod error;
mod gateway;
mod model;
mod request;

pub use broadcaster::{BroadcastOptions, Broadcaster};
pub use config::{BroadcastConfig, ChannelResolver, ConfigRegistry, ContextId};
pub use error::BroadcastError;
pub use gateway::{GatewayError, LocalHub, TransportGateway};
pub use model::{Association, ValidatedModel};
pub use request::{AttributeRequest, AttributesInput, DisplayHint, RequestedAttributes};
