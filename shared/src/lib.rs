//! # Formcast Shared
//! Common functionality shared between the formcast-server broadcast engine
//! and client-side renderers of patch-operation batches.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod error_set;
mod operation;
mod resource;
mod selector;

pub use error_set::ErrorSet;
pub use operation::{OperationBatch, PatchOperation};
pub use resource::{
    association_name, AncestryPath, PathSegment, NESTED_ATTRIBUTES_SUFFIX,
};
pub use selector::{
    SelectorKind, SelectorTemplate, TemplateError, ATTRIBUTE_PLACEHOLDER, RESOURCE_PLACEHOLDER,
};
