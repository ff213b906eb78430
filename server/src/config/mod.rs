mod configuration;
mod registry;

pub use configuration::{BroadcastConfig, ChannelResolver};
pub use registry::{ConfigRegistry, ContextId};
