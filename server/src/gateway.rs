use std::collections::HashMap;
use std::sync::RwLock;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, warn};
use thiserror::Error;

use formcast_shared::OperationBatch;

/// Errors that can occur delivering a batch through a transport gateway
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The gateway could not deliver the batch as a whole
    #[error("delivery failed on channel {channel:?}: {reason}")]
    DeliveryFailed { channel: String, reason: String },
}

/// Boundary to the real-time transport.
///
/// An implementation accepts an ordered batch and a channel identifier and
/// delivers the batch as one message to all current subscribers of that
/// channel, or fails as a whole. Partial-delivery semantics are the
/// gateway's concern; the engine never retries or splits a batch.
pub trait TransportGateway {
    fn deliver(&self, channel: &str, batch: OperationBatch) -> Result<(), GatewayError>;
}

// LocalHub

/// In-process reference gateway: fans each batch out to channel
/// subscribers over crossbeam channels.
///
/// Suitable for tests and single-process hosts. Subscribers whose
/// receiving end has been dropped are pruned on the next delivery.
#[derive(Default)]
pub struct LocalHub {
    subscribers: RwLock<HashMap<String, Vec<Sender<OperationBatch>>>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to a channel; the receiver yields whole batches in
    /// delivery order
    pub fn subscribe(&self, channel: &str) -> Receiver<OperationBatch> {
        let (sender, receiver) = unbounded();
        let mut subscribers = self.subscribers.write().expect("hub lock poisoned");
        subscribers
            .entry(channel.to_string())
            .or_default()
            .push(sender);
        receiver
    }

    /// Number of live subscribers on a channel
    pub fn subscriber_count(&self, channel: &str) -> usize {
        let subscribers = self.subscribers.read().expect("hub lock poisoned");
        subscribers
            .get(channel)
            .map(|senders| senders.len())
            .unwrap_or(0)
    }
}

impl TransportGateway for LocalHub {
    fn deliver(&self, channel: &str, batch: OperationBatch) -> Result<(), GatewayError> {
        let mut subscribers = self.subscribers.write().expect("hub lock poisoned");
        let Some(senders) = subscribers.get_mut(channel) else {
            debug!(
                "no subscribers on channel {channel:?}, dropping batch of {} operations",
                batch.len()
            );
            return Ok(());
        };

        senders.retain(|sender| match sender.send(batch.clone()) {
            Ok(()) => true,
            Err(_) => {
                warn!("pruning disconnected subscriber on channel {channel:?}");
                false
            }
        });
        Ok(())
    }
}
