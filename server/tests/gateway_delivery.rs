use formcast_server::shared::{OperationBatch, PatchOperation};
use formcast_server::{LocalHub, TransportGateway};

fn batch_with_text(channel: &str, text: &str) -> OperationBatch {
    let mut batch = OperationBatch::new(channel);
    batch.push(PatchOperation::SetText {
        selector: "#order_name_error".to_string(),
        text: text.to_string(),
    });
    batch
}

#[test]
fn test_each_subscriber_receives_each_batch_once_in_order() {
    let hub = LocalHub::new();
    let first = hub.subscribe("FormcastChannel");
    let second = hub.subscribe("FormcastChannel");

    hub.deliver("FormcastChannel", batch_with_text("FormcastChannel", "a"))
        .expect("delivery succeeds");
    hub.deliver("FormcastChannel", batch_with_text("FormcastChannel", "b"))
        .expect("delivery succeeds");

    for receiver in [&first, &second] {
        let batches: Vec<OperationBatch> = receiver.try_iter().collect();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0], batch_with_text("FormcastChannel", "a"));
        assert_eq!(batches[1], batch_with_text("FormcastChannel", "b"));
    }
}

#[test]
fn test_channels_are_isolated() {
    let hub = LocalHub::new();
    let orders = hub.subscribe("OrdersChannel");
    let users = hub.subscribe("UsersChannel");

    hub.deliver("OrdersChannel", batch_with_text("OrdersChannel", "a"))
        .expect("delivery succeeds");

    assert_eq!(orders.try_iter().count(), 1);
    assert_eq!(users.try_iter().count(), 0);
}

#[test]
fn test_disconnected_subscribers_are_pruned() {
    let hub = LocalHub::new();
    let kept = hub.subscribe("FormcastChannel");
    let dropped = hub.subscribe("FormcastChannel");
    drop(dropped);

    hub.deliver("FormcastChannel", batch_with_text("FormcastChannel", "a"))
        .expect("delivery tolerates disconnected subscribers");

    assert_eq!(hub.subscriber_count("FormcastChannel"), 1);
    assert_eq!(kept.try_iter().count(), 1);
}

#[test]
fn test_delivery_without_subscribers_is_a_noop() {
    let hub = LocalHub::new();

    let result = hub.deliver("FormcastChannel", batch_with_text("FormcastChannel", "a"));

    assert!(result.is_ok());
}
