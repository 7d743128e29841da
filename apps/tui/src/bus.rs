use tokio::sync::broadcast;

const CAPACITY: usize = 32;

/// Messages views send each other without sharing state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMessage {
    /// Fit the map to the visible events, or back to the world view.
    ResetMapView,
    /// Open the details view for an event.
    ShowEvent(String),
    /// The facet vocabulary finished loading or failed.
    LookupsSettled,
}

/// Publish/subscribe channel between views.
#[derive(Debug, Clone)]
pub struct ViewBus {
    sender: broadcast::Sender<ViewMessage>,
}

impl Default for ViewBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CAPACITY);
        Self { sender }
    }

    /// Returns how many subscribers received the message.
    pub fn publish(&self, message: ViewMessage) -> usize {
        tracing::debug!(?message, "view message");
        self.sender.send(message).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewMessage> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_messages_sent_after_subscribing() {
        let bus = ViewBus::new();
        assert_eq!(bus.publish(ViewMessage::ResetMapView), 0);

        let mut map = bus.subscribe();
        let mut table = bus.subscribe();
        assert_eq!(bus.publish(ViewMessage::ShowEvent("demo-1".into())), 2);

        assert_eq!(map.try_recv().unwrap(), ViewMessage::ShowEvent("demo-1".into()));
        assert_eq!(table.try_recv().unwrap(), ViewMessage::ShowEvent("demo-1".into()));
        assert!(map.try_recv().is_err());
    }
}
