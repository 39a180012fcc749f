use std::sync::Arc;

use tracing::info;

use crate::models::{EditingAction, EditingStateMessage, ServerMessage};
use crate::ws::registry::ChannelRegistry;

/// Broadcasts ephemeral "user started/stopped editing" events to a note's
/// subscribers. Nothing is persisted and no snapshot is kept, so a
/// subscriber joining mid-edit learns nothing until the next event.
pub struct PresenceNotifier {
    registry: Arc<ChannelRegistry>,
}

impl PresenceNotifier {
    pub fn new(registry: Arc<ChannelRegistry>) -> Self {
        Self { registry }
    }

    pub fn start_editing(&self, note_id: &str, user_id: &str) {
        self.notify(note_id, user_id, EditingAction::Start);
    }

    pub fn stop_editing(&self, note_id: &str, user_id: &str) {
        self.notify(note_id, user_id, EditingAction::Stop);
    }

    // Does not verify the note exists; the channel simply has no
    // subscribers when nobody is looking at it.
    fn notify(&self, note_id: &str, user_id: &str, action: EditingAction) {
        let attempts = self.registry.broadcast(
            note_id,
            ServerMessage::EditingState(EditingStateMessage {
                user_id: user_id.to_string(),
                action,
            }),
            None,
        );
        info!(
            "Editing {:?} by user {} on note {} sent to {} subscriber(s)",
            action, user_id, note_id, attempts
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn start_then_stop_delivers_two_distinct_events() {
        let registry = Arc::new(ChannelRegistry::new());
        let notifier = PresenceNotifier::new(registry.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        registry.register(&"conn-a".to_string(), tx);
        registry.join("note-1", &"conn-a".to_string());

        notifier.start_editing("note-1", "userA");
        notifier.stop_editing("note-1", "userA");

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(
            first,
            ServerMessage::EditingState(EditingStateMessage {
                user_id: "userA".to_string(),
                action: EditingAction::Start,
            })
        );
        assert_eq!(
            second,
            ServerMessage::EditingState(EditingStateMessage {
                user_id: "userA".to_string(),
                action: EditingAction::Stop,
            })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn late_joiner_sees_no_lingering_presence() {
        let registry = Arc::new(ChannelRegistry::new());
        let notifier = PresenceNotifier::new(registry.clone());

        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        registry.register(&"conn-a".to_string(), tx_a);
        registry.join("note-1", &"conn-a".to_string());

        notifier.start_editing("note-1", "userA");
        assert!(rx_a.try_recv().is_ok());

        // B joins while userA is still "editing" and receives nothing.
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        registry.register(&"conn-b".to_string(), tx_b);
        registry.join("note-1", &"conn-b".to_string());
        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn presence_for_note_without_subscribers_is_dropped() {
        let registry = Arc::new(ChannelRegistry::new());
        let notifier = PresenceNotifier::new(registry);
        // Note existence is never checked.
        notifier.start_editing("note-nobody-reads", "userA");
    }
}
