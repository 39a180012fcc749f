use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::models::ServerMessage;

/// Unique id of one live websocket connection.
pub type SubscriberId = String;

struct Subscriber {
    tx: UnboundedSender<ServerMessage>,
    // Channels this connection has joined, so disconnect can leave them all.
    channels: HashSet<String>,
}

#[derive(Default)]
struct RegistryInner {
    channels: HashMap<String, HashSet<SubscriberId>>,
    subscribers: HashMap<SubscriberId, Subscriber>,
}

/// Maps note ids to the set of connections currently subscribed to them.
///
/// Created once at startup and shared through `AppState`. All mutations take
/// the inner mutex for a short, bounded section; fan-out sends happen on a
/// snapshot taken under the lock, never while holding it.
pub struct ChannelRegistry {
    inner: Mutex<RegistryInner>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Track a newly established connection and its outbound queue.
    pub fn register(&self, subscriber_id: &SubscriberId, tx: UnboundedSender<ServerMessage>) {
        let mut inner = self.inner.lock().unwrap();
        inner.subscribers.insert(
            subscriber_id.clone(),
            Subscriber {
                tx,
                channels: HashSet::new(),
            },
        );
        info!("Subscriber {} registered", subscriber_id);
    }

    /// Add a subscriber to a channel. Idempotent; creates the channel entry
    /// if absent. Ignored for connections that were never registered.
    pub fn join(&self, channel_id: &str, subscriber_id: &SubscriberId) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.subscribers.contains_key(subscriber_id) {
            debug!(
                "Ignoring join of unknown subscriber {} to channel {}",
                subscriber_id, channel_id
            );
            return;
        }
        inner
            .channels
            .entry(channel_id.to_string())
            .or_default()
            .insert(subscriber_id.clone());
        if let Some(sub) = inner.subscribers.get_mut(subscriber_id) {
            sub.channels.insert(channel_id.to_string());
        }
        info!("Subscriber {} joined channel {}", subscriber_id, channel_id);
    }

    /// Remove a subscriber from a channel. A no-op when either side is
    /// unknown. Empty channels are dropped from the map.
    pub fn leave(&self, channel_id: &str, subscriber_id: &SubscriberId) {
        let mut inner = self.inner.lock().unwrap();
        let now_empty = match inner.channels.get_mut(channel_id) {
            Some(members) => {
                members.remove(subscriber_id);
                members.is_empty()
            }
            None => false,
        };
        if now_empty {
            inner.channels.remove(channel_id);
        }
        if let Some(sub) = inner.subscribers.get_mut(subscriber_id) {
            sub.channels.remove(channel_id);
        }
        info!("Subscriber {} left channel {}", subscriber_id, channel_id);
    }

    /// Drop a connection and remove it from every channel it joined.
    /// Safe to call more than once.
    pub fn unregister(&self, subscriber_id: &SubscriberId) {
        let mut inner = self.inner.lock().unwrap();
        let Some(sub) = inner.subscribers.remove(subscriber_id) else {
            return;
        };
        for channel_id in sub.channels {
            let now_empty = match inner.channels.get_mut(&channel_id) {
                Some(members) => {
                    members.remove(subscriber_id);
                    members.is_empty()
                }
                None => false,
            };
            if now_empty {
                inner.channels.remove(&channel_id);
            }
        }
        info!("Subscriber {} unregistered", subscriber_id);
    }

    /// Deliver `msg` to every current subscriber of `channel_id`, except the
    /// optionally excluded one. Delivery is best-effort: a send failure means
    /// the connection is already gone and is ignored. Returns the number of
    /// delivery attempts.
    pub fn broadcast(
        &self,
        channel_id: &str,
        msg: ServerMessage,
        exclude: Option<&SubscriberId>,
    ) -> usize {
        // Snapshot the senders under the lock, deliver outside it.
        let targets: Vec<(SubscriberId, UnboundedSender<ServerMessage>)> = {
            let inner = self.inner.lock().unwrap();
            match inner.channels.get(channel_id) {
                Some(members) => members
                    .iter()
                    .filter(|id| exclude != Some(*id))
                    .filter_map(|id| {
                        inner
                            .subscribers
                            .get(id)
                            .map(|sub| (id.clone(), sub.tx.clone()))
                    })
                    .collect(),
                None => Vec::new(),
            }
        };

        let mut attempts = 0;
        for (subscriber_id, tx) in targets {
            attempts += 1;
            if tx.send(msg.clone()).is_err() {
                debug!(
                    "Dropping message for disconnected subscriber {} on channel {}",
                    subscriber_id, channel_id
                );
            }
        }
        attempts
    }

    pub fn channel_count(&self) -> usize {
        self.inner.lock().unwrap().channels.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    /// Current members of a channel, empty when the channel does not exist.
    pub fn subscribers_of(&self, channel_id: &str) -> HashSet<SubscriberId> {
        self.inner
            .lock()
            .unwrap()
            .channels
            .get(channel_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentUpdatedMessage, ServerMessage};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn content_msg(note_id: &str, content: &str) -> ServerMessage {
        ServerMessage::ContentUpdated(ContentUpdatedMessage {
            note_id: note_id.to_string(),
            content: content.to_string(),
        })
    }

    fn add_subscriber(registry: &ChannelRegistry, id: &str) -> UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        registry.register(&id.to_string(), tx);
        rx
    }

    #[test]
    fn join_then_leave_restores_pre_join_state() {
        let registry = ChannelRegistry::new();
        let _rx = add_subscriber(&registry, "conn-a");

        assert!(registry.subscribers_of("note-7").is_empty());
        registry.join("note-7", &"conn-a".to_string());
        assert_eq!(registry.subscribers_of("note-7").len(), 1);

        registry.leave("note-7", &"conn-a".to_string());
        assert!(registry.subscribers_of("note-7").is_empty());
        // Empty channels are garbage-collected.
        assert_eq!(registry.channel_count(), 0);
    }

    #[test]
    fn join_is_idempotent() {
        let registry = ChannelRegistry::new();
        let _rx = add_subscriber(&registry, "conn-a");

        registry.join("note-42", &"conn-a".to_string());
        registry.join("note-42", &"conn-a".to_string());
        assert_eq!(registry.subscribers_of("note-42").len(), 1);
    }

    #[test]
    fn leave_of_unknown_channel_or_subscriber_is_a_noop() {
        let registry = ChannelRegistry::new();
        let _rx = add_subscriber(&registry, "conn-a");

        registry.leave("note-1", &"conn-a".to_string());
        registry.leave("note-1", &"conn-ghost".to_string());
        assert_eq!(registry.channel_count(), 0);
    }

    #[test]
    fn join_of_unregistered_subscriber_is_ignored() {
        let registry = ChannelRegistry::new();
        registry.join("note-1", &"conn-ghost".to_string());
        assert!(registry.subscribers_of("note-1").is_empty());
    }

    #[test]
    fn unregister_removes_subscriber_from_every_channel() {
        let registry = ChannelRegistry::new();
        let _rx = add_subscriber(&registry, "conn-a");
        let _rx_b = add_subscriber(&registry, "conn-b");

        registry.join("note-1", &"conn-a".to_string());
        registry.join("note-2", &"conn-a".to_string());
        registry.join("note-3", &"conn-a".to_string());
        registry.join("note-1", &"conn-b".to_string());

        registry.unregister(&"conn-a".to_string());

        assert!(!registry.subscribers_of("note-1").contains("conn-a"));
        assert!(registry.subscribers_of("note-2").is_empty());
        assert!(registry.subscribers_of("note-3").is_empty());
        assert_eq!(registry.subscriber_count(), 1);
        // Channels left empty are dropped, note-1 keeps its other member.
        assert_eq!(registry.channel_count(), 1);

        // Unregistering twice is safe.
        registry.unregister(&"conn-a".to_string());
    }

    #[test]
    fn broadcast_reaches_all_current_subscribers() {
        let registry = ChannelRegistry::new();
        let mut rx_a = add_subscriber(&registry, "conn-a");
        let mut rx_b = add_subscriber(&registry, "conn-b");
        registry.join("note-42", &"conn-a".to_string());
        registry.join("note-42", &"conn-b".to_string());

        let attempts = registry.broadcast("note-42", content_msg("note-42", "hello"), None);
        assert_eq!(attempts, 2);
        assert_eq!(rx_a.try_recv().unwrap(), content_msg("note-42", "hello"));
        assert_eq!(rx_b.try_recv().unwrap(), content_msg("note-42", "hello"));
    }

    #[test]
    fn broadcast_skips_excluded_subscriber() {
        let registry = ChannelRegistry::new();
        let mut rx_a = add_subscriber(&registry, "conn-a");
        let mut rx_b = add_subscriber(&registry, "conn-b");
        registry.join("note-42", &"conn-a".to_string());
        registry.join("note-42", &"conn-b".to_string());

        let attempts = registry.broadcast(
            "note-42",
            content_msg("note-42", "hi"),
            Some(&"conn-a".to_string()),
        );
        assert_eq!(attempts, 1);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), content_msg("note-42", "hi"));
    }

    #[test]
    fn broadcast_after_leave_skips_departed_subscriber() {
        let registry = ChannelRegistry::new();
        let mut rx_a = add_subscriber(&registry, "conn-a");
        let mut rx_b = add_subscriber(&registry, "conn-b");
        registry.join("note-7", &"conn-a".to_string());
        registry.join("note-7", &"conn-b".to_string());
        registry.leave("note-7", &"conn-a".to_string());

        registry.broadcast("note-7", content_msg("note-7", "bye"), None);
        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), content_msg("note-7", "bye"));
    }

    #[test]
    fn broadcast_to_unknown_channel_delivers_nothing() {
        let registry = ChannelRegistry::new();
        assert_eq!(
            registry.broadcast("note-0", content_msg("note-0", "x"), None),
            0
        );
    }

    #[test]
    fn send_failure_for_one_subscriber_does_not_fail_the_broadcast() {
        let registry = ChannelRegistry::new();
        let rx_a = add_subscriber(&registry, "conn-a");
        let mut rx_b = add_subscriber(&registry, "conn-b");
        registry.join("note-9", &"conn-a".to_string());
        registry.join("note-9", &"conn-b".to_string());

        // Receiver gone but subscriber not yet cleaned up.
        drop(rx_a);

        let attempts = registry.broadcast("note-9", content_msg("note-9", "still on"), None);
        assert_eq!(attempts, 2);
        assert_eq!(rx_b.try_recv().unwrap(), content_msg("note-9", "still on"));
    }
}
