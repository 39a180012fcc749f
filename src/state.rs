use std::sync::Arc;

use crate::sync::{PresenceNotifier, UpdateBroadcaster};
use crate::ws::registry::ChannelRegistry;

/// Shared application state, created once in `main` and handed to every
/// connection handler by reference.
pub struct AppState {
    pub registry: Arc<ChannelRegistry>,
    pub broadcaster: UpdateBroadcaster,
    pub presence: PresenceNotifier,
}

impl AppState {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        broadcaster: UpdateBroadcaster,
        presence: PresenceNotifier,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            presence,
        }
    }
}
