//! Navigator that forwards routes to the terminal view loop

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::flow::{Navigator, Route};

/// Queues routes for the view loop to open on its next turn
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        debug!(route = route.name(), "navigate: called");
        if self.tx.send(route).is_err() {
            warn!("navigate: view loop has stopped, dropping route");
        }
    }
}
