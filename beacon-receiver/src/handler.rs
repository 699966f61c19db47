use crate::client::Client;
use beacon_net::packets::Fix;
use std::{
    io,
    net::SocketAddr,
    sync::{Arc, Mutex},
};
use tracing::{error, info, warn};

/// Receives the effects of dispatching datagrams.
pub trait Handler {
    /// A fix from an authenticated device. A fix without a location still
    /// arrives here; whether to store anything is up to the handler.
    fn on_fix(&mut self, client: &Client, fix: &Fix);

    /// Sending a reply failed. The receiver carries on.
    fn on_send_error(&mut self, address: SocketAddr, error: &io::Error) {
        warn!(%address, %error, "Failed to send reply");
    }

    /// The receive path failed and the receiver has stopped.
    fn on_fatal_error(&mut self, error: &io::Error) {
        error!(%error, "Receiver failed");
    }
}

/// Lets several receivers feed one handler.
impl<H: Handler + ?Sized> Handler for Arc<Mutex<H>> {
    fn on_fix(&mut self, client: &Client, fix: &Fix) {
        self.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .on_fix(client, fix)
    }

    fn on_send_error(&mut self, address: SocketAddr, error: &io::Error) {
        self.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .on_send_error(address, error)
    }

    fn on_fatal_error(&mut self, error: &io::Error) {
        self.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .on_fatal_error(error)
    }
}

/// Logs fixes and stores nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogHandler;

impl Handler for LogHandler {
    fn on_fix(&mut self, client: &Client, fix: &Fix) {
        match fix.location {
            Some(location) => info!(
                key = client.key,
                address = %client.address,
                "fix {:.6} {:.6}",
                location.latitude,
                location.longitude
            ),
            None => info!(
                key = client.key,
                address = %client.address,
                "fix without location"
            ),
        }
    }
}
