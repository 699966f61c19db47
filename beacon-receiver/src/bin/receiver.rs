use beacon_receiver::{config::Config, handler::LogHandler, journal::Journal, receiver::Receiver};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let journal = match &config.journal {
        Some(path) => {
            info!(path = %path.display(), "Appending fixes to journal");
            Some(Arc::new(Mutex::new(Journal::open(path)?)))
        }
        None => None,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        info!("Interrupted, shutting down");
        let _ = shutdown_tx.send(true);
    })?;

    let mut receivers = Vec::with_capacity(config.listen.len());
    for &addr in &config.listen {
        let receiver = Receiver::bind(addr).await?;
        info!(%addr, "Listening");

        let mut shutdown_rx = shutdown_rx.clone();
        let shutdown = async move {
            let stopped = *shutdown_rx.borrow();
            if !stopped {
                let _ = shutdown_rx.changed().await;
            }
        };

        let journal = journal.clone();
        receivers.push(tokio::spawn(async move {
            let result = match journal {
                Some(mut journal) => receiver.run(&mut journal, shutdown).await,
                None => {
                    let mut handler = LogHandler;
                    receiver.run(&mut handler, shutdown).await
                }
            };
            (addr, result)
        }));
    }

    for task in receivers {
        match task.await {
            Ok((_, Ok(()))) => {}
            Ok((addr, Err(e))) => error!(%addr, error = %e, "Receiver stopped"),
            Err(e) => error!(error = %e, "Receiver task panicked"),
        }
    }

    Ok(())
}
