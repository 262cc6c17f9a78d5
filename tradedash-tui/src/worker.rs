//! Background worker thread: vault requests run here so the UI never blocks
//! on the network.
//!
//! Communication with the TUI main thread is via `mpsc` channels.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{info, warn};
use tradedash_runner::{VaultClient, VaultConfig, VaultSnapshot};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    RefreshVault,
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    /// Errors are rendered to strings; the UI only displays them.
    Vault(Result<VaultSnapshot, String>),
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    config: VaultConfig,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tradedash-worker".into())
        .spawn(move || worker_loop(config, rx, tx))
}

fn worker_loop(config: VaultConfig, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    // Built lazily so a bad TLS setup only surfaces when the vault is requested.
    let mut client: Option<VaultClient> = None;

    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::RefreshVault) => {
                let result = refresh_vault(&config, &mut client);
                if tx.send(WorkerResponse::Vault(result)).is_err() {
                    break;
                }
            }
        }
    }
    info!("worker stopped");
}

fn refresh_vault(
    config: &VaultConfig,
    client: &mut Option<VaultClient>,
) -> Result<VaultSnapshot, String> {
    if client.is_none() {
        *client = Some(VaultClient::new(config).map_err(|e| e.to_string())?);
    }
    let Some(client) = client.as_ref() else {
        return Err("vault client unavailable".into());
    };
    client.fetch().map_err(|e| {
        warn!(error = %e, "vault refresh failed");
        e.to_string()
    })
}
