use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tracing::{info, warn};

use crate::{
    config::RsvpConfig,
    core::{draft::Draft, validate::ValidationError},
    entry::Entry,
    export::{to_csv, write_csv_file},
    intake::{Intake, WebhookIntake},
    persist::{EntryLog, PersistError},
    types::SubmissionId,
};

use super::events::RsvpEvent;

/// Failure of a desk command.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The draft failed validation; nothing was stored.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The local log rejected the operation.
    #[error("local storage failed: {0}")]
    Persist(#[from] PersistError),
    /// Writing the export file failed.
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
    /// The desk task has stopped.
    #[error("rsvp desk is not running")]
    ChannelClosed,
}

/// Whether the user confirmed a destructive clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearConfirmation {
    /// The user accepted; the log is emptied.
    Confirmed,
    /// The user backed out; nothing happens.
    Declined,
}

/// What the remote relay is doing with a freshly stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSync {
    /// A relay task was spawned; its outcome arrives as an [`RsvpEvent`].
    Pending,
    /// No intake is configured.
    LocalOnly,
}

/// Local success of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Position of the entry in the log, counting from 1.
    pub id: SubmissionId,
    /// The entry as stored.
    pub entry: Entry,
    /// Whether a relay is in flight.
    pub remote: RemoteSync,
}

/// Cloneable client of a running desk.
pub struct RsvpHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<RsvpEvent>,
}

impl Clone for RsvpHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    Submit {
        draft: Box<Draft>,
        resp: oneshot::Sender<Result<Receipt, RuntimeError>>,
    },
    Entries {
        resp: oneshot::Sender<Result<Vec<Entry>, RuntimeError>>,
    },
    ExportCsv {
        resp: oneshot::Sender<Result<String, RuntimeError>>,
    },
    ExportTo {
        dir: PathBuf,
        resp: oneshot::Sender<Result<PathBuf, RuntimeError>>,
    },
    Clear {
        resp: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

struct Desk {
    log: Arc<Mutex<Box<dyn EntryLog>>>,
    intake: Option<Arc<dyn Intake>>,
    events_tx: broadcast::Sender<RsvpEvent>,
    config: RsvpConfig,
    next_id: SubmissionId,
}

/// Builds the webhook intake named by `config`, if any.
pub fn intake_from_config(config: &RsvpConfig) -> Option<Arc<dyn Intake>> {
    config
        .webhook_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(|url| Arc::new(WebhookIntake::new(url)) as Arc<dyn Intake>)
}

/// Spawns the single writer that owns `log`.
///
/// Submissions are appended in the order their commands arrive; relay to
/// `intake` happens afterwards on detached tasks. Ids continue from the
/// number of entries already in `log`.
pub fn spawn_rsvp_desk(
    log: Box<dyn EntryLog>,
    intake: Option<Arc<dyn Intake>>,
    config: RsvpConfig,
) -> RsvpHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let (events_tx, _) = broadcast::channel::<RsvpEvent>(config.event_buffer.max(1));

    let mut desk = Desk {
        log: Arc::new(Mutex::new(log)),
        intake,
        events_tx: events_tx.clone(),
        config,
        next_id: 1,
    };

    tokio::spawn(async move {
        match desk.load().await {
            Ok(existing) => desk.next_id = existing.len() as SubmissionId + 1,
            Err(err) => warn!(%err, "could not count stored rsvps; ids start at 1"),
        }

        while let Some(cmd) = cmd_rx.recv().await {
            if desk.handle_command(cmd).await {
                break;
            }
        }
    });

    RsvpHandle { cmd_tx, events_tx }
}

impl RsvpHandle {
    /// Receiver for events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<RsvpEvent> {
        self.events_tx.subscribe()
    }

    /// Validates, finalizes and stores `draft`, then relays it in the
    /// background. Returns as soon as the local append succeeds.
    pub async fn submit(&self, draft: Draft) -> Result<Receipt, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Submit {
            draft: Box::new(draft),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// All stored entries in submission order.
    pub async fn entries(&self) -> Result<Vec<Entry>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Entries { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// CSV rendering of the whole local log, recomputed on every call.
    pub async fn export_csv(&self) -> Result<String, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ExportCsv { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Writes the export file into `dir` and returns its path.
    pub async fn export_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::ExportTo {
            dir: dir.as_ref().to_path_buf(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Empties the local log once the user has confirmed.
    pub async fn clear_all(&self, confirmation: ClearConfirmation) -> Result<usize, RuntimeError> {
        if confirmation == ClearConfirmation::Declined {
            return Ok(0);
        }
        let (tx, rx) = oneshot::channel();
        self.send(Command::Clear { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Flushes the log and stops the desk.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

impl Desk {
    async fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Submit { draft, resp } => {
                let res = self.submit(&draft).await;
                let _ = resp.send(res);
            }
            Command::Entries { resp } => {
                let _ = resp.send(self.load().await);
            }
            Command::ExportCsv { resp } => {
                let res = self.load().await.map(|entries| to_csv(&entries));
                let _ = resp.send(res);
            }
            Command::ExportTo { dir, resp } => {
                let res = self.export_to(dir).await;
                let _ = resp.send(res);
            }
            Command::Clear { resp } => {
                let res = self.with_log(|log| log.clear()).await;
                if let Ok(removed) = &res {
                    self.next_id = 1;
                    info!(removed, "cleared local rsvp log");
                    let _ = self.events_tx.send(RsvpEvent::Cleared { removed: *removed });
                }
                let _ = resp.send(res);
            }
            Command::Shutdown { resp } => {
                let _ = resp.send(self.with_log(|log| log.flush()).await);
                return true;
            }
        }

        false
    }

    async fn submit(&mut self, draft: &Draft) -> Result<Receipt, RuntimeError> {
        let entry = draft.finalize(self.config.client_context.clone())?;

        let stored = entry.clone();
        self.with_log(move |log| log.append(&stored)).await?;

        let id = self.next_id;
        self.next_id += 1;
        info!(id, guests = entry.guest_count, attending = %entry.attending, "stored rsvp");
        let _ = self.events_tx.send(RsvpEvent::Submitted { id });

        let remote = match &self.intake {
            Some(intake) => {
                spawn_relay(Arc::clone(intake), entry.clone(), id, self.events_tx.clone());
                RemoteSync::Pending
            }
            None => RemoteSync::LocalOnly,
        };

        Ok(Receipt { id, entry, remote })
    }

    async fn load(&self) -> Result<Vec<Entry>, RuntimeError> {
        self.with_log(|log| log.load()).await
    }

    async fn export_to(&self, dir: PathBuf) -> Result<PathBuf, RuntimeError> {
        let entries = self.load().await?;
        let file_name = self.config.export_file_name.clone();
        tokio::task::spawn_blocking(move || write_csv_file(dir, &file_name, &entries))
            .await
            .map_err(|e| PersistError::Message(format!("join error: {e}")))?
            .map_err(RuntimeError::from)
    }

    async fn with_log<T, F>(&self, f: F) -> Result<T, RuntimeError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Box<dyn EntryLog>) -> Result<T, PersistError> + Send + 'static,
    {
        let log = Arc::clone(&self.log);
        let res = tokio::task::spawn_blocking(move || {
            let mut log = log.blocking_lock();
            f(&mut *log)
        })
        .await
        .map_err(|e| PersistError::Message(format!("join error: {e}")))?;
        res.map_err(RuntimeError::from)
    }
}

fn spawn_relay(
    intake: Arc<dyn Intake>,
    entry: Entry,
    id: SubmissionId,
    events_tx: broadcast::Sender<RsvpEvent>,
) {
    tokio::spawn(async move {
        match intake.submit(&entry).await {
            Ok(()) => {
                info!(id, "rsvp relayed to intake");
                let _ = events_tx.send(RsvpEvent::RemoteSynced { id });
            }
            Err(err) => {
                warn!(id, %err, "rsvp relay failed; entry kept locally");
                let _ = events_tx.send(RsvpEvent::RemoteSyncFailed {
                    id,
                    advisory: format!("submitted locally, remote sync failed: {err}"),
                });
            }
        }
    });
}
