use crate::{Generation, LookupCommand, LookupPipeline, LookupUpdate, SourceCrop};
use image::DynamicImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How often the UI polls for results while a lookup runs
pub const LOOKUP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// UI-side handle of the lookup worker.
///
/// At most one lookup is current. Starting a new one cancels the previous
/// one and bumps the generation; anything the old lookup still sends is
/// dropped by [`LookupController::poll`].
pub struct LookupController {
    command_tx: mpsc::UnboundedSender<LookupCommand>,
    update_rx: mpsc::UnboundedReceiver<LookupUpdate>,
    generation: Generation,
    cancel: Option<CancellationToken>,
}

impl LookupController {
    /// Spawn the worker on `runtime` and return its controller
    pub fn spawn(runtime: &tokio::runtime::Handle, pipeline: LookupPipeline) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        runtime.spawn(crate::worker::worker_task(command_rx, update_tx, pipeline));

        Self::new(command_tx, update_rx)
    }

    /// Controller over existing channels
    pub fn new(
        command_tx: mpsc::UnboundedSender<LookupCommand>,
        update_rx: mpsc::UnboundedReceiver<LookupUpdate>,
    ) -> Self {
        Self {
            command_tx,
            update_rx,
            generation: Generation::default(),
            cancel: None,
        }
    }

    /// Current generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// A lookup has been started and has not finished or been cancelled
    pub fn is_running(&self) -> bool {
        self.cancel.is_some()
    }

    /// Cancel the running lookup (if any) and start a new one
    pub fn start_lookup(&mut self, image: Arc<DynamicImage>, crop: SourceCrop) -> Generation {
        self.cancel();

        self.generation = self.generation.next();
        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        log::debug!("Starting lookup {} for {:?}", self.generation.0, crop);
        if self
            .command_tx
            .send(LookupCommand::Start {
                generation: self.generation,
                image,
                crop,
                cancel,
            })
            .is_err()
        {
            log::warn!("Lookup worker is not running");
            self.cancel = None;
        }

        self.generation
    }

    /// Cancel the running lookup. Its late results are discarded.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
            // Anything still in flight belongs to a superseded selection
            self.generation = self.generation.next();
        }
    }

    /// Drain pending updates without blocking, keeping the current ones
    pub fn poll(&mut self) -> Vec<LookupUpdate> {
        let mut updates = Vec::new();
        while let Ok(update) = self.update_rx.try_recv() {
            if let Some(update) = self.accept(update) {
                updates.push(update);
            }
        }
        updates
    }

    /// Wait for the next current update
    pub async fn next_update(&mut self) -> Option<LookupUpdate> {
        while let Some(update) = self.update_rx.recv().await {
            if let Some(update) = self.accept(update) {
                return Some(update);
            }
        }
        None
    }

    fn accept(&mut self, update: LookupUpdate) -> Option<LookupUpdate> {
        if update.generation() != self.generation {
            log::debug!(
                "Dropping stale lookup update {} (current {})",
                update.generation().0,
                self.generation.0
            );
            return None;
        }
        if update.is_terminal() {
            self.cancel = None;
        }
        Some(update)
    }
}
