use crate::pipeline::{LookupPipeline, progress_message};
use crate::{Generation, LookupCommand, LookupUpdate, SourceCrop};
use image::DynamicImage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Async worker task that runs lookups and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<LookupCommand>,
    update_tx: mpsc::UnboundedSender<LookupUpdate>,
    pipeline: LookupPipeline,
) {
    let pipeline = Arc::new(pipeline);

    while let Some(cmd) = command_rx.recv().await {
        match cmd {
            LookupCommand::Start {
                mut generation,
                mut image,
                mut crop,
                mut cancel,
            } => {
                // Only the most recent selection matters
                while let Ok(LookupCommand::Start {
                    generation: newer_generation,
                    image: newer_image,
                    crop: newer_crop,
                    cancel: newer_cancel,
                }) = command_rx.try_recv()
                {
                    log::debug!(
                        "Discarding queued lookup {}, using {}",
                        generation.0,
                        newer_generation.0
                    );
                    generation = newer_generation;
                    image = newer_image;
                    crop = newer_crop;
                    cancel = newer_cancel;
                }

                handle_lookup(&pipeline, generation, image, crop, cancel, &update_tx).await;
            }
        }
    }

    log::debug!("Lookup worker stopped");
}

async fn handle_lookup(
    pipeline: &Arc<LookupPipeline>,
    generation: Generation,
    image: Arc<DynamicImage>,
    crop: SourceCrop,
    cancel: CancellationToken,
    update_tx: &mpsc::UnboundedSender<LookupUpdate>,
) {
    if cancel.is_cancelled() {
        return;
    }

    // The blocking calls get their own token so a cancel also kills the child
    let recognize = {
        let pipeline = Arc::clone(pipeline);
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || pipeline.recognize(&image, crop, &cancel))
    };
    let text = tokio::select! {
        _ = cancel.cancelled() => {
            log::debug!("Lookup {} cancelled during recognition", generation.0);
            return;
        }
        result = recognize => match result.map_err(crate::LookupError::from).and_then(|r| r) {
            Ok(text) => text,
            Err(e) => {
                let _ = update_tx.send(LookupUpdate::Failed {
                    generation,
                    message: e.to_string(),
                });
                return;
            }
        },
    };

    let _ = update_tx.send(LookupUpdate::Progress {
        generation,
        message: progress_message(&text),
    });

    let describe = {
        let pipeline = Arc::clone(pipeline);
        let cancel = cancel.clone();
        tokio::task::spawn_blocking(move || pipeline.describe(&text, &cancel))
    };
    tokio::select! {
        _ = cancel.cancelled() => {
            log::debug!("Lookup {} cancelled during dictionary lookup", generation.0);
        }
        result = describe => {
            let update = match result {
                Ok(annotation) => LookupUpdate::Finished { generation, annotation },
                Err(e) => LookupUpdate::Failed { generation, message: e.to_string() },
            };
            let _ = update_tx.send(update);
        }
    }
}
