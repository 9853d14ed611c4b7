use image::DynamicImage;
use manga_async_runtime::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Returns canned text; crops wider than 50px take a while
struct FakeRecognizer {
    text: &'static str,
}

impl Recognizer for FakeRecognizer {
    fn recognize(
        &self,
        image: &DynamicImage,
        _mode: Segmentation,
        _cancel: &CancellationToken,
    ) -> Result<String> {
        if image.width() > 50 * UPSCALE_FACTOR {
            std::thread::sleep(Duration::from_millis(300));
            return Ok("slow".to_string());
        }
        if self.text == "fail" {
            return Err(LookupError::Recognition("engine missing".to_string()));
        }
        Ok(self.text.to_string())
    }
}

#[derive(Default)]
struct FakeDictionary {
    calls: AtomicUsize,
}

impl Dictionary for FakeDictionary {
    fn lookup(&self, text: &str, _cancel: &CancellationToken) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text == "読む" {
            Ok(Some("\x1b[33m読む\x1b[0m to read\n".to_string()))
        } else {
            Ok(None)
        }
    }
}

/// Works for two seconds unless cancelled, recording how it ended
#[derive(Default)]
struct SlowRecognizer {
    stopped: AtomicBool,
    completed: AtomicBool,
}

impl Recognizer for SlowRecognizer {
    fn recognize(
        &self,
        _image: &DynamicImage,
        _mode: Segmentation,
        cancel: &CancellationToken,
    ) -> Result<String> {
        for _ in 0..40 {
            if cancel.is_cancelled() {
                self.stopped.store(true, Ordering::SeqCst);
                return Err(LookupError::Cancelled("slow".to_string()));
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        self.completed.store(true, Ordering::SeqCst);
        Ok("done".to_string())
    }
}

fn page() -> Arc<DynamicImage> {
    Arc::new(DynamicImage::new_rgb8(200, 200))
}

fn crop(width: u32) -> SourceCrop {
    SourceCrop {
        x0: 0,
        y0: 0,
        x1: width,
        y1: 20,
    }
}

fn controller(text: &'static str, dictionary: Arc<FakeDictionary>) -> LookupController {
    let pipeline = LookupPipeline::new(
        Arc::new(FakeRecognizer { text }),
        dictionary,
        ScaleFilter::Nearest,
    );
    LookupController::spawn(&tokio::runtime::Handle::current(), pipeline)
}

async fn next(controller: &mut LookupController) -> LookupUpdate {
    tokio::time::timeout(Duration::from_secs(5), controller.next_update())
        .await
        .expect("lookup timed out")
        .expect("worker stopped")
}

#[tokio::test]
async fn test_lookup_reports_progress_then_result() {
    let dictionary = Arc::new(FakeDictionary::default());
    let mut controller = controller(" 読む\n", dictionary.clone());

    let generation = controller.start_lookup(page(), crop(20));
    assert!(controller.is_running());

    assert_eq!(
        next(&mut controller).await,
        LookupUpdate::Progress {
            generation,
            message: "Looking up 読む".to_string()
        }
    );
    assert_eq!(
        next(&mut controller).await,
        LookupUpdate::Finished {
            generation,
            annotation: "\x1b[33m読む\x1b[0m to read".to_string()
        }
    );
    assert!(!controller.is_running());
    assert_eq!(dictionary.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_nothing_recognized_skips_dictionary() {
    let dictionary = Arc::new(FakeDictionary::default());
    let mut controller = controller(" ~ ", dictionary.clone());

    controller.start_lookup(page(), crop(20));
    let _progress = next(&mut controller).await;
    match next(&mut controller).await {
        LookupUpdate::Finished { annotation, .. } => assert_eq!(annotation, NOTHING_RECOGNIZED),
        other => panic!("unexpected update {:?}", other),
    }
    assert_eq!(dictionary.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_word_shows_recognized_text() {
    let mut controller = controller("未知", Arc::new(FakeDictionary::default()));

    controller.start_lookup(page(), crop(20));
    let _progress = next(&mut controller).await;
    match next(&mut controller).await {
        LookupUpdate::Finished { annotation, .. } => assert_eq!(annotation, "未知"),
        other => panic!("unexpected update {:?}", other),
    }
}

#[tokio::test]
async fn test_recognition_failure() {
    let mut controller = controller("fail", Arc::new(FakeDictionary::default()));

    let generation = controller.start_lookup(page(), crop(20));
    match next(&mut controller).await {
        LookupUpdate::Failed {
            generation: failed,
            message,
        } => {
            assert_eq!(failed, generation);
            assert!(message.contains("engine missing"));
        }
        other => panic!("unexpected update {:?}", other),
    }
    assert!(!controller.is_running());
}

#[tokio::test]
async fn test_crop_outside_page_fails() {
    let mut controller = controller("x", Arc::new(FakeDictionary::default()));
    controller.start_lookup(page(), crop(500));
    assert!(matches!(
        next(&mut controller).await,
        LookupUpdate::Failed { .. }
    ));
}

#[tokio::test]
async fn test_new_selection_supersedes_running_lookup() {
    let mut controller = controller("読む", Arc::new(FakeDictionary::default()));

    let first = controller.start_lookup(page(), crop(100));
    let second = controller.start_lookup(page(), crop(20));
    assert!(second > first);

    for _ in 0..2 {
        let update = next(&mut controller).await;
        assert_eq!(update.generation(), second);
    }
}

#[tokio::test]
async fn test_poll_discards_stale_generations() {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let mut controller = LookupController::new(command_tx, update_rx);

    let old = controller.start_lookup(page(), crop(20));
    let current = controller.start_lookup(page(), crop(20));

    // The first command's token was cancelled when the second started
    match command_rx.recv().await {
        Some(LookupCommand::Start { cancel, .. }) => assert!(cancel.is_cancelled()),
        None => panic!("no command sent"),
    }

    update_tx
        .send(LookupUpdate::Finished {
            generation: old,
            annotation: "stale".to_string(),
        })
        .unwrap();
    update_tx
        .send(LookupUpdate::Finished {
            generation: current,
            annotation: "fresh".to_string(),
        })
        .unwrap();

    let updates = controller.poll();
    assert_eq!(
        updates,
        vec![LookupUpdate::Finished {
            generation: current,
            annotation: "fresh".to_string()
        }]
    );
    assert!(controller.poll().is_empty());
}

#[tokio::test]
async fn test_cancel_drops_late_results() {
    let (command_tx, _command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let mut controller = LookupController::new(command_tx, update_rx);

    let generation = controller.start_lookup(page(), crop(20));
    controller.cancel();
    assert!(!controller.is_running());

    update_tx
        .send(LookupUpdate::Finished {
            generation,
            annotation: "late".to_string(),
        })
        .unwrap();
    assert!(controller.poll().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cancel_stops_running_recognizer() {
    let recognizer = Arc::new(SlowRecognizer::default());
    let pipeline = LookupPipeline::new(
        recognizer.clone(),
        Arc::new(FakeDictionary::default()),
        ScaleFilter::Nearest,
    );
    let mut controller = LookupController::spawn(&tokio::runtime::Handle::current(), pipeline);

    controller.start_lookup(page(), crop(20));
    tokio::time::sleep(Duration::from_millis(300)).await;
    controller.cancel();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(recognizer.stopped.load(Ordering::SeqCst));

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(!recognizer.completed.load(Ordering::SeqCst));
    assert!(controller.poll().is_empty());
}
