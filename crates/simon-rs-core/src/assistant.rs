//! The running assistant: capture loop, wake detection and command workers.
//!
//! One background task owns the microphone loop. Each accepted command runs
//! on its own task; a single flag keeps at most one command in flight and
//! triggers arriving meanwhile are dropped.

use crate::dispatcher::Dispatcher;
use crate::error::SimonCoreError;
use crate::wake::WakeDetector;
use log::{debug, info, warn};
use parking_lot::Mutex as SyncMutex;
use simon_rs_config::AssistantConfig;
use simon_rs_protocol::{Listener, Speaker, VoiceError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, Notify, watch};
use tokio::task::JoinHandle;

/// Pause after a recoverable microphone error before listening again.
const LISTEN_ERROR_BACKOFF: Duration = Duration::from_millis(250);

/// Voice assistant wiring a microphone and speaker around a [`Dispatcher`].
pub struct Assistant {
    shared: Arc<Shared>,
    capture: SyncMutex<Option<JoinHandle<()>>>,
    stop_tx: watch::Sender<bool>,
    running_tx: Arc<watch::Sender<bool>>,
}

struct Shared {
    dispatcher: Mutex<Dispatcher>,
    speaker: Arc<dyn Speaker>,
    listener: Mutex<Box<dyn Listener>>,
    wake: WakeDetector,
    settings: AssistantConfig,
    processing: AtomicBool,
    paused: AtomicBool,
    idle: Notify,
}

/// Clears the processing flag when a worker finishes, even on panic.
struct ProcessingGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.shared.processing.store(false, Ordering::SeqCst);
        self.shared.idle.notify_waiters();
    }
}

impl Assistant {
    pub fn new(
        dispatcher: Dispatcher,
        speaker: Arc<dyn Speaker>,
        listener: Box<dyn Listener>,
        settings: AssistantConfig,
    ) -> Self {
        let (stop_tx, _) = watch::channel(false);
        let (running_tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                dispatcher: Mutex::new(dispatcher),
                speaker,
                listener: Mutex::new(listener),
                wake: WakeDetector::from_config(&settings),
                settings,
                processing: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                idle: Notify::new(),
            }),
            capture: SyncMutex::new(None),
            stop_tx,
            running_tx: Arc::new(running_tx),
        }
    }

    /// Command remainder after a wake phrase; `Some("")` asks for a follow-up listen.
    pub fn detect_wake(&self, transcript: &str) -> Option<String> {
        self.shared.wake.detect(transcript)
    }

    /// Spawn the background capture loop.
    pub fn start(&self) -> Result<(), SimonCoreError> {
        let mut capture = self.capture.lock();
        if capture.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(SimonCoreError::AlreadyRunning);
        }
        self.stop_tx.send_replace(false);
        self.running_tx.send_replace(true);
        let shared = self.shared.clone();
        let stop_rx = self.stop_tx.subscribe();
        let running_tx = self.running_tx.clone();
        *capture = Some(tokio::spawn(async move {
            capture_loop(shared, stop_rx).await;
            running_tx.send_replace(false);
        }));
        info!("assistant started");
        Ok(())
    }

    /// Signal the capture loop and wait for it up to the configured stop timeout.
    ///
    /// A loop that does not finish in time is aborted. A command already in
    /// flight is left to finish.
    pub async fn stop(&self) -> Result<(), SimonCoreError> {
        self.stop_tx.send_replace(true);
        let handle = self.capture.lock().take();
        let Some(mut handle) = handle else {
            return Ok(());
        };
        let limit = self.shared.settings.stop_timeout();
        let joined = tokio::time::timeout(limit, &mut handle).await;
        self.running_tx.send_replace(false);
        match joined {
            Ok(Ok(())) => {
                info!("assistant stopped");
                Ok(())
            }
            Ok(Err(err)) => {
                warn!("capture loop ended abnormally: {err}");
                Ok(())
            }
            Err(_) => {
                handle.abort();
                warn!("capture loop did not stop in time (timeout_ms={})", limit.as_millis());
                Err(SimonCoreError::StopTimeout(limit))
            }
        }
    }

    /// True while the capture loop task is alive.
    pub fn is_running(&self) -> bool {
        self.capture
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait until the capture loop ends on its own (microphone closed) or is stopped.
    pub async fn wait_stopped(&self) {
        let mut running = self.running_tx.subscribe();
        let _ = running.wait_for(|running| !*running).await;
    }

    /// Start handling `command` unless paused or another command is in flight.
    pub fn submit(&self, command: impl Into<String>) -> bool {
        submit(&self.shared, command.into())
    }

    /// Listen for one command and submit it, as a push-to-talk trigger.
    pub async fn hotkey(&self) -> bool {
        let shared = &self.shared;
        if shared.paused.load(Ordering::SeqCst) || shared.processing.load(Ordering::SeqCst) {
            debug!("hotkey ignored (paused or busy)");
            return false;
        }
        info!("hotkey pressed");
        match listen_for_command(shared).await {
            Some(command) => submit(shared, command),
            None => false,
        }
    }

    /// Ignore wake phrases and hotkeys until [`Assistant::resume`].
    pub fn pause(&self) {
        self.shared.paused.store(true, Ordering::SeqCst);
        info!("paused listening");
    }

    pub fn resume(&self) {
        self.shared.paused.store(false, Ordering::SeqCst);
        info!("resumed listening");
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    pub fn is_processing(&self) -> bool {
        self.shared.processing.load(Ordering::SeqCst)
    }

    /// Wait until no command is in flight.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.shared.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if !self.is_processing() {
                return;
            }
            notified.await;
        }
    }

    /// Shared access to the dispatcher, for command management between utterances.
    pub async fn with_dispatcher<R>(&self, f: impl FnOnce(&mut Dispatcher) -> R) -> R {
        let mut dispatcher = self.shared.dispatcher.lock().await;
        f(&mut dispatcher)
    }
}

fn submit(shared: &Arc<Shared>, command: String) -> bool {
    let command = command.trim().to_string();
    if command.is_empty() {
        return false;
    }
    if shared.paused.load(Ordering::SeqCst) {
        debug!("command ignored while paused");
        return false;
    }
    if shared
        .processing
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        debug!("command ignored, another is in flight (command={command})");
        return false;
    }
    info!("command received (command={command})");
    let worker = shared.clone();
    tokio::spawn(async move {
        let _guard = ProcessingGuard { shared: &worker };
        let outcome = worker.dispatcher.lock().await.handle(&command).await;
        if let Err(err) = worker.speaker.speak(&outcome.response).await {
            warn!("failed to speak response: {err}");
        }
    });
    true
}

async fn listen_for_command(shared: &Shared) -> Option<String> {
    let settings = &shared.settings;
    let heard = shared
        .listener
        .lock()
        .await
        .listen(settings.listen_timeout(), Some(settings.command_phrase_limit()))
        .await;
    match heard {
        Ok(Some(text)) if !text.trim().is_empty() => Some(text),
        Ok(_) => {
            debug!("no command heard");
            None
        }
        Err(err) => {
            warn!("listening for command failed: {err}");
            None
        }
    }
}

async fn capture_loop(shared: Arc<Shared>, mut stop_rx: watch::Receiver<bool>) {
    let settings = shared.settings.clone();
    loop {
        if *stop_rx.borrow() {
            break;
        }
        let heard = {
            let mut listener = shared.listener.lock().await;
            tokio::select! {
                _ = stop_rx.wait_for(|stopped| *stopped) => break,
                heard = listener.listen(settings.listen_timeout(), Some(settings.wake_phrase_limit())) => heard,
            }
        };
        let transcript = match heard {
            Ok(Some(transcript)) => transcript,
            Ok(None) => continue,
            Err(VoiceError::Closed) => {
                warn!("microphone closed, capture loop exiting");
                break;
            }
            Err(err) => {
                warn!("listen failed: {err}");
                tokio::time::sleep(LISTEN_ERROR_BACKOFF).await;
                continue;
            }
        };
        if shared.paused.load(Ordering::SeqCst) {
            continue;
        }
        let Some(command) = shared.wake.detect(&transcript) else {
            continue;
        };
        info!("wake phrase detected");
        if shared.processing.load(Ordering::SeqCst) {
            debug!("wake phrase ignored, a command is in flight");
            continue;
        }
        let command = if command.is_empty() {
            match listen_for_command(&shared).await {
                Some(command) => command,
                None => continue,
            }
        } else {
            command
        };
        submit(&shared, command);
    }
    debug!("capture loop finished");
}
