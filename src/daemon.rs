//! Process orchestration.
//!
//! Two threads: the supervisor (the caller of [`run`]) and a worker that owns the pointer
//! sink, picks the touchpad and runs the blocking read loop. The worker reports its
//! startup outcome and its end over a channel; the supervisor otherwise only waits for a
//! termination signal. The worker is never joined or restarted.

use crate::backends;
use crate::calibration::calibrate;
use crate::config::{SessionEnv, Settings};
use crate::device::InputSource;
use crate::error::{BootstrapError, PointerError};
use crate::gesture::{self, GestureMachine, SessionSummary, StreamEnd};
use crate::pointer::{connect_with_retry, Clock, PointerSink, RetryPolicy, SystemClock};
use crate::selector::select_touchpad;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info, warn};

/// Supervisor wake-up interval.
const IDLE_TICK: Duration = Duration::from_secs(1);

/// Effective uid of this process (owner of `/proc/self`).
#[cfg(unix)]
pub fn effective_uid() -> std::io::Result<u32> {
    use std::os::unix::fs::MetadataExt;
    std::fs::metadata("/proc/self").map(|m| m.uid())
}

/// Raw input devices are only readable by root.
pub fn require_root(uid: u32) -> Result<(), BootstrapError> {
    match uid {
        0 => Ok(()),
        uid => Err(BootstrapError::NotRoot(uid)),
    }
}

#[cfg(unix)]
pub fn check_privileges() -> Result<(), BootstrapError> {
    require_root(effective_uid().map_err(BootstrapError::Privilege)?)
}

/// Worker-to-supervisor messages.
#[derive(Debug)]
pub enum WorkerStatus {
    /// Pointer connected, touchpad selected; the read loop is running.
    Started { device: String },
    /// Startup failed; the worker has exited.
    Failed(BootstrapError),
    /// Read loop ended; the worker has exited.
    Finished(SessionSummary),
}

/// Why the supervisor stopped.
#[derive(Debug)]
pub enum Shutdown {
    /// Ctrl-C / SIGTERM.
    Interrupted,
    /// The touchpad stream ended cleanly.
    StreamClosed,
    /// The touchpad stream failed (unplugged, permission revoked). No reconnection.
    StreamFailed,
}

/// Handle to the running worker thread.
pub struct Worker {
    status: Receiver<WorkerStatus>,
    button_held: Arc<AtomicBool>,
}

/// Wraps the worker's sink and mirrors the primary button state into a shared flag.
struct TrackedSink {
    inner: Box<dyn PointerSink>,
    held: Arc<AtomicBool>,
}

impl PointerSink for TrackedSink {
    fn press_button(&mut self) -> Result<(), PointerError> {
        self.inner.press_button()?;
        self.held.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn release_button(&mut self) -> Result<(), PointerError> {
        self.held.store(false, Ordering::SeqCst);
        self.inner.release_button()
    }

    fn position(&mut self) -> Result<(i32, i32), PointerError> {
        self.inner.position()
    }

    fn set_position(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        self.inner.set_position(x, y)
    }
}

/// Spawn the worker thread.
///
/// `connect` builds the pointer sink (retried per `settings`), `probe` enumerates the
/// candidate sources. Both run on the worker thread, so neither result needs to be `Send`.
pub fn spawn_worker<C, P, K>(
    settings: Settings,
    connect: C,
    probe: P,
    clock: K,
) -> Result<Worker, BootstrapError>
where
    C: FnMut() -> Result<Box<dyn PointerSink>, PointerError> + Send + 'static,
    P: FnOnce() -> Vec<Box<dyn InputSource>> + Send + 'static,
    K: Clock + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let button_held = Arc::new(AtomicBool::new(false));
    let held = button_held.clone();

    thread::Builder::new()
        .name("touchpad-reader".into())
        .spawn(move || {
            let policy = RetryPolicy {
                attempts: settings.connect_attempts,
                backoff: settings.connect_backoff,
            };
            let mut sink = match connect_with_retry(connect, policy, &clock) {
                Ok(inner) => TrackedSink { inner, held },
                Err(e) => {
                    let _ = tx.send(WorkerStatus::Failed(e));
                    return;
                }
            };

            let Some(mut source) = select_touchpad(probe()) else {
                let _ = tx.send(WorkerStatus::Failed(BootstrapError::NoTouchpad));
                return;
            };

            let meta = source.metadata();
            info!(
                "Selected device: {}",
                serde_json::to_string(&meta).unwrap_or_else(|_| meta.to_string())
            );
            let ranges = calibrate(&meta);
            let mut machine = GestureMachine::new(&settings, ranges).with_clock(clock);

            let _ = tx.send(WorkerStatus::Started {
                device: meta.to_string(),
            });
            let summary = gesture::run(source.as_mut(), &mut sink, &mut machine);
            let _ = tx.send(WorkerStatus::Finished(summary));
        })
        .map_err(BootstrapError::Spawn)?;

    Ok(Worker {
        status: rx,
        button_held,
    })
}

impl Worker {
    /// Block until the worker has either started its read loop or failed to.
    pub fn wait_started(&self) -> Result<String, BootstrapError> {
        match self.status.recv() {
            Ok(WorkerStatus::Started { device }) => Ok(device),
            Ok(WorkerStatus::Failed(e)) => Err(e),
            Ok(WorkerStatus::Finished(_)) | Err(_) => Err(BootstrapError::WorkerExited),
        }
    }

    /// Whether the worker's last successful button action was a press.
    pub fn button_held(&self) -> bool {
        self.button_held.load(Ordering::SeqCst)
    }

    /// Release the primary button through `sink` if the worker left it held.
    ///
    /// Returns `Ok(false)` when there was nothing to release.
    pub fn release_held_button(&self, sink: &mut dyn PointerSink) -> Result<bool, PointerError> {
        if !self.button_held.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }
        sink.release_button()?;
        Ok(true)
    }

    /// Idle until `stop` is raised or the worker finishes.
    pub fn supervise(&self, stop: &AtomicBool) -> Shutdown {
        loop {
            if stop.load(Ordering::SeqCst) {
                info!("Program interrupted by user");
                return Shutdown::Interrupted;
            }
            match self.status.recv_timeout(IDLE_TICK) {
                Ok(WorkerStatus::Finished(summary)) => {
                    return match summary.end {
                        StreamEnd::Closed => Shutdown::StreamClosed,
                        StreamEnd::Failed(e) => {
                            error!("Error in touchpad reader: {}", e);
                            Shutdown::StreamFailed
                        }
                    };
                }
                Ok(other) => warn!("Unexpected worker status: {:?}", other),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    error!("Touchpad reader exited without reporting");
                    return Shutdown::StreamFailed;
                }
            }
        }
    }
}

/// Full daemon: environment, privilege check, signal handling, worker, supervision.
#[cfg(all(unix, feature = "enigo"))]
pub fn run(settings: Settings) -> Result<Shutdown, BootstrapError> {
    check_privileges()?;

    let mut env = SessionEnv::from_env();
    if env.default_display() {
        info!("DISPLAY not set, using default :0");
    }
    env.export_display();
    info!("DISPLAY={:?}", env.display);
    info!("XAUTHORITY={:?}", env.xauthority);
    info!("XDG_RUNTIME_DIR={:?}", env.xdg_runtime_dir);
    info!("Settings: {}", settings.to_json());

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || stop_handler.store(true, Ordering::SeqCst))?;

    let worker = spawn_worker(
        settings,
        || {
            crate::pointer::EnigoPointer::connect()
                .map(|p| Box::new(p) as Box<dyn PointerSink>)
        },
        backends::probe_devices,
        SystemClock,
    )?;

    let device = worker.wait_started()?;
    info!("Main thread running; reading {}", device);
    let shutdown = worker.supervise(&stop);

    // The worker may still be blocked in a read with the button down.
    if worker.button_held() {
        match crate::pointer::EnigoPointer::connect()
            .and_then(|mut pointer| worker.release_held_button(&mut pointer))
        {
            Ok(_) => info!("Released held button on shutdown"),
            Err(e) => warn!("Could not release held button on shutdown: {}", e),
        }
    }
    Ok(shutdown)
}
