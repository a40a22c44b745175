//! Orchestration of one report generation round trip.
//!
//! The flow mirrors the user-triggered action: flip the busy indicator on,
//! render the report on a worker thread, persist the bytes, try to open the
//! saved file, and report every outcome through the status sink.  The UI
//! owning thread only blocks on the worker join; the record snapshot is the
//! sole data shared with the worker and it is moved there by value.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::warn;
use thiserror::Error;

use crate::builder::{GenerationError, ReportRenderer};
use crate::model::VehicleRecord;
use crate::storage::{ReportStore, StorageError};
use crate::viewer::{LaunchError, Viewer};

/// Status surface of the presentation layer.
pub trait StatusSink {
    /// Toggles the busy/spinner indicator.
    fn set_busy(&self, busy: bool);
    /// Replaces the user-visible status line.
    fn status(&self, message: &str);
}

/// Errors that abort a flow run before a report file exists.
///
/// Viewer launch failures are deliberately absent: by the time the viewer
/// runs the file is saved, so those are reported through
/// [`FlowOutcome::launch_error`] instead.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Another generation triggered through this flow is still in flight.
    #[error("a report generation is already in progress")]
    AlreadyRunning,
    /// The render worker thread could not be started.
    #[error("failed to start the render worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    /// The render worker panicked.
    #[error("the render worker panicked")]
    WorkerPanicked,
    /// The report could not be assembled or serialized.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// The rendered bytes could not be persisted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of a successful flow run.
#[derive(Debug)]
pub struct FlowOutcome {
    /// Where the report was saved.
    pub path: PathBuf,
    /// The launch failure, if the saved report could not be opened.
    pub launch_error: Option<LaunchError>,
}

/// Drives a record through render, save and open.
///
/// Overlapping invocations are rejected while one run is in flight, so a
/// single record snapshot and destination name are never shared between two
/// generations.
pub struct ReportFlow<R, S, V> {
    renderer: R,
    store: S,
    viewer: V,
    in_flight: AtomicBool,
}

impl<R, S, V> ReportFlow<R, S, V>
where
    R: ReportRenderer + Clone + Send + 'static,
    S: ReportStore,
    V: Viewer,
{
    /// Creates a flow over the given renderer, store and viewer.
    pub fn new(renderer: R, store: S, viewer: V) -> Self {
        Self {
            renderer,
            store,
            viewer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Runs one full generation round trip for `record`.
    pub fn run(
        &self,
        record: &VehicleRecord,
        sink: &dyn StatusSink,
    ) -> Result<FlowOutcome, FlowError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(FlowError::AlreadyRunning);
        }
        let _flight = FlightGuard {
            flag: &self.in_flight,
            sink,
        };

        sink.set_busy(true);
        sink.status("Generating report...");

        let renderer = self.renderer.clone();
        let snapshot = record.clone();
        let worker = match thread::Builder::new()
            .name("report-render".to_owned())
            .spawn(move || renderer.generate(&snapshot))
        {
            Ok(worker) => worker,
            Err(err) => {
                let err = FlowError::WorkerSpawn(err);
                sink.status(&format!("Error: {}", err));
                return Err(err);
            }
        };

        let rendered = match worker.join() {
            Ok(Ok(rendered)) => rendered,
            Ok(Err(err)) => {
                sink.status(&format!("Error: {}", err));
                return Err(err.into());
            }
            Err(_) => {
                sink.status("Error: the render worker panicked");
                return Err(FlowError::WorkerPanicked);
            }
        };

        let path = match self.store.save(&rendered.bytes) {
            Ok(path) => path,
            Err(err) => {
                sink.status(&format!("Error: {}", err));
                return Err(err.into());
            }
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        sink.status(&format!("Report saved to: {}", file_name));

        let launch_error = match self.viewer.open(&path) {
            Ok(()) => None,
            Err(err) => {
                warn!("saved report could not be opened: {}", err);
                sink.status(&format!(
                    "Report saved to {} but it could not be opened: {}",
                    path.display(),
                    err
                ));
                Some(err)
            }
        };

        Ok(FlowOutcome { path, launch_error })
    }
}

/// Resets the busy indicator and the in-flight flag on every exit path.
struct FlightGuard<'a> {
    flag: &'a AtomicBool,
    sink: &'a dyn StatusSink,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.sink.set_busy(false);
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::{FlowError, ReportFlow, StatusSink};
    use crate::builder::{GenerationError, RenderedReport, ReportRenderer};
    use crate::model::VehicleRecord;
    use crate::storage::{ReportStore, StorageError};
    use crate::viewer::{LaunchError, Viewer};
    use genpdf::error::ErrorKind;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{Receiver, Sender};
    use std::sync::{mpsc, Arc, Mutex};
    use std::thread;

    #[derive(Clone)]
    struct FakeRenderer {
        fail: bool,
    }

    /// Signals when `generate` starts and then waits for a release message,
    /// keeping one run in flight for as long as the test needs.
    #[derive(Clone)]
    struct BlockingRenderer {
        started: Arc<Mutex<Sender<()>>>,
        release: Arc<Mutex<Receiver<()>>>,
    }

    impl ReportRenderer for BlockingRenderer {
        fn generate(&self, _record: &VehicleRecord) -> Result<RenderedReport, GenerationError> {
            self.started
                .lock()
                .unwrap()
                .send(())
                .expect("signal render start");
            self.release
                .lock()
                .unwrap()
                .recv()
                .expect("wait for release");
            Ok(RenderedReport {
                bytes: b"%PDF-1.5 fake".to_vec(),
            })
        }
    }

    #[derive(Clone)]
    struct PanickingRenderer;

    impl ReportRenderer for PanickingRenderer {
        fn generate(&self, _record: &VehicleRecord) -> Result<RenderedReport, GenerationError> {
            panic!("renderer blew up");
        }
    }

    impl ReportRenderer for FakeRenderer {
        fn generate(&self, _record: &VehicleRecord) -> Result<RenderedReport, GenerationError> {
            if self.fail {
                Err(GenerationError::Render(genpdf::error::Error::new(
                    "render failure",
                    ErrorKind::InvalidData,
                )))
            } else {
                Ok(RenderedReport {
                    bytes: b"%PDF-1.5 fake".to_vec(),
                })
            }
        }
    }

    struct FakeStore {
        fail: bool,
        saves: AtomicUsize,
    }

    impl FakeStore {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                saves: AtomicUsize::new(0),
            }
        }
    }

    impl ReportStore for &FakeStore {
        fn save(&self, _bytes: &[u8]) -> Result<PathBuf, StorageError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only destination",
                )))
            } else {
                Ok(PathBuf::from("/reports/CarReport_20240101_120000.pdf"))
            }
        }
    }

    struct FakeViewer {
        fail: bool,
        opens: AtomicUsize,
    }

    impl FakeViewer {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                opens: AtomicUsize::new(0),
            }
        }
    }

    impl Viewer for &FakeViewer {
        fn open(&self, path: &Path) -> Result<(), LaunchError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LaunchError::MissingFile(path.to_path_buf()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        statuses: Mutex<Vec<String>>,
        busy_changes: Mutex<Vec<bool>>,
    }

    impl StatusSink for RecordingSink {
        fn set_busy(&self, busy: bool) {
            self.busy_changes.lock().unwrap().push(busy);
        }

        fn status(&self, message: &str) {
            self.statuses.lock().unwrap().push(message.to_owned());
        }
    }

    fn run_flow(
        renderer_fails: bool,
        store: &FakeStore,
        viewer: &FakeViewer,
        sink: &RecordingSink,
    ) -> Result<super::FlowOutcome, FlowError> {
        let flow = ReportFlow::new(
            FakeRenderer {
                fail: renderer_fails,
            },
            store,
            viewer,
        );
        flow.run(&VehicleRecord::default(), sink)
    }

    #[test]
    fn success_reports_saved_file_and_opens_it() {
        let store = FakeStore::new(false);
        let viewer = FakeViewer::new(false);
        let sink = RecordingSink::default();

        let outcome = run_flow(false, &store, &viewer, &sink).expect("flow succeeds");

        assert!(outcome.launch_error.is_none());
        assert_eq!(viewer.opens.load(Ordering::SeqCst), 1);
        let statuses = sink.statuses.lock().unwrap();
        assert_eq!(statuses[0], "Generating report...");
        assert_eq!(
            statuses[1],
            "Report saved to: CarReport_20240101_120000.pdf"
        );
        assert_eq!(*sink.busy_changes.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn generation_failure_skips_save_and_open() {
        let store = FakeStore::new(false);
        let viewer = FakeViewer::new(false);
        let sink = RecordingSink::default();

        let result = run_flow(true, &store, &viewer, &sink);

        assert!(matches!(result, Err(FlowError::Generation(_))));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
        assert_eq!(viewer.opens.load(Ordering::SeqCst), 0);
        let statuses = sink.statuses.lock().unwrap();
        assert!(statuses.last().unwrap().starts_with("Error:"));
        assert_eq!(*sink.busy_changes.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn save_failure_never_invokes_the_viewer() {
        let store = FakeStore::new(true);
        let viewer = FakeViewer::new(false);
        let sink = RecordingSink::default();

        let result = run_flow(false, &store, &viewer, &sink);

        assert!(matches!(result, Err(FlowError::Storage(_))));
        assert_eq!(viewer.opens.load(Ordering::SeqCst), 0);
        assert!(sink
            .statuses
            .lock()
            .unwrap()
            .last()
            .unwrap()
            .starts_with("Error:"));
    }

    #[test]
    fn launch_failure_still_reports_the_saved_path() {
        let store = FakeStore::new(false);
        let viewer = FakeViewer::new(true);
        let sink = RecordingSink::default();

        let outcome = run_flow(false, &store, &viewer, &sink).expect("flow succeeds");

        assert!(outcome.launch_error.is_some());
        let statuses = sink.statuses.lock().unwrap();
        assert!(statuses
            .iter()
            .any(|status| status.starts_with("Report saved to: CarReport_")));
        assert!(statuses.last().unwrap().contains("could not be opened"));
    }

    #[test]
    fn overlapping_run_is_rejected_while_one_is_in_flight() {
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let renderer = BlockingRenderer {
            started: Arc::new(Mutex::new(started_tx)),
            release: Arc::new(Mutex::new(release_rx)),
        };
        let store = FakeStore::new(false);
        let viewer = FakeViewer::new(false);
        let first_sink = RecordingSink::default();
        let second_sink = RecordingSink::default();
        let flow = ReportFlow::new(renderer, &store, &viewer);

        thread::scope(|scope| {
            let first = scope.spawn(|| flow.run(&VehicleRecord::default(), &first_sink));

            started_rx.recv().expect("first run reaches the renderer");
            let second = flow.run(&VehicleRecord::default(), &second_sink);
            assert!(matches!(second, Err(FlowError::AlreadyRunning)));

            release_tx.send(()).expect("release the renderer");
            let outcome = first.join().expect("join first run");
            assert!(outcome.is_ok(), "first run should complete normally");
        });

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(viewer.opens.load(Ordering::SeqCst), 1);
        assert!(second_sink.statuses.lock().unwrap().is_empty());
    }

    #[test]
    fn worker_panic_surfaces_as_error_status() {
        let store = FakeStore::new(false);
        let viewer = FakeViewer::new(false);
        let sink = RecordingSink::default();
        let flow = ReportFlow::new(PanickingRenderer, &store, &viewer);

        let result = flow.run(&VehicleRecord::default(), &sink);

        assert!(matches!(result, Err(FlowError::WorkerPanicked)));
        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
        let statuses = sink.statuses.lock().unwrap();
        assert!(statuses.last().unwrap().starts_with("Error:"));
        assert_eq!(*sink.busy_changes.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn flow_is_reusable_after_a_completed_run() {
        let store = FakeStore::new(false);
        let viewer = FakeViewer::new(false);
        let sink = RecordingSink::default();
        let flow = ReportFlow::new(FakeRenderer { fail: false }, &store, &viewer);

        flow.run(&VehicleRecord::default(), &sink).expect("first run");
        flow.run(&VehicleRecord::default(), &sink).expect("second run");

        assert_eq!(viewer.opens.load(Ordering::SeqCst), 2);
    }
}
