//! Worker thread for the mediascope backend operations.
//!
//! The [MediaBackend] lives on its own thread and answers one [WorkerTask] at a time.
//! Every result, success or failure, goes back as a [WorkerResponse] carrying the
//! `request_id` of the task that caused it, so the session can drop stale answers.
//!
//! # Caution:
//! This module is a central protocol boundary. Adding or editing variants here
//! requires matching changes in the session's response handling.

use crate::config::General;
use crate::core::backend::{BackendError, MediaBackend};
use crate::core::stream::{About, Parameter, PropertyRequest, StreamCounts, StreamProperties};

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::path::PathBuf;
use std::thread;

/// Channel ends of the backend worker as seen from the session.
pub struct Workers {
    task_tx: Sender<WorkerTask>,
    response_rx: Receiver<WorkerResponse>,
}

impl Workers {
    /// Moves the backend onto a new worker thread.
    ///
    /// The thread exits once every task sender is dropped.
    pub fn spawn<B: MediaBackend + 'static>(backend: B) -> Self {
        let (task_tx, task_rx) = unbounded::<WorkerTask>();
        let (res_tx, response_rx) = unbounded::<WorkerResponse>();

        start_backend_worker(backend, task_rx, res_tx);

        Self {
            task_tx,
            response_rx,
        }
    }

    /// Wraps existing channel ends. Whoever owns the other ends plays the backend.
    pub fn from_channels(task_tx: Sender<WorkerTask>, response_rx: Receiver<WorkerResponse>) -> Self {
        Self {
            task_tx,
            response_rx,
        }
    }

    /// Accessor for the backend task sender.
    pub fn task_tx(&self) -> &Sender<WorkerTask> {
        &self.task_tx
    }

    /// Accessor for the worker response receiver.
    pub fn response_rx(&self) -> &Receiver<WorkerResponse> {
        &self.response_rx
    }
}

/// Which property set a properties task asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyScope {
    /// Only the listed properties (summary views)
    Common(Vec<PropertyRequest>),
    /// Every property of every instance (details view, export)
    All,
}

impl PropertyScope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            PropertyScope::Common(_) => ScopeKind::Common,
            PropertyScope::All => ScopeKind::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Common,
    All,
}

impl ScopeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScopeKind::Common => "common",
            ScopeKind::All => "all",
        }
    }
}

/// Tasks sent to the worker thread via channel.
#[derive(Debug)]
pub enum WorkerTask {
    LoadAbout {
        request_id: u64,
    },
    LoadParameters {
        request_id: u64,
    },
    LoadConfig {
        request_id: u64,
    },
    SaveConfig {
        config: General,
        request_id: u64,
    },
    ResolveFiles {
        paths: Vec<PathBuf>,
        append: bool,
        request_id: u64,
    },
    LoadStreamCounts {
        file: PathBuf,
        request_id: u64,
    },
    LoadProperties {
        file: PathBuf,
        scope: PropertyScope,
        request_id: u64,
    },
    WriteTextFile {
        path: PathBuf,
        text: String,
        request_id: u64,
    },
}

/// Responses sent from the worker thread back to the session via the channel.
///
/// Each variant carries the outcome of exactly one [WorkerTask].
#[derive(Debug)]
pub enum WorkerResponse {
    About {
        result: Result<About, BackendError>,
        request_id: u64,
    },
    Parameters {
        result: Result<Vec<Parameter>, BackendError>,
        request_id: u64,
    },
    Config {
        result: Result<General, BackendError>,
        saved: bool,
        request_id: u64,
    },
    FilesResolved {
        result: Result<Vec<PathBuf>, BackendError>,
        append: bool,
        request_id: u64,
    },
    StreamCounts {
        file: PathBuf,
        result: Result<StreamCounts, BackendError>,
        request_id: u64,
    },
    Properties {
        file: PathBuf,
        scope: ScopeKind,
        result: Result<Vec<StreamProperties>, BackendError>,
        request_id: u64,
    },
    TextFileWritten {
        path: PathBuf,
        result: Result<(), BackendError>,
        request_id: u64,
    },
}

/// Runs a single task against the backend.
pub fn execute<B: MediaBackend + ?Sized>(backend: &mut B, task: WorkerTask) -> WorkerResponse {
    match task {
        WorkerTask::LoadAbout { request_id } => WorkerResponse::About {
            result: backend.about(),
            request_id,
        },
        WorkerTask::LoadParameters { request_id } => WorkerResponse::Parameters {
            result: backend.parameters(),
            request_id,
        },
        WorkerTask::LoadConfig { request_id } => WorkerResponse::Config {
            result: backend.config(),
            saved: false,
            request_id,
        },
        WorkerTask::SaveConfig { config, request_id } => WorkerResponse::Config {
            result: backend.set_config(config),
            saved: true,
            request_id,
        },
        WorkerTask::ResolveFiles {
            paths,
            append,
            request_id,
        } => WorkerResponse::FilesResolved {
            result: backend.files(&paths),
            append,
            request_id,
        },
        WorkerTask::LoadStreamCounts { file, request_id } => {
            let result = backend.stream_counts(&file);
            WorkerResponse::StreamCounts {
                file,
                result,
                request_id,
            }
        }
        WorkerTask::LoadProperties {
            file,
            scope,
            request_id,
        } => {
            let result = match &scope {
                PropertyScope::Common(requests) => backend.properties(&file, Some(requests)),
                PropertyScope::All => backend.properties(&file, None),
            };
            WorkerResponse::Properties {
                file,
                scope: scope.kind(),
                result,
                request_id,
            }
        }
        WorkerTask::WriteTextFile {
            path,
            text,
            request_id,
        } => {
            let result = backend.write_text_file(&path, &text);
            WorkerResponse::TextFileWritten {
                path,
                result,
                request_id,
            }
        }
    }
}

/// Starts the backend worker thread, which listens to [WorkerTask] and sends back [WorkerResponse]
///
/// # Arguments
/// * `backend` - The backend, owned by the thread from now on
/// * `task_rx` - Receiver channel for incoming tasks
/// * `res_tx` - Sender channel for outgoing responses
fn start_backend_worker<B: MediaBackend + 'static>(
    mut backend: B,
    task_rx: Receiver<WorkerTask>,
    res_tx: Sender<WorkerResponse>,
) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            log::debug!("Worker task: {:?}", task);
            let response = execute(&mut backend, task);
            if res_tx.send(response).is_err() {
                break;
            }
        }
        log::debug!("Backend worker stopped");
    });
}

/// Worker thread tests.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stream::{PropertyMap, StreamKind};

    use std::path::Path;
    use std::time::Duration;

    /// Backend answering from memory.
    struct FakeBackend {
        general: General,
    }

    impl MediaBackend for FakeBackend {
        fn about(&self) -> Result<About, BackendError> {
            Ok(About {
                app_version: "test".into(),
                backend_version: "v1.0".into(),
            })
        }

        fn config(&self) -> Result<General, BackendError> {
            Ok(self.general.clone())
        }

        fn set_config(&mut self, config: General) -> Result<General, BackendError> {
            self.general = config.normalized();
            Ok(self.general.clone())
        }

        fn files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, BackendError> {
            Ok(paths.to_vec())
        }

        fn parameters(&self) -> Result<Vec<Parameter>, BackendError> {
            Ok(vec![])
        }

        fn stream_counts(&self, file: &Path) -> Result<StreamCounts, BackendError> {
            if file.ends_with("broken.mkv") {
                return Err(BackendError::Parse("broken".into()));
            }
            Ok([(StreamKind::General, 1), (StreamKind::Video, 1)]
                .into_iter()
                .collect())
        }

        fn properties(
            &self,
            _file: &Path,
            requests: Option<&[PropertyRequest]>,
        ) -> Result<Vec<StreamProperties>, BackendError> {
            let mut map = PropertyMap::new();
            map.insert("Format".into(), "AVC".into());
            if requests.is_none() {
                map.insert("Encoded_Library".into(), "x264".into());
            }
            Ok(vec![StreamProperties::new(StreamKind::Video, 0, map)])
        }

        fn write_text_file(&self, _path: &Path, _text: &str) -> Result<(), BackendError> {
            Err(BackendError::Unsupported("read-only".into()))
        }
    }

    fn workers() -> Workers {
        Workers::spawn(FakeBackend {
            general: General::default(),
        })
    }

    #[test]
    fn worker_answers_with_request_id() -> Result<(), Box<dyn std::error::Error>> {
        let workers = workers();
        workers.task_tx().send(WorkerTask::LoadStreamCounts {
            file: PathBuf::from("a.mkv"),
            request_id: 7,
        })?;

        match workers.response_rx().recv_timeout(Duration::from_secs(2))? {
            WorkerResponse::StreamCounts {
                file,
                result,
                request_id,
            } => {
                assert_eq!(request_id, 7);
                assert_eq!(file, PathBuf::from("a.mkv"));
                assert_eq!(result?.count(StreamKind::Video), 1);
            }
            other => return Err(format!("Unexpected response: {:?}", other).into()),
        }
        Ok(())
    }

    #[test]
    fn backend_errors_travel_back() -> Result<(), Box<dyn std::error::Error>> {
        let workers = workers();
        workers.task_tx().send(WorkerTask::LoadStreamCounts {
            file: PathBuf::from("broken.mkv"),
            request_id: 1,
        })?;
        workers.task_tx().send(WorkerTask::WriteTextFile {
            path: PathBuf::from("out.json"),
            text: "{}".into(),
            request_id: 2,
        })?;

        let first = workers.response_rx().recv_timeout(Duration::from_secs(2))?;
        assert!(matches!(
            first,
            WorkerResponse::StreamCounts {
                result: Err(BackendError::Parse(_)),
                request_id: 1,
                ..
            }
        ));
        let second = workers.response_rx().recv_timeout(Duration::from_secs(2))?;
        assert!(matches!(
            second,
            WorkerResponse::TextFileWritten {
                result: Err(BackendError::Unsupported(_)),
                request_id: 2,
                ..
            }
        ));
        Ok(())
    }

    #[test]
    fn properties_scope_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let mut backend = FakeBackend {
            general: General::default(),
        };
        let response = execute(
            &mut backend,
            WorkerTask::LoadProperties {
                file: PathBuf::from("a.mkv"),
                scope: PropertyScope::All,
                request_id: 3,
            },
        );
        match response {
            WorkerResponse::Properties { scope, result, .. } => {
                assert_eq!(scope, ScopeKind::All);
                assert_eq!(result?[0].get("Encoded_Library"), Some("x264"));
            }
            other => return Err(format!("Unexpected response: {:?}", other).into()),
        }
        Ok(())
    }

    #[test]
    fn save_config_echoes_normalized_record() {
        let mut backend = FakeBackend {
            general: General::default(),
        };
        let mut config = General::default();
        config.file_extensions.video = vec![".MKV".into()];

        match execute(
            &mut backend,
            WorkerTask::SaveConfig {
                config,
                request_id: 9,
            },
        ) {
            WorkerResponse::Config { result, saved, .. } => {
                assert!(saved);
                let general = result.unwrap();
                assert_eq!(general.file_extensions.video, vec!["mkv"]);
            }
            other => panic!("Unexpected response: {:?}", other),
        }
    }
}
