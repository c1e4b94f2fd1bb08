use std::{
    fmt::{self, Display, Formatter},
    fs::{self, File},
    future::Future,
    io::{BufWriter, Write},
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
    pin::Pin,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    task::{Context, Poll},
};

use futures::channel::oneshot;
use log::{debug, error, info};

use super::OutputFormat;
use crate::core::{classify, primitives, ShapeKind, ShapeSettings};
use crate::error::{ExportError, ValidationError};

/// Where the export service reports what happened. Implementations must not fail or block.
pub trait DiagnosticSink: Send + Sync {
    fn log_error(&self, error: &ExportError);
    fn log_message(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn log_error(&self, error: &ExportError) {
        error!("{error}");
    }

    fn log_message(&self, message: &str) {
        info!("{message}");
    }
}

/// Cooperative cancel flag, checked between pipeline stages.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub kind: ShapeKind,
    pub format: OutputFormat,
    pub vertex_count: usize,
    pub face_count: usize,
    pub bytes_written: usize,
}

impl Display for ExportSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wrote {} {} to `{}` ({} vertices, {} faces, {} bytes)",
            self.kind,
            self.format,
            self.path.display(),
            self.vertex_count,
            self.face_count,
            self.bytes_written
        )
    }
}

/// Result of an export running on the background pool.
///
/// Dropping the task does not stop the export; use a [`CancellationToken`] for that.
pub struct ExportTask {
    inner: oneshot::Receiver<Result<ExportSummary, ExportError>>,
    sink: Arc<dyn DiagnosticSink>,
}

impl ExportTask {
    /// Blocks the current thread until the export finishes.
    pub fn wait(self) -> Result<ExportSummary, ExportError> {
        futures::executor::block_on(self)
    }
}

impl Future for ExportTask {
    type Output = Result<ExportSummary, ExportError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.inner).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(oneshot::Canceled)) => {
                let err = ExportError::WorkerLost;
                self.sink.log_error(&err);
                Poll::Ready(Err(err))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Turns a shape description into a mesh file.
///
/// Each call classifies the description, generates a fresh mesh with the service's
/// [`ShapeSettings`], serializes it and writes it out. Failures go to the diagnostic sink and are
/// then returned. Exports to the same path are not serialized against each other; whichever
/// finishes last owns the file.
#[derive(Clone)]
pub struct ModelExportService {
    settings: ShapeSettings,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for ModelExportService {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelExportService {
    pub fn new() -> Self {
        Self {
            settings: ShapeSettings::default(),
            sink: Arc::new(LogSink),
        }
    }

    pub fn with_settings(mut self, settings: ShapeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Starts an export on the rayon pool and returns immediately.
    pub fn export(
        &self,
        description: &str,
        output_path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> ExportTask {
        self.export_with_cancel(description, output_path, format, CancellationToken::new())
    }

    pub fn export_with_cancel(
        &self,
        description: &str,
        output_path: impl AsRef<Path>,
        format: OutputFormat,
        cancel: CancellationToken,
    ) -> ExportTask {
        let (sender, receiver) = oneshot::channel();
        let task = ExportTask {
            inner: receiver,
            sink: Arc::clone(&self.sink),
        };

        let path = output_path.as_ref().to_owned();
        if let Err(err) = check_output_path(&path) {
            let err = ExportError::from(err);
            self.sink.log_error(&err);
            let _ = sender.send(Err(err));
            return task;
        }

        let service = self.clone();
        let description = description.to_owned();
        rayon::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                service.run(&description, &path, format, &cancel)
            }));
            match result {
                // the caller may have dropped the task; the file is written either way
                Ok(result) => {
                    let _ = sender.send(result);
                }
                // dropping the sender resolves the task to WorkerLost
                Err(_) => drop(sender),
            }
        });

        task
    }

    /// Runs the whole pipeline on the calling thread.
    pub fn export_blocking(
        &self,
        description: &str,
        output_path: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<ExportSummary, ExportError> {
        self.run(
            description,
            output_path.as_ref(),
            format,
            &CancellationToken::new(),
        )
    }

    fn run(
        &self,
        description: &str,
        path: &Path,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<ExportSummary, ExportError> {
        let result = self.pipeline(description, path, format, cancel);
        match &result {
            Ok(summary) => self.sink.log_message(&summary.to_string()),
            Err(err) => self.sink.log_error(err),
        }
        result
    }

    fn pipeline(
        &self,
        description: &str,
        path: &Path,
        format: OutputFormat,
        cancel: &CancellationToken,
    ) -> Result<ExportSummary, ExportError> {
        check_output_path(path)?;

        let kind = classify(description);
        let params = self.settings.parameters_for(kind)?;
        debug!("classified {description:?} as {kind}, generating with {params:?}");

        check_cancelled(cancel, path)?;
        let mesh = primitives::generate(&params)?;

        check_cancelled(cancel, path)?;
        let text = format.serialize(&mesh, kind);
        debug!(
            "serialized {} vertices / {} faces into {} bytes of {format}",
            mesh.vertex_count(),
            mesh.face_count(),
            text.len()
        );

        check_cancelled(cancel, path)?;
        write_output(path, text.as_bytes(), cancel)?;

        Ok(ExportSummary {
            path: path.to_owned(),
            kind,
            format,
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            bytes_written: text.len(),
        })
    }
}

fn check_output_path(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        Err(ValidationError::BlankOutputPath)
    } else {
        Ok(())
    }
}

fn check_cancelled(cancel: &CancellationToken, path: &Path) -> Result<(), ExportError> {
    if cancel.is_cancelled() {
        Err(ExportError::Cancelled(path.to_owned()))
    } else {
        Ok(())
    }
}

/// Writes into a sibling staging file and renames it over `path`, so a reader never sees a
/// half-written file.
fn write_output(
    path: &Path,
    contents: &[u8],
    cancel: &CancellationToken,
) -> Result<(), ExportError> {
    let mut staged = StagedFile::create(path).map_err(|e| ExportError::io(path, e))?;
    staged
        .write_all(contents)
        .map_err(|e| ExportError::io(path, e))?;

    check_cancelled(cancel, path)?;
    staged.commit().map_err(|e| ExportError::io(path, e))
}

static STAGING_SEQ: AtomicU64 = AtomicU64::new(0);

/// Staging file that is removed on drop unless it was committed.
struct StagedFile {
    staging: PathBuf,
    target: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl StagedFile {
    fn create(target: &Path) -> std::io::Result<Self> {
        let dir = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "export".to_owned());
        let seq = STAGING_SEQ.fetch_add(1, Ordering::Relaxed);
        let staging = dir.join(format!(".{name}.{}.{seq}.tmp", std::process::id()));

        let file = File::create(&staging)?;
        Ok(Self {
            staging,
            target: target.to_owned(),
            writer: Some(BufWriter::new(file)),
        })
    }

    fn write_all(&mut self, contents: &[u8]) -> std::io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(contents),
            None => Ok(()),
        }
    }

    fn commit(mut self) -> std::io::Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        // on failure Drop removes the staging file
        fs::rename(&self.staging, &self.target)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        drop(self.writer.take());
        if self.staging.exists() {
            let _ = fs::remove_file(&self.staging);
        }
    }
}
