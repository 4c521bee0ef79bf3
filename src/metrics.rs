use std::path::{Path, PathBuf};

use log::debug;
use tensorboard_rs::summary_writer::SummaryWriter;

use crate::error::Result;

/// Destination of the scalars produced by the training loop.
pub trait MetricsSink {
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize);

    /// Flushes pending records and releases the sink.
    fn close(&mut self) -> Result<()>;
}

/// Writes scalars as TensorBoard event files.
pub struct TensorboardSink {
    /// `None` once closed. Dropping the writer joins its thread and
    /// finishes the event file.
    writer: Option<SummaryWriter>,
    logdir: PathBuf,
}

impl TensorboardSink {
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        let logdir = logdir.as_ref().to_path_buf();
        debug!("writing tensorboard events to {}", logdir.display());
        Self {
            writer: Some(SummaryWriter::new(&logdir)),
            logdir,
        }
    }

    /// `runs/<date>_<comment>`, the layout used by TensorBoard writers when
    /// no directory is given.
    pub fn default_logdir(comment: &str) -> PathBuf {
        let now = chrono::Local::now().format("%b%d_%H-%M-%S");
        Path::new("runs").join(format!("{}_{}", now, comment))
    }

    pub fn logdir(&self) -> &Path {
        &self.logdir
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_none()
    }
}

impl MetricsSink for TensorboardSink {
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize) {
        match self.writer.as_mut() {
            Some(writer) => writer.add_scalar(tag, value as f32, step),
            None => debug!("dropping scalar {} at step {}, sink closed", tag, step),
        }
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush();
        }
        Ok(())
    }
}

/// Keeps every scalar in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySink {
    pub records: Vec<(String, f64, usize)>,
    pub closed: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values recorded under `tag`, in step order of arrival.
    pub fn values(&self, tag: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter(|(t, _, _)| t == tag)
            .map(|(_, v, _)| *v)
            .collect()
    }
}

impl MetricsSink for InMemorySink {
    fn add_scalar(&mut self, tag: &str, value: f64, step: usize) {
        self.records.push((tag.to_string(), value, step));
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
