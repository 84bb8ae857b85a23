// Render Engine - Asynchronous offline mixdown with supersede semantics
// A newer render invalidates every older one still in flight

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;

use crate::audio::AudioBuffer;

use super::mixer::mixdown;
use super::schedule::RenderJob;

/// Errors that can occur while rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("No sound buffer for hit type {hit_type} of instrument '{instrument}'")]
    MissingSoundBuffer { instrument: String, hit_type: usize },

    #[error("Render length must be positive, got {length_secs}s")]
    EmptyTimeline { length_secs: f64 },

    #[error("Render was cancelled")]
    Cancelled,

    #[error("Render engine failed: {0}")]
    EngineFailure(String),

    #[error("WAV export failed: {0}")]
    Export(#[from] hound::Error),
}

/// Identity of one render request
///
/// A context stays current until a newer context is issued by the same
/// session.
#[derive(Debug, Clone)]
pub struct RenderContext {
    id: u64,
    latest: Arc<AtomicU64>,
}

impl RenderContext {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_superseded(&self) -> bool {
        self.latest.load(Ordering::SeqCst) != self.id
    }
}

/// A non-realtime rendering engine
pub trait RenderEngine: Send + Sync {
    /// Render a job. Implementations should stop early once `context` is
    /// superseded.
    fn render(
        &self,
        job: RenderJob,
        context: RenderContext,
    ) -> impl Future<Output = Result<AudioBuffer, RenderError>> + Send;
}

/// Default engine: mixes on tokio's blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineMixer;

impl RenderEngine for OfflineMixer {
    fn render(
        &self,
        job: RenderJob,
        context: RenderContext,
    ) -> impl Future<Output = Result<AudioBuffer, RenderError>> + Send {
        async move {
            let task = tokio::task::spawn_blocking(move || mixdown(&job, || context.is_superseded()));
            task.await
                .map_err(|e| RenderError::EngineFailure(format!("render task failed: {}", e)))?
        }
    }
}

/// Result of a render that was not rejected
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(AudioBuffer),

    /// A newer request took over; whatever this render produced is discarded
    Superseded,
}

/// Owns an engine and tracks which render is current
pub struct RenderSession<E> {
    engine: E,
    latest: Arc<AtomicU64>,
}

impl<E: RenderEngine> RenderSession<E> {
    pub fn new(engine: E) -> Self {
        RenderSession {
            engine,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Issue a new context, superseding every earlier one
    pub fn begin(&self) -> RenderContext {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        RenderContext {
            id,
            latest: Arc::clone(&self.latest),
        }
    }

    /// Supersede any render in flight without starting a new one
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    /// Start a fresh render
    pub async fn render(&self, job: RenderJob) -> Result<RenderOutcome, RenderError> {
        let context = self.begin();
        self.render_with(job, context).await
    }

    /// Render under an already issued context.
    ///
    /// Completion of a superseded context (success or failure) is reported
    /// as [`RenderOutcome::Superseded`].
    pub async fn render_with(
        &self,
        job: RenderJob,
        context: RenderContext,
    ) -> Result<RenderOutcome, RenderError> {
        if context.is_superseded() {
            log::warn!("Render {} superseded before it started", context.id());
            return Ok(RenderOutcome::Superseded);
        }

        let voices = job.voices.len();
        let result = self.engine.render(job, context.clone()).await;

        if context.is_superseded() {
            log::warn!("Render {} superseded, dropping its result", context.id());
            return Ok(RenderOutcome::Superseded);
        }

        let buffer = result?;
        log::debug!("Render {} completed with {} voices", context.id(), voices);
        Ok(RenderOutcome::Rendered(buffer))
    }
}
