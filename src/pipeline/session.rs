// Groove Session - Request/response generation with a last-good output slot
// Newer requests supersede older ones; failures never replace a good result

use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwapOption;
use rand::Rng;

use crate::audio::SoundProvider;
use crate::render::{OfflineMixer, RenderContext, RenderEngine, RenderOutcome, RenderSession};

use super::config::GrooveSettings;
use super::generate::{prepare_generation, GenerationError, GenerationOutput, PreparedGeneration};

/// Result of a generation request that was not rejected
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Completed(Arc<GenerationOutput>),

    /// A newer request started before this one finished
    Superseded,
}

pub struct GrooveSession<E = OfflineMixer> {
    renders: RenderSession<E>,
    current: ArcSwapOption<GenerationOutput>,

    /// Held while issuing contexts and while storing, so no request can
    /// start between the supersede check and the store
    handover: Mutex<()>,
}

impl GrooveSession<OfflineMixer> {
    pub fn new() -> Self {
        Self::with_engine(OfflineMixer)
    }
}

impl Default for GrooveSession<OfflineMixer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RenderEngine> GrooveSession<E> {
    pub fn with_engine(engine: E) -> Self {
        GrooveSession {
            renders: RenderSession::new(engine),
            current: ArcSwapOption::empty(),
            handover: Mutex::new(()),
        }
    }

    fn handover(&self) -> MutexGuard<'_, ()> {
        self.handover.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self) -> RenderContext {
        let _guard = self.handover();
        self.renders.begin()
    }

    /// Store `output` unless `context` has been superseded in the meantime
    fn store_if_current(&self, context: &RenderContext, output: &Arc<GenerationOutput>) -> bool {
        let _guard = self.handover();
        if context.is_superseded() {
            return false;
        }
        self.current.store(Some(Arc::clone(output)));
        true
    }

    /// Last successful generation
    pub fn current(&self) -> Option<Arc<GenerationOutput>> {
        self.current.load_full()
    }

    /// True when there is no output yet or `live` no longer matches it
    pub fn is_stale(&self, live: &GrooveSettings) -> bool {
        self.current()
            .map_or(true, |output| output.state.is_stale(live))
    }

    /// Supersede whatever render is in flight
    pub fn cancel(&self) {
        let _guard = self.handover();
        self.renders.cancel();
    }

    /// Generate and render one groove.
    ///
    /// The request supersedes any earlier one as soon as it starts, even if
    /// it is then rejected. Only a completed, current render is stored.
    pub async fn generate<R: Rng>(
        &self,
        settings: &GrooveSettings,
        sounds: &dyn SoundProvider,
        rng: &mut R,
    ) -> Result<GenerationOutcome, GenerationError> {
        let context = self.begin();
        log::info!(
            "Generation {} started: {} instruments @ {} bpm",
            context.id(),
            settings.instruments.len(),
            settings.config.bpm
        );

        let PreparedGeneration { state, parts, job } = prepare_generation(settings, sounds, rng)?;

        let buffer = match self.renders.render_with(job, context.clone()).await? {
            RenderOutcome::Rendered(buffer) => buffer,
            RenderOutcome::Superseded => return Ok(GenerationOutcome::Superseded),
        };

        let output = Arc::new(GenerationOutput::new(state, parts, buffer));
        if !self.store_if_current(&context, &output) {
            log::debug!("Generation {} superseded after rendering", context.id());
            return Ok(GenerationOutcome::Superseded);
        }
        log::info!("Generation {} stored as {}", output.id, output.state.fingerprint());

        Ok(GenerationOutcome::Completed(output))
    }
}
