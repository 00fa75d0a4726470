use rand::SeedableRng;
use rand::rngs::StdRng;

use morphfield_engine::render::{RenderCtx, RenderTarget};

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::gpu::{GpuShapeSet, ParticleFrame, ParticleRenderer, ParticleUniforms, PositionPass, PositionUniforms};
use crate::mesh::MeshProvider;
use crate::random;
use crate::scroll::{ScrollSection, ScrollSource};
use crate::shapes::{ShapeId, ShapeLibrary};
use crate::transition::{SEQUENCE, TransitionController, TransitionState};

/// The scroll-driven particle field.
///
/// Owns the shape textures, both GPU passes, the transition controller and
/// the scroll source feeding it. A frame is:
///
/// 1. scroll updates, applied synchronously through [`scroll_to`](Self::scroll_to)
/// 2. the position pass, reading the current [`TransitionState`]
/// 3. the particle pass, reading the texture written in step 2
///
/// Steps 2 and 3 are recorded into the same encoder by [`render`](Self::render).
pub struct ParticleField {
    config: FieldConfig,
    library: ShapeLibrary,
    shapes: GpuShapeSet,
    position_pass: PositionPass,
    particles: ParticleRenderer,

    controller: TransitionController,
    source: ScrollSource,

    /// Last per-frame failure, so repeats are logged quietly.
    last_error: Option<String>,
}

impl ParticleField {
    /// Samples every shape from `provider`, uploads the textures and binds
    /// the transition boundaries to `sections`.
    ///
    /// `viewport_height` is the page viewport in logical pixels, the unit the
    /// section bounds use.
    pub fn new<P>(
        ctx: &RenderCtx<'_>,
        config: FieldConfig,
        provider: &mut P,
        sections: &[ScrollSection],
        viewport_height: f32,
    ) -> Result<Self, FieldError>
    where
        P: MeshProvider + ?Sized,
    {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let library = ShapeLibrary::build(provider, config.size, &mut rng)?;
        let table = random::generate(config.size, &mut rng)?;

        let shapes = GpuShapeSet::upload(ctx.device, ctx.queue, &library, &table)?;
        let position_pass = PositionPass::new(ctx.device, &shapes)?;
        let particles = ParticleRenderer::new(ctx.device, position_pass.output(), &table);

        let mut controller = TransitionController::for_library(&library);
        let initial = initial_shape(&library)?;
        if initial != SEQUENCE[0] {
            log::warn!("{} unavailable; starting on {initial}", SEQUENCE[0]);
        }
        controller.initialize(initial)?;

        let mut source = ScrollSource::new(viewport_height);
        controller.bind_sections(&mut source, sections)?;

        log::info!(
            "particle field ready: {} particles, shapes [{}]",
            particles.instance_count(),
            library.available().map(ShapeId::name).collect::<Vec<_>>().join(", ")
        );

        Ok(Self {
            config,
            library,
            shapes,
            position_pass,
            particles,
            controller,
            source,
            last_error: None,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn library(&self) -> &ShapeLibrary {
        &self.library
    }

    pub fn state(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn scroll(&self) -> f32 {
        self.source.scroll()
    }

    /// Moves the page scroll offset (logical px) and applies the resulting
    /// transition updates.
    pub fn scroll_to(&mut self, offset: f32) {
        self.source.scroll_to(offset, &mut self.controller);
    }

    /// Re-measures the trigger ranges for a new viewport height (logical px).
    pub fn set_viewport_height(&mut self, height: f32) {
        self.source.set_viewport_height(height, &mut self.controller);
    }

    /// Re-measures the trigger ranges after a layout change.
    pub fn refresh(&mut self) {
        self.source.refresh(&mut self.controller);
    }

    /// Releases every scroll trigger. The field keeps rendering its last state.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }

    /// Records both passes for this frame.
    ///
    /// Failures are logged and the frame is skipped; the first occurrence of
    /// a failure logs at `error`, repeats at `debug`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, elapsed: f32) {
        match self.try_render(ctx, target, elapsed) {
            Ok(()) => self.last_error = None,
            Err(err) => {
                let msg = err.to_string();
                if self.last_error.as_deref() == Some(msg.as_str()) {
                    log::debug!("frame skipped: {msg}");
                } else {
                    log::error!("frame skipped: {msg}");
                    self.last_error = Some(msg);
                }
            }
        }
    }

    /// Like [`render`](Self::render), but returns the failure instead of logging it.
    pub fn try_render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        elapsed: f32,
    ) -> Result<(), FieldError> {
        let state = self.controller.state();
        let pair = state.pair()?;

        let position = PositionUniforms::new(&state, elapsed, &self.config);
        self.position_pass.encode(
            ctx.device,
            ctx.queue,
            target.encoder,
            &self.shapes,
            pair,
            &position,
        )?;

        let frame = ParticleFrame {
            config: &self.config,
            state,
            elapsed,
            viewport: [ctx.viewport.width, ctx.viewport.height],
            scale_factor: ctx.scale_factor,
        };
        self.particles.render(ctx, target, &ParticleUniforms::new(&frame));
        Ok(())
    }
}

/// First shape of the page sequence that was built.
fn initial_shape(library: &ShapeLibrary) -> Result<ShapeId, FieldError> {
    SEQUENCE
        .into_iter()
        .find(|&shape| library.is_available(shape))
        .ok_or(FieldError::NoShapes)
}
