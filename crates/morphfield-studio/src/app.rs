use anyhow::Context;
use winit::dpi::LogicalSize;

use morphfield_engine::core::{App as EngineApp, AppControl, FrameCtx};
use morphfield_engine::device::GpuInit;
use morphfield_engine::input::Key;
use morphfield_engine::paint::Color;
use morphfield_engine::window::{Runtime, RuntimeConfig};
use morphfield_particles::transition::TransitionState;
use morphfield_particles::{FieldConfig, ParticleField};

use crate::meshes::ProceduralMeshes;
use crate::page::{LINE_HEIGHT, Page};

/// Environment variable overriding the particle texture side.
pub const PARTICLES_ENV: &str = "MORPHFIELD_PARTICLES";

/// Section ids of the virtual page, top to bottom.
const SECTIONS: [&str; 3] = ["sect-0", "sect-1", "sect-2"];

// ── Application ───────────────────────────────────────────────────────────

/// Studio application builder.
///
/// ```rust,ignore
/// Application::new()
///     .title("morphfield")
///     .particles(256)
///     .rotation_speed(0.1)
///     .run()?;
/// ```
pub struct Application {
    title:          String,
    width:          f64,
    height:         f64,
    section_height: f32,
    smoothing:      f32,
    background:     Color,
    config:         FieldConfig,
    meshes:         ProceduralMeshes,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:          "morphfield".to_string(),
            width:          1280.0,
            height:         720.0,
            section_height: 1000.0,
            smoothing:      0.15,
            background:     Color::from_srgb_u8(7, 8, 14, 255),
            config:         FieldConfig::default(),
            meshes:         ProceduralMeshes::default(),
        }
    }

    /// Set the window title.
    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Side of the particle textures; the field draws `side²` particles.
    ///
    /// `MORPHFIELD_PARTICLES` overrides this at [`run`](Self::run).
    pub fn particles(mut self, side: u32) -> Self {
        self.config.size = side;
        self
    }

    /// Whole-cloud rotation in radians per second.
    pub fn rotation_speed(mut self, radians_per_second: f32) -> Self {
        self.config.rotation_speed = radians_per_second;
        self
    }

    /// Idle drift amplitude (model units) and angular speed.
    pub fn noise(mut self, amplitude: f32, speed: f32) -> Self {
        self.config = self.config.with_noise(amplitude, speed);
        self
    }

    /// Height of every page section in logical pixels.
    pub fn section_height(mut self, height: f32) -> Self {
        self.section_height = height;
        self
    }

    /// Scroll easing time constant in seconds; `0` follows input exactly.
    pub fn scroll_smoothing(mut self, seconds: f32) -> Self {
        self.smoothing = seconds;
        self
    }

    // ── Entry point ───────────────────────────────────────────────────────

    /// Opens the window and runs until it is closed.
    pub fn run(mut self) -> anyhow::Result<()> {
        if let Some(side) = particles_override(std::env::var(PARTICLES_ENV).ok().as_deref()) {
            log::info!("{PARTICLES_ENV}={side}");
            self.config.size = side;
        }
        self.config.validate().context("invalid particle field configuration")?;

        let config = RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let state = StudioState::new(self);
        Runtime::run(config, GpuInit::default(), state).context("morphfield runtime failed")
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses the texture-side override; unusable values are logged and ignored.
fn particles_override(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    match raw.parse::<u32>() {
        Ok(side) if side > 0 => Some(side),
        _ => {
            log::warn!("ignoring {PARTICLES_ENV}={raw:?}: expected a positive integer");
            None
        }
    }
}

/// Window title naming the shapes on screen, e.g. `morphfield · earth → rocket 40%`.
fn caption(title: &str, state: TransitionState) -> String {
    match (state.pair(), state.dominant()) {
        (Ok((a, b)), _) if a != b => {
            let pct = (state.progress() * 100.0).round() as u32;
            format!("{title} · {a} → {b} {pct}%")
        }
        (_, Some(shape)) => format!("{title} · {shape}"),
        _ => title.to_string(),
    }
}

// ── StudioState ───────────────────────────────────────────────────────────

/// Everything needed to build the field once a GPU context exists.
struct Setup {
    config: FieldConfig,
    meshes: ProceduralMeshes,
}

/// Implements the engine's `App`; owns the page and the particle field.
struct StudioState {
    title:      String,
    background: Color,
    page:       Page,
    /// Last title pushed to the window.
    caption:    String,

    /// Consumed by the first rendered frame.
    setup:        Option<Setup>,
    field:        Option<ParticleField>,
    setup_failed: bool,
}

impl StudioState {
    fn new(app: Application) -> Self {
        let page = Page::new(&SECTIONS, app.section_height, app.height as f32)
            .with_smoothing(app.smoothing);
        Self {
            caption:      app.title.clone(),
            title:        app.title,
            background:   app.background,
            page,
            setup:        Some(Setup { config: app.config, meshes: app.meshes }),
            field:        None,
            setup_failed: false,
        }
    }

    /// Applies this frame's navigation input to the page.
    fn handle_input(&mut self, keys: &[Key], wheel: f32) {
        for &key in keys {
            self.page.apply_key(key);
        }
        self.page.scroll_by(wheel);
    }

    /// Keeps the page and the trigger layout in step with the window height.
    fn sync_viewport(&mut self, height: f32) {
        if height <= 0.0 || height == self.page.viewport_height() {
            return;
        }
        log::debug!("viewport height {} -> {height}", self.page.viewport_height());
        self.page.set_viewport_height(height);
        if let Some(field) = self.field.as_mut() {
            field.set_viewport_height(height);
        }
    }
}

impl EngineApp for StudioState {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        self.handle_input(&ctx.input_frame.keys_pressed, ctx.input_frame.scroll_pixels(LINE_HEIGHT));
        self.sync_viewport(ctx.window.logical_size().1);

        // ── Scroll ────────────────────────────────────────────────────────
        let offset = self.page.advance(ctx.time.dt);
        if let Some(field) = self.field.as_mut() {
            field.scroll_to(offset);
        }

        // ── Render ────────────────────────────────────────────────────────
        let elapsed = ctx.time.elapsed;
        let page    = &self.page;
        let setup   = &mut self.setup;
        let field   = &mut self.field;
        let failed  = &mut self.setup_failed;

        let control = ctx.render(self.background, |rctx, target| {
            if field.is_none() {
                if let Some(mut s) = setup.take() {
                    match ParticleField::new(
                        rctx,
                        s.config,
                        &mut s.meshes,
                        page.transition_sections(),
                        page.viewport_height(),
                    ) {
                        Ok(mut built) => {
                            built.scroll_to(page.offset());
                            *field = Some(built);
                        }
                        Err(err) => {
                            log::error!("particle field setup failed: {err}");
                            *failed = true;
                        }
                    }
                }
            }

            if let Some(field) = field.as_mut() {
                field.render(rctx, target, elapsed);
            }
        });

        if self.setup_failed {
            return AppControl::Exit;
        }

        if let Some(field) = self.field.as_ref() {
            let next = caption(&self.title, field.state());
            if next != self.caption {
                ctx.runtime.set_title(next.as_str());
                self.caption = next;
            }
        }
        control
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── environment override ──────────────────────────────────────────────

    #[test]
    fn override_parses_positive_side() {
        assert_eq!(particles_override(Some("256")), Some(256));
        assert_eq!(particles_override(Some(" 64\n")), Some(64));
    }

    #[test]
    fn override_ignores_bad_values() {
        assert_eq!(particles_override(None), None);
        assert_eq!(particles_override(Some("0")), None);
        assert_eq!(particles_override(Some("lots")), None);
        assert_eq!(particles_override(Some("-5")), None);
    }

    // ── builder ───────────────────────────────────────────────────────────

    #[test]
    fn builder_feeds_field_config() {
        let app = Application::new().particles(64).rotation_speed(0.2).noise(0.05, 2.0);
        assert_eq!(app.config.size, 64);
        assert_eq!(app.config.rotation_speed, 0.2);
        assert_eq!(app.config.noise_amplitude, 0.05);
        assert_eq!(app.config.noise_speed, 2.0);
        assert!(app.config.validate().is_ok());
    }

    // ── caption ───────────────────────────────────────────────────────────

    #[test]
    fn caption_names_the_morph() {
        use morphfield_particles::ShapeId;
        let settled = TransitionState::new(ShapeId::Earth, ShapeId::Earth, 0.0);
        assert_eq!(caption("mf", settled), "mf · earth");
        let moving = TransitionState::new(ShapeId::Earth, ShapeId::Rocket, 0.404);
        assert_eq!(caption("mf", moving), "mf · earth → rocket 40%");
        let arrived = TransitionState::new(ShapeId::Rocket, ShapeId::Rocket, 1.0);
        assert_eq!(caption("mf", arrived), "mf · rocket");
        assert_eq!(caption("mf", TransitionState::default()), "mf");
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn input_moves_page_before_field_exists() {
        let mut state = StudioState::new(Application::new().scroll_smoothing(0.0));
        state.handle_input(&[Key::PageDown, Key::ArrowDown], 48.0);
        assert_eq!(state.page.target(), 720.0 * 0.9 + 96.0 + 48.0);
        assert!(state.field.is_none());
    }

    #[test]
    fn viewport_sync_ignores_degenerate_heights() {
        let mut state = StudioState::new(Application::new());
        state.sync_viewport(0.0);
        assert_eq!(state.page.viewport_height(), 720.0);
        state.sync_viewport(900.0);
        assert_eq!(state.page.viewport_height(), 900.0);
    }
}
