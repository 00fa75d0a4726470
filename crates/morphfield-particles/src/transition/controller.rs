use crate::error::FieldError;
use crate::scroll::{ScrollEvent, ScrollListener, ScrollSection, ScrollSource, Subscription, TriggerId};
use crate::shapes::{ShapeId, ShapeLibrary};

use super::state::TransitionState;

/// Order in which the page walks through the shapes.
pub const SEQUENCE: [ShapeId; 3] = [ShapeId::Earth, ShapeId::Rocket, ShapeId::Land];

/// The transition between two consecutive shapes of [`SEQUENCE`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub from: ShapeId,
    pub to: ShapeId,
}

impl Boundary {
    /// Boundaries of [`SEQUENCE`], top of the page first.
    pub fn sequence() -> impl Iterator<Item = Boundary> {
        (1..SEQUENCE.len()).map(|k| Boundary { from: SEQUENCE[k - 1], to: SEQUENCE[k] })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Slot {
    A,
    B,
}

struct Binding {
    /// The boundary with unavailable shapes already resolved.
    boundary: Boundary,
    section: String,
    subscription: Subscription,
}

/// Owns the [`TransitionState`] and drives it from scroll triggers.
///
/// Each boundary between consecutive shapes is bound to one page section.
/// For boundary `from -> to`:
///
/// | event       | effect        |
/// |-------------|---------------|
/// | `Enter`     | `B = to`      |
/// | `Leave`     | `A = to`      |
/// | `EnterBack` | `A = from`    |
/// | `LeaveBack` | `B = from`    |
/// | `Update(p)` | `progress = p`|
///
/// Scrolling back over a boundary undoes exactly what scrolling forward did.
/// An unavailable shape stands in as the nearest available shape before it
/// in [`SEQUENCE`], so a boundary into a missing shape becomes inert and the
/// next one starts from the stand-in.
/// Dropping the controller (or calling [`teardown`](Self::teardown))
/// unregisters every trigger it bound.
pub struct TransitionController {
    state: TransitionState,
    available: [bool; 3],
    bindings: Vec<Binding>,
}

impl TransitionController {
    /// Controller that only ever selects shapes from `available`.
    pub fn new(available: impl IntoIterator<Item = ShapeId>) -> Self {
        let mut flags = [false; 3];
        for shape in available {
            flags[shape.index() as usize] = true;
        }
        Self { state: TransitionState::default(), available: flags, bindings: Vec::new() }
    }

    pub fn for_library(library: &ShapeLibrary) -> Self {
        Self::new(library.available())
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_available(&self, shape: ShapeId) -> bool {
        self.available[shape.index() as usize]
    }

    /// `shape` itself when available, else the nearest available shape before
    /// it in [`SEQUENCE`], else the first available one after it.
    pub fn resolve(&self, shape: ShapeId) -> Option<ShapeId> {
        let at = SEQUENCE.iter().position(|&s| s == shape)?;
        SEQUENCE[..=at]
            .iter()
            .rev()
            .chain(&SEQUENCE[at + 1..])
            .copied()
            .find(|&s| self.is_available(s))
    }

    /// `boundary` as it plays out on this controller's shapes.
    pub fn effective(&self, boundary: Boundary) -> Option<Boundary> {
        Some(Boundary { from: self.resolve(boundary.from)?, to: self.resolve(boundary.to)? })
    }

    /// Puts both slots on `shape` with zero progress.
    ///
    /// Must run before the first position pass and before
    /// [`bind_sections`](Self::bind_sections).
    pub fn initialize(&mut self, shape: ShapeId) -> Result<(), FieldError> {
        if !self.is_available(shape) {
            return Err(FieldError::ShapeUnavailable(shape));
        }
        self.state = TransitionState::new(shape, shape, 0.0);
        log::debug!("transition initialized on {shape}");
        Ok(())
    }

    /// Registers one trigger per boundary, boundary `k` on `sections[k]`, then
    /// catches up with the source's current offset.
    ///
    /// Replaces any previous bindings. Sections past the last boundary are
    /// ignored.
    pub fn bind_sections(
        &mut self,
        source: &mut ScrollSource,
        sections: &[ScrollSection],
    ) -> Result<(), FieldError> {
        if !self.state.is_initialized() {
            return Err(FieldError::UninitializedTransition);
        }
        let boundaries: Vec<Boundary> = Boundary::sequence().collect();
        if sections.len() < boundaries.len() {
            return Err(FieldError::Config(format!(
                "{} boundaries need at least {} sections, got {}",
                boundaries.len(),
                boundaries.len(),
                sections.len()
            )));
        }

        let effective: Vec<Boundary> = boundaries
            .iter()
            .map(|&b| self.effective(b).ok_or(FieldError::ShapeUnavailable(b.from)))
            .collect::<Result<_, _>>()?;

        self.teardown();
        for (boundary, section) in effective.into_iter().zip(sections) {
            let subscription = source.register(section.trigger);
            if boundary.from == boundary.to {
                log::debug!("section '{}' holds {}", section.id, boundary.from);
            } else {
                log::debug!(
                    "section '{}' drives {} -> {}",
                    section.id,
                    boundary.from,
                    boundary.to
                );
            }
            self.bindings.push(Binding { boundary, section: section.id.clone(), subscription });
        }

        source.refresh(self);
        Ok(())
    }

    /// Unregisters every bound trigger. The state is kept.
    pub fn teardown(&mut self) {
        if !self.bindings.is_empty() {
            log::debug!("releasing {} scroll triggers", self.bindings.len());
        }
        self.bindings.clear();
    }

    pub fn bound_triggers(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.bindings.iter().map(|b| b.subscription.id())
    }

    /// Applies one trigger event for `boundary`.
    pub fn apply(&mut self, boundary: Boundary, event: ScrollEvent) {
        match event {
            ScrollEvent::Enter => self.assign(Slot::B, boundary.to),
            ScrollEvent::Leave => self.assign(Slot::A, boundary.to),
            ScrollEvent::EnterBack => self.assign(Slot::A, boundary.from),
            ScrollEvent::LeaveBack => self.assign(Slot::B, boundary.from),
            ScrollEvent::Update(p) => self.state.set_progress(p),
        }
    }

    fn assign(&mut self, slot: Slot, shape: ShapeId) {
        if !self.is_available(shape) {
            log::warn!("rejected {slot:?} <- {shape}: shape is unavailable");
            return;
        }
        match slot {
            Slot::A => self.state.set_a(shape),
            Slot::B => self.state.set_b(shape),
        }
    }
}

impl ScrollListener for TransitionController {
    fn on_scroll(&mut self, trigger: TriggerId, event: ScrollEvent) {
        let Some(binding) = self.bindings.iter().find(|b| b.subscription.id() == trigger) else {
            log::debug!("event {event:?} from unbound trigger {trigger:?}");
            return;
        };
        let boundary = binding.boundary;
        if !matches!(event, ScrollEvent::Update(_)) {
            log::debug!("section '{}': {event:?}", binding.section);
        }
        self.apply(boundary, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::ElementBounds;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const VIEWPORT: f32 = 800.0;
    const SECTION: f32 = 1000.0;

    /// Three stacked full-height sections; default ranges are
    /// `400..800` for the first boundary and `1400..1800` for the second.
    fn sections() -> Vec<ScrollSection> {
        (0..3)
            .map(|k| {
                let element = ElementBounds::new(k as f32 * SECTION, SECTION);
                ScrollSection::new(format!("sect-{}", k + 1), element)
            })
            .collect()
    }

    fn bound() -> (TransitionController, ScrollSource) {
        bound_with(&ShapeId::ALL)
    }

    /// Controller over `available`, started on the first available shape.
    fn bound_with(available: &[ShapeId]) -> (TransitionController, ScrollSource) {
        let mut controller = TransitionController::new(available.iter().copied());
        let first = SEQUENCE.into_iter().find(|s| available.contains(s)).unwrap();
        controller.initialize(first).unwrap();
        let mut source = ScrollSource::new(VIEWPORT);
        controller.bind_sections(&mut source, &sections()).unwrap();
        (controller, source)
    }

    /// Every 50px down the page and back; the state at each offset on the way
    /// back must match the way down.
    fn assert_retraces(available: &[ShapeId]) {
        let (mut controller, mut source) = bound_with(available);
        let offsets: Vec<f32> = (0..=3000).step_by(50).map(|o| o as f32).collect();
        let mut down = Vec::new();
        for &offset in &offsets {
            source.scroll_to(offset, &mut controller);
            down.push(visible(controller.state()));
        }
        for (i, &offset) in offsets.iter().enumerate().rev() {
            source.scroll_to(offset, &mut controller);
            assert_eq!(visible(controller.state()), down[i], "diverged at offset {offset}");
        }
    }

    fn assert_matches_direct_scroll(available: &[ShapeId]) {
        let mut rng = StdRng::seed_from_u64(2024);
        let (mut wandering, mut source) = bound_with(available);

        for _ in 0..500 {
            let target = rng.random_range(0.0..3000.0f32);
            source.scroll_to(target, &mut wandering);

            let (mut direct, mut fresh) = bound_with(available);
            fresh.scroll_to(target, &mut direct);
            assert_eq!(
                visible(wandering.state()),
                visible(direct.state()),
                "diverged at offset {target}"
            );
        }
    }

    fn state(a: ShapeId, b: ShapeId, p: f32) -> TransitionState {
        TransitionState::new(a, b, p)
    }

    /// What is on screen: with both slots on one shape the progress is irrelevant.
    fn visible(s: TransitionState) -> (Option<ShapeId>, Option<ShapeId>, f32) {
        if s.shape_a() == s.shape_b() {
            (s.shape_a(), s.shape_b(), 0.0)
        } else {
            (s.shape_a(), s.shape_b(), s.progress())
        }
    }

    // ── initialization ────────────────────────────────────────────────────

    #[test]
    fn starts_on_earth() {
        let (controller, _source) = bound();
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Earth, 0.0));
    }

    #[test]
    fn binding_requires_initialization() {
        let mut controller = TransitionController::new(ShapeId::ALL);
        let mut source = ScrollSource::new(VIEWPORT);
        let err = controller.bind_sections(&mut source, &sections()).unwrap_err();
        assert!(matches!(err, FieldError::UninitializedTransition));
        assert_eq!(source.trigger_count(), 0);
    }

    #[test]
    fn binding_needs_a_section_per_boundary() {
        let mut controller = TransitionController::new(ShapeId::ALL);
        controller.initialize(ShapeId::Earth).unwrap();
        let mut source = ScrollSource::new(VIEWPORT);
        let err = controller.bind_sections(&mut source, &sections()[..1]).unwrap_err();
        assert!(matches!(err, FieldError::Config(_)));
    }

    #[test]
    fn cannot_initialize_on_unavailable_shape() {
        let mut controller = TransitionController::new([ShapeId::Rocket]);
        assert!(matches!(
            controller.initialize(ShapeId::Earth),
            Err(FieldError::ShapeUnavailable(ShapeId::Earth))
        ));
        assert!(!controller.state().is_initialized());
    }

    // ── boundary edges ────────────────────────────────────────────────────

    #[test]
    fn first_boundary_forward() {
        let (mut controller, mut source) = bound();

        source.scroll_to(600.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Rocket, 0.5));

        source.scroll_to(900.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Rocket, ShapeId::Rocket, 1.0));
    }

    #[test]
    fn second_boundary_blends_rocket_into_land() {
        let (mut controller, mut source) = bound();
        source.scroll_to(1600.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Rocket, ShapeId::Land, 0.5));
    }

    #[test]
    fn enter_back_restores_from_shape() {
        let (mut controller, mut source) = bound();
        source.scroll_to(900.0, &mut controller);
        source.scroll_to(700.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Rocket, 0.75));
    }

    #[test]
    fn scrubbing_is_monotonic_inside_a_range() {
        let (mut controller, mut source) = bound();
        let mut last = 0.0;
        for offset in (400..=800).step_by(25) {
            source.scroll_to(offset as f32, &mut controller);
            let p = controller.state().progress();
            assert!(p >= last);
            last = p;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn forward_then_back_returns_to_initial_state() {
        let (mut controller, mut source) = bound();
        for offset in (0..=3000).step_by(50) {
            source.scroll_to(offset as f32, &mut controller);
        }
        assert_eq!(controller.state(), state(ShapeId::Land, ShapeId::Land, 1.0));
        for offset in (0..=3000).rev().step_by(50) {
            source.scroll_to(offset as f32, &mut controller);
        }
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Earth, 0.0));
    }

    #[test]
    fn full_page_jumps_are_reversible() {
        let (mut controller, mut source) = bound();
        source.scroll_to(3000.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Land, ShapeId::Land, 1.0));
        source.scroll_to(0.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Earth, 0.0));
    }

    #[test]
    fn oscillation_matches_direct_scroll() {
        assert_matches_direct_scroll(&ShapeId::ALL);
    }

    #[test]
    fn scrolling_back_retraces_scrolling_down() {
        assert_retraces(&ShapeId::ALL);
    }

    #[test]
    fn oscillating_around_an_edge_never_sticks() {
        let (mut controller, mut source) = bound();
        for _ in 0..20 {
            source.scroll_to(390.0, &mut controller);
            source.scroll_to(410.0, &mut controller);
            source.scroll_to(790.0, &mut controller);
            source.scroll_to(810.0, &mut controller);
        }
        source.scroll_to(600.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Rocket, 0.5));
    }

    // ── availability and lifecycle ────────────────────────────────────────

    #[test]
    fn unavailable_shape_is_never_selected() {
        let mut controller = TransitionController::new([ShapeId::Earth, ShapeId::Land]);
        controller.initialize(ShapeId::Earth).unwrap();
        let mut source = ScrollSource::new(VIEWPORT);
        controller.bind_sections(&mut source, &sections()).unwrap();

        for offset in [600.0, 900.0, 1600.0, 3000.0, 1600.0, 600.0, 0.0] {
            source.scroll_to(offset, &mut controller);
            let s = controller.state();
            assert_ne!(s.shape_a(), Some(ShapeId::Rocket));
            assert_ne!(s.shape_b(), Some(ShapeId::Rocket));
        }
    }

    #[test]
    fn missing_middle_shape_resolves_to_the_one_before() {
        let controller = TransitionController::new([ShapeId::Earth, ShapeId::Land]);
        assert_eq!(controller.resolve(ShapeId::Rocket), Some(ShapeId::Earth));
        assert_eq!(controller.resolve(ShapeId::Land), Some(ShapeId::Land));

        let effective: Vec<Boundary> =
            Boundary::sequence().filter_map(|b| controller.effective(b)).collect();
        assert_eq!(
            effective,
            vec![
                Boundary { from: ShapeId::Earth, to: ShapeId::Earth },
                Boundary { from: ShapeId::Earth, to: ShapeId::Land },
            ]
        );
    }

    #[test]
    fn missing_first_shape_resolves_forward() {
        let controller = TransitionController::new([ShapeId::Rocket, ShapeId::Land]);
        assert_eq!(controller.resolve(ShapeId::Earth), Some(ShapeId::Rocket));
        assert_eq!(TransitionController::new(std::iter::empty()).resolve(ShapeId::Earth), None);
    }

    #[test]
    fn missing_rocket_retraces_and_morphs_earth_into_land() {
        let available = [ShapeId::Earth, ShapeId::Land];
        assert_retraces(&available);
        assert_matches_direct_scroll(&available);

        let (mut controller, mut source) = bound_with(&available);
        source.scroll_to(600.0, &mut controller);
        let forward = visible(controller.state());
        source.scroll_to(3000.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Land, ShapeId::Land, 1.0));
        source.scroll_to(600.0, &mut controller);
        assert_eq!(visible(controller.state()), forward);
        assert_eq!(forward, (Some(ShapeId::Earth), Some(ShapeId::Earth), 0.0));

        source.scroll_to(1600.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Land, 0.5));
        source.scroll_to(0.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Earth, 0.0));
    }

    #[test]
    fn missing_earth_starts_and_ends_on_rocket() {
        let available = [ShapeId::Rocket, ShapeId::Land];
        assert_retraces(&available);
        assert_matches_direct_scroll(&available);

        let (mut controller, mut source) = bound_with(&available);
        source.scroll_to(600.0, &mut controller);
        assert_eq!(visible(controller.state()), (Some(ShapeId::Rocket), Some(ShapeId::Rocket), 0.0));
        source.scroll_to(3000.0, &mut controller);
        source.scroll_to(0.0, &mut controller);
        assert_eq!(controller.state().pair().unwrap(), (ShapeId::Rocket, ShapeId::Rocket));
    }

    #[test]
    fn teardown_releases_triggers() {
        let (mut controller, mut source) = bound();
        assert_eq!(source.trigger_count(), 2);
        controller.teardown();
        assert_eq!(source.trigger_count(), 0);

        source.scroll_to(600.0, &mut controller);
        assert_eq!(controller.state(), state(ShapeId::Earth, ShapeId::Earth, 0.0));
    }

    #[test]
    fn dropping_controller_releases_triggers() {
        let (controller, source) = bound();
        drop(controller);
        assert_eq!(source.trigger_count(), 0);
    }

    #[test]
    fn rebinding_replaces_triggers() {
        let (mut controller, mut source) = bound();
        controller.bind_sections(&mut source, &sections()).unwrap();
        assert_eq!(source.trigger_count(), 2);
        assert_eq!(controller.bound_triggers().count(), 2);
    }

    #[test]
    fn binding_mid_page_catches_up() {
        let mut controller = TransitionController::new(ShapeId::ALL);
        controller.initialize(ShapeId::Earth).unwrap();
        let mut source = ScrollSource::new(VIEWPORT);
        source.scroll_to(1600.0, &mut controller);
        controller.bind_sections(&mut source, &sections()).unwrap();
        assert_eq!(controller.state(), state(ShapeId::Rocket, ShapeId::Land, 0.5));
    }
}
