use crate::error::FieldError;
use crate::shapes::ShapeId;

/// Which two shapes are blended, and how far.
///
/// Both slots start unassigned; the field refuses to run a position pass
/// until they are set. `progress` is always within `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct TransitionState {
    shape_a: Option<ShapeId>,
    shape_b: Option<ShapeId>,
    progress: f32,
}

impl TransitionState {
    /// A fully assigned state.
    pub fn new(shape_a: ShapeId, shape_b: ShapeId, progress: f32) -> Self {
        let mut state = Self { shape_a: Some(shape_a), shape_b: Some(shape_b), progress: 0.0 };
        state.set_progress(progress);
        state
    }

    pub fn shape_a(&self) -> Option<ShapeId> {
        self.shape_a
    }

    pub fn shape_b(&self) -> Option<ShapeId> {
        self.shape_b
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_initialized(&self) -> bool {
        self.shape_a.is_some() && self.shape_b.is_some()
    }

    /// Both shapes, or `UninitializedTransition` while a slot is unassigned.
    pub fn pair(&self) -> Result<(ShapeId, ShapeId), FieldError> {
        match (self.shape_a, self.shape_b) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(FieldError::UninitializedTransition),
        }
    }

    /// The shape the blend currently shows most of.
    pub fn dominant(&self) -> Option<ShapeId> {
        if self.progress < 0.5 { self.shape_a } else { self.shape_b }
    }

    pub(crate) fn set_a(&mut self, shape: ShapeId) {
        self.shape_a = Some(shape);
    }

    pub(crate) fn set_b(&mut self, shape: ShapeId) {
        self.shape_b = Some(shape);
    }

    /// Clamps into `[0, 1]`; NaN leaves the value unchanged.
    pub(crate) fn set_progress(&mut self, progress: f32) {
        if !progress.is_nan() {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uninitialized() {
        let state = TransitionState::default();
        assert!(!state.is_initialized());
        assert!(matches!(state.pair(), Err(FieldError::UninitializedTransition)));
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn one_slot_is_still_uninitialized() {
        let mut state = TransitionState::default();
        state.set_a(ShapeId::Earth);
        assert!(state.pair().is_err());
        state.set_b(ShapeId::Earth);
        assert_eq!(state.pair().unwrap(), (ShapeId::Earth, ShapeId::Earth));
    }

    #[test]
    fn progress_is_clamped() {
        let mut state = TransitionState::new(ShapeId::Rocket, ShapeId::Land, 2.0);
        assert_eq!(state.progress(), 1.0);
        state.set_progress(-1.0);
        assert_eq!(state.progress(), 0.0);
        state.set_progress(0.4);
        state.set_progress(f32::NAN);
        assert_eq!(state.progress(), 0.4);
    }

    #[test]
    fn dominant_follows_progress() {
        let state = TransitionState::new(ShapeId::Rocket, ShapeId::Land, 0.2);
        assert_eq!(state.dominant(), Some(ShapeId::Rocket));
        let state = TransitionState::new(ShapeId::Rocket, ShapeId::Land, 0.8);
        assert_eq!(state.dominant(), Some(ShapeId::Land));
    }
}
