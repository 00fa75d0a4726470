//! A virtual scrolling page.
//!
//! The studio has no document, so it models one: a column of equally tall
//! sections followed by a viewport-tall footer. The footer lets the last
//! section scroll fully past its trigger range.

use morphfield_engine::input::Key;
use morphfield_particles::scroll::{ElementBounds, ScrollSection};

/// Logical pixels per wheel "line".
pub const LINE_HEIGHT: f32 = 48.0;

/// Logical pixels per arrow key press.
pub const ARROW_STEP: f32 = 96.0;

/// Fraction of the viewport moved by PageUp/PageDown/Space.
const PAGE_STEP: f32 = 0.9;

/// Page state: section layout, scroll target and the eased scroll offset.
#[derive(Debug, Clone)]
pub struct Page {
    sections: Vec<ScrollSection>,
    viewport_height: f32,
    /// Where input wants the page to be.
    target: f32,
    /// Where the page is; trails `target` by `smoothing`.
    offset: f32,
    /// Time constant of the scroll easing in seconds; `0` snaps.
    smoothing: f32,
}

impl Page {
    /// `ids.len()` sections of `section_height` each, stacked from the top.
    pub fn new(ids: &[&str], section_height: f32, viewport_height: f32) -> Self {
        let sections = ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                ScrollSection::new(*id, ElementBounds::new(i as f32 * section_height, section_height))
            })
            .collect();

        Self {
            sections,
            viewport_height: viewport_height.max(0.0),
            target: 0.0,
            offset: 0.0,
            smoothing: 0.0,
        }
    }

    pub fn with_smoothing(mut self, seconds: f32) -> Self {
        self.smoothing = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self
    }

    pub fn sections(&self) -> &[ScrollSection] {
        &self.sections
    }

    /// Every section after the first; the first is the intro and drives nothing.
    pub fn transition_sections(&self) -> &[ScrollSection] {
        self.sections.get(1..).unwrap_or_default()
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Total section height. With the viewport-tall footer this is also the
    /// largest reachable offset.
    pub fn max_offset(&self) -> f32 {
        self.sections.last().map_or(0.0, |s| s.trigger.element.bottom())
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        if height.is_finite() && height > 0.0 {
            self.viewport_height = height;
        }
    }

    /// Moves the scroll target by `dy` logical pixels.
    pub fn scroll_by(&mut self, dy: f32) {
        if dy.is_finite() {
            self.scroll_to(self.target + dy);
        }
    }

    /// Sets the scroll target, clamped to the page.
    pub fn scroll_to(&mut self, y: f32) {
        if y.is_finite() {
            self.target = y.clamp(0.0, self.max_offset());
        }
    }

    /// Applies a navigation key. Returns `false` for keys the page ignores.
    pub fn apply_key(&mut self, key: Key) -> bool {
        let page = self.viewport_height * PAGE_STEP;
        match key {
            Key::ArrowDown => self.scroll_by(ARROW_STEP),
            Key::ArrowUp => self.scroll_by(-ARROW_STEP),
            Key::PageDown | Key::Space => self.scroll_by(page),
            Key::PageUp => self.scroll_by(-page),
            Key::Home => self.scroll_to(0.0),
            Key::End => self.scroll_to(self.max_offset()),
            _ => return false,
        }
        true
    }

    /// Eases the offset towards the target over `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.smoothing <= 0.0 {
            self.offset = self.target;
            return self.offset;
        }
        if dt.is_nan() || dt <= 0.0 {
            return self.offset;
        }

        let k = 1.0 - (-dt / self.smoothing).exp();
        self.offset += (self.target - self.offset) * k;
        if (self.target - self.offset).abs() < 0.5 {
            self.offset = self.target;
        }
        self.offset
    }
}
