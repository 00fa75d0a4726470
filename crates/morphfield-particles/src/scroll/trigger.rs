//! Trigger geometry: where a scroll range starts and ends.

use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;

/// A point along an element or the viewport, as a fraction of its height.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Center,
    Bottom,
}

impl Anchor {
    #[inline]
    pub fn fraction(self) -> f32 {
        match self {
            Anchor::Top => 0.0,
            Anchor::Center => 0.5,
            Anchor::Bottom => 1.0,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Anchor::Top => "top",
            Anchor::Center => "center",
            Anchor::Bottom => "bottom",
        }
    }
}

impl FromStr for Anchor {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Anchor::Top),
            "center" => Ok(Anchor::Center),
            "bottom" => Ok(Anchor::Bottom),
            other => Err(FieldError::Config(format!("unknown anchor '{other}'"))),
        }
    }
}

/// "When `element` anchor meets `viewport` anchor shifted by `offset` px".
///
/// Written as `"<element> <viewport>[+=N|-=N][px]"`, e.g. `"bottom top+=200px"`.
/// A positive offset moves the viewport point down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriggerPosition {
    pub element: Anchor,
    pub viewport: Anchor,
    pub offset: f32,
}

impl TriggerPosition {
    pub const fn new(element: Anchor, viewport: Anchor, offset: f32) -> Self {
        Self { element, viewport, offset }
    }

    /// `bottom bottom-=200px`: the element's bottom is 200 px above the viewport's bottom.
    pub const DEFAULT_START: TriggerPosition =
        TriggerPosition::new(Anchor::Bottom, Anchor::Bottom, -200.0);

    /// `bottom top+=200px`: the element's bottom is 200 px below the viewport's top.
    pub const DEFAULT_END: TriggerPosition =
        TriggerPosition::new(Anchor::Bottom, Anchor::Top, 200.0);

    /// Scroll offset at which this position is reached.
    pub fn resolve(&self, element: ElementBounds, viewport_height: f32) -> f32 {
        let element_point = element.top + element.height * self.element.fraction();
        let viewport_point = viewport_height * self.viewport.fraction() + self.offset;
        element_point - viewport_point
    }
}

impl FromStr for TriggerPosition {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (words.next(), words.next(), words.next())
        else {
            return Err(FieldError::Config(format!(
                "trigger position '{s}' must be '<element> <viewport>'"
            )));
        };

        let (viewport, offset) = match viewport.find(['+', '-']) {
            Some(at) => {
                let (anchor, rest) = viewport.split_at(at);
                let sign = if rest.starts_with('-') { -1.0 } else { 1.0 };
                let amount = rest[1..]
                    .strip_prefix('=')
                    .map(|n| n.trim_end_matches("px"))
                    .and_then(|n| n.parse::<f32>().ok())
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| FieldError::Config(format!("bad offset in '{s}'")))?;
                (anchor, sign * amount)
            }
            None => (viewport, 0.0),
        };

        Ok(Self::new(element.parse()?, viewport.parse()?, offset))
    }
}

impl fmt::Display for TriggerPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element.keyword(), self.viewport.keyword())?;
        if self.offset != 0.0 {
            let op = if self.offset < 0.0 { "-=" } else { "+=" };
            write!(f, "{op}{}px", self.offset.abs())?;
        }
        Ok(())
    }
}

/// Vertical extent of a page element in document coordinates (px).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ElementBounds {
    pub top: f32,
    pub height: f32,
}

impl ElementBounds {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// A trigger as registered with a [`super::ScrollSource`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollTrigger {
    pub element: ElementBounds,
    pub start: TriggerPosition,
    pub end: TriggerPosition,
}

impl ScrollTrigger {
    pub fn new(element: ElementBounds) -> Self {
        Self {
            element,
            start: TriggerPosition::DEFAULT_START,
            end: TriggerPosition::DEFAULT_END,
        }
    }

    pub fn with_start(mut self, start: TriggerPosition) -> Self {
        self.start = start;
        self
    }

    pub fn with_end(mut self, end: TriggerPosition) -> Self {
        self.end = end;
        self
    }

    /// `(start, end)` scroll offsets for the given viewport height.
    pub fn range(&self, viewport_height: f32) -> (f32, f32) {
        (
            self.start.resolve(self.element, viewport_height),
            self.end.resolve(self.element, viewport_height),
        )
    }
}

/// One page section: a name for logs plus the trigger bounds it contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSection {
    pub id: String,
    pub trigger: ScrollTrigger,
}

impl ScrollSection {
    pub fn new(id: impl Into<String>, element: ElementBounds) -> Self {
        Self { id: id.into(), trigger: ScrollTrigger::new(element) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_positions() {
        let start: TriggerPosition = "bottom bottom-=200px".parse().unwrap();
        let end: TriggerPosition = "bottom top+=200px".parse().unwrap();
        assert_eq!(start, TriggerPosition::DEFAULT_START);
        assert_eq!(end, TriggerPosition::DEFAULT_END);
    }

    #[test]
    fn parses_without_offset_or_unit() {
        let p: TriggerPosition = "top center".parse().unwrap();
        assert_eq!(p, TriggerPosition::new(Anchor::Top, Anchor::Center, 0.0));
        let q: TriggerPosition = "center top+=40".parse().unwrap();
        assert_eq!(q.offset, 40.0);
    }

    #[test]
    fn rejects_malformed_positions() {
        for bad in ["", "bottom", "bottom top extra", "left top", "bottom top+200", "bottom top+=xpx"] {
            assert!(bad.parse::<TriggerPosition>().is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn display_round_trips_defaults() {
        assert_eq!(TriggerPosition::DEFAULT_START.to_string(), "bottom bottom-=200px");
        assert_eq!(TriggerPosition::DEFAULT_END.to_string(), "bottom top+=200px");
    }

    #[test]
    fn default_range_for_first_section() {
        // 1000 px section at the top of a page viewed through an 800 px viewport.
        let trigger = ScrollTrigger::new(ElementBounds::new(0.0, 1000.0));
        let (start, end) = trigger.range(800.0);
        assert_eq!(start, 1000.0 - (800.0 - 200.0));
        assert_eq!(end, 1000.0 - 200.0);
        assert!(start < end);
    }
}
