use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::trigger::ScrollTrigger;

/// Identifies one registered trigger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(u64);

/// Edge or scrub event emitted by a trigger.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ScrollEvent {
    /// Scrolling forward past the range start.
    Enter,
    /// Scrolling forward past the range end.
    Leave,
    /// Scrolling backward past the range end.
    EnterBack,
    /// Scrolling backward past the range start.
    LeaveBack,
    /// Position within the range, in `[0, 1]`.
    Update(f32),
}

/// Receiver of trigger events.
///
/// Events are delivered synchronously from [`ScrollSource::scroll_to`],
/// [`ScrollSource::set_viewport_height`] and [`ScrollSource::refresh`].
pub trait ScrollListener {
    fn on_scroll(&mut self, trigger: TriggerId, event: ScrollEvent);
}

/// Where the scroll offset sits relative to a trigger's range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Before,
    Active,
    After,
}

struct Entry {
    id: TriggerId,
    trigger: ScrollTrigger,
    start: f32,
    end: f32,
    phase: Phase,
    progress: f32,
}

impl Entry {
    fn measure(&mut self, viewport_height: f32) {
        let (start, end) = self.trigger.range(viewport_height);
        self.start = start;
        self.end = end;
    }

    fn progress_at(&self, scroll: f32) -> f32 {
        let span = self.end - self.start;
        if span > 0.0 {
            ((scroll - self.start) / span).clamp(0.0, 1.0)
        } else if scroll >= self.start {
            1.0
        } else {
            0.0
        }
    }

    /// Moves to `scroll` and appends the events the move produces.
    fn advance(&mut self, scroll: f32, out: &mut Vec<(TriggerId, ScrollEvent)>) {
        let progress = self.progress_at(scroll);
        let phase = match progress {
            p if p <= 0.0 => Phase::Before,
            p if p >= 1.0 => Phase::After,
            _ => Phase::Active,
        };

        let mut emit = |event| out.push((self.id, event));

        match (self.phase, phase) {
            (Phase::Before, Phase::Active) => {
                emit(ScrollEvent::Enter);
                emit(ScrollEvent::Update(progress));
            }
            (Phase::Before, Phase::After) => {
                emit(ScrollEvent::Enter);
                emit(ScrollEvent::Update(1.0));
                emit(ScrollEvent::Leave);
            }
            (Phase::Active, Phase::After) => {
                emit(ScrollEvent::Update(1.0));
                emit(ScrollEvent::Leave);
            }
            (Phase::After, Phase::Active) => {
                emit(ScrollEvent::EnterBack);
                emit(ScrollEvent::Update(progress));
            }
            (Phase::After, Phase::Before) => {
                emit(ScrollEvent::EnterBack);
                emit(ScrollEvent::Update(0.0));
                emit(ScrollEvent::LeaveBack);
            }
            (Phase::Active, Phase::Before) => {
                emit(ScrollEvent::Update(0.0));
                emit(ScrollEvent::LeaveBack);
            }
            (Phase::Active, Phase::Active) if progress != self.progress => {
                emit(ScrollEvent::Update(progress));
            }
            _ => {}
        }

        self.phase = phase;
        self.progress = progress;
    }
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Scroll position of a page plus the triggers watching it.
///
/// Triggers start out "before" their range; the first [`refresh`] or
/// [`scroll_to`] after registration emits whatever edges lead to the current
/// position, so a trigger registered mid-page catches up.
///
/// [`refresh`]: ScrollSource::refresh
/// [`scroll_to`]: ScrollSource::scroll_to
pub struct ScrollSource {
    registry: Rc<RefCell<Registry>>,
    scroll: f32,
    /// Offset at the last dispatch; decides the delivery order.
    dispatched: f32,
    viewport_height: f32,
}

impl ScrollSource {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            scroll: 0.0,
            dispatched: 0.0,
            viewport_height,
        }
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn trigger_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// `(start, end)` scroll offsets of a live trigger.
    pub fn range(&self, id: TriggerId) -> Option<(f32, f32)> {
        let registry = self.registry.borrow();
        registry.entries.iter().find(|e| e.id == id).map(|e| (e.start, e.end))
    }

    /// Registers a trigger. It stays live until the returned guard is dropped.
    #[must_use = "dropping the subscription unregisters the trigger"]
    pub fn register(&mut self, trigger: ScrollTrigger) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = TriggerId(registry.next_id);
        registry.next_id += 1;

        let mut entry = Entry {
            id,
            trigger,
            start: 0.0,
            end: 0.0,
            phase: Phase::Before,
            progress: 0.0,
        };
        entry.measure(self.viewport_height);
        log::debug!("trigger {id:?} registered: range {:.1}..{:.1}", entry.start, entry.end);
        registry.entries.push(entry);

        Subscription { id, registry: Rc::downgrade(&self.registry) }
    }

    /// Moves the scroll offset and delivers the resulting events.
    pub fn scroll_to(&mut self, offset: f32, listener: &mut dyn ScrollListener) {
        if !offset.is_finite() {
            log::warn!("ignoring non-finite scroll offset {offset}");
            return;
        }
        self.scroll = offset;
        self.dispatch(listener);
    }

    /// Re-measures every trigger for a new viewport height, then delivers events.
    pub fn set_viewport_height(&mut self, height: f32, listener: &mut dyn ScrollListener) {
        if !(height.is_finite() && height > 0.0) {
            log::debug!("ignoring viewport height {height}");
            return;
        }
        self.viewport_height = height;
        self.refresh(listener);
    }

    /// Re-measures every trigger range and delivers the events that the
    /// current offset now implies.
    pub fn refresh(&mut self, listener: &mut dyn ScrollListener) {
        {
            let mut registry = self.registry.borrow_mut();
            for entry in &mut registry.entries {
                entry.measure(self.viewport_height);
            }
        }
        self.dispatch(listener);
    }

    fn dispatch(&mut self, listener: &mut dyn ScrollListener) {
        let backward = self.scroll < self.dispatched;
        self.dispatched = self.scroll;

        // Collect first: listeners may drop subscriptions while handling events.
        let mut events = Vec::new();
        {
            let mut registry = self.registry.borrow_mut();
            // Triggers are visited in page order when scrolling down and in
            // reverse page order when scrolling up, so the last edge crossed
            // is the last one delivered.
            let mut order: Vec<usize> = (0..registry.entries.len()).collect();
            order.sort_by(|&a, &b| registry.entries[a].start.total_cmp(&registry.entries[b].start));
            if backward {
                order.reverse();
            }
            for i in order {
                registry.entries[i].advance(self.scroll, &mut events);
            }
        }

        for (id, event) in events {
            listener.on_scroll(id, event);
        }
    }
}

/// Keeps a trigger registered; unregisters it on drop.
#[derive(Debug)]
pub struct Subscription {
    id: TriggerId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> TriggerId {
        self.id
    }

    /// Unregisters now. Equivalent to dropping the guard.
    pub fn revoke(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        // A listener dropping a guard mid-dispatch never overlaps a borrow:
        // dispatch releases the registry before delivering events.
        let Ok(mut registry) = registry.try_borrow_mut() else {
            log::warn!("trigger {:?} dropped while the registry was busy", self.id);
            return;
        };
        registry.entries.retain(|e| e.id != self.id);
        log::debug!("trigger {:?} unregistered", self.id);
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("triggers", &self.entries.len()).finish()
    }
}
