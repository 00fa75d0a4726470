//! Scroll-position triggers.
//!
//! A [`ScrollSource`] tracks one page's scroll offset and a set of
//! [`ScrollTrigger`]s. Moving the offset emits enter/leave edges and scrub
//! progress into a [`ScrollListener`]; triggers are unregistered when their
//! [`Subscription`] guard is dropped.

mod source;
mod trigger;

pub use source::{ScrollEvent, ScrollListener, ScrollSource, Subscription, TriggerId};
pub use trigger::{Anchor, ElementBounds, ScrollSection, ScrollTrigger, TriggerPosition};
