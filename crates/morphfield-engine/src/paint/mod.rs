//! Paint model shared between renderers.
//!
//! Scope: color representation (linear, premultiplied alpha), used for clear
//! colors and per-shape particle tints.

pub mod color;

pub use color::Color;
