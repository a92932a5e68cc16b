// Presentation layer: turns pass windows into console lines.

pub mod display;
