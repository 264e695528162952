//! Harness around the alignment core: synthetic curves and run reports.

pub mod report;
pub mod synthetic;

pub use synthetic::DemoShape;
