//! Shared components for curve alignment tools.
//!
//! Everything here sits around the alignment core: moving point lists in and
//! out of text, remembering parameters and curves between sessions, and
//! stepping through a finished run.

pub mod config_storage;
pub mod playback;
pub mod point_io;

pub use config_storage::ConfigStorage;
pub use playback::{Playback, PlaybackTiming};
pub use point_io::{format_points, load_curve, parse_points, save_curve, PointIoError};
