//! Scene boundary detection.
//!
//! [`MetricExtractor`] turns decoded frames into [`MetricSample`]s and a
//! [`BoundaryStrategy`] turns samples into boundary frame indices. Both keep
//! only the state they need for the next frame, so a pass never buffers the
//! video.

pub mod adaptive;
pub mod content;
pub mod metric;
pub mod strategy;
pub mod threshold;

pub use metric::{MetricExtractor, MetricSample, rgb_to_hsv};
pub use strategy::{BoundaryRule, BoundaryStrategy, SceneLengthFloor};
