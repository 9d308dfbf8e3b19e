//! # groovecut CAM Tools
//!
//! Turns an audio amplitude series into a phonograph groove and prepares it
//! for manufacturing.
//!
//! ## Toolpath
//!
//! - **Surface Mapping**: One amplitude sample to one tool-tip position on a cylinder or disc
//! - **Sequencer**: Builds the whole path and stops at the edge of the usable surface
//! - **Intersection Check**: Detects adjacent turns that would cut into each other
//!
//! ## Output
//!
//! - **G-code**: Single-pass rendering and multi-pass depth scheduling
//! - **Rasterizer**: Grayscale depth maps for visual inspection or laser engraving
//! - **Exporter**: CSV point lists, chunked G-code files and depth-map images

pub mod diagnostics;
pub mod error;
pub mod exporter;
pub mod gcode;
pub mod intersection;
pub mod pass_scheduler;
pub mod rasterizer;
pub mod sequencer;
pub mod surface_mapping;

// Re-export commonly used items
pub use diagnostics::Advisory;
pub use error::{CamToolError, CamToolResult, ParameterError};
pub use exporter::{
    csv_chunk_ranges, csv_line, gcode_text_chunks, save_depth_map, write_csv, write_split_csv,
    GcodeFileWriter,
};
pub use gcode::{SinglePassProgram, SinglePassRenderer};
pub use intersection::{IntersectionChecker, IntersectionReport};
pub use pass_scheduler::{PassPlan, PassScheduler, ScheduledProgram};
pub use rasterizer::{DepthMap, DepthMapRasterizer};
pub use sequencer::{ConsumptionStats, PathSequencer, SequencedPath};
pub use surface_mapping::{
    BoundaryHit, CylinderMapper, DiscMapper, MappingStep, PathPoints, SurfaceEngine,
};
