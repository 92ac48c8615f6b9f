#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Cameras defined in a chunk.
pub mod camera;

/// Chunks and their parsing machinery.
pub mod chunk;

/// File-stack parser engine: reference exploding and array dispatch.
pub mod engine;

/// Error types for project reading.
pub mod error;

/// Source photos recorded inside a frame.
pub mod image;

/// Generated meshes and their texture atlases.
pub mod model;

/// Per-phase processing parameter records.
pub mod phases;

/// Projects and the root parse entry point.
pub mod project;

/// The chunk property dispatch table.
pub mod properties;

/// Fragment reference resolution.
pub mod resolver;

/// Sensors and their calibrations.
pub mod sensor;

/// Phase status scoring.
pub mod status;

/// Document stream opening for plain and archived project files.
pub mod stream;

/// Pull-style XML token streams.
pub mod xml;

pub use camera::Camera;
pub use chunk::Chunk;
pub use error::ProjectError;
pub use image::Image;
pub use model::Model;
pub use project::Project;
pub use sensor::Sensor;
