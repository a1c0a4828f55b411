/// meshview core library - model geometry pipeline and projection math
///
/// Loads triangle meshes into an owned model registry, computes smooth vertex
/// normals, moves/zooms/rotates models in place in response to navigation
/// input, and produces perspective-divided copies of the vertex data for a
/// rendering backend.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod loader;
pub mod math;
pub mod obj;
pub mod projection;
pub mod registry;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use config::{Controls, ModelEntry, ViewerConfig};
pub use error::{ConfigError, LoadError, ParseError, RegistryError};
pub use geometry::{MeshData, Model};
pub use input::{MouseLook, ViewerAction};
pub use loader::{load_model, read_mesh, MeshFormat};
pub use math::EulerDegrees;
pub use projection::{project, RenderView};
pub use registry::{ModelHandle, ModelRegistry};
pub use transform::{move_all, rotate_all_about, zoom_all};
