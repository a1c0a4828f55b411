/// Loading mesh assets from disk into the model registry
use std::fs;
use std::path::Path;

use log::debug;
use nalgebra::Point3;

use crate::error::{LoadError, ParseError};
use crate::geometry::{MeshData, Model};
use crate::registry::{ModelHandle, ModelRegistry};
use crate::{obj, stl};

/// Mesh file formats the loader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Pick a format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "obj" => Some(Self::Obj),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }
}

/// Read and parse the mesh at `path` without registering anything.
pub fn read_mesh(path: &Path) -> Result<MeshData, LoadError> {
    let format = MeshFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |e: ParseError| LoadError::Parse {
        path: path.to_path_buf(),
        line: e.line,
        message: e.message,
    };

    let mesh = match format {
        MeshFormat::Obj => {
            let text = String::from_utf8_lossy(&data);
            obj::parse_obj(&text).map_err(parse_error)?
        }
        MeshFormat::Stl => stl::parse_stl(&data).map_err(parse_error)?,
    };

    if mesh.triangle_count() == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    if let Some(index) = mesh.find_invalid_index() {
        return Err(LoadError::IndexOutOfBounds {
            path: path.to_path_buf(),
            index,
            position_count: mesh.position_count(),
        });
    }

    debug!(
        "parsed {}: {} positions, {} triangles",
        path.display(),
        mesh.position_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load the mesh at `path`, build a model anchored at `anchor` with every
/// vertex divided by `division_factor`, and append it to `registry`.
///
/// On error the registry is left unchanged.
pub fn load_model(
    registry: &mut ModelRegistry,
    path: impl AsRef<Path>,
    anchor: Point3<f32>,
    division_factor: f32,
) -> Result<ModelHandle, LoadError> {
    if !(division_factor.is_finite() && division_factor > 0.0) {
        return Err(LoadError::InvalidDivisionFactor(division_factor));
    }

    let mesh = read_mesh(path.as_ref())?;
    Ok(registry.append(Model::from_mesh(mesh, anchor, division_factor)))
}
