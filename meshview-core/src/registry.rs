/// Append-only collection of loaded models
use std::ops::{Index, IndexMut};

use log::info;

use crate::error::RegistryError;
use crate::geometry::Model;
use crate::projection::RenderView;

/// Position of a model in the registry, assigned on append
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub usize);

/// Owns every model for the lifetime of the viewer.
///
/// Models are never removed; handles stay valid until the registry is dropped.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<Model>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, model: Model) -> ModelHandle {
        let handle = ModelHandle(self.models.len());
        info!(
            "registered model #{} ({} vertices, {} triangles) at {:?}",
            handle.0,
            model.vertex_count() / 3,
            model.index_count() / 3,
            model.anchor
        );
        self.models.push(model);
        handle
    }

    pub fn count(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn get(&self, handle: ModelHandle) -> Result<&Model, RegistryError> {
        let count = self.models.len();
        self.models
            .get(handle.0)
            .ok_or(RegistryError::IndexOutOfRange {
                index: handle.0,
                count,
            })
    }

    pub fn get_mut(&mut self, handle: ModelHandle) -> Result<&mut Model, RegistryError> {
        let count = self.models.len();
        self.models
            .get_mut(handle.0)
            .ok_or(RegistryError::IndexOutOfRange {
                index: handle.0,
                count,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Model> {
        self.models.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Model> {
        self.models.iter_mut()
    }

    /// Projected, read-only views of every model, in insertion order.
    pub fn render_views(&self) -> impl Iterator<Item = RenderView<'_>> {
        self.models.iter().map(RenderView::new)
    }
}

impl Index<ModelHandle> for ModelRegistry {
    type Output = Model;

    fn index(&self, handle: ModelHandle) -> &Model {
        match self.get(handle) {
            Ok(model) => model,
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<ModelHandle> for ModelRegistry {
    fn index_mut(&mut self, handle: ModelHandle) -> &mut Model {
        match self.get_mut(handle) {
            Ok(model) => model,
            Err(e) => panic!("{}", e),
        }
    }
}
