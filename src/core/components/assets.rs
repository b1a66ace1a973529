//=========================================================================
// Asset Cache
//=========================================================================
//
// Resolves named assets to opaque handles through a pluggable loader and
// memoizes the result.
//
// Architecture:
//   AssetCache<L> (Component)
//     ├─ loader: L: AssetLoader
//     └─ handles: HashMap<(AssetKind, String), AssetHandle>
//
// The engine never looks inside a handle; renderers and audio backends
// give it meaning.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::entity::Component;
use crate::core::error::{EngineError, EngineResult};

//=== Types ===============================================================

/// Category an asset name is resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Texture,
    Shader,
    Sound,
    Font,
}

/// Opaque identifier returned by an [`AssetLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(pub u64);

/// Backend that turns asset names into handles.
pub trait AssetLoader: Send + 'static {
    /// # Errors
    ///
    /// [`EngineError::Asset`] when `name` cannot be resolved.
    fn load(&mut self, kind: AssetKind, name: &str) -> EngineResult<AssetHandle>;
}

//=== AssetCache ==========================================================

/// Component memoizing loader results for the lifetime of its scene.
pub struct AssetCache<L: AssetLoader> {
    loader: L,
    handles: HashMap<(AssetKind, String), AssetHandle>,
}

impl<L: AssetLoader> AssetCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            handles: HashMap::new(),
        }
    }

    /// Returns the cached handle, loading it on first request.
    pub fn get_or_load(&mut self, kind: AssetKind, name: &str) -> EngineResult<AssetHandle> {
        if let Some(handle) = self.handles.get(&(kind, name.to_string())) {
            return Ok(*handle);
        }

        let handle = self.loader.load(kind, name)?;
        debug!("Loaded {:?} '{}' as {:?}", kind, name, handle);
        self.handles.insert((kind, name.to_string()), handle);
        Ok(handle)
    }

    /// Cached handle without loading.
    pub fn get(&self, kind: AssetKind, name: &str) -> Option<AssetHandle> {
        self.handles.get(&(kind, name.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

impl<L: AssetLoader> Component for AssetCache<L> {}

//=== SequentialLoader ====================================================

/// Loader handing out increasing handles for names it accepts.
///
/// Accepts every name unless restricted with [`only`](Self::only).
#[derive(Debug, Default)]
pub struct SequentialLoader {
    next: u64,
    known: Option<Vec<String>>,
    loads: usize,
}

impl SequentialLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the loader to `names`; anything else fails to load.
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            known: Some(names.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Number of successful loads so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

impl AssetLoader for SequentialLoader {
    fn load(&mut self, kind: AssetKind, name: &str) -> EngineResult<AssetHandle> {
        if let Some(known) = &self.known {
            if !known.iter().any(|known| known == name) {
                return Err(EngineError::Asset(format!("{:?} '{}' not found", kind, name)));
            }
        }

        self.next += 1;
        self.loads += 1;
        Ok(AssetHandle(self.next))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
