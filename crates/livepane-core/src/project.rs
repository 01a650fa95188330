#![forbid(unsafe_code)]

//! Project model as observed by the preview.
//!
//! These types mirror the parts of the editor state tree the preview reads.
//! They are owned and mutated elsewhere; the runtime only takes snapshots.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Module {
    /// Stable identifier of this module.
    pub shortid: String,
    /// Parent directory, `None` for the project root.
    pub directory_shortid: Option<String>,
    /// File name.
    pub title: String,
    /// File content.
    pub code: String,
}

impl Module {
    /// Create a module.
    pub fn new(
        shortid: impl Into<String>,
        directory_shortid: Option<&str>,
        title: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            shortid: shortid.into(),
            directory_shortid: directory_shortid.map(str::to_owned),
            title: title.into(),
            code: code.into(),
        }
    }
}

/// A folder in the project tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Directory {
    /// Own identifier, referenced by children.
    pub shortid: String,
    /// Parent directory, `None` for the project root.
    pub directory_shortid: Option<String>,
    /// Folder name.
    pub title: String,
}

impl Directory {
    /// Create a directory.
    pub fn new(
        shortid: impl Into<String>,
        directory_shortid: Option<&str>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            shortid: shortid.into(),
            directory_shortid: directory_shortid.map(str::to_owned),
            title: title.into(),
        }
    }
}

/// The editable unit: modules, directories, dependencies, external resources.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Project {
    pub id: String,
    pub modules: Vec<Module>,
    pub directories: Vec<Directory>,
    /// Dependency name to version spec.
    pub dependencies: BTreeMap<String, String>,
    /// External stylesheet/script URLs injected into the preview.
    pub external_resources: Vec<String>,
}

impl Project {
    /// Create an empty project with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder: append a module.
    #[must_use]
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Builder: append a directory.
    #[must_use]
    pub fn with_directory(mut self, directory: Directory) -> Self {
        self.directories.push(directory);
        self
    }

    /// Builder: add a dependency.
    #[must_use]
    pub fn with_dependency(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), version.into());
        self
    }

    /// Builder: append an external resource URL.
    #[must_use]
    pub fn with_external_resource(mut self, url: impl Into<String>) -> Self {
        self.external_resources.push(url.into());
        self
    }

    /// Number of declared dependencies.
    #[inline]
    pub fn dependency_count(&self) -> usize {
        self.dependencies.len()
    }

    /// Number of external resources.
    #[inline]
    pub fn external_resource_count(&self) -> usize {
        self.external_resources.len()
    }
}

/// User preferences that gate automatic re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Re-run the preview automatically on edits.
    pub live_preview_enabled: bool,
    /// Skip the surface's debounce when re-running.
    pub instant_preview_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            live_preview_enabled: true,
            instant_preview_enabled: false,
        }
    }
}

/// Which panel the preview viewport currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PreviewContent {
    /// Viewport closed.
    #[default]
    None,
    /// The running project.
    Browser,
    /// Test results panel.
    Tests,
    /// Console output panel.
    Console,
}
