#![forbid(unsafe_code)]

//! Read access to the shared editor state tree.

use std::rc::Rc;

use livepane_core::{Bounds, PreviewContent, Project, Settings};

/// Path under which the package manifest is handed to the surface.
pub const PACKAGE_JSON_PATH: &str = "/package.json";

/// Everything the preview reads from the editor state tree.
///
/// Implementations are shared with many other readers and writers. The
/// runtime only reads through this trait; its one write goes through
/// [`crate::GeometrySink`].
pub trait PreviewState {
    /// Snapshot of the current project.
    fn project(&self) -> Rc<Project>;

    /// Current preview preferences.
    fn settings(&self) -> Settings;

    /// Persisted viewport geometry.
    fn geometry(&self) -> Bounds;

    /// Whether the editor shows the project overview instead of one module.
    fn is_in_project_view(&self) -> bool;

    /// Counter bumped whenever the user forces a re-render.
    fn force_render(&self) -> u64;

    /// Whether every module has been saved/synchronized.
    fn all_modules_synced(&self) -> bool;

    /// Shortid of the module open in the editor.
    fn current_module_id(&self) -> Option<String>;

    /// Which panel the viewport shows.
    fn content(&self) -> PreviewContent;

    /// Source of the package manifest handed to the surface.
    ///
    /// Defaults to the root-level `package.json` module, if any.
    fn package_json_code(&self) -> Option<String> {
        self.project()
            .modules
            .iter()
            .find(|m| m.directory_shortid.is_none() && m.title == "package.json")
            .map(|m| m.code.clone())
    }
}
