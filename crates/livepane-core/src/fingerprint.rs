#![forbid(unsafe_code)]

//! Structural fingerprinting of a project's file tree.
//!
//! # Design
//!
//! A [`StructuralFingerprint`] captures only topology: which modules and
//! directories exist, what they are called, and which folder they live in.
//! File content never contributes, so typing in a file leaves the fingerprint
//! untouched while renaming, moving, adding or deleting anything changes it.
//!
//! # Encoding
//!
//! Every module and directory contributes one entry:
//!
//! ```text
//! <tag><parent><title>;
//! tag    = 'm' | 'd'
//! parent = '~'                  (project root)
//!        | <byte len> ':' <id>
//! title  = <byte len> ':' <title>
//! ```
//!
//! Length prefixes keep `("ab", "c")` and `("a", "bc")` apart and keep the
//! root distinct from a parent id that happens to be empty. Modules come
//! first, then directories, each in storage order. Every entry stays at its
//! module's position, so two modules swapping titles or parents changes the
//! key even though the set of pairs is the same.
//!
//! The fingerprint is an in-memory comparison key only; the format is not
//! stable across versions.

use std::fmt;
use std::fmt::Write as _;

use crate::project::Project;

/// Comparable topology key for a [`Project`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StructuralFingerprint(String);

impl StructuralFingerprint {
    /// Compute the fingerprint of `project`.
    #[must_use]
    pub fn of(project: &Project) -> Self {
        let mut key = String::new();
        for m in &project.modules {
            push_entry(&mut key, 'm', m.directory_shortid.as_deref(), &m.title);
        }
        for d in &project.directories {
            push_entry(&mut key, 'd', d.directory_shortid.as_deref(), &d.title);
        }
        Self(key)
    }

    /// The raw key.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructuralFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn push_entry(out: &mut String, tag: char, parent: Option<&str>, title: &str) {
    out.push(tag);
    match parent {
        None => out.push('~'),
        Some(id) => push_prefixed(out, id),
    }
    push_prefixed(out, title);
    out.push(';');
}

fn push_prefixed(out: &mut String, s: &str) {
    // Writing to a String cannot fail.
    let _ = write!(out, "{}:", s.len());
    out.push_str(s);
}

/// Content key over every module's code, in module order.
///
/// Any character difference in any module changes the signature. Codes are
/// length-prefixed, so moving text across a module boundary is also a change.
#[must_use]
pub fn content_signature(project: &Project) -> String {
    let mut out = String::with_capacity(
        project
            .modules
            .iter()
            .map(|m| m.code.len() + 8)
            .sum(),
    );
    for module in &project.modules {
        push_prefixed(&mut out, &module.code);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{Directory, Module};

    fn sample() -> Project {
        Project::new("p")
            .with_directory(Directory::new("src", None, "src"))
            .with_module(Module::new("a", None, "package.json", "{}"))
            .with_module(Module::new("b", Some("src"), "index.js", "render()"))
    }

    #[test]
    fn code_does_not_affect_fingerprint() {
        let before = sample();
        let mut after = sample();
        after.modules[1].code = "something else entirely".into();
        assert_eq!(
            StructuralFingerprint::of(&before),
            StructuralFingerprint::of(&after)
        );
    }

    #[test]
    fn rename_changes_fingerprint() {
        let before = sample();
        let mut after = sample();
        after.modules[1].title = "main.js".into();
        assert_ne!(
            StructuralFingerprint::of(&before),
            StructuralFingerprint::of(&after)
        );
    }

    #[test]
    fn move_changes_fingerprint() {
        let before = sample();
        let mut after = sample();
        after.modules[1].directory_shortid = None;
        assert_ne!(
            StructuralFingerprint::of(&before),
            StructuralFingerprint::of(&after)
        );
    }

    #[test]
    fn add_directory_changes_fingerprint() {
        let before = sample();
        let after = sample().with_directory(Directory::new("lib", None, "lib"));
        assert_ne!(
            StructuralFingerprint::of(&before),
            StructuralFingerprint::of(&after)
        );
    }

    #[test]
    fn boundary_shift_is_not_a_collision() {
        let a = Project::new("p").with_module(Module::new("x", Some("ab"), "c", ""));
        let b = Project::new("p").with_module(Module::new("x", Some("a"), "bc", ""));
        assert_ne!(StructuralFingerprint::of(&a), StructuralFingerprint::of(&b));
    }

    #[test]
    fn root_differs_from_empty_parent() {
        let a = Project::new("p").with_module(Module::new("x", None, "f", ""));
        let b = Project::new("p").with_module(Module::new("x", Some(""), "f", ""));
        assert_ne!(StructuralFingerprint::of(&a), StructuralFingerprint::of(&b));
    }

    #[test]
    fn module_and_directory_with_same_pair_differ() {
        let a = Project::new("p").with_module(Module::new("x", None, "src", ""));
        let b = Project::new("p").with_directory(Directory::new("x", None, "src"));
        assert_ne!(StructuralFingerprint::of(&a), StructuralFingerprint::of(&b));
    }

    #[test]
    fn swapping_titles_changes_fingerprint() {
        let before = Project::new("p")
            .with_module(Module::new("a", Some("src"), "index.js", "render()"))
            .with_module(Module::new("b", Some("src"), "App.js", "export default App"));
        let mut after = before.clone();
        after.modules[0].title = "App.js".into();
        after.modules[1].title = "index.js".into();
        assert_ne!(
            StructuralFingerprint::of(&before),
            StructuralFingerprint::of(&after)
        );
        assert_eq!(content_signature(&before), content_signature(&after));
    }

    #[test]
    fn swapping_parents_changes_fingerprint() {
        let before = sample().with_module(Module::new("c", Some("lib"), "util.js", ""));
        let mut after = before.clone();
        after.modules[1].directory_shortid = Some("lib".into());
        after.modules[2].directory_shortid = Some("src".into());
        assert_ne!(
            StructuralFingerprint::of(&before),
            StructuralFingerprint::of(&after)
        );
    }

    #[test]
    fn project_id_and_dependencies_are_ignored() {
        let a = sample();
        let mut b = sample().with_dependency("react", "18");
        b.id = "other".into();
        assert_eq!(StructuralFingerprint::of(&a), StructuralFingerprint::of(&b));
    }

    #[test]
    fn encoding_shape() {
        let p = Project::new("p")
            .with_directory(Directory::new("d", None, "src"))
            .with_module(Module::new("m", Some("d"), "a.js", ""));
        assert_eq!(StructuralFingerprint::of(&p).as_str(), "m1:d4:a.js;d~3:src;");
    }

    #[test]
    fn content_signature_tracks_every_character() {
        let a = sample();
        let mut b = sample();
        b.modules[0].code = "{ }".into();
        assert_ne!(content_signature(&a), content_signature(&b));
    }

    #[test]
    fn content_signature_sees_text_moving_between_modules() {
        let a = Project::new("p")
            .with_module(Module::new("1", None, "a", "ab"))
            .with_module(Module::new("2", None, "b", "c"));
        let b = Project::new("p")
            .with_module(Module::new("1", None, "a", "a"))
            .with_module(Module::new("2", None, "b", "bc"));
        assert_ne!(content_signature(&a), content_signature(&b));
    }

    #[test]
    fn content_signature_ignores_renames() {
        let a = sample();
        let mut b = sample();
        b.modules[0].title = "other.json".into();
        assert_eq!(content_signature(&a), content_signature(&b));
    }
}
