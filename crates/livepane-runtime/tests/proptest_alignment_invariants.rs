#![forbid(unsafe_code)]

//! Property tests for viewport alignment invariants.
//!
//! Validates:
//! - Docked bounds always follow the fixed half-container formulas.
//! - The free-state shrink rule never grows the viewport, never goes below
//!   the floor (unless it was already smaller), and keeps the origin.
//! - A free viewport only produces a command when its size changes.
//! - After a manual reposition, resizes never use the docked formulas.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use livepane_runtime::{
    Alignment, AlignmentController, Bounds, ContainerSize, GeometryCommand, GeometrySink,
    PreviewConfig, PreviewContent, PreviewState, Project, Settings, bottom_bounds, right_bounds,
    shrink_to_fit,
};
use proptest::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

struct Store {
    geometry: Cell<Bounds>,
    commands: RefCell<Vec<GeometryCommand>>,
}

impl PreviewState for Store {
    fn project(&self) -> Rc<Project> {
        Rc::new(Project::default())
    }
    fn settings(&self) -> Settings {
        Settings::default()
    }
    fn geometry(&self) -> Bounds {
        self.geometry.get()
    }
    fn is_in_project_view(&self) -> bool {
        false
    }
    fn force_render(&self) -> u64 {
        0
    }
    fn all_modules_synced(&self) -> bool {
        true
    }
    fn current_module_id(&self) -> Option<String> {
        None
    }
    fn content(&self) -> PreviewContent {
        PreviewContent::Browser
    }
}

impl GeometrySink for Store {
    fn set_geometry(&self, command: GeometryCommand) {
        self.geometry.set(command.bounds);
        self.commands.borrow_mut().push(command);
    }
}

fn controller(size: ContainerSize, geometry: Bounds) -> (AlignmentController, Rc<Store>) {
    let store = Rc::new(Store {
        geometry: Cell::new(geometry),
        commands: RefCell::new(Vec::new()),
    });
    let ctl = AlignmentController::new(size, store.clone(), store.clone(), &PreviewConfig::default());
    (ctl, store)
}

// ============================================================================
// Strategy helpers
// ============================================================================

fn extent() -> impl Strategy<Value = f64> {
    (1u32..4000).prop_map(f64::from)
}

fn size_strategy() -> impl Strategy<Value = ContainerSize> {
    (extent(), extent()).prop_map(|(w, h)| ContainerSize::new(w, h))
}

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    (0u32..2000, 0u32..2000, 64u32..3000, 64u32..3000).prop_map(|(x, y, w, h)| {
        Bounds::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h))
    })
}

// ============================================================================
// Invariant 1: Docked formulas
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn initial_alignment_follows_aspect_ratio(size in size_strategy()) {
        let (ctl, _store) = controller(size, Bounds::default());
        let expected = if size.height_or_zero() > size.width_or_zero() {
            Alignment::DockedBottom
        } else {
            Alignment::DockedRight
        };
        prop_assert_eq!(ctl.alignment(), expected);
    }

    #[test]
    fn docked_resize_matches_formula(start in size_strategy(), next in size_strategy(), bottom in any::<bool>()) {
        let (mut ctl, store) = controller(start, Bounds::default());
        if bottom { ctl.dock_bottom(); } else { ctl.dock_right(); }
        let issued = ctl.on_container_resize(next);

        if start == next {
            prop_assert_eq!(issued, None);
        } else {
            let expected = if bottom { bottom_bounds(next, 16.0) } else { right_bounds(next, 16.0) };
            prop_assert_eq!(issued, Some(expected));
            prop_assert_eq!(store.geometry.get(), expected);
        }
    }
}

// ============================================================================
// Invariant 2: Shrink rule
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn shrink_never_grows_and_keeps_origin(current in bounds_strategy(), w in extent(), h in extent()) {
        let fitted = shrink_to_fit(current, w, h, 16.0, 64.0);
        prop_assert_eq!(fitted.x, current.x);
        prop_assert_eq!(fitted.y, current.y);
        prop_assert!(fitted.width <= current.width);
        prop_assert!(fitted.height <= current.height);
        prop_assert!(fitted.width >= 64.0);
        prop_assert!(fitted.height >= 64.0);
    }

    #[test]
    fn free_resize_issues_only_on_size_change(current in bounds_strategy(), next in size_strategy()) {
        let (mut ctl, store) = controller(ContainerSize::new(4000.0, 4000.0), current);
        ctl.on_manual_reposition();
        let issued = ctl.on_container_resize(next);

        let expected = shrink_to_fit(current, next.width_or_zero(), next.height_or_zero(), 16.0, 64.0);
        if expected.same_size(&current) {
            prop_assert_eq!(issued, None);
            prop_assert!(store.commands.borrow().is_empty());
        } else {
            prop_assert_eq!(issued, Some(expected));
            prop_assert_eq!(store.commands.borrow().len(), 1);
        }
        prop_assert_eq!(ctl.alignment(), Alignment::Free);
    }
}
