//! Condition-gated, priority-ordered step selection.

use std::cell::{Cell, RefCell};
use std::panic;
use std::sync::Once;

use tracing::{trace, warn};

use super::catalog::Catalog;
use super::types::{ResolvedStep, Step};
use crate::status::WholeStatus;

/// Select every step whose condition holds on `status`
///
/// Output is sorted by ascending priority; steps with equal priority keep
/// their catalog order. A step whose condition or description panics is
/// logged and left out. An empty result means nothing applies right now.
pub fn select_steps(catalog: &Catalog, status: &WholeStatus) -> Vec<ResolvedStep> {
    let mut selected: Vec<ResolvedStep> = catalog
        .steps()
        .iter()
        .filter_map(|step| evaluate(step, status))
        .collect();

    // stable
    selected.sort_by_key(|s| s.priority);
    selected
}

/// The most urgent applicable step, if any
pub fn select_best_step(catalog: &Catalog, status: &WholeStatus) -> Option<ResolvedStep> {
    select_steps(catalog, status).into_iter().next()
}

thread_local! {
    /// Set while a catalog entry runs under [`catch_quietly`]
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
    /// Source location of the last panic swallowed on this thread
    static PANIC_LOCATION: RefCell<Option<String>> = const { RefCell::new(None) };
}

static INSTALL_HOOK: Once = Once::new();

/// Wrap the current panic hook so panics caught by [`catch_quietly`] only
/// reach the log. Panics anywhere else still go to the original hook.
fn install_panic_hook() {
    INSTALL_HOOK.call_once(|| {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            if QUIET_PANICS.with(Cell::get) {
                let location = panic_info.location().map(ToString::to_string);
                PANIC_LOCATION.with(|l| *l.borrow_mut() = location);
            } else {
                original_hook(panic_info);
            }
        }));
    });
}

/// `catch_unwind` without the default "thread panicked" report on stderr
fn catch_quietly<R>(f: impl FnOnce() -> R + panic::UnwindSafe) -> std::thread::Result<R> {
    install_panic_hook();
    QUIET_PANICS.with(|q| q.set(true));
    let result = panic::catch_unwind(f);
    QUIET_PANICS.with(|q| q.set(false));
    result
}

fn take_panic_location() -> String {
    PANIC_LOCATION
        .with(|l| l.borrow_mut().take())
        .unwrap_or_else(|| "unknown".to_string())
}

fn evaluate(step: &Step, status: &WholeStatus) -> Option<ResolvedStep> {
    let applies = match catch_quietly(|| (step.condition)(status)) {
        Ok(applies) => applies,
        Err(payload) => {
            warn!(
                step = step.title,
                error = panic_message(payload.as_ref()),
                location = %take_panic_location(),
                "Step condition panicked, skipping step"
            );
            return None;
        }
    };

    if !applies {
        return None;
    }

    match catch_quietly(|| step.resolve(status)) {
        Ok(resolved) => {
            trace!(step = step.title, priority = step.priority, "Step applies");
            Some(resolved)
        }
        Err(payload) => {
            warn!(
                step = step.title,
                error = panic_message(payload.as_ref()),
                location = %take_panic_location(),
                "Step description panicked, skipping step"
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::types::StepDescription;

    fn yes(_: &WholeStatus) -> bool {
        true
    }

    fn no(_: &WholeStatus) -> bool {
        false
    }

    fn boom(_: &WholeStatus) -> bool {
        panic!("condition exploded")
    }

    fn boom_text(_: &WholeStatus) -> String {
        panic!("description exploded")
    }

    fn step(title: &'static str, priority: u32, condition: fn(&WholeStatus) -> bool) -> Step {
        Step {
            title,
            description: StepDescription::Static("text"),
            doc_link: None,
            commands: &[],
            follow_ups: &[],
            condition,
            priority,
        }
    }

    fn titles(steps: &[ResolvedStep]) -> Vec<&str> {
        steps.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_filters_by_condition() {
        let catalog = Catalog::new(vec![step("a", 0, yes), step("b", 0, no), step("c", 0, yes)]).unwrap();
        let selected = select_steps(&catalog, &WholeStatus::default());
        assert_eq!(titles(&selected), vec!["a", "c"]);
    }

    #[test]
    fn test_orders_by_priority_stably() {
        let catalog = Catalog::new(vec![
            step("low-1", 2, yes),
            step("high-1", 0, yes),
            step("mid", 1, yes),
            step("high-2", 0, yes),
            step("low-2", 2, yes),
        ])
        .unwrap();
        let selected = select_steps(&catalog, &WholeStatus::default());
        assert_eq!(
            titles(&selected),
            vec!["high-1", "high-2", "mid", "low-1", "low-2"]
        );
    }

    #[test]
    fn test_empty_catalog_selects_nothing() {
        let selected = select_steps(&Catalog::empty(), &WholeStatus::default());
        assert!(selected.is_empty());
        assert!(select_best_step(&Catalog::empty(), &WholeStatus::default()).is_none());
    }

    #[test]
    fn test_best_step_is_first_by_priority() {
        let catalog = Catalog::new(vec![step("later", 3, yes), step("sooner", 1, yes)]).unwrap();
        let best = select_best_step(&catalog, &WholeStatus::default()).unwrap();
        assert_eq!(best.title, "sooner");
    }

    #[test]
    fn test_panicking_condition_is_skipped() {
        let catalog = Catalog::new(vec![step("bad", 0, boom), step("good", 1, yes)]).unwrap();
        let selected = select_steps(&catalog, &WholeStatus::default());
        assert_eq!(titles(&selected), vec!["good"]);
    }

    #[test]
    fn test_panicking_description_is_skipped() {
        let mut bad = step("bad", 0, yes);
        bad.description = StepDescription::Computed(boom_text);
        let catalog = Catalog::new(vec![bad, step("good", 0, yes)]).unwrap();
        let selected = select_steps(&catalog, &WholeStatus::default());
        assert_eq!(titles(&selected), vec!["good"]);
    }

    #[test]
    fn test_description_not_resolved_when_condition_fails() {
        let mut guarded = step("guarded", 0, no);
        guarded.description = StepDescription::Computed(boom_text);
        let catalog = Catalog::new(vec![guarded]).unwrap();
        assert!(select_steps(&catalog, &WholeStatus::default()).is_empty());
    }

    #[test]
    fn test_caught_panic_is_recorded_not_reported() {
        let result = catch_quietly(|| boom(&WholeStatus::default()));
        assert_eq!(panic_message(result.unwrap_err().as_ref()), "condition exploded");
        assert!(take_panic_location().contains("selector.rs"));

        // Flag is cleared so later panics reach the original hook
        assert!(!QUIET_PANICS.with(Cell::get));
        assert_eq!(take_panic_location(), "unknown");
    }

    #[test]
    fn test_caught_value_passes_through() {
        assert_eq!(catch_quietly(|| 7).unwrap(), 7);
        assert!(!QUIET_PANICS.with(Cell::get));
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
