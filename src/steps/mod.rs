//! Next-step suggestions: the catalog, its entry types, and selection

pub mod catalog;
pub mod readme;
pub mod selector;
pub mod types;

pub use catalog::{Catalog, CatalogError, BUILTIN_STEPS};
pub use selector::{select_best_step, select_steps};
pub use types::{
    ResolvedCommand, ResolvedFollowUp, ResolvedStep, Step, StepArgument, StepCommand,
    StepDescription, StepFollowUp,
};
