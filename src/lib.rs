//! nextstep - contextual next-step suggestions for a developer-tooling chat assistant
//!
//! Given a [`WholeStatus`] snapshot of the user's project and environment,
//! [`select_steps`] picks the applicable entries of a [`Catalog`] and orders
//! them by urgency. The host presents the result and runs commands.

pub mod commands;
pub mod config;
pub mod logging;
pub mod render;
pub mod status;
pub mod steps;

pub use status::WholeStatus;
pub use steps::{select_best_step, select_steps, Catalog, CatalogError, ResolvedStep};
