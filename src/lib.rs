#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_match)]

pub mod action;
pub mod components;
pub mod config;
pub mod core;
pub mod dialog;
pub mod errors;
pub mod logging;
pub mod tui;

// Re-export commonly used types
pub use action::Action;
pub use core::{ContainerCreateOptions, Inventory, OptionSource};
pub use dialog::ContainerCreateDialog;
