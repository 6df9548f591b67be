//! Enumerations for TUI state management.

/// Which part of the screen has keyboard focus.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    TaskList,
    Form,
    Help,
}
