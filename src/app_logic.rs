/*
 * Application logic layer. `ChecklistLogic` acts as the presenter: it turns
 * platform events into toggle store updates and platform commands. Unit tests
 * for it are in `handler_tests.rs`.
 */
pub mod handler;
pub mod ui_constants;


pub use handler::ChecklistLogic;
