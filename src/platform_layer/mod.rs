pub mod app;
pub mod error;
pub mod types;
pub use app::{PlatformInterface, UserAction};
pub use types::{
    AppEvent, CheckState, HeaderAction, MessageSeverity, PlatformCommand, PlatformEventHandler,
    ToggleDescriptor,
};
