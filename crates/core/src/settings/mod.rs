//! Per-user UI preferences: the active locale and the strings rendered in it.

pub mod messages;
pub mod settings_model;
pub mod settings_traits;
pub mod ui_context;

pub use messages::Messages;
pub use settings_model::{Locale, LOCALE_PREFERENCE_KEY};
pub use settings_traits::PreferenceStore;
pub use ui_context::UiContext;
