//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the cursor, the prompt
//! line and the latest playback snapshot. Prompt text editing lives in
//! `app::input`.

mod input;
mod model;

pub use input::PromptKind;
pub use model::*;

#[cfg(test)]
mod tests;
