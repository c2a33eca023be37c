//! Text assembly for layout results.

mod cleanup;
mod options;
mod text;

pub use cleanup::TextCleaner;
pub use options::{PageSelection, RenderOptions};
pub use text::{page_text, to_text};
