pub mod autosave;
pub mod caret;
pub mod measure;

pub use autosave::AutosaveEditor;
pub use caret::{CaretFollow, Viewport};
pub use measure::TextMeasure;
