pub mod category;
pub mod config;
pub mod note;
pub mod plan;
pub mod task;

pub use category::*;
pub use config::*;
pub use note::*;
pub use plan::*;
pub use task::*;
