pub mod error;
pub mod generation;
pub mod options;
pub mod specs;

pub use error::ViberError;
pub use generation::{GeneratedFile, GenerationState, GenerationStatus};
pub use specs::{InputMode, OutputMode, ProjectSpecs};
