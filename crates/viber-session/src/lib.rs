pub mod controller;
pub mod extract;
pub mod splitter;

pub use controller::{ClientFactory, GenerationSession};
pub use extract::{extract_specs, ExtractError};
pub use splitter::{parse_files, DEFAULT_FILENAME, FILE_SEPARATOR, STREAM_TERMINATOR};
