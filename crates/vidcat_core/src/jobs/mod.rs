//! Input directories and what is found in them.

mod discovery;

pub use discovery::{discover_directory, DirectoryJob};
