//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod command;
pub mod entry;
pub mod error;

// Re-export for convenience
pub use command::{Command, Direction};
pub use entry::{
    Entry, EntryId, EntryKind, Metadata, META_COMPACT_BOUNDARY, META_FILE_COUNT,
    META_INPUT_TOKENS, META_MERGED_IDS, META_MODEL, META_OUTPUT_TOKENS, META_SOURCE_ID, META_THINKING,
    META_TOOL_NAME,
};
pub use error::{AppError, InputError};
