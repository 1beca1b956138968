pub mod program_cache;

pub use program_cache::{classify_program, ProgramCache, ProgramKind, PROGRAM_CACHE};
