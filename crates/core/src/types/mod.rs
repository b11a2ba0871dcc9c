//! Domain type definitions

mod book;
mod common;
mod progress;

pub use book::{Audiobook, BookId, Chapter, SourceLocator};
pub use common::{Timestamp, Validator};
pub use progress::ProgressRecord;
