//! Resource document model: keyed records plus opaque passthrough text

pub mod codec;
pub mod ops;

mod model;

pub use model::{Document, LineEnding, Record};
pub use ops::UpsertAction;
