//! Fan-out of one filter submission into per-service search tasks.

pub mod builder;
pub mod denormalize;
pub mod submit;

pub use builder::{resolve_title, SearchTask, TaskBuilder, TitlePolicy, FALLBACK_TITLE, PAGE_SIZE};
pub use denormalize::denormalize;
pub use submit::{submit, RequiredFieldsForm};
