//! Resource services: one per entity, each pairing an `ApiClient` with a
//! `Transport` so callers get plain `Result`s instead of request/response
//! plumbing.
//!
//! Services never retry and never cache. Every failure comes back as an
//! `ApiError` whose `message()` is fit for display.

mod categories;
mod subtasks;
mod tasks;

pub use categories::CategoryService;
pub use subtasks::SubtaskService;
pub use tasks::TaskService;
