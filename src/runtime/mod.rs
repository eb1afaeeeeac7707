//! Single-writer async desk and event stream APIs.

/// Event stream types emitted by the desk.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
