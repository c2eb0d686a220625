//! Interval polling that pauses while its surface is hidden.
//!
//! A [`PollingManager`] runs a task, waits for the task to signal its
//! [`Completion`], then waits `interval` before the next run. Visibility is
//! fed through a [`PageVisibility`] watch channel: hiding the surface drops
//! the pending timer and showing it again catches up on the schedule.

mod error;
mod manager;
mod visibility;

pub use error::{PollError, Result};
pub use manager::{Completion, PollState, PollingManager};
pub use visibility::{PageVisibility, Visibility};
