mod periodic_task;
mod source;

pub use periodic_task::{NewPeriodicTask, PeriodicTask, PeriodicTaskChanges};
pub use source::{EpgSource, PlaylistAccount};
