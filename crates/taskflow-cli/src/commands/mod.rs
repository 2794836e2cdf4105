pub mod add;
pub mod category;
pub mod list;
pub mod preview;
pub mod recurrence;
pub mod stats;
