// Entry and exit decision rules

pub mod entry;
pub mod exit;

pub use entry::{EntryFlags, EntryRule};
pub use exit::{ExitFlags, ExitRule};
