pub mod channels;
pub mod guide;
pub mod plan;

// Re-export command functions for convenience
pub use channels::channels;
pub use guide::{diff, fetch, promote};
pub use plan::{plan, run};
