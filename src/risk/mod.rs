// Risk overlay and post-trade protections

pub mod overlay;
pub mod protections;

pub use overlay::assess;
pub use protections::{ProtectionLock, Protections};
