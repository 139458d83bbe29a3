/// Territory index façade - split into construction, reads, writes and monitoring
mod core;
mod monitoring;
mod mutations;
mod queries;

pub use self::core::TerritoryIndex;
