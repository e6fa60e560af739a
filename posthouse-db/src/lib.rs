pub mod client;
pub mod collection;
pub mod memory;
mod record;
