pub mod memory;
pub mod notion;
