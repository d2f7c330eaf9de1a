pub mod events;
pub mod memory;
pub mod session;
pub mod speak;
pub mod tools;
