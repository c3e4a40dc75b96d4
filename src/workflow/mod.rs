pub mod analysis;
pub mod hierarchy;
pub mod summary;
