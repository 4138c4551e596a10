pub mod context;
pub mod delete;
pub mod tags;
