pub mod ai;
pub mod assistant;
pub mod booking;
pub mod catalog;
pub mod resolver;
