pub mod assistant;
pub mod authoring;
pub mod certificates;
pub mod core;
pub mod courses;
pub mod exchange;
pub mod reviews;
pub mod session;
pub mod users;
