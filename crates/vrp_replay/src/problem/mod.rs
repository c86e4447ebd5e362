pub mod generator;
pub mod location;
pub mod node;
pub mod pickup_delivery;
pub mod problem_instance;
pub mod time_window;
