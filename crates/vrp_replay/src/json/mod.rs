pub mod schema;
pub mod solve_request;
pub mod solver_response;
pub mod types;
