pub mod route_solution;
