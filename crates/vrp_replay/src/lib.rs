pub mod error;
pub mod json;
pub mod problem;
pub mod replay;
pub mod session;
pub mod solution;
pub mod solver_client;
mod utils;

#[cfg(test)]
pub(crate) mod test_utils;
