use schemars::schema_for;

use crate::json::{solve_request, types};

pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(solve_request::SolveRequest))
}

pub fn generate_problem_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(types::JsonProblem))
}
