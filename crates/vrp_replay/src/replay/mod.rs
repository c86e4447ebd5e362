pub mod clock;
pub mod controller;
pub mod engine;
pub mod ledger;
pub mod renderer;
pub mod snapshot;
