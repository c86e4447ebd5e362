use rand::Rng;
use tracing::instrument;

use crate::problem::{location::Location, node::NodeKind, problem_instance::ProblemInstance};

#[derive(Debug, Clone, Copy)]
pub struct GeneratorParams {
    pub width: u32,
    pub height: u32,
    pub num_cars: usize,
    pub num_pairs: usize,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            width: 960,
            height: 600,
            num_cars: 3,
            num_pairs: 10,
        }
    }
}

/// Random instance: the depot first, then the cars, then pickup/delivery
/// pairs. Coordinates are whole canvas pixels.
#[instrument(skip(rng), level = "debug")]
pub fn generate_random_problem<R: Rng>(params: GeneratorParams, rng: &mut R) -> ProblemInstance {
    let mut instance = ProblemInstance::new();

    instance.push_node(random_location(&params, rng), NodeKind::Depot);

    for _ in 0..params.num_cars {
        instance.push_node(random_location(&params, rng), NodeKind::vehicle());
    }

    for _ in 0..params.num_pairs {
        let pickup = instance.push_node(random_location(&params, rng), NodeKind::Pickup);
        let delivery = instance.push_node(random_location(&params, rng), NodeKind::Delivery);
        instance.push_pair(pickup, delivery);
    }

    instance
}

fn random_location<R: Rng>(params: &GeneratorParams, rng: &mut R) -> Location {
    Location::from_cartesian(
        rng.random_range(0..params.width.max(1)) as f64,
        rng.random_range(0..params.height.max(1)) as f64,
    )
}
