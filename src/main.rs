use std::env;

use anyhow::Result;
use distance::{BrayCurtis, Distance};
use log::info;
use ndarray::ArrayView1;
use optimization::{
    cost::{LeastSquaresCost, QuadraticCost},
    dataset::Dataset,
    minimizer::FirstOrderMinimizer,
    specs::MinimizerBuilder,
};
use rand::{SeedableRng, rngs::StdRng};

use crate::config::{ProblemSpec, RunConfig};

mod config;

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => RunConfig::load(path)?,
        None => {
            info!("no config given, running the default regression");
            RunConfig::default()
        }
    };

    let mut minimizer = MinimizerBuilder::new().build(&config.minimizer)?;

    match config.problem {
        ProblemSpec::Quadratic {
            x0,
            samples_per_pass,
        } => {
            minimizer.set_cost_function(Box::new(QuadraticCost::new(x0, samples_per_pass)));
            let cost = minimizer.minimize()?;

            info!(
                "finished in state {:?} after {} passes: cost={cost}",
                minimizer.state(),
                minimizer.cur_passes()
            );
            info!("variables={:?}", minimizer.variables().unwrap_or_default());
        }
        ProblemSpec::LeastSquares {
            samples,
            features,
            noise_std,
            batch_size,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let (dataset, weights) = Dataset::linear(samples, features, noise_std, &mut rng)?;
            let cost = LeastSquaresCost::new(dataset, batch_size, seed);
            minimizer.set_cost_function(Box::new(cost));
            let cost = minimizer.minimize()?;

            let learned = minimizer.variables().unwrap_or_default();
            let dist = BrayCurtis.distance(ArrayView1::from(learned), weights.view())?;

            info!(
                "finished in state {:?} after {} passes: cost={cost}",
                minimizer.state(),
                minimizer.cur_passes()
            );
            info!("bray-curtis distance to the true weights: {dist}");
        }
    }

    Ok(())
}
