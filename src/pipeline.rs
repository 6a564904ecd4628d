// imports
use crate::config::{files_handling, Config, RunConfig};
use crate::cooccurrence::CooccurrenceDict;
use crate::error::Result;
use crate::plot::draw_comparison;
use crate::theta::{gen_theta, packed_dimension};
use crate::train::{History, Strategy, Train};
use crate::vocabulary::Vocabulary;

use std::time::Instant;
use log::info;
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;


/// Outcome of running both strategies from the same starting theta.
pub struct Comparison {
    pub sgd: History,
    pub gd: History,
    pub theta_sgd: Array1<f64>,
    pub theta_gd: Array1<f64>,
}

pub struct Pipeline {}

impl Pipeline {

    // runs the main procedure -
    // -> configuration of arguments
    // -> loading vocabulary, cooccurrences and theta
    // -> SGD then GD from the same theta, chart and optional outputs

    pub fn run(args: &[String]) -> Result<Comparison> {

        info!("building parameters...");
        let params = Config::new(args)?.get_params();
        info!("{}", params);
        Pipeline::run_with(&params)
    }

    pub fn run_with(params: &RunConfig) -> Result<Comparison> {

        let timer = Instant::now();
        let (vocabulary, co_occurrence, theta) = Pipeline::load(params)?;
        info!("loaded {} words, {} cooccurrences, theta of length {}, took {} seconds ...",
            vocabulary.len(), co_occurrence.len(), theta.len(), timer.elapsed().as_secs());

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (theta_sgd, sgd) = Train::run(Strategy::Stochastic, &vocabulary, &co_occurrence, theta.clone(), &params.train, &mut rng)?.into_parts();
        let (theta_gd, gd) = Train::run(Strategy::FullBatch, &vocabulary, &co_occurrence, theta, &params.train, &mut rng)?.into_parts();

        let plot_path = params.output_dir.join(&params.plot_file);
        std::fs::create_dir_all(&params.output_dir)?;
        draw_comparison(&plot_path, &sgd, &gd)?;
        info!("saved chart to {}", plot_path.display());

        let comparison = Comparison { sgd, gd, theta_sgd, theta_gd };
        Pipeline::save(params, &comparison)?;
        Ok(comparison)
    }

    fn load(params: &RunConfig) -> Result<(Vocabulary, CooccurrenceDict, Array1<f64>)> {

        let vocabulary = files_handling::read_input::<Vocabulary>(&params.input_dir.join("vocabulary"))?;
        let co_occurrence = files_handling::read_input::<CooccurrenceDict>(&params.input_dir.join("co_occurrence"))?;
        co_occurrence.validate_counts()?;

        let theta = match params.init_dimension {
            Some(dimension) => {
                info!("generating random theta of dimension {}", dimension);
                gen_theta(&vocabulary, dimension, params.seed)?
            },
            None => files_handling::read_input::<files_handling::ThetaInput>(&params.input_dir.join("theta"))?
                .into_packed(&vocabulary)?
        };

        let dimension = packed_dimension(&vocabulary, theta.len())?;
        info!("embedding dimension {}", dimension);
        Ok((vocabulary, co_occurrence, theta))
    }

    fn save(params: &RunConfig, comparison: &Comparison) -> Result<()> {

        if params.save_history {
            let histories = [comparison.sgd.clone(), comparison.gd.clone()];
            files_handling::save_output(&params.output_dir, "SGD_GD", &histories[..])?;
            info!("saved cost histories to {}", params.output_dir.join("SGD_GD.csv").display());
        }

        if params.save_theta {
            files_handling::save_output(&params.output_dir, "theta_sgd", &comparison.theta_sgd)?;
            files_handling::save_output(&params.output_dir, "theta_gd", &comparison.theta_gd)?;
            info!("saved optimized thetas to {}", params.output_dir.display());
        }

        Ok(())
    }

}
