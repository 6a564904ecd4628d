use std::env;
use std::process;
use log::{error, info};
use glove_compare::Pipeline;

fn main() {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("entering program...");
    let args: Vec<String> = env::args().collect();

    match Pipeline::run(&args) {
        Ok(comparison) => info!("finished, SGD cost {} ({} iterations), GD cost {} ({} iterations)",
            comparison.sgd.last_cost(), comparison.sgd.iterations,
            comparison.gd.last_cost(), comparison.gd.iterations),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
