use std::fmt::Display;
use std::time::Instant;
use log::{debug, info, warn};
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use rand::Rng;
use crate::config::TrainParams;
use crate::cooccurrence::CooccurrenceSource;
use crate::cost::weighted_cost;
use crate::error::{GloveError, Result};
use crate::gradient::{stochastic_gradient_descent, weighted_gradient};
use crate::theta::PackedTheta;
use crate::vocabulary::{Vocabulary, WordIndex};


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Stochastic,
    FullBatch,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Stochastic => write!(f, "SGD"),
            Strategy::FullBatch => write!(f, "GD"),
        }
    }
}


/// Costs recorded during one optimization run, `minutes[k]` is the gradient
/// time accumulated when `costs[k]` was recorded. Entry 0 is the starting theta.
#[derive(Clone, Debug)]
pub struct History {
    pub strategy: Strategy,
    pub costs: Vec<f64>,
    pub minutes: Vec<f64>,
    pub iterations: usize,
    pub stopped_early: bool,
}

impl History {

    fn new(strategy: Strategy, initial_cost: f64) -> Self {
        Self {
            strategy,
            costs: vec![initial_cost],
            minutes: vec![0.0],
            iterations: 0,
            stopped_early: false
        }
    }

    pub fn last_cost(&self) -> f64 {
        *self.costs.last().unwrap_or(&f64::NAN)
    }

}


pub struct Train {
    theta: Array1<f64>,
    history: History,
}

impl Train {

    pub fn get_theta(&self) -> &Array1<f64> {
        &self.theta
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_parts(self) -> (Array1<f64>, History) {
        (self.theta, self.history)
    }

    fn cost<S>(vocabulary: &Vocabulary, theta: &Array1<f64>, co_occurrences: &S, factor: f64) -> Result<f64>
    where
        S: CooccurrenceSource + ?Sized,
        Vocabulary: WordIndex<S::Key>,
    {
        let store = PackedTheta::new(vocabulary, theta.view())?;
        weighted_cost(co_occurrences, &store, factor)
    }

    /// Steps `theta` with the chosen strategy for at most `max_iter` iterations.
    ///
    /// Every `record_every`-th iteration (counting from 0) the cost is recorded, and
    /// the run stops as soon as a recorded cost exceeds the previous one.
    pub fn run<S, R>(
        strategy: Strategy,
        vocabulary: &Vocabulary,
        co_occurrences: &S,
        theta: Array1<f64>,
        train_params: &TrainParams,
        rng: &mut R,
    ) -> Result<Train>
    where
        S: CooccurrenceSource + ?Sized,
        Vocabulary: WordIndex<S::Key>,
        R: Rng + ?Sized,
    {
        if train_params.record_every == 0 {
            return Err(GloveError::Config("record_every must be positive".to_string()));
        }

        let factor = train_params.factor;
        let learning_rate = train_params.learning_rate;

        info!("optimizing theta with {} ... learning rate = {}", strategy, learning_rate);
        let mut theta = theta;
        let mut history = History::new(strategy, Train::cost(vocabulary, &theta, co_occurrences, factor)?);
        let mut acum = 0.0;

        for i in 0..train_params.max_iter {

            let timer = Instant::now();
            let gradient = match strategy {
                Strategy::Stochastic => stochastic_gradient_descent(vocabulary, &theta, co_occurrences, factor, train_params.batch_size, rng)?,
                Strategy::FullBatch => weighted_gradient(vocabulary, &theta, co_occurrences, factor)?,
            };
            acum += timer.elapsed().as_secs_f64() / 60.0;

            match gradient.max() {
                Ok(max_gradient) => info!("{} iteration {}, max gradient {}, {:.6} minutes", strategy, i, max_gradient, acum),
                Err(e) => warn!("{} iteration {}, max gradient undefined ({}), {:.6} minutes", strategy, i, e, acum),
            }

            theta = &theta - &(learning_rate * &gradient);
            history.iterations = i + 1;

            if i % train_params.record_every == 0 {
                let cost = Train::cost(vocabulary, &theta, co_occurrences, factor)?;
                let previous = history.last_cost();
                history.costs.push(cost);
                history.minutes.push(acum);
                debug!("{} iteration {}, cost {} (previous {})", strategy, i, cost, previous);
                if cost > previous {
                    warn!("{} stop - increasing cost", strategy);
                    history.stopped_early = true;
                    break;
                }
            }
        }

        info!("finished {} after {} iterations, cost {}", strategy, history.iterations, history.last_cost());
        Ok(Train { theta, history })
    }

}
