//! Gradients of the weighted least-squares cost with respect to a packed theta.
//!
//! For an observed pair with residual `r = c_j . u_i - ln P_ij` and weight
//! `w_ij`, the central block of `i` receives `w_ij * r * c_j` and the context
//! block of `j` receives `w_ij * r * u_i`. Results have the shape of theta so
//! the caller can step with `theta - learning_rate * gradient`.

use ndarray::prelude::*;
use rand::Rng;
use rand::seq::index;
use crate::cooccurrence::{CooccurrenceDict, CooccurrenceMatrix, CooccurrenceSource};
use crate::cost::{pair_weight, residual};
use crate::error::{GloveError, Result};
use crate::theta::{PackedTheta, Role};
use crate::vocabulary::{Vocabulary, WordIndex};


fn accumulate_pair<K: ?Sized>(
    store: &PackedTheta,
    gradient: &mut Array1<f64>,
    central: &K,
    context: &K,
    p_ij: f64,
    factor: f64,
) -> Result<()>
where
    Vocabulary: WordIndex<K>
{
    let i = store.vocabulary().index_of(central)?;
    let j = store.vocabulary().index_of(context)?;
    let central_vector = store.vector_at(i, Role::Central);
    let context_vector = store.vector_at(j, Role::Context);

    let g = pair_weight(p_ij, factor) * residual(context_vector.dot(&central_vector), p_ij);
    gradient.slice_mut(s![store.block(i, Role::Central)]).scaled_add(g, &context_vector);
    gradient.slice_mut(s![store.block(j, Role::Context)]).scaled_add(g, &central_vector);
    Ok(())
}

/// Full gradient over every observed pair of `source`.
pub fn weighted_gradient<S>(vocabulary: &Vocabulary, theta: &Array1<f64>, source: &S, factor: f64) -> Result<Array1<f64>>
where
    S: CooccurrenceSource + ?Sized,
    Vocabulary: WordIndex<S::Key>,
{
    let store = PackedTheta::new(vocabulary, theta.view())?;
    let mut gradient: Array1<f64> = Array1::zeros(theta.len());
    source.visit(|central, context, p_ij| {
        accumulate_pair(&store, &mut gradient, central, context, p_ij, factor)
    })?;
    Ok(gradient)
}

/// Full batch gradient over the sparse dictionary form.
pub fn gradient_descent_dict(vocabulary: &Vocabulary, theta: &Array1<f64>, co_occurrences: &CooccurrenceDict, factor: f64) -> Result<Array1<f64>> {
    weighted_gradient(vocabulary, theta, co_occurrences, factor)
}

/// Full batch gradient over the dense matrix form, zeros skipped.
pub fn gradient_descent(vocabulary: &Vocabulary, theta: &Array1<f64>, co_occurrence_mtx: &Array2<f64>, factor: f64) -> Result<Array1<f64>> {
    let source = CooccurrenceMatrix::new(co_occurrence_mtx, vocabulary)?;
    weighted_gradient(vocabulary, theta, &source, factor)
}

/// Gradient summed over `batch_size` observed pairs drawn uniformly without
/// replacement, every pair when the batch covers the whole source.
pub fn stochastic_gradient_descent<S, R>(
    vocabulary: &Vocabulary,
    theta: &Array1<f64>,
    co_occurrences: &S,
    factor: f64,
    batch_size: usize,
    rng: &mut R,
) -> Result<Array1<f64>>
where
    S: CooccurrenceSource + ?Sized,
    Vocabulary: WordIndex<S::Key>,
    R: Rng + ?Sized,
{
    if batch_size == 0 {
        return Err(GloveError::Config("batch_size must be positive".to_string()));
    }

    let n = co_occurrences.n_observed();
    if batch_size >= n {
        return weighted_gradient(vocabulary, theta, co_occurrences, factor);
    }

    let mut chosen = vec![false; n];
    for k in index::sample(rng, n, batch_size).iter() {
        chosen[k] = true;
    }

    let store = PackedTheta::new(vocabulary, theta.view())?;
    let mut gradient: Array1<f64> = Array1::zeros(theta.len());
    let mut position = 0;
    co_occurrences.visit(|central, context, p_ij| {
        let picked = chosen.get(position).copied().unwrap_or(false);
        position += 1;
        if picked {
            accumulate_pair(&store, &mut gradient, central, context, p_ij, factor)?;
        }
        Ok(())
    })?;
    Ok(gradient)
}
