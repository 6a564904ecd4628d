//! Weighted least-squares GloVe cost.
//!
//! Every observed pair contributes `w_ij * (c_j . u_i - ln P_ij)^2`, where
//! `w_ij = 2 * sigmoid(P_ij, factor) - 1`, and the sum is halved. The dictionary
//! and matrix evaluators are thin adapters over [`weighted_cost`].

use ndarray::Array1;
use crate::cooccurrence::{CooccurrenceDict, CooccurrenceMatrix, CooccurrenceSource};
use crate::error::Result;
use crate::theta::{DictTheta, EmbeddingStore, PackedTheta, Role};
use crate::vocabulary::Vocabulary;

/// Smoothing factor used when none is given.
pub const DEFAULT_FACTOR: f64 = 10.0;


/// Logistic smoother of a co-occurrence count, larger `factor` flattens the slope.
pub fn sigmoid(value: f64, factor: f64) -> f64 {
    1.0 / (1.0 + (-value / factor).exp())
}

/// Confidence of a pair, zero for a zero count and negative below zero.
pub fn pair_weight(count: f64, factor: f64) -> f64 {
    2.0 * sigmoid(count, factor) - 1.0
}

/// `c_j . u_i - ln P_ij`, no guard on the count.
pub(crate) fn residual(dot: f64, count: f64) -> f64 {
    dot - count.ln()
}

pub fn weighted_cost<S, E>(source: &S, store: &E, factor: f64) -> Result<f64>
where
    S: CooccurrenceSource + ?Sized,
    E: EmbeddingStore<S::Key> + ?Sized,
{
    let mut cost = 0.0;
    source.visit(|central, context, p_ij| {
        let central_vector = store.vector_for(central, Role::Central)?;
        let context_vector = store.vector_for(context, Role::Context)?;
        cost += pair_weight(p_ij, factor) * residual(context_vector.dot(&central_vector), p_ij).powi(2);
        Ok(())
    })?;

    Ok(cost * 0.5)
}

/// Cost over the sparse dictionary form, `factor` defaults to [`DEFAULT_FACTOR`].
pub fn cost_glove_dict(theta: &DictTheta, co_occurrences: &CooccurrenceDict, factor: Option<f64>) -> Result<f64> {
    weighted_cost(co_occurrences, theta, factor.unwrap_or(DEFAULT_FACTOR))
}

/// Cost over the dense matrix form with the fixed [`DEFAULT_FACTOR`]; zero
/// entries are unobserved pairs and skipped.
pub fn cost_glove(vocabulary: &Vocabulary, theta: &Array1<f64>, co_occurrence_mtx: &ndarray::Array2<f64>) -> Result<f64> {
    let store = PackedTheta::new(vocabulary, theta.view())?;
    let source = CooccurrenceMatrix::new(co_occurrence_mtx, vocabulary)?;
    weighted_cost(&source, &store, DEFAULT_FACTOR)
}


#[cfg(test)]
mod tests {

    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2};
    use crate::cooccurrence::CooccurrenceDict;
    use crate::theta::{gen_theta, DictTheta};
    use crate::vocabulary::Vocabulary;
    use super::*;

    fn vocab(ws: &[&str]) -> Vocabulary {
        Vocabulary::new(ws.iter().map(|w| w.to_string()).collect()).unwrap()
    }

    #[test]
    fn sigmoid_shape() {
        for factor in [0.5, 1.0, 10.0, 100.0] {
            assert_eq!(sigmoid(0.0, factor), 0.5);
        }
        let mut last = 0.0;
        for value in [-50.0, -3.0, -0.1, 0.0, 0.1, 3.0, 50.0] {
            let s = sigmoid(value, 10.0);
            assert!(s > last);
            last = s;
        }
        assert!(sigmoid(-1e4, 10.0) < 1e-12);
        assert!(sigmoid(1e4, 10.0) > 1.0 - 1e-12);
        // larger factor keeps small counts near one half
        assert!(sigmoid(4.0, 100.0) < sigmoid(4.0, 10.0));
    }

    #[test]
    fn weight_crosses_zero_at_zero_count() {
        assert_eq!(pair_weight(0.0, 10.0), 0.0);
        assert!(pair_weight(1e-9, 10.0) > 0.0);
        assert!(pair_weight(-1e-9, 10.0) < 0.0);
    }

    #[test]
    fn two_word_scenario() {
        let vocabulary = vocab(&["a", "b"]);
        // central a = [1, 0], context b = [1, 0]
        let theta: Array1<f64> = array![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mut cooc = CooccurrenceDict::default();
        cooc.insert("a", "b", 4.0);

        let weight = 2.0 / (1.0 + (-0.4f64).exp()) - 1.0;
        let expected = weight * (1.0 - 4f64.ln()).powi(2) / 2.0;

        let dict_theta = DictTheta::from_packed(&vocabulary, &theta).unwrap();
        let dict_cost = cost_glove_dict(&dict_theta, &cooc, Some(10.0)).unwrap();
        assert_abs_diff_eq!(dict_cost, expected, epsilon = 1e-12);
        assert_eq!(cost_glove_dict(&dict_theta, &cooc, None).unwrap(), dict_cost);

        let mut x_mat: Array2<f64> = Array2::zeros((2, 2));
        x_mat[[1, 0]] = 4.0;
        let mtx_cost = cost_glove(&vocabulary, &theta, &x_mat).unwrap();
        assert_abs_diff_eq!(mtx_cost, expected, epsilon = 1e-12);
    }

    #[test]
    fn exact_fit_costs_nothing() {
        let vocabulary = vocab(&["a", "b"]);
        let theta: Array1<f64> = array![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let mut cooc = CooccurrenceDict::default();
        cooc.insert("a", "b", std::f64::consts::E);
        let dict_theta = DictTheta::from_packed(&vocabulary, &theta).unwrap();
        for factor in [0.1, 10.0, 1e6] {
            assert_abs_diff_eq!(cost_glove_dict(&dict_theta, &cooc, Some(factor)).unwrap(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn dict_and_matrix_agree() {
        let vocabulary = vocab(&["the", "cat", "sat", "on", "mat"]);
        let theta = gen_theta(&vocabulary, 3, Some(11)).unwrap();
        let mut cooc = CooccurrenceDict::default();
        cooc.insert("the", "cat", 3.0);
        cooc.insert("cat", "the", 3.0);
        cooc.insert("cat", "sat", 1.0);
        cooc.insert("sat", "on", 0.5);
        cooc.insert("on", "mat", 2.25);
        cooc.insert("mat", "mat", 7.0);

        let dict_theta = DictTheta::from_packed(&vocabulary, &theta).unwrap();
        let dict_cost = cost_glove_dict(&dict_theta, &cooc, None).unwrap();
        let mtx_cost = cost_glove(&vocabulary, &theta, &cooc.to_matrix(&vocabulary).unwrap()).unwrap();
        assert_abs_diff_eq!(dict_cost, mtx_cost, epsilon = 1e-12);
        assert!(dict_cost > 0.0);
    }

    #[test]
    fn zero_count_in_dict_is_not_guarded() {
        let vocabulary = vocab(&["a", "b"]);
        let theta: Array1<f64> = Array1::ones(4);
        let dict_theta = DictTheta::from_packed(&vocabulary, &theta).unwrap();
        let mut cooc = CooccurrenceDict::default();
        cooc.insert("a", "b", 0.0);
        // zero weight times an infinite residual
        assert!(cost_glove_dict(&dict_theta, &cooc, None).unwrap().is_nan());

        // the dense form never visits the zero
        let x_mat: Array2<f64> = Array2::zeros((2, 2));
        assert_eq!(cost_glove(&vocabulary, &theta, &x_mat).unwrap(), 0.0);
    }

    #[test]
    fn unknown_word_propagates() {
        let vocabulary = vocab(&["a"]);
        let dict_theta = DictTheta::from_packed(&vocabulary, &Array1::ones(2)).unwrap();
        let mut cooc = CooccurrenceDict::default();
        cooc.insert("a", "zebra", 2.0);
        assert!(cost_glove_dict(&dict_theta, &cooc, None).is_err());
    }

}
