//! Multinomial logistic regression over sparse TF-IDF vectors.
//!
//! Trained by per-example gradient descent in corpus order from zero weights,
//! with classes in sorted order, so a fixed corpus always produces the same
//! model.

use std::collections::BTreeSet;

use super::features::SparseVector;

/// Gradient-descent hyper-parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrainParams {
    pub epochs: usize,
    pub learning_rate: f64,
    /// L2 decay applied to weights after each epoch (bias is not decayed).
    pub l2: f64,
}

/// One softmax classifier (one per slot).
#[derive(Debug, Clone)]
pub struct SoftmaxClassifier {
    classes: Vec<String>,
    /// `weights[class][feature]`
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl SoftmaxClassifier {
    /// Fit on `xs` against `labels` (same length).
    pub fn fit(xs: &[SparseVector], labels: &[&str], n_features: usize, params: &TrainParams) -> Self {
        let classes: Vec<String> = labels
            .iter()
            .map(|l| (*l).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let k = classes.len();
        let mut weights = vec![vec![0.0; n_features]; k];
        let mut bias = vec![0.0; k];

        if k < 2 || xs.is_empty() {
            return Self {
                classes,
                weights,
                bias,
            };
        }

        let targets: Vec<usize> = labels
            .iter()
            .map(|l| classes.binary_search_by(|c| c.as_str().cmp(l)).unwrap_or(0))
            .collect();
        let lr = params.learning_rate;
        let shrink = (1.0 - lr * params.l2).clamp(0.0, 1.0);
        let mut probs = vec![0.0; k];

        for _ in 0..params.epochs {
            for (x, &y) in xs.iter().zip(&targets) {
                scores_into(&weights, &bias, x, &mut probs);
                softmax_in_place(&mut probs);
                for c in 0..k {
                    let delta = probs[c] - if c == y { 1.0 } else { 0.0 };
                    bias[c] -= lr * delta;
                    for &(j, v) in x {
                        weights[c][j] -= lr * delta * v;
                    }
                }
            }
            // L2 decay once per epoch keeps updates sparse.
            if shrink < 1.0 {
                for w in weights.iter_mut().flatten() {
                    *w *= shrink;
                }
            }
        }

        Self {
            classes,
            weights,
            bias,
        }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class probabilities in `classes()` order.
    pub fn predict_proba(&self, x: &SparseVector) -> Vec<f64> {
        let mut probs = vec![0.0; self.classes.len()];
        scores_into(&self.weights, &self.bias, x, &mut probs);
        softmax_in_place(&mut probs);
        probs
    }

    /// Most probable class and its probability. Ties go to the earlier class.
    pub fn predict(&self, x: &SparseVector) -> Option<(&str, f64)> {
        let probs = self.predict_proba(x);
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in probs.iter().enumerate() {
            if best.is_none_or(|(_, bp)| p > bp) {
                best = Some((i, p));
            }
        }
        best.map(|(i, p)| (self.classes[i].as_str(), p))
    }
}

fn scores_into(weights: &[Vec<f64>], bias: &[f64], x: &SparseVector, out: &mut [f64]) {
    for (c, score) in out.iter_mut().enumerate() {
        *score = bias[c] + x.iter().map(|&(j, v)| weights[c][j] * v).sum::<f64>();
    }
}

fn softmax_in_place(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    if sum > 0.0 {
        for s in scores.iter_mut() {
            *s /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: TrainParams = TrainParams {
        epochs: 50,
        learning_rate: 0.5,
        l2: 1e-4,
    };

    fn separable() -> (Vec<SparseVector>, Vec<&'static str>) {
        let xs = vec![
            vec![(0, 1.0)],
            vec![(0, 0.8), (2, 0.6)],
            vec![(1, 1.0)],
            vec![(1, 0.8), (2, 0.6)],
        ];
        (xs, vec!["login", "login", "error", "error"])
    }

    #[test]
    fn classes_are_sorted() {
        let (xs, ys) = separable();
        let clf = SoftmaxClassifier::fit(&xs, &ys, 3, &PARAMS);
        assert_eq!(clf.classes(), ["error".to_string(), "login".to_string()]);
    }

    #[test]
    fn learns_separable_classes() {
        let (xs, ys) = separable();
        let clf = SoftmaxClassifier::fit(&xs, &ys, 3, &PARAMS);
        let (label, p) = clf.predict(&vec![(0, 1.0)]).unwrap();
        assert_eq!(label, "login");
        assert!(p > 0.5);
        let (label, _) = clf.predict(&vec![(1, 1.0)]).unwrap();
        assert_eq!(label, "error");
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (xs, ys) = separable();
        let clf = SoftmaxClassifier::fit(&xs, &ys, 3, &PARAMS);
        let probs = clf.predict_proba(&vec![(2, 1.0)]);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_class_is_certain() {
        let xs = vec![vec![(0, 1.0)], vec![(1, 1.0)]];
        let clf = SoftmaxClassifier::fit(&xs, &["*", "*"], 2, &PARAMS);
        let (label, p) = clf.predict(&vec![(0, 1.0)]).unwrap();
        assert_eq!(label, "*");
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fitting_is_reproducible() {
        let (xs, ys) = separable();
        let a = SoftmaxClassifier::fit(&xs, &ys, 3, &PARAMS);
        let b = SoftmaxClassifier::fit(&xs, &ys, 3, &PARAMS);
        let x = vec![(0, 0.5), (2, 0.5)];
        assert_eq!(a.predict_proba(&x), b.predict_proba(&x));
    }
}
