use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::{PredictError, Result};
use crate::features::{FeatureTable, LABEL_COLUMN};

// 40% train, 60% test.
pub const TEST_FRACTION: f64 = 0.6;
pub const SPLIT_SEED: u64 = 42;
pub const WIN_THRESHOLD: f64 = 0.5;

pub const MAX_ITER: usize = 10_000;
pub const TOLERANCE: f64 = 1e-4;
// Inverse L2 strength, as in the usual `C` parameterisation.
pub const INVERSE_REGULARIZATION: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Split {
    pub train_x: Vec<Vec<f64>>,
    pub train_y: Vec<u8>,
    pub test_x: Vec<Vec<f64>>,
    pub test_y: Vec<u8>,
}

/// Seeded shuffle; the first `ceil(test_fraction * n)` shuffled rows are test.
pub fn train_test_split(x: &[Vec<f64>], y: &[u8], test_fraction: f64, seed: u64) -> Split {
    let n = x.len().min(y.len());
    let n_test = ((n as f64) * test_fraction - 1e-9).ceil().max(0.0) as usize;
    let n_test = n_test.min(n);

    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    let (test_idx, train_idx) = order.split_at(n_test);

    Split {
        train_x: train_idx.iter().map(|&i| x[i].clone()).collect(),
        train_y: train_idx.iter().map(|&i| y[i]).collect(),
        test_x: test_idx.iter().map(|&i| x[i].clone()).collect(),
        test_y: test_idx.iter().map(|&i| y[i]).collect(),
    }
}

/// Replaces NaN with the column mean seen at fit time.
#[derive(Debug, Clone)]
pub struct MeanImputer {
    means: Vec<f64>,
}

impl MeanImputer {
    pub fn fit(rows: &[Vec<f64>], width: usize) -> Self {
        let mut sums = vec![0.0; width];
        let mut counts = vec![0usize; width];
        for row in rows {
            for (j, v) in row.iter().enumerate().take(width) {
                if !v.is_nan() {
                    sums[j] += v;
                    counts[j] += 1;
                }
            }
        }
        // A column never observed in training imputes to 0.
        let means = sums
            .iter()
            .zip(&counts)
            .map(|(s, &c)| if c > 0 { s / c as f64 } else { 0.0 })
            .collect();
        Self { means }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.means)
            .map(|(&v, &m)| if v.is_nan() { m } else { v })
            .collect()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }
}

#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(rows: &[Vec<f64>], width: usize) -> Self {
        let n = rows.len().max(1) as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut var = vec![0.0; width];
        for row in rows {
            for ((acc, v), m) in var.iter_mut().zip(row).zip(&means) {
                let d = v - m;
                *acc += d * d;
            }
        }
        // Constant columns keep unit scale.
        let scales = var
            .iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > 1e-12 { std } else { 1.0 }
            })
            .collect();
        Self { means, scales }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}

/// L2-regularised binary logistic regression fitted by full-batch gradient
/// descent on the mean log-loss.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub iterations: usize,
    pub converged: bool,
}

impl LogisticRegression {
    pub fn fit(x: &[Vec<f64>], y: &[u8], c: f64, max_iter: usize, tol: f64) -> Self {
        let width = x.first().map_or(0, Vec::len);
        let mut model = Self {
            weights: vec![0.0; width],
            intercept: 0.0,
            iterations: 0,
            converged: false,
        };
        if x.is_empty() {
            return model;
        }

        let n = x.len() as f64;
        let penalty = 1.0 / (c * n);
        // Step 1/L with L bounded by the trace of the Hessian at its worst.
        let trace = x
            .iter()
            .map(|row| row.iter().map(|v| v * v).sum::<f64>() + 1.0)
            .sum::<f64>()
            / n;
        let step = 1.0 / (0.25 * trace + penalty);

        let mut grad_w = vec![0.0; width];
        for iter in 0..max_iter {
            grad_w.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_b = 0.0;
            for (row, &label) in x.iter().zip(y) {
                let err = sigmoid(model.decision(row)) - f64::from(label);
                for (g, v) in grad_w.iter_mut().zip(row) {
                    *g += err * v;
                }
                grad_b += err;
            }
            grad_b /= n;

            let mut max_grad = grad_b.abs();
            for (g, w) in grad_w.iter_mut().zip(&model.weights) {
                *g = *g / n + penalty * w;
                max_grad = max_grad.max(g.abs());
            }

            model.iterations = iter + 1;
            if max_grad < tol {
                model.converged = true;
                break;
            }
            for (w, g) in model.weights.iter_mut().zip(&grad_w) {
                *w -= step * g;
            }
            model.intercept -= step * grad_b;
        }
        model
    }

    pub fn decision(&self, row: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.intercept
    }

    /// Probability of class 1.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        sigmoid(self.decision(row))
    }

    pub fn predict(&self, row: &[f64]) -> u8 {
        u8::from(self.decision(row) > 0.0)
    }
}

/// Classifier plus the preprocessing fitted alongside it. Lives for one
/// prediction call.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub feature_names: Vec<String>,
    pub imputer: MeanImputer,
    pub scaler: StandardScaler,
    pub classifier: LogisticRegression,
    pub accuracy: f64,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl TrainedModel {
    pub fn prepare(&self, row: &[f64]) -> Vec<f64> {
        self.scaler.transform(&self.imputer.transform(row))
    }
}

/// Drops the label column and binarises it (missing labels count as losses).
pub fn split_label(table: &FeatureTable) -> Result<(Vec<String>, Vec<Vec<f64>>, Vec<u8>)> {
    let label_idx = table
        .column_index(LABEL_COLUMN)
        .ok_or_else(|| PredictError::Training(format!("missing {LABEL_COLUMN:?} column")))?;

    let names = table
        .columns
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != label_idx)
        .map(|(_, c)| c.clone())
        .collect();
    let mut x = Vec::with_capacity(table.rows.len());
    let mut y = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        y.push(u8::from(row[label_idx] >= WIN_THRESHOLD));
        x.push(
            row.iter()
                .enumerate()
                .filter(|(j, _)| *j != label_idx)
                .map(|(_, v)| *v)
                .collect(),
        );
    }
    Ok((names, x, y))
}

pub fn fit_model(table: &FeatureTable) -> Result<TrainedModel> {
    let (feature_names, x, y) = split_label(table)?;
    let split = train_test_split(&x, &y, TEST_FRACTION, SPLIT_SEED);
    if split.train_y.len() < 2 {
        return Err(PredictError::Training(format!(
            "{} rows leave too few for training",
            x.len()
        )));
    }
    let wins = split.train_y.iter().filter(|&&l| l == 1).count();
    if wins == 0 || wins == split.train_y.len() {
        return Err(PredictError::Training(
            "training rows hold a single outcome class".to_string(),
        ));
    }

    let width = feature_names.len();
    let imputer = MeanImputer::fit(&split.train_x, width);
    let train_imputed: Vec<Vec<f64>> = split.train_x.iter().map(|r| imputer.transform(r)).collect();
    let scaler = StandardScaler::fit(&train_imputed, width);
    let train_scaled: Vec<Vec<f64>> = train_imputed.iter().map(|r| scaler.transform(r)).collect();

    let classifier = LogisticRegression::fit(
        &train_scaled,
        &split.train_y,
        INVERSE_REGULARIZATION,
        MAX_ITER,
        TOLERANCE,
    );
    debug!(
        iterations = classifier.iterations,
        converged = classifier.converged,
        features = width,
        "fitted logistic model"
    );

    let mut model = TrainedModel {
        feature_names,
        imputer,
        scaler,
        classifier,
        accuracy: 0.0,
        train_rows: split.train_y.len(),
        test_rows: split.test_y.len(),
    };
    let predicted: Vec<u8> = split
        .test_x
        .iter()
        .map(|r| model.classifier.predict(&model.prepare(r)))
        .collect();
    model.accuracy = accuracy_score(&split.test_y, &predicted);
    Ok(model)
}

pub fn accuracy_score(truth: &[u8], predicted: &[u8]) -> f64 {
    if truth.is_empty() || truth.len() != predicted.len() {
        return 0.0;
    }
    let correct = truth.iter().zip(predicted).filter(|(a, b)| a == b).count();
    correct as f64 / truth.len() as f64
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
