//! Next-day direction classifier.
//!
//! Features per bar: RSI(14), MACD line, volume. Label: 1 when the next
//! bar's price is strictly higher, else 0. The last bar has no label and is
//! dropped. Rows are split at random (fixed seed) into 80% train / 20% test,
//! a logistic regression is fit on standardized training features and the
//! held-out accuracy is reported in percent.
//!
//! Any degenerate input (short series, empty split, single-class training
//! labels, numerical failure) scores 0.0 instead of erroring.

use crate::domain::indicator_frame::IndicatorFrame;
use crate::domain::ohlcv::OhlcvBar;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

pub const MIN_SCORER_ROWS: usize = 20;
pub const TEST_FRACTION: f64 = 0.2;
pub const SPLIT_SEED: u64 = 42;
pub const FEATURE_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model has not been fitted yet")]
    NotFitted,

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training labels contain a single class")]
    SingleClass,

    #[error("training diverged")]
    Diverged,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub labels: Array1<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), indices),
            labels: self.labels.select(Axis(0), indices),
        }
    }
}

/// Builds the labeled feature table. Rows with an undefined feature are dropped.
pub fn build_dataset(frame: &IndicatorFrame) -> Dataset {
    let mut flat = Vec::new();
    let mut labels = Vec::new();

    for pair in frame.rows.windows(2) {
        let (row, next) = (&pair[0], &pair[1]);
        let (Some(rsi), Some(macd)) = (row.rsi, row.macd) else {
            continue;
        };
        if !row.price.is_finite() || !next.price.is_finite() {
            continue;
        }
        flat.extend_from_slice(&[rsi, macd.line, row.volume as f64]);
        labels.push(if next.price > row.price { 1.0 } else { 0.0 });
    }

    let n = labels.len();
    let features = Array2::from_shape_vec((n, FEATURE_COUNT), flat)
        .unwrap_or_else(|_| Array2::zeros((0, FEATURE_COUNT)));
    Dataset {
        features,
        labels: Array1::from(labels),
    }
}

/// Shuffles row indices with a seeded RNG and splits off the test fraction.
///
/// The test share is rounded up, so any dataset of two or more rows gets at
/// least one test row.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> (Dataset, Dataset) {
    let n = dataset.len();
    let n_test = ((n as f64) * test_fraction).ceil() as usize;
    let n_test = n_test.min(n);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    (dataset.select(train_idx), dataset.select(test_idx))
}

/// Per-column z-score scaling fitted on training rows.
#[derive(Debug, Clone)]
pub struct Standardizer {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Standardizer {
    pub fn fit(x: &Array2<f64>) -> Result<Self, ModelError> {
        let mean = x.mean_axis(Axis(0)).ok_or(ModelError::EmptyTrainingSet)?;
        let std = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });
        Ok(Self { mean, std })
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.std
    }
}

/// Binary logistic regression trained by batch gradient descent with an L2
/// penalty equivalent to inverse regularization strength `c`.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    pub coefficients: Option<Array1<f64>>,
    pub intercept: Option<f64>,
    learning_rate: f64,
    max_iter: usize,
    tolerance: f64,
    c: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.1, 1000, 1e-6, 1.0)
    }
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, max_iter: usize, tolerance: f64, c: f64) -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate,
            max_iter,
            tolerance,
            c,
        }
    }

    fn sigmoid(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let exp_z = z.exp();
            exp_z / (1.0 + exp_z)
        }
    }

    fn log_loss(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
        let eps = 1e-15;
        let n = y_true.len() as f64;
        -y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p = p.clamp(eps, 1.0 - eps);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>()
            / n
    }

    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<(), ModelError> {
        if x.nrows() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                got: y.len(),
            });
        }
        let positives = y.iter().filter(|&&v| v > 0.5).count();
        if positives == 0 || positives == y.len() {
            return Err(ModelError::SingleClass);
        }

        let n = x.nrows() as f64;
        let alpha = 1.0 / (self.c * n);
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;
        let mut prev_cost = f64::INFINITY;

        for iter in 0..self.max_iter {
            let predictions = (x.dot(&weights) + bias).mapv(Self::sigmoid);
            let errors = &predictions - y;
            let dw = x.t().dot(&errors) / n + &weights * alpha;
            let db = errors.sum() / n;

            weights = &weights - &(dw * self.learning_rate);
            bias -= self.learning_rate * db;

            let cost = Self::log_loss(y, &predictions);
            if !cost.is_finite() {
                return Err(ModelError::Diverged);
            }
            if (prev_cost - cost).abs() < self.tolerance {
                log::debug!("logistic regression converged at iteration {}", iter);
                break;
            }
            prev_cost = cost;
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        Ok(())
    }

    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.coefficients.as_ref().ok_or(ModelError::NotFitted)?;
        let bias = self.intercept.ok_or(ModelError::NotFitted)?;
        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                got: x.ncols(),
            });
        }
        Ok((x.dot(weights) + bias).mapv(Self::sigmoid))
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 }))
    }
}

/// Share of matching labels, in percent. Empty input scores 0.0.
pub fn accuracy_pct(predicted: &Array1<f64>, actual: &Array1<f64>) -> f64 {
    if actual.is_empty() || predicted.len() != actual.len() {
        return 0.0;
    }
    let hits = predicted
        .iter()
        .zip(actual.iter())
        .filter(|(p, a)| p == a)
        .count();
    hits as f64 / actual.len() as f64 * 100.0
}

fn fit_and_evaluate(train: &Dataset, test: &Dataset) -> Result<f64, ModelError> {
    let scaler = Standardizer::fit(&train.features)?;
    let mut model = LogisticRegression::default();
    model.fit(&scaler.transform(&train.features), &train.labels)?;
    let predicted = model.predict(&scaler.transform(&test.features))?;
    Ok(accuracy_pct(&predicted, &test.labels))
}

pub fn score_frame(frame: &IndicatorFrame) -> f64 {
    if frame.len() < MIN_SCORER_ROWS {
        return 0.0;
    }

    let dataset = build_dataset(frame);
    if dataset.len() < 2 {
        log::warn!("{}: too few labeled rows for scoring ({})", frame.code, dataset.len());
        return 0.0;
    }

    let (train, test) = train_test_split(&dataset, TEST_FRACTION, SPLIT_SEED);
    if train.is_empty() || test.is_empty() {
        return 0.0;
    }

    match fit_and_evaluate(&train, &test) {
        Ok(accuracy) => accuracy.clamp(0.0, 100.0),
        Err(e) => {
            log::warn!("{}: model training failed ({})", frame.code, e);
            0.0
        }
    }
}

/// Computes indicators for a raw series and scores next-day direction accuracy.
pub fn train_and_score(code: &str, bars: &[OhlcvBar]) -> f64 {
    if bars.len() < MIN_SCORER_ROWS {
        return 0.0;
    }
    score_frame(&IndicatorFrame::from_bars(code, bars))
}
