use super::traits::{check_training_input, Classifier, FitParams, TrainedModel};
use crate::error::{Result, TrendcastError};
use crate::types::{Direction, FeatureMatrix};
use ndarray::Array1;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Class-weighted logistic regression trained by plain SGD with an L2 penalty.
///
/// Sample order per epoch is shuffled from `FitParams::seed`, so two fits with
/// the same inputs and seed produce identical coefficients.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    learning_rate: f64,
    epochs: usize,
    l2: f64,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, epochs: usize, l2: f64) -> Self {
        Self {
            learning_rate,
            epochs,
            l2,
        }
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.05, 200, 1e-3)
    }
}

impl Classifier for LogisticRegression {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn fit(&self, x: &FeatureMatrix, y: &[Direction], params: &FitParams) -> Result<Box<dyn TrainedModel>> {
        check_training_input(x, y, params)?;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut weights = Array1::<f64>::zeros(x.ncols());
        let mut bias = 0.0;
        let mut order: Vec<usize> = (0..x.nrows()).collect();

        for _ in 0..self.epochs {
            order.shuffle(&mut rng);
            for &i in &order {
                let row = x.row(i);
                let target = y[i].as_f64();
                let sample_weight = match y[i] {
                    Direction::Up => params.class_weight,
                    Direction::Down => 1.0,
                };

                let p = sigmoid(row.dot(&weights) + bias);
                let grad = sample_weight * (p - target);

                // w <- w - lr * (grad * x + l2 * w)
                weights *= 1.0 - self.learning_rate * self.l2;
                weights.scaled_add(-self.learning_rate * grad, &row);
                bias -= self.learning_rate * grad;
            }
        }

        if weights.iter().any(|w| !w.is_finite()) || !bias.is_finite() {
            return Err(TrendcastError::Model(
                "Logistic regression diverged; lower the learning rate".to_string(),
            ));
        }

        log::debug!(
            "Logistic regression fitted on {} samples (class weight {:.4}, seed {})",
            x.nrows(),
            params.class_weight,
            params.seed
        );
        Ok(Box::new(LogisticModel { weights, bias }))
    }
}

#[derive(Debug, Clone)]
struct LogisticModel {
    weights: Array1<f64>,
    bias: f64,
}

impl TrainedModel for LogisticModel {
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Direction>> {
        Ok(self
            .predict_proba(x)?
            .into_iter()
            .map(|p| if p >= 0.5 { Direction::Up } else { Direction::Down })
            .collect())
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<f64>> {
        if x.ncols() != self.weights.len() {
            return Err(TrendcastError::Model(format!(
                "Model expects {} features, got {}",
                self.weights.len(),
                x.ncols()
            )));
        }
        Ok(x.dot(&self.weights)
            .mapv(|z| sigmoid(z + self.bias))
            .to_vec())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use Direction::{Down, Up};

    fn separable() -> (FeatureMatrix, Vec<Direction>) {
        let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
        (x, vec![Down, Down, Down, Up, Up, Up])
    }

    #[test]
    fn test_learns_separable_data() {
        let (x, y) = separable();
        let model = LogisticRegression::default()
            .fit(&x, &y, &FitParams::default())
            .unwrap();
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_same_seed_same_model() {
        let (x, y) = separable();
        let params = FitParams {
            class_weight: 1.0,
            seed: 11,
        };
        let clf = LogisticRegression::new(0.1, 5, 0.0);
        let a = clf.fit(&x, &y, &params).unwrap().predict_proba(&x).unwrap();
        let b = clf.fit(&x, &y, &params).unwrap().predict_proba(&x).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let (x, y) = separable();
        let model = LogisticRegression::default()
            .fit(&x, &y, &FitParams::default())
            .unwrap();
        assert!(model.predict(&FeatureMatrix::zeros((1, 3))).is_err());
    }
}
