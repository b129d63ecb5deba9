use super::traits::{check_training_input, Classifier, FitParams, TrainedModel};
use crate::error::Result;
use crate::types::{Direction, FeatureMatrix};

/// Always predicts the same direction
#[derive(Debug, Clone)]
pub struct ConstantClassifier {
    prediction: Direction,
}

impl ConstantClassifier {
    pub fn new(prediction: Direction) -> Self {
        Self { prediction }
    }
}

impl Classifier for ConstantClassifier {
    fn name(&self) -> &str {
        "constant"
    }

    fn fit(&self, x: &FeatureMatrix, y: &[Direction], params: &FitParams) -> Result<Box<dyn TrainedModel>> {
        check_training_input(x, y, params)?;
        Ok(Box::new(ConstantModel {
            prediction: self.prediction,
        }))
    }
}

/// Predicts whichever class carries more weight in the training labels
#[derive(Debug, Clone, Copy, Default)]
pub struct MajorityClassifier;

impl Classifier for MajorityClassifier {
    fn name(&self) -> &str {
        "majority"
    }

    fn fit(&self, x: &FeatureMatrix, y: &[Direction], params: &FitParams) -> Result<Box<dyn TrainedModel>> {
        check_training_input(x, y, params)?;

        let up = y.iter().filter(|&&l| l == Direction::Up).count() as f64;
        let down = y.len() as f64 - up;
        // ties go to Down
        let prediction = if up * params.class_weight > down {
            Direction::Up
        } else {
            Direction::Down
        };

        Ok(Box::new(ConstantModel { prediction }))
    }
}

#[derive(Debug, Clone)]
struct ConstantModel {
    prediction: Direction,
}

impl TrainedModel for ConstantModel {
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<Direction>> {
        Ok(vec![self.prediction; x.nrows()])
    }
}
