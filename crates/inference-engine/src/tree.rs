//! Gradient-Boosted Tree Ensemble
//!
//! Binary boosted trees in the LightGBM style: the raw score is the base score plus
//! one leaf value per tree, mapped to a probability with the logistic sigmoid. Missing
//! (`NaN`) features follow each split's default direction.

use crate::classifier::{check_dimension, check_threshold, default_threshold, sigmoid, Classifier, Label};
use crate::InferenceError;
use feature_engine::FeatureVector;
use serde::{Deserialize, Serialize};

/// One node of a decision tree; the root is node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        value: f64,
    },
}

/// A single decision tree stored as a flat node array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// Children must come after their parent, so every walk reaches a leaf
    fn validate(&self, num_features: usize) -> Result<(), InferenceError> {
        if self.nodes.is_empty() {
            return Err(InferenceError::InvalidArtifact("tree has no nodes".into()));
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= num_features {
                        return Err(InferenceError::InvalidArtifact(format!(
                            "node {} splits on feature {} of {}",
                            index, feature, num_features
                        )));
                    }
                    if threshold.is_nan() {
                        return Err(InferenceError::InvalidArtifact(format!(
                            "node {} has a NaN threshold",
                            index
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(InferenceError::InvalidArtifact(format!(
                                "node {} points to invalid child {}",
                                index, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(InferenceError::InvalidArtifact(format!(
                            "leaf {} has non-finite value",
                            index
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[*feature];
                    let go_left = if x.is_nan() { *default_left } else { x <= *threshold };
                    index = if go_left { *left } else { *right };
                }
            }
        }
    }
}

/// Fitted boosted-tree binary classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleClassifier {
    num_features: usize,
    #[serde(default)]
    base_score: f64,
    trees: Vec<DecisionTree>,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

impl TreeEnsembleClassifier {
    pub fn new(
        num_features: usize,
        base_score: f64,
        trees: Vec<DecisionTree>,
        threshold: f64,
    ) -> Result<Self, InferenceError> {
        let classifier = Self {
            num_features,
            base_score,
            trees,
            threshold,
        };
        classifier.validate()?;
        Ok(classifier)
    }

    pub(crate) fn validate(&self) -> Result<(), InferenceError> {
        if self.trees.is_empty() {
            return Err(InferenceError::InvalidArtifact("tree ensemble has no trees".into()));
        }
        if !self.base_score.is_finite() {
            return Err(InferenceError::InvalidArtifact("non-finite base score".into()));
        }
        for tree in &self.trees {
            tree.validate(self.num_features)?;
        }
        check_threshold(self.threshold)
    }

    /// Raw additive score before the sigmoid
    pub fn raw_score(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        check_dimension(self.num_features, features)?;
        let values = features.values();
        Ok(self.base_score + self.trees.iter().map(|t| t.leaf_value(values)).sum::<f64>())
    }
}

impl Classifier for TreeEnsembleClassifier {
    fn dimension(&self) -> usize {
        self.num_features
    }

    fn predict(&self, features: &FeatureVector) -> Result<Label, InferenceError> {
        let probability = self.predict_probability(features)?;
        Ok(if probability > self.threshold {
            Label::Exoplanet
        } else {
            Label::NonExoplanet
        })
    }

    fn predict_probability(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        Ok(sigmoid(self.raw_score(features)?))
    }
}
