//! Gradient-boosted decision trees for binary classification.
//!
//! Second-order boosting on the logistic loss:
//!   - every round fits one regression tree to the gradient/hessian
//!     of the current margins,
//!   - splits are found by exact greedy search over sorted feature values,
//!   - leaf weights are -G / (H + lambda), shrunk by the learning rate.
//!
//! A fitted ensemble is plain data (Serialize/Deserialize) so the artifact
//! module can write it out and read it back bit-for-bit.

use crate::{
    dataset::sigmoid,
    error::{FraudError, FraudResult},
    metrics::log_loss,
};
use serde::{Deserialize, Serialize};

/// Hessians below this are treated as this, so leaves never divide by ~0.
const MIN_HESSIAN: f64 = 1e-16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoosterParams {
    pub n_estimators:     usize,
    pub max_depth:        usize,
    pub learning_rate:    f64,
    /// L2 regularisation on leaf weights.
    pub reg_lambda:       f64,
    /// Minimum loss reduction required to make a split.
    pub gamma:            f64,
    /// Minimum hessian sum on each side of a split.
    pub min_child_weight: f64,
    /// Initial probability for every row before the first tree.
    pub base_score:       f64,
}

impl Default for BoosterParams {
    fn default() -> Self {
        Self {
            n_estimators:     100,
            max_depth:        4,
            learning_rate:    0.3,
            reg_lambda:       1.0,
            gamma:            0.0,
            min_child_weight: 1.0,
            base_score:       0.5,
        }
    }
}

impl BoosterParams {
    pub fn validate(&self) -> FraudResult<()> {
        let problem = if self.n_estimators == 0 {
            Some("n_estimators must be at least 1")
        } else if !(self.learning_rate > 0.0) {
            Some("learning_rate must be positive")
        } else if self.reg_lambda < 0.0 || self.gamma < 0.0 || self.min_child_weight < 0.0 {
            Some("reg_lambda, gamma and min_child_weight must be non-negative")
        } else if !(self.base_score > 0.0 && self.base_score < 1.0) {
            Some("base_score must lie strictly between 0 and 1")
        } else {
            None
        };
        match problem {
            Some(msg) => Err(FraudError::Config { message: msg.to_string() }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Rows with `row[feature] < threshold` go left.
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
    },
    Leaf {
        weight: f64,
    },
}

/// One regression tree stored as a node arena; the root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut at = 0;
        loop {
            match &self.nodes[at] {
                Node::Leaf { weight } => return *weight,
                Node::Split { feature, threshold, left, right } => {
                    at = if row[*feature] < *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], at: usize) -> usize {
            match &nodes[at] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Per-round diagnostics collected while fitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub train_logloss: Vec<f64>,
    /// Empty when no evaluation set was supplied.
    pub eval_logloss:  Vec<f64>,
    /// Total split gain attributed to each feature.
    pub feature_gain:  Vec<f64>,
}

/// A fitted gradient-boosted ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    params:      BoosterParams,
    n_features:  usize,
    base_margin: f64,
    trees:       Vec<Tree>,
}

impl GradientBoostedTrees {
    /// Fit an ensemble on rows `x` with boolean labels `y`.
    ///
    /// When `eval` is given, its log-loss is recorded after every round.
    pub fn fit<R: AsRef<[f64]>>(
        params: &BoosterParams,
        x: &[R],
        y: &[bool],
        eval: Option<(&[R], &[bool])>,
    ) -> FraudResult<(Self, TrainingHistory)> {
        params.validate()?;
        if x.is_empty() {
            return Err(FraudError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(FraudError::ShapeMismatch { rows: x.len(), labels: y.len() });
        }
        let n_features = x[0].as_ref().len();
        check_widths(x, n_features)?;
        if let Some((ex, ey)) = eval {
            if ex.len() != ey.len() {
                return Err(FraudError::ShapeMismatch { rows: ex.len(), labels: ey.len() });
            }
            check_widths(ex, n_features)?;
        }

        let base_margin = logit(params.base_score);
        let mut model = Self {
            params: params.clone(),
            n_features,
            base_margin,
            trees: Vec::with_capacity(params.n_estimators),
        };
        let mut history = TrainingHistory {
            feature_gain: vec![0.0; n_features],
            ..Default::default()
        };

        let rows: Vec<&[f64]> = x.iter().map(|r| r.as_ref()).collect();
        let mut margins = vec![base_margin; rows.len()];
        let mut eval_margins: Option<Vec<f64>> = eval.map(|(ex, _)| vec![base_margin; ex.len()]);

        let mut grad = vec![0.0; rows.len()];
        let mut hess = vec![0.0; rows.len()];

        for round in 0..params.n_estimators {
            for i in 0..rows.len() {
                let p = sigmoid(margins[i]);
                let target = if y[i] { 1.0 } else { 0.0 };
                grad[i] = p - target;
                hess[i] = (p * (1.0 - p)).max(MIN_HESSIAN);
            }

            let mut builder = TreeBuilder {
                params,
                rows: &rows,
                grad: &grad,
                hess: &hess,
                nodes: Vec::new(),
                feature_gain: &mut history.feature_gain,
            };
            let all: Vec<usize> = (0..rows.len()).collect();
            builder.build(&all, 0);
            let tree = Tree { nodes: builder.nodes };

            for (m, row) in margins.iter_mut().zip(&rows) {
                *m += tree.predict(row);
            }
            let train_loss = log_loss(y, &margins.iter().map(|&m| sigmoid(m)).collect::<Vec<_>>());
            history.train_logloss.push(train_loss);

            if let (Some((ex, ey)), Some(em)) = (eval, eval_margins.as_mut()) {
                for (m, row) in em.iter_mut().zip(ex) {
                    *m += tree.predict(row.as_ref());
                }
                let eval_loss = log_loss(ey, &em.iter().map(|&m| sigmoid(m)).collect::<Vec<_>>());
                history.eval_logloss.push(eval_loss);
                log::debug!("[{round}] train-logloss:{train_loss:.5} eval-logloss:{eval_loss:.5}");
            } else {
                log::debug!("[{round}] train-logloss:{train_loss:.5}");
            }

            model.trees.push(tree);
        }

        Ok((model, history))
    }

    /// Raw log-odds for one row.
    pub fn predict_margin(&self, row: &[f64]) -> FraudResult<f64> {
        if row.len() != self.n_features {
            return Err(FraudError::FeatureCount {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        Ok(self.base_margin + self.trees.iter().map(|t| t.predict(row)).sum::<f64>())
    }

    /// Probability of the positive (fraud) class for one row.
    pub fn predict_proba(&self, row: &[f64]) -> FraudResult<f64> {
        self.predict_margin(row).map(sigmoid)
    }

    /// Positive-class probabilities for many rows.
    pub fn predict_proba_batch<R: AsRef<[f64]>>(&self, rows: &[R]) -> FraudResult<Vec<f64>> {
        rows.iter().map(|r| self.predict_proba(r.as_ref())).collect()
    }

    /// Check that every tree can be walked safely on a row of
    /// `n_features` values.
    ///
    /// Children must sit after their parent in the arena, so a valid
    /// tree has no cycles and every walk ends at a leaf.
    pub fn validate(&self) -> FraudResult<()> {
        for (t, tree) in self.trees.iter().enumerate() {
            let malformed = |reason: String| FraudError::MalformedModel {
                reason: format!("tree {t}: {reason}"),
            };
            if tree.nodes.is_empty() {
                return Err(malformed("no nodes".to_string()));
            }
            for (at, node) in tree.nodes.iter().enumerate() {
                let Node::Split { feature, left, right, .. } = *node else {
                    continue;
                };
                if feature >= self.n_features {
                    return Err(malformed(format!(
                        "node {at} splits on feature {feature} of {}",
                        self.n_features
                    )));
                }
                for child in [left, right] {
                    if child <= at || child >= tree.nodes.len() {
                        return Err(malformed(format!(
                            "node {at} points at child {child} of {}",
                            tree.nodes.len()
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }
}

fn check_widths<R: AsRef<[f64]>>(x: &[R], n_features: usize) -> FraudResult<()> {
    match x.iter().find(|r| r.as_ref().len() != n_features) {
        Some(bad) => Err(FraudError::FeatureCount {
            expected: n_features,
            actual: bad.as_ref().len(),
        }),
        None => Ok(()),
    }
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

struct SplitCandidate {
    feature:   usize,
    threshold: f64,
    gain:      f64,
}

struct TreeBuilder<'a> {
    params:       &'a BoosterParams,
    rows:         &'a [&'a [f64]],
    grad:         &'a [f64],
    hess:         &'a [f64],
    nodes:        Vec<Node>,
    feature_gain: &'a mut Vec<f64>,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `idx` and return its node index.
    fn build(&mut self, idx: &[usize], depth: usize) -> usize {
        let g: f64 = idx.iter().map(|&i| self.grad[i]).sum();
        let h: f64 = idx.iter().map(|&i| self.hess[i]).sum();

        let split = if depth < self.params.max_depth {
            self.best_split(idx, g, h)
        } else {
            None
        };

        let Some(split) = split else {
            let weight = -g / (h + self.params.reg_lambda) * self.params.learning_rate;
            self.nodes.push(Node::Leaf { weight });
            return self.nodes.len() - 1;
        };

        self.feature_gain[split.feature] += split.gain;

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = idx
            .iter()
            .copied()
            .partition(|&i| self.rows[i][split.feature] < split.threshold);

        // Reserve the slot so the parent precedes its children.
        let at = self.nodes.len();
        self.nodes.push(Node::Leaf { weight: 0.0 });
        let left = self.build(&left_idx, depth + 1);
        let right = self.build(&right_idx, depth + 1);
        self.nodes[at] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        at
    }

    fn best_split(&self, idx: &[usize], g: f64, h: f64) -> Option<SplitCandidate> {
        let lambda = self.params.reg_lambda;
        let mcw = self.params.min_child_weight;
        let parent_score = g * g / (h + lambda);
        let n_features = self.rows.first().map_or(0, |r| r.len());

        let mut best: Option<SplitCandidate> = None;
        let mut sorted = idx.to_vec();

        for feature in 0..n_features {
            sorted.sort_by(|&a, &b| self.rows[a][feature].total_cmp(&self.rows[b][feature]));

            let mut gl = 0.0;
            let mut hl = 0.0;
            for k in 0..sorted.len().saturating_sub(1) {
                let i = sorted[k];
                gl += self.grad[i];
                hl += self.hess[i];

                let here = self.rows[i][feature];
                let next = self.rows[sorted[k + 1]][feature];
                if here == next {
                    continue;
                }
                let gr = g - gl;
                let hr = h - hl;
                if hl < mcw || hr < mcw {
                    continue;
                }

                let gain = 0.5 * (gl * gl / (hl + lambda) + gr * gr / (hr + lambda) - parent_score)
                    - self.params.gamma;
                if gain > 0.0 && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: midpoint(here, next),
                        gain,
                    });
                }
            }
        }

        best
    }
}

/// A threshold strictly above `lo` and at most `hi`.
fn midpoint(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid > lo { mid } else { hi }
}
