//! Decision Tree Classifier - CART with Gini impurity
//!
//! Arena-stored nodes (`Vec<Node>`, children by index) so the fitted tree
//! serializes directly into the pipeline artifact.
//!
//! Split search is exhaustive and deterministic: features are scanned in
//! ascending order, candidate thresholds are midpoints between consecutive
//! distinct values, and the first best split wins. Samples with
//! `x[feature] <= threshold` go left.

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

// ============================================================================
// CONFIG
// ============================================================================

/// Tree growth limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

// ============================================================================
// NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        impurity: f64,
        n_samples: usize,
    },
    Leaf {
        /// Class probability distribution (sums to 1)
        distribution: Vec<f64>,
        impurity: f64,
        n_samples: usize,
    },
}

impl Node {
    pub fn n_samples(&self) -> usize {
        match self {
            Node::Split { n_samples, .. } | Node::Leaf { n_samples, .. } => *n_samples,
        }
    }

    pub fn impurity(&self) -> f64 {
        match self {
            Node::Split { impurity, .. } | Node::Leaf { impurity, .. } => *impurity,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

// ============================================================================
// DECISION TREE
// ============================================================================

/// Fitted classifier over the transformed feature space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    classes: Vec<String>,
    n_features: usize,
}

impl DecisionTree {
    /// Fit on a transformed matrix and string labels (one per row)
    pub fn fit(x: ArrayView2<f64>, labels: &[String], config: &TreeConfig) -> CoreResult<Self> {
        let n_samples = x.nrows();
        if n_samples == 0 {
            return Err(CoreError::EmptyTrainingSet);
        }
        if labels.len() != n_samples {
            return Err(CoreError::FeatureCountMismatch {
                expected: n_samples,
                got: labels.len(),
            });
        }

        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let y: Vec<usize> = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or(0))
            .collect();

        let mut builder = TreeBuilder {
            x,
            y: &y,
            n_classes: classes.len(),
            config,
            nodes: Vec::new(),
        };
        let samples: Vec<usize> = (0..n_samples).collect();
        builder.grow(&samples, 0);

        let nodes = builder.nodes;
        log::debug!(
            "Decision tree fitted: {} samples, {} features, {} classes, {} nodes",
            n_samples,
            x.ncols(),
            classes.len(),
            nodes.len()
        );

        Ok(Self {
            nodes,
            classes,
            n_features: x.ncols(),
        })
    }

    /// Assemble a tree from prebuilt nodes (root at index 0)
    pub fn from_nodes(nodes: Vec<Node>, classes: Vec<String>, n_features: usize) -> Self {
        Self {
            nodes,
            classes,
            n_features,
        }
    }

    /// Structural check for trees that did not come out of `fit`
    ///
    /// Children must point forward inside the arena, split features must be
    /// inside the transformed width and every leaf carries one probability per
    /// class. Traversal code indexes nodes directly once this passes.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| Err(CoreError::InvalidTree { reason });

        if self.nodes.is_empty() {
            return invalid("tree has no nodes".to_string());
        }
        if self.classes.is_empty() {
            return invalid("tree has no classes".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= self.n_features {
                        return invalid(format!(
                            "node {index} splits on feature {feature}, tree has {} features",
                            self.n_features
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return invalid(format!(
                                "node {index} points to child {child} ({} nodes)",
                                self.nodes.len()
                            ));
                        }
                    }
                }
                Node::Leaf { distribution, .. } => {
                    if distribution.len() != self.classes.len() {
                        return invalid(format!(
                            "leaf {index} has {} probabilities, tree has {} classes",
                            distribution.len(),
                            self.classes.len()
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Known labels, sorted
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Index of the leaf a row lands in
    pub fn leaf_index(&self, row: ArrayView1<f64>) -> usize {
        let mut index = 0;
        while let Some(Node::Split {
            feature,
            threshold,
            left,
            right,
            ..
        }) = self.nodes.get(index)
        {
            index = if row[*feature] <= *threshold { *left } else { *right };
        }
        index
    }

    /// Node indices visited by a row, root first
    pub fn decision_path(&self, row: ArrayView1<f64>) -> Vec<usize> {
        let mut path = vec![0];
        let mut index = 0;
        while let Some(Node::Split {
            feature,
            threshold,
            left,
            right,
            ..
        }) = self.nodes.get(index)
        {
            index = if row[*feature] <= *threshold { *left } else { *right };
            path.push(index);
        }
        path
    }

    fn check_width(&self, x: &ArrayView2<f64>) -> CoreResult<()> {
        if x.ncols() != self.n_features {
            return Err(CoreError::FeatureCountMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        Ok(())
    }

    /// Class probabilities, one row per input row
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> CoreResult<Array2<f64>> {
        self.check_width(&x)?;
        let mut out = Array2::zeros((x.nrows(), self.classes.len()));
        for (i, row) in x.rows().into_iter().enumerate() {
            if let Some(Node::Leaf { distribution, .. }) = self.nodes.get(self.leaf_index(row)) {
                for (c, &p) in distribution.iter().enumerate() {
                    out[[i, c]] = p;
                }
            }
        }
        Ok(out)
    }

    /// Predicted labels (argmax of the leaf distribution, lowest class on ties)
    pub fn predict(&self, x: ArrayView2<f64>) -> CoreResult<Vec<String>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (c, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = c;
                    }
                }
                self.classes.get(best).cloned().unwrap_or_default()
            })
            .collect())
    }

    /// Mean decrease in impurity per transformed feature, normalized to sum to 1
    ///
    /// A tree that never split returns all zeros.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut importances = vec![0.0; self.n_features];

        for node in &self.nodes {
            if let Node::Split {
                feature,
                left,
                right,
                impurity,
                n_samples,
                ..
            } = node
            {
                let (l, r) = (&self.nodes[*left], &self.nodes[*right]);
                importances[*feature] += *n_samples as f64 * impurity
                    - l.n_samples() as f64 * l.impurity()
                    - r.n_samples() as f64 * r.impurity();
            }
        }

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|v| *v /= total);
        }
        importances
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match &nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

struct TreeBuilder<'x, 'a> {
    x: ArrayView2<'x, f64>,
    y: &'a [usize],
    n_classes: usize,
    config: &'a TreeConfig,
    nodes: Vec<Node>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

impl TreeBuilder<'_, '_> {
    fn grow(&mut self, samples: &[usize], depth: usize) -> usize {
        let n = samples.len();
        let mut counts = vec![0usize; self.n_classes];
        for &s in samples {
            counts[self.y[s]] += 1;
        }
        let impurity = gini(&counts, n);

        let depth_exceeded = self.config.max_depth.is_some_and(|d| depth >= d);
        let split = if depth_exceeded || n < self.config.min_samples_split || impurity == 0.0 {
            None
        } else {
            self.best_split(samples, &counts, impurity)
        };

        let index = self.nodes.len();
        let Some(split) = split else {
            let distribution = counts.iter().map(|&c| c as f64 / n as f64).collect();
            self.nodes.push(Node::Leaf {
                distribution,
                impurity,
                n_samples: n,
            });
            return index;
        };

        // Reserve the slot so children get higher indices
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
            impurity,
            n_samples: n,
        });
        let left = self.grow(&split.left, depth + 1);
        let right = self.grow(&split.right, depth + 1);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
            impurity,
            n_samples: n,
        };
        index
    }

    fn best_split(&self, samples: &[usize], parent: &[usize], parent_impurity: f64) -> Option<BestSplit> {
        let n = samples.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, child impurity)

        for feature in 0..self.x.ncols() {
            let mut sorted: Vec<(f64, usize)> = samples
                .iter()
                .map(|&s| (self.x[[s, feature]], self.y[s]))
                .collect();
            sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left = vec![0usize; self.n_classes];
            let mut right = parent.to_vec();

            for i in 0..n - 1 {
                let (value, class) = sorted[i];
                left[class] += 1;
                right[class] -= 1;

                let next = sorted[i + 1].0;
                if next <= value {
                    continue;
                }
                let n_left = i + 1;
                let n_right = n - n_left;
                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let weighted = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;

                if weighted < parent_impurity && best.map_or(true, |(_, _, b)| weighted < b) {
                    let mut threshold = value + (next - value) / 2.0;
                    if threshold >= next {
                        threshold = value;
                    }
                    best = Some((feature, threshold, weighted));
                }
            }
        }

        let (feature, threshold, _) = best?;
        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .iter()
            .partition(|&&s| self.x[[s, feature]] <= threshold);
        Some(BestSplit {
            feature,
            threshold,
            left,
            right,
        })
    }
}
