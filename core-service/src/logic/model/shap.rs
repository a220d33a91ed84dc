//! Tree SHAP - exact Shapley values for the decision tree
//!
//! Path-dependent Tree SHAP (Lundberg et al.), evaluated for every class at
//! once: the path weights do not depend on the leaf value, so each leaf
//! contributes its whole class distribution in one pass.
//!
//! The explainer is primed once with a background matrix. Node covers come
//! from routing the background rows through the tree; if any node receives
//! none, the training sample counts are used instead. After construction the
//! explainer is read-only and every call allocates its own scratch path, so
//! it is safe to share across threads.

use ndarray::{Array2, Array3, ArrayView1, ArrayView2, Axis};

use super::tree::{DecisionTree, Node};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, Default)]
struct PathElement {
    feature: Option<usize>,
    zero_fraction: f64,
    one_fraction: f64,
    pweight: f64,
}

/// Attribution method bound to one fitted tree
#[derive(Debug, Clone)]
pub struct TreeExplainer {
    tree: DecisionTree,
    covers: Vec<f64>,
    expected: Vec<f64>,
    path_capacity: usize,
}

impl TreeExplainer {
    pub fn new(tree: &DecisionTree, background: ArrayView2<f64>) -> Self {
        let covers = Self::background_covers(tree, background).unwrap_or_else(|| {
            log::warn!(
                "Background data ({} rows) leaves tree nodes uncovered, using training counts",
                background.nrows()
            );
            tree.nodes().iter().map(|n| n.n_samples() as f64).collect()
        });

        let expected = if tree.nodes().is_empty() {
            vec![0.0; tree.classes().len()]
        } else {
            expectation(tree.nodes(), &covers, 0)
        };

        let depth = tree.depth();
        Self {
            tree: tree.clone(),
            covers,
            expected,
            path_capacity: (depth + 2) * (depth + 3) / 2,
        }
    }

    fn background_covers(tree: &DecisionTree, background: ArrayView2<f64>) -> Option<Vec<f64>> {
        if background.nrows() == 0 || background.ncols() != tree.n_features() {
            return None;
        }
        let mut covers = vec![0.0; tree.nodes().len()];
        for row in background.rows() {
            for node in tree.decision_path(row) {
                covers[node] += 1.0;
            }
        }
        covers.iter().all(|&c| c > 0.0).then_some(covers)
    }

    /// Cover-weighted mean prediction per class (the SHAP base value)
    pub fn expected_values(&self) -> &[f64] {
        &self.expected
    }

    pub fn classes(&self) -> &[String] {
        self.tree.classes()
    }

    /// Attributions shaped `[instances, transformed features, classes]`
    pub fn explain(&self, x: ArrayView2<f64>) -> CoreResult<Array3<f64>> {
        if x.ncols() != self.tree.n_features() {
            return Err(CoreError::FeatureCountMismatch {
                expected: self.tree.n_features(),
                got: x.ncols(),
            });
        }

        let mut out = Array3::zeros((x.nrows(), self.tree.n_features(), self.classes().len()));
        for (i, row) in x.rows().into_iter().enumerate() {
            out.index_axis_mut(Axis(0), i).assign(&self.explain_row(row));
        }
        Ok(out)
    }

    /// Attributions for one row, shaped `[transformed features, classes]`
    pub fn explain_row(&self, row: ArrayView1<f64>) -> Array2<f64> {
        let mut phi = Array2::zeros((self.tree.n_features(), self.classes().len()));
        if self.tree.nodes().is_empty() {
            return phi;
        }
        let mut path = vec![PathElement::default(); self.path_capacity];
        self.recurse(row, &mut phi, 0, &mut path, 0, 1.0, 1.0, None);
        phi
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        &self,
        row: ArrayView1<f64>,
        phi: &mut Array2<f64>,
        node_index: usize,
        path: &mut [PathElement],
        unique_depth: usize,
        parent_zero: f64,
        parent_one: f64,
        parent_feature: Option<usize>,
    ) {
        extend_path(path, unique_depth, parent_zero, parent_one, parent_feature);

        match &self.tree.nodes()[node_index] {
            Node::Leaf { distribution, .. } => {
                for i in 1..=unique_depth {
                    let weight = unwound_path_sum(path, unique_depth, i);
                    let element = path[i];
                    let Some(feature) = element.feature else { continue };
                    let scale = weight * (element.one_fraction - element.zero_fraction);
                    for (class, &value) in distribution.iter().enumerate() {
                        phi[[feature, class]] += scale * value;
                    }
                }
            }
            Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } => {
                let (hot, cold) = if row[*feature] <= *threshold {
                    (*left, *right)
                } else {
                    (*right, *left)
                };
                let cover = self.covers[node_index];
                let hot_zero = self.covers[hot] / cover;
                let cold_zero = self.covers[cold] / cover;

                // A feature already on the path is unwound and re-entered
                let mut unique_depth = unique_depth;
                let mut incoming_zero = 1.0;
                let mut incoming_one = 1.0;
                if let Some(k) = (1..=unique_depth).find(|&k| path[k].feature == Some(*feature)) {
                    incoming_zero = path[k].zero_fraction;
                    incoming_one = path[k].one_fraction;
                    unwind_path(path, unique_depth, k);
                    unique_depth -= 1;
                }

                let (parent, child) = path.split_at_mut(unique_depth + 1);
                child[..parent.len()].copy_from_slice(parent);
                self.recurse(
                    row,
                    phi,
                    hot,
                    child,
                    unique_depth + 1,
                    hot_zero * incoming_zero,
                    incoming_one,
                    Some(*feature),
                );
                child[..parent.len()].copy_from_slice(parent);
                self.recurse(
                    row,
                    phi,
                    cold,
                    child,
                    unique_depth + 1,
                    cold_zero * incoming_zero,
                    0.0,
                    Some(*feature),
                );
            }
        }
    }
}

fn expectation(nodes: &[Node], covers: &[f64], index: usize) -> Vec<f64> {
    match &nodes[index] {
        Node::Leaf { distribution, .. } => distribution.clone(),
        Node::Split { left, right, .. } => {
            let (l, r) = (expectation(nodes, covers, *left), expectation(nodes, covers, *right));
            let cover = covers[index];
            l.iter()
                .zip(&r)
                .map(|(a, b)| (covers[*left] * a + covers[*right] * b) / cover)
                .collect()
        }
    }
}

fn extend_path(path: &mut [PathElement], depth: usize, zero: f64, one: f64, feature: Option<usize>) {
    path[depth] = PathElement {
        feature,
        zero_fraction: zero,
        one_fraction: one,
        pweight: if depth == 0 { 1.0 } else { 0.0 },
    };
    let scale = (depth + 1) as f64;
    for i in (0..depth).rev() {
        path[i + 1].pweight += one * path[i].pweight * (i + 1) as f64 / scale;
        path[i].pweight = zero * path[i].pweight * (depth - i) as f64 / scale;
    }
}

fn unwind_path(path: &mut [PathElement], depth: usize, index: usize) {
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let scale = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;

    for i in (0..depth).rev() {
        if one != 0.0 {
            let tmp = path[i].pweight;
            path[i].pweight = next_one_portion * scale / ((i + 1) as f64 * one);
            next_one_portion = tmp - path[i].pweight * zero * (depth - i) as f64 / scale;
        } else {
            path[i].pweight = path[i].pweight * scale / (zero * (depth - i) as f64);
        }
    }

    for i in index..depth {
        path[i].feature = path[i + 1].feature;
        path[i].zero_fraction = path[i + 1].zero_fraction;
        path[i].one_fraction = path[i + 1].one_fraction;
    }
}

fn unwound_path_sum(path: &[PathElement], depth: usize, index: usize) -> f64 {
    let one = path[index].one_fraction;
    let zero = path[index].zero_fraction;
    let scale = (depth + 1) as f64;
    let mut next_one_portion = path[depth].pweight;
    let mut total = 0.0;

    for i in (0..depth).rev() {
        if one != 0.0 {
            let tmp = next_one_portion * scale / ((i + 1) as f64 * one);
            total += tmp;
            next_one_portion = path[i].pweight - tmp * zero * (depth - i) as f64 / scale;
        } else if zero != 0.0 {
            total += path[i].pweight * scale / (zero * (depth - i) as f64);
        }
    }
    total
}
