use rand_chacha::ChaCha8Rng;

use crate::node::{Node, NodeIndex};
use crate::split::find_best_split;

/// Per-tree growth parameters, resolved from the forest config.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GrowParams {
    /// Depth at which nodes stop splitting (root is depth 0).
    pub(crate) max_depth: usize,
    /// Minimum samples a node needs to attempt a split.
    pub(crate) min_samples_split: usize,
    /// Resolved count of candidate features per split.
    pub(crate) n_candidate_features: usize,
    /// Maximum distinct threshold candidates per feature.
    pub(crate) threshold_cap: usize,
}

/// A fitted regression tree.
///
/// Stored as an arena-based `Vec<Node>` with index references for
/// cache-friendly traversal and trivial serialization. The root is
/// always at index 0.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegressionTree {
    pub(crate) nodes: Vec<Node>,
}

/// Grow a regression tree on the bootstrap sample described by `sample_indices`.
///
/// `features` is column-major over the full dataset; `sample_indices`
/// selects (with possible repeats) the rows this tree trains on.
pub(crate) fn grow(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    params: &GrowParams,
    rng: &mut ChaCha8Rng,
) -> RegressionTree {
    let mut arena: Vec<Node> = Vec::new();
    build_node(features, targets, sample_indices, params, 0, rng, &mut arena);
    RegressionTree { nodes: arena }
}

/// Mean target over the selected samples.
fn mean_target(targets: &[f64], sample_indices: &[usize]) -> f64 {
    let sum: f64 = sample_indices.iter().map(|&si| targets[si]).sum();
    sum / sample_indices.len() as f64
}

/// Recursively build the arena-based regression tree.
///
/// Returns the [`NodeIndex`] of the node just created in `arena`.
fn build_node(
    features: &[Vec<f64>],
    targets: &[f64],
    sample_indices: &[usize],
    params: &GrowParams,
    depth: usize,
    rng: &mut ChaCha8Rng,
    arena: &mut Vec<Node>,
) -> NodeIndex {
    let n_samples = sample_indices.len();

    let make_leaf = |arena: &mut Vec<Node>| -> NodeIndex {
        let idx = arena.len();
        arena.push(Node::Leaf {
            value: mean_target(targets, sample_indices),
        });
        NodeIndex::new(idx)
    };

    // Stopping conditions → leaf.
    let depth_exceeded = depth >= params.max_depth;
    let too_few = n_samples < params.min_samples_split;
    let constant_target = sample_indices
        .iter()
        .all(|&si| targets[si] == targets[sample_indices[0]]);

    if depth_exceeded || too_few || constant_target {
        return make_leaf(arena);
    }

    // Try to find a split.
    let split = match find_best_split(
        features,
        targets,
        sample_indices,
        params.n_candidate_features,
        params.threshold_cap,
        rng,
    ) {
        Some(s) => s,
        None => return make_leaf(arena),
    };

    // Arena pattern: reserve index, recurse, then overwrite with the split.
    let node_idx = arena.len();
    arena.push(Node::Leaf { value: 0.0 });

    let left_idx = build_node(
        features,
        targets,
        &split.left_indices,
        params,
        depth + 1,
        rng,
        arena,
    );
    let right_idx = build_node(
        features,
        targets,
        &split.right_indices,
        params,
        depth + 1,
        rng,
        arena,
    );

    arena[node_idx] = Node::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: left_idx,
        right: right_idx,
    };

    NodeIndex::new(node_idx)
}

impl RegressionTree {
    /// Predict the target value for a single sample.
    ///
    /// Traverses from the root (index 0): at each `Split`, goes left when
    /// `sample[feature] <= threshold`, right otherwise. The forest
    /// validates the sample's feature count before calling in.
    #[must_use]
    pub fn predict_value(&self, sample: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if sample[feature.index()] <= *threshold {
                        idx = left.index();
                    } else {
                        idx = right.index();
                    }
                }
            }
        }
    }

    /// Return the total number of nodes in the tree (both splits and leaves).
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return the number of leaf nodes.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Return the maximum depth of the tree.
    ///
    /// A single-node tree (just a root leaf) has depth 0.
    /// Uses an iterative BFS approach.
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.nodes.is_empty() {
            return 0;
        }

        // BFS: (node_index, current_depth)
        let mut max_depth = 0usize;
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((0usize, 0usize));

        while let Some((node_idx, d)) = queue.pop_front() {
            match &self.nodes[node_idx] {
                Node::Leaf { .. } => {
                    if d > max_depth {
                        max_depth = d;
                    }
                }
                Node::Split { left, right, .. } => {
                    queue.push_back((left.index(), d + 1));
                    queue.push_back((right.index(), d + 1));
                }
            }
        }

        max_depth
    }
}
