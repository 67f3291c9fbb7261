//! Feature importance aggregation across trees.

/// A ranked feature with name, importance score, and rank.
#[derive(Debug, Clone)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Normalized importance score (sums to 1.0 across all features).
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

/// Average per-tree MDI importances into a ranked list.
///
/// Each tree contributes its normalized per-feature variance decreases;
/// the per-feature means are re-normalized to sum to 1.0, sorted
/// descending, and assigned 1-based ranks. Trees that never split (all
/// zeros) simply contribute nothing.
pub(crate) fn rank_importances(per_tree: &[Vec<f64>], names: &[String]) -> Vec<RankedFeature> {
    if per_tree.is_empty() || names.is_empty() {
        return vec![];
    }

    let n_features = names.len();
    let totals = per_tree.iter().fold(vec![0.0f64; n_features], |mut acc, tree| {
        for (slot, &val) in acc.iter_mut().zip(tree.iter()) {
            *slot += val;
        }
        acc
    });

    let sum: f64 = totals.iter().sum();
    let mut ranked: Vec<RankedFeature> = names
        .iter()
        .zip(&totals)
        .map(|(name, &total)| RankedFeature {
            name: name.clone(),
            importance: if sum > 0.0 { total / sum } else { 0.0 },
            rank: 0,
        })
        .collect();

    ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, feature) in ranked.iter_mut().enumerate() {
        feature.rank = i + 1;
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::rank_importances;

    fn names(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn averages_and_normalizes_across_trees() {
        let per_tree = vec![vec![0.8, 0.2], vec![0.6, 0.4]];
        let ranked = rank_importances(&per_tree, &names(&["a", "b"]));

        assert_eq!(ranked[0].name, "a");
        assert_eq!(ranked[0].rank, 1);
        assert!((ranked[0].importance - 0.7).abs() < 1e-12);
        assert!((ranked[1].importance - 0.3).abs() < 1e-12);
        let total: f64 = ranked.iter().map(|f| f.importance).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn all_zero_trees_give_zero_importances() {
        let per_tree = vec![vec![0.0, 0.0]];
        let ranked = rank_importances(&per_tree, &names(&["a", "b"]));
        assert!(ranked.iter().all(|f| f.importance == 0.0));
    }

    #[test]
    fn empty_input_gives_empty_ranking() {
        assert!(rank_importances(&[], &names(&["a"])).is_empty());
        let per_tree = vec![vec![1.0]];
        assert!(rank_importances(&per_tree, &[]).is_empty());
    }
}
