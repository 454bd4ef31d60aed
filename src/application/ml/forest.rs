use crate::domain::errors::ForecastError;
use crate::domain::ml::estimator::{EnsembleTrainer, TreeEnsemble};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_regressor::{
    DecisionTreeRegressor, DecisionTreeRegressorParameters,
};
use tracing::debug;

type RegressionTree = DecisionTreeRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParameters {
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for ForestParameters {
    fn default() -> Self {
        Self {
            n_trees: 320,
            max_depth: 16,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

/// Bagged forest of smartcore regression trees.
///
/// Each tree is fitted on a bootstrap resample of the training rows and
/// considers every feature at each split. Trees are fitted in parallel on
/// the rayon pool; per-tree seeds are drawn up front from `seed`, so the
/// fitted forest does not depend on thread scheduling.
pub struct SmartCoreForestTrainer {
    params: ForestParameters,
}

impl SmartCoreForestTrainer {
    pub fn new(params: ForestParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &ForestParameters {
        &self.params
    }

    fn tree_parameters(&self) -> DecisionTreeRegressorParameters {
        DecisionTreeRegressorParameters::default()
            .with_max_depth(self.params.max_depth)
            .with_min_samples_leaf(self.params.min_samples_leaf)
            .with_min_samples_split(2)
    }

    fn fit_tree(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        seed: u64,
    ) -> Result<RegressionTree, ForecastError> {
        let n = x.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sample_x = Vec::with_capacity(n);
        let mut sample_y = Vec::with_capacity(n);
        for _ in 0..n {
            let i = rng.random_range(0..n);
            sample_x.push(x[i].clone());
            sample_y.push(y[i]);
        }

        let matrix = DenseMatrix::from_2d_vec(&sample_x)
            .map_err(|e| ForecastError::estimator(format!("Matrix creation failed: {}", e)))?;
        DecisionTreeRegressor::fit(&matrix, &sample_y, self.tree_parameters())
            .map_err(|e| ForecastError::estimator(format!("Training error: {}", e)))
    }
}

impl Default for SmartCoreForestTrainer {
    fn default() -> Self {
        Self::new(ForestParameters::default())
    }
}

impl EnsembleTrainer for SmartCoreForestTrainer {
    fn fit(&self, x: &[Vec<f64>], y: &[f64]) -> Result<Box<dyn TreeEnsemble>, ForecastError> {
        if x.is_empty() {
            return Err(ForecastError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(ForecastError::estimator(format!(
                "Feature rows ({}) and targets ({}) differ in length",
                x.len(),
                y.len()
            )));
        }
        if self.params.n_trees == 0 {
            return Err(ForecastError::estimator("Forest needs at least one tree"));
        }

        let mut seeder = StdRng::seed_from_u64(self.params.seed);
        let tree_seeds: Vec<u64> = (0..self.params.n_trees).map(|_| seeder.random()).collect();

        debug!(
            "Fitting {} trees (depth {}, min leaf {}) on {} rows",
            self.params.n_trees,
            self.params.max_depth,
            self.params.min_samples_leaf,
            x.len()
        );

        let trees = tree_seeds
            .into_par_iter()
            .map(|seed| self.fit_tree(x, y, seed))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(FittedForest { trees }))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

/// A fitted forest; the point estimate is the mean of the member estimates.
pub struct FittedForest {
    trees: Vec<RegressionTree>,
}

impl FittedForest {
    fn row_matrix(row: &[f64]) -> Result<DenseMatrix<f64>, ForecastError> {
        DenseMatrix::from_2d_vec(&vec![row.to_vec()])
            .map_err(|e| ForecastError::estimator(format!("Matrix creation failed: {}", e)))
    }
}

impl TreeEnsemble for FittedForest {
    fn predict(&self, row: &[f64]) -> Result<f64, ForecastError> {
        let members = self.member_predictions(row)?;
        if members.is_empty() {
            return Err(ForecastError::estimator("No prediction returned"));
        }
        Ok(members.iter().sum::<f64>() / members.len() as f64)
    }

    fn member_predictions(&self, row: &[f64]) -> Result<Vec<f64>, ForecastError> {
        let input = Self::row_matrix(row)?;
        self.trees
            .iter()
            .map(|tree| {
                let predictions = tree
                    .predict(&input)
                    .map_err(|e| ForecastError::estimator(format!("Prediction failed: {}", e)))?;
                predictions
                    .first()
                    .copied()
                    .ok_or_else(|| ForecastError::estimator("No prediction returned"))
            })
            .collect()
    }

    fn n_members(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> ForestParameters {
        ForestParameters {
            n_trees: 12,
            max_depth: 6,
            min_samples_leaf: 2,
            seed: 7,
        }
    }

    /// y = 10 * x0 + x1 on a small grid.
    fn linear_dataset() -> (Vec<Vec<f64>>, Vec<f64>) {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            for j in 0..3 {
                let row = vec![i as f64, j as f64];
                y.push(10.0 * row[0] + row[1]);
                x.push(row);
            }
        }
        (x, y)
    }

    #[test]
    fn test_default_parameters() {
        let params = ForestParameters::default();
        assert_eq!(params.n_trees, 320);
        assert_eq!(params.max_depth, 16);
        assert_eq!(params.min_samples_leaf, 2);
        assert_eq!(params.seed, 42);
    }

    #[test]
    fn test_fit_exposes_every_member() {
        let (x, y) = linear_dataset();
        let forest = SmartCoreForestTrainer::new(small_params())
            .fit(&x, &y)
            .unwrap();

        assert_eq!(forest.n_members(), 12);
        assert_eq!(forest.member_predictions(&x[10]).unwrap().len(), 12);
    }

    #[test]
    fn test_point_estimate_is_member_mean() {
        let (x, y) = linear_dataset();
        let forest = SmartCoreForestTrainer::new(small_params())
            .fit(&x, &y)
            .unwrap();

        let members = forest.member_predictions(&x[30]).unwrap();
        let mean = members.iter().sum::<f64>() / members.len() as f64;
        assert!((forest.predict(&x[30]).unwrap() - mean).abs() < 1e-9);
    }

    #[test]
    fn test_fit_is_reproducible_for_same_seed() {
        let (x, y) = linear_dataset();
        let trainer = SmartCoreForestTrainer::new(small_params());
        let a = trainer.fit(&x, &y).unwrap();
        let b = trainer.fit(&x, &y).unwrap();

        for row in x.iter().step_by(7) {
            assert_eq!(
                a.member_predictions(row).unwrap(),
                b.member_predictions(row).unwrap()
            );
        }
    }

    #[test]
    fn test_learns_monotone_signal() {
        let (x, y) = linear_dataset();
        let forest = SmartCoreForestTrainer::new(small_params())
            .fit(&x, &y)
            .unwrap();

        let low = forest.predict(&[2.0, 1.0]).unwrap();
        let high = forest.predict(&[17.0, 1.0]).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_rejects_empty_and_misaligned_input() {
        let trainer = SmartCoreForestTrainer::new(small_params());
        assert!(matches!(
            trainer.fit(&[], &[]),
            Err(ForecastError::EmptyDataset)
        ));
        assert!(matches!(
            trainer.fit(&[vec![1.0], vec![2.0]], &[1.0]),
            Err(ForecastError::Estimator { .. })
        ));
    }
}
