use crate::config::HookeJeevesConfig;
use crate::objective::{Evaluator, Objective};
use crate::solution::EvaluatedSolution;
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// The pattern-search (Hooke-Jeeves) method: exploratory moves over a
/// per-axis neighborhood, accelerated pattern moves along the last
/// improving direction, and adaptive step shrinkage.
pub struct HookeJeeves {
    conf: HookeJeevesConfig,
    evaluator: Evaluator,
    current_seed: u64,
    verbosity: usize,
    elapsed: f64,
    final_step: f64,
}

impl HookeJeeves {
    pub fn new(conf: HookeJeevesConfig, obj: Box<dyn Objective>) -> Self {
        let evaluator = Evaluator::new(obj);
        let current_seed = conf.common.seed;
        HookeJeeves {
            conf,
            evaluator,
            current_seed,
            verbosity: 0,
            elapsed: 0.0,
            final_step: 0.0,
        }
    }

    pub fn config(&self) -> &HookeJeevesConfig {
        &self.conf
    }

    pub fn seed(&self) -> u64 {
        self.current_seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.current_seed = seed;
    }

    pub fn set_verbosity(&mut self, verbosity: usize) {
        self.verbosity = verbosity;
    }

    /// Number of objective evaluations spent in the last run
    pub fn num_evals(&self) -> usize {
        self.evaluator.num_evals()
    }

    pub fn num_variables(&self) -> usize {
        self.evaluator.num_variables()
    }

    /// Wall-clock time (s) of the last run
    pub fn time(&self) -> f64 {
        self.elapsed
    }

    /// Step fraction in effect when the last run terminated. Each
    /// contraction event multiplies it by exactly the configured
    /// contraction constant.
    pub fn final_step(&self) -> f64 {
        self.final_step
    }

    /// Runs the algorithm from a random point drawn with the current seed
    pub fn run(&mut self) -> EvaluatedSolution {
        let tic = Instant::now();
        self.evaluator.new_run();
        let mut rng = StdRng::seed_from_u64(self.current_seed);
        let p = self.random_point(&mut rng);
        let sol = self.search_from(p);
        self.elapsed = tic.elapsed().as_secs_f64();
        sol
    }

    /// Runs the algorithm from a given starting point
    pub fn run_from(&mut self, p: &Array1<f64>) -> EvaluatedSolution {
        let tic = Instant::now();
        self.evaluator.new_run();
        let sol = self.search_from(p.clone());
        self.elapsed = tic.elapsed().as_secs_f64();
        sol
    }

    /// Runs the algorithm with the indicated seed, restoring the previous
    /// seed afterward so the sequence of parameterless invocations is not
    /// affected.
    pub fn run_with_seed(&mut self, seed: u64) -> EvaluatedSolution {
        let saved = self.current_seed;
        self.current_seed = seed;
        let sol = self.run();
        self.current_seed = saved;
        sol
    }

    fn random_point(&self, rng: &mut StdRng) -> Array1<f64> {
        let n = self.evaluator.num_variables();
        Array1::from_shape_fn(n, |j| {
            rng.gen_range(self.evaluator.min_value(j)..self.evaluator.max_value(j))
        })
    }

    fn search_from(&mut self, p: Array1<f64>) -> EvaluatedSolution {
        // the search itself is deterministic from here on, but the seed
        // is advanced on every run to keep the restart sequence moving
        self.current_seed += 1;
        let n = self.evaluator.num_variables();
        let budget = self.conf.common.maxevals_cycle;

        let mut cur_step = self.conf.step;
        let mut delta = self.step_sizes(cur_step);
        let value = self.evaluator.evaluate(&p);
        let mut current = EvaluatedSolution::new(p, value);

        if self.verbosity > 0 {
            println!(
                "{}\t{}\t{}",
                self.evaluator.num_evals(),
                cur_step,
                current.value()
            );
        }

        while self.evaluator.num_evals() < budget && cur_step > self.conf.minstep {
            let mut neighbor = self.best_neighbor(current.point(), &delta, true);
            while neighbor.value() < current.value() && self.evaluator.num_evals() < budget {
                let direction = neighbor.point() - current.point();
                current = neighbor;
                let advanced = Array1::from_shape_fn(n, |i| {
                    self.evaluator
                        .clamp(i, current.point()[i] + self.conf.acceleration * direction[i])
                });
                neighbor = self.best_neighbor(&advanced, &delta, false);
                if self.verbosity > 0 {
                    println!(
                        "{}\t{}\t{}",
                        self.evaluator.num_evals(),
                        cur_step,
                        current.value()
                    );
                }
            }
            cur_step *= self.conf.contraction;
            delta = self.step_sizes(cur_step);
        }

        self.final_step = cur_step;
        current
    }

    /// Per-dimension step sizes for a given step fraction
    fn step_sizes(&self, frac: f64) -> Array1<f64> {
        let n = self.evaluator.num_variables();
        Array1::from_shape_fn(n, |i| frac * self.evaluator.range(i))
    }

    /// Best point in the neighborhood of `point`: the 2n points shifted
    /// by plus/minus the per-dimension step (clamped to bounds), plus the
    /// point itself when the neighborhood is solid.
    fn best_neighbor(
        &mut self,
        point: &Array1<f64>,
        delta: &Array1<f64>,
        solid: bool,
    ) -> EvaluatedSolution {
        let n = self.evaluator.num_variables();
        assert_eq!(point.len(), n, "point dimension mismatch");

        let mut best: Option<EvaluatedSolution> = if solid {
            let value = self.evaluator.evaluate(point);
            Some(EvaluatedSolution::new(point.clone(), value))
        } else {
            None
        };

        for i in 0..n {
            for dir in [-1.0, 1.0] {
                let mut p = point.clone();
                p[i] = self.evaluator.clamp(i, point[i] + dir * delta[i]);
                let value = self.evaluator.evaluate(&p);
                let sol = EvaluatedSolution::new(p, value);
                let better = match &best {
                    None => true,
                    Some(b) => sol.value() < b.value(),
                };
                if better {
                    best = Some(sol);
                }
            }
        }

        best.expect("neighborhood of an n >= 1 point is never empty")
    }
}

#[cfg(test)]
mod hooke_jeeves_tests {
    use super::*;
    use crate::config::CommonConfig;
    use crate::objective::Objective;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Sphere {
        n: usize,
        range: f64,
    }

    impl Objective for Sphere {
        fn num_variables(&self) -> usize {
            self.n
        }

        fn min_value(&self, _i: usize) -> f64 {
            -self.range
        }

        fn max_value(&self, _i: usize) -> f64 {
            self.range
        }

        fn evaluate(&self, point: &Array1<f64>) -> f64 {
            point.iter().map(|x| x * x).sum()
        }
    }

    struct RecordingSphere {
        n: usize,
        range: f64,
        seen: Rc<RefCell<Vec<Array1<f64>>>>,
    }

    impl Objective for RecordingSphere {
        fn num_variables(&self) -> usize {
            self.n
        }

        fn min_value(&self, _i: usize) -> f64 {
            -self.range
        }

        fn max_value(&self, _i: usize) -> f64 {
            self.range
        }

        fn evaluate(&self, point: &Array1<f64>) -> f64 {
            self.seen.borrow_mut().push(point.clone());
            point.iter().map(|x| x * x).sum()
        }
    }

    fn roomy_config() -> HookeJeevesConfig {
        // enough cycle budget to reach the minimum step on the sphere
        HookeJeevesConfig {
            common: CommonConfig {
                maxevals_cycle: 10000,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_sphere_converges() {
        let mut hj = HookeJeeves::new(roomy_config(), Box::new(Sphere { n: 2, range: 5.0 }));
        let sol = hj.run();
        assert!(sol.value() < 1e-3, "best value {} not below 1e-3", sol.value());
        assert!(hj.num_evals() <= 10000 + 2 * 2 + 1);
    }

    #[test]
    fn test_step_shrinks_by_exact_contraction_powers() {
        // a generous cycle budget lets the run terminate through the
        // minimum step; 0.01 * 0.5^10 is the first value not above 1e-5
        let conf = HookeJeevesConfig {
            common: CommonConfig {
                maxevals_cycle: 100000,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut hj = HookeJeeves::new(conf, Box::new(Sphere { n: 2, range: 5.0 }));
        hj.run();
        assert_eq!(hj.final_step(), 0.01 * 0.5f64.powi(10));
    }

    #[test]
    fn test_identical_seeds_give_identical_runs() {
        let conf = HookeJeevesConfig {
            common: CommonConfig {
                seed: 31,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut a = HookeJeeves::new(conf.clone(), Box::new(Sphere { n: 3, range: 5.0 }));
        let mut b = HookeJeeves::new(conf, Box::new(Sphere { n: 3, range: 5.0 }));
        let sa = a.run();
        let sb = b.run();
        assert_eq!(sa.value(), sb.value());
        assert_eq!(sa.point(), sb.point());
        assert_eq!(a.num_evals(), b.num_evals());
    }

    #[test]
    fn test_successive_runs_advance_the_seed() {
        let mut hj = HookeJeeves::new(
            HookeJeevesConfig::default(),
            Box::new(Sphere { n: 2, range: 5.0 }),
        );
        assert_eq!(hj.seed(), 1);
        hj.run();
        assert_eq!(hj.seed(), 2);
        hj.run_from(&array![1.0, 1.0]);
        assert_eq!(hj.seed(), 3);
    }

    #[test]
    fn test_run_with_seed_restores_the_sequence() {
        let mut hj = HookeJeeves::new(
            HookeJeevesConfig::default(),
            Box::new(Sphere { n: 2, range: 5.0 }),
        );
        let before = hj.seed();
        hj.run_with_seed(1234);
        assert_eq!(hj.seed(), before);
    }

    #[test]
    fn test_every_evaluated_point_is_within_bounds() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let obj = RecordingSphere {
            n: 2,
            range: 1.5,
            seen: Rc::clone(&seen),
        };
        let mut hj = HookeJeeves::new(HookeJeevesConfig::default(), Box::new(obj));
        hj.run();

        let seen = seen.borrow();
        assert!(!seen.is_empty());
        for p in seen.iter() {
            for &c in p {
                assert!((-1.5..=1.5).contains(&c), "coordinate {} out of bounds", c);
            }
        }
    }

    #[test]
    fn test_run_from_given_point() {
        let mut hj = HookeJeeves::new(roomy_config(), Box::new(Sphere { n: 2, range: 5.0 }));
        let sol = hj.run_from(&array![4.0, -4.0]);
        assert!(sol.value() < 1e-3);
    }

    #[test]
    fn test_starting_point_on_the_boundary() {
        let mut hj = HookeJeeves::new(roomy_config(), Box::new(Sphere { n: 2, range: 5.0 }));
        let sol = hj.run_from(&array![5.0, 5.0]);
        assert!(sol.value() < 1e-3);
    }
}
