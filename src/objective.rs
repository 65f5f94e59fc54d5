use ndarray::prelude::*;

/// Objective function of a derivative-free search: a total real-valued
/// function over a box-bounded n-dimensional domain.
pub trait Objective {
    /// Number of variables in the problem
    fn num_variables(&self) -> usize;

    /// Minimum value of the `i`-th variable
    fn min_value(&self, i: usize) -> f64;

    /// Maximum value of the `i`-th variable
    fn max_value(&self, i: usize) -> f64;

    /// Value of the objective function at an n-dimensional point
    fn evaluate(&self, point: &Array1<f64>) -> f64;
}

/// Owns the objective function and the evaluation counter. Every
/// evaluation performed by the algorithms flows through here, so the
/// counter is the single progress signal used to detect budget
/// exhaustion.
pub struct Evaluator {
    obj: Box<dyn Objective>,
    evals: usize,
}

impl Evaluator {
    pub fn new(obj: Box<dyn Objective>) -> Self {
        assert!(obj.num_variables() >= 1, "objective must have at least one variable");
        Evaluator { obj, evals: 0 }
    }

    /// Evaluates a point, counting the call
    pub fn evaluate(&mut self, point: &Array1<f64>) -> f64 {
        self.evals += 1;
        self.obj.evaluate(point)
    }

    /// Number of calls to the objective function in the current run
    pub fn num_evals(&self) -> usize {
        self.evals
    }

    /// Resets the evaluation counter at the start of a run
    pub fn new_run(&mut self) {
        self.evals = 0;
    }

    pub fn num_variables(&self) -> usize {
        self.obj.num_variables()
    }

    pub fn min_value(&self, i: usize) -> f64 {
        self.obj.min_value(i)
    }

    pub fn max_value(&self, i: usize) -> f64 {
        self.obj.max_value(i)
    }

    /// Width of the domain along the `i`-th dimension
    pub fn range(&self, i: usize) -> f64 {
        self.obj.max_value(i) - self.obj.min_value(i)
    }

    /// Clamps a coordinate into the bounds of the `i`-th dimension
    pub fn clamp(&self, i: usize, v: f64) -> f64 {
        v.clamp(self.obj.min_value(i), self.obj.max_value(i))
    }
}

#[cfg(test)]
mod objective_tests {
    use super::*;

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

    #[test]
    fn test_counter_tracks_every_evaluation() {
        let mut eval = Evaluator::new(Box::new(Sphere { n: 2, range: 5.0 }));
        assert_eq!(eval.num_evals(), 0);
        eval.evaluate(&array![1.0, 2.0]);
        eval.evaluate(&array![0.0, 0.0]);
        assert_eq!(eval.num_evals(), 2);
        eval.new_run();
        assert_eq!(eval.num_evals(), 0);
    }

    #[test]
    fn test_clamp_and_range() {
        let eval = Evaluator::new(Box::new(Sphere { n: 3, range: 5.0 }));
        assert_eq!(eval.range(0), 10.0);
        assert_eq!(eval.clamp(1, 7.5), 5.0);
        assert_eq!(eval.clamp(1, -12.0), -5.0);
        assert_eq!(eval.clamp(1, 3.25), 3.25);
    }

    #[test]
    #[should_panic]
    fn test_zero_dimensional_objective_is_rejected() {
        Evaluator::new(Box::new(Sphere { n: 0, range: 1.0 }));
    }
}
