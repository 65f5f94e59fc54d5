use crate::objective::Evaluator;
use crate::solution::EvaluatedSolution;
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

/// Default side length used when initializing the simplex around a point,
/// expressed as a fraction of each dimension's range.
const SIDE: f64 = 0.1;

/// The working set of the simplex-transformation method: n+1 evaluated
/// points in n-dimensional space, kept sorted ascending by value, plus
/// the centroid of the n best points (the worst one is excluded).
pub struct Simplex {
    n: usize,
    points: Vec<EvaluatedSolution>,
    centroid: Array1<f64>,
}

impl Simplex {
    /// Creates an empty simplex for `n` dimensions
    pub fn new(n: usize) -> Self {
        assert!(n >= 1, "simplex dimension must be at least 1");
        Simplex {
            n,
            points: Vec::with_capacity(n + 1),
            centroid: Array1::zeros(n),
        }
    }

    /// Clears the simplex
    pub fn clear(&mut self) {
        self.points.clear();
        self.centroid.fill(0.0);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fills the simplex with n+1 points drawn uniformly from the domain
    pub fn initialize_random(&mut self, rng: &mut StdRng, eval: &mut Evaluator) {
        self.clear();
        for _ in 0..=self.n {
            let p = Array1::from_shape_fn(self.n, |j| {
                rng.gen_range(eval.min_value(j)..eval.max_value(j))
            });
            self.add_point(p, eval);
        }
    }

    /// Initializes the simplex around a point: the point itself plus `n`
    /// other points obtained by shifting one dimension each by a default
    /// distance (a fraction of that dimension's range).
    pub fn initialize_around(&mut self, point: &Array1<f64>, eval: &mut Evaluator) {
        let sides = Array1::from_shape_fn(self.n, |i| SIDE * eval.range(i));
        self.initialize_around_with(point, &sides, eval);
    }

    /// Initializes the simplex around a point with explicit per-dimension
    /// offsets. Shifted coordinates are clamped into the domain.
    pub fn initialize_around_with(
        &mut self,
        point: &Array1<f64>,
        sides: &Array1<f64>,
        eval: &mut Evaluator,
    ) {
        assert_eq!(point.len(), self.n, "point dimension mismatch");
        assert_eq!(sides.len(), self.n, "sides dimension mismatch");
        self.clear();
        self.add_point(point.clone(), eval);
        for i in 0..self.n {
            let mut p = point.clone();
            p[i] = eval.clamp(i, point[i] + sides[i]);
            self.add_point(p, eval);
        }
    }

    /// Initializes the simplex with a given collection of exactly n+1
    /// points, evaluated as supplied. No randomness is involved.
    pub fn initialize_from(&mut self, points: &[Array1<f64>], eval: &mut Evaluator) {
        assert_eq!(
            points.len(),
            self.n + 1,
            "an initial simplex needs exactly n+1 points"
        );
        self.clear();
        for p in points {
            self.add_point(p.clone(), eval);
        }
    }

    /// Evaluates a point and adds it to the simplex
    pub fn add_point(&mut self, p: Array1<f64>, eval: &mut Evaluator) {
        let value = eval.evaluate(&p);
        self.add_solution(EvaluatedSolution::new(p, value));
    }

    /// Adds an already-evaluated point. If the simplex is full the worst
    /// vertex is substituted; once at n+1 members the vertex list is
    /// re-sorted and the centroid recomputed.
    pub fn add_solution(&mut self, sol: EvaluatedSolution) {
        assert_eq!(sol.point().len(), self.n, "point dimension mismatch");
        if self.points.len() <= self.n {
            self.points.push(sol);
        } else {
            self.points[self.n] = sol;
        }
        if self.points.len() == self.n + 1 {
            self.points.sort_by(|a, b| a.partial_cmp(b).unwrap());
            self.update_centroid();
        }
    }

    fn update_centroid(&mut self) {
        self.centroid.fill(0.0);
        for sol in &self.points[..self.n] {
            self.centroid += sol.point();
        }
        self.centroid /= self.n as f64;
    }

    /// Centroid of the n best points
    pub fn centroid(&self) -> &Array1<f64> {
        &self.centroid
    }

    /// The `rank`-th vertex: rank 0 is the best, rank n the worst
    pub fn get(&self, rank: usize) -> &EvaluatedSolution {
        assert!(rank < self.points.len(), "vertex rank out of range");
        &self.points[rank]
    }

    /// The vector from `origin` to `dest`, i.e. `dest - origin`
    pub fn vector(origin: &Array1<f64>, dest: &Array1<f64>) -> Array1<f64> {
        assert_eq!(origin.len(), dest.len(), "vector dimension mismatch");
        dest - origin
    }

    /// Evaluates the point `origin + k * vector`, with every coordinate
    /// clamped into its dimension's bounds before evaluation.
    pub fn point_at(
        &self,
        origin: &Array1<f64>,
        vector: &Array1<f64>,
        k: f64,
        eval: &mut Evaluator,
    ) -> EvaluatedSolution {
        assert_eq!(origin.len(), self.n, "origin dimension mismatch");
        assert_eq!(vector.len(), self.n, "vector dimension mismatch");
        let x = Array1::from_shape_fn(self.n, |i| eval.clamp(i, origin[i] + k * vector[i]));
        let value = eval.evaluate(&x);
        EvaluatedSolution::new(x, value)
    }

    /// Shrinks the simplex toward the best vertex by factor `sigma`
    pub fn shrink(&mut self, sigma: f64, eval: &mut Evaluator) {
        let best = self.points[0].point().clone();
        for i in 1..=self.n {
            let v = Self::vector(&best, self.points[i].point());
            let sol = self.point_at(&best, &v, sigma, eval);
            self.points[i] = sol;
        }
        self.points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        self.update_centroid();
    }
}
