use crate::search::Method;
use crate::solution::EvaluatedSolution;
use crate::stats::SearchStats;
use std::time::Instant;

/// Multi-start harness: restarts a method until the global evaluation
/// budget is spent, tracking the best solution and the full trajectory.
///
/// Each invocation of [`run`](IteratedSearch::run) is one outer run. The
/// harness hands its current seed to the method before the restarts and
/// then advances it by `maxevals / (n + 1)`, so consecutive outer runs
/// draw from well-separated stretches of the seed sequence no matter how
/// many restarts each one performs.
pub struct IteratedSearch {
    method: Method,
    current_seed: u64,
    verbosity: usize,
    stats: SearchStats,
    elapsed: f64,
}

impl IteratedSearch {
    pub fn new(method: Method) -> Self {
        let current_seed = method.common().seed;
        IteratedSearch {
            method,
            current_seed,
            verbosity: 0,
            stats: SearchStats::new(),
            elapsed: 0.0,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn seed(&self) -> u64 {
        self.current_seed
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.current_seed = seed;
    }

    /// Sets the harness verbosity. Anything above 1 is passed down to the
    /// underlying method, lowered by one level.
    pub fn set_verbosity(&mut self, verbosity: usize) {
        self.verbosity = verbosity;
        self.method.set_verbosity(verbosity.saturating_sub(1));
    }

    /// Statistics collected across the outer runs performed so far
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut SearchStats {
        &mut self.stats
    }

    /// Wall-clock time (s) of the last outer run
    pub fn time(&self) -> f64 {
        self.elapsed
    }

    /// Performs one outer run: restarts of the method until the global
    /// evaluation budget is exhausted. Returns the best solution found.
    pub fn run(&mut self) -> EvaluatedSolution {
        let tic = Instant::now();
        self.stats.new_run();

        let maxevals = self.method.common().maxevals;
        let stride = (maxevals / (self.method.num_variables() + 1)) as u64;
        self.method.set_seed(self.current_seed);
        self.current_seed += stride;

        // the configured budget is positive, so at least one restart runs
        let mut best = self.method.run();
        let mut total_evals = self.method.num_evals();
        self.stats.take_stats(total_evals, &best);
        if self.verbosity > 0 {
            println!("{}\t{}", total_evals, best.value());
        }
        while total_evals < maxevals {
            let sol = self.method.run();
            total_evals += self.method.num_evals();
            if sol.value() < best.value() {
                best = sol;
            }
            self.stats.take_stats(total_evals, &best);
            if self.verbosity > 0 {
                println!("{}\t{}", total_evals, best.value());
            }
        }

        self.stats.close_run();
        self.elapsed = tic.elapsed().as_secs_f64();
        best
    }

    /// Performs the configured number of outer runs and returns the best
    /// solution found across all of them.
    pub fn run_all(&mut self) -> EvaluatedSolution {
        let numruns = self.method.common().numruns;
        let mut best = self.run();
        for _ in 1..numruns {
            let sol = self.run();
            if sol.value() < best.value() {
                best = sol;
            }
        }
        best
    }

    /// Performs one outer run with the indicated seed, restoring the
    /// previous harness seed afterward.
    pub fn run_with_seed(&mut self, seed: u64) -> EvaluatedSolution {
        let saved_next = self.current_seed;
        self.current_seed = seed;
        let sol = self.run();
        self.current_seed = saved_next;
        sol
    }
}
