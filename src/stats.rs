use crate::solution::EvaluatedSolution;
use serde_json::{json, Value};
use std::time::Instant;

/// Statistic snapshot of the search: number of evaluations so far and
/// best value found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsEntry {
    pub evals: usize,
    pub best: f64,
}

/// A pair (evals, solution) recording the discovery of a solution at a
/// specific moment.
#[derive(Debug, Clone)]
pub struct SolutionRecord {
    pub evals: usize,
    pub solution: EvaluatedSolution,
}

/// Records the trajectory of an iterated derivative-free search across a
/// batch of runs: per run, the raw (evals, best) series, the improvement
/// records with coordinates, and the elapsed wall-clock time.
pub struct SearchStats {
    run_active: bool,
    stats: Vec<Vec<StatsEntry>>,
    current: Vec<StatsEntry>,
    sols: Vec<Vec<SolutionRecord>>,
    current_sols: Vec<SolutionRecord>,
    runtime: Vec<f64>,
    tic: Option<Instant>,
}

impl SearchStats {
    pub fn new() -> Self {
        SearchStats {
            run_active: false,
            stats: Vec::new(),
            current: Vec::new(),
            sols: Vec::new(),
            current_sols: Vec::new(),
            runtime: Vec::new(),
            tic: None,
        }
    }

    /// Clears all statistics
    pub fn clear(&mut self) {
        self.run_active = false;
        self.stats.clear();
        self.current.clear();
        self.sols.clear();
        self.current_sols.clear();
        self.runtime.clear();
        self.tic = None;
    }

    /// Opens a fresh per-run record and starts its timer, committing any
    /// still-open run first.
    pub fn new_run(&mut self) {
        if self.run_active {
            self.close_run();
        }
        self.current = Vec::new();
        self.current_sols = Vec::new();
        self.run_active = true;
        self.tic = Some(Instant::now());
    }

    /// Commits the current run's samples, improvement records and elapsed
    /// time to the batch history.
    pub fn close_run(&mut self) {
        if self.run_active {
            self.stats.push(std::mem::take(&mut self.current));
            self.sols.push(std::mem::take(&mut self.current_sols));
            let elapsed = match self.tic {
                Some(tic) => tic.elapsed().as_secs_f64(),
                None => 0.0,
            };
            self.runtime.push(elapsed);
        }
        self.current = Vec::new();
        self.current_sols = Vec::new();
        self.run_active = false;
        self.tic = None;
    }

    /// Appends an (evals, value) sample, plus an improvement record if
    /// this is the first sample of the run or the solution strictly
    /// improves on the last recorded one.
    pub fn take_stats(&mut self, evals: usize, sol: &EvaluatedSolution) {
        assert!(self.run_active, "no run open, call new_run first");
        self.current.push(StatsEntry {
            evals,
            best: sol.value(),
        });

        let improved = match self.current_sols.last() {
            None => true,
            Some(rec) => sol.value() < rec.solution.value(),
        };
        if improved {
            self.current_sols.push(SolutionRecord {
                evals,
                solution: sol.clone(),
            });
        }
    }

    /// Number of committed runs
    pub fn num_runs(&self) -> usize {
        self.stats.len()
    }

    /// Wall-clock time (s) of the `i`-th run
    pub fn time(&self, i: usize) -> f64 {
        self.runtime[i]
    }

    /// Raw (evals, best) series of the `i`-th run
    pub fn entries(&self, i: usize) -> &[StatsEntry] {
        &self.stats[i]
    }

    /// Improvement records of the `i`-th run
    pub fn improvements(&self, i: usize) -> &[SolutionRecord] {
        &self.sols[i]
    }

    /// Best solution found so far in the current (open) run
    pub fn current_best(&self) -> &EvaluatedSolution {
        assert!(!self.current_sols.is_empty(), "no sample taken in the current run");
        &self.current_sols[self.current_sols.len() - 1].solution
    }

    /// Best solution of the `i`-th run
    pub fn best_of(&self, i: usize) -> &EvaluatedSolution {
        let data = &self.sols[i];
        assert!(!data.is_empty(), "run {} has no improvement records", i);
        &data[data.len() - 1].solution
    }

    /// Best solution across all committed runs
    pub fn best(&self) -> &EvaluatedSolution {
        assert!(self.num_runs() > 0, "no runs committed");
        let mut best = self.best_of(0);
        for i in 1..self.num_runs() {
            let cand = self.best_of(i);
            if cand.value() < best.value() {
                best = cand;
            }
        }
        best
    }

    /// Data of the `i`-th run as a structured record
    pub fn to_json_run(&self, i: usize) -> Value {
        let data = &self.stats[i];
        let evals: Vec<usize> = data.iter().map(|s| s.evals).collect();
        let best: Vec<f64> = data.iter().map(|s| s.best).collect();

        let soldata = &self.sols[i];
        let sols_evals: Vec<usize> = soldata.iter().map(|r| r.evals).collect();
        let sols_fitness: Vec<f64> = soldata.iter().map(|r| r.solution.value()).collect();
        let sols_genome: Vec<Vec<f64>> = soldata
            .iter()
            .map(|r| r.solution.point().to_vec())
            .collect();

        json!({
            "run": i,
            "time": self.runtime[i],
            "rundata": [{
                "idata": {
                    "evals": evals,
                    "best": best,
                },
                "isols": {
                    "evals": sols_evals,
                    "fitness": sols_fitness,
                    "genome": sols_genome,
                },
            }],
        })
    }

    /// Data of all runs as a structured record
    pub fn to_json(&self) -> Value {
        let runs: Vec<Value> = (0..self.num_runs()).map(|i| self.to_json_run(i)).collect();
        Value::Array(runs)
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}
