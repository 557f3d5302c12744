//! Generational evolutionary loop execution.
//!
//! [`GenerationalEa`] orchestrates the complete evolutionary process:
//! initialization → selection → crossover → mutation → evaluation →
//! elitist replacement → repeat. It is assembled by [`EaBuilder`].

use super::config::EaConfig;
use super::population::{CostOf, Population, PopulationState, TrackerOf};
use super::selection::SelectionOperator;
use super::types::{Fitness, FitnessFunction};
use crate::error::SearchError;
use crate::operators::bits::{BitFlipMutation, BitVectorInitializer};
use crate::operators::{CrossoverOperator, Initializer, MutationOperator};
use crate::problem::SolutionCostPair;
use crate::random::{rng_from_option, split_rng, SearchRng};
use crate::search::Metaheuristic;
use crate::tracker::ProgressTracker;
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, trace};

/// Why an evolutionary run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// All requested generations were executed.
    MaxGenerations,
    /// The progress tracker was stopped.
    Stopped,
    /// A solution with the problem's minimum cost was recorded.
    FoundBest,
    /// The configured wall-clock limit elapsed.
    TimeLimit,
}

/// Result of an evolutionary run.
#[derive(Debug, Clone)]
pub struct EaResult<T, C> {
    /// The most fit candidate the population has held, with its cost.
    ///
    /// `None` when the run did not start because the tracker was already
    /// stopped or had already found an optimal solution.
    pub best: Option<SolutionCostPair<T, C>>,

    /// Fitness of `best`.
    pub best_fitness: Option<f64>,

    /// Number of generations executed.
    pub generations: usize,

    pub stop_reason: StopReason,

    /// Best fitness before the first generation and after each one.
    pub fitness_history: Vec<f64>,
}

impl<T, C> EaResult<T, C> {
    fn not_started(stop_reason: StopReason) -> Self {
        Self {
            best: None,
            best_fitness: None,
            generations: 0,
            stop_reason,
            fitness_history: Vec::new(),
        }
    }
}

/// Assembles a [`GenerationalEa`] from a configuration and its operators.
///
/// Every operator is required; [`build`](Self::build) reports the first
/// missing one as [`SearchError::MissingDependency`].
pub struct EaBuilder<T, I, F, S, M, X>
where
    F: FitnessFunction<T>,
{
    config: EaConfig,
    initializer: Option<I>,
    fitness_fn: Option<Arc<F>>,
    selection: Option<S>,
    mutation: Option<M>,
    crossover: Option<X>,
    tracker: Option<TrackerOf<T, F>>,
}

impl<T, I, F, S, M, X> EaBuilder<T, I, F, S, M, X>
where
    F: FitnessFunction<T>,
{
    pub fn new(config: EaConfig) -> Self {
        Self {
            config,
            initializer: None,
            fitness_fn: None,
            selection: None,
            mutation: None,
            crossover: None,
            tracker: None,
        }
    }

    pub fn initializer(mut self, initializer: I) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn fitness_function(mut self, fitness_fn: F) -> Self {
        self.fitness_fn = Some(Arc::new(fitness_fn));
        self
    }

    /// Uses a fitness function already shared with other searches.
    pub fn shared_fitness_function(mut self, fitness_fn: Arc<F>) -> Self {
        self.fitness_fn = Some(fitness_fn);
        self
    }

    pub fn selection(mut self, selection: S) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn mutation(mut self, mutation: M) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn crossover(mut self, crossover: X) -> Self {
        self.crossover = Some(crossover);
        self
    }

    /// Reports progress to `tracker` instead of a fresh one.
    pub fn progress_tracker(mut self, tracker: TrackerOf<T, F>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    /// Validates the configuration and assembles the algorithm.
    ///
    /// # Errors
    /// - any error from [`EaConfig::validate`]
    /// - [`SearchError::MissingDependency`] naming the first missing operator
    pub fn build(self) -> Result<GenerationalEa<T, I, F, S, M, X>, SearchError>
    where
        T: Clone,
        I: Initializer<T>,
        S: SelectionOperator,
        M: MutationOperator<T>,
        X: CrossoverOperator<T>,
    {
        self.config.validate()?;
        let initializer = self
            .initializer
            .ok_or(SearchError::MissingDependency("initializer"))?;
        let fitness_fn = self
            .fitness_fn
            .ok_or(SearchError::MissingDependency("fitness function"))?;
        let selection = self
            .selection
            .ok_or(SearchError::MissingDependency("selection operator"))?;
        let crossover = self
            .crossover
            .ok_or(SearchError::MissingDependency("crossover operator"))?;
        let mutation = self
            .mutation
            .ok_or(SearchError::MissingDependency("mutation operator"))?;
        let tracker = self.tracker.unwrap_or_else(ProgressTracker::shared);

        let mut rng = rng_from_option(self.config.seed);
        let population = Population::new(
            self.config.population_size,
            self.config.elite_count,
            initializer,
            fitness_fn,
            selection,
            tracker,
            split_rng(&mut rng),
        )?;
        Ok(GenerationalEa {
            population,
            mutation,
            crossover,
            config: self.config,
            rng,
            changed: Vec::new(),
            run_length: 0,
        })
    }
}

/// A generational evolutionary algorithm with optional elitism.
///
/// Each generation:
///
/// 1. selects `n` parents into the child buffer,
/// 2. crosses children `(2i, 2i + 1)` with probability `crossover_rate`,
/// 3. mutates each child with probability `mutation_rate`,
/// 4. re-evaluates the children that changed,
/// 5. replaces the population, keeping `elite_count` elites.
///
/// The run checks the shared [`ProgressTracker`] between generations and
/// stops early when it is stopped or an optimal solution has been found.
pub struct GenerationalEa<T, I, F, S, M, X>
where
    F: FitnessFunction<T>,
{
    population: Population<T, I, F, S>,
    mutation: M,
    crossover: X,
    config: EaConfig,
    rng: SearchRng,
    changed: Vec<bool>,
    run_length: usize,
}

impl<T, I, F, S, M, X> GenerationalEa<T, I, F, S, M, X>
where
    T: Clone,
    I: Initializer<T>,
    F: FitnessFunction<T>,
    S: SelectionOperator,
    M: MutationOperator<T>,
    X: CrossoverOperator<T>,
{
    /// Runs up to `max_generations` from a freshly initialized population.
    ///
    /// Returns `None` without doing any work if the progress tracker is
    /// already stopped or has already recorded an optimal solution.
    ///
    /// The population's most-fit record is kept across runs, so the result
    /// is the best candidate of every run of this instance so far, not only
    /// of this one.
    pub fn optimize(&mut self, max_generations: usize) -> Option<SolutionCostPair<T, CostOf<T, F>>> {
        self.run(max_generations).best
    }

    /// Like [`optimize`](Self::optimize) but continues from the current
    /// population. Initializes first if the population is still empty.
    pub fn reoptimize(
        &mut self,
        max_generations: usize,
    ) -> Option<SolutionCostPair<T, CostOf<T, F>>> {
        self.rerun(max_generations).best
    }

    /// Runs up to `max_generations` and reports statistics.
    #[instrument(level = "debug", skip(self), fields(population_size = self.config.population_size))]
    pub fn run(&mut self, max_generations: usize) -> EaResult<T, CostOf<T, F>> {
        if let Some(reason) = self.blocked() {
            return EaResult::not_started(reason);
        }
        self.population.init_operators(max_generations);
        self.population.init();
        self.evolve(max_generations)
    }

    /// Continues the current population for up to `max_generations`.
    #[instrument(level = "debug", skip(self), fields(population_size = self.config.population_size))]
    pub fn rerun(&mut self, max_generations: usize) -> EaResult<T, CostOf<T, F>> {
        if self.population.state() == PopulationState::Uninitialized {
            return self.run(max_generations);
        }
        if let Some(reason) = self.blocked() {
            return EaResult::not_started(reason);
        }
        self.population.init_operators(max_generations);
        self.evolve(max_generations)
    }

    fn blocked(&self) -> Option<StopReason> {
        let tracker = self.population.progress_tracker();
        if tracker.is_stopped() {
            Some(StopReason::Stopped)
        } else if tracker.did_find_best() {
            Some(StopReason::FoundBest)
        } else {
            None
        }
    }

    fn evolve(&mut self, max_generations: usize) -> EaResult<T, CostOf<T, F>> {
        let tracker = Arc::clone(self.population.progress_tracker());
        let started = Instant::now();
        let limit = self.config.time_limit_ms.map(Duration::from_millis);

        let mut fitness_history = Vec::with_capacity(max_generations.min(1 << 16) + 1);
        fitness_history.push(self.best_fitness_f64());

        let mut stop_reason = StopReason::MaxGenerations;
        let mut generations = 0;
        while generations < max_generations {
            if tracker.is_stopped() {
                stop_reason = StopReason::Stopped;
                break;
            }
            if tracker.did_find_best() {
                stop_reason = StopReason::FoundBest;
                break;
            }
            if limit.is_some_and(|l| started.elapsed() >= l) {
                stop_reason = StopReason::TimeLimit;
                break;
            }

            self.generation();
            generations += 1;
            self.run_length += 1;

            let best = self.best_fitness_f64();
            fitness_history.push(best);
            trace!(generation = generations, best_fitness = best, "generation complete");
        }

        if stop_reason != StopReason::MaxGenerations {
            info!(?stop_reason, generations, "evolutionary run stopped early");
        }

        EaResult {
            best: self.population.most_fit().cloned(),
            best_fitness: self.population.fitness_of_most_fit().map(Fitness::to_f64),
            generations,
            stop_reason,
            fitness_history,
        }
    }

    fn generation(&mut self) {
        self.population.select();

        let n = self.population.mutable_size();
        self.changed.clear();
        self.changed.resize(n, false);

        let crossover_p = self.config.crossover_rate.min(1.0);
        for i in (0..n.saturating_sub(1)).step_by(2) {
            if self.rng.random_bool(crossover_p) {
                let (first, second) = self.population.candidate_pair_mut(i, i + 1);
                self.crossover.cross(first, second, &mut self.rng);
                self.changed[i] = true;
                self.changed[i + 1] = true;
            }
        }

        for i in 0..n {
            if self.rng.random_bool(self.config.mutation_rate) {
                self.mutation
                    .mutate(self.population.candidate_mut(i), &mut self.rng);
                self.changed[i] = true;
            }
        }

        for i in 0..n {
            if self.changed[i] {
                self.population.update_fitness(i);
            }
        }

        self.population.replace();
    }

    fn best_fitness_f64(&self) -> f64 {
        self.population
            .fitness_of_most_fit()
            .map_or(f64::NEG_INFINITY, Fitness::to_f64)
    }

    /// Creates an independent copy for another worker.
    ///
    /// The copy shares the progress tracker and fitness function, splits
    /// every operator, derives its random stream from this one, and starts
    /// with an uninitialized population and a zero run length.
    pub fn split(&mut self) -> Self {
        Self {
            population: self.population.split(),
            mutation: self.mutation.split(),
            crossover: self.crossover.split(),
            config: self.config.clone(),
            rng: split_rng(&mut self.rng),
            changed: Vec::new(),
            run_length: 0,
        }
    }

    /// Total generations executed across all runs of this instance.
    pub fn total_run_length(&self) -> usize {
        self.run_length
    }

    pub fn population(&self) -> &Population<T, I, F, S> {
        &self.population
    }

    pub fn config(&self) -> &EaConfig {
        &self.config
    }

    pub fn progress_tracker(&self) -> &TrackerOf<T, F> {
        self.population.progress_tracker()
    }

    pub fn set_progress_tracker(&mut self, tracker: TrackerOf<T, F>) {
        self.population.set_progress_tracker(tracker);
    }
}

impl<T, I, F, S, M, X> Metaheuristic for GenerationalEa<T, I, F, S, M, X>
where
    T: Clone + Send + Sync,
    I: Initializer<T> + Send,
    F: FitnessFunction<T>,
    S: SelectionOperator + Send,
    M: MutationOperator<T> + Send,
    X: CrossoverOperator<T> + Send,
{
    type Solution = T;
    type Cost = CostOf<T, F>;

    fn search(&mut self, budget: usize) -> Option<SolutionCostPair<T, Self::Cost>> {
        self.optimize(budget)
    }

    fn fork(&mut self) -> Self {
        self.split()
    }

    fn tracker(&self) -> &Arc<ProgressTracker<T, Self::Cost>> {
        self.progress_tracker()
    }

    fn run_length(&self) -> usize {
        self.total_run_length()
    }
}

/// A genetic algorithm over fixed-length bit vectors.
pub type GeneticAlgorithm<F, S, X> =
    GenerationalEa<Vec<bool>, BitVectorInitializer, F, S, BitFlipMutation, X>;

impl<F, S, X> GenerationalEa<Vec<bool>, BitVectorInitializer, F, S, BitFlipMutation, X>
where
    F: FitnessFunction<Vec<bool>>,
    S: SelectionOperator,
    X: CrossoverOperator<Vec<bool>>,
{
    /// Creates a genetic algorithm over `bit_length`-bit vectors.
    ///
    /// Every child is mutated by flipping each bit with probability
    /// `bit_flip_rate`; the configured `mutation_rate` is ignored.
    ///
    /// # Errors
    /// - [`SearchError::MutationRate`] unless `0 <= bit_flip_rate < 1`
    /// - any error from [`EaConfig::validate`]
    ///
    /// # Examples
    ///
    /// ```
    /// use u_evosearch::evo::{EaConfig, GeneticAlgorithm, NegativeCostFitness, Selection};
    /// use u_evosearch::operators::bits::SinglePointCrossover;
    /// use u_evosearch::problems::OneMax;
    ///
    /// let config = EaConfig::default().with_population_size(20).with_seed(42);
    /// let mut ga = GeneticAlgorithm::new(
    ///     config,
    ///     16,
    ///     0.05,
    ///     NegativeCostFitness::new(OneMax),
    ///     Selection::Tournament(2),
    ///     SinglePointCrossover,
    /// )
    /// .unwrap();
    /// let best = ga.optimize(50).unwrap();
    /// assert_eq!(best.solution().len(), 16);
    /// ```
    pub fn new(
        config: EaConfig,
        bit_length: usize,
        bit_flip_rate: f64,
        fitness_fn: F,
        selection: S,
        crossover: X,
    ) -> Result<Self, SearchError> {
        let mutation = BitFlipMutation::new(bit_flip_rate)?;
        EaBuilder::new(config.with_mutation_rate(1.0))
            .initializer(BitVectorInitializer::new(bit_length))
            .fitness_function(fitness_fn)
            .selection(selection)
            .mutation(mutation)
            .crossover(crossover)
            .build()
    }

    /// Length of the bit vectors evolved.
    pub fn bit_length(&self) -> usize {
        self.population.initializer().length()
    }
}
