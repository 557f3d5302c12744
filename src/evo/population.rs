//! Double-buffered population with selection, elitism and best tracking.
//!
//! A [`Population`] owns two buffers of candidates: the current generation
//! and the children being produced from it. Selection copies chosen members
//! into the child buffer, the caller varies children in place, and
//! [`replace`](Population::replace) swaps the buffers in O(1) (plus
//! O(n log k) for elitism).
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --init--> Ready --select--> Selected --replace--> Ready
//! ```
//!
//! Calling an operation in the wrong state is a programming error and
//! panics.

use super::elitism::{fittest_indices, least_fit_indices};
use super::selection::SelectionOperator;
use super::types::{index_of_max, FitnessFunction};
use crate::error::SearchError;
use crate::operators::Initializer;
use crate::problem::{Problem, SolutionCostPair};
use crate::random::{split_rng, SearchRng};
use crate::tracker::ProgressTracker;
use std::sync::Arc;

/// Cost type of the problem behind a fitness function.
pub type CostOf<T, F> = <<F as FitnessFunction<T>>::Problem as Problem<T>>::Cost;

/// Tracker type shared by every search over `T` scored with `F`.
pub type TrackerOf<T, F> = Arc<ProgressTracker<T, CostOf<T, F>>>;

/// Lifecycle state of a [`Population`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationState {
    /// No candidates yet; call [`Population::init`].
    Uninitialized,
    /// The current generation is evaluated and ready for selection.
    Ready,
    /// Children have been selected and may be varied.
    Selected,
}

#[derive(Debug, Clone)]
struct MostFit<T, C, Fit> {
    pair: SolutionCostPair<T, C>,
    fitness: Fit,
}

/// A fixed-size population of candidate solutions.
///
/// # Type Parameters
///
/// - `T`: candidate representation
/// - `I`: initializer creating random candidates
/// - `F`: fitness function (shared by `Arc` with split copies)
/// - `S`: selection operator
pub struct Population<T, I, F, S>
where
    F: FitnessFunction<T>,
{
    initializer: I,
    fitness_fn: Arc<F>,
    selection: S,
    tracker: TrackerOf<T, F>,
    rng: SearchRng,
    size: usize,
    elite_count: usize,
    current: Vec<T>,
    current_fitness: Vec<F::Fitness>,
    children: Vec<T>,
    child_fitness: Vec<F::Fitness>,
    selected: Vec<usize>,
    most_fit: Option<MostFit<T, CostOf<T, F>, F::Fitness>>,
    state: PopulationState,
}

impl<T, I, F, S> Population<T, I, F, S>
where
    T: Clone,
    I: Initializer<T>,
    F: FitnessFunction<T>,
    S: SelectionOperator,
{
    /// Creates an uninitialized population.
    ///
    /// # Errors
    /// - [`SearchError::PopulationSize`] if `size == 0`
    /// - [`SearchError::EliteCount`] if `elite_count >= size`
    pub fn new(
        size: usize,
        elite_count: usize,
        initializer: I,
        fitness_fn: Arc<F>,
        selection: S,
        tracker: TrackerOf<T, F>,
        rng: SearchRng,
    ) -> Result<Self, SearchError> {
        if size == 0 {
            return Err(SearchError::PopulationSize { size });
        }
        if elite_count >= size {
            return Err(SearchError::EliteCount {
                elite_count,
                population_size: size,
            });
        }
        Ok(Self {
            initializer,
            fitness_fn,
            selection,
            tracker,
            rng,
            size,
            elite_count,
            current: Vec::with_capacity(size),
            current_fitness: Vec::with_capacity(size),
            children: Vec::with_capacity(size),
            child_fitness: Vec::with_capacity(size),
            selected: vec![0; size],
            most_fit: None,
            state: PopulationState::Uninitialized,
        })
    }

    /// Fills the population with fresh random candidates and evaluates them.
    ///
    /// May be called in any state; it discards the previous generation. The
    /// most-fit record survives, so its fitness never decreases.
    pub fn init(&mut self) {
        self.current.clear();
        self.current_fitness.clear();
        self.children.clear();
        self.child_fitness.clear();
        for _ in 0..self.size {
            let candidate = self.initializer.create_candidate(&mut self.rng);
            self.current_fitness.push(self.fitness_fn.fitness(&candidate));
            self.current.push(candidate);
        }
        self.state = PopulationState::Ready;
        self.update_most_fit();
    }

    /// Prepares the selection operator for a run of `expected_generations`.
    pub fn init_operators(&mut self, expected_generations: usize) {
        self.selection.init(expected_generations);
    }

    /// Selects the next generation's parents into the child buffer.
    ///
    /// # Panics
    /// Panics unless the population is [`Ready`](PopulationState::Ready).
    pub fn select(&mut self) {
        assert_eq!(
            self.state,
            PopulationState::Ready,
            "select requires an initialized population that is not already selected"
        );
        self.selection
            .select(&self.current_fitness, &mut self.selected, &mut self.rng);

        if self.children.len() == self.size {
            for (slot, &i) in self.children.iter_mut().zip(&self.selected) {
                slot.clone_from(&self.current[i]);
            }
        } else {
            self.children = self.selected.iter().map(|&i| self.current[i].clone()).collect();
        }
        self.child_fitness.clear();
        self.child_fitness
            .extend(self.selected.iter().map(|&i| self.current_fitness[i]));
        self.state = PopulationState::Selected;
    }

    /// Candidate `i`: the child after selection, otherwise the current member.
    ///
    /// # Panics
    /// Panics if `i >= size()` or the population is uninitialized.
    pub fn candidate(&self, i: usize) -> &T {
        match self.state {
            PopulationState::Selected => &self.children[i],
            _ => &self.current[i],
        }
    }

    /// Mutable access to child `i`.
    ///
    /// Call [`update_fitness`](Self::update_fitness) after changing it.
    ///
    /// # Panics
    /// Panics unless the population is [`Selected`](PopulationState::Selected)
    /// or if `i >= size()`.
    pub fn candidate_mut(&mut self, i: usize) -> &mut T {
        self.assert_selected();
        &mut self.children[i]
    }

    /// Mutable access to two distinct children at once, for crossover.
    ///
    /// # Panics
    /// Panics if `i == j`, either index is out of range, or the population
    /// is not [`Selected`](PopulationState::Selected).
    pub fn candidate_pair_mut(&mut self, i: usize, j: usize) -> (&mut T, &mut T) {
        self.assert_selected();
        assert_ne!(i, j, "crossover requires two distinct candidates");
        if i < j {
            let (head, tail) = self.children.split_at_mut(j);
            (&mut head[i], &mut tail[0])
        } else {
            let (head, tail) = self.children.split_at_mut(i);
            (&mut tail[0], &mut head[j])
        }
    }

    /// Fitness of current-generation member `i`.
    ///
    /// # Panics
    /// Panics if `i >= size()` or the population is uninitialized.
    pub fn fitness(&self, i: usize) -> F::Fitness {
        self.current_fitness[i]
    }

    /// Fitness recorded for child `i`.
    ///
    /// # Panics
    /// Panics unless the population is [`Selected`](PopulationState::Selected)
    /// or if `i >= size()`.
    pub fn child_fitness(&self, i: usize) -> F::Fitness {
        self.assert_selected();
        self.child_fitness[i]
    }

    /// Re-evaluates child `i` after it was varied.
    ///
    /// # Panics
    /// Panics unless the population is [`Selected`](PopulationState::Selected)
    /// or if `i >= size()`.
    pub fn update_fitness(&mut self, i: usize) {
        self.assert_selected();
        self.child_fitness[i] = self.fitness_fn.fitness(&self.children[i]);
    }

    /// Makes the children the current generation.
    ///
    /// With `elite_count = k > 0`, the `k` fittest current members first
    /// overwrite the `k` least-fit children, so the best fitness never
    /// decreases from one generation to the next.
    ///
    /// # Panics
    /// Panics unless the population is [`Selected`](PopulationState::Selected).
    pub fn replace(&mut self) {
        self.assert_selected();
        if self.elite_count > 0 {
            let elites = fittest_indices(&self.current_fitness, self.elite_count);
            let victims = least_fit_indices(&self.child_fitness, self.elite_count);
            for (&victim, &elite) in victims.iter().zip(&elites) {
                // The old generation is discarded below, so moving is enough.
                std::mem::swap(&mut self.children[victim], &mut self.current[elite]);
                self.child_fitness[victim] = self.current_fitness[elite];
            }
        }
        std::mem::swap(&mut self.current, &mut self.children);
        std::mem::swap(&mut self.current_fitness, &mut self.child_fitness);
        self.state = PopulationState::Ready;
        self.update_most_fit();
    }

    /// Fitness of the most fit candidate this population has held.
    pub fn fitness_of_most_fit(&self) -> Option<F::Fitness> {
        self.most_fit.as_ref().map(|m| m.fitness)
    }

    /// The most fit candidate this population has held, with its cost.
    pub fn most_fit(&self) -> Option<&SolutionCostPair<T, CostOf<T, F>>> {
        self.most_fit.as_ref().map(|m| &m.pair)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of children the caller may vary after each selection.
    pub fn mutable_size(&self) -> usize {
        self.size
    }

    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    pub fn state(&self) -> PopulationState {
        self.state
    }

    pub fn initializer(&self) -> &I {
        &self.initializer
    }

    pub fn fitness_function(&self) -> &Arc<F> {
        &self.fitness_fn
    }

    pub fn progress_tracker(&self) -> &TrackerOf<T, F> {
        &self.tracker
    }

    pub fn set_progress_tracker(&mut self, tracker: TrackerOf<T, F>) {
        self.tracker = tracker;
    }

    /// Creates an independent, uninitialized population for another worker.
    ///
    /// The copy shares the fitness function and the progress tracker; its
    /// initializer and selection operator are split and its random stream
    /// is derived from this one.
    pub fn split(&mut self) -> Self {
        Self {
            initializer: self.initializer.split(),
            fitness_fn: Arc::clone(&self.fitness_fn),
            selection: self.selection.split(),
            tracker: Arc::clone(&self.tracker),
            rng: split_rng(&mut self.rng),
            size: self.size,
            elite_count: self.elite_count,
            current: Vec::with_capacity(self.size),
            current_fitness: Vec::with_capacity(self.size),
            children: Vec::with_capacity(self.size),
            child_fitness: Vec::with_capacity(self.size),
            selected: vec![0; self.size],
            most_fit: None,
            state: PopulationState::Uninitialized,
        }
    }

    fn assert_selected(&self) {
        assert_eq!(
            self.state,
            PopulationState::Selected,
            "children are only accessible between select and replace"
        );
    }

    fn update_most_fit(&mut self) {
        let Some(i) = index_of_max(&self.current_fitness) else {
            return;
        };
        let fitness = self.current_fitness[i];
        let improved = match &self.most_fit {
            Some(m) => fitness > m.fitness,
            None => true,
        };
        if !improved {
            return;
        }
        let problem = self.fitness_fn.problem();
        let candidate = &self.current[i];
        let cost = problem.cost(candidate);
        self.tracker
            .update(cost, candidate, problem.is_min_cost(cost));
        self.most_fit = Some(MostFit {
            pair: SolutionCostPair::new(candidate.clone(), cost),
            fitness,
        });
    }
}
