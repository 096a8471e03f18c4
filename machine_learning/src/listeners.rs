use log::info;

/// Gets notified every time an optimization iteration completes.
pub trait IterationListener {
    /// Called once per completed iteration.
    ///
    /// # Arguments
    /// * `iteration` - The index of the iteration that just completed.
    /// * `score` - The score of the model after that iteration.
    fn iteration_done(&self, iteration: usize, score: f32);
}

/// Logs the score every `print_every` iterations.
#[derive(Debug, Clone, Copy)]
pub struct ScoreIterationListener {
    print_every: usize,
}

impl ScoreIterationListener {
    /// Creates a new `ScoreIterationListener`.
    ///
    /// # Arguments
    /// * `print_every` - The period in iterations between logs, zero behaves like one.
    ///
    /// # Returns
    /// A new `ScoreIterationListener` instance.
    pub fn new(print_every: usize) -> Self {
        Self {
            print_every: print_every.max(1),
        }
    }

    /// Whether the given iteration gets logged.
    pub fn reports(&self, iteration: usize) -> bool {
        iteration % self.print_every == 0
    }
}

impl Default for ScoreIterationListener {
    fn default() -> Self {
        Self::new(10)
    }
}

impl IterationListener for ScoreIterationListener {
    fn iteration_done(&self, iteration: usize, score: f32) {
        if self.reports(iteration) {
            info!(iteration = iteration, score = score; "score at iteration {iteration} is {score}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_period() {
        let listener = ScoreIterationListener::new(3);
        let reported: Vec<_> = (0..10).filter(|&i| listener.reports(i)).collect();
        assert_eq!(reported, [0, 3, 6, 9]);
    }

    #[test]
    fn zero_period_reports_always() {
        let listener = ScoreIterationListener::new(0);
        assert!((0..5).all(|i| listener.reports(i)));
    }
}
