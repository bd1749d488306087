/// Control decision returned by [`Reduce::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// Keep merging partial results.
    Continue,
    /// The target condition is met; the pipeline should stop producing work.
    Done,
}

/// Trait for folding partial results into the final accumulator.
///
/// The reduce worker owns the implementation exclusively and is the only task
/// that ever calls [`Reduce::merge`]. Partial results arrive in no defined
/// order relative to the input, so `merge` must be associative and commutative
/// for the final output to be independent of scheduling.
pub trait Reduce: Send + 'static {
    /// The type of partial result this reducer folds.
    type Partial: Send + 'static;
    /// The type of the final accumulator returned by [`Reduce::finish`].
    type Output: Send + 'static;

    /// Folds one partial result into the accumulator.
    ///
    /// Returning [`Fold::Done`] requests early termination of the run; the
    /// reduce worker keeps draining the result channel afterwards but stops
    /// merging.
    fn merge(&mut self, partial: Self::Partial) -> Fold;

    /// Consumes the reducer and returns the final accumulator.
    fn finish(self) -> Self::Output;
}
