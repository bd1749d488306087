/// Trait for the pure filter/transform evaluated by scan workers.
///
/// A [`Transform`] is applied independently to each work item by whichever scan
/// worker receives it; there is no shared mutable state and no defined order.
/// Implementations must be pure and total over their input domain - the engine
/// has no recovery policy for a failing predicate because predicates cannot
/// fail.
pub trait Transform: Send + Sync + 'static {
    /// The type of work item this transform consumes.
    type Item: Send + 'static;
    /// The type of partial result this transform produces.
    type Partial: Send + 'static;

    /// Evaluates one work item.
    ///
    /// Returning `None` means the item contributes nothing to the final
    /// accumulator and no partial result is forwarded to the reducer.
    fn apply(&self, item: Self::Item) -> Option<Self::Partial>;
}
