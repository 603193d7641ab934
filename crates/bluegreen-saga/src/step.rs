use crate::action::{Action, BoxedAction};

/// One entry of a saga: a forward action plus an optional compensation.
///
/// The compensation undoes this step's effect and runs only when a *later*
/// step fails. A failing forward action never triggers its own step's
/// compensation. A step without a compensation is non-reversible: once its
/// forward action succeeded, the effect stands.
///
/// A step marked as a pivot is the point of no return. Once its forward
/// action succeeds, all compensations registered up to and including it are
/// discarded, so a later failure leaves the completed work in place.
pub struct Step<Ctx, Err> {
    name: &'static str,
    forward: BoxedAction<Ctx, Err>,
    compensate: Option<BoxedAction<Ctx, Err>>,
    pivot: bool,
}

impl<Ctx, Err> Step<Ctx, Err> {
    /// Create a non-reversible step from its forward action.
    #[must_use]
    pub fn new<A>(name: &'static str, forward: A) -> Self
    where
        A: Action<Context = Ctx, Error = Err> + 'static,
    {
        Self {
            name,
            forward: Box::new(forward),
            compensate: None,
            pivot: false,
        }
    }

    /// Register the action that undoes this step if a later step fails.
    #[must_use]
    pub fn with_compensation<A>(mut self, compensate: A) -> Self
    where
        A: Action<Context = Ctx, Error = Err> + 'static,
    {
        self.compensate = Some(Box::new(compensate));
        self
    }

    /// Mark this step as the point of no return.
    #[must_use]
    pub fn as_pivot(mut self) -> Self {
        self.pivot = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn has_compensation(&self) -> bool {
        self.compensate.is_some()
    }

    #[must_use]
    pub fn is_pivot(&self) -> bool {
        self.pivot
    }

    /// Description of what the compensation does, if there is one.
    #[must_use]
    pub fn compensation_description(&self) -> Option<String> {
        self.compensate.as_ref().map(|action| action.describe())
    }

    pub(crate) fn run_forward(&self, ctx: &Ctx) -> Result<(), Err> {
        self.forward.execute(ctx)
    }

    pub(crate) fn run_compensation(&self, ctx: &Ctx) -> Option<Result<(), Err>> {
        self.compensate.as_ref().map(|action| action.execute(ctx))
    }
}

impl<Ctx, Err> std::fmt::Debug for Step<Ctx, Err> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("forward", &self.forward.describe())
            .field("compensate", &self.compensation_description())
            .field("pivot", &self.pivot)
            .finish()
    }
}
