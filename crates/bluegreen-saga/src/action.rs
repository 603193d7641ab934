/// A single side-effecting operation that a [`Step`](crate::Step) performs,
/// either going forward or when undoing an earlier step.
///
/// Actions receive a shared context carrying their dependencies and
/// report success or failure. They hold no mutable state of their own, so a
/// saga can be tested with substitute actions that only record calls.
pub trait Action: Send + Sync {
    /// Shared dependencies the action operates on.
    type Context;

    /// Error type for action failures.
    type Error;

    /// Perform the action.
    ///
    /// # Errors
    ///
    /// Returns an error if the action could not be completed.
    fn execute(&self, ctx: &Self::Context) -> Result<(), Self::Error>;

    /// Human-readable description for audit records and error messages.
    fn describe(&self) -> String;
}

/// Boxed action with erased concrete type.
pub type BoxedAction<Ctx, Err> = Box<dyn Action<Context = Ctx, Error = Err>>;

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct Counter;

    struct Increment;

    impl Action for Increment {
        type Context = Cell<u32>;
        type Error = Counter;

        fn execute(&self, ctx: &Self::Context) -> Result<(), Self::Error> {
            ctx.set(ctx.get() + 1);
            Ok(())
        }

        fn describe(&self) -> String {
            "increment".to_string()
        }
    }

    #[test]
    fn boxed_action_executes_against_context() {
        let ctx = Cell::new(0);
        let action: BoxedAction<Cell<u32>, Counter> = Box::new(Increment);

        assert!(action.execute(&ctx).is_ok());
        assert!(action.execute(&ctx).is_ok());

        assert_eq!(ctx.get(), 2);
        assert_eq!(action.describe(), "increment");
    }
}
