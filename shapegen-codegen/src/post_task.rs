//! Work that runs after generation, against the still-uncommitted results.
//!
//! Tasks are queued by name on the context, so generators can schedule them
//! while generating. Most tasks only register an after-commit callback on
//! the results; see [`crate::tasks`] for the provided ones.

use std::sync::{Mutex, PoisonError};

use eyre::Result;
use indexmap::{IndexMap, IndexSet};
use shapegen_core::GenerationLogger;
use shapegen_model::Model;

use crate::{CategorySnapshot, GenerationContext, GenerationResults};

/// A post-generate task.
pub trait PostGenerateTask: Send {
    /// `categories` is the category registry as it stood when this task
    /// started.
    fn on_after_generate(
        &self,
        ctx: &GenerationContext,
        model: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()>;

    /// Run `self`, then `next`.
    fn and_then<T>(self, next: T) -> AndThen<Self, T>
    where
        Self: Sized,
        T: PostGenerateTask,
    {
        AndThen { first: self, next }
    }
}

impl PostGenerateTask for Box<dyn PostGenerateTask> {
    fn on_after_generate(
        &self,
        ctx: &GenerationContext,
        model: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        (**self).on_after_generate(ctx, model, results, categories, logger)
    }
}

/// Sequential composition, see [`PostGenerateTask::and_then`].
pub struct AndThen<A, B> {
    first: A,
    next: B,
}

impl<A: PostGenerateTask, B: PostGenerateTask> PostGenerateTask for AndThen<A, B> {
    fn on_after_generate(
        &self,
        ctx: &GenerationContext,
        model: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        self.first
            .on_after_generate(ctx, model, results, categories, logger)?;
        self.next
            .on_after_generate(ctx, model, results, categories, logger)
    }
}

/// A task backed by a closure. Built with [`from_fn`].
pub struct FnTask<F>(F);

/// Turn a closure into a [`PostGenerateTask`].
pub fn from_fn<F>(f: F) -> FnTask<F>
where
    F: Fn(
            &GenerationContext,
            &Model,
            &GenerationResults,
            &CategorySnapshot,
            &GenerationLogger,
        ) -> Result<()>
        + Send,
{
    FnTask(f)
}

impl<F> PostGenerateTask for FnTask<F>
where
    F: Fn(
            &GenerationContext,
            &Model,
            &GenerationResults,
            &CategorySnapshot,
            &GenerationLogger,
        ) -> Result<()>
        + Send,
{
    fn on_after_generate(
        &self,
        ctx: &GenerationContext,
        model: &Model,
        results: &GenerationResults,
        categories: &CategorySnapshot,
        logger: &GenerationLogger,
    ) -> Result<()> {
        (self.0)(ctx, model, results, categories, logger)
    }
}

#[derive(Default)]
struct QueueState {
    pending: IndexMap<String, Box<dyn PostGenerateTask>>,
    finished: IndexSet<String>,
}

/// Name-keyed queue of post-generate tasks.
///
/// The first registration under a name wins. A name that has already run is
/// not accepted again, so a task cannot re-trigger itself.
#[derive(Default)]
pub struct PostTaskQueue {
    state: Mutex<QueueState>,
}

impl PostTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the task built by `factory` unless `name` is pending or has
    /// already run. `factory` is only called when the task is accepted.
    pub fn register<T, F>(&self, name: impl Into<String>, factory: F) -> bool
    where
        T: PostGenerateTask + 'static,
        F: FnOnce() -> T,
    {
        let name = name.into();
        if self.is_known(&name) {
            return false;
        }
        // built outside the lock; the factory may register tasks itself
        let task = factory();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.pending.contains_key(&name) || state.finished.contains(&name) {
            return false;
        }
        tracing::debug!("queued post-generate task '{}'", name);
        state.pending.insert(name, Box::new(task));
        true
    }

    fn is_known(&self, name: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.pending.contains_key(name) || state.finished.contains(name)
    }

    /// Number of tasks waiting to run.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run queued tasks until the queue stays empty. Tasks queued by a
    /// running task run in the next round. Returns the number of rounds.
    ///
    /// A name that ran is refused until the drain returns; afterwards it can
    /// be queued again for the next generation run.
    pub fn drain(
        &self,
        ctx: &GenerationContext,
        model: &Model,
        results: &GenerationResults,
        logger: &GenerationLogger,
    ) -> Result<usize> {
        let rounds = self.run_rounds(ctx, model, results, logger);
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .finished
            .clear();
        rounds
    }

    fn run_rounds(
        &self,
        ctx: &GenerationContext,
        model: &Model,
        results: &GenerationResults,
        logger: &GenerationLogger,
    ) -> Result<usize> {
        let mut rounds = 0;
        loop {
            let batch: Vec<(String, Box<dyn PostGenerateTask>)> = {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                let batch: Vec<_> = std::mem::take(&mut state.pending).into_iter().collect();
                state.finished.extend(batch.iter().map(|(name, _)| name.clone()));
                batch
            };
            if batch.is_empty() {
                return Ok(rounds);
            }
            rounds += 1;
            tracing::debug!("post-generate round {}: {} task(s)", rounds, batch.len());
            for (name, task) in batch {
                let categories = ctx.category_snapshot();
                task.on_after_generate(ctx, model, results, &categories, &logger.child(&name))?;
            }
        }
    }
}

impl std::fmt::Debug for PostTaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("PostTaskQueue")
            .field("pending", &state.pending.keys().collect::<Vec<_>>())
            .field("finished", &state.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shapegen_core::{Level, Settings};

    use super::*;
    use crate::testing::{RecordingSink, TestWorkspace};

    fn setup() -> (TestWorkspace, GenerationResults) {
        let ws = TestWorkspace::new();
        let ctx = Arc::new(GenerationContext::new(
            Arc::new(Settings::default()),
            ws.resolver(),
        ));
        let results = GenerationResults::empty(ctx);
        (ws, results)
    }

    fn log_task(message: &'static str) -> impl PostGenerateTask {
        from_fn(move |_, _, _, _, logger| {
            logger.info(message);
            Ok(())
        })
    }

    #[test]
    fn test_first_registration_wins() {
        let queue = PostTaskQueue::new();
        assert!(queue.register("zip", || log_task("first")));
        let mut called = false;
        assert!(!queue.register("zip", || {
            called = true;
            log_task("second")
        }));
        assert!(!called);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_drain_runs_follow_up_rounds() {
        let (_ws, results) = setup();
        let ctx = Arc::clone(results.context());
        let sink = RecordingSink::new();

        ctx.post_tasks().register("build", || {
            from_fn(|ctx, _, _, _, logger| {
                logger.info("building");
                ctx.register_path("markup", "/out/index.html");
                ctx.post_tasks().register("zip", || {
                    from_fn(|_, _, _, categories, logger| {
                        logger.info(format!("zipping {}", categories.get("markup").len()));
                        Ok(())
                    })
                });
                // already ran, ignored
                ctx.post_tasks().register("build", || log_task("again"));
                Ok(())
            })
        });

        let rounds = ctx
            .post_tasks()
            .drain(&ctx, &Model::new(), &results, &sink.logger())
            .unwrap();

        assert_eq!(rounds, 2);
        assert_eq!(
            sink.messages(Level::Info),
            vec!["build:building", "zip:zipping 1"]
        );
        assert!(ctx.post_tasks().is_empty());
    }

    struct Chain {
        step: usize,
        last: usize,
    }

    impl PostGenerateTask for Chain {
        fn on_after_generate(
            &self,
            ctx: &GenerationContext,
            _: &Model,
            _: &GenerationResults,
            _: &CategorySnapshot,
            _: &GenerationLogger,
        ) -> Result<()> {
            if self.step < self.last {
                let next = Chain {
                    step: self.step + 1,
                    last: self.last,
                };
                ctx.post_tasks()
                    .register(format!("chain-{}", next.step), || next);
            }
            Ok(())
        }
    }

    #[test]
    fn test_cascade_terminates_after_n_plus_one_rounds() {
        for n in [0, 1, 5] {
            let (_ws, results) = setup();
            let ctx = Arc::clone(results.context());
            ctx.post_tasks()
                .register("chain-0", || Chain { step: 0, last: n });

            let rounds = ctx
                .post_tasks()
                .drain(&ctx, &Model::new(), &results, &RecordingSink::new().logger())
                .unwrap();
            assert_eq!(rounds, n + 1);
        }
    }

    #[test]
    fn test_and_then_runs_in_order() {
        let (_ws, results) = setup();
        let ctx = Arc::clone(results.context());
        let sink = RecordingSink::new();

        ctx.post_tasks()
            .register("both", || log_task("one").and_then(log_task("two")));
        ctx.post_tasks()
            .drain(&ctx, &Model::new(), &results, &sink.logger())
            .unwrap();

        assert_eq!(sink.messages(Level::Info), vec!["both:one", "both:two"]);
    }

    #[test]
    fn test_drained_names_can_be_queued_again() {
        let (_ws, results) = setup();
        let ctx = Arc::clone(results.context());
        let sink = RecordingSink::new();
        ctx.post_tasks().register("index", || log_task("one"));
        ctx.post_tasks()
            .drain(&ctx, &Model::new(), &results, &sink.logger())
            .unwrap();

        assert!(ctx.post_tasks().register("index", || log_task("two")));
        ctx.post_tasks()
            .drain(&ctx, &Model::new(), &results, &sink.logger())
            .unwrap();
        assert_eq!(sink.messages(Level::Info), vec!["index:one", "index:two"]);
    }

    #[test]
    fn test_failed_drain_still_forgets_names() {
        let (_ws, results) = setup();
        let ctx = Arc::clone(results.context());
        ctx.post_tasks()
            .register("broken", || from_fn(|_, _, _, _, _| Err(eyre::eyre!("boom"))));
        assert!(
            ctx.post_tasks()
                .drain(&ctx, &Model::new(), &results, &RecordingSink::new().logger())
                .is_err()
        );
        assert!(ctx.post_tasks().register("broken", || log_task("fixed")));
    }

    #[test]
    fn test_failing_task_propagates() {
        let (_ws, results) = setup();
        let ctx = Arc::clone(results.context());
        ctx.post_tasks()
            .register("broken", || from_fn(|_, _, _, _, _| Err(eyre::eyre!("boom"))));

        let err = ctx
            .post_tasks()
            .drain(&ctx, &Model::new(), &results, &RecordingSink::new().logger())
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
