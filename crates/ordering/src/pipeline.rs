//! Command pipeline: behaviors that wrap a command handler.
//!
//! The pipeline runs its behaviors outermost first, then the handler:
//!
//! ```text
//! LoggingBehavior -> ValidationBehavior -> handler
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::command::{Command, CommandHandler};
use crate::error::{OrderingError, Result};
use crate::validation::Validator;

/// The rest of the pipeline, as seen from one behavior.
pub struct Next<'a, C: Command> {
    behaviors: &'a [Arc<dyn PipelineBehavior<C>>],
    handler: &'a dyn CommandHandler<C>,
}

impl<C: Command> Next<'_, C> {
    /// Runs the remaining behaviors and then the handler.
    pub async fn run(self, command: C) -> Result<C::Output> {
        match self.behaviors.split_first() {
            Some((behavior, rest)) => {
                behavior
                    .handle(
                        command,
                        Next {
                            behaviors: rest,
                            handler: self.handler,
                        },
                    )
                    .await
            }
            None => self.handler.handle(command).await,
        }
    }
}

/// A cross-cutting step around command handling.
#[async_trait]
pub trait PipelineBehavior<C: Command>: Send + Sync {
    async fn handle(&self, command: C, next: Next<'_, C>) -> Result<C::Output>;
}

/// Logs the start, completion and failure of every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl<C: Command> PipelineBehavior<C> for LoggingBehavior {
    async fn handle(&self, command: C, next: Next<'_, C>) -> Result<C::Output> {
        tracing::info!(command = C::NAME, "handling command");
        let start = Instant::now();

        let result = next.run(command).await;

        let elapsed = start.elapsed();
        metrics::histogram!("command_duration_seconds", "command" => C::NAME)
            .record(elapsed.as_secs_f64());
        match &result {
            Ok(_) => tracing::info!(
                command = C::NAME,
                elapsed_ms = elapsed.as_millis() as u64,
                "command handled"
            ),
            Err(err) => tracing::warn!(command = C::NAME, error = %err, "command failed"),
        }

        result
    }
}

/// Runs every validator and rejects the command if any rule is broken.
pub struct ValidationBehavior<C> {
    validators: Vec<Arc<dyn Validator<C>>>,
}

impl<C> ValidationBehavior<C> {
    pub fn new(validators: Vec<Arc<dyn Validator<C>>>) -> Self {
        Self { validators }
    }
}

#[async_trait]
impl<C: Command> PipelineBehavior<C> for ValidationBehavior<C> {
    async fn handle(&self, command: C, next: Next<'_, C>) -> Result<C::Output> {
        let failures: Vec<_> = self
            .validators
            .iter()
            .flat_map(|v| v.validate(&command))
            .collect();

        if !failures.is_empty() {
            metrics::counter!("command_validation_failures_total", "command" => C::NAME)
                .increment(1);
            tracing::warn!(
                command = C::NAME,
                failures = failures.len(),
                "command rejected by validation"
            );
            return Err(OrderingError::Validation {
                command: C::NAME,
                failures,
            });
        }

        next.run(command).await
    }
}

/// A command handler wrapped in logging and validation.
pub struct Pipeline<C: Command> {
    behaviors: Vec<Arc<dyn PipelineBehavior<C>>>,
    handler: Arc<dyn CommandHandler<C>>,
}

impl<C: Command> Pipeline<C> {
    /// Wraps `handler` as `Logging -> Validation(validators) -> handler`.
    pub fn new(
        handler: Arc<dyn CommandHandler<C>>,
        validators: Vec<Arc<dyn Validator<C>>>,
    ) -> Self {
        Self {
            behaviors: vec![
                Arc::new(LoggingBehavior),
                Arc::new(ValidationBehavior::new(validators)),
            ],
            handler,
        }
    }
}

#[async_trait]
impl<C: Command> CommandHandler<C> for Pipeline<C> {
    async fn handle(&self, command: C) -> Result<C::Output> {
        Next {
            behaviors: &self.behaviors,
            handler: self.handler.as_ref(),
        }
        .run(command)
        .await
    }
}
