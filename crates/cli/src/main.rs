//! `stevedore` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   — start the API server.
//! - `worker`  — drain the job queue.
//! - `migrate` — run pending database migrations.

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::AppState;
use config::{DatabaseArgs, QueueArgs};
use db::{InMemoryTaskStore, PgTaskStore, TaskStore};
use queue::{InMemoryQueue, JobQueue, LoggingHandler, RedisQueue, Worker};

#[derive(Parser)]
#[command(
    name = "stevedore",
    about = "Task API that queues operations for background workers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, env = "STEVEDORE_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
        /// Run pending migrations before serving.
        #[arg(long)]
        migrate: bool,
        /// Keep tasks and jobs in process memory instead of Postgres/Redis.
        #[arg(long, conflicts_with = "migrate")]
        memory: bool,
        #[command(flatten)]
        database: DatabaseArgs,
        #[command(flatten)]
        queue: QueueArgs,
    },
    /// Start a background worker that processes queued jobs.
    Worker {
        /// Requeue jobs left in flight by a previous worker before starting.
        /// Only use when no other worker is running on the queue.
        #[arg(long)]
        recover: bool,
        #[command(flatten)]
        queue: QueueArgs,
    },
    /// Run pending database migrations.
    Migrate {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            bind,
            migrate,
            memory,
            database,
            queue,
        } => {
            let state = if memory {
                info!("Using in-memory task store and queue");
                AppState::new(
                    Arc::new(InMemoryTaskStore::new()),
                    Arc::new(InMemoryQueue::new(&queue.queue_name)),
                )
            } else {
                let pool = db::pool::create_pool(&database.to_config())
                    .await
                    .context("failed to connect to database")?;
                if migrate {
                    db::pool::run_migrations(&pool)
                        .await
                        .context("migration failed")?;
                }
                let jobs = RedisQueue::connect(&queue.to_config())
                    .await
                    .context("failed to connect to redis")?;

                let tasks: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(pool));
                let jobs: Arc<dyn JobQueue> = Arc::new(jobs);
                AppState::new(tasks, jobs)
            };

            info!("Starting API server on {bind}");
            api::serve(&bind, state).await.context("server error")?;
        }
        Command::Worker { recover, queue } => {
            let config = queue.to_config();
            let jobs = RedisQueue::connect(&config)
                .await
                .context("failed to connect to redis")?;
            if recover {
                jobs.recover_processing()
                    .await
                    .context("failed to recover in-flight jobs")?;
            }

            let worker = Worker::new(
                Arc::new(jobs),
                Arc::new(LoggingHandler),
                config.poll_timeout,
            );
            worker.run_until(api::shutdown_signal()).await;
        }
        Command::Migrate { database } => {
            info!("Running migrations");
            let pool = db::pool::create_pool(&database.to_config())
                .await
                .context("failed to connect to database")?;
            db::pool::run_migrations(&pool)
                .await
                .context("migration failed")?;
            info!("Migrations applied successfully");
        }
    }

    Ok(())
}
