//! Graph Tasks - CLI
//!
//! Create, complete and list tasks stored in Neo4j.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand};
use graph_tasks::tasks::{Report, Task, TaskBuilder};
use graph_tasks::{AppState, Config};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "graph-tasks")]
#[command(about = "Task tracking on a Neo4j graph")]
struct Cli {
    /// Path to a YAML config file (defaults to ./config.yaml)
    #[arg(long, env = "GRAPH_TASKS_CONFIG")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new task
    New {
        /// Task author
        #[arg(short, long)]
        author: String,

        /// Task comment
        #[arg(short, long)]
        comment: String,

        /// Deadline as RFC 3339 (e.g. 2030-01-01T12:00:00Z)
        #[arg(long, conflicts_with = "due_in_hours")]
        deadline: Option<DateTime<Utc>>,

        /// Deadline relative to now, in hours
        #[arg(long, default_value = "24")]
        due_in_hours: i64,
    },

    /// Show a task
    Show {
        /// Task ID
        id: String,
    },

    /// Mark a task as done
    Done {
        /// Task ID
        id: String,

        /// Who completed the task
        #[arg(long)]
        by: String,

        /// Completion time as RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// List all tasks
    List,

    /// List the completion reports of a task
    Reports {
        /// Task ID
        id: String,
    },

    /// Create a sample task and mark it done
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,graph_tasks=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_yaml_and_env(cli.config.as_deref())?;
    let state = AppState::new(config).await?;
    tracing::info!("Connected to task graph");

    let output = Output { json: cli.json };

    match cli.command {
        Commands::New {
            author,
            comment,
            deadline,
            due_in_hours,
        } => {
            let deadline = deadline.unwrap_or_else(|| Utc::now() + Duration::hours(due_in_hours));
            let id = state
                .tasks
                .new_task(TaskBuilder::new(author, comment, deadline))
                .await?;
            output.id(&id)
        }
        Commands::Show { id } => {
            let task = state
                .tasks
                .task_with_id(&id)
                .await
                .with_context(|| format!("Failed to fetch task {}", id))?;
            output.task(&task)
        }
        Commands::Done { id, by, at } => {
            let report = Report::new(by, at.unwrap_or_else(Utc::now));
            state.tasks.done_task(&id, report).await?;
            tracing::info!("Task {} marked done", id);
            Ok(())
        }
        Commands::List => {
            let tasks = state.tasks.all_tasks().await?;
            output.tasks(&tasks)
        }
        Commands::Reports { id } => {
            let reports = state.tasks.task_reports(&id).await?;
            output.reports(&reports)
        }
        Commands::Demo => run_demo(&state, &output).await,
    }
}

async fn run_demo(state: &AppState, output: &Output) -> Result<()> {
    let id = state
        .tasks
        .new_task(TaskBuilder::new(
            "Beniamin",
            "Very hard task",
            Utc::now() + Duration::hours(24),
        ))
        .await?;

    state
        .tasks
        .done_task(&id, Report::new("Mariusz", Utc::now() + Duration::seconds(2)))
        .await?;

    output.id(&id)
}

/// Prints results either as text or as JSON
struct Output {
    json: bool,
}

impl Output {
    fn id(&self, id: &str) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({ "id": id }));
        }
        println!("{}", id);
        Ok(())
    }

    fn task(&self, task: &Task) -> Result<()> {
        if self.json {
            return self.print_json(task);
        }
        println!("{}", format_task(task));
        Ok(())
    }

    fn tasks(&self, tasks: &[Task]) -> Result<()> {
        if self.json {
            return self.print_json(&tasks);
        }
        for (i, task) in tasks.iter().enumerate() {
            println!("{} : {}", i, format_task(task));
        }
        Ok(())
    }

    fn reports(&self, reports: &[Report]) -> Result<()> {
        if self.json {
            return self.print_json(&reports);
        }
        for report in reports {
            println!("done by {} at {}", report.by, report.at.to_rfc3339());
        }
        Ok(())
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

fn format_task(task: &Task) -> String {
    format!(
        "{} {:?} by {:?}, due {}",
        task.id,
        task.comment,
        task.author,
        task.deadline.to_rfc3339()
    )
}
