//! Terminal front end for the todo list.
//!
//! Reads one command per line from stdin. The app re-renders after every
//! dispatched action through a store listener.

use anyhow::Context;
use rxtodo_runtime::metrics::MetricsRecorder;
use std::io::{self, BufRead, Write};
use todo::config::DEFAULT_LOG_FILTER;
use todo::{Command, Config, Reply, TodoApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    // Initialize tracing; logs go to stderr so they never mix with the view
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut metrics = MetricsRecorder::new();
    if config.metrics {
        metrics
            .install()
            .context("failed to install metrics recorder")?;
    }

    tracing::info!(
        filter = %config.initial_filter,
        first_id = config.first_id,
        action_log = config.action_log,
        "Starting todo app"
    );

    let app = TodoApp::new(&config);
    let mut action_log = config.action_log.then(|| app.action_log());

    println!("=== Todo ===  (type `help` for commands)\n");
    let _render = app.render_into(|frame| println!("{frame}\n"))?;

    let mut lines = io::stdin().lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("error: {e}");
                continue;
            }
        };

        match app.execute(command)? {
            Reply::Dispatched => {}
            Reply::Print(text) => println!("{text}"),
            Reply::Metrics => match metrics.render() {
                Some(text) => print!("{text}"),
                None => eprintln!("metrics are disabled (set TODO_METRICS=1)"),
            },
            Reply::Quit => break,
        }

        if let Some(log) = action_log.as_mut() {
            log.drain();
        }
    }

    let state = app.state();
    tracing::info!(
        todos = state.count(),
        completed = state.completed_count(),
        "Shutting down"
    );

    Ok(())
}
