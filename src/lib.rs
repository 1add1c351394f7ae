// src/lib.rs

pub mod build;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod repo;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::ConfigFile;
use crate::exec::RealCommandRunner;
use crate::http::AppState;
use crate::pipeline::PipelineController;
use crate::repo::RepoOp;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ `--listen` override)
/// - repository client, build invoker and pipeline controller
/// - the HTTP router and listener
/// - Ctrl-C handling (inside [`http::serve`])
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    if let Some(listen) = args.listen {
        cfg.server.listen = listen;
    }

    let controller = PipelineController::from_config(&cfg, Arc::new(RealCommandRunner));

    if args.check {
        print_check(&cfg, &controller);
        return Ok(());
    }

    warn_on_missing_dirs(&cfg);

    let app = http::router(AppState::new(controller), &cfg.server.route);
    let listener = TcpListener::bind(cfg.server.listen)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen))?;

    info!(
        route = %cfg.server.route,
        repository = %cfg.repository.working_dir.display(),
        output = %cfg.build.output.display(),
        "pipeline ready"
    );

    http::serve(listener, app).await
}

/// Paths are only checked for existence at startup as a hint; the pipeline
/// itself never refuses to run because of them.
fn warn_on_missing_dirs(cfg: &ConfigFile) {
    if !cfg.repository.working_dir.is_dir() {
        warn!(
            path = %cfg.repository.working_dir.display(),
            "repository working directory does not exist; every capture will be empty"
        );
    }
    if !cfg.build.input.is_dir() {
        warn!(
            path = %cfg.build.input.display(),
            "build input directory does not exist; triggers will fail at the build step"
        );
    }
}

/// `--check` output: the resolved commands and paths, nothing executed.
fn print_check(cfg: &ConfigFile, controller: &PipelineController) {
    println!("sitehook check");
    println!("  listen = {}", cfg.server.listen);
    println!("  route = {}", cfg.server.route);
    println!(
        "  triggered_while_running_behaviour = {:?}",
        cfg.pipeline.behaviour
    );
    println!();

    let repo = controller.repository();
    println!("repository ({}):", cfg.repository.vcs);
    println!("  cwd: {}", cfg.repository.working_dir.display());
    println!("  timeout: {:?}", cfg.repository.timeout);
    for op in RepoOp::ALL {
        println!("  {op}: {}", repo.command_for(op).display_line());
    }
    println!();

    let builder = controller.builder();
    println!("build ({}):", builder.engine_name());
    println!("  input: {}", builder.input().display());
    println!("  output: {}", builder.output().display());
    if !cfg.build.command.is_empty() {
        println!("  command: {}", cfg.build.command.join(" "));
    }
    if !cfg.build.exclude.is_empty() {
        println!("  exclude: {:?}", cfg.build.exclude);
    }

    debug!("check complete (nothing executed)");
}
