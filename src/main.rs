mod cli;
mod credentials;
mod output;

use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, OutputFormat, RenderArgs};
use stateref::{
    RemoteConfig, RemoteStates, ResolvedState, WorkspaceSelector, resolve_local, resolve_remote,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Local(args) => {
            let resolved = resolve_local(&args.path).await?;
            tracing::info!(
                path = %args.path.display(),
                outputs = resolved.outputs.len(),
                "local state resolved"
            );
            print_resolved(&resolved, &args.render)?;
        }
        Command::Remote(args) => {
            let token = args
                .token
                .clone()
                .or_else(|| credentials::token_from_cli_config(&args.hostname));
            if token.is_none() {
                tracing::warn!(
                    hostname = %args.hostname,
                    "no token configured; trying unauthenticated access"
                );
            }

            let selector = WorkspaceSelector {
                name: args.workspace.clone(),
                prefix: args.prefix.clone(),
            };
            let mut config = RemoteConfig::new(args.organization.clone(), selector);
            config.hostname = args.hostname.clone();
            config.token = token;
            if let Some(secs) = args.timeout_secs {
                config.timeout = Duration::from_secs(secs);
            }

            match resolve_remote(&config).await? {
                RemoteStates::Single(resolved) => {
                    tracing::info!(outputs = resolved.outputs.len(), "remote state resolved");
                    print_resolved(&resolved, &args.render)?;
                }
                RemoteStates::ByWorkspace(results) => {
                    let failed = results.values().filter(|r| r.is_err()).count();
                    tracing::info!(
                        workspaces = results.len(),
                        failed,
                        "prefix resolution complete"
                    );
                    match args.render.format {
                        OutputFormat::Json => println!(
                            "{}",
                            serde_json::to_string_pretty(&output::states_json(&results))?
                        ),
                        OutputFormat::Table => {
                            for (short, result) in &results {
                                match result {
                                    Ok(resolved) => {
                                        println!("workspace '{short}':");
                                        println!(
                                            "{}",
                                            output::render_table(
                                                &resolved.outputs,
                                                args.render.show_sensitive
                                            )
                                        );
                                    }
                                    Err(error) => println!("workspace '{short}': error: {error}"),
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_resolved(resolved: &ResolvedState, render: &RenderArgs) -> Result<()> {
    if let Some(name) = &render.output {
        let value = resolved.output(name)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&output::value_json(&value.value))?
        );
        return Ok(());
    }

    match render.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&output::outputs_json(&resolved.outputs))?
        ),
        OutputFormat::Table => println!(
            "{}",
            output::render_table(&resolved.outputs, render.show_sensitive)
        ),
    }
    Ok(())
}
