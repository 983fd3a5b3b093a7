use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve outputs from a state file on the local filesystem
    Local(LocalArgs),
    /// Resolve outputs from a remote backend workspace
    Remote(RemoteArgs),
}

#[derive(clap::Args, Debug)]
pub struct LocalArgs {
    /// Path to the state file
    #[arg(long)]
    pub path: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(clap::Args, Debug)]
pub struct RemoteArgs {
    /// Organization containing the targeted workspace(s)
    #[arg(long)]
    pub organization: String,

    /// Backend hostname
    #[arg(long, default_value = stateref::DEFAULT_HOSTNAME)]
    pub hostname: String,

    /// Bearer token; falls back to the Terraform CLI credentials file
    #[arg(long, env = "TFE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Full name of one workspace
    #[arg(long, conflicts_with = "prefix")]
    pub workspace: Option<String>,

    /// Shared name prefix selecting multiple workspaces
    #[arg(long)]
    pub prefix: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    /// Print only this output
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Render sensitive values instead of masking them in table output
    #[arg(long)]
    pub show_sensitive: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    #[test]
    fn test_local_args() {
        let cli = Cli::parse_from(["stateref", "local", "--path=terraform.tfstate"]);
        if let Command::Local(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("terraform.tfstate"));
            assert_eq!(args.render.format, OutputFormat::Table);
        } else {
            panic!("expected Local command, got {:?}", cli.command);
        }
    }

    #[test]
    #[serial]
    fn test_remote_args_defaults() {
        let token_backup = std::env::var("TFE_TOKEN").ok();
        unsafe {
            std::env::remove_var("TFE_TOKEN");
        }

        let cli = Cli::parse_from([
            "stateref",
            "remote",
            "--organization=acme",
            "--workspace=networking",
        ]);

        unsafe {
            if let Some(token) = token_backup {
                std::env::set_var("TFE_TOKEN", token);
            }
        }

        if let Command::Remote(args) = cli.command {
            assert_eq!(args.organization, "acme");
            assert_eq!(args.hostname, "app.terraform.io");
            assert_eq!(args.token, None);
            assert_eq!(args.workspace, Some("networking".to_string()));
            assert_eq!(args.prefix, None);
        } else {
            panic!("expected Remote command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_remote_args_workspace_conflicts_with_prefix() {
        let result = Cli::try_parse_from([
            "stateref",
            "remote",
            "--organization=acme",
            "--workspace=networking",
            "--prefix=net-",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_remote_args_prefix_mode() {
        let cli = Cli::parse_from([
            "stateref",
            "remote",
            "--organization=acme",
            "--prefix=net-",
            "--format=json",
        ]);
        if let Command::Remote(args) = cli.command {
            assert_eq!(args.prefix, Some("net-".to_string()));
            assert_eq!(args.render.format, OutputFormat::Json);
        } else {
            panic!("expected Remote command, got {:?}", cli.command);
        }
    }

    #[test]
    fn test_single_output_selection() {
        let cli = Cli::parse_from([
            "stateref",
            "local",
            "--path=terraform.tfstate",
            "--output=bucket_arn",
        ]);
        if let Command::Local(args) = cli.command {
            assert_eq!(args.render.output, Some("bucket_arn".to_string()));
        } else {
            panic!("expected Local command, got {:?}", cli.command);
        }
    }
}
