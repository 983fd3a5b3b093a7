mod args;

pub use args::{Cli, Command, LocalArgs, OutputFormat, RemoteArgs, RenderArgs};
