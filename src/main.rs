//! dockhand - typed client for the Docker CLI.

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use futures_util::StreamExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dockhand::client::ContainerTarget;
use dockhand::resource::ContainerId;
use dockhand::watch::events;
use dockhand::{display, Deadline, Docker};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Running,
    Exited,
}

impl From<TargetArg> for ContainerTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Running => ContainerTarget::Running,
            TargetArg::Exited => ContainerTarget::Exited,
        }
    }
}

#[derive(Parser)]
#[command(name = "dockhand", about = "Typed client for the Docker CLI", version)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Operation deadline in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List containers.
    Ps {
        /// Include stopped containers.
        #[arg(short, long)]
        all: bool,
    },
    /// List images.
    Images,
    /// List contexts.
    Contexts,
    /// Block until a container reaches a state.
    Wait {
        /// Container id or name.
        container: String,
        /// Target state.
        #[arg(value_enum, default_value_t = TargetArg::Running)]
        state: TargetArg,
    },
    /// Follow the container event feed.
    Events {
        /// Restrict to one container.
        container: Option<String>,
    },
    /// Remove a container.
    Rm {
        /// Container id or name.
        container: String,
        /// Remove even if running.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the engine daemon version.
    Version,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("dockhand={level}")));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match dockhand::config::load().await {
        Ok(config) => config,
        Err(e) => {
            display::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    let docker = match Docker::with_config(config) {
        Ok(docker) => docker,
        Err(e) => {
            display::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    let deadline = Deadline::within(Duration::from_secs(cli.timeout));

    match run_command(&docker, cli.command, deadline).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run_command(
    docker: &Docker,
    command: Commands,
    deadline: Deadline,
) -> Result<(), dockhand::Error> {
    match command {
        Commands::Ps { all } => {
            for container in docker.list_containers(all, deadline).await? {
                display::print_container(&container);
            }
        }
        Commands::Images => {
            for image in docker.list_images(deadline).await? {
                display::print_image(&image);
            }
        }
        Commands::Contexts => {
            for context in docker.list_contexts(deadline).await? {
                display::print_context(&context);
            }
        }
        Commands::Wait { container, state } => {
            let id: ContainerId = container.parse()?;
            let detail = docker
                .wait_for_container_state(&id, state.into(), deadline)
                .await?;
            println!("{} {}", detail.id, detail.state.status);
        }
        Commands::Events { container } => {
            let id = container.map(|c| c.parse::<ContainerId>()).transpose()?;
            let mut feed = docker.stream_container_events(id.as_ref())?;
            let lines = feed.line_stream();
            futures_util::pin_mut!(lines);
            while let Some(line) = lines.next().await {
                if let Some(record) = events::parse_line(&line?) {
                    display::print_event(&record);
                }
            }
        }
        Commands::Rm { container, force } => {
            let id: ContainerId = container.parse()?;
            docker.remove_container(&id, force, deadline).await?;
            println!("{id}");
        }
        Commands::Version => {
            println!("{}", docker.server_version(deadline).await?);
        }
    }
    Ok(())
}
