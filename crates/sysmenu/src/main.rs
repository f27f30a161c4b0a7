mod commands;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "sysmenu",
    version,
    about = "Extra window commands in every system menu"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Start the host in the background
    Start,
    /// Stop the running host
    Stop,
    /// Show whether the host is running
    Status,
    /// Reset a window attribute on every tracked window
    Reset {
        #[arg(value_enum)]
        target: ResetTarget,
    },
    /// Run the host in the foreground (internal)
    #[command(hide = true)]
    Run {
        /// Host window of the process that started this companion
        #[arg(long)]
        parent_handle: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResetTarget {
    /// Make every window fully opaque
    Transparency,
    /// Turn click-through off everywhere
    ClickThrough,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        command => run_host_command(command),
    }
}

#[cfg(windows)]
fn run_host_command(command: Commands) {
    use sysmenu_core::GlobalAction;

    match command {
        Commands::Init => commands::init::execute(),
        Commands::Start => commands::start::execute(),
        Commands::Stop => commands::stop::execute(),
        Commands::Status => commands::status::execute(),
        Commands::Reset { target } => commands::reset::execute(match target {
            ResetTarget::Transparency => GlobalAction::RestoreTransparency,
            ResetTarget::ClickThrough => GlobalAction::DisableClickThrough,
        }),
        Commands::Run { parent_handle } => commands::run::execute(parent_handle),
    }
}

#[cfg(not(windows))]
fn run_host_command(_command: Commands) {
    eprintln!("sysmenu only runs on Windows.");
    std::process::exit(1);
}
