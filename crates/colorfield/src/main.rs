mod cli;
mod paths;
mod run;
mod state;

use anyhow::{Context, Result};
use cli::{Command, StateAction};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::State(state_cmd)) => handle_state_command(state_cmd.action),
        None => run::run(cli.run),
    }
}

fn handle_state_command(action: StateAction) -> Result<()> {
    let paths = AppPaths::discover()?;
    let state_file = paths.state_file();

    match action {
        StateAction::Where => {
            println!("{}", state_file.display());
            Ok(())
        }
        StateAction::Reset => {
            if state_file.exists() {
                std::fs::remove_file(&state_file).with_context(|| {
                    format!("failed to remove state file at {}", state_file.display())
                })?;
                println!("Removed {}", state_file.display());
            } else {
                println!("No saved state at {}", state_file.display());
            }
            Ok(())
        }
    }
}
