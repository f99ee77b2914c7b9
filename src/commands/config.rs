use super::Session;
use crate::{
    libs::{messages::Message, view::View},
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Switch the dark colour scheme on or off
    DarkMode {
        #[arg(value_enum)]
        state: Toggle,
    },
    /// Print the current settings
    Show,
}

/// Changes are written back when the session closes.
pub fn cmd(args: ConfigArgs, session: &mut Session) -> Result<()> {
    match args.command {
        ConfigCommand::DarkMode { state } => {
            let on = matches!(state, Toggle::On);
            session.logbook_mut().config_mut().dark_mode = on;
            msg_success!(Message::DarkModeSet(on));
            Ok(())
        }
        ConfigCommand::Show => {
            let config = session.logbook().config();
            View::details(&[
                ("Dark mode", config.dark_mode.to_string()),
                ("Timer workers", config.timer_workers.to_string()),
                ("Shutdown grace (s)", config.shutdown_grace_secs.to_string()),
                ("Export directory", config.export_dir().display().to_string()),
            ])
        }
    }
}
