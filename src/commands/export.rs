use super::Session;
use crate::{libs::messages::Message, msg_bail_anyhow, msg_success};
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportTable {
    Aircraft,
    Flights,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Table to export
    #[arg(value_enum)]
    table: ExportTable,
    /// Output directory (defaults to the configured export directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn cmd(args: ExportArgs, session: &mut Session) -> Result<()> {
    let dir = args.output.unwrap_or_else(|| session.logbook().export_dir());

    let written: Result<PathBuf> = match args.table {
        ExportTable::Aircraft => {
            let manager = session.logbook().aircraft().clone();
            session.call(move |reply| manager.export(dir, reply))?
        }
        ExportTable::Flights => {
            let manager = session.logbook().flights().clone();
            session.call(move |reply| manager.export(dir, reply))?
        }
    };

    match written {
        Ok(path) => msg_success!(Message::ExportCompleted(path.display().to_string())),
        Err(e) => msg_bail_anyhow!(Message::ExportFailed(e.to_string())),
    }
    Ok(())
}
