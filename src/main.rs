use std::process::ExitCode;

use clap::Parser;
use zett_note::constants as C;
use zett_note::{Cli, Command, Config};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(C::ENV_LOG, level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> zett_note::Result<()> {
    let config = Config::resolve(&cli.overrides())?;
    config.ensure_dirs()?;
    let json = cli.json;

    match cli.command {
        Command::New => cmd::new::run(&config),
        Command::Edit => cmd::edit::run(&config),
        Command::List { notes } => cmd::list::run(&config, notes, json),
        Command::DeleteDraft => cmd::delete_draft::run(&config),
        Command::DeleteNote { note_id } => cmd::delete_note::run(&config, note_id),
        Command::Finish => cmd::finish::run(&config, json),
        Command::Rewrite { note_id } => cmd::rewrite::run(&config, note_id, json),
        Command::Compile { note_id } => cmd::compile::run(&config, &note_id, json),
        Command::Recompile => cmd::recompile::run(&config, json),
    }
}

mod cmd {
    pub mod new;
    pub mod edit;
    pub mod list;
    pub mod delete_draft;
    pub mod delete_note;
    pub mod finish;
    pub mod rewrite;
    pub mod compile;
    pub mod recompile;
    pub mod select;
    pub mod editor;
}
