mod balance;
mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod recurrence;
mod settings;
mod store;

use clap::Parser;

use cli::{Cli, Commands, RulesCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Add { date, amount, note } => cli::entry::add(&date, &amount, &note),
        Commands::Edit {
            id,
            date,
            amount,
            note,
        } => cli::entry::edit(id, date.as_deref(), amount.as_deref(), note.as_deref()),
        Commands::Rm { id } => cli::entry::remove(id),
        Commands::Day { date } => cli::entry::day(&date),
        Commands::Month { month } => cli::month::run(&month),
        Commands::Balance { date } => cli::entry::balance(&date),
        Commands::Rules { command } => match command {
            RulesCommands::Add {
                start,
                amount,
                note,
                every,
                unit,
                through,
            } => cli::rule::add(&start, &amount, &note, every, &unit, through.as_deref()),
            RulesCommands::List => cli::rule::list(),
            RulesCommands::Rm { id } => cli::rule::remove(id),
        },
        Commands::Generate { through } => cli::rule::generate(&through),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
