mod archive;
mod cli;
mod db;
mod error;
mod extract;
mod fmt;
mod ledger;
mod models;
mod settings;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    AccountsCommands, CategoriesCommands, Cli, Commands, ConfigCommands, ItemsCommands,
};
use ledger::ItemUpdate;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add { name } => cli::accounts::add(&name),
            AccountsCommands::List => cli::accounts::list(),
            AccountsCommands::Rename { old, new } => cli::accounts::rename(&old, &new),
            AccountsCommands::Remove { name } => cli::accounts::remove(&name),
        },
        Commands::Items { command } => match command {
            ItemsCommands::Add {
                account,
                description,
                price,
                category,
            } => cli::items::add(&account, &description, price, category.as_deref()),
            ItemsCommands::List { account } => cli::items::list(account.as_deref()),
            ItemsCommands::Edit {
                id,
                description,
                price,
                account,
                category,
            } => cli::items::edit(
                id,
                &ItemUpdate {
                    description: description.as_deref(),
                    price,
                    account: account.as_deref(),
                    category: category.as_deref(),
                },
            ),
            ItemsCommands::Remove { id } => cli::items::remove(id),
        },
        Commands::Categories { command } => match command {
            CategoriesCommands::Add { name } => cli::categories::add(&name),
            CategoriesCommands::List => cli::categories::list(),
            CategoriesCommands::Remove { name } => cli::categories::remove(&name),
        },
        Commands::Totals => cli::totals::run(),
        Commands::Extract { file, categories } => cli::extract::extract(&file, categories),
        Commands::Import {
            file,
            account,
            categories,
            force,
        } => cli::extract::import(&file, account.as_deref(), categories, force),
        Commands::Files { date } => cli::files::run(date.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::SetKey { key } => cli::config::set_key(&key),
            ConfigCommands::SetModel { model } => cli::config::set_model(&model),
            ConfigCommands::SetBaseUrl { url } => cli::config::set_base_url(&url),
            ConfigCommands::InitPrompt { force } => cli::config::init_prompt(force),
        },
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
