// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::{Path, PathBuf};

use allowlist_checker::admin::{read_address_file, AdminError, AllowlistAdmin, BatchReport};
use allowlist_checker::config::{LogFormat, DB_PATH_ENV, DEFAULT_DB_PATH, ROLE_TABLE_PATH_ENV};
use allowlist_checker::logging;
use allowlist_checker::roles::{RoleTable, RoleTableError};
use allowlist_checker::storage::{AllowlistDatabase, AllowlistDbError, UpsertOutcome};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "allowlist-admin",
    about = "Load and maintain the wallet allowlist database",
    long_about = "Load and maintain the wallet allowlist database.\n\nThe database file is locked while allowlist-checker runs; stop the service before changing the allowlist.",
    version
)]
struct Cli {
    /// Allowlist database file
    #[arg(long, global = true, env = DB_PATH_ENV, default_value = DEFAULT_DB_PATH)]
    db: PathBuf,
    /// JSON role table used to validate role names (built-in presale roles when unset)
    #[arg(long, global = true, env = ROLE_TABLE_PATH_ENV)]
    roles: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add one wallet; fails if it is already listed
    Add(SingleArgs),
    /// Add every wallet in a newline-delimited file, skipping duplicates
    AddFile(FileArgs),
    /// Set one wallet's role, adding it if absent
    Replace(SingleArgs),
    /// Set the role of every wallet in a file, adding missing ones
    ReplaceFile(FileArgs),
    /// Remove one wallet
    Delete {
        /// Wallet address
        address: String,
    },
    /// Remove every wallet listed in a file
    DeleteFile {
        /// Newline-delimited address file
        file: PathBuf,
    },
    /// Print record counts per role
    Stats,
    /// Remove every record
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct SingleArgs {
    /// Wallet address
    address: String,
    /// Role name from the role table
    #[arg(long)]
    role: String,
}

#[derive(Args, Debug)]
struct FileArgs {
    /// Newline-delimited address file
    file: PathBuf,
    /// Role name from the role table
    #[arg(long)]
    role: String,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Roles(#[from] RoleTableError),

    #[error(transparent)]
    Database(#[from] AllowlistDbError),

    #[error("refusing to clear the allowlist without --yes")]
    ClearNotConfirmed,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(err) = logging::init(LogFormat::from_env(), "info") {
        eprintln!("logging setup failed: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let roles = load_roles(cli.roles.as_deref())?;
    let db = AllowlistDatabase::open(&cli.db)?;
    let admin = AllowlistAdmin::new(&db, &roles);

    match cli.command {
        Command::Add(args) => {
            let key = admin.add(&args.address, &args.role)?;
            println!("added {key} ({})", args.role);
        }
        Command::AddFile(args) => {
            let addresses = read_address_file(&args.file)?;
            print_report(&admin.add_batch(&addresses, &args.role)?);
        }
        Command::Replace(args) => match admin.replace(&args.address, &args.role)? {
            (key, UpsertOutcome::Inserted) => println!("added {key} ({})", args.role),
            (key, UpsertOutcome::Updated) => println!("updated {key} -> {}", args.role),
        },
        Command::ReplaceFile(args) => {
            let addresses = read_address_file(&args.file)?;
            print_report(&admin.replace_batch(&addresses, &args.role)?);
        }
        Command::Delete { address } => {
            admin.delete(&address)?;
            println!("deleted {address}");
        }
        Command::DeleteFile { file } => {
            let addresses = read_address_file(&file)?;
            print_report(&admin.delete_batch(&addresses));
        }
        Command::Stats => {
            let stats = admin.stats()?;
            println!("total: {}", stats.total);
            for (role, count) in &stats.by_role {
                println!("  {role}: {count}");
            }
        }
        Command::Clear { yes } => {
            if !yes {
                return Err(CliError::ClearNotConfirmed);
            }
            let removed = admin.clear()?;
            println!("removed {removed} records");
        }
    }

    Ok(())
}

fn load_roles(path: Option<&Path>) -> Result<RoleTable, RoleTableError> {
    match path {
        Some(path) => RoleTable::load(path),
        None => Ok(RoleTable::default()),
    }
}

fn print_report(report: &BatchReport) {
    println!("{report}");
}
