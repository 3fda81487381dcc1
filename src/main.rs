use std::process::ExitCode;

use campus::commands;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Terminal admin console for the Campus learning platform")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of a resource (courses, students, teachers, ...)
    List {
        /// Resource collection to list
        resource: String,

        /// 1-based page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Search term applied server-side
        #[arg(short, long)]
        search: Option<String>,

        /// Role scope (admin, teacher, student)
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Create a record
    Add {
        /// Resource collection to add to
        resource: String,

        /// Record fields as a JSON object
        #[arg(short, long)]
        data: String,

        /// Role scope (admin, teacher, student)
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Update a record
    Edit {
        /// Resource collection containing the record
        resource: String,

        /// Record id
        id: String,

        /// Changed fields as a JSON object
        #[arg(short, long)]
        data: String,

        /// Role scope (admin, teacher, student)
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Delete a record (asks to type "delete" first)
    Delete {
        /// Resource collection containing the record
        resource: String,

        /// Record id
        id: String,

        /// Role scope (admin, teacher, student)
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the current configuration
    Show,

    /// Set a configuration key (api_url, token, retry, request_timeout, default_role)
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            resource,
            page,
            search,
            role,
        } => commands::cmd_list(&resource, page, search, role)
            .await
            .map(|_| ExitCode::SUCCESS),
        Commands::Add {
            resource,
            data,
            role,
        } => commands::cmd_add(&resource, &data, role).await,
        Commands::Edit {
            resource,
            id,
            data,
            role,
        } => commands::cmd_edit(&resource, &id, &data, role).await,
        Commands::Delete { resource, id, role } => {
            commands::cmd_delete(&resource, &id, role).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::cmd_config_show().map(|_| ExitCode::SUCCESS),
            ConfigCommands::Set { key, value } => {
                commands::cmd_config_set(&key, &value).map(|_| ExitCode::SUCCESS)
            }
        },
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
