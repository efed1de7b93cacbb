use std::path::Path;

use clap::{Parser, Subcommand};

use tag_cli::commands::{config_ops, dict_ops};
use tag_cli::dict_source::{Category, DanbooruOptions};

#[derive(Parser)]
#[command(name = "tagtool", about = "Tag dictionary and autocomplete tool")]
struct Cli {
    /// Custom settings TOML used instead of the built-in defaults
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Write JSON trace logs to this directory (requires --features trace)
    #[arg(long, global = true)]
    trace_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a tag dictionary (with retry)
    Fetch {
        /// Dictionary URL
        url: String,
        /// Output file
        output_file: String,
    },
    /// Build a tag dictionary from Danbooru's most-used tags
    Danbooru {
        /// Output file
        output_file: String,
        /// Stop at the first tag with fewer posts than this
        #[arg(long, default_value = "64")]
        min_posts: i64,
        /// Tag categories to keep
        #[arg(
            long,
            value_enum,
            value_delimiter = ',',
            default_value = "general,copyright,character"
        )]
        categories: Vec<Category>,
        /// Keep underscores instead of replacing them with spaces
        #[arg(long)]
        keep_underscore: bool,
        /// Do not escape parentheses
        #[arg(long)]
        no_escape: bool,
    },
    /// Show tag and weighted-reference counts
    Stats {
        /// Dictionary file
        dict_file: String,
    },
    /// Ranked prefix matches
    Query {
        /// Dictionary file
        dict_file: String,
        /// Prefix to complete
        prefix: String,
        /// Number of results
        #[arg(short, long, default_value = "20")]
        n: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Complete the word at '|' in a buffer and print the result
    Complete {
        /// Dictionary file
        dict_file: String,
        /// Buffer with '|' marking the caret, e.g. "1girl, lo|"
        buffer: String,
        /// Row to accept (0-based)
        #[arg(long, default_value = "0")]
        pick: usize,
    },
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(dir) = &cli.trace_dir {
        tag_engine::trace_init::init_tracing(Path::new(dir));
    }
    if let Some(file) = &cli.settings {
        config_ops::use_settings(file);
    }

    match cli.command {
        Command::Fetch { url, output_file } => dict_ops::fetch(&url, &output_file),
        Command::Danbooru {
            output_file,
            min_posts,
            categories,
            keep_underscore,
            no_escape,
        } => {
            let opts = DanbooruOptions {
                min_post_count: min_posts,
                categories,
                keep_underscore,
                escape_brackets: !no_escape,
            };
            dict_ops::danbooru(&output_file, opts);
        }
        Command::Stats { dict_file } => dict_ops::stats(&dict_file),
        Command::Query {
            dict_file,
            prefix,
            n,
            json,
        } => dict_ops::query(&dict_file, &prefix, n, json),
        Command::Complete {
            dict_file,
            buffer,
            pick,
        } => dict_ops::complete(&dict_file, &buffer, pick),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
