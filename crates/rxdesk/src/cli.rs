//! Clap derive structures for the `rxdesk` CLI.
//!
//! Every back-office entity gets the same resource subcommand tree
//! (list, get, create, edit, delete, status, export, import, fields).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rxdesk -- console for the pharmacy back office
#[derive(Debug, Parser)]
#[command(
    name = "rxdesk",
    version,
    about = "Manage the pharmacy back office from the command line",
    long_about = "List, filter, edit and bulk-transfer back-office records\n\
        (products, discounts, suppliers, orders, ...) against the REST backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "RXDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "RXDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session token
    #[arg(long, env = "RXDESK_API_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RXDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "RXDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "RXDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Rows per page (overrides profile)
    #[arg(long, env = "RXDESK_PAGE_SIZE", global = true, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// CSV with the table's columns
    Csv,
    /// One record id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Catalog: products
    #[command(alias = "prod")]
    Products(ResourceArgs),

    /// Catalog: product categories
    #[command(alias = "cat")]
    Categories(ResourceArgs),

    /// Catalog: product variants (pack sizes)
    Variants(ResourceArgs),

    /// Catalog: packaging units
    PackagingUnits(ResourceArgs),

    /// Promotions: discounts
    #[command(alias = "disc")]
    Discounts(ResourceArgs),

    /// Procurement: suppliers
    Suppliers(ResourceArgs),

    /// Procurement: supplier payments
    Payments(ResourceArgs),

    /// Sales: orders
    Orders(ResourceArgs),

    /// Accounting: TCS records
    TcsRecords(ResourceArgs),

    /// Accounting: day close entries
    DayClose(ResourceArgs),

    /// Content: FAQs
    Faqs(ResourceArgs),

    /// Field force: MR visits
    MrVisits(ResourceArgs),

    /// Show the navigation menu
    Menu,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List records, one page at a time
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record ID
        id: String,
    },

    /// Create a record from --set/--file values
    Create(FormArgs),

    /// Edit a record; unset fields keep their current values
    Edit {
        /// Record ID
        id: String,

        #[command(flatten)]
        form: FormArgs,
    },

    /// Delete a record (asks twice unless --yes)
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,

        #[command(flatten)]
        view: ListArgs,
    },

    /// Change a record's status
    Status {
        /// Record ID
        id: String,

        /// New status (case-insensitive)
        status: String,

        #[command(flatten)]
        view: ListArgs,
    },

    /// Export rows to a file
    Export(ExportArgs),

    /// Bulk-import an .xls/.xlsx spreadsheet
    Import {
        /// Spreadsheet to upload
        file: PathBuf,
    },

    /// Describe the form fields accepted by create/edit
    Fields,
}

/// Shared filtering and paging arguments.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Filter as FIELD=VALUE (repeatable). Date ranges: FIELD=FROM..TO
    #[arg(long, short = 'f', value_name = "FIELD=VALUE", value_parser = parse_key_val)]
    pub filter: Vec<(String, String)>,

    /// Page number (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FormArgs {
    /// Field value as FIELD=VALUE (repeatable). Lists are comma-separated
    #[arg(long, short = 's', value_name = "FIELD=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Attach a file as FIELD=PATH (repeatable)
    #[arg(long, value_name = "FIELD=PATH", value_parser = parse_key_val)]
    pub file: Vec<(String, String)>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub view: ListArgs,

    /// Download the backend's spreadsheet instead of a CSV of the page
    #[arg(long)]
    pub server: bool,

    /// Directory to write into
    #[arg(long, short = 'd', default_value = ".")]
    pub dir: PathBuf,
}

/// Split `key=value`; the value may itself contain `=`.
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{raw}'")),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile (prompts for anything not given)
    Init {
        /// Profile name
        #[arg(long)]
        name: Option<String>,

        /// API base URL for the profile
        #[arg(long = "url")]
        url: Option<String>,
    },

    /// Display current configuration (tokens masked)
    Show,

    /// Print the config file path
    Path,

    /// Set a value on the active profile
    Set {
        /// Key: api_url, api_token, api_token_env, ca_cert, insecure, timeout, page_size
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
