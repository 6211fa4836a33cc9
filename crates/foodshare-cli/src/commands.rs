// SPDX-License-Identifier: Apache-2.0

use clap::{Subcommand, ValueEnum};
use foodshare_model::TableName;
use std::path::PathBuf;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create the four tables when they are missing.
    Init,
    /// Show which tables exist and how many rows they hold.
    Inspect,
    /// Bulk-load one CSV file into one table.
    Load {
        #[arg(long, value_enum)]
        table: TableArg,
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = false)]
        replace: bool,
    },
    /// Load `<table>_data.csv` for every table from a directory.
    Seed {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long, default_value_t = false)]
        replace: bool,
    },
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
    Provider {
        #[command(subcommand)]
        command: ProviderCommand,
    },
    /// Suggest a meal type from a JSON lookup table.
    Classify {
        #[arg(long)]
        table: PathBuf,
        #[arg(long)]
        provider_type: String,
        #[arg(long)]
        food_name: String,
        #[arg(long)]
        location: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ReportCommand {
    List,
    Run {
        id: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long, default_value_t = false)]
        explain: bool,
    },
}

#[derive(clap::Args)]
pub(crate) struct ProviderFields {
    #[arg(long)]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long = "type")]
    pub(crate) provider_type: String,
    #[arg(long)]
    pub(crate) address: String,
    #[arg(long)]
    pub(crate) city: String,
    #[arg(long)]
    pub(crate) contact: String,
}

#[derive(Subcommand)]
pub(crate) enum ProviderCommand {
    Create(ProviderFields),
    List,
    Get {
        #[arg(long)]
        id: String,
    },
    Update(ProviderFields),
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum TableArg {
    Providers,
    Receivers,
    #[value(name = "food_listings")]
    FoodListings,
    Claims,
}

impl From<TableArg> for TableName {
    fn from(value: TableArg) -> Self {
        match value {
            TableArg::Providers => TableName::Providers,
            TableArg::Receivers => TableName::Receivers,
            TableArg::FoodListings => TableName::FoodListings,
            TableArg::Claims => TableName::Claims,
        }
    }
}
