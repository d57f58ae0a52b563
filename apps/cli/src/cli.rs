//! # Command-Line Arguments
//!
//! clap definitions for the `climaquote` binary.
//!
//! ```text
//! climaquote
//! ├── catalog   list | add-material | add-service | edit | update-price
//! │             delete | seed
//! ├── settings  show | set-copper-price | set-company
//! └── quote     new | show | list | edit | add-material | add-service
//!               add-custom-material | add-custom-service
//!               qty | set-qty | remove | discount | status | share | delete
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::catalog::{parse_material_category, parse_service_category};
use clima_core::{DiscountMode, MaterialCategory, QuoteStatus, ServiceCategory};

#[derive(Debug, Parser)]
#[command(name = "climaquote")]
#[command(about = "Quotes for HVAC installation and maintenance")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides config and CLIMA_DATABASE_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage materials and services
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Company details and copper price
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Create and edit quotes
    #[command(subcommand)]
    Quote(QuoteCommand),
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List materials and services
    List,

    /// Add a material
    AddMaterial {
        name: String,
        /// Selling price per unit
        #[arg(long)]
        price: f64,
        /// Unit of measure (m, kg, un, ...)
        #[arg(long, default_value = "un")]
        unit: String,
        #[arg(long, default_value_t = 0.0)]
        cost: f64,
        /// Category slug or label
        #[arg(long, value_parser = parse_material_category, default_value = "other")]
        category: MaterialCategory,
    },

    /// Add a service
    AddService {
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0.0)]
        cost: f64,
        /// Category slug or label
        #[arg(long, value_parser = parse_service_category, default_value = "other")]
        category: ServiceCategory,
    },

    /// Edit a material or service (id or name); only given fields change
    Edit {
        item: String,
        #[arg(long)]
        name: Option<String>,
        /// Materials only
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
        /// Category slug or label
        #[arg(long)]
        category: Option<String>,
    },

    /// Change the price of a material or service (id or name)
    UpdatePrice { item: String, price: f64 },

    /// Delete a material or service (id or name)
    Delete { item: String },

    /// Load the starter catalog into empty kinds
    Seed,
}

// =============================================================================
// Settings
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show company settings
    Show,

    /// Set the copper price in R$/kg
    SetCopperPrice { price_per_kg: f64 },

    /// Update company details (only the given fields change)
    SetCompany(CompanyArgs),
}

#[derive(Debug, Args)]
pub struct CompanyArgs {
    #[arg(long)]
    pub name: Option<String>,
    /// CNPJ or CPF
    #[arg(long)]
    pub tax_id: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    /// Logo path or data URL
    #[arg(long)]
    pub logo: Option<String>,
    #[arg(long)]
    pub footer: Option<String>,
}

// =============================================================================
// Quote
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum QuoteCommand {
    /// Create a quote (at least one --material or --service)
    New(NewQuoteArgs),

    /// Show a quote (number or id)
    Show { quote: String },

    /// List quotes, newest first, with a count per status
    List {
        /// Only quotes in this status
        #[arg(long)]
        status: Option<QuoteStatus>,
    },

    /// Change client details, validity or payment terms
    Edit(EditQuoteArgs),

    /// Add a catalog material (id or name)
    AddMaterial {
        quote: String,
        material: String,
        /// Units to add
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Add a catalog service (id or name)
    AddService {
        quote: String,
        service: String,
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Add a hand-entered material line
    AddCustomMaterial {
        quote: String,
        name: String,
        unit_price: f64,
        #[arg(long, default_value = "un")]
        unit: String,
    },

    /// Add a hand-entered service line
    AddCustomService {
        quote: String,
        name: String,
        price: f64,
    },

    /// Change a line's quantity by a delta (e.g. 1 or -1)
    Qty {
        quote: String,
        /// Line position (as shown) or id
        line: String,
        #[arg(allow_negative_numbers = true)]
        delta: f64,
        /// The line is a service line
        #[arg(long)]
        service: bool,
    },

    /// Set a line's quantity (0 removes it)
    SetQty {
        quote: String,
        line: String,
        quantity: f64,
        #[arg(long)]
        service: bool,
    },

    /// Remove a line
    Remove {
        quote: String,
        line: String,
        #[arg(long)]
        service: bool,
    },

    /// Set the discount
    Discount {
        quote: String,
        value: f64,
        /// fixed or percentage (%)
        #[arg(long, default_value = "fixed")]
        mode: DiscountMode,
    },

    /// Change the status (draft, sent, approved, cancelled)
    Status { quote: String, status: QuoteStatus },

    /// Print the share message and WhatsApp link, and mark as sent
    Share { quote: String },

    /// Delete a quote
    Delete { quote: String },
}

#[derive(Debug, Args)]
pub struct NewQuoteArgs {
    /// Client name
    pub client: String,
    #[arg(long, default_value = "")]
    pub phone: String,
    #[arg(long, default_value = "")]
    pub address: String,
    /// Notes printed for the client
    #[arg(long, default_value = "")]
    pub notes: String,
    /// Notes kept off the document
    #[arg(long, default_value = "")]
    pub internal_notes: String,
    #[arg(long)]
    pub validity_days: Option<u32>,
    #[arg(long)]
    pub payment_terms: Option<String>,
    /// Catalog material (id or name); repeat to add more units
    #[arg(long = "material")]
    pub materials: Vec<String>,
    /// Catalog service (id or name); repeat to add more
    #[arg(long = "service")]
    pub services: Vec<String>,
}

#[derive(Debug, Args)]
pub struct EditQuoteArgs {
    /// Quote number or id
    pub quote: String,
    #[arg(long)]
    pub client: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long)]
    pub internal_notes: Option<String>,
    #[arg(long)]
    pub validity_days: Option<u32>,
    #[arg(long)]
    pub payment_terms: Option<String>,
}
