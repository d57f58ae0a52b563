//! # ClimaQuote CLI Library
//!
//! Everything behind the `climaquote` binary. `main.rs` only parses
//! arguments and hands them to [`run`].
//!
//! ## Module Organization
//! ```text
//! climaquote_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── Layered configuration (defaults, file, env)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (database, catalog cache, config)
//! │   └── catalog.rs  ◄─── Write-through catalog cache
//! ├── commands/
//! │   ├── mod.rs      ◄─── Reference lookup helpers
//! │   ├── catalog.rs  ◄─── Material/service commands
//! │   ├── quote.rs    ◄─── Quote editing commands
//! │   └── settings.rs ◄─── Company settings commands
//! ├── render.rs       ◄─── Terminal output
//! └── error.rs        ◄─── AppError and exit codes
//! ```
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppConfig::load ──► --db override ──► init_tracing ──► Database::new  │
//! │                                                          (migrations)  │
//! │                        AppState ──► dispatch(command) ──► render       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod state;

use std::path::Path;

use anyhow::Context;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use clima_db::Database;
use cli::{CatalogCommand, Cli, Command, QuoteCommand, SettingsCommand};
use commands::catalog::{CatalogEdit, NewMaterial, NewService};
use commands::quote::{LineKind, NewQuote, QuoteHeaderUpdate, QuoteRef};
use commands::settings::CompanyUpdate;
use config::AppConfig;
use error::AppResult;
use state::AppState;

/// Runs one CLI invocation.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(path) = cli.db {
        config.database_path = path;
    }

    init_tracing(config.log_filter());
    debug!(path = %config.database_path.display(), "Using database");

    ensure_parent_dir(&config.database_path)?;
    let db = Database::new(config.db_config()).await?;
    let state = AppState::new(db, config);

    let result = dispatch(&state, cli.command).await;
    state.db().close().await;

    let output = result?;
    print!("{}", output);
    Ok(())
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays pipeable.
/// `RUST_LOG` takes precedence over the configured filter.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // A second call (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Executes a command and returns what to print.
pub async fn dispatch(state: &AppState, command: Command) -> AppResult<String> {
    match command {
        Command::Catalog(cmd) => catalog_command(state, cmd).await,
        Command::Settings(cmd) => settings_command(state, cmd).await,
        Command::Quote(cmd) => quote_command(state, cmd).await,
    }
}

async fn catalog_command(state: &AppState, cmd: CatalogCommand) -> AppResult<String> {
    use commands::catalog;

    match cmd {
        CatalogCommand::List => Ok(render::catalog(&catalog::list(state).await?)),
        CatalogCommand::AddMaterial { name, price, unit, cost, category } => {
            let material = catalog::add_material(
                state,
                NewMaterial { name, unit, cost, price, category },
            )
            .await?;
            Ok(format!("Material adicionado: {} ({})\n", material.name, material.id))
        }
        CatalogCommand::AddService { name, price, cost, category } => {
            let service =
                catalog::add_service(state, NewService { name, cost, price, category }).await?;
            Ok(format!("Serviço adicionado: {} ({})\n", service.name, service.id))
        }
        CatalogCommand::UpdatePrice { item, price } => {
            let id = catalog::update_price(state, &item, price).await?;
            Ok(format!("Preço atualizado: {}\n", id))
        }
        CatalogCommand::Edit { item, name, unit, cost, price, category } => {
            let edited = catalog::edit(
                state,
                &item,
                CatalogEdit { name, unit, cost, price, category },
            )
            .await?;
            Ok(format!("Item atualizado: {} ({})\n", edited.name(), edited.id()))
        }
        CatalogCommand::Delete { item } => {
            let id = catalog::delete(state, &item).await?;
            Ok(format!("Item removido: {}\n", id))
        }
        CatalogCommand::Seed => Ok(render::seed(&catalog::seed(state).await?)),
    }
}

async fn settings_command(state: &AppState, cmd: SettingsCommand) -> AppResult<String> {
    use commands::settings;

    let saved = match cmd {
        SettingsCommand::Show => settings::show(state).await?,
        SettingsCommand::SetCopperPrice { price_per_kg } => {
            settings::set_copper_price(state, price_per_kg).await?
        }
        SettingsCommand::SetCompany(args) => {
            let update = CompanyUpdate {
                name: args.name,
                tax_id: args.tax_id,
                phone: args.phone,
                address: args.address,
                logo: args.logo,
                footer_text: args.footer,
            };
            if update.is_empty() {
                return Err(error::AppError::validation("Nothing to update"));
            }
            settings::update_company(state, update).await?
        }
    };
    Ok(render::settings(&saved))
}

async fn quote_command(state: &AppState, cmd: QuoteCommand) -> AppResult<String> {
    use commands::quote;

    let kind = |service: bool| if service { LineKind::Service } else { LineKind::Material };

    let updated = match cmd {
        QuoteCommand::New(args) => {
            let input = NewQuote {
                client_name: args.client,
                client_phone: args.phone,
                client_address: args.address,
                client_notes: args.notes,
                internal_notes: args.internal_notes,
                validity_days: args.validity_days,
                payment_terms: args.payment_terms,
                materials: args.materials,
                services: args.services,
            };
            quote::create(state, input).await?
        }
        QuoteCommand::Show { quote: r } => quote::get(state, &QuoteRef::parse(&r)).await?,
        QuoteCommand::List { status } => {
            return Ok(render::quote_list(&quote::list(state, status).await?));
        }
        QuoteCommand::Edit(args) => {
            let update = QuoteHeaderUpdate {
                client_name: args.client,
                client_phone: args.phone,
                client_address: args.address,
                client_notes: args.notes,
                internal_notes: args.internal_notes,
                validity_days: args.validity_days,
                payment_terms: args.payment_terms,
            };
            quote::edit_header(state, &QuoteRef::parse(&args.quote), update).await?
        }
        QuoteCommand::AddMaterial { quote: r, material, count } => {
            quote::add_material(state, &QuoteRef::parse(&r), &material, count).await?
        }
        QuoteCommand::AddService { quote: r, service, count } => {
            quote::add_service(state, &QuoteRef::parse(&r), &service, count).await?
        }
        QuoteCommand::AddCustomMaterial { quote: r, name, unit_price, unit } => {
            quote::add_custom_material(state, &QuoteRef::parse(&r), &name, &unit, unit_price)
                .await?
        }
        QuoteCommand::AddCustomService { quote: r, name, price } => {
            quote::add_custom_service(state, &QuoteRef::parse(&r), &name, price).await?
        }
        QuoteCommand::Qty { quote: r, line, delta, service } => {
            let (updated, outcome) =
                quote::change_quantity(state, &QuoteRef::parse(&r), kind(service), &line, delta)
                    .await?;
            if let clima_core::QuantityUpdate::RejectedAtZero = outcome {
                return Ok(format!(
                    "Quantidade mínima é 1; use `quote remove` para tirar a linha.\n\n{}",
                    render::quote(&updated)
                ));
            }
            updated
        }
        QuoteCommand::SetQty { quote: r, line, quantity, service } => {
            quote::set_quantity(state, &QuoteRef::parse(&r), kind(service), &line, quantity)
                .await?
        }
        QuoteCommand::Remove { quote: r, line, service } => {
            quote::remove_line(state, &QuoteRef::parse(&r), kind(service), &line).await?
        }
        QuoteCommand::Discount { quote: r, value, mode } => {
            quote::set_discount(state, &QuoteRef::parse(&r), value, mode).await?
        }
        QuoteCommand::Status { quote: r, status } => {
            quote::set_status(state, &QuoteRef::parse(&r), status).await?
        }
        QuoteCommand::Share { quote: r } => {
            let payload = quote::share(state, &QuoteRef::parse(&r)).await?;
            return Ok(render::share(&payload));
        }
        QuoteCommand::Delete { quote: r } => {
            let deleted = quote::delete(state, &QuoteRef::parse(&r)).await?;
            return Ok(format!(
                "{} removido.\n",
                clima_core::share::document_title(deleted.number)
            ));
        }
    };

    Ok(render::quote(&updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use commands::tests_support::test_state;

    async fn exec(state: &AppState, args: &[&str]) -> AppResult<String> {
        let mut argv = vec!["climaquote"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        dispatch(state, cli.command).await
    }

    #[tokio::test]
    async fn test_quote_workflow_through_dispatch() {
        let state = test_state().await;
        exec(&state, &["catalog", "seed"]).await.unwrap();

        let out = exec(
            &state,
            &["quote", "new", "Ana", "--phone", "(11) 98765-4321", "--material", "Tubo de Cobre 1/2\""],
        )
        .await
        .unwrap();
        assert!(out.contains("Orçamento #0001"));
        assert!(out.contains("0.454 kg"));

        let out = exec(&state, &["quote", "qty", "1", "1", "-1"]).await.unwrap();
        assert!(out.starts_with("Quantidade mínima é 1"));

        let out = exec(&state, &["quote", "share", "#1"]).await.unwrap();
        assert!(out.contains("orcamento-0001.pdf"));
        assert!(out.contains("https://wa.me/5511987654321"));

        let out = exec(&state, &["quote", "list"]).await.unwrap();
        assert!(out.contains("Enviado"));

        let out = exec(&state, &["quote", "list", "--status", "draft"]).await.unwrap();
        assert!(out.starts_with("Rascunho: 0 · Enviado: 1"));
        assert!(out.ends_with("Nenhum orçamento.\n"));

        let out = exec(&state, &["quote", "edit", "1", "--client", "Ana Lima", "--validity-days", "30"])
            .await
            .unwrap();
        assert!(out.contains("Cliente: Ana Lima"));
        assert!(out.contains("Validade: 30 dias"));
    }

    #[tokio::test]
    async fn test_catalog_edit_through_dispatch() {
        let state = test_state().await;
        exec(&state, &["catalog", "seed"]).await.unwrap();

        let out = exec(&state, &["catalog", "edit", "Dreno Corrugado", "--price", "11"])
            .await
            .unwrap();
        assert!(out.starts_with("Item atualizado: Dreno Corrugado ("));

        let out = exec(&state, &["catalog", "list"]).await.unwrap();
        assert!(out.contains("R$ 11,00"));
    }

    #[tokio::test]
    async fn test_empty_company_update_is_rejected() {
        let state = test_state().await;
        let err = exec(&state, &["settings", "set-company"]).await.unwrap_err();
        assert_eq!(err.code, error::ErrorCode::ValidationError);
    }
}
