//! # Quote Commands
//!
//! `climaquote quote ...`: create, edit, price, share and delete quotes.
//!
//! ## Edit Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  load(ref) ──► engine mutation ──► validate_quote_for_save ──► update  │
//! │                (clima-core)          (client name, ≥ 1 line)   (diff)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A command that leaves the quote unchanged (e.g. decrementing a line that
//! is already at 1) does not write anything.

use tracing::{debug, info};

use crate::commands::{find_material, find_service};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use clima_core::share::{document_file_name, document_title, phone_digits, share_message, whatsapp_link};
use clima_core::validation::{
    validate_client_name, validate_discount, validate_item_name, validate_price,
    validate_quote_for_save, validate_unit, validate_uuid, validate_validity_days,
};
use clima_core::{DiscountMode, QuantityUpdate, Quote, QuoteStatus};

// =============================================================================
// Arguments
// =============================================================================

/// How a user points at a quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteRef {
    Number(i64),
    Id(String),
}

impl QuoteRef {
    /// Digits (with an optional leading `#`) are a sequence number; anything
    /// else is an id.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim().trim_start_matches('#');
        match trimmed.parse::<i64>() {
            Ok(number) => QuoteRef::Number(number),
            Err(_) => QuoteRef::Id(trimmed.to_string()),
        }
    }
}

/// Which list of lines a line reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Material,
    Service,
}

/// Input for `quote new`.
#[derive(Debug, Clone, Default)]
pub struct NewQuote {
    pub client_name: String,
    pub client_phone: String,
    pub client_address: String,
    pub client_notes: String,
    pub internal_notes: String,
    pub validity_days: Option<u32>,
    pub payment_terms: Option<String>,
    /// Catalog material references; repeating one adds another unit.
    pub materials: Vec<String>,
    /// Catalog service references; repeating one adds another execution.
    pub services: Vec<String>,
}

/// Header fields `quote edit` may change; only `Some` fields change.
#[derive(Debug, Clone, Default)]
pub struct QuoteHeaderUpdate {
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub client_notes: Option<String>,
    pub internal_notes: Option<String>,
    pub validity_days: Option<u32>,
    pub payment_terms: Option<String>,
}

impl QuoteHeaderUpdate {
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none()
            && self.client_phone.is_none()
            && self.client_address.is_none()
            && self.client_notes.is_none()
            && self.internal_notes.is_none()
            && self.validity_days.is_none()
            && self.payment_terms.is_none()
    }

    fn validate(&self) -> AppResult<()> {
        if self.is_empty() {
            return Err(AppError::validation("Nothing to update"));
        }
        if let Some(name) = &self.client_name {
            validate_client_name(name)?;
        }
        if let Some(days) = self.validity_days {
            validate_validity_days(days)?;
        }
        Ok(())
    }

    fn apply(self, quote: &mut Quote) {
        if let Some(name) = self.client_name {
            quote.client_name = name.trim().to_string();
        }
        if let Some(phone) = self.client_phone {
            quote.client_phone = phone;
        }
        if let Some(address) = self.client_address {
            quote.client_address = address;
        }
        if let Some(notes) = self.client_notes {
            quote.client_notes = notes;
        }
        if let Some(notes) = self.internal_notes {
            quote.internal_notes = notes;
        }
        if let Some(days) = self.validity_days {
            quote.validity_days = days;
        }
        if let Some(terms) = self.payment_terms {
            quote.payment_terms = terms;
        }
    }
}

/// What `quote list` hands back.
#[derive(Debug, Clone)]
pub struct QuoteListing {
    /// Matching quotes, newest first.
    pub quotes: Vec<Quote>,
    /// Count of all quotes per status, in [`QuoteStatus::ALL`] order.
    pub counts: Vec<(QuoteStatus, usize)>,
}

/// What `quote share` hands back.
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub file_name: String,
    pub message: String,
    /// `None` when the client has no phone number.
    pub whatsapp_link: Option<String>,
    pub quote: Quote,
}

// =============================================================================
// Loading & Saving
// =============================================================================

pub async fn get(state: &AppState, reference: &QuoteRef) -> AppResult<Quote> {
    let quotes = state.db().quotes();
    let found = match reference {
        QuoteRef::Number(number) => quotes.get_by_number(*number).await?,
        QuoteRef::Id(id) => {
            validate_uuid(id)?;
            quotes.get_by_id(id).await?
        }
    };

    found.ok_or_else(|| match reference {
        QuoteRef::Number(number) => AppError::not_found("Quote", &format!("#{}", number)),
        QuoteRef::Id(id) => AppError::not_found("Quote", id),
    })
}

/// Lists quotes, optionally only those in `status`.
///
/// The per-status counts always cover every quote.
pub async fn list(state: &AppState, status: Option<QuoteStatus>) -> AppResult<QuoteListing> {
    let all = state.db().quotes().list().await?;

    let counts = QuoteStatus::ALL
        .into_iter()
        .map(|s| (s, all.iter().filter(|q| q.status == s).count()))
        .collect();

    let quotes = match status {
        Some(wanted) => all.into_iter().filter(|q| q.status == wanted).collect(),
        None => all,
    };

    Ok(QuoteListing { quotes, counts })
}

async fn save(state: &AppState, quote: &Quote) -> AppResult<Quote> {
    validate_quote_for_save(quote)?;
    let saved = state.db().quotes().update(quote).await?;
    debug!(number = saved.number, version = saved.version, total = saved.total, "Quote saved");
    Ok(saved)
}

/// Loads a quote, applies `edit`, and saves the result.
async fn edit<F>(state: &AppState, reference: &QuoteRef, edit: F) -> AppResult<Quote>
where
    F: FnOnce(&mut Quote) -> AppResult<()>,
{
    let mut quote = get(state, reference).await?;
    edit(&mut quote)?;
    save(state, &quote).await
}

fn line_id(quote: &Quote, kind: LineKind, reference: &str) -> AppResult<String> {
    let ids: Vec<&str> = match kind {
        LineKind::Material => quote.items.iter().map(|l| l.id.as_str()).collect(),
        LineKind::Service => quote.services.iter().map(|l| l.id.as_str()).collect(),
    };

    let by_position = reference
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| ids.get(i).copied());

    by_position
        .or_else(|| ids.iter().copied().find(|id| *id == reference))
        .map(str::to_string)
        .ok_or_else(|| AppError::not_found("Quote line", reference))
}

// =============================================================================
// Create / Delete
// =============================================================================

pub async fn create(state: &AppState, input: NewQuote) -> AppResult<Quote> {
    validate_client_name(&input.client_name)?;

    let mut quote = Quote::new(input.client_name.trim());
    quote.client_phone = input.client_phone;
    quote.client_address = input.client_address;
    quote.client_notes = input.client_notes;
    quote.internal_notes = input.internal_notes;
    quote.validity_days = input
        .validity_days
        .unwrap_or(state.config().default_validity_days);
    quote.payment_terms = input
        .payment_terms
        .unwrap_or_else(|| state.config().default_payment_terms.clone());
    validate_validity_days(quote.validity_days)?;

    let resolver = state.resolver().await?;
    let (materials, services) = state
        .catalog()
        .with_catalog(|catalog| {
            let materials = input
                .materials
                .iter()
                .map(|r| find_material(catalog, r))
                .collect::<AppResult<Vec<_>>>()?;
            let services = input
                .services
                .iter()
                .map(|r| find_service(catalog, r))
                .collect::<AppResult<Vec<_>>>()?;
            Ok::<_, AppError>((materials, services))
        })
        .await??;

    for material in &materials {
        quote.add_material(&resolver, material);
    }
    for service in &services {
        quote.add_service(service);
    }

    validate_quote_for_save(&quote)?;
    let created = state.db().quotes().create(&quote).await?;

    info!(number = created.number, client = %created.client_name, total = created.total, "Quote created");
    Ok(created)
}

/// Changes client details, validity or payment terms. Lines are untouched.
pub async fn edit_header(
    state: &AppState,
    reference: &QuoteRef,
    update: QuoteHeaderUpdate,
) -> AppResult<Quote> {
    update.validate()?;
    edit(state, reference, |quote| {
        update.apply(quote);
        Ok(())
    })
    .await
}

pub async fn delete(state: &AppState, reference: &QuoteRef) -> AppResult<Quote> {
    let quote = get(state, reference).await?;
    state.db().quotes().delete(&quote.id).await?;
    info!(number = quote.number, "Quote deleted");
    Ok(quote)
}

// =============================================================================
// Lines
// =============================================================================

/// Adds `count` units of a catalog material.
pub async fn add_material(
    state: &AppState,
    reference: &QuoteRef,
    material_ref: &str,
    count: u32,
) -> AppResult<Quote> {
    let resolver = state.resolver().await?;
    let material = state
        .catalog()
        .with_catalog(|catalog| find_material(catalog, material_ref))
        .await??;

    edit(state, reference, |quote| {
        for _ in 0..count.max(1) {
            quote.add_material(&resolver, &material);
        }
        Ok(())
    })
    .await
}

/// Adds `count` executions of a catalog service.
pub async fn add_service(
    state: &AppState,
    reference: &QuoteRef,
    service_ref: &str,
    count: u32,
) -> AppResult<Quote> {
    let service = state
        .catalog()
        .with_catalog(|catalog| find_service(catalog, service_ref))
        .await??;

    edit(state, reference, |quote| {
        for _ in 0..count.max(1) {
            quote.add_service(&service);
        }
        Ok(())
    })
    .await
}

pub async fn add_custom_material(
    state: &AppState,
    reference: &QuoteRef,
    name: &str,
    unit: &str,
    unit_price: f64,
) -> AppResult<Quote> {
    validate_item_name(name)?;
    validate_unit(unit)?;
    validate_price(unit_price)?;

    edit(state, reference, |quote| {
        quote.add_custom_material(name.trim(), unit.trim(), unit_price)?;
        Ok(())
    })
    .await
}

pub async fn add_custom_service(
    state: &AppState,
    reference: &QuoteRef,
    name: &str,
    price: f64,
) -> AppResult<Quote> {
    validate_item_name(name)?;
    validate_price(price)?;

    edit(state, reference, |quote| {
        quote.add_custom_service(name.trim(), price)?;
        Ok(())
    })
    .await
}

/// Changes a line's quantity by `delta`.
///
/// A change that would leave the line at zero or below is rejected by the
/// engine; the quote is returned untouched and nothing is written.
pub async fn change_quantity(
    state: &AppState,
    reference: &QuoteRef,
    kind: LineKind,
    line_ref: &str,
    delta: f64,
) -> AppResult<(Quote, QuantityUpdate)> {
    let mut quote = get(state, reference).await?;
    let line = line_id(&quote, kind, line_ref)?;

    let update = match kind {
        LineKind::Material => quote.update_item_quantity(&line, delta)?,
        LineKind::Service => quote.update_service_quantity(&line, delta)?,
    };

    match update {
        QuantityUpdate::RejectedAtZero => Ok((quote, update)),
        QuantityUpdate::Applied { .. } => Ok((save(state, &quote).await?, update)),
    }
}

/// Sets a line's quantity. Zero drops the line.
pub async fn set_quantity(
    state: &AppState,
    reference: &QuoteRef,
    kind: LineKind,
    line_ref: &str,
    quantity: f64,
) -> AppResult<Quote> {
    edit(state, reference, |quote| {
        let line = line_id(quote, kind, line_ref)?;
        match kind {
            LineKind::Material => quote.set_item_quantity(&line, quantity)?,
            LineKind::Service => quote.set_service_quantity(&line, quantity)?,
        }
        Ok(())
    })
    .await
}

/// Removes a line whatever its quantity.
pub async fn remove_line(
    state: &AppState,
    reference: &QuoteRef,
    kind: LineKind,
    line_ref: &str,
) -> AppResult<Quote> {
    edit(state, reference, |quote| {
        let line = line_id(quote, kind, line_ref)?;
        match kind {
            LineKind::Material => quote.remove_item(&line),
            LineKind::Service => quote.remove_service(&line),
        };
        Ok(())
    })
    .await
}

// =============================================================================
// Discount / Status / Share
// =============================================================================

pub async fn set_discount(
    state: &AppState,
    reference: &QuoteRef,
    value: f64,
    mode: DiscountMode,
) -> AppResult<Quote> {
    validate_discount(value, mode)?;

    edit(state, reference, |quote| {
        quote.set_discount(value, mode)?;
        Ok(())
    })
    .await
}

/// Moves a quote to any status.
pub async fn set_status(
    state: &AppState,
    reference: &QuoteRef,
    status: QuoteStatus,
) -> AppResult<Quote> {
    let quote = get(state, reference).await?;
    state.db().quotes().update_status(&quote.id, status).await?;
    info!(number = quote.number, from = %quote.status, to = %status, "Quote status changed");
    get(state, &QuoteRef::Id(quote.id)).await
}

/// Builds the share text and marks the quote as sent.
pub async fn share(state: &AppState, reference: &QuoteRef) -> AppResult<SharePayload> {
    let quote = set_status(state, reference, QuoteStatus::Sent).await?;

    let whatsapp = if phone_digits(&quote.client_phone).is_empty() {
        None
    } else {
        Some(whatsapp_link(&quote))
    };

    Ok(SharePayload {
        title: document_title(quote.number),
        file_name: document_file_name(quote.number),
        message: share_message(&quote),
        whatsapp_link: whatsapp,
        quote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::catalog;
    use crate::commands::tests_support::test_state;
    use crate::error::ErrorCode;

    async fn seeded() -> AppState {
        let state = test_state().await;
        catalog::seed(&state).await.unwrap();
        state
    }

    fn new_quote(materials: &[&str], services: &[&str]) -> NewQuote {
        NewQuote {
            client_name: "Ana Souza".to_string(),
            client_phone: "(11) 91234-5678".to_string(),
            materials: materials.iter().map(|s| s.to_string()).collect(),
            services: services.iter().map(|s| s.to_string()).collect(),
            ..NewQuote::default()
        }
    }

    #[test]
    fn test_quote_ref_parse() {
        assert_eq!(QuoteRef::parse("7"), QuoteRef::Number(7));
        assert_eq!(QuoteRef::parse("#0012"), QuoteRef::Number(12));
        assert_eq!(QuoteRef::parse("abc-1"), QuoteRef::Id("abc-1".to_string()));
    }

    #[tokio::test]
    async fn test_create_prices_copper_and_services() {
        let state = seeded().await;
        let quote = create(
            &state,
            new_quote(
                &["Tubo de Cobre 1/2\"", "Tubo de Cobre 1/2\"", "Tubo de Cobre 1/2\""],
                &["Instalação Split 9.000 BTUs"],
            ),
        )
        .await
        .unwrap();

        assert_eq!(quote.number, 1);
        assert_eq!(quote.items.len(), 1);
        assert_eq!(quote.items[0].quantity, 3.0);
        assert_eq!(quote.items[0].total, 102.15);
        assert_eq!(quote.subtotal_services, 350.0);
        assert!((quote.total - 452.15).abs() < 1e-9);
        assert_eq!(quote.validity_days, 15);
    }

    #[tokio::test]
    async fn test_create_requires_a_line() {
        let state = seeded().await;
        let err = create(&state, new_quote(&[], &[])).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(list(&state, None).await.unwrap().quotes.is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_client_name() {
        let state = seeded().await;
        let mut input = new_quote(&["Dreno Corrugado"], &[]);
        input.client_name = "   ".to_string();
        assert!(create(&state, input).await.is_err());
    }

    #[tokio::test]
    async fn test_decrement_at_one_writes_nothing() {
        let state = seeded().await;
        let created = create(&state, new_quote(&["Dreno Corrugado"], &[])).await.unwrap();
        let reference = QuoteRef::Number(created.number);

        let (quote, update) = change_quantity(&state, &reference, LineKind::Material, "1", -1.0)
            .await
            .unwrap();
        assert_eq!(update, QuantityUpdate::RejectedAtZero);
        assert_eq!(quote.items[0].quantity, 1.0);

        let stored = get(&state, &reference).await.unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_increment_then_discount() {
        let state = seeded().await;
        let created = create(&state, new_quote(&["Cabo PP 3x1.5mm"], &["Carga de Gás"]))
            .await
            .unwrap();
        let reference = QuoteRef::Number(created.number);

        let (quote, _) = change_quantity(&state, &reference, LineKind::Material, "1", 4.0)
            .await
            .unwrap();
        assert_eq!(quote.items[0].total, 60.0);
        assert_eq!(quote.version, 2);

        let quote = set_discount(&state, &reference, 10.0, DiscountMode::Percentage)
            .await
            .unwrap();
        assert_eq!(quote.discount_value, 18.0);
        assert_eq!(quote.total, 162.0);
    }

    #[tokio::test]
    async fn test_removing_last_line_is_rejected() {
        let state = seeded().await;
        let created = create(&state, new_quote(&["Dreno Corrugado"], &[])).await.unwrap();
        let reference = QuoteRef::Number(created.number);

        let err = remove_line(&state, &reference, LineKind::Material, "1")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get(&state, &reference).await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_custom_lines_and_unknown_line() {
        let state = seeded().await;
        let created = create(&state, new_quote(&[], &["Desinstalação"])).await.unwrap();
        let reference = QuoteRef::Id(created.id.clone());

        let quote = add_custom_material(&state, &reference, "Tubo de Cobre 1/2\"", "m", 50.0)
            .await
            .unwrap();
        assert!(quote.items[0].copper.is_none());
        assert_eq!(quote.items[0].total, 50.0);

        let quote = add_custom_service(&state, &reference, "Hora extra", 90.0)
            .await
            .unwrap();
        assert_eq!(quote.services.len(), 2);

        let err = set_quantity(&state, &reference, LineKind::Service, "9", 2.0)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_share_marks_sent() {
        let state = seeded().await;
        let created = create(&state, new_quote(&[], &["Manutenção Preventiva"])).await.unwrap();

        let payload = share(&state, &QuoteRef::Number(created.number)).await.unwrap();
        assert_eq!(payload.quote.status, QuoteStatus::Sent);
        assert_eq!(payload.file_name, "orcamento-0001.pdf");
        assert_eq!(payload.title, "Orçamento #0001");

        let link = payload.whatsapp_link.unwrap();
        assert!(link.starts_with("https://wa.me/5511912345678?text="));
        assert!(link.contains("%20"));
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let state = seeded().await;
        let created = create(&state, new_quote(&["Dreno Corrugado"], &[])).await.unwrap();
        let reference = QuoteRef::Number(created.number);

        delete(&state, &reference).await.unwrap();
        let err = get(&state, &reference).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = get(&state, &QuoteRef::Id(created.id)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_id_is_a_validation_error() {
        let state = test_state().await;
        let err = get(&state, &QuoteRef::parse("abc-1")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_counts_all() {
        let state = seeded().await;
        for _ in 0..3 {
            create(&state, new_quote(&["Dreno Corrugado"], &[])).await.unwrap();
        }
        set_status(&state, &QuoteRef::Number(1), QuoteStatus::Sent).await.unwrap();
        set_status(&state, &QuoteRef::Number(2), QuoteStatus::Approved).await.unwrap();

        let sent = list(&state, Some(QuoteStatus::Sent)).await.unwrap();
        let numbers: Vec<i64> = sent.quotes.iter().map(|q| q.number).collect();
        assert_eq!(numbers, [1]);
        assert_eq!(
            sent.counts,
            [
                (QuoteStatus::Draft, 1),
                (QuoteStatus::Sent, 1),
                (QuoteStatus::Approved, 1),
                (QuoteStatus::Cancelled, 0),
            ]
        );

        let all = list(&state, None).await.unwrap();
        let numbers: Vec<i64> = all.quotes.iter().map(|q| q.number).collect();
        assert_eq!(numbers, [3, 2, 1]);
        assert!(list(&state, Some(QuoteStatus::Cancelled)).await.unwrap().quotes.is_empty());
    }

    #[tokio::test]
    async fn test_edit_header_keeps_lines() {
        let state = seeded().await;
        let created = create(&state, new_quote(&["Dreno Corrugado"], &["Carga de Gás"]))
            .await
            .unwrap();
        let reference = QuoteRef::Number(created.number);

        let edited = edit_header(
            &state,
            &reference,
            QuoteHeaderUpdate {
                client_name: Some(" Ana Lima ".to_string()),
                client_address: Some("Rua das Flores, 10".to_string()),
                validity_days: Some(30),
                payment_terms: Some("À vista".to_string()),
                ..QuoteHeaderUpdate::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(edited.version, created.version + 1);
        assert_eq!(edited.client_name, "Ana Lima");
        assert_eq!(edited.client_phone, created.client_phone);
        assert_eq!(edited.validity_days, 30);
        assert_eq!(edited.payment_terms, "À vista");
        let lines = |q: &Quote| {
            let items: Vec<(String, f64)> =
                q.items.iter().map(|l| (l.id.clone(), l.quantity)).collect();
            let services: Vec<(String, f64)> =
                q.services.iter().map(|l| (l.id.clone(), l.quantity)).collect();
            (items, services)
        };
        assert_eq!(lines(&edited), lines(&created));
        assert_eq!(edited.total, created.total);
    }

    #[tokio::test]
    async fn test_edit_header_validates_before_writing() {
        let state = seeded().await;
        let created = create(&state, new_quote(&["Dreno Corrugado"], &[])).await.unwrap();
        let reference = QuoteRef::Number(created.number);

        let blank = QuoteHeaderUpdate {
            client_name: Some("  ".to_string()),
            ..QuoteHeaderUpdate::default()
        };
        let err = edit_header(&state, &reference, blank).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let zero_days = QuoteHeaderUpdate {
            validity_days: Some(0),
            ..QuoteHeaderUpdate::default()
        };
        assert!(edit_header(&state, &reference, zero_days).await.is_err());

        let nothing = edit_header(&state, &reference, QuoteHeaderUpdate::default()).await;
        assert!(nothing.is_err());

        let stored = get(&state, &reference).await.unwrap();
        assert_eq!(stored.version, created.version);
        assert_eq!(stored.client_name, "Ana Souza");
    }
}
