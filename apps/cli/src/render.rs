//! # Terminal Output
//!
//! Plain-text rendering of command results. Every function returns a
//! `String` so output can be asserted in tests; `main` prints it.

use std::fmt::Write;

use clima_core::copper::format_weight;
use clima_core::share::{document_title, quote_number_label};
use clima_core::{Catalog, CompanySettings, DiscountMode, Money, Quote};
use clima_db::SeedReport;

use crate::commands::quote::{QuoteListing, SharePayload};

/// `3` for whole quantities, `2.5` otherwise.
fn quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

pub fn catalog(catalog: &Catalog) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "MATERIAIS ({})", catalog.materials().len());
    for m in catalog.materials() {
        let _ = writeln!(
            out,
            "  {:<36} {:>14} /{:<3} {:<20} {}",
            m.name,
            m.price().to_string(),
            m.unit,
            m.category.label(),
            m.id
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "SERVIÇOS ({})", catalog.services().len());
    for s in catalog.services() {
        let _ = writeln!(
            out,
            "  {:<36} {:>14}     {:<20} {}",
            s.name,
            s.price().to_string(),
            s.category.label(),
            s.id
        );
    }

    out
}

pub fn quote(quote: &Quote) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{}  [{}]  v{}",
        document_title(quote.number),
        quote.status.label(),
        quote.version
    );
    let _ = writeln!(out, "Cliente: {}", quote.client_name);
    if !quote.client_phone.is_empty() {
        let _ = writeln!(out, "Telefone: {}", quote.client_phone);
    }
    if !quote.client_address.is_empty() {
        let _ = writeln!(out, "Endereço: {}", quote.client_address);
    }

    if !quote.items.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Materiais");
        for (i, line) in quote.items.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<36} {:>6} {:<3} x {:>12} = {:>14}",
                i + 1,
                line.name,
                quantity(line.quantity),
                line.unit,
                line.unit_price().to_string(),
                line.total().to_string()
            );
            if let Some(copper) = &line.copper {
                let _ = writeln!(
                    out,
                    "      cobre {} · {}/m · total {} · {}/kg",
                    copper.size,
                    format_weight(copper.weight_per_meter),
                    format_weight(copper.total_weight),
                    Money::new(copper.price_per_kg)
                );
            }
        }
    }

    if !quote.services.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Serviços");
        for (i, line) in quote.services.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {:>2}. {:<36} {:>6}     x {:>12} = {:>14}",
                i + 1,
                line.name,
                quantity(line.quantity),
                Money::new(line.unit_price).to_string(),
                line.price().to_string()
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "  Materiais: {:>14}", Money::new(quote.subtotal_materials).to_string());
    let _ = writeln!(out, "  Serviços:  {:>14}", Money::new(quote.subtotal_services).to_string());
    if quote.discount_value != 0.0 {
        let label = match quote.discount.mode {
            DiscountMode::Percentage => format!("Desconto ({}%)", quantity(quote.discount.value)),
            DiscountMode::Fixed => "Desconto".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<11}{:>14}",
            format!("{}:", label),
            Money::new(-quote.discount_value).to_string()
        );
    }
    let _ = writeln!(out, "  TOTAL:     {:>14}", quote.total().to_string());

    let _ = writeln!(out);
    let _ = writeln!(out, "Validade: {} dias", quote.validity_days);
    let _ = writeln!(out, "Pagamento: {}", quote.payment_terms);
    if !quote.client_notes.is_empty() {
        let _ = writeln!(out, "Observações: {}", quote.client_notes);
    }
    if !quote.internal_notes.is_empty() {
        let _ = writeln!(out, "Notas internas: {}", quote.internal_notes);
    }

    out
}

/// Per-status counts, then one row per quote.
pub fn quote_list(listing: &QuoteListing) -> String {
    let counts: Vec<String> = listing
        .counts
        .iter()
        .map(|(status, count)| format!("{}: {}", status.label(), count))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "{}", counts.join(" · "));

    if listing.quotes.is_empty() {
        let _ = writeln!(out, "Nenhum orçamento.");
        return out;
    }

    for q in &listing.quotes {
        let _ = writeln!(
            out,
            "#{}  {:<10} {:<30} {:>14}  {}",
            quote_number_label(q.number),
            q.status.label(),
            q.client_name,
            q.total().to_string(),
            q.created_at.format("%d/%m/%Y")
        );
    }
    out
}

pub fn settings(settings: &CompanySettings) -> String {
    let mut out = String::new();
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };

    let _ = writeln!(out, "Empresa:        {}", or_dash(&settings.name));
    let _ = writeln!(out, "CNPJ/CPF:       {}", or_dash(&settings.tax_id));
    let _ = writeln!(out, "Telefone:       {}", or_dash(&settings.phone));
    let _ = writeln!(out, "Endereço:       {}", or_dash(&settings.address));
    let _ = writeln!(out, "Logo:           {}", or_dash(&settings.logo));
    let _ = writeln!(out, "Rodapé:         {}", settings.footer_text);
    let _ = writeln!(
        out,
        "Cobre:          {}/kg",
        Money::new(settings.effective_copper_price_per_kg())
    );
    out
}

pub fn share(payload: &SharePayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", payload.title);
    let _ = writeln!(out, "Arquivo:  {}", payload.file_name);
    let _ = writeln!(out, "Mensagem: {}", payload.message);
    match &payload.whatsapp_link {
        Some(link) => {
            let _ = writeln!(out, "WhatsApp: {}", link);
        }
        None => {
            let _ = writeln!(out, "WhatsApp: (cliente sem telefone)");
        }
    }
    out
}

pub fn seed(report: &SeedReport) -> String {
    if report.is_empty() {
        "Catálogo já possui materiais e serviços; nada foi adicionado.\n".to_string()
    } else {
        format!(
            "Adicionados {} materiais e {} serviços.\n",
            report.materials, report.services
        )
    }
}
