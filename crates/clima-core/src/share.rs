//! # Share Helpers
//!
//! Text a quote is sent with: padded number, document file name, the
//! WhatsApp greeting and the `wa.me` link carrying it.
//!
//! ## Example
//! ```rust
//! use clima_core::share::{document_file_name, quote_number_label};
//!
//! assert_eq!(quote_number_label(7), "0007");
//! assert_eq!(document_file_name(7), "orcamento-0007.pdf");
//! ```

use url::form_urlencoded;

use crate::types::Quote;

/// WhatsApp click-to-chat base. Numbers are Brazilian (country code 55).
const WHATSAPP_BASE: &str = "https://wa.me/55";

/// Zero-padded quote number, at least 4 digits.
pub fn quote_number_label(number: i64) -> String {
    format!("{:04}", number)
}

/// Document title: `Orçamento #0007`.
pub fn document_title(number: i64) -> String {
    format!("Orçamento #{}", quote_number_label(number))
}

/// File name of the exported document.
pub fn document_file_name(number: i64) -> String {
    format!("orcamento-{}.pdf", quote_number_label(number))
}

/// Greeting sent to the client alongside the document.
pub fn share_message(quote: &Quote) -> String {
    format!(
        "Olá {}! Segue o orçamento #{} no valor de {}. Em anexo o PDF detalhado.",
        quote.client_name,
        quote_number_label(quote.number),
        quote.total()
    )
}

/// Keeps only the digits of a phone number.
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Click-to-chat link with the share message pre-filled.
///
/// Spaces are sent as `%20`.
pub fn whatsapp_link(quote: &Quote) -> String {
    let message: String = form_urlencoded::byte_serialize(share_message(quote).as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    format!(
        "{}{}?text={}",
        WHATSAPP_BASE,
        phone_digits(&quote.client_phone),
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> Quote {
        let mut quote = Quote::new("Carlos");
        quote.number = 12;
        quote.client_phone = "(11) 98765-4321".to_string();
        quote.add_custom_service("Instalação", 1234.56).unwrap();
        quote
    }

    #[test]
    fn test_number_label() {
        assert_eq!(quote_number_label(1), "0001");
        assert_eq!(quote_number_label(12345), "12345");
        assert_eq!(document_title(3), "Orçamento #0003");
    }

    #[test]
    fn test_share_message() {
        assert_eq!(
            share_message(&quote()),
            "Olá Carlos! Segue o orçamento #0012 no valor de R$ 1.234,56. Em anexo o PDF detalhado."
        );
    }

    #[test]
    fn test_whatsapp_link() {
        let link = whatsapp_link(&quote());
        assert!(link.starts_with("https://wa.me/5511987654321?text=Ol%C3%A1%20Carlos%21"));
        assert!(!link.contains('+'));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_phone_digits() {
        assert_eq!(phone_digits("+55 (11) 4002-8922"), "551140028922");
        assert_eq!(phone_digits(""), "");
    }
}
