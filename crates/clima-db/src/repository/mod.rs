//! # Repository Module
//!
//! Database repository implementations for ClimaQuote.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  CLI Command                                                            │
//! │       │                                                                 │
//! │       │  db.quotes().update(&quote)                                     │
//! │       ▼                                                                 │
//! │  QuoteRepository                                                        │
//! │  ├── list(&self)                                                        │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── create(&self, quote)                                               │
//! │  ├── update(&self, quote)                                               │
//! │  └── delete(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Materials and services
//! - [`CompanyRepository`](company::CompanyRepository) - Company settings singleton
//! - [`QuoteRepository`](quote::QuoteRepository) - Quotes and their lines

pub mod catalog;
pub mod company;
pub mod quote;
