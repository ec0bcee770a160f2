//! globalmarket - document validation for the GlobalMarket retail collections
//!
//! Collections (products, orders, customers, reviews) are declared as
//! `$jsonSchema` validators. This crate loads those declarations into typed
//! rule trees and validates documents against them, reporting every
//! violation with its field path.
//!
//! ```ignore
//! use globalmarket::catalog::Catalog;
//! use globalmarket::schema::SchemaValidator;
//!
//! let catalog = Catalog::builtin()?;
//! let products = catalog.schema("products").unwrap();
//! let result = SchemaValidator::new().validate(products, &document);
//! ```

pub mod catalog;
pub mod cli;
pub mod observability;
pub mod schema;
