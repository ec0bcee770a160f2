//! Example documents for a manual validation run
//!
//! These are demonstration inputs, printed with their outcome. They carry
//! no expected outcome of their own.

use serde_json::{json, Value};

use crate::schema::Document;

#[derive(Debug, Clone)]
pub struct ExampleDocument {
    pub collection: &'static str,
    pub label: &'static str,
    pub document: Document,
}

pub fn builtin_examples() -> Vec<ExampleDocument> {
    vec![
        example(
            "products",
            "valid product",
            json!({
                "product_id": "PROD-001",
                "product_name": "Laptop Gaming",
                "category": "Technology",
                "price": 999.99,
                "stock_quantity": 50
            }),
        ),
        example(
            "products",
            "negative price",
            json!({
                "product_id": "PROD-002",
                "product_name": "Mouse",
                "category": "Technology",
                "price": -10.99
            }),
        ),
        example(
            "customers",
            "valid customer",
            json!({
                "customer_id": "CUST-001",
                "customer_name": "Juan Pérez",
                "email": "juan@example.com",
                "segment": "Consumer"
            }),
        ),
        example(
            "customers",
            "malformed email",
            json!({
                "customer_id": "CUST-002",
                "customer_name": "Ana López",
                "email": "ana@example",
                "segment": "Corporate"
            }),
        ),
    ]
}

fn example(collection: &'static str, label: &'static str, value: Value) -> ExampleDocument {
    let document = match value {
        Value::Object(map) => map,
        _ => Document::new(),
    };
    ExampleDocument {
        collection,
        label,
        document,
    }
}
