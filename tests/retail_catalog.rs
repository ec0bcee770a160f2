//! Retail Catalog Tests
//!
//! Documents from the four built-in collections checked end to end:
//! - products (strict, exclusive price minimum, embedded ratings)
//! - orders (order id pattern, status enum, non-empty line items)
//! - customers (id and email patterns, segment enum)
//! - reviews (rating range)

use globalmarket::catalog::Catalog;
use globalmarket::schema::{
    BsonType, Limit, SchemaDefinition, SchemaValidator, ValidationResult, ViolationKind,
};
use serde_json::{json, Map, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn doc(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {}", other),
    }
}

fn schema(catalog: &Catalog, name: &str) -> SchemaDefinition {
    catalog.schema(name).unwrap().clone()
}

fn check(collection: &str, value: Value) -> ValidationResult {
    let catalog = Catalog::builtin().unwrap();
    SchemaValidator::new().validate(&schema(&catalog, collection), &doc(value))
}

fn rules(result: &ValidationResult) -> Vec<(String, &'static str)> {
    result
        .violations()
        .iter()
        .map(|v| (v.path.clone(), v.rule()))
        .collect()
}

fn valid_order() -> Value {
    json!({
        "order_id": "ORD-20240301-AB12CD",
        "customer_id": "CUST-0000ABCD",
        "order_date": {"$date": "2024-03-01T10:00:00Z"},
        "status": "processing",
        "total_amount": 39.0,
        "items": [
            {"product_id": "PROD-001", "quantity": 2, "unit_price": 19.5, "subtotal": 39.0}
        ],
        "shipping_address": {"city": "Bogotá", "country": "CO"},
        "payment_method": "paypal",
        "priority": "high"
    })
}

// =============================================================================
// Products
// =============================================================================

/// Valid product with an optional int field is accepted.
#[test]
fn test_valid_product_accepted() {
    let result = check(
        "products",
        json!({
            "product_id": "PROD-001",
            "product_name": "Laptop Gaming",
            "category": "Technology",
            "price": 999.99,
            "stock_quantity": 50
        }),
    );
    assert_eq!(result, ValidationResult::Accepted);
}

/// Negative price violates the exclusive minimum.
#[test]
fn test_negative_price_rejected() {
    let result = check(
        "products",
        json!({
            "product_id": "PROD-002",
            "product_name": "Mouse",
            "category": "Technology",
            "price": -10.99
        }),
    );

    let violations = result.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path, "price");
    match &violations[0].kind {
        ViolationKind::RangeViolation { limit, bound, actual } => {
            assert_eq!(*limit, Limit::Minimum);
            assert!(bound.exclusive);
            assert_eq!(bound.value, 0.0);
            assert_eq!(*actual, -10.99);
        }
        other => panic!("unexpected violation {:?}", other),
    }
}

/// A price of exactly zero is rejected because the minimum is exclusive.
#[test]
fn test_zero_price_rejected() {
    let result = check(
        "products",
        json!({"product_id": "P", "product_name": "Pen", "category": "Furniture", "price": 0}),
    );
    assert_eq!(rules(&result), vec![("price".to_string(), "RangeViolation")]);
}

/// Products is strict: undeclared fields are reported, also inside ratings.
#[test]
fn test_products_strict_mode() {
    let result = check(
        "products",
        json!({
            "product_id": "PROD-003",
            "product_name": "Desk",
            "category": "Furniture",
            "price": 120.0,
            "color": "oak",
            "ratings": [{"user_id": "u1", "rating": 5, "helpful": true}]
        }),
    );
    assert_eq!(
        rules(&result),
        vec![
            ("color".to_string(), "UnknownFieldViolation"),
            ("ratings[0].helpful".to_string(), "UnknownFieldViolation"),
        ]
    );
}

/// Stored products carry a store-assigned `_id`; strict mode allows it.
#[test]
fn test_strict_products_allow_id() {
    let result = check(
        "products",
        json!({
            "_id": {"$oid": "65e1f0a2b3c4d5e6f7a8b9c0"},
            "product_id": "PROD-001",
            "product_name": "Laptop Gaming",
            "category": "Technology",
            "price": 999.99
        }),
    );
    assert_eq!(result, ValidationResult::Accepted);
}

/// `int` fields hold 32-bit values only.
#[test]
fn test_stock_quantity_int_range() {
    let product = |quantity: Value| {
        json!({
            "product_id": "PROD-001",
            "product_name": "Laptop Gaming",
            "category": "Technology",
            "price": 999.99,
            "stock_quantity": quantity
        })
    };

    assert!(check("products", product(json!(2147483647))).is_accepted());
    for too_wide in [json!(2147483648_i64), json!(9_000_000_000_000_000_000_u64)] {
        let result = check("products", product(too_wide));
        match &result.violations()[..] {
            [violation] => {
                assert_eq!(violation.path, "stock_quantity");
                assert_eq!(
                    violation.kind,
                    ViolationKind::TypeMismatch {
                        expected: BsonType::Int,
                        actual: BsonType::Long,
                    }
                );
            }
            other => panic!("unexpected violations {:?}", other),
        }
    }
}

/// Category enum, name length and tag element types are all checked.
#[test]
fn test_product_field_constraints() {
    let result = check(
        "products",
        json!({
            "product_id": "PROD-004",
            "product_name": "TV",
            "category": "technology",
            "price": 300.0,
            "average_rating": 5.5,
            "tags": ["screen", 4],
            "ratings": [{"user_id": "u1", "rating": 0, "date": {"$date": "2024-01-01T00:00:00Z"}}]
        }),
    );
    assert_eq!(
        rules(&result),
        vec![
            ("product_name".to_string(), "LengthViolation"),
            ("category".to_string(), "EnumViolation"),
            ("average_rating".to_string(), "RangeViolation"),
            ("tags[1]".to_string(), "TypeMismatch"),
            ("ratings[0].rating".to_string(), "RangeViolation"),
        ]
    );
}

// =============================================================================
// Orders
// =============================================================================

#[test]
fn test_valid_order_accepted() {
    assert!(check("orders", valid_order()).is_accepted());
}

/// An empty items array violates minItems = 1.
#[test]
fn test_empty_items_rejected() {
    let mut order = valid_order();
    order["items"] = json!([]);
    let result = check("orders", order);

    assert_eq!(rules(&result), vec![("items".to_string(), "ArityViolation")]);
    match &result.violations()[0].kind {
        ViolationKind::ArityViolation { limit, bound, actual } => {
            assert_eq!(*limit, Limit::Minimum);
            assert_eq!(*bound, 1);
            assert_eq!(*actual, 0);
        }
        other => panic!("unexpected violation {:?}", other),
    }
}

/// Line items are validated one by one, with indexed paths.
#[test]
fn test_line_item_violations() {
    let mut order = valid_order();
    order["items"] = json!([
        {"product_id": "PROD-001", "quantity": 1, "unit_price": 1.0},
        {"product_id": "PROD-002", "quantity": 101, "unit_price": -1.0},
        {"quantity": 0}
    ]);
    let result = check("orders", order);
    assert_eq!(
        rules(&result),
        vec![
            ("items[1].quantity".to_string(), "RangeViolation"),
            ("items[1].unit_price".to_string(), "RangeViolation"),
            ("items[2].product_id".to_string(), "MissingRequiredField"),
            ("items[2].unit_price".to_string(), "MissingRequiredField"),
            ("items[2].quantity".to_string(), "RangeViolation"),
        ]
    );
}

#[test]
fn test_order_id_pattern_and_status_enum() {
    let mut order = valid_order();
    order["order_id"] = json!("ORD-2024-ABC");
    order["status"] = json!("returned");
    let result = check("orders", order);
    assert_eq!(
        rules(&result),
        vec![
            ("order_id".to_string(), "PatternViolation"),
            ("status".to_string(), "EnumViolation"),
        ]
    );
}

/// Orders is permissive: undeclared fields pass, nested types still checked.
#[test]
fn test_orders_permissive_but_typed() {
    let mut order = valid_order();
    order["gift_wrap"] = json!(true);
    order["shipping_address"]["postal_code"] = json!(110111);
    let result = check("orders", order);
    assert_eq!(
        rules(&result),
        vec![("shipping_address.postal_code".to_string(), "TypeMismatch")]
    );
}

/// Dates must be extended JSON dates, not plain strings.
#[test]
fn test_order_date_must_be_date() {
    let mut order = valid_order();
    order["order_date"] = json!("2024-03-01");
    let result = check("orders", order);
    match &result.violations()[0].kind {
        ViolationKind::TypeMismatch { expected, actual } => {
            assert_eq!(*expected, BsonType::Date);
            assert_eq!(*actual, BsonType::String);
        }
        other => panic!("unexpected violation {:?}", other),
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Name, email and segment of the sample customer are valid. Its id,
/// "CUST-001", is shorter than the eight characters the id pattern requires.
#[test]
fn test_sample_customer_only_fails_id_pattern() {
    let result = check(
        "customers",
        json!({
            "customer_id": "CUST-001",
            "customer_name": "Juan Pérez",
            "email": "juan@example.com",
            "segment": "Consumer"
        }),
    );
    assert_eq!(
        rules(&result),
        vec![("customer_id".to_string(), "PatternViolation")]
    );
}

#[test]
fn test_valid_customer_accepted() {
    let result = check(
        "customers",
        json!({
            "customer_id": "CUST-0000001A",
            "customer_name": "Juan Pérez",
            "email": "juan@example.com",
            "segment": "Consumer",
            "phone": "+51 (1) 555-0100"
        }),
    );
    assert_eq!(result, ValidationResult::Accepted);
}

/// An email without a top-level domain fails the email pattern.
#[test]
fn test_malformed_email_rejected() {
    let result = check(
        "customers",
        json!({
            "customer_id": "CUST-002",
            "customer_name": "Ana López",
            "email": "ana@example",
            "segment": "Corporate"
        }),
    );
    assert!(!result.is_accepted());

    let email = result
        .violations()
        .iter()
        .find(|v| v.path == "email")
        .expect("email violation");
    match &email.kind {
        ViolationKind::PatternViolation { actual, .. } => assert_eq!(actual, "ana@example"),
        other => panic!("unexpected violation {:?}", other),
    }
}

#[test]
fn test_customer_phone_and_segment() {
    let result = check(
        "customers",
        json!({
            "customer_id": "CUST-0000001A",
            "customer_name": "Li",
            "email": "li@example.org",
            "segment": "Small Business",
            "phone": "12345"
        }),
    );
    assert_eq!(
        rules(&result),
        vec![
            ("segment".to_string(), "EnumViolation"),
            ("phone".to_string(), "PatternViolation"),
        ]
    );
}

// =============================================================================
// Reviews
// =============================================================================

#[test]
fn test_review_rating_bounds() {
    let review = |rating: Value| {
        json!({
            "review_id": "REV-1",
            "product_id": "PROD-001",
            "customer_id": "CUST-0000001A",
            "rating": rating,
            "review_date": {"$date": 1709287200000_i64}
        })
    };

    assert!(check("reviews", review(json!(1))).is_accepted());
    assert!(check("reviews", review(json!(5))).is_accepted());
    assert_eq!(
        rules(&check("reviews", review(json!(6)))),
        vec![("rating".to_string(), "RangeViolation")]
    );
    assert_eq!(
        rules(&check("reviews", review(json!(4.5)))),
        vec![("rating".to_string(), "TypeMismatch")]
    );
}
