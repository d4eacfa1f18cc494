//! Registering an extension for an application type.
//!
//! Run with: cargo run --example custom_type

use serde_jsonesc::{esc, CustomValue, Error, Extension, ExtensionValue, JsonEsc, Value};
use std::error::Error as StdError;

#[derive(Debug, PartialEq)]
struct Money {
    cents: i64,
    currency: String,
}

impl ExtensionValue for Money {}

fn money_extension() -> Extension {
    Extension::typed::<Money, _, _>(
        "Money",
        |m| Ok(format!("{}:{}", m.currency, m.cents)),
        |payload| {
            let (currency, cents) = payload
                .split_once(':')
                .ok_or_else(|| Error::invalid_payload("Money", payload))?;
            Ok(Money {
                cents: cents.parse().map_err(|e| Error::invalid_payload("Money", e))?,
                currency: currency.to_string(),
            })
        },
    )
}

fn main() -> Result<(), Box<dyn StdError>> {
    let mut esc = JsonEsc::new();
    esc.register(money_extension());

    let invoice = esc!({
        "id": 42,
        "total": (CustomValue::new(Money { cents: 1999, currency: "EUR".to_string() })),
        "discount": undefined
    });

    let text = esc.stringify(&invoice, Some(2))?;
    println!("Encoded:\n{}\n", text);

    let back = esc.parse(&text)?;
    let total = back
        .as_object()
        .and_then(|o| o.get("total"))
        .and_then(|v| v.downcast_ref::<Money>());
    println!("Decoded total: {:?}", total);

    // Without the extension the tag is unknown and the entry disappears.
    println!("Default instance: {}", serde_jsonesc::parse(&text)?);
    assert_eq!(back, esc!({"id": 42, "total": (CustomValue::new(Money { cents: 1999, currency: "EUR".to_string() }))}));

    let sorted = esc.stringify_sorted(&back, None)?;
    println!("Sorted: {}", sorted);
    let _: Value = esc.parse(&sorted)?;

    Ok(())
}
