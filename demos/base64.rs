//! Choosing the binary encoding.
//!
//! Run with: cargo run --example base64

use serde_jsonesc::{BinaryFormat, EscOptions, JsonEsc, Value};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let blob = Value::Binary((0u8..32).collect());

    for format in [
        BinaryFormat::Base93,
        BinaryFormat::Base91,
        BinaryFormat::Base64,
        BinaryFormat::Disabled,
    ] {
        let esc = JsonEsc::with_options(EscOptions::new().with_binary_format(format));
        let text = esc.stringify(&blob, None)?;
        println!("{:?} ({} bytes): {}", format, text.len(), text);
    }

    // Every instance reads all three tags, whichever one it writes.
    let writer = JsonEsc::with_options(EscOptions::new().with_binary_format(BinaryFormat::Base64));
    let reader = JsonEsc::new();
    let back = reader.parse(&writer.stringify(&blob, None)?)?;
    assert_eq!(back, blob);
    println!("\nBase64 text read back by a default instance: {:?}", back.as_binary());

    Ok(())
}
