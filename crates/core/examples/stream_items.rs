//! Streams array elements out of a large document without materializing
//! it, then runs a filter predicate through the buffered fallback.
//!
//! Run with: cargo run --example stream_items -p jsonpull-core

use jsonpull_core::{JsonStream, StreamConfig};

fn main() -> jsonpull_core::Result<()> {
    let data = br#"{
        "items": [
            {"name": "anvil",  "price": 35},
            {"name": "rope",   "price": 8},
            {"name": "magnet", "price": 12}
        ]
    }"#;

    let mut stream = JsonStream::from_slice(data, StreamConfig::with_path("$.items[*]"))?;
    println!("every item ({:?} mode):", stream.mode());
    while let Some(item) = stream.next_value()? {
        println!("  {item}");
    }
    println!("bytes read: {}", stream.bytes_read());

    let mut expensive =
        JsonStream::from_slice(data, StreamConfig::with_path("$.items[?(@.price > 10)]"))?;
    println!("items over 10 ({:?} mode):", expensive.mode());
    while let Some(item) = expensive.next_value()? {
        println!("  {item}");
    }
    Ok(())
}
