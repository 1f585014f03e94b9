//! Building, reading, freezing and encoding a data tree.
//!
//! Run with: cargo run --example tree

use generic_data::{data, from_slice, to_vec, Data, GenericData, Kind};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Setters promote an empty node as needed
    let mut config = GenericData::new();
    config
        .set_string_at("host", "localhost")?
        .set_string_at("port", "8080")?
        .set_bool_at("debug", true)?;
    config.set_at("features", data!(["auth", "logging", "metrics"]))?;

    println!("Config: {config}\n");

    // Getters coerce to the requested type
    println!("Typed reads:");
    println!("  port as i32: {}", config.get_i32_at("port")?);
    println!("  debug as i64: {}", config.get_i64_at("debug")?);
    println!("  timeout (missing): {}", config.get_or("timeout", 30i64)?);
    println!("  features[5] is null: {}\n", config.get("features").get(5).is_null());

    // Indexed writes past the end grow arrays with empty slots
    let mut sparse = GenericData::new();
    sparse.set_i64(1)?.set_i64_at(3, 4)?;
    println!("Sparse array: {sparse} ({} slots, kind {})\n", sparse.size(), sparse.kind());
    assert_eq!(sparse.kind(), Kind::Array);

    // Frozen copies reject writes
    let mut frozen = config.frozen();
    match frozen.set_i64_at("port", 9090) {
        Err(err) => println!("Writing to a frozen tree: {err}"),
        Ok(_) => unreachable!("frozen trees reject writes"),
    }

    // Binary and JSON forms
    let bytes = to_vec(&frozen)?;
    let back = from_slice(&bytes)?;
    println!("Encoded {} bytes, decoded equal: {}", bytes.len(), back == config);
    println!("Decoded copy is still frozen: {}", !back.is_mutable());
    println!("As JSON: {}", serde_json::to_string(&back)?);

    Ok(())
}
