use crate::domain::order::Order;
use crate::error::Result;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a single order from a JSON file.
pub fn read_order(path: impl AsRef<Path>) -> Result<Order> {
    let file = File::open(path)?;
    let order = serde_json::from_reader(BufReader::new(file))?;
    Ok(order)
}
