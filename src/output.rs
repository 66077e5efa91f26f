//! CSV output, one file per category page.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::models::Product;

/// Writes the header row and one row per product, in input order. The
/// header goes out even when there are no products.
pub fn write_products<W: Write>(writer: W, products: &[Product]) -> Result<()> {
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(Product::FIELDS)?;
    for product in products {
        csv_writer.serialize(product)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the products to it.
pub fn write_products_to_path(path: &Path, products: &[Product]) -> Result<()> {
    let file = File::create(path)?;
    write_products(file, products)
}
