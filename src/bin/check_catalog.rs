//! Quick inspection of an exported catalog: record count, columns, and a
//! sample of rows, so a bad export is spotted before the bot picks it up.

use shows_catalog::config::env_loader::load_config;
use shows_catalog::kudago::model::ShowRecord;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let config = load_config();

    let mut reader = csv::Reader::from_path(&config.output_path)?;
    let columns = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let rows = reader
        .deserialize::<ShowRecord>()
        .collect::<Result<Vec<_>, _>>()?;

    println!("Catalog: {}", config.output_path.display());
    println!("Total records: {}", rows.len());
    println!("Columns: {}", columns.join(", "));

    let with_theatre = rows.iter().filter(|row| !row.theatre.is_empty()).count();
    println!("Records with a theatre name: {with_theatre}");

    println!("\nFirst 5 records:");
    for (i, row) in rows.iter().take(5).enumerate() {
        let theatre = if row.theatre.is_empty() {
            "(no theatre)"
        } else {
            row.theatre.as_str()
        };
        println!(
            "{}. {}: {} / {}",
            i + 1,
            row.id,
            truncate(&row.title, 60),
            theatre
        );
    }

    Ok(())
}

/// Char-boundary-safe prefix; titles are mostly Cyrillic.
fn truncate(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
