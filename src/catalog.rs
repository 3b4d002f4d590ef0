use crate::config::model::Config;
use crate::kudago::api::{ApiError, EventsQuery, KudaGoApi};
use crate::kudago::model::{CategoryRef, CityRef, ShowRecord};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// The city and category the catalog is built for.
pub const CITY_NAME: &str = "Москва";
pub const CATEGORY_SLUG: &str = "theater";

pub const CSV_HEADER: [&str; 4] = ["id", "title", "theatre", "city"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("could not write the catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize the catalog: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug)]
pub struct ExportSummary {
    pub city: CityRef,
    pub category: CategoryRef,
    pub records: usize,
    pub output_path: PathBuf,
}

/// Runs the whole export: resolve the city and the category, walk every
/// events page, write the catalog CSV. Nothing touches the output file until
/// all pages are in, so a mid-run fetch failure leaves any previous catalog
/// as it was.
pub async fn fetch_moscow_shows(config: &Config) -> Result<ExportSummary, ExportError> {
    let api = KudaGoApi::new(config.base_url.as_str());

    let city = api.resolve_city(CITY_NAME).await?;
    info!(
        "Found city {} (id: {}, slug: {})",
        city.name, city.id, city.slug
    );

    let category = api.resolve_category(CATEGORY_SLUG).await?;
    info!(
        "Found category {} (id: {}, slug: {})",
        category.name, category.id, category.slug
    );

    let query = EventsQuery {
        location: city.slug.clone(),
        categories: category.slug.clone(),
        actual_since: config.only_upcoming.then(|| Utc::now().timestamp()),
        max_pages: config.max_pages,
    };

    let records = api.fetch_all(&query).await?;
    info!("Fetched {} shows", records.len());

    write_csv(&config.output_path, &records)?;
    info!("Catalog written to {}", config.output_path.display());

    Ok(ExportSummary {
        city,
        category,
        records: records.len(),
        output_path: config.output_path.clone(),
    })
}

/// Overwrites `path` with a header row plus one row per record, in order.
/// Parent directories are created as needed.
pub fn write_csv(path: &Path, records: &[ShowRecord]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    // The header is written by hand so that an empty catalog still yields it.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}
