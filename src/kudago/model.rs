use serde::{Deserialize, Serialize};

/// One row of the exported catalog. The field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRecord {
    pub id: String,
    pub title: String,
    pub theatre: String,
    pub city: String,
}

/// A city as resolved against the locations listing. Looked up once per run.
#[derive(Debug, Clone)]
pub struct CityRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// An event category as resolved against the taxonomy listing.
#[derive(Debug, Clone)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}
