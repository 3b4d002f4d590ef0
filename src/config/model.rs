use crate::kudago::api::BASE_URL;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_PATH: &str = "data/shows_catalog.csv";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub output_path: PathBuf,
    /// When set, only events still actual at run time are exported.
    pub only_upcoming: bool,
    pub max_pages: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            only_upcoming: true,
            max_pages: None,
        }
    }
}
