use crate::config::model::{Config, DEFAULT_OUTPUT_PATH};
use crate::kudago::api::BASE_URL;
use std::env;
use std::path::PathBuf;

pub fn load_config() -> Config {
    let base_url = env::var("KUDAGO_BASE_URL").unwrap_or_else(|_| BASE_URL.to_string());
    let output_path = load_path_config("SHOWS_OUTPUT_PATH", DEFAULT_OUTPUT_PATH);

    let only_upcoming = load_bool_config("ONLY_UPCOMING", true);
    let max_pages = load_u32_config("DEBUG_MAX_PAGES");

    Config {
        base_url,
        output_path,
        only_upcoming,
        max_pages,
    }
}

fn load_path_config(name: &str, default: &str) -> PathBuf {
    env::var(name)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn load_bool_config(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| {
            panic!(
                "Invalid config '{}'. Expected either 'true' or 'false'",
                name
            )
        })
}

fn load_u32_config(name: &str) -> Option<u32> {
    match env::var(name) {
        Ok(value) => Some(value.parse().unwrap_or_else(|_| {
            panic!("Invalid config '{}'. Expected a positive integer.", name)
        })),
        Err(_) => None,
    }
}
