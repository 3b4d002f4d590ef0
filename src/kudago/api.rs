use super::dto::{CategoryResponse, EventResponse, Listing, LocationResponse, Page, PlaceResponse};
use super::model::{CategoryRef, CityRef, ShowRecord};
use lazy_static::lazy_static;
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const BASE_URL: &str = "https://kudago.com/public-api/v1.4";
pub const PAGE_SIZE: usize = 100;

const USER_AGENT: &str = "TheatreNotifyBot/1.0";
const EVENT_FIELDS: &str = "id,title,short_title,place,location";
const EVENT_EXPAND: &str = "place,location";
const MAX_RETRIES: u32 = 5;

lazy_static! {
    static ref REST_CLIENT: ClientWithMiddleware = ClientBuilder::new(
        Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed building the HTTP client")
    )
    .with(RetryTransientMiddleware::new_with_policy(
        ExponentialBackoff::builder().build_with_max_retries(MAX_RETRIES)
    ))
    .build();
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode the response from {url}: {source}")]
    InvalidResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no city named {0:?} in the locations listing")]
    CityNotFound(String),
    #[error("no category with slug {0:?} in the categories listing")]
    CategoryNotFound(String),
}

/// Filters applied to the events endpoint. Slugs, not ids: the listing
/// endpoint filters by `location` and `categories` slugs.
#[derive(Debug, Clone)]
pub struct EventsQuery {
    pub location: String,
    pub categories: String,
    /// Unix timestamp; only events still actual at that instant are listed.
    pub actual_since: Option<i64>,
    /// Debug cap on the number of pages fetched.
    pub max_pages: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct KudaGoApi {
    base_url: String,
}

impl Default for KudaGoApi {
    fn default() -> Self {
        Self::new(BASE_URL)
    }
}

impl KudaGoApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn get_cities(&self) -> Result<Vec<CityRef>, ApiError> {
        let listing: Listing<LocationResponse> = self.get_json("/locations/", &[]).await?;

        Ok(listing
            .into_results()
            .iter()
            .map(LocationResponse::to_model)
            .collect())
    }

    pub async fn get_categories(&self) -> Result<Vec<CategoryRef>, ApiError> {
        let listing: Listing<CategoryResponse> = self.get_json("/event-categories/", &[]).await?;

        Ok(listing
            .into_results()
            .iter()
            .map(CategoryResponse::to_model)
            .collect())
    }

    /// Exact, case-sensitive name match, kept for compatibility with the
    /// catalog's existing consumers.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_city(&self, name: &str) -> Result<CityRef, ApiError> {
        let cities = self.get_cities().await?;
        info!("Fetched {} cities", cities.len());

        cities
            .into_iter()
            .find(|city| city.name == name)
            .ok_or_else(|| ApiError::CityNotFound(name.to_string()))
    }

    /// Categories are addressed by slug, same exact-match pattern as cities.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_category(&self, slug: &str) -> Result<CategoryRef, ApiError> {
        let categories = self.get_categories().await?;
        info!("Fetched {} categories", categories.len());

        categories
            .into_iter()
            .find(|category| category.slug == slug)
            .ok_or_else(|| ApiError::CategoryNotFound(slug.to_string()))
    }

    pub async fn get_events_page(
        &self,
        query: &EventsQuery,
        page: u32,
    ) -> Result<Page<EventResponse>, ApiError> {
        let mut params = vec![
            ("page", page.to_string()),
            ("page_size", PAGE_SIZE.to_string()),
            ("location", query.location.clone()),
            ("categories", query.categories.clone()),
            ("fields", EVENT_FIELDS.to_string()),
            ("expand", EVENT_EXPAND.to_string()),
        ];
        if let Some(since) = query.actual_since {
            params.push(("actual_since", since.to_string()));
        }

        self.get_json("/events/", &params).await
    }

    /// Walks the events endpoint page by page, in order, mapping each raw
    /// event to a [`ShowRecord`]. Stops on the first page that carries no
    /// `next` link or returns fewer than [`PAGE_SIZE`] results.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self, query: &EventsQuery) -> Result<Vec<ShowRecord>, ApiError> {
        let mut records = Vec::new();
        let mut page = 1u32;

        loop {
            if let Some(max_pages) = query.max_pages {
                if page > max_pages {
                    break;
                }
            }

            let batch = self.get_events_page(query, page).await?;
            let fetched = batch.results.len();
            debug!("Page {page}: {fetched} of {} events", batch.count);

            for event in &batch.results {
                let theatre = self.resolve_theatre(event).await;
                records.push(event.to_model(theatre));
            }

            if batch.next.is_none() || fetched < PAGE_SIZE {
                break;
            }

            page += 1;
        }

        Ok(records)
    }

    /// Place details lookup, used when the events listing carried a bare
    /// place id instead of an expanded object.
    pub async fn get_place(&self, place_id: i64) -> Result<Option<String>, ApiError> {
        let place: PlaceResponse = self
            .get_json(
                &format!("/places/{place_id}/"),
                &[("fields", "id,title,name".to_string())],
            )
            .await?;

        Ok(place.display_name())
    }

    /// A failed place lookup degrades to an empty theatre name; the export
    /// keeps going.
    async fn resolve_theatre(&self, event: &EventResponse) -> String {
        if let Some(name) = event.place_name() {
            return name;
        }

        let Some(place_id) = event.place_id() else {
            return String::new();
        };

        match self.get_place(place_id).await {
            Ok(Some(name)) => name,
            Ok(None) => String::new(),
            Err(err) => {
                warn!("Could not resolve place {place_id} (omitting theatre): {err}");
                String::new()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = REST_CLIENT
            .get(&url)
            .query(&[("lang", "ru")])
            .query(params)
            .send()
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { url, status });
        }

        let body = response.text().await.map_err(|source| ApiError::Request {
            url: url.clone(),
            source: source.into(),
        })?;

        serde_json::from_str(&body).map_err(|source| ApiError::InvalidResponse { url, source })
    }
}
