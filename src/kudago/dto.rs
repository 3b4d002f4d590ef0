use super::model::{CategoryRef, CityRef, ShowRecord};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Taxonomy endpoints answer either a bare array or a paginated envelope,
/// depending on the API version. Both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listing<T> {
    pub fn into_results(self) -> Vec<T> {
        match self {
            Listing::Plain(items) => items,
            Listing::Paged(page) => page.results,
        }
    }
}

/// The `{count, next, previous, results}` envelope of the events endpoint.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct LocationResponse {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub slug: String,
}

impl LocationResponse {
    pub fn to_model(&self) -> CityRef {
        CityRef {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub slug: String,
}

impl CategoryResponse {
    pub fn to_model(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

// Note: most String fields need the lenient deserializer due to being optional
#[derive(Debug, Deserialize)]
pub struct EventResponse {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub short_title: String,
    #[serde(default)]
    pub place: Option<ResponsePlace>,
    #[serde(default)]
    pub location: Option<ResponseLocation>,
}

impl EventResponse {
    /// The catalog keeps the short title when the event has one.
    pub fn display_title(&self) -> &str {
        if self.short_title.is_empty() {
            &self.title
        } else {
            &self.short_title
        }
    }

    /// The place name, when the listing expanded the place object for us.
    pub fn place_name(&self) -> Option<String> {
        match &self.place {
            Some(ResponsePlace::Expanded(place)) => place.display_name(),
            _ => None,
        }
    }

    /// The bare place id, when the listing did not expand the place.
    pub fn place_id(&self) -> Option<i64> {
        match &self.place {
            Some(ResponsePlace::Id(id)) => Some(*id),
            Some(ResponsePlace::Expanded(place)) => place.id,
            None => None,
        }
    }

    pub fn city_name(&self) -> String {
        match &self.location {
            Some(ResponseLocation::Slug(slug)) => slug.clone(),
            Some(ResponseLocation::Expanded { name, slug }) => {
                if name.is_empty() {
                    slug.clone()
                } else {
                    name.clone()
                }
            }
            None => String::new(),
        }
    }

    pub fn to_model(&self, theatre: String) -> ShowRecord {
        ShowRecord {
            id: self.id.to_string(),
            title: self.display_title().to_string(),
            theatre,
            city: self.city_name(),
        }
    }
}

/// `place` arrives as null, a bare id, or an expanded object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponsePlace {
    Id(i64),
    Expanded(PlaceResponse),
}

#[derive(Debug, Deserialize)]
pub struct PlaceResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_str")]
    pub name: String,
}

impl PlaceResponse {
    /// Place objects use `title`; older records fall back to `name`.
    pub fn display_name(&self) -> Option<String> {
        if !self.title.is_empty() {
            Some(self.title.clone())
        } else if !self.name.is_empty() {
            Some(self.name.clone())
        } else {
            None
        }
    }
}

/// `location` arrives as a bare slug string or an expanded object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponseLocation {
    Slug(String),
    Expanded {
        #[serde(default, deserialize_with = "deserialize_str")]
        name: String,
        #[serde(default, deserialize_with = "deserialize_str")]
        slug: String,
    },
}

fn deserialize_str<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}
