use form_urlencoded::Serializer;
use regex::Regex;
use serde::Deserialize;
use std::str::FromStr;

use crate::app::models::Keyword;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

pub struct SearchQuery {
    pub query: String,
    pub page: usize,
    pub size: usize,
}

impl SearchQuery {
    pub fn new(query: &str, page: usize, size: usize) -> Self {
        Self {
            query: WHITESPACE.replace_all(query, " ").trim().to_string(),
            page,
            size,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.query.is_empty()
    }

    pub fn into_query_string(self) -> String {
        Serializer::new(String::new())
            .append_pair("query", &self.query)
            .append_pair("page", &self.page.to_string()[..])
            .append_pair("size", &self.size.to_string()[..])
            .finish()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct KeywordSearchResponse {
    #[serde(default)]
    pub documents: Vec<Place>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Place {
    #[serde(default)]
    pub id: String,
    pub place_name: String,
    #[serde(default)]
    pub address_name: String,
    #[serde(default)]
    pub road_address_name: String,
    pub x: String,
    pub y: String,
}

impl From<Place> for Keyword {
    fn from(place: Place) -> Self {
        let Place {
            id,
            place_name,
            address_name,
            road_address_name,
            x,
            y,
            ..
        } = place;
        // Some places (mostly rural ones) have no road address
        let address = if road_address_name.is_empty() {
            address_name
        } else {
            road_address_name
        };
        Keyword {
            id: i64::from_str(&id).unwrap_or(0),
            name: place_name,
            address,
            x: f64::from_str(&x).unwrap_or(0.0),
            y: f64::from_str(&y).unwrap_or(0.0),
        }
    }
}

impl From<KeywordSearchResponse> for Vec<Keyword> {
    fn from(response: KeywordSearchResponse) -> Self {
        response.documents.into_iter().map(Keyword::from).collect()
    }
}
