use serde::{Deserialize, Serialize};

// A place on the map, either coming from a search or saved by the user.
// An id of 0 means the place has not been persisted anywhere yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub x: f64,
    pub y: f64,
}

impl Keyword {
    pub fn new(id: i64, name: &str, address: &str, x: f64, y: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            address: address.to_string(),
            x,
            y,
        }
    }
}

/// Payload handed back by the place picker once the user has selected something.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SelectionResult {
    pub place_name: Option<String>,
    pub road_address_name: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

impl SelectionResult {
    /// Both names are required, coordinates default to the origin.
    pub fn into_keyword(self) -> Option<Keyword> {
        let Self {
            place_name,
            road_address_name,
            x,
            y,
        } = self;
        Some(Keyword {
            id: 0,
            name: place_name?,
            address: road_address_name?,
            x: x.unwrap_or(0.0),
            y: y.unwrap_or(0.0),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub address: String,
}

impl From<MarkerPosition> for Keyword {
    fn from(marker: MarkerPosition) -> Self {
        Keyword {
            id: 0,
            name: marker.name,
            address: marker.address,
            x: marker.x,
            y: marker.y,
        }
    }
}
