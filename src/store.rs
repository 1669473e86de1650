use crate::{
    core::geo::{LatLng, LatLngBounds},
    ui::popup::PopupContent,
};
use serde::{Deserialize, Serialize};

pub type StoreId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for LatLng {
    fn from(c: Coordinates) -> Self {
        LatLng::new(c.latitude, c.longitude)
    }
}

/// A store in the locator's result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    /// Unique, URL-safe name; identifies the store's popup content
    pub slug: String,
    pub name: String,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub address: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Store {
    pub fn new(id: StoreId, slug: impl Into<String>, name: impl Into<String>, at: LatLng) -> Self {
        Self {
            id,
            slug: slug.into(),
            name: name.into(),
            coordinates: Coordinates {
                latitude: at.lat,
                longitude: at.lng,
            },
            address: Vec::new(),
            phone: None,
        }
    }

    pub fn position(&self) -> LatLng {
        self.coordinates.into()
    }

    /// What the store's popup shows: name, address lines, phone
    pub fn popup_content(&self) -> PopupContent {
        let content = self
            .address
            .iter()
            .fold(PopupContent::new(self.name.clone()), |c, line| c.with_line(line.clone()));

        match &self.phone {
            Some(phone) => content.with_line(phone.clone()),
            None => content,
        }
    }
}

/// Bounds covering every store, `None` for an empty result set
pub fn bounds_from_stores(stores: &[Store]) -> Option<LatLngBounds> {
    LatLngBounds::from_points(stores.iter().map(Store::position))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_store() {
        let store: Store = serde_json::from_str(
            r#"{
                "id": 7,
                "slug": "downtown",
                "name": "Downtown",
                "coordinates": {"latitude": 40.71, "longitude": -74.0},
                "address": ["1 Main St", "New York, NY"]
            }"#,
        )
        .unwrap();

        assert_eq!(store.id, 7);
        assert_eq!(store.position(), LatLng::new(40.71, -74.0));
        assert_eq!(store.phone, None);
        assert_eq!(
            store.popup_content().to_text(),
            "Downtown\n1 Main St\nNew York, NY"
        );
    }

    #[test]
    fn test_bounds_from_stores() {
        assert!(bounds_from_stores(&[]).is_none());

        let stores = vec![
            Store::new(1, "a", "A", LatLng::new(10.0, 20.0)),
            Store::new(2, "b", "B", LatLng::new(12.0, 18.0)),
        ];
        let bounds = bounds_from_stores(&stores).unwrap();
        assert_eq!(bounds.to_array(), [[18.0, 10.0], [20.0, 12.0]]);
    }
}
