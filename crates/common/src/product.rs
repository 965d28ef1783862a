use serde::{Deserialize, Serialize};

/// Catalog product, read-only to the search pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identity
    pub id: i64,

    pub name: String,

    pub description: String,

    pub price: f64,

    /// Image reference (relative path or URL)
    #[serde(default)]
    pub image_url: String,
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            image_url: String::new(),
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Price as shown to models and users.
    ///
    /// Never rounds: at least two decimals, more when the catalog has them.
    pub fn display_price(&self) -> String {
        let price = self.price.to_string();
        let decimals = price.split_once('.').map_or(0, |(_, cents)| cents.len());
        match decimals {
            0 => format!("{}.00", price),
            1 => format!("{}0", price),
            _ => price,
        }
    }

    /// The empty placeholder returned when nothing matched
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::default()
    }
}
