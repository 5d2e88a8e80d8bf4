use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::query::SortKey;
use crate::schema::{Entity, FieldSpec, Schema, ValidationStyle};
use crate::store::RecordId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: RecordId,
    pub address: PropertyAddress,
    pub price: String,
    pub area: String,
    pub bedrooms: String,
    pub bathrooms: String,
    pub parking: String,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAddress {
    pub street: String,
    pub number: String,
    pub unit: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl Property {
    #[must_use]
    pub fn address_line(&self) -> String {
        let mut line = format!("{}, {}", self.address.street, self.address.number);
        if let Some(unit) = &self.address.unit {
            line.push(' ');
            line.push_str(unit);
        }
        line.push_str(" - ");
        line.push_str(&self.address.neighborhood);
        line.push_str(", ");
        line.push_str(&self.address.city);
        line
    }
}

impl Entity for Property {
    const KIND: &'static str = "property";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn blank() -> Self {
        Self::default()
    }

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: OnceLock<Schema<Property>> = OnceLock::new();
        SCHEMA.get_or_init(property_schema)
    }

    fn summary(&self) -> String {
        self.address_line()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.tags)
    }
}

fn property_schema() -> Schema<Property> {
    Schema::builder(ValidationStyle::FirstFailure)
        .field(
            FieldSpec::new(
                "street",
                |p: &Property| p.address.street.clone(),
                |p, v| p.address.street = v.to_string(),
            )
            .required("Street is required"),
        )
        .field(
            FieldSpec::new(
                "number",
                |p: &Property| p.address.number.clone(),
                |p, v| p.address.number = v.to_string(),
            )
            .required("Number is required"),
        )
        .field(FieldSpec::new(
            "unit",
            |p: &Property| p.address.unit.clone().unwrap_or_default(),
            |p, v| {
                p.address.unit = if v.trim().is_empty() {
                    None
                } else {
                    Some(v.to_string())
                };
            },
        ))
        .field(
            FieldSpec::new(
                "neighborhood",
                |p: &Property| p.address.neighborhood.clone(),
                |p, v| p.address.neighborhood = v.to_string(),
            )
            .required("Neighborhood is required"),
        )
        .field(
            FieldSpec::new(
                "city",
                |p: &Property| p.address.city.clone(),
                |p, v| p.address.city = v.to_string(),
            )
            .required("City is required"),
        )
        .field(
            FieldSpec::new(
                "state",
                |p: &Property| p.address.state.clone(),
                |p, v| p.address.state = v.to_string(),
            )
            .required("State is required"),
        )
        .field(
            FieldSpec::new(
                "postalCode",
                |p: &Property| p.address.postal_code.clone(),
                |p, v| p.address.postal_code = v.to_string(),
            )
            .required("Postal code is required"),
        )
        .field(
            FieldSpec::new(
                "price",
                |p: &Property| p.price.clone(),
                |p, v| p.price = v.to_string(),
            )
            .required("Price is required"),
        )
        .field(
            FieldSpec::new(
                "area",
                |p: &Property| p.area.clone(),
                |p, v| p.area = v.to_string(),
            )
            .required("Area is required"),
        )
        .field(
            FieldSpec::new(
                "bedrooms",
                |p: &Property| p.bedrooms.clone(),
                |p, v| p.bedrooms = v.to_string(),
            )
            .required("Bedroom count is required"),
        )
        .field(
            FieldSpec::new(
                "bathrooms",
                |p: &Property| p.bathrooms.clone(),
                |p, v| p.bathrooms = v.to_string(),
            )
            .required("Bathroom count is required"),
        )
        .field(
            FieldSpec::new(
                "parking",
                |p: &Property| p.parking.clone(),
                |p, v| p.parking = v.to_string(),
            )
            .required("Parking count is required"),
        )
        .field(FieldSpec::new(
            "notes",
            |p: &Property| p.notes.clone().unwrap_or_default(),
            |p, v| {
                p.notes = if v.trim().is_empty() {
                    None
                } else {
                    Some(v.to_string())
                };
            },
        ))
        .tags_required("Select at least one tag")
        .search_loose(|p: &Property| p.address_line())
        .sort_name(|p: &Property| p.address_line())
        .default_sort(SortKey::Name)
        .build()
}
