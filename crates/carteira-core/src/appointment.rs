use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::query::SortKey;
use crate::schema::{Entity, FieldSpec, Schema, ValidationStyle};
use crate::store::RecordId;
use crate::tags;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: RecordId,
    pub title: String,
    pub time: String,
    pub location: String,
    pub date: String,
    pub tags: Vec<String>,
    pub client: Option<String>,
    pub property: Option<String>,
    pub note: String,
}

impl Entity for Appointment {
    const KIND: &'static str = "appointment";

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
        static SCHEMA: OnceLock<Schema<Appointment>> = OnceLock::new();
        SCHEMA.get_or_init(appointment_schema)
    }

    fn summary(&self) -> String {
        self.title.clone()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.tags)
    }
}

fn appointment_schema() -> Schema<Appointment> {
    Schema::builder(ValidationStyle::FirstFailure)
        .field(
            FieldSpec::new(
                "title",
                |a: &Appointment| a.title.clone(),
                |a, v| a.title = v.to_string(),
            )
            .required("Title is required"),
        )
        .field(
            FieldSpec::new(
                "date",
                |a: &Appointment| a.date.clone(),
                |a, v| a.date = v.to_string(),
            )
            .required("Date is required"),
        )
        .field(
            FieldSpec::new(
                "time",
                |a: &Appointment| a.time.clone(),
                |a, v| a.time = v.to_string(),
            )
            .required("Time is required"),
        )
        .field(
            FieldSpec::new(
                "location",
                |a: &Appointment| a.location.clone(),
                |a, v| a.location = v.to_string(),
            )
            .required("Location is required"),
        )
        .field(FieldSpec::new(
            "client",
            |a: &Appointment| a.client.clone().unwrap_or_default(),
            |a, v| {
                a.client = if v.trim().is_empty() {
                    None
                } else {
                    Some(v.to_string())
                };
            },
        ))
        .field(FieldSpec::new(
            "property",
            |a: &Appointment| a.property.clone().unwrap_or_default(),
            |a, v| {
                a.property = if v.trim().is_empty() {
                    None
                } else {
                    Some(v.to_string())
                };
            },
        ))
        .field(
            FieldSpec::new(
                "note",
                |a: &Appointment| a.note.clone(),
                |a, v| a.note = v.to_string(),
            )
            .required("Note is required"),
        )
        .vocabulary(tags::APPOINTMENT_TAGS)
        .search_loose(|a: &Appointment| a.location.clone())
        .sort_name(|a: &Appointment| a.title.clone())
        .sort_date(|a: &Appointment| a.date.clone())
        .default_sort(SortKey::Date)
        .build()
}
