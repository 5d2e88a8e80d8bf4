use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::format::{self, Mask};
use crate::query::SortKey;
use crate::schema::{Entity, FieldSpec, Schema, ValidationStyle};
use crate::store::RecordId;
use crate::tags;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: ClientAddress,
    pub notes: String,
    pub tags: Vec<String>,
    pub last_contact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Visit,
    Call,
    Email,
    Document,
}

impl NoteKind {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "visit" => Some(NoteKind::Visit),
            "call" => Some(NoteKind::Call),
            "email" => Some(NoteKind::Email),
            "document" => Some(NoteKind::Document),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            NoteKind::Visit => "visit",
            NoteKind::Call => "call",
            NoteKind::Email => "email",
            NoteKind::Document => "document",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryNote {
    pub id: RecordId,
    pub client_id: RecordId,
    pub date: String,
    pub kind: NoteKind,
    pub description: String,
}

impl Entity for Client {
    const KIND: &'static str = "client";

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
        static SCHEMA: OnceLock<Schema<Client>> = OnceLock::new();
        SCHEMA.get_or_init(client_schema)
    }

    fn summary(&self) -> String {
        self.name.clone()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        Some(&mut self.tags)
    }
}

impl Entity for HistoryNote {
    const KIND: &'static str = "note";

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
        static SCHEMA: OnceLock<Schema<HistoryNote>> = OnceLock::new();
        SCHEMA.get_or_init(note_schema)
    }

    fn summary(&self) -> String {
        self.description.clone()
    }
}

fn client_schema() -> Schema<Client> {
    Schema::builder(ValidationStyle::PerField)
        .field(
            FieldSpec::new(
                "name",
                |c: &Client| c.name.clone(),
                |c, v| c.name = v.to_string(),
            )
            .required("Name is required"),
        )
        .field(FieldSpec::new(
            "email",
            |c: &Client| c.email.clone(),
            |c, v| c.email = v.to_string(),
        ))
        .field(
            FieldSpec::new(
                "phone",
                |c: &Client| c.phone.clone(),
                |c, v| c.phone = v.to_string(),
            )
            .mask(Mask::Phone)
            .pattern(format::PHONE_PATTERN, "Invalid phone"),
        )
        .field(FieldSpec::new(
            "street",
            |c: &Client| c.address.street.clone(),
            |c, v| c.address.street = v.to_string(),
        ))
        .field(FieldSpec::new(
            "city",
            |c: &Client| c.address.city.clone(),
            |c, v| c.address.city = v.to_string(),
        ))
        .field(FieldSpec::new(
            "state",
            |c: &Client| c.address.state.clone(),
            |c, v| c.address.state = v.to_string(),
        ))
        .field(FieldSpec::new(
            "country",
            |c: &Client| c.address.country.clone(),
            |c, v| c.address.country = v.to_string(),
        ))
        .field(
            FieldSpec::new(
                "postalCode",
                |c: &Client| c.address.postal_code.clone(),
                |c, v| c.address.postal_code = v.to_string(),
            )
            .mask(Mask::PostalCode)
            .pattern(format::POSTAL_CODE_PATTERN, "Invalid postal code"),
        )
        .field(FieldSpec::new(
            "notes",
            |c: &Client| c.notes.clone(),
            |c, v| c.notes = v.to_string(),
        ))
        .field(
            FieldSpec::new(
                "lastContact",
                |c: &Client| c.last_contact.clone(),
                |c, v| c.last_contact = v.to_string(),
            )
            .required("Last contact date is required"),
        )
        .vocabulary(tags::CLIENT_STATUS_TAGS)
        .search_name(|c: &Client| c.name.clone())
        .search_loose(|c: &Client| c.address.street.clone())
        .search_loose(|c: &Client| c.address.city.clone())
        .search_loose(|c: &Client| c.address.state.clone())
        .search_exact(|c: &Client| c.address.postal_code.clone())
        .search_tags()
        .sort_name(|c: &Client| c.name.clone())
        .sort_date(|c: &Client| c.last_contact.clone())
        .default_sort(SortKey::Name)
        .build()
}

fn note_schema() -> Schema<HistoryNote> {
    Schema::builder(ValidationStyle::FirstFailure)
        .field(
            FieldSpec::new(
                "date",
                |n: &HistoryNote| n.date.clone(),
                |n, v| n.date = v.to_string(),
            )
            .required("Date is required"),
        )
        .field(
            FieldSpec::new(
                "description",
                |n: &HistoryNote| n.description.clone(),
                |n, v| n.description = v.to_string(),
            )
            .required("Description is required"),
        )
        .sort_date(|n: &HistoryNote| n.date.clone())
        .default_sort(SortKey::Date)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationError;

    fn ana() -> Client {
        let mut client = Client::blank();
        client.name = "Ana".to_string();
        client.phone = "(11) 99999-9999".to_string();
        client.address.postal_code = "01234-567".to_string();
        client.last_contact = "01/01/2024".to_string();
        client
    }

    #[test]
    fn valid_client_passes_every_rule() {
        assert_eq!(Client::schema().validate(&ana()), Ok(()));
    }

    #[test]
    fn aggregate_validation_collects_each_failing_field() {
        let mut client = Client::blank();
        client.phone = "123".to_string();
        client.last_contact = "01/01/2024".to_string();

        let Err(ValidationError::Fields(failures)) = Client::schema().validate(&client) else {
            panic!("expected a field map");
        };
        assert_eq!(failures.len(), 2);
        assert_eq!(failures.get("name"), Some(&"Name is required"));
        assert_eq!(failures.get("phone"), Some(&"Invalid phone"));
    }

    #[test]
    fn empty_phone_and_postal_code_are_accepted() {
        let mut client = ana();
        client.phone = String::new();
        client.address.postal_code = String::new();
        assert_eq!(Client::schema().validate(&client), Ok(()));
    }

    #[test]
    fn partial_postal_code_is_rejected() {
        let mut client = ana();
        client.address.postal_code = "01234".to_string();

        let Err(ValidationError::Fields(failures)) = Client::schema().validate(&client) else {
            panic!("expected a field map");
        };
        assert_eq!(failures.len(), 1);
        assert_eq!(failures.get("postalCode"), Some(&"Invalid postal code"));
    }

    #[test]
    fn missing_last_contact_is_reported() {
        let mut client = ana();
        client.last_contact = "  ".to_string();

        let Err(ValidationError::Fields(failures)) = Client::schema().validate(&client) else {
            panic!("expected a field map");
        };
        assert_eq!(
            failures.get("lastContact"),
            Some(&"Last contact date is required")
        );
    }

    #[test]
    fn note_rules_fire_in_order() {
        let mut note = HistoryNote::blank();
        assert_eq!(
            HistoryNote::schema().validate(&note),
            Err(ValidationError::Message("Date is required"))
        );
        note.date = "10/02/2026".to_string();
        assert_eq!(
            HistoryNote::schema().validate(&note),
            Err(ValidationError::Message("Description is required"))
        );
        note.description = "Visita ao escritório".to_string();
        assert_eq!(HistoryNote::schema().validate(&note), Ok(()));
    }

    #[test]
    fn note_kind_parses_its_labels() {
        for kind in [
            NoteKind::Visit,
            NoteKind::Call,
            NoteKind::Email,
            NoteKind::Document,
        ] {
            assert_eq!(NoteKind::parse(kind.label()), Some(kind));
        }
        assert_eq!(NoteKind::parse("fax"), None);
    }

    #[test]
    fn client_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ana()).expect("serialize");
        assert!(json.get("lastContact").is_some());
        assert!(json.get("last_contact").is_none());
        assert_eq!(
            json.pointer("/address/postalCode").and_then(|v| v.as_str()),
            Some("01234-567")
        );
    }
}
