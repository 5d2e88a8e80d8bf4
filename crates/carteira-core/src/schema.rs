use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::format::{self, Mask};
use crate::query::{FilterMode, SortKey};
use crate::store::RecordId;

pub trait Entity: Clone + fmt::Debug + 'static {
    const KIND: &'static str;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
    fn blank() -> Self;
    fn schema() -> &'static Schema<Self>;
    fn summary(&self) -> String;

    fn tags(&self) -> &[String] {
        &[]
    }

    fn tags_mut(&mut self) -> Option<&mut Vec<String>> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStyle {
    FirstFailure,
    PerField,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    Message(&'static str),
    #[error("invalid fields: {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
    Fields(BTreeMap<&'static str, &'static str>),
}

#[derive(Debug)]
pub struct FieldSpec<R> {
    name: &'static str,
    get: fn(&R) -> String,
    set: fn(&mut R, &str),
    mask: Option<Mask>,
    required: Option<&'static str>,
    pattern: Option<(&'static str, &'static str)>,
}

impl<R> FieldSpec<R> {
    #[must_use]
    pub fn new(name: &'static str, get: fn(&R) -> String, set: fn(&mut R, &str)) -> Self {
        Self {
            name,
            get,
            set,
            mask: None,
            required: None,
            pattern: None,
        }
    }

    #[must_use]
    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    #[must_use]
    pub fn mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: &'static str, message: &'static str) -> Self {
        self.pattern = Some((pattern, message));
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn value(&self, record: &R) -> String {
        (self.get)(record)
    }

    pub fn write(&self, record: &mut R, raw: &str) -> String {
        let value = match self.mask {
            Some(mask) => mask.apply(raw),
            None => raw.to_string(),
        };
        (self.set)(record, &value);
        value
    }

    fn violation(&self, record: &R) -> Option<&'static str> {
        let value = (self.get)(record);
        if let Some(message) = self.required
            && value.trim().is_empty()
        {
            return Some(message);
        }
        if let Some((pattern, message)) = self.pattern
            && !value.trim().is_empty()
            && !format::matches_pattern(pattern, &value)
        {
            return Some(message);
        }
        None
    }
}

#[derive(Debug)]
pub struct Schema<R: Entity> {
    style: ValidationStyle,
    fields: Vec<FieldSpec<R>>,
    tags_required: Option<&'static str>,
    vocabulary: Option<&'static [&'static str]>,
    search_name: Option<fn(&R) -> String>,
    search_loose: Vec<fn(&R) -> String>,
    search_exact: Vec<fn(&R) -> String>,
    search_tags: bool,
    sort_name: Option<fn(&R) -> String>,
    sort_date: Option<fn(&R) -> String>,
    default_sort: SortKey,
}

impl<R: Entity> Schema<R> {
    #[must_use]
    pub fn builder(style: ValidationStyle) -> SchemaBuilder<R> {
        SchemaBuilder {
            schema: Schema {
                style,
                fields: Vec::new(),
                tags_required: None,
                vocabulary: None,
                search_name: None,
                search_loose: Vec::new(),
                search_exact: Vec::new(),
                search_tags: false,
                sort_name: None,
                sort_date: None,
                default_sort: SortKey::Name,
            },
        }
    }

    pub fn validate(&self, record: &R) -> Result<(), ValidationError> {
        let result = match self.style {
            ValidationStyle::FirstFailure => self.validate_first(record),
            ValidationStyle::PerField => self.validate_per_field(record),
        };
        if let Err(err) = &result {
            debug!(kind = R::KIND, error = %err, "validation failed");
        }
        result
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec<R>> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec<R>> {
        self.fields.iter()
    }

    #[must_use]
    pub fn style(&self) -> ValidationStyle {
        self.style
    }

    #[must_use]
    pub fn vocabulary(&self) -> Option<&'static [&'static str]> {
        self.vocabulary
    }

    #[must_use]
    pub fn default_sort(&self) -> SortKey {
        self.default_sort
    }

    #[must_use]
    pub fn supports_mode(&self, mode: FilterMode) -> bool {
        match mode {
            FilterMode::All => true,
            FilterMode::Name => self.search_name.is_some(),
            FilterMode::Address => {
                !self.search_loose.is_empty() || !self.search_exact.is_empty()
            }
            FilterMode::Tags => self.search_tags,
        }
    }

    #[must_use]
    pub fn supports_sort(&self, key: SortKey) -> bool {
        match key {
            SortKey::Name => self.sort_name.is_some(),
            SortKey::Date => self.sort_date.is_some(),
        }
    }

    #[must_use]
    pub fn date_value(&self, record: &R) -> Option<String> {
        self.sort_date.map(|get| get(record))
    }

    pub(crate) fn name_getter(&self) -> Option<fn(&R) -> String> {
        self.search_name
    }

    pub(crate) fn loose_getters(&self) -> &[fn(&R) -> String] {
        &self.search_loose
    }

    pub(crate) fn exact_getters(&self) -> &[fn(&R) -> String] {
        &self.search_exact
    }

    pub(crate) fn searches_tags(&self) -> bool {
        self.search_tags
    }

    pub(crate) fn name_sort_getter(&self) -> Option<fn(&R) -> String> {
        self.sort_name
    }

    pub(crate) fn date_sort_getter(&self) -> Option<fn(&R) -> String> {
        self.sort_date
    }

    fn validate_first(&self, record: &R) -> Result<(), ValidationError> {
        for spec in &self.fields {
            if let Some(message) = spec.violation(record) {
                return Err(ValidationError::Message(message));
            }
        }
        if let Some(message) = self.tags_required
            && record.tags().is_empty()
        {
            return Err(ValidationError::Message(message));
        }
        Ok(())
    }

    fn validate_per_field(&self, record: &R) -> Result<(), ValidationError> {
        let mut failures = BTreeMap::new();
        for spec in &self.fields {
            if let Some(message) = spec.violation(record) {
                failures.insert(spec.name, message);
            }
        }
        if let Some(message) = self.tags_required
            && record.tags().is_empty()
        {
            failures.insert("tags", message);
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(failures))
        }
    }
}

#[derive(Debug)]
pub struct SchemaBuilder<R: Entity> {
    schema: Schema<R>,
}

impl<R: Entity> SchemaBuilder<R> {
    #[must_use]
    pub fn field(mut self, spec: FieldSpec<R>) -> Self {
        self.schema.fields.push(spec);
        self
    }

    #[must_use]
    pub fn tags_required(mut self, message: &'static str) -> Self {
        self.schema.tags_required = Some(message);
        self
    }

    #[must_use]
    pub fn vocabulary(mut self, tags: &'static [&'static str]) -> Self {
        self.schema.vocabulary = Some(tags);
        self
    }

    #[must_use]
    pub fn search_name(mut self, get: fn(&R) -> String) -> Self {
        self.schema.search_name = Some(get);
        self
    }

    #[must_use]
    pub fn search_loose(mut self, get: fn(&R) -> String) -> Self {
        self.schema.search_loose.push(get);
        self
    }

    #[must_use]
    pub fn search_exact(mut self, get: fn(&R) -> String) -> Self {
        self.schema.search_exact.push(get);
        self
    }

    #[must_use]
    pub fn search_tags(mut self) -> Self {
        self.schema.search_tags = true;
        self
    }

    #[must_use]
    pub fn sort_name(mut self, get: fn(&R) -> String) -> Self {
        self.schema.sort_name = Some(get);
        self
    }

    #[must_use]
    pub fn sort_date(mut self, get: fn(&R) -> String) -> Self {
        self.schema.sort_date = Some(get);
        self
    }

    #[must_use]
    pub fn default_sort(mut self, key: SortKey) -> Self {
        self.schema.default_sort = key;
        self
    }

    #[must_use]
    pub fn build(self) -> Schema<R> {
        self.schema
    }
}
