use std::cmp::Ordering;

use tracing::trace;

use crate::datetime;
use crate::schema::{Entity, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Name,
    Address,
    Tags,
}

impl FilterMode {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "all" => Some(FilterMode::All),
            "name" => Some(FilterMode::Name),
            "address" => Some(FilterMode::Address),
            "tags" => Some(FilterMode::Tags),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Name => "name",
            FilterMode::Address => "address",
            FilterMode::Tags => "tags",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Date,
}

impl SortKey {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "name" => Some(SortKey::Name),
            "date" => Some(SortKey::Date),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Date => "date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryState {
    pub mode: FilterMode,
    pub search: String,
    pub sort: SortKey,
    pub ascending: bool,
}

impl QueryState {
    #[must_use]
    pub fn new(sort: SortKey) -> Self {
        Self {
            mode: FilterMode::All,
            search: String::new(),
            sort,
            ascending: true,
        }
    }

    pub fn select_sort(&mut self, key: SortKey) {
        if self.sort == key {
            self.ascending = !self.ascending;
        } else {
            self.sort = key;
            self.ascending = true;
        }
    }
}

pub fn run<'a, R: Entity>(
    schema: &Schema<R>,
    records: impl IntoIterator<Item = &'a R>,
    state: &QueryState,
) -> Vec<&'a R> {
    let mut rows: Vec<&R> = records
        .into_iter()
        .filter(|record| matches(schema, record, state))
        .collect();
    sort_rows(schema, &mut rows, state);
    trace!(
        kind = R::KIND,
        mode = state.mode.label(),
        sort = state.sort.label(),
        ascending = state.ascending,
        count = rows.len(),
        "ran query"
    );
    rows
}

fn matches<R: Entity>(schema: &Schema<R>, record: &R, state: &QueryState) -> bool {
    let needle = state.search.as_str();
    match state.mode {
        FilterMode::All => true,
        FilterMode::Name => schema
            .name_getter()
            .is_some_and(|get| contains_ci(&get(record), needle)),
        FilterMode::Address => {
            schema
                .loose_getters()
                .iter()
                .any(|get| contains_ci(&get(record), needle))
                || schema
                    .exact_getters()
                    .iter()
                    .any(|get| get(record).contains(needle))
        }
        FilterMode::Tags => {
            schema.searches_tags() && record.tags().iter().any(|tag| contains_ci(tag, needle))
        }
    }
}

fn sort_rows<R: Entity>(schema: &Schema<R>, rows: &mut [&R], state: &QueryState) {
    match state.sort {
        SortKey::Name => {
            if let Some(get) = schema.name_sort_getter() {
                stable_sort_by(rows, |a, b| {
                    directed(compare_names(&get(a), &get(b)), state.ascending)
                });
            }
        }
        SortKey::Date => {
            if let Some(get) = schema.date_sort_getter() {
                stable_sort_by(rows, |a, b| {
                    directed(
                        datetime::compare_display_dates(&get(a), &get(b)),
                        state.ascending,
                    )
                });
            }
        }
    }
}

fn stable_sort_by<T>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn directed(ordering: Ordering, ascending: bool) -> Ordering {
    if ascending { ordering } else { ordering.reverse() }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(value: &str) -> String {
    value.to_lowercase().chars().map(fold_diacritic).collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
