use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::appointment::Appointment;
use crate::client::{Client, HistoryNote};
use crate::config::Config;
use crate::datetime;
use crate::property::Property;
use crate::schema::{Entity, ValidationError};

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, clients, today))]
    pub fn client_table(&mut self, clients: &[&Client], today: NaiveDate) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "#".to_string(),
            "Name".to_string(),
            "Phone".to_string(),
            "City".to_string(),
            "Last contact".to_string(),
            "Tags".to_string(),
        ];

        let mut rows = Vec::with_capacity(clients.len());
        for (index, client) in clients.iter().enumerate() {
            rows.push(vec![
                self.paint(&(index + 1).to_string(), "33"),
                client.name.clone(),
                client.phone.clone(),
                client.address.city.clone(),
                self.date_cell(&client.last_contact, today, false),
                client.tags.join(", "),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, properties))]
    pub fn property_table(&mut self, properties: &[&Property]) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "#".to_string(),
            "Address".to_string(),
            "Price".to_string(),
            "Area".to_string(),
            "Bed".to_string(),
            "Bath".to_string(),
            "Park".to_string(),
            "Tags".to_string(),
        ];

        let mut rows = Vec::with_capacity(properties.len());
        for (index, property) in properties.iter().enumerate() {
            rows.push(vec![
                self.paint(&(index + 1).to_string(), "33"),
                property.address_line(),
                property.price.clone(),
                property.area.clone(),
                property.bedrooms.clone(),
                property.bathrooms.clone(),
                property.parking.clone(),
                property.tags.join(", "),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, appointments, today))]
    pub fn appointment_table(
        &mut self,
        appointments: &[&Appointment],
        today: NaiveDate,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        let headers = vec![
            "#".to_string(),
            "Date".to_string(),
            "Time".to_string(),
            "Title".to_string(),
            "Location".to_string(),
            "Client".to_string(),
            "Tags".to_string(),
        ];

        let mut rows = Vec::with_capacity(appointments.len());
        for (index, appointment) in appointments.iter().enumerate() {
            rows.push(vec![
                self.paint(&(index + 1).to_string(), "33"),
                self.date_cell(&appointment.date, today, true),
                appointment.time.clone(),
                appointment.title.clone(),
                appointment.location.clone(),
                appointment.client.clone().unwrap_or_default(),
                appointment.tags.join(", "),
            ]);
        }

        write_table(&mut out, headers, rows)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, client, notes))]
    pub fn client_details(
        &mut self,
        client: &Client,
        notes: &[&HistoryNote],
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id            {}", client.id)?;
        writeln!(out, "name          {}", client.name)?;
        writeln!(out, "email         {}", client.email)?;
        writeln!(out, "phone         {}", client.phone)?;
        writeln!(out, "street        {}", client.address.street)?;
        writeln!(out, "city          {}", client.address.city)?;
        writeln!(out, "state         {}", client.address.state)?;
        writeln!(out, "country       {}", client.address.country)?;
        writeln!(out, "postalCode    {}", client.address.postal_code)?;
        writeln!(out, "notes         {}", client.notes)?;
        writeln!(out, "lastContact   {}", client.last_contact)?;
        writeln!(out, "tags          {}", client.tags.join(", "))?;

        if !notes.is_empty() {
            writeln!(out)?;
            writeln!(out, "history")?;
            for (index, note) in notes.iter().enumerate() {
                writeln!(
                    out,
                    "  {} {} [{}] {}",
                    self.paint(&(index + 1).to_string(), "33"),
                    note.date,
                    note.kind.label(),
                    note.description
                )?;
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, property))]
    pub fn property_details(&mut self, property: &Property) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id            {}", property.id)?;
        writeln!(out, "street        {}", property.address.street)?;
        writeln!(out, "number        {}", property.address.number)?;
        writeln!(
            out,
            "unit          {}",
            property.address.unit.clone().unwrap_or_default()
        )?;
        writeln!(out, "neighborhood  {}", property.address.neighborhood)?;
        writeln!(out, "city          {}", property.address.city)?;
        writeln!(out, "state         {}", property.address.state)?;
        writeln!(out, "postalCode    {}", property.address.postal_code)?;
        writeln!(out, "price         {}", property.price)?;
        writeln!(out, "area          {}", property.area)?;
        writeln!(out, "bedrooms      {}", property.bedrooms)?;
        writeln!(out, "bathrooms     {}", property.bathrooms)?;
        writeln!(out, "parking       {}", property.parking)?;
        writeln!(
            out,
            "notes         {}",
            property.notes.clone().unwrap_or_default()
        )?;
        writeln!(out, "tags          {}", property.tags.join(", "))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, appointment))]
    pub fn appointment_details(&mut self, appointment: &Appointment) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        writeln!(out, "id            {}", appointment.id)?;
        writeln!(out, "title         {}", appointment.title)?;
        writeln!(out, "date          {}", appointment.date)?;
        writeln!(out, "time          {}", appointment.time)?;
        writeln!(out, "location      {}", appointment.location)?;
        writeln!(
            out,
            "client        {}",
            appointment.client.clone().unwrap_or_default()
        )?;
        writeln!(
            out,
            "property      {}",
            appointment.property.clone().unwrap_or_default()
        )?;
        writeln!(out, "note          {}", appointment.note)?;
        writeln!(out, "tags          {}", appointment.tags.join(", "))?;

        Ok(())
    }

    #[tracing::instrument(skip(self, record))]
    pub fn draft<R: Entity>(&mut self, record: &R) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        for spec in R::schema().fields() {
            writeln!(out, "{:<13} {}", spec.name(), spec.value(record))?;
        }
        let record_tags = record.tags();
        if !record_tags.is_empty() {
            writeln!(out, "{:<13} {}", "tags", record_tags.join(", "))?;
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, err))]
    pub fn validation_error(&mut self, err: &ValidationError) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        match err {
            ValidationError::Message(message) => {
                writeln!(out, "{}", self.paint(message, "31"))?;
            }
            ValidationError::Fields(fields) => {
                writeln!(out, "{}", self.paint("invalid fields:", "31"))?;
                for (field, message) in fields {
                    writeln!(out, "  {field}: {message}")?;
                }
            }
        }

        Ok(())
    }

    fn date_cell(&self, date: &str, today: NaiveDate, mark_overdue: bool) -> String {
        let parsed = datetime::parse_display_date(date);
        let cell = match parsed.and_then(|d| datetime::relative_label(d, today)) {
            Some(label) => format!("{date} ({label})"),
            None => date.to_string(),
        };
        if mark_overdue && parsed.is_some_and(|d| d < today) {
            self.paint(&cell, "31")
        } else {
            cell
        }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_columns_align_on_display_width() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            vec!["Name".to_string(), "City".to_string()],
            vec![
                vec!["Érica".to_string(), "São Paulo".to_string()],
                vec!["Jo".to_string(), "Rio".to_string()],
            ],
        )
        .expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name  City      ");
        assert_eq!(lines[1], "----- --------- ");
        assert!(lines[2].starts_with("Érica São Paulo"));
        assert!(lines[3].starts_with("Jo    Rio"));
    }

    #[test]
    fn ansi_codes_do_not_count_toward_width() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            vec!["#".to_string(), "Title".to_string()],
            vec![vec!["\x1b[33m1\x1b[0m".to_string(), "Visita".to_string()]],
        )
        .expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        let row = text.lines().nth(2).expect("row");
        assert!(row.contains("\x1b[33m1\x1b[0m Visita"));
    }

    #[test]
    fn strip_ansi_removes_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[31m18/02/2026 (Hoje)\x1b[0m"), "18/02/2026 (Hoje)");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn renderer_rejects_unknown_color_settings() {
        let file = tempfile::NamedTempFile::new().expect("temp rc");
        std::fs::write(file.path(), "color=purple\n").expect("write");
        let cfg = Config::load(Some(file.path())).expect("load");
        assert!(Renderer::new(&cfg).is_err());

        std::fs::write(file.path(), "color=off\n").expect("write");
        let cfg = Config::load(Some(file.path())).expect("load");
        assert!(Renderer::new(&cfg).is_ok());
    }

    #[test]
    fn date_cells_carry_relative_labels() {
        let renderer = Renderer { color: false };
        let today = NaiveDate::from_ymd_opt(2026, 2, 18).expect("date");

        assert_eq!(
            renderer.date_cell("18/02/2026", today, true),
            "18/02/2026 (Hoje)"
        );
        assert_eq!(
            renderer.date_cell("17/02/2026", today, false),
            "17/02/2026 (Ontem)"
        );
        assert_eq!(
            renderer.date_cell("19/02/2026", today, true),
            "19/02/2026 (Amanhã)"
        );
        assert_eq!(renderer.date_cell("25/02/2026", today, true), "25/02/2026");
        assert_eq!(renderer.date_cell("sem data", today, true), "sem data");
    }
}
