use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::appointment::Appointment;
use crate::client::{Client, HistoryNote, NoteKind};
use crate::datetime::Period;
use crate::property::Property;
use crate::query::{FilterMode, SortKey};
use crate::render::Renderer;
use crate::schema::Entity;
use crate::screen::{ClientWorkspace, Modal, Screen, ScreenError};
use crate::seed;
use crate::store::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Clients,
    Properties,
    Appointments,
}

impl ScreenKind {
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "clients" => Some(Self::Clients),
            "properties" => Some(Self::Properties),
            "appointments" => Some(Self::Appointments),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Properties => "properties",
            Self::Appointments => "appointments",
        }
    }
}

#[derive(Debug)]
pub struct AppShell {
    pub clients: ClientWorkspace,
    pub properties: Screen<Property>,
    pub appointments: Screen<Appointment>,
    pub active: ScreenKind,
}

impl AppShell {
    #[must_use]
    pub fn new(active: ScreenKind) -> Self {
        Self {
            clients: ClientWorkspace::new(),
            properties: Screen::new(),
            appointments: Screen::new(),
            active,
        }
    }

    #[instrument(skip(self, today))]
    pub fn seed_samples(&mut self, today: NaiveDate) {
        self.clients.screen.seed(seed::sample_clients(today));
        self.properties.seed(seed::sample_properties());
        self.appointments.seed(seed::sample_appointments(today));
    }

    #[must_use]
    pub fn form_open(&self) -> bool {
        let modal = match self.active {
            ScreenKind::Clients => self.clients.screen.modal(),
            ScreenKind::Properties => self.properties.modal(),
            ScreenKind::Appointments => self.appointments.modal(),
        };
        !matches!(modal, Modal::Closed | Modal::Viewing(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "clients",
        "properties",
        "appointments",
        "list",
        "filter",
        "search",
        "sort",
        "period",
        "new",
        "add",
        "set",
        "tag",
        "save",
        "cancel",
        "view",
        "edit",
        "delete",
        "note",
        "export",
        "help",
        "quit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(shell, renderer, tokens, today))]
pub fn dispatch(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    tokens: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(Outcome::Continue);
    };

    let known = known_command_names();
    let Some(command) = expand_command_abbrev(first, &known) else {
        return Err(anyhow!("unknown command: {first}"));
    };

    debug!(command, args = ?args, screen = shell.active.label(), "dispatching command");

    match command {
        "clients" => cmd_switch(shell, renderer, ScreenKind::Clients, today),
        "properties" => cmd_switch(shell, renderer, ScreenKind::Properties, today),
        "appointments" => cmd_switch(shell, renderer, ScreenKind::Appointments, today),
        "list" => cmd_list(shell, renderer, today),
        "filter" => cmd_filter(shell, renderer, args, today),
        "search" => cmd_search(shell, renderer, args, today),
        "sort" => cmd_sort(shell, renderer, args, today),
        "period" => cmd_period(shell, renderer, args, today),
        "new" => cmd_new(shell, renderer),
        "add" => cmd_add(shell, args),
        "set" => cmd_set(shell, args),
        "tag" => cmd_tag(shell, args),
        "save" => cmd_save(shell, renderer),
        "cancel" => cmd_cancel(shell),
        "view" => cmd_view(shell, renderer, args, today),
        "edit" => cmd_edit(shell, renderer, args, today),
        "delete" => cmd_delete(shell, args, today),
        "note" => cmd_note(shell, renderer, args, today),
        "export" => cmd_export(shell),
        "help" => cmd_help(),
        "quit" => Ok(Outcome::Quit),
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn render_active_list(
    shell: &AppShell,
    renderer: &mut Renderer,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match shell.active {
        ScreenKind::Clients => renderer.client_table(&shell.clients.screen.visible(today), today),
        ScreenKind::Properties => renderer.property_table(&shell.properties.visible(today)),
        ScreenKind::Appointments => {
            renderer.appointment_table(&shell.appointments.visible(today), today)
        }
    }
}

#[instrument(skip(shell, renderer, today))]
fn cmd_switch(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    kind: ScreenKind,
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!(screen = kind.label(), "command switch");
    shell.active = kind;
    render_active_list(shell, renderer, today)?;
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, today))]
fn cmd_list(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command list");
    render_active_list(shell, renderer, today)?;
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_filter(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command filter");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("filter requires a mode: all, name, address, tags"))?;
    let mode = FilterMode::parse(token)
        .ok_or_else(|| anyhow!("unknown filter mode: {token} (all, name, address, tags)"))?;

    match shell.active {
        ScreenKind::Clients => shell.clients.screen.set_filter_mode(mode)?,
        ScreenKind::Properties => shell.properties.set_filter_mode(mode)?,
        ScreenKind::Appointments => shell.appointments.set_filter_mode(mode)?,
    }

    render_active_list(shell, renderer, today)?;
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_search(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command search");

    let term = args.join(" ");
    match shell.active {
        ScreenKind::Clients => shell.clients.screen.set_search(&term),
        ScreenKind::Properties => shell.properties.set_search(&term),
        ScreenKind::Appointments => shell.appointments.set_search(&term),
    }

    render_active_list(shell, renderer, today)?;
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_sort(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command sort");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("sort requires a key: name or date"))?;
    let key =
        SortKey::parse(token).ok_or_else(|| anyhow!("unknown sort key: {token} (name, date)"))?;

    match shell.active {
        ScreenKind::Clients => shell.clients.screen.select_sort(key)?,
        ScreenKind::Properties => shell.properties.select_sort(key)?,
        ScreenKind::Appointments => shell.appointments.select_sort(key)?,
    }

    render_active_list(shell, renderer, today)?;
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_period(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command period");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("period requires a window: all, today, tomorrow, week, month"))?;
    let period = Period::parse(token).ok_or_else(|| {
        anyhow!("unknown period: {token} (all, today, tomorrow, week, month)")
    })?;

    match shell.active {
        ScreenKind::Clients => shell.clients.screen.set_period(period)?,
        ScreenKind::Properties => shell.properties.set_period(period)?,
        ScreenKind::Appointments => shell.appointments.set_period(period)?,
    }

    render_active_list(shell, renderer, today)?;
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer))]
fn cmd_new(shell: &mut AppShell, renderer: &mut Renderer) -> anyhow::Result<Outcome> {
    info!("command new");

    match shell.active {
        ScreenKind::Clients => {
            shell.clients.screen.open_create();
            if let Some(draft) = shell.clients.screen.draft() {
                renderer.draft(draft)?;
            }
        }
        ScreenKind::Properties => {
            shell.properties.open_create();
            if let Some(draft) = shell.properties.draft() {
                renderer.draft(draft)?;
            }
        }
        ScreenKind::Appointments => {
            shell.appointments.open_create();
            if let Some(draft) = shell.appointments.draft() {
                renderer.draft(draft)?;
            }
        }
    }

    Ok(Outcome::Continue)
}

#[instrument(skip(shell, args))]
fn cmd_add(shell: &mut AppShell, args: &[String]) -> anyhow::Result<Outcome> {
    info!("command add");

    match shell.active {
        ScreenKind::Clients => add_record(&mut shell.clients.screen, args)?,
        ScreenKind::Properties => add_record(&mut shell.properties, args)?,
        ScreenKind::Appointments => add_record(&mut shell.appointments, args)?,
    }

    Ok(Outcome::Continue)
}

fn add_record<R: Entity>(screen: &mut Screen<R>, args: &[String]) -> anyhow::Result<()> {
    screen.open_create();
    let outcome = apply_add_mods(screen, args)
        .and_then(|()| screen.save().map_err(anyhow::Error::from));

    match outcome {
        Ok(id) => {
            println!("Created {} '{}'.", R::KIND, screen.store().get(id)?.summary());
            Ok(())
        }
        Err(err) => {
            screen.close();
            Err(err)
        }
    }
}

fn apply_add_mods<R: Entity>(screen: &mut Screen<R>, args: &[String]) -> anyhow::Result<()> {
    if args.is_empty() {
        return Err(anyhow!("add requires field:value or +tag modifiers"));
    }

    for arg in args {
        if let Some(tag) = arg.strip_prefix('+') {
            screen.toggle_tag(tag)?;
            continue;
        }

        let Some((field, value)) = arg.split_once(':').or_else(|| arg.split_once('=')) else {
            return Err(anyhow!("unrecognized modifier: {arg}"));
        };
        screen.set_field(field.trim(), value)?;
    }

    Ok(())
}

#[instrument(skip(shell, args))]
fn cmd_set(shell: &mut AppShell, args: &[String]) -> anyhow::Result<Outcome> {
    info!("command set");

    let (field, rest) = args
        .split_first()
        .ok_or_else(|| anyhow!("set requires a field name"))?;
    let value = rest.join(" ");

    let stored = match shell.active {
        ScreenKind::Clients => {
            if matches!(shell.clients.screen.modal(), Modal::NoteEditing(_)) {
                shell.clients.set_note_field(field, &value)?
            } else {
                shell.clients.screen.set_field(field, &value)?
            }
        }
        ScreenKind::Properties => shell.properties.set_field(field, &value)?,
        ScreenKind::Appointments => shell.appointments.set_field(field, &value)?,
    };

    println!("{field} = {stored}");
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, args))]
fn cmd_tag(shell: &mut AppShell, args: &[String]) -> anyhow::Result<Outcome> {
    info!("command tag");

    let tag = args.join(" ");
    if tag.is_empty() {
        return Err(anyhow!("tag requires a tag name"));
    }

    let present = match shell.active {
        ScreenKind::Clients => shell.clients.screen.toggle_tag(&tag)?,
        ScreenKind::Properties => shell.properties.toggle_tag(&tag)?,
        ScreenKind::Appointments => shell.appointments.toggle_tag(&tag)?,
    };

    println!("Tag '{tag}' {}.", if present { "added" } else { "removed" });
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer))]
fn cmd_save(shell: &mut AppShell, renderer: &mut Renderer) -> anyhow::Result<Outcome> {
    info!("command save");

    match shell.active {
        ScreenKind::Clients => {
            if matches!(shell.clients.screen.modal(), Modal::NoteEditing(_)) {
                match shell.clients.save_note() {
                    Ok(_) => println!("Saved note."),
                    Err(ScreenError::Invalid(err)) => renderer.validation_error(&err)?,
                    Err(other) => return Err(other.into()),
                }
            } else {
                save_screen(&mut shell.clients.screen, renderer)?;
            }
        }
        ScreenKind::Properties => save_screen(&mut shell.properties, renderer)?,
        ScreenKind::Appointments => save_screen(&mut shell.appointments, renderer)?,
    }

    Ok(Outcome::Continue)
}

fn save_screen<R: Entity>(screen: &mut Screen<R>, renderer: &mut Renderer) -> anyhow::Result<()> {
    match screen.save() {
        Ok(id) => {
            let summary = screen.store().get(id)?.summary();
            println!("Saved {} '{}'.", R::KIND, summary);
            Ok(())
        }
        Err(ScreenError::Invalid(err)) => {
            renderer.validation_error(&err)?;
            Ok(())
        }
        Err(other) => Err(other.into()),
    }
}

#[instrument(skip(shell))]
fn cmd_cancel(shell: &mut AppShell) -> anyhow::Result<Outcome> {
    info!("command cancel");

    match shell.active {
        ScreenKind::Clients => {
            if matches!(shell.clients.screen.modal(), Modal::NoteEditing(_)) {
                shell.clients.cancel_note();
            } else {
                shell.clients.screen.close();
            }
        }
        ScreenKind::Properties => shell.properties.close(),
        ScreenKind::Appointments => shell.appointments.close(),
    }

    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_view(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command view");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("view requires a row number"))?;

    match shell.active {
        ScreenKind::Clients => {
            let id = resolve_row(&shell.clients.screen, today, token)?;
            shell.clients.screen.open_view(id)?;
            let client = shell.clients.screen.store().get(id)?;
            renderer.client_details(client, &shell.clients.notes_for(id))?;
        }
        ScreenKind::Properties => {
            let id = resolve_row(&shell.properties, today, token)?;
            shell.properties.open_view(id)?;
            renderer.property_details(shell.properties.store().get(id)?)?;
        }
        ScreenKind::Appointments => {
            let id = resolve_row(&shell.appointments, today, token)?;
            shell.appointments.open_view(id)?;
            renderer.appointment_details(shell.appointments.store().get(id)?)?;
        }
    }

    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_edit(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command edit");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("edit requires a row number"))?;

    match shell.active {
        ScreenKind::Clients => {
            let id = resolve_row(&shell.clients.screen, today, token)?;
            shell.clients.screen.open_edit(id)?;
            if let Some(draft) = shell.clients.screen.draft() {
                renderer.draft(draft)?;
            }
        }
        ScreenKind::Properties => {
            let id = resolve_row(&shell.properties, today, token)?;
            shell.properties.open_edit(id)?;
            if let Some(draft) = shell.properties.draft() {
                renderer.draft(draft)?;
            }
        }
        ScreenKind::Appointments => {
            let id = resolve_row(&shell.appointments, today, token)?;
            shell.appointments.open_edit(id)?;
            if let Some(draft) = shell.appointments.draft() {
                renderer.draft(draft)?;
            }
        }
    }

    Ok(Outcome::Continue)
}

#[instrument(skip(shell, args, today))]
fn cmd_delete(shell: &mut AppShell, args: &[String], today: NaiveDate) -> anyhow::Result<Outcome> {
    info!("command delete");

    let token = args
        .first()
        .ok_or_else(|| anyhow!("delete requires a row number"))?;

    let (kind, summary) = match shell.active {
        ScreenKind::Clients => {
            let id = resolve_row(&shell.clients.screen, today, token)?;
            (Client::KIND, shell.clients.delete_client(id)?.summary())
        }
        ScreenKind::Properties => {
            let id = resolve_row(&shell.properties, today, token)?;
            (Property::KIND, shell.properties.delete(id)?.summary())
        }
        ScreenKind::Appointments => {
            let id = resolve_row(&shell.appointments, today, token)?;
            (Appointment::KIND, shell.appointments.delete(id)?.summary())
        }
    };

    println!("Deleted {kind} '{summary}'.");
    Ok(Outcome::Continue)
}

#[instrument(skip(shell, renderer, args, today))]
fn cmd_note(
    shell: &mut AppShell,
    renderer: &mut Renderer,
    args: &[String],
    today: NaiveDate,
) -> anyhow::Result<Outcome> {
    info!("command note");

    if shell.active != ScreenKind::Clients {
        return Err(anyhow!("notes are only available on the clients screen"));
    }

    let (sub, rest) = args.split_first().ok_or_else(|| {
        anyhow!("note requires a subcommand: add, list, edit, kind, delete")
    })?;

    match sub.as_str() {
        "add" => {
            let client = note_target(shell, rest.first(), today)?;
            shell.clients.begin_note(client)?;
            if let Some(draft) = shell.clients.note_draft() {
                renderer.draft(draft)?;
            }
        }
        "list" => {
            let client = note_target(shell, rest.first(), today)?;
            let record = shell.clients.screen.store().get(client)?;
            renderer.client_details(record, &shell.clients.notes_for(client))?;
        }
        "edit" => {
            let index = rest
                .first()
                .ok_or_else(|| anyhow!("note edit requires a note number"))?;
            let client = note_target(shell, rest.get(1), today)?;
            let note = resolve_note(&shell.clients, client, index)?;
            shell.clients.edit_note(note)?;
            if let Some(draft) = shell.clients.note_draft() {
                renderer.draft(draft)?;
            }
        }
        "kind" => {
            let token = rest.first().ok_or_else(|| {
                anyhow!("note kind requires a kind: visit, call, email, document")
            })?;
            let kind = NoteKind::parse(token).ok_or_else(|| {
                anyhow!("unknown note kind: {token} (visit, call, email, document)")
            })?;
            shell.clients.set_note_kind(kind)?;
            println!("kind = {}", kind.label());
        }
        "delete" => {
            let index = rest
                .first()
                .ok_or_else(|| anyhow!("note delete requires a note number"))?;
            let client = note_target(shell, rest.get(1), today)?;
            let note = resolve_note(&shell.clients, client, index)?;
            shell.clients.delete_note(note)?;
            println!("Deleted note.");
        }
        other => {
            return Err(anyhow!(
                "unknown note subcommand: {other} (add, list, edit, kind, delete)"
            ));
        }
    }

    Ok(Outcome::Continue)
}

fn note_target(
    shell: &AppShell,
    token: Option<&String>,
    today: NaiveDate,
) -> anyhow::Result<RecordId> {
    if let Some(tok) = token {
        return resolve_row(&shell.clients.screen, today, tok);
    }

    match shell.clients.screen.modal() {
        Modal::Viewing(id) | Modal::Editing(id) | Modal::NoteEditing(id) => Ok(id),
        Modal::Closed | Modal::Creating => {
            Err(anyhow!("open a client first (view <n>) or pass a row number"))
        }
    }
}

fn resolve_row<R: Entity>(
    screen: &Screen<R>,
    today: NaiveDate,
    token: &str,
) -> anyhow::Result<RecordId> {
    let row: usize = token
        .parse()
        .map_err(|_| anyhow!("expected a row number, got: {token}"))?;
    let rows = screen.visible(today);
    if row == 0 || row > rows.len() {
        return Err(anyhow!(
            "no row {row} on the {} screen ({} visible)",
            R::KIND,
            rows.len()
        ));
    }
    Ok(rows[row - 1].id())
}

fn resolve_note(
    workspace: &ClientWorkspace,
    client: RecordId,
    token: &str,
) -> anyhow::Result<RecordId> {
    let index: usize = token
        .parse()
        .map_err(|_| anyhow!("expected a note number, got: {token}"))?;
    let notes = workspace.notes_for(client);
    if index == 0 || index > notes.len() {
        return Err(anyhow!("no note {index} for this client ({} listed)", notes.len()));
    }
    Ok(notes[index - 1].id)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportSnapshot<'a> {
    clients: &'a [Client],
    history_notes: &'a [HistoryNote],
    properties: &'a [Property],
    appointments: &'a [Appointment],
}

#[instrument(skip(shell))]
fn cmd_export(shell: &AppShell) -> anyhow::Result<Outcome> {
    info!("command export");

    let snapshot = ExportSnapshot {
        clients: shell.clients.screen.store().records(),
        history_notes: shell.clients.notes().records(),
        properties: shell.properties.store().records(),
        appointments: shell.appointments.store().records(),
    };

    let out = serde_json::to_string_pretty(&snapshot)?;
    println!("{out}");
    Ok(Outcome::Continue)
}

fn cmd_help() -> anyhow::Result<Outcome> {
    info!("command help");

    println!("screens:  clients | properties | appointments");
    println!("queries:  list | filter <all|name|address|tags> | search <text> | sort <name|date> | period <all|today|tomorrow|week|month>");
    println!("forms:    new | add <field:value ...> [+tag ...] | set <field> <value> | tag <name> | save | cancel");
    println!("records:  view <n> | edit <n> | delete <n>");
    println!("notes:    note add [n] | note list [n] | note edit <k> [n] | note kind <visit|call|email|document> | note delete <k> [n]");
    println!("misc:     export | help | quit");
    Ok(Outcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn plain_renderer() -> Renderer {
        let file = tempfile::NamedTempFile::new().expect("temp rc");
        std::fs::write(file.path(), "color=off\n").expect("write rc");
        let cfg = Config::load(Some(file.path())).expect("load");
        Renderer::new(&cfg).expect("renderer")
    }

    fn run(shell: &mut AppShell, renderer: &mut Renderer, line: &[&str], today: NaiveDate) {
        let tokens: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        dispatch(shell, renderer, &tokens, today).expect("dispatch");
    }

    #[test]
    fn abbreviations_expand_unique_prefixes_only() {
        let known = known_command_names();
        assert_eq!(expand_command_abbrev("cl", &known), Some("clients"));
        assert_eq!(expand_command_abbrev("sa", &known), Some("save"));
        assert_eq!(expand_command_abbrev("set", &known), Some("set"));
        assert_eq!(expand_command_abbrev("se", &known), None);
        assert_eq!(expand_command_abbrev("q", &known), Some("quit"));
        assert_eq!(expand_command_abbrev("zz", &known), None);
    }

    #[test]
    fn add_creates_a_record_in_one_shot() {
        let mut shell = AppShell::new(ScreenKind::Clients);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);

        run(
            &mut shell,
            &mut renderer,
            &["add", "name:Ana Lima", "lastContact:17/02/2026", "+Novo Lead"],
            today,
        );

        assert_eq!(shell.clients.screen.store().len(), 1);
        let stored = &shell.clients.screen.store().records()[0];
        assert_eq!(stored.name, "Ana Lima");
        assert_eq!(stored.tags, vec!["Novo Lead".to_string()]);
        assert_eq!(shell.clients.screen.modal(), Modal::Closed);
    }

    #[test]
    fn add_with_missing_fields_fails_and_closes_the_form() {
        let mut shell = AppShell::new(ScreenKind::Appointments);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);

        let tokens = vec!["add".to_string(), "title:Visita".to_string()];
        let err = dispatch(&mut shell, &mut renderer, &tokens, today).expect_err("invalid");
        assert!(err.to_string().contains("Date is required"));
        assert_eq!(shell.appointments.modal(), Modal::Closed);
        assert!(shell.appointments.store().is_empty());
    }

    #[test]
    fn interactive_save_failure_keeps_the_form_open() {
        let mut shell = AppShell::new(ScreenKind::Properties);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);

        run(&mut shell, &mut renderer, &["new"], today);
        run(&mut shell, &mut renderer, &["set", "street", "Rua", "Alpha"], today);
        run(&mut shell, &mut renderer, &["save"], today);

        assert_eq!(shell.properties.modal(), Modal::Creating);
        assert!(shell.properties.error().is_some());
        assert!(shell.properties.store().is_empty());
        assert_eq!(
            shell.properties.draft().expect("draft").address.street,
            "Rua Alpha"
        );
    }

    #[test]
    fn set_applies_masks_through_the_dispatcher() {
        let mut shell = AppShell::new(ScreenKind::Clients);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);

        run(&mut shell, &mut renderer, &["new"], today);
        run(&mut shell, &mut renderer, &["set", "phone", "11999999999"], today);
        assert_eq!(
            shell.clients.screen.draft().expect("draft").phone,
            "(11) 99999-9999"
        );
    }

    #[test]
    fn row_numbers_resolve_against_the_visible_list() {
        let mut shell = AppShell::new(ScreenKind::Clients);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);
        shell.seed_samples(today);

        run(&mut shell, &mut renderer, &["sort", "name"], today);
        run(&mut shell, &mut renderer, &["view", "1"], today);
        let viewed = match shell.clients.screen.modal() {
            Modal::Viewing(id) => id,
            other => panic!("expected viewing modal, got {other:?}"),
        };
        assert_eq!(
            shell.clients.screen.store().get(viewed).expect("record").name,
            "Pedro Oliveira"
        );

        run(&mut shell, &mut renderer, &["delete", "1"], today);
        assert_eq!(shell.clients.screen.store().len(), 2);
        assert_eq!(shell.clients.screen.modal(), Modal::Closed);

        let tokens = vec!["view".to_string(), "9".to_string()];
        let err = dispatch(&mut shell, &mut renderer, &tokens, today).expect_err("bad row");
        assert!(err.to_string().contains("no row 9"));
    }

    #[test]
    fn note_commands_require_the_clients_screen() {
        let mut shell = AppShell::new(ScreenKind::Properties);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);

        let tokens = vec!["note".to_string(), "add".to_string()];
        let err = dispatch(&mut shell, &mut renderer, &tokens, today).expect_err("wrong screen");
        assert!(err.to_string().contains("clients screen"));
    }

    #[test]
    fn note_flow_runs_through_the_dispatcher() {
        let mut shell = AppShell::new(ScreenKind::Clients);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);
        shell.seed_samples(today);

        run(&mut shell, &mut renderer, &["view", "1"], today);
        run(&mut shell, &mut renderer, &["note", "add"], today);
        run(&mut shell, &mut renderer, &["set", "date", "18/02/2026"], today);
        run(
            &mut shell,
            &mut renderer,
            &["set", "description", "Ligação", "de", "retorno"],
            today,
        );
        run(&mut shell, &mut renderer, &["note", "kind", "call"], today);
        run(&mut shell, &mut renderer, &["save"], today);

        let client = match shell.clients.screen.modal() {
            Modal::Viewing(id) => id,
            other => panic!("expected viewing modal, got {other:?}"),
        };
        let notes = shell.clients.notes_for(client);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].description, "Ligação de retorno");
        assert_eq!(notes[0].kind, NoteKind::Call);
    }

    #[test]
    fn period_and_filter_gates_surface_as_errors() {
        let mut shell = AppShell::new(ScreenKind::Properties);
        let mut renderer = plain_renderer();
        let today = day(2026, 2, 18);

        let tokens = vec!["period".to_string(), "week".to_string()];
        let err = dispatch(&mut shell, &mut renderer, &tokens, today).expect_err("no dates");
        assert!(err.to_string().contains("no date field"));

        let tokens = vec!["filter".to_string(), "tags".to_string()];
        let err = dispatch(&mut shell, &mut renderer, &tokens, today).expect_err("no tag search");
        assert!(err.to_string().contains("unsupported filter mode"));
    }

    #[test]
    fn quit_ends_the_session() {
        let mut shell = AppShell::new(ScreenKind::Clients);
        let mut renderer = plain_renderer();
        let tokens = vec!["quit".to_string()];
        let outcome =
            dispatch(&mut shell, &mut renderer, &tokens, day(2026, 2, 18)).expect("dispatch");
        assert_eq!(outcome, Outcome::Quit);
    }
}
