use carteira_core::appointment::Appointment;
use carteira_core::client::NoteKind;
use carteira_core::commands::{self, AppShell, Outcome, ScreenKind};
use carteira_core::config::Config;
use carteira_core::datetime::Period;
use carteira_core::query::{FilterMode, SortKey};
use carteira_core::render::Renderer;
use carteira_core::screen::{ClientWorkspace, Screen};
use carteira_core::seed;
use chrono::NaiveDate;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn plain_renderer() -> Renderer {
    let file = tempfile::NamedTempFile::new().expect("temp rc");
    std::fs::write(file.path(), "color=off\n").expect("write rc");
    let cfg = Config::load(Some(file.path())).expect("load config");
    Renderer::new(&cfg).expect("renderer")
}

fn run(shell: &mut AppShell, renderer: &mut Renderer, line: &[&str], today: NaiveDate) {
    let tokens: Vec<String> = line.iter().map(|s| s.to_string()).collect();
    commands::dispatch(shell, renderer, &tokens, today).expect("dispatch");
}

#[test]
fn client_lifecycle_with_notes_and_queries() {
    let today = day(2026, 2, 18);
    let mut ws = ClientWorkspace::new();
    ws.screen.seed(seed::sample_clients(today));

    ws.screen
        .set_filter_mode(FilterMode::Tags)
        .expect("tags filter");
    ws.screen.set_search("Novo Lead");
    let visible = ws.screen.visible(today);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Pedro Oliveira");

    ws.screen
        .set_filter_mode(FilterMode::All)
        .expect("all filter");
    ws.screen.set_search("");
    ws.screen.open_create();
    ws.screen.set_field("name", "Ana Lima").expect("set name");
    ws.screen
        .set_field("phone", "11988887777")
        .expect("set phone");
    ws.screen
        .set_field("lastContact", "18/02/2026")
        .expect("set contact");
    ws.screen.toggle_tag("Novo Lead").expect("toggle tag");
    let id = ws.screen.save().expect("save client");

    assert_eq!(ws.screen.store().len(), 4);
    assert_eq!(
        ws.screen.store().get(id).expect("stored").phone,
        "(11) 98888-7777"
    );

    ws.screen.open_view(id).expect("view");
    ws.begin_note(id).expect("note form");
    ws.set_note_field("date", "18/02/2026").expect("note date");
    ws.set_note_field("description", "Primeiro contato").expect("note text");
    ws.set_note_kind(NoteKind::Call).expect("note kind");
    ws.save_note().expect("save note");
    assert_eq!(ws.notes_for(id).len(), 1);

    ws.delete_client(id).expect("delete client");
    assert_eq!(ws.screen.store().len(), 3);
    assert_eq!(ws.notes_for(id).len(), 1);
}

#[test]
fn appointment_board_follows_period_and_date_sort() {
    let today = day(2026, 2, 18);
    let mut screen = Screen::<Appointment>::new();
    screen.seed(seed::sample_appointments(today));

    assert_eq!(screen.visible(today).len(), 6);

    screen.set_period(Period::Today).expect("today period");
    let todays = screen.visible(today);
    assert_eq!(todays.len(), 2);
    assert!(todays.iter().all(|a| a.date == "18/02/2026"));

    screen.set_period(Period::Tomorrow).expect("tomorrow period");
    assert_eq!(screen.visible(today).len(), 2);

    screen.set_period(Period::All).expect("all period");
    screen.select_sort(SortKey::Date).expect("date sort");
    let newest_first = screen.visible(today);
    assert_eq!(newest_first[0].date, "19/02/2026");
    assert_eq!(newest_first[5].date, "17/02/2026");
}

#[test]
fn command_session_covers_the_three_screens() {
    let today = day(2026, 2, 18);
    let mut shell = AppShell::new(ScreenKind::Clients);
    shell.seed_samples(today);
    let mut renderer = plain_renderer();

    run(&mut shell, &mut renderer, &["properties"], today);
    assert_eq!(shell.active, ScreenKind::Properties);

    run(&mut shell, &mut renderer, &["filter", "address"], today);
    run(&mut shell, &mut renderer, &["search", "flores"], today);
    assert_eq!(shell.properties.visible(today).len(), 1);

    run(&mut shell, &mut renderer, &["appointments"], today);
    run(&mut shell, &mut renderer, &["period", "today"], today);
    assert_eq!(shell.appointments.visible(today).len(), 2);

    run(&mut shell, &mut renderer, &["clients"], today);
    run(
        &mut shell,
        &mut renderer,
        &["add", "name:Carlos Souza", "lastContact:18/02/2026"],
        today,
    );
    assert_eq!(shell.clients.screen.store().len(), 4);

    run(&mut shell, &mut renderer, &["export"], today);

    let tokens = vec!["quit".to_string()];
    let outcome = commands::dispatch(&mut shell, &mut renderer, &tokens, today).expect("quit");
    assert_eq!(outcome, Outcome::Quit);
}
