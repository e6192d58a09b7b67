//! `lookup-shell`: drive one lookup widget from the terminal.
//!
//! Each line of stdin is one interaction (`type prod`, `key Enter`,
//! `select Prod`, ...); the widget's state is printed whenever it changes.

use std::error::Error;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use core_types::{ElementId, LookupKey, normalize};
use lookup::config::{ATTR_KEY, ATTR_LIMIT, ATTR_MULTI, ATTR_SINGLE, ATTR_STRICT};
use lookup::{ElementAttrs, Key, LookupElement, LookupPage, LookupSettings, MenuAction, WidgetEvent};
use net::{HttpLookupSource, LookupSource, MemoryLookupSource};

const INPUT: ElementId = ElementId(1);
const CONTAINER: ElementId = ElementId(2);
const IDLE_TICK: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "lookup-shell", about = "Interactive console for a portal lookup widget")]
struct Args {
    /// Server origin; the configured context path is appended.
    #[arg(long, default_value = "http://localhost:8080")]
    base: String,

    /// Lookup key (value-set namespace).
    #[arg(long, default_value = LookupKey::DEFAULT)]
    key: String,

    /// Multi-value widget with chips.
    #[arg(long)]
    multi: bool,

    /// Only allow existing values; no add/delete.
    #[arg(long)]
    strict: bool,

    /// Suggestions per query (1-50).
    #[arg(long)]
    limit: Option<String>,

    /// TOML file with page settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use an in-process value-set instead of the HTTP service.
    #[arg(long)]
    offline: bool,

    /// Comma-separated values to seed the offline value-set with.
    #[arg(long, requires = "offline", value_delimiter = ',')]
    seed: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => LookupSettings::load(path)?,
        None => LookupSettings::default(),
    };

    let key = LookupKey::parse(Some(&args.key));
    let source: Arc<dyn LookupSource> = if args.offline {
        Arc::new(MemoryLookupSource::with_values(&key, &args.seed))
    } else {
        let base = settings.base_url(&args.base);
        log::info!("lookup service at {base}");
        Arc::new(HttpLookupSource::new(&base, settings.request_timeout())?)
    };

    let (bus, cmd_rx) = bus::Bus::channel();
    runtime_net::start_lookup_runtime(source, cmd_rx, bus.evt_tx.clone());
    let mut page = LookupPage::new(bus, settings);

    let mut attrs = ElementAttrs::new()
        .flag(if args.multi { ATTR_MULTI } else { ATTR_SINGLE })
        .with(ATTR_KEY, Some(key.as_str()));
    if args.strict {
        attrs = attrs.flag(ATTR_STRICT);
    }
    if let Some(limit) = &args.limit {
        attrs = attrs.with(ATTR_LIMIT, Some(limit.as_str()));
    }
    page.bind(&LookupElement::new(INPUT, CONTAINER, attrs));
    page.on_value_changed(INPUT, |_, change| {
        println!("value -> {:?}", change.value);
    });

    // Stdin is read on its own thread so timers keep firing while idle.
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines().map_while(Result::ok) {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_help();
    let mut last = String::new();
    loop {
        let now = Instant::now();
        let wait = page
            .next_deadline()
            .map(|d| d.saturating_duration_since(now))
            .unwrap_or(IDLE_TICK)
            .min(IDLE_TICK);

        match line_rx.recv_timeout(wait) {
            Ok(line) => match parse_line(&line) {
                Some(Line::Quit) => break,
                Some(Line::Help) => print_help(),
                Some(Line::Click) => page.document_click(None, Instant::now()),
                Some(Line::Event(event)) => {
                    let outcome = page.dispatch(INPUT, event, Instant::now());
                    if outcome.prevent_default {
                        println!("(default prevented)");
                    }
                }
                None => println!("unrecognized: {line:?} (try `help`)"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        page.pump(Instant::now());
        let snapshot = render(&page);
        if snapshot != last {
            print!("{snapshot}");
            last = snapshot;
        }
    }
    Ok(())
}

enum Line {
    Event(WidgetEvent),
    Click,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Option<Line> {
    let line = line.trim();
    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));
    let arg = arg.to_string();

    let event = match cmd {
        "quit" | "exit" => return Some(Line::Quit),
        "help" => return Some(Line::Help),
        "click" => return Some(Line::Click),
        "focus" => WidgetEvent::Focus,
        "blur" => WidgetEvent::Blur,
        "type" => WidgetEvent::Input(arg),
        "key" => WidgetEvent::KeyDown(Key::from_name(&arg)),
        "select" => WidgetEvent::Activate(MenuAction::Select(arg)),
        "add" => WidgetEvent::Activate(MenuAction::Add(arg)),
        "add-local" => WidgetEvent::Activate(MenuAction::AddLocal(arg)),
        "add-save" => WidgetEvent::Activate(MenuAction::AddToLookup(arg)),
        "delete" => WidgetEvent::Activate(MenuAction::Delete(arg)),
        "remove" => WidgetEvent::RemoveChip(normalize(&arg)),
        _ => return None,
    };
    Some(Line::Event(event))
}

fn render(page: &LookupPage) -> String {
    let mut out = format!("[{}]", page.value(INPUT));
    if let Some(field) = page.hidden_field(INPUT) {
        out.push_str(&format!(" {}={:?}", field.name, field.value));
    }
    out.push('\n');

    if let Some(menu) = page.menu(INPUT) {
        for row in &menu.rows {
            let marker = if row.selected { "*" } else { " " };
            let actions: Vec<&str> = row
                .actions
                .iter()
                .map(|a| match a {
                    MenuAction::Select(_) => "select",
                    MenuAction::Delete(_) => "delete",
                    MenuAction::Add(_) => "add",
                    MenuAction::AddLocal(_) => "add-local",
                    MenuAction::AddToLookup(_) => "add-save",
                })
                .collect();
            out.push_str(&format!("  {marker} {} ({})\n", row.label, actions.join(", ")));
        }
    }
    if let Some(toast) = page.toast(INPUT) {
        out.push_str(&format!("  ! {toast}\n"));
    }
    out
}

fn print_help() {
    println!(
        "commands: focus | blur | type <text> | key <Enter|Tab|,|Backspace> | select <v> | add <v> \
         | add-local <v> | add-save <v> | delete <v> | remove <chip> | click | help | quit"
    );
}
