//! Interactive checklist built on the menu engine.
//!
//! ```text
//! updown-menu [key=value ...] [item ...]
//! ```
//!
//! `key=value` arguments configure the menu (`page_size`, `prompt`,
//! `trace_level`, `log_file`, or `config=<file.toml>` to load a TOML file);
//! every other argument becomes an item. Without items a sample list is
//! shown.
//!
//! # Keybindings
//!
//! - `Up`/`Down`: Move the cursor
//! - `Left`/`Right`: Jump to the first/last item
//! - `Enter`: Toggle the item under the cursor
//! - Typing: Fuzzy-filter the list
//! - `Esc`: Clear the query
//! - `Ctrl+C`/`Ctrl+D`: Quit and print the checked items

#![allow(clippy::multiple_crate_versions)]

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::process::ExitCode;
use std::rc::Rc;
use updown_menu::infrastructure::{spawn_input_reader, RawWriter, Terminal};
use updown_menu::observability::init_tracing;
use updown_menu::{
    fuzzy_filter, Config, Derived, ItemList, Menu, MenuContext, MenuItem, MenuOptions, Output,
    Selection,
};

const SAMPLE_ITEMS: &[&str] = &[
    "apple", "apricot", "banana", "blackberry", "blueberry", "cherry", "clementine", "coconut",
    "cranberry", "date", "dragonfruit", "elderberry", "fig", "gooseberry", "grape", "guava",
    "kiwi", "lemon", "lime", "lychee", "mango", "nectarine", "orange", "papaya", "peach", "pear",
    "pineapple", "plum", "raspberry", "strawberry",
];

/// Caller state threaded through the menu.
#[derive(Debug, Clone)]
struct Checklist {
    labels: Rc<[String]>,
    checked: BTreeSet<usize>,
}

impl Checklist {
    fn items(&self) -> ItemList<Self> {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                Rc::new(Toggle {
                    index,
                    label: label.clone(),
                    checked: self.checked.contains(&index),
                }) as Rc<dyn MenuItem<Self>>
            })
            .collect()
    }
}

struct Toggle {
    index: usize,
    label: String,
    checked: bool,
}

impl MenuItem<Checklist> for Toggle {
    fn render(&self) -> String {
        let mark = if self.checked { 'x' } else { ' ' };
        format!("[{mark}] {}", self.label)
    }

    fn select(&self, context: &MenuContext<Checklist>) -> Selection<Checklist> {
        let mut state = context.state.clone();
        if !state.checked.remove(&self.index) {
            state.checked.insert(self.index);
        }
        let items = state.items();
        Selection::Ready(Ok(Some(context.clone().with_items(items).with_state(state))))
    }
}

fn caption(context: &MenuContext<Checklist>) -> Derived<String> {
    let checked = context.state.checked.len();
    let total = context.state.labels.len();
    Derived::pending(async move { format!("{checked} of {total} checked") })
}

/// Splits arguments into configuration pairs and item labels.
fn parse_args(args: impl Iterator<Item = String>) -> (BTreeMap<String, String>, Vec<String>) {
    let mut settings = BTreeMap::new();
    let mut labels = Vec::new();

    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                settings.insert(key.to_string(), value.to_string());
            }
            _ => labels.push(arg),
        }
    }
    (settings, labels)
}

fn load_config(settings: &BTreeMap<String, String>) -> updown_menu::Result<Config> {
    let Some(path) = settings.get("config") else {
        return Ok(Config::from_map(settings));
    };
    let mut config = Config::from_file(path)?;
    let overrides = Config::from_map(settings);
    if settings.contains_key("page_size") {
        config.page_size = overrides.page_size;
    }
    if settings.contains_key("prompt") {
        config.prompt = overrides.prompt;
    }
    config.trace_level = overrides.trace_level.or(config.trace_level);
    config.log_file = overrides.log_file.or(config.log_file);
    Ok(config)
}

fn main() -> ExitCode {
    let (settings, mut labels) = parse_args(std::env::args().skip(1));

    let config = match load_config(&settings) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("updown-menu: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    if labels.is_empty() {
        labels = SAMPLE_ITEMS.iter().map(ToString::to_string).collect();
    }
    let state = Checklist {
        labels: labels.into(),
        checked: BTreeSet::new(),
    };

    let options = MenuOptions::from_config(&config)
        .caption(caption)
        .filter(fuzzy_filter::<Checklist>());

    let mut terminal = match Terminal::enter_raw_mode() {
        Ok(terminal) => terminal,
        Err(e) => {
            eprintln!("updown-menu: cannot enter raw mode: {e}");
            return ExitCode::FAILURE;
        }
    };

    let output = Output::new(RawWriter::new(io::stdout()));
    let items = state.items().to_vec();
    let mut menu = Menu::new(output, items, state, options);

    futures::executor::block_on(menu.listen(spawn_input_reader()));

    terminal.restore();

    let checklist = &menu.context().state;
    println!();
    for index in &checklist.checked {
        if let Some(label) = checklist.labels.get(*index) {
            println!("{label}");
        }
    }

    tracing::debug!(checked = checklist.checked.len(), "menu closed");
    ExitCode::SUCCESS
}
