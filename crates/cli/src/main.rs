mod input;

use anyhow::Context;
use input::{parse_command, Command};
use potion_mixer_core::{
    Category, Event, LevelProgress, MixOutcome, MixingSession, RecipeBook, StationResolver,
};
use potion_mixer_data::Assets;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const ASSETS_ENV: &str = "POTION_MIXER_ASSETS";
const DEFAULT_ASSETS: &str = "assets";

#[derive(Debug, Clone, Default)]
struct CliOptions {
    assets: Option<PathBuf>,
    level: Option<u32>,
    script: Option<PathBuf>,
}

impl CliOptions {
    fn assets_root(&self) -> PathBuf {
        self.assets
            .clone()
            .or_else(|| std::env::var_os(ASSETS_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS))
    }
}

fn parse_cli_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--assets" | "-a" => {
                if let Some(value) = args.get(idx + 1) {
                    options.assets = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            "--level" | "-l" => {
                if let Some(value) = args.get(idx + 1) {
                    options.level = value.parse::<u32>().ok();
                    idx += 1;
                }
            }
            "--script" | "-s" => {
                if let Some(value) = args.get(idx + 1) {
                    options.script = Some(PathBuf::from(value));
                    idx += 1;
                }
            }
            other => log::warn!("ignoring argument `{other}`"),
        }
        idx += 1;
    }
    options
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_cli_options(&args);
    if let Err(err) = run(options) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(options: CliOptions) -> anyhow::Result<()> {
    let assets = Assets::open(options.assets_root())?;
    let book = assets.recipes()?;
    let first = options.level.unwrap_or(assets.config.first_level);
    let mut game = Game::new(&assets, &book, first)?;
    game.announce();

    let scripted = options.script.is_some();
    let lines: Box<dyn Iterator<Item = io::Result<String>>> = match &options.script {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            let lines: Vec<io::Result<String>> =
                raw.lines().map(|line| Ok(line.to_string())).collect();
            Box::new(lines.into_iter())
        }
        None => Box::new(io::stdin().lock().lines()),
    };

    prompt(scripted)?;
    for line in lines {
        let line = line.context("read command")?;
        if scripted && !line.trim().is_empty() {
            println!("> {}", line.trim());
        }
        if !game.execute(&line)? {
            break;
        }
        prompt(scripted)?;
    }
    Ok(())
}

fn prompt(scripted: bool) -> io::Result<()> {
    if scripted {
        return Ok(());
    }
    print!("> ");
    io::stdout().flush()
}

struct Game<'a> {
    assets: &'a Assets,
    book: &'a RecipeBook,
    session: MixingSession<'a>,
    progress: LevelProgress,
}

impl<'a> Game<'a> {
    fn new(assets: &'a Assets, book: &'a RecipeBook, level: u32) -> anyhow::Result<Self> {
        let def = assets.level(level)?;
        Ok(Self {
            assets,
            book,
            session: MixingSession::new(def, StationResolver::new(book)),
            progress: LevelProgress::new(),
        })
    }

    fn load(&mut self, level: u32) -> anyhow::Result<()> {
        let def = self.assets.level(level)?;
        self.session = MixingSession::new(def, StationResolver::new(self.book));
        self.announce();
        Ok(())
    }

    fn announce(&self) {
        let level = self.session.level();
        println!("Level {}: {}", level.level, level.objective);
        let stations: Vec<&str> = self.session.stations().iter().map(|s| s.name()).collect();
        println!("Stations: {}", stations.join(", "));
        println!("Type `help` for commands.");
    }

    /// Runs one command line. Returns `false` once the player quits.
    fn execute(&mut self, line: &str) -> anyhow::Result<bool> {
        match parse_command(line) {
            Ok(Some(Command::Quit)) => return Ok(false),
            Ok(Some(command)) => self.apply(command)?,
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
        Ok(true)
    }

    fn apply(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Help => print_help(),
            Command::Inventory(tab) => self.print_inventory(tab),
            Command::Stations => self.print_stations(),
            Command::Place {
                station,
                slot,
                item,
            } => match self.session.place(station, slot, &item) {
                Ok(()) => self.drain_events(),
                Err(err) => println!("{err}"),
            },
            Command::Take { station, slot } => match self.session.take(station, slot) {
                Ok(_) => self.drain_events(),
                Err(err) => println!("{err}"),
            },
            Command::Mix(station) => match self.session.mix(station) {
                Ok(report) => {
                    println!("{}", report.message);
                    self.drain_events();
                }
                Err(err) => println!("{err}"),
            },
            Command::Retry => {
                self.session.retry();
                self.drain_events();
                self.announce();
            }
            Command::Next => {
                let current = self.session.level().level;
                if !self.session.is_complete() {
                    println!("Finish level {current} first.");
                } else if !self.assets.has_level(current + 1) {
                    println!("That was the last level.");
                } else {
                    self.load(current + 1)?;
                }
            }
            Command::Level(level) => {
                if self.assets.has_level(level) {
                    self.load(level)?;
                } else {
                    println!("No level {level}.");
                }
            }
            Command::Levels => self.print_levels(),
            Command::Status => self.print_status(),
            Command::Quit => {}
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        let events: Vec<Event> = self.session.events.drain().collect();
        for event in events {
            match event {
                Event::ItemPlaced {
                    station,
                    slot,
                    item,
                    category,
                } => println!("Placed {category} `{item}` in {station} slot {}.", slot + 1),
                Event::ItemTaken {
                    station,
                    slot,
                    item,
                } => println!("Took `{item}` out of {station} slot {}.", slot + 1),
                Event::Mixed { station, outcome } => {
                    if let MixOutcome::Brewed { outputs } = outcome {
                        log::debug!("{station} produced {}", outputs.join(", "));
                    }
                }
                Event::LevelCompleted { level, retries } => {
                    let best = self.progress.record_completion(level, retries);
                    println!("Level {level} complete!");
                    if best {
                        println!("New best: {retries} retries.");
                    }
                    if self.assets.has_level(level + 1) {
                        println!("Type `next` to continue.");
                    }
                }
                Event::LevelRetried { level, retries } => {
                    println!("Restarting level {level} (retry {retries}).");
                }
            }
        }
    }

    fn print_inventory(&self, tab: Option<Category>) {
        let tabs: Vec<Category> = match tab {
            Some(category) => vec![category],
            None => Category::ALL.to_vec(),
        };
        for category in tabs {
            let items = self.session.tab(category);
            if items.is_empty() {
                println!("{}: (empty)", category.tab_label());
                continue;
            }
            let listed: Vec<String> = items
                .iter()
                .map(|(name, count)| format!("{name} x{count}"))
                .collect();
            println!("{}: {}", category.tab_label(), listed.join(", "));
        }
    }

    fn print_stations(&self) {
        for station in self.session.stations() {
            let spec = station.spec();
            let slots = self.session.slots(*station).unwrap_or_default();
            let cells: Vec<String> = spec
                .slots
                .iter()
                .enumerate()
                .map(|(idx, category)| match slots.get(idx).and_then(Option::as_deref) {
                    Some(item) => format!("[{}: {item}]", idx + 1),
                    None => format!("[{}: {category}]", idx + 1),
                })
                .collect();
            println!("{:<11} {}", spec.name, cells.join(" "));
        }
    }

    fn print_levels(&self) {
        for level in self.assets.level_ids() {
            let record = self.progress.level_info(level);
            let mark = if record.completed { "x" } else { " " };
            match record.best_retries {
                Some(best) => println!("[{mark}] level {level} (best: {best} retries)"),
                None => println!("[{mark}] level {level}"),
            }
        }
    }

    fn print_status(&self) {
        let level = self.session.level();
        let target = level.target_potion.as_deref().unwrap_or("none");
        let state = if self.session.is_complete() {
            "complete"
        } else {
            "in progress"
        };
        println!(
            "Level {} ({state}) | target: {target} | retries: {} | items: {}",
            level.level,
            self.session.retries(),
            self.session.inventory().total()
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  help|h|?                       show help");
    println!("  inv|i [tab]                    list inventory (fluids, solids, essences, potions)");
    println!("  stations|st                    show station slots");
    println!("  place|p <station> <slot> <item> put one unit into a slot");
    println!("  take|t <station> <slot>        return a slot's item to the inventory");
    println!("  mix|m <station>                mix the items in a station");
    println!("  retry|r                        restart the current level");
    println!("  next|n                         go to the next level once complete");
    println!("  level|l <n>                    jump to level n");
    println!("  levels|ls                      list levels and best retries");
    println!("  status|s                       one-line level status");
    println!("  quit|q|exit                    exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn parses_flags_with_values() {
        let options = parse_cli_options(&args(&[
            "--assets", "data", "--level", "3", "--script", "run.txt",
        ]));
        assert_eq!(options.assets, Some(PathBuf::from("data")));
        assert_eq!(options.level, Some(3));
        assert_eq!(options.script, Some(PathBuf::from("run.txt")));
        assert_eq!(options.assets_root(), PathBuf::from("data"));
    }

    fn workspace_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(relative)
    }

    #[test]
    fn demo_script_finishes_level_one() {
        let assets = Assets::open(workspace_path("assets")).expect("assets");
        let book = assets.recipes().expect("recipes");
        let mut game = Game::new(&assets, &book, 1).expect("game");
        let script = fs::read_to_string(workspace_path("demos/level1.txt")).expect("script");

        let mut quit = false;
        for line in script.lines() {
            if !game.execute(line).expect("command") {
                quit = true;
                break;
            }
        }

        assert!(quit);
        assert!(game.session.is_complete());
        assert_eq!(game.progress.best_retries(1), Some(0));
        assert!(game.session.events.is_empty());
    }

    #[test]
    fn bad_input_keeps_the_game_running() {
        let assets = Assets::open(workspace_path("assets")).expect("assets");
        let book = assets.recipes().expect("recipes");
        let mut game = Game::new(&assets, &book, 1).expect("game");

        let commands: Vec<String> = vec![
            "dance".to_string(),
            "place cauldron 1 Root".to_string(),
            "mix cauldron".to_string(),
            "next".to_string(),
            "level 99".to_string(),
            "retry".to_string(),
        ];
        for command in &commands {
            assert!(game.execute(command).expect("command"));
        }

        assert_eq!(game.session.level().level, 1);
        assert_eq!(game.session.retries(), 1);
        assert!(!game.session.is_complete());
        assert!(game.execute("quit").map(|running| !running).expect("quit"));
    }

    #[test]
    fn bad_level_and_trailing_flags_are_ignored() {
        let options = parse_cli_options(&args(&["--level", "three", "--assets"]));
        assert_eq!(options.level, None);
        assert_eq!(options.assets, None);
    }
}
