use potion_mixer_core::{Category, Station};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Inventory(Option<Category>),
    Stations,
    /// Slots are 1-based on the command line and 0-based here.
    Place {
        station: Station,
        slot: usize,
        item: String,
    },
    Take {
        station: Station,
        slot: usize,
    },
    Mix(Station),
    Retry,
    Next,
    Level(u32),
    Levels,
    Status,
    Quit,
}

fn parse_station(words: &[&str]) -> Result<Station, String> {
    if words.is_empty() {
        return Err("missing station name".to_string());
    }
    words.join(" ").parse().map_err(|err| format!("{err}"))
}

fn parse_slot(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(slot) if slot >= 1 => Ok(slot - 1),
        _ => Err(format!("invalid slot `{word}` (slots start at 1)")),
    }
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((head, args)) = words.split_first() else {
        return Ok(None);
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "inv" | "inventory" | "i" => match args {
            [] => Command::Inventory(None),
            _ => Command::Inventory(Some(
                args.join(" ").parse::<Category>().map_err(|err| err.to_string())?,
            )),
        },
        "stations" | "st" => Command::Stations,
        "place" | "p" => {
            let slot_at = args
                .iter()
                .position(|word| word.parse::<usize>().is_ok())
                .ok_or_else(|| "usage: place <station> <slot> <item>".to_string())?;
            let item = args[slot_at + 1..].join(" ");
            if item.is_empty() {
                return Err("usage: place <station> <slot> <item>".to_string());
            }
            Command::Place {
                station: parse_station(&args[..slot_at])?,
                slot: parse_slot(args[slot_at])?,
                item,
            }
        }
        "take" | "t" => match args.split_last() {
            Some((slot, station)) => Command::Take {
                station: parse_station(station)?,
                slot: parse_slot(slot)?,
            },
            None => return Err("usage: take <station> <slot>".to_string()),
        },
        "mix" | "m" => Command::Mix(parse_station(args)?),
        "retry" | "r" => Command::Retry,
        "next" | "n" => Command::Next,
        "level" | "l" => {
            let value = args
                .first()
                .ok_or_else(|| "usage: level <n>".to_string())?;
            Command::Level(
                value
                    .parse()
                    .map_err(|_| format!("invalid level `{value}`"))?,
            )
        }
        "levels" | "ls" => Command::Levels,
        "status" | "s" => Command::Status,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(Some(command))
}
