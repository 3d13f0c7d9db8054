/// Line commands understood by the console
use crate::error::{ConsoleError, Result};
use encore_core::RepeatMode;
use std::path::PathBuf;

/// One parsed input line
///
/// Track numbers are 1-based positions in the visible list.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(Vec<PathBuf>),
    Remove(usize),
    Search(String),
    Clear,
    Load(usize),
    Cancel,
    Toggle,
    Play,
    Pause,
    Next,
    Previous,
    Seek(f64),
    Forward,
    Back,
    Scrub(f64),
    Volume(f32),
    VolumeUp,
    VolumeDown,
    Mute,
    Shuffle,
    Repeat(Option<RepeatMode>),
    Theme,
    /// Let simulated time pass
    Tick(f64),
    List,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
add <file>...     add audio files
remove <n>        remove track n
search [term]     filter the list (no term shows everything)
clear             remove every track
load <n>          select and play track n
cancel            abort the pending load
play | pause | toggle
next | prev
seek <secs> | fwd | back | scrub <0-1>
vol <0-1> | up | down | mute
shuffle | repeat [off|all|one] | theme
tick <secs>       let playback time pass
list | status | help | quit";

impl Command {
    /// Parse a line; `Ok(None)` for blank input
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match verb.to_lowercase().as_str() {
            "add" if !rest.is_empty() => Self::Add(rest.iter().map(|p| PathBuf::from(*p)).collect()),
            "add" => return Err(invalid("add needs at least one file")),
            "remove" | "rm" => Self::Remove(track_number(&rest)?),
            "search" | "find" => Self::Search(rest.join(" ")),
            "clear" => Self::Clear,
            "load" => Self::Load(track_number(&rest)?),
            "cancel" => Self::Cancel,
            "toggle" | "space" => Self::Toggle,
            "play" => Self::Play,
            "pause" => Self::Pause,
            "next" | "n" => Self::Next,
            "prev" | "previous" | "p" => Self::Previous,
            "seek" => Self::Seek(number(&rest, "seek")?),
            "fwd" | "forward" => Self::Forward,
            "back" => Self::Back,
            "scrub" => Self::Scrub(number(&rest, "scrub")?),
            "vol" | "volume" => Self::Volume(number(&rest, "vol")?),
            "up" => Self::VolumeUp,
            "down" => Self::VolumeDown,
            "mute" | "m" => Self::Mute,
            "shuffle" | "s" => Self::Shuffle,
            "repeat" | "r" => match rest.first() {
                None => Self::Repeat(None),
                Some(mode) => Self::Repeat(Some(RepeatMode::parse(mode).ok_or_else(|| {
                    invalid("repeat mode must be off, all or one")
                })?)),
            },
            "theme" => Self::Theme,
            "tick" => Self::Tick(number(&rest, "tick")?),
            "list" | "ls" => Self::List,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(invalid(&format!("unknown command '{}'", other))),
        };
        Ok(Some(command))
    }
}

fn invalid(message: &str) -> ConsoleError {
    ConsoleError::Command(message.to_string())
}

fn track_number(args: &[&str]) -> Result<usize> {
    args.first()
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .map(|n| n - 1)
        .ok_or_else(|| invalid("expected a track number starting at 1"))
}

fn number<T: std::str::FromStr>(args: &[&str], verb: &str) -> Result<T> {
    args.first()
        .and_then(|n| n.parse::<T>().ok())
        .ok_or_else(|| invalid(&format!("{} needs a number", verb)))
}
