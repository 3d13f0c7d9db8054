/// A console session: one player, one importer, rendered as text lines
use crate::command::{Command, HELP};
use crate::config::ConsoleConfig;
use crate::error::Result;
use encore_core::{format_time, PlayerPersistence};
use encore_importer::{Importer, TransientResources};
use encore_playback::{
    NoticeLevel, PlaybackError, Player, PlayerEvent, SimulatedBackend,
};
use encore_storage::{JsonFileStore, KeyValuePersistence};
use tracing::debug;

/// Whether the loop should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    player: Player<SimulatedBackend>,
    importer: Importer,
}

impl Session {
    /// Build a session persisting to the configured state file
    pub fn open(config: &ConsoleConfig) -> Result<Self> {
        let store = JsonFileStore::open(&config.storage.state_file)?;
        Ok(Self::with_persistence(
            config,
            Box::new(KeyValuePersistence::new(store)),
        ))
    }

    /// Build a session around any persistence adapter
    pub fn with_persistence(
        config: &ConsoleConfig,
        persistence: Box<dyn PlayerPersistence>,
    ) -> Self {
        let resources = TransientResources::new();
        let mut player = Player::new(SimulatedBackend::auto_ready(), config.player.clone())
            .with_persistence(persistence)
            .with_releaser(Box::new(resources.clone()));
        if let Some(seed) = config.seed {
            player = player.with_seed(seed);
        }

        Self {
            player,
            importer: Importer::new(resources),
        }
    }

    /// Apply persisted state; returns the lines to print
    pub fn restore(&mut self) -> Vec<String> {
        self.player.restore();
        self.settle()
    }

    /// Execute one command; returns the flow and the lines to print
    pub fn execute(&mut self, command: Command) -> (Flow, Vec<String>) {
        debug!(?command, "Executing command");
        let mut lines = Vec::new();

        match command {
            Command::Add(paths) => {
                let outcome = self.importer.ingest_paths(&paths);
                if outcome.tracks.is_empty() {
                    lines.push("Please add audio files only".to_string());
                }
                for skipped in &outcome.skipped {
                    lines.push(format!("Skipped {}", skipped));
                }
                self.player.add(outcome.tracks);
            }
            Command::Remove(index) => {
                if self.player.remove(index).is_none() {
                    lines.push(format!("No track {}", index + 1));
                }
            }
            Command::Search(term) => {
                self.player.search(&term);
                lines.extend(self.list());
            }
            Command::Clear => self.player.clear(),
            Command::Load(index) => report(&mut lines, self.player.load_track(index, true)),
            Command::Cancel => {
                if !self.player.cancel_loading() {
                    lines.push("Nothing is loading".to_string());
                }
            }
            Command::Toggle => report(&mut lines, self.player.toggle_play_pause()),
            Command::Play => report(&mut lines, self.player.play()),
            Command::Pause => {
                self.player.pause();
            }
            Command::Next => report(&mut lines, self.player.next()),
            Command::Previous => report(&mut lines, self.player.previous()),
            Command::Seek(seconds) => seek_result(&mut lines, self.player.seek(seconds)),
            Command::Forward => seek_result(&mut lines, self.player.skip_forward()),
            Command::Back => seek_result(&mut lines, self.player.skip_backward()),
            Command::Scrub(fraction) => {
                self.player.begin_scrub(fraction);
                self.player.end_scrub();
            }
            Command::Volume(level) => {
                self.player.set_volume(level);
            }
            Command::VolumeUp => {
                self.player.volume_up();
            }
            Command::VolumeDown => {
                self.player.volume_down();
            }
            Command::Mute => self.player.toggle_mute(),
            Command::Shuffle => self.player.toggle_shuffle(),
            Command::Repeat(Some(mode)) => self.player.set_repeat(mode),
            Command::Repeat(None) => {
                self.player.cycle_repeat();
            }
            Command::Theme => {
                self.player.toggle_theme();
            }
            Command::Tick(seconds) => self.player.backend_mut().advance(seconds),
            Command::List => lines.extend(self.list()),
            Command::Status => lines.push(self.status()),
            Command::Help => lines.push(HELP.to_string()),
            Command::Quit => return (Flow::Quit, lines),
        }

        lines.extend(self.settle());
        (Flow::Continue, lines)
    }

    /// Visible tracks, selection marked
    pub fn list(&self) -> Vec<String> {
        let current = self.player.current_index();
        let lines: Vec<String> = self
            .player
            .filtered()
            .enumerate()
            .map(|(i, track)| {
                let marker = if Some(i) == current { '>' } else { ' ' };
                format!(
                    "{} {:>2}. {} - {} [{}]",
                    marker,
                    i + 1,
                    track.title,
                    track.artist,
                    track.duration_label
                )
            })
            .collect();

        match (lines.is_empty(), self.player.tracks().is_empty()) {
            (false, _) => lines,
            (true, true) => vec!["(playlist empty)".to_string()],
            (true, false) => vec!["(no matches)".to_string()],
        }
    }

    /// One-line summary of the transport
    pub fn status(&self) -> String {
        let state = self.player.state();
        let title = self
            .player
            .current_track()
            .map_or("-", |track| track.title.as_str());
        let volume = self.player.volume();

        format!(
            "{} {} {}/{} vol {}%{} shuffle {} repeat {} theme {}",
            if state.is_playing { "playing" } else { "paused" },
            title,
            format_time(state.position_seconds),
            format_time(state.duration_seconds.unwrap_or(0.0)),
            volume.percent(),
            if volume.is_muted() { " (muted)" } else { "" },
            if self.player.shuffle() { "on" } else { "off" },
            self.player.repeat(),
            self.player.theme().as_str(),
        )
    }

    pub fn player(&self) -> &Player<SimulatedBackend> {
        &self.player
    }

    pub fn importer(&self) -> &Importer {
        &self.importer
    }

    // Deliver queued media signals, then render the events worth printing
    fn settle(&mut self) -> Vec<String> {
        self.player.pump();
        self.player
            .drain_events()
            .into_iter()
            .filter_map(|event| self.render(&event))
            .collect()
    }

    fn render(&self, event: &PlayerEvent) -> Option<String> {
        match event {
            PlayerEvent::Notice { level, message } => {
                let tag = match level {
                    NoticeLevel::Success => "ok",
                    NoticeLevel::Info => "info",
                    NoticeLevel::Warning => "warn",
                    NoticeLevel::Error => "error",
                };
                Some(format!("[{}] {}", tag, message))
            }
            PlayerEvent::StateChanged { playing: true } => {
                let title = self.player.current_track()?.title.clone();
                Some(format!("Now playing: {}", title))
            }
            _ => None,
        }
    }
}

// Errors the player already announced through a notice are not repeated
fn report(lines: &mut Vec<String>, result: encore_playback::Result<()>) {
    match result {
        Ok(()) => {}
        Err(PlaybackError::IndexOutOfRange { index, len }) => {
            lines.push(format!("No track {} (showing {})", index + 1, len));
        }
        Err(PlaybackError::EmptyPlaylist | PlaybackError::PlaybackRejected(_)) => {}
        Err(e) => lines.push(e.to_string()),
    }
}

fn seek_result(lines: &mut Vec<String>, applied: Option<f64>) {
    match applied {
        Some(position) => lines.push(format!("At {}", format_time(position))),
        None => lines.push("Duration not known yet".to_string()),
    }
}
