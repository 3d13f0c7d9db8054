//! Track store with a derived search view
//!
//! `tracks` holds the playlist in insertion order. The filtered view is kept
//! as ascending indices into `tracks`, so it is always an order-preserving
//! subsequence and every visible entry is the very track stored in the
//! playlist.

use encore_core::{Track, TrackId};

/// Ordered playlist plus the view matching the active search term
#[derive(Debug, Clone, Default)]
pub struct TrackStore {
    tracks: Vec<Track>,
    filtered: Vec<usize>,
    needle: String,
}

impl TrackStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tracks and re-derive the view
    pub fn add(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
        self.refilter();
    }

    /// Remove the track at a filtered position
    ///
    /// Returns `None` when the index is outside the filtered view.
    pub fn remove(&mut self, filtered_index: usize) -> Option<Track> {
        let position = *self.filtered.get(filtered_index)?;
        let removed = self.tracks.remove(position);
        self.refilter();
        Some(removed)
    }

    /// Apply a search term (trimmed, case-insensitive); empty shows everything
    pub fn search(&mut self, term: &str) {
        self.needle = term.trim().to_lowercase();
        self.refilter();
    }

    /// Remove every track, returning them so the caller can release resources
    ///
    /// The search term survives a clear.
    pub fn clear(&mut self) -> Vec<Track> {
        self.filtered.clear();
        std::mem::take(&mut self.tracks)
    }

    /// All tracks in playlist order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Visible tracks in playlist order
    pub fn filtered(&self) -> impl Iterator<Item = &Track> + '_ {
        self.filtered.iter().map(move |&i| &self.tracks[i])
    }

    /// Visible track at a filtered position
    pub fn get(&self, filtered_index: usize) -> Option<&Track> {
        self.filtered.get(filtered_index).map(|&i| &self.tracks[i])
    }

    /// Positions in `tracks` backing the filtered view
    pub fn filtered_positions(&self) -> &[usize] {
        &self.filtered
    }

    /// Filtered position of a track, if visible
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.filtered.iter().position(|&i| self.tracks[i].id == *id)
    }

    /// Playlist position of a track
    pub fn playlist_position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == *id)
    }

    /// Look up a track anywhere in the playlist
    pub fn find(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == *id)
    }

    /// Active (normalized) search term
    pub fn search_term(&self) -> &str {
        &self.needle
    }

    /// Number of tracks in the playlist
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of visible tracks
    pub fn visible_len(&self) -> usize {
        self.filtered.len()
    }

    fn refilter(&mut self) {
        self.filtered = self
            .tracks
            .iter()
            .enumerate()
            .filter(|(_, track)| track.matches(&self.needle))
            .map(|(i, _)| i)
            .collect();
    }
}
