//! Snapshot persistence: the whole `TournamentState` as one JSON document.
//!
//! Everything here is best effort. A store that is missing, unreadable, or holds a corrupted
//! snapshot yields the empty initial state; failed saves are logged and otherwise ignored.

use crate::models::{validate_settings, TournamentState};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Where a serialized snapshot lives.
pub trait SnapshotStore {
    /// The stored snapshot, or None if nothing has been saved.
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, snapshot: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Snapshot in a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, snapshot: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        // Write then rename: readers never see a partial snapshot.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, snapshot)?;
        std::fs::rename(&tmp, &self.path)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory store, for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot.into())),
        }
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "snapshot lock poisoned")
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.snapshot.lock().map_err(|_| poisoned())?.clone())
    }

    fn save(&self, snapshot: &str) -> io::Result<()> {
        *self.snapshot.lock().map_err(|_| poisoned())? = Some(snapshot.to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.snapshot.lock().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

/// Structural checks serde cannot express. Returns why the snapshot is unusable.
pub fn check_snapshot(state: &TournamentState) -> Result<(), String> {
    let errors = validate_settings(state.max_overs, state.max_wickets);
    if !errors.is_empty() {
        return Err(errors.join("; "));
    }
    if state.is_generated && state.matches.is_empty() {
        return Err("generated tournament without matches".to_string());
    }
    if !state.is_generated && !state.matches.is_empty() {
        return Err("matches present before generation".to_string());
    }
    Ok(())
}

/// Parse a snapshot; None if it is not a usable `TournamentState`.
pub fn parse_snapshot(snapshot: &str) -> Option<TournamentState> {
    let state: TournamentState = match serde_json::from_str(snapshot) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Discarding unreadable tournament snapshot: {}", e);
            return None;
        }
    };
    if let Err(reason) = check_snapshot(&state) {
        log::warn!("Discarding inconsistent tournament snapshot: {}", reason);
        return None;
    }
    Some(state)
}

/// Load the stored state, falling back to the empty state on any problem.
pub fn load_state<S: SnapshotStore + ?Sized>(store: &S) -> TournamentState {
    match store.load() {
        Ok(Some(snapshot)) => parse_snapshot(&snapshot).unwrap_or_default(),
        Ok(None) => TournamentState::new(),
        Err(e) => {
            log::warn!("Could not read tournament snapshot: {}", e);
            TournamentState::new()
        }
    }
}

/// Save the state. Failures are logged and reported as false; in-memory state is unaffected.
pub fn save_state<S: SnapshotStore + ?Sized>(store: &S, state: &TournamentState) -> bool {
    let snapshot = match serde_json::to_string(state) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("Could not serialize tournament snapshot: {}", e);
            return false;
        }
    };
    match store.save(&snapshot) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not save tournament snapshot: {}", e);
            false
        }
    }
}

/// Remove the stored snapshot, best effort.
pub fn clear_state<S: SnapshotStore + ?Sized>(store: &S) -> bool {
    match store.clear() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not clear tournament snapshot: {}", e);
            false
        }
    }
}
