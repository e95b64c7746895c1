//! CSV roster import and leaderboard export.
//!
//! Roster files have a header row `name,level` with an optional `active`
//! column (defaults to true).

use crate::logic::LeaderboardRow;
use crate::models::{League, LeagueError};
use log::info;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Errors from reading or writing CSV.
#[derive(Debug)]
pub enum RosterError {
    Csv(csv::Error),
    Io(std::io::Error),
    /// A row parsed fine but could not be added to the league.
    Row { line: u64, error: LeagueError },
}

impl std::fmt::Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::Csv(e) => write!(f, "Invalid CSV: {}", e),
            RosterError::Io(e) => write!(f, "I/O error: {}", e),
            RosterError::Row { line, error } => write!(f, "Line {}: {}", line, error),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Csv(e) => Some(e),
            RosterError::Io(e) => Some(e),
            RosterError::Row { error, .. } => Some(error),
        }
    }
}

impl From<csv::Error> for RosterError {
    fn from(e: csv::Error) -> Self {
        RosterError::Csv(e)
    }
}

impl From<std::io::Error> for RosterError {
    fn from(e: std::io::Error) -> Self {
        RosterError::Io(e)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRecord {
    name: String,
    level: u32,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

/// Add every player listed in `reader` to the league. Either all rows are
/// added or, on the first bad row, none are. Returns the number added.
pub fn import_roster<R: Read>(league: &mut League, reader: R) -> Result<usize, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut staged = league.clone();
    let mut added = 0;
    for (i, result) in rdr.deserialize::<RosterRecord>().enumerate() {
        let record = result?;
        // Header is line 1.
        let line = i as u64 + 2;
        let id = staged
            .add_player(record.name, record.level)
            .map_err(|error| RosterError::Row { line, error })?;
        if !record.active {
            staged
                .set_player_active(id, false)
                .map_err(|error| RosterError::Row { line, error })?;
        }
        added += 1;
    }
    league.players = staged.players;
    info!("Imported {} player(s) into league {}", added, league.id);
    Ok(added)
}

#[derive(Serialize)]
struct ExportRow<'a> {
    position: usize,
    name: &'a str,
    level: u32,
    #[serde(rename = "P")]
    points: u32,
    #[serde(rename = "SV")]
    set_balance: i32,
    #[serde(rename = "SG")]
    game_balance: i32,
    #[serde(rename = "W")]
    wins: u32,
    #[serde(rename = "L")]
    losses: u32,
    #[serde(rename = "miniSG")]
    mini_game_balance: Option<i32>,
    #[serde(rename = "miniSV")]
    mini_set_balance: Option<i32>,
}

/// Write the leaderboard as CSV, one row per player in ranked order.
pub fn write_leaderboard<W: Write>(rows: &[LeaderboardRow], writer: W) -> Result<(), RosterError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, row) in rows.iter().enumerate() {
        wtr.serialize(ExportRow {
            position: i + 1,
            name: row.name(),
            level: row.player.level,
            points: row.points,
            set_balance: row.set_balance,
            game_balance: row.game_balance,
            wins: row.wins,
            losses: row.losses,
            mini_game_balance: row.mini.as_ref().map(|m| m.game_balance),
            mini_set_balance: row.mini.as_ref().map(|m| m.set_balance),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// [`write_leaderboard`] into a string.
pub fn leaderboard_csv(rows: &[LeaderboardRow]) -> Result<String, RosterError> {
    let mut buf = Vec::new();
    write_leaderboard(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RosterError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}
