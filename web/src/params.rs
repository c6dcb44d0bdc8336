use anyhow::{anyhow, Context, Result};
use demine_core as game;
use serde::{Deserialize, Serialize};

/// Complete game snapshot carried by the link-driven variant.
///
/// The whole state lives in the query string; following a link *is* the
/// move. One navigation per move also serializes concurrent clicks for
/// free, and the browser history doubles as undo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct UrlState {
    pub grid: game::Grid,
    pub is_game_over: bool,
    pub is_game_won: bool,
    pub is_flagging_mode: bool,
    /// Milliseconds since the Unix epoch when the game was created.
    pub start_time: i64,
    pub grid_size: game::Coord,
}

pub(crate) const STATE_PARAM: &str = "state";
pub(crate) const SIZE_PARAM: &str = "size";

/// Encodes a snapshot into a `?state=...` query string.
pub(crate) fn encode_query(state: &UrlState) -> Result<String> {
    let json = serde_json::to_string(state).context("could not serialize game state")?;
    Ok(format!("?{}={}", STATE_PARAM, urlencoding::encode(&json)))
}

fn param_value<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Decodes the snapshot out of a raw query string.
///
/// Anything malformed (bad percent-encoding, bad JSON, non-square grid,
/// out-of-range cell values) is an error, so a tampered URL falls back to
/// the new-game view instead of rendering a corrupt board.
pub(crate) fn decode_query(query: &str) -> Result<UrlState> {
    let raw = param_value(query, STATE_PARAM)
        .ok_or_else(|| anyhow!("missing {} parameter", STATE_PARAM))?;
    let json = urlencoding::decode(raw).context("invalid percent-encoding")?;
    let state: UrlState = serde_json::from_str(&json).context("invalid game state")?;
    Ok(state)
}

/// Reads the requested board size from a bare new-game query (`?size=N`).
pub(crate) fn requested_size(query: &str) -> Option<game::Coord> {
    param_value(query, SIZE_PARAM)?.parse().ok()
}
