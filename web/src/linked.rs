use demine_core as game;
use game::GridGenerator;
use gloo::timers::callback::Interval;
use wasm_bindgen::JsValue;
use yew::prelude::*;

use crate::params::{self, UrlState};
use crate::settings;
use crate::utils::*;

/// Board driven entirely by navigation: the full game state rides in the
/// query string and every playable cell is a plain link whose target is the
/// post-move state. No move handler ever runs in the component; clicking a
/// link replaces the page state, and the browser's back button walks the
/// game history.
#[derive(Debug)]
pub(crate) struct LinkedGameView {
    state: Option<UrlState>,
    prev_time: u32,
    _timer_interval: Interval,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    UpdateTime,
}

fn current_query() -> String {
    gloo::utils::window()
        .location()
        .search()
        .unwrap_or_default()
}

/// Rewrites the address bar so the freshly generated game is shareable and
/// reload-safe without adding a history entry.
fn replace_query(query: &str) {
    let window = gloo::utils::window();
    match window.history() {
        Ok(history) => {
            if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(query)) {
                log::error!("Could not rewrite location: {:?}", err);
            }
        }
        Err(err) => log::error!("History unavailable: {:?}", err),
    }
}

fn new_state(grid_size: game::Coord) -> UrlState {
    let seed = js_random_seed();
    log::debug!("new {0}x{0} linked game, seed {1}", grid_size, seed);
    let grid = game::RandomGridGenerator::with_default_probability(seed).generate(grid_size);
    UrlState {
        grid,
        is_game_over: false,
        is_game_won: false,
        is_flagging_mode: false,
        start_time: utc_now().timestamp_millis(),
        grid_size,
    }
}

/// Query string for the state reached by activating `coords`, or `None`
/// when the cell is not playable (already opened, or the game is finished).
fn next_query(state: &UrlState, coords: game::Coord2) -> Option<String> {
    if state.is_game_over || state.is_game_won {
        return None;
    }
    let cell = state.grid.cell_at(coords);
    if cell.state.is_opened() {
        return None;
    }

    let (row, col) = coords;
    let mv = if state.is_flagging_mode {
        game::Move::Flag { row, col }
    } else {
        game::Move::Reveal { row, col }
    };

    let outcome = match game::apply_move(&state.grid, mv) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("Could not derive move target for {:?}: {}", coords, err);
            return None;
        }
    };

    let next = UrlState {
        grid: outcome.grid,
        is_game_over: outcome.is_game_over,
        is_game_won: outcome.is_game_won,
        is_flagging_mode: state.is_flagging_mode,
        start_time: state.start_time,
        grid_size: state.grid_size,
    };
    match params::encode_query(&next) {
        Ok(query) => Some(query),
        Err(err) => {
            log::error!("Could not encode move target: {}", err);
            None
        }
    }
}

fn flag_mode_query(state: &UrlState, is_flagging_mode: bool) -> Option<String> {
    let mut toggled = state.clone();
    toggled.is_flagging_mode = is_flagging_mode;
    params::encode_query(&toggled).ok()
}

fn elapsed_secs(state: &UrlState, now_ms: i64) -> u32 {
    // an untouched board is a brand-new game regardless of its timestamp
    if state.grid.is_untouched() {
        return 0;
    }
    ((now_ms - state.start_time) / 1000).max(0) as u32
}

fn cell_view(state: &UrlState, coords: game::Coord2) -> Html {
    use game::{CellState, CellValue};

    let cell = state.grid.cell_at(coords);
    let class = classes!(
        "cell",
        match (cell.state, cell.value) {
            (CellState::Initial, _) => classes!(),
            (CellState::Flagged, _) => classes!("flag"),
            (CellState::Opened, CellValue::Bomb) => classes!("open", "mine"),
            (CellState::Opened, CellValue::Count(count)) =>
                classes!("open", format!("num-{}", count)),
        }
    );

    let content = match (cell.state, cell.value) {
        (CellState::Flagged, _) => html! { {"🚩"} },
        (CellState::Opened, CellValue::Bomb) => html! { {"💣"} },
        (CellState::Opened, CellValue::Count(count)) if count > 0 => html! { {count} },
        _ => html! {},
    };

    match next_query(state, coords) {
        Some(href) => html! {
            <td {class}><a {href}>{content}</a></td>
        },
        None => html! {
            <td {class}>{content}</td>
        },
    }
}

fn mode_selector(state: &UrlState) -> Html {
    let flag_href = flag_mode_query(state, true);
    let reveal_href = flag_mode_query(state, false);

    html! {
        <span class="mode-select">
            <b>{"MODE SELECT:"}</b>
            if state.is_flagging_mode {
                <><b>{"Flag"}</b><a href={reveal_href}>{"Reveal"}</a></>
            } else {
                <><a href={flag_href}>{"Flag"}</a><b>{"Reveal"}</b></>
            }
        </span>
    }
}

fn new_game_form(grid_size: game::Coord) -> Html {
    // plain GET form: submitting navigates to ?size=N and the next page
    // load generates the board, no script required in the form itself
    html! {
        <form action="" method="get">
            <button type="submit">{"New game with"}</button>
            <input
                type="number"
                name={params::SIZE_PARAM}
                min={settings::MIN_GRID_SIZE.to_string()}
                max={settings::MAX_GRID_SIZE.to_string()}
                value={grid_size.to_string()}
            />
            <span>{"rows and columns"}</span>
        </form>
    }
}

impl Component for LinkedGameView {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let query = current_query();
        let state = match params::decode_query(&query) {
            Ok(state) => Some(state),
            Err(err) => {
                log::debug!("No game in query string: {}", err);
                params::requested_size(&query).map(|raw| {
                    let state = new_state(settings::clamp_grid_size(raw));
                    if let Ok(query) = params::encode_query(&state) {
                        replace_query(&query);
                    }
                    state
                })
            }
        };

        let link = ctx.link().clone();
        Self {
            state,
            prev_time: 0,
            _timer_interval: Interval::new(500, move || link.send_message(Msg::UpdateTime)),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::UpdateTime => {
                let time = self
                    .state
                    .as_ref()
                    .map_or(0, |state| elapsed_secs(state, utc_now().timestamp_millis()));
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let Some(state) = &self.state else {
            // nothing usable in the URL: offer a fresh start
            return html! {
                <div class="demine linked">
                    <h1>{"Oops!"}</h1>
                    <p>{"Something went wrong with the game state."}</p>
                    {new_game_form(settings::DEFAULT_GRID_SIZE)}
                </div>
            };
        };

        let size = state.grid.size();
        let bombs_left = format_for_counter(
            state.grid.bomb_count() as i32 - state.grid.flagged_count() as i32,
        );
        let elapsed = format_for_counter(elapsed_secs(state, utc_now().timestamp_millis()) as i32);
        let finished = state.is_game_over || state.is_game_won;

        html! {
            <div class="demine linked">
                <nav>
                    <aside>{bombs_left}</aside>
                    <span class="face">
                        if state.is_game_won {
                            {"😎"}
                        } else if state.is_game_over {
                            {"😢"}
                        } else {
                            {"😊"}
                        }
                    </span>
                    <aside>{elapsed}</aside>
                </nav>
                {mode_selector(state)}
                if finished {
                    <div class="banner">
                        if state.is_game_won {
                            <p class="victory">{"VICTORY!"}</p>
                        } else {
                            <p class="game-over">{"GAME OVER"}</p>
                        }
                    </div>
                }
                <table class={(!finished).then_some("playable")}>
                    {
                        for (0..size).map(|row| html! {
                            <tr>
                                { for (0..size).map(|col| cell_view(state, (row, col))) }
                            </tr>
                        })
                    }
                </table>
                {new_game_form(state.grid_size)}
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game::{Cell, CellState, Grid};

    fn state(values: &[&[i8]]) -> UrlState {
        let rows = values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v < 0 { Cell::bomb() } else { Cell::count(v as u8) })
                    .collect()
            })
            .collect();
        let grid = Grid::from_rows(rows).unwrap();
        UrlState {
            grid_size: grid.size(),
            grid,
            is_game_over: false,
            is_game_won: false,
            is_flagging_mode: false,
            start_time: 0,
        }
    }

    #[test]
    fn link_target_carries_the_post_move_state() {
        let state = state(&[&[1, -1], &[1, 1]]);
        let query = next_query(&state, (0, 0)).unwrap();
        let next = params::decode_query(&query).unwrap();
        assert!(next.grid[(0, 0)].state.is_opened());
        assert!(!next.is_game_over);
        assert_eq!(next.start_time, state.start_time);
    }

    #[test]
    fn flag_mode_links_flag_instead_of_revealing() {
        let mut state = state(&[&[1, -1], &[1, 1]]);
        state.is_flagging_mode = true;
        let query = next_query(&state, (0, 1)).unwrap();
        let next = params::decode_query(&query).unwrap();
        assert_eq!(next.grid[(0, 1)].state, CellState::Flagged);
        assert!(!next.is_game_over);
    }

    #[test]
    fn bomb_link_ends_the_game_in_the_target_state() {
        let state = state(&[&[1, -1], &[1, 1]]);
        let query = next_query(&state, (0, 1)).unwrap();
        let next = params::decode_query(&query).unwrap();
        assert!(next.is_game_over);
        assert!(!next.is_game_won);
        assert!(next.grid[(0, 1)].state.is_opened());
    }

    #[test]
    fn finished_or_opened_cells_have_no_link() {
        let mut terminal = state(&[&[1, -1], &[1, 1]]);
        terminal.is_game_over = true;
        assert_eq!(next_query(&terminal, (0, 0)), None);

        let mut opened = state(&[&[1, -1], &[1, 1]]);
        opened.grid[(0, 0)].state = CellState::Opened;
        assert_eq!(next_query(&opened, (0, 0)), None);
    }

    #[test]
    fn mode_toggle_preserves_the_grid() {
        let state = state(&[&[1, -1], &[1, 1]]);
        let query = flag_mode_query(&state, true).unwrap();
        let next = params::decode_query(&query).unwrap();
        assert!(next.is_flagging_mode);
        assert_eq!(next.grid, state.grid);
    }

    #[test]
    fn untouched_board_reads_zero_elapsed() {
        let fresh = state(&[&[1, -1], &[1, 1]]);
        assert_eq!(elapsed_secs(&fresh, 90_000), 0);

        let mut started = state(&[&[1, -1], &[1, 1]]);
        started.grid[(0, 0)].state = CellState::Opened;
        assert_eq!(elapsed_secs(&started, 90_000), 90);
    }
}
