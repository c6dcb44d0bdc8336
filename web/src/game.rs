use chrono::prelude::*;
use demine_core as game;
use game::GridGenerator;
use gloo::timers::callback::Interval;
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::settings::{self, Settings};
use crate::theme::Theme;
use crate::utils::*;

/// One game from creation to its terminal state, as kept in component state
/// and persisted to localStorage between visits.
///
/// The grid itself is the source of truth; the over/won flags are whatever
/// the engine derived after the last move.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct GameSession {
    pub grid: game::Grid,
    pub is_game_over: bool,
    pub is_game_won: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    fn new(grid: game::Grid) -> Self {
        Self {
            grid,
            is_game_over: false,
            is_game_won: false,
            started_at: None,
            ended_at: None,
        }
    }

    fn is_finished(&self) -> bool {
        self.is_game_over || self.is_game_won
    }

    fn bombs_left(&self) -> i32 {
        self.grid.bomb_count() as i32 - self.grid.flagged_count() as i32
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    /// Applies one move through the engine; a finished game ignores input.
    fn apply(&mut self, mv: game::Move, now: DateTime<Utc>) -> bool {
        if self.is_finished() {
            return false;
        }

        match game::apply_move(&self.grid, mv) {
            Ok(outcome) => {
                let changed = outcome.grid != self.grid;
                self.grid = outcome.grid;
                self.is_game_over = outcome.is_game_over;
                self.is_game_won = outcome.is_game_won;

                if changed && self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                if self.is_finished() && self.ended_at.is_none() {
                    self.ended_at = Some(now);
                }
                changed
            }
            Err(err) => {
                log::error!("Rejected move {:?}: {}", mv, err);
                false
            }
        }
    }
}

impl StorageKey for GameSession {
    const KEY: &'static str = "demine:game:v1";
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Reveal(game::Coord2),
    Flag(game::Coord2),
    ToggleFlagMode,
    NewGame,
    UpdateTime,
    SetTheme(Option<Theme>),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: game::Coord,
    col: game::Coord,
    cell: game::Cell,
    #[prop_or_default]
    locked: bool,
    on_reveal: Callback<game::Coord2>,
    on_flag: Callback<game::Coord2>,
}

fn cell_classes(cell: game::Cell) -> Classes {
    use game::{CellState, CellValue};

    classes!(
        "cell",
        match (cell.state, cell.value) {
            (CellState::Initial, _) => classes!(),
            (CellState::Flagged, _) => classes!("flag"),
            (CellState::Opened, CellValue::Bomb) => classes!("open", "mine"),
            (CellState::Opened, CellValue::Count(count)) =>
                classes!("open", format!("num-{}", count)),
        }
    )
}

fn cell_content(cell: game::Cell) -> Html {
    use game::{CellState, CellValue};

    match (cell.state, cell.value) {
        (CellState::Flagged, _) => html! { {"🚩"} },
        (CellState::Opened, CellValue::Bomb) => html! { {"💣"} },
        (CellState::Opened, CellValue::Count(count)) if count > 0 => {
            html! { {count} }
        }
        _ => html! {},
    }
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        row,
        col,
        cell,
        locked,
        on_reveal,
        on_flag,
    } = props.clone();

    let mut class = cell_classes(cell);
    if locked {
        class.push("locked");
    }

    let onclick = {
        let on_reveal = on_reveal.clone();
        Callback::from(move |_: MouseEvent| {
            log::trace!("({}, {}) click", row, col);
            on_reveal.emit((row, col));
        })
    };

    let oncontextmenu = {
        let on_flag = on_flag.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            log::trace!("({}, {}) context menu", row, col);
            on_flag.emit((row, col));
        })
    };

    html! {
        <td {class} {onclick} {oncontextmenu}>{cell_content(cell)}</td>
    }
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    settings: Settings,
    session: Option<GameSession>,
    flagging_mode: bool,
    prev_time: u32,
    size_input: NodeRef,
    _timer_interval: Interval,
}

impl GameView {
    fn new_session(settings: &Settings, seed: u64) -> GameSession {
        log::debug!(
            "new {0}x{0} game, seed {1}",
            settings.grid_size,
            seed
        );
        let grid = game::RandomGridGenerator::new(seed, settings.bomb_probability)
            .generate(settings.grid_size);
        GameSession::new(grid)
    }

    fn get_time(&self) -> u32 {
        self.session
            .as_ref()
            .map(|session| session.elapsed_secs(utc_now()))
            .unwrap_or(0)
    }

    fn get_bombs_left(&self) -> i32 {
        self.session
            .as_ref()
            .map(|session| session.bombs_left())
            .unwrap_or(0)
    }

    fn is_finished(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.is_finished())
    }

    fn game_state_class(&self) -> Classes {
        classes!(match self.session.as_ref() {
            None => "not-started",
            Some(session) if session.is_game_won => "win",
            Some(session) if session.is_game_over => "lose",
            Some(session) if session.grid.is_untouched() => "not-started",
            Some(_) => "in-progress",
        })
    }

    fn apply(&mut self, mv: game::Move) -> bool {
        let now = utc_now();
        self.session
            .as_mut()
            .map_or(false, |session| session.apply(mv, now))
    }

    fn requested_grid_size(&self) -> game::Coord {
        self.size_input
            .cast::<HtmlInputElement>()
            .and_then(|input| input.value().parse().ok())
            .map(settings::clamp_grid_size)
            .unwrap_or(self.settings.grid_size)
    }

    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let settings = Settings::local_or_default();
        let session: Option<GameSession> = LocalOrDefault::local_or_default();
        let session = session.or_else(|| {
            let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
            Some(GameView::new_session(&settings, seed))
        });

        Self {
            settings,
            session,
            flagging_mode: false,
            prev_time: 0,
            size_input: NodeRef::default(),
            _timer_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Reveal(coords) => {
                log::debug!("reveal cell: {:?}", coords);
                if self.flagging_mode {
                    self.apply(game::Move::Flag {
                        row: coords.0,
                        col: coords.1,
                    })
                } else {
                    self.apply(game::Move::Reveal {
                        row: coords.0,
                        col: coords.1,
                    })
                }
            }
            Flag(coords) => {
                log::debug!("flag cell: {:?}", coords);
                self.apply(game::Move::Flag {
                    row: coords.0,
                    col: coords.1,
                })
            }
            ToggleFlagMode => {
                self.flagging_mode = !self.flagging_mode;
                true
            }
            NewGame => {
                self.settings.grid_size = self.requested_grid_size();
                self.settings.local_save();
                self.session = Some(GameView::new_session(&self.settings, js_random_seed()));
                true
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            SetTheme(theme) => {
                Theme::apply(theme);
                true
            }
        };

        if updated {
            self.session.local_save();
        }
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let size = self
            .session
            .as_ref()
            .map_or(self.settings.grid_size, |session| session.grid.size());
        let bombs_left = format_for_counter(self.get_bombs_left());
        let elapsed_time = format_for_counter(self.get_time() as i32);
        let finished = self.is_finished();

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_flag_mode = ctx.link().callback(|_: Event| ToggleFlagMode);
        let on_reveal = ctx.link().callback(Reveal);
        let on_flag = ctx.link().callback(Flag);

        html! {
            <div class="demine" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <nav>
                    <aside>{bombs_left}</aside>
                    <span><button class={self.game_state_class()} onclick={cb_new_game.clone()}/></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                {
                    self.session.as_ref().filter(|session| session.is_finished()).map(|session| html! {
                        <div class="banner">
                            if session.is_game_won {
                                <p class="victory">{"VICTORY!"}</p>
                            } else {
                                <p class="game-over">{"GAME OVER"}</p>
                            }
                        </div>
                    })
                }
                <table class={(!finished).then_some("playable")}>
                    {
                        for (0..size).map(|row| html! {
                            <tr>
                                {
                                    for (0..size).map(|col| {
                                        let cell = self
                                            .session
                                            .as_ref()
                                            .map_or_else(game::Cell::default, |session| session.grid.cell_at((row, col)));
                                        let locked = finished || cell.state.is_opened();
                                        html! {
                                            <CellView
                                                {row}
                                                {col}
                                                {cell}
                                                {locked}
                                                on_reveal={on_reveal.clone()}
                                                on_flag={on_flag.clone()}
                                            />
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer>
                    <label>
                        <input
                            type="checkbox"
                            checked={self.flagging_mode}
                            onchange={cb_flag_mode}
                        />
                        {"Flag mode"}
                    </label>
                    <form onsubmit={Callback::from(|e: SubmitEvent| e.prevent_default())}>
                        <button onclick={cb_new_game}>{"New game with"}</button>
                        <input
                            ref={self.size_input.clone()}
                            type="number"
                            min={settings::MIN_GRID_SIZE.to_string()}
                            max={settings::MAX_GRID_SIZE.to_string()}
                            value={self.settings.grid_size.to_string()}
                        />
                        <span>{"rows and columns"}</span>
                    </form>
                    <span class="themes">
                        <a onclick={ctx.link().callback(|_| SetTheme(Some(Theme::Light)))}>{"Light"}</a>
                        <a onclick={ctx.link().callback(|_| SetTheme(Some(Theme::Dark)))}>{"Dark"}</a>
                        <a onclick={ctx.link().callback(|_| SetTheme(None))}>{"Auto"}</a>
                    </span>
                </footer>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game::Cell;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(0).unwrap()
    }

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(secs * 1000).unwrap()
    }

    fn session(values: &[&[i8]]) -> GameSession {
        let rows = values
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if v < 0 { Cell::bomb() } else { Cell::count(v as u8) })
                    .collect()
            })
            .collect();
        GameSession::new(game::Grid::from_rows(rows).unwrap())
    }

    #[test]
    fn timer_runs_from_first_move_and_stops_at_the_end() {
        let mut session = session(&[&[1, 1], &[1, -1]]);
        assert_eq!(session.elapsed_secs(t(100)), 0);

        assert!(session.apply(game::Move::Reveal { row: 0, col: 0 }, t(100)));
        assert_eq!(session.elapsed_secs(t(130)), 30);

        assert!(session.apply(game::Move::Reveal { row: 1, col: 1 }, t(140)));
        assert!(session.is_game_over);
        // ended games keep reporting the final time
        assert_eq!(session.elapsed_secs(t(500)), 40);
    }

    #[test]
    fn finished_session_ignores_further_moves() {
        let mut session = session(&[&[1, -1], &[1, 1]]);
        assert!(session.apply(game::Move::Reveal { row: 0, col: 1 }, t0()));
        assert!(session.is_game_over);

        let snapshot = session.clone();
        assert!(!session.apply(game::Move::Reveal { row: 1, col: 0 }, t0()));
        assert!(!session.apply(game::Move::Flag { row: 1, col: 0 }, t0()));
        assert_eq!(session, snapshot);
    }

    #[test]
    fn bombs_left_counter_follows_flags() {
        let mut session = session(&[&[1, -1], &[1, 1]]);
        assert_eq!(session.bombs_left(), 1);

        assert!(session.apply(game::Move::Flag { row: 1, col: 0 }, t0()));
        assert_eq!(session.bombs_left(), 0);

        assert!(session.apply(game::Move::Flag { row: 0, col: 0 }, t0()));
        assert_eq!(session.bombs_left(), -1);
    }

    #[test]
    fn winning_marks_the_session_finished() {
        let mut session = session(&[&[1, -1], &[1, 1]]);
        assert!(session.apply(game::Move::Reveal { row: 0, col: 0 }, t0()));
        assert!(session.apply(game::Move::Reveal { row: 1, col: 0 }, t0()));
        assert!(session.apply(game::Move::Reveal { row: 1, col: 1 }, t0()));
        assert!(session.is_game_won);
        assert!(session.is_finished());
        assert!(session.ended_at.is_some());
    }

    #[test]
    fn rejected_moves_change_nothing() {
        let mut session = session(&[&[0]]);
        let snapshot = session.clone();
        assert!(!session.apply(game::Move::Reveal { row: 4, col: 4 }, t0()));
        assert_eq!(session, snapshot);
    }

    #[test]
    fn storage_key_is_versioned() {
        assert_eq!(<GameSession as StorageKey>::KEY, "demine:game:v1");
    }
}
