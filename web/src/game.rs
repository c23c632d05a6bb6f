use frutinha_core as game;
use gloo::timers::callback::Timeout;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::notify::{NOTICE_MILLIS, NoticeView};
use crate::settings::SettingsView;
use crate::theme;
use crate::utils::*;

/// One round of the puzzle plus the running attempt counter, exactly the
/// record that goes to localStorage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct GameSession {
    pub engine: game::PuzzleEngine,
    pub attempts: u32,
}

impl GameSession {
    fn new(engine: game::PuzzleEngine, attempts: u32) -> Self {
        Self { engine, attempts }
    }

    fn box_state_at(&self, index: usize) -> ViewBoxState {
        let fruit_box = self.engine.box_at(index);

        match fruit_box.content {
            Some(content) if fruit_box.is_open => ViewBoxState::Opened {
                label: fruit_box.label,
                content,
                took: fruit_box.took,
                verdict: self.verdict_at(index, &fruit_box, content),
            },
            _ if self.engine.state().is_initial() => ViewBoxState::Untouched {
                label: fruit_box.label,
            },
            _ => ViewBoxState::Predictable {
                label: fruit_box.label,
                prediction: fruit_box.prediction,
            },
        }
    }

    /// Per-box right/wrong marker, only meaningful once the round is over
    /// and only for boxes that were actually predicted.
    fn verdict_at(&self, index: usize, fruit_box: &game::FruitBox, content: game::BoxKind) -> Option<bool> {
        if !self.engine.is_finished() || Some(index) == self.engine.first_opened() {
            return None;
        }
        fruit_box.prediction.map(|guess| guess == content)
    }
}

impl StorageKey for GameSession {
    const KEY: &'static str = "frutinha:game";
}

#[derive(Clone, Debug, PartialEq)]
enum ViewBoxState {
    Untouched {
        label: game::BoxKind,
    },
    Predictable {
        label: game::BoxKind,
        prediction: Option<game::BoxKind>,
    },
    Opened {
        label: game::BoxKind,
        content: game::BoxKind,
        took: Option<game::Fruit>,
        verdict: Option<bool>,
    },
}

fn kind_name(kind: game::BoxKind) -> &'static str {
    match kind {
        game::BoxKind::Apples => "apples",
        game::BoxKind::Oranges => "oranges",
        game::BoxKind::Mixed => "apples & oranges",
    }
}

fn fruit_name(fruit: game::Fruit) -> &'static str {
    match fruit {
        game::Fruit::Apple => "an apple",
        game::Fruit::Orange => "an orange",
    }
}

/// Attempt number the next round should carry: one past the live round, or
/// the already-reserved number when no round exists (a restart must never
/// rewind the counter).
fn next_attempt(game: Option<&GameSession>, reserved: u32) -> u32 {
    game.map_or(reserved, |g| g.attempts + 1)
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum BoxMsg {
    Open(usize),
    Predict(usize, game::BoxKind),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    BoxEvent(BoxMsg),
    Reveal,
    NewGame,
    ToggleSettings,
    SetTheme(Option<theme::Theme>),
    DismissNotice,
}

#[derive(Properties, Clone, PartialEq)]
struct BoxProps {
    index: usize,
    box_state: ViewBoxState,
    callback: Callback<BoxMsg>,
}

#[function_component(BoxView)]
fn box_component(props: &BoxProps) -> Html {
    let BoxProps {
        index,
        box_state,
        callback,
    } = props.clone();

    match box_state {
        ViewBoxState::Untouched { label } => {
            let onclick = Callback::from(move |_: MouseEvent| {
                log::trace!("box {} clicked", index);
                callback.emit(BoxMsg::Open(index));
            });
            html! {
                <td class="box closed" {onclick}>
                    <strong class="sign">{kind_name(label)}</strong>
                </td>
            }
        }
        ViewBoxState::Predictable { label, prediction } => {
            let guess_button = |guess: game::BoxKind| {
                let callback = callback.clone();
                let selected = prediction == Some(guess);
                let onclick = Callback::from(move |e: MouseEvent| {
                    e.stop_propagation();
                    callback.emit(BoxMsg::Predict(index, guess));
                });
                html! {
                    <button class={classes!("guess", selected.then_some("selected"))} {onclick}>
                        {kind_name(guess)}
                    </button>
                }
            };
            html! {
                <td class="box closed">
                    <strong class="sign">{kind_name(label)}</strong>
                    { for game::BoxKind::ALL.iter().copied().map(guess_button) }
                </td>
            }
        }
        ViewBoxState::Opened {
            label,
            content,
            took,
            verdict,
        } => {
            let verdict_class = verdict.map(|correct| if correct { "correct" } else { "wrong" });
            html! {
                <td class={classes!("box", "open", verdict_class)}>
                    <strong class="sign">{kind_name(label)}</strong>
                    <span class="contents">{kind_name(content)}</span>
                    { for took.map(|fruit| html! { <em class="took">{fruit_name(fruit)}</em> }) }
                </td>
            }
        }
    }
}

#[derive(Debug)]
struct Notice {
    message: String,
    _timeout: Timeout,
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    pub seed: Option<String>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    game: Option<GameSession>,
    seed: u64,
    next_attempt: u32,
    settings_open: bool,
    notice: Option<Notice>,
}

impl GameView {
    fn get_or_create_game(&mut self) -> &mut GameSession {
        let Self {
            game,
            seed,
            next_attempt,
            ..
        } = self;

        game.get_or_insert_with(|| {
            use game::{ArrangementGenerator, RandomArrangementGenerator};

            log::debug!("new round {} from seed {}", next_attempt, seed);
            let arrangement = RandomArrangementGenerator::new(*seed).generate();
            GameSession::new(game::PuzzleEngine::new(arrangement), *next_attempt)
        })
    }

    fn open_box(&mut self, index: usize) -> game::Result<()> {
        use rand::prelude::*;

        let mut rng = SmallRng::seed_from_u64(js_random_seed());
        let session = self.get_or_create_game();
        let fruit = session.engine.open_first(index, &mut rng)?;
        log::debug!("box {} gave {:?} on the first pick", index, fruit);
        Ok(())
    }

    fn report(&mut self, ctx: &Context<Self>, result: game::Result<()>) -> bool {
        if let Err(err) = result {
            self.show_notice(ctx, err.to_string());
        }
        true
    }

    fn show_notice(&mut self, ctx: &Context<Self>, message: String) {
        let link = ctx.link().clone();
        let timeout = Timeout::new(NOTICE_MILLIS, move || link.send_message(Msg::DismissNotice));
        log::warn!("{}", message);
        self.notice = Some(Notice {
            message,
            _timeout: timeout,
        });
    }

    fn engine_state(&self) -> game::EngineState {
        self.game
            .as_ref()
            .map_or(game::EngineState::Initial, |g| g.engine.state())
    }

    fn state_class(&self) -> Classes {
        use game::EngineState::*;

        classes!(match self.engine_state() {
            Initial => "not-started",
            AwaitingPredictions => "in-progress",
            Won => "win",
            Lost => "lose",
        })
    }

    fn outcome_text(&self) -> &'static str {
        match self.game.as_ref().map(|g| g.engine.outcome()) {
            Some(game::Outcome::Won) => "you won!",
            Some(game::Outcome::Lost) => "you lost",
            Some(game::Outcome::Playing) | None => "",
        }
    }

    fn attempts(&self) -> u32 {
        self.game.as_ref().map_or(self.next_attempt, |g| g.attempts)
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let game: Option<GameSession> = LocalOrDefault::local_or_default();
        let seed = ctx
            .props()
            .seed
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(js_random_seed);
        let next_attempt = next_attempt(game.as_ref(), 1);

        Self {
            game,
            seed,
            next_attempt,
            settings_open: false,
            notice: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            BoxEvent(box_msg) => {
                log::trace!("box event: {:?}", box_msg);
                let result = match box_msg {
                    BoxMsg::Open(index) => self.open_box(index),
                    BoxMsg::Predict(index, guess) => {
                        self.get_or_create_game().engine.set_prediction(index, guess)
                    }
                };
                self.report(ctx, result)
            }
            Reveal => {
                let result = self
                    .get_or_create_game()
                    .engine
                    .reveal_remaining()
                    .map(|outcome| log::debug!("round resolved: {:?}", outcome));
                self.report(ctx, result)
            }
            NewGame => {
                self.seed = js_random_seed();
                self.next_attempt = next_attempt(self.game.as_ref(), self.next_attempt);
                self.game.take().is_some()
            }
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            SetTheme(t) => {
                theme::Theme::apply(t);
                false
            }
            DismissNotice => self.notice.take().is_some(),
        };

        self.game.local_save();
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let state_class = self.state_class();
        let attempts = format!("{:03}", self.attempts());
        let can_reveal = matches!(
            self.engine_state(),
            game::EngineState::AwaitingPredictions
        );

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });
        let cb_show_settings = ctx.link().callback(|_| ToggleSettings);
        let cb_reveal = ctx.link().callback(|_| Reveal);
        let cb_theme = ctx.link().callback(SetTheme);
        let cb_dismiss = ctx.link().callback(|()| DismissNotice);

        html! {
            <div class="frutinha">
                <small onclick={cb_show_settings}>{"···"}</small>
                <nav>
                    <aside>{attempts}</aside>
                    <span><button class={state_class} onclick={cb_new_game}/></span>
                    <aside>{self.outcome_text()}</aside>
                </nav>
                <table>
                    <tr>
                        {
                            for (0..game::BOX_COUNT).map(|index| {
                                let box_state = self.game.as_ref().map_or(
                                    ViewBoxState::Untouched {
                                        label: game::Arrangement::label_of(index),
                                    },
                                    |game| game.box_state_at(index),
                                );
                                let callback = ctx.link().callback(Msg::BoxEvent);
                                html! {
                                    <BoxView {index} {box_state} {callback}/>
                                }
                            })
                        }
                    </tr>
                </table>
                if can_reveal {
                    <footer>
                        <button class="reveal" onclick={cb_reveal}>{"Open the rest"}</button>
                    </footer>
                }
                <SettingsView open={self.settings_open} on_theme={cb_theme}/>
                {
                    for self.notice.iter().map(|notice| html! {
                        <NoticeView message={notice.message.clone()} on_dismiss={cb_dismiss.clone()}/>
                    })
                }
            </div>
        }
    }
}
