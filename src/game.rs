use std::{thread::sleep, time::{Duration, Instant}};

use log::{debug, info};

use crate::config::GameConfig;
use crate::error::SnakeError;
use crate::highscore::{HighscoreRecord, HighscoreStore, JsonFileStore};
use crate::input::{latest_direction, InputEvent};
use crate::session::{NameEntryOutcome, Phase, Session};
use crate::state::GameState;
use crate::term::{Frame, TermManager};

/// What the player asked for once a screen is dismissed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit
}

/// Owns the terminal and the highscore file and paces sessions in real time.
pub struct SnakeGame<S: HighscoreStore = JsonFileStore> {
    config: GameConfig,
    paused: bool,
    term: TermManager,
    store: S,
    highscore: HighscoreRecord,
}

impl SnakeGame<JsonFileStore> {
    pub fn new(config: GameConfig) -> Result<Self, SnakeError> {
        let store = JsonFileStore::new(&config.highscore_path);
        debug!("highscore file: {}", store.path().display());
        SnakeGame::with_store(config, store)
    }
}

impl<S: HighscoreStore> SnakeGame<S> {
    pub fn with_store(config: GameConfig, store: S) -> Result<Self, SnakeError> {
        let highscore = store.load();
        info!("loaded highscore {} by {}", highscore.score, highscore.name);
        Ok(SnakeGame { config, paused: false, term: TermManager::new()?, store, highscore })
    }

    pub fn initialize(&mut self) -> Result<(), SnakeError> {
        let needed = TermManager::required_size(self.config.grid);
        let actual = self.term.get_terminal_size();
        if actual.0 < needed.0 || actual.1 < needed.1 {
            return Err(SnakeError::TerminalTooSmall { needed, actual });
        }

        self.term.setup()?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<(), SnakeError> {
        self.term.restore()?;
        Ok(())
    }

    pub fn show_intro(&mut self) -> Result<Flow, SnakeError> {
        let best = format!("Best: {} {}", self.highscore.name, self.highscore.score);
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            &*best,
            "",
            "Press any key to begin"
        ];

        self.term.show_message(lines)?;
        let flow = self.wait_for_key()?;
        self.term.hide_message()?;
        Ok(flow)
    }

    /// Plays one session through name entry. Returns `Quit` if the player
    /// quit at any point, `Continue` if they want another round.
    pub fn play(&mut self) -> Result<Flow, SnakeError> {
        self.term.clear()?;
        self.term.draw_borders(self.config.grid)?;
        self.paused = false;

        let state = GameState::new(&self.config);
        let mut session = Session::new(state, self.highscore.clone(), &self.config);
        info!("new session, highscore to beat: {}", self.highscore.score);

        self.draw(&session)?;

        while *session.phase() == Phase::Playing {
            let frame_start = Instant::now();
            let events = self.poll_events()?;

            for ev in &events {
                match ev {
                    InputEvent::Quit => return Ok(Flow::Quit),
                    InputEvent::Pause => self.toggle_pause()?,
                    _ => {}
                }
            }

            let dir_change = latest_direction(&events, session.state().direction(), self.paused);

            if !self.paused {
                session.tick(dir_change);
                self.draw(&session)?;
            }

            pace(frame_start, self.config.play_tick);
        }

        if self.enter_name(&mut session)? == Flow::Quit {
            return Ok(Flow::Quit);
        }

        self.highscore = session.highscore().clone();
        self.show_final_screen(&session)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn enter_name(&mut self, session: &mut Session) -> Result<Flow, SnakeError> {
        let mut redraw = true;

        loop {
            let frame_start = Instant::now();

            if let (true, Phase::AwaitingName(entry)) = (redraw, session.phase()) {
                let score = format!("Score: {}", session.state().score());
                let prompt = format!("Name: {}_", entry.buffer());
                let verdict = if session.beats_highscore() {"New high score!"} else {""};
                self.term.show_message(&[
                    "Game over!",
                    &*score,
                    verdict,
                    "",
                    &*prompt,
                    "",
                    "Enter to confirm"
                ])?;
            }

            redraw = false;
            for ev in self.poll_events()? {
                redraw = true;
                match session.handle_name_event(&ev, &mut self.store) {
                    NameEntryOutcome::Aborted => return Ok(Flow::Quit),
                    NameEntryOutcome::Finished(name) => {
                        debug!("name entered: {}", name);
                        return Ok(Flow::Continue);
                    },
                    NameEntryOutcome::Editing => {}
                }
            }

            pace(frame_start, self.config.name_entry_tick);
        }
    }

    fn show_final_screen(&mut self, session: &Session) -> Result<Flow, SnakeError> {
        let score = format!("Score: {}", session.state().score());
        let best = format!("Best: {} {}", self.highscore.name, self.highscore.score);

        self.term.show_message(&[
            "Game over!",
            &*score,
            &*best,
            "",
            "Press any key to play again,",
            "or CTRL+C to quit."
        ])?;

        self.wait_for_key()
    }

    fn draw(&mut self, session: &Session) -> Result<(), SnakeError> {
        let state = session.state();
        let frame = Frame {
            snake: state.snake(),
            food: state.food(),
            score: state.score(),
            highscore: session.highscore(),
            dead: state.is_over(),
        };
        self.term.draw_board(state.grid(), &frame)?;
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<InputEvent>, SnakeError> {
        let keys = self.term.read_key_events_queue()?;
        Ok(keys.iter().filter_map(InputEvent::from_key_event).collect())
    }

    fn wait_for_key(&mut self) -> Result<Flow, SnakeError> {
        let key = self.term.read_key_blocking()?;
        match InputEvent::from_key_event(&key) {
            Some(InputEvent::Quit) => Ok(Flow::Quit),
            _ => Ok(Flow::Continue),
        }
    }

    fn toggle_pause(&mut self) -> Result<(), SnakeError> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Sleeps out the rest of a frame that started at `frame_start`.
fn pace(frame_start: Instant, period: Duration) {
    if let Some(rest) = period.checked_sub(frame_start.elapsed()) {
        sleep(rest);
    }
}
