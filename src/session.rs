use log::info;
use rand::{Rng, rngs::ThreadRng};

use crate::config::{GameConfig, DEFAULT_PLAYER_NAME};
use crate::highscore::{HighscoreRecord, HighscoreStore};
use crate::input::InputEvent;
use crate::snake::Direction;
use crate::state::{GameState, TickResult};

/// Line editor for the name typed in after a game over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameEntry {
    buffer: String,
    max_len: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameEntryOutcome {
    Editing,
    Finished(String),
    Aborted,
}

impl NameEntry {
    pub fn new(max_len: Option<usize>) -> Self {
        NameEntry { buffer: String::new(), max_len }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn handle(&mut self, ev: &InputEvent) -> NameEntryOutcome {
        match ev {
            InputEvent::Quit => return NameEntryOutcome::Aborted,
            InputEvent::Enter => return NameEntryOutcome::Finished(self.finalize()),
            InputEvent::Backspace => { self.buffer.pop(); },
            InputEvent::Char(c) if !self.is_full() => self.buffer.push(*c),
            _ => {}
        }

        NameEntryOutcome::Editing
    }

    fn is_full(&self) -> bool {
        matches!(self.max_len, Some(max) if self.buffer.chars().count() >= max)
    }

    fn finalize(&self) -> String {
        match self.buffer.trim() {
            "" => DEFAULT_PLAYER_NAME.to_string(),
            name => name.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    AwaitingName(NameEntry),
    Done,
}

/// One game from the first tick to the recorded name.
pub struct Session<R = ThreadRng> {
    state: GameState<R>,
    highscore: HighscoreRecord,
    phase: Phase,
    max_name_len: Option<usize>,
}

impl<R: Rng> Session<R> {
    pub fn new(state: GameState<R>, highscore: HighscoreRecord, config: &GameConfig) -> Self {
        Session { state, highscore, phase: Phase::Playing, max_name_len: config.max_name_len }
    }

    /// Advances the game while playing; a crash moves the session on to
    /// name entry. Outside `Playing` this does nothing and reports `GameOver`.
    pub fn tick(&mut self, input: Option<Direction>) -> TickResult {
        if self.phase != Phase::Playing {
            return TickResult::GameOver;
        }

        let res = self.state.advance(input);
        if res == TickResult::GameOver {
            info!("game over with score {}", self.state.score());
            self.phase = Phase::AwaitingName(NameEntry::new(self.max_name_len));
        }
        res
    }

    /// Feeds one event to the name prompt. On `Finished` the record is saved
    /// if the score strictly beats the loaded one and the session is `Done`.
    /// On `Aborted` nothing is saved and the phase is left as it was.
    pub fn handle_name_event<S: HighscoreStore>(&mut self, ev: &InputEvent, store: &mut S) -> NameEntryOutcome {
        let entry = match &mut self.phase {
            Phase::AwaitingName(entry) => entry,
            _ => return NameEntryOutcome::Editing,
        };

        let outcome = entry.handle(ev);
        if let NameEntryOutcome::Finished(name) = &outcome {
            if self.beats_highscore() {
                let record = HighscoreRecord::new(name.as_str(), self.state.score());
                store.save(&record);
                self.highscore = record;
            }
            self.phase = Phase::Done;
        }
        outcome
    }

    pub fn beats_highscore(&self) -> bool {
        self.state.score() > self.highscore.score
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn highscore(&self) -> &HighscoreRecord {
        &self.highscore
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Grid;
    use crate::highscore::tests::RecordingStore;
    use crate::snake::Snake;
    use rand::{SeedableRng, rngs::StdRng};
    use Direction::*;

    /// A session whose very first tick crashes, with `score` already on the board.
    fn crashing_session(score: u32, highscore: HighscoreRecord) -> Session<StdRng> {
        let config = GameConfig::default();
        let mut state = GameState::from_parts(
            Grid::new(24, 32),
            Snake::from_cells(vec![(1, 1), (1, 2), (2, 2), (2, 1)], Up),
            Some((9, 9)),
            StdRng::seed_from_u64(7),
        );
        state.set_score(score);
        Session::new(state, highscore, &config)
    }

    fn type_name(session: &mut Session<StdRng>, store: &mut RecordingStore, name: &str) -> NameEntryOutcome {
        for c in name.chars() {
            session.handle_name_event(&InputEvent::Char(c), store);
        }
        session.handle_name_event(&InputEvent::Enter, store)
    }

    #[test]
    fn crash_moves_to_name_entry() {
        let mut session = crashing_session(0, HighscoreRecord::default());
        assert_eq!(session.phase(), &Phase::Playing);
        assert_eq!(session.tick(None), TickResult::GameOver);
        assert_eq!(session.phase(), &Phase::AwaitingName(NameEntry::new(Some(16))));
        assert_eq!(session.tick(Some(Left)), TickResult::GameOver);
    }

    #[test]
    fn new_highscore_is_saved_once() {
        let mut store = RecordingStore::with(HighscoreRecord::new("Ace", 2));
        let mut session = crashing_session(3, store.load());
        session.tick(None);

        let outcome = type_name(&mut session, &mut store, "Bo");
        assert_eq!(outcome, NameEntryOutcome::Finished("Bo".to_string()));
        assert_eq!(session.phase(), &Phase::Done);
        assert_eq!(store.saves, vec![HighscoreRecord::new("Bo", 3)]);
        assert_eq!(session.highscore(), &HighscoreRecord::new("Bo", 3));

        // Done: further keys are ignored and never save again.
        session.handle_name_event(&InputEvent::Enter, &mut store);
        assert_eq!(store.saves.len(), 1);
    }

    #[test]
    fn lower_score_is_never_saved() {
        let mut store = RecordingStore::with(HighscoreRecord::new("Ace", 10));
        let mut session = crashing_session(7, store.load());
        session.tick(None);

        type_name(&mut session, &mut store, "Bo");
        assert_eq!(session.phase(), &Phase::Done);
        assert!(store.saves.is_empty());
        assert_eq!(store.stored, HighscoreRecord::new("Ace", 10));
        assert_eq!(session.highscore(), &HighscoreRecord::new("Ace", 10));
    }

    #[test]
    fn tying_the_highscore_is_not_enough() {
        let mut store = RecordingStore::with(HighscoreRecord::new("Ace", 4));
        let mut session = crashing_session(4, store.load());
        session.tick(None);

        type_name(&mut session, &mut store, "Bo");
        assert!(store.saves.is_empty());
    }

    #[test]
    fn empty_name_becomes_player() {
        let mut store = RecordingStore::default();
        let mut session = crashing_session(1, store.load());
        session.tick(None);

        let outcome = type_name(&mut session, &mut store, "");
        assert_eq!(outcome, NameEntryOutcome::Finished("Player".to_string()));
        assert_eq!(store.saves, vec![HighscoreRecord::new("Player", 1)]);
    }

    #[test]
    fn quitting_during_name_entry_saves_nothing() {
        let mut store = RecordingStore::default();
        let mut session = crashing_session(5, store.load());
        session.tick(None);

        session.handle_name_event(&InputEvent::Char('Z'), &mut store);
        let outcome = session.handle_name_event(&InputEvent::Quit, &mut store);
        assert_eq!(outcome, NameEntryOutcome::Aborted);
        assert!(store.saves.is_empty());
        assert!(matches!(session.phase(), Phase::AwaitingName(_)));
    }

    #[test]
    fn name_events_while_playing_are_ignored() {
        let mut store = RecordingStore::default();
        let mut session = crashing_session(5, store.load());
        assert_eq!(session.handle_name_event(&InputEvent::Enter, &mut store), NameEntryOutcome::Editing);
        assert_eq!(session.phase(), &Phase::Playing);
    }

    #[test]
    fn backspace_edits_the_buffer() {
        let mut entry = NameEntry::new(None);
        for ev in &[InputEvent::Char('A'), InputEvent::Char('x'), InputEvent::Backspace, InputEvent::Char('l')] {
            assert_eq!(entry.handle(ev), NameEntryOutcome::Editing);
        }
        assert_eq!(entry.buffer(), "Al");

        entry.handle(&InputEvent::Backspace);
        entry.handle(&InputEvent::Backspace);
        entry.handle(&InputEvent::Backspace);
        assert_eq!(entry.buffer(), "");
    }

    #[test]
    fn buffer_is_capped() {
        let mut entry = NameEntry::new(Some(3));
        for c in "abcdef".chars() {
            entry.handle(&InputEvent::Char(c));
        }
        assert_eq!(entry.buffer(), "abc");
    }

    #[test]
    fn navigation_keys_do_not_edit_the_name() {
        let mut entry = NameEntry::new(None);
        entry.handle(&InputEvent::Direction(Left));
        entry.handle(&InputEvent::Pause);
        assert_eq!(entry.buffer(), "");
        assert_eq!(entry.handle(&InputEvent::Enter), NameEntryOutcome::Finished("Player".to_string()));
    }
}
