use log::{error, info, trace};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use super::history_store::{HistorySnapshot, HistoryStore};
use super::settings::Settings;
use crate::destroyable::Destroyable;
use crate::error::{Error, Result};
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    Category, Game, GameSummary, PlayerSetup, SessionCommand, SessionEvent,
};

/// Owns every game of the session and knows which one is being played.
///
/// Games live in a single list, newest first. The current game is only an id
/// into that list, so edits made while playing are the history entry itself.
pub struct Session {
    games: Vec<Game>,
    current: Option<Uuid>,
    settings: Settings,
    store: Option<HistoryStore>,
    event_emitter: Option<EventEmitter<SessionEvent>>,
    command_subscription: Option<Unsubscriber<SessionCommand>>,
}

impl Destroyable for Session {
    fn destroy(&mut self) {
        if let Some(subscription) = self.command_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl Session {
    /// An empty in-memory session. Nothing is read from or written to disk.
    pub fn new(settings: Settings) -> Self {
        Self {
            games: Vec::new(),
            current: None,
            settings,
            store: None,
            event_emitter: None,
            command_subscription: None,
        }
    }

    /// Like `new`, but when `persist_history` is set the history is loaded
    /// from, and saved back to, the data directory.
    pub fn open(settings: Settings) -> Result<Self> {
        let mut session = Self::new(settings);
        if session.settings.persist_history {
            let store = HistoryStore::new(&session.settings.resolved_data_dir());
            let HistorySnapshot { games, current } = store.load()?;
            info!(
                target: "session",
                "Restored {} games from {}",
                games.len(),
                store.path().display()
            );
            session.games = games;
            session.current = current;
            session.store = Some(store);
        }
        Ok(session)
    }

    pub fn with_events(mut self, event_emitter: EventEmitter<SessionEvent>) -> Self {
        self.event_emitter = Some(event_emitter);
        self
    }

    /// Routes commands sent on `command_observer` into the session. Failed
    /// commands are logged.
    pub fn wire(session: &Rc<RefCell<Self>>, command_observer: &EventObserver<SessionCommand>) {
        let handler = Rc::clone(session);
        let subscription = command_observer.subscribe(move |command| {
            let mut session = handler.borrow_mut();
            if let Err(err) = session.handle_command(command.clone()) {
                error!(target: "session", "Command {:?} failed: {}", command, err);
            }
        });
        session.borrow_mut().command_subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: SessionCommand) -> Result<()> {
        trace!(target: "session", "Handling command: {:?}", command);
        match command {
            SessionCommand::StartGame(setups) => self.start_game(&setups).map(drop),
            SessionCommand::RecordScore {
                player_index,
                category,
                points,
            } => self.record_score(player_index, category, points),
            SessionCommand::ResetScores => self.reset_scores(),
            SessionCommand::AddPlayer => self.add_player().map(drop),
            SessionCommand::RemovePlayer(player_id) => self.remove_player(player_id),
            SessionCommand::ContinueGame(game_id) => self.continue_game(game_id),
            SessionCommand::FinishGame => {
                let game_id = self.current.ok_or(Error::NoCurrentGame)?;
                self.finish_game(game_id)
            }
            SessionCommand::RestartGame(game_id) => self.restart_game(game_id),
            SessionCommand::DeleteGame(game_id) => self.delete_game(game_id),
            SessionCommand::UpdateGame(game) => self.update_in_history(game),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Every game, newest first.
    pub fn history(&self) -> &[Game] {
        &self.games
    }

    pub fn game(&self, game_id: Uuid) -> Option<&Game> {
        self.games.iter().find(|game| game.id() == game_id)
    }

    pub fn current_id(&self) -> Option<Uuid> {
        self.current
    }

    pub fn current(&self) -> Option<&Game> {
        self.current.and_then(|game_id| self.game(game_id))
    }

    /// The newest games, as many as `recent_history_limit` allows.
    pub fn recent_summaries(&self) -> Vec<GameSummary> {
        self.games
            .iter()
            .take(self.settings.recent_history_limit)
            .map(GameSummary::from)
            .collect()
    }

    /// Creates a game from the setup list, puts it at the head of the history
    /// and makes it current.
    pub fn start_game(&mut self, setups: &[PlayerSetup]) -> Result<Uuid> {
        let game = Game::new(setups)?;
        let game_id = game.id();
        self.games.retain(|existing| existing.id() != game_id);
        self.games.insert(0, game);
        self.current = Some(game_id);
        info!(
            target: "session",
            "Started game {} with {} players",
            game_id,
            setups.len()
        );

        self.emit(SessionEvent::GameStarted(game_id));
        self.emit(SessionEvent::CurrentGameChanged(self.current));
        self.emit_history_changed();
        self.persist();
        Ok(game_id)
    }

    pub fn record_score(
        &mut self,
        player_index: usize,
        category: Category,
        points: u32,
    ) -> Result<()> {
        let game = self.current_game_mut()?;
        let was_completed = game.is_completed();
        game.record_score(player_index, category, points)?;
        let game_id = game.id();

        self.emit(SessionEvent::ScoreRecorded {
            game_id,
            player_index,
            category,
            points,
        });
        self.after_game_change(game_id, was_completed);
        Ok(())
    }

    /// Clears the current game's sheet.
    pub fn reset_scores(&mut self) -> Result<()> {
        let game = self.current_game_mut()?;
        game.reset_scores();
        let game_id = game.id();

        self.emit(SessionEvent::ScoresReset(game_id));
        self.persist();
        Ok(())
    }

    /// Seats another player in the current game and returns its id.
    pub fn add_player(&mut self) -> Result<Uuid> {
        let game = self.current_game_mut()?;
        let was_completed = game.is_completed();
        let player_id = game.add_player()?.id;
        let game_id = game.id();
        let player_count = game.players().len();

        self.emit(SessionEvent::PlayersChanged {
            game_id,
            player_count,
        });
        self.after_game_change(game_id, was_completed);
        Ok(player_id)
    }

    pub fn remove_player(&mut self, player_id: Uuid) -> Result<()> {
        let game = self.current_game_mut()?;
        let was_completed = game.is_completed();
        game.remove_player(player_id)?;
        let game_id = game.id();
        let player_count = game.players().len();

        self.emit(SessionEvent::PlayersChanged {
            game_id,
            player_count,
        });
        self.after_game_change(game_id, was_completed);
        Ok(())
    }

    /// Replaces the history entry with the same id. Never inserts.
    pub fn update_in_history(&mut self, game: Game) -> Result<()> {
        game.validate()?;
        let game_id = game.id();
        let entry = self.game_mut(game_id)?;
        let was_completed = entry.is_completed();
        *entry = game;
        self.after_game_change(game_id, was_completed);
        self.emit_history_changed();
        Ok(())
    }

    /// Makes a game from the history current again.
    pub fn continue_game(&mut self, game_id: Uuid) -> Result<()> {
        self.game_mut(game_id)?;
        self.set_current(Some(game_id));
        self.persist();
        Ok(())
    }

    /// Ends a game whether or not every cell is filled, records the leader as
    /// winner and closes it if it was current.
    pub fn finish_game(&mut self, game_id: Uuid) -> Result<()> {
        let game = self.game_mut(game_id)?;
        let was_completed = game.is_completed();
        game.finish();
        let winner = game.winner().cloned().filter(|_| !was_completed);

        if let Some(winner) = winner {
            info!(target: "session", "Game {} finished, {} wins", game_id, winner.name);
            self.emit(SessionEvent::GameCompleted { game_id, winner });
        }
        if self.current == Some(game_id) {
            self.set_current(None);
        }
        self.persist();
        Ok(())
    }

    /// Clears a history game's sheet and resumes playing it.
    pub fn restart_game(&mut self, game_id: Uuid) -> Result<()> {
        self.game_mut(game_id)?.reset_scores();
        self.emit(SessionEvent::ScoresReset(game_id));
        self.set_current(Some(game_id));
        self.persist();
        Ok(())
    }

    /// Setup entries for a rematch: same names, fresh ids.
    pub fn play_again(&self, game_id: Uuid) -> Result<Vec<PlayerSetup>> {
        let game = self.game(game_id).ok_or(Error::GameNotFound(game_id))?;
        Ok(game
            .players()
            .iter()
            .map(|player| PlayerSetup::new(player.name.clone()))
            .collect())
    }

    pub fn delete_game(&mut self, game_id: Uuid) -> Result<()> {
        let position = self
            .games
            .iter()
            .position(|game| game.id() == game_id)
            .ok_or(Error::GameNotFound(game_id))?;
        self.games.remove(position);
        info!(target: "session", "Deleted game {}", game_id);

        if self.current == Some(game_id) {
            self.set_current(None);
        }
        self.emit(SessionEvent::GameDeleted(game_id));
        self.emit_history_changed();
        self.persist();
        Ok(())
    }

    fn game_mut(&mut self, game_id: Uuid) -> Result<&mut Game> {
        self.games
            .iter_mut()
            .find(|game| game.id() == game_id)
            .ok_or(Error::GameNotFound(game_id))
    }

    fn current_game_mut(&mut self) -> Result<&mut Game> {
        let game_id = self.current.ok_or(Error::NoCurrentGame)?;
        self.game_mut(game_id)
    }

    fn set_current(&mut self, current: Option<Uuid>) {
        self.current = current;
        self.emit(SessionEvent::CurrentGameChanged(current));
    }

    /// Announces a game that just became completed and saves.
    fn after_game_change(&mut self, game_id: Uuid, was_completed: bool) {
        let winner = self
            .game(game_id)
            .filter(|game| !was_completed && game.is_completed())
            .and_then(|game| game.winner().cloned());
        if let Some(winner) = winner {
            info!(target: "session", "Game {} completed, {} wins", game_id, winner.name);
            self.emit(SessionEvent::GameCompleted { game_id, winner });
        }
        self.persist();
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(emitter) = &self.event_emitter {
            emitter.emit(event);
        }
    }

    fn emit_history_changed(&self) {
        self.emit(SessionEvent::HistoryChanged {
            history_length: self.games.len(),
        });
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let snapshot = HistorySnapshot {
            games: self.games.clone(),
            current: self.current,
        };
        if let Err(err) = store.save(&snapshot) {
            error!(
                target: "session",
                "Could not save history to {}: {}",
                store.path().display(),
                err
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use test_context::test_context;

    use super::*;
    use crate::error::ErrorKind;
    use crate::events::Channel;
    use crate::model::MAX_PLAYERS;
    use crate::tests::UsingLogger;

    fn setups(names: &[&str]) -> Vec<PlayerSetup> {
        names.iter().map(|name| PlayerSetup::new(*name)).collect()
    }

    fn session_with_events() -> (Session, Rc<RefCell<Vec<SessionEvent>>>) {
        let (emitter, observer) = Channel::<SessionEvent>::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        // the observer only needs to live as long as the channel
        observer.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(event.clone()));
        (Session::new(Settings::default()).with_events(emitter), events)
    }

    fn fill_current(session: &mut Session, player_index: usize, option: usize) {
        for category in Category::all() {
            let points = category.score_options()[option].points;
            session.record_score(player_index, category, points).unwrap();
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_start_game_becomes_current_and_newest(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let first = session.start_game(&setups(&["Ana"])).unwrap();
        let second = session.start_game(&setups(&["Bo", "Cy"])).unwrap();

        assert_eq!(session.current_id(), Some(second));
        let ids: Vec<Uuid> = session.history().iter().map(Game::id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_start_game_rejects_bad_rosters(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let err = session.start_game(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(session.history().is_empty());
        assert!(session.current().is_none());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_scores_land_in_history_entry(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let game_id = session.start_game(&setups(&["Ana", "Bo"])).unwrap();
        session.record_score(1, Category::Kings, 20).unwrap();

        let entry = session.game(game_id).unwrap();
        assert_eq!(entry.players()[1].total(), 20);
        assert_eq!(session.current().unwrap(), entry);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_commands_without_current_game_fail(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        for err in [
            session.record_score(0, Category::Aces, 6).unwrap_err(),
            session.reset_scores().unwrap_err(),
            session.add_player().unwrap_err(),
            session.handle_command(SessionCommand::FinishGame).unwrap_err(),
        ] {
            assert!(matches!(err, Error::NoCurrentGame));
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_completion_is_announced_once(_: &mut UsingLogger) {
        let (mut session, events) = session_with_events();
        let game_id = session.start_game(&setups(&["Ana", "Bo"])).unwrap();
        fill_current(&mut session, 0, 1);
        fill_current(&mut session, 1, 2);
        // a correction on a finished sheet is not a second completion
        session.record_score(0, Category::Nines, 0).unwrap();

        let completions: Vec<SessionEvent> = events
            .borrow()
            .iter()
            .filter(|event| matches!(event, SessionEvent::GameCompleted { .. }))
            .cloned()
            .collect();
        assert_eq!(completions.len(), 1);
        match &completions[0] {
            SessionEvent::GameCompleted { game_id: id, winner } => {
                assert_eq!(*id, game_id);
                assert_eq!(winner.name, "Bo");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(session.game(game_id).unwrap().is_completed());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_seventh_player_is_rejected(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        session
            .start_game(&setups(&["a", "b", "c", "d", "e", "f"]))
            .unwrap();
        let err = session.add_player().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(session.current().unwrap().players().len(), MAX_PLAYERS);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_add_and_remove_players(_: &mut UsingLogger) {
        let (mut session, events) = session_with_events();
        let game_id = session.start_game(&setups(&["Ana"])).unwrap();
        let added = session.add_player().unwrap();
        assert_eq!(session.current().unwrap().players()[1].name, "Player 2");

        session.remove_player(added).unwrap();
        assert_eq!(session.current().unwrap().players().len(), 1);
        let err = session.remove_player(added).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIndex);

        assert!(events.borrow().contains(&SessionEvent::PlayersChanged {
            game_id,
            player_count: 2
        }));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_finish_game_ends_early_and_clears_current(_: &mut UsingLogger) {
        let (mut session, events) = session_with_events();
        let game_id = session.start_game(&setups(&["Ana", "Bo"])).unwrap();
        session.record_score(1, Category::Straight, 25).unwrap();

        session.handle_command(SessionCommand::FinishGame).unwrap();

        assert!(session.current().is_none());
        let game = session.game(game_id).unwrap();
        assert!(game.is_completed());
        assert_eq!(game.winner().unwrap().name, "Bo");
        assert_eq!(
            events.borrow().last(),
            Some(&SessionEvent::CurrentGameChanged(None))
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_finishing_twice_announces_once(_: &mut UsingLogger) {
        let (mut session, events) = session_with_events();
        let game_id = session.start_game(&setups(&["Ana"])).unwrap();
        session.finish_game(game_id).unwrap();
        session.finish_game(game_id).unwrap();

        let completions = events
            .borrow()
            .iter()
            .filter(|event| matches!(event, SessionEvent::GameCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert!(session.game(game_id).unwrap().is_completed());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_out_of_range_points_leave_game_untouched(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let game_id = session.start_game(&setups(&["Ana"])).unwrap();
        session.record_score(0, Category::Aces, 30).unwrap();

        let err = session
            .record_score(0, Category::Nines, u32::MAX)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidIndex);
        let game = session.game(game_id).unwrap();
        assert_eq!(game.players()[0].total(), 30);
        assert_eq!(game.progress(), (1, 10));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_continue_game_resumes_history_entry(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let first = session.start_game(&setups(&["Ana"])).unwrap();
        session.start_game(&setups(&["Bo"])).unwrap();

        session.continue_game(first).unwrap();
        assert_eq!(session.current_id(), Some(first));
        session.record_score(0, Category::Aces, 18).unwrap();
        assert_eq!(session.game(first).unwrap().players()[0].total(), 18);

        let err = session.continue_game(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(session.current_id(), Some(first));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_restart_game_clears_scores_and_resumes(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let game_id = session.start_game(&setups(&["Ana"])).unwrap();
        fill_current(&mut session, 0, 2);
        session.finish_game(game_id).unwrap();
        assert!(session.current().is_none());

        session.restart_game(game_id).unwrap();
        let game = session.current().unwrap();
        assert_eq!(game.id(), game_id);
        assert!(!game.is_completed());
        assert_eq!(game.progress(), (0, 10));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_delete_current_game_clears_current(_: &mut UsingLogger) {
        let (mut session, events) = session_with_events();
        let game_id = session.start_game(&setups(&["Ana"])).unwrap();

        session.delete_game(game_id).unwrap();

        assert!(session.current().is_none());
        assert!(session.history().is_empty());
        assert!(matches!(
            session.record_score(0, Category::Nines, 1),
            Err(Error::NoCurrentGame)
        ));
        assert!(events.borrow().contains(&SessionEvent::GameDeleted(game_id)));
        assert!(matches!(
            session.delete_game(game_id),
            Err(Error::GameNotFound(id)) if id == game_id
        ));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_delete_other_game_keeps_current(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let old = session.start_game(&setups(&["Ana"])).unwrap();
        let current = session.start_game(&setups(&["Bo"])).unwrap();
        session.delete_game(old).unwrap();
        assert_eq!(session.current_id(), Some(current));
        assert_eq!(session.history().len(), 1);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_update_in_history_replaces_but_never_inserts(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let game_id = session.start_game(&setups(&["Ana", "Bo"])).unwrap();

        let mut edited = session.game(game_id).unwrap().clone();
        edited.record_score(0, Category::Full, 30).unwrap();
        session.update_in_history(edited).unwrap();
        assert_eq!(session.game(game_id).unwrap().players()[0].total(), 30);
        assert_eq!(session.history().len(), 1);

        let stranger = Game::new(&setups(&["Cy"])).unwrap();
        let err = session
            .handle_command(SessionCommand::UpdateGame(stranger))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(session.history().len(), 1);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_play_again_keeps_names_with_new_ids(_: &mut UsingLogger) {
        let mut session = Session::new(Settings::default());
        let game_id = session.start_game(&setups(&["Ana", ""])).unwrap();

        let rematch = session.play_again(game_id).unwrap();
        let names: Vec<&str> = rematch.iter().map(|setup| setup.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Player 2"]);

        let game = session.game(game_id).unwrap();
        for (setup, player) in rematch.iter().zip(game.players()) {
            assert_ne!(setup.id, player.id);
        }
        assert_eq!(session.history().len(), 1);
        assert!(session.play_again(Uuid::new_v4()).is_err());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_recent_summaries_respect_limit(_: &mut UsingLogger) {
        let mut settings = Settings::default();
        settings.recent_history_limit = 2;
        let mut session = Session::new(settings);
        for name in ["Ana", "Bo", "Cy"] {
            session.start_game(&setups(&[name])).unwrap();
        }
        session.record_score(0, Category::Poker, 40).unwrap();

        let summaries = session.recent_summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].headline_player.as_deref(), Some("Cy"));
        assert_eq!(summaries[0].headline_points, 40);
        assert_eq!(summaries[1].headline_player.as_deref(), Some("Bo"));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_wired_commands_reach_session(_: &mut UsingLogger) {
        let (command_emitter, command_observer) = Channel::<SessionCommand>::new();
        let session = Rc::new(RefCell::new(Session::new(Settings::default())));
        Session::wire(&session, &command_observer);

        command_emitter.emit(SessionCommand::StartGame(setups(&["Ana", "Bo"])));
        command_emitter.emit(SessionCommand::RecordScore {
            player_index: 1,
            category: Category::Grande,
            points: 50,
        });
        // out of range; logged and ignored
        command_emitter.emit(SessionCommand::RecordScore {
            player_index: 5,
            category: Category::Grande,
            points: 80,
        });

        {
            let session = session.borrow();
            let game = session.current().unwrap();
            assert_eq!(game.players()[1].total(), 50);
            assert_eq!(game.progress(), (1, 20));
        }

        session.borrow_mut().destroy();
        assert_eq!(command_observer.listener_count(), 0);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_persisted_history_survives_reopen(_: &mut UsingLogger) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.persist_history = true;
        settings.data_dir = Some(PathBuf::from(dir.path()));

        let game_id = {
            let mut session = Session::open(settings.clone()).unwrap();
            let game_id = session.start_game(&setups(&["Ana", "Bo"])).unwrap();
            session.record_score(0, Category::Queens, 12).unwrap();
            game_id
        };

        let session = Session::open(settings).unwrap();
        assert_eq!(session.current_id(), Some(game_id));
        assert_eq!(session.current().unwrap().players()[0].total(), 12);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_in_memory_session_writes_nothing(_: &mut UsingLogger) {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.data_dir = Some(PathBuf::from(dir.path()));
        let mut session = Session::open(settings).unwrap();
        session.start_game(&setups(&["Ana"])).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
