//! Game session state machine.
//!
//! A session is driven entirely by [`Event`]s. Each call to
//! [`GameSession::handle`] applies one transition and returns the [`Effect`]s
//! the driver has to carry out (render, schedule or cancel a timer, load a
//! deck). Nothing in here touches the DOM, the network or the clock.
//!
//! Every deferred callback is identified by a [`Token`]. Starting a new game
//! bumps the session epoch, so callbacks scheduled for an earlier board are
//! recognised as stale and dropped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};
use crate::types::{Banner, Card, Difficulty, Phase};

/// Countdown resolution.
pub const TICK_MILLIS: u32 = 1_000;
/// How long a mismatched pair stays face up.
pub const MISMATCH_DELAY_MILLIS: u32 = 1_000;
/// How long the power-up keeps the board revealed.
pub const REVEAL_MILLIS: u32 = 2_000;

/// Identifies one scheduled timer or deck load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    epoch: u64,
    seq: u64,
}

impl Token {
    /// Session epoch this token was issued in.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// What a scheduled timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// Repeating one-second countdown tick.
    Countdown,
    /// Flip a mismatched pair back face down.
    MismatchReset,
    /// End of the power-up reveal window.
    RevealEnd,
}

impl TimerKind {
    pub fn millis(self) -> u32 {
        match self {
            Self::Countdown => TICK_MILLIS,
            Self::MismatchReset => MISMATCH_DELAY_MILLIS,
            Self::RevealEnd => REVEAL_MILLIS,
        }
    }

    pub fn repeats(self) -> bool {
        matches!(self, Self::Countdown)
    }
}

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// Start, reset or difficulty change.
    Start(Difficulty),
    /// Result of a `LoadDeck` effect.
    DeckLoaded {
        token: Token,
        deck: Result<Vec<Card>>,
    },
    CardClicked(usize),
    UsePowerup,
    /// A timer scheduled by `ScheduleTimer` fired.
    TimerFired(Token),
    DismissBanner,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The view changed.
    Render,
    /// Assemble a deck and answer with `Event::DeckLoaded` carrying `token`.
    LoadDeck { token: Token, difficulty: Difficulty },
    /// Fire `Event::TimerFired(token)` after `kind.millis()`, repeatedly if
    /// `kind.repeats()`.
    ScheduleTimer { token: Token, kind: TimerKind },
    CancelTimer(Token),
    CancelAllTimers,
}

/// A resolution the board is waiting on. While one exists the board is busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Mismatch { token: Token, first: usize, second: usize },
    Reveal { token: Token },
}

impl Pending {
    fn token(&self) -> Token {
        match self {
            Self::Mismatch { token, .. } | Self::Reveal { token } => *token,
        }
    }
}

/// State of one game, from difficulty selection to the end banner.
#[derive(Debug, Clone)]
pub struct GameSession {
    difficulty: Difficulty,
    phase: Phase,
    cards: Vec<Card>,
    selected: Option<usize>,
    pending: Option<Pending>,
    matched_pairs: usize,
    clicks: u32,
    seconds_left: u32,
    powerups_used: u32,
    countdown: Option<Token>,
    load: Option<Token>,
    banner: Option<Banner>,
    epoch: u64,
    next_seq: u64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

impl GameSession {
    /// Idle session waiting for a start.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            phase: Phase::Idle,
            cards: Vec::new(),
            selected: None,
            pending: None,
            matched_pairs: 0,
            clicks: 0,
            seconds_left: difficulty.time_limit_secs(),
            powerups_used: 0,
            countdown: None,
            load: None,
            banner: None,
            epoch: 0,
            next_seq: 0,
        }
    }

    /// Apply one event.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Start(difficulty) => self.start(difficulty),
            Event::DeckLoaded { token, deck } => self.deck_loaded(token, deck),
            Event::CardClicked(index) => self.click(index),
            Event::UsePowerup => self.use_powerup(),
            Event::TimerFired(token) => self.timer_fired(token),
            Event::DismissBanner => self.dismiss_banner(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.difficulty.total_pairs()
    }

    pub fn remaining_pairs(&self) -> usize {
        self.total_pairs() - self.matched_pairs
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn powerups_used(&self) -> u32 {
        self.powerups_used
    }

    pub fn max_powerups(&self) -> u32 {
        self.difficulty.max_powerups()
    }

    pub fn powerups_left(&self) -> u32 {
        self.max_powerups().saturating_sub(self.powerups_used)
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Index of the first card of a half-made selection.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Whether a mismatch flip-back or a power-up reveal is pending.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Whether pressing the power-up button would do anything right now.
    pub fn powerup_available(&self) -> bool {
        self.is_active() && !self.is_busy() && self.powerups_left() > 0
    }

    fn issue_token(&mut self) -> Token {
        self.next_seq += 1;
        Token {
            epoch: self.epoch,
            seq: self.next_seq,
        }
    }

    fn start(&mut self, difficulty: Difficulty) -> Vec<Effect> {
        let epoch = self.epoch + 1;
        *self = Self {
            phase: Phase::Loading,
            epoch,
            ..Self::new(difficulty)
        };

        let token = self.issue_token();
        self.load = Some(token);

        vec![
            Effect::CancelAllTimers,
            Effect::LoadDeck { token, difficulty },
            Effect::Render,
        ]
    }

    fn deck_loaded(&mut self, token: Token, deck: Result<Vec<Card>>) -> Vec<Effect> {
        if self.phase != Phase::Loading || self.load != Some(token) {
            log::debug!("Ignoring stale deck for epoch {}", token.epoch);
            return Vec::new();
        }
        self.load = None;

        let needed = self.total_pairs();
        let deck = deck.and_then(|cards| {
            let found = complete_pairs(&cards);
            if cards.len() == needed * 2 && found == needed {
                Ok(cards)
            } else {
                Err(SetupError::NotEnoughSprites { needed, found })
            }
        });

        match deck {
            Ok(cards) => {
                self.cards = cards
                    .into_iter()
                    .map(|card| Card {
                        flipped: false,
                        matched: false,
                        ..card
                    })
                    .collect();
                self.phase = Phase::Playing;

                let token = self.issue_token();
                self.countdown = Some(token);
                vec![
                    Effect::ScheduleTimer {
                        token,
                        kind: TimerKind::Countdown,
                    },
                    Effect::Render,
                ]
            }
            Err(e) => {
                log::warn!("Board setup failed: {}", e);
                self.phase = Phase::Failed;
                self.banner = Some(Banner::setup_failed(&e.to_string()));
                vec![Effect::Render]
            }
        }
    }

    fn click(&mut self, index: usize) -> Vec<Effect> {
        if !self.is_active() || self.is_busy() || self.matched_pairs == self.total_pairs() {
            return Vec::new();
        }
        match self.cards.get(index) {
            Some(card) if !card.flipped && !card.matched => {}
            _ => return Vec::new(),
        }

        self.cards[index].flipped = true;

        let Some(first) = self.selected.take() else {
            self.selected = Some(index);
            return vec![Effect::Render];
        };

        self.clicks += 1;

        if self.cards[first].pairs_with(&self.cards[index]) {
            self.cards[first].matched = true;
            self.cards[index].matched = true;
            self.matched_pairs += 1;

            if self.matched_pairs == self.total_pairs() {
                return self.finish(Phase::Won, Banner::won());
            }
            return vec![Effect::Render];
        }

        let token = self.issue_token();
        self.pending = Some(Pending::Mismatch {
            token,
            first,
            second: index,
        });
        vec![
            Effect::ScheduleTimer {
                token,
                kind: TimerKind::MismatchReset,
            },
            Effect::Render,
        ]
    }

    fn use_powerup(&mut self) -> Vec<Effect> {
        if !self.powerup_available() {
            return Vec::new();
        }

        self.powerups_used += 1;
        self.selected = None;
        for card in &mut self.cards {
            card.flipped = true;
        }

        let token = self.issue_token();
        self.pending = Some(Pending::Reveal { token });
        vec![
            Effect::ScheduleTimer {
                token,
                kind: TimerKind::RevealEnd,
            },
            Effect::Render,
        ]
    }

    fn timer_fired(&mut self, token: Token) -> Vec<Effect> {
        if token.epoch != self.epoch {
            return Vec::new();
        }
        if self.countdown == Some(token) {
            return self.tick();
        }

        let Some(pending) = self.pending.filter(|p| p.token() == token) else {
            return Vec::new();
        };
        self.pending = None;

        match pending {
            Pending::Mismatch { first, second, .. } => {
                self.cards[first].flipped = false;
                self.cards[second].flipped = false;
            }
            Pending::Reveal { .. } => {
                for card in self.cards.iter_mut().filter(|c| !c.matched) {
                    card.flipped = false;
                }
            }
        }
        vec![Effect::Render]
    }

    fn tick(&mut self) -> Vec<Effect> {
        if !self.is_active() {
            return Vec::new();
        }

        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            return self.finish(Phase::TimedOut, Banner::timed_out());
        }
        vec![Effect::Render]
    }

    fn finish(&mut self, phase: Phase, banner: Banner) -> Vec<Effect> {
        log::info!(
            "Game over ({:?}) after {} clicks with {}s left",
            phase,
            self.clicks,
            self.seconds_left
        );
        self.phase = phase;
        self.banner = Some(banner);

        let mut effects = Vec::new();
        if let Some(token) = self.countdown.take() {
            effects.push(Effect::CancelTimer(token));
        }
        effects.push(Effect::Render);
        effects
    }

    fn dismiss_banner(&mut self) -> Vec<Effect> {
        match self.banner.take() {
            Some(_) => vec![Effect::Render],
            None => Vec::new(),
        }
    }
}

/// Number of images that appear on exactly two cards.
fn complete_pairs(cards: &[Card]) -> usize {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for card in cards {
        *counts.entry(card.image_url.as_str()).or_default() += 1;
    }
    counts.values().filter(|&&count| count == 2).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BannerKind, Sprite};
    use pretty_assertions::assert_eq;

    fn card(name: &str) -> Card {
        Card::face_down(&Sprite::new(name, format!("https://art/{name}.png")))
    }

    /// Easy board laid out as a a b b c c.
    fn easy_deck() -> Vec<Card> {
        ["a", "a", "b", "b", "c", "c"].iter().map(|n| card(n)).collect()
    }

    fn load_token(effects: &[Effect]) -> Token {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::LoadDeck { token, .. } => Some(*token),
                _ => None,
            })
            .expect("no LoadDeck effect")
    }

    fn scheduled(effects: &[Effect], wanted: TimerKind) -> Token {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::ScheduleTimer { token, kind } if *kind == wanted => Some(*token),
                _ => None,
            })
            .unwrap_or_else(|| panic!("no {wanted:?} timer in {effects:?}"))
    }

    /// Start a game and deliver `deck`; returns the countdown token.
    fn play(session: &mut GameSession, difficulty: Difficulty, deck: Vec<Card>) -> Token {
        let effects = session.handle(Event::Start(difficulty));
        let token = load_token(&effects);
        let effects = session.handle(Event::DeckLoaded {
            token,
            deck: Ok(deck),
        });
        scheduled(&effects, TimerKind::Countdown)
    }

    fn playing_easy() -> (GameSession, Token) {
        let mut session = GameSession::default();
        let countdown = play(&mut session, Difficulty::Easy, easy_deck());
        (session, countdown)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = GameSession::new(Difficulty::Hard);
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.cards().is_empty());
        assert!(!session.is_active());
        assert_eq!(session.seconds_left(), 120);
    }

    #[test]
    fn test_start_requests_deck() {
        let mut session = GameSession::default();
        let effects = session.handle(Event::Start(Difficulty::Medium));

        let token = load_token(&effects);
        assert_eq!(effects[0], Effect::CancelAllTimers);
        assert_eq!(
            effects[1],
            Effect::LoadDeck {
                token,
                difficulty: Difficulty::Medium
            }
        );
        assert_eq!(session.phase(), Phase::Loading);
        assert_eq!(session.total_pairs(), 6);
        assert_eq!(session.seconds_left(), 90);
    }

    #[test]
    fn test_easy_scenario() {
        let (session, _) = playing_easy();
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.cards().len(), 6);
        assert_eq!(session.total_pairs(), 3);
        assert_eq!(session.seconds_left(), 60);
        assert_eq!(session.max_powerups(), 1);
        assert!(session.cards().iter().all(|c| !c.flipped));
    }

    #[test]
    fn test_clicks_ignored_while_loading() {
        let mut session = GameSession::default();
        session.handle(Event::Start(Difficulty::Easy));
        assert!(session.handle(Event::CardClicked(0)).is_empty());
        assert!(session.handle(Event::UsePowerup).is_empty());
    }

    #[test]
    fn test_matching_pair() {
        let (mut session, _) = playing_easy();

        assert_eq!(session.handle(Event::CardClicked(0)), vec![Effect::Render]);
        assert_eq!(session.selected(), Some(0));
        assert_eq!(session.clicks(), 0);

        assert_eq!(session.handle(Event::CardClicked(1)), vec![Effect::Render]);
        assert_eq!(session.clicks(), 1);
        assert_eq!(session.matched_pairs(), 1);
        assert_eq!(session.remaining_pairs(), 2);
        assert!(session.cards()[0].matched && session.cards()[1].matched);
        assert!(!session.is_busy());
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_matched_cards_are_locked() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(0));
        session.handle(Event::CardClicked(1));

        assert!(session.handle(Event::CardClicked(0)).is_empty());
        assert!(session.handle(Event::CardClicked(1)).is_empty());
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn test_same_card_twice_is_ignored() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(2));
        assert!(session.handle(Event::CardClicked(2)).is_empty());
        assert_eq!(session.clicks(), 0);
        assert_eq!(session.selected(), Some(2));
    }

    #[test]
    fn test_out_of_range_click() {
        let (mut session, _) = playing_easy();
        assert!(session.handle(Event::CardClicked(99)).is_empty());
    }

    #[test]
    fn test_mismatch_flips_back_after_delay() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(0));
        let effects = session.handle(Event::CardClicked(2));

        let token = scheduled(&effects, TimerKind::MismatchReset);
        assert_eq!(session.clicks(), 1);
        assert!(session.is_busy());
        assert!(session.cards()[0].flipped && session.cards()[2].flipped);

        // Busy: further selections are ignored until the delay elapses.
        assert!(session.handle(Event::CardClicked(4)).is_empty());
        assert!(!session.cards()[4].flipped);

        assert_eq!(session.handle(Event::TimerFired(token)), vec![Effect::Render]);
        assert!(!session.is_busy());
        assert!(!session.cards()[0].flipped && !session.cards()[2].flipped);
        assert_eq!(session.clicks(), 1);
        assert_eq!(session.matched_pairs(), 0);
    }

    #[test]
    fn test_mismatch_timer_only_fires_once() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(0));
        let token = scheduled(
            &session.handle(Event::CardClicked(2)),
            TimerKind::MismatchReset,
        );
        session.handle(Event::TimerFired(token));

        session.handle(Event::CardClicked(0));
        assert!(session.handle(Event::TimerFired(token)).is_empty());
        assert!(session.cards()[0].flipped);
    }

    #[test]
    fn test_win_is_immediate_on_last_match() {
        let (mut session, countdown) = playing_easy();
        for (a, b) in [(0, 1), (2, 3)] {
            session.handle(Event::CardClicked(a));
            session.handle(Event::CardClicked(b));
        }
        session.handle(Event::CardClicked(4));
        let effects = session.handle(Event::CardClicked(5));

        assert_eq!(
            effects,
            vec![Effect::CancelTimer(countdown), Effect::Render]
        );
        assert_eq!(session.phase(), Phase::Won);
        assert_eq!(session.matched_pairs(), session.total_pairs());
        assert_eq!(session.banner().map(|b| b.kind), Some(BannerKind::Success));
        assert_eq!(session.clicks(), 3);
    }

    #[test]
    fn test_no_clicks_after_win() {
        let (mut session, countdown) = playing_easy();
        for (a, b) in [(0, 1), (2, 3), (4, 5)] {
            session.handle(Event::CardClicked(a));
            session.handle(Event::CardClicked(b));
        }
        assert!(session.handle(Event::CardClicked(0)).is_empty());
        assert!(session.handle(Event::TimerFired(countdown)).is_empty());
        assert!(session.handle(Event::UsePowerup).is_empty());
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn test_countdown_decrements_by_one() {
        let (mut session, countdown) = playing_easy();
        for expected in (50..60).rev() {
            assert_eq!(session.handle(Event::TimerFired(countdown)), vec![Effect::Render]);
            assert_eq!(session.seconds_left(), expected);
        }
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_timeout() {
        let (mut session, countdown) = playing_easy();
        session.handle(Event::CardClicked(0));
        session.handle(Event::CardClicked(1));

        for _ in 0..59 {
            session.handle(Event::TimerFired(countdown));
        }
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.seconds_left(), 1);

        let effects = session.handle(Event::TimerFired(countdown));
        assert_eq!(effects, vec![Effect::CancelTimer(countdown), Effect::Render]);
        assert_eq!(session.phase(), Phase::TimedOut);
        assert_eq!(session.seconds_left(), 0);
        assert_eq!(session.banner().map(|b| b.kind), Some(BannerKind::Danger));

        assert!(session.handle(Event::CardClicked(2)).is_empty());
        assert!(session.handle(Event::TimerFired(countdown)).is_empty());
        assert_eq!(session.matched_pairs(), 1);
    }

    #[test]
    fn test_pending_mismatch_settles_after_timeout() {
        let (mut session, countdown) = playing_easy();
        for _ in 0..59 {
            session.handle(Event::TimerFired(countdown));
        }
        session.handle(Event::CardClicked(0));
        let reset = scheduled(
            &session.handle(Event::CardClicked(2)),
            TimerKind::MismatchReset,
        );
        session.handle(Event::TimerFired(countdown));
        assert_eq!(session.phase(), Phase::TimedOut);

        session.handle(Event::TimerFired(reset));
        assert!(session.cards().iter().all(|c| !c.flipped));
    }

    #[test]
    fn test_powerup_reveals_then_hides_unmatched() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(0));
        session.handle(Event::CardClicked(1));

        let effects = session.handle(Event::UsePowerup);
        let token = scheduled(&effects, TimerKind::RevealEnd);
        assert!(session.cards().iter().all(|c| c.flipped));
        assert!(session.is_busy());
        assert!(!session.powerup_available());
        assert!(session.handle(Event::CardClicked(3)).is_empty());

        session.handle(Event::TimerFired(token));
        assert!(!session.is_busy());
        let flipped: Vec<bool> = session.cards().iter().map(|c| c.flipped).collect();
        assert_eq!(flipped, vec![true, true, false, false, false, false]);
    }

    #[test]
    fn test_powerup_limit() {
        let mut session = GameSession::default();
        play(
            &mut session,
            Difficulty::Medium,
            (0..6).flat_map(|i| [card(&i.to_string()), card(&i.to_string())]).collect(),
        );

        for used in 1..=2 {
            let token = scheduled(&session.handle(Event::UsePowerup), TimerKind::RevealEnd);
            assert_eq!(session.powerups_used(), used);
            session.handle(Event::TimerFired(token));
        }

        assert_eq!(session.powerups_left(), 0);
        assert!(!session.powerup_available());
        assert!(session.handle(Event::UsePowerup).is_empty());
        assert_eq!(session.powerups_used(), 2);
        assert!(session.cards().iter().all(|c| !c.flipped));
    }

    #[test]
    fn test_powerup_button_reenabled_only_with_uses_left() {
        let mut session = GameSession::default();
        play(
            &mut session,
            Difficulty::Hard,
            (0..9).flat_map(|i| [card(&i.to_string()), card(&i.to_string())]).collect(),
        );
        let token = scheduled(&session.handle(Event::UsePowerup), TimerKind::RevealEnd);
        session.handle(Event::TimerFired(token));
        assert!(session.powerup_available());

        let (mut easy, _) = playing_easy();
        let token = scheduled(&easy.handle(Event::UsePowerup), TimerKind::RevealEnd);
        easy.handle(Event::TimerFired(token));
        assert!(!easy.powerup_available());
    }

    #[test]
    fn test_powerup_ignored_while_mismatch_pending() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(0));
        session.handle(Event::CardClicked(2));

        assert!(session.handle(Event::UsePowerup).is_empty());
        assert_eq!(session.powerups_used(), 0);
    }

    #[test]
    fn test_powerup_drops_half_selection() {
        let (mut session, _) = playing_easy();
        session.handle(Event::CardClicked(0));

        let token = scheduled(&session.handle(Event::UsePowerup), TimerKind::RevealEnd);
        assert_eq!(session.selected(), None);
        session.handle(Event::TimerFired(token));

        assert!(!session.cards()[0].flipped);
        session.handle(Event::CardClicked(2));
        assert_eq!(session.selected(), Some(2));
        assert_eq!(session.clicks(), 0);
    }

    #[test]
    fn test_restart_invalidates_old_timers() {
        let (mut session, old_countdown) = playing_easy();
        session.handle(Event::CardClicked(0));
        let old_reset = scheduled(
            &session.handle(Event::CardClicked(2)),
            TimerKind::MismatchReset,
        );

        let new_countdown = play(&mut session, Difficulty::Easy, easy_deck());
        session.handle(Event::CardClicked(4));

        assert!(session.handle(Event::TimerFired(old_reset)).is_empty());
        assert!(session.handle(Event::TimerFired(old_countdown)).is_empty());
        assert!(session.cards()[4].flipped);
        assert_eq!(session.seconds_left(), 60);

        session.handle(Event::TimerFired(new_countdown));
        assert_eq!(session.seconds_left(), 59);
        assert!(new_countdown.epoch() > old_countdown.epoch());
    }

    #[test]
    fn test_stale_deck_is_ignored() {
        let mut session = GameSession::default();
        let first = load_token(&session.handle(Event::Start(Difficulty::Easy)));
        let second = load_token(&session.handle(Event::Start(Difficulty::Hard)));

        let effects = session.handle(Event::DeckLoaded {
            token: first,
            deck: Ok(easy_deck()),
        });
        assert!(effects.is_empty());
        assert_eq!(session.phase(), Phase::Loading);

        let deck = (0..9)
            .flat_map(|i| [card(&i.to_string()), card(&i.to_string())])
            .collect();
        session.handle(Event::DeckLoaded {
            token: second,
            deck: Ok(deck),
        });
        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.cards().len(), 18);
    }

    #[test]
    fn test_setup_failure() {
        let mut session = GameSession::default();
        let token = load_token(&session.handle(Event::Start(Difficulty::Easy)));

        let effects = session.handle(Event::DeckLoaded {
            token,
            deck: Err(SetupError::NotEnoughSprites { needed: 3, found: 1 }),
        });

        assert_eq!(effects, vec![Effect::Render]);
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.cards().is_empty());
        let banner = session.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Warning);
        assert!(banner.text.contains("only found 1 of 3 sprites"));
    }

    #[test]
    fn test_undersized_deck_is_rejected() {
        let mut session = GameSession::default();
        let token = load_token(&session.handle(Event::Start(Difficulty::Easy)));

        session.handle(Event::DeckLoaded {
            token,
            deck: Ok(vec![card("a"), card("a")]),
        });

        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.cards().is_empty());
    }

    #[test]
    fn test_unpaired_deck_is_rejected() {
        let mut session = GameSession::default();
        let token = load_token(&session.handle(Event::Start(Difficulty::Easy)));

        let effects = session.handle(Event::DeckLoaded {
            token,
            deck: Ok(vec![card("x"); 6]),
        });

        assert!(!effects
            .iter()
            .any(|e| matches!(e, Effect::ScheduleTimer { .. })));
        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.cards().is_empty());
        let banner = session.banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Warning);
        assert!(banner.text.contains("only found 0 of 3 sprites"));

        // Clicks on the rejected board do nothing.
        session.handle(Event::CardClicked(0));
        session.handle(Event::CardClicked(1));
        assert_eq!(session.matched_pairs(), 0);
        assert_eq!(session.phase(), Phase::Failed);
    }

    #[test]
    fn test_uneven_deck_is_rejected() {
        let mut session = GameSession::default();
        let token = load_token(&session.handle(Event::Start(Difficulty::Easy)));

        // Right size, but one image three times and another once.
        let deck = ["a", "a", "a", "b", "c", "c"].iter().map(|n| card(n)).collect();
        session.handle(Event::DeckLoaded {
            token,
            deck: Ok(deck),
        });

        assert_eq!(session.phase(), Phase::Failed);
        assert!(session.banner().unwrap().text.contains("only found 1 of 3 sprites"));
    }

    #[test]
    fn test_restart_clears_counters_and_banner() {
        let (mut session, countdown) = playing_easy();
        session.handle(Event::CardClicked(0));
        session.handle(Event::CardClicked(1));
        for _ in 0..60 {
            session.handle(Event::TimerFired(countdown));
        }
        assert!(session.banner().is_some());

        play(&mut session, Difficulty::Easy, easy_deck());
        assert_eq!(session.clicks(), 0);
        assert_eq!(session.matched_pairs(), 0);
        assert_eq!(session.powerups_used(), 0);
        assert!(session.banner().is_none());
        assert_eq!(session.phase(), Phase::Playing);
    }

    #[test]
    fn test_dismiss_banner_keeps_phase() {
        let (mut session, countdown) = playing_easy();
        for _ in 0..60 {
            session.handle(Event::TimerFired(countdown));
        }

        assert_eq!(session.handle(Event::DismissBanner), vec![Effect::Render]);
        assert!(session.banner().is_none());
        assert_eq!(session.phase(), Phase::TimedOut);
        assert!(session.handle(Event::DismissBanner).is_empty());
        assert!(session.handle(Event::CardClicked(0)).is_empty());
    }

    #[test]
    fn test_matched_never_exceeds_total() {
        let (mut session, _) = playing_easy();
        for index in (0..6).chain(0..6).chain((0..6).rev()) {
            session.handle(Event::CardClicked(index));
            assert!(session.matched_pairs() <= session.total_pairs());
        }
        assert_eq!(session.phase(), Phase::Won);
    }

    #[test]
    fn test_at_most_two_cards_selected() {
        let (mut session, _) = playing_easy();
        for index in [0, 2, 4, 1, 3, 5] {
            session.handle(Event::CardClicked(index));
            let unresolved = session
                .cards()
                .iter()
                .filter(|c| c.flipped && !c.matched)
                .count();
            assert!(unresolved <= 2);
        }
    }
}
