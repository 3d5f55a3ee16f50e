//! Room state synchronizer.
//!
//! [`RoomState`] is the client's view of one room. It changes only through
//! the transition methods below (or [`RoomState::apply_mut`] with a
//! [`RoomEvent`]), each of which leaves the derived views (`me`, the result
//! table and the stats) consistent with the underlying collections.
//!
//! Transitions are total: they never fail. Updates may arrive out of order or
//! more than once, so collections are merged by key instead of by position.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::RoomConfig;
use super::event::RoomEvent;
use super::message::{Message, MessageLog};
use super::participant::{Participant, ParticipantList};
use super::solve::{Flag, SolveTime, Turn};
use super::stats::Stats;
use super::table::ResultTable;
use super::timer::Timer;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomState {
    room_slug: Option<String>,
    username: Option<String>,
    loading: bool,
    me: Option<Participant>,
    participants: ParticipantList,
    messages: MessageLog,
    times: Vec<SolveTime>,
    table: ResultTable,
    turn: Option<Turn>,
    timer: Timer,
    flag: Flag,
    stats: Stats,
    #[serde(skip)]
    config: RoomConfig,
}

impl Default for RoomState {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl RoomState {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            room_slug: None,
            username: None,
            loading: true,
            me: None,
            participants: ParticipantList::new(),
            messages: MessageLog::new(),
            times: Vec::new(),
            table: ResultTable::default(),
            turn: None,
            timer: Timer::new(),
            flag: Flag::Ok,
            stats: Stats::default(),
            config,
        }
    }

    // Transitions

    pub fn enter_room(&mut self, room_slug: impl Into<String>, username: impl Into<String>) {
        self.room_slug = Some(room_slug.into());
        self.username = Some(username.into());
        self.loading = true;
        self.refresh();
    }

    /// Drop room contents before resubscribing after a reconnect.
    pub fn reset_room(&mut self) {
        self.participants.clear();
        self.messages.clear();
        self.times.clear();
        self.loading = true;
        self.refresh();
    }

    /// Merge a full room snapshot.
    ///
    /// Participants and messages already known by key are kept as they are;
    /// only unseen keys are appended. Times and turn are replaced, minus any
    /// time whose turn number is outside the configured range.
    pub fn update_room(
        &mut self,
        participants: Vec<Participant>,
        messages: Vec<Message>,
        times: Vec<SolveTime>,
        turn: Option<Turn>,
    ) {
        let (mut added_participants, mut added_messages) = (0usize, 0usize);
        for participant in participants {
            if self.participants.insert_new(participant) {
                added_participants += 1;
            }
        }
        for message in messages {
            if self.messages.insert_new(message) {
                added_messages += 1;
            }
        }
        tracing::trace!(
            added_participants,
            added_messages,
            times = times.len(),
            "Merged room snapshot"
        );

        self.times = times.into_iter().filter(|t| self.accepts(t)).collect();
        self.turn = turn;
        self.refresh();
        self.loading = false;
    }

    pub fn stop_loading(&mut self) {
        self.loading = false;
    }

    pub fn leave_room(&mut self) {
        *self = Self::new(self.config);
    }

    pub fn update_participant(&mut self, participant: Participant) {
        self.participants.upsert(participant);
        self.refresh_me();
        self.refresh_table();
    }

    pub fn delete_participant(&mut self, username: &str) {
        if self.participants.remove(username).is_some() {
            self.refresh_me();
            self.refresh_table();
        }
    }

    pub fn update_message(&mut self, message: Message) {
        self.messages.upsert(message);
    }

    pub fn delete_message(&mut self, id: u64) {
        self.messages.remove(id);
    }

    pub fn update_turn(&mut self, turn: Option<Turn>) {
        self.turn = turn;
    }

    /// Record a time, replacing any earlier one for the same user and turn.
    pub fn update_time(&mut self, time: SolveTime) {
        if !self.accepts(&time) {
            return;
        }
        if !self.participants.contains(&time.username) {
            tracing::trace!(username = %time.username, turn_no = time.turn_no, "Time for unknown participant");
        }
        self.times.retain(|t| !t.matches(&time.username, time.turn_no));
        self.times.push(time);
        self.refresh_table();
        self.refresh_stats();
    }

    pub fn load_timer(&mut self) {
        self.timer.load();
    }

    pub fn start_timer(&mut self) {
        self.start_timer_at(Utc::now());
    }

    pub fn start_timer_at(&mut self, now: DateTime<Utc>) {
        self.timer.start_at(now);
    }

    pub fn stop_timer(&mut self) {
        self.stop_timer_at(Utc::now());
    }

    pub fn stop_timer_at(&mut self, now: DateTime<Utc>) {
        self.timer.stop_at(now);
    }

    pub fn clear_timer(&mut self) {
        self.timer.clear();
        self.flag = Flag::Ok;
    }

    pub fn next_flag(&mut self) {
        self.flag = self.flag.next();
    }

    pub fn prev_flag(&mut self) {
        self.flag = self.flag.prev();
    }

    /// Apply an event, returning the new state.
    pub fn apply(&self, event: RoomEvent) -> Self {
        let mut next = self.clone();
        next.apply_mut(event);
        next
    }

    /// Apply an event in place.
    pub fn apply_mut(&mut self, event: RoomEvent) {
        use RoomEvent::*;

        match event {
            EnterRoom {
                room_slug,
                username,
            } => self.enter_room(room_slug, username),
            ResetRoom => self.reset_room(),
            UpdateRoom {
                participants,
                messages,
                times,
                turn,
            } => self.update_room(participants, messages, times, turn),
            StopLoading => self.stop_loading(),
            LeaveRoom => self.leave_room(),
            UpdateParticipant { participant } => self.update_participant(participant),
            DeleteParticipant { username } => self.delete_participant(&username),
            UpdateMessage { message } => self.update_message(message),
            DeleteMessage { id } => self.delete_message(id),
            UpdateTurn { turn } => self.update_turn(turn),
            UpdateTime { time } => self.update_time(time),
            LoadTimer => self.load_timer(),
            StartTimer => self.start_timer(),
            StopTimer => self.stop_timer(),
            ClearTimer => self.clear_timer(),
            NextFlag => self.next_flag(),
            PrevFlag => self.prev_flag(),
        }
    }

    fn accepts(&self, time: &SolveTime) -> bool {
        let accepted = self.config.accepts_turn(time.turn_no);
        if !accepted {
            tracing::warn!(
                username = %time.username,
                turn_no = time.turn_no,
                max_turns = self.config.max_turns,
                "Dropping time with out of range turn number"
            );
        }
        accepted
    }

    // Derived views

    fn refresh(&mut self) {
        self.refresh_me();
        self.refresh_table();
        self.refresh_stats();
    }

    fn refresh_me(&mut self) {
        self.me = self
            .username
            .as_deref()
            .and_then(|u| self.participants.get(u))
            .cloned();
    }

    fn refresh_table(&mut self) {
        self.table = ResultTable::build(&self.participants, &self.times, &self.config);
    }

    fn refresh_stats(&mut self) {
        self.stats = Stats::compute(
            &self.times,
            self.username.as_deref(),
            self.config.average_divisor,
        );
    }

    // Accessors

    pub fn room_slug(&self) -> Option<&str> {
        self.room_slug.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The local user's participant entry, if present in the room.
    pub fn me(&self) -> Option<&Participant> {
        self.me.as_ref()
    }

    pub fn participants(&self) -> &ParticipantList {
        &self.participants
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn times(&self) -> &[SolveTime] {
        &self.times
    }

    pub fn table(&self) -> &ResultTable {
        &self.table
    }

    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn flag(&self) -> Flag {
        self.flag
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Snapshot for rendering.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "room_slug": self.room_slug,
            "username": self.username,
            "loading": self.loading,
            "me": self.me.as_ref().map(|p| p.to_json()),
            "participants": self.participants.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            "messages": self.messages.iter().map(|m| m.to_json()).collect::<Vec<_>>(),
            "times": self.times.iter().map(|t| t.to_json()).collect::<Vec<_>>(),
            "table": self.table.to_json(),
            "turn": self.turn,
            "timer": self.timer.to_json(),
            "flag": self.flag.as_str(),
            "stats": self.stats.to_json()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::config::{AverageDivisor, RowOrder};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn joined(username: &str) -> RoomState {
        let mut state = RoomState::default();
        state.enter_room("cube-room", username);
        state
    }

    fn usernames(state: &RoomState) -> Vec<&str> {
        state.participants().iter().map(|p| p.username()).collect()
    }

    #[test]
    fn test_initial_state() {
        let state = RoomState::default();
        assert!(state.is_loading());
        assert_eq!(state.room_slug(), None);
        assert!(state.me().is_none());
        assert!(state.table().is_empty());
        assert_eq!(state.flag(), Flag::Ok);
    }

    #[test]
    fn test_first_solve_scenario() {
        let mut state = RoomState::default();
        state.enter_room("cube-room", "alice");
        state.update_room(vec![Participant::new("alice")], vec![], vec![], None);
        state.update_time(SolveTime::new("alice", 1, 9500));

        let table = state.table();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].cells, vec![Some(SolveTime::new("alice", 1, 9500))]);
        assert_eq!(state.stats().solves, 1);
        assert_eq!(state.stats().best, Some(9500));
        assert_eq!(state.stats().avg, Some(9500.0));
        assert_eq!(state.me().map(|p| p.username()), Some("alice"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_update_room_existing_entries_win() {
        let mut state = joined("alice");
        state.update_participant(Participant::new("bob"));
        state.update_message(Message::new(1, "original"));

        state.update_room(
            vec![Participant::spectator("bob"), Participant::new("carol")],
            vec![Message::new(1, "replayed"), Message::new(2, "new")],
            vec![],
            None,
        );

        assert_eq!(usernames(&state), vec!["bob", "carol"]);
        assert!(!state.participants().get("bob").unwrap().spectator);
        assert_eq!(state.messages().get(1).unwrap().text, "original");
        assert_eq!(state.messages().len(), 2);
    }

    #[test]
    fn test_update_room_replaces_times_and_turn() {
        let mut state = joined("alice");
        state.update_room(
            vec![Participant::new("alice")],
            vec![],
            vec![SolveTime::new("alice", 1, 10_000)],
            Some(Turn::new(2)),
        );
        state.update_room(
            vec![],
            vec![],
            vec![SolveTime::new("alice", 3, 12_000)],
            None,
        );

        assert_eq!(state.times(), &[SolveTime::new("alice", 3, 12_000)]);
        assert_eq!(state.turn(), None);
        assert_eq!(state.table().row_count(), 3);
        assert_eq!(state.stats().best, Some(12_000));
    }

    #[test]
    fn test_participant_upsert_delete_sequence() {
        let mut state = joined("alice");
        state.update_participant(Participant::new("alice"));
        state.update_participant(Participant::new("bob"));
        state.update_participant(Participant::spectator("alice"));
        state.delete_participant("bob");
        state.update_participant(Participant::new("carol"));
        state.delete_participant("nobody");

        assert_eq!(usernames(&state), vec!["alice", "carol"]);
        assert!(state.me().unwrap().spectator);
        assert_eq!(state.table().column_count(), 1);
    }

    #[test]
    fn test_me_follows_participants() {
        let mut state = joined("alice");
        assert!(state.me().is_none());

        state.update_participant(Participant::new("alice"));
        assert!(state.me().is_some());

        state.delete_participant("alice");
        assert!(state.me().is_none());
    }

    #[test]
    fn test_table_shape_tracks_mutations() {
        let mut state = joined("alice");
        state.update_participant(Participant::new("alice"));
        state.update_participant(Participant::spectator("carol"));
        state.update_participant(Participant::new("bob"));
        assert_eq!(state.table().row_count(), 0);
        assert_eq!(state.table().column_count(), 2);

        state.update_time(SolveTime::new("bob", 4, 15_000));
        assert_eq!(state.table().row_count(), 4);

        state.delete_participant("bob");
        assert_eq!(state.table().column_count(), 1);
        assert_eq!(state.table().row_count(), 4);
    }

    #[test]
    fn test_time_for_unknown_participant_is_tolerated() {
        let mut state = joined("alice");
        state.update_participant(Participant::new("alice"));
        state.update_time(SolveTime::new("ghost", 1, 7_000));

        assert_eq!(state.times().len(), 1);
        assert_eq!(state.table().rows[0].cells, vec![None]);
        assert_eq!(state.stats().solves, 0);
    }

    #[test]
    fn test_duplicate_time_counted_once() {
        let mut state = joined("alice");
        state.update_participant(Participant::new("alice"));
        state.update_time(SolveTime::new("alice", 1, 10_000));
        let once = state.clone();

        state.update_time(SolveTime::new("alice", 1, 10_000));
        assert_eq!(state, once);
        assert_eq!(state.stats().solves, 1);
    }

    #[test]
    fn test_corrected_time_replaces_previous() {
        let mut state = joined("alice");
        state.update_participant(Participant::new("alice"));
        state.update_time(SolveTime::new("alice", 1, 10_000));
        state.update_time(SolveTime::new("alice", 2, 12_000));
        state.update_time(SolveTime::new("alice", 1, 10_000).with_flag(Flag::Dnf));

        assert_eq!(state.times().len(), 2);
        assert_eq!(state.table().cell("alice", 1).unwrap().flag, Flag::Dnf);
        assert_eq!(state.stats().solves, 2);
        assert_eq!(state.stats().best, Some(12_000));
        assert_eq!(state.stats().avg, Some(12_000.0));
    }

    #[test]
    fn test_out_of_range_turns_are_dropped() {
        let mut state = RoomState::new(RoomConfig::new().with_max_turns(50));
        state.enter_room("cube-room", "alice");
        state.update_participant(Participant::new("alice"));

        state.update_time(SolveTime::new("alice", u32::MAX, 10_000));
        state.update_time(SolveTime::new("alice", 0, 10_000));
        assert!(state.times().is_empty());
        assert!(state.table().is_empty());
        assert_eq!(state.stats().solves, 0);

        state.update_room(
            vec![],
            vec![],
            vec![
                SolveTime::new("alice", 50, 9_000),
                SolveTime::new("alice", 51, 8_000),
            ],
            None,
        );
        assert_eq!(state.times(), &[SolveTime::new("alice", 50, 9_000)]);
        assert_eq!(state.table().row_count(), 50);
        assert_eq!(state.stats().best, Some(9_000));
    }

    #[test]
    fn test_huge_durations_do_not_overflow() {
        let mut state = joined("alice");
        state.update_time(SolveTime::new("alice", 1, u64::MAX));
        state.update_time(SolveTime::new("alice", 2, 1));

        assert_eq!(state.stats().solves, 2);
        assert_eq!(state.stats().best, Some(1));
        assert!(state.stats().avg.unwrap() > 9.0e18);
    }

    #[test]
    fn test_messages() {
        let mut state = joined("alice");
        state.update_message(Message::new(1, "hi"));
        state.update_message(Message::new(2, "hello"));
        state.update_message(Message::new(1, "hi!"));

        let ids: Vec<u64> = state.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let before = state.messages().clone();
        state.delete_message(99);
        assert_eq!(state.messages(), &before);

        state.delete_message(2);
        assert_eq!(state.messages().len(), 1);
    }

    #[test]
    fn test_reset_and_replay_is_idempotent() {
        let participants = vec![Participant::new("alice"), Participant::spectator("bob")];
        let messages = vec![Message::new(1, "gl"), Message::new(2, "hf")];
        let times = vec![
            SolveTime::new("alice", 1, 10_000),
            SolveTime::new("alice", 2, 11_000).with_flag(Flag::Plus2),
        ];

        let mut state = joined("alice");
        state.update_room(participants.clone(), messages.clone(), times.clone(), Some(Turn::new(3)));
        let first = state.clone();

        state.reset_room();
        assert!(state.is_loading());
        assert!(state.participants().is_empty());
        assert!(state.times().is_empty());

        state.update_room(participants, messages, times, Some(Turn::new(3)));
        assert_eq!(state, first);
    }

    #[test]
    fn test_leave_room() {
        let mut state = RoomState::new(RoomConfig::new().with_row_order(RowOrder::OldestFirst));
        state.enter_room("cube-room", "alice");
        state.update_room(
            vec![Participant::new("alice")],
            vec![Message::new(1, "bye")],
            vec![SolveTime::new("alice", 1, 10_000)],
            Some(Turn::new(1)),
        );
        state.next_flag();

        state.leave_room();
        assert_eq!(state, RoomState::new(*state.config()));
        assert_eq!(state.config().row_order, RowOrder::OldestFirst);
    }

    #[test]
    fn test_update_turn() {
        let mut state = joined("alice");
        state.update_turn(Some(Turn::new(1).with_scramble("R U R' U'")));
        assert_eq!(state.turn().unwrap().number, 1);

        state.update_turn(None);
        assert!(state.turn().is_none());
    }

    #[test]
    fn test_timer_and_flag() {
        let t0 = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut state = joined("alice");

        state.load_timer();
        assert!(state.timer().loaded);

        state.start_timer_at(t0);
        assert!(state.timer().state.is_running());
        assert!(!state.timer().loaded);

        state.next_flag();
        state.next_flag();
        assert_eq!(state.flag(), Flag::Dnf);
        state.prev_flag();
        assert_eq!(state.flag(), Flag::Plus2);

        state.stop_timer_at(t0 + chrono::Duration::milliseconds(9500));
        assert!(state.timer().state.is_paused());
        assert_eq!(
            state.timer().elapsed_at(t0).map(|d| d.num_milliseconds()),
            Some(9500)
        );

        state.clear_timer();
        assert!(state.timer().state.is_cleared());
        assert_eq!(state.timer().start, None);
        assert_eq!(state.flag(), Flag::Ok);
    }

    #[test]
    fn test_configured_divisor() {
        let config = RoomConfig::new().with_average_divisor(AverageDivisor::TotalEligible);
        let mut state = RoomState::new(config);
        state.enter_room("cube-room", "alice");
        for turn in 1..=6 {
            state.update_time(SolveTime::new("alice", turn, turn as u64 * 1_000));
        }
        assert_eq!(state.stats().avg5, Some(2_500.0));
    }

    #[test]
    fn test_apply_is_pure() {
        let state = joined("alice");
        let next = state.apply(RoomEvent::UpdateParticipant {
            participant: Participant::new("alice"),
        });

        assert!(state.participants().is_empty());
        assert_eq!(next.participants().len(), 1);
        assert!(next.me().is_some());
    }

    #[test]
    fn test_to_json() {
        let mut state = joined("alice");
        state.update_room(
            vec![Participant::new("alice")],
            vec![],
            vec![SolveTime::new("alice", 1, 9500)],
            None,
        );
        let json = state.to_json();

        assert_eq!(json["room_slug"], "cube-room");
        assert_eq!(json["me"]["username"], "alice");
        assert_eq!(json["table"]["rows"][0]["cells"][0]["time"], 9500);
        assert_eq!(json["stats"]["best"], 9500);
        assert_eq!(json["flag"], "OK");
    }
}
