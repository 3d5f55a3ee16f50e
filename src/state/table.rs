//! Result table: one row per turn, one column per solver.

use serde::Serialize;

use super::config::{RoomConfig, RowOrder};
use super::participant::{Participant, ParticipantList};
use super::solve::SolveTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub turn_no: u32,

    /// One cell per table column
    pub cells: Vec<Option<SolveTime>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultTable {
    /// Non-spectator participants in list order
    pub columns: Vec<Participant>,
    pub rows: Vec<TableRow>,
}

impl ResultTable {
    /// Build the table from scratch.
    ///
    /// Rows cover turns 1 up to the highest turn seen in `times`, including
    /// turns nobody solved, and never go past `config.max_turns`. Times of
    /// users without a column are ignored. If several times share a
    /// (user, turn) pair, the first one wins.
    pub fn build(participants: &ParticipantList, times: &[SolveTime], config: &RoomConfig) -> Self {
        let columns: Vec<Participant> = participants.solvers().cloned().collect();
        let max_turn = times
            .iter()
            .map(|t| t.turn_no)
            .filter(|turn_no| config.accepts_turn(*turn_no))
            .max()
            .unwrap_or(0);

        let mut rows: Vec<TableRow> = (1..=max_turn)
            .map(|turn_no| TableRow {
                turn_no,
                cells: columns
                    .iter()
                    .map(|p| times.iter().find(|t| t.matches(p.username(), turn_no)).cloned())
                    .collect(),
            })
            .collect();

        if config.row_order == RowOrder::NewestFirst {
            rows.reverse();
        }

        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, turn_no: u32) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.turn_no == turn_no)
    }

    /// Cell for a participant and turn, if both exist and a time was recorded.
    pub fn cell(&self, username: &str, turn_no: u32) -> Option<&SolveTime> {
        let column = self.columns.iter().position(|p| p.username() == username)?;
        self.row(turn_no)?.cells.get(column)?.as_ref()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let columns: Vec<&str> = self.columns.iter().map(|p| p.username()).collect();
        let rows: Vec<serde_json::Value> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<serde_json::Value> = row
                    .cells
                    .iter()
                    .map(|c| c.as_ref().map_or(serde_json::Value::Null, |t| t.to_json()))
                    .collect();
                serde_json::json!({ "turn_no": row.turn_no, "cells": cells })
            })
            .collect();

        serde_json::json!({ "columns": columns, "rows": rows })
    }
}
