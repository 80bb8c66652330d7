// Authoring-time checks for signal documents. Layout tolerates every issue
// reported here; the lint exists so content problems surface before render.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::GridConfig;
use crate::ir::CalendarSignal;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalIssue {
    #[error("signal #{index} ({label}) references day {day}, outside {first}..={last}")]
    DayOutOfRange {
        index: usize,
        label: String,
        day: i32,
        first: i32,
        last: i32,
    },

    #[error("day {day} carries {} signals (#{})", .indices.len(), join_indices(.indices))]
    DuplicateDay { day: i32, indices: Vec<usize> },

    #[error("signal #{index} has a non-finite bias")]
    NonFiniteBias { index: usize },

    #[error("signal #{index} on day {day} has an empty label")]
    EmptyLabel { index: usize, day: i32 },
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|idx| idx.to_string())
        .collect::<Vec<_>>()
        .join(", #")
}

pub fn lint_signals(signals: &[CalendarSignal], grid: &GridConfig) -> Vec<SignalIssue> {
    let first = grid.first_displayed_day;
    let last = grid.last_displayed_day();
    let mut issues = Vec::new();
    let mut by_day: BTreeMap<i32, Vec<usize>> = BTreeMap::new();

    for (index, signal) in signals.iter().enumerate() {
        if signal.day < first || signal.day > last {
            issues.push(SignalIssue::DayOutOfRange {
                index,
                label: signal.label.clone(),
                day: signal.day,
                first,
                last,
            });
        } else {
            by_day.entry(signal.day).or_default().push(index);
        }
        if !signal.bias_x.is_finite() || !signal.bias_y.is_finite() {
            issues.push(SignalIssue::NonFiniteBias { index });
        }
        if signal.label.trim().is_empty() {
            issues.push(SignalIssue::EmptyLabel {
                index,
                day: signal.day,
            });
        }
    }

    for (day, indices) in by_day {
        if indices.len() > 1 {
            issues.push(SignalIssue::DuplicateDay { day, indices });
        }
    }

    issues
}
