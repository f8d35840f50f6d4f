//! Spaced-repetition scheduling over solved items.
//!
//! Pure functions only: the item snapshot and "now" come in, decisions come
//! out. Review submission returns an updated copy of the item for the
//! caller to persist; nothing here mutates shared state or reads a clock.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Confidence, Status, StudyItem};
use crate::roadmap::{current_phase, RoadmapPlan};

/// How many upcoming reviews the forecast shows by default.
pub const FORECAST_LIMIT: usize = 3;
/// How many items the phase-aware daily queue shows.
pub const DASHBOARD_LIMIT: usize = 5;
/// Score bonus that keeps every Weak item ahead of any non-Weak item.
pub const WEAK_PRIORITY_BOOST: i64 = 100;

/// A solved item whose review interval has elapsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueItem {
    pub item: StudyItem,
    pub elapsed_days: i64,
    pub score: i64,
}

/// A solved item that is not yet due, with the days remaining.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub item: StudyItem,
    pub days_until_due: i64,
}

/// Phase-aware queue for "what should I work on today".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusList {
    pub phase: u8,
    pub title: String,
    pub subtitle: String,
    pub items: Vec<StudyItem>,
}

/// Whole days since the last review, by raw timestamp subtraction.
/// `None` when the item has never been reviewed.
fn elapsed_days(item: &StudyItem, now: DateTime<Utc>) -> Option<i64> {
    item.last_reviewed_at
        .map(|last| now.signed_duration_since(last).num_days())
}

fn priority_score(item: &StudyItem, elapsed: i64) -> i64 {
    let boost = if item.confidence == Confidence::Weak {
        WEAK_PRIORITY_BOOST
    } else {
        0
    };
    boost + elapsed
}

/// The review queue: every solved item whose interval has elapsed, most
/// urgent first. Weak items always outrank non-Weak ones; within a tier the
/// most overdue item wins and ties keep the input order.
pub fn due_items(items: &[StudyItem], now: DateTime<Utc>) -> Vec<DueItem> {
    let mut due: Vec<DueItem> = items
        .iter()
        .filter(|item| item.status == Status::Solved)
        .filter_map(|item| {
            let elapsed = elapsed_days(item, now)?;
            if elapsed < item.confidence.review_interval_days() {
                return None;
            }
            Some(DueItem {
                elapsed_days: elapsed,
                score: priority_score(item, elapsed),
                item: item.clone(),
            })
        })
        .collect();
    // Stable sort, so equal scores preserve collection order
    due.sort_by(|a, b| b.score.cmp(&a.score));
    due
}

/// Solved items that are not yet due, soonest first, truncated to `limit`.
pub fn forecast(items: &[StudyItem], now: DateTime<Utc>, limit: usize) -> Vec<ForecastEntry> {
    let mut upcoming: Vec<ForecastEntry> = items
        .iter()
        .filter(|item| item.status == Status::Solved)
        .filter_map(|item| {
            let elapsed = elapsed_days(item, now)?;
            let interval = item.confidence.review_interval_days();
            if elapsed >= interval {
                return None;
            }
            Some(ForecastEntry {
                days_until_due: (interval - elapsed).max(1),
                item: item.clone(),
            })
        })
        .collect();
    upcoming.sort_by(|a, b| a.days_until_due.cmp(&b.days_until_due));
    upcoming.truncate(limit);
    upcoming
}

/// Record a self-rated review: the new rating replaces the old confidence
/// and the review clock restarts at `now`. Returns the updated item; the
/// input is untouched.
pub fn submit_review(item: &StudyItem, rating: Confidence, now: DateTime<Utc>) -> StudyItem {
    let mut updated = item.clone();
    updated.confidence = rating;
    updated.attempts += 1;
    updated.revision_count += 1;
    updated.last_reviewed_at = Some(now);
    updated
}

/// Apply a status transition. Moving to Solved stamps the review clock and
/// seeds a Medium confidence; other transitions leave both alone.
pub fn mark_status(item: &StudyItem, status: Status, now: DateTime<Utc>) -> StudyItem {
    let mut updated = item.clone();
    updated.status = status;
    if status == Status::Solved {
        updated.last_reviewed_at = Some(now);
        updated.confidence = Confidence::Medium;
    }
    updated
}

/// What to work on today, depending on where the month's plan stands.
///
/// Phase 1 surfaces the day's unsolved solve queue, phase 2 the Weak/Medium
/// revision set, phase 3 a polish set picked deterministically by the same
/// priority score the due queue uses.
pub fn phase_focus(
    items: &[StudyItem],
    plan: &RoadmapPlan,
    now: DateTime<Utc>,
    limit: usize,
) -> FocusList {
    let today = now.date_naive();
    let phase = current_phase(plan, today);

    match phase {
        1 => FocusList {
            phase,
            title: String::from("Phase 1: Solve Queue"),
            subtitle: String::from("First pass solving. Don't overthink."),
            items: items
                .iter()
                .filter(|item| {
                    item.scheduled_date == Some(today) && item.status != Status::Solved
                })
                .cloned()
                .collect(),
        },
        2 => {
            let mut revision: Vec<StudyItem> = items
                .iter()
                .filter(|item| {
                    item.status == Status::Solved
                        && matches!(item.confidence, Confidence::Weak | Confidence::Medium)
                })
                .cloned()
                .collect();
            // Weak before Medium, stable within each tier
            revision.sort_by_key(|item| item.confidence != Confidence::Weak);
            revision.truncate(limit);
            FocusList {
                phase,
                title: String::from("Phase 2: Pattern Revision"),
                subtitle: String::from("Focus on Weak/Medium problems. No peeking."),
                items: revision,
            }
        }
        _ => {
            let mut polish: Vec<StudyItem> = items
                .iter()
                .filter(|item| item.status == Status::Solved)
                .cloned()
                .collect();
            polish.sort_by_key(|item| {
                let elapsed = elapsed_days(item, now).unwrap_or(0);
                std::cmp::Reverse(priority_score(item, elapsed))
            });
            polish.truncate(limit);
            FocusList {
                phase,
                title: String::from("Phase 3: Final Polish"),
                subtitle: String::from("Mixed set. Timer on."),
                items: polish,
            }
        }
    }
}
