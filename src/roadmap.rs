//! Monthly roadmap planning: splits a study month into three phases
//! (solve, revise, polish) with buffer days and a daily throughput target.
//!
//! Everything here is pure. The caller supplies the month and the item
//! count; the same inputs always produce the same plan.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::MonthId;

/// Buffer days in a 28-day February.
pub const SHORT_MONTH_BUFFER_DAYS: i64 = 1;
/// Buffer days in every other month.
pub const DEFAULT_BUFFER_DAYS: i64 = 2;
/// Days reserved for pattern revision (phase 2) in a normal month.
pub const PHASE2_FIXED_DAYS: i64 = 4;
/// Days reserved for final polish (phase 3) in a normal month.
pub const PHASE3_FIXED_DAYS: i64 = 2;
/// Above this many items the buffer shrinks regardless of month length.
pub const HIGH_LOAD_THRESHOLD: usize = 100;
/// Buffer days in a high-load month.
pub const HIGH_LOAD_BUFFER_DAYS: i64 = 1;
/// Weekday throughput as a fraction of the raw per-day rate.
pub const WEEKDAY_FACTOR: f64 = 0.9;
/// Weekend throughput relative to a weekday.
pub const WEEKEND_FACTOR: f64 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCapacity {
    pub weekday: u32,
    pub weekend: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseConfig {
    pub id: u8,
    pub name: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    /// Allocated working days. Phase 3's date range additionally absorbs
    /// the buffer days, so its range can be longer than its duration.
    pub duration: i64,
    pub focus: String,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapPlan {
    pub month: MonthId,
    pub total_days: i64,
    pub buffer_days: i64,
    pub working_days: i64,
    pub daily_capacity: DailyCapacity,
    /// Exactly three phases, ids 1-3, contiguous and ordered.
    pub phases: [PhaseConfig; 3],
}

/// Build the roadmap for one month.
///
/// Total over all inputs: a zero item count is coerced to 1 and months too
/// short for the fixed phase lengths shrink every phase to a 1-day floor
/// instead of underflowing.
pub fn compute_plan(month: MonthId, item_count: usize) -> RoadmapPlan {
    let total_days = i64::from(month.days_in_month());
    let item_count = item_count.max(1);

    // 28-day February gets less slack; heavy months trade buffer for
    // solving time regardless of length.
    let mut buffer_days = if total_days == 28 {
        SHORT_MONTH_BUFFER_DAYS
    } else {
        DEFAULT_BUFFER_DAYS
    };
    if item_count > HIGH_LOAD_THRESHOLD {
        buffer_days = HIGH_LOAD_BUFFER_DAYS;
    }
    let working_days = total_days - buffer_days;

    let (phase2_days, phase3_days) = if working_days <= PHASE2_FIXED_DAYS + PHASE3_FIXED_DAYS {
        // Minimum-viable cycle
        (1, 1)
    } else {
        (PHASE2_FIXED_DAYS, PHASE3_FIXED_DAYS)
    };
    let phase1_days = (working_days - phase2_days - phase3_days).max(1);

    let start = month.first_day();
    let phase1_end = start + Duration::days(phase1_days - 1);
    let phase2_start = phase1_end + Duration::days(1);
    let phase2_end = phase2_start + Duration::days(phase2_days - 1);
    let phase3_start = phase2_end + Duration::days(1);
    // Phase 3 runs through the literal end of the month, absorbing the
    // buffer days rather than leaving an unassigned tail.
    let phase3_end = month.last_day();

    let base_rate = (item_count as f64 / phase1_days as f64).ceil();
    let weekday = ((base_rate * WEEKDAY_FACTOR).floor() as u32).max(1);
    let weekend = (f64::from(weekday) * WEEKEND_FACTOR).ceil() as u32;

    RoadmapPlan {
        month,
        total_days,
        buffer_days,
        working_days,
        daily_capacity: DailyCapacity { weekday, weekend },
        phases: [
            PhaseConfig {
                id: 1,
                name: String::from("First Pass (Solving)"),
                start_date: start,
                end_date: phase1_end,
                duration: phase1_days,
                focus: String::from("Solve all questions. Don't overthink."),
                goal: String::from("Attempt 100% of questions."),
            },
            PhaseConfig {
                id: 2,
                name: String::from("Pattern Revision"),
                start_date: phase2_start,
                end_date: phase2_end,
                duration: phase2_days,
                focus: String::from("Revise Weak/Medium by pattern."),
                goal: String::from("Convert Weak -> Medium/Strong."),
            },
            PhaseConfig {
                id: 3,
                name: String::from("Final Polish"),
                start_date: phase3_start,
                end_date: phase3_end,
                duration: phase3_days,
                focus: String::from("Mixed sets & Mock interviews."),
                goal: String::from("Speed & Confidence Lock-in."),
            },
        ],
    }
}

/// Which phase a given date falls in.
///
/// Total for any date: before the cycle starts the answer is phase 1,
/// after it ends the cycle is considered complete and stays in phase 3.
pub fn current_phase(plan: &RoadmapPlan, today: NaiveDate) -> u8 {
    for phase in &plan.phases {
        if today >= phase.start_date && today <= phase.end_date {
            return phase.id;
        }
    }
    if today > plan.phases[2].end_date {
        3
    } else {
        1
    }
}
