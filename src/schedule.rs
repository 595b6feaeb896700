//! Schedule synthesis
//!
//! Deterministically converts provider task items into concrete calendar
//! entries anchored at local midnight of the current day. Pure and total:
//! every branch has a defined fallback, so this stage cannot fail.

use crate::models::{RawPlannedItem, ScheduledTask};
use chrono::Local;
use tracing::{debug, warn};

pub const MS_PER_HOUR: i64 = 60 * 60 * 1000;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Fallback spans applied when an item carries unusable timing information.
///
/// The defaults (one-day span for a bad offset pair, one-hour duration for an
/// item with no timing at all) are policy, not derived from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SchedulePolicy {
    /// Span given to an item whose offset pair is invalid.
    pub fallback_span_ms: i64,
    /// Duration given to an item with no usable timing at all.
    pub default_duration_ms: i64,
}

impl Default for SchedulePolicy {
    fn default() -> Self {
        Self {
            fallback_span_ms: MS_PER_DAY,
            default_duration_ms: MS_PER_HOUR,
        }
    }
}

/// Midnight (00:00:00.000) of the current local day, in epoch milliseconds.
/// This is the anchor for all offset computations.
pub fn today_zero() -> i64 {
    let midnight = Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time of day");
    midnight
        .and_local_timezone(Local)
        .earliest()
        // Zones that skip midnight on a DST transition fall back to UTC anchoring.
        .map_or_else(|| midnight.and_utc().timestamp_millis(), |dt| dt.timestamp_millis())
}

/// Convert an ordered sequence of task items into schedule entries.
///
/// Processing is a single ordered pass carrying one piece of running state,
/// the `cursor` at which the next duration-only item starts:
///
/// - blank-named items are skipped outright and leave the cursor untouched
/// - an explicit offset pair maps to full calendar days (invalid pairs are
///   clamped to a fallback span, never rejected) and is independent of the
///   cursor chain
/// - a positive duration packs sequentially at the cursor, which advances to
///   the item's end so consecutive duration-only items neither overlap nor
///   leave gaps
/// - anything else becomes a default-duration task at the cursor
///
/// The emitted list is sorted ascending by start instant; this deliberately
/// reorders explicit-date items that fall before earlier chain items.
pub fn synthesize(items: &[RawPlannedItem], today_zero_ms: i64, policy: SchedulePolicy) -> Vec<ScheduledTask> {
    let mut tasks = Vec::with_capacity(items.len());
    let mut cursor = today_zero_ms;

    for item in items {
        if item.task_name.trim().is_empty() {
            debug!("Skipping task item with blank name");
            continue;
        }

        let (start_time, end_time) = match (item.start_date_offset_days, item.end_date_offset_days) {
            // Offset pair present; takes precedence over any duration field.
            (Some(start_offset), Some(end_offset)) => {
                if start_offset < 0 || end_offset < start_offset {
                    warn!(
                        task = %item.task_name,
                        start_offset,
                        end_offset,
                        "Invalid date offsets, falling back to a one-day span"
                    );
                    let start = today_zero_ms
                        .saturating_add(i64::from(start_offset.max(0)) * MS_PER_DAY);
                    (start, start.saturating_add(policy.fallback_span_ms - 1))
                } else {
                    let start = today_zero_ms.saturating_add(i64::from(start_offset) * MS_PER_DAY);
                    // Last millisecond of the end day (23:59:59.999).
                    let mut end = today_zero_ms
                        .saturating_add(i64::from(end_offset) * MS_PER_DAY)
                        .saturating_add(MS_PER_DAY - 1);
                    if end < start {
                        end = start.saturating_add(policy.fallback_span_ms - 1);
                    }
                    (start, end)
                }
                // Explicit-date items do not advance the cursor.
            }
            // Duration-only: pack sequentially at the cursor.
            _ => match item.duration_hours {
                Some(hours) if hours > 0 => {
                    let start = cursor;
                    let end = start.saturating_add(i64::from(hours) * MS_PER_HOUR);
                    cursor = end;
                    (start, end)
                }
                // No usable timing information at all.
                _ => {
                    let start = cursor;
                    let end = start.saturating_add(policy.default_duration_ms);
                    cursor = end;
                    (start, end)
                }
            },
        };

        tasks.push(ScheduledTask::new(item.task_name.clone(), start_time, end_time));
    }

    tasks.sort_by_key(|t| t.start_time);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    // Arbitrary midnight-like anchor; synthesis only does arithmetic on it.
    const T0: i64 = 1_700_000_000_000;

    fn item(
        name: &str,
        start_offset: Option<i32>,
        end_offset: Option<i32>,
        duration: Option<i32>,
    ) -> RawPlannedItem {
        RawPlannedItem {
            task_name: name.to_string(),
            start_date_offset_days: start_offset,
            end_date_offset_days: end_offset,
            duration_hours: duration,
        }
    }

    #[test]
    fn test_one_task_per_named_item() {
        let items = vec![
            item("a", None, None, Some(2)),
            item("b", Some(0), Some(0), None),
            item("c", None, None, None),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn test_blank_name_skipped_without_touching_cursor() {
        let items = vec![
            item("   ", None, None, Some(5)),
            item("", None, None, None),
            item("real work", None, None, Some(2)),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "real work");
        // The skipped 5-hour item must not have advanced the cursor.
        assert_eq!(tasks[0].start_time, T0);
        assert_eq!(tasks[0].end_time, T0 + 2 * MS_PER_HOUR);
    }

    #[test]
    fn test_sequential_packing() {
        let items = vec![
            item("first", None, None, Some(4)),
            item("second", None, None, Some(2)),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks[0].start_time, T0);
        assert_eq!(tasks[0].end_time, T0 + 4 * MS_PER_HOUR);
        // No overlap, no gap: the second starts exactly where the first ends.
        assert_eq!(tasks[1].start_time, tasks[0].end_time);
        assert_eq!(tasks[1].end_time, tasks[1].start_time + 2 * MS_PER_HOUR);
    }

    #[test]
    fn test_invalid_offsets_fall_back_to_one_day() {
        let items = vec![item("inverted", Some(5), Some(2), None)];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks[0].start_time, T0 + 5 * MS_PER_DAY);
        assert_eq!(tasks[0].end_time, T0 + 5 * MS_PER_DAY + MS_PER_DAY - 1);
    }

    #[test]
    fn test_negative_start_offset_clamped_to_today() {
        let items = vec![item("past", Some(-3), Some(4), None)];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        // Negative start makes the pair invalid: clamp to today, one-day span.
        assert_eq!(tasks[0].start_time, T0);
        assert_eq!(tasks[0].end_time, T0 + MS_PER_DAY - 1);
    }

    #[test]
    fn test_explicit_offsets_normal_case() {
        let items = vec![item("two days", Some(0), Some(1), None)];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks[0].start_time, T0);
        // Ends at the last millisecond of day 1: 23:59:59.999.
        assert_eq!(tasks[0].end_time, T0 + 2 * MS_PER_DAY - 1);
    }

    #[test]
    fn test_missing_timing_defaults_to_one_hour() {
        let items = vec![
            item("untimed", None, None, None),
            item("next", None, None, None),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks[0].start_time, T0);
        assert_eq!(tasks[0].end_time, T0 + MS_PER_HOUR);
        assert_eq!(tasks[1].start_time, T0 + MS_PER_HOUR);
    }

    #[test]
    fn test_non_positive_duration_defaults_to_one_hour() {
        let items = vec![item("zero", None, None, Some(0))];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks[0].span_ms(), MS_PER_HOUR);
    }

    #[test]
    fn test_explicit_dates_do_not_advance_cursor() {
        let items = vec![
            item("chain 1", None, None, Some(2)),
            item("dated", Some(3), Some(4), None),
            item("chain 2", None, None, Some(1)),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        let chain2 = tasks.iter().find(|t| t.name == "chain 2").unwrap();
        // chain 2 starts where chain 1 ended, unaffected by the dated task.
        assert_eq!(chain2.start_time, T0 + 2 * MS_PER_HOUR);
    }

    #[test]
    fn test_offset_pair_takes_precedence_over_duration() {
        let items = vec![
            item("both", Some(1), Some(1), Some(8)),
            item("chain", None, None, Some(1)),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        let both = tasks.iter().find(|t| t.name == "both").unwrap();
        assert_eq!(both.start_time, T0 + MS_PER_DAY);
        assert_eq!(both.end_time, T0 + 2 * MS_PER_DAY - 1);
        // And the cursor chain was not consumed by the dated item.
        let chain = tasks.iter().find(|t| t.name == "chain").unwrap();
        assert_eq!(chain.start_time, T0);
    }

    #[test]
    fn test_output_sorted_by_start_instant() {
        let items = vec![
            item("late chain", None, None, Some(30)),
            item("early date", Some(0), Some(0), None),
            item("tomorrow", Some(1), Some(1), None),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        let starts: Vec<i64> = tasks.iter().map(|t| t.start_time).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(tasks[0].name, "early date");
    }

    #[test]
    fn test_end_never_precedes_start() {
        let items = vec![
            item("a", Some(5), Some(2), None),
            item("b", Some(-1), Some(-9), None),
            item("c", None, None, Some(3)),
            item("d", None, None, Some(-7)),
            item("e", Some(0), Some(0), None),
        ];
        for task in synthesize(&items, T0, SchedulePolicy::default()) {
            assert!(task.end_time >= task.start_time, "task {} inverted", task.name);
        }
    }

    #[test]
    fn test_policy_overrides_fallback_spans() {
        let policy = SchedulePolicy {
            fallback_span_ms: 2 * MS_PER_DAY,
            default_duration_ms: 30 * 60 * 1000,
        };
        let items = vec![
            item("bad pair", Some(3), Some(1), None),
            item("untimed", None, None, None),
        ];
        let tasks = synthesize(&items, T0, policy);
        let bad = tasks.iter().find(|t| t.name == "bad pair").unwrap();
        assert_eq!(bad.span_ms(), 2 * MS_PER_DAY - 1);
        let untimed = tasks.iter().find(|t| t.name == "untimed").unwrap();
        assert_eq!(untimed.span_ms(), 30 * 60 * 1000);
    }

    #[test]
    fn test_extreme_offsets_saturate_without_panicking() {
        // Provider-controlled values at the 32-bit limits must still yield a
        // schedule honoring end >= start, in debug builds included.
        let items = vec![
            item("far future", Some(i32::MAX), Some(i32::MAX), None),
            item("inverted extremes", Some(i32::MAX), Some(i32::MIN), None),
            item("clamped past", Some(i32::MIN), Some(i32::MAX), None),
        ];
        let tasks = synthesize(&items, T0, SchedulePolicy::default());
        assert_eq!(tasks.len(), 3);
        for task in &tasks {
            assert!(task.end_time >= task.start_time, "task {} inverted", task.name);
        }
    }

    #[test]
    fn test_extreme_durations_saturate_without_panicking() {
        let items = vec![
            item("marathon", None, None, Some(i32::MAX)),
            item("after marathon", None, None, Some(i32::MAX)),
        ];
        // Anchor near the representable limit to force the cursor chain to
        // saturate rather than wrap.
        let anchor = i64::MAX - MS_PER_HOUR;
        let tasks = synthesize(&items, anchor, SchedulePolicy::default());
        assert_eq!(tasks.len(), 2);
        for task in &tasks {
            assert!(task.end_time >= task.start_time, "task {} inverted", task.name);
        }
        assert_eq!(tasks[1].end_time, i64::MAX);
    }

    #[test]
    fn test_empty_input_yields_empty_schedule() {
        let tasks = synthesize(&[], T0, SchedulePolicy::default());
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_today_zero_is_midnight_aligned() {
        use chrono::{Local, TimeZone, Timelike};
        let anchor = today_zero();
        let dt = Local.timestamp_millis_opt(anchor).unwrap();
        assert_eq!(dt.num_seconds_from_midnight(), 0);
        assert_eq!(dt.timestamp_subsec_millis(), 0);
    }
}
