//! Streak detection - maximal runs of consecutive breaching periods.

use crate::series::{BreachLabel, Streak};

/// Find every maximal run of consecutive breaches.
///
/// A run opens on a non-breach to breach transition (or a leading breach) and
/// closes on the next non-breach or at the end of the input. Runs are strictly
/// adjacent in the input; a single non-breach period always splits them.
/// Streaks come back in chronological order and an input without breaches
/// yields an empty vector.
pub fn detect(labels: &[BreachLabel]) -> Vec<Streak> {
    let mut streaks = Vec::new();
    let mut open: Option<Streak> = None;

    for label in labels {
        if !label.is_breach {
            streaks.extend(open.take());
            continue;
        }

        match open.as_mut() {
            Some(streak) => {
                streak.end = label.date;
                streak.length += 1;
            }
            None => {
                open = Some(Streak {
                    start: label.date,
                    end: label.date,
                    length: 1,
                });
            }
        }
    }
    streaks.extend(open);

    streaks
}

/// Length of the longest streak, `0` when there are none.
pub fn longest(streaks: &[Streak]) -> usize {
    streaks.iter().map(|s| s.length).max().unwrap_or(0)
}
