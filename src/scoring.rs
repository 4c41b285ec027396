/// Importance scoring for open tabs
use crate::tab_data::{BrowserTab, TabMetadata};

const MS_PER_HOUR: f64 = 3_600_000.0;
const MS_PER_MINUTE: f64 = 60_000.0;

const BASELINE: i32 = 50;
const ACTIVE_BONUS: i32 = 25;
const LAST_HOUR_BONUS: i32 = 20;
const LAST_SIX_HOURS_BONUS: i32 = 10;
const STALE_PENALTY: i32 = 20;

/// Score a tab from 0 to 100.
///
/// Rules, in order:
/// 1. Pinned tabs score 100 and nothing else is considered
/// 2. Start from 50
/// 3. The active tab gets +25
/// 4. Accessed under 1 hour ago: +20; under 6 hours: +10;
///    over 48 hours: -20. A tab with no access time counts as just used.
/// 5. Clamp to 0..=100
///
/// Stored interaction metadata is accepted but does not move the score.
pub fn importance_score(tab: &BrowserTab, _metadata: &TabMetadata, now_ms: f64) -> u8 {
    if tab.pinned {
        return 100;
    }

    let mut score = BASELINE;

    if tab.active {
        score += ACTIVE_BONUS;
    }

    let hours = hours_since(tab.last_accessed, now_ms);
    if hours < 1.0 {
        score += LAST_HOUR_BONUS;
    } else if hours < 6.0 {
        score += LAST_SIX_HOURS_BONUS;
    } else if hours > 48.0 {
        score -= STALE_PENALTY;
    }

    score.clamp(0, 100) as u8
}

fn hours_since(last_accessed: Option<f64>, now_ms: f64) -> f64 {
    last_accessed.map_or(0.0, |at| (now_ms - at) / MS_PER_HOUR)
}

/// Whether a tab has gone unused for longer than `threshold_minutes`.
/// Pinned and active tabs never count, nor do tabs with no access time.
pub fn is_inactive(
    pinned: bool,
    active: bool,
    last_accessed: Option<f64>,
    now_ms: f64,
    threshold_minutes: u32,
) -> bool {
    if pinned || active {
        return false;
    }
    last_accessed.is_some_and(|at| now_ms - at > f64::from(threshold_minutes) * MS_PER_MINUTE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HOUR_MS, NOW_MS};

    fn create_test_tab(pinned: bool, active: bool, hours_ago: Option<f64>) -> BrowserTab {
        BrowserTab {
            id: Some(1),
            url: Some("https://github.com".to_string()),
            title: Some("GitHub".to_string()),
            pinned,
            active,
            last_accessed: hours_ago.map(|h| NOW_MS - h * HOUR_MS),
            ..Default::default()
        }
    }

    fn score(pinned: bool, active: bool, hours_ago: Option<f64>) -> u8 {
        let tab = create_test_tab(pinned, active, hours_ago);
        importance_score(&tab, &TabMetadata::default(), NOW_MS)
    }

    #[test]
    fn test_pinned_always_scores_100() {
        for active in [false, true] {
            for hours in [None, Some(0.0), Some(3.0), Some(24.0), Some(500.0)] {
                assert_eq!(score(true, active, hours), 100);
            }
        }
    }

    #[test]
    fn test_active_and_recent() {
        assert_eq!(score(false, true, Some(0.5)), 95);
    }

    #[test]
    fn test_stale_inactive() {
        assert_eq!(score(false, false, Some(72.0)), 30);
    }

    #[test]
    fn test_recency_bands() {
        assert_eq!(score(false, false, Some(0.99)), 70);
        assert_eq!(score(false, false, Some(1.0)), 60);
        assert_eq!(score(false, false, Some(5.9)), 60);
        assert_eq!(score(false, false, Some(6.0)), 50);
        assert_eq!(score(false, false, Some(48.0)), 50);
        assert_eq!(score(false, false, Some(48.1)), 30);
    }

    #[test]
    fn test_active_bands() {
        assert_eq!(score(false, true, Some(3.0)), 85);
        assert_eq!(score(false, true, Some(12.0)), 75);
        assert_eq!(score(false, true, Some(100.0)), 55);
    }

    #[test]
    fn test_missing_last_accessed_counts_as_now() {
        assert_eq!(score(false, false, None), 70);
        assert_eq!(score(false, true, None), 95);
    }

    #[test]
    fn test_future_access_time_counts_as_recent() {
        assert_eq!(score(false, false, Some(-2.0)), 70);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        for active in [false, true] {
            for hours in [None, Some(-1000.0), Some(0.0), Some(2.0), Some(30.0), Some(1e9)] {
                let s = score(false, active, hours);
                assert!(s <= 100, "score {} out of range", s);
            }
        }
    }

    #[test]
    fn test_is_inactive() {
        let hour_ago = Some(NOW_MS - HOUR_MS);

        assert!(is_inactive(false, false, hour_ago, NOW_MS, 30));
        assert!(!is_inactive(false, false, hour_ago, NOW_MS, 90));
        assert!(!is_inactive(true, false, hour_ago, NOW_MS, 30));
        assert!(!is_inactive(false, true, hour_ago, NOW_MS, 30));
        assert!(!is_inactive(false, false, None, NOW_MS, 30));
    }
}
