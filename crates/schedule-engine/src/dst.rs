//! DST transition policies for localizing schedule times.

use chrono::{DateTime, Duration};
use chrono_tz::{OffsetComponents, Tz};
use serde::{Deserialize, Serialize};

/// Which reading of a repeated local time (the fall-back hour) to keep.
///
/// Local times that do not exist (the spring-forward gap) are not governed by
/// this policy; they are always shifted forward to the first valid time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Keep the standard-time reading (the second occurrence).
    #[default]
    PreferStandard,
    /// Keep the daylight-time reading (the first occurrence).
    PreferDaylight,
}

impl DstPolicy {
    /// Pick one of the two instants chrono reports for an ambiguous local time.
    /// `earlier` and `later` are in chronological order.
    pub fn choose(self, earlier: DateTime<Tz>, later: DateTime<Tz>) -> DateTime<Tz> {
        let is_standard = |dt: &DateTime<Tz>| dt.offset().dst_offset() == Duration::zero();
        match self {
            DstPolicy::PreferStandard => [later, earlier]
                .into_iter()
                .find(is_standard)
                .unwrap_or(later),
            DstPolicy::PreferDaylight => [earlier, later]
                .into_iter()
                .find(|dt| !is_standard(dt))
                .unwrap_or(earlier),
        }
    }
}
