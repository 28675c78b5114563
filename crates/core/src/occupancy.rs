//! Occupancy projection over the booking ledger.
//!
//! The ledger is append-only; a lot's occupancy is never stored. For every
//! spot in `1..=capacity` the entry with the greatest timestamp decides the
//! spot's state: it is occupied iff that entry still holds the spot
//! (status `Parked`). Spots without any entry are free.
//!
//! The database hands the projector one observation per spot (the result of
//! a `DISTINCT ON` query), but [`latest_per_spot`] accepts any number of
//! observations so the same rule applies to raw history as well.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::booking::holds_spot;
use crate::types::{DbId, SpotNumber, Timestamp};

/// One ledger entry reduced to the fields the projection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotObservation {
    pub entry_id: DbId,
    pub spot_id: SpotNumber,
    pub status_id: i16,
    pub recorded_at: Timestamp,
}

/// Reduce observations to the latest one per spot.
///
/// Ordering is by `recorded_at`, ties broken by the higher `entry_id` (the
/// later insert). Observations outside `1..=capacity` are ignored.
pub fn latest_per_spot<I>(capacity: i32, observations: I) -> BTreeMap<SpotNumber, SpotObservation>
where
    I: IntoIterator<Item = SpotObservation>,
{
    let mut latest: BTreeMap<SpotNumber, SpotObservation> = BTreeMap::new();

    for obs in observations {
        if obs.spot_id < 1 || obs.spot_id > capacity {
            continue;
        }
        match latest.get(&obs.spot_id) {
            Some(current) if (current.recorded_at, current.entry_id) >= (obs.recorded_at, obs.entry_id) => {}
            _ => {
                latest.insert(obs.spot_id, obs);
            }
        }
    }

    latest
}

/// Spot numbers whose latest observation still holds the spot.
pub fn occupied_spots<I>(capacity: i32, observations: I) -> BTreeSet<SpotNumber>
where
    I: IntoIterator<Item = SpotObservation>,
{
    latest_per_spot(capacity, observations)
        .into_values()
        .filter(|obs| holds_spot(obs.status_id))
        .map(|obs| obs.spot_id)
        .collect()
}

/// Lowest spot number in `1..=capacity` that is not occupied.
///
/// Deterministic for a fixed occupied set; `None` when the lot is full.
pub fn first_free_spot(capacity: i32, occupied: &BTreeSet<SpotNumber>) -> Option<SpotNumber> {
    (1..=capacity).find(|spot| !occupied.contains(spot))
}

/// Availability of a single spot in a spot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpotAvailability {
    Available,
    Occupied,
}

/// One row of a lot's spot map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpotState {
    pub spot_id: SpotNumber,
    pub status: SpotAvailability,
}

/// Point-in-time occupancy of one lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    pub capacity: i32,
    pub occupied: BTreeSet<SpotNumber>,
}

impl OccupancySnapshot {
    /// Project a snapshot from ledger observations.
    pub fn project<I>(capacity: i32, observations: I) -> Self
    where
        I: IntoIterator<Item = SpotObservation>,
    {
        Self {
            capacity,
            occupied: occupied_spots(capacity, observations),
        }
    }

    pub fn occupied_count(&self) -> i32 {
        self.occupied.len() as i32
    }

    pub fn available_count(&self) -> i32 {
        (self.capacity - self.occupied_count()).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.available_count() == 0
    }

    /// Occupied share of capacity in percent, rounded to one decimal.
    pub fn occupancy_rate(&self) -> f64 {
        if self.capacity <= 0 {
            return 0.0;
        }
        let rate = f64::from(self.occupied_count()) / f64::from(self.capacity) * 100.0;
        (rate * 10.0).round() / 10.0
    }

    /// The next spot the allocator would hand out.
    pub fn first_free_spot(&self) -> Option<SpotNumber> {
        first_free_spot(self.capacity, &self.occupied)
    }

    /// Per-spot availability in ascending spot order.
    pub fn spot_states(&self) -> Vec<SpotState> {
        (1..=self.capacity)
            .map(|spot_id| SpotState {
                spot_id,
                status: if self.occupied.contains(&spot_id) {
                    SpotAvailability::Occupied
                } else {
                    SpotAvailability::Available
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::booking::{STATUS_COMPLETED, STATUS_EXPIRED, STATUS_PARKED};

    fn obs(entry_id: DbId, spot_id: SpotNumber, status_id: i16, minute: i64) -> SpotObservation {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        SpotObservation {
            entry_id,
            spot_id,
            status_id,
            recorded_at: base + Duration::minutes(minute),
        }
    }

    #[test]
    fn empty_ledger_means_all_free() {
        let snapshot = OccupancySnapshot::project(3, Vec::new());
        assert!(snapshot.occupied.is_empty());
        assert_eq!(snapshot.available_count(), 3);
        assert_eq!(snapshot.first_free_spot(), Some(1));
    }

    #[test]
    fn latest_entry_decides_spot_state() {
        let history = vec![
            obs(1, 1, STATUS_COMPLETED, 0),
            obs(2, 1, STATUS_PARKED, 10),
            obs(3, 2, STATUS_PARKED, 5),
            obs(4, 2, STATUS_COMPLETED, 20),
        ];
        let occupied = occupied_spots(4, history);
        assert_eq!(occupied, BTreeSet::from([1]));
    }

    #[test]
    fn timestamp_ties_break_on_entry_id() {
        let history = vec![obs(7, 1, STATUS_COMPLETED, 0), obs(8, 1, STATUS_PARKED, 0)];
        let latest = latest_per_spot(1, history);
        assert_eq!(latest[&1].entry_id, 8);
    }

    #[test]
    fn expired_counts_as_free() {
        let snapshot = OccupancySnapshot::project(2, vec![obs(1, 1, STATUS_EXPIRED, 0)]);
        assert!(snapshot.occupied.is_empty());
        assert_eq!(snapshot.first_free_spot(), Some(1));
    }

    #[test]
    fn observations_outside_capacity_are_ignored() {
        let snapshot = OccupancySnapshot::project(
            2,
            vec![obs(1, 0, STATUS_PARKED, 0), obs(2, 3, STATUS_PARKED, 0)],
        );
        assert_eq!(snapshot.occupied_count(), 0);
    }

    #[test]
    fn first_free_spot_picks_lowest_gap() {
        let occupied = BTreeSet::from([1, 2, 4]);
        assert_eq!(first_free_spot(5, &occupied), Some(3));
    }

    #[test]
    fn first_free_spot_none_when_full() {
        let occupied = BTreeSet::from([1, 2]);
        assert_eq!(first_free_spot(2, &occupied), None);
    }

    #[test]
    fn allocation_order_is_ascending() {
        let mut occupied = BTreeSet::new();
        for expected in 1..=4 {
            let spot = first_free_spot(4, &occupied).unwrap();
            assert_eq!(spot, expected);
            occupied.insert(spot);
        }
        assert_eq!(first_free_spot(4, &occupied), None);
    }

    #[test]
    fn occupancy_rate_rounds_to_one_decimal() {
        let snapshot = OccupancySnapshot {
            capacity: 3,
            occupied: BTreeSet::from([2]),
        };
        assert_eq!(snapshot.occupancy_rate(), 33.3);
    }

    #[test]
    fn spot_states_cover_every_spot() {
        let snapshot = OccupancySnapshot {
            capacity: 3,
            occupied: BTreeSet::from([2]),
        };
        let states = snapshot.spot_states();
        assert_eq!(states.len(), 3);
        assert_eq!(states[0].status, SpotAvailability::Available);
        assert_eq!(states[1].status, SpotAvailability::Occupied);
        assert_eq!(states[2].spot_id, 3);
    }
}
