use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::Trip;

/// One-hot encoding of trip attendance.
///
/// `participants` is the sorted union of every trip's members; each row holds
/// one flag per participant, aligned by index, so all rows share the same
/// universe.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Membership {
    participants: Vec<String>,
    rows: Vec<MembershipRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipRow {
    pub trip_id: String,
    pub attended: Vec<bool>,
}

impl Membership {
    pub fn encode(trips: &[Trip]) -> Self {
        let participants: Vec<String> = trips
            .iter()
            .flat_map(|t| t.descriptor.members.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let rows = trips
            .iter()
            .map(|trip| MembershipRow {
                trip_id: trip.id.clone(),
                attended: participants
                    .iter()
                    .map(|p| trip.descriptor.members.contains(p))
                    .collect(),
            })
            .collect();

        Self { participants, rows }
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn rows(&self) -> &[MembershipRow] {
        &self.rows
    }

    /// Every participant paired with whether they attended `trip_id`.
    pub fn flags(&self, trip_id: &str) -> Option<Vec<(&str, bool)>> {
        let row = self.row(trip_id)?;
        Some(
            self.participants
                .iter()
                .map(String::as_str)
                .zip(row.attended.iter().copied())
                .collect(),
        )
    }

    /// `None` if either the trip or the person is unknown.
    pub fn attended(&self, trip_id: &str, person: &str) -> Option<bool> {
        let idx = self.participant_index(person)?;
        Some(self.row(trip_id)?.attended[idx])
    }

    /// Trip ids attended by `person`, in catalog order.
    pub fn trips_attended_by(&self, person: &str) -> Vec<&str> {
        let Some(idx) = self.participant_index(person) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|r| r.attended[idx])
            .map(|r| r.trip_id.as_str())
            .collect()
    }

    fn row(&self, trip_id: &str) -> Option<&MembershipRow> {
        self.rows.iter().find(|r| r.trip_id == trip_id)
    }

    fn participant_index(&self, person: &str) -> Option<usize> {
        self.participants
            .binary_search_by(|p| p.as_str().cmp(person))
            .ok()
    }
}
