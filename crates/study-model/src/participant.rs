//! Participant metadata: study window dates and enrollment status.

use chrono::NaiveDate;

/// Enrollment status as reported in the participant metadata export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantStatus {
    Active,
    Completed,
    Withdrew,
    /// Missing or unrecognized status text.
    Unknown,
}

impl ParticipantStatus {
    /// Fold raw status text into the typed form. Missing and unrecognized
    /// values both map to `Unknown`; the cropper treats them alike.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            "withdrew" => Self::Withdrew,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Withdrew => "withdrew",
            Self::Unknown => "unknown",
        }
    }
}

/// One participant's study-window metadata.
#[derive(Debug, Clone)]
pub struct ParticipantRecord {
    pub id: String,
    pub intervention_start: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ParticipantStatus,
    pub participant_type: Option<String>,
}

impl ParticipantRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            intervention_start: None,
            end_date: None,
            status: ParticipantStatus::Unknown,
            participant_type: None,
        }
    }
}

/// Ordered collection of participant records with by-id lookup.
#[derive(Debug, Clone, Default)]
pub struct ParticipantRoster {
    records: Vec<ParticipantRecord>,
}

impl ParticipantRoster {
    pub fn new(records: Vec<ParticipantRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: &str) -> Option<&ParticipantRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Records matching the given participant type (e.g. the `"full"` arm).
    pub fn of_type(&self, participant_type: &str) -> Self {
        let records = self
            .records
            .iter()
            .filter(|record| {
                record
                    .participant_type
                    .as_deref()
                    .is_some_and(|t| t.eq_ignore_ascii_case(participant_type))
            })
            .cloned()
            .collect();
        Self { records }
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|record| record.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_folds_unknown() {
        assert_eq!(ParticipantStatus::from_raw("withdrew"), ParticipantStatus::Withdrew);
        assert_eq!(ParticipantStatus::from_raw("Completed"), ParticipantStatus::Completed);
        assert_eq!(ParticipantStatus::from_raw(""), ParticipantStatus::Unknown);
        assert_eq!(ParticipantStatus::from_raw("nan"), ParticipantStatus::Unknown);
    }

    #[test]
    fn roster_filters_by_type() {
        let mut full = ParticipantRecord::new("105");
        full.participant_type = Some("full".to_string());
        let mut pilot = ParticipantRecord::new("12");
        pilot.participant_type = Some("pilot".to_string());
        let roster = ParticipantRoster::new(vec![full, pilot]);
        let filtered = roster.of_type("full");
        assert_eq!(filtered.ids(), vec!["105"]);
    }
}
