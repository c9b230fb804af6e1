pub mod dictionary;
pub mod error;
pub mod participant;
pub mod scale;

pub use dictionary::{Codebook, DataType, DictionaryEntry};
pub use error::{EtlError, Result};
pub use participant::{ParticipantRecord, ParticipantRoster, ParticipantStatus};
pub use scale::{BipolarScale, MultiItemScale, ScaleItem};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_serializes() {
        let entry = DictionaryEntry::new("exercise", DataType::Categorical)
            .with_notes("0, Never | 1, Sometimes")
            .with_codebook(Codebook::parse("exercise", "0, Never | 1, Sometimes").unwrap());
        let json = serde_json::to_string(&entry).expect("serialize entry");
        let round: DictionaryEntry = serde_json::from_str(&json).expect("deserialize entry");
        assert_eq!(round.name, "exercise");
        assert_eq!(round.codebook.unwrap().label_for(0), Some("Never"));
    }
}
