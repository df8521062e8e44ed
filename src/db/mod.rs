//! Database layer (Firestore).

pub mod firestore;

pub use firestore::{FirestoreDb, InsertOutcome};

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITIES: &str = "activities";
    /// Laps, keyed by lap id, referencing their activity via `activity_id`
    pub const LAPS: &str = "laps";
    pub const BLOCKS: &str = "blocks";
    pub const SETTINGS: &str = "settings";
}

/// Document ID of the zone profile within the settings collection.
pub const ZONES_DOC_ID: &str = "zones";
