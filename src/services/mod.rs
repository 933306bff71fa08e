// Service exports
pub mod access;
pub mod geocoder;
pub mod geodistance;
pub mod lifecycle;
pub mod matching;
pub mod store;
pub mod tasks;

pub use access::{AccessControl, Action, Actor, AuditLog, EntityRefs, Resource};
pub use geocoder::{GeocoderError, GeocodingClient};
pub use geodistance::{GeoDistanceCache, GeodistanceError};
pub use lifecycle::TutorshipLifecycle;
pub use matching::{MatchPipeline, RecomputeSummary};
pub use store::{StoreError, TutorStore};
pub use tasks::{TaskEmitter, TaskError};
