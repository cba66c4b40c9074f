pub mod eligibility;
pub mod error;
pub mod reminder;
pub mod scheme;
pub mod settings;
pub mod store;

pub use eligibility::{criteria_for, default_answers, evaluate, Criterion, EligibilityOutcome};
pub use error::{StoreError, StoreResult};
pub use reminder::{NewReminder, Reminder, REMIND_AT_FORMAT};
pub use scheme::{scheme_alerts, Scheme, SEEDED_SCHEMES};
pub use settings::{Language, Settings};
pub use store::AgriStore;
