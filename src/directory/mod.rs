//! External collaborator boundaries: roster, facility, and schedule.
//!
//! The core consumes these services only at their interface; each trait
//! ships with an in-memory implementation used both in production (as a
//! stand-in populated over the directory API) and in tests.

pub mod facility;
pub mod roster;
pub mod schedule;

pub use facility::{FacilityDirectory, Hall, InMemoryFacility};
pub use roster::{InMemoryRoster, RosterDirectory, Student};
pub use schedule::{InMemorySchedule, ScheduleDirectory};
