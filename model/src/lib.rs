pub mod adhoc;
pub mod base_types;
pub mod config;
pub mod container_types;
pub mod instance;
pub mod locations;
pub mod orders;
pub mod serialisation;
pub mod timetable;
