//! # Clinic Core
//!
//! Core business logic for the clinic booking system.
//!
//! This crate contains the data model and pure data operations:
//! - Users, appointments and doctor availability ([`models`])
//! - The entity store interface and its in-memory implementation ([`store`])
//! - The role-based access control table ([`access`])
//! - Value-level input validation ([`validation`])
//!
//! **No API concerns**: sessions, password hashing and HTTP servers belong in `api-shared` and
//! `api-rest`.

pub mod access;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod store;
pub mod validation;

pub use access::{authorize, AccessError, Operation};
pub use config::CoreConfig;
pub use error::{ClinicError, ClinicResult};
pub use models::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentType, DoctorAvailability, Id,
    NewAppointment, NewAvailability, NewUser, Role, User,
};
pub use store::{MemStorage, Storage};
