//! Entity store for users, appointments and doctor availability.
//!
//! [`Storage`] is the interface the API layer talks to. [`MemStorage`] keeps everything in
//! process memory for the lifetime of the process; nothing survives a restart.
//!
//! ## Semantics
//!
//! - Identifiers are assigned per entity kind, starting at 1 and strictly increasing.
//! - Listing operations are linear scans returning records in insertion order.
//! - No referential checks: an appointment may name users that do not exist.
//! - No booking conflict checks: the same doctor may be booked twice at the same time.
//! - `set_availability` always inserts; earlier windows for the same day are kept.
//! - Each operation locks one collection for its own duration only, so concurrent updates to the
//!   same appointment resolve as last writer wins.
//!
//! ## Pure Data Operations
//!
//! This module contains **only** data operations. Authentication and role checks belong in
//! [`crate::access`] and the API crates.

use crate::constants::FIRST_ID;
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    Appointment, AppointmentPatch, DoctorAvailability, Id, NewAppointment, NewAvailability,
    NewUser, Role, User,
};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage interface for the clinic entities.
///
/// Absence is reported as `Ok(None)`; errors are reserved for failed updates and store faults.
pub trait Storage: Send + Sync {
    /// Stores a new user and returns it with its assigned id.
    ///
    /// Username uniqueness is the caller's responsibility.
    fn create_user(&self, new: NewUser) -> ClinicResult<User>;

    /// Stores a new user unless the username is already taken.
    ///
    /// The lookup and the insert happen under one lock, so concurrent callers cannot both
    /// claim the same username.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::Duplicate`] if a user with this username exists.
    fn create_user_unique(&self, new: NewUser) -> ClinicResult<User>;

    fn get_user(&self, id: Id) -> ClinicResult<Option<User>>;

    /// First user with exactly this username.
    fn get_user_by_username(&self, username: &str) -> ClinicResult<Option<User>>;

    /// All users with role doctor, in insertion order.
    fn list_doctors(&self) -> ClinicResult<Vec<User>>;

    fn create_appointment(&self, new: NewAppointment) -> ClinicResult<Appointment>;

    fn appointments_by_doctor(&self, doctor_id: Id) -> ClinicResult<Vec<Appointment>>;

    fn appointments_by_patient(&self, patient_id: Id) -> ClinicResult<Vec<Appointment>>;

    /// Merges `patch` onto the stored appointment and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::NotFound`] if no appointment has this id.
    fn update_appointment(&self, id: Id, patch: AppointmentPatch) -> ClinicResult<Appointment>;

    /// Inserts a new availability window. Never updates an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::InvalidInput`] if `doctor_id` has not been resolved.
    fn set_availability(&self, new: NewAvailability) -> ClinicResult<DoctorAvailability>;

    /// All windows for this doctor, in insertion order.
    fn get_availability(&self, doctor_id: Id) -> ClinicResult<Vec<DoctorAvailability>>;
}

/// Rows of one entity kind plus the next identifier to hand out.
#[derive(Debug)]
struct Table<T> {
    name: &'static str,
    inner: RwLock<TableInner<T>>,
}

#[derive(Debug)]
struct TableInner<T> {
    rows: BTreeMap<Id, T>,
    next_id: Id,
}

impl<T: Clone> TableInner<T> {
    fn push(&mut self, build: impl FnOnce(Id) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }
}

impl<T: Clone> Table<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(TableInner {
                rows: BTreeMap::new(),
                next_id: FIRST_ID,
            }),
        }
    }

    fn read(&self) -> ClinicResult<RwLockReadGuard<'_, TableInner<T>>> {
        self.inner
            .read()
            .map_err(|_| ClinicError::LockPoisoned(self.name))
    }

    fn write(&self) -> ClinicResult<RwLockWriteGuard<'_, TableInner<T>>> {
        self.inner
            .write()
            .map_err(|_| ClinicError::LockPoisoned(self.name))
    }

    fn insert_with(&self, build: impl FnOnce(Id) -> T) -> ClinicResult<T> {
        let mut table = self.write()?;
        Ok(table.push(build))
    }

    /// Inserts unless an existing row matches `taken`. Returns `None` when one does.
    fn insert_unless(
        &self,
        taken: impl Fn(&T) -> bool,
        build: impl FnOnce(Id) -> T,
    ) -> ClinicResult<Option<T>> {
        let mut table = self.write()?;
        if table.rows.values().any(taken) {
            return Ok(None);
        }
        Ok(Some(table.push(build)))
    }

    fn get(&self, id: Id) -> ClinicResult<Option<T>> {
        Ok(self.read()?.rows.get(&id).cloned())
    }

    fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> ClinicResult<Vec<T>> {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|row| pred(*row))
            .cloned()
            .collect())
    }
}

/// In-memory [`Storage`] implementation.
///
/// Construct one per process (or per test) and share it behind an `Arc`.
#[derive(Debug)]
pub struct MemStorage {
    users: Table<User>,
    appointments: Table<Appointment>,
    availability: Table<DoctorAvailability>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: Table::new("users"),
            appointments: Table::new("appointments"),
            availability: Table::new("doctor availability"),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    fn create_user(&self, new: NewUser) -> ClinicResult<User> {
        let user = self.users.insert_with(|id| new.with_id(id))?;
        tracing::debug!(user_id = user.id, role = %user.role, "created user");
        Ok(user)
    }

    fn create_user_unique(&self, new: NewUser) -> ClinicResult<User> {
        let username = new.username.clone();
        let user = self
            .users
            .insert_unless(|user| user.username == username, |id| new.with_id(id))?
            .ok_or_else(|| ClinicError::Duplicate {
                entity: "user",
                key: username.clone(),
            })?;
        tracing::debug!(user_id = user.id, role = %user.role, "created user");
        Ok(user)
    }

    fn get_user(&self, id: Id) -> ClinicResult<Option<User>> {
        self.users.get(id)
    }

    fn get_user_by_username(&self, username: &str) -> ClinicResult<Option<User>> {
        Ok(self
            .users
            .read()?
            .rows
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    fn list_doctors(&self) -> ClinicResult<Vec<User>> {
        self.users.filter(|user| user.role == Role::Doctor)
    }

    fn create_appointment(&self, new: NewAppointment) -> ClinicResult<Appointment> {
        let appointment = self.appointments.insert_with(|id| new.with_id(id))?;
        tracing::debug!(
            appointment_id = appointment.id,
            doctor_id = appointment.doctor_id,
            patient_id = appointment.patient_id,
            "created appointment"
        );
        Ok(appointment)
    }

    fn appointments_by_doctor(&self, doctor_id: Id) -> ClinicResult<Vec<Appointment>> {
        self.appointments.filter(|apt| apt.doctor_id == doctor_id)
    }

    fn appointments_by_patient(&self, patient_id: Id) -> ClinicResult<Vec<Appointment>> {
        self.appointments.filter(|apt| apt.patient_id == patient_id)
    }

    fn update_appointment(&self, id: Id, patch: AppointmentPatch) -> ClinicResult<Appointment> {
        let mut table = self.appointments.write()?;
        let appointment = table.rows.get_mut(&id).ok_or(ClinicError::NotFound {
            entity: "appointment",
            id,
        })?;
        patch.apply(appointment);
        tracing::debug!(appointment_id = id, status = ?appointment.status, "updated appointment");
        Ok(appointment.clone())
    }

    fn set_availability(&self, new: NewAvailability) -> ClinicResult<DoctorAvailability> {
        let doctor_id = new
            .doctor_id
            .ok_or_else(|| ClinicError::InvalidInput("doctorId is required".into()))?;
        let record = self
            .availability
            .insert_with(|id| new.with_id(id, doctor_id))?;
        tracing::debug!(
            availability_id = record.id,
            doctor_id,
            day_of_week = record.day_of_week,
            "inserted availability"
        );
        Ok(record)
    }

    fn get_availability(&self, doctor_id: Id) -> ClinicResult<Vec<DoctorAvailability>> {
        self.availability
            .filter(|window| window.doctor_id == doctor_id)
    }
}
