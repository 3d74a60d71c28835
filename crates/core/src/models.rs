//! Clinic entities and their insert/patch shapes.
//!
//! Field names follow the JSON wire format (camelCase). Stored records carry the identifier
//! assigned by the store; the `New*` shapes are the same records minus `id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Identifier assigned by the store, starting at 1 per entity kind.
pub type Id = u64;

/// Role of an authenticated user. Drives the access control table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Receptionist,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Receptionist => "receptionist",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered user of any role.
///
/// `password` holds the credential exactly as handed to the store (the identity provider stores
/// a hash there). It is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    /// Only meaningful for doctors.
    pub specialization: Option<String>,
    /// Only meaningful for patients.
    pub medical_history: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub phone: Option<String>,
    pub specialization: Option<String>,
    pub medical_history: Option<String>,
}

impl NewUser {
    pub(crate) fn with_id(self, id: Id) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            email: self.email,
            role: self.role,
            name: self.name,
            phone: self.phone,
            specialization: self.specialization,
            medical_history: self.medical_history,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    InPerson,
    Teleconsultation,
}

/// A booked appointment between a patient and a doctor.
///
/// `patient_id` and `doctor_id` are expected to reference existing users; the store does not
/// check this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Id,
    pub patient_id: Id,
    pub doctor_id: Id,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub notes: Option<String>,
    pub is_emergency: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: Id,
    pub doctor_id: Id,
    pub date_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub notes: Option<String>,
    /// Defaults to `false`.
    pub is_emergency: Option<bool>,
}

impl NewAppointment {
    pub(crate) fn with_id(self, id: Id) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            date_time: self.date_time,
            status: self.status,
            kind: self.kind,
            notes: self.notes,
            is_emergency: self.is_emergency.unwrap_or(false),
        }
    }
}

/// Partial update for an appointment. Present fields overwrite the stored ones.
///
/// `notes` distinguishes absent (keep) from `null` (clear).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    pub patient_id: Option<Id>,
    pub doctor_id: Option<Id>,
    pub date_time: Option<DateTime<Utc>>,
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type")]
    pub kind: Option<AppointmentType>,
    /// Omit to keep the current notes, send `null` to clear them.
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>, nullable)]
    pub notes: Option<Option<String>>,
    pub is_emergency: Option<bool>,
}

/// Maps a field that is present in the JSON, even as `null`, to `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl AppointmentPatch {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, appointment: &mut Appointment) {
        if let Some(v) = self.patient_id {
            appointment.patient_id = v;
        }
        if let Some(v) = self.doctor_id {
            appointment.doctor_id = v;
        }
        if let Some(v) = self.date_time {
            appointment.date_time = v;
        }
        if let Some(v) = self.status {
            appointment.status = v;
        }
        if let Some(v) = self.kind {
            appointment.kind = v;
        }
        if let Some(v) = self.notes {
            appointment.notes = v;
        }
        if let Some(v) = self.is_emergency {
            appointment.is_emergency = v;
        }
    }
}

/// One weekly availability window declared by a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorAvailability {
    pub id: Id,
    pub doctor_id: Id,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// `HH:mm`
    pub start_time: String,
    /// `HH:mm`
    pub end_time: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAvailability {
    /// Filled in with the caller's id by the API when omitted.
    pub doctor_id: Option<Id>,
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    /// Defaults to `true`.
    pub is_available: Option<bool>,
}

impl NewAvailability {
    pub(crate) fn with_id(self, id: Id, doctor_id: Id) -> DoctorAvailability {
        DoctorAvailability {
            id,
            doctor_id,
            day_of_week: self.day_of_week,
            start_time: self.start_time,
            end_time: self.end_time,
            is_available: self.is_available.unwrap_or(true),
        }
    }
}
