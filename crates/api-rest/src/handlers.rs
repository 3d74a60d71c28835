//! Clinic endpoints: doctors, appointments and availability.
//!
//! Every protected handler authorises the caller before it looks at the path or body, so an
//! anonymous request always gets `401` regardless of what it sent.

use api_shared::{HealthRes, HealthService, MessageRes};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use clinic_core::validation::validate_new_availability;
use clinic_core::{
    Appointment, AppointmentPatch, DoctorAvailability, Id, NewAppointment, NewAvailability,
    Operation, User,
};

use crate::caller::Caller;
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "All users with role doctor", body = [User]),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// List all doctors. Open to anonymous callers.
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.storage.list_doctors()?))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = NewAppointment,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Malformed appointment", body = MessageRes),
        (status = 401, description = "Not authenticated", body = MessageRes),
        (status = 403, description = "Caller is not a patient or receptionist", body = MessageRes)
    )
)]
/// Book an appointment.
///
/// No check is made for clashes with other bookings or with the doctor's declared availability.
pub async fn create_appointment(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    caller.authorize(Operation::CreateAppointment)?;
    let Json(new) = body?;

    let appointment = state.storage.create_appointment(new)?;
    tracing::info!(
        appointment_id = appointment.id,
        doctor_id = appointment.doctor_id,
        "appointment booked"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[utoipa::path(
    get,
    path = "/api/appointments/doctor/{id}",
    params(("id" = u64, Path, description = "Doctor user id")),
    responses(
        (status = 200, description = "Appointments with this doctor", body = [Appointment]),
        (status = 401, description = "Not authenticated", body = MessageRes),
        (status = 403, description = "Caller is not a doctor or admin", body = MessageRes)
    )
)]
pub async fn appointments_by_doctor(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    caller.authorize(Operation::ListAppointmentsByDoctor)?;
    let Path(doctor_id) = id?;
    Ok(Json(state.storage.appointments_by_doctor(doctor_id)?))
}

#[utoipa::path(
    get,
    path = "/api/appointments/patient/{id}",
    params(("id" = u64, Path, description = "Patient user id")),
    responses(
        (status = 200, description = "Appointments for this patient", body = [Appointment]),
        (status = 401, description = "Not authenticated", body = MessageRes),
        (status = 403, description = "Caller is not a patient or receptionist", body = MessageRes)
    )
)]
pub async fn appointments_by_patient(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    caller.authorize(Operation::ListAppointmentsByPatient)?;
    let Path(patient_id) = id?;
    Ok(Json(state.storage.appointments_by_patient(patient_id)?))
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}",
    params(("id" = u64, Path, description = "Appointment id")),
    request_body = AppointmentPatch,
    responses(
        (status = 200, description = "Appointment after the update", body = Appointment),
        (status = 400, description = "Malformed update", body = MessageRes),
        (status = 401, description = "Not authenticated", body = MessageRes),
        (status = 403, description = "Caller is not a patient or receptionist", body = MessageRes),
        (status = 404, description = "No such appointment", body = MessageRes)
    )
)]
/// Merge a partial update, typically `{"status": "cancelled"}`, onto an appointment.
pub async fn update_appointment(
    State(state): State<AppState>,
    caller: Caller,
    id: Result<Path<Id>, PathRejection>,
    body: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
    caller.authorize(Operation::UpdateAppointment)?;
    let Path(appointment_id) = id?;
    let Json(patch) = body?;

    let appointment = state.storage.update_appointment(appointment_id, patch)?;
    tracing::info!(
        appointment_id,
        status = ?appointment.status,
        "appointment updated"
    );
    Ok(Json(appointment))
}

#[utoipa::path(
    post,
    path = "/api/availability",
    request_body = NewAvailability,
    responses(
        (status = 201, description = "Availability window added", body = DoctorAvailability),
        (status = 400, description = "Malformed window", body = MessageRes),
        (status = 401, description = "Not authenticated", body = MessageRes),
        (status = 403, description = "Caller is not a doctor or admin", body = MessageRes)
    )
)]
/// Add a weekly availability window.
///
/// Always inserts a new record, even when the doctor already has one for that day. When
/// `doctorId` is omitted the window belongs to the caller.
pub async fn set_availability(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<NewAvailability>, JsonRejection>,
) -> Result<(StatusCode, Json<DoctorAvailability>), ApiError> {
    let identity = caller
        .authorize(Operation::SetAvailability)?
        .ok_or(ApiError::Unauthenticated)?;
    let Json(mut new) = body?;
    validate_new_availability(&new)?;
    if new.doctor_id.is_none() {
        new.doctor_id = Some(identity.user_id);
    }

    let window = state.storage.set_availability(new)?;
    tracing::info!(
        availability_id = window.id,
        doctor_id = window.doctor_id,
        "availability added"
    );
    Ok((StatusCode::CREATED, Json(window)))
}

#[utoipa::path(
    get,
    path = "/api/availability/{doctorId}",
    params(("doctorId" = u64, Path, description = "Doctor user id")),
    responses(
        (status = 200, description = "Every window declared by this doctor", body = [DoctorAvailability]),
        (status = 400, description = "Malformed doctor id", body = MessageRes)
    )
)]
/// All availability windows for a doctor. Open to anonymous callers.
pub async fn get_availability(
    State(state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<Vec<DoctorAvailability>>, ApiError> {
    let Path(doctor_id) = id?;
    Ok(Json(state.storage.get_availability(doctor_id)?))
}
