//! Router assembly and OpenAPI document.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use api_shared::{HealthRes, LoginReq, MessageRes, RegisterReq, SessionRes};
use axum::routing::{get, patch, post};
use axum::Router;
use clinic_core::{
    Appointment, AppointmentPatch, AppointmentStatus, AppointmentType, DoctorAvailability,
    NewAppointment, NewAvailability, Role, User,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{handlers, session, AppState};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_doctors,
        handlers::create_appointment,
        handlers::appointments_by_doctor,
        handlers::appointments_by_patient,
        handlers::update_appointment,
        handlers::set_availability,
        handlers::get_availability,
        session::register,
        session::login,
        session::logout,
        session::current_user,
    ),
    components(schemas(
        HealthRes,
        MessageRes,
        RegisterReq,
        LoginReq,
        SessionRes,
        Role,
        User,
        AppointmentStatus,
        AppointmentType,
        Appointment,
        NewAppointment,
        AppointmentPatch,
        DoctorAvailability,
        NewAvailability,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/register", post(session::register))
        .route("/api/login", post(session::login))
        .route("/api/logout", post(session::logout))
        .route("/api/user", get(session::current_user))
        .route("/api/doctors", get(handlers::list_doctors))
        .route("/api/appointments", post(handlers::create_appointment))
        .route(
            "/api/appointments/doctor/:id",
            get(handlers::appointments_by_doctor),
        )
        .route(
            "/api/appointments/patient/:id",
            get(handlers::appointments_by_patient),
        )
        .route("/api/appointments/:id", patch(handlers::update_appointment))
        .route("/api/availability", post(handlers::set_availability))
        .route(
            "/api/availability/:doctorId",
            get(handlers::get_availability),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
