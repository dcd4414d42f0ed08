//! OpenAPI documentation for the booking API.
//!
//! [`ApiDoc`] registers every handler under `inbound::http`, the response
//! payloads, and the bearer-token security scheme. Swagger UI serves it at
//! `/docs` in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::{admin, doctor_portal, doctors, dto, health, patients};

/// Adds the `BearerToken` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.description = Some(
            "Signed `<role>.<subject>.<signature>` token; admins obtain one from POST /api/admin/login."
                .to_owned(),
        );
        components.add_security_scheme("BearerToken", SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Clinic booking API",
        description = "Doctor directory, slot booking, cancellation, payment and reporting."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        doctors::list_doctors,
        doctors::booked_slots,
        patients::book_appointment,
        patients::list_my_appointments,
        patients::cancel_my_appointment,
        patients::initiate_payment,
        patients::confirm_payment,
        doctor_portal::list_doctor_appointments,
        doctor_portal::complete_appointment,
        doctor_portal::cancel_doctor_appointment,
        doctor_portal::doctor_dashboard,
        doctor_portal::toggle_own_availability,
        admin::admin_login,
        admin::admin_list_doctors,
        admin::admin_list_appointments,
        admin::admin_cancel_appointment,
        admin::admin_toggle_availability,
        admin::admin_dashboard,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        dto::AppointmentResponse,
        dto::DoctorSummaryResponse,
        dto::DoctorDashboardResponse,
        dto::AdminDashboardResponse,
        dto::TransitionResponse,
    )),
    tags(
        (name = "doctors", description = "Public doctor directory"),
        (name = "patients", description = "Booking and cancellation by patients"),
        (name = "payments", description = "Online payment for appointments"),
        (name = "doctor", description = "Doctor workspace"),
        (name = "admin", description = "Clinic administration"),
        (name = "health", description = "Liveness and readiness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    #[test]
    fn error_schema_exposes_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get("Error").expect("Error schema") {
            RefOr::T(Schema::Object(object)) => {
                assert!(object.properties.contains_key("code"));
                assert!(object.properties.contains_key("message"));
            }
            _ => panic!("expected an object schema"),
        }
    }

    #[test]
    fn booking_routes_are_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/user/appointments",
            "/api/user/appointments/{appointmentId}/payment/verify",
            "/api/doctors/{doctorId}/slots",
            "/api/admin/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
