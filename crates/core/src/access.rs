//! Role-based access control for API operations.
//!
//! The policy is a single declarative table ([`Operation::permitted_roles`]) consulted by one
//! generic predicate ([`authorize`]). Neither holds state or has side effects.

use crate::models::Role;

/// Why a caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No verified caller identity.
    #[error("Not authenticated")]
    Unauthenticated,
    /// Verified identity whose role is not permitted.
    #[error("Not authorized")]
    Forbidden,
}

/// Every operation exposed by the API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListDoctors,
    CreateAppointment,
    ListAppointmentsByDoctor,
    ListAppointmentsByPatient,
    UpdateAppointment,
    SetAvailability,
    GetAvailability,
    Register,
    Login,
    Logout,
    CurrentUser,
}

const PATIENT_OR_RECEPTIONIST: &[Role] = &[Role::Patient, Role::Receptionist];
const DOCTOR_OR_ADMIN: &[Role] = &[Role::Doctor, Role::Admin];
const ANY_ROLE: &[Role] = &[Role::Patient, Role::Doctor, Role::Receptionist, Role::Admin];

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::ListDoctors,
        Operation::CreateAppointment,
        Operation::ListAppointmentsByDoctor,
        Operation::ListAppointmentsByPatient,
        Operation::UpdateAppointment,
        Operation::SetAvailability,
        Operation::GetAvailability,
        Operation::Register,
        Operation::Login,
        Operation::Logout,
        Operation::CurrentUser,
    ];

    /// Roles allowed to perform this operation, or `None` when no check applies.
    pub fn permitted_roles(self) -> Option<&'static [Role]> {
        match self {
            Operation::ListDoctors | Operation::GetAvailability => None,
            Operation::CreateAppointment
            | Operation::ListAppointmentsByPatient
            | Operation::UpdateAppointment => Some(PATIENT_OR_RECEPTIONIST),
            Operation::ListAppointmentsByDoctor | Operation::SetAvailability => {
                Some(DOCTOR_OR_ADMIN)
            }
            Operation::Register | Operation::Login | Operation::Logout => None,
            // any signed-in user, whatever the role
            Operation::CurrentUser => Some(ANY_ROLE),
        }
    }

    /// Checks `caller` against this operation's entry in the table.
    pub fn authorize(self, caller: Option<Role>) -> Result<(), AccessError> {
        match self.permitted_roles() {
            None => Ok(()),
            Some(permitted) => authorize(caller, permitted),
        }
    }
}

/// Admits `caller` if its role is in `permitted`.
///
/// # Errors
///
/// - [`AccessError::Unauthenticated`] if there is no caller identity.
/// - [`AccessError::Forbidden`] if the caller's role is not in `permitted`.
pub fn authorize(caller: Option<Role>, permitted: &[Role]) -> Result<(), AccessError> {
    let role = caller.ok_or(AccessError::Unauthenticated)?;
    if permitted.contains(&role) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROLES: [Role; 4] = [Role::Patient, Role::Doctor, Role::Receptionist, Role::Admin];

    fn admitted(op: Operation) -> Vec<Role> {
        ROLES
            .into_iter()
            .filter(|role| op.authorize(Some(*role)).is_ok())
            .collect()
    }

    #[test]
    fn table_matches_endpoint_policy() {
        use Operation::*;
        let expected: &[(Operation, Option<&[Role]>)] = &[
            (ListDoctors, None),
            (CreateAppointment, Some(&[Role::Patient, Role::Receptionist][..])),
            (ListAppointmentsByDoctor, Some(&[Role::Doctor, Role::Admin][..])),
            (ListAppointmentsByPatient, Some(&[Role::Patient, Role::Receptionist][..])),
            (UpdateAppointment, Some(&[Role::Patient, Role::Receptionist][..])),
            (SetAvailability, Some(&[Role::Doctor, Role::Admin][..])),
            (GetAvailability, None),
        ];
        for (op, roles) in expected {
            assert_eq!(op.permitted_roles(), *roles, "{op:?}");
        }
    }

    #[test]
    fn patient_cannot_list_doctor_appointments() {
        assert_eq!(
            Operation::ListAppointmentsByDoctor.authorize(Some(Role::Patient)),
            Err(AccessError::Forbidden)
        );
    }

    #[test]
    fn admin_can_list_doctor_appointments() {
        assert_eq!(
            Operation::ListAppointmentsByDoctor.authorize(Some(Role::Admin)),
            Ok(())
        );
    }

    #[test]
    fn missing_identity_is_unauthenticated_for_every_protected_operation() {
        for op in Operation::ALL {
            if op.permitted_roles().is_some() {
                assert_eq!(op.authorize(None), Err(AccessError::Unauthenticated), "{op:?}");
            }
        }
    }

    #[test]
    fn public_operations_admit_anonymous_callers() {
        for op in [
            Operation::ListDoctors,
            Operation::GetAvailability,
            Operation::Register,
            Operation::Login,
        ] {
            assert_eq!(op.authorize(None), Ok(()));
            assert_eq!(admitted(op), ROLES.to_vec());
        }
    }

    #[test]
    fn booking_operations_exclude_clinical_staff() {
        for op in [
            Operation::CreateAppointment,
            Operation::ListAppointmentsByPatient,
            Operation::UpdateAppointment,
        ] {
            assert_eq!(admitted(op), vec![Role::Patient, Role::Receptionist]);
        }
        assert_eq!(
            admitted(Operation::SetAvailability),
            vec![Role::Doctor, Role::Admin]
        );
    }

    #[test]
    fn authorize_checks_membership_only() {
        assert_eq!(authorize(Some(Role::Doctor), &[]), Err(AccessError::Forbidden));
        assert_eq!(authorize(None, &[]), Err(AccessError::Unauthenticated));
        assert_eq!(authorize(Some(Role::Admin), &[Role::Admin]), Ok(()));
    }
}
