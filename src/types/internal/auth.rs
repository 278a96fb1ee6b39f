use poem_openapi::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff roles recognized by the access control gate.
///
/// Authorization is an exact membership test against a per-operation
/// allow-list; there is no hierarchy or inheritance between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Enum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[oai(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Doctor,
    Nurse,
    Receptionist,
    LabTechnician,
    Pharmacist,
    BillingStaff,
}

impl Role {
    /// String form used for database storage and JWT claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Doctor => "DOCTOR",
            Self::Nurse => "NURSE",
            Self::Receptionist => "RECEPTIONIST",
            Self::LabTechnician => "LAB_TECHNICIAN",
            Self::Pharmacist => "PHARMACIST",
            Self::BillingStaff => "BILLING_STAFF",
        }
    }

    /// Parse the stored string form back into a role
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUPER_ADMIN" => Some(Self::SuperAdmin),
            "ADMIN" => Some(Self::Admin),
            "DOCTOR" => Some(Self::Doctor),
            "NURSE" => Some(Self::Nurse),
            "RECEPTIONIST" => Some(Self::Receptionist),
            "LAB_TECHNICIAN" => Some(Self::LabTechnician),
            "PHARMACIST" => Some(Self::Pharmacist),
            "BILLING_STAFF" => Some(Self::BillingStaff),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// JWT claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Email of the authenticated user
    pub email: String,

    /// Role used for authorization decisions
    pub role: Role,

    /// Token identifier
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
