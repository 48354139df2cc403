//! Application profiles governing normalization.
//!
//! Each known application gets a value object describing which fields
//! survive normalization, which record types are suppressed, and whether the
//! app-specific filter/dedup pipeline applies. Unknown applications fall
//! back to a generic profile so per-application branching stays out of the
//! pipeline itself.

/// Storage-protocol-internal field prefix stripped by the generic profile.
const PROTOCOL_FIELD_PREFIX: &str = "odata.";

/// Per-application normalization rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationProfile {
    /// Application name this profile was resolved for.
    pub application_name: String,
    /// Fixed field allowlist; `None` keeps all non-protocol fields.
    pub allowed_fields: Option<&'static [&'static str]>,
    /// Record `Type` values suppressed during normalization.
    pub type_exclusions: &'static [&'static str],
    /// Whether the two-branch filter/dedup pipeline applies.
    pub uses_dedup_filter: bool,
}

/// Allowlist for the health-services application: row identity, timing,
/// document identifiers, method name, and exception text.
const APP_SALUD_FIELDS: &[&str] = &[
    "RowKey",
    "Timestamp",
    "TimeService",
    "DocumentType",
    "DocumentNumber",
    "NameMethod",
    "Exception",
];

/// External-service traceability traffic excluded for AppSalud.
const APP_SALUD_TYPE_EXCLUSIONS: &[&str] = &[
    "REST_ExternalServiceTraceability",
    "SOAP_ExternalServiceTraceability",
];

impl ApplicationProfile {
    /// Resolves the profile for an application name.
    pub fn for_application(application_name: &str) -> Self {
        match application_name {
            "AppSalud" => Self {
                application_name: application_name.to_string(),
                allowed_fields: Some(APP_SALUD_FIELDS),
                type_exclusions: APP_SALUD_TYPE_EXCLUSIONS,
                uses_dedup_filter: true,
            },
            _ => Self::generic(application_name),
        }
    }

    /// The generic profile: all fields except storage-protocol metadata,
    /// no type exclusions, no dedup pipeline.
    pub fn generic(application_name: &str) -> Self {
        Self {
            application_name: application_name.to_string(),
            allowed_fields: None,
            type_exclusions: &[],
            uses_dedup_filter: false,
        }
    }

    /// Returns true when a field survives this profile's selection.
    pub fn retains_field(&self, field_name: &str) -> bool {
        match self.allowed_fields {
            Some(allowed) => allowed.contains(&field_name),
            None => !field_name
                .get(..PROTOCOL_FIELD_PREFIX.len())
                .map(|prefix| prefix.eq_ignore_ascii_case(PROTOCOL_FIELD_PREFIX))
                .unwrap_or(false),
        }
    }

    /// Returns true when a record `Type` value is suppressed.
    pub fn excludes_type(&self, record_type: &str) -> bool {
        self.type_exclusions.contains(&record_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_salud_uses_allowlist_and_dedup() {
        let profile = ApplicationProfile::for_application("AppSalud");
        assert!(profile.uses_dedup_filter);
        assert!(profile.retains_field("Exception"));
        assert!(profile.retains_field("RowKey"));
        assert!(!profile.retains_field("PartitionKey"));
        assert!(profile.excludes_type("REST_ExternalServiceTraceability"));
        assert!(!profile.excludes_type("InternalCall"));
    }

    #[test]
    fn unknown_application_gets_generic_profile() {
        let profile = ApplicationProfile::for_application("SomethingElse");
        assert!(!profile.uses_dedup_filter);
        assert!(profile.retains_field("AnyField"));
        assert!(profile.type_exclusions.is_empty());
    }

    #[test]
    fn generic_profile_strips_protocol_fields_case_insensitively() {
        let profile = ApplicationProfile::generic("App");
        assert!(!profile.retains_field("odata.etag"));
        assert!(!profile.retains_field("OData.type"));
        assert!(profile.retains_field("odatalike"));
        assert!(profile.retains_field("Timestamp"));
    }
}
