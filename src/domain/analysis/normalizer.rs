//! Record Normalizer - reshapes raw table rows into analysis-ready records.
//!
//! Field selection and filtering are driven by the [`ApplicationProfile`]
//! resolved once per call. Profiles with a type-exclusion rule go through a
//! two-branch filter whose union is deduplicated by row key; everything else
//! takes the plain selection pipeline.

use std::collections::HashSet;

use super::profile::ApplicationProfile;
use super::record::{
    canonical_timestamp, FieldValue, NormalizedRecord, RawRecord, TIMESTAMP_FIELD,
};

/// Normalizes raw rows for one application.
pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Maps raw records into normalized records per the application profile.
    ///
    /// `max_records` caps the *initial* row enumeration, so the post-union
    /// output of the dedup pipeline is bounded by the same ceiling.
    /// `max_response_time_ms` feeds the elapsed-time filter branch and only
    /// takes effect for profiles with the dedup pipeline.
    ///
    /// Empty input yields empty output.
    pub fn normalize(
        raw_records: &[RawRecord],
        application_name: &str,
        max_records: usize,
        max_response_time_ms: Option<i64>,
    ) -> Vec<NormalizedRecord> {
        let profile = ApplicationProfile::for_application(application_name);
        let bounded: Vec<&RawRecord> = raw_records.iter().take(max_records).collect();

        if profile.uses_dedup_filter {
            Self::filtered_union(&bounded, &profile, max_response_time_ms)
                .into_iter()
                .map(|record| Self::normalize_record(record, &profile))
                .collect()
        } else {
            bounded
                .into_iter()
                .map(|record| Self::normalize_record(record, &profile))
                .collect()
        }
    }

    /// Applies the two independent filters over the pre-normalization set
    /// and returns their union, deduplicated by row key.
    fn filtered_union<'a>(
        records: &[&'a RawRecord],
        profile: &ApplicationProfile,
        max_response_time_ms: Option<i64>,
    ) -> Vec<&'a RawRecord> {
        // Branch 1: keep records whose Type is absent or not excluded.
        let type_filtered = records
            .iter()
            .copied()
            .filter(|record| match record.record_type() {
                Some(record_type) => !profile.excludes_type(record_type),
                None => true,
            });

        // Branch 2: keep records slower than the caller-supplied ceiling.
        // Unparsable or absent elapsed times carry no performance signal and
        // never enter this branch.
        let slow_filtered = records.iter().copied().filter(|record| {
            match (max_response_time_ms, record.elapsed_ms()) {
                (Some(ceiling), Some(elapsed)) => elapsed > ceiling,
                _ => false,
            }
        });

        // Union keeps the first record seen per row key; records without a
        // row key cannot be identity-grouped here and are dropped.
        let mut seen_keys: HashSet<&str> = HashSet::new();
        let mut union: Vec<&RawRecord> = Vec::new();
        for record in type_filtered.chain(slow_filtered) {
            if let Some(key) = record.row_key() {
                if seen_keys.insert(key) {
                    union.push(record);
                }
            }
        }
        union
    }

    /// Selects fields per the profile and canonicalizes the timestamp.
    fn normalize_record(raw: &RawRecord, profile: &ApplicationProfile) -> NormalizedRecord {
        let mut normalized = NormalizedRecord::new();
        for (name, value) in raw.iter() {
            if !profile.retains_field(name) {
                continue;
            }
            let value = match (name.as_str(), value) {
                (TIMESTAMP_FIELD, FieldValue::Timestamp(ts)) => {
                    FieldValue::Text(canonical_timestamp(*ts))
                }
                _ => value.clone(),
            };
            normalized.insert(name.clone(), value);
        }
        normalized
    }
}
