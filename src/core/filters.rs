use crate::config::AppConfig;
use crate::core::distance::distance;
use crate::error::{AppError, Error, ErrorPosture, RecordError};
use crate::models::{CustomerRecord, EligibleCustomer};

/// Distance of a customer from the configured source, in the configured unit
#[inline]
pub fn distance_from_source(
    record: &CustomerRecord,
    config: &AppConfig,
) -> Result<f64, RecordError> {
    let coordinate = record.coordinate()?;
    Ok(distance(config.source_coordinates, coordinate, config.distance_unit))
}

/// Check whether a customer lies within the configured distance
///
/// The threshold is inclusive. A NaN distance is never eligible.
#[inline]
pub fn is_eligible(record: &CustomerRecord, config: &AppConfig) -> Result<bool, RecordError> {
    Ok(distance_from_source(record, config)? <= config.distance)
}

#[inline]
pub fn to_eligible(record: &CustomerRecord) -> EligibleCustomer {
    EligibleCustomer::from(record)
}

/// Outcome of filtering one batch of records
#[derive(Debug, Default)]
pub struct Selection {
    /// Eligible customers, in encounter order
    pub eligible: Vec<EligibleCustomer>,
    /// Records that were evaluated and found too far away
    pub excluded: usize,
    /// Records that could not be evaluated and were skipped
    pub failed: usize,
}

/// Apply the distance filter to every record, in order
///
/// A record that cannot be evaluated is skipped, unless the configuration
/// is strict, in which case the whole selection fails naming that record.
pub fn select_eligible(
    records: &[CustomerRecord],
    config: &AppConfig,
    posture: ErrorPosture,
) -> Result<Selection, Error> {
    let mut selection = Selection::default();

    for record in records {
        match is_eligible(record, config) {
            Ok(true) => selection.eligible.push(to_eligible(record)),
            Ok(false) => selection.excluded += 1,
            Err(err) if config.is_strict() => {
                return Err(Error::from(err).classify(posture, || AppError::RecordProcessing {
                    user_id: record.user_id,
                    name: record.name.clone(),
                }));
            }
            Err(err) => {
                tracing::debug!(user_id = record.user_id, error = %err, "Skipping customer");
                selection.failed += 1;
            }
        }
    }

    Ok(selection)
}
