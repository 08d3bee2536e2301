//! Domain error types.
//!
//! These errors represent invariant violations rejected before any state
//! change; the value the caller holds is always left untouched.

/// Validation failures for itinerary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A trip must keep at least one day
    #[error("a trip must keep at least one day")]
    MinimumOneDay,

    /// A destination must keep at least one cost item
    #[error("a destination must keep at least one cost item")]
    MinimumOneCostItem,

    /// Too few destinations to compute a visiting order
    #[error("not enough destinations to optimize a route")]
    InsufficientDestinations,

    /// Segment index outside the optimized route, or no route at all
    #[error("segment index out of range for the optimized route")]
    InvalidSegment,
}

impl ValidationError {
    /// Stable machine-readable code, used in API error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MinimumOneDay => "minimum-one-day",
            ValidationError::MinimumOneCostItem => "minimum-one-cost-item",
            ValidationError::InsufficientDestinations => "insufficient-destinations",
            ValidationError::InvalidSegment => "invalid-segment",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ValidationError::MinimumOneDay.to_string(),
            "a trip must keep at least one day"
        );
        assert_eq!(
            ValidationError::InvalidSegment.to_string(),
            "segment index out of range for the optimized route"
        );
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ValidationError::MinimumOneDay.code(), "minimum-one-day");
        assert_eq!(
            ValidationError::MinimumOneCostItem.code(),
            "minimum-one-cost-item"
        );
        assert_eq!(
            ValidationError::InsufficientDestinations.code(),
            "insufficient-destinations"
        );
        assert_eq!(ValidationError::InvalidSegment.code(), "invalid-segment");
    }
}
