//! Quality issues found by the pleat evaluator.

use std::fmt;

/// A problem detected while scoring pleat geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityIssue {
    /// No vertex deviates from its band radius, so nothing can be measured.
    NoPleatFeatures,

    /// Features exist but no band holds two of them, so no gap can be measured.
    AnglesUnmeasurable,

    /// Angular gaps between pleats deviate too far from uniform spacing.
    IrregularAngles {
        /// Largest gap deviation in degrees.
        max_deviation: f64,
    },

    /// Fold depths vary too much.
    InconsistentDepth {
        /// Consistency ratio in `[0, 1]`.
        consistency: f64,
    },

    /// The mesh quality sub-score is low.
    PoorMeshQuality {
        /// Mesh quality points out of 25.
        score: f64,
    },

    /// The detected number of pleats per band differs from the requested one.
    PleatCountMismatch {
        /// Requested pleat count.
        expected: usize,
        /// Median detected features per band.
        estimated: usize,
    },
}

impl QualityIssue {
    /// Short category name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoPleatFeatures => "No Pleat Features",
            Self::AnglesUnmeasurable => "Angles Unmeasurable",
            Self::IrregularAngles { .. } => "Irregular Angles",
            Self::InconsistentDepth { .. } => "Inconsistent Depth",
            Self::PoorMeshQuality { .. } => "Poor Mesh Quality",
            Self::PleatCountMismatch { .. } => "Pleat Count Mismatch",
        }
    }

    /// Suggested fix for this issue.
    #[must_use]
    pub fn recommendation(&self) -> String {
        match self {
            Self::NoPleatFeatures => {
                "Increase pleat depth or use a skirt mesh with more vertices per height band"
                    .to_string()
            }
            Self::AnglesUnmeasurable => {
                "Use a finer band resolution so each band holds several pleats".to_string()
            }
            Self::IrregularAngles { .. } => {
                "Choose a pleat count that divides the vertices per band evenly".to_string()
            }
            Self::InconsistentDepth { .. } => {
                "Disable smoothing and extrusion before pleating, or reduce pleat depth"
                    .to_string()
            }
            Self::PoorMeshQuality { .. } => {
                "Increase the merge distance to weld duplicate vertices".to_string()
            }
            Self::PleatCountMismatch { expected, .. } => {
                format!("Use a skirt mesh with a multiple of {expected} vertices per ring")
            }
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPleatFeatures => write!(f, "no pleat features detected"),
            Self::AnglesUnmeasurable => write!(f, "pleat angle measurement failed"),
            Self::IrregularAngles { max_deviation } => {
                write!(f, "irregular pleat angles: max deviation {max_deviation:.2} deg")
            }
            Self::InconsistentDepth { consistency } => {
                write!(f, "inconsistent pleat depth: consistency {consistency:.2}")
            }
            Self::PoorMeshQuality { score } => {
                write!(f, "mesh quality problem: score {score:.2}/25")
            }
            Self::PleatCountMismatch {
                expected,
                estimated,
            } => write!(
                f,
                "estimated pleat count {estimated} differs from expected {expected}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let issue = QualityIssue::IrregularAngles {
            max_deviation: 12.5,
        };
        assert_eq!(
            format!("{issue}"),
            "irregular pleat angles: max deviation 12.50 deg"
        );

        let issue = QualityIssue::PleatCountMismatch {
            expected: 12,
            estimated: 6,
        };
        assert!(format!("{issue}").contains("6"));
        assert!(issue.recommendation().contains("12"));
    }

    #[test]
    fn test_every_issue_has_recommendation() {
        let issues = [
            QualityIssue::NoPleatFeatures,
            QualityIssue::AnglesUnmeasurable,
            QualityIssue::IrregularAngles { max_deviation: 20.0 },
            QualityIssue::InconsistentDepth { consistency: 0.5 },
            QualityIssue::PoorMeshQuality { score: 3.0 },
            QualityIssue::PleatCountMismatch {
                expected: 12,
                estimated: 3,
            },
        ];
        for issue in &issues {
            assert!(!issue.recommendation().is_empty());
            assert!(!issue.as_str().is_empty());
        }
    }
}
