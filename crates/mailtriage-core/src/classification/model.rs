//! Classification data models.

use serde_json::{Value, json};
use std::fmt;

/// Domain of a ticket. Closed set; the wire tags are what the model emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// IT problem on the requester's side (hardware, software, security).
    TechnicalProblem,
    /// Paperwork: certificates, registrations, forms.
    AdministrativeRequest,
    /// Login, password, or permission problem.
    AccessProblem,
    /// "How do I ...?" questions.
    SupportRequest,
    /// A service that is down or misbehaving.
    ServiceMalfunction,
}

impl Category {
    /// Every category, in prompt order.
    pub const ALL: [Self; 5] = [
        Self::TechnicalProblem,
        Self::AdministrativeRequest,
        Self::AccessProblem,
        Self::SupportRequest,
        Self::ServiceMalfunction,
    ];

    /// Wire tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TechnicalProblem => "probleme_technique_informatique",
            Self::AdministrativeRequest => "demande_administrative",
            Self::AccessProblem => "probleme_acces_authentification",
            Self::SupportRequest => "demande_support_utilisateur",
            Self::ServiceMalfunction => "bug_ou_dysfonctionnement_service",
        }
    }

    /// Looks up a wire tag exactly (surrounding whitespace ignored).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|c| c.as_str() == tag)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a ticket, ordered from `Trivial` to `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Urgency {
    /// Can wait indefinitely.
    Trivial,
    /// Handle when convenient.
    Low,
    /// Handle within the normal queue.
    Moderate,
    /// Handle soon.
    High,
    /// Drop everything.
    Critical,
}

impl Urgency {
    /// Every level, lowest first.
    pub const ALL: [Self; 5] = [
        Self::Trivial,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::Critical,
    ];

    /// Wire tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trivial => "anodine",
            Self::Low => "faible",
            Self::Moderate => "moderee",
            Self::High => "elevee",
            Self::Critical => "critique",
        }
    }

    /// Looks up a wire tag exactly (surrounding whitespace ignored).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.into_iter().find(|u| u.as_str() == tag)
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a ticket could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// The chat service could not be reached or timed out.
    ServiceUnreachable,
    /// The chat service answered with a non-success status.
    ServiceRejected {
        /// HTTP status code.
        status: u16,
    },
    /// The reply was not a single JSON object with the expected string fields.
    MalformedOutput,
    /// `categorie` or `urgence` is outside the closed vocabulary.
    InvalidEnumValue,
}

impl FailureReason {
    /// Stable machine-readable tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceUnreachable => "service_unreachable",
            Self::ServiceRejected { .. } => "service_rejected",
            Self::MalformedOutput => "malformed_output",
            Self::InvalidEnumValue => "invalid_enum_value",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceRejected { status } => write!(f, "{} ({status})", self.as_str()),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Outcome of classifying one ticket. Never half-populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationResult {
    /// The model produced a valid classification.
    Classified {
        /// Ticket domain.
        category: Category,
        /// Ticket severity.
        urgency: Urgency,
        /// One to three sentences, non-empty.
        synthesis: String,
    },
    /// The call or the validation failed.
    Failed {
        /// What went wrong.
        reason: FailureReason,
    },
}

impl ClassificationResult {
    /// Shorthand for a failure.
    #[must_use]
    pub const fn failed(reason: FailureReason) -> Self {
        Self::Failed { reason }
    }

    /// Whether the ticket was classified.
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        matches!(self, Self::Classified { .. })
    }

    /// Category of a successful classification.
    #[must_use]
    pub const fn category(&self) -> Option<Category> {
        match self {
            Self::Classified { category, .. } => Some(*category),
            Self::Failed { .. } => None,
        }
    }

    /// Urgency of a successful classification.
    #[must_use]
    pub const fn urgency(&self) -> Option<Urgency> {
        match self {
            Self::Classified { urgency, .. } => Some(*urgency),
            Self::Failed { .. } => None,
        }
    }

    /// JSON rendering in the model's own vocabulary, or an `erreur` marker.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Classified {
                category,
                urgency,
                synthesis,
            } => json!({
                "categorie": category.as_str(),
                "urgence": urgency.as_str(),
                "synthese": synthesis,
            }),
            Self::Failed { reason } => json!({ "erreur": reason.to_string() }),
        }
    }
}
