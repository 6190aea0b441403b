//! Support ticket value type and the built-in sample set.

use serde::Serialize;

/// Subject used when a message has no `Subject` header.
pub const NO_SUBJECT: &str = "(no subject)";

/// A support request derived from one e-mail message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    /// Mailbox message id, or a fixed id for sample tickets.
    pub id: String,
    /// Message subject.
    pub subject: String,
    /// Plain-text body, empty when the message had none.
    pub body: String,
}

impl Ticket {
    /// Creates a ticket.
    #[must_use]
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Whether this is one of the built-in [`sample_tickets`].
    #[must_use]
    pub fn is_sample(&self) -> bool {
        self.id.starts_with(SAMPLE_ID_PREFIX)
    }
}

const SAMPLE_ID_PREFIX: &str = "sample-";

const SECURITY_INCIDENT_BODY: &str = "
Bonjour,

Une anomalie a été détectée dans le système d'authentification interne.
Un accès non autorisé a été enregistré vers la base de données des clients
(table « clients_confidentiels ») à 02h12. Les données sensibles
(numéros de sécurité sociale, coordonnées bancaires) ont pu être extraites.

Nous avons immédiatement bloqué l'accès et lancé une enquête.
Je sollicite votre intervention urgente pour analyser les logs,
appliquer un patch de sécurité et informer les parties concernées.
Merci de traiter cette demande en priorité absolue.

Cordialement,
Élodie Rousseau.
";

const ENROLLMENT_CERTIFICATE_BODY: &str = "
Bonjour,

Je voudrais obtenir une attestation de scolarité pour l'année 2024-2025
afin de la transmettre à mon employeur.
Pouvez-vous me l'envoyer par e-mail dès que possible ?

Merci beaucoup,
Nathalie
";

/// Tickets processed when the mailbox yields nothing.
///
/// One high-urgency security incident and one low-urgency administrative
/// request, so both ends of the urgency scale are exercised.
#[must_use]
pub fn sample_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new(
            "sample-security-incident",
            "Incident de sécurité : fuite de données sensibles détectée",
            SECURITY_INCIDENT_BODY,
        ),
        Ticket::new(
            "sample-enrollment-certificate",
            "Demande d'attestation de scolarité",
            ENROLLMENT_CERTIFICATE_BODY,
        ),
    ]
}
