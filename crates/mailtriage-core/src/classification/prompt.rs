//! Prompt construction.
//!
//! Both prompts are pure functions of their inputs so that a deterministic
//! model yields the same classification for the same ticket.

use super::model::{Category, Urgency};
use crate::ticket::Ticket;

fn tag_list<I: IntoIterator<Item = &'static str>>(tags: I) -> String {
    tags.into_iter()
        .map(|tag| format!("\"{tag}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Instruction message listing the allowed tags and the reply format.
#[must_use]
pub fn system_prompt() -> String {
    let categories = tag_list(Category::ALL.iter().map(Category::as_str));
    let urgencies = tag_list(Urgency::ALL.iter().map(Urgency::as_str));

    format!(
        "Tu es un agent de tri de tickets reçus par e-mail.

Ton travail :
1. Lire le sujet et le contenu du mail.
2. Choisir UNE seule catégorie dans cette liste exacte :
   [{categories}]
3. Choisir UN seul niveau d'urgence dans cette liste exacte :
   [{urgencies}]
4. Produire une synthèse courte (1 à 3 phrases), compréhensible par un
   humain, dans la langue du ticket.

Réponds STRICTEMENT avec un seul objet JSON, sans texte autour, par exemple :
{{
  \"categorie\": \"demande_administrative\",
  \"urgence\": \"moderee\",
  \"synthese\": \"...\"
}}
"
    )
}

/// Data message embedding the ticket subject and body verbatim.
#[must_use]
pub fn user_prompt(ticket: &Ticket) -> String {
    format!(
        "Voici un ticket reçu par e-mail.

Sujet :
\"\"\"{subject}\"\"\"

Contenu :
\"\"\"{body}\"\"\"

Analyse ce ticket et renvoie le JSON demandé.
",
        subject = ticket.subject,
        body = ticket.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_every_tag() {
        let prompt = system_prompt();
        for category in Category::ALL {
            assert!(prompt.contains(&format!("\"{category}\"")), "{category}");
        }
        for urgency in Urgency::ALL {
            assert!(prompt.contains(&format!("\"{urgency}\"")), "{urgency}");
        }
        for key in ["categorie", "urgence", "synthese"] {
            assert!(prompt.contains(key));
        }
    }

    #[test]
    fn test_user_prompt_embeds_ticket_verbatim() {
        let ticket = Ticket::new("x", "Mot de passe {oublié}", "Ligne 1\n  Ligne \"2\"\n");
        let prompt = user_prompt(&ticket);
        assert!(prompt.contains("Mot de passe {oublié}"));
        assert!(prompt.contains("Ligne 1\n  Ligne \"2\"\n"));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        let ticket = Ticket::new("x", "Sujet", "Corps");
        assert_eq!(system_prompt(), system_prompt());
        assert_eq!(user_prompt(&ticket), user_prompt(&ticket.clone()));
    }
}
