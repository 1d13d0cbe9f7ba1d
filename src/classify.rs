//! Heuristic promotional classification.
//!
//! Deterministic keyword scoring — no network, no model. The keyword
//! list, the `List-Unsubscribe` weight, and the verdict threshold are
//! plain configuration on the classifier so they can be tuned without
//! changing the algorithm's shape.

use crate::model::EmailMessage;

/// Keywords that each add one point when found as a case-insensitive
/// substring of subject + body + sender.
const DEFAULT_KEYWORDS: &[&str] = &[
    "sale",
    "discount",
    "off",
    "deal",
    "offer",
    "save",
    "free",
    "limited time",
    "expires",
    "ending soon",
    "last chance",
    "25%",
    "50%",
    "percent",
    "promo",
    "coupon",
    "unsubscribe",
    "marketing email",
    "promotional",
    "newsletter",
];

/// Keyword-scoring promotional classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub keywords: Vec<String>,
    /// Points added when a `List-Unsubscribe` header is present.
    pub list_unsubscribe_weight: u32,
    /// Minimum score for a promotional verdict.
    pub threshold: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            list_unsubscribe_weight: 3,
            threshold: 2,
        }
    }
}

impl Classifier {
    /// Score a message and return the promotional verdict.
    ///
    /// Pure function of subject, body, sender, and header presence; the
    /// verdict is computed once per message and never recomputed after
    /// persistence.
    pub fn classify(&self, email: &EmailMessage) -> bool {
        let content = format!("{} {} {}", email.subject, email.body, email.from).to_lowercase();

        let mut score = 0u32;
        for keyword in &self.keywords {
            if content.contains(keyword.as_str()) {
                score += 1;
            }
        }

        if email.headers.contains_key("List-Unsubscribe") {
            score += self.list_unsubscribe_weight;
        }

        score >= self.threshold
    }
}
