//! Templated feedback sentences.

use poise_signal_model::signal::AggregateSignal;

const CONFIDENCE_THRESHOLD: f64 = 0.7;
const NERVOUSNESS_THRESHOLD: f64 = 0.3;
const EYE_CONTACT_THRESHOLD: f64 = 0.5;

/// One sentence per signal, in the order confidence, nervousness, eye contact,
/// joined by single spaces.
pub fn feedback(aggregate: &AggregateSignal) -> String {
    feedback_sentences(aggregate).join(" ")
}

/// The individual sentences behind [`feedback`].
pub fn feedback_sentences(aggregate: &AggregateSignal) -> [&'static str; 3] {
    let confidence = if aggregate.confidence > CONFIDENCE_THRESHOLD {
        "You appear confident."
    } else {
        "You seem a bit unsure."
    };

    let nervousness = if aggregate.nervousness < NERVOUSNESS_THRESHOLD {
        "You seem calm and composed."
    } else {
        "You seem a bit nervous."
    };

    let eye_contact = if aggregate.eye_contact > EYE_CONTACT_THRESHOLD {
        "You maintained good eye contact."
    } else {
        "You lacked eye contact during the interview."
    };

    [confidence, nervousness, eye_contact]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_positive() {
        let text = feedback(&AggregateSignal::new(0.9, 0.1, 1.0));
        assert_eq!(
            text,
            "You appear confident. You seem calm and composed. You maintained good eye contact."
        );
    }

    #[test]
    fn test_all_negative() {
        let text = feedback(&AggregateSignal::new(0.2, 0.9, 0.0));
        assert_eq!(
            text,
            "You seem a bit unsure. You seem a bit nervous. You lacked eye contact during the interview."
        );
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly on each threshold takes the "else" branch.
        let sentences = feedback_sentences(&AggregateSignal::new(0.7, 0.3, 0.5));
        assert_eq!(
            sentences,
            [
                "You seem a bit unsure.",
                "You seem a bit nervous.",
                "You lacked eye contact during the interview."
            ]
        );
    }

    #[test]
    fn test_placeholder_run_without_eye_contact() {
        let text = feedback(&AggregateSignal::new(0.8, 0.2, 0.25));
        assert_eq!(
            text,
            "You appear confident. You seem calm and composed. You lacked eye contact during the interview."
        );
    }
}
