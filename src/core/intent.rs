//! Scheduling intent detection

/// Phrases that mark a message as a booking request
pub const SCHEDULING_PHRASES: &[&str] = &[
    "appointment",
    "schedule",
    "book",
    "reserve",
    "set up",
    "make an appointment",
    "need an appointment",
    "want to schedule",
];

/// Whether the message asks for a service appointment
///
/// Pure substring test on the lower-cased message.
pub fn detect_scheduling_intent(query: &str) -> bool {
    let folded = query.to_lowercase();
    SCHEDULING_PHRASES
        .iter()
        .any(|phrase| folded.contains(phrase))
}
