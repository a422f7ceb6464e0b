// Canned assistant replies used when the language model is unavailable.

const TRACKING: &str = "To track your complaints:

1. Login to your account
2. Visit your Dashboard to see all complaints
3. Check status updates (we'll also email you when a status changes)
4. View details by clicking on any complaint

Your dashboard shows the current status of every complaint you have submitted.";

const SECTORS: &str = "We handle complaints in three main sectors:

Food & Restaurant
- Food quality issues
- Hygiene concerns
- Service problems
- Billing disputes

Healthcare
- Medical service concerns
- Hospital facilities
- Staff behavior
- Treatment quality

Hotel & Hospitality
- Room quality issues
- Service standards
- Amenities problems
- Booking issues

Which sector would you like to file a complaint for?";

const FILING: &str = "To file a complaint, follow these steps:

1. Choose your sector:
   - Food complaints: /complaint/food
   - Hospital complaints: /complaint/hospital
   - Hotel complaints: /complaint/hotel
2. Fill out the form with detailed information
3. Submit and track your complaint in the dashboard

Would you like me to guide you to a specific complaint form?";

const HELP: &str = "I'm here to help! Here are your options:

Quick Actions:
- File a new complaint
- Track existing complaints
- Contact our support team

Need Human Support?
Visit our Contact page or email support@complaintportal.com

What specific help do you need today?";

pub const GENERIC_FALLBACK: &str = "I'm here to help with your complaint management needs! I can assist you with:

- Filing complaints in Food, Healthcare, or Hotel sectors
- Tracking complaint status and updates
- Understanding the process and timelines
- General support and guidance

What would you like to know about our complaint management system?";

/// Checked in order; the first group with a keyword in the message wins.
/// Tracking and sector questions usually mention "complaint" too, so the
/// filing group comes after them.
const KEYWORD_GROUPS: [(&[&str], &str); 4] = [
    (&["track", "status", "dashboard"], TRACKING),
    (&["type", "category", "sector"], SECTORS),
    (&["file", "submit", "complaint"], FILING),
    (&["help", "support", "contact"], HELP),
];

/// Keyword-matched canned reply, if any group matches.
pub fn keyword_fallback(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
}

/// Keyword reply, or the generic message when nothing matches.
pub fn fallback_response(message: &str) -> &'static str {
    keyword_fallback(message).unwrap_or(GENERIC_FALLBACK)
}
