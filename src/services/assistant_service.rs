use serde::Serialize;

use crate::database::Store;
use crate::models::Complaint;
use crate::services::complaint_service::ComplaintStats;
use crate::services::fallback_responses::fallback_response;
use crate::services::gemini_service::LanguageModel;
use crate::utils::text::truncate_chars;
use crate::utils::AppError;

/// Phrases that are answered straight from the store instead of the model.
pub const TRIGGER_PHRASES: [&str; 8] = [
    "track my complaint",
    "my complaints",
    "show my complaints",
    "list my complaints",
    "check my complaints",
    "view my complaints",
    "status of my complaint",
    "complaint status",
];

pub const NO_COMPLAINTS_MESSAGE: &str = "You haven't submitted any complaints yet. \
You can file one in the Food, Healthcare or Hotel sector, and it will appear here so you can track its status.";

const ASSISTANT_ROLE: &str = "You are a helpful complaint support assistant for ComplaintPortal, \
a multi-sector complaint management system that handles Food, Healthcare, and Hotel complaints.";

const ASSISTANT_INSTRUCTIONS: &str = "Your role is to:
1. Answer questions about the user's specific complaints using the data above
2. Provide complaint resolution timeframes (typically 2 business days for most complaints)
3. Help track complaint status and provide updates
4. Explain complaint details and descriptions
5. Provide statistics about their complaints
6. Maintain a professional, empathetic, and helpful tone
7. Use the actual complaint data to give specific, personalized answers

IMPORTANT: Use the user's actual complaint data above to answer their questions. \
Be specific about their complaints, dates, statuses, and details.";

const DESCRIPTION_PREVIEW: usize = 60;

/// Where an assistant reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Data,
    Ai,
    Fallback,
}

/// Structured complaint record recovered from a model reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub complaint_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct AssistantReply {
    pub response: String,
    pub source: ReplySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Vec<ComplaintSummary>>,
}

impl AssistantReply {
    fn new(response: String, source: ReplySource) -> Self {
        Self { response, source, summaries: None }
    }
}

/// Answers a chat message.
///
/// Tracking questions from a known user are served from the store. Anything
/// else goes to the model with the user's complaints as context; an error or
/// a blank reply from the model drops to the canned responses. Never fails.
pub async fn respond(
    store: &dyn Store,
    model: &dyn LanguageModel,
    message: &str,
    user_id: Option<&str>,
) -> AssistantReply {
    let user_id = user_id.map(str::trim).filter(|id| !id.is_empty());

    let complaints = match user_id {
        Some(id) => Some(store.complaints_for_user(id).await),
        None => None,
    };

    if let Some(Ok(list)) = &complaints {
        if is_tracking_query(message) {
            log::info!("📋 Answering tracking query from stored complaints ({})", list.len());
            let response = if list.is_empty() {
                NO_COMPLAINTS_MESSAGE.to_string()
            } else {
                render_complaint_table(list)
            };
            return AssistantReply::new(response, ReplySource::Data);
        }
    }

    if let Some(Err(e)) = &complaints {
        log::warn!("⚠️  Could not load complaints for assistant context: {}", e);
    }

    let context = complaints.as_ref().map(complaint_context);
    let prompt = build_prompt(context.as_deref(), message);

    match model.generate(&prompt).await {
        Ok(raw) => {
            let cleaned = clean_response(&raw);
            if !cleaned.is_empty() {
                let summaries = parse_summaries(&cleaned);
                return AssistantReply {
                    response: cleaned,
                    source: ReplySource::Ai,
                    summaries: if summaries.is_empty() { None } else { Some(summaries) },
                };
            }
            log::warn!("⚠️  Model reply was empty after cleaning, using fallback");
        }
        Err(e) => {
            log::warn!("⚠️  Model unavailable, using fallback: {}", e);
        }
    }

    AssistantReply::new(fallback_response(message).to_string(), ReplySource::Fallback)
}

pub fn is_tracking_query(message: &str) -> bool {
    let lower = message.to_lowercase();
    TRIGGER_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

fn table_cell(value: &str) -> String {
    value
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

/// Markdown table of the user's complaints followed by status totals.
pub fn render_complaint_table(complaints: &[Complaint]) -> String {
    let mut out = format!("Here are your complaints ({} total):\n\n", complaints.len());
    out.push_str("| # | Type | Status | Submitted | Description |\n");
    out.push_str("|---|------|--------|-----------|-------------|\n");

    for (i, complaint) in complaints.iter().enumerate() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            i + 1,
            complaint.sector,
            table_cell(complaint.status().as_str()),
            table_cell(&complaint.submitted_at()),
            table_cell(&truncate_chars(&complaint.description(), DESCRIPTION_PREVIEW)),
        ));
    }

    let stats = ComplaintStats::from_complaints(complaints);
    out.push_str(&format!(
        "\nPending: {} | In Progress: {} | Resolved: {} | Rejected: {}",
        stats.pending, stats.in_progress, stats.resolved, stats.rejected
    ));
    if stats.other > 0 {
        out.push_str(&format!(" | Other: {}", stats.other));
    }
    out
}

/// Prompt section describing the user's complaints (or why there are none).
pub fn complaint_context(complaints: &Result<Vec<Complaint>, AppError>) -> String {
    let list = match complaints {
        Ok(list) if list.is_empty() => {
            return "USER'S COMPLAINT DATA: No complaints found for this user.".to_string()
        }
        Ok(list) => list,
        Err(_) => {
            return "USER'S COMPLAINT DATA: Unable to fetch complaint data at the moment."
                .to_string()
        }
    };

    let mut out = format!(
        "USER'S COMPLAINT DATA:\nTotal Complaints: {}\n\nComplaint Details:\n",
        list.len()
    );

    for (i, c) in list.iter().enumerate() {
        out.push_str(&format!("{}. Type: {}\n", i + 1, c.sector));
        out.push_str(&format!("   Status: {}\n", c.status()));
        out.push_str(&format!("   Submitted: {}\n", c.submitted_at()));
        out.push_str(&format!("   Description: {}\n", c.description()));
        if let Some(business) = c.business_name() {
            out.push_str(&format!("   Business: {}\n", business));
        }
        if let Some(location) = c.location() {
            out.push_str(&format!("   Location: {}\n", location));
        }
        if let Some(priority) = c.priority() {
            out.push_str(&format!("   Priority: {}\n", priority));
        }
    }

    let stats = ComplaintStats::from_complaints(list);
    out.push_str(&format!(
        "\nCOMPLAINT STATISTICS:\n- Pending: {}\n- In Progress: {}\n- Resolved: {}\n- Rejected: {}\n",
        stats.pending, stats.in_progress, stats.resolved, stats.rejected
    ));
    out
}

pub fn build_prompt(context: Option<&str>, message: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}\n\nUser message: {}\n\nPlease provide a helpful, specific response using the user's actual complaint data. \
If they ask about resolution time, mention that most complaints are resolved within 2 business days, but complex cases may take longer.",
        ASSISTANT_ROLE,
        context.unwrap_or_default(),
        ASSISTANT_INSTRUCTIONS,
        message.trim()
    )
}

/// Strips markdown emphasis characters and emoji, then trims.
pub fn clean_response(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, '*' | '#' | '!' | '\u{1F600}'..='\u{1F6FF}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// "3. Type: Food" -> (3, "Type: Food")
fn numbered_line(line: &str) -> Option<(u32, &str)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    let index = line[..digits].parse().ok()?;
    Some((index, rest.trim()))
}

fn apply_field(summary: &mut ComplaintSummary, line: &str) -> bool {
    let Some((key, value)) = line.split_once(':') else {
        return false;
    };
    let value = value.trim();
    let slot = match key.trim().to_lowercase().as_str() {
        "type" => &mut summary.complaint_type,
        "status" => &mut summary.status,
        "submitted" => &mut summary.submitted,
        "description" => &mut summary.description,
        "business" => &mut summary.business,
        "location" => &mut summary.location,
        "priority" => &mut summary.priority,
        _ => return false,
    };
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
    true
}

fn is_field_line(line: &str) -> bool {
    apply_field(&mut ComplaintSummary::default(), line)
}

/// Recovers numbered complaint summaries from a model reply.
///
/// Summaries with neither a type nor a status are dropped.
pub fn parse_summaries(text: &str) -> Vec<ComplaintSummary> {
    let mut summaries: Vec<ComplaintSummary> = Vec::new();
    let mut current: Option<ComplaintSummary> = None;

    for raw in text.lines() {
        let line = raw.trim().trim_start_matches(['-', '•', '*']).trim();
        if line.is_empty() {
            continue;
        }

        if let Some((index, rest)) = numbered_line(line) {
            summaries.extend(current.take());
            let mut summary = ComplaintSummary { index: Some(index), ..Default::default() };
            apply_field(&mut summary, rest);
            current = Some(summary);
            continue;
        }

        if is_field_line(line) {
            let summary = current.get_or_insert_with(ComplaintSummary::default);
            apply_field(summary, line);
        }
    }
    summaries.extend(current);

    summaries.retain(|s| s.complaint_type.is_some() || s.status.is_some());
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::test_support::StubModel;
    use chrono::Utc;
    use serde_json::json;

    async fn store_with(complaints: Vec<serde_json::Value>) -> MemoryStore {
        let store = MemoryStore::new();
        for (i, payload) in complaints.into_iter().enumerate() {
            let complaint =
                Complaint::from_submission(payload, format!("c{}", i), Utc::now()).unwrap();
            store.insert_complaint(&complaint).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_tracking_query_without_complaints_returns_message() {
        let store = MemoryStore::new();
        let model = StubModel::replying("should not be used");

        let reply = respond(&store, &model, "Please track my complaints", Some("u1")).await;

        assert_eq!(reply.source, ReplySource::Data);
        assert_eq!(reply.response, NO_COMPLAINTS_MESSAGE);
        assert!(!reply.response.contains('|'));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_tracking_query_renders_table() {
        let store = store_with(vec![
            json!({"type": "Food", "userId": "u1", "description": "Soup | cold"}),
            json!({"type": "Hotel", "userId": "u1", "status": "Resolved"}),
        ])
        .await;
        let model = StubModel::failing();

        let reply = respond(&store, &model, "show my complaints", Some("u1")).await;

        assert_eq!(reply.source, ReplySource::Data);
        assert!(reply.response.contains("| 1 | Food | Pending |"));
        assert!(reply.response.contains("Soup \\| cold"));
        assert!(reply.response.contains("| 2 | Hotel | Resolved |"));
        assert!(reply.response.contains("Pending: 1 | In Progress: 0 | Resolved: 1"));
    }

    #[tokio::test]
    async fn test_tracking_query_without_user_goes_to_model() {
        let store = MemoryStore::new();
        let model = StubModel::replying("Log in to see your complaints.");

        let reply = respond(&store, &model, "track my complaint", None).await;

        assert_eq!(reply.source, ReplySource::Ai);
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_model_reply_is_cleaned_and_parsed() {
        let store = store_with(vec![json!({
            "type": "Food",
            "userId": "u1",
            "description": "Cold soup",
            "restaurantName": "Cafe Uno"
        })])
        .await;
        let model = StubModel::replying(
            "## Your complaints!\n\n1. **Type:** Food\n   - Status: Pending\n   - Business: Cafe Uno 😀\n",
        );

        let reply = respond(&store, &model, "what is happening with my food issue?", Some("u1")).await;

        assert_eq!(reply.source, ReplySource::Ai);
        assert!(reply.response.starts_with("Your complaints"));
        assert!(!reply.response.contains('*'));
        assert!(!reply.response.contains('😀'));

        let summaries = reply.summaries.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].complaint_type.as_deref(), Some("Food"));
        assert_eq!(summaries[0].business.as_deref(), Some("Cafe Uno"));

        let prompt = &model.prompts()[0];
        assert!(prompt.contains("Total Complaints: 1"));
        assert!(prompt.contains("Business: Cafe Uno"));
        assert!(prompt.contains("User message: what is happening with my food issue?"));
    }

    #[tokio::test]
    async fn test_model_failure_uses_keyword_fallback() {
        let store = MemoryStore::new();
        let model = StubModel::failing();

        let reply = respond(&store, &model, "How do I file a complaint?", None).await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(reply.response.contains("/complaint/food"));
    }

    #[tokio::test]
    async fn test_blank_model_reply_uses_generic_fallback() {
        let store = MemoryStore::new();
        let model = StubModel::replying("  **!!  ");

        let reply = respond(&store, &model, "hello there", None).await;

        assert_eq!(reply.source, ReplySource::Fallback);
        assert!(!reply.response.is_empty());
    }

    #[test]
    fn test_complaint_context_variants() {
        assert!(complaint_context(&Ok(vec![])).contains("No complaints found for this user."));
        assert!(complaint_context(&Err(AppError::DatabaseError("down".into())))
            .contains("Unable to fetch complaint data at the moment."));
    }

    #[test]
    fn test_is_tracking_query() {
        assert!(is_tracking_query("What's the COMPLAINT STATUS?"));
        assert!(is_tracking_query("can you list my complaints"));
        assert!(!is_tracking_query("how do I file a complaint"));
    }

    #[test]
    fn test_parse_summaries_from_reply() {
        let text = "Here is what I found:\n\
            1. Type: Hotel\n\
               Status: In Progress\n\
               Submitted: 6/14/2025, 3:07:09 PM\n\
               Description: Room was dirty\n\
               Location: Lisbon\n\
            2. Type: Food\n\
               - priority: High\n\
            3. Something unrelated\n\
            Most complaints are resolved within 2 business days.";

        let summaries = parse_summaries(text);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].index, Some(1));
        assert_eq!(summaries[0].status.as_deref(), Some("In Progress"));
        assert_eq!(summaries[0].submitted.as_deref(), Some("6/14/2025, 3:07:09 PM"));
        assert_eq!(summaries[0].location.as_deref(), Some("Lisbon"));
        assert_eq!(summaries[1].index, Some(2));
        assert_eq!(summaries[1].priority.as_deref(), Some("High"));
    }

    #[test]
    fn test_field_lines_without_number_start_a_summary() {
        let summaries = parse_summaries("Status: Resolved\nDescription: Billing error");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].index, None);
        assert_eq!(summaries[0].description.as_deref(), Some("Billing error"));
    }

    #[test]
    fn test_clean_response() {
        assert_eq!(clean_response("  **Hi!** 😀 #1  "), "Hi  1");
    }
}
