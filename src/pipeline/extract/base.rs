//! Shared extraction machinery: the capability-backed JSON call every
//! parser tries first, and the regex date sweep the heuristic fallbacks
//! are built on.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::Deserialize;

use super::ParserOutput;
use crate::models::enums::{PriorityLevel, ResponsibleParty};
use crate::models::{ExtractedDate, LegalObligation};
use crate::pipeline::acquire::encode_preview_images;
use crate::pipeline::llm::{extract_json_object, LlmClient};

/// Prompt text budget, matching the capability's context window.
const MAX_PROMPT_CHARS: usize = 12_000;

/// Confidence assigned to keyword-heuristic extractions.
pub const HEURISTIC_CONFIDENCE: f32 = 0.6;
/// Confidence assigned to generic capability extractions.
pub const CAPABILITY_CONFIDENCE: f32 = 0.7;
/// Court orders get a specialized prompt, so their capability output is
/// trusted a notch higher.
pub const COURT_CAPABILITY_CONFIDENCE: f32 = 0.8;

/// Handle on the model capability shared by all parsers.
#[derive(Clone)]
pub struct Capability {
    llm: Arc<dyn LlmClient>,
    model: String,
    max_images: usize,
}

/// Wire shape of a parser capability answer.
#[derive(Deserialize, Default)]
struct RawExtraction {
    #[serde(default)]
    dates: Vec<RawDate>,
    #[serde(default)]
    obligations: Vec<RawObligation>,
}

#[derive(Deserialize)]
struct RawDate {
    date_iso: Option<String>,
    date_type: Option<String>,
    source_text: Option<String>,
}

#[derive(Deserialize)]
struct RawObligation {
    description: Option<String>,
    due_date_iso: Option<String>,
    responsible_party: Option<String>,
    priority_level: Option<String>,
}

impl Capability {
    pub fn new(llm: Arc<dyn LlmClient>, model: &str, max_images: usize) -> Self {
        Self {
            llm,
            model: model.to_string(),
            max_images,
        }
    }

    /// Run one capability extraction. `None` means unusable — the call
    /// failed, the output did not parse, or nothing was extracted — and
    /// the caller falls back to its heuristic (or to empty output).
    pub fn extract(
        &self,
        parser_name: &'static str,
        system_prompt: &str,
        task: &str,
        text: &str,
        images: &[PathBuf],
        date_confidence: f32,
        default_priority: PriorityLevel,
        source_tag: &str,
    ) -> Option<ParserOutput> {
        let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
        let encoded = encode_preview_images(images, self.max_images);
        let prompt = format!("Task: {task}\n\nExtracted text (may be partial):\n{truncated}");

        let response = match self
            .llm
            .generate(&self.model, &prompt, system_prompt, &encoded)
        {
            Ok(r) => r,
            Err(e) => {
                tracing::info!(parser = parser_name, error = %e, "Parser capability call failed");
                return None;
            }
        };

        let json = extract_json_object(&response)?;
        let raw: RawExtraction = match serde_json::from_str(&json) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(parser = parser_name, error = %e, "Parser capability output unparsable");
                return None;
            }
        };

        let mut output = ParserOutput::default();
        for d in raw.dates {
            let Some(date) = d.date_iso.as_deref().and_then(parse_flexible_date) else {
                continue;
            };
            output.dates.push(ExtractedDate {
                date,
                date_type: d.date_type.unwrap_or_else(|| "deadline".to_string()),
                confidence_score: date_confidence,
                source_text: d
                    .source_text
                    .unwrap_or_else(|| format!("{parser_name} parser capability")),
                jurisdiction: None,
            });
        }
        for o in raw.obligations {
            let Some(due_date) = o.due_date_iso.as_deref().and_then(parse_flexible_date) else {
                continue;
            };
            let description = match o.description {
                Some(d) if !d.is_empty() => d,
                _ => continue,
            };
            output.obligations.push(LegalObligation {
                description,
                due_date,
                responsible_party: parse_party(o.responsible_party.as_deref()),
                priority_level: parse_priority(o.priority_level.as_deref(), default_priority),
                associated_case: String::new(),
                source_document: source_tag.to_string(),
            });
        }

        if output.is_empty() {
            tracing::info!(parser = parser_name, "Parser capability output empty");
            None
        } else {
            Some(output)
        }
    }
}

/// Case-insensitive party parse; anything unrecognized defaults to the
/// attorney, the stricter assignment.
fn parse_party(s: Option<&str>) -> ResponsibleParty {
    match s {
        Some(s) if s.eq_ignore_ascii_case("paralegal") => ResponsibleParty::Paralegal,
        _ => ResponsibleParty::Attorney,
    }
}

fn parse_priority(s: Option<&str>, default: PriorityLevel) -> PriorityLevel {
    match s.map(str::to_ascii_lowercase).as_deref() {
        Some("high") => PriorityLevel::High,
        Some("medium") => PriorityLevel::Medium,
        Some("low") => PriorityLevel::Low,
        _ => default,
    }
}

/// Generic extraction system prompt, specialized per parser.
pub fn system_prompt(speciality: &str) -> String {
    format!(
        "You are a legal parsing agent specialized in {speciality}. \
         Using the extracted text and any provided page images, extract key dates and obligations. \
         Return ONLY JSON with fields: \
         dates: array of {{date_iso (ISO8601), date_type (string), source_text}}; \
         obligations: array of {{description, due_date_iso (ISO8601), responsible_party, priority_level}}. \
         Only include an obligation if a due_date is explicitly present; otherwise omit it. \
         Keep types concise (e.g., hearing, trial, deposition, deadline, mediation, appointment). \
         Do not hallucinate. If not sure, leave arrays empty."
    )
}

/// Keyword-heuristic date sweep: every date-looking string in the text,
/// uniformly tagged, at heuristic confidence.
pub fn heuristic_dates(text: &str, date_type: &str, source_text: &str) -> Vec<ExtractedDate> {
    find_dates(text)
        .into_iter()
        .map(|date| ExtractedDate {
            date,
            date_type: date_type.to_string(),
            confidence_score: HEURISTIC_CONFIDENCE,
            source_text: source_text.to_string(),
            jurisdiction: None,
        })
        .collect()
}

/// The one obligation a heuristic path may synthesize: anchored on the
/// first found date, or nothing.
pub fn synthesized_obligation(
    dates: &[ExtractedDate],
    description: &str,
    responsible_party: ResponsibleParty,
    priority_level: PriorityLevel,
    source_tag: &str,
) -> Option<LegalObligation> {
    dates.first().map(|first| LegalObligation {
        description: description.to_string(),
        due_date: first.date,
        responsible_party,
        priority_level,
        associated_case: String::new(),
        source_document: source_tag.to_string(),
    })
}

/// Best-effort timestamp parse for capability output and heuristic
/// matches: RFC 3339 first, then the date-only and US formats that show
/// up in legal documents. Date-only values land at midnight UTC.
pub fn parse_flexible_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%B %d, %Y"] {
        if let Ok(nd) = NaiveDate::parse_from_str(s, fmt) {
            return nd.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
        }
    }
    None
}

/// Sweep the text for date-looking strings: numeric US dates and
/// "Month d, yyyy" spellings. Unparsable matches are dropped.
pub fn find_dates(text: &str) -> Vec<DateTime<Utc>> {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re = DATE_RE.get_or_init(|| {
        Regex::new(r"\b(?:\d{1,2}/\d{1,2}/\d{2,4}|[A-Za-z]+ \d{1,2}, \d{4})\b")
            .unwrap_or_else(|e| panic!("invalid date regex: {e}"))
    });
    re.find_iter(text)
        .filter_map(|m| parse_flexible_date(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::DocumentType;
    use crate::pipeline::llm::{MockLlmClient, NullLlmClient};
    use chrono::Datelike;

    fn capability(llm: impl LlmClient + 'static) -> Capability {
        Capability::new(Arc::new(llm), "test-model", 2)
    }

    fn run(cap: &Capability, text: &str) -> Option<ParserOutput> {
        cap.extract(
            "test",
            "system",
            "task",
            text,
            &[],
            CAPABILITY_CONFIDENCE,
            PriorityLevel::Medium,
            DocumentType::CourtOrder.as_str(),
        )
    }

    #[test]
    fn parses_capability_dates_and_obligations() {
        let response = r#"{"dates": [{"date_iso": "2026-01-10T09:00:00Z", "date_type": "hearing",
            "source_text": "hearing set for January 10"}],
            "obligations": [{"description": "File response brief", "due_date_iso": "2026-01-05",
            "responsible_party": "attorney", "priority_level": "high"}]}"#;
        let out = run(&capability(MockLlmClient::new(response)), "text").unwrap();
        assert_eq!(out.dates.len(), 1);
        assert_eq!(out.dates[0].date_type, "hearing");
        assert_eq!(out.dates[0].confidence_score, CAPABILITY_CONFIDENCE);
        assert_eq!(out.obligations.len(), 1);
        assert_eq!(out.obligations[0].responsible_party, ResponsibleParty::Attorney);
        assert_eq!(out.obligations[0].priority_level, PriorityLevel::High);
        assert_eq!(out.obligations[0].source_document, "court_order");
    }

    #[test]
    fn unavailable_capability_returns_none() {
        assert!(run(&capability(NullLlmClient), "text").is_none());
    }

    #[test]
    fn empty_capability_output_returns_none() {
        let out = run(
            &capability(MockLlmClient::new(r#"{"dates": [], "obligations": []}"#)),
            "text",
        );
        assert!(out.is_none());
    }

    #[test]
    fn unparsable_entries_are_dropped_not_fatal() {
        let response = r#"{"dates": [{"date_iso": "sometime soon", "date_type": "hearing",
            "source_text": "x"}, {"date_iso": "2026-03-01", "date_type": "trial", "source_text": "y"}],
            "obligations": [{"description": "", "due_date_iso": "2026-03-01"},
            {"description": "Serve notice", "due_date_iso": "never"}]}"#;
        let out = run(&capability(MockLlmClient::new(response)), "text").unwrap();
        assert_eq!(out.dates.len(), 1);
        assert_eq!(out.dates[0].date_type, "trial");
        assert!(out.obligations.is_empty());
    }

    #[test]
    fn obligation_defaults_applied() {
        let response = r#"{"dates": [], "obligations": [{"description": "Respond to motion",
            "due_date_iso": "2026-02-01"}]}"#;
        let out = run(&capability(MockLlmClient::new(response)), "text").unwrap();
        assert_eq!(out.obligations[0].responsible_party, ResponsibleParty::Attorney);
        assert_eq!(out.obligations[0].priority_level, PriorityLevel::Medium);
        assert!(out.obligations[0].associated_case.is_empty());
    }

    #[test]
    fn flexible_date_formats() {
        for s in [
            "2026-01-10T09:00:00Z",
            "2026-01-10T09:00:00",
            "2026-01-10",
            "01/10/2026",
            "1/10/26",
            "January 10, 2026",
        ] {
            let dt = parse_flexible_date(s).unwrap_or_else(|| panic!("failed to parse {s}"));
            assert_eq!(dt.year(), 2026);
            assert_eq!(dt.month(), 1);
            assert_eq!(dt.day(), 10);
        }
        assert!(parse_flexible_date("next Tuesday").is_none());
        assert!(parse_flexible_date("").is_none());
    }

    #[test]
    fn find_dates_sweeps_both_formats() {
        let text = "Hearing on 01/10/2026 at 9am; responses due by March 3, 2026. \
                    Within 30, days is not a date.";
        let dates = find_dates(text);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].month(), 1);
        assert_eq!(dates[1].month(), 3);
    }
}
