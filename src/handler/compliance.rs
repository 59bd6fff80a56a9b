//! Keyword-based compliance reviewer
//!
//! Flags risky wording in a document, scores the overall risk, and decides
//! whether a human has to look at it. Routing rules:
//!
//! - a risk score of 70 or more requires review
//! - any high or critical flag requires review
//! - contracts and disclosures require review from a score of 50

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{HandlerContext, HandlerOutcome, TaskHandler};
use crate::protocol::AgentSkill;

/// Skill id of the compliance reviewer
pub const SKILL_ID: &str = "compliance-review";

const REVIEW_SCORE_THRESHOLD: u32 = 70;
const ELEVATED_SCORE_THRESHOLD: u32 = 50;

/// Severity of a flagged phrase
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Contribution of one flag to the risk score
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Low => 10,
            Severity::Medium => 25,
            Severity::High => 40,
            Severity::Critical => 60,
        }
    }

    /// Risk level for an overall score
    pub fn from_score(score: u32) -> Self {
        match score {
            80.. => Severity::Critical,
            60..=79 => Severity::High,
            30..=59 => Severity::Medium,
            _ => Severity::Low,
        }
    }
}

/// A phrase that flags a document when present
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordRule {
    /// Matched case-insensitively anywhere in the text
    pub keyword: String,

    /// Risk category reported with the flag
    pub category: String,

    pub severity: Severity,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, category: impl Into<String>, severity: Severity) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.into(),
            severity,
        }
    }

    /// Rules used when none are configured
    pub fn defaults() -> Vec<KeywordRule> {
        vec![
            KeywordRule::new("guarantee", "misleading_claims", Severity::High),
            KeywordRule::new("unlimited", "unsubstantiated_terms", Severity::Medium),
            KeywordRule::new("confidential", "confidentiality", Severity::Low),
        ]
    }
}

/// Kind of document, inferred from its vocabulary
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Policy,
    Contract,
    Disclosure,
    Marketing,
    Other,
}

impl DocumentType {
    /// Classify by the first category whose markers appear in the text
    pub fn classify(lowercase_text: &str) -> Self {
        const MARKERS: &[(DocumentType, &[&str])] = &[
            (
                DocumentType::Contract,
                &["agreement", "hereby", "party", "parties", "terms of service"],
            ),
            (
                DocumentType::Disclosure,
                &["disclosure", "prospectus", "filing", "past performance"],
            ),
            (
                DocumentType::Policy,
                &["policy", "procedure", "employees must", "guideline"],
            ),
            (
                DocumentType::Marketing,
                &["offer", "limited time", "sign up", "promotion", "returns"],
            ),
        ];

        MARKERS
            .iter()
            .find(|(_, markers)| markers.iter().any(|m| lowercase_text.contains(m)))
            .map(|(doc_type, _)| *doc_type)
            .unwrap_or(DocumentType::Other)
    }

    /// Wire name of the document type
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Policy => "policy",
            DocumentType::Contract => "contract",
            DocumentType::Disclosure => "disclosure",
            DocumentType::Marketing => "marketing",
            DocumentType::Other => "other",
        }
    }

    fn is_binding(&self) -> bool {
        matches!(self, DocumentType::Contract | DocumentType::Disclosure)
    }
}

/// One matched rule
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RiskFlag {
    pub keyword: String,
    pub category: String,
    pub severity: Severity,
}

/// Full result of a review
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComplianceReport {
    pub document_type: DocumentType,
    pub flags: Vec<RiskFlag>,
    pub risk_count: usize,
    pub risk_score: u32,
    pub risk_level: Severity,
    pub requires_human_review: bool,
    pub review_reason: String,
    pub recommendation: String,
}

/// Compliance reviewer skill
#[derive(Debug, Clone)]
pub struct ComplianceHandler {
    rules: Vec<KeywordRule>,
    human_review_gate: bool,
}

impl Default for ComplianceHandler {
    fn default() -> Self {
        Self::new(KeywordRule::defaults())
    }
}

impl ComplianceHandler {
    /// Create a reviewer with the given rules
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self {
            rules,
            human_review_gate: false,
        }
    }

    /// Park documents that need review in `input-required` instead of completing
    pub fn with_human_review_gate(mut self, enabled: bool) -> Self {
        self.human_review_gate = enabled;
        self
    }

    /// Review a document
    pub fn review(&self, text: &str) -> ComplianceReport {
        let lowered = text.to_lowercase();

        let flags: Vec<RiskFlag> = self
            .rules
            .iter()
            .filter(|rule| lowered.contains(&rule.keyword.to_lowercase()))
            .map(|rule| RiskFlag {
                keyword: rule.keyword.clone(),
                category: rule.category.clone(),
                severity: rule.severity,
            })
            .collect();

        let document_type = DocumentType::classify(&lowered);
        let risk_score = flags
            .iter()
            .map(|f| f.severity.weight())
            .sum::<u32>()
            .min(100);

        let mut reasons = Vec::new();
        if risk_score >= REVIEW_SCORE_THRESHOLD {
            reasons.push(format!("High risk score: {}", risk_score));
        }
        let severe = flags
            .iter()
            .filter(|f| f.severity >= Severity::High)
            .count();
        if severe > 0 {
            reasons.push(format!("{} high/critical risk flags", severe));
        }
        if document_type.is_binding() && risk_score >= ELEVATED_SCORE_THRESHOLD {
            reasons.push(format!("{} with elevated risk", document_type.as_str()));
        }

        let requires_human_review = !reasons.is_empty();
        let review_reason = if requires_human_review {
            reasons.join("; ")
        } else {
            "No review required".to_string()
        };

        let recommendation = if flags.is_empty() {
            "No issues found"
        } else {
            "Review required"
        };

        ComplianceReport {
            document_type,
            risk_count: flags.len(),
            flags,
            risk_score,
            risk_level: Severity::from_score(risk_score),
            requires_human_review,
            review_reason,
            recommendation: recommendation.to_string(),
        }
    }
}

#[async_trait]
impl TaskHandler for ComplianceHandler {
    fn skill(&self) -> AgentSkill {
        AgentSkill::new(
            SKILL_ID,
            "Compliance Review",
            "Flags risky wording in financial documents and scores compliance risk",
        )
        .with_tag("compliance")
        .with_tag("risk")
        .with_example("We guarantee unlimited confidential returns")
    }

    async fn handle(&self, input: &str, ctx: &HandlerContext) -> anyhow::Result<HandlerOutcome> {
        let report = self.review(input);
        tracing::debug!(
            task_id = %ctx.task_id,
            risk_count = report.risk_count,
            risk_score = report.risk_score,
            "compliance review finished"
        );

        if self.human_review_gate && report.requires_human_review {
            return Ok(HandlerOutcome::InputRequired(report.review_reason));
        }

        Ok(HandlerOutcome::completed(serde_json::to_value(&report)?))
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::message::Message;

    use super::*;

    fn ctx() -> HandlerContext {
        HandlerContext {
            task_id: "task-1".to_string(),
            message: Message::user("unused"),
        }
    }

    #[test]
    fn test_flags_all_default_keywords() {
        let report =
            ComplianceHandler::default().review("We guarantee unlimited confidential returns");

        assert_eq!(report.risk_count, 3);
        assert_eq!(report.recommendation, "Review required");
        assert_eq!(report.risk_score, 75);
        assert_eq!(report.risk_level, Severity::High);
        assert!(report.requires_human_review);
        assert_eq!(
            report.review_reason,
            "High risk score: 75; 1 high/critical risk flags"
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let report = ComplianceHandler::default().review("GUARANTEED results");
        assert_eq!(report.risk_count, 1);
        assert_eq!(report.flags[0].category, "misleading_claims");
    }

    #[test]
    fn test_clean_document() {
        let report = ComplianceHandler::default().review("Quarterly staff newsletter");

        assert_eq!(report.risk_count, 0);
        assert_eq!(report.risk_score, 0);
        assert_eq!(report.risk_level, Severity::Low);
        assert!(!report.requires_human_review);
        assert_eq!(report.review_reason, "No review required");
        assert_eq!(report.recommendation, "No issues found");
    }

    #[test]
    fn test_binding_documents_review_at_elevated_score() {
        let handler = ComplianceHandler::new(vec![
            KeywordRule::new("exclusive", "terms", Severity::Medium),
            KeywordRule::new("waive", "liability", Severity::Medium),
        ]);

        let report = handler.review("This agreement lets the client waive exclusive rights");
        assert_eq!(report.document_type, DocumentType::Contract);
        assert_eq!(report.risk_score, 50);
        assert!(report.requires_human_review);
        assert_eq!(report.review_reason, "contract with elevated risk");
    }

    #[test]
    fn test_score_is_capped() {
        let handler = ComplianceHandler::new(vec![
            KeywordRule::new("a", "x", Severity::Critical),
            KeywordRule::new("b", "x", Severity::Critical),
        ]);
        let report = handler.review("a b");
        assert_eq!(report.risk_score, 100);
        assert_eq!(report.risk_level, Severity::Critical);
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            DocumentType::classify("this investment advisory agreement"),
            DocumentType::Contract
        );
        assert_eq!(
            DocumentType::classify("past performance is not indicative"),
            DocumentType::Disclosure
        );
        assert_eq!(DocumentType::classify("hello"), DocumentType::Other);
    }

    #[tokio::test]
    async fn test_handle_produces_report_map() {
        let outcome = ComplianceHandler::default()
            .handle("We guarantee unlimited confidential returns", &ctx())
            .await
            .unwrap();

        match outcome {
            HandlerOutcome::Completed(map) => {
                assert_eq!(map["risk_count"], 3);
                assert_eq!(map["recommendation"], "Review required");
                assert_eq!(map["risk_level"], "high");
                assert_eq!(map["flags"].as_array().unwrap().len(), 3);
            }
            _ => panic!("Expected completed outcome"),
        }
    }

    #[tokio::test]
    async fn test_review_gate_requests_input() {
        let outcome = ComplianceHandler::default()
            .with_human_review_gate(true)
            .handle("We guarantee returns", &ctx())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            HandlerOutcome::InputRequired("1 high/critical risk flags".to_string())
        );
    }
}
