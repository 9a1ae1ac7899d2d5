//! Recruitment session: the shortlist, interview transcripts and final
//! reports of one reviewer, keyed by job id and then candidate id.
//!
//! The session is a plain value owned by the caller. The HTTP layer keeps one
//! behind a mutex in `AppState`.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::matching::ranker::Candidate;

pub mod handlers;

/// Separator placed between reports when they are combined for comparison.
pub const REPORT_SEPARATOR: &str = "\n\n---\n\n";
/// A comparative analysis needs at least this many reports.
pub const MIN_FINALISTS_FOR_COMPARISON: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no candidates were selected for interview")]
    EmptySelection,

    #[error("candidate {0} appears more than once in the selection")]
    DuplicateCandidate(String),

    #[error("job {0} has no confirmed selection")]
    UnknownJob(String),

    #[error("candidate {candidate_id} is not shortlisted for job {job_id}")]
    NotShortlisted {
        job_id: String,
        candidate_id: String,
    },

    #[error("comparison needs at least {required} reports, job has {available}")]
    NotEnoughFinalists { required: usize, available: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    pub candidate_id: String,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finalist {
    pub candidate: Candidate,
    pub report: FinalReport,
}

#[derive(Debug, Clone, Default)]
struct JobPipeline {
    shortlist: Vec<Candidate>,
    transcripts: HashMap<String, Vec<ChatMessage>>,
    /// Insertion order is the order finalists are presented in.
    reports: Vec<FinalReport>,
}

impl JobPipeline {
    fn shortlisted(&self, candidate_id: &str) -> Option<&Candidate> {
        self.shortlist.iter().find(|c| c.id == candidate_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecruitmentSession {
    jobs: HashMap<String, JobPipeline>,
    active_job: Option<String>,
}

impl RecruitmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The job whose selection was confirmed most recently.
    pub fn active_job(&self) -> Option<&str> {
        self.active_job.as_deref()
    }

    pub fn shortlist(&self, job_id: &str) -> Result<&[Candidate], SessionError> {
        Ok(self.job(job_id)?.shortlist.as_slice())
    }

    /// Replaces the job's shortlist. Reports and transcripts from an earlier
    /// selection for the same job are discarded. Candidate ids must be unique.
    pub fn confirm_selection(
        &mut self,
        job_id: &str,
        candidates: Vec<Candidate>,
    ) -> Result<&[Candidate], SessionError> {
        if candidates.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = candidates.iter().find(|c| !seen.insert(c.id.as_str())) {
            return Err(SessionError::DuplicateCandidate(duplicate.id.clone()));
        }

        info!(job_id, selected = candidates.len(), "interview selection confirmed");
        self.active_job = Some(job_id.to_string());
        let pipeline = self.jobs.entry(job_id.to_string()).or_default();
        *pipeline = JobPipeline {
            shortlist: candidates,
            ..JobPipeline::default()
        };
        Ok(pipeline.shortlist.as_slice())
    }

    /// Returns the candidate's transcript, starting it with a greeting the
    /// first time the interview is opened.
    pub fn open_interview(
        &mut self,
        job_id: &str,
        candidate_id: &str,
    ) -> Result<&[ChatMessage], SessionError> {
        let pipeline = self.job_mut(job_id)?;
        let candidate = pipeline
            .shortlisted(candidate_id)
            .ok_or_else(|| not_shortlisted(job_id, candidate_id))?;
        let greeting = greeting_for(candidate);

        let transcript = pipeline
            .transcripts
            .entry(candidate_id.to_string())
            .or_insert_with(|| {
                vec![ChatMessage {
                    role: ChatRole::Assistant,
                    content: greeting,
                    sent_at: Utc::now(),
                }]
            });
        Ok(transcript.as_slice())
    }

    pub fn record_message(
        &mut self,
        job_id: &str,
        candidate_id: &str,
        role: ChatRole,
        content: impl Into<String>,
    ) -> Result<&[ChatMessage], SessionError> {
        self.open_interview(job_id, candidate_id)?;
        let transcript = self
            .job_mut(job_id)?
            .transcripts
            .get_mut(candidate_id)
            .ok_or_else(|| not_shortlisted(job_id, candidate_id))?;
        transcript.push(ChatMessage {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        });
        Ok(transcript.as_slice())
    }

    /// One `"{label}: {content}"` line per message.
    pub fn render_transcript(
        &self,
        job_id: &str,
        candidate_id: &str,
        user_label: &str,
        assistant_label: &str,
    ) -> Result<String, SessionError> {
        let pipeline = self.job(job_id)?;
        pipeline
            .shortlisted(candidate_id)
            .ok_or_else(|| not_shortlisted(job_id, candidate_id))?;

        let lines: Vec<String> = pipeline
            .transcripts
            .get(candidate_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|message| {
                let label = match message.role {
                    ChatRole::User => user_label,
                    ChatRole::Assistant => assistant_label,
                };
                format!("{label}: {}", message.content)
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// Stores the candidate's final report, replacing an earlier one in place.
    pub fn record_report(
        &mut self,
        job_id: &str,
        candidate_id: &str,
        content: impl Into<String>,
    ) -> Result<&FinalReport, SessionError> {
        let pipeline = self.job_mut(job_id)?;
        pipeline
            .shortlisted(candidate_id)
            .ok_or_else(|| not_shortlisted(job_id, candidate_id))?;

        let report = FinalReport {
            candidate_id: candidate_id.to_string(),
            content: content.into(),
            generated_at: Utc::now(),
        };

        let index = match pipeline
            .reports
            .iter()
            .position(|r| r.candidate_id == candidate_id)
        {
            Some(index) => {
                pipeline.reports[index] = report;
                index
            }
            None => {
                pipeline.reports.push(report);
                pipeline.reports.len() - 1
            }
        };
        info!(job_id, candidate_id, "final report recorded");
        Ok(&pipeline.reports[index])
    }

    pub fn finalists(&self, job_id: &str) -> Result<Vec<Finalist>, SessionError> {
        let pipeline = self.job(job_id)?;
        Ok(pipeline
            .reports
            .iter()
            .filter_map(|report| {
                pipeline
                    .shortlisted(&report.candidate_id)
                    .map(|candidate| Finalist {
                        candidate: candidate.clone(),
                        report: report.clone(),
                    })
            })
            .collect())
    }

    pub fn comparison_ready(&self, job_id: &str) -> bool {
        self.jobs
            .get(job_id)
            .map(|p| p.reports.len() >= MIN_FINALISTS_FOR_COMPARISON)
            .unwrap_or(false)
    }

    /// All reports of the job joined for a comparative analysis.
    pub fn combined_reports(&self, job_id: &str) -> Result<String, SessionError> {
        let pipeline = self.job(job_id)?;
        if pipeline.reports.len() < MIN_FINALISTS_FOR_COMPARISON {
            return Err(SessionError::NotEnoughFinalists {
                required: MIN_FINALISTS_FOR_COMPARISON,
                available: pipeline.reports.len(),
            });
        }
        Ok(pipeline
            .reports
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>()
            .join(REPORT_SEPARATOR))
    }

    fn job(&self, job_id: &str) -> Result<&JobPipeline, SessionError> {
        self.jobs
            .get(job_id)
            .ok_or_else(|| SessionError::UnknownJob(job_id.to_string()))
    }

    fn job_mut(&mut self, job_id: &str) -> Result<&mut JobPipeline, SessionError> {
        self.jobs
            .get_mut(job_id)
            .ok_or_else(|| SessionError::UnknownJob(job_id.to_string()))
    }
}

fn not_shortlisted(job_id: &str, candidate_id: &str) -> SessionError {
    SessionError::NotShortlisted {
        job_id: job_id.to_string(),
        candidate_id: candidate_id.to_string(),
    }
}

fn greeting_for(candidate: &Candidate) -> String {
    let name = candidate.name.as_deref().unwrap_or(&candidate.id);
    format!("Hello! I'm the AI interview assistant. Ready to start the interview with **{name}**.")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, name: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: Some(name.to_string()),
            text: String::new(),
        }
    }

    fn session_with_shortlist() -> RecruitmentSession {
        let mut session = RecruitmentSession::new();
        session
            .confirm_selection("5185", vec![candidate("c1", "Ana"), candidate("c2", "Bruno")])
            .unwrap();
        session
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut session = RecruitmentSession::new();
        assert_eq!(
            session.confirm_selection("5185", vec![]),
            Err(SessionError::EmptySelection)
        );
        assert_eq!(session.active_job(), None);
    }

    #[test]
    fn test_duplicate_candidate_ids_are_rejected() {
        let mut session = session_with_shortlist();
        assert_eq!(
            session.confirm_selection(
                "7000",
                vec![candidate("c1", "Ana"), candidate("c2", "Bruno"), candidate("c1", "Other")]
            ),
            Err(SessionError::DuplicateCandidate("c1".to_string()))
        );
        assert_eq!(session.active_job(), Some("5185"));
        assert_eq!(session.shortlist("7000"), Err(SessionError::UnknownJob("7000".to_string())));
    }

    #[test]
    fn test_confirm_selection_sets_active_job() {
        let session = session_with_shortlist();
        assert_eq!(session.active_job(), Some("5185"));
        assert_eq!(session.shortlist("5185").unwrap().len(), 2);
    }

    #[test]
    fn test_reconfirming_clears_previous_reports() {
        let mut session = session_with_shortlist();
        session.record_report("5185", "c1", "report").unwrap();
        session
            .confirm_selection("5185", vec![candidate("c1", "Ana")])
            .unwrap();
        assert!(session.finalists("5185").unwrap().is_empty());
    }

    #[test]
    fn test_open_interview_seeds_greeting_once() {
        let mut session = session_with_shortlist();
        let transcript = session.open_interview("5185", "c1").unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, ChatRole::Assistant);
        assert!(transcript[0].content.contains("**Ana**"));

        assert_eq!(session.open_interview("5185", "c1").unwrap().len(), 1);
    }

    #[test]
    fn test_interview_requires_known_job_and_shortlisted_candidate() {
        let mut session = session_with_shortlist();
        assert_eq!(
            session.open_interview("9999", "c1").unwrap_err(),
            SessionError::UnknownJob("9999".to_string())
        );
        assert!(matches!(
            session.open_interview("5185", "c9"),
            Err(SessionError::NotShortlisted { .. })
        ));
    }

    #[test]
    fn test_record_message_appends_after_greeting() {
        let mut session = session_with_shortlist();
        session
            .record_message("5185", "c2", ChatRole::User, "I have 5 years of Rust.")
            .unwrap();
        let transcript = session
            .record_message("5185", "c2", ChatRole::Assistant, "Tell me about Tokio.")
            .unwrap();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, ChatRole::User);
    }

    #[test]
    fn test_render_transcript_uses_labels() {
        let mut session = session_with_shortlist();
        session
            .record_message("5185", "c1", ChatRole::User, "Hi")
            .unwrap();
        let rendered = session
            .render_transcript("5185", "c1", "Candidate", "Interviewer")
            .unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Interviewer: Hello!"));
        assert_eq!(lines[1], "Candidate: Hi");
    }

    #[test]
    fn test_render_transcript_of_unopened_interview_is_empty() {
        let session = session_with_shortlist();
        assert_eq!(
            session.render_transcript("5185", "c2", "U", "A").unwrap(),
            ""
        );
    }

    #[test]
    fn test_record_report_replaces_in_place() {
        let mut session = session_with_shortlist();
        session.record_report("5185", "c1", "first").unwrap();
        session.record_report("5185", "c2", "second").unwrap();
        session.record_report("5185", "c1", "revised").unwrap();

        let finalists = session.finalists("5185").unwrap();
        assert_eq!(finalists.len(), 2);
        assert_eq!(finalists[0].candidate.id, "c1");
        assert_eq!(finalists[0].report.content, "revised");
        assert_eq!(finalists[1].candidate.name.as_deref(), Some("Bruno"));
    }

    #[test]
    fn test_comparison_needs_two_reports() {
        let mut session = session_with_shortlist();
        session.record_report("5185", "c1", "A").unwrap();
        assert!(!session.comparison_ready("5185"));
        assert_eq!(
            session.combined_reports("5185"),
            Err(SessionError::NotEnoughFinalists {
                required: 2,
                available: 1
            })
        );

        session.record_report("5185", "c2", "B").unwrap();
        assert!(session.comparison_ready("5185"));
        assert_eq!(session.combined_reports("5185").unwrap(), "A\n\n---\n\nB");
    }

    #[test]
    fn test_jobs_are_isolated() {
        let mut session = session_with_shortlist();
        session
            .confirm_selection("7000", vec![candidate("c1", "Ana")])
            .unwrap();
        session.record_report("7000", "c1", "other job").unwrap();

        assert!(session.finalists("5185").unwrap().is_empty());
        assert_eq!(session.active_job(), Some("7000"));
        assert!(!session.comparison_ready("unknown"));
    }
}
