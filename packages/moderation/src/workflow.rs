//! Moderation workflow state machine.
//!
//! The controller is pure: it validates and decides, it never performs IO.
//! [`WorkflowController::submit`] hands back a [`Submission`] describing the
//! one status update to send; the caller sends it and reports the outcome
//! through [`WorkflowController::complete`].
//!
//! ```text
//! Idle --begin--> AwaitingInput --submit(valid)--> Submitting --complete--> Idle
//!                   |   ^  |
//!                   |   +--+ submit(invalid): validation_error set
//!                   +--cancel--> Idle
//! ```

use conference_api::StatusUpdate;
use serde::Serialize;

use crate::config::CommentPolicy;
use crate::error::WorkflowError;
use crate::types::RequestStatus;

/// An open review of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSession {
    pub request_id: String,
    pub target_status: RequestStatus,
    pub comment: String,
    pub validation_error: Option<String>,
}

impl WorkflowSession {
    fn new(request_id: String, target_status: RequestStatus) -> Self {
        Self {
            request_id,
            target_status,
            comment: String::new(),
            validation_error: None,
        }
    }
}

/// A status update that passed validation and is on its way out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub request_id: String,
    pub update: StatusUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WorkflowState {
    #[default]
    Idle,
    AwaitingInput(WorkflowSession),
    Submitting(Submission),
}

/// What [`WorkflowController::submit`] decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Validation failed; the session stays open with the reason recorded.
    Invalid(String),
    /// Validation passed; send this update.
    Send(Submission),
}

/// Prompt metadata for a target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPrompt {
    pub title: &'static str,
    pub comment_required: bool,
}

pub fn action_title(target: RequestStatus) -> &'static str {
    match target {
        RequestStatus::Approved => "Approve Conference",
        RequestStatus::Rejected => "Reject Conference",
        RequestStatus::Pending => "Set Conference to Pending",
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowController {
    state: WorkflowState,
    policy: CommentPolicy,
}

impl WorkflowController {
    pub fn new(policy: CommentPolicy) -> Self {
        Self {
            state: WorkflowState::Idle,
            policy,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn policy(&self) -> CommentPolicy {
        self.policy
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, WorkflowState::Idle)
    }

    pub fn session(&self) -> Option<&WorkflowSession> {
        match &self.state {
            WorkflowState::AwaitingInput(session) => Some(session),
            _ => None,
        }
    }

    pub fn prompt(&self, target: RequestStatus) -> ActionPrompt {
        ActionPrompt {
            title: action_title(target),
            comment_required: self.policy.requires_comment(target),
        }
    }

    /// Open a review of `request_id` towards `target`. Only legal from idle.
    pub fn begin(
        &mut self,
        request_id: impl Into<String>,
        target: RequestStatus,
    ) -> Result<&WorkflowSession, WorkflowError> {
        let request_id = request_id.into();
        if request_id.trim().is_empty() {
            return Err(WorkflowError::EmptyRequestId);
        }

        match self.state {
            WorkflowState::Idle => {}
            WorkflowState::AwaitingInput(_) => return Err(WorkflowError::SessionActive),
            WorkflowState::Submitting(_) => return Err(WorkflowError::SubmissionInFlight),
        }

        self.state = WorkflowState::AwaitingInput(WorkflowSession::new(request_id, target));
        match &self.state {
            WorkflowState::AwaitingInput(session) => Ok(session),
            _ => Err(WorkflowError::NoActiveSession),
        }
    }

    /// Replace the comment. A pending validation error stays until the next
    /// submit attempt.
    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<(), WorkflowError> {
        match &mut self.state {
            WorkflowState::AwaitingInput(session) => {
                session.comment = comment.into();
                Ok(())
            }
            WorkflowState::Submitting(_) => Err(WorkflowError::SubmissionInFlight),
            WorkflowState::Idle => Err(WorkflowError::NoActiveSession),
        }
    }

    /// Validate the open session and, if it passes, move to submitting.
    pub fn submit(&mut self) -> Result<SubmitDecision, WorkflowError> {
        let session = match &mut self.state {
            WorkflowState::AwaitingInput(session) => session,
            WorkflowState::Submitting(_) => return Err(WorkflowError::SubmissionInFlight),
            WorkflowState::Idle => return Err(WorkflowError::NoActiveSession),
        };

        let comment = session.comment.trim();
        if comment.is_empty() && self.policy.requires_comment(session.target_status) {
            let reason = match session.target_status {
                RequestStatus::Rejected => "A reason is required to reject a conference".to_string(),
                other => format!(
                    "A comment is required to set a conference to {}",
                    other.as_str().to_lowercase()
                ),
            };
            session.validation_error = Some(reason.clone());
            return Ok(SubmitDecision::Invalid(reason));
        }

        let submission = Submission {
            request_id: session.request_id.clone(),
            update: StatusUpdate {
                status: session.target_status,
                message: comment.to_string(),
            },
        };
        self.state = WorkflowState::Submitting(submission.clone());
        Ok(SubmitDecision::Send(submission))
    }

    /// The in-flight submission settled, either way. Back to idle.
    pub fn complete(&mut self) -> Result<Submission, WorkflowError> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Submitting(submission) => Ok(submission),
            other => {
                let err = match other {
                    WorkflowState::AwaitingInput(_) => WorkflowError::SessionActive,
                    _ => WorkflowError::NoActiveSession,
                };
                self.state = other;
                Err(err)
            }
        }
    }

    /// Drop the open session without sending anything.
    pub fn cancel(&mut self) -> Result<WorkflowSession, WorkflowError> {
        match std::mem::take(&mut self.state) {
            WorkflowState::AwaitingInput(session) => Ok(session),
            other => {
                let err = match other {
                    WorkflowState::Submitting(_) => WorkflowError::SubmissionInFlight,
                    _ => WorkflowError::NoActiveSession,
                };
                self.state = other;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_opens_clean_session() {
        let mut workflow = WorkflowController::default();
        let session = workflow.begin("req1", RequestStatus::Approved).unwrap();

        assert_eq!(session.request_id, "req1");
        assert_eq!(session.target_status, RequestStatus::Approved);
        assert!(session.comment.is_empty());
        assert!(session.validation_error.is_none());
    }

    #[test]
    fn test_begin_refuses_while_busy() {
        let mut workflow = WorkflowController::default();
        assert_eq!(
            workflow.begin("  ", RequestStatus::Approved).unwrap_err(),
            WorkflowError::EmptyRequestId
        );

        workflow.begin("req1", RequestStatus::Approved).unwrap();
        assert_eq!(
            workflow.begin("req2", RequestStatus::Approved).unwrap_err(),
            WorkflowError::SessionActive
        );

        workflow.submit().unwrap();
        assert_eq!(
            workflow.begin("req2", RequestStatus::Approved).unwrap_err(),
            WorkflowError::SubmissionInFlight
        );
    }

    #[test]
    fn test_reject_with_blank_comment_stays_open() {
        let mut workflow = WorkflowController::default();
        workflow.begin("req1", RequestStatus::Rejected).unwrap();
        workflow.set_comment("   ").unwrap();

        let decision = workflow.submit().unwrap();
        assert!(matches!(decision, SubmitDecision::Invalid(_)));

        let session = workflow.session().unwrap();
        assert!(session.validation_error.is_some());
        assert_eq!(session.comment, "   ");
    }

    #[test]
    fn test_valid_submit_trims_comment() {
        let mut workflow = WorkflowController::default();
        workflow.begin("req1", RequestStatus::Rejected).unwrap();
        workflow.set_comment("  insufficient info \n").unwrap();

        let decision = workflow.submit().unwrap();
        let SubmitDecision::Send(submission) = decision else {
            panic!("expected a submission");
        };
        assert_eq!(submission.request_id, "req1");
        assert_eq!(submission.update.status, RequestStatus::Rejected);
        assert_eq!(submission.update.message, "insufficient info");
        assert!(matches!(workflow.state(), WorkflowState::Submitting(_)));

        assert_eq!(workflow.complete().unwrap(), submission);
        assert!(workflow.is_idle());
    }

    #[test]
    fn test_approve_needs_no_comment_by_default() {
        let mut workflow = WorkflowController::default();
        workflow.begin("req1", RequestStatus::Approved).unwrap();

        let decision = workflow.submit().unwrap();
        let SubmitDecision::Send(submission) = decision else {
            panic!("expected a submission");
        };
        assert_eq!(submission.update.message, "");
    }

    #[test]
    fn test_always_policy_requires_comment_for_every_status() {
        let mut workflow = WorkflowController::new(CommentPolicy::Always);
        workflow.begin("req1", RequestStatus::Pending).unwrap();

        let decision = workflow.submit().unwrap();
        assert_eq!(
            decision,
            SubmitDecision::Invalid("A comment is required to set a conference to pending".into())
        );
        assert!(workflow.prompt(RequestStatus::Approved).comment_required);
    }

    #[test]
    fn test_cancel_only_from_awaiting_input() {
        let mut workflow = WorkflowController::default();
        assert_eq!(workflow.cancel().unwrap_err(), WorkflowError::NoActiveSession);

        workflow.begin("req1", RequestStatus::Approved).unwrap();
        let session = workflow.cancel().unwrap();
        assert_eq!(session.request_id, "req1");
        assert!(workflow.is_idle());

        workflow.begin("req1", RequestStatus::Approved).unwrap();
        workflow.submit().unwrap();
        assert_eq!(workflow.cancel().unwrap_err(), WorkflowError::SubmissionInFlight);
        assert!(matches!(workflow.state(), WorkflowState::Submitting(_)));
    }

    #[test]
    fn test_complete_without_submission_is_refused() {
        let mut workflow = WorkflowController::default();
        workflow.begin("req1", RequestStatus::Approved).unwrap();

        assert_eq!(workflow.complete().unwrap_err(), WorkflowError::SessionActive);
        assert!(workflow.session().is_some());
    }

    #[test]
    fn test_prompt_metadata() {
        let workflow = WorkflowController::default();
        let reject = workflow.prompt(RequestStatus::Rejected);
        assert_eq!(reject.title, "Reject Conference");
        assert!(reject.comment_required);

        let pending = workflow.prompt(RequestStatus::Pending);
        assert_eq!(pending.title, "Set Conference to Pending");
        assert!(!pending.comment_required);
    }
}
