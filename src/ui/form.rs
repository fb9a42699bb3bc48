use chrono::{DateTime, Local};

use crate::{
    api::{PredictError, PredictRequest},
    domain::PredictionResult,
};

pub const REQUEST_FAILED_MESSAGE: &str = "Error analyzing comment. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitControl {
    Enabled,
    Disabled,
    Busy,
}

/// State behind the comment form: the text being edited, the last successful
/// results, and the in-flight/error flags.
#[derive(Debug, Default)]
pub struct FormState {
    input: String,
    results: Vec<PredictionResult>,
    loading: bool,
    error: Option<&'static str>,
    analyzed_at: Option<DateTime<Local>>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn results(&self) -> &[PredictionResult] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Local>> {
        self.analyzed_at
    }

    #[cfg(test)]
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn append_line(&mut self, line: &str) {
        if !self.input.is_empty() {
            self.input.push('\n');
        }
        self.input.push_str(line);
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    pub fn submit_control(&self) -> SubmitControl {
        if self.loading {
            SubmitControl::Busy
        } else if self.can_submit() {
            SubmitControl::Enabled
        } else {
            SubmitControl::Disabled
        }
    }

    /// Marks the form as in flight and hands back the request to send, or
    /// `None` when the Analyze control is disabled.
    pub fn begin_submit(&mut self) -> Option<PredictRequest> {
        if !self.can_submit() {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(PredictRequest::single(self.input.clone()))
    }

    pub fn finish_submit(&mut self, outcome: Result<Vec<PredictionResult>, PredictError>) {
        match outcome {
            Ok(results) => {
                tracing::info!(target: "form", results = results.len(), "comment analyzed");
                self.results = results;
                self.input.clear();
                self.analyzed_at = Some(Local::now());
            }
            Err(err) => {
                tracing::error!(target: "form", error = %err, "prediction request failed");
                self.error = Some(REQUEST_FAILED_MESSAGE);
            }
        }
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use futures::future::{BoxFuture, FutureExt};
    use reqwest::StatusCode;

    use super::*;
    use crate::api::{protocol::HealthStatus, PredictionService};

    #[derive(Default)]
    struct ScriptedService {
        replies: Mutex<VecDeque<Result<Vec<PredictionResult>, PredictError>>>,
        requests: Mutex<Vec<PredictRequest>>,
        calls: AtomicUsize,
    }

    impl ScriptedService {
        fn replying(reply: Result<Vec<PredictionResult>, PredictError>) -> Self {
            let service = Self::default();
            service.replies.lock().unwrap().push_back(reply);
            service
        }
    }

    impl PredictionService for ScriptedService {
        fn predict<'a>(
            &'a self,
            request: &'a PredictRequest,
        ) -> BoxFuture<'a, Result<Vec<PredictionResult>, PredictError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()));
            async move { reply }.boxed()
        }

        fn health(&self) -> BoxFuture<'_, Result<HealthStatus, PredictError>> {
            async {
                Err(PredictError::Status {
                    status: StatusCode::NOT_IMPLEMENTED,
                    detail: None,
                })
            }
            .boxed()
        }
    }

    /// Same begin/send/finish sequence the terminal view drives.
    async fn submit(form: &mut FormState, service: &dyn PredictionService) -> bool {
        let Some(request) = form.begin_submit() else {
            return false;
        };
        let outcome = service.predict(&request).await;
        form.finish_submit(outcome);
        true
    }

    fn server_error() -> PredictError {
        PredictError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some("model exploded".into()),
        }
    }

    fn spam(comment: &str, probability: f64) -> PredictionResult {
        PredictionResult {
            comment: comment.into(),
            is_spam: true,
            spam_probability: probability,
            ham_probability: 1.0 - probability,
        }
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_network() {
        let service = ScriptedService::default();
        let mut form = FormState::new();

        for text in ["", "   ", "\n\t \n"] {
            form.set_input(text);
            assert!(!submit(&mut form, &service).await);
        }

        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn success_replaces_results_and_clears_input() {
        let first = vec![spam("old", 0.7)];
        let second = vec![spam("new one", 0.8), spam("new two", 0.6)];
        let service = ScriptedService::replying(Ok(first));
        service.replies.lock().unwrap().push_back(Ok(second.clone()));
        let mut form = FormState::new();

        form.set_input("old");
        assert!(submit(&mut form, &service).await);
        form.set_input("new one");
        assert!(submit(&mut form, &service).await);

        assert_eq!(form.results(), second.as_slice());
        assert_eq!(form.input(), "");
        assert_eq!(form.error(), None);
        assert!(form.analyzed_at().is_some());
    }

    #[tokio::test]
    async fn request_carries_the_single_raw_comment() {
        let service = ScriptedService::default();
        let mut form = FormState::new();
        form.set_input("  spaced out  ");

        submit(&mut form, &service).await;

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.as_slice(), &[PredictRequest::single("  spaced out  ")]);
    }

    #[tokio::test]
    async fn failure_keeps_input_and_shows_static_error() {
        let service = ScriptedService::replying(Err(server_error()));
        let mut form = FormState::new();
        form.set_input("free robux");

        assert!(submit(&mut form, &service).await);

        assert_eq!(form.input(), "free robux");
        assert_eq!(form.error(), Some(REQUEST_FAILED_MESSAGE));
        assert!(form.results().is_empty());
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn failure_keeps_previous_results_and_next_submit_clears_error() {
        let service = ScriptedService::replying(Ok(vec![spam("first", 0.9)]));
        service.replies.lock().unwrap().push_back(Err(server_error()));
        service.replies.lock().unwrap().push_back(Ok(vec![spam("third", 0.95)]));
        let mut form = FormState::new();

        form.set_input("first");
        submit(&mut form, &service).await;
        form.set_input("second");
        submit(&mut form, &service).await;
        assert_eq!(form.results(), &[spam("first", 0.9)]);
        assert!(form.error().is_some());

        form.set_input("third");
        assert!(form.begin_submit().is_some());
        assert_eq!(form.error(), None);
    }

    #[test]
    fn submit_control_tracks_input_and_in_flight_flag() {
        let mut form = FormState::new();
        assert_eq!(form.submit_control(), SubmitControl::Disabled);

        form.set_input("  ");
        assert_eq!(form.submit_control(), SubmitControl::Disabled);

        form.set_input("hello");
        assert_eq!(form.submit_control(), SubmitControl::Enabled);

        let request = form.begin_submit();
        assert!(request.is_some());
        assert_eq!(form.submit_control(), SubmitControl::Busy);
        assert!(!form.can_submit());
        assert!(form.begin_submit().is_none(), "second request while in flight");

        form.finish_submit(Err(server_error()));
        assert_eq!(form.submit_control(), SubmitControl::Enabled);
    }

    #[test]
    fn append_line_joins_with_newlines() {
        let mut form = FormState::new();
        form.append_line("first");
        form.append_line("second");
        assert_eq!(form.input(), "first\nsecond");

        form.clear_input();
        assert_eq!(form.input(), "");
    }
}
