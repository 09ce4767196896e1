//! Session controller.
//!
//! A [`Session`] owns the tree currently on display and drives every
//! rebuild of it. Submissions to the summarization service happen outside
//! the session; the session only hands out a [`SubmissionTicket`] when a
//! request starts and accepts the payload back together with that ticket.
//! Only the most recent ticket may replace the displayed tree.
//!
//! ```text
//! Idle ──begin──▶ Submitting ──complete──▶ Normalizing ──▶ LayingOut ──▶ Ready
//!                     │                         │              │
//!                     └───── fail ──────────────┴──────────────┴──────▶ Error
//! ```
//!
//! # Example
//!
//! ```
//! # use mindmap::{
//! #     config::AppConfig,
//! #     export::svg::SvgAdapter,
//! #     payload::RawPayload,
//! #     session::{Ingest, IngestOutcome, Session, SessionState, SubmissionRequest},
//! # };
//! let mut session = Session::new(AppConfig::default(), SvgAdapter::new());
//!
//! let ticket = session
//!     .begin_submission(SubmissionRequest::new("Summarize the lecture"))
//!     .unwrap();
//! let ingest = Ingest::new(RawPayload::OutlineText("# Lecture\n## Part 1".into()));
//!
//! let outcome = session.complete_submission(ticket, ingest).unwrap();
//! assert_eq!(outcome, IngestOutcome::Committed);
//! assert_eq!(session.state(), SessionState::Ready);
//! assert_eq!(session.displayed().unwrap().node_count(), 2);
//! ```

use std::{fmt, path::PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, info, trace, warn};
use thiserror::Error;

use mindmap_core::{
    geometry::Size,
    payload::RawPayload,
    positioned::{Orientation, PositionedTree},
};
use mindmap_parser::{ParseError, normalize};

use crate::{
    config::{AppConfig, DEFAULT_MODEL, LayoutConfig},
    error::MindmapError,
    layout::LayoutEngine,
    render::{Caption, ImageBlob, RenderAdapter, RenderError},
};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Submitting,
    Normalizing,
    LayingOut,
    Ready,
    Error,
}

impl SessionState {
    fn is_busy(self) -> bool {
        matches!(self, Self::Normalizing | Self::LayingOut)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Normalizing => "normalizing",
            Self::LayingOut => "laying out",
            Self::Ready => "ready",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// What the user asked the summarization service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub prompt: String,
    pub document: Option<PathBuf>,
    pub audio: Option<PathBuf>,
    pub model: String,
}

impl SubmissionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, document: impl Into<PathBuf>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_audio(mut self, audio: impl Into<PathBuf>) -> Self {
        self.audio = Some(audio.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for SubmissionRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            document: None,
            audio: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Handle for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubmissionTicket {
    sequence: u64,
}

impl SubmissionTicket {
    pub fn sequence(self) -> u64 {
        self.sequence
    }
}

/// A payload delivered by the summarization service.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingest {
    pub payload: RawPayload,
    /// Response text as received, shown next to the tree.
    pub source_text: String,
    pub summary: String,
}

impl Ingest {
    pub fn new(payload: RawPayload) -> Self {
        Self {
            payload,
            source_text: String::new(),
            summary: String::new(),
        }
    }

    pub fn with_source_text(mut self, source_text: impl Into<String>) -> Self {
        self.source_text = source_text.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

/// Result of [`Session::complete_submission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The tree replaced the displayed one.
    Committed,
    /// A newer submission was accepted meanwhile; the result was dropped.
    Discarded,
}

/// Errors reported by [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is busy ({0})")]
    Busy(SessionState),

    #[error("no mindmap is ready (session is {0})")]
    NotReady(SessionState),

    #[error(transparent)]
    Format(#[from] ParseError),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("export error: {0}")]
    Export(#[from] RenderError),

    #[error("submission failed: {0}")]
    Submission(String),
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Content of the last committed submission.
struct Displayed {
    payload: RawPayload,
    tree: PositionedTree,
    model: String,
    source_text: String,
    summary: String,
}

/// Drives normalization, layout and export for one user session.
pub struct Session<A: RenderAdapter> {
    config: AppConfig,
    adapter: A,
    state: SessionState,
    sequence: u64,
    in_flight: bool,
    pending_model: String,
    displayed: Option<Displayed>,
    last_error: Option<String>,
    clock: Clock,
}

impl<A: RenderAdapter> Session<A> {
    pub fn new(config: AppConfig, adapter: A) -> Self {
        let pending_model = config.export().model().to_string();
        Self {
            config,
            adapter,
            state: SessionState::Idle,
            sequence: 0,
            in_flight: false,
            pending_model,
            displayed: None,
            last_error: None,
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the clock used to timestamp export captions.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The tree currently on display.
    pub fn displayed(&self) -> Option<&PositionedTree> {
        self.displayed.as_ref().map(|displayed| &displayed.tree)
    }

    pub fn source_text(&self) -> Option<&str> {
        self.displayed
            .as_ref()
            .map(|displayed| displayed.source_text.as_str())
    }

    pub fn summary(&self) -> Option<&str> {
        self.displayed
            .as_ref()
            .map(|displayed| displayed.summary.as_str())
    }

    /// Message of the failure that moved the session to [`SessionState::Error`].
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Sequence number of the most recently accepted submission, 0 if none.
    pub fn latest_sequence(&self) -> u64 {
        self.sequence
    }

    /// Start a submission, superseding any submission still in flight.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] while a payload is being normalized or
    /// laid out.
    pub fn begin_submission(
        &mut self,
        request: SubmissionRequest,
    ) -> Result<SubmissionTicket, SessionError> {
        if self.state.is_busy() {
            return Err(SessionError::Busy(self.state));
        }
        if self.state == SessionState::Submitting {
            info!(superseded = self.sequence; "Superseding in-flight submission");
        }

        self.sequence += 1;
        self.in_flight = true;
        self.pending_model = request.model;
        self.state = SessionState::Submitting;
        info!(
            sequence = self.sequence,
            model = self.pending_model.as_str(),
            has_document = request.document.is_some(),
            has_audio = request.audio.is_some();
            "Submission started"
        );

        Ok(SubmissionTicket {
            sequence: self.sequence,
        })
    }

    /// Build the tree for a delivered payload and display it if `ticket` is
    /// still the latest submission.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Format`] or [`SessionError::Layout`] when the
    /// latest submission's payload cannot be turned into a tree. The session
    /// then moves to [`SessionState::Error`] and keeps the previously
    /// displayed tree. Failures of superseded submissions are not reported.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        ingest: Ingest,
    ) -> Result<IngestOutcome, SessionError> {
        let fresh = self.is_current(ticket);
        let result = self.build(&ingest.payload, fresh);

        if !fresh {
            info!(
                sequence = ticket.sequence,
                latest = self.sequence;
                "Discarding stale submission result"
            );
            return Ok(IngestOutcome::Discarded);
        }
        self.in_flight = false;

        match result {
            Ok(tree) => {
                self.adapter.present(&tree);
                self.displayed = Some(Displayed {
                    payload: ingest.payload,
                    tree,
                    model: self.pending_model.clone(),
                    source_text: ingest.source_text,
                    summary: ingest.summary,
                });
                self.state = SessionState::Ready;
                self.last_error = None;
                info!(sequence = ticket.sequence; "Submission committed");
                Ok(IngestOutcome::Committed)
            }
            Err(err) => {
                self.enter_error(&err);
                Err(err)
            }
        }
    }

    /// Record that the submission call for `ticket` failed.
    ///
    /// Ignored unless `ticket` is the latest submission and still in flight.
    pub fn fail_submission(&mut self, ticket: SubmissionTicket, reason: impl Into<String>) {
        if !self.is_current(ticket) {
            debug!(sequence = ticket.sequence; "Ignoring failure of stale submission");
            return;
        }
        self.in_flight = false;
        self.enter_error(&SessionError::Submission(reason.into()));
    }

    /// Apply a new layout configuration and rebuild the displayed tree.
    ///
    /// # Errors
    ///
    /// An invalid configuration is rejected with [`SessionError::Layout`]
    /// and nothing changes.
    pub fn set_layout_config(&mut self, layout: LayoutConfig) -> Result<(), SessionError> {
        layout.validate().map_err(SessionError::Layout)?;
        *self.config.layout_mut() = layout;
        self.rebuild()
    }

    /// Switch the layout orientation and rebuild the displayed tree.
    ///
    /// # Errors
    ///
    /// Propagates rebuild failures, see [`set_layout_config`](Self::set_layout_config).
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), SessionError> {
        let layout = self.config.layout().clone().with_orientation(orientation);
        self.set_layout_config(layout)
    }

    /// Limit the depth of the displayed tree and rebuild it from its payload.
    ///
    /// # Errors
    ///
    /// Returns the rebuild error. The session moves to [`SessionState::Error`]
    /// unless a submission is in flight, which stays unaffected.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> Result<(), SessionError> {
        self.config.normalize_mut().set_max_depth(max_depth);
        self.rebuild()
    }

    /// Rasterize the displayed tree with a provenance caption.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotReady`] outside [`SessionState::Ready`] and
    /// [`SessionError::Export`] when the adapter fails. Neither changes the
    /// session.
    pub fn export(&mut self, size: Size) -> Result<ImageBlob, SessionError> {
        let displayed = match (&self.state, &self.displayed) {
            (SessionState::Ready, Some(displayed)) => displayed,
            _ => return Err(SessionError::NotReady(self.state)),
        };

        let caption = Caption::new(displayed.model.as_str(), (self.clock)());
        info!(caption:% = caption; "Exporting mindmap");
        let blob = self
            .adapter
            .rasterize(&displayed.tree, &caption, size)
            .inspect_err(|err| warn!(err:%; "Export failed"))?;
        Ok(blob)
    }

    fn is_current(&self, ticket: SubmissionTicket) -> bool {
        self.in_flight && ticket.sequence == self.sequence
    }

    fn enter_error(&mut self, err: &SessionError) {
        warn!(state:% = self.state, err:%; "Session entered error state");
        self.state = SessionState::Error;
        self.last_error = Some(err.to_string());
    }

    /// Rerun normalization and layout on the displayed payload.
    ///
    /// Never touches a submission in flight: its ticket stays current and
    /// the session stays in [`SessionState::Submitting`].
    fn rebuild(&mut self) -> Result<(), SessionError> {
        let Some(payload) = self.displayed.as_ref().map(|d| d.payload.clone()) else {
            debug!("Nothing displayed, configuration stored");
            return Ok(());
        };

        info!("Rebuilding displayed tree");
        match self.build(&payload, false) {
            Ok(tree) => {
                self.adapter.present(&tree);
                if let Some(displayed) = self.displayed.as_mut() {
                    displayed.tree = tree;
                }
                if !self.in_flight && self.state == SessionState::Error {
                    info!("Displayed tree rebuilt, session ready again");
                    self.state = SessionState::Ready;
                    self.last_error = None;
                }
                Ok(())
            }
            Err(err) if self.in_flight => {
                warn!(err:%; "Rebuild failed while a submission is in flight");
                Err(err)
            }
            Err(err) => {
                self.enter_error(&err);
                Err(err)
            }
        }
    }

    /// Normalize and lay out `payload` with the current configuration.
    ///
    /// `tracked` runs move the session through the pipeline states.
    fn build(&mut self, payload: &RawPayload, tracked: bool) -> Result<PositionedTree, SessionError> {
        if tracked {
            self.state = SessionState::Normalizing;
        }
        info!(payload_kind:% = payload.kind(); "Normalizing payload");
        let mut tree = normalize(payload, &self.config.normalize().to_options())?;
        if let Some(max_depth) = self.config.normalize().max_depth() {
            tree = tree.truncated(max_depth);
        }
        debug!(nodes = tree.node_count(), depth = tree.max_depth(); "Payload normalized");
        trace!(outline = tree.to_outline().as_str(); "Canonical tree");

        if tracked {
            self.state = SessionState::LayingOut;
        }
        let engine = LayoutEngine::new(self.config.layout().clone());
        let positioned = engine.layout(&tree).map_err(|err| match err {
            MindmapError::Layout(message) => SessionError::Layout(message),
            other => SessionError::Layout(other.to_string()),
        })?;
        debug!(nodes = positioned.node_count(); "Layout calculated");
        Ok(positioned)
    }
}
