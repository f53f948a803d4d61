//! Live capture session
//!
//! A single tokio task owns every piece of mutable state: the motion tracker,
//! the latest frame assessment and the capture state machine. Sensor events
//! and commands arrive over a channel and timers are plain deadlines the task
//! sleeps towards, so the analysis tick, the capture poll and the still
//! debounce can never interleave mid-update.

pub mod status;

pub use status::LiveStatus;

use crate::capture::{CaptureAttempt, CaptureOrchestrator, CaptureOutcome};
use crate::config::GateConfig;
use crate::errors::GateError;
use crate::motion::MotionTracker;
use crate::permissions::{ensure_access, PermissionGate};
use crate::quality::{FrameAnalyzer, FrameAssessment, QualityGate, QualityVerdict, Sharpness};
use crate::source::FrameSource;
use crate::timing::{IntervalTimer, SessionClock, Timer, Timestamp};
use crate::types::{MotionSample, OrientationSample};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

type OutcomeSender = oneshot::Sender<Result<CaptureOutcome, GateError>>;

enum Command {
    Motion(MotionSample),
    Orientation(OrientationSample),
    StartCapture(oneshot::Sender<CaptureTicket>),
    Dismiss,
    Stop,
}

/// A started capture attempt and the channel its single outcome arrives on.
#[derive(Debug)]
pub struct CaptureTicket {
    pub attempt: CaptureAttempt,
    outcome: oneshot::Receiver<Result<CaptureOutcome, GateError>>,
}

impl CaptureTicket {
    /// Wait for the attempt to finish.
    ///
    /// Fails with [`GateError::CaptureSuperseded`] when a newer attempt replaced
    /// this one, and [`GateError::SessionClosed`] when the session stopped first.
    pub async fn outcome(self) -> Result<CaptureOutcome, GateError> {
        self.outcome.await.map_err(|_| GateError::SessionClosed)?
    }
}

pub struct CaptureSession;

impl CaptureSession {
    /// Check permissions and spawn the session task.
    ///
    /// # Panics
    /// Panics when called outside a tokio runtime.
    pub fn start<F>(
        config: GateConfig,
        frames: F,
        permissions: &dyn PermissionGate,
    ) -> Result<SessionHandle, GateError>
    where
        F: FrameSource + 'static,
    {
        config.validate().map_err(GateError::Config)?;
        ensure_access(permissions)?;

        let clock = SessionClock::new();
        let (commands, receiver) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(LiveStatus::default());

        let actor = SessionActor {
            clock: clock.clone(),
            frames,
            tracker: config.motion_tracker(),
            analyzer: config.frame_analyzer(),
            analysis_timer: IntervalTimer::new(config.analysis_interval()),
            orchestrator: config.orchestrator(),
            gate: QualityGate,
            assessment: None,
            pending: None,
            status: status_tx,
        };

        log::info!(
            "Starting capture session (analysis every {:?}, poll every {}ms, timeout {}ms)",
            config.analysis_interval(),
            config.capture.poll_interval_ms,
            config.capture.timeout_ms
        );
        let task = tokio::spawn(actor.run(receiver));

        Ok(SessionHandle {
            commands,
            status: status_rx,
            clock,
            task: Arc::new(Mutex::new(Some(task))),
        })
    }
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<LiveStatus>,
    clock: SessionClock,
    task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl SessionHandle {
    /// Timebase that sensor samples must be stamped with.
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn push_motion(&self, sample: MotionSample) -> Result<(), GateError> {
        self.send(Command::Motion(sample))
    }

    pub fn push_orientation(&self, sample: OrientationSample) -> Result<(), GateError> {
        self.send(Command::Orientation(sample))
    }

    /// Start a capture attempt, superseding any attempt still in progress.
    pub async fn start_capture(&self) -> Result<CaptureTicket, GateError> {
        let (reply, ticket) = oneshot::channel();
        self.send(Command::StartCapture(reply))?;
        ticket.await.map_err(|_| GateError::SessionClosed)
    }

    /// Start an attempt and wait for its outcome.
    pub async fn capture(&self) -> Result<CaptureOutcome, GateError> {
        self.start_capture().await?.outcome().await
    }

    /// Clear a finished attempt and return the capture state machine to idle.
    pub fn dismiss(&self) -> Result<(), GateError> {
        self.send(Command::Dismiss)
    }

    pub fn status(&self) -> LiveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveStatus> {
        self.status.clone()
    }

    pub fn is_active(&self) -> bool {
        !self.commands.is_closed()
    }

    /// Stop the session and cancel every timer. Safe to call more than once.
    pub async fn stop(&self) {
        let _ = self.commands.send(Command::Stop);

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                log::warn!("Capture session task ended abnormally: {}", e);
            }
        }
    }

    fn send(&self, command: Command) -> Result<(), GateError> {
        self.commands
            .send(command)
            .map_err(|_| GateError::SessionClosed)
    }
}

struct SessionActor<F> {
    clock: SessionClock,
    frames: F,
    tracker: MotionTracker,
    analyzer: FrameAnalyzer,
    analysis_timer: IntervalTimer,
    orchestrator: CaptureOrchestrator,
    gate: QualityGate,
    /// Replaced as a whole by each analysis tick
    assessment: Option<FrameAssessment>,
    pending: Option<OutcomeSender>,
    status: watch::Sender<LiveStatus>,
}

impl<F: FrameSource> SessionActor<F> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.analysis_timer.start_immediately(self.clock.now());

        loop {
            self.fire_due_timers(self.clock.now());
            self.publish(true);

            let deadline = self.next_deadline();
            let wake = match deadline {
                Some(at) => self.clock.instant_at(at),
                None => tokio::time::Instant::now() + Duration::from_secs(3600),
            };

            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Stop) | None => break,
                    Some(command) => self.handle(command),
                },
                _ = tokio::time::sleep_until(wake), if deadline.is_some() => {}
            }
        }

        self.teardown();
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Motion(sample) => {
                self.tracker.on_sample(&sample);
            }
            Command::Orientation(sample) => self.tracker.on_orientation(&sample),
            Command::StartCapture(reply) => {
                if let Some(previous) = self.pending.take() {
                    let _ = previous.send(Err(GateError::CaptureSuperseded));
                }

                let attempt = self.orchestrator.start_capture(self.clock.now());
                let (outcome_tx, outcome_rx) = oneshot::channel();
                self.pending = Some(outcome_tx);

                let ticket = CaptureTicket {
                    attempt,
                    outcome: outcome_rx,
                };
                if reply.send(ticket).is_err() {
                    log::debug!("Capture requester went away before the attempt started");
                }
            }
            Command::Dismiss => self.orchestrator.dismiss(),
            Command::Stop => {}
        }
    }

    /// Motion debounce first, then analysis, then the capture poll, so a poll
    /// sharing a clock edge with the others sees their results.
    fn fire_due_timers(&mut self, now: Timestamp) {
        if let Some(state) = self.tracker.expire(now) {
            log::debug!("Motion state changed: {:?}", state);
        }

        if self.analysis_timer.fire(now) {
            self.analyze(now);
        }

        let verdict = self.verdict();
        if let Some(outcome) = self.orchestrator.poll(now, &verdict, &self.frames) {
            match self.pending.take() {
                Some(tx) => {
                    let _ = tx.send(Ok(outcome));
                }
                None => log::debug!("Capture outcome produced with no waiting requester"),
            }
        }
    }

    fn analyze(&mut self, now: Timestamp) {
        match self.frames.current_frame() {
            Ok(frame) => self.assessment = Some(self.analyzer.assess(&frame, now)),
            Err(e) if e.is_transient() => log::debug!("Analysis tick skipped: {}", e),
            Err(e) => log::warn!("Analysis tick skipped: {}", e),
        }
    }

    fn verdict(&self) -> QualityVerdict {
        QualityVerdict::combine(self.assessment.as_ref(), self.tracker.state())
    }

    fn next_deadline(&self) -> Option<Timestamp> {
        [
            self.tracker.deadline(),
            self.analysis_timer.deadline(),
            self.orchestrator.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn publish(&self, active: bool) {
        let verdict = self.verdict();
        let status = LiveStatus {
            active,
            verdict,
            acceptable: self.gate.evaluate(&verdict),
            sharpness: self
                .assessment
                .as_ref()
                .map_or(Sharpness::Indeterminate, |a| a.sharpness),
            motion_warning: self.gate.motion_warning(&verdict).to_string(),
            phase: self.orchestrator.phase(),
            message: self.orchestrator.status_message().to_string(),
            telemetry: self.tracker.telemetry().clone(),
            last_assessed_at: self.assessment.as_ref().map(|a| a.assessed_at),
        };
        self.status.send_replace(status);
    }

    fn teardown(&mut self) {
        self.tracker.cancel();
        self.analysis_timer.cancel();
        self.orchestrator.cancel();
        if let Some(tx) = self.pending.take() {
            let _ = tx.send(Err(GateError::SessionClosed));
        }
        self.publish(false);
        log::info!("Capture session stopped");
    }
}
