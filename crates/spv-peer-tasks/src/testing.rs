//! Centralized Testing Utilities
//!
//! Deterministic collaborator implementations used by the unit tests in
//! this crate and by the workspace integration suite. Shipped in the
//! library so downstream hosts can drive tasks in their own tests without
//! re-implementing the recorders.

use crate::domain::{HandlerError, MerkleBlock, TaskError, Timestamp, ValidationError};
use crate::messages::{MerkleBlockMessage, OutboundMessage};
use crate::ports::{
    MerkleBlockHandler, MerkleBlockValidator, TaskDelegate, TaskRequester, TimeSource,
};
use crate::tasks::PeerTask;
use parking_lot::Mutex;
use spv_types::Hash;
use std::collections::{HashMap, VecDeque};

/// A time source tests advance by hand.
///
/// Tasks read it through [`TimeSource`]; the test keeps an `Arc` and moves
/// the clock explicitly, making idle windows deterministic.
#[derive(Debug, Default)]
pub struct ManualTimeSource {
    now: Mutex<Timestamp>,
}

impl ManualTimeSource {
    /// Creates a clock reading `secs` since the epoch.
    pub fn at(secs: u64) -> Self {
        Self {
            now: Mutex::new(Timestamp::new(secs)),
        }
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        let mut now = self.now.lock();
        *now = now.add_secs(secs);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

/// Records every message a task asks to send.
#[derive(Default)]
pub struct RecordingRequester {
    sent: Mutex<Vec<OutboundMessage>>,
}

impl RecordingRequester {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().clone()
    }
}

impl TaskRequester for RecordingRequester {
    fn send(&self, message: OutboundMessage) {
        self.sent.lock().push(message);
    }
}

/// A terminal notification observed by [`RecordingDelegate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// `task_completed` fired.
    Completed,
    /// `task_failed` fired with this error.
    Failed(TaskError),
}

/// Records the terminal notifications a task delivers.
#[derive(Default)]
pub struct RecordingDelegate {
    outcomes: Mutex<Vec<TaskOutcome>>,
}

impl RecordingDelegate {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes observed so far, in order.
    pub fn outcomes(&self) -> Vec<TaskOutcome> {
        self.outcomes.lock().clone()
    }
}

impl TaskDelegate for RecordingDelegate {
    fn task_completed(&self, _task: &dyn PeerTask) {
        self.outcomes.lock().push(TaskOutcome::Completed);
    }

    fn task_failed(&self, _task: &dyn PeerTask, error: TaskError) {
        self.outcomes.lock().push(TaskOutcome::Failed(error));
    }
}

/// A validator scripted per header hash.
///
/// Tests register the outcome for each proof they will offer; an
/// unscripted proof fails validation loudly so a typo cannot pass as a
/// silently ignored message.
#[derive(Default)]
pub struct ScriptedValidator {
    scripts: Mutex<HashMap<Hash, Result<Vec<Hash>, ValidationError>>>,
}

impl ScriptedValidator {
    /// Creates a validator with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a proof for `header_hash` to validate successfully,
    /// committing to `transaction_hashes`.
    pub fn accept(&self, header_hash: Hash, transaction_hashes: &[Hash]) {
        self.scripts
            .lock()
            .insert(header_hash, Ok(transaction_hashes.to_vec()));
    }

    /// Scripts a proof for `header_hash` to fail with `error`.
    pub fn reject(&self, header_hash: Hash, error: ValidationError) {
        self.scripts.lock().insert(header_hash, Err(error));
    }
}

impl MerkleBlockValidator for ScriptedValidator {
    fn validate(&self, message: &MerkleBlockMessage) -> Result<MerkleBlock, ValidationError> {
        match self.scripts.lock().get(&message.header_hash) {
            Some(Ok(hashes)) => Ok(MerkleBlock::new(
                message.header_hash,
                hashes.iter().copied().collect(),
            )),
            Some(Err(error)) => Err(error.clone()),
            None => Err(ValidationError::Malformed(
                "no script registered for proof".to_string(),
            )),
        }
    }
}

/// Collects delivered blocks, optionally rejecting queued deliveries.
#[derive(Default)]
pub struct CollectingHandler {
    blocks: Mutex<Vec<MerkleBlock>>,
    rejections: Mutex<VecDeque<HandlerError>>,
}

impl CollectingHandler {
    /// Creates a handler that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an error for the next delivery. Multiple calls queue in
    /// order, one per delivery.
    pub fn reject_next(&self, error: HandlerError) {
        self.rejections.lock().push_back(error);
    }

    /// Blocks accepted so far, in delivery order.
    pub fn blocks(&self) -> Vec<MerkleBlock> {
        self.blocks.lock().clone()
    }
}

impl MerkleBlockHandler for CollectingHandler {
    fn handle(&self, block: MerkleBlock) -> Result<(), HandlerError> {
        if let Some(error) = self.rejections.lock().pop_front() {
            return Err(error);
        }
        self.blocks.lock().push(block);
        Ok(())
    }
}

/// A placeholder proof payload for `header_hash`.
///
/// The payload fields carry arbitrary bytes; pair it with a
/// [`ScriptedValidator`] that keys on the header hash.
pub fn proof_for(header_hash: Hash) -> MerkleBlockMessage {
    MerkleBlockMessage {
        header_hash,
        merkle_root: header_hash,
        total_transactions: 1,
        hashes: vec![header_hash],
        flags: vec![0b1000_0000],
    }
}
