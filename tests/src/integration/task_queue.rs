//! # Task Queue
//!
//! The host keeps its per-peer tasks as trait objects: messages are offered
//! down the queue until one task claims them, duplicate requests are
//! detected with `==`, and timeouts are polled without knowing the concrete
//! variant.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Weak};
    use std::time::Duration;

    use spv_peer_tasks::testing::{
        CollectingHandler, ManualTimeSource, RecordingDelegate, RecordingRequester,
        ScriptedValidator, TaskOutcome,
    };
    use spv_peer_tasks::{
        BlockHash, GetBlockHashesTask, InboundMessage, MerkleBlockHandler, MerkleBlockValidator,
        MerkleBlocksTask, PeerTask, RequestTransactionsTask, SendTransactionTask, TaskDelegate,
        TaskError, TaskRequester, TimeSource, TransactionMessage,
    };
    use spv_types::{Hash, Transaction};

    const IDLE: Duration = Duration::from_secs(60);

    fn hash_of(byte: u8) -> Hash {
        [byte; 32]
    }

    /// Wiring shared by every task a single connection owns.
    struct Host {
        clock: Arc<ManualTimeSource>,
        requester: Arc<RecordingRequester>,
        delegate: Arc<RecordingDelegate>,
        validator: Arc<ScriptedValidator>,
        handler: Arc<CollectingHandler>,
    }

    impl Host {
        fn new() -> Self {
            Self {
                clock: Arc::new(ManualTimeSource::at(0)),
                requester: Arc::new(RecordingRequester::new()),
                delegate: Arc::new(RecordingDelegate::new()),
                validator: Arc::new(ScriptedValidator::new()),
                handler: Arc::new(CollectingHandler::new()),
            }
        }

        fn bind(&self, task: &mut dyn PeerTask) {
            task.bind(
                Arc::downgrade(&self.requester) as Weak<dyn TaskRequester>,
                Arc::downgrade(&self.delegate) as Weak<dyn TaskDelegate>,
            );
        }

        fn merkle_task(&self, hashes: &[u8]) -> Box<dyn PeerTask> {
            let mut task = MerkleBlocksTask::new(
                hashes
                    .iter()
                    .map(|byte| BlockHash::without_height(hash_of(*byte)))
                    .collect(),
                Arc::clone(&self.validator) as Arc<dyn MerkleBlockValidator>,
                Arc::clone(&self.handler) as Arc<dyn MerkleBlockHandler>,
                Arc::clone(&self.clock) as Arc<dyn TimeSource>,
                IDLE,
            );
            self.bind(&mut task);
            Box::new(task)
        }

        fn discovery_task(&self, locator: &[u8], expected: usize) -> Box<dyn PeerTask> {
            let mut task = GetBlockHashesTask::new(
                locator.iter().map(|byte| hash_of(*byte)).collect(),
                expected,
                Arc::clone(&self.clock) as Arc<dyn TimeSource>,
                IDLE,
            );
            self.bind(&mut task);
            Box::new(task)
        }

        fn broadcast_task(&self, tx_byte: u8) -> Box<dyn PeerTask> {
            let mut task = SendTransactionTask::new(
                Transaction::new(hash_of(tx_byte), vec![tx_byte]),
                Arc::clone(&self.clock) as Arc<dyn TimeSource>,
                IDLE,
            );
            self.bind(&mut task);
            Box::new(task)
        }

        fn fetch_task(&self, hashes: &[u8]) -> Box<dyn PeerTask> {
            let mut task = RequestTransactionsTask::new(
                hashes.iter().map(|byte| hash_of(*byte)).collect(),
                Arc::clone(&self.clock) as Arc<dyn TimeSource>,
                IDLE,
            );
            self.bind(&mut task);
            Box::new(task)
        }
    }

    /// Offers a message down the queue until one task claims it.
    fn offer(
        tasks: &mut [Box<dyn PeerTask>],
        message: &InboundMessage,
    ) -> Result<bool, TaskError> {
        for task in tasks.iter_mut() {
            if task.handle(message)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    #[test]
    fn test_message_is_offered_until_one_task_claims() {
        let host = Host::new();
        let mut tasks = vec![host.merkle_task(&[1]), host.fetch_task(&[0x51, 0x52])];
        for task in tasks.iter_mut() {
            task.start();
        }

        // A fetched body: the merkle task declines (nothing pending), the
        // fetch task claims.
        let body = InboundMessage::Transaction(TransactionMessage::new(Transaction::new(
            hash_of(0x51),
            vec![0x51],
        )));
        assert!(offer(&mut tasks, &body).unwrap());

        // Nobody wants a stranger's body.
        let stray = InboundMessage::Transaction(TransactionMessage::new(Transaction::new(
            hash_of(0x99),
            vec![],
        )));
        assert!(!offer(&mut tasks, &stray).unwrap());
    }

    #[test]
    fn test_variants_never_compare_equal_across_kinds() {
        let host = Host::new();
        let tasks = vec![
            host.merkle_task(&[1]),
            host.discovery_task(&[1], 10),
            host.broadcast_task(1),
            host.fetch_task(&[1]),
        ];

        for (left_index, left) in tasks.iter().enumerate() {
            for (right_index, right) in tasks.iter().enumerate() {
                let equal = left.as_ref() == right.as_ref();
                assert_eq!(
                    equal,
                    left_index == right_index,
                    "task {left_index} vs task {right_index}"
                );
            }
        }
    }

    #[test]
    fn test_queue_detects_duplicate_requests_with_equality() {
        let host = Host::new();
        let queue = vec![host.merkle_task(&[1, 2]), host.broadcast_task(7)];

        let duplicate = host.merkle_task(&[1, 2]);
        let reordered = host.merkle_task(&[2, 1]);

        assert!(queue
            .iter()
            .any(|queued| queued.as_ref() == duplicate.as_ref()));
        assert!(!queue
            .iter()
            .any(|queued| queued.as_ref() == reordered.as_ref()));
    }

    #[test]
    fn test_timeout_polling_over_trait_objects() {
        let host = Host::new();
        let mut tasks = vec![host.broadcast_task(1), host.discovery_task(&[], 500)];
        for task in tasks.iter_mut() {
            task.start();
        }

        host.clock.advance(61);
        for task in tasks.iter_mut() {
            task.check_timeout();
        }

        // Broadcast fails on silence, discovery completes with what it has.
        assert_eq!(
            host.delegate.outcomes(),
            vec![
                TaskOutcome::Failed(TaskError::Timeout(IDLE)),
                TaskOutcome::Completed,
            ]
        );
    }

    #[test]
    fn test_reset_timer_through_the_trait_defers_timeout() {
        let host = Host::new();
        let mut task = host.broadcast_task(1);
        task.start();

        host.clock.advance(59);
        task.reset_timer();
        host.clock.advance(59);
        task.check_timeout();

        assert!(host.delegate.outcomes().is_empty());
    }
}
