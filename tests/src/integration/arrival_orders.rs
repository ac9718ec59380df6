//! # Arrival Orders
//!
//! The peer finishes blocks in any order it likes; within one block the
//! proof always precedes its bodies, but across blocks the stream is an
//! arbitrary interleaving. These tests drive a three-block batch through
//! shuffled interleavings and require the same outcome every time.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};
    use std::sync::{Arc, Weak};
    use std::time::Duration;

    use spv_peer_tasks::testing::{
        proof_for, CollectingHandler, ManualTimeSource, RecordingDelegate, RecordingRequester,
        ScriptedValidator, TaskOutcome,
    };
    use spv_peer_tasks::{
        BlockHash, InboundMessage, MerkleBlock, MerkleBlockHandler, MerkleBlockValidator,
        MerkleBlocksTask, PeerTask, TaskDelegate, TaskRequester, TimeSource, TransactionMessage,
    };
    use spv_types::{Hash, Transaction};

    const IDLE: Duration = Duration::from_secs(60);

    fn hash_of(byte: u8) -> Hash {
        [byte; 32]
    }

    /// One wire event in a peer's reply stream.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Proof(u8),
        Body(u8),
    }

    /// The fixed three-block batch: one block with two matched
    /// transactions, one that matched nothing, one with a single match.
    const BATCH: [(u8, &[u8]); 3] = [(1, &[0x11, 0x12]), (2, &[]), (3, &[0x31])];

    /// Per-block event lanes; any label order with lane-internal order
    /// preserved is a stream the wire could produce.
    fn lanes() -> Vec<VecDeque<Event>> {
        BATCH
            .iter()
            .map(|(block, bodies)| {
                let mut lane = VecDeque::new();
                lane.push_back(Event::Proof(*block));
                lane.extend(bodies.iter().map(|body| Event::Body(*body)));
                lane
            })
            .collect()
    }

    fn schedule_from_labels(labels: &[usize]) -> Vec<Event> {
        let mut lanes = lanes();
        labels
            .iter()
            .map(|&lane| lanes[lane].pop_front().unwrap())
            .collect()
    }

    struct RunResult {
        outcomes: Vec<TaskOutcome>,
        delivered: Vec<MerkleBlock>,
    }

    fn run_schedule(schedule: &[Event]) -> RunResult {
        let clock = Arc::new(ManualTimeSource::at(0));
        let requester = Arc::new(RecordingRequester::new());
        let delegate = Arc::new(RecordingDelegate::new());
        let validator = Arc::new(ScriptedValidator::new());
        let handler = Arc::new(CollectingHandler::new());

        for (block, bodies) in BATCH {
            let committed: Vec<Hash> = bodies.iter().map(|body| hash_of(*body)).collect();
            validator.accept(hash_of(block), &committed);
        }

        let mut task = MerkleBlocksTask::new(
            BATCH
                .iter()
                .map(|(block, _)| BlockHash::new(hash_of(*block), u64::from(*block) + 100))
                .collect(),
            Arc::clone(&validator) as Arc<dyn MerkleBlockValidator>,
            Arc::clone(&handler) as Arc<dyn MerkleBlockHandler>,
            Arc::clone(&clock) as Arc<dyn TimeSource>,
            IDLE,
        );
        task.bind(
            Arc::downgrade(&requester) as Weak<dyn TaskRequester>,
            Arc::downgrade(&delegate) as Weak<dyn TaskDelegate>,
        );
        task.start();

        for event in schedule {
            match event {
                Event::Proof(block) => {
                    let claimed = task
                        .handle(&InboundMessage::MerkleBlock(proof_for(hash_of(*block))))
                        .unwrap();
                    assert!(claimed, "proof for block {block} not claimed");
                }
                Event::Body(body) => {
                    // A body can land after its block finalized (duplicate
                    // streams); then it is simply left unclaimed.
                    task.handle(&InboundMessage::Transaction(TransactionMessage::new(
                        Transaction::new(hash_of(*body), vec![*body]),
                    )))
                    .unwrap();
                }
            }
        }

        RunResult {
            outcomes: delegate.outcomes(),
            delivered: handler.blocks(),
        }
    }

    fn assert_full_delivery(result: &RunResult) {
        assert_eq!(result.outcomes, vec![TaskOutcome::Completed]);
        assert_eq!(result.delivered.len(), BATCH.len());

        let delivered_headers: HashSet<Hash> = result
            .delivered
            .iter()
            .map(|block| block.header_hash)
            .collect();
        let requested_headers: HashSet<Hash> =
            BATCH.iter().map(|(block, _)| hash_of(*block)).collect();
        assert_eq!(delivered_headers, requested_headers);

        for block in &result.delivered {
            let collected: HashSet<Hash> =
                block.transactions.iter().map(|tx| tx.hash).collect();
            assert_eq!(collected.len(), block.transactions.len(), "duplicate body delivered");
            assert_eq!(collected, block.transaction_hashes, "membership mismatch");
        }
    }

    #[test]
    fn test_request_order_arrival_delivers_everything() {
        let result = run_schedule(&schedule_from_labels(&[0, 0, 0, 1, 2, 2]));
        assert_full_delivery(&result);
    }

    #[test]
    fn test_reverse_order_arrival_delivers_everything() {
        let result = run_schedule(&schedule_from_labels(&[2, 2, 1, 0, 0, 0]));
        assert_full_delivery(&result);
    }

    #[test]
    fn test_seeded_random_interleavings_deliver_everything() {
        for seed in 0..64 {
            let mut labels = vec![0usize, 0, 0, 1, 2, 2];
            labels.shuffle(&mut StdRng::seed_from_u64(seed));
            let result = run_schedule(&schedule_from_labels(&labels));
            assert_full_delivery(&result);
        }
    }

    proptest! {
        #[test]
        fn test_any_interleaving_completes_once_with_full_delivery(
            labels in Just(vec![0usize, 0, 0, 1, 2, 2]).prop_shuffle()
        ) {
            let result = run_schedule(&schedule_from_labels(&labels));
            assert_full_delivery(&result);
        }

        #[test]
        fn test_duplicated_bodies_never_change_the_outcome(
            labels in Just(vec![0usize, 0, 0, 0, 1, 2, 2, 2]).prop_shuffle()
        ) {
            // Lane 0 repeats its first body, lane 2 repeats its only body.
            let mut lanes = lanes();
            lanes[0].insert(2, Event::Body(0x11));
            lanes[2].push_back(Event::Body(0x31));

            let schedule: Vec<Event> = labels
                .iter()
                .map(|&lane| lanes[lane].pop_front().unwrap())
                .collect();

            let result = run_schedule(&schedule);
            assert_full_delivery(&result);
        }
    }
}
