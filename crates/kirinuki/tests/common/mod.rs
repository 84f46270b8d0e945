use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use kirinuki::{
    FetchedSegment, KirinukiError, KirinukiResult, SegmentDescriptor, SegmentFetcher,
};
use reqwest::StatusCode;

#[derive(Clone)]
pub enum TestOutcome {
    Data(Vec<u8>),
    Status(StatusCode),
    Panic,
}

#[derive(Clone)]
pub struct TestSegment {
    pub sequence: u64,
    pub delay: Duration,
    pub outcome: TestOutcome,
}

impl TestSegment {
    pub fn ok(sequence: u64, delay_ms: u64, data: &[u8]) -> Self {
        Self {
            sequence,
            delay: Duration::from_millis(delay_ms),
            outcome: TestOutcome::Data(data.to_vec()),
        }
    }

    pub fn status(sequence: u64, delay_ms: u64, status: StatusCode) -> Self {
        Self {
            sequence,
            delay: Duration::from_millis(delay_ms),
            outcome: TestOutcome::Status(status),
        }
    }

    pub fn panic(sequence: u64) -> Self {
        Self {
            sequence,
            delay: Duration::ZERO,
            outcome: TestOutcome::Panic,
        }
    }

    pub fn descriptor(&self) -> SegmentDescriptor {
        SegmentDescriptor::new(
            self.sequence,
            format!("https://example.com/{}.ts", self.sequence)
                .parse()
                .unwrap(),
        )
    }
}

/// Fetcher that answers from a fixed plan after a simulated delay.
#[derive(Clone, Default)]
pub struct TestFetcher {
    plan: Arc<HashMap<u64, TestSegment>>,
    pub calls: Arc<AtomicUsize>,
    pub completed: Arc<Mutex<Vec<u64>>>,
    in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl TestFetcher {
    pub fn new(segments: &[TestSegment]) -> Self {
        Self {
            plan: Arc::new(
                segments
                    .iter()
                    .map(|segment| (segment.sequence, segment.clone()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> Vec<u64> {
        self.completed.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl SegmentFetcher for TestFetcher {
    async fn fetch(&self, segment: &SegmentDescriptor) -> KirinukiResult<FetchedSegment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let plan = self
            .plan
            .get(&segment.sequence)
            .cloned()
            .expect("segment not planned");

        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        tokio::time::sleep(plan.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.completed.lock().unwrap().push(segment.sequence);
        match plan.outcome {
            TestOutcome::Data(data) => Ok(FetchedSegment {
                sequence: segment.sequence,
                data,
            }),
            TestOutcome::Status(status) => Err(KirinukiError::HttpError(status)),
            TestOutcome::Panic => panic!("fetcher exploded on #{}", segment.sequence),
        }
    }
}

pub fn descriptors(segments: &[TestSegment]) -> Vec<SegmentDescriptor> {
    segments.iter().map(TestSegment::descriptor).collect()
}
