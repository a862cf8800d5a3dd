use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use criterion::{Criterion, criterion_group, criterion_main};
use event_bus::{
    EventBus, EventHandler, InMemoryIntegrationEventLog, IntegrationEventLog,
    IntegrationEventLogEntry, OrderStartedIntegrationEvent,
};

struct Counting(Arc<AtomicU64>);

#[async_trait]
impl EventHandler for Counting {
    type Event = OrderStartedIntegrationEvent;
    type Error = Infallible;

    async fn handle(&self, _event: &OrderStartedIntegrationEvent) -> Result<(), Infallible> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

fn bench_publish_no_subscribers(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let bus = EventBus::new();
    let event = OrderStartedIntegrationEvent::new("1");

    c.bench_function("event_bus/publish_no_subscribers", |b| {
        b.iter(|| rt.block_on(bus.publish(&event)).unwrap());
    });
}

fn bench_publish_ten_subscribers(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let bus = EventBus::new();
    let counter = Arc::new(AtomicU64::new(0));
    rt.block_on(async {
        for _ in 0..10 {
            bus.subscribe(Counting(Arc::clone(&counter))).await;
        }
    });
    let event = OrderStartedIntegrationEvent::new("1");

    c.bench_function("event_bus/publish_ten_subscribers", |b| {
        b.iter(|| rt.block_on(bus.publish(&event)).unwrap());
    });
}

fn bench_log_lifecycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("event_log/save_and_publish", |b| {
        b.iter(|| {
            rt.block_on(async {
                let log = InMemoryIntegrationEventLog::new();
                let entry =
                    IntegrationEventLogEntry::new(&OrderStartedIntegrationEvent::new("1")).unwrap();
                let id = entry.event_id;
                log.save_event(entry).await.unwrap();
                log.mark_in_progress(id).await.unwrap();
                log.mark_published(id).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_publish_no_subscribers,
    bench_publish_ten_subscribers,
    bench_log_lifecycle,
);
criterion_main!(benches);
