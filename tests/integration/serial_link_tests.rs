//! AppService over the real staging queue and queue-backed link.

use core::sync::atomic::AtomicU32;

use presencefan::adapters::hardware::HardwareAdapter;
use presencefan::app::service::AppService;
use presencefan::link::{self, QueuedLink, RX_QUEUE_CAPACITY, RxQueue};

use crate::mock_hw::{MockFan, MockRanger, RecordingSink, fast_config};

#[test]
fn staged_bytes_drive_the_controller() {
    let mut queue = RxQueue::new();
    let overruns = AtomicU32::new(0);
    let (mut stager, consumer) = link::split(&mut queue, &overruns);
    let mut link = QueuedLink::new(consumer, Vec::new());

    let ranger = MockRanger::default();
    ranger.echo_us.set(1000);
    let fan = MockFan::default();
    let mut hw = HardwareAdapter::new(ranger, fan.clone());
    let mut sink = RecordingSink::default();

    let mut app = AppService::new(fast_config());
    app.start(&mut hw, &mut link, &mut sink);

    stager.stage_all(b"MF1");
    for _ in 0..3 {
        app.tick(&mut hw, &mut link, &mut sink);
    }
    assert!(fan.on.get());
    assert_eq!(
        link.tx().as_slice(),
        b"SYSTEM:READY\nMODE:AUTO\nMODE:MANUAL\nFAN:ON\n"
    );
}

#[test]
fn burst_beyond_capacity_is_dropped_not_blocking() {
    let mut queue = RxQueue::new();
    let overruns = AtomicU32::new(0);
    let (mut stager, consumer) = link::split(&mut queue, &overruns);
    let mut link = QueuedLink::new(consumer, Vec::new());

    let mut hw = HardwareAdapter::new(MockRanger::default(), MockFan::default());
    let mut sink = RecordingSink::default();
    let mut app = AppService::new(fast_config());
    app.start(&mut hw, &mut link, &mut sink);

    let burst = vec![b'O'; RX_QUEUE_CAPACITY * 2];
    let kept = stager.stage_all(&burst);
    assert_eq!(kept, RX_QUEUE_CAPACITY - 1);
    assert_eq!(link.rx().overruns() as usize, burst.len() - kept);

    for _ in 0..kept {
        app.tick(&mut hw, &mut link, &mut sink);
    }
    assert!(link.rx().is_empty());
}
