#[cfg(test)]
mod tests {
    use logbook::libs::dispatch::{ui_channel, Dispatcher};
    use logbook::libs::scheduler::{Scheduler, SchedulerConfig, SchedulerError};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{mpsc, Arc};
    use std::thread;
    use std::time::Duration;
    use test_context::{test_context, TestContext};

    const WAIT: Duration = Duration::from_secs(5);

    struct SchedulerTestContext {
        scheduler: Arc<Scheduler>,
    }

    impl TestContext for SchedulerTestContext {
        fn setup() -> Self {
            let config = SchedulerConfig {
                timer_workers: 2,
                shutdown_grace: Duration::from_secs(2),
            };
            SchedulerTestContext {
                scheduler: Arc::new(Scheduler::start(config).unwrap()),
            }
        }

        fn teardown(self) {
            self.scheduler.shutdown();
        }
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_run_async_runs_off_thread(ctx: &mut SchedulerTestContext) {
        let (tx, rx) = mpsc::channel();
        ctx.scheduler
            .run_async(Box::new(move || tx.send(thread::current().id()).unwrap()))
            .unwrap();

        let worker = rx.recv_timeout(WAIT).unwrap();
        assert_ne!(worker, thread::current().id());
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_delayed_task_fires_once(ctx: &mut SchedulerTestContext) {
        let (tx, rx) = mpsc::channel();
        let id = ctx
            .scheduler
            .run_async_after_delay(Box::new(move || tx.send(()).unwrap()), Duration::from_millis(50))
            .unwrap();
        assert!(ctx.scheduler.is_scheduled(id));

        rx.recv_timeout(WAIT).unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert!(!ctx.scheduler.is_scheduled(id));
        assert!(!ctx.scheduler.cancel_task(id));
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_cancelled_delayed_task_never_runs(ctx: &mut SchedulerTestContext) {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let id = ctx
            .scheduler
            .run_async_after_delay(Box::new(move || flag.store(true, Ordering::SeqCst)), Duration::from_millis(300))
            .unwrap();

        assert!(ctx.scheduler.cancel_task(id));
        assert!(!ctx.scheduler.cancel_task(id));
        thread::sleep(Duration::from_millis(500));
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_repeating_task_until_cancelled(ctx: &mut SchedulerTestContext) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let id = ctx
            .scheduler
            .run_repeating(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                Duration::ZERO,
                Duration::from_millis(20),
            )
            .unwrap();

        thread::sleep(Duration::from_millis(300));
        assert!(ctx.scheduler.cancel_task(id));
        let at_cancel = runs.load(Ordering::SeqCst);
        assert!(at_cancel >= 3, "expected several runs, got {at_cancel}");

        // At most one run can have been in flight when the task was cancelled.
        thread::sleep(Duration::from_millis(200));
        assert!(runs.load(Ordering::SeqCst) <= at_cancel + 1);
        assert!(!ctx.scheduler.cancel_task(id));
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_repeating_runs_never_overlap(ctx: &mut SchedulerTestContext) {
        let running = Arc::new(AtomicBool::new(false));
        let overlapped = Arc::new(AtomicBool::new(false));
        let runs = Arc::new(AtomicUsize::new(0));
        let (r, o, n) = (running.clone(), overlapped.clone(), runs.clone());
        let id = ctx
            .scheduler
            .run_repeating(
                move || {
                    if r.swap(true, Ordering::SeqCst) {
                        o.store(true, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_millis(30));
                    n.fetch_add(1, Ordering::SeqCst);
                    r.store(false, Ordering::SeqCst);
                },
                Duration::ZERO,
                Duration::from_millis(1),
            )
            .unwrap();

        thread::sleep(Duration::from_millis(300));
        ctx.scheduler.cancel_task(id);
        assert!(runs.load(Ordering::SeqCst) >= 2);
        assert!(!overlapped.load(Ordering::SeqCst));
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_cancel_all(ctx: &mut SchedulerTestContext) {
        for _ in 0..3 {
            ctx.scheduler.run_repeating(|| {}, Duration::from_secs(10), Duration::from_secs(10)).unwrap();
        }
        assert_eq!(ctx.scheduler.scheduled_count(), 3);
        ctx.scheduler.cancel_all();
        assert_eq!(ctx.scheduler.scheduled_count(), 0);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_shutdown_waits_for_running_work(ctx: &mut SchedulerTestContext) {
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let (started_tx, started_rx) = mpsc::channel();
        ctx.scheduler
            .run_async(Box::new(move || {
                started_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(200));
                flag.store(true, Ordering::SeqCst);
            }))
            .unwrap();
        started_rx.recv_timeout(WAIT).unwrap();

        ctx.scheduler.shutdown();
        assert!(done.load(Ordering::SeqCst));
        assert!(ctx.scheduler.is_shut_down());
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_rejects_work_after_shutdown(ctx: &mut SchedulerTestContext) {
        ctx.scheduler.shutdown();
        ctx.scheduler.shutdown();

        assert!(matches!(ctx.scheduler.run_async(Box::new(|| {})), Err(SchedulerError::ShutDown)));
        assert!(matches!(
            ctx.scheduler.run_async_after_delay(Box::new(|| {}), Duration::ZERO),
            Err(SchedulerError::ShutDown)
        ));
        assert!(matches!(
            ctx.scheduler.run_repeating(|| {}, Duration::ZERO, Duration::from_secs(1)),
            Err(SchedulerError::ShutDown)
        ));
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_callbacks_run_on_queue_owner(ctx: &mut SchedulerTestContext) {
        let (sender, mut queue) = ui_channel();
        let dispatcher = Dispatcher::new(ctx.scheduler.clone(), sender);
        let (tx, rx) = mpsc::channel();

        dispatcher
            .run_with_callback(
                || thread::current().id(),
                move |worker| tx.send((worker, thread::current().id())).unwrap(),
            )
            .unwrap();

        assert!(queue.run_next_timeout(WAIT));
        let (worker, callback) = rx.try_recv().unwrap();
        assert_ne!(worker, thread::current().id());
        assert_eq!(callback, thread::current().id());
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_work_without_callback_posts_nothing(ctx: &mut SchedulerTestContext) {
        let (sender, mut queue) = ui_channel();
        let dispatcher = Dispatcher::new(ctx.scheduler.clone(), sender);
        let (tx, rx) = mpsc::channel();

        dispatcher.run(move || tx.send(()).unwrap()).unwrap();

        rx.recv_timeout(WAIT).unwrap();
        assert_eq!(queue.drain(), 0);
    }

    #[test_context(SchedulerTestContext)]
    #[test]
    fn test_panicking_work_still_wakes_queue_owner(ctx: &mut SchedulerTestContext) {
        let (sender, mut queue) = ui_channel();
        let dispatcher = Dispatcher::new(ctx.scheduler.clone(), sender);
        let called = Arc::new(AtomicBool::new(false));
        let flag = called.clone();

        dispatcher
            .run_with_callback(|| -> u32 { panic!("work failed") }, move |_| flag.store(true, Ordering::SeqCst))
            .unwrap();

        assert!(queue.run_next_timeout(WAIT));
        assert!(!called.load(Ordering::SeqCst));
        assert!(!ctx.scheduler.is_shut_down());
    }
}
