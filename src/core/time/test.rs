//! Auto-teste do subsistema de tempo
//!
//! Roda no binário (feature `self_test`) contra a plataforma simulada, antes
//! de tocar no `SIGALRM` real.

use core::sync::atomic::{AtomicU32, Ordering};

use super::{AlarmDriver, RearmPolicy, SchedulerConfig, TimeSpec, TimerQueue};
use crate::hal::sim::{run_for, SimPlatform};
use crate::klib::test_framework::{run_test_suite, SuiteReport, TestCase, TestResult};

const TIME_TESTS: &[TestCase] = &[
    TestCase::new("fila: ordem por deadline", test_queue_order),
    TestCase::new("fila: empate FIFO", test_queue_ties),
    TestCase::new("driver: disparo no deadline", test_fires_at_deadline),
    TestCase::new("driver: cancelamento", test_cancellation),
    TestCase::new("driver: rearme eager", test_eager_rearm),
    TestCase::new("driver: deadline no passado", test_past_deadline),
];

/// Executa todos os testes de tempo
pub fn run_time_tests() -> SuiteReport {
    crate::kinfo!("╔════════════════════════════════════════╗");
    crate::kinfo!("║     🧪 TESTES DE TEMPO                 ║");
    crate::kinfo!("╚════════════════════════════════════════╝");

    let report = run_test_suite("time", TIME_TESTS);

    if report.all_passed() {
        crate::kok!("Subsistema de tempo validado");
    } else {
        crate::kfail!("Subsistema de tempo com falhas");
    }
    report
}

fn sim_driver(rearm: RearmPolicy) -> Option<AlarmDriver<SimPlatform>> {
    AlarmDriver::new(SimPlatform::new(), SchedulerConfig::new().with_rearm(rearm)).ok()
}

fn test_queue_order() -> TestResult {
    let mut queue = TimerQueue::new();
    for secs in [4, 1, 3, 2] {
        let entry = super::ScheduleEntry::new(TimeSpec::from_secs(secs), || {});
        if queue.insert(entry).is_err() {
            return TestResult::Failed;
        }
    }
    let order: Vec<i64> = queue.deadlines().map(|d| d.seconds).collect();
    TestResult::check(order == [1, 2, 3, 4])
}

fn test_queue_ties() -> TestResult {
    let mut queue = TimerQueue::new();
    let at = TimeSpec::from_secs(3);
    let first = match queue.insert(super::ScheduleEntry::new(at, || {})) {
        Ok(ins) => ins.handle,
        Err(_) => return TestResult::Failed,
    };
    let second = match queue.insert(super::ScheduleEntry::new(at, || {})) {
        Ok(ins) => ins,
        Err(_) => return TestResult::Failed,
    };
    TestResult::check(!second.was_new_head && queue.head_handle() == Some(first))
}

fn test_fires_at_deadline() -> TestResult {
    static HITS: AtomicU32 = AtomicU32::new(0);
    HITS.store(0, Ordering::SeqCst);

    let Some(driver) = sim_driver(RearmPolicy::Lazy) else {
        return TestResult::Failed;
    };
    if driver
        .schedule(TimeSpec::from_secs(5), || {
            HITS.fetch_add(1, Ordering::SeqCst);
        })
        .is_err()
    {
        return TestResult::Failed;
    }

    run_for(&driver, TimeSpec::from_millis(4_999));
    let early = HITS.load(Ordering::SeqCst);
    run_for(&driver, TimeSpec::from_millis(1));
    let on_time = HITS.load(Ordering::SeqCst);

    TestResult::check(early == 0 && on_time == 1 && !driver.platform().is_armed())
}

fn test_cancellation() -> TestResult {
    static HITS: AtomicU32 = AtomicU32::new(0);
    HITS.store(0, Ordering::SeqCst);

    let Some(driver) = sim_driver(RearmPolicy::Lazy) else {
        return TestResult::Failed;
    };
    let handle = match driver.schedule(TimeSpec::from_secs(10), || {
        HITS.fetch_add(1, Ordering::SeqCst);
    }) {
        Ok(handle) => handle,
        Err(_) => return TestResult::Failed,
    };

    run_for(&driver, TimeSpec::from_secs(1));
    let removed = driver.deschedule(handle);
    run_for(&driver, TimeSpec::from_secs(20));

    TestResult::check(removed && HITS.load(Ordering::SeqCst) == 0 && !driver.deschedule(handle))
}

fn test_eager_rearm() -> TestResult {
    let Some(driver) = sim_driver(RearmPolicy::Eager) else {
        return TestResult::Failed;
    };
    let head = driver.schedule(TimeSpec::from_secs(2), || {});
    let tail = driver.schedule(TimeSpec::from_secs(7), || {});
    let (Ok(head), Ok(_)) = (head, tail) else {
        return TestResult::Failed;
    };

    driver.deschedule(head);
    TestResult::check(driver.platform().expires_at() == Some(TimeSpec::from_secs(7)))
}

fn test_past_deadline() -> TestResult {
    static HITS: AtomicU32 = AtomicU32::new(0);
    HITS.store(0, Ordering::SeqCst);

    let Some(driver) = sim_driver(RearmPolicy::Lazy) else {
        return TestResult::Failed;
    };
    if driver
        .schedule(TimeSpec::from_secs(-1), || {
            HITS.fetch_add(1, Ordering::SeqCst);
        })
        .is_err()
    {
        return TestResult::Failed;
    }

    let clamped = driver.platform().last_arm() == Some(TimeSpec::ZERO);
    run_for(&driver, TimeSpec::ZERO);
    TestResult::check(clamped && HITS.load(Ordering::SeqCst) == 1)
}
