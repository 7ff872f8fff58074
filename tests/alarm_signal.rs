//! Ciclo completo com SIGALRM real.
//!
//! O agendador é um singleton de processo, então os testes rodam em série e
//! cada um espera a fila esvaziar antes de terminar. Os callbacks rodam em
//! contexto de sinal: só tocam em atômicos.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serial_test::serial;
use tempo::{SchedError, TimeSpec};

const TIMEOUT: Duration = Duration::from_secs(3);

fn ensure_init() {
    match tempo::init_scheduler() {
        Ok(()) | Err(SchedError::AlreadyInitialized) => {}
        Err(err) => panic!("init_scheduler falhou: {err}"),
    }
}

fn wait_until(cond: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < TIMEOUT {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

fn wait_idle() {
    assert!(wait_until(|| tempo::pending().unwrap() == 0), "fila não esvaziou");
}

#[test]
#[serial]
fn second_init_is_rejected() {
    ensure_init();
    assert_eq!(tempo::init_scheduler(), Err(SchedError::AlreadyInitialized));
    assert!(tempo::is_initialized());
}

#[test]
#[serial]
fn callbacks_fire_in_deadline_order() {
    static SLOTS: [AtomicU32; 3] = [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)];
    static NEXT: AtomicUsize = AtomicUsize::new(0);

    fn record(tag: u32) {
        let i = NEXT.fetch_add(1, Ordering::SeqCst);
        if i < SLOTS.len() {
            SLOTS[i].store(tag, Ordering::SeqCst);
        }
    }

    ensure_init();
    tempo::schedule(TimeSpec::from_millis(90), || record(3)).unwrap();
    tempo::schedule(TimeSpec::from_millis(30), || record(1)).unwrap();
    tempo::schedule(TimeSpec::from_millis(60), || record(2)).unwrap();

    assert!(wait_until(|| NEXT.load(Ordering::SeqCst) == 3));
    let order: Vec<u32> = SLOTS.iter().map(|s| s.load(Ordering::SeqCst)).collect();
    assert_eq!(order, vec![1, 2, 3]);
    wait_idle();
}

#[test]
#[serial]
fn equal_deadlines_fire_in_insertion_order() {
    static FIRST_SEEN: AtomicU32 = AtomicU32::new(0);
    static FIRED: AtomicU32 = AtomicU32::new(0);

    ensure_init();
    let deadline = tempo::now().unwrap().saturating_add(TimeSpec::from_millis(40));
    tempo::aschedule(deadline, || {
        let _ = FIRST_SEEN.compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst);
        FIRED.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();
    tempo::aschedule(deadline, || {
        let _ = FIRST_SEEN.compare_exchange(0, 2, Ordering::SeqCst, Ordering::SeqCst);
        FIRED.fetch_add(1, Ordering::SeqCst);
    })
    .unwrap();

    assert!(wait_until(|| FIRED.load(Ordering::SeqCst) == 2));
    assert_eq!(FIRST_SEEN.load(Ordering::SeqCst), 1);
    wait_idle();
}

#[test]
#[serial]
fn deschedule_before_deadline_prevents_firing() {
    static FIRED: AtomicBool = AtomicBool::new(false);

    ensure_init();
    let handle = tempo::schedule(TimeSpec::from_millis(50), || {
        FIRED.store(true, Ordering::SeqCst);
    })
    .unwrap();
    assert!(tempo::deschedule(handle));

    std::thread::sleep(Duration::from_millis(150));
    assert!(!FIRED.load(Ordering::SeqCst));
    // Handle velho: no-op
    assert!(!tempo::deschedule(handle));
    wait_idle();
}

#[test]
#[serial]
fn past_deadline_fires_promptly() {
    static FIRED: AtomicBool = AtomicBool::new(false);

    ensure_init();
    let past = tempo::now().unwrap().saturating_sub(TimeSpec::from_secs(1));
    tempo::aschedule(past, || FIRED.store(true, Ordering::SeqCst)).unwrap();

    assert!(wait_until(|| FIRED.load(Ordering::SeqCst)));
    wait_idle();
}

#[test]
#[serial]
fn callback_never_fires_before_deadline() {
    static FIRED_SECS: AtomicI64 = AtomicI64::new(-1);
    static FIRED_NANOS: AtomicI64 = AtomicI64::new(-1);

    ensure_init();
    let earliest = tempo::now().unwrap().saturating_add(TimeSpec::from_millis(50));
    tempo::schedule(TimeSpec::from_millis(50), || {
        // clock_gettime é async-signal-safe
        if let Ok(now) = tempo::now() {
            FIRED_NANOS.store(i64::from(now.nanos), Ordering::SeqCst);
            FIRED_SECS.store(now.seconds, Ordering::SeqCst);
        }
    })
    .unwrap();

    assert!(wait_until(|| FIRED_SECS.load(Ordering::SeqCst) >= 0));
    let fired = TimeSpec::new(
        FIRED_SECS.load(Ordering::SeqCst),
        FIRED_NANOS.load(Ordering::SeqCst) as u32,
    );
    assert!(fired >= earliest);
    wait_idle();
}

#[test]
#[serial]
fn callback_can_reschedule_itself() {
    static RUNS: AtomicU32 = AtomicU32::new(0);

    fn tick() {
        if RUNS.fetch_add(1, Ordering::SeqCst) + 1 < 3 {
            let _ = tempo::schedule(TimeSpec::from_millis(20), tick);
        }
    }

    ensure_init();
    tempo::schedule(TimeSpec::from_millis(20), tick).unwrap();

    assert!(wait_until(|| RUNS.load(Ordering::SeqCst) == 3));
    wait_idle();
    assert_eq!(RUNS.load(Ordering::SeqCst), 3);
}

#[test]
#[serial]
fn function_and_data_form() {
    static SEEN: AtomicU32 = AtomicU32::new(0);

    fn store(value: u32) {
        SEEN.store(value, Ordering::SeqCst);
    }

    ensure_init();
    assert_eq!(
        tempo::schedule_with(TimeSpec::from_millis(10), None::<fn(u32)>, 1).err(),
        Some(SchedError::InvalidCallback)
    );

    tempo::schedule_with(TimeSpec::from_millis(10), Some(store as fn(u32)), 42).unwrap();
    assert!(wait_until(|| SEEN.load(Ordering::SeqCst) == 42));
    wait_idle();
}
