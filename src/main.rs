//! Tempo: binário de demonstração.
//!
//! Responsabilidade:
//! 1. (self_test) Validar o subsistema de tempo na plataforma simulada.
//! 2. Inicializar o agendador global.
//! 3. Agendar uma tarefa a cada `--interval` segundos; o callback só levanta
//!    um flag, o trabalho visível roda no fluxo principal.

mod main_helpers;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, ValueEnum};
use tempo::{ClockKind, RearmPolicy, SchedulerConfig, TimeSpec};

use main_helpers::{print_banner, timestamp, wait_for_event};

/// Levantado pelo callback (contexto de sinal), consumido pelo loop principal
static EVENT_OCCURRED: AtomicBool = AtomicBool::new(false);

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ClockArg {
    Monotonic,
    Realtime,
}

impl From<ClockArg> for ClockKind {
    fn from(arg: ClockArg) -> Self {
        match arg {
            ClockArg::Monotonic => ClockKind::Monotonic,
            ClockArg::Realtime => ClockKind::Realtime,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tempo", version, about = "Periodic task demo on the SIGALRM alarm scheduler")]
struct Cli {
    /// Seconds between task runs
    #[arg(short, long, default_value_t = 5)]
    interval: u64,
    /// Stop after this many runs (default: run forever)
    #[arg(short, long)]
    count: Option<u64>,
    /// Clock used for deadlines
    #[arg(long, value_enum, default_value_t = ClockArg::Monotonic)]
    clock: ClockArg,
    /// Rearm the timer immediately when the head entry is cancelled
    #[arg(long, default_value_t = false)]
    eager_rearm: bool,
}

impl Cli {
    fn config(&self) -> SchedulerConfig {
        let rearm = if self.eager_rearm {
            RearmPolicy::Eager
        } else {
            RearmPolicy::Lazy
        };
        SchedulerConfig::new()
            .with_clock(self.clock.into())
            .with_rearm(rearm)
    }

    fn delay(&self) -> TimeSpec {
        TimeSpec::from_secs(i64::try_from(self.interval).unwrap_or(i64::MAX))
    }
}

fn task() {
    EVENT_OCCURRED.store(true, Ordering::Release);
}

#[cfg(feature = "self_test")]
fn run_self_tests() -> bool {
    tempo::core::time::test::run_time_tests().all_passed()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    print_banner();

    #[cfg(feature = "self_test")]
    {
        if !run_self_tests() {
            eprintln!("Self-test failed");
            return ExitCode::FAILURE;
        }
    }

    if let Err(err) = tempo::init_scheduler_with(cli.config()) {
        eprintln!("Failed to initialize scheduler: {err}");
        return ExitCode::FAILURE;
    }

    println!(
        "[{}] Scheduling initial task to run in {} seconds.",
        timestamp(),
        cli.interval
    );
    if let Err(err) = tempo::schedule(cli.delay(), task) {
        eprintln!("Failed to schedule task: {err}");
        return ExitCode::FAILURE;
    }

    let mut runs: u64 = 0;
    loop {
        if let Err(errno) = wait_for_event(&EVENT_OCCURRED) {
            eprintln!("Failed to wait for the alarm signal: errno {}", errno.as_i32());
            return ExitCode::FAILURE;
        }
        EVENT_OCCURRED.store(false, Ordering::Release);

        println!("[{}] Task is running.", timestamp());
        runs += 1;
        if cli.count.is_some_and(|limit| runs >= limit) {
            return ExitCode::SUCCESS;
        }

        if let Err(err) = tempo::schedule(cli.delay(), task) {
            eprintln!("Failed to reschedule task: {err}");
            return ExitCode::FAILURE;
        }
        println!(
            "[{}] Task rescheduled to run in {} seconds.",
            timestamp(),
            cli.interval
        );
    }
}
