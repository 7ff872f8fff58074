//! Framework de auto-teste
//!
//! Suites simples executadas em tempo de execução (feature `self_test`),
//! reportadas pelos macros de log.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

impl TestResult {
    /// `true` → Passed, `false` → Failed
    pub const fn check(ok: bool) -> Self {
        if ok {
            Self::Passed
        } else {
            Self::Failed
        }
    }
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Contagem de uma suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite: ", name);

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Passed => {
                crate::kinfo!("[PASS] ", test.name);
                report.passed += 1;
            }
            TestResult::Failed => {
                crate::kerror!("[FAIL] ", test.name);
                report.failed += 1;
            }
            TestResult::Skipped => {
                crate::kwarn!("[SKIP] ", test.name);
                report.skipped += 1;
            }
        }
    }

    crate::klog!("Resultados: passed=", report.passed, " failed=", report.failed);
    crate::klog!(" skipped=", report.skipped);
    crate::knl!();
    report
}
