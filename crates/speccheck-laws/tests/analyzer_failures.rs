use async_trait::async_trait;
use mockall::mock;
use speccheck_laws::{CategoricalChecker, CheckerConfig};
use speccheck_model::VerificationResult;
use speccheck_ports::{AnalysisError, TextAnalyzer, ANALYSIS_UNAVAILABLE};
use speccheck_test_utils::analyzers::SlowAnalyzer;
use speccheck_test_utils::morphisms::{stateful_registry, tick, trim, uppercase};
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Analyzer {}

    #[async_trait]
    impl TextAnalyzer for Analyzer {
        async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError>;
    }
}

async fn failing_verdict(checker: &CategoricalChecker) -> VerificationResult {
    checker
        .verify_composition_associativity(&uppercase(), &trim(), &tick())
        .await
}

fn baseline() -> CategoricalChecker {
    CategoricalChecker::new(stateful_registry(), CheckerConfig::default())
}

#[tokio::test]
async fn backend_error_keeps_verdict() {
    let mut analyzer = MockAnalyzer::new();
    analyzer
        .expect_analyze()
        .times(1)
        .returning(|_| Err(AnalysisError::Backend("503".to_string())));

    let expected = failing_verdict(&baseline()).await;
    let actual = failing_verdict(&baseline().with_analyzer(Arc::new(analyzer))).await;

    assert_eq!(actual.success(), expected.success());
    assert_eq!(actual.counter_example(), expected.counter_example());
    assert_eq!(actual.suggested_fix(), expected.suggested_fix());
    assert!(actual.analysis().unwrap().ends_with(ANALYSIS_UNAVAILABLE));
}

#[tokio::test]
async fn prose_is_appended_after_detail() {
    let mut analyzer = MockAnalyzer::new();
    analyzer
        .expect_analyze()
        .withf(|prompt| prompt.contains("composition_associativity"))
        .returning(|_| Ok("the tick transform counts its calls".to_string()));

    let result = failing_verdict(&baseline().with_analyzer(Arc::new(analyzer))).await;
    let analysis = result.analysis().unwrap();
    assert!(analysis.starts_with("(f∘g)∘h == f∘(g∘h) violated"));
    assert!(analysis.ends_with("the tick transform counts its calls"));
}

#[tokio::test(start_paused = true)]
async fn slow_analyzer_times_out_without_changing_verdict() {
    let config = CheckerConfig::default().with_analysis_timeout(Duration::from_millis(50));
    let slow = CategoricalChecker::new(stateful_registry(), config).with_analyzer(Arc::new(SlowAnalyzer));

    let expected = failing_verdict(&baseline()).await;
    let actual = failing_verdict(&slow).await;

    assert!(!actual.success());
    assert_eq!(actual.counter_example(), expected.counter_example());
    assert!(actual.analysis().unwrap().ends_with(ANALYSIS_UNAVAILABLE));
}

#[tokio::test]
async fn passing_results_skip_the_analyzer() {
    let mut analyzer = MockAnalyzer::new();
    analyzer.expect_analyze().never();

    let checker = CategoricalChecker::default().with_analyzer(Arc::new(analyzer));
    let result = checker
        .verify_composition_associativity(&uppercase(), &trim(), &trim())
        .await;
    assert!(result.success());
    assert_eq!(result.analysis(), None);
}
