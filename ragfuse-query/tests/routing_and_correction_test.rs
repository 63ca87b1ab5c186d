//! Integration tests for the adaptive, CRAG and rerank retrievers and for
//! hooks attached to strategy retrievers.

mod common;

use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use test_case::test_case;

use common::{MockChatModel, MockRetriever, MockSearcher, ReversingReranker, docs, ids};
use ragfuse_core::{Document, MessageRole, RagfuseError, RetrievalOptions, traits::Retriever};
use ragfuse_query::hooks::Hooks;
use ragfuse_query::middleware::{apply_middleware, with_hooks};
use ragfuse_query::retrievers::{AdaptiveRetriever, CragRetriever, QueryComplexity, RerankRetriever};

// ---------------------------------------------------------------------------
// AdaptiveRetriever
// ---------------------------------------------------------------------------

struct AdaptiveFixture {
    llm: Arc<MockChatModel>,
    simple: Arc<MockRetriever>,
    complex: Arc<MockRetriever>,
    retriever: AdaptiveRetriever,
}

fn adaptive(reply: &str) -> AdaptiveFixture {
    let llm = Arc::new(MockChatModel::replying(reply));
    let simple = Arc::new(MockRetriever::with_docs(docs(&["simple-doc"])));
    let complex = Arc::new(MockRetriever::with_docs(docs(&["complex-doc"])));
    let retriever = AdaptiveRetriever::new(llm.clone(), simple.clone(), Some(complex.clone()));
    AdaptiveFixture {
        llm,
        simple,
        complex,
        retriever,
    }
}

#[test_case("no_retrieval", &[], 0, 0; "skip retrieval")]
#[test_case("complex", &["complex-doc"], 0, 1; "complex route")]
#[test_case("simple", &["simple-doc"], 1, 0; "simple route")]
#[test_case("I am not sure", &["simple-doc"], 1, 0; "unrecognized falls back to simple")]
#[tokio::test]
async fn adaptive_routes_by_classification(
    reply: &str,
    expected: &[&str],
    simple_calls: usize,
    complex_calls: usize,
) {
    let fixture = adaptive(reply);
    let result = fixture
        .retriever
        .retrieve("query", &RetrievalOptions::default())
        .await
        .unwrap();

    assert_eq!(ids(&result), expected);
    assert_eq!(fixture.simple.calls(), simple_calls);
    assert_eq!(fixture.complex.calls(), complex_calls);
    assert_eq!(fixture.llm.calls(), 1);
}

#[tokio::test]
async fn adaptive_prompt_names_query_and_categories() {
    let fixture = adaptive("simple");
    fixture
        .retriever
        .retrieve("how do lifetimes work?", &RetrievalOptions::default())
        .await
        .unwrap();

    let prompts = fixture.llm.prompts();
    assert_eq!(prompts.len(), 1);
    for needle in ["how do lifetimes work?", "no_retrieval", "simple", "complex"] {
        assert!(prompts[0].contains(needle), "prompt is missing {needle:?}");
    }

    let conversation = &fixture.llm.conversations()[0];
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation[0].role, MessageRole::User);
}

#[tokio::test]
async fn adaptive_without_complex_uses_simple() {
    let simple = Arc::new(MockRetriever::with_docs(docs(&["simple-doc"])));
    let retriever = AdaptiveRetriever::new(
        Arc::new(MockChatModel::replying("complex")),
        simple.clone(),
        None,
    );

    let result = retriever.retrieve("q", &RetrievalOptions::default()).await.unwrap();
    assert_eq!(ids(&result), ["simple-doc"]);
    assert_eq!(simple.calls(), 1);
}

#[tokio::test]
async fn adaptive_passes_options_through() {
    let fixture = adaptive("simple");
    let options = RetrievalOptions::new()
        .with_top_k(4)
        .with_threshold(0.2)
        .with_filter("kind", "faq");
    fixture.retriever.retrieve("q", &options).await.unwrap();

    assert_eq!(fixture.simple.last_options(), Some(options));
}

#[tokio::test]
async fn adaptive_errors_are_tagged() {
    let simple = Arc::new(MockRetriever::default());
    let classify_err = AdaptiveRetriever::new(Arc::new(MockChatModel::failing()), simple.clone(), None)
        .retrieve("q", &RetrievalOptions::default())
        .await
        .unwrap_err();
    assert_eq!(classify_err.stage(), Some("adaptive classify"));
    assert_eq!(simple.calls(), 0);

    let simple_err = AdaptiveRetriever::new(
        Arc::new(MockChatModel::replying("simple")),
        Arc::new(MockRetriever::failing()),
        None,
    )
    .retrieve("q", &RetrievalOptions::default())
    .await
    .unwrap_err();
    assert_eq!(simple_err.stage(), Some("adaptive simple"));

    let complex_err = AdaptiveRetriever::new(
        Arc::new(MockChatModel::replying("complex")),
        Arc::new(MockRetriever::default()),
        Some(Arc::new(MockRetriever::failing())),
    )
    .retrieve("q", &RetrievalOptions::default())
    .await
    .unwrap_err();
    assert_eq!(complex_err.stage(), Some("adaptive complex"));
}

#[tokio::test]
async fn adaptive_before_hook_aborts_before_classification() {
    let llm = Arc::new(MockChatModel::replying("simple"));
    let retriever = AdaptiveRetriever::new(llm.clone(), Arc::new(MockRetriever::default()), None)
        .with_hooks(Hooks::new().before_retrieve(|_| Err(RagfuseError::hook("blocked"))));

    let err = retriever.retrieve("q", &RetrievalOptions::default()).await.unwrap_err();
    assert!(matches!(err, RagfuseError::Hook { .. }));
    assert_eq!(llm.calls(), 0);
    assert_eq!(QueryComplexity::from_response("blocked"), QueryComplexity::Simple);
}

// ---------------------------------------------------------------------------
// CragRetriever
// ---------------------------------------------------------------------------

/// A grader that scores documents by the content embedded in the prompt.
fn grader(scores: &'static [(&'static str, &'static str)]) -> Arc<MockChatModel> {
    Arc::new(MockChatModel::new(move |prompt| {
        scores
            .iter()
            .find(|(content, _)| prompt.contains(content))
            .map(|(_, score)| (*score).to_string())
            .ok_or_else(|| RagfuseError::llm("unexpected prompt"))
    }))
}

fn graded_docs() -> Vec<Document> {
    vec![
        Document::new("d1", "alpha").with_score(0.9),
        Document::new("d2", "bravo").with_score(0.8),
        Document::new("d3", "charlie").with_score(0.7),
    ]
}

#[tokio::test]
async fn crag_keeps_relevant_in_original_order() {
    let llm = grader(&[("alpha", "0.2"), ("bravo", "-0.5"), ("charlie", "0.9")]);
    let web = Arc::new(MockSearcher::with_docs(docs(&["web"])));
    let crag = CragRetriever::new(Arc::new(MockRetriever::with_docs(graded_docs())), llm.clone())
        .with_web_searcher(web.clone());

    let result = crag.retrieve("q", &RetrievalOptions::default()).await.unwrap();

    assert_eq!(ids(&result), ["d1", "d3"]);
    assert_eq!(result[0].score, 0.2);
    assert_eq!(result[1].score, 0.9);
    assert_eq!(llm.calls(), 3);
    assert!(web.ks().is_empty());
}

#[tokio::test]
async fn crag_clamps_scores_before_threshold() {
    let llm = grader(&[("alpha", "2.5"), ("bravo", "-3.0"), ("charlie", "0.4")]);
    let crag = CragRetriever::new(Arc::new(MockRetriever::with_docs(graded_docs())), llm)
        .with_threshold(0.5);
    assert_eq!(crag.threshold(), 0.5);

    let result = crag.retrieve("q", &RetrievalOptions::default()).await.unwrap();
    assert_eq!(ids(&result), ["d1"]);
    assert_eq!(result[0].score, 1.0);
}

#[tokio::test]
async fn crag_truncates_relevant_to_top_k() {
    let llm = Arc::new(MockChatModel::replying("0.8"));
    let crag = CragRetriever::new(Arc::new(MockRetriever::with_docs(graded_docs())), llm);

    let result = crag
        .retrieve("q", &RetrievalOptions::new().with_top_k(2))
        .await
        .unwrap();
    assert_eq!(ids(&result), ["d1", "d2"]);
}

#[tokio::test]
async fn crag_irrelevant_falls_back_to_web() {
    let llm = Arc::new(MockChatModel::replying("-3.0"));
    let web = Arc::new(MockSearcher::with_docs(docs(&["w1", "w2"])));
    let crag = CragRetriever::new(Arc::new(MockRetriever::with_docs(graded_docs())), llm)
        .with_web_searcher(web.clone());

    let result = crag
        .retrieve("q", &RetrievalOptions::new().with_top_k(3))
        .await
        .unwrap();
    assert_eq!(ids(&result), ["w1", "w2"]);
    assert_eq!(web.ks(), [10]);
}

#[tokio::test]
async fn crag_empty_retrieval_skips_grading() {
    let llm = Arc::new(MockChatModel::replying("1.0"));
    let web = Arc::new(MockSearcher::with_docs(docs(&["w1"])));
    let crag = CragRetriever::new(Arc::new(MockRetriever::default()), llm.clone())
        .with_web_searcher(web.clone());

    let result = crag
        .retrieve("q", &RetrievalOptions::new().with_top_k(25))
        .await
        .unwrap();
    assert_eq!(ids(&result), ["w1"]);
    assert_eq!(llm.calls(), 0);
    assert_eq!(web.ks(), [25]);
}

#[tokio::test]
async fn crag_without_web_searcher_returns_empty() {
    let crag = CragRetriever::new(
        Arc::new(MockRetriever::with_docs(graded_docs())),
        Arc::new(MockChatModel::replying("-1")),
    );
    let result = crag.retrieve("q", &RetrievalOptions::default()).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn crag_error_stages() {
    let inner_err = CragRetriever::new(
        Arc::new(MockRetriever::failing()),
        Arc::new(MockChatModel::replying("1")),
    )
    .retrieve("q", &RetrievalOptions::default())
    .await
    .unwrap_err();
    assert_eq!(inner_err.stage(), Some("crag inner retrieve"));

    let parse_err = CragRetriever::new(
        Arc::new(MockRetriever::with_docs(graded_docs())),
        Arc::new(MockChatModel::replying("quite relevant")),
    )
    .retrieve("q", &RetrievalOptions::default())
    .await
    .unwrap_err();
    assert_eq!(parse_err.stage(), Some("crag evaluate"));
    assert!(matches!(parse_err.root(), RagfuseError::Parse { .. }));

    let llm_err = CragRetriever::new(
        Arc::new(MockRetriever::with_docs(graded_docs())),
        Arc::new(MockChatModel::failing()),
    )
    .retrieve("q", &RetrievalOptions::default())
    .await
    .unwrap_err();
    assert_eq!(llm_err.stage(), Some("crag evaluate"));

    let web_err = CragRetriever::new(
        Arc::new(MockRetriever::default()),
        Arc::new(MockChatModel::replying("1")),
    )
    .with_web_searcher(Arc::new(MockSearcher::failing()))
    .retrieve("q", &RetrievalOptions::default())
    .await
    .unwrap_err();
    assert_eq!(web_err.stage(), Some("crag web search"));
}

#[tokio::test]
async fn crag_after_hook_fires_once_per_path() {
    let outcomes = Arc::new(Mutex::new(Vec::new()));
    let hooks = {
        let outcomes = Arc::clone(&outcomes);
        Hooks::new().after_retrieve(move |result| {
            let outcome = match result {
                Ok(docs) => format!("ok:{}", docs.len()),
                Err(_) => "err".to_string(),
            };
            outcomes.lock().unwrap().push(outcome);
        })
    };

    let crag = CragRetriever::new(
        Arc::new(MockRetriever::with_docs(graded_docs())),
        Arc::new(MockChatModel::replying("-1")),
    )
    .with_web_searcher(Arc::new(MockSearcher::with_docs(docs(&["w1"]))))
    .with_hooks(hooks.clone());
    crag.retrieve("q", &RetrievalOptions::default()).await.unwrap();

    let failing = CragRetriever::new(
        Arc::new(MockRetriever::failing()),
        Arc::new(MockChatModel::replying("1")),
    )
    .with_hooks(hooks);
    failing.retrieve("q", &RetrievalOptions::default()).await.unwrap_err();

    assert_eq!(*outcomes.lock().unwrap(), ["ok:1", "err"]);
}

// ---------------------------------------------------------------------------
// RerankRetriever
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rerank_reorders_truncates_and_reports() {
    let seen = Arc::new(Mutex::new(None));
    let hooks = {
        let seen = Arc::clone(&seen);
        Hooks::new().on_rerank(move |query, before, after| {
            let before: Vec<String> = before.iter().map(|d| d.id.clone()).collect();
            let after: Vec<String> = after.iter().map(|d| d.id.clone()).collect();
            *seen.lock().unwrap() = Some((query.to_string(), before, after));
        })
    };

    let reranker = Arc::new(ReversingReranker::default());
    let retriever = RerankRetriever::new(
        Arc::new(MockRetriever::with_docs(docs(&["a", "b", "c"]))),
        reranker.clone(),
    )
    .with_top_n(2)
    .with_hooks(hooks);

    let result = retriever.retrieve("q", &RetrievalOptions::default()).await.unwrap();

    assert_eq!(ids(&result), ["c", "b"]);
    assert_eq!(reranker.calls(), 1);
    let (query, before, after) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(query, "q");
    assert_eq!(before, ["a", "b", "c"]);
    // the hook sees the full reranked list before truncation
    assert_eq!(after, ["c", "b", "a"]);
}

#[tokio::test]
async fn rerank_skips_empty_results() {
    let reranker = Arc::new(ReversingReranker::default());
    let after_calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&after_calls);

    let retriever = RerankRetriever::new(Arc::new(MockRetriever::default()), reranker.clone())
        .with_hooks(Hooks::new().after_retrieve(move |_| *counter.lock().unwrap() += 1));
    let result = retriever.retrieve("q", &RetrievalOptions::default()).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(reranker.calls(), 0);
    assert_eq!(*after_calls.lock().unwrap(), 1);
}

#[tokio::test]
async fn rerank_error_is_tagged() {
    let reranker = Arc::new(ReversingReranker {
        fail: true,
        ..ReversingReranker::default()
    });
    let retriever = RerankRetriever::new(Arc::new(MockRetriever::with_docs(docs(&["a"]))), reranker);

    let err = retriever.retrieve("q", &RetrievalOptions::default()).await.unwrap_err();
    assert_eq!(err.stage(), Some("retriever: rerank"));
    assert!(matches!(err.root(), RagfuseError::Rerank { .. }));
}

// ---------------------------------------------------------------------------
// Layering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn middleware_wraps_a_layered_pipeline() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (before_log, after_log) = (Arc::clone(&log), Arc::clone(&log));
    let hooks = Hooks::new()
        .before_retrieve(move |query| {
            before_log.lock().unwrap().push(format!("before {query}"));
            Ok(())
        })
        .after_retrieve(move |result| {
            let count = result.as_ref().map_or(0, Vec::len);
            after_log.lock().unwrap().push(format!("after {count}"));
        });

    let crag: Arc<dyn Retriever> = Arc::new(CragRetriever::new(
        Arc::new(MockRetriever::with_docs(graded_docs())),
        Arc::new(MockChatModel::replying("0.5")),
    ));
    let reranked: Arc<dyn Retriever> =
        Arc::new(RerankRetriever::new(crag, Arc::new(ReversingReranker::default())).with_top_n(1));
    let pipeline = apply_middleware(reranked, vec![Box::new(with_hooks(hooks))]);

    let result = pipeline.retrieve("layers", &RetrievalOptions::default()).await.unwrap();

    assert_eq!(ids(&result), ["d3"]);
    assert_eq!(*log.lock().unwrap(), ["before layers", "after 1"]);
}
