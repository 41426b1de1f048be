//! Tests for the generative source's rolling-context loop.

use futures_util::StreamExt;
use typer_core::{
    Generative, ResponseSource, SourceError,
    testing::{ScriptedEngine, SuffixEngine},
};

async fn drain<S: ResponseSource>(source: &mut S) -> Vec<String> {
    source
        .chunks()
        .unwrap()
        .map(|chunk| chunk.unwrap())
        .collect()
        .await
}

#[tokio::test]
async fn hello_world_stops_after_crossing_bound() {
    let mut source = Generative::new(SuffixEngine::new(" world")).max_length(11);
    source.reset("Hello");
    let chunks = drain(&mut source).await;
    assert_eq!(chunks, vec![" world", " world"]);
    assert_eq!(chunks.concat(), " world world");
}

#[tokio::test]
async fn step_landing_on_bound_yields_once_then_stops() {
    let mut source = Generative::new(SuffixEngine::new("abc")).max_length(3);
    source.reset("x");
    assert_eq!(drain(&mut source).await, vec!["abc"]);

    let mut source = Generative::new(SuffixEngine::new("abc")).max_length(6);
    source.reset("x");
    assert_eq!(drain(&mut source).await, vec!["abc", "abc"]);
}

#[tokio::test]
async fn chunks_concatenate_to_generated_suffix() {
    let engine = ScriptedEngine::new(["ab", "abcd", "abcdef"]);
    let mut source = Generative::new(engine).max_length(5);
    source.reset("a");
    let chunks = drain(&mut source).await;
    assert_eq!(chunks, vec!["b", "cd", "ef"]);
    assert_eq!(chunks.concat(), "abcdef"["a".len()..]);
    assert_eq!(source.engine().prompts(), vec!["a", "ab", "abcd"]);
}

#[tokio::test]
async fn chunks_before_reset_is_a_precondition_error() {
    let mut source = Generative::new(SuffixEngine::new("!"));
    assert!(matches!(source.chunks(), Err(SourceError::NotArmed)));
}

#[tokio::test]
async fn each_pass_needs_its_own_reset() {
    let mut source = Generative::new(SuffixEngine::new("!")).max_length(1);
    source.reset("hi");
    assert_eq!(drain(&mut source).await, vec!["!"]);
    assert!(source.prompt().is_none());
    assert!(matches!(source.chunks(), Err(SourceError::NotArmed)));
}

#[tokio::test]
async fn second_reset_discards_the_first_prompt() {
    let engine = ScriptedEngine::new(["second!"]);
    let mut source = Generative::new(engine).max_length(1);
    source.reset("first");
    source.reset("second");
    assert_eq!(drain(&mut source).await, vec!["!"]);
    assert_eq!(source.engine().prompts(), vec!["second"]);
}

#[tokio::test]
async fn output_without_prompt_prefix_fails_loudly() {
    let engine = ScriptedEngine::new(["something else entirely"]);
    let mut source = Generative::new(engine);
    source.reset("hello");
    let items: Vec<_> = source.chunks().unwrap().collect().await;
    assert_eq!(items.len(), 1);
    assert!(matches!(
        items[0],
        Err(SourceError::PrefixMismatch {
            prompt_len: 5,
            output_len: 23
        })
    ));
}

#[tokio::test]
async fn engine_failure_surfaces_as_error() {
    let mut source = Generative::new(ScriptedEngine::new(Vec::<String>::new()));
    source.reset("hello");
    let items: Vec<_> = source.chunks().unwrap().collect().await;
    assert!(matches!(items.as_slice(), [Err(SourceError::Engine(_))]));
}

#[tokio::test]
async fn empty_continuation_ends_the_pass() {
    let engine = ScriptedEngine::new(["ab", "ab"]);
    let mut source = Generative::new(engine).max_length(100);
    source.reset("a");
    assert_eq!(drain(&mut source).await, vec!["b"]);
}

#[tokio::test]
async fn augment_rewrites_the_starting_prompt() {
    let engine = ScriptedEngine::new(["Topic: rust\nHello there"]);
    let mut source = Generative::new(engine)
        .augment(|prompt: &str| format!("Topic: rust\n{prompt}"))
        .max_length(1);
    source.reset("Hello");
    assert_eq!(source.prompt(), Some("Topic: rust\nHello"));
    assert_eq!(drain(&mut source).await, vec![" there"]);
    assert_eq!(source.engine().prompts(), vec!["Topic: rust\nHello"]);
}

#[tokio::test]
async fn zero_bound_generates_nothing() {
    let engine = ScriptedEngine::new(Vec::<String>::new());
    let mut source = Generative::new(engine).max_length(0);
    source.reset("hello");
    assert!(drain(&mut source).await.is_empty());
    assert!(source.engine().prompts().is_empty());
}

#[tokio::test]
async fn resume_arms_without_augmenting() {
    let engine = ScriptedEngine::new(["tail!"]);
    let mut source = Generative::new(engine)
        .augment(|prompt: &str| format!("Topic: rust\n{prompt}"))
        .max_length(1);
    source.resume("tail");
    assert_eq!(source.effective_prompt(), Some("tail"));
    assert_eq!(drain(&mut source).await, vec!["!"]);
    assert_eq!(source.engine().prompts(), vec!["tail"]);
    assert!(source.effective_prompt().is_none());
}
