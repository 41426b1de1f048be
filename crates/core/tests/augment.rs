//! Tests for prompt augmentation.

use rand::{SeedableRng, rngs::StdRng};
use std::io::Write;
use typer_core::{Augment, Identity, TopicAugment};

fn topics() -> Vec<String> {
    ["rust", "sockets", "compilers"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn identity_passes_prompt_through() {
    assert_eq!(Identity.augment("Hello"), "Hello");
}

#[test]
fn template_receives_topic_and_prompt() {
    let mut augment = TopicAugment::new("# {topic}\n{prompt}", topics(), Some(7)).unwrap();
    let prompt = augment.augment("fn main() {");
    let (header, body) = prompt.split_once('\n').unwrap();
    assert_eq!(body, "fn main() {");
    let topic = header.strip_prefix("# ").unwrap();
    assert!(augment.topics().iter().any(|t| t == topic));
}

#[test]
fn same_seed_same_topics() {
    let mut a = TopicAugment::new("{topic}", topics(), Some(42)).unwrap();
    let mut b = TopicAugment::new("{topic}", topics(), Some(42)).unwrap();
    let left: Vec<String> = (0..16).map(|_| a.augment("")).collect();
    let right: Vec<String> = (0..16).map(|_| b.augment("")).collect();
    assert_eq!(left, right);
}

#[test]
fn injected_rng_is_used() {
    let mut a = TopicAugment::with_rng("{topic}", topics(), StdRng::seed_from_u64(1)).unwrap();
    let mut b = TopicAugment::new("{topic}", topics(), Some(1)).unwrap();
    assert_eq!(a.augment(""), b.augment(""));
}

#[test]
fn empty_topic_list_is_rejected() {
    assert!(TopicAugment::new("{topic}", Vec::new(), None).is_err());
}

#[test]
fn topics_load_one_per_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "alpha\n\n  beta  \ngamma").unwrap();
    let augment = TopicAugment::from_file("{topic}", file.path(), Some(0)).unwrap();
    assert_eq!(augment.topics(), ["alpha", "beta", "gamma"]);
}

#[test]
fn closures_are_augment_policies() {
    let mut calls = 0;
    let mut policy = |prompt: &str| {
        calls += 1;
        prompt.to_uppercase()
    };
    assert_eq!(policy.augment("abc"), "ABC");
    assert_eq!(calls, 1);
}

#[test]
fn missing_topics_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("topics.txt");
    let error = TopicAugment::from_file("{topic}", &path, None)
        .err()
        .unwrap();
    assert!(format!("{error:#}").contains("topics.txt"));
}
