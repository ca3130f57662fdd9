//! Property checks for the reply post-processor.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xreply_core::{
    HumanizeConfig, PostProcessOptions, ReplyPostProcessor, TWEET_CHAR_LIMIT, enforce_char_limit,
    twitter_char_count,
};

const WORDS: &[&str] = &[
    "you", "are", "people", "thanks", "because", "with", "about", "okay", "rust", "async",
    "this", "is", "wild!", "really?", "ok", "🚀", "سلام", "before", "something", "http://",
    "see:https://",
];

fn random_text(rng: &mut StdRng) -> String {
    let words = rng.gen_range(1..120);
    (0..words)
        .map(|_| {
            if rng.gen_bool(0.05) {
                format!("https://example.com/{}", "p".repeat(rng.gen_range(1..80)))
            } else {
                WORDS[rng.gen_range(0..WORDS.len())].to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn test_budget_never_exceeded() {
    let processor = ReplyPostProcessor::new();
    let options = PostProcessOptions::default().with_default_text("#xreply");
    let mut inputs = StdRng::seed_from_u64(2024);

    for seed in 0..300 {
        let raw = random_text(&mut inputs);
        let out = processor.process(&raw, &options, &mut StdRng::seed_from_u64(seed));
        assert!(
            twitter_char_count(&out) <= TWEET_CHAR_LIMIT,
            "over budget ({}): {out}",
            twitter_char_count(&out)
        );
    }
}

#[test]
fn test_trimmed_output_ends_with_ellipsis() {
    let mut inputs = StdRng::seed_from_u64(99);
    for _ in 0..200 {
        let text = random_text(&mut inputs);
        let limited = enforce_char_limit(&text);
        if twitter_char_count(&text) > TWEET_CHAR_LIMIT {
            assert!(limited.ends_with("..."), "{limited}");
            assert!(twitter_char_count(&limited) <= TWEET_CHAR_LIMIT);
        } else {
            assert_eq!(limited, text);
        }
    }
}

#[test]
fn test_bare_scheme_at_cut_point_stays_in_budget() {
    for scheme in ["http://", "https://", "see:https://"] {
        for pad in 125..140 {
            let text = format!("{}{scheme} {}", "x ".repeat(pad), "z".repeat(50));
            let limited = enforce_char_limit(&text);
            assert!(
                twitter_char_count(&limited) <= TWEET_CHAR_LIMIT,
                "over budget ({}): {limited}",
                twitter_char_count(&limited)
            );
            assert!(limited.ends_with("..."));
        }
    }
}

#[test]
fn test_limit_is_idempotent() {
    let mut inputs = StdRng::seed_from_u64(5);
    for _ in 0..100 {
        let once = enforce_char_limit(&random_text(&mut inputs));
        assert_eq!(enforce_char_limit(&once), once);
    }
}

#[test]
fn test_seeded_pipeline_is_reproducible() {
    let processor = ReplyPostProcessor::new();
    let options = PostProcessOptions::default();
    let raw = "Thank you! You are right about people, okay? Something to think about with friends";

    for seed in 0..50 {
        let a = processor.process(raw, &options, &mut StdRng::seed_from_u64(seed));
        let b = processor.process(raw, &options, &mut StdRng::seed_from_u64(seed));
        assert_eq!(a, b, "seed {seed} diverged");
    }
}

#[test]
fn test_seeds_produce_variation() {
    let processor = ReplyPostProcessor::new();
    let options = PostProcessOptions::default();
    let raw = "Thank you! You are right about people, okay? Something to think about with friends";

    let outputs: std::collections::HashSet<String> = (0..200)
        .map(|seed| processor.process(raw, &options, &mut StdRng::seed_from_u64(seed)))
        .collect();
    assert!(outputs.len() > 1);
}

#[test]
fn test_url_weighted_count_scenario() {
    let url = format!("https://t.co/{}", "a".repeat(37));
    assert_eq!(url.chars().count(), 50);
    let words = vec!["word"; 20].join(" ");
    let text = format!("{words} {url}");
    let raw_length = text.chars().count();
    assert_eq!(twitter_char_count(&text), raw_length - 50 + 23);
}

#[test]
fn test_disabled_humanization_keeps_text() {
    let processor = ReplyPostProcessor::new().with_humanize(HumanizeConfig::disabled());
    let out = processor.process(
        "Because you are kind",
        &PostProcessOptions::default(),
        &mut StdRng::seed_from_u64(1),
    );
    assert_eq!(out, "Because you are kind");
}
