//! Property tests for section dedup and reference numbering

use crawldoc::references::parse_reference_block;
use crawldoc::{DedupMode, LinkBuckets, Link, dedup, extract_references};
use proptest::prelude::*;

/// Markdown-ish documents built from a small vocabulary so repeats are common
fn markdown_doc() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just("## Setup".to_string()),
        Just("# Title".to_string()),
        Just("Install the package.".to_string()),
        Just("Install the package.   ".to_string()),
        Just("- item".to_string()),
        Just("  - nested".to_string()),
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z ]{1,12}",
    ];
    let newline = prop_oneof![Just("\n"), Just("\r\n"), Just("\r")];
    prop::collection::vec((line, newline), 0..24).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(line, nl)| format!("{line}{nl}"))
            .collect::<String>()
    })
}

proptest! {
    #[test]
    fn prop_dedup_is_stable_after_first_pass(doc in markdown_doc()) {
        let (once, _) = dedup(&doc, DedupMode::Exact);
        let (twice, second) = dedup(&once, DedupMode::Exact);
        let (thrice, third) = dedup(&twice, DedupMode::Exact);
        prop_assert_eq!(&twice, &thrice);
        prop_assert_eq!(second, third);
    }

    #[test]
    fn prop_no_removals_means_identical_output(doc in markdown_doc()) {
        let (out, metrics) = dedup(&doc, DedupMode::Exact);
        if metrics.sections_removed == 0 {
            prop_assert_eq!(out, doc);
        } else {
            prop_assert!(out.len() < doc.len());
            prop_assert!(metrics.chars_removed > 0);
        }
    }

    #[test]
    fn prop_off_mode_is_identity(doc in markdown_doc()) {
        let (out, metrics) = dedup(&doc, DedupMode::Off);
        prop_assert_eq!(out, doc);
        prop_assert!(!metrics.applied);
        prop_assert_eq!(metrics.sections_total, 0);
    }

    #[test]
    fn prop_reference_indices_are_contiguous(
        hrefs in prop::collection::vec(prop_oneof![
            Just(String::new()),
            "https://[a-c]\\.example/[a-c]{0,2}",
        ], 0..12)
    ) {
        let links = LinkBuckets {
            internal: hrefs.iter().map(|h| Link::new(h.as_str(), None)).collect(),
            external: hrefs.iter().rev().map(|h| Link::new(h.as_str(), Some("x"))).collect(),
        };
        let refs = extract_references("", &links);
        for (i, reference) in refs.iter().enumerate() {
            prop_assert_eq!(reference.index, i + 1);
            prop_assert!(!reference.href.is_empty());
        }
    }

    #[test]
    fn prop_parsed_block_is_renumbered(numbers in prop::collection::vec(1usize..999, 1..8)) {
        let block: String = numbers
            .iter()
            .map(|n| format!("⟨{n}⟩ https://example.com/{n}: Ref {n}\n"))
            .collect();
        let refs = parse_reference_block(&block);
        prop_assert_eq!(refs.len(), numbers.len());
        for (i, reference) in refs.iter().enumerate() {
            prop_assert_eq!(reference.index, i + 1);
        }
    }
}

#[test]
fn test_second_pass_over_paragraph_before_heading() {
    let markdown = "# Intro\n\nLead paragraph.\n\n## What is it\n\nA tool.\n\n\
                    You own the data.\n## What is it\n\nA tool.\n";
    let (once, first) = dedup(markdown, DedupMode::Exact);
    assert_eq!(once.matches("## What is it").count(), 1);
    assert!(once.contains("You own the data."));
    assert_eq!(first.sections_removed, 2);

    let (twice, second) = dedup(&once, DedupMode::Exact);
    assert_eq!(twice, once);
    assert_eq!(second.sections_removed, 0);
}
