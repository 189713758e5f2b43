// Unit tests for business rules

use super::*;

#[test]
fn test_split_on_english_markers() {
    let scripts = ScriptSplitter::split(
        "Slide 1: Welcome everyone.\nSlide 2: Our agenda.\n\nslide 3 Questions?",
        3,
    );
    assert_eq!(scripts.len(), 3);
    assert_eq!(scripts[0].slide_number, 1);
    assert_eq!(scripts[0].script, "Welcome everyone.");
    assert_eq!(scripts[1].script, "Our agenda.");
    assert_eq!(scripts[2].slide_number, 3);
    assert_eq!(scripts[2].script, "Questions?");
}

#[test]
fn test_split_on_japanese_markers() {
    let scripts = ScriptSplitter::split("スライド1：こんにちは\nスライド 2 さようなら", 2);
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0].script, "こんにちは");
    assert_eq!(scripts[1].script, "さようなら");
}

#[test]
fn test_preamble_becomes_its_own_slide() {
    let scripts = ScriptSplitter::split("Intro text\nSlide 1: Body", 1);
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0].script, "Intro text");
    assert_eq!(scripts[1].slide_number, 2);
    assert_eq!(scripts[1].script, "Body");
}

#[test]
fn test_blank_preamble_is_dropped() {
    let scripts = ScriptSplitter::split("\n  \nSlide 1: Body", 1);
    assert_eq!(scripts.len(), 1);
    assert_eq!(scripts[0].script, "Body");
}

#[test]
fn test_paragraph_split_without_markers() {
    let scripts = ScriptSplitter::split("One.\n\nTwo.\n\nThree.", 3);
    let texts: Vec<&str> = scripts.iter().map(|s| s.script.as_str()).collect();
    assert_eq!(texts, vec!["One.", "Two.", "Three."]);
}

#[test]
fn test_paragraphs_grouped_into_slide_count() {
    let scripts = ScriptSplitter::split("A\n\nB\n\nC\n\nD\n\nE", 2);
    assert_eq!(scripts.len(), 2);
    assert_eq!(scripts[0].script, "A\n\nB\n\nC");
    assert_eq!(scripts[1].script, "D\n\nE");
}

#[test]
fn test_empty_manuscript_yields_no_slides() {
    assert!(ScriptSplitter::split("   \n\n  ", 4).is_empty());
}

#[test]
fn test_zero_slide_count_is_treated_as_one() {
    let scripts = ScriptSplitter::split("A\n\nB", 0);
    assert_eq!(scripts.len(), 1);
}

#[test]
fn test_estimate_from_manuscript() {
    assert_eq!(SlideCountEstimator::from_manuscript("Slide 1 a Slide 2 b"), 2);
    assert_eq!(
        SlideCountEstimator::from_manuscript("no markers here"),
        DEFAULT_MANUSCRIPT_SLIDES
    );
}

#[test]
fn test_estimate_from_pdf_size() {
    assert_eq!(SlideCountEstimator::from_pdf_size(0, 50_000), 1);
    assert_eq!(SlideCountEstimator::from_pdf_size(50_000, 50_000), 1);
    assert_eq!(SlideCountEstimator::from_pdf_size(50_001, 50_000), 2);
    assert_eq!(SlideCountEstimator::from_pdf_size(10, 0), 10);
}
