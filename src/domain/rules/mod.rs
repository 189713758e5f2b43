// Domain rules - Business logic and policies

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::model::*;

/// Slide count assumed for a manuscript without any slide markers
pub const DEFAULT_MANUSCRIPT_SLIDES: usize = 3;

fn slide_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"(?i)(?:slide|スライド)\s*\d+[:：]?\s*").expect("slide marker pattern is valid")
    })
}

/// Heuristic manuscript splitter used when no script mapper is available
pub struct ScriptSplitter;

impl ScriptSplitter {
    /// Split a manuscript into per-slide scripts.
    ///
    /// Explicit markers (`Slide 2:`, `スライド2`) start a new slide and are
    /// stripped from the text. Text before the first marker becomes its own
    /// slide when it is not blank. Without markers the manuscript is split on
    /// blank lines and the paragraphs are grouped into at most `slide_count`
    /// slides.
    pub fn split(manuscript: &str, slide_count: usize) -> Vec<SlideScript> {
        let markers: Vec<_> = slide_marker().find_iter(manuscript).collect();

        let scripts: Vec<String> = if markers.is_empty() {
            Self::split_paragraphs(manuscript, slide_count.max(1))
        } else {
            let mut scripts = Vec::with_capacity(markers.len() + 1);
            let preamble = manuscript[..markers[0].start()].trim();
            if !preamble.is_empty() {
                scripts.push(preamble.to_string());
            }
            for (i, marker) in markers.iter().enumerate() {
                let end = markers
                    .get(i + 1)
                    .map(|next| next.start())
                    .unwrap_or(manuscript.len());
                scripts.push(manuscript[marker.end()..end].trim().to_string());
            }
            scripts
        };

        scripts
            .into_iter()
            .enumerate()
            .map(|(i, script)| SlideScript {
                slide_number: i + 1,
                script,
            })
            .collect()
    }

    fn split_paragraphs(manuscript: &str, slide_count: usize) -> Vec<String> {
        let paragraphs: Vec<&str> = manuscript
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if paragraphs.is_empty() {
            return Vec::new();
        }

        let per_slide = paragraphs.len().div_ceil(slide_count);
        paragraphs
            .chunks(per_slide)
            .map(|chunk| chunk.join("\n\n"))
            .collect()
    }
}

/// Rules for guessing how many slides a deck has
pub struct SlideCountEstimator;

impl SlideCountEstimator {
    /// Number of explicit slide markers, or the default when there are none
    pub fn from_manuscript(manuscript: &str) -> usize {
        match slide_marker().find_iter(manuscript).count() {
            0 => DEFAULT_MANUSCRIPT_SLIDES,
            n => n,
        }
    }

    /// Rough page count of a PDF that could not be rasterized
    pub fn from_pdf_size(pdf_bytes: u64, bytes_per_page: u64) -> usize {
        let per_page = bytes_per_page.max(1);
        pdf_bytes.div_ceil(per_page).max(1) as usize
    }
}

#[cfg(test)]
mod tests;
