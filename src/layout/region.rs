//! Header, footer and title classification.

use regex::RegexSet;

use super::options::RegionThresholds;
use crate::model::{Fragment, RegionKind};

/// Text typical of running heads and page furniture.
const FURNITURE_PATTERNS: &[&str] = &[
    // Page numbers
    r"^\d+$",
    r"^Page\s+\d+",
    r"^[-–—]\s*\d+\s*[-–—]$",
    // Dates
    r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}$",
    r"^\d{4}-\d{2}-\d{2}$",
    // Copyright and distribution markers
    r"^©\s*\d{4}",
    r"^Copyright\s+\d{4}",
    r"^(Confidential|Internal|Draft)",
    // Chapter and section prefixes
    r"^(Chapter|Section|Part)\s+\d+",
    // Short all-caps titles and organization names
    r"^[A-Z][A-Z\s&]{1,50}$",
    // File paths
    r"^[A-Z]:\\",
    r"^/[a-zA-Z/]+$",
];

/// Labels fragments as header, footer, title or body.
#[derive(Debug, Clone)]
pub struct RegionClassifier {
    thresholds: RegionThresholds,
    detect_headers_footers: bool,
    detect_titles: bool,
    patterns: RegexSet,
}

impl RegionClassifier {
    /// Create a classifier with header/footer and title detection enabled.
    pub fn new(thresholds: RegionThresholds) -> Self {
        Self {
            thresholds,
            detect_headers_footers: true,
            detect_titles: true,
            patterns: RegexSet::new(FURNITURE_PATTERNS).expect("header/footer patterns are valid"),
        }
    }

    /// Enable or disable header/footer detection.
    pub fn with_headers_footers(mut self, detect: bool) -> Self {
        self.detect_headers_footers = detect;
        self
    }

    /// Enable or disable title detection.
    pub fn with_titles(mut self, detect: bool) -> Self {
        self.detect_titles = detect;
        self
    }

    /// Classify one fragment on a page of the given size.
    pub fn classify(&self, fragment: &Fragment, page_width: f32, page_height: f32) -> RegionKind {
        if self.detect_headers_footers {
            if let Some(kind) = self.classify_band(fragment, page_width, page_height) {
                return kind;
            }
        }

        if self.detect_titles && self.is_title(fragment) {
            return RegionKind::Title;
        }

        RegionKind::Body
    }

    /// Classify every fragment in place.
    pub fn classify_all(&self, fragments: &mut [Fragment], page_width: f32, page_height: f32) {
        for fragment in fragments.iter_mut() {
            fragment.region_kind = self.classify(fragment, page_width, page_height);
        }

        log::debug!(
            "Classified {} headers, {} footers, {} titles",
            count_kind(fragments, RegionKind::Header),
            count_kind(fragments, RegionKind::Footer),
            count_kind(fragments, RegionKind::Title)
        );
    }

    /// Check whether text looks like page furniture (page number, date, marker).
    pub fn matches_pattern(&self, text: &str) -> bool {
        self.patterns.is_match(text.trim())
    }

    fn classify_band(
        &self,
        fragment: &Fragment,
        page_width: f32,
        page_height: f32,
    ) -> Option<RegionKind> {
        if !(page_height.is_finite() && page_height > 0.0) {
            return None;
        }
        let bbox = fragment.usable_bbox()?;

        if bbox.height() > page_height * self.thresholds.max_height_ratio {
            return None;
        }
        if page_width > 0.0 && bbox.width() > page_width * self.thresholds.max_width_ratio {
            return None;
        }

        let band = page_height * self.thresholds.band;
        let kind = if bbox.y0 < band && bbox.y1 < band * 2.0 {
            RegionKind::Header
        } else if bbox.y1 > page_height - band && bbox.y0 > page_height - band * 2.0 {
            RegionKind::Footer
        } else {
            return None;
        };

        self.looks_like_furniture(fragment, page_width).then_some(kind)
    }

    fn looks_like_furniture(&self, fragment: &Fragment, page_width: f32) -> bool {
        let text = fragment.text.trim();
        let length = text.chars().count();
        if length >= self.thresholds.min_chars && length <= self.thresholds.max_chars {
            return true;
        }

        if self.patterns.is_match(text) {
            return true;
        }

        if page_width > 0.0 {
            if let Some(center) = fragment.center_x() {
                if (center - page_width / 2.0).abs() < page_width * self.thresholds.center_tolerance
                {
                    return true;
                }
            }
        }

        fragment
            .font_size
            .is_some_and(|size| size < self.thresholds.small_font_size)
    }

    fn is_title(&self, fragment: &Fragment) -> bool {
        fragment
            .font_size
            .is_some_and(|size| size > self.thresholds.title_font_size)
    }
}

impl Default for RegionClassifier {
    fn default() -> Self {
        Self::new(RegionThresholds::default())
    }
}

fn count_kind(fragments: &[Fragment], kind: RegionKind) -> usize {
    fragments.iter().filter(|f| f.region_kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn frag(text: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> Fragment {
        Fragment::new(text, BBox::new(x0, y0, x1, y1))
    }

    #[test]
    fn test_header_and_footer() {
        let classifier = RegionClassifier::default();
        let header = frag("Header", 0.0, 0.0, 100.0, 30.0);
        let footer = frag("Footer", 0.0, 570.0, 100.0, 600.0);
        let body = frag("Body text", 0.0, 300.0, 100.0, 330.0);

        assert_eq!(classifier.classify(&header, 800.0, 600.0), RegionKind::Header);
        assert_eq!(classifier.classify(&footer, 800.0, 600.0), RegionKind::Footer);
        assert_eq!(classifier.classify(&body, 800.0, 600.0), RegionKind::Body);
    }

    #[test]
    fn test_band_requires_fragment_to_stay_near_edge() {
        let classifier = RegionClassifier::default();
        // Starts in the header band but reaches well into the body.
        let tall = frag("Intro", 0.0, 10.0, 100.0, 90.0);
        assert_eq!(classifier.classify(&tall, 800.0, 600.0), RegionKind::Body);
    }

    #[test]
    fn test_wide_fragments_are_body() {
        let classifier = RegionClassifier::default();
        let wide = frag("Full width banner", 0.0, 0.0, 700.0, 20.0);
        assert_eq!(classifier.classify(&wide, 800.0, 600.0), RegionKind::Body);
    }

    #[test]
    fn test_long_text_needs_other_evidence() {
        let classifier = RegionClassifier::default();
        let long_text = "word ".repeat(60);

        let off_center = frag(&long_text, 0.0, 0.0, 200.0, 20.0);
        assert_eq!(classifier.classify(&off_center, 800.0, 600.0), RegionKind::Body);

        let centered = frag(&long_text, 300.0, 0.0, 500.0, 20.0);
        assert_eq!(classifier.classify(&centered, 800.0, 600.0), RegionKind::Header);

        let small = frag(&long_text, 0.0, 0.0, 200.0, 20.0).with_font_size(8.0);
        assert_eq!(classifier.classify(&small, 800.0, 600.0), RegionKind::Header);
    }

    #[test]
    fn test_title_detection() {
        let classifier = RegionClassifier::default();
        let title = frag("Results", 50.0, 200.0, 300.0, 230.0).with_font_size(18.0);
        assert_eq!(classifier.classify(&title, 800.0, 600.0), RegionKind::Title);

        let normal = frag("Results", 50.0, 200.0, 300.0, 230.0).with_font_size(14.0);
        assert_eq!(classifier.classify(&normal, 800.0, 600.0), RegionKind::Body);

        // Running head wins over title size.
        let big_header = frag("Journal", 50.0, 0.0, 300.0, 25.0).with_font_size(18.0);
        assert_eq!(classifier.classify(&big_header, 800.0, 600.0), RegionKind::Header);

        let floating = Fragment::unpositioned("Title").with_font_size(20.0);
        assert_eq!(classifier.classify(&floating, 800.0, 600.0), RegionKind::Title);
    }

    #[test]
    fn test_disabled_detection() {
        let classifier = RegionClassifier::default()
            .with_headers_footers(false)
            .with_titles(false);
        let header = frag("Header", 0.0, 0.0, 100.0, 30.0).with_font_size(20.0);
        assert_eq!(classifier.classify(&header, 800.0, 600.0), RegionKind::Body);
    }

    #[test]
    fn test_unknown_height_skips_bands() {
        let classifier = RegionClassifier::default();
        let header = frag("Header", 0.0, 0.0, 100.0, 30.0);
        assert_eq!(classifier.classify(&header, 800.0, 0.0), RegionKind::Body);
    }

    #[test]
    fn test_patterns() {
        let classifier = RegionClassifier::default();
        assert!(classifier.matches_pattern("12"));
        assert!(classifier.matches_pattern("Page 3 of 10"));
        assert!(classifier.matches_pattern("- 4 -"));
        assert!(classifier.matches_pattern("2024-01-31"));
        assert!(classifier.matches_pattern("© 2023 Example Corp"));
        assert!(classifier.matches_pattern("Confidential"));
        assert!(classifier.matches_pattern("Chapter 2 Methods"));
        assert!(classifier.matches_pattern("ANNUAL REPORT"));
        assert!(!classifier.matches_pattern("The results are shown below"));
    }

    #[test]
    fn test_classify_all() {
        let classifier = RegionClassifier::default();
        let mut fragments = vec![
            frag("Header", 0.0, 0.0, 100.0, 30.0),
            frag("Body", 0.0, 300.0, 100.0, 320.0),
            frag("7", 390.0, 575.0, 410.0, 595.0),
        ];
        classifier.classify_all(&mut fragments, 800.0, 600.0);
        let kinds: Vec<_> = fragments.iter().map(|f| f.region_kind).collect();
        assert_eq!(kinds, vec![RegionKind::Header, RegionKind::Body, RegionKind::Footer]);
    }
}
