//! Five-star rating display.

use serde::{Deserialize, Serialize};

use crate::catalog::MAX_RATING;

/// Number of stars in the rating row.
pub const STAR_COUNT: usize = 5;

/// Fill state of one star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarGlyph {
    Empty,
    Half,
    Full,
}

impl StarGlyph {
    /// Text glyph used by the static renderer.
    pub fn as_char(&self) -> char {
        match self {
            StarGlyph::Full => '★',
            StarGlyph::Half => '⯨',
            StarGlyph::Empty => '☆',
        }
    }

    /// CSS modifier for the star element.
    pub fn css_class(&self) -> &'static str {
        match self {
            StarGlyph::Full => "star star--full",
            StarGlyph::Half => "star star--half",
            StarGlyph::Empty => "star star--empty",
        }
    }
}

/// Map a rating to its five stars.
///
/// Star `i` is full when `i < floor(rating)`, half when `i == floor(rating)`
/// and the rating has a fractional part, and empty otherwise. Out-of-range
/// ratings are clamped; NaN yields five empty stars.
pub fn star_glyphs(rating: f64) -> [StarGlyph; STAR_COUNT] {
    let rating = if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, MAX_RATING)
    };
    let whole = rating.floor();
    let has_fraction = rating.fract() != 0.0;
    let whole = whole as usize;

    std::array::from_fn(|i| {
        if i < whole {
            StarGlyph::Full
        } else if i == whole && has_fraction {
            StarGlyph::Half
        } else {
            StarGlyph::Empty
        }
    })
}

/// Render the stars as text, e.g. `★★★★⯨`.
pub fn star_text(rating: f64) -> String {
    star_glyphs(rating).iter().map(StarGlyph::as_char).collect()
}

/// Label shown next to the stars.
pub fn review_label(review_count: u32) -> String {
    format!("({} reviews)", review_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use StarGlyph::*;

    fn count(stars: &[StarGlyph], glyph: StarGlyph) -> usize {
        stars.iter().filter(|s| **s == glyph).count()
    }

    #[test]
    fn test_four_and_a_half() {
        assert_eq!(star_glyphs(4.5), [Full, Full, Full, Full, Half]);
    }

    #[test]
    fn test_whole_ratings_have_no_half() {
        assert_eq!(star_glyphs(0.0), [Empty; 5]);
        assert_eq!(star_glyphs(3.0), [Full, Full, Full, Empty, Empty]);
        assert_eq!(star_glyphs(5.0), [Full; 5]);
    }

    #[test]
    fn test_any_fraction_is_a_half_star() {
        assert_eq!(star_glyphs(2.1), [Full, Full, Half, Empty, Empty]);
        assert_eq!(star_glyphs(0.9), [Half, Empty, Empty, Empty, Empty]);
    }

    #[test]
    fn test_counts_across_range() {
        let mut r = 0.0;
        while r <= 5.0 {
            let stars = star_glyphs(r);
            assert_eq!(stars.len(), STAR_COUNT);
            assert_eq!(count(&stars, Full), r.floor() as usize, "rating {}", r);
            assert!(count(&stars, Half) <= 1, "rating {}", r);
            assert_eq!(
                count(&stars, Full) + count(&stars, Half) + count(&stars, Empty),
                STAR_COUNT
            );
            r += 0.25;
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(star_glyphs(-1.0), [Empty; 5]);
        assert_eq!(star_glyphs(7.2), [Full; 5]);
        assert_eq!(star_glyphs(f64::NAN), [Empty; 5]);
    }

    #[test]
    fn test_star_text_and_label() {
        assert_eq!(star_text(4.5), "★★★★⯨");
        assert_eq!(review_label(128), "(128 reviews)");
    }
}
