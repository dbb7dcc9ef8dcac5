//! Product rating on a five-star scale.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for ratings outside `0.0..=5.0`.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("rating must be between 0 and 5 (got {0})")]
pub struct RatingError(pub f32);

/// A rating between 0.0 and 5.0 stars.
///
/// Stored as tenths of a star so ratings compare and hash exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Rating(u8);

impl Rating {
    /// Highest possible rating.
    pub const MAX: f32 = 5.0;

    /// Create a rating, rounding to one decimal place.
    ///
    /// # Errors
    ///
    /// Returns `RatingError` if `stars` is NaN or outside `0.0..=5.0`.
    pub fn new(stars: f32) -> Result<Self, RatingError> {
        if !(0.0..=Self::MAX).contains(&stars) {
            return Err(RatingError(stars));
        }
        // In range 0..=50 after the check above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let tenths = (stars * 10.0).round() as u8;
        Ok(Self(tenths))
    }

    /// The rating in stars.
    #[must_use]
    pub fn stars(&self) -> f32 {
        f32::from(self.0) / 10.0
    }

    /// Render as filled and empty stars, rounding to the nearest whole star.
    #[must_use]
    pub fn star_string(&self) -> String {
        let filled = usize::from((self.0 + 5) / 10);
        let mut out = "★".repeat(filled);
        out.push_str(&"☆".repeat(5 - filled));
        out
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.stars())
    }
}

impl TryFrom<f32> for Rating {
    type Error = RatingError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f32 {
    fn from(rating: Rating) -> Self {
        rating.stars()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        assert!(Rating::new(-0.1).is_err());
        assert!(Rating::new(5.1).is_err());
        assert!(Rating::new(f32::NAN).is_err());
    }

    #[test]
    fn test_rounds_to_tenths() {
        assert_eq!(Rating::new(4.46).unwrap().to_string(), "4.5");
        assert_eq!(Rating::new(0.0).unwrap().to_string(), "0.0");
    }

    #[test]
    fn test_star_string() {
        assert_eq!(Rating::new(4.6).unwrap().star_string(), "★★★★★");
        assert_eq!(Rating::new(3.4).unwrap().star_string(), "★★★☆☆");
        assert_eq!(Rating::new(0.0).unwrap().star_string(), "☆☆☆☆☆");
    }

    #[test]
    fn test_deserialize_from_number() {
        let rating: Rating = serde_json::from_str("4.8").unwrap();
        assert_eq!(rating, Rating::new(4.8).unwrap());
        assert!(serde_json::from_str::<Rating>("7").is_err());
    }
}
