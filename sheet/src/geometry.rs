//! Geometry tuple parsing.
//!
//! Sprite-sheet plists encode points, sizes and rectangles as bracketed
//! integer strings such as `{100,100}` or `{{303,101},{100,100}}`. The
//! brackets only group values; consumers always read a fixed number of
//! integers at known positions, so parsing drops them entirely.

use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A token between commas is not a base-10 integer.
    #[error("invalid integer '{token}' in geometry '{input}'")]
    InvalidInteger {
        input: String,
        token: String,
        #[source]
        source: ParseIntError,
    },
    /// The nested form needs an even number of values to pair them up.
    #[error("geometry '{input}' has {count} values, cannot group into pairs")]
    Unpaired { input: String, count: usize },
}

/// Parse every integer embedded in a geometry string, ignoring nesting.
///
/// `"{{303,101},{100,100}}"` yields `[303, 101, 100, 100]`.
pub fn parse_tuple(s: &str) -> Result<Vec<i64>, GeometryError> {
    let stripped: String = s.chars().filter(|c| *c != '{' && *c != '}').collect();
    stripped
        .split(',')
        .map(|token| {
            token
                .trim()
                .parse::<i64>()
                .map_err(|source| GeometryError::InvalidInteger {
                    input: s.to_string(),
                    token: token.to_string(),
                    source,
                })
        })
        .collect()
}

/// A parsed geometry string, either flat or grouped into pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryTuple {
    /// Exactly two values, e.g. a size `{w,h}` or a point `{x,y}`.
    Flat(Vec<i64>),
    /// Several bracketed pairs, e.g. a rectangle `{{x,y},{w,h}}`.
    Pairs(Vec<[i64; 2]>),
}

impl GeometryTuple {
    /// All values in source order, regardless of grouping.
    pub fn values(&self) -> Vec<i64> {
        match self {
            Self::Flat(values) => values.clone(),
            Self::Pairs(pairs) => pairs.iter().flatten().copied().collect(),
        }
    }
}

impl FromStr for GeometryTuple {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = parse_tuple(s)?;
        if values.len() == 2 {
            return Ok(Self::Flat(values));
        }
        if values.len() % 2 != 0 {
            return Err(GeometryError::Unpaired {
                input: s.to_string(),
                count: values.len(),
            });
        }
        Ok(Self::Pairs(
            values.chunks_exact(2).map(|p| [p[0], p[1]]).collect(),
        ))
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i64,
    pub height: i64,
}

/// An axis-aligned rectangle given by its origin and extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    /// Right edge, or `None` if it does not fit in an `i64`.
    pub fn x1(&self) -> Option<i64> {
        self.x.checked_add(self.width)
    }

    /// Bottom edge, or `None` if it does not fit in an `i64`.
    pub fn y1(&self) -> Option<i64> {
        self.y.checked_add(self.height)
    }

    /// True when the rectangle covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_rect() {
        assert_eq!(
            parse_tuple("{{303,101},{100,100}}").unwrap(),
            vec![303, 101, 100, 100]
        );
    }

    #[test]
    fn test_parse_flat_size() {
        assert_eq!(parse_tuple("{100,100}").unwrap(), vec![100, 100]);
    }

    #[test]
    fn test_parse_signed_and_padded() {
        assert_eq!(parse_tuple("{-2, +3}").unwrap(), vec![-2, 3]);
    }

    #[test]
    fn test_parse_rejects_non_integer() {
        let err = parse_tuple("{{1,2},{3,x}}").unwrap_err();
        match err {
            GeometryError::InvalidInteger { token, .. } => assert_eq!(token, "x"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(parse_tuple("{}").is_err());
        assert!(parse_tuple("{1.5,2}").is_err());
    }

    #[test]
    fn test_tuple_groups_pairs() {
        let tuple: GeometryTuple = "{{0,0},{100,100},{7,8}}".parse().unwrap();
        assert_eq!(
            tuple,
            GeometryTuple::Pairs(vec![[0, 0], [100, 100], [7, 8]])
        );
        assert_eq!(tuple.values(), vec![0, 0, 100, 100, 7, 8]);
    }

    #[test]
    fn test_tuple_two_values_stay_flat() {
        let tuple: GeometryTuple = "{12,34}".parse().unwrap();
        assert_eq!(tuple, GeometryTuple::Flat(vec![12, 34]));
    }

    #[test]
    fn test_tuple_odd_count_is_unpaired() {
        let err = "{10,20,30}".parse::<GeometryTuple>().unwrap_err();
        assert_eq!(
            err,
            GeometryError::Unpaired {
                input: "{10,20,30}".to_string(),
                count: 3
            }
        );
    }

    #[test]
    fn test_rect_extent() {
        let rect = Rect { x: 303, y: 101, width: 100, height: 50 };
        assert_eq!(rect.x1(), Some(403));
        assert_eq!(rect.y1(), Some(151));
        assert!(!rect.is_degenerate());
        assert!(Rect { width: 0, ..rect }.is_degenerate());
    }

    #[test]
    fn test_rect_edge_past_i64_is_none() {
        let rect = Rect { x: i64::MAX, y: 0, width: 1, height: 1 };
        assert_eq!(rect.x1(), None);
        assert_eq!(rect.y1(), Some(1));
    }
}
