//! Building categories and the layer styling they imply.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::SkylineError;
use crate::map::Filter;

/// Name of the feature property the category filter compares against.
pub const CATEGORY_PROPERTY: &str = "category";

/// Category of a building. `All` is the default and does not filter anything.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// No filtering.
    #[default]
    All,
    /// Houses and apartment blocks.
    Residential,
    /// Shops, offices, malls.
    Commercial,
    /// Schools, colleges and universities.
    Educational,
    /// Hospitals and clinics.
    Healthcare,
    /// Government offices.
    Government,
    /// Temples, churches, mosques.
    Religious,
    /// Parks, stadiums, beaches.
    Recreational,
}

impl Category {
    /// All categories in the order they are presented to the user.
    pub const VALUES: [Category; 8] = [
        Category::All,
        Category::Residential,
        Category::Commercial,
        Category::Educational,
        Category::Healthcare,
        Category::Government,
        Category::Religious,
        Category::Recreational,
    ];

    /// Name of the category, as it appears in the `category` property of the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Residential => "Residential",
            Category::Commercial => "Commercial",
            Category::Educational => "Educational",
            Category::Healthcare => "Healthcare",
            Category::Government => "Government",
            Category::Religious => "Religious",
            Category::Recreational => "Recreational",
        }
    }

    /// Style of the category-aware layers for this category.
    ///
    /// `All` leaves the default color and matches every feature; any other value switches to
    /// the highlight color and only shows features whose `category` property equals the name.
    pub fn layer_style(&self, default_color: Color, highlight_color: Color) -> CategoryStyle {
        match self {
            Category::All => CategoryStyle {
                color: default_color,
                filter: Filter::All,
            },
            other => CategoryStyle {
                color: highlight_color,
                filter: Filter::eq(CATEGORY_PROPERTY, other.as_str()),
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SkylineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::VALUES
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SkylineError::Generic(format!("unknown category: {s}")))
    }
}

/// Paint color and filter applied to the building layers.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStyle {
    /// Fill color.
    pub color: Color,
    /// Feature filter.
    pub filter: Filter,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn all_clears_color_and_filter() {
        let style = Category::All.layer_style(Color::BUILDING, Color::HIGHLIGHT);
        assert_eq!(style.color, Color::BUILDING);
        assert_eq!(style.filter, Filter::All);
    }

    #[test]
    fn other_categories_filter_by_equality() {
        for category in Category::VALUES.into_iter().skip(1) {
            let style = category.layer_style(Color::BUILDING, Color::HIGHLIGHT);
            assert_eq!(style.color, Color::HIGHLIGHT);
            assert_eq!(
                style.filter,
                Filter::Eq {
                    property: CATEGORY_PROPERTY.to_string(),
                    value: json!(category.as_str()),
                }
            );
        }
    }

    #[test]
    fn parse_category() {
        assert_eq!("educational".parse::<Category>().ok(), Some(Category::Educational));
        assert_eq!("All".parse::<Category>().ok(), Some(Category::All));
        assert!("Spaceport".parse::<Category>().is_err());
    }
}
