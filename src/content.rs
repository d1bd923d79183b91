use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, QueryParseError};

/// Discipline a piece of work belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "painting")]
    Painting,
    #[serde(rename = "3d")]
    ThreeD,
    #[serde(rename = "game")]
    Game,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Painting, Category::ThreeD, Category::Game];

    pub fn key(self) -> &'static str {
        match self {
            Category::Painting => "painting",
            Category::ThreeD => "3d",
            Category::Game => "game",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Painting => "Oil Paintings",
            Category::ThreeD => "3D & Animation",
            Category::Game => "Games",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Category {
    type Err = QueryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryParseError::Category(s.to_string()))
    }
}

/// Kind of outbound link attached to an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    View,
    Play,
    Page,
    Repo,
}

/// Where a painting hangs on the paintings wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WallPosition {
    Portfolio,
    PrePortfolio,
}

impl WallPosition {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "portfolio" => Some(WallPosition::Portfolio),
            "pre-portfolio" => Some(WallPosition::PrePortfolio),
            _ => None,
        }
    }
}

/// A displayable unit of portfolio work: a painting, a 3D piece, a game.
///
/// Collections are loaded once and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<LinkKind, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_position: Option<WallPosition>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            year: None,
            image_url: image_url.into(),
            preview_url: None,
            description: None,
            tags: Vec::new(),
            links: BTreeMap::new(),
            medium: None,
            size: None,
            wall_position: None,
        }
    }

    pub fn with_category(self, category: Category) -> Self {
        Self {
            category: Some(category),
            ..self
        }
    }

    pub fn with_year(self, year: i32) -> Self {
        Self {
            year: Some(year),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    pub fn with_preview(self, preview_url: impl Into<String>) -> Self {
        Self {
            preview_url: Some(preview_url.into()),
            ..self
        }
    }

    pub fn with_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..self
        }
    }

    pub fn with_link(mut self, kind: LinkKind, url: impl Into<String>) -> Self {
        self.links.insert(kind, url.into());
        self
    }

    /// Lower-cased text the search box matches against.
    pub fn haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.tags.join(" "),
            self.description.as_deref().unwrap_or_default()
        )
        .to_lowercase()
    }
}

pub fn is_calendar_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

/// Check the collection-level invariants: non-empty ids and titles, unique ids, 4-digit years.
pub fn validate_collection(items: &[ContentItem]) -> Result<(), ContentError> {
    let mut seen = HashSet::with_capacity(items.len());

    for (position, item) in items.iter().enumerate() {
        if item.id.is_empty() {
            return Err(ContentError::EmptyId(position));
        }
        if item.title.trim().is_empty() {
            return Err(ContentError::EmptyTitle(item.id.clone()));
        }
        if let Some(year) = item.year {
            if !is_calendar_year(year) {
                return Err(ContentError::InvalidYear {
                    id: item.id.clone(),
                    year,
                });
            }
        }
        if !seen.insert(item.id.as_str()) {
            return Err(ContentError::DuplicateId(item.id.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_keys_round_trip_through_from_str() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>(), Ok(category));
        }
        assert_eq!(
            "sculpture".parse::<Category>(),
            Err(QueryParseError::Category("sculpture".into()))
        );
    }

    #[test]
    fn haystack_joins_title_tags_and_description() {
        let item = ContentItem::new("p3", "Power & Rebellion", "cover.jpg")
            .with_tags(["Unity", "AI"])
            .with_description("Jam game");

        assert_eq!(item.haystack(), "power & rebellion unity ai jam game");
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let items = vec![
            ContentItem::new("a", "One", "1.jpg"),
            ContentItem::new("a", "Two", "2.jpg"),
        ];

        assert_eq!(validate_collection(&items), Err(ContentError::DuplicateId("a".into())));
    }

    #[test]
    fn validate_rejects_short_years_and_empty_titles() {
        let items = vec![ContentItem::new("a", "One", "1.jpg").with_year(99)];
        assert_eq!(
            validate_collection(&items),
            Err(ContentError::InvalidYear {
                id: "a".into(),
                year: 99
            })
        );

        let items = vec![ContentItem::new("b", "  ", "2.jpg")];
        assert_eq!(validate_collection(&items), Err(ContentError::EmptyTitle("b".into())));
    }

    #[test]
    fn serializes_category_keys_and_skips_unset_fields() {
        let item = ContentItem::new("p2", "Clockwork City", "city.jpg")
            .with_category(Category::ThreeD)
            .with_link(LinkKind::View, "#");

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["category"], "3d");
        assert_eq!(json["imageUrl"], "city.jpg");
        assert_eq!(json["links"]["view"], "#");
        assert!(json.get("year").is_none());
    }
}
