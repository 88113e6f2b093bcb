use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown news category {0:?}")]
pub struct UnknownNewsCategory(String);

/// Editorial bucket for a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsCategory {
    Threats,
    Tips,
    Trends,
}

impl NewsCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NewsCategory::Threats => "threats",
            NewsCategory::Tips => "tips",
            NewsCategory::Trends => "trends",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NewsCategory {
    type Err = UnknownNewsCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "threats" => Ok(NewsCategory::Threats),
            "tips" => Ok(NewsCategory::Tips),
            "trends" => Ok(NewsCategory::Trends),
            other => Err(UnknownNewsCategory(other.to_owned())),
        }
    }
}

/// A feed article. Display data only; nothing is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub category: NewsCategory,
    pub date: String,
    pub read_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_wire_ids() {
        assert_eq!("threats".parse::<NewsCategory>().unwrap(), NewsCategory::Threats);
        assert_eq!(NewsCategory::Tips.to_string(), "tips");
        assert!("gossip".parse::<NewsCategory>().is_err());
    }

    #[test]
    fn article_deserializes_with_defaults() {
        let json = r#"{
            "id": "n1",
            "title": "New Phishing Campaign",
            "summary": "Targets remote workers.",
            "category": "threats",
            "date": "May 24, 2024",
            "readTime": "4 min"
        }"#;
        let article: NewsArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.category, NewsCategory::Threats);
        assert_eq!(article.likes, 0);
        assert!(article.image_url.is_none());
    }
}
