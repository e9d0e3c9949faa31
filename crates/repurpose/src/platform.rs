//! Platforms an asset is written for, and how each one is presented

use crate::types::AssetBundle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target platform of a generated asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    LinkedIn,
    Twitter,
    YouTube,
    Seo,
}

/// Presentation data for a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayDescriptor {
    /// Card title
    pub title: &'static str,
    /// Badge used when the asset carries no tag of its own
    pub default_badge: &'static str,
    /// Brand colour, `#RRGGBB`
    pub color: &'static str,
    /// Icon identifier
    pub icon: &'static str,
}

/// Unknown platform tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown platform: {0}")]
pub struct PlatformError(pub String);

impl Platform {
    /// All platforms, in display order
    pub const ALL: [Platform; 4] = [
        Platform::LinkedIn,
        Platform::Twitter,
        Platform::Seo,
        Platform::YouTube,
    ];

    /// Presentation descriptor for this platform
    pub fn descriptor(self) -> DisplayDescriptor {
        match self {
            Platform::LinkedIn => DisplayDescriptor {
                title: "LinkedIn",
                default_badge: "Post",
                color: "#0077B5",
                icon: "linkedin",
            },
            Platform::Twitter => DisplayDescriptor {
                title: "X / Twitter",
                default_badge: "Hook",
                color: "#000000",
                icon: "x",
            },
            Platform::YouTube => DisplayDescriptor {
                title: "YouTube",
                default_badge: "Strategy",
                color: "#FF0000",
                icon: "youtube",
            },
            Platform::Seo => DisplayDescriptor {
                title: "SEO Meta",
                default_badge: "Optimization",
                color: "#10B981",
                icon: "search",
            },
        }
    }

    /// Stable lowercase tag
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Twitter => "twitter",
            Platform::YouTube => "youtube",
            Platform::Seo => "seo",
        }
    }
}

impl FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Ok(Platform::LinkedIn),
            "twitter" | "x" => Ok(Platform::Twitter),
            "youtube" => Ok(Platform::YouTube),
            "seo" => Ok(Platform::Seo),
            _ => Err(PlatformError(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().title)
    }
}

/// One displayable unit of a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetCard {
    pub platform: Platform,
    pub title: String,
    pub badge: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl AssetCard {
    fn new(platform: Platform, badge: Option<&str>, content: &str) -> Self {
        let descriptor = platform.descriptor();
        let badge = badge
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(descriptor.default_badge);
        Self {
            platform,
            title: descriptor.title.to_string(),
            badge: badge.to_string(),
            content: content.to_string(),
            secondary: None,
        }
    }

    /// Text placed on the clipboard for this card
    pub fn copy_text(&self) -> String {
        match &self.secondary {
            Some(secondary) => format!("{}\n\n{}", self.content, secondary),
            None => self.content.clone(),
        }
    }
}

impl AssetBundle {
    /// Flatten into cards: LinkedIn posts, hooks, SEO, then YouTube
    pub fn cards(&self) -> Vec<AssetCard> {
        let mut cards = Vec::with_capacity(self.linkedin_posts.len() + self.twitter_hooks.len() + 2);
        for post in &self.linkedin_posts {
            cards.push(AssetCard::new(
                Platform::LinkedIn,
                Some(&post.angle),
                &post.content,
            ));
        }
        for hook in &self.twitter_hooks {
            cards.push(AssetCard::new(
                Platform::Twitter,
                Some(&hook.framing),
                &hook.content,
            ));
        }
        cards.push(AssetCard::new(Platform::Seo, None, &self.meta_description));
        let mut video = AssetCard::new(Platform::YouTube, None, &self.video_script.title);
        video.secondary = Some(self.video_script.description.clone());
        cards.push(video);
        cards
    }
}
