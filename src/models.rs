use serde::{Deserialize, Serialize};

/// Relevant fields of a post from the Danbooru `/posts/{id}.json` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    #[serde(default)]
    pub tag_string_artist: String,
    #[serde(default)]
    pub tag_string_copyright: String,
    #[serde(default)]
    pub tag_string_character: String,
    #[serde(default)]
    pub tag_string_general: String,
    #[serde(default)]
    pub tag_string_meta: String,
    // Restricted posts come back without any file URLs
    #[serde(default)]
    pub preview_file_url: Option<String>,
}

impl Post {
    /// Raw space-delimited tag string for a category
    pub fn tag_string(&self, category: TagCategory) -> &str {
        match category {
            TagCategory::Artist => &self.tag_string_artist,
            TagCategory::Copyright => &self.tag_string_copyright,
            TagCategory::Character => &self.tag_string_character,
            TagCategory::General => &self.tag_string_general,
            TagCategory::Meta => &self.tag_string_meta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Artist,
    Copyright,
    Character,
    General,
    Meta,
}

impl TagCategory {
    /// Every category, in the order they appear in the combined tag string
    pub const ALL: [TagCategory; 5] = [
        TagCategory::Artist,
        TagCategory::Copyright,
        TagCategory::Character,
        TagCategory::General,
        TagCategory::Meta,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TagCategory::Artist => "Artist",
            TagCategory::Copyright => "Copyright",
            TagCategory::Character => "Character",
            TagCategory::General => "General",
            TagCategory::Meta => "Meta",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            TagCategory::Artist => "artist",
            TagCategory::Copyright => "copyright",
            TagCategory::Character => "character",
            TagCategory::General => "general",
            TagCategory::Meta => "meta",
        }
    }

    /// Position in `ALL`
    pub fn index(self) -> usize {
        match self {
            TagCategory::Artist => 0,
            TagCategory::Copyright => 1,
            TagCategory::Character => 2,
            TagCategory::General => 3,
            TagCategory::Meta => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::str::FromStr for TagCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        TagCategory::ALL
            .into_iter()
            .find(|category| category.key() == s)
            .ok_or_else(|| format!("Unknown tag category: {}", s))
    }
}

/// Tags of a post grouped by category, each joined with ", "
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTags {
    pub artist: String,
    pub copyright: String,
    pub character: String,
    pub general: String,
    pub meta: String,
}

impl CategorizedTags {
    pub fn get(&self, category: TagCategory) -> &str {
        match category {
            TagCategory::Artist => &self.artist,
            TagCategory::Copyright => &self.copyright,
            TagCategory::Character => &self.character,
            TagCategory::General => &self.general,
            TagCategory::Meta => &self.meta,
        }
    }
}

/// Which categories end up in the combined tag string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryVisibility {
    pub artist: bool,
    pub copyright: bool,
    pub character: bool,
    pub general: bool,
    pub meta: bool,
}

impl Default for CategoryVisibility {
    fn default() -> Self {
        Self {
            artist: true,
            copyright: true,
            character: true,
            general: true,
            meta: false,
        }
    }
}

impl CategoryVisibility {
    pub fn is_visible(&self, category: TagCategory) -> bool {
        match category {
            TagCategory::Artist => self.artist,
            TagCategory::Copyright => self.copyright,
            TagCategory::Character => self.character,
            TagCategory::General => self.general,
            TagCategory::Meta => self.meta,
        }
    }

    pub fn set(&mut self, category: TagCategory, visible: bool) {
        let flag = match category {
            TagCategory::Artist => &mut self.artist,
            TagCategory::Copyright => &mut self.copyright,
            TagCategory::Character => &mut self.character,
            TagCategory::General => &mut self.general,
            TagCategory::Meta => &mut self.meta,
        };
        *flag = visible;
    }

    pub fn toggle(&mut self, category: TagCategory) {
        let visible = self.is_visible(category);
        self.set(category, !visible);
    }
}
