use crate::models::{CategorizedTags, CategoryVisibility, Post, TagCategory};

/// Separator used between tags and between categories in the combined string
pub const TAG_SEPARATOR: &str = ", ";

/// Reformat a space-delimited Danbooru tag string as a comma-delimited one.
/// Empty or whitespace-only input yields an empty string
pub fn format_tags(tag_string: &str) -> String {
    tag_string
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Split a post's tag fields into their categories
pub fn categorize(post: &Post) -> CategorizedTags {
    let field = |category: TagCategory| format_tags(post.tag_string(category));
    CategorizedTags {
        artist: field(TagCategory::Artist),
        copyright: field(TagCategory::Copyright),
        character: field(TagCategory::Character),
        general: field(TagCategory::General),
        meta: field(TagCategory::Meta),
    }
}

/// Build the combined tag string from the visible categories, in fixed order
pub fn combine(tags: &CategorizedTags, visibility: &CategoryVisibility) -> String {
    TagCategory::ALL
        .into_iter()
        .filter(|category| visibility.is_visible(*category))
        .map(|category| tags.get(category))
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}

/// Number of tags in a comma-delimited category string
pub fn count_tags(formatted: &str) -> usize {
    formatted
        .split(',')
        .filter(|tag| !tag.trim().is_empty())
        .count()
}
