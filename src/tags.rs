use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque tag identifier assigned by the backend collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagId(pub String);

impl std::fmt::Display for TagId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled category entity with a name and an optional display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Transient edit payload submitted to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagForm {
    pub name: String,
    pub color: Option<String>,
}

/// Find the tag targeted for editing.
///
/// A miss (identifier cleared, or tag deleted concurrently) is a valid
/// non-fatal state; callers leave the form at its current values.
pub fn find_tag<'a>(tags: &'a [Tag], id: &TagId) -> Option<&'a Tag> {
    tags.iter().find(|tag| &tag.id == id)
}

/// Sort tags by case-insensitive name, then id for a stable order
pub fn sort_tags(tags: &mut [Tag]) {
    tags.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.0.cmp(&b.id.0))
    });
}

/// `#rrggbb` shape check. The picker emits this shape and stored records
/// carry it; nothing in the UI lets the user free-type a color.
pub fn is_valid_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str, name: &str, color: Option<&str>) -> Tag {
        Tag {
            id: TagId(id.to_string()),
            name: name.to_string(),
            color: color.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_find_tag() {
        let tags = vec![
            tag("t1", "Urgent", Some("#ff0000")),
            tag("t2", "Later", None),
        ];

        let found = find_tag(&tags, &TagId("t2".to_string())).unwrap();
        assert_eq!(found.name, "Later");

        // A miss is a valid state, not an error
        assert!(find_tag(&tags, &TagId("t3".to_string())).is_none());
        assert!(find_tag(&[], &TagId("t1".to_string())).is_none());
    }

    #[test]
    fn test_sort_tags() {
        let mut tags = vec![
            tag("t1", "work", None),
            tag("t2", "Errands", None),
            tag("t3", "chores", None),
        ];
        sort_tags(&mut tags);
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["chores", "Errands", "work"]);
    }

    #[test]
    fn test_is_valid_hex_color() {
        assert!(is_valid_hex_color("#ff0000"));
        assert!(is_valid_hex_color("#00FF7f"));

        assert!(!is_valid_hex_color("ff0000"));
        assert!(!is_valid_hex_color("#ff000"));
        assert!(!is_valid_hex_color("#ff00000"));
        assert!(!is_valid_hex_color("#ggff00"));
        assert!(!is_valid_hex_color(""));
        assert!(!is_valid_hex_color("#"));
    }
}
