use serde::{Deserialize, Serialize};

/// A named behavior profile.
///
/// Non-empty instructions become the leading system message of every
/// request dispatched under this mode; the default conversational mode
/// carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorMode {
    pub name: String,
    #[serde(default)]
    pub instructions: String,
}

impl BehaviorMode {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
        }
    }

    /// Plain conversation, no system message.
    pub fn passthrough() -> Self {
        Self::new("Default", "")
    }

    pub fn has_instructions(&self) -> bool {
        !self.instructions.trim().is_empty()
    }
}

impl Default for BehaviorMode {
    fn default() -> Self {
        Self::passthrough()
    }
}

/// Modifier terms appended to an image prompt before dispatch, grouped
/// the way a prompt-builder surface presents them. The term lists
/// themselves are opaque configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModifierSet {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub lighting: Vec<String>,
    #[serde(default)]
    pub camera_angles: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub textures: Vec<String>,
}

impl ModifierSet {
    pub fn is_empty(&self) -> bool {
        self.groups().iter().all(|group| group.is_empty())
    }

    /// Expand `prompt` by comma-appending each selected group in order.
    pub fn expand(&self, prompt: &str) -> String {
        let mut expanded = prompt.to_string();

        for group in self.groups() {
            if !group.is_empty() {
                expanded.push_str(", ");
                expanded.push_str(&group.join(", "));
            }
        }

        expanded
    }

    fn groups(&self) -> [&Vec<String>; 6] {
        [
            &self.categories,
            &self.styles,
            &self.lighting,
            &self.camera_angles,
            &self.colors,
            &self.textures,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_has_no_instructions() {
        assert!(!BehaviorMode::passthrough().has_instructions());
        assert!(BehaviorMode::new("Reviewer", "You review code.").has_instructions());
        assert!(!BehaviorMode::new("Blank", "   ").has_instructions());
    }

    #[test]
    fn test_expand_without_selections_is_identity() {
        let modifiers = ModifierSet::default();
        assert!(modifiers.is_empty());
        assert_eq!(modifiers.expand("a red fox"), "a red fox");
    }

    #[test]
    fn test_expand_appends_groups_in_order() {
        let modifiers = ModifierSet {
            styles: vec!["Art Deco".to_string(), "Cubism".to_string()],
            lighting: vec!["Golden Hour".to_string()],
            ..Default::default()
        };

        assert_eq!(
            modifiers.expand("a red fox"),
            "a red fox, Art Deco, Cubism, Golden Hour"
        );
    }
}
