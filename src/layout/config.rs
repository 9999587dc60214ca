use super::{Dimensions, ItemType, LayoutError, Settings, Side};

/// An item id in configuration: a single string or a list of strings.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum IdConfig {
    One(String),
    Many(Vec<String>),
}

impl IdConfig {
    pub(crate) fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }

    pub(crate) fn from_slice(ids: &[String]) -> Option<Self> {
        match ids {
            [] => None,
            [id] => Some(Self::One(id.clone())),
            ids => Some(Self::Many(ids.to_vec())),
        }
    }
}

/// Per-stack header configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeaderConfig {
    /// `None` follows [`Settings::has_headers`].
    pub show: Option<bool>,
    pub side: Side,
    pub closable: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            show: None,
            side: Side::Top,
            closable: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One node of the construction grammar.
///
/// `LayoutTree::to_config` produces the same shape, so a live tree can be persisted and rebuilt.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemConfig {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub item_type: ItemType,

    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub content: Vec<ItemConfig>,

    /// Percentage of the parent row's width.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub width: Option<f32>,

    /// Percentage of the parent column's height.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub height: Option<f32>,

    /// Pixel minimum honoured by splitter drags on the parent container.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub min_width: Option<f32>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub min_height: Option<f32>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub id: Option<IdConfig>,

    #[cfg_attr(
        feature = "serde",
        serde(default = "default_true", skip_serializing_if = "is_true")
    )]
    pub is_closable: bool,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_false"))]
    pub is_maximised: bool,

    /// Stacks only.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub active_item_index: Option<usize>,

    /// Stacks only.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub header: Option<HeaderConfig>,

    /// Stacks only: restore in the docked state.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "is_false"))]
    pub docked: bool,

    /// Components only.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub component_type: Option<String>,

    /// Components only.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub title: Option<String>,
}

impl ItemConfig {
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type,
            content: Vec::new(),
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            id: None,
            is_closable: true,
            is_maximised: false,
            active_item_index: None,
            header: None,
            docked: false,
            component_type: None,
            title: None,
        }
    }

    pub fn row(content: Vec<Self>) -> Self {
        Self::new(ItemType::Row).with_content(content)
    }

    pub fn column(content: Vec<Self>) -> Self {
        Self::new(ItemType::Column).with_content(content)
    }

    pub fn stack(content: Vec<Self>) -> Self {
        Self::new(ItemType::Stack).with_content(content)
    }

    pub fn component(component_type: impl Into<String>) -> Self {
        let component_type = component_type.into();
        let mut config = Self::new(ItemType::Component);
        config.title = Some(component_type.clone());
        config.component_type = Some(component_type);
        config
    }

    #[must_use]
    pub fn with_content(mut self, content: Vec<Self>) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: f32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    #[must_use]
    pub fn with_min_height(mut self, min_height: f32) -> Self {
        self.min_height = Some(min_height);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(IdConfig::One(id.into()));
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn closable(mut self, is_closable: bool) -> Self {
        self.is_closable = is_closable;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: HeaderConfig) -> Self {
        self.header = Some(header);
        self
    }

    #[must_use]
    pub fn with_active_item_index(mut self, index: usize) -> Self {
        self.active_item_index = Some(index);
        self
    }

    /// Check the grammar of this subtree without building anything.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let invalid = |reason| {
            Err(LayoutError::InvalidContent {
                item_type: self.item_type,
                reason,
            })
        };
        match self.item_type {
            ItemType::Root => return invalid("root can't appear inside content"),
            ItemType::Component if !self.content.is_empty() => {
                return invalid("components can't have content");
            }
            ItemType::Stack => {
                if self
                    .content
                    .iter()
                    .any(|child| matches!(child.item_type, ItemType::Stack | ItemType::Root))
                {
                    return invalid("stacks can't hold stacks");
                }
                if let Some(index) = self.active_item_index {
                    if index >= self.content.len() && !self.content.is_empty() {
                        return invalid("active_item_index out of range");
                    }
                }
            }
            ItemType::Row | ItemType::Column | ItemType::Component => {}
        }
        if self.docked && self.item_type != ItemType::Stack {
            return invalid("only stacks can be docked");
        }
        self.content.iter().try_for_each(Self::validate)
    }
}

/// A bare component type becomes a component config.
impl From<&str> for ItemConfig {
    fn from(component_type: &str) -> Self {
        Self::component(component_type)
    }
}

impl From<String> for ItemConfig {
    fn from(component_type: String) -> Self {
        Self::component(component_type)
    }
}

/// A whole layout: settings plus at most one top-level item.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    pub settings: Settings,
    pub dimensions: Dimensions,
    pub content: Vec<ItemConfig>,
}

impl LayoutConfig {
    pub fn new(root: ItemConfig) -> Self {
        Self {
            content: vec![root],
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.content.len() > 1 {
            return Err(LayoutError::TooManyRootItems(self.content.len()));
        }
        self.content.iter().try_for_each(ItemConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn more_than_one_root_item_is_rejected() {
        let mut config = LayoutConfig::new(ItemConfig::stack(vec![]));
        config.content.push(ItemConfig::stack(vec![]));
        assert_eq!(config.validate(), Err(LayoutError::TooManyRootItems(2)));
    }

    #[test]
    fn stacks_do_not_nest() {
        let config = LayoutConfig::new(ItemConfig::stack(vec![ItemConfig::stack(vec![])]));
        assert!(matches!(
            config.validate(),
            Err(LayoutError::InvalidContent {
                item_type: ItemType::Stack,
                ..
            })
        ));
    }

    #[test]
    fn components_are_leaves() {
        let config = LayoutConfig::new(ItemConfig::row(vec![
            ItemConfig::component("a").with_content(vec![ItemConfig::component("b")]),
        ]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_type_string() {
        assert_eq!(
            "tabs".parse::<ItemType>(),
            Err(LayoutError::UnknownItemType("tabs".to_owned()))
        );
        assert_eq!("column".parse::<ItemType>(), Ok(ItemType::Column));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn id_accepts_string_or_list() {
        let one: ItemConfig =
            serde_json::from_str(r#"{"type":"component","id":"editor"}"#).unwrap();
        assert_eq!(one.id, Some(IdConfig::One("editor".to_owned())));

        let many: ItemConfig =
            serde_json::from_str(r#"{"type":"component","id":["a","b"]}"#).unwrap();
        assert_eq!(
            many.id,
            Some(IdConfig::Many(vec!["a".to_owned(), "b".to_owned()]))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn unknown_type_in_json_is_an_error() {
        let err = serde_json::from_str::<ItemConfig>(r#"{"type":"window"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown content item type"), "{err}");
    }
}
