/// When the responsive column collapse runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResponsiveMode {
    /// Never collapse columns.
    None,
    /// Only on the first host resize after the layout is initialised.
    #[default]
    OnLoad,
    /// On every host resize.
    Always,
}

/// Behavioural switches for a [`super::LayoutTree`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Whether stacks get a header (tab strip) by default.
    pub has_headers: bool,

    /// Whether tabs can be dragged out of their stack.
    pub reorder_enabled: bool,

    /// See [`ResponsiveMode`].
    pub responsive_mode: ResponsiveMode,

    /// Offer the four outer edge bands as drop zones even when the layout isn't empty.
    ///
    /// An empty layout always offers them.
    pub outer_drop_zones: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            has_headers: true,
            reorder_enabled: true,
            responsive_mode: ResponsiveMode::default(),
            outer_drop_zones: false,
        }
    }
}

/// Pixel dimensions used by the sizing engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Dimensions {
    /// Splitter thickness.
    pub border_width: f32,

    /// Minimum width of a row child, also used by the responsive collapse.
    pub min_item_width: f32,

    /// Minimum height of a column child during splitter drags.
    pub min_item_height: f32,

    /// Thickness of a stack header, and the size a docked stack shrinks to.
    pub header_height: f32,

    /// Thickness of the outer edge drop bands.
    pub root_edge_size: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            border_width: 5.0,
            min_item_width: 10.0,
            min_item_height: 10.0,
            header_height: 20.0,
            root_edge_size: 50.0,
        }
    }
}
