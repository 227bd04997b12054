//! Shared numeric and styling constants for the mind-map engine.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.1;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom change applied per wheel notch or zoom button press.
pub const ZOOM_STEP: f64 = 0.1;

// ── Nodes ───────────────────────────────────────────────────────

/// Minimum node width after a resize, in document units.
pub const MIN_NODE_WIDTH: f64 = 80.0;

/// Minimum node height after a resize, in document units.
pub const MIN_NODE_HEIGHT: f64 = 40.0;

pub const DEFAULT_NODE_WIDTH: f64 = 150.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 60.0;
pub const DEFAULT_NODE_TEXT: &str = "Nueva Idea";
pub const DEFAULT_NODE_COLOR: &str = "#007AFF";
pub const DEFAULT_NODE_TEXT_COLOR: &str = "#FFFFFF";
pub const DEFAULT_NODE_FONT_SIZE: f64 = 14.0;

/// Fixed id of the root node.
pub const ROOT_ID: &str = "root";

pub const ROOT_X: f64 = 400.0;
pub const ROOT_Y: f64 = 300.0;
pub const ROOT_WIDTH: f64 = 200.0;
pub const ROOT_HEIGHT: f64 = 60.0;
pub const ROOT_TEXT: &str = "Idea Principal";
pub const ROOT_COLOR: &str = "#00A651";
pub const ROOT_FONT_SIZE: f64 = 16.0;

/// Swatches offered by the toolbar color picker.
pub const NODE_PALETTE: [&str; 20] = [
    "#00A651", "#007AFF", "#FF3B30", "#FF9500", "#AF52DE", "#32D74B", "#64D2FF", "#FF2D92", "#8E8E93", "#34C759",
    "#FFD60A", "#BF5AF2", "#FF6B35", "#5AC8FA", "#30D158", "#FF453A", "#AC8E68", "#48484A", "#FFFFFF", "#000000",
];

/// Font sizes offered by the toolbar.
pub const FONT_SIZES: [f64; 6] = [12.0, 14.0, 16.0, 18.0, 20.0, 24.0];

// ── Connections ─────────────────────────────────────────────────

pub const DEFAULT_CONNECTION_COLOR: &str = "#666";
pub const DEFAULT_CONNECTION_WIDTH: f64 = 2.0;

/// Stroke color used for the selected connection.
pub const SELECTED_CONNECTION_COLOR: &str = "#FF6B35";

/// Dash pattern for `dashed` lines, in document units.
pub const DASHED_PATTERN: [f64; 2] = [5.0, 5.0];

/// Dash pattern for `dotted` lines, in document units.
pub const DOTTED_PATTERN: [f64; 2] = [2.0, 2.0];

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit radius in pixels for the corner resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Radius of the midpoint delete handle on a selected connection, in document units.
pub const DELETE_HANDLE_RADIUS: f64 = 4.0;

/// Screen-space slop in pixels added around a connection's stroke.
pub const CONNECTION_HIT_SLOP_PX: f64 = 4.0;
