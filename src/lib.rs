pub mod action;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod coords;
pub mod ident;
pub mod layout;
pub mod render;
pub mod scene;
pub mod theme;
pub mod toggle;

pub use action::{ActionHandler, ActionRegistry, TOGGLE_ACTION_ID, register_toggle_action};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config, parse_config};
pub use coords::{CellCoord, cell_name, parse_cell_name};
pub use ident::{ItemId, LabelNamespace};
pub use layout::{LabelPlan, LayoutError, plan_labels};
pub use render::render_svg;
pub use scene::{
    Bounds, GridGeometry, LabelItem, MemoryScene, SceneDocument, SceneItem, SceneStore,
    StoreError,
};
pub use theme::LabelTheme;
pub use toggle::{LabelToggle, ToggleError, ToggleOutcome};
