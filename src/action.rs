use crate::scene::SceneStore;
use crate::toggle::{LabelToggle, ToggleError};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;

pub const TOGGLE_ACTION_ID: &str = "toggle-labels";

pub type ActionHandler = Arc<dyn Fn() -> BoxFuture<'static, Result<(), ToggleError>> + Send + Sync>;

/// Host-side toolbar: binds an action id to a click handler.
pub trait ActionRegistry {
    fn on_click(&mut self, action_id: &str, handler: ActionHandler);
}

/// Binds [`TOGGLE_ACTION_ID`] to `toggle`. Errors are returned to whoever
/// drives the handler.
pub fn register_toggle_action<S>(registry: &mut dyn ActionRegistry, toggle: Arc<LabelToggle<S>>)
where
    S: SceneStore + 'static,
{
    let handler: ActionHandler = Arc::new(move || {
        let toggle = Arc::clone(&toggle);
        async move {
            let outcome = toggle.toggle().await?;
            log::debug!("{TOGGLE_ACTION_ID}: {outcome:?}");
            Ok::<(), ToggleError>(())
        }
        .boxed()
    });
    registry.on_click(TOGGLE_ACTION_ID, handler);
}
