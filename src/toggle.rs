use crate::config::Config;
use crate::ident::{ItemId, LabelNamespace};
use crate::layout::{LabelPlan, LayoutError, plan_labels};
use crate::scene::{Bounds, SceneStore, StoreError};
use futures::lock::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToggleError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Added { rows: usize, cols: usize, count: usize },
    Removed { count: usize },
    /// Planning refused; the scene was left untouched.
    Skipped(LayoutError),
    /// Nothing to add or remove.
    Unchanged,
}

/// Adds or removes the full label set on a scene.
///
/// Whether labels are present is read back from the store on every call,
/// never cached. Calls on one controller run one at a time.
pub struct LabelToggle<S> {
    store: S,
    config: Config,
    namespace: LabelNamespace,
    in_flight: Mutex<()>,
}

impl<S: SceneStore> LabelToggle<S> {
    pub fn new(store: S, config: Config) -> Self {
        let namespace = config.layout.namespace();
        Self {
            store,
            config,
            namespace,
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn namespace(&self) -> &LabelNamespace {
        &self.namespace
    }

    pub async fn toggle(&self) -> Result<ToggleOutcome, ToggleError> {
        let _guard = self.in_flight.lock().await;
        if self.labels_present().await? {
            self.remove_unguarded().await
        } else {
            self.add_unguarded().await
        }
    }

    pub async fn add_labels(&self) -> Result<ToggleOutcome, ToggleError> {
        let _guard = self.in_flight.lock().await;
        self.add_unguarded().await
    }

    pub async fn remove_labels(&self) -> Result<ToggleOutcome, ToggleError> {
        let _guard = self.in_flight.lock().await;
        self.remove_unguarded().await
    }

    pub async fn labels_present(&self) -> Result<bool, StoreError> {
        let items = self.store.get_items().await?;
        Ok(items
            .iter()
            .any(|item| self.namespace.classify(&item.id).is_label()))
    }

    /// Bounding box of everything in the scene, or the configured fallback
    /// when the scene is empty.
    pub async fn scene_bounds(&self) -> Result<Bounds, StoreError> {
        let items = self.store.get_items().await?;
        if items.is_empty() {
            return Ok(self.config.layout.fallback_bounds);
        }
        let ids: Vec<String> = items.into_iter().map(|item| item.id).collect();
        self.store.get_item_bounds(&ids).await
    }

    /// The plan the next add would submit, without touching the scene.
    pub async fn plan_current(&self) -> Result<LabelPlan, ToggleError> {
        let grid = self.store.get_grid().await?;
        if !grid.is_valid() {
            return Err(LayoutError::InvalidGeometry {
                cell_width: grid.cell_width,
                cell_height: grid.cell_height,
            }
            .into());
        }
        let bounds = self.scene_bounds().await?;
        Ok(plan_labels(
            &bounds,
            &grid,
            &self.config.theme,
            &self.config.layout,
        )?)
    }

    async fn add_unguarded(&self) -> Result<ToggleOutcome, ToggleError> {
        let plan = match self.plan_current().await {
            Ok(plan) => plan,
            Err(ToggleError::Layout(err)) => {
                match &err {
                    LayoutError::InvalidGeometry { .. } => log::error!("{err}"),
                    LayoutError::CapacityExceeded { .. } => log::warn!("{err}"),
                }
                return Ok(ToggleOutcome::Skipped(err));
            }
            Err(err) => return Err(err),
        };
        if plan.items.is_empty() {
            log::debug!("scene bounds cover no grid cells, nothing to label");
            return Ok(ToggleOutcome::Unchanged);
        }

        let count = plan.items.len();
        self.store.add_items(plan.items).await?;
        log::info!("added {count} grid labels ({} rows x {} cols)", plan.rows, plan.cols);
        Ok(ToggleOutcome::Added {
            rows: plan.rows,
            cols: plan.cols,
            count,
        })
    }

    async fn remove_unguarded(&self) -> Result<ToggleOutcome, ToggleError> {
        let items = self.store.get_items().await?;
        let labels: Vec<ItemId> = items
            .iter()
            .map(|item| self.namespace.classify(&item.id))
            .filter(ItemId::is_label)
            .collect();
        if labels.is_empty() {
            log::debug!("no grid labels to remove");
            return Ok(ToggleOutcome::Unchanged);
        }

        let reserved = labels.iter().filter(|id| !id.is_owned()).count();
        if reserved > 0 {
            log::debug!("removing {reserved} namespaced items without a cell name");
        }
        let count = labels.len();
        let ids = labels.iter().map(|id| self.namespace.to_raw(id)).collect();
        self.store.delete_items(ids).await?;
        log::info!("removed {count} grid labels");
        Ok(ToggleOutcome::Removed { count })
    }
}
