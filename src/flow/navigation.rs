//! Navigation hand-off to external views

use crate::domain::{SeedId, TaskCategory};

/// Parameters carried with a route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    /// Re-enter the companion directly at task selection
    pub skip_to_task_select: bool,
}

impl RouteParams {
    pub fn skip_to_task_select() -> Self {
        Self {
            skip_to_task_select: true,
        }
    }

    /// Read and clear the skip flag so it fires once
    pub fn take_skip_flag(&mut self) -> bool {
        std::mem::take(&mut self.skip_to_task_select)
    }
}

/// A named destination plus its parameter bag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Companion { params: RouteParams },
    Garden,
    /// Activity list for a category, growing `seed` when one is given
    Tasks {
        task_type: TaskCategory,
        seed: Option<SeedId>,
    },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Companion { .. } => "Home",
            Route::Garden => "Garden",
            Route::Tasks { .. } => "Task",
        }
    }
}

/// Moves the user between views; implemented by the host
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
