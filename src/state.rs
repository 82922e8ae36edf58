use std::sync::Arc;

use crate::{catalog::SubjectCatalog, db::ReviewStore, models::Variant};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub variant: Variant,
    pub catalog: Arc<SubjectCatalog>,
}

pub type SharedStore = Arc<dyn ReviewStore>;
