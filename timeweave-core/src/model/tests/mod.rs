mod facade_tests;

use crate::model::{InMemoryCatalog, SourceEntry, VisualizerModel};
use crate::output::TimelineOutput;
use std::sync::Arc;

fn catalog_of(outputs: Vec<Arc<TimelineOutput>>) -> Arc<InMemoryCatalog> {
    Arc::new(InMemoryCatalog::new(
        outputs.into_iter().map(SourceEntry::new).collect(),
    ))
}

fn model_of(catalog: &Arc<InMemoryCatalog>) -> VisualizerModel {
    VisualizerModel::with_defaults(catalog.clone()).unwrap()
}
