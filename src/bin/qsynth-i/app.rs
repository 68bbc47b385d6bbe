use qsynth::circuit::Circuit;
use qsynth::manager::Manager;
use qsynth::tableau::TableauContainer;
use qsynth::zx::{ExtractConfig, ZxGraph};

/// The REPL's mutable state: one manager per IR, plus
/// the extractor settings `extract config` edits in place.
#[derive(Default)]
pub struct App {
    pub qcir: Manager<Circuit>,
    pub zx: Manager<ZxGraph>,
    pub tableau: Manager<TableauContainer>,
    pub extract_config: ExtractConfig,
}
