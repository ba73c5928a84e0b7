//! Sidebar projections of response metadata.
//!
//! Each answer carries cited sources and retrieval pipeline statistics; the
//! two panel types here turn those into display-ready state. Projection is a
//! pure transformation; the structs only remember the latest view so the
//! controller can drive placeholder transitions.

use chat_backend::{PipelineInfo, Source};

pub const SOURCES_INITIAL_PLACEHOLDER: &str = "Sources will appear after your query";
pub const SOURCES_EMPTY_PLACEHOLDER: &str = "No sources available";

pub const STATS_INITIAL_PLACEHOLDER: &str = "Processing information will appear here";
pub const STATS_PROCESSING_PLACEHOLDER: &str = "Processing your query...";
pub const STATS_ERROR_PLACEHOLDER: &str = "Error occurred";
pub const STATS_NOT_AVAILABLE_PLACEHOLDER: &str = "Processing info will appear here";

/// Label shown next to the detected-entity summary line.
pub const ENTITIES_LABEL: &str = "Entities Detected";

/// One cited source row, numbered from 1 in server citation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub index: usize,
    pub name: String,
    pub category: String,
}

/// Display state of the sources sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcesView {
    Placeholder(&'static str),
    Entries(Vec<SourceEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcesPanel {
    view: SourcesView,
}

impl Default for SourcesPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl SourcesPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: SourcesView::Placeholder(SOURCES_INITIAL_PLACEHOLDER),
        }
    }

    /// Projects `sources` into display rows. Absent and empty both yield the
    /// same empty-state placeholder.
    #[must_use]
    pub fn projection(sources: Option<&[Source]>) -> SourcesView {
        match sources {
            None | Some([]) => SourcesView::Placeholder(SOURCES_EMPTY_PLACEHOLDER),
            Some(sources) => SourcesView::Entries(
                sources
                    .iter()
                    .enumerate()
                    .map(|(position, source)| SourceEntry {
                        index: position + 1,
                        name: source.name.clone(),
                        category: source.category.clone(),
                    })
                    .collect(),
            ),
        }
    }

    pub fn project(&mut self, sources: Option<&[Source]>) {
        self.view = Self::projection(sources);
    }

    /// Restores the initial placeholder shown before any query.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn view(&self) -> &SourcesView {
        &self.view
    }
}

/// One pipeline statistic row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub label: &'static str,
    pub value: u32,
}

/// Projected pipeline statistics: four counters in fixed order, plus the
/// detected-entity summary when any entities were recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsProjection {
    pub stats: [StatLine; 4],
    pub entities: Option<String>,
}

/// Display state of the statistics sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsView {
    Placeholder(&'static str),
    Projected(StatsProjection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    view: StatsView,
}

impl Default for StatsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: StatsView::Placeholder(STATS_INITIAL_PLACEHOLDER),
        }
    }

    /// Projects pipeline statistics into display rows.
    #[must_use]
    pub fn projection(info: Option<&PipelineInfo>) -> StatsView {
        let Some(info) = info else {
            return StatsView::Placeholder(STATS_NOT_AVAILABLE_PLACEHOLDER);
        };

        StatsView::Projected(StatsProjection {
            stats: [
                StatLine {
                    label: "Query Variations",
                    value: info.query_variations,
                },
                StatLine {
                    label: "Retrieved Docs",
                    value: info.retrieved_count,
                },
                StatLine {
                    label: "After Reranking",
                    value: info.reranked_count,
                },
                StatLine {
                    label: "Final Context",
                    value: info.final_context_count,
                },
            ],
            entities: entities_line(info),
        })
    }

    pub fn project(&mut self, info: Option<&PipelineInfo>) {
        self.view = Self::projection(info);
    }

    /// Restores the initial placeholder shown before any query.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn set_processing(&mut self) {
        self.view = StatsView::Placeholder(STATS_PROCESSING_PLACEHOLDER);
    }

    pub fn set_error(&mut self) {
        self.view = StatsView::Placeholder(STATS_ERROR_PLACEHOLDER);
    }

    #[must_use]
    pub fn view(&self) -> &StatsView {
        &self.view
    }
}

/// Builds the entity summary, listing each non-empty category in the fixed
/// order crops, states, metrics. Empty categories are omitted entirely.
fn entities_line(info: &PipelineInfo) -> Option<String> {
    let entities = info.entities.as_ref()?;

    let mut parts = Vec::new();
    if !entities.crops.is_empty() {
        parts.push(format!("{} crops", entities.crops.len()));
    }
    if !entities.states.is_empty() {
        parts.push(format!("{} states", entities.states.len()));
    }
    if !entities.metrics.is_empty() {
        parts.push(format!("{} metrics", entities.metrics.len()));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
