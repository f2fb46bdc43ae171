use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;

use crate::config::FilterSettings;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::grid::{grid_rows, GridRow};
use crate::data::model::{PenguinDataset, Species};
use crate::data::scatter::{bill_scatter, SpeciesPoints};
use crate::data::summary::{mean_bill_depth, mean_bill_length, MeanSummary};
use crate::reactive::{Graph, GraphError, NodeId};

// ---------------------------------------------------------------------------
// Session: dataset + filter state + cached derived values
// ---------------------------------------------------------------------------

/// The derived values a session exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    View,
    Count,
    MeanBillLength,
    MeanBillDepth,
    Scatter,
    Grid,
}

/// Why a session update was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("mass threshold must be a finite number, got {0}")]
    NonFiniteMass(f64),
}

#[derive(Debug, Clone, Copy)]
struct Nodes {
    dataset: NodeId,
    mass_max: NodeId,
    species: NodeId,
    view: NodeId,
    count: NodeId,
    bill_length: NodeId,
    bill_depth: NodeId,
    scatter: NodeId,
    grid: NodeId,
}

impl Nodes {
    fn declare(graph: &mut Graph) -> Result<Self, GraphError> {
        let dataset = graph.input("dataset");
        let mass_max = graph.input("mass_max");
        let species = graph.input("species");
        let view = graph.derived("filtered_view", &[dataset, mass_max, species])?;
        // The view holds indices only; widgets that read record contents
        // also depend on the dataset itself.
        let records = [dataset, view];
        Ok(Nodes {
            dataset,
            mass_max,
            species,
            view,
            count: graph.derived("count", &[view])?,
            bill_length: graph.derived("mean_bill_length", &records)?,
            bill_depth: graph.derived("mean_bill_depth", &records)?,
            scatter: graph.derived("scatter", &records)?,
            grid: graph.derived("grid", &records)?,
        })
    }

    fn of(&self, output: Output) -> NodeId {
        match output {
            Output::View => self.view,
            Output::Count => self.count,
            Output::MeanBillLength => self.bill_length,
            Output::MeanBillDepth => self.bill_depth,
            Output::Scatter => self.scatter,
            Output::Grid => self.grid,
        }
    }
}

/// One user's dashboard state, independent of rendering.
///
/// Every setter invalidates the matching graph input and refreshes stale
/// nodes before returning, so accessors always see consistent values.
pub struct Session {
    dataset: Arc<PenguinDataset>,
    settings: FilterSettings,
    filter: FilterState,

    graph: Graph,
    nodes: Nodes,

    view: Vec<usize>,
    count: usize,
    bill_length: MeanSummary,
    bill_depth: MeanSummary,
    scatter: Vec<SpeciesPoints>,
    grid: Vec<GridRow>,
}

impl Session {
    /// Start a session with the default filter state from `settings` and
    /// evaluate every derived value once. Fails on inconsistent settings.
    pub fn new(dataset: Arc<PenguinDataset>, settings: FilterSettings) -> anyhow::Result<Self> {
        settings.validate().context("invalid filter settings")?;
        let mut graph = Graph::new();
        let nodes = Nodes::declare(&mut graph)?;
        let filter = settings.initial_state();
        let mut session = Session {
            dataset,
            settings,
            filter,
            graph,
            nodes,
            view: Vec::new(),
            count: 0,
            bill_length: MeanSummary::Empty,
            bill_depth: MeanSummary::Empty,
            scatter: Vec::new(),
            grid: Vec::new(),
        };
        session.refresh()?;
        Ok(session)
    }

    // -- reads --

    pub fn dataset(&self) -> &Arc<PenguinDataset> {
        &self.dataset
    }

    pub fn settings(&self) -> &FilterSettings {
        &self.settings
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Indices of the records passing the current filter.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean_bill_length(&self) -> MeanSummary {
        self.bill_length
    }

    pub fn mean_bill_depth(&self) -> MeanSummary {
        self.bill_depth
    }

    pub fn scatter(&self) -> &[SpeciesPoints] {
        &self.scatter
    }

    pub fn grid_rows(&self) -> &[GridRow] {
        &self.grid
    }

    /// How many times `output` has been recomputed.
    pub fn evaluations(&self, output: Output) -> u64 {
        self.graph.evaluations(self.nodes.of(output)).unwrap_or(0)
    }

    // -- writes --

    /// Move the mass slider. The value is clamped to the slider bounds;
    /// NaN and infinities are refused and leave the filter unchanged.
    pub fn set_mass_max(&mut self, mass: f64) -> Result<(), SessionError> {
        if !mass.is_finite() {
            return Err(SessionError::NonFiniteMass(mass));
        }
        let mass = self.settings.clamp_mass(mass);
        if mass == self.filter.mass_max {
            return Ok(());
        }
        self.filter.mass_max = mass;
        self.graph.set_changed(self.nodes.mass_max)?;
        self.refresh()?;
        Ok(())
    }

    /// Replace the whole species selection.
    pub fn set_species(&mut self, species: BTreeSet<Species>) -> Result<(), SessionError> {
        if species == self.filter.species {
            return Ok(());
        }
        self.filter.species = species;
        self.graph.set_changed(self.nodes.species)?;
        self.refresh()?;
        Ok(())
    }

    pub fn set_species_selected(&mut self, species: Species, selected: bool) -> Result<(), SessionError> {
        let mut next = self.filter.species.clone();
        if selected {
            next.insert(species);
        } else {
            next.remove(&species);
        }
        self.set_species(next)
    }

    pub fn toggle_species(&mut self, species: Species) -> Result<(), SessionError> {
        let selected = self.filter.species.contains(&species);
        self.set_species_selected(species, !selected)
    }

    pub fn select_all_species(&mut self) -> Result<(), SessionError> {
        self.set_species(Species::ALL.into_iter().collect())
    }

    pub fn select_no_species(&mut self) -> Result<(), SessionError> {
        self.set_species(BTreeSet::new())
    }

    /// Swap in a newly loaded dataset, keeping the filter state.
    pub fn replace_dataset(&mut self, dataset: Arc<PenguinDataset>) -> Result<(), SessionError> {
        if Arc::ptr_eq(&dataset, &self.dataset) {
            return Ok(());
        }
        self.dataset = dataset;
        self.graph.set_changed(self.nodes.dataset)?;
        self.refresh()?;
        Ok(())
    }

    /// Recompute stale derived values in dependency order. Returns how many
    /// nodes were evaluated.
    pub fn refresh(&mut self) -> Result<usize, GraphError> {
        let order: Vec<NodeId> = self.graph.derived_nodes().collect();
        let mut evaluated = 0;
        for id in order {
            if self.graph.is_stale(id)? {
                let changed = self.evaluate(id);
                self.graph.commit(id, changed)?;
                evaluated += 1;
            }
        }
        if evaluated > 0 {
            log::debug!(
                "refresh: {evaluated} node(s) recomputed, {} of {} records visible",
                self.count,
                self.dataset.len()
            );
        }
        Ok(evaluated)
    }

    /// Recompute one node's value and report whether it changed.
    fn evaluate(&mut self, id: NodeId) -> bool {
        let n = self.nodes;
        let ds = &self.dataset;
        if id == n.view {
            replace(&mut self.view, filtered_indices(ds, &self.filter))
        } else if id == n.count {
            replace(&mut self.count, self.view.len())
        } else if id == n.bill_length {
            replace(&mut self.bill_length, mean_bill_length(ds, &self.view))
        } else if id == n.bill_depth {
            replace(&mut self.bill_depth, mean_bill_depth(ds, &self.view))
        } else if id == n.scatter {
            replace(&mut self.scatter, bill_scatter(ds, &self.view))
        } else if id == n.grid {
            replace(&mut self.grid, grid_rows(ds, &self.view))
        } else {
            false
        }
    }
}

/// Store `value` in `slot`, returning whether it differed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
