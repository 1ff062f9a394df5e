//! Automatic preset choice from the host's scene context.
//!
//! The scene itself is out of reach; it is consulted through
//! [`SceneOracle`] and any failure there simply means "no switch".

use crate::gesture::PresetPicker;
use crate::model::{PresetName, SmartMode};
use crate::store::PresetStore;
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Scene queries are unavailable")]
    Unavailable,
    #[error("Scene query failed: {0}")]
    Query(String),
}

/// Kind of work the current selection suggests. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, StrumDisplay)]
pub enum Discipline {
    Rigging,
    Animation,
    Modeling,
    Effects,
}

impl Discipline {
    /// Preset names tried, in order, when the selection points here.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            Self::Rigging => &["Rigging", "Rig", "Skin", "Skeleton"],
            Self::Animation => &["Animation", "Anim", "Animate"],
            Self::Modeling => &["Modeling", "Modelling", "Model"],
            Self::Effects => &["FX", "Effects", "Sim", "Simulation", "Bifrost", "Dynamics"],
        }
    }

    /// Preset names tried when the host's department label points here.
    pub fn department_candidates(self) -> &'static [&'static str] {
        match self {
            Self::Rigging => &["Rigging", "Rig"],
            Self::Animation => &["Animation", "Anim", "Animate"],
            Self::Modeling => &["Modeling", "Modelling", "Model"],
            Self::Effects => &["FX", "Effects", "Sim", "Simulation", "Dynamics"],
        }
    }

    pub fn from_department_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("rig") {
            Some(Self::Rigging)
        } else if label.contains("anim") {
            Some(Self::Animation)
        } else if label.contains("model") {
            Some(Self::Modeling)
        } else if label.contains("fx") || label.contains("effect") {
            Some(Self::Effects)
        } else {
            None
        }
    }
}

pub trait SceneOracle {
    /// The host's current department ("Modeling", "Rigging", ...), if any.
    fn department_label(&self) -> Result<Option<String>, OracleError>;
    /// Whether the current selection looks like `discipline` work.
    fn selection_suggests(&self, discipline: Discipline) -> Result<bool, OracleError>;
}

/// Stands in when there is no scene to ask.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScene;

impl SceneOracle for NoScene {
    fn department_label(&self) -> Result<Option<String>, OracleError> {
        Err(OracleError::Unavailable)
    }

    fn selection_suggests(&self, _: Discipline) -> Result<bool, OracleError> {
        Err(OracleError::Unavailable)
    }
}

/// Resolves candidate names to an existing preset, ignoring case. Exact
/// matches win over substring matches; earlier candidates win over later.
pub fn preset_lookup<'a>(names: &'a [PresetName], candidates: &[&str]) -> Option<&'a PresetName> {
    let exact = candidates.iter().find_map(|c| {
        names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(c))
    });
    exact.or_else(|| {
        candidates.iter().find_map(|c| {
            let c = c.to_lowercase();
            names
                .iter()
                .find(|name| name.to_lowercase().contains(&c))
        })
    })
}

/// The preset the scene suggests under `mode`, if any.
pub fn smart_preset(
    mode: SmartMode,
    oracle: &dyn SceneOracle,
    names: &[PresetName],
) -> Option<PresetName> {
    let discipline = match mode {
        SmartMode::Department => {
            let label = oracle
                .department_label()
                .inspect_err(|e| log::debug!("Department query inconclusive: {e}"))
                .ok()
                .flatten()?;
            let discipline = Discipline::from_department_label(&label)?;
            return preset_lookup(names, discipline.department_candidates()).cloned();
        }
        SmartMode::Selection => Discipline::iter().find(|d| {
            oracle
                .selection_suggests(*d)
                .inspect_err(|e| log::debug!("{d} query inconclusive: {e}"))
                .unwrap_or(false)
        })?,
    };
    preset_lookup(names, discipline.candidates()).cloned()
}

/// Commits the scene's suggestion as the active preset.
pub struct SmartSwitch<O: SceneOracle> {
    store: PresetStore,
    oracle: O,
}

impl<O: SceneOracle> SmartSwitch<O> {
    pub fn new(store: PresetStore, oracle: O) -> Self {
        Self { store, oracle }
    }
}

impl<O: SceneOracle> PresetPicker for SmartSwitch<O> {
    fn commit_smart_preset(&mut self) -> Option<PresetName> {
        let doc = self
            .store
            .load()
            .inspect_err(|e| log::error!("Smart preset skipped: {e}"))
            .ok()?;
        let name = smart_preset(doc.ui.smart_mode, &self.oracle, &doc.preset_names())?;
        if name == doc.active_preset {
            return Some(name);
        }
        match self.store.set_active_preset(&name) {
            Ok(()) => Some(name),
            Err(e) => {
                log::warn!("Smart preset '{name}' not applied: {e}");
                None
            }
        }
    }
}
