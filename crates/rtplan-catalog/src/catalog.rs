use serde::de::DeserializeOwned;

use rtplan_core::models::{ObjectiveTemplate, Phase, PlanTemplate, Preview, Protocol};

use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::source::TemplateSource;

/// Protocols, plan templates and objective templates of one image server.
///
/// Read-only once built. Statistics that fold protocol phases in work on
/// stamped copies and never touch these collections.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    protocols: Vec<Protocol>,
    plan_templates: Vec<PlanTemplate>,
    objective_templates: Vec<ObjectiveTemplate>,
}

impl Catalog {
    pub fn new(
        protocols: Vec<Protocol>,
        plan_templates: Vec<PlanTemplate>,
        objective_templates: Vec<ObjectiveTemplate>,
    ) -> Self {
        Self {
            protocols,
            plan_templates,
            objective_templates,
        }
    }

    /// Load every template directory named by `config`.
    ///
    /// Documents that cannot be read or parsed are logged and skipped. A
    /// directory that cannot be listed fails the load.
    pub fn load(config: &CatalogConfig, source: &dyn TemplateSource) -> Result<Self, CatalogError> {
        let catalog = Self {
            protocols: load_dir(source, &config.protocol_dir)?,
            plan_templates: load_dir(source, &config.plan_dir)?,
            objective_templates: load_dir(source, &config.objective_dir)?,
        };
        tracing::info!(
            image_server = %config.image_server,
            protocols = catalog.protocols.len(),
            plan_templates = catalog.plan_templates.len(),
            objective_templates = catalog.objective_templates.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    pub fn plan_templates(&self) -> &[PlanTemplate] {
        &self.plan_templates
    }

    pub fn objective_templates(&self) -> &[ObjectiveTemplate] {
        &self.objective_templates
    }

    /// The canonical list of one template kind.
    pub fn templates<T: CatalogTemplate>(&self) -> &[T] {
        T::in_catalog(self)
    }

    /// One stamped copy of `T` per protocol phase that embeds one.
    ///
    /// With `approved_only`, only approved protocols contribute. Phases
    /// without an embedded `T` are skipped with a warning.
    pub fn phase_templates<T: CatalogTemplate>(&self, approved_only: bool) -> Vec<T> {
        let mut templates = Vec::new();
        for protocol in &self.protocols {
            if approved_only && !protocol.preview.is_approved() {
                continue;
            }
            for phase in &protocol.phases {
                match T::from_phase(phase) {
                    Some(template) => templates.push(template.stamped(&protocol.preview)),
                    None => tracing::warn!(
                        protocol = %protocol.preview.id,
                        phase = %phase.id,
                        kind = T::KIND,
                        "phase has no embedded template"
                    ),
                }
            }
        }
        templates
    }
}

fn load_dir<T: DeserializeOwned>(
    source: &dyn TemplateSource,
    dir: &str,
) -> Result<Vec<T>, CatalogError> {
    let mut loaded = Vec::new();
    for file in source.documents(dir)? {
        let parsed = file
            .contents
            .and_then(|contents| serde_json::from_str::<T>(&contents).map_err(CatalogError::from));
        match parsed {
            Ok(template) => loaded.push(template),
            Err(err) => {
                tracing::error!(file = %file.name, error = %err, "cannot read template document; skipped");
            }
        }
    }
    Ok(loaded)
}

/// A template kind the catalog keeps a canonical list of.
pub trait CatalogTemplate: Clone {
    /// Used in log lines.
    const KIND: &'static str;

    fn preview(&self) -> &Preview;

    fn preview_mut(&mut self) -> &mut Preview;

    fn in_catalog(catalog: &Catalog) -> &[Self];

    fn from_phase(phase: &Phase) -> Option<&Self>;

    /// A copy of this template carrying its own copy of `preview`.
    fn stamped(&self, preview: &Preview) -> Self {
        let mut copy = self.clone();
        *copy.preview_mut() = preview.clone();
        copy
    }
}

impl CatalogTemplate for PlanTemplate {
    const KIND: &'static str = "plan template";

    fn preview(&self) -> &Preview {
        &self.preview
    }

    fn preview_mut(&mut self) -> &mut Preview {
        &mut self.preview
    }

    fn in_catalog(catalog: &Catalog) -> &[Self] {
        &catalog.plan_templates
    }

    fn from_phase(phase: &Phase) -> Option<&Self> {
        phase.plan_template.as_ref()
    }
}

impl CatalogTemplate for ObjectiveTemplate {
    const KIND: &'static str = "objective template";

    fn preview(&self) -> &Preview {
        &self.preview
    }

    fn preview_mut(&mut self) -> &mut Preview {
        &mut self.preview
    }

    fn in_catalog(catalog: &Catalog) -> &[Self] {
        &catalog.objective_templates
    }

    fn from_phase(phase: &Phase) -> Option<&Self> {
        phase.objective_template.as_ref()
    }
}
