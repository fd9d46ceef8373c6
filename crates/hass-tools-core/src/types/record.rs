//! Records returned by the backend: automations, entities and dashboard views

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of configuration object a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Automation,
    Entity,
    DashboardView,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Automation => "automation",
            RecordKind::Entity => "entity",
            RecordKind::DashboardView => "dashboard_view",
        }
    }

    /// Plural noun used in summaries ("Found 3 automations")
    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Automation => "automations",
            RecordKind::Entity => "entities",
            RecordKind::DashboardView => "views",
        }
    }

    /// Output key carrying the record identity
    pub fn id_field(&self) -> &'static str {
        match self {
            RecordKind::Automation | RecordKind::Entity => "entity_id",
            RecordKind::DashboardView => "path",
        }
    }

    /// Output key carrying the display name
    pub fn name_field(&self) -> &'static str {
        match self {
            RecordKind::Automation => "alias",
            RecordKind::Entity => "friendly_name",
            RecordKind::DashboardView => "title",
        }
    }

    /// The parts of a config tree that may reference an entity
    ///
    /// Automations are searched per section (triggers, conditions, actions,
    /// accepting both the current plural and the legacy singular keys);
    /// entity attribute trees are searched whole.
    pub fn reference_sections<'a>(&self, config: &'a Value) -> Vec<&'a Value> {
        let keys: &[&str] = match self {
            RecordKind::Automation => &[
                "triggers",
                "trigger",
                "conditions",
                "condition",
                "actions",
                "action",
            ],
            RecordKind::DashboardView => &["cards", "badges", "sections"],
            RecordKind::Entity => return vec![config],
        };
        keys.iter().filter_map(|key| config.get(*key)).collect()
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generic automation/entity/view record
///
/// List fetches return summaries with `config` unset; the full config tree
/// needs a per-record fetch keyed by [`Record::lookup_key`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_triggered: Option<String>,
    /// Backend key for the per-record fetch, when it differs from `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_last_changed(mut self, at: impl Into<String>) -> Self {
        self.last_changed = Some(at.into());
        self
    }

    pub fn with_last_triggered(mut self, at: impl Into<String>) -> Self {
        self.last_triggered = Some(at.into());
        self
    }

    pub fn with_config_key(mut self, key: impl Into<String>) -> Self {
        self.config_key = Some(key.into());
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    /// Key to pass to the backend when fetching the full config
    pub fn lookup_key(&self) -> &str {
        self.config_key.as_deref().unwrap_or(&self.id)
    }

    /// Same record without its config tree
    pub fn summary(&self) -> Record {
        Record {
            config: None,
            ..self.clone()
        }
    }

    /// Identity and minimal display fields; empty optional fields are omitted
    pub fn compact(&self, kind: RecordKind) -> Map<String, Value> {
        let mut out = Map::new();
        out.insert(kind.id_field().to_string(), Value::String(self.id.clone()));
        insert_non_empty(&mut out, "state", &self.state);
        insert_non_empty(&mut out, kind.name_field(), &self.display_name);
        if let Some(at) = &self.last_triggered {
            insert_non_empty(&mut out, "last_triggered", at);
        }
        if let Some(at) = &self.last_changed {
            insert_non_empty(&mut out, "last_changed", at);
        }
        out
    }

    /// Compact fields plus the config tree, when loaded
    pub fn verbose(&self, kind: RecordKind) -> Map<String, Value> {
        let mut out = self.compact(kind);
        if let Some(key) = &self.config_key {
            insert_non_empty(&mut out, "config_id", key);
        }
        if let Some(config) = &self.config {
            out.insert("config".to_string(), config.clone());
        }
        out
    }
}

fn insert_non_empty(out: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        out.insert(key.to_string(), Value::String(value.to_string()));
    }
}
