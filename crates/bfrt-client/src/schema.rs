//! Schema cache for loaded P4 programs.
//!
//! On first use per program the client fetches the `bf-rt.json` blob from the
//! runtime and parses it into an indexed, immutable [`SchemaInfo`]. Tables
//! resolve by exact name or by unique suffix. All build-time validation of
//! field and action names happens against this index, before any RPC leaves
//! the process.

use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::error::{BfrtError, Result};

/// Match kind of a key field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Exact,
    Ternary,
    Lpm,
    Range,
}

impl MatchKind {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "Exact" => Ok(MatchKind::Exact),
            "Ternary" => Ok(MatchKind::Ternary),
            "LPM" => Ok(MatchKind::Lpm),
            "Range" => Ok(MatchKind::Range),
            other => Err(BfrtError::invalid_argument(format!(
                "unknown match type {other:?} in schema"
            ))),
        }
    }

    /// True when an unlisted field of this kind may default to wildcard.
    pub fn is_maskable(self) -> bool {
        matches!(self, MatchKind::Ternary | MatchKind::Lpm | MatchKind::Range)
    }
}

/// Wire-level type of a data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeKind {
    /// Big-endian width-trimmed byte string.
    Stream,
    Uint,
    Bool,
    Float,
    /// String-valued enum, e.g. mirror direction.
    Str,
}

/// Table kind, from the schema's `table_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKind {
    MatchDirect,
    MatchIndirect,
    ActionProfile,
    Selector,
    Counter,
    Meter,
    Lpf,
    Wred,
    Register,
    PreMgid,
    PreNode,
    PreEcmp,
    PreLag,
    PrePrune,
    PrePort,
    MirrorCfg,
    PktgenAppCfg,
    PktgenPortCfg,
    PktgenPktBufferCfg,
    PortCfg,
    PortStat,
    Other(String),
}

impl TableKind {
    fn parse(s: &str) -> Self {
        match s {
            "MatchAction_Direct" => TableKind::MatchDirect,
            "MatchAction_Indirect" => TableKind::MatchIndirect,
            "Action" => TableKind::ActionProfile,
            "Selector" => TableKind::Selector,
            "Counter" => TableKind::Counter,
            "Meter" => TableKind::Meter,
            "Lpf" => TableKind::Lpf,
            "Wred" => TableKind::Wred,
            "Register" => TableKind::Register,
            "PreMgid" => TableKind::PreMgid,
            "PreNode" => TableKind::PreNode,
            "PreEcmp" => TableKind::PreEcmp,
            "PreLag" => TableKind::PreLag,
            "PrePrune" => TableKind::PrePrune,
            "PrePort" => TableKind::PrePort,
            "MirrorCfg" => TableKind::MirrorCfg,
            "PktgenAppCfg" => TableKind::PktgenAppCfg,
            "PktgenPortCfg" => TableKind::PktgenPortCfg,
            "PktgenPktBufferCfg" => TableKind::PktgenPktBufferCfg,
            "PortCfg" => TableKind::PortCfg,
            "PortStat" => TableKind::PortStat,
            other => TableKind::Other(other.to_string()),
        }
    }
}

/// One key field of a table.
#[derive(Debug, Clone)]
pub struct KeyFieldInfo {
    pub id: u32,
    pub name: String,
    pub match_kind: MatchKind,
    pub width_bits: u16,
    pub mandatory: bool,
}

/// One data field, either action-scoped or table-common.
#[derive(Debug, Clone)]
pub struct DataFieldInfo {
    pub id: u32,
    pub name: String,
    pub kind: DataTypeKind,
    pub width_bits: u16,
    pub repeated: bool,
    pub mandatory: bool,
    pub read_only: bool,
}

/// One action with its data field catalog.
#[derive(Debug, Clone)]
pub struct ActionInfo {
    pub id: u32,
    pub name: String,
    pub fields: Vec<DataFieldInfo>,
}

impl ActionInfo {
    /// Looks up an action data field by name.
    pub fn field(&self, name: &str) -> Option<&DataFieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The immutable catalog of one table.
///
/// Fixed for the lifetime of a loaded pipeline configuration.
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: String,
    pub id: u32,
    pub kind: TableKind,
    pub size: u32,
    pub key_fields: Vec<KeyFieldInfo>,
    pub actions: Vec<ActionInfo>,
    /// Table-common data fields, including the runtime-provided `$` fields.
    pub common_data: Vec<DataFieldInfo>,
    pub attributes: Vec<String>,
    pub operations: Vec<String>,
    /// Mutating the default entry is rejected when set.
    pub const_default: bool,
}

impl TableInfo {
    /// Looks up a key field by name.
    pub fn key_field(&self, name: &str) -> Result<&KeyFieldInfo> {
        self.key_fields.iter().find(|f| f.name == name).ok_or_else(|| {
            BfrtError::invalid_argument(format!(
                "table {} has no key field {name:?}",
                self.name
            ))
        })
    }

    pub fn key_field_by_id(&self, id: u32) -> Option<&KeyFieldInfo> {
        self.key_fields.iter().find(|f| f.id == id)
    }

    /// Looks up an action by name, accepting a unique suffix.
    pub fn action(&self, name: &str) -> Result<&ActionInfo> {
        if let Some(a) = self.actions.iter().find(|a| a.name == name) {
            return Ok(a);
        }
        let suffix: Vec<&ActionInfo> = self
            .actions
            .iter()
            .filter(|a| a.name.ends_with(name) && a.name[..a.name.len() - name.len()].ends_with('.'))
            .collect();
        match suffix.len() {
            1 => Ok(suffix[0]),
            0 => Err(BfrtError::invalid_argument(format!(
                "table {} has no action {name:?}",
                self.name
            ))),
            _ => Err(BfrtError::invalid_argument(format!(
                "action name {name:?} is ambiguous on table {}",
                self.name
            ))),
        }
    }

    pub fn action_by_id(&self, id: u32) -> Option<&ActionInfo> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Resolves a data field: the action's catalog first, then the
    /// table-common catalog. Reserved `$` fields live in the common catalog
    /// whether or not an action is selected.
    pub fn data_field(&self, name: &str, action: Option<&str>) -> Result<&DataFieldInfo> {
        if let Some(action_name) = action {
            let a = self.action(action_name)?;
            if let Some(f) = a.field(name) {
                return Ok(f);
            }
        }
        self.common_data.iter().find(|f| f.name == name).ok_or_else(|| {
            BfrtError::invalid_argument(format!(
                "table {} has no data field {name:?}{}",
                self.name,
                action.map(|a| format!(" on action {a:?}")).unwrap_or_default()
            ))
        })
    }

    /// Resolves a data field id within an action scope, falling back to the
    /// common catalog. Used when decoding read-back data.
    pub fn data_field_by_id(&self, id: u32, action_id: u32) -> Option<&DataFieldInfo> {
        if action_id != 0 {
            if let Some(a) = self.action_by_id(action_id) {
                if let Some(f) = a.fields.iter().find(|f| f.id == id) {
                    return Some(f);
                }
            }
        }
        self.common_data.iter().find(|f| f.id == id)
    }

    /// True when the key contains at least one ternary or range field, which
    /// makes `$MATCH_PRIORITY` mandatory on key build.
    pub fn requires_priority(&self) -> bool {
        self.key_fields
            .iter()
            .any(|f| matches!(f.match_kind, MatchKind::Ternary | MatchKind::Range))
    }
}

/// The parsed, indexed schema of one loaded program.
#[derive(Debug)]
pub struct SchemaInfo {
    pub p4_name: String,
    tables: Vec<Arc<TableInfo>>,
    by_name: HashMap<String, usize>,
}

impl SchemaInfo {
    /// Parses a `bf-rt.json` blob.
    pub fn parse(p4_name: &str, blob: &[u8]) -> Result<Self> {
        let json: BfrtInfoJson = serde_json::from_slice(blob).map_err(|e| {
            BfrtError::invalid_argument(format!("malformed bf-rt.json for {p4_name}: {e}"))
        })?;

        let mut tables = Vec::with_capacity(json.tables.len());
        let mut by_name = HashMap::new();
        for t in &json.tables {
            let info = Arc::new(t.to_info()?);
            by_name.insert(info.name.clone(), tables.len());
            tables.push(info);
        }
        Ok(Self {
            p4_name: p4_name.to_string(),
            tables,
            by_name,
        })
    }

    /// Resolves a table by exact name or unique suffix.
    pub fn table_get(&self, name: &str) -> Result<Arc<TableInfo>> {
        if let Some(&i) = self.by_name.get(name) {
            return Ok(self.tables[i].clone());
        }
        let matches: Vec<&Arc<TableInfo>> = self
            .tables
            .iter()
            .filter(|t| {
                t.name.ends_with(name) && t.name[..t.name.len() - name.len()].ends_with('.')
            })
            .collect();
        match matches.len() {
            1 => Ok(matches[0].clone()),
            0 => Err(BfrtError::not_found(format!(
                "no table named {name:?} in program {}",
                self.p4_name
            ))),
            _ => Err(BfrtError::not_found(format!(
                "table name {name:?} is ambiguous in program {}: {}",
                self.p4_name,
                matches.iter().map(|t| t.name.as_str()).join(", ")
            ))),
        }
    }

    /// All tables, in schema order.
    pub fn tables(&self) -> impl Iterator<Item = &Arc<TableInfo>> {
        self.tables.iter()
    }

    pub fn table_by_id(&self, id: u32) -> Option<&Arc<TableInfo>> {
        self.tables.iter().find(|t| t.id == id)
    }
}

/// Process-wide schema cache, read-only after each program load.
#[derive(Debug, Default)]
pub struct SchemaCache {
    inner: Mutex<HashMap<String, Arc<SchemaInfo>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached schema of `p4_name`, if loaded.
    pub fn get(&self, p4_name: &str) -> Option<Arc<SchemaInfo>> {
        self.inner.lock().get(p4_name).cloned()
    }

    /// Parses and caches a fetched blob; returns the indexed schema.
    pub fn load(&self, p4_name: &str, blob: &[u8]) -> Result<Arc<SchemaInfo>> {
        let info = Arc::new(SchemaInfo::parse(p4_name, blob)?);
        self.inner.lock().insert(p4_name.to_string(), info.clone());
        Ok(info)
    }

    /// Drops a cached program, e.g. after it is replaced by a warm init.
    pub fn evict(&self, p4_name: &str) {
        self.inner.lock().remove(p4_name);
    }
}

// ---------------------------------------------------------------------------
// bf-rt.json wire model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BfrtInfoJson {
    #[allow(dead_code)]
    schema_version: Option<String>,
    tables: Vec<BfrtTableJson>,
}

#[derive(Debug, Deserialize)]
struct BfrtTableJson {
    name: String,
    id: u32,
    table_type: String,
    #[serde(default)]
    size: u32,
    #[serde(default)]
    has_const_default_action: bool,
    #[serde(default)]
    key: Vec<BfrtKeyFieldJson>,
    #[serde(default)]
    action_specs: Vec<BfrtActionSpecJson>,
    #[serde(default)]
    data: Vec<BfrtDataEntryJson>,
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    supported_operations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BfrtKeyFieldJson {
    id: u32,
    name: String,
    #[serde(default)]
    mandatory: bool,
    match_type: String,
    #[serde(rename = "type")]
    ty: BfrtTypeJson,
}

#[derive(Debug, Deserialize)]
struct BfrtActionSpecJson {
    id: u32,
    name: String,
    #[serde(default)]
    data: Vec<BfrtFieldJson>,
}

/// Table-common data entries wrap the field in a `singleton`.
#[derive(Debug, Deserialize)]
struct BfrtDataEntryJson {
    #[serde(default)]
    mandatory: bool,
    #[serde(default)]
    read_only: bool,
    singleton: BfrtFieldJson,
}

#[derive(Debug, Deserialize)]
struct BfrtFieldJson {
    id: u32,
    name: String,
    #[serde(default)]
    repeated: bool,
    #[serde(default)]
    mandatory: bool,
    #[serde(default)]
    read_only: bool,
    #[serde(rename = "type")]
    ty: BfrtTypeJson,
}

#[derive(Debug, Deserialize)]
struct BfrtTypeJson {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    width: Option<u16>,
}

impl BfrtTypeJson {
    fn kind(&self) -> Result<(DataTypeKind, u16)> {
        match self.ty.as_str() {
            "bytes" => Ok((DataTypeKind::Stream, self.width.unwrap_or(0))),
            "uint64" => Ok((DataTypeKind::Uint, 64)),
            "uint32" => Ok((DataTypeKind::Uint, 32)),
            "uint16" => Ok((DataTypeKind::Uint, 16)),
            "uint8" => Ok((DataTypeKind::Uint, 8)),
            "bool" => Ok((DataTypeKind::Bool, 1)),
            "float" => Ok((DataTypeKind::Float, 64)),
            "string" => Ok((DataTypeKind::Str, 0)),
            other => Err(BfrtError::invalid_argument(format!(
                "unknown field type {other:?} in schema"
            ))),
        }
    }

    fn width_bits(&self) -> u16 {
        match self.ty.as_str() {
            "bytes" => self.width.unwrap_or(0),
            "uint64" | "float" => 64,
            "uint32" => 32,
            "uint16" => 16,
            "uint8" => 8,
            "bool" => 1,
            _ => 0,
        }
    }
}

impl BfrtFieldJson {
    fn to_info(&self) -> Result<DataFieldInfo> {
        let (kind, width) = self.ty.kind()?;
        Ok(DataFieldInfo {
            id: self.id,
            name: self.name.clone(),
            kind,
            width_bits: width,
            repeated: self.repeated,
            mandatory: self.mandatory,
            read_only: self.read_only,
        })
    }
}

impl BfrtTableJson {
    fn to_info(&self) -> Result<TableInfo> {
        let key_fields = self
            .key
            .iter()
            .map(|k| {
                Ok(KeyFieldInfo {
                    id: k.id,
                    name: k.name.clone(),
                    match_kind: MatchKind::parse(&k.match_type)?,
                    width_bits: k.ty.width_bits(),
                    mandatory: k.mandatory,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let actions = self
            .action_specs
            .iter()
            .map(|a| {
                Ok(ActionInfo {
                    id: a.id,
                    name: a.name.clone(),
                    fields: a.data.iter().map(|f| f.to_info()).collect::<Result<Vec<_>>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let common_data = self
            .data
            .iter()
            .map(|d| {
                let mut f = d.singleton.to_info()?;
                f.mandatory |= d.mandatory;
                f.read_only |= d.read_only;
                Ok(f)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TableInfo {
            name: self.name.clone(),
            id: self.id,
            kind: TableKind::parse(&self.table_type),
            size: self.size,
            key_fields,
            actions,
            common_data,
            attributes: self.attributes.clone(),
            operations: self.supported_operations.clone(),
            const_default: self.has_const_default_action,
        })
    }
}
