//! Per-table operation façade.
//!
//! A [`Table`] handle joins a schema catalog, the owning session, and the
//! codec annotations registered by the test. All schema validation happens
//! here, before a request is serialized; the runtime only ever sees
//! well-formed entities. Write batches serialize into a single request whose
//! atomicity mode decides how sub-errors surface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use bfrt_proto::bfrt::{
    entity, table_attribute, table_mod_inc_flag, update, write_request, Entity, KeyFieldMask,
    TableAttribute, TableEntry, TableFlags, TableModIncFlag, TableOperation, TableUsage, Update,
};

use crate::codec::FieldKind;
use crate::data::{Data, DataTuple};
use crate::error::{BfrtError, Result};
use crate::key::{Key, KeyTuple};
use crate::notify::IdleNotification;
use crate::schema::TableInfo;
use crate::session::SessionCore;
use crate::target::Target;

/// Reserved data field: initial/residual TTL of an entry, in milliseconds.
pub const ENTRY_TTL: &str = "$ENTRY_TTL";
/// Reserved data field: poll-mode hit state, `ENTRY_ACTIVE` or `ENTRY_IDLE`.
pub const ENTRY_HIT_STATE: &str = "$ENTRY_HIT_STATE";

/// Write-batch atomicity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Atomicity {
    /// Attempt every sub-operation; the response carries all sub-errors.
    #[default]
    ContinueOnError,
    /// Undo applied sub-operations on the first failure.
    RollbackOnError,
    /// Reserved; serialized but no test depends on its semantics.
    DataplaneAtomic,
}

impl Atomicity {
    pub(crate) fn to_wire(self) -> write_request::Atomicity {
        match self {
            Atomicity::ContinueOnError => write_request::Atomicity::ContinueOnError,
            Atomicity::RollbackOnError => write_request::Atomicity::RollbackOnError,
            Atomicity::DataplaneAtomic => write_request::Atomicity::DataplaneAtomic,
        }
    }
}

/// Direction of an incremental modify on list-valued data fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModIncMode {
    Add,
    Delete,
}

/// Idle-table aging mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTableMode {
    /// Per-entry hit bit, synced by `UpdateHitState`, clear-on-read.
    Poll,
    /// Periodic sweep generating one notification per expired entry.
    Notify,
}

/// Idle-table attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleTimeAttribute {
    pub enable: bool,
    pub mode: IdleTableMode,
    /// Sweep period in notify mode, in milliseconds.
    pub ttl_query_interval_ms: u32,
}

/// Entry-scope attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryScopeMode {
    /// One entry spans all pipes (symmetric, the default).
    AllPipes,
    /// Entries are programmed per pipe.
    SinglePipe,
    /// User-defined pipe bitmap per scope.
    UserDefined(u32),
}

/// PRE device-wide configuration attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreDeviceConfig {
    pub global_rid: u32,
    pub port_protection_enable: bool,
    pub fast_failover_enable: bool,
    pub max_nodes_before_yield: u32,
}

/// Table-wide operations accepted by `operations_execute`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableOperationKind {
    SyncCounters,
    SyncRegisters,
    /// Force a hit-state sync for poll-mode idle tables.
    UpdateHitState,
}

impl TableOperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableOperationKind::SyncCounters => "SyncCounters",
            TableOperationKind::SyncRegisters => "SyncRegisters",
            TableOperationKind::UpdateHitState => "UpdateHitState",
        }
    }
}

/// Attribute selector for `attribute_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    IdleTime,
    EntryScope,
    DynKeyMask,
    PortStatusChange,
    PortStatPollIntvl,
    PreDeviceConfig,
}

/// A decoded attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    IdleTime(IdleTimeAttribute),
    EntryScope(EntryScopeMode),
    DynKeyMask(Vec<(String, Vec<u8>)>),
    PortStatusChange(bool),
    PortStatPollIntvl(u32),
    PreDeviceConfig(PreDeviceConfig),
}

/// A per-table operations handle bound to one session and program.
pub struct Table {
    core: Arc<SessionCore>,
    p4_name: String,
    info: Arc<TableInfo>,
    key_annotations: HashMap<String, FieldKind>,
    data_annotations: HashMap<(String, Option<String>), FieldKind>,
    deadline: Option<Duration>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("p4_name", &self.p4_name)
            .field("name", &self.info.name)
            .field("id", &self.info.id)
            .finish_non_exhaustive()
    }
}

impl Table {
    pub(crate) fn new(core: Arc<SessionCore>, p4_name: String, info: Arc<TableInfo>) -> Self {
        Self {
            core,
            p4_name,
            info,
            key_annotations: HashMap::new(),
            data_annotations: HashMap::new(),
            deadline: None,
        }
    }

    /// Full schema name of the table.
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// The immutable schema catalog of this table.
    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    /// Overrides the session deadline for operations through this handle.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    // -- annotations --------------------------------------------------------

    /// Registers a semantic kind (`mac`, `ipv4`, `ipv6`, `bytes`) for a key
    /// field. Affects host↔wire conversion of subsequent calls only.
    pub fn key_field_annotation_add(&mut self, field: &str, kind: &str) -> Result<()> {
        self.info.key_field(field)?;
        let kind = FieldKind::parse(kind)
            .ok_or_else(|| BfrtError::invalid_argument(format!("unknown annotation {kind:?}")))?;
        self.key_annotations.insert(field.to_string(), kind);
        Ok(())
    }

    /// Registers a semantic kind for a data field, optionally scoped to one
    /// action.
    pub fn data_field_annotation_add(
        &mut self,
        field: &str,
        action: Option<&str>,
        kind: &str,
    ) -> Result<()> {
        self.info.data_field(field, action)?;
        let kind = FieldKind::parse(kind)
            .ok_or_else(|| BfrtError::invalid_argument(format!("unknown annotation {kind:?}")))?;
        self.data_annotations
            .insert((field.to_string(), action.map(String::from)), kind);
        Ok(())
    }

    // -- builders -----------------------------------------------------------

    /// Builds a key from tagged tuples; see [`crate::key::Key`].
    pub fn make_key(&self, tuples: &[KeyTuple]) -> Result<Key> {
        Key::build(&self.info, &self.key_annotations, tuples)
    }

    /// Builds a data object, validating tuples against `action` when given.
    pub fn make_data(&self, tuples: &[DataTuple], action: Option<&str>) -> Result<Data> {
        Data::build(&self.info, &self.data_annotations, tuples, action, false)
    }

    /// Builds a projection spec for `entry_get`: fields only, no values.
    pub fn make_data_get(&self, tuples: &[DataTuple], action: Option<&str>) -> Result<Data> {
        Data::build(&self.info, &self.data_annotations, tuples, action, true)
    }

    /// Decodes the key carried by an idle-timeout notification.
    pub fn decode_notification_key(&self, notification: &IdleNotification) -> Result<Key> {
        let entry = notification.raw();
        if entry.table_id != self.info.id {
            return Err(BfrtError::invalid_argument(format!(
                "notification is for table id {}, not {}",
                entry.table_id, self.info.name
            )));
        }
        match &entry.value {
            Some(bfrt_proto::bfrt::table_entry::Value::Key(key)) => {
                Key::from_proto(key, &self.info)
            }
            _ => Err(BfrtError::invalid_argument(
                "notification entry carries no key".to_string(),
            )),
        }
    }

    // -- write operations ---------------------------------------------------

    /// Adds entries; one key per data. Duplicate keys fail the sub-operation
    /// with `ALREADY_EXISTS`.
    pub async fn entry_add(&self, target: Target, keys: &[Key], datas: &[Data]) -> Result<()> {
        self.entry_add_with_atomicity(target, keys, datas, Atomicity::default())
            .await
    }

    /// `entry_add` with an explicit batch atomicity mode.
    pub async fn entry_add_with_atomicity(
        &self,
        target: Target,
        keys: &[Key],
        datas: &[Data],
        atomicity: Atomicity,
    ) -> Result<()> {
        let updates = self.entry_updates(update::Type::Insert, keys, datas, None)?;
        self.write(target, updates, atomicity, "entry_add").await
    }

    /// Modifies present entries; an absent key fails with `NOT_FOUND`.
    pub async fn entry_mod(&self, target: Target, keys: &[Key], datas: &[Data]) -> Result<()> {
        let updates = self.entry_updates(update::Type::Modify, keys, datas, None)?;
        self.write(target, updates, Atomicity::default(), "entry_mod")
            .await
    }

    /// Adds or removes members of list-valued data fields without replacing
    /// the rest of the entry (MGID/ECMP membership).
    pub async fn entry_mod_inc(
        &self,
        target: Target,
        keys: &[Key],
        datas: &[Data],
        mode: ModIncMode,
    ) -> Result<()> {
        let flag = TableModIncFlag {
            r#type: match mode {
                ModIncMode::Add => table_mod_inc_flag::Type::ModIncAdd,
                ModIncMode::Delete => table_mod_inc_flag::Type::ModIncDelete,
            } as i32,
        };
        let updates = self.entry_updates(update::Type::ModifyInc, keys, datas, Some(flag))?;
        self.write(target, updates, Atomicity::default(), "entry_mod_inc")
            .await
    }

    /// Deletes entries; `None` deletes every entry in scope.
    pub async fn entry_del(&self, target: Target, keys: Option<&[Key]>) -> Result<()> {
        let updates = match keys {
            Some(keys) => keys
                .iter()
                .map(|key| {
                    update_of(update::Type::Delete, TableEntry {
                        table_id: self.info.id,
                        value: Some(bfrt_proto::bfrt::table_entry::Value::Key(key.to_proto())),
                        ..Default::default()
                    })
                })
                .collect(),
            None => vec![update_of(update::Type::Delete, TableEntry {
                table_id: self.info.id,
                ..Default::default()
            })],
        };
        self.write(target, updates, Atomicity::default(), "entry_del")
            .await
    }

    /// Sets the table's default entry.
    pub async fn default_entry_set(&self, target: Target, data: &Data) -> Result<()> {
        if self.info.const_default {
            return Err(BfrtError::invalid_argument(format!(
                "table {} declares a constant default entry",
                self.info.name
            )));
        }
        let entry = TableEntry {
            table_id: self.info.id,
            data: Some(data.to_proto()),
            is_default_entry: true,
            ..Default::default()
        };
        self.write(
            target,
            vec![update_of(update::Type::Modify, entry)],
            Atomicity::default(),
            "default_entry_set",
        )
        .await
    }

    /// Restores the schema default entry. A no-op when the default is
    /// declared constant.
    pub async fn default_entry_reset(&self, target: Target) -> Result<()> {
        if self.info.const_default {
            return Ok(());
        }
        let entry = TableEntry {
            table_id: self.info.id,
            is_default_entry: true,
            ..Default::default()
        };
        self.write(
            target,
            vec![update_of(update::Type::Delete, entry)],
            Atomicity::default(),
            "default_entry_reset",
        )
        .await
    }

    // -- read operations ----------------------------------------------------

    /// Reads entries. `None` keys is a wildcard scan iterated to completion;
    /// `projection` limits which data fields come back. Scan order is
    /// unspecified; tests sort before comparing.
    pub async fn entry_get(
        &self,
        target: Target,
        keys: Option<&[Key]>,
        from_hw: bool,
        projection: Option<&Data>,
    ) -> Result<Vec<(Key, Data)>> {
        let flags = TableFlags {
            from_hw,
            ..Default::default()
        };
        let data = projection.map(Data::to_proto);
        let entities: Vec<Entity> = match keys {
            Some(keys) => keys
                .iter()
                .map(|key| {
                    entity_of(TableEntry {
                        table_id: self.info.id,
                        data: data.clone(),
                        table_flags: Some(flags),
                        value: Some(bfrt_proto::bfrt::table_entry::Value::Key(key.to_proto())),
                        ..Default::default()
                    })
                })
                .collect(),
            None => vec![entity_of(TableEntry {
                table_id: self.info.id,
                data: data.clone(),
                table_flags: Some(flags),
                ..Default::default()
            })],
        };

        let entities = self
            .core
            .read(&self.p4_name, target, entities, self.deadline)
            .await?;
        let mut out = Vec::with_capacity(entities.len());
        for e in entities {
            let Some(entity::Entity::TableEntry(entry)) = e.entity else {
                continue;
            };
            let key = match &entry.value {
                Some(bfrt_proto::bfrt::table_entry::Value::Key(k)) => {
                    Key::from_proto(k, &self.info)?
                }
                _ => continue,
            };
            let data = match &entry.data {
                Some(d) => Data::from_proto(d, &self.info)?,
                None => Data::from_proto(&Default::default(), &self.info)?,
            };
            out.push((key, data));
        }
        Ok(out)
    }

    /// Reads the default entry.
    pub async fn default_entry_get(&self, target: Target, from_hw: bool) -> Result<Data> {
        let entities = vec![entity_of(TableEntry {
            table_id: self.info.id,
            is_default_entry: true,
            table_flags: Some(TableFlags {
                from_hw,
                ..Default::default()
            }),
            ..Default::default()
        })];
        let entities = self
            .core
            .read(&self.p4_name, target, entities, self.deadline)
            .await?;
        for e in entities {
            if let Some(entity::Entity::TableEntry(entry)) = e.entity {
                if let Some(d) = &entry.data {
                    return Data::from_proto(d, &self.info);
                }
            }
        }
        Err(BfrtError::not_found(format!(
            "table {} returned no default entry",
            self.info.name
        )))
    }

    /// Number of occupied entries within the target scope.
    pub async fn usage_get(&self, target: Target) -> Result<u32> {
        let entities = vec![Entity {
            entity: Some(entity::Entity::TableUsage(TableUsage {
                table_id: self.info.id,
                usage: 0,
            })),
        }];
        let entities = self
            .core
            .read(&self.p4_name, target, entities, self.deadline)
            .await?;
        for e in entities {
            if let Some(entity::Entity::TableUsage(usage)) = e.entity {
                return Ok(usage.usage);
            }
        }
        Err(BfrtError::not_found(format!(
            "table {} returned no usage",
            self.info.name
        )))
    }

    // -- attributes ---------------------------------------------------------

    /// Configures idle-timeout aging. While disabled, TTLs freeze; enabling
    /// again resumes aging from the frozen residuals.
    pub async fn attribute_idle_time_set(
        &self,
        target: Target,
        attribute: IdleTimeAttribute,
    ) -> Result<()> {
        let value = table_attribute::IdleTable {
            enable: attribute.enable,
            mode: match attribute.mode {
                IdleTableMode::Poll => table_attribute::idle_table::Mode::PollMode,
                IdleTableMode::Notify => table_attribute::idle_table::Mode::NotifyMode,
            } as i32,
            ttl_query_interval: attribute.ttl_query_interval_ms,
            max_ttl: 0,
            min_ttl: 0,
        };
        self.attribute_set(target, table_attribute::Attribute::IdleTable(value))
            .await
    }

    /// Sets the entry scope: symmetric, per-pipe, or a user-defined mask.
    pub async fn attribute_entry_scope_set(
        &self,
        target: Target,
        scope: EntryScopeMode,
    ) -> Result<()> {
        let (mode, pipe_mask) = match scope {
            EntryScopeMode::AllPipes => (table_attribute::entry_scope::Mode::AllPipes, 0),
            EntryScopeMode::SinglePipe => (table_attribute::entry_scope::Mode::SinglePipe, 0),
            EntryScopeMode::UserDefined(mask) => {
                (table_attribute::entry_scope::Mode::UserDefined, mask)
            }
        };
        self.attribute_set(
            target,
            table_attribute::Attribute::EntryScope(table_attribute::EntryScope {
                mode: mode as i32,
                pipe_mask,
            }),
        )
        .await
    }

    /// Sets the dynamic key mask of an exact-match table.
    pub async fn attribute_dyn_key_mask_set(
        &self,
        target: Target,
        masks: &[(&str, Vec<u8>)],
    ) -> Result<()> {
        let mut fields = Vec::with_capacity(masks.len());
        for (name, mask) in masks {
            let field = self.info.key_field(name)?;
            fields.push(KeyFieldMask {
                field_id: field.id,
                mask: mask.clone(),
            });
        }
        self.attribute_set(
            target,
            table_attribute::Attribute::DynKeyMask(table_attribute::DynKeyMask { fields }),
        )
        .await
    }

    /// Enables or disables port-status-change notifications.
    pub async fn attribute_port_status_change_set(
        &self,
        target: Target,
        enable: bool,
    ) -> Result<()> {
        self.attribute_set(
            target,
            table_attribute::Attribute::PortStatusNotify(table_attribute::PortStatusChgNotify {
                enable,
            }),
        )
        .await
    }

    /// Sets the port-stat poll interval in milliseconds.
    pub async fn attribute_port_stat_poll_intvl_set(
        &self,
        target: Target,
        intvl_ms: u32,
    ) -> Result<()> {
        self.attribute_set(
            target,
            table_attribute::Attribute::IntvlMs(table_attribute::StatePullIntvl { intvl_ms }),
        )
        .await
    }

    /// Sets the PRE device-wide configuration.
    pub async fn attribute_pre_device_config_set(
        &self,
        target: Target,
        config: PreDeviceConfig,
    ) -> Result<()> {
        self.attribute_set(
            target,
            table_attribute::Attribute::PreDeviceConfig(table_attribute::PreDeviceConfig {
                global_rid: config.global_rid,
                port_protection_enable: config.port_protection_enable,
                fast_failover_enable: config.fast_failover_enable,
                max_nodes_before_yield: config.max_nodes_before_yield,
            }),
        )
        .await
    }

    async fn attribute_set(
        &self,
        target: Target,
        attribute: table_attribute::Attribute,
    ) -> Result<()> {
        let updates = vec![Update {
            r#type: update::Type::Modify as i32,
            entity: Some(Entity {
                entity: Some(entity::Entity::TableAttribute(TableAttribute {
                    table_id: self.info.id,
                    attribute: Some(attribute),
                })),
            }),
        }];
        self.write(target, updates, Atomicity::default(), "attribute_set")
            .await
    }

    /// Reads one attribute back.
    pub async fn attribute_get(&self, target: Target, kind: AttributeKind) -> Result<AttributeValue> {
        let probe = match kind {
            AttributeKind::IdleTime => {
                table_attribute::Attribute::IdleTable(Default::default())
            }
            AttributeKind::EntryScope => {
                table_attribute::Attribute::EntryScope(Default::default())
            }
            AttributeKind::DynKeyMask => {
                table_attribute::Attribute::DynKeyMask(Default::default())
            }
            AttributeKind::PortStatusChange => {
                table_attribute::Attribute::PortStatusNotify(Default::default())
            }
            AttributeKind::PortStatPollIntvl => {
                table_attribute::Attribute::IntvlMs(Default::default())
            }
            AttributeKind::PreDeviceConfig => {
                table_attribute::Attribute::PreDeviceConfig(Default::default())
            }
        };
        let entities = vec![Entity {
            entity: Some(entity::Entity::TableAttribute(TableAttribute {
                table_id: self.info.id,
                attribute: Some(probe),
            })),
        }];
        let entities = self
            .core
            .read(&self.p4_name, target, entities, self.deadline)
            .await?;
        for e in entities {
            let Some(entity::Entity::TableAttribute(attr)) = e.entity else {
                continue;
            };
            if let Some(value) = self.decode_attribute(attr) {
                return Ok(value);
            }
        }
        Err(BfrtError::not_found(format!(
            "table {} returned no {kind:?} attribute",
            self.info.name
        )))
    }

    fn decode_attribute(&self, attr: TableAttribute) -> Option<AttributeValue> {
        Some(match attr.attribute? {
            table_attribute::Attribute::IdleTable(v) => {
                let mode = match table_attribute::idle_table::Mode::try_from(v.mode) {
                    Ok(table_attribute::idle_table::Mode::NotifyMode) => IdleTableMode::Notify,
                    _ => IdleTableMode::Poll,
                };
                AttributeValue::IdleTime(IdleTimeAttribute {
                    enable: v.enable,
                    mode,
                    ttl_query_interval_ms: v.ttl_query_interval,
                })
            }
            table_attribute::Attribute::EntryScope(v) => {
                let mode = match table_attribute::entry_scope::Mode::try_from(v.mode) {
                    Ok(table_attribute::entry_scope::Mode::SinglePipe) => EntryScopeMode::SinglePipe,
                    Ok(table_attribute::entry_scope::Mode::UserDefined) => {
                        EntryScopeMode::UserDefined(v.pipe_mask)
                    }
                    _ => EntryScopeMode::AllPipes,
                };
                AttributeValue::EntryScope(mode)
            }
            table_attribute::Attribute::DynKeyMask(v) => AttributeValue::DynKeyMask(
                v.fields
                    .into_iter()
                    .map(|f| {
                        let name = self
                            .info
                            .key_field_by_id(f.field_id)
                            .map(|k| k.name.clone())
                            .unwrap_or_else(|| format!("<field {}>", f.field_id));
                        (name, f.mask)
                    })
                    .collect(),
            ),
            table_attribute::Attribute::PortStatusNotify(v) => {
                AttributeValue::PortStatusChange(v.enable)
            }
            table_attribute::Attribute::IntvlMs(v) => AttributeValue::PortStatPollIntvl(v.intvl_ms),
            table_attribute::Attribute::PreDeviceConfig(v) => {
                AttributeValue::PreDeviceConfig(PreDeviceConfig {
                    global_rid: v.global_rid,
                    port_protection_enable: v.port_protection_enable,
                    fast_failover_enable: v.fast_failover_enable,
                    max_nodes_before_yield: v.max_nodes_before_yield,
                })
            }
        })
    }

    /// Executes a table-wide operation such as a stat sync.
    pub async fn operations_execute(
        &self,
        target: Target,
        operation: TableOperationKind,
    ) -> Result<()> {
        if !self.info.operations.iter().any(|o| o == operation.as_str()) {
            return Err(BfrtError::invalid_argument(format!(
                "table {} does not support operation {}",
                self.info.name,
                operation.as_str()
            )));
        }
        let entry = TableOperation {
            table_id: self.info.id,
            table_operations_type: operation.as_str().to_string(),
        };
        let updates = vec![Update {
            r#type: update::Type::Insert as i32,
            entity: Some(Entity {
                entity: Some(entity::Entity::TableOperation(entry)),
            }),
        }];
        self.write(target, updates, Atomicity::default(), "operations_execute")
            .await
    }

    // -- internals ----------------------------------------------------------

    fn entry_updates(
        &self,
        kind: update::Type,
        keys: &[Key],
        datas: &[Data],
        mod_inc: Option<TableModIncFlag>,
    ) -> Result<Vec<Update>> {
        if keys.len() != datas.len() {
            return Err(BfrtError::invalid_argument(format!(
                "{} keys but {} data objects",
                keys.len(),
                datas.len()
            )));
        }
        Ok(keys
            .iter()
            .zip(datas.iter())
            .map(|(key, data)| {
                update_of(kind, TableEntry {
                    table_id: self.info.id,
                    data: Some(data.to_proto()),
                    table_mod_inc_flag: mod_inc,
                    value: Some(bfrt_proto::bfrt::table_entry::Value::Key(key.to_proto())),
                    ..Default::default()
                })
            })
            .collect())
    }

    async fn write(
        &self,
        target: Target,
        updates: Vec<Update>,
        atomicity: Atomicity,
        op: &str,
    ) -> Result<()> {
        debug!(
            table = %self.info.name,
            target = %target,
            updates = updates.len(),
            op,
            "write"
        );
        self.core
            .write(&self.p4_name, target, updates, atomicity, self.deadline)
            .await
    }
}

fn update_of(kind: update::Type, entry: TableEntry) -> Update {
    Update {
        r#type: kind as i32,
        entity: Some(entity_of(entry)),
    }
}

fn entity_of(entry: TableEntry) -> Entity {
    Entity {
        entity: Some(entity::Entity::TableEntry(entry)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomicity_wire_mapping() {
        assert_eq!(
            Atomicity::default().to_wire(),
            write_request::Atomicity::ContinueOnError
        );
        assert_eq!(
            Atomicity::RollbackOnError.to_wire(),
            write_request::Atomicity::RollbackOnError
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(TableOperationKind::SyncCounters.as_str(), "SyncCounters");
        assert_eq!(TableOperationKind::UpdateHitState.as_str(), "UpdateHitState");
    }
}
