//! In-memory device state behind the mock runtime.
//!
//! Entries live per `(pipe, canonical key)` within each table; the store
//! applies the same lifecycle rules the device documents: duplicate adds are
//! `ALREADY_EXISTS`, mutations of absent keys are `NOT_FOUND`, ternary masks
//! and LPM prefixes are applied to stored key values on insert, and a
//! rollback batch undoes applied sub-operations on first failure.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use prost::Message;
use tonic::{Code, Status};

use bfrt_client::codec;
use bfrt_client::schema::{SchemaInfo, TableInfo, TableKind};
use bfrt_client::table::{ENTRY_HIT_STATE, ENTRY_TTL};
use bfrt_proto::bfrt::{
    data_field, entity, key_field, table_attribute, table_mod_inc_flag, update, write_request,
    DataField, Entity, Error, ErrorDetails, TableAttribute, TableData, TableEntry, TableKey,
    TableUsage, Update, WriteRequest,
};

/// Poll-mode hit states as read back by tests.
pub(crate) const ENTRY_ACTIVE: &str = "ENTRY_ACTIVE";
pub(crate) const ENTRY_IDLE: &str = "ENTRY_IDLE";

/// Entry address: originating pipe scope plus the canonical key encoding.
pub(crate) type EntryKey = (u32, Vec<u8>);

#[derive(Debug, Clone)]
pub(crate) struct EntryState {
    pub key: TableKey,
    pub data: TableData,
    /// Residual TTL in milliseconds, when the entry was added with one.
    pub ttl_ms: Option<u32>,
    pub hit_active: bool,
    pub hit_synced: bool,
    /// One idle notification per expiry.
    pub notified: bool,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct TableAttrs {
    pub idle: Option<table_attribute::IdleTable>,
    pub entry_scope: Option<table_attribute::EntryScope>,
    pub dyn_key_mask: Option<table_attribute::DynKeyMask>,
    pub port_status_notify: Option<bool>,
    pub intvl_ms: Option<u32>,
    pub pre_device_config: Option<table_attribute::PreDeviceConfig>,
}

pub(crate) struct TableState {
    pub info: Arc<TableInfo>,
    pub entries: BTreeMap<EntryKey, EntryState>,
    pub default_data: Option<TableData>,
    pub attrs: TableAttrs,
}

impl TableState {
    fn new(info: Arc<TableInfo>) -> Self {
        Self {
            info,
            entries: BTreeMap::new(),
            default_data: None,
            attrs: TableAttrs::default(),
        }
    }

    /// Applies ternary masks and LPM prefixes to the key values and sorts
    /// fields by id, the canonical stored form.
    fn normalize_key(&self, key: &TableKey) -> Result<TableKey, Status> {
        let mut key = key.clone();
        for field in &mut key.fields {
            let width = self
                .info
                .key_field_by_id(field.field_id)
                .map(|f| f.width_bits)
                .ok_or_else(|| {
                    Status::invalid_argument(format!(
                        "table {} has no key field id {}",
                        self.info.name, field.field_id
                    ))
                })?;
            match &mut field.match_type {
                Some(key_field::MatchType::Ternary(m)) => {
                    m.value = codec::apply_mask(&m.value, &m.mask);
                }
                Some(key_field::MatchType::Lpm(m)) => {
                    let mask = codec::prefix_mask(m.prefix_len as u16, width)
                        .map_err(|e| Status::invalid_argument(e.to_string()))?;
                    m.value = codec::apply_mask(&m.value, &mask);
                }
                _ => {}
            }
        }
        key.fields.sort_by_key(|f| f.field_id);
        Ok(key)
    }

    fn address(&self, pipe: u32, key: &TableKey) -> Result<(EntryKey, TableKey), Status> {
        let normalized = self.normalize_key(key)?;
        Ok(((pipe, normalized.encode_to_vec()), normalized))
    }

    pub(crate) fn usage(&self, pipe: u32) -> u32 {
        self.entries.keys().filter(|(p, _)| *p == pipe).count() as u32
    }

    fn reserved_field_id(&self, name: &str) -> Option<u32> {
        self.info.common_data.iter().find(|f| f.name == name).map(|f| f.id)
    }

    /// Splits runtime-managed fields (`$ENTRY_TTL`, `$ENTRY_HIT_STATE`) out
    /// of incoming data; they are tracked on the entry, not stored.
    fn split_runtime_fields(
        &self,
        data: &TableData,
    ) -> (TableData, Option<u32>, Option<bool>) {
        let ttl_id = self.reserved_field_id(ENTRY_TTL);
        let hit_id = self.reserved_field_id(ENTRY_HIT_STATE);
        let mut ttl = None;
        let mut hit = None;
        let mut stored = TableData {
            action_id: data.action_id,
            fields: Vec::with_capacity(data.fields.len()),
        };
        for field in &data.fields {
            if Some(field.field_id) == ttl_id {
                if let Some(data_field::Value::Stream(bytes)) = &field.value {
                    ttl = codec::decode_int(bytes).ok().map(|v| v as u32);
                }
                continue;
            }
            if Some(field.field_id) == hit_id {
                if let Some(data_field::Value::StrVal(s)) = &field.value {
                    hit = Some(s == ENTRY_ACTIVE);
                }
                continue;
            }
            stored.fields.push(field.clone());
        }
        (stored, ttl, hit)
    }

    fn insert(&mut self, pipe: u32, key: &TableKey, data: &TableData) -> Result<Applied, Status> {
        let (address, normalized) = self.address(pipe, key)?;
        if self.entries.contains_key(&address) {
            return Err(Status::already_exists(format!(
                "entry already present in {}",
                self.info.name
            )));
        }
        if self.info.size > 0 && self.usage(pipe) >= self.info.size {
            return Err(Status::invalid_argument(format!(
                "table {} is full",
                self.info.name
            )));
        }
        let (stored, ttl, hit) = self.split_runtime_fields(data);
        self.entries.insert(
            address.clone(),
            EntryState {
                key: normalized,
                data: stored,
                ttl_ms: ttl,
                hit_active: hit.unwrap_or(false),
                hit_synced: false,
                notified: false,
            },
        );
        Ok(Applied::Inserted {
            table: self.info.id,
            address,
        })
    }

    /// Index-addressed resource tables have every index present on the
    /// device; a modify of an untouched index materializes it.
    fn is_fixed_resource(&self) -> bool {
        matches!(
            self.info.kind,
            TableKind::Counter
                | TableKind::Meter
                | TableKind::Lpf
                | TableKind::Wred
                | TableKind::Register
                | TableKind::PrePrune
                | TableKind::PrePort
                | TableKind::PktgenAppCfg
                | TableKind::PktgenPortCfg
                | TableKind::PktgenPktBufferCfg
                | TableKind::PortCfg
        )
    }

    fn modify(&mut self, pipe: u32, key: &TableKey, data: &TableData) -> Result<Applied, Status> {
        let (address, normalized) = self.address(pipe, key)?;
        if !self.entries.contains_key(&address) && self.is_fixed_resource() {
            let (stored, ttl, hit) = self.split_runtime_fields(data);
            self.entries.insert(
                address.clone(),
                EntryState {
                    key: normalized,
                    data: stored,
                    ttl_ms: ttl,
                    hit_active: hit.unwrap_or(false),
                    hit_synced: false,
                    notified: false,
                },
            );
            return Ok(Applied::Inserted {
                table: self.info.id,
                address,
            });
        }
        let (incoming, ttl, hit) = self.split_runtime_fields(data);
        let entry = self.entries.get_mut(&address).ok_or_else(|| {
            Status::not_found(format!("no such entry in {}", self.info.name))
        })?;
        let prev = entry.clone();
        if incoming.action_id != 0 {
            entry.data.action_id = incoming.action_id;
        }
        for field in incoming.fields {
            match entry.data.fields.iter_mut().find(|f| f.field_id == field.field_id) {
                Some(existing) => *existing = field,
                None => entry.data.fields.push(field),
            }
        }
        if let Some(ttl) = ttl {
            entry.ttl_ms = Some(ttl);
            entry.notified = false;
        }
        if let Some(hit) = hit {
            entry.hit_active = hit;
        }
        Ok(Applied::Replaced {
            table: self.info.id,
            address,
            prev,
        })
    }

    fn modify_inc(
        &mut self,
        pipe: u32,
        key: &TableKey,
        data: &TableData,
        add: bool,
    ) -> Result<Applied, Status> {
        let (address, _) = self.address(pipe, key)?;
        let entry = self.entries.get_mut(&address).ok_or_else(|| {
            Status::not_found(format!("no such entry in {}", self.info.name))
        })?;
        let prev = entry.clone();

        // The first incoming integer array keys the removal positions; the
        // remaining parallel arrays follow the same indices.
        let mut removal: Option<Vec<usize>> = None;
        for field in &data.fields {
            let stored = match entry
                .data
                .fields
                .iter_mut()
                .find(|f| f.field_id == field.field_id)
            {
                Some(f) => f,
                None => {
                    entry.data.fields.push(DataField {
                        field_id: field.field_id,
                        value: empty_like(field),
                    });
                    entry.data.fields.last_mut().unwrap()
                }
            };
            if add {
                append_array(stored, field)?;
            } else {
                remove_array(stored, field, &mut removal)?;
            }
        }
        Ok(Applied::Replaced {
            table: self.info.id,
            address,
            prev,
        })
    }

    fn delete(&mut self, pipe: u32, key: &TableKey) -> Result<Applied, Status> {
        let (address, _) = self.address(pipe, key)?;
        let prev = self.entries.remove(&address).ok_or_else(|| {
            Status::not_found(format!("no such entry in {}", self.info.name))
        })?;
        Ok(Applied::Removed {
            table: self.info.id,
            address,
            prev,
        })
    }

    fn clear(&mut self, pipe: u32) -> Applied {
        let removed: Vec<(EntryKey, EntryState)> = self
            .entries
            .iter()
            .filter(|((p, _), _)| *p == pipe)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (k, _) in &removed {
            self.entries.remove(k);
        }
        Applied::Cleared {
            table: self.info.id,
            removed,
        }
    }

    /// Read-back form of an entry: stored data plus injected runtime fields,
    /// optionally filtered by a projection.
    fn render(&self, entry: &EntryState, projection: Option<&TableData>) -> TableData {
        let mut data = entry.data.clone();
        if let (Some(id), Some(ttl)) = (self.reserved_field_id(ENTRY_TTL), entry.ttl_ms)
        {
            data.fields.push(DataField {
                field_id: id,
                value: Some(data_field::Value::Stream(
                    codec::encode_int(u64::from(ttl), 32).unwrap_or_default(),
                )),
            });
        }
        if let Some(id) = self.reserved_field_id(ENTRY_HIT_STATE) {
            let state = if entry.hit_synced {
                ENTRY_ACTIVE
            } else {
                ENTRY_IDLE
            };
            data.fields.push(DataField {
                field_id: id,
                value: Some(data_field::Value::StrVal(state.to_string())),
            });
        }
        if let Some(projection) = projection {
            if !projection.fields.is_empty() {
                let wanted: Vec<u32> = projection.fields.iter().map(|f| f.field_id).collect();
                data.fields.retain(|f| wanted.contains(&f.field_id));
            }
        }
        data
    }
}

/// Journal of one applied sub-operation, for rollback.
pub(crate) enum Applied {
    Inserted { table: u32, address: EntryKey },
    Replaced { table: u32, address: EntryKey, prev: EntryState },
    Removed { table: u32, address: EntryKey, prev: EntryState },
    Cleared { table: u32, removed: Vec<(EntryKey, EntryState)> },
    DefaultSet { table: u32, prev: Option<TableData> },
    None,
}

pub(crate) struct ProgramState {
    pub blob: Vec<u8>,
    pub tables: HashMap<u32, TableState>,
}

impl ProgramState {
    pub(crate) fn new(p4_name: &str, blob: Vec<u8>) -> Result<Self, Status> {
        let schema = SchemaInfo::parse(p4_name, &blob)
            .map_err(|e| Status::invalid_argument(e.to_string()))?;
        let tables = schema
            .tables()
            .map(|info| (info.id, TableState::new(info.clone())))
            .collect();
        Ok(Self { blob, tables })
    }

    fn table_mut(&mut self, id: u32) -> Result<&mut TableState, Status> {
        self.tables
            .get_mut(&id)
            .ok_or_else(|| Status::not_found(format!("no table with id {id}")))
    }

    fn table(&self, id: u32) -> Result<&TableState, Status> {
        self.tables
            .get(&id)
            .ok_or_else(|| Status::not_found(format!("no table with id {id}")))
    }

    fn apply_update(&mut self, pipe: u32, item: &Update) -> Result<Applied, Status> {
        let entity = item
            .entity
            .as_ref()
            .and_then(|e| e.entity.as_ref())
            .ok_or_else(|| Status::invalid_argument("update without entity"))?;
        let kind = update::Type::try_from(item.r#type)
            .map_err(|_| Status::invalid_argument("unknown update type"))?;

        match entity {
            entity::Entity::TableEntry(entry) => self.apply_entry(pipe, kind, entry),
            entity::Entity::TableAttribute(attr) => {
                self.apply_attribute(attr)?;
                Ok(Applied::None)
            }
            entity::Entity::TableOperation(op) => {
                self.apply_operation(op)?;
                Ok(Applied::None)
            }
            entity::Entity::TableUsage(_) => {
                Err(Status::invalid_argument("usage is read-only"))
            }
        }
    }

    fn apply_entry(
        &mut self,
        pipe: u32,
        kind: update::Type,
        entry: &TableEntry,
    ) -> Result<Applied, Status> {
        let table = self.table_mut(entry.table_id)?;

        if entry.is_default_entry {
            if table.info.const_default {
                return Err(Status::invalid_argument(format!(
                    "table {} has a constant default entry",
                    table.info.name
                )));
            }
            let next = match kind {
                update::Type::Insert | update::Type::Modify => entry.data.clone(),
                update::Type::Delete => None,
                _ => return Err(Status::invalid_argument("bad default entry update")),
            };
            let prev = std::mem::replace(&mut table.default_data, next);
            return Ok(Applied::DefaultSet {
                table: table.info.id,
                prev,
            });
        }

        let key = match &entry.value {
            Some(bfrt_proto::bfrt::table_entry::Value::Key(key)) => Some(key),
            _ => None,
        };
        match (kind, key) {
            (update::Type::Insert, Some(key)) => {
                let data = entry.data.clone().unwrap_or_default();
                table.insert(pipe, key, &data)
            }
            (update::Type::Modify, Some(key)) => {
                let data = entry.data.clone().unwrap_or_default();
                table.modify(pipe, key, &data)
            }
            (update::Type::ModifyInc, Some(key)) => {
                let add = entry
                    .table_mod_inc_flag
                    .map(|f| f.r#type == table_mod_inc_flag::Type::ModIncAdd as i32)
                    .unwrap_or(true);
                let data = entry.data.clone().unwrap_or_default();
                table.modify_inc(pipe, key, &data, add)
            }
            (update::Type::Delete, Some(key)) => table.delete(pipe, key),
            (update::Type::Delete, None) => Ok(table.clear(pipe)),
            _ => Err(Status::invalid_argument("malformed table entry update")),
        }
    }

    fn apply_attribute(&mut self, attr: &TableAttribute) -> Result<(), Status> {
        let table = self.table_mut(attr.table_id)?;
        match attr
            .attribute
            .as_ref()
            .ok_or_else(|| Status::invalid_argument("attribute without value"))?
        {
            table_attribute::Attribute::IdleTable(v) => {
                // Re-enabling resumes aging from the frozen residuals; the
                // sweeper only decrements while enabled.
                table.attrs.idle = Some(*v);
            }
            table_attribute::Attribute::EntryScope(v) => table.attrs.entry_scope = Some(*v),
            table_attribute::Attribute::DynKeyMask(v) => {
                table.attrs.dyn_key_mask = Some(v.clone())
            }
            table_attribute::Attribute::PortStatusNotify(v) => {
                table.attrs.port_status_notify = Some(v.enable)
            }
            table_attribute::Attribute::IntvlMs(v) => table.attrs.intvl_ms = Some(v.intvl_ms),
            table_attribute::Attribute::PreDeviceConfig(v) => {
                table.attrs.pre_device_config = Some(*v)
            }
        }
        Ok(())
    }

    fn apply_operation(&mut self, op: &bfrt_proto::bfrt::TableOperation) -> Result<(), Status> {
        let table = self.table_mut(op.table_id)?;
        match op.table_operations_type.as_str() {
            "UpdateHitState" => {
                // Clear-on-read: the sync publishes the live bit and clears it.
                for entry in table.entries.values_mut() {
                    entry.hit_synced = entry.hit_active;
                    entry.hit_active = false;
                }
                Ok(())
            }
            "SyncCounters" | "SyncRegisters" => Ok(()),
            other => Err(Status::invalid_argument(format!(
                "unsupported operation {other:?}"
            ))),
        }
    }

    fn undo(&mut self, journal: Vec<Applied>) {
        for applied in journal.into_iter().rev() {
            match applied {
                Applied::Inserted { table, address } => {
                    if let Some(t) = self.tables.get_mut(&table) {
                        t.entries.remove(&address);
                    }
                }
                Applied::Replaced { table, address, prev }
                | Applied::Removed { table, address, prev } => {
                    if let Some(t) = self.tables.get_mut(&table) {
                        t.entries.insert(address, prev);
                    }
                }
                Applied::Cleared { table, removed } => {
                    if let Some(t) = self.tables.get_mut(&table) {
                        for (k, v) in removed {
                            t.entries.insert(k, v);
                        }
                    }
                }
                Applied::DefaultSet { table, prev } => {
                    if let Some(t) = self.tables.get_mut(&table) {
                        t.default_data = prev;
                    }
                }
                Applied::None => {}
            }
        }
    }

    pub(crate) fn write(&mut self, request: &WriteRequest) -> Result<(), Status> {
        let pipe = request.target.as_ref().map(|t| t.pipe_id).unwrap_or(0xFFFF);
        let rollback = request.atomicity
            == write_request::Atomicity::RollbackOnError as i32;

        let mut journal = Vec::new();
        let mut sub_errors = Vec::new();
        for (index, item) in request.updates.iter().enumerate() {
            match self.apply_update(pipe, item) {
                Ok(applied) => journal.push(applied),
                Err(status) => {
                    sub_errors.push(Error {
                        canonical_code: status.code() as i32,
                        message: status.message().to_string(),
                        index: index as u32,
                    });
                    if rollback {
                        self.undo(journal);
                        return Err(batch_status(sub_errors));
                    }
                }
            }
        }
        if sub_errors.is_empty() {
            Ok(())
        } else {
            Err(batch_status(sub_errors))
        }
    }

    pub(crate) fn read_entity(&self, pipe: u32, entity: &Entity) -> Result<Vec<Entity>, Status> {
        match entity
            .entity
            .as_ref()
            .ok_or_else(|| Status::invalid_argument("read of empty entity"))?
        {
            entity::Entity::TableEntry(request) => self.read_entries(pipe, request),
            entity::Entity::TableUsage(request) => {
                let table = self.table(request.table_id)?;
                Ok(vec![Entity {
                    entity: Some(entity::Entity::TableUsage(TableUsage {
                        table_id: request.table_id,
                        usage: table.usage(pipe),
                    })),
                }])
            }
            entity::Entity::TableAttribute(request) => {
                let table = self.table(request.table_id)?;
                let attribute = match request.attribute.as_ref() {
                    Some(table_attribute::Attribute::IdleTable(_)) => table
                        .attrs
                        .idle
                        .map(table_attribute::Attribute::IdleTable),
                    Some(table_attribute::Attribute::EntryScope(_)) => Some(
                        table_attribute::Attribute::EntryScope(
                            table.attrs.entry_scope.unwrap_or_default(),
                        ),
                    ),
                    Some(table_attribute::Attribute::DynKeyMask(_)) => table
                        .attrs
                        .dyn_key_mask
                        .clone()
                        .map(table_attribute::Attribute::DynKeyMask),
                    Some(table_attribute::Attribute::PortStatusNotify(_)) => Some(
                        table_attribute::Attribute::PortStatusNotify(
                            table_attribute::PortStatusChgNotify {
                                enable: table.attrs.port_status_notify.unwrap_or(false),
                            },
                        ),
                    ),
                    Some(table_attribute::Attribute::IntvlMs(_)) => Some(
                        table_attribute::Attribute::IntvlMs(table_attribute::StatePullIntvl {
                            intvl_ms: table.attrs.intvl_ms.unwrap_or(0),
                        }),
                    ),
                    Some(table_attribute::Attribute::PreDeviceConfig(_)) => Some(
                        table_attribute::Attribute::PreDeviceConfig(
                            table.attrs.pre_device_config.unwrap_or_default(),
                        ),
                    ),
                    None => None,
                };
                let attribute = attribute.ok_or_else(|| {
                    Status::not_found(format!(
                        "attribute not set on table {}",
                        table.info.name
                    ))
                })?;
                Ok(vec![Entity {
                    entity: Some(entity::Entity::TableAttribute(TableAttribute {
                        table_id: request.table_id,
                        attribute: Some(attribute),
                    })),
                }])
            }
            entity::Entity::TableOperation(_) => {
                Err(Status::invalid_argument("operations are write-only"))
            }
        }
    }

    fn read_entries(&self, pipe: u32, request: &TableEntry) -> Result<Vec<Entity>, Status> {
        let table = self.table(request.table_id)?;
        let projection = request.data.as_ref();

        if request.is_default_entry {
            let data = table
                .default_data
                .clone()
                .unwrap_or_default();
            return Ok(vec![entry_entity(request.table_id, None, data, true)]);
        }

        match &request.value {
            Some(bfrt_proto::bfrt::table_entry::Value::Key(key)) => {
                let (address, _) = table.address(pipe, key)?;
                let entry = table.entries.get(&address).ok_or_else(|| {
                    Status::not_found(format!("no such entry in {}", table.info.name))
                })?;
                Ok(vec![entry_entity(
                    request.table_id,
                    Some(entry.key.clone()),
                    table.render(entry, projection),
                    false,
                )])
            }
            _ => {
                // Wildcard scan over the pipe scope.
                Ok(table
                    .entries
                    .iter()
                    .filter(|((p, _), _)| *p == pipe)
                    .map(|(_, entry)| {
                        entry_entity(
                            request.table_id,
                            Some(entry.key.clone()),
                            table.render(entry, projection),
                            false,
                        )
                    })
                    .collect())
            }
        }
    }
}

fn entry_entity(
    table_id: u32,
    key: Option<TableKey>,
    data: TableData,
    is_default: bool,
) -> Entity {
    Entity {
        entity: Some(entity::Entity::TableEntry(TableEntry {
            table_id,
            data: Some(data),
            is_default_entry: is_default,
            value: key.map(bfrt_proto::bfrt::table_entry::Value::Key),
            ..Default::default()
        })),
    }
}

fn batch_status(errors: Vec<Error>) -> Status {
    let count = errors.len();
    let details = ErrorDetails { errors };
    Status::with_details(
        Code::Unknown,
        format!("write batch failed with {count} sub-errors"),
        details.encode_to_vec().into(),
    )
}

fn empty_like(field: &DataField) -> Option<data_field::Value> {
    match &field.value {
        Some(data_field::Value::IntArrVal(_)) => {
            Some(data_field::Value::IntArrVal(Default::default()))
        }
        Some(data_field::Value::BoolArrVal(_)) => {
            Some(data_field::Value::BoolArrVal(Default::default()))
        }
        Some(data_field::Value::StrArrVal(_)) => {
            Some(data_field::Value::StrArrVal(Default::default()))
        }
        other => other.clone(),
    }
}

fn append_array(stored: &mut DataField, incoming: &DataField) -> Result<(), Status> {
    match (&mut stored.value, &incoming.value) {
        (
            Some(data_field::Value::IntArrVal(s)),
            Some(data_field::Value::IntArrVal(i)),
        ) => {
            s.val.extend_from_slice(&i.val);
            Ok(())
        }
        (
            Some(data_field::Value::BoolArrVal(s)),
            Some(data_field::Value::BoolArrVal(i)),
        ) => {
            s.val.extend_from_slice(&i.val);
            Ok(())
        }
        (
            Some(data_field::Value::StrArrVal(s)),
            Some(data_field::Value::StrArrVal(i)),
        ) => {
            s.val.extend_from_slice(&i.val);
            Ok(())
        }
        _ => Err(Status::invalid_argument(
            "incremental modify of a non-array field",
        )),
    }
}

/// Removes incoming values from the stored array. The first integer array
/// establishes the removal indices; parallel arrays drop the same positions.
fn remove_array(
    stored: &mut DataField,
    incoming: &DataField,
    removal: &mut Option<Vec<usize>>,
) -> Result<(), Status> {
    match (&mut stored.value, &incoming.value) {
        (
            Some(data_field::Value::IntArrVal(s)),
            Some(data_field::Value::IntArrVal(i)),
        ) => {
            if removal.is_none() {
                let mut indices: Vec<usize> = Vec::new();
                for v in &i.val {
                    for (idx, x) in s.val.iter().enumerate() {
                        if x == v && !indices.contains(&idx) {
                            indices.push(idx);
                            break;
                        }
                    }
                }
                indices.sort_unstable();
                *removal = Some(indices);
            }
            remove_indices(&mut s.val, removal.as_ref().unwrap());
            Ok(())
        }
        (Some(data_field::Value::BoolArrVal(s)), Some(data_field::Value::BoolArrVal(_))) => {
            if let Some(indices) = removal.as_ref() {
                remove_indices(&mut s.val, indices);
            }
            Ok(())
        }
        (Some(data_field::Value::StrArrVal(s)), Some(data_field::Value::StrArrVal(_))) => {
            if let Some(indices) = removal.as_ref() {
                remove_indices(&mut s.val, indices);
            }
            Ok(())
        }
        _ => Err(Status::invalid_argument(
            "incremental modify of a non-array field",
        )),
    }
}

fn remove_indices<T>(values: &mut Vec<T>, indices: &[usize]) {
    for &i in indices.iter().rev() {
        if i < values.len() {
            values.remove(i);
        }
    }
}

pub(crate) struct DeviceStore {
    pub programs: HashMap<String, ProgramState>,
}

impl DeviceStore {
    pub(crate) fn new() -> Self {
        Self {
            programs: HashMap::new(),
        }
    }

    pub(crate) fn program_mut(&mut self, p4_name: &str) -> Result<&mut ProgramState, Status> {
        self.programs
            .get_mut(p4_name)
            .ok_or_else(|| Status::not_found(format!("program {p4_name:?} is not loaded")))
    }

    pub(crate) fn program(&self, p4_name: &str) -> Result<&ProgramState, Status> {
        self.programs
            .get(p4_name)
            .ok_or_else(|| Status::not_found(format!("program {p4_name:?} is not loaded")))
    }

    /// Installs a program set, dropping runtime state of replaced programs.
    pub(crate) fn install(
        &mut self,
        configs: &[(String, Vec<u8>)],
    ) -> Result<Vec<String>, Status> {
        let mut fresh = HashMap::new();
        for (name, blob) in configs {
            fresh.insert(name.clone(), ProgramState::new(name, blob.clone())?);
        }
        let removed: Vec<String> = self
            .programs
            .keys()
            .filter(|name| !fresh.contains_key(*name))
            .cloned()
            .collect();
        self.programs = fresh;
        Ok(removed)
    }

    /// Verifies a config set parses without touching the device.
    pub(crate) fn verify(configs: &[(String, Vec<u8>)]) -> Result<(), Status> {
        for (name, blob) in configs {
            ProgramState::new(name, blob.clone())?;
        }
        Ok(())
    }
}
