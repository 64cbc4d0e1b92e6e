//! Table key construction and structural comparison.
//!
//! A [`Key`] is built from tagged tuples against a table's key-field catalog.
//! Fields left unlisted default to wildcard when their match kind permits
//! (ternary, LPM, range) and to zero otherwise. Keys are immutable once
//! built; equality and hashing are structural over the encoded fields, so a
//! key read back from the device compares equal to the key that was added
//! once the expected side is masked (see [`Key::masked`]).

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use bfrt_proto::bfrt::{key_field, KeyField, TableKey};

use crate::codec::{self, FieldKind, HostValue};
use crate::error::{BfrtError, Result};
use crate::schema::{KeyFieldInfo, MatchKind, TableInfo};

/// Reserved key field carrying the entry priority of ternary/range tables.
/// Lower value wins in conflict resolution.
pub const MATCH_PRIORITY: &str = "$MATCH_PRIORITY";

/// One tagged key tuple as written by a test author.
#[derive(Debug, Clone)]
pub enum KeyTuple {
    Exact {
        field: String,
        value: HostValue,
    },
    Ternary {
        field: String,
        value: HostValue,
        mask: HostValue,
    },
    Lpm {
        field: String,
        value: HostValue,
        prefix_len: u16,
    },
    Range {
        field: String,
        low: HostValue,
        high: HostValue,
    },
    /// Sugar for an exact tuple on `$MATCH_PRIORITY`.
    Priority(u32),
}

impl KeyTuple {
    pub fn exact(field: impl Into<String>, value: impl Into<HostValue>) -> Self {
        KeyTuple::Exact {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ternary(
        field: impl Into<String>,
        value: impl Into<HostValue>,
        mask: impl Into<HostValue>,
    ) -> Self {
        KeyTuple::Ternary {
            field: field.into(),
            value: value.into(),
            mask: mask.into(),
        }
    }

    pub fn lpm(field: impl Into<String>, value: impl Into<HostValue>, prefix_len: u16) -> Self {
        KeyTuple::Lpm {
            field: field.into(),
            value: value.into(),
            prefix_len,
        }
    }

    pub fn range(
        field: impl Into<String>,
        low: impl Into<HostValue>,
        high: impl Into<HostValue>,
    ) -> Self {
        KeyTuple::Range {
            field: field.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn priority(priority: u32) -> Self {
        KeyTuple::Priority(priority)
    }

    fn field_name(&self) -> &str {
        match self {
            KeyTuple::Exact { field, .. }
            | KeyTuple::Ternary { field, .. }
            | KeyTuple::Lpm { field, .. }
            | KeyTuple::Range { field, .. } => field,
            KeyTuple::Priority(_) => MATCH_PRIORITY,
        }
    }
}

/// The encoded wire form of one key field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EncodedMatch {
    Exact(Vec<u8>),
    Ternary { value: Vec<u8>, mask: Vec<u8> },
    Lpm { value: Vec<u8>, prefix_len: u16 },
    Range { low: Vec<u8>, high: Vec<u8> },
}

/// One encoded key field bound to its schema id.
#[derive(Debug, Clone)]
pub struct EncodedKeyField {
    pub id: u32,
    pub name: String,
    pub width_bits: u16,
    pub value: EncodedMatch,
}

/// An immutable, fully encoded table key.
#[derive(Debug, Clone)]
pub struct Key {
    fields: Vec<EncodedKeyField>,
}

impl Key {
    /// Builds a key against a table's catalog.
    ///
    /// `annotations` maps key field names to their registered semantic kind.
    pub(crate) fn build(
        info: &TableInfo,
        annotations: &HashMap<String, FieldKind>,
        tuples: &[KeyTuple],
    ) -> Result<Self> {
        let mut by_field: HashMap<&str, &KeyTuple> = HashMap::new();
        for tuple in tuples {
            let name = tuple.field_name();
            // Fail on unknown fields before any RPC.
            info.key_field(name)?;
            if by_field.insert(name, tuple).is_some() {
                return Err(BfrtError::invalid_argument(format!(
                    "key field {name:?} listed twice"
                )));
            }
        }

        if info.requires_priority() && !by_field.contains_key(MATCH_PRIORITY) {
            return Err(BfrtError::invalid_argument(format!(
                "table {} has ternary/range fields; $MATCH_PRIORITY is required",
                info.name
            )));
        }

        let mut fields = Vec::with_capacity(info.key_fields.len());
        for kf in &info.key_fields {
            let kind = annotations.get(&kf.name).copied();
            let value = match by_field.get(kf.name.as_str()) {
                Some(tuple) => encode_tuple(kf, kind, tuple)?,
                None => wildcard(kf),
            };
            fields.push(EncodedKeyField {
                id: kf.id,
                name: kf.name.clone(),
                width_bits: kf.width_bits,
                value,
            });
        }
        Ok(Key { fields })
    }

    /// The encoded fields, in schema order.
    pub fn fields(&self) -> &[EncodedKeyField] {
        &self.fields
    }

    /// The encoded match of one field, by name.
    pub fn field(&self, name: &str) -> Option<&EncodedMatch> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// The entry priority, when the key carries `$MATCH_PRIORITY`.
    pub fn priority(&self) -> Option<u32> {
        match self.field(MATCH_PRIORITY)? {
            EncodedMatch::Exact(bytes) => codec::decode_int(bytes).ok().map(|v| v as u32),
            _ => None,
        }
    }

    /// Returns the key with ternary masks and LPM prefixes applied to the
    /// values, the form the device hands back on reads. Tests compare
    /// `added_key.masked()` against read-back keys.
    pub fn masked(&self) -> Key {
        let fields = self
            .fields
            .iter()
            .map(|f| {
                let value = match &f.value {
                    EncodedMatch::Ternary { value, mask } => EncodedMatch::Ternary {
                        value: codec::apply_mask(value, mask),
                        mask: mask.clone(),
                    },
                    EncodedMatch::Lpm { value, prefix_len } => {
                        // Width is recoverable from the encoded length.
                        let mask = codec::prefix_mask(*prefix_len, f.width_bits)
                            .unwrap_or_else(|_| vec![0xFF; value.len()]);
                        EncodedMatch::Lpm {
                            value: codec::apply_mask(value, &mask),
                            prefix_len: *prefix_len,
                        }
                    }
                    other => other.clone(),
                };
                EncodedKeyField {
                    id: f.id,
                    name: f.name.clone(),
                    width_bits: f.width_bits,
                    value,
                }
            })
            .collect();
        Key { fields }
    }

    pub(crate) fn to_proto(&self) -> TableKey {
        let fields = self
            .fields
            .iter()
            .map(|f| {
                let match_type = match &f.value {
                    EncodedMatch::Exact(value) => key_field::MatchType::Exact(key_field::Exact {
                        value: value.clone(),
                    }),
                    EncodedMatch::Ternary { value, mask } => {
                        key_field::MatchType::Ternary(key_field::Ternary {
                            value: value.clone(),
                            mask: mask.clone(),
                        })
                    }
                    EncodedMatch::Lpm { value, prefix_len } => {
                        key_field::MatchType::Lpm(key_field::Lpm {
                            value: value.clone(),
                            prefix_len: i32::from(*prefix_len),
                        })
                    }
                    EncodedMatch::Range { low, high } => {
                        key_field::MatchType::Range(key_field::Range {
                            low: low.clone(),
                            high: high.clone(),
                        })
                    }
                };
                KeyField {
                    field_id: f.id,
                    match_type: Some(match_type),
                }
            })
            .collect();
        TableKey { fields }
    }

    /// Rebuilds a key from its wire form, e.g. a read-back entry or an
    /// idle-timeout notification.
    pub(crate) fn from_proto(proto: &TableKey, info: &TableInfo) -> Result<Self> {
        let mut fields = Vec::with_capacity(proto.fields.len());
        for kf in &proto.fields {
            let schema_field = info.key_field_by_id(kf.field_id).ok_or_else(|| {
                BfrtError::invalid_argument(format!(
                    "table {} read back unknown key field id {}",
                    info.name, kf.field_id
                ))
            })?;
            let value = match kf.match_type.as_ref() {
                Some(key_field::MatchType::Exact(m)) => EncodedMatch::Exact(m.value.clone()),
                Some(key_field::MatchType::Ternary(m)) => EncodedMatch::Ternary {
                    value: m.value.clone(),
                    mask: m.mask.clone(),
                },
                Some(key_field::MatchType::Lpm(m)) => EncodedMatch::Lpm {
                    value: m.value.clone(),
                    prefix_len: m.prefix_len as u16,
                },
                Some(key_field::MatchType::Range(m)) => EncodedMatch::Range {
                    low: m.low.clone(),
                    high: m.high.clone(),
                },
                Some(key_field::MatchType::Optional(_)) | None => {
                    return Err(BfrtError::invalid_argument(format!(
                        "table {} read back field {} with no usable match",
                        info.name, schema_field.name
                    )))
                }
            };
            fields.push(EncodedKeyField {
                id: kf.field_id,
                name: schema_field.name.clone(),
                width_bits: schema_field.width_bits,
                value,
            });
        }
        // Keep schema order so structural comparison is stable.
        fields.sort_by_key(|f| {
            info.key_fields
                .iter()
                .position(|kf| kf.id == f.id)
                .unwrap_or(usize::MAX)
        });
        Ok(Key { fields })
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        if self.fields.len() != other.fields.len() {
            return false;
        }
        self.fields
            .iter()
            .zip(other.fields.iter())
            .all(|(a, b)| a.name == b.name && a.value == b.value)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for f in &self.fields {
            f.name.hash(state);
            f.value.hash(state);
        }
    }
}

fn encode_tuple(
    kf: &KeyFieldInfo,
    kind: Option<FieldKind>,
    tuple: &KeyTuple,
) -> Result<EncodedMatch> {
    match (tuple, kf.match_kind) {
        (KeyTuple::Exact { value, .. }, MatchKind::Exact) => Ok(EncodedMatch::Exact(
            codec::encode_value(value, kf.width_bits, kind)?,
        )),
        (KeyTuple::Priority(p), MatchKind::Exact) => Ok(EncodedMatch::Exact(codec::encode_int(
            u64::from(*p),
            kf.width_bits,
        )?)),
        (KeyTuple::Ternary { value, mask, .. }, MatchKind::Ternary) => Ok(EncodedMatch::Ternary {
            value: codec::encode_value(value, kf.width_bits, kind)?,
            mask: codec::encode_value(mask, kf.width_bits, kind)?,
        }),
        (KeyTuple::Lpm { value, prefix_len, .. }, MatchKind::Lpm) => {
            if *prefix_len > kf.width_bits {
                return Err(BfrtError::invalid_argument(format!(
                    "prefix length {} exceeds width of key field {:?}",
                    prefix_len, kf.name
                )));
            }
            Ok(EncodedMatch::Lpm {
                value: codec::encode_value(value, kf.width_bits, kind)?,
                prefix_len: *prefix_len,
            })
        }
        (KeyTuple::Range { low, high, .. }, MatchKind::Range) => {
            let low = codec::encode_value(low, kf.width_bits, kind)?;
            let high = codec::encode_value(high, kf.width_bits, kind)?;
            if low > high {
                return Err(BfrtError::invalid_argument(format!(
                    "range low exceeds high on key field {:?}",
                    kf.name
                )));
            }
            Ok(EncodedMatch::Range { low, high })
        }
        (tuple, expected) => Err(BfrtError::invalid_argument(format!(
            "key field {:?} is {:?}-match, got a {} tuple",
            kf.name,
            expected,
            tuple_kind_name(tuple)
        ))),
    }
}

fn tuple_kind_name(tuple: &KeyTuple) -> &'static str {
    match tuple {
        KeyTuple::Exact { .. } => "exact",
        KeyTuple::Ternary { .. } => "ternary",
        KeyTuple::Lpm { .. } => "LPM",
        KeyTuple::Range { .. } => "range",
        KeyTuple::Priority(_) => "priority",
    }
}

/// The wildcard (or zero) default for an unlisted field.
fn wildcard(kf: &KeyFieldInfo) -> EncodedMatch {
    let width = codec::wire_width(kf.width_bits);
    match kf.match_kind {
        MatchKind::Exact => EncodedMatch::Exact(vec![0; width]),
        MatchKind::Ternary => EncodedMatch::Ternary {
            value: vec![0; width],
            mask: vec![0; width],
        },
        MatchKind::Lpm => EncodedMatch::Lpm {
            value: vec![0; width],
            prefix_len: 0,
        },
        MatchKind::Range => EncodedMatch::Range {
            low: vec![0; width],
            high: max_value_bytes(kf.width_bits),
        },
    }
}

fn max_value_bytes(bits: u16) -> Vec<u8> {
    let width = codec::wire_width(bits);
    let mut bytes = vec![0xFF; width];
    let partial = bits % 8;
    if partial != 0 {
        bytes[0] = (1u16 << partial) as u8 - 1;
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaInfo;
    use pretty_assertions::assert_eq;

    fn ternary_table() -> TableInfo {
        let blob = serde_json::json!({
            "tables": [{
                "name": "pipe.SwitchIngress.acl",
                "id": 1,
                "table_type": "MatchAction_Direct",
                "size": 512,
                "key": [
                    {"id": 1, "name": "hdr.ipv4.dst_addr", "match_type": "Ternary",
                     "type": {"type": "bytes", "width": 32}},
                    {"id": 2, "name": "$MATCH_PRIORITY", "match_type": "Exact",
                     "type": {"type": "uint32"}}
                ],
                "action_specs": []
            }]
        })
        .to_string();
        let schema = SchemaInfo::parse("prog", blob.as_bytes()).unwrap();
        (*schema.table_get("acl").unwrap()).clone()
    }

    fn exact_table() -> TableInfo {
        let blob = serde_json::json!({
            "tables": [{
                "name": "pipe.SwitchIngress.fwd",
                "id": 2,
                "table_type": "MatchAction_Direct",
                "size": 512,
                "key": [
                    {"id": 1, "name": "hdr.ethernet.dst_addr", "match_type": "Exact",
                     "type": {"type": "bytes", "width": 48}}
                ],
                "action_specs": []
            }]
        })
        .to_string();
        let schema = SchemaInfo::parse("prog", blob.as_bytes()).unwrap();
        (*schema.table_get("fwd").unwrap()).clone()
    }

    #[test]
    fn test_exact_key_build() {
        let info = exact_table();
        let key = Key::build(
            &info,
            &HashMap::new(),
            &[KeyTuple::exact("hdr.ethernet.dst_addr", "22:22:22:22:22:22")],
        )
        .unwrap();
        assert_eq!(
            key.field("hdr.ethernet.dst_addr"),
            Some(&EncodedMatch::Exact(vec![0x22; 6]))
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let info = exact_table();
        let err = Key::build(
            &info,
            &HashMap::new(),
            &[KeyTuple::exact("hdr.bogus", 1u32)],
        )
        .unwrap_err();
        assert!(matches!(err, BfrtError::InvalidArgument(_)));
    }

    #[test]
    fn test_priority_required_for_ternary() {
        let info = ternary_table();
        let err = Key::build(
            &info,
            &HashMap::new(),
            &[KeyTuple::ternary("hdr.ipv4.dst_addr", "10.10.0.0", "255.255.0.0")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("$MATCH_PRIORITY"));
    }

    #[test]
    fn test_ternary_key_with_priority() {
        let info = ternary_table();
        let key = Key::build(
            &info,
            &HashMap::new(),
            &[
                KeyTuple::ternary("hdr.ipv4.dst_addr", "10.10.0.0", "255.255.0.0"),
                KeyTuple::priority(2),
            ],
        )
        .unwrap();
        assert_eq!(key.priority(), Some(2));
        assert_eq!(
            key.field("hdr.ipv4.dst_addr"),
            Some(&EncodedMatch::Ternary {
                value: vec![10, 10, 0, 0],
                mask: vec![255, 255, 0, 0],
            })
        );
    }

    #[test]
    fn test_masked_applies_ternary_mask() {
        let info = ternary_table();
        let key = Key::build(
            &info,
            &HashMap::new(),
            &[
                KeyTuple::ternary("hdr.ipv4.dst_addr", "10.10.5.5", "255.255.0.0"),
                KeyTuple::priority(1),
            ],
        )
        .unwrap();
        let masked = key.masked();
        assert_eq!(
            masked.field("hdr.ipv4.dst_addr"),
            Some(&EncodedMatch::Ternary {
                value: vec![10, 10, 0, 0],
                mask: vec![255, 255, 0, 0],
            })
        );
        // The unmasked and masked keys differ structurally.
        assert_ne!(key, masked);
    }

    #[test]
    fn test_wrong_tuple_kind_rejected() {
        let info = ternary_table();
        let err = Key::build(
            &info,
            &HashMap::new(),
            &[
                KeyTuple::exact("hdr.ipv4.dst_addr", 1u32),
                KeyTuple::priority(0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, BfrtError::InvalidArgument(_)));
    }

    #[test]
    fn test_proto_round_trip() {
        let info = ternary_table();
        let key = Key::build(
            &info,
            &HashMap::new(),
            &[
                KeyTuple::ternary("hdr.ipv4.dst_addr", "10.0.0.1", "255.255.255.255"),
                KeyTuple::priority(7),
            ],
        )
        .unwrap();
        let rebuilt = Key::from_proto(&key.to_proto(), &info).unwrap();
        assert_eq!(key, rebuilt);
        let mut h1 = std::collections::hash_map::DefaultHasher::new();
        let mut h2 = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut h1);
        rebuilt.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_unlisted_ternary_defaults_to_wildcard() {
        let info = ternary_table();
        let key = Key::build(&info, &HashMap::new(), &[KeyTuple::priority(1)]).unwrap();
        assert_eq!(
            key.field("hdr.ipv4.dst_addr"),
            Some(&EncodedMatch::Ternary {
                value: vec![0; 4],
                mask: vec![0; 4],
            })
        );
    }
}
