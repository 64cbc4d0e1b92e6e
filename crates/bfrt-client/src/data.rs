//! Table data construction, projection specs, and read-back decoding.
//!
//! A [`Data`] object is either built by a test (action selection plus field
//! values, validated against the schema), a projection spec selecting which
//! fields a get should return, or the decoded result of a read. The same
//! type serves all three so results can be compared against what was written.

use std::collections::HashMap;

use bfrt_proto::bfrt::{data_field, DataField, TableData};

use crate::codec::{self, FieldKind, HostValue};
use crate::error::{BfrtError, Result};
use crate::schema::{DataFieldInfo, DataTypeKind, TableInfo};

/// A host-side data value: a scalar or an array.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Scalar(HostValue),
    IntArr(Vec<u32>),
    BoolArr(Vec<bool>),
    StrArr(Vec<String>),
    /// No value; selects the field in a projection spec.
    Select,
}

/// One tagged data tuple as written by a test author.
#[derive(Debug, Clone)]
pub struct DataTuple {
    pub field: String,
    pub value: DataValue,
}

impl DataTuple {
    /// A scalar field value.
    pub fn new(field: impl Into<String>, value: impl Into<HostValue>) -> Self {
        Self {
            field: field.into(),
            value: DataValue::Scalar(value.into()),
        }
    }

    /// An integer-array field value, e.g. multicast node membership.
    pub fn int_arr(field: impl Into<String>, values: Vec<u32>) -> Self {
        Self {
            field: field.into(),
            value: DataValue::IntArr(values),
        }
    }

    /// A bool-array field value, e.g. per-member XID validity.
    pub fn bool_arr(field: impl Into<String>, values: Vec<bool>) -> Self {
        Self {
            field: field.into(),
            value: DataValue::BoolArr(values),
        }
    }

    /// A string-array field value.
    pub fn str_arr(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            field: field.into(),
            value: DataValue::StrArr(values),
        }
    }

    /// Selects a field for a projection (`get`) spec; carries no value.
    pub fn select(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: DataValue::Select,
        }
    }
}

/// One encoded data field bound to its schema id.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDataField {
    pub id: u32,
    pub name: String,
    pub value: Option<data_field::Value>,
}

/// An immutable, fully encoded data object.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    action: Option<(u32, String)>,
    fields: Vec<EncodedDataField>,
}

impl Data {
    /// Builds a data object against a table's catalog.
    ///
    /// With `action`, each tuple validates against that action's fields
    /// (reserved `$` fields still resolve through the common catalog). With
    /// `get`, tuples act as a projection spec and values are not required.
    pub(crate) fn build(
        info: &TableInfo,
        annotations: &HashMap<(String, Option<String>), FieldKind>,
        tuples: &[DataTuple],
        action: Option<&str>,
        get: bool,
    ) -> Result<Self> {
        let action_ref = match action {
            Some(name) => {
                let a = info.action(name)?;
                Some((a.id, a.name.clone()))
            }
            None => None,
        };

        let mut fields = Vec::with_capacity(tuples.len());
        let mut seen: HashMap<&str, ()> = HashMap::new();
        for tuple in tuples {
            if seen.insert(tuple.field.as_str(), ()).is_some() {
                return Err(BfrtError::invalid_argument(format!(
                    "data field {:?} listed twice",
                    tuple.field
                )));
            }
            let field_info = info.data_field(&tuple.field, action)?;
            let kind = annotations
                .get(&(tuple.field.clone(), action.map(String::from)))
                .or_else(|| annotations.get(&(tuple.field.clone(), None)))
                .copied();
            let value = match &tuple.value {
                DataValue::Select => None,
                _ if get => {
                    // A projection spec selects fields; values are ignored.
                    None
                }
                other => Some(encode_data_value(field_info, kind, other)?),
            };
            fields.push(EncodedDataField {
                id: field_info.id,
                name: field_info.name.clone(),
                value,
            });
        }
        Ok(Data {
            action: action_ref,
            fields,
        })
    }

    /// Decodes a read-back wire data object.
    pub(crate) fn from_proto(proto: &TableData, info: &TableInfo) -> Result<Self> {
        let action = if proto.action_id != 0 {
            let a = info.action_by_id(proto.action_id).ok_or_else(|| {
                BfrtError::invalid_argument(format!(
                    "table {} read back unknown action id {}",
                    info.name, proto.action_id
                ))
            })?;
            Some((a.id, a.name.clone()))
        } else {
            None
        };

        let mut fields = Vec::with_capacity(proto.fields.len());
        for f in &proto.fields {
            let name = info
                .data_field_by_id(f.field_id, proto.action_id)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| format!("<field {}>", f.field_id));
            fields.push(EncodedDataField {
                id: f.field_id,
                name,
                value: f.value.clone(),
            });
        }
        Ok(Data { action, fields })
    }

    /// The selected action name, if any.
    pub fn action_name(&self) -> Option<&str> {
        self.action.as_ref().map(|(_, name)| name.as_str())
    }

    pub(crate) fn action_id(&self) -> u32 {
        self.action.as_ref().map(|(id, _)| *id).unwrap_or(0)
    }

    /// The encoded fields, in build order.
    pub fn fields(&self) -> &[EncodedDataField] {
        &self.fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    fn field(&self, name: &str) -> Result<&EncodedDataField> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| BfrtError::not_found(format!("data has no field {name:?}")))
    }

    /// Integer value of a stream-encoded field.
    pub fn get_int(&self, name: &str) -> Result<u64> {
        match &self.field(name)?.value {
            Some(data_field::Value::Stream(bytes)) => codec::decode_int(bytes),
            other => Err(type_error(name, "integer", other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match &self.field(name)?.value {
            Some(data_field::Value::BoolVal(b)) => Ok(*b),
            other => Err(type_error(name, "bool", other)),
        }
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        match &self.field(name)?.value {
            Some(data_field::Value::DoubleVal(v)) => Ok(*v),
            other => Err(type_error(name, "float", other)),
        }
    }

    pub fn get_str(&self, name: &str) -> Result<&str> {
        match &self.field(name)?.value {
            Some(data_field::Value::StrVal(s)) => Ok(s),
            other => Err(type_error(name, "string", other)),
        }
    }

    pub fn get_bytes(&self, name: &str) -> Result<&[u8]> {
        match &self.field(name)?.value {
            Some(data_field::Value::Stream(bytes)) => Ok(bytes),
            other => Err(type_error(name, "bytes", other)),
        }
    }

    pub fn get_int_arr(&self, name: &str) -> Result<&[u32]> {
        match &self.field(name)?.value {
            Some(data_field::Value::IntArrVal(arr)) => Ok(&arr.val),
            other => Err(type_error(name, "integer array", other)),
        }
    }

    pub fn get_bool_arr(&self, name: &str) -> Result<&[bool]> {
        match &self.field(name)?.value {
            Some(data_field::Value::BoolArrVal(arr)) => Ok(&arr.val),
            other => Err(type_error(name, "bool array", other)),
        }
    }

    pub fn get_str_arr(&self, name: &str) -> Result<Vec<&str>> {
        match &self.field(name)?.value {
            Some(data_field::Value::StrArrVal(arr)) => {
                Ok(arr.val.iter().map(String::as_str).collect())
            }
            other => Err(type_error(name, "string array", other)),
        }
    }

    /// MAC form of a stream-encoded field.
    pub fn get_mac(&self, name: &str) -> Result<String> {
        codec::decode_mac(self.get_bytes(name)?)
    }

    /// Dotted-quad form of a stream-encoded field.
    pub fn get_ipv4(&self, name: &str) -> Result<String> {
        codec::decode_ipv4(self.get_bytes(name)?)
    }

    pub(crate) fn to_proto(&self) -> TableData {
        TableData {
            action_id: self.action_id(),
            fields: self
                .fields
                .iter()
                .map(|f| DataField {
                    field_id: f.id,
                    value: f.value.clone(),
                })
                .collect(),
        }
    }
}

fn type_error(name: &str, wanted: &str, got: &Option<data_field::Value>) -> BfrtError {
    let got = match got {
        None => "no value",
        Some(data_field::Value::Stream(_)) => "byte stream",
        Some(data_field::Value::DoubleVal(_)) => "float",
        Some(data_field::Value::StrVal(_)) => "string",
        Some(data_field::Value::BoolVal(_)) => "bool",
        Some(data_field::Value::IntArrVal(_)) => "integer array",
        Some(data_field::Value::BoolArrVal(_)) => "bool array",
        Some(data_field::Value::StrArrVal(_)) => "string array",
    };
    BfrtError::invalid_argument(format!("data field {name:?}: wanted {wanted}, have {got}"))
}

fn encode_data_value(
    field: &DataFieldInfo,
    kind: Option<FieldKind>,
    value: &DataValue,
) -> Result<data_field::Value> {
    match (value, field.repeated) {
        (DataValue::IntArr(vals), true) => Ok(data_field::Value::IntArrVal(
            data_field::IntArray { val: vals.clone() },
        )),
        (DataValue::BoolArr(vals), true) => Ok(data_field::Value::BoolArrVal(
            data_field::BoolArray { val: vals.clone() },
        )),
        (DataValue::StrArr(vals), true) => Ok(data_field::Value::StrArrVal(
            data_field::StrArray { val: vals.clone() },
        )),
        (DataValue::Scalar(_), true) => Err(BfrtError::invalid_argument(format!(
            "data field {:?} is an array; use an array tuple",
            field.name
        ))),
        (DataValue::IntArr(_) | DataValue::BoolArr(_) | DataValue::StrArr(_), false) => {
            Err(BfrtError::invalid_argument(format!(
                "data field {:?} is a scalar; got an array tuple",
                field.name
            )))
        }
        (DataValue::Scalar(host), false) => match field.kind {
            DataTypeKind::Stream | DataTypeKind::Uint => Ok(data_field::Value::Stream(
                codec::encode_value(host, field.width_bits, kind)?,
            )),
            DataTypeKind::Bool => match host {
                HostValue::Bool(b) => Ok(data_field::Value::BoolVal(*b)),
                other => Err(BfrtError::invalid_argument(format!(
                    "data field {:?} is a bool, got {other:?}",
                    field.name
                ))),
            },
            DataTypeKind::Float => match host {
                HostValue::Float(v) => Ok(data_field::Value::DoubleVal(*v)),
                HostValue::Int(v) => Ok(data_field::Value::DoubleVal(*v as f64)),
                other => Err(BfrtError::invalid_argument(format!(
                    "data field {:?} is a float, got {other:?}",
                    field.name
                ))),
            },
            DataTypeKind::Str => match host {
                HostValue::Str(s) => Ok(data_field::Value::StrVal(s.clone())),
                other => Err(BfrtError::invalid_argument(format!(
                    "data field {:?} is a string enum, got {other:?}",
                    field.name
                ))),
            },
        },
        (DataValue::Select, _) => unreachable!("Select handled by the caller"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaInfo;
    use pretty_assertions::assert_eq;

    fn table() -> TableInfo {
        let blob = serde_json::json!({
            "tables": [{
                "name": "pipe.SwitchIngress.forward",
                "id": 1,
                "table_type": "MatchAction_Direct",
                "size": 512,
                "key": [],
                "action_specs": [{
                    "id": 11,
                    "name": "SwitchIngress.hit",
                    "data": [
                        {"id": 1, "name": "port", "mandatory": true,
                         "type": {"type": "bytes", "width": 9}}
                    ]
                }],
                "data": [
                    {"singleton": {"id": 101, "name": "$COUNTER_SPEC_PKTS",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 102, "name": "$ENTRY_TTL",
                                   "type": {"type": "uint32"}}},
                    {"singleton": {"id": 103, "name": "$MULTICAST_NODE_ID",
                                   "repeated": true, "type": {"type": "uint32"}}},
                    {"singleton": {"id": 104, "name": "$SESSION_ENABLE",
                                   "type": {"type": "bool"}}},
                    {"singleton": {"id": 105, "name": "$DIRECTION",
                                   "type": {"type": "string"}}},
                    {"singleton": {"id": 106, "name": "$LPF_SPEC_GAIN_TIME_CONSTANT_NS",
                                   "type": {"type": "float"}}}
                ]
            }]
        })
        .to_string();
        let schema = SchemaInfo::parse("prog", blob.as_bytes()).unwrap();
        (*schema.table_get("forward").unwrap()).clone()
    }

    #[test]
    fn test_action_data_build() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[DataTuple::new("port", 5u32)],
            Some("hit"),
            false,
        )
        .unwrap();
        assert_eq!(data.action_name(), Some("SwitchIngress.hit"));
        assert_eq!(data.get_int("port").unwrap(), 5);
    }

    #[test]
    fn test_unknown_action_field_rejected() {
        let info = table();
        let err = Data::build(
            &info,
            &HashMap::new(),
            &[DataTuple::new("bogus", 5u32)],
            Some("hit"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, BfrtError::InvalidArgument(_)));
    }

    #[test]
    fn test_reserved_field_without_action() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[
                DataTuple::new("$COUNTER_SPEC_PKTS", 100u64),
                DataTuple::new("$ENTRY_TTL", 1000u32),
            ],
            None,
            false,
        )
        .unwrap();
        assert_eq!(data.get_int("$COUNTER_SPEC_PKTS").unwrap(), 100);
        assert_eq!(data.get_int("$ENTRY_TTL").unwrap(), 1000);
    }

    #[test]
    fn test_reserved_field_beside_action() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[
                DataTuple::new("port", 3u32),
                DataTuple::new("$ENTRY_TTL", 500u32),
            ],
            Some("hit"),
            false,
        )
        .unwrap();
        assert!(data.has_field("$ENTRY_TTL"));
    }

    #[test]
    fn test_array_fields() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[DataTuple::int_arr("$MULTICAST_NODE_ID", vec![1, 2, 3])],
            None,
            false,
        )
        .unwrap();
        assert_eq!(data.get_int_arr("$MULTICAST_NODE_ID").unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_scalar_array_mismatch() {
        let info = table();
        assert!(Data::build(
            &info,
            &HashMap::new(),
            &[DataTuple::new("$MULTICAST_NODE_ID", 1u32)],
            None,
            false,
        )
        .is_err());
        assert!(Data::build(
            &info,
            &HashMap::new(),
            &[DataTuple::int_arr("$ENTRY_TTL", vec![1])],
            None,
            false,
        )
        .is_err());
    }

    #[test]
    fn test_bool_string_and_float_fields() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[
                DataTuple::new("$SESSION_ENABLE", true),
                DataTuple::new("$DIRECTION", "EGRESS"),
                DataTuple::new("$LPF_SPEC_GAIN_TIME_CONSTANT_NS", 100.5f64),
            ],
            None,
            false,
        )
        .unwrap();
        assert!(data.get_bool("$SESSION_ENABLE").unwrap());
        assert_eq!(data.get_str("$DIRECTION").unwrap(), "EGRESS");
        assert_eq!(data.get_float("$LPF_SPEC_GAIN_TIME_CONSTANT_NS").unwrap(), 100.5);
    }

    #[test]
    fn test_projection_spec_carries_no_values() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[
                DataTuple::select("$COUNTER_SPEC_PKTS"),
                DataTuple::new("$ENTRY_TTL", 123u32),
            ],
            None,
            true,
        )
        .unwrap();
        for f in data.fields() {
            assert!(f.value.is_none());
        }
    }

    #[test]
    fn test_proto_round_trip() {
        let info = table();
        let data = Data::build(
            &info,
            &HashMap::new(),
            &[DataTuple::new("port", 5u32)],
            Some("hit"),
            false,
        )
        .unwrap();
        let rebuilt = Data::from_proto(&data.to_proto(), &info).unwrap();
        assert_eq!(data, rebuilt);
    }
}
