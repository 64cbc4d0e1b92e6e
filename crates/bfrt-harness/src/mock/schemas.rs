//! Canned `bf-rt.json` blobs for the mock runtime.
//!
//! One demo program covering every table kind the conformance suites
//! exercise: exact/ternary/LPM/range match tables with direct resources,
//! indexed meter/counter/register tables, the PRE tree tables, mirror
//! sessions, the packet generator, and the port tables.

use serde_json::json;

/// The demo program's schema blob.
pub fn demo_program_blob() -> Vec<u8> {
    json!({
        "schema_version": "1.0.0",
        "tables": [
            {
                "name": "pipe.SwitchIngress.forward",
                "id": 1001,
                "table_type": "MatchAction_Direct",
                "size": 1024,
                "key": [
                    {"id": 1, "name": "hdr.ethernet.dst_addr", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "bytes", "width": 48}}
                ],
                "action_specs": [
                    {"id": 101, "name": "SwitchIngress.hit", "data": [
                        {"id": 1, "name": "port", "mandatory": true,
                         "type": {"type": "bytes", "width": 9}}
                    ]},
                    {"id": 102, "name": "SwitchIngress.miss", "data": []}
                ],
                "data": [
                    {"singleton": {"id": 65553, "name": "$COUNTER_SPEC_BYTES",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 65554, "name": "$COUNTER_SPEC_PKTS",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 65555, "name": "$ENTRY_TTL",
                                   "type": {"type": "uint32"}}},
                    {"singleton": {"id": 65556, "name": "$ENTRY_HIT_STATE",
                                   "type": {"type": "string"}}}
                ],
                "attributes": ["IdleTimeout", "EntryScope", "DynamicKeyMask"],
                "supported_operations": ["SyncCounters", "UpdateHitState"]
            },
            {
                "name": "pipe.SwitchIngress.acl",
                "id": 1002,
                "table_type": "MatchAction_Direct",
                "size": 512,
                "key": [
                    {"id": 1, "name": "hdr.ipv4.dst_addr", "match_type": "Ternary",
                     "type": {"type": "bytes", "width": 32}},
                    {"id": 2, "name": "$MATCH_PRIORITY", "match_type": "Exact",
                     "type": {"type": "uint32"}}
                ],
                "action_specs": [
                    {"id": 111, "name": "SwitchIngress.acl_hit", "data": [
                        {"id": 1, "name": "port", "mandatory": true,
                         "type": {"type": "bytes", "width": 9}}
                    ]},
                    {"id": 112, "name": "SwitchIngress.acl_drop", "data": []}
                ],
                "data": [],
                "attributes": ["EntryScope"],
                "supported_operations": []
            },
            {
                "name": "pipe.SwitchIngress.route",
                "id": 1003,
                "table_type": "MatchAction_Direct",
                "size": 1024,
                "key": [
                    {"id": 1, "name": "hdr.ipv4.dst_addr", "match_type": "LPM",
                     "type": {"type": "bytes", "width": 32}}
                ],
                "action_specs": [
                    {"id": 121, "name": "SwitchIngress.route_hit", "data": [
                        {"id": 1, "name": "port", "mandatory": true,
                         "type": {"type": "bytes", "width": 9}}
                    ]}
                ],
                "data": [],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "pipe.SwitchIngress.l4_range",
                "id": 1004,
                "table_type": "MatchAction_Direct",
                "size": 256,
                "key": [
                    {"id": 1, "name": "hdr.tcp.dst_port", "match_type": "Range",
                     "type": {"type": "bytes", "width": 16}},
                    {"id": 2, "name": "$MATCH_PRIORITY", "match_type": "Exact",
                     "type": {"type": "uint32"}}
                ],
                "action_specs": [
                    {"id": 131, "name": "SwitchIngress.range_hit", "data": [
                        {"id": 1, "name": "port", "mandatory": true,
                         "type": {"type": "bytes", "width": 9}}
                    ]}
                ],
                "data": [],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "pipe.SwitchIngress.meter",
                "id": 2001,
                "table_type": "Meter",
                "size": 256,
                "key": [
                    {"id": 1, "name": "$METER_INDEX", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$METER_SPEC_CIR_KBPS",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 2, "name": "$METER_SPEC_PIR_KBPS",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 3, "name": "$METER_SPEC_CBS_KBITS",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 4, "name": "$METER_SPEC_PBS_KBITS",
                                   "type": {"type": "uint64"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "pipe.SwitchIngress.counter",
                "id": 2002,
                "table_type": "Counter",
                "size": 256,
                "key": [
                    {"id": 1, "name": "$COUNTER_INDEX", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$COUNTER_SPEC_BYTES",
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 2, "name": "$COUNTER_SPEC_PKTS",
                                   "type": {"type": "uint64"}}}
                ],
                "attributes": [],
                "supported_operations": ["SyncCounters"]
            },
            {
                "name": "pipe.SwitchIngress.reg",
                "id": 2003,
                "table_type": "Register",
                "size": 1024,
                "key": [
                    {"id": 1, "name": "$REGISTER_INDEX", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "SwitchIngress.reg.f1",
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": ["SyncRegisters"]
            },
            {
                "name": "$pre.node",
                "id": 3001,
                "table_type": "PreNode",
                "size": 4096,
                "key": [
                    {"id": 1, "name": "$MULTICAST_NODE_ID", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$MULTICAST_RID",
                                   "type": {"type": "uint32"}}},
                    {"singleton": {"id": 2, "name": "$DEV_PORT", "repeated": true,
                                   "type": {"type": "uint32"}}},
                    {"singleton": {"id": 3, "name": "$MULTICAST_LAG_ID", "repeated": true,
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$pre.mgid",
                "id": 3002,
                "table_type": "PreMgid",
                "size": 4096,
                "key": [
                    {"id": 1, "name": "$MGID", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$MULTICAST_NODE_ID", "repeated": true,
                                   "type": {"type": "uint32"}}},
                    {"singleton": {"id": 2, "name": "$MULTICAST_NODE_L1_XID_VALID",
                                   "repeated": true, "type": {"type": "bool"}}},
                    {"singleton": {"id": 3, "name": "$MULTICAST_NODE_L1_XID", "repeated": true,
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$pre.ecmp",
                "id": 3003,
                "table_type": "PreEcmp",
                "size": 4096,
                "key": [
                    {"id": 1, "name": "$MULTICAST_ECMP_ID", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$MULTICAST_NODE_ID", "repeated": true,
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$pre.lag",
                "id": 3004,
                "table_type": "PreLag",
                "size": 256,
                "key": [
                    {"id": 1, "name": "$MULTICAST_LAG_ID", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$DEV_PORT", "repeated": true,
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$pre.prune",
                "id": 3005,
                "table_type": "PrePrune",
                "size": 288,
                "key": [
                    {"id": 1, "name": "$PRE_PRUNE_YID", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$DEV_PORT", "repeated": true,
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$pre.port",
                "id": 3006,
                "table_type": "PrePort",
                "size": 512,
                "key": [
                    {"id": 1, "name": "$DEV_PORT", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$COPY_TO_CPU_PORT_ENABLE",
                                   "type": {"type": "bool"}}},
                    {"singleton": {"id": 2, "name": "$MULTICAST_BACKUP_PORT",
                                   "type": {"type": "uint32"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$mirror.cfg",
                "id": 4001,
                "table_type": "MirrorCfg",
                "size": 256,
                "key": [
                    {"id": 1, "name": "$sid", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint16"}}
                ],
                "action_specs": [
                    {"id": 401, "name": "$normal", "data": [
                        {"id": 1, "name": "$session_enable", "type": {"type": "bool"}},
                        {"id": 2, "name": "$direction", "type": {"type": "string"}},
                        {"id": 3, "name": "$ucast_egress_port", "type": {"type": "uint32"}},
                        {"id": 4, "name": "$ucast_egress_port_valid", "type": {"type": "bool"}},
                        {"id": 5, "name": "$max_pkt_len", "type": {"type": "uint16"}}
                    ]}
                ],
                "data": [],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "tf1.pktgen.app_cfg",
                "id": 5001,
                "table_type": "PktgenAppCfg",
                "size": 8,
                "key": [
                    {"id": 1, "name": "app_id", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint8"}}
                ],
                "action_specs": [
                    {"id": 501, "name": "trigger_timer_periodic", "data": [
                        {"id": 1, "name": "timer_nanosec", "type": {"type": "uint32"}},
                        {"id": 2, "name": "app_enable", "type": {"type": "bool"}},
                        {"id": 3, "name": "pkt_len", "type": {"type": "uint16"}},
                        {"id": 4, "name": "pkt_buffer_offset", "type": {"type": "uint16"}},
                        {"id": 5, "name": "pipe_local_source_port", "type": {"type": "uint32"}},
                        {"id": 6, "name": "batch_count_cfg", "type": {"type": "uint16"}},
                        {"id": 7, "name": "packets_per_batch_cfg", "type": {"type": "uint16"}}
                    ]},
                    {"id": 502, "name": "trigger_port_down", "data": [
                        {"id": 2, "name": "app_enable", "type": {"type": "bool"}},
                        {"id": 3, "name": "pkt_len", "type": {"type": "uint16"}},
                        {"id": 4, "name": "pkt_buffer_offset", "type": {"type": "uint16"}},
                        {"id": 5, "name": "pipe_local_source_port", "type": {"type": "uint32"}},
                        {"id": 6, "name": "batch_count_cfg", "type": {"type": "uint16"}},
                        {"id": 7, "name": "packets_per_batch_cfg", "type": {"type": "uint16"}}
                    ]}
                ],
                "data": [
                    {"singleton": {"id": 2, "name": "app_enable", "type": {"type": "bool"}}},
                    {"singleton": {"id": 8, "name": "batch_counter", "read_only": true,
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 9, "name": "pkt_counter", "read_only": true,
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 10, "name": "trigger_counter", "read_only": true,
                                   "type": {"type": "uint64"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "tf1.pktgen.port_cfg",
                "id": 5002,
                "table_type": "PktgenPortCfg",
                "size": 512,
                "key": [
                    {"id": 1, "name": "dev_port", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "pktgen_enable", "type": {"type": "bool"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "tf1.pktgen.pkt_buffer",
                "id": 5003,
                "table_type": "PktgenPktBufferCfg",
                "size": 1,
                "key": [
                    {"id": 1, "name": "pkt_buffer_offset", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint16"}},
                    {"id": 2, "name": "pkt_buffer_size", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "buffer", "type": {"type": "bytes"}}}
                ],
                "attributes": [],
                "supported_operations": []
            },
            {
                "name": "$PORT",
                "id": 6001,
                "table_type": "PortCfg",
                "size": 512,
                "key": [
                    {"id": 1, "name": "$DEV_PORT", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$PORT_ENABLE", "type": {"type": "bool"}}},
                    {"singleton": {"id": 2, "name": "$SPEED", "type": {"type": "string"}}}
                ],
                "attributes": ["PortStatusChangeNotification", "PortStatPollIntvl"],
                "supported_operations": []
            },
            {
                "name": "$PORT_STAT",
                "id": 6002,
                "table_type": "PortStat",
                "size": 512,
                "key": [
                    {"id": 1, "name": "$DEV_PORT", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "uint32"}}
                ],
                "action_specs": [],
                "data": [
                    {"singleton": {"id": 1, "name": "$FramesReceivedOK", "read_only": true,
                                   "type": {"type": "uint64"}}},
                    {"singleton": {"id": 2, "name": "$FramesTransmittedOK", "read_only": true,
                                   "type": {"type": "uint64"}}}
                ],
                "attributes": [],
                "supported_operations": []
            }
        ]
    })
    .to_string()
    .into_bytes()
}

/// A tiny second program, for multi-program and warm-init scenarios.
pub fn aux_program_blob() -> Vec<u8> {
    json!({
        "schema_version": "1.0.0",
        "tables": [
            {
                "name": "pipe.SwitchEgress.output",
                "id": 9001,
                "table_type": "MatchAction_Direct",
                "size": 64,
                "key": [
                    {"id": 1, "name": "hdr.ethernet.dst_addr", "mandatory": true,
                     "match_type": "Exact", "type": {"type": "bytes", "width": 48}}
                ],
                "action_specs": [
                    {"id": 901, "name": "SwitchEgress.output_hit", "data": [
                        {"id": 1, "name": "port", "mandatory": true,
                         "type": {"type": "bytes", "width": 9}}
                    ]}
                ],
                "data": [],
                "attributes": [],
                "supported_operations": []
            }
        ]
    })
    .to_string()
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bfrt_client::schema::SchemaInfo;

    #[test]
    fn test_demo_blob_parses() {
        let schema = SchemaInfo::parse("demo", &demo_program_blob()).unwrap();
        assert!(schema.table_get("pipe.SwitchIngress.forward").is_ok());
        assert!(schema.table_get("$pre.mgid").is_ok());
        assert!(schema.table_get("$mirror.cfg").is_ok());
        assert!(schema.table_get("tf1.pktgen.app_cfg").is_ok());
        let acl = schema.table_get("acl").unwrap();
        assert!(acl.requires_priority());
    }

    #[test]
    fn test_aux_blob_parses() {
        let schema = SchemaInfo::parse("aux", &aux_program_blob()).unwrap();
        assert!(schema.table_get("SwitchEgress.output").is_ok());
    }
}
