//! Typed wrappers for the packet replication engine tables (`$pre.*`).
//!
//! Multicast trees are built from L1 nodes referenced by MGID entries, with
//! optional ECMP groups and LAGs, plus per-port L2 prune bitmaps. Membership
//! lists are the canonical use of `entry_mod_inc`.

use crate::data::DataTuple;
use crate::error::Result;
use crate::key::KeyTuple;
use crate::session::ClientInterface;
use crate::table::{ModIncMode, Table};
use crate::target::Target;

/// One node reference inside an MGID entry, with its L1 exclusion id.
#[derive(Debug, Clone, Copy)]
pub struct MgidMember {
    pub node_id: u32,
    pub xid_valid: bool,
    pub xid: u32,
}

impl MgidMember {
    pub fn new(node_id: u32) -> Self {
        Self {
            node_id,
            xid_valid: false,
            xid: 0,
        }
    }

    pub fn with_xid(node_id: u32, xid: u32) -> Self {
        Self {
            node_id,
            xid_valid: true,
            xid,
        }
    }
}

/// Handle over the five PRE tables of a device.
pub struct Multicast {
    node: Table,
    mgid: Table,
    ecmp: Table,
    lag: Table,
    prune: Table,
}

impl Multicast {
    /// Resolves the PRE tables on the bound program.
    pub async fn new(client: &ClientInterface) -> Result<Self> {
        Ok(Self {
            node: client.table("$pre.node").await?,
            mgid: client.table("$pre.mgid").await?,
            ecmp: client.table("$pre.ecmp").await?,
            lag: client.table("$pre.lag").await?,
            prune: client.table("$pre.prune").await?,
        })
    }

    /// Adds an L1 node replicating to `ports`, tagged with replication id
    /// `rid`.
    pub async fn node_add(
        &self,
        target: Target,
        node_id: u32,
        rid: u32,
        ports: &[u32],
        lag_ids: &[u32],
    ) -> Result<()> {
        let key = self
            .node
            .make_key(&[KeyTuple::exact("$MULTICAST_NODE_ID", node_id)])?;
        let data = self.node.make_data(
            &[
                DataTuple::new("$MULTICAST_RID", rid),
                DataTuple::int_arr("$DEV_PORT", ports.to_vec()),
                DataTuple::int_arr("$MULTICAST_LAG_ID", lag_ids.to_vec()),
            ],
            None,
        )?;
        self.node.entry_add(target, &[key], &[data]).await
    }

    pub async fn node_del(&self, target: Target, node_id: u32) -> Result<()> {
        let key = self
            .node
            .make_key(&[KeyTuple::exact("$MULTICAST_NODE_ID", node_id)])?;
        self.node.entry_del(target, Some(&[key])).await
    }

    /// Creates a multicast group over the given node members.
    pub async fn mgid_add(&self, target: Target, mgid: u32, members: &[MgidMember]) -> Result<()> {
        let key = self.mgid.make_key(&[KeyTuple::exact("$MGID", mgid)])?;
        let data = self.mgid.make_data(&member_tuples(members), None)?;
        self.mgid.entry_add(target, &[key], &[data]).await
    }

    /// Adds members to an existing group without replacing it.
    pub async fn mgid_members_add(
        &self,
        target: Target,
        mgid: u32,
        members: &[MgidMember],
    ) -> Result<()> {
        self.mgid_mod_inc(target, mgid, members, ModIncMode::Add).await
    }

    /// Removes members from an existing group.
    pub async fn mgid_members_del(
        &self,
        target: Target,
        mgid: u32,
        members: &[MgidMember],
    ) -> Result<()> {
        self.mgid_mod_inc(target, mgid, members, ModIncMode::Delete)
            .await
    }

    async fn mgid_mod_inc(
        &self,
        target: Target,
        mgid: u32,
        members: &[MgidMember],
        mode: ModIncMode,
    ) -> Result<()> {
        let key = self.mgid.make_key(&[KeyTuple::exact("$MGID", mgid)])?;
        let data = self.mgid.make_data(&member_tuples(members), None)?;
        self.mgid.entry_mod_inc(target, &[key], &[data], mode).await
    }

    pub async fn mgid_del(&self, target: Target, mgid: u32) -> Result<()> {
        let key = self.mgid.make_key(&[KeyTuple::exact("$MGID", mgid)])?;
        self.mgid.entry_del(target, Some(&[key])).await
    }

    /// Reads back the node membership of a group.
    pub async fn mgid_members_get(&self, target: Target, mgid: u32) -> Result<Vec<u32>> {
        let key = self.mgid.make_key(&[KeyTuple::exact("$MGID", mgid)])?;
        let entries = self.mgid.entry_get(target, Some(&[key]), false, None).await?;
        let mut out = Vec::new();
        for (_, data) in entries {
            out.extend_from_slice(data.get_int_arr("$MULTICAST_NODE_ID")?);
        }
        Ok(out)
    }

    /// Creates an ECMP group over L1 nodes.
    pub async fn ecmp_add(&self, target: Target, ecmp_id: u32, node_ids: &[u32]) -> Result<()> {
        let key = self
            .ecmp
            .make_key(&[KeyTuple::exact("$MULTICAST_ECMP_ID", ecmp_id)])?;
        let data = self.ecmp.make_data(
            &[DataTuple::int_arr("$MULTICAST_NODE_ID", node_ids.to_vec())],
            None,
        )?;
        self.ecmp.entry_add(target, &[key], &[data]).await
    }

    pub async fn ecmp_del(&self, target: Target, ecmp_id: u32) -> Result<()> {
        let key = self
            .ecmp
            .make_key(&[KeyTuple::exact("$MULTICAST_ECMP_ID", ecmp_id)])?;
        self.ecmp.entry_del(target, Some(&[key])).await
    }

    /// Programs the port membership of a LAG.
    pub async fn lag_set(&self, target: Target, lag_id: u32, ports: &[u32]) -> Result<()> {
        let key = self
            .lag
            .make_key(&[KeyTuple::exact("$MULTICAST_LAG_ID", lag_id)])?;
        let data = self
            .lag
            .make_data(&[DataTuple::int_arr("$DEV_PORT", ports.to_vec())], None)?;
        self.lag.entry_add(target, &[key], &[data]).await
    }

    /// Reads a LAG's membership; index order is stable for verification.
    pub async fn lag_get(&self, target: Target, lag_id: u32) -> Result<Vec<u32>> {
        let key = self
            .lag
            .make_key(&[KeyTuple::exact("$MULTICAST_LAG_ID", lag_id)])?;
        let entries = self.lag.entry_get(target, Some(&[key]), false, None).await?;
        let mut out = Vec::new();
        for (_, data) in entries {
            out.extend_from_slice(data.get_int_arr("$DEV_PORT")?);
        }
        Ok(out)
    }

    /// Programs the L2 prune bitmap of an exclusion id.
    pub async fn prune_set(&self, target: Target, yid: u32, ports: &[u32]) -> Result<()> {
        let key = self
            .prune
            .make_key(&[KeyTuple::exact("$PRE_PRUNE_YID", yid)])?;
        let data = self
            .prune
            .make_data(&[DataTuple::int_arr("$DEV_PORT", ports.to_vec())], None)?;
        // Prune entries always exist per yid; programming is a modify.
        self.prune.entry_mod(target, &[key], &[data]).await
    }

    /// Reads a prune bitmap back; index order is stable for verification.
    pub async fn prune_get(&self, target: Target, yid: u32) -> Result<Vec<u32>> {
        let key = self
            .prune
            .make_key(&[KeyTuple::exact("$PRE_PRUNE_YID", yid)])?;
        let entries = self
            .prune
            .entry_get(target, Some(&[key]), false, None)
            .await?;
        let mut out = Vec::new();
        for (_, data) in entries {
            out.extend_from_slice(data.get_int_arr("$DEV_PORT")?);
        }
        Ok(out)
    }
}

fn member_tuples(members: &[MgidMember]) -> Vec<DataTuple> {
    vec![
        DataTuple::int_arr(
            "$MULTICAST_NODE_ID",
            members.iter().map(|m| m.node_id).collect(),
        ),
        DataTuple::bool_arr(
            "$MULTICAST_NODE_L1_XID_VALID",
            members.iter().map(|m| m.xid_valid).collect(),
        ),
        DataTuple::int_arr(
            "$MULTICAST_NODE_L1_XID",
            members.iter().map(|m| m.xid).collect(),
        ),
    ]
}
