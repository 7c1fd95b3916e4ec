use strum::Display;

use crate::session::SessionUser;

use super::{RpcError, RpcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProcedureKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

impl Access {
    pub fn authorize(self, user: Option<&SessionUser>) -> RpcResult<()> {
        match (self, user) {
            (Access::Public, _) => Ok(()),
            (_, None) => Err(RpcError::Unauthorized),
            (Access::Authenticated, Some(_)) => Ok(()),
            (Access::Admin, Some(user)) if user.is_admin() => Ok(()),
            (Access::Admin, Some(_)) => Err(RpcError::Forbidden),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureDef {
    pub path: &'static str,
    pub kind: ProcedureKind,
    pub access: Access,
}

const fn query(path: &'static str, access: Access) -> ProcedureDef {
    ProcedureDef {
        path,
        kind: ProcedureKind::Query,
        access,
    }
}

const fn mutation(path: &'static str, access: Access) -> ProcedureDef {
    ProcedureDef {
        path,
        kind: ProcedureKind::Mutation,
        access,
    }
}

/// Every remote-callable procedure.
pub const PROCEDURES: &[ProcedureDef] = &[
    query("system.health", Access::Public),
    query("auth.me", Access::Public),
    mutation("auth.logout", Access::Public),
    mutation("chat.sendMessage", Access::Public),
    query("chat.getAlternatives", Access::Public),
    mutation("chat.exportToEmail", Access::Public),
    query("orders.getByNumber", Access::Public),
    query("orders.getItems", Access::Public),
    query("products.list", Access::Public),
    query("products.getById", Access::Public),
    query("products.search", Access::Public),
    query("products.recommend", Access::Public),
    query("invoices.list", Access::Admin),
    query("invoices.getById", Access::Admin),
    mutation("invoices.updateStatus", Access::Admin),
    query("deliveryOrders.list", Access::Admin),
    query("deliveryOrders.getById", Access::Admin),
    mutation("deliveryOrders.updateStatus", Access::Admin),
    query("dealers.list", Access::Admin),
    query("dealers.predictiveCart", Access::Authenticated),
    query("loyalty.tiers", Access::Public),
    query("agents.list", Access::Public),
];

pub fn lookup(path: &str) -> Option<&'static ProcedureDef> {
    PROCEDURES.iter().find(|def| def.path == path)
}
