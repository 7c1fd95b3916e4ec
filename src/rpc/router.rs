use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::schema::{
    parse_input, AlternativesInput, DealerIdInput, DeliveryStatusInput, ExportInput, IdInput,
    InvoiceStatusInput, OrderIdInput, OrderNumberInput, ProductIdInput, RecommendInput,
    SearchInput, SendMessageInput,
};
use super::{lookup, ProcedureKind, RpcError, RpcResult, ValidationError};
use crate::chat::{CatalogChat, ChatBackend};
use crate::recommend::{RankingService, StaticRanking};
use crate::seed::ReferenceData;
use crate::session::{SessionStore, SessionUser};
use crate::store::Repositories;

/// Who is calling, as resolved from the session cookie.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user: Option<SessionUser>,
    pub token: Option<String>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Side effects the transport must apply alongside the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    ClearCookie,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RpcOutput {
    pub data: Value,
    pub effect: Option<SessionEffect>,
}

#[derive(Serialize)]
struct Success {
    success: bool,
}

#[derive(Serialize)]
struct Health {
    ok: bool,
}

fn output<T: Serialize>(value: T) -> RpcResult<RpcOutput> {
    let data = serde_json::to_value(value)
        .map_err(|e| RpcError::CollaboratorFailure(format!("unserializable result: {e}")))?;
    Ok(RpcOutput { data, effect: None })
}

/// Validates and dispatches procedure calls to their collaborators.
pub struct RpcRouter {
    repos: Repositories,
    chat: Arc<dyn ChatBackend>,
    ranking: Arc<dyn RankingService>,
    reference: Arc<ReferenceData>,
    sessions: Arc<dyn SessionStore>,
}

impl RpcRouter {
    /// A router using the catalogue chat, the static ranking table and the
    /// bundled reference data.
    pub fn new(repos: Repositories, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            chat: Arc::new(CatalogChat::new(repos.products.clone())),
            ranking: Arc::new(StaticRanking),
            reference: Arc::new(ReferenceData::mock()),
            repos,
            sessions,
        }
    }

    pub fn with_chat(mut self, chat: Arc<dyn ChatBackend>) -> Self {
        self.chat = chat;
        self
    }

    pub fn with_ranking(mut self, ranking: Arc<dyn RankingService>) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_reference(mut self, reference: Arc<ReferenceData>) -> Self {
        self.reference = reference;
        self
    }

    /// Resolves a session token into a caller; unknown tokens are anonymous.
    pub fn caller(&self, token: Option<&str>) -> Caller {
        match token {
            Some(token) => Caller {
                user: self.sessions.resolve(token),
                token: Some(token.to_string()),
            },
            None => Caller::anonymous(),
        }
    }

    pub async fn call(
        &self,
        caller: &Caller,
        path: &str,
        kind: ProcedureKind,
        input: Value,
    ) -> RpcResult<RpcOutput> {
        self.call_decoded(caller, path, kind, Ok(input)).await
    }

    /// Like [`call`](Self::call) for transports that decode the input themselves.
    ///
    /// A decoding failure is reported only once the procedure exists, accepts
    /// `kind` and admits `caller`.
    pub async fn call_decoded(
        &self,
        caller: &Caller,
        path: &str,
        kind: ProcedureKind,
        input: Result<Value, ValidationError>,
    ) -> RpcResult<RpcOutput> {
        let def = lookup(path).ok_or_else(|| RpcError::ProcedureNotFound(path.to_string()))?;
        if def.kind != kind {
            return Err(RpcError::MethodNotSupported {
                path: path.to_string(),
                expected: def.kind,
                received: kind,
            });
        }
        def.access.authorize(caller.user.as_ref())?;

        debug!(procedure = path, "dispatching");
        let result = match input {
            Ok(input) => self.dispatch(def.path, caller, input).await,
            Err(err) => Err(err.into()),
        };
        match &result {
            Err(RpcError::CollaboratorFailure(detail)) => {
                error!(procedure = path, %detail, "collaborator failed")
            }
            Err(err) => warn!(procedure = path, code = %err.code(), "call rejected"),
            Ok(_) => {}
        }
        result
    }

    async fn dispatch(&self, path: &str, caller: &Caller, input: Value) -> RpcResult<RpcOutput> {
        match path {
            "system.health" => output(Health { ok: true }),

            "auth.me" => output(&caller.user),
            "auth.logout" => {
                if let Some(token) = &caller.token {
                    self.sessions.revoke(token);
                }
                Ok(RpcOutput {
                    effect: Some(SessionEffect::ClearCookie),
                    ..output(Success { success: true })?
                })
            }

            "chat.sendMessage" => {
                let input: SendMessageInput = parse_input(input)?;
                output(self.chat.reply(&input.messages, input.user_query.trim()).await?)
            }
            "chat.getAlternatives" => {
                let input: AlternativesInput = parse_input(input)?;
                output(self.chat.alternatives(input.product_id).await?)
            }
            "chat.exportToEmail" => {
                let input: ExportInput = parse_input(input)?;
                let success = self
                    .chat
                    .export_transcript(input.email.trim(), &input.messages)
                    .await?;
                output(Success { success })
            }

            "orders.getByNumber" => {
                let OrderNumberInput(number) = parse_input(input)?;
                output(self.repos.orders.order_by_number(number.trim()).await?)
            }
            "orders.getItems" => {
                let OrderIdInput(order_id) = parse_input(input)?;
                output(self.repos.orders.order_items(order_id).await?)
            }

            "products.list" => output(self.repos.products.list_products().await?),
            "products.getById" => {
                let ProductIdInput(id) = parse_input(input)?;
                output(self.repos.products.product_by_id(id).await?)
            }
            "products.search" => {
                let SearchInput(term) = parse_input(input)?;
                output(self.repos.products.search_products(term.trim()).await?)
            }
            "products.recommend" => {
                let input: RecommendInput = parse_input(input)?;
                let selected: BTreeSet<i32> = input.product_ids.into_iter().collect();
                output(self.ranking.rank(&selected))
            }

            "invoices.list" => output(self.repos.invoices.list_invoices().await?),
            "invoices.getById" => {
                let IdInput { id } = parse_input(input)?;
                output(self.repos.invoices.invoice_by_id(id).await?)
            }
            "invoices.updateStatus" => {
                let input: InvoiceStatusInput = parse_input(input)?;
                let success = self
                    .repos
                    .invoices
                    .update_invoice_status(input.id, input.status)
                    .await?;
                output(Success { success })
            }

            "deliveryOrders.list" => {
                output(self.repos.delivery_orders.list_delivery_orders().await?)
            }
            "deliveryOrders.getById" => {
                let IdInput { id } = parse_input(input)?;
                output(self.repos.delivery_orders.delivery_order_by_id(id).await?)
            }
            "deliveryOrders.updateStatus" => {
                let input: DeliveryStatusInput = parse_input(input)?;
                let success = self
                    .repos
                    .delivery_orders
                    .update_delivery_status(input.id, input.status)
                    .await?;
                output(Success { success })
            }

            "dealers.list" => output(&self.reference.dealers),
            "dealers.predictiveCart" => {
                let DealerIdInput { dealer_id } = parse_input(input)?;
                output(self.reference.predictive_cart(dealer_id))
            }
            "loyalty.tiers" => output(&self.reference.loyalty_tiers),
            "agents.list" => output(&self.reference.agents),

            other => Err(RpcError::ProcedureNotFound(other.to_string())),
        }
    }
}
