#![allow(dead_code)]

pub mod collaborators;

pub use collaborators::{CountingChat, CountingStore, FailingStore};

use std::sync::Arc;

use wholesale_rpc::session::{demo_users, MemorySessions, Role};
use wholesale_rpc::{Caller, Repositories, RpcRouter};

/// A router wired to counting collaborators, with one admin and one dealer session.
pub struct Harness {
    pub router: RpcRouter,
    pub store: Arc<CountingStore>,
    pub chat: Arc<CountingChat>,
    pub sessions: Arc<MemorySessions>,
    pub admin_token: String,
    pub dealer_token: String,
}

impl Harness {
    pub fn new() -> Self {
        let store = CountingStore::seeded();
        let repos = Repositories::from_store(store.clone());
        let chat = CountingChat::over(repos.products.clone());
        let sessions = Arc::new(MemorySessions::new());

        let mut admin_token = String::new();
        let mut dealer_token = String::new();
        for user in demo_users() {
            let role = user.role;
            let token = sessions.issue(user);
            match role {
                Role::Admin => admin_token = token,
                Role::User => dealer_token = token,
            }
        }

        let router = RpcRouter::new(repos, sessions.clone()).with_chat(chat.clone());
        Self {
            router,
            store,
            chat,
            sessions,
            admin_token,
            dealer_token,
        }
    }

    pub fn admin(&self) -> Caller {
        self.router.caller(Some(&self.admin_token))
    }

    pub fn dealer(&self) -> Caller {
        self.router.caller(Some(&self.dealer_token))
    }

    /// Calls that reached a database or chat collaborator.
    pub fn collaborator_calls(&self) -> usize {
        self.store.calls() + self.chat.calls()
    }
}
