pub mod api;

use crate::agent::Agent;
use crate::config::TlsPaths;
use std::error::Error;
use std::sync::Arc;
use self::api::AppState;

pub struct Server {
    addr: String,
    agent: Arc<dyn Agent>,
    response_field: String,
    tls: Option<TlsPaths>,
}

impl Server {
    pub fn new(
        addr: String,
        agent: Arc<dyn Agent>,
        response_field: String,
        tls: Option<TlsPaths>,
    ) -> Self {
        Self {
            addr,
            agent,
            response_field,
            tls,
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = AppState {
            agent: self.agent.clone(),
            response_field: self.response_field.clone(),
        };
        api::start_http_server(&self.addr, state, self.tls.clone()).await
    }
}
