use std::path::PathBuf;

use crate::assistant::Assistant;
use crate::authoring::Draft;
use crate::catalog::Catalog;
use crate::certification::CertificateRegistry;
use crate::config::Config;
use crate::session::{Authenticator, MockAuthenticator, Session};
use rusqlite::Connection;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Everything one client session owns. Handlers get it by `&mut`; there is no other copy.
pub struct AppState {
    pub config: Config,
    pub workspace: Option<PathBuf>,
    pub db: Option<Connection>,
    pub catalog: Catalog,
    pub session: Session,
    pub certificates: CertificateRegistry,
    pub draft: Option<Draft>,
    pub assistant: Assistant,
    pub authenticator: Box<dyn Authenticator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let assistant = Assistant::from_config(&config);
        let authenticator = Box::new(MockAuthenticator {
            delay: config.auth_delay,
        });
        Self {
            config,
            workspace: None,
            db: None,
            catalog: Catalog::seeded(),
            session: Session::default(),
            certificates: CertificateRegistry::default(),
            draft: None,
            assistant,
            authenticator,
        }
    }
}
